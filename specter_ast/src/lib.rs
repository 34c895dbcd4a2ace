// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Syntax front end of the Specter engine.
//!
//! Source text is parsed by oxc and lowered into an owned, reference counted
//! tree whose nodes mirror the grammar productions the evaluator dispatches
//! on. Scope analysis needed by the declaration instantiation algorithms is
//! computed during lowering.

pub mod ast;
mod error;
mod lower;
pub mod operators;
pub mod scope_analysis;

use std::rc::Rc;

use oxc_allocator::Allocator;
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;

pub use error::ParseError;
pub use oxc_diagnostics::OxcDiagnostic;

use ast::{Expression, FunctionNode, Module, Script};
use lower::Lowerer;
use scope_analysis::VarScope;

fn parse_program<'a>(
    allocator: &'a Allocator,
    source_text: &'a str,
    source_type: SourceType,
) -> Result<oxc_ast::ast::Program<'a>, ParseError> {
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(allocator, source_text, source_type).parse();
    if panicked || !errors.is_empty() {
        return Err(ParseError::Syntax(errors));
    }
    Ok(program)
}

/// ### [16.1.5 ParseScript ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parse-script)
///
/// Parse `source_text` as a Script. `strict` forces strict mode code, as for
/// direct eval called from strict code.
pub fn parse_script(source_text: &str, strict: bool) -> Result<Script, ParseError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_script(true);
    let program = parse_program(&allocator, source_text, source_type)?;
    let mut lowerer = Lowerer::new(source_text, strict, false);
    lowerer.set_strict(
        program
            .directives
            .iter()
            .any(|directive| directive.directive == "use strict"),
    );
    let body = lowerer.program_body(&program)?;
    Ok(Script {
        scope: VarScope::of_statements(&body),
        strict: lowerer.is_strict(),
        body,
        source_text: lowerer.source_text(),
    })
}

/// ### [16.2.1.7.1 ParseModule ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parsemodule)
pub fn parse_module(source_text: &str) -> Result<Module, ParseError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true);
    let program = parse_program(&allocator, source_text, source_type)?;
    let mut lowerer = Lowerer::new(source_text, true, true);
    let body = lowerer.program_body(&program)?;
    Ok(Module {
        scope: VarScope::of_module(&body),
        body,
        source_text: lowerer.source_text(),
    })
}

/// Parse the synthesized source text of a dynamic function, such as
/// `function anonymous(a, b\n) {\nreturn a + b\n}`, and return the single
/// function it defines.
pub fn parse_dynamic_function(source_text: &str) -> Result<Rc<FunctionNode>, ParseError> {
    let wrapped = format!("({source_text})");
    let script = parse_script(&wrapped, false)?;
    let expression = match script.body.as_slice() {
        [ast::Statement::Expression(expression)] => expression.inner(),
        _ => {
            return Err(ParseError::Unsupported {
                what: "dynamic function body",
                span: ast::Span::default(),
            });
        }
    };
    match expression {
        Expression::Function(f) | Expression::ArrowFunction(f) => Ok(f.clone()),
        _ => Err(ParseError::Unsupported {
            what: "dynamic function body",
            span: ast::Span::default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{
        ClassElement, ExportDeclaration, FunctionBody, FunctionKind, ImportName, PropertyDefinition,
        PropertyName, Statement,
    };
    use scope_analysis::LexicallyScopedDeclaration;

    #[test]
    fn use_strict_directive_makes_script_strict() {
        let script = parse_script("'use strict'; var x = 1;", false).unwrap();
        assert!(script.strict);
        let script = parse_script("var x = 1; 'use strict';", false).unwrap();
        assert!(!script.strict);
    }

    #[test]
    fn strictness_propagates_into_functions() {
        let script = parse_script("function f() { 'use strict'; function g() {} }", false).unwrap();
        let Statement::FunctionDeclaration(f) = &script.body[0] else {
            panic!("expected function declaration");
        };
        assert!(f.strict);
        let FunctionBody::Statements(body) = &f.body else {
            panic!("expected statement body");
        };
        let Statement::FunctionDeclaration(g) = &body[0] else {
            panic!("expected nested function");
        };
        assert!(g.strict);
    }

    #[test]
    fn syntax_errors_are_reported() {
        let error = parse_script("let = ;", false).unwrap_err();
        assert!(matches!(error, ParseError::Syntax(_)));
    }

    #[test]
    fn var_scope_hoists_nested_vars_and_functions() {
        let script = parse_script(
            "var a; if (x) { var b; } function f() { var inner; } function f() {} let c;",
            false,
        )
        .unwrap();
        let names: Vec<&str> = script.scope.var_names.iter().map(|n| &**n).collect();
        assert_eq!(names, ["a", "b", "f"]);
        assert_eq!(script.scope.functions_to_initialize.len(), 1);
        assert_eq!(script.scope.lexical_declarations.len(), 1);
        assert_eq!(script.scope.lexical_declarations[0].name(), "c");
    }

    #[test]
    fn numeric_property_names_are_canonical() {
        let script = parse_script("({ 1.50: a, 0x10: b, 'x': c })", false).unwrap();
        let Statement::Expression(expression) = &script.body[0] else {
            panic!("expected expression statement");
        };
        let ast::Expression::Object(object) = expression.inner() else {
            panic!("expected object literal");
        };
        let keys: Vec<&str> = object
            .properties
            .iter()
            .map(|property| match property {
                PropertyDefinition::KeyValue(PropertyName::Static(key), _) => &**key,
                _ => panic!("expected static key"),
            })
            .collect();
        assert_eq!(keys, ["1.5", "16", "x"]);
    }

    #[test]
    fn class_elements_are_lowered() {
        let script = parse_script(
            "class A extends B { #x = 1; static y; constructor() { super(); } get z() {} static { } }",
            false,
        )
        .unwrap();
        let Statement::ClassDeclaration(class) = &script.body[0] else {
            panic!("expected class");
        };
        assert!(class.heritage.is_some());
        let constructor = class.constructor.as_ref().unwrap();
        assert_eq!(constructor.kind, FunctionKind::ClassConstructor);
        assert!(constructor.strict);
        assert_eq!(class.elements.len(), 4);
        assert!(matches!(
            &class.elements[0],
            ClassElement::Field { initializer: Some(f), is_static: false, .. }
                if f.kind == FunctionKind::ClassFieldInitializer
        ));
        assert!(matches!(
            &class.elements[3],
            ClassElement::StaticBlock(f) if f.kind == FunctionKind::ClassStaticBlock
        ));
    }

    #[test]
    fn bigint_and_regexp_literals_keep_source_form() {
        let script = parse_script("0x1_Fn; /a[/]b/gi;", false).unwrap();
        let Statement::Expression(ast::Expression::BigInt(bigint)) = &script.body[0] else {
            panic!("expected BigInt literal");
        };
        assert_eq!(&*bigint.digits, "1F");
        assert_eq!(bigint.radix, 16);
        let Statement::Expression(ast::Expression::RegExp(regexp)) = &script.body[1] else {
            panic!("expected RegExp literal");
        };
        assert_eq!(&*regexp.pattern, "a[/]b");
        assert_eq!(&*regexp.flags, "gi");
    }

    #[test]
    fn lone_surrogates_become_replacement_characters() {
        let script = parse_script(
            "'\\ud800'; 'a\\udc00\u{fffd}b'; `x\\ud83dy`; '\\ud83d\\ude00';",
            false,
        )
        .unwrap();
        let strings: Vec<&str> = script
            .body
            .iter()
            .map(|statement| match statement {
                Statement::Expression(ast::Expression::String(value)) => &**value,
                Statement::Expression(ast::Expression::Template(template)) => template.quasis[0]
                    .cooked
                    .as_deref()
                    .unwrap_or_default(),
                _ => panic!("expected string or template literal"),
            })
            .collect();
        assert_eq!(strings, ["\u{fffd}", "a\u{fffd}\u{fffd}b", "x\u{fffd}y", "😀"]);
    }

    #[test]
    fn module_declarations() {
        let module = parse_module(
            "import d, * as ns from './a.js'; export default function () {} export { d as e };",
        )
        .unwrap();
        let Statement::Import(import) = &module.body[0] else {
            panic!("expected import");
        };
        assert_eq!(import.bindings[0].import_name, ImportName::Named("default".into()));
        assert_eq!(import.bindings[1].import_name, ImportName::Namespace);
        assert!(matches!(
            &module.scope.lexical_declarations[0],
            LexicallyScopedDeclaration::Function(_)
        ));
        assert_eq!(module.scope.lexical_declarations[0].name(), "*default*");
        let Statement::Export(export) = &module.body[2] else {
            panic!("expected export");
        };
        assert!(matches!(export.as_ref(), ExportDeclaration::Named { .. }));
    }

    #[test]
    fn top_level_await_is_rejected() {
        let error = parse_module("await 1;").unwrap_err();
        assert!(matches!(error, ParseError::Unsupported { .. }));
    }

    #[test]
    fn dynamic_function_source() {
        let f = parse_dynamic_function("function anonymous(a, b\n) {\nreturn a + b\n}").unwrap();
        assert_eq!(f.params.items.len(), 2);
        assert!(f.source().starts_with("function anonymous("));
    }
}
