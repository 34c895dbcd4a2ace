// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [8.2 Scope Analysis](https://tc39.es/ecma262/#sec-syntax-directed-operations-scope-analysis)
//!
//! The declaration instantiation algorithms only depend on syntax, so their
//! inputs are computed once when a function, script or module is lowered.

use std::rc::Rc;

use crate::ast::{
    Atom, ExportDeclaration, DefaultExport, ForBinding, ForInit, FormalParameters, FunctionNode,
    Statement, VariableKind,
};

/// Binding name used for anonymous default exports.
pub const DEFAULT_EXPORT_BINDING: &str = "*default*";

/// One element of LexicallyScopedDeclarations.
#[derive(Debug, Clone)]
pub enum LexicallyScopedDeclaration {
    Let(Atom),
    Const(Atom),
    Class(Atom),
    Function(Rc<FunctionNode>),
}

impl LexicallyScopedDeclaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Let(name) | Self::Const(name) | Self::Class(name) => name,
            Self::Function(f) => f
                .name
                .as_ref()
                .map_or(DEFAULT_EXPORT_BINDING, |name| &name.name),
        }
    }

    /// ### [8.2.3 Static Semantics: IsConstantDeclaration](https://tc39.es/ecma262/#sec-static-semantics-isconstantdeclaration)
    pub fn is_constant_declaration(&self) -> bool {
        matches!(self, Self::Const(_))
    }
}

/// Declarations of a variable scope: a script, module, eval code or the body
/// of a function.
#[derive(Debug, Clone, Default)]
pub struct VarScope {
    /// VarDeclaredNames in source order, without duplicates. Includes the
    /// names of hoisted function declarations.
    pub var_names: Vec<Atom>,
    /// The `functionsToInitialize` list of the declaration instantiation
    /// algorithms: the last declaration of each name wins.
    pub functions_to_initialize: Vec<Rc<FunctionNode>>,
    /// The (top level) LexicallyScopedDeclarations.
    pub lexical_declarations: Vec<LexicallyScopedDeclaration>,
}

impl VarScope {
    /// Analyse the top level of a Script, eval code, a function body or a
    /// class static block: function declarations are var scoped.
    pub fn of_statements(statements: &[Statement]) -> Self {
        let mut collector = VarCollector::default();
        for statement in statements {
            collector.top_level_statement(statement);
        }
        Self {
            var_names: collector.names,
            functions_to_initialize: dedupe_functions(collector.functions),
            lexical_declarations: top_level_lexically_scoped_declarations(statements),
        }
    }

    /// Analyse the top level of a Module: function declarations are
    /// lexically scoped.
    pub fn of_module(statements: &[Statement]) -> Self {
        let mut collector = VarCollector::default();
        let mut lexical_declarations = Vec::new();
        for statement in statements {
            match statement {
                Statement::FunctionDeclaration(f) => {
                    lexical_declarations.push(LexicallyScopedDeclaration::Function(f.clone()));
                }
                Statement::Export(export) => match export.as_ref() {
                    ExportDeclaration::Declaration(Statement::FunctionDeclaration(f)) => {
                        lexical_declarations
                            .push(LexicallyScopedDeclaration::Function(f.clone()));
                    }
                    ExportDeclaration::Declaration(declaration) => {
                        collector.statement(declaration);
                        push_lexical_declaration(declaration, false, &mut lexical_declarations);
                    }
                    ExportDeclaration::Default(DefaultExport::Function(f)) => {
                        lexical_declarations
                            .push(LexicallyScopedDeclaration::Function(f.clone()));
                    }
                    ExportDeclaration::Default(DefaultExport::Class(class)) => {
                        let name = class.name.as_ref().map_or_else(
                            || Atom::from(DEFAULT_EXPORT_BINDING),
                            |name| name.name.clone(),
                        );
                        lexical_declarations.push(LexicallyScopedDeclaration::Class(name));
                    }
                    ExportDeclaration::Default(DefaultExport::Expression(_)) => {
                        lexical_declarations.push(LexicallyScopedDeclaration::Let(Atom::from(
                            DEFAULT_EXPORT_BINDING,
                        )));
                    }
                    ExportDeclaration::Named { .. } | ExportDeclaration::All { .. } => {}
                },
                _ => {
                    collector.statement(statement);
                    push_lexical_declaration(statement, false, &mut lexical_declarations);
                }
            }
        }
        Self {
            var_names: collector.names,
            functions_to_initialize: Vec::new(),
            lexical_declarations,
        }
    }
}

/// Inputs of FunctionDeclarationInstantiation.
#[derive(Debug, Clone, Default)]
pub struct FunctionScope {
    pub parameter_names: Vec<Atom>,
    pub has_duplicate_parameters: bool,
    pub is_simple_parameter_list: bool,
    pub has_parameter_expressions: bool,
    pub body: VarScope,
}

impl FunctionScope {
    pub fn analyze(params: &FormalParameters, body: &[Statement]) -> Self {
        let mut parameter_names: Vec<Atom> = Vec::new();
        let mut has_duplicate_parameters = false;
        let mut add = |name: &Atom| {
            if parameter_names.contains(name) {
                has_duplicate_parameters = true;
            }
            parameter_names.push(name.clone());
        };
        for item in &params.items {
            item.target.bound_names(&mut |id| add(&id.name));
        }
        if let Some(rest) = &params.rest {
            rest.bound_names(&mut |id| add(&id.name));
        }
        Self {
            parameter_names,
            has_duplicate_parameters,
            is_simple_parameter_list: params.is_simple_parameter_list(),
            has_parameter_expressions: params.contains_expression(),
            body: VarScope::of_statements(body),
        }
    }
}

#[derive(Default)]
struct VarCollector {
    names: Vec<Atom>,
    functions: Vec<Rc<FunctionNode>>,
}

impl VarCollector {
    fn add_name(&mut self, name: &Atom) {
        if !self.names.contains(name) {
            self.names.push(name.clone());
        }
    }

    /// ### [8.2.9 Static Semantics: TopLevelVarScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-toplevelvarscopeddeclarations)
    fn top_level_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::FunctionDeclaration(f) => {
                if let Some(name) = &f.name {
                    self.add_name(&name.name);
                }
                self.functions.push(f.clone());
            }
            Statement::Labeled(labeled) => self.top_level_statement(&labeled.body),
            _ => self.statement(statement),
        }
    }

    /// ### [8.2.6 Static Semantics: VarDeclaredNames](https://tc39.es/ecma262/#sec-static-semantics-vardeclarednames)
    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                if declaration.kind == VariableKind::Var {
                    for declarator in &declaration.declarations {
                        declarator
                            .target
                            .bound_names(&mut |id| self.add_name(&id.name));
                    }
                }
            }
            Statement::Block(block) => self.statements(&block.body),
            Statement::If(statement) => {
                self.statement(&statement.consequent);
                if let Some(alternate) = &statement.alternate {
                    self.statement(alternate);
                }
            }
            Statement::For(statement) => {
                if let Some(ForInit::Variable(declaration)) = &statement.init {
                    self.statement(&Statement::VariableDeclaration(declaration.clone()));
                }
                self.statement(&statement.body);
            }
            Statement::ForIn(statement) | Statement::ForOf(statement) => {
                if let ForBinding::Declaration(VariableKind::Var, pattern) = &statement.left {
                    pattern.bound_names(&mut |id| self.add_name(&id.name));
                }
                self.statement(&statement.body);
            }
            Statement::While(statement) | Statement::DoWhile(statement) => {
                self.statement(&statement.body)
            }
            Statement::With(statement) => self.statement(&statement.body),
            Statement::Switch(statement) => {
                for case in &statement.cases {
                    self.statements(&case.consequent);
                }
            }
            Statement::Labeled(statement) => self.statement(&statement.body),
            Statement::Try(statement) => {
                self.statements(&statement.block.body);
                if let Some(handler) = &statement.handler {
                    self.statements(&handler.body.body);
                }
                if let Some(finalizer) = &statement.finalizer {
                    self.statements(&finalizer.body);
                }
            }
            Statement::Export(export) => {
                if let ExportDeclaration::Declaration(declaration) = export.as_ref() {
                    self.statement(declaration);
                }
            }
            _ => {}
        }
    }

    fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }
}

/// Keep only the last declaration of every function name, in source order.
fn dedupe_functions(functions: Vec<Rc<FunctionNode>>) -> Vec<Rc<FunctionNode>> {
    let mut declared_function_names: Vec<&str> = Vec::new();
    let mut functions_to_initialize = Vec::new();
    for f in functions.iter().rev() {
        let name = f.name.as_ref().map_or("", |name| &name.name);
        if !declared_function_names.contains(&name) {
            declared_function_names.push(name);
            functions_to_initialize.push(f.clone());
        }
    }
    functions_to_initialize.reverse();
    functions_to_initialize
}

fn push_lexical_declaration(
    statement: &Statement,
    functions_are_lexical: bool,
    declarations: &mut Vec<LexicallyScopedDeclaration>,
) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            let kind = declaration.kind;
            if kind == VariableKind::Var {
                return;
            }
            for declarator in &declaration.declarations {
                declarator.target.bound_names(&mut |id| {
                    declarations.push(if kind == VariableKind::Const {
                        LexicallyScopedDeclaration::Const(id.name.clone())
                    } else {
                        LexicallyScopedDeclaration::Let(id.name.clone())
                    })
                });
            }
        }
        Statement::ClassDeclaration(class) => {
            if let Some(name) = &class.name {
                declarations.push(LexicallyScopedDeclaration::Class(name.name.clone()));
            }
        }
        Statement::FunctionDeclaration(f) if functions_are_lexical => {
            declarations.push(LexicallyScopedDeclaration::Function(f.clone()));
        }
        Statement::Labeled(labeled) if functions_are_lexical => {
            push_lexical_declaration(&labeled.body, functions_are_lexical, declarations)
        }
        _ => {}
    }
}

/// ### [8.2.5 Static Semantics: LexicallyScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-lexicallyscopeddeclarations)
///
/// Declarations of a Block or CaseBlock: function declarations are lexically
/// scoped.
pub fn lexically_scoped_declarations<'a>(
    statements: impl IntoIterator<Item = &'a Statement>,
) -> Vec<LexicallyScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in statements {
        push_lexical_declaration(statement, true, &mut declarations);
    }
    declarations
}

/// ### [8.2.8 Static Semantics: TopLevelLexicallyScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-toplevellexicallyscopeddeclarations)
pub fn top_level_lexically_scoped_declarations(
    statements: &[Statement],
) -> Vec<LexicallyScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in statements {
        push_lexical_declaration(statement, false, &mut declarations);
    }
    declarations
}
