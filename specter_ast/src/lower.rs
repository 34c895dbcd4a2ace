// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lowering of the oxc AST into the owned tree in [`crate::ast`].
//!
//! oxc nodes borrow from an arena that lives only as long as the parse, while
//! function objects keep their syntax alive for as long as they exist. The
//! lowering pass copies every node the evaluator needs out of the arena,
//! resolves strictness and precomputes the scope analysis of every function.

use std::rc::Rc;

use oxc_ast::ast;

use crate::ast::{
    Argument, ArrayAssignmentPattern, ArrayBindingPattern, ArrayElement, ArrayLiteral,
    AssignmentElement, AssignmentExpression, AssignmentProperty, AssignmentTarget, Atom,
    BigIntLiteral, BinaryExpression, BindingElement, BindingPattern, BindingProperty,
    BlockStatement, CallExpression, CatchClause, ClassElement, ClassElementName, ClassNode,
    ConditionalExpression, DefaultExport, ExportDeclaration, ExportSpecifier, Expression,
    ForBinding, ForInOfStatement, ForInit, ForStatement, FormalParameters, FunctionBody,
    FunctionKind, FunctionNode, Identifier, IfStatement, ImportBinding, ImportDeclaration,
    ImportName, LabeledStatement, LogicalExpression, MemberExpression, MemberProperty, MethodKind,
    NewExpression, ObjectAssignmentPattern, ObjectBindingPattern, ObjectLiteral,
    PrivateInExpression, PropertyDefinition, PropertyName, RegExpLiteral, SourceText, Span,
    Statement, SwitchCase, SwitchStatement, TaggedTemplate, TemplateElement, TemplateLiteral,
    TryStatement, UnaryExpression, UpdateExpression, VariableDeclaration, VariableDeclarator,
    VariableKind, WhileStatement, WithStatement, YieldExpression,
};
use crate::error::ParseError;
use crate::operators::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};
use crate::scope_analysis::FunctionScope;

type Result<T> = std::result::Result<T, ParseError>;

fn atom(name: &str) -> Atom {
    Rc::from(name)
}

/// Literal text with oxc's lossy escape decoded: when `lone_surrogates` is
/// set, each U+FFFD is followed by four hex digits naming the code unit it
/// stands for. Strings hold Unicode scalar values, so every such sequence
/// becomes a single U+FFFD.
fn literal_atom(value: &str, lone_surrogates: bool) -> Atom {
    if !lone_surrogates {
        return atom(value);
    }
    let mut decoded = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        decoded.push(c);
        if c == char::REPLACEMENT_CHARACTER {
            for _ in 0..4 {
                chars.next();
            }
        }
    }
    Rc::from(decoded)
}

fn span(span: oxc_span::Span) -> Span {
    Span::new(span.start, span.end)
}

fn has_use_strict(directives: &[ast::Directive]) -> bool {
    directives
        .iter()
        .any(|directive| directive.directive == "use strict")
}

/// Number::toString of a numeric literal used as a property name.
pub(crate) fn canonical_numeric_string(value: f64) -> Atom {
    let mut buffer = ryu_js::Buffer::new();
    atom(buffer.format(value))
}

pub(crate) struct Lowerer<'s> {
    source: &'s str,
    source_text: SourceText,
    strict: bool,
    is_module: bool,
    function_depth: u32,
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(source: &'s str, strict: bool, is_module: bool) -> Self {
        Self {
            source,
            source_text: SourceText(Rc::from(source)),
            strict: strict || is_module,
            is_module,
            function_depth: 0,
        }
    }

    pub(crate) fn source_text(&self) -> SourceText {
        self.source_text.clone()
    }

    pub(crate) fn set_strict(&mut self, strict: bool) {
        self.strict |= strict;
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.strict
    }

    fn identifier(&self, name: &oxc_span::Atom, at: oxc_span::Span) -> Identifier {
        Identifier {
            name: atom(name.as_str()),
            span: span(at),
        }
    }

    // Statements

    pub(crate) fn statements(&mut self, statements: &[ast::Statement]) -> Result<Vec<Statement>> {
        statements.iter().map(|s| self.statement(s)).collect()
    }

    /// A Script or Module body. oxc keeps the directive prologue apart, but
    /// each directive is an ExpressionStatement whose value is the script's
    /// completion value when nothing follows it.
    pub(crate) fn program_body(&mut self, program: &ast::Program) -> Result<Vec<Statement>> {
        let mut body = Vec::with_capacity(program.directives.len() + program.body.len());
        body.extend(program.directives.iter().map(|directive| {
            Statement::Expression(Expression::String(literal_atom(
                &directive.expression.value,
                directive.expression.lone_surrogates,
            )))
        }));
        body.extend(self.statements(&program.body)?);
        Ok(body)
    }

    fn block(&mut self, block: &ast::BlockStatement) -> Result<Rc<BlockStatement>> {
        Ok(Rc::new(BlockStatement {
            body: self.statements(&block.body)?,
        }))
    }

    fn statement(&mut self, statement: &ast::Statement) -> Result<Statement> {
        Ok(match statement {
            ast::Statement::BlockStatement(block) => Statement::Block(self.block(block)?),
            ast::Statement::BreakStatement(s) => {
                Statement::Break(s.label.as_ref().map(|label| atom(&label.name)))
            }
            ast::Statement::ContinueStatement(s) => {
                Statement::Continue(s.label.as_ref().map(|label| atom(&label.name)))
            }
            ast::Statement::DebuggerStatement(_) => Statement::Debugger,
            ast::Statement::DoWhileStatement(s) => Statement::DoWhile(Box::new(WhileStatement {
                test: self.expression(&s.test)?,
                body: self.statement(&s.body)?,
            })),
            ast::Statement::EmptyStatement(_) => Statement::Empty,
            ast::Statement::ExpressionStatement(s) => {
                Statement::Expression(self.expression(&s.expression)?)
            }
            ast::Statement::ForInStatement(s) => Statement::ForIn(Box::new(ForInOfStatement {
                left: self.for_binding(&s.left)?,
                right: self.expression(&s.right)?,
                body: self.statement(&s.body)?,
                is_await: false,
            })),
            ast::Statement::ForOfStatement(s) => {
                if s.r#await && self.function_depth == 0 {
                    return Err(ParseError::unsupported("top-level for await", s.span));
                }
                Statement::ForOf(Box::new(ForInOfStatement {
                    left: self.for_binding(&s.left)?,
                    right: self.expression(&s.right)?,
                    body: self.statement(&s.body)?,
                    is_await: s.r#await,
                }))
            }
            ast::Statement::ForStatement(s) => {
                let init = match &s.init {
                    None => None,
                    Some(ast::ForStatementInit::VariableDeclaration(declaration)) => {
                        Some(ForInit::Variable(self.variable_declaration(declaration)?))
                    }
                    Some(init) => match init.as_expression() {
                        Some(expression) => Some(ForInit::Expression(self.expression(expression)?)),
                        None => return Err(ParseError::unsupported("for statement head", s.span)),
                    },
                };
                Statement::For(Box::new(ForStatement {
                    init,
                    test: self.optional_expression(s.test.as_ref())?,
                    update: self.optional_expression(s.update.as_ref())?,
                    body: self.statement(&s.body)?,
                }))
            }
            ast::Statement::IfStatement(s) => Statement::If(Box::new(IfStatement {
                test: self.expression(&s.test)?,
                consequent: self.statement(&s.consequent)?,
                alternate: match &s.alternate {
                    Some(alternate) => Some(self.statement(alternate)?),
                    None => None,
                },
            })),
            ast::Statement::LabeledStatement(s) => Statement::Labeled(Box::new(LabeledStatement {
                label: atom(&s.label.name),
                body: self.statement(&s.body)?,
            })),
            ast::Statement::ReturnStatement(s) => {
                Statement::Return(self.optional_expression(s.argument.as_ref())?)
            }
            ast::Statement::SwitchStatement(s) => {
                let discriminant = self.expression(&s.discriminant)?;
                let mut cases = Vec::with_capacity(s.cases.len());
                for case in &s.cases {
                    cases.push(SwitchCase {
                        test: self.optional_expression(case.test.as_ref())?,
                        consequent: self.statements(&case.consequent)?,
                    });
                }
                Statement::Switch(Box::new(SwitchStatement {
                    discriminant,
                    cases,
                }))
            }
            ast::Statement::ThrowStatement(s) => Statement::Throw(self.expression(&s.argument)?),
            ast::Statement::TryStatement(s) => {
                let block = self.block(&s.block)?;
                let handler = match &s.handler {
                    Some(handler) => Some(CatchClause {
                        param: match &handler.param {
                            Some(param) => Some(self.binding_pattern(&param.pattern)?),
                            None => None,
                        },
                        body: self.block(&handler.body)?,
                    }),
                    None => None,
                };
                let finalizer = match &s.finalizer {
                    Some(finalizer) => Some(self.block(finalizer)?),
                    None => None,
                };
                Statement::Try(Box::new(TryStatement {
                    block,
                    handler,
                    finalizer,
                }))
            }
            ast::Statement::WhileStatement(s) => Statement::While(Box::new(WhileStatement {
                test: self.expression(&s.test)?,
                body: self.statement(&s.body)?,
            })),
            ast::Statement::WithStatement(s) => Statement::With(Box::new(WithStatement {
                object: self.expression(&s.object)?,
                body: self.statement(&s.body)?,
            })),
            ast::Statement::VariableDeclaration(declaration) => {
                Statement::VariableDeclaration(self.variable_declaration(declaration)?)
            }
            ast::Statement::FunctionDeclaration(f) => {
                Statement::FunctionDeclaration(self.function(f, FunctionKind::Normal, None)?)
            }
            ast::Statement::ClassDeclaration(class) => {
                Statement::ClassDeclaration(self.class(class)?)
            }
            ast::Statement::ImportDeclaration(declaration) => {
                Statement::Import(Rc::new(self.import_declaration(declaration)?))
            }
            ast::Statement::ExportAllDeclaration(declaration) => {
                Statement::Export(Rc::new(ExportDeclaration::All {
                    exported: declaration.exported.as_ref().map(module_export_name),
                    module_request: atom(&declaration.source.value),
                }))
            }
            ast::Statement::ExportDefaultDeclaration(declaration) => Statement::Export(Rc::new(
                ExportDeclaration::Default(self.default_export(declaration)?),
            )),
            ast::Statement::ExportNamedDeclaration(declaration) => {
                Statement::Export(Rc::new(self.named_export(declaration)?))
            }
            _ => {
                return Err(ParseError::unsupported(
                    "TypeScript statement",
                    statement_span(statement),
                ));
            }
        })
    }

    fn variable_declaration(
        &mut self,
        declaration: &ast::VariableDeclaration,
    ) -> Result<Rc<VariableDeclaration>> {
        let kind = match declaration.kind {
            ast::VariableDeclarationKind::Var => VariableKind::Var,
            ast::VariableDeclarationKind::Let => VariableKind::Let,
            ast::VariableDeclarationKind::Const => VariableKind::Const,
            _ => {
                return Err(ParseError::unsupported(
                    "explicit resource management",
                    declaration.span,
                ));
            }
        };
        let mut declarations = Vec::with_capacity(declaration.declarations.len());
        for declarator in &declaration.declarations {
            declarations.push(VariableDeclarator {
                target: self.binding_pattern(&declarator.id)?,
                init: self.optional_expression(declarator.init.as_ref())?,
            });
        }
        Ok(Rc::new(VariableDeclaration { kind, declarations }))
    }

    fn for_binding(&mut self, left: &ast::ForStatementLeft) -> Result<ForBinding> {
        match left {
            ast::ForStatementLeft::VariableDeclaration(declaration) => {
                let declaration = self.variable_declaration(declaration)?;
                match declaration.declarations.first() {
                    Some(declarator) => Ok(ForBinding::Declaration(
                        declaration.kind,
                        declarator.target.clone(),
                    )),
                    None => Err(ParseError::Unsupported {
                        what: "empty for-in/of declaration",
                        span: Span::default(),
                    }),
                }
            }
            other => match other.as_assignment_target() {
                Some(target) => Ok(ForBinding::Target(self.assignment_target(target)?)),
                None => Err(ParseError::Unsupported {
                    what: "for-in/of head",
                    span: Span::default(),
                }),
            },
        }
    }

    fn import_declaration(
        &mut self,
        declaration: &ast::ImportDeclaration,
    ) -> Result<ImportDeclaration> {
        let mut bindings = Vec::new();
        if let Some(specifiers) = &declaration.specifiers {
            for specifier in specifiers {
                bindings.push(match specifier {
                    ast::ImportDeclarationSpecifier::ImportSpecifier(s) => ImportBinding {
                        import_name: ImportName::Named(module_export_name(&s.imported)),
                        local: self.identifier(&s.local.name, s.local.span),
                    },
                    ast::ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportBinding {
                        import_name: ImportName::Named(atom("default")),
                        local: self.identifier(&s.local.name, s.local.span),
                    },
                    ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                        ImportBinding {
                            import_name: ImportName::Namespace,
                            local: self.identifier(&s.local.name, s.local.span),
                        }
                    }
                });
            }
        }
        Ok(ImportDeclaration {
            module_request: atom(&declaration.source.value),
            bindings,
        })
    }

    fn default_export(
        &mut self,
        declaration: &ast::ExportDefaultDeclaration,
    ) -> Result<DefaultExport> {
        Ok(match &declaration.declaration {
            ast::ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
                DefaultExport::Function(self.function(f, FunctionKind::Normal, None)?)
            }
            ast::ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                DefaultExport::Class(self.class(class)?)
            }
            other => match other.as_expression() {
                Some(expression) => DefaultExport::Expression(self.expression(expression)?),
                None => {
                    return Err(ParseError::unsupported(
                        "TypeScript default export",
                        declaration.span,
                    ));
                }
            },
        })
    }

    fn named_export(
        &mut self,
        declaration: &ast::ExportNamedDeclaration,
    ) -> Result<ExportDeclaration> {
        if let Some(inner) = &declaration.declaration {
            let statement = match inner {
                ast::Declaration::VariableDeclaration(d) => {
                    Statement::VariableDeclaration(self.variable_declaration(d)?)
                }
                ast::Declaration::FunctionDeclaration(f) => {
                    Statement::FunctionDeclaration(self.function(f, FunctionKind::Normal, None)?)
                }
                ast::Declaration::ClassDeclaration(class) => {
                    Statement::ClassDeclaration(self.class(class)?)
                }
                _ => {
                    return Err(ParseError::unsupported(
                        "TypeScript declaration",
                        declaration.span,
                    ));
                }
            };
            return Ok(ExportDeclaration::Declaration(statement));
        }
        Ok(ExportDeclaration::Named {
            specifiers: declaration
                .specifiers
                .iter()
                .map(|specifier| ExportSpecifier {
                    local: module_export_name(&specifier.local),
                    exported: module_export_name(&specifier.exported),
                })
                .collect(),
            module_request: declaration.source.as_ref().map(|s| atom(&s.value)),
        })
    }

    // Expressions

    fn optional_expression(
        &mut self,
        expression: Option<&ast::Expression>,
    ) -> Result<Option<Expression>> {
        expression.map(|e| self.expression(e)).transpose()
    }

    fn arguments(&mut self, arguments: &[ast::Argument]) -> Result<Rc<[Argument]>> {
        let mut result = Vec::with_capacity(arguments.len());
        for argument in arguments {
            result.push(match argument {
                ast::Argument::SpreadElement(spread) => {
                    Argument::Spread(self.expression(&spread.argument)?)
                }
                other => match other.as_expression() {
                    Some(expression) => Argument::Expression(self.expression(expression)?),
                    None => {
                        return Err(ParseError::unsupported("argument", oxc_span::Span::default()));
                    }
                },
            });
        }
        Ok(result.into())
    }

    pub(crate) fn expression(&mut self, expression: &ast::Expression) -> Result<Expression> {
        Ok(match expression {
            ast::Expression::BooleanLiteral(b) => Expression::Boolean(b.value),
            ast::Expression::NullLiteral(_) => Expression::Null,
            ast::Expression::NumericLiteral(n) => Expression::Number(n.value),
            ast::Expression::BigIntLiteral(b) => {
                Expression::BigInt(Rc::new(self.bigint_literal(b.span)?))
            }
            ast::Expression::RegExpLiteral(r) => {
                Expression::RegExp(Rc::new(self.regexp_literal(r.span)))
            }
            ast::Expression::StringLiteral(s) => {
                Expression::String(literal_atom(&s.value, s.lone_surrogates))
            }
            ast::Expression::TemplateLiteral(t) => Expression::Template(Rc::new(self.template(t)?)),
            ast::Expression::Identifier(id) => {
                Expression::Identifier(self.identifier(&id.name, id.span))
            }
            ast::Expression::MetaProperty(meta) => {
                match (meta.meta.name.as_str(), meta.property.name.as_str()) {
                    ("new", "target") => Expression::NewTarget,
                    ("import", "meta") => Expression::ImportMeta,
                    _ => return Err(ParseError::unsupported("meta property", meta.span)),
                }
            }
            ast::Expression::ThisExpression(_) => Expression::This,
            ast::Expression::ArrayExpression(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(match element {
                        ast::ArrayExpressionElement::SpreadElement(spread) => {
                            ArrayElement::Spread(self.expression(&spread.argument)?)
                        }
                        ast::ArrayExpressionElement::Elision(_) => ArrayElement::Hole,
                        other => match other.as_expression() {
                            Some(e) => ArrayElement::Expression(self.expression(e)?),
                            None => {
                                return Err(ParseError::unsupported("array element", array.span));
                            }
                        },
                    });
                }
                Expression::Array(Rc::new(ArrayLiteral { elements }))
            }
            ast::Expression::ObjectExpression(object) => {
                Expression::Object(Rc::new(self.object_literal(object)?))
            }
            ast::Expression::ArrowFunctionExpression(f) => {
                Expression::ArrowFunction(self.arrow_function(f)?)
            }
            ast::Expression::FunctionExpression(f) => {
                Expression::Function(self.function(f, FunctionKind::Normal, None)?)
            }
            ast::Expression::ClassExpression(class) => Expression::Class(self.class(class)?),
            ast::Expression::AssignmentExpression(a) => {
                let operator = AssignmentOperator::parse(a.operator.as_str())
                    .ok_or_else(|| ParseError::unsupported("assignment operator", a.span))?;
                Expression::Assignment(Box::new(AssignmentExpression {
                    operator,
                    target: self.assignment_target(&a.left)?,
                    value: self.expression(&a.right)?,
                }))
            }
            ast::Expression::AwaitExpression(a) => {
                if self.is_module && self.function_depth == 0 {
                    return Err(ParseError::unsupported("top-level await", a.span));
                }
                Expression::Await(Box::new(self.expression(&a.argument)?))
            }
            ast::Expression::BinaryExpression(b) => {
                let operator = BinaryOperator::parse(b.operator.as_str())
                    .ok_or_else(|| ParseError::unsupported("binary operator", b.span))?;
                Expression::Binary(Box::new(BinaryExpression {
                    operator,
                    left: self.expression(&b.left)?,
                    right: self.expression(&b.right)?,
                }))
            }
            ast::Expression::LogicalExpression(l) => {
                let operator = LogicalOperator::parse(l.operator.as_str())
                    .ok_or_else(|| ParseError::unsupported("logical operator", l.span))?;
                Expression::Logical(Box::new(LogicalExpression {
                    operator,
                    left: self.expression(&l.left)?,
                    right: self.expression(&l.right)?,
                }))
            }
            ast::Expression::UnaryExpression(u) => {
                let operator = UnaryOperator::parse(u.operator.as_str())
                    .ok_or_else(|| ParseError::unsupported("unary operator", u.span))?;
                Expression::Unary(Box::new(UnaryExpression {
                    operator,
                    argument: self.expression(&u.argument)?,
                }))
            }
            ast::Expression::UpdateExpression(u) => {
                Expression::Update(Box::new(UpdateExpression {
                    operator: match u.operator {
                        oxc_syntax::operator::UpdateOperator::Increment => {
                            UpdateOperator::Increment
                        }
                        oxc_syntax::operator::UpdateOperator::Decrement => {
                            UpdateOperator::Decrement
                        }
                    },
                    prefix: u.prefix,
                    argument: self.simple_assignment_target(&u.argument)?,
                }))
            }
            ast::Expression::ConditionalExpression(c) => {
                Expression::Conditional(Box::new(ConditionalExpression {
                    test: self.expression(&c.test)?,
                    consequent: self.expression(&c.consequent)?,
                    alternate: self.expression(&c.alternate)?,
                }))
            }
            ast::Expression::SequenceExpression(s) => {
                let mut expressions = Vec::with_capacity(s.expressions.len());
                for e in &s.expressions {
                    expressions.push(self.expression(e)?);
                }
                Expression::Sequence(expressions.into())
            }
            ast::Expression::ParenthesizedExpression(p) => {
                Expression::Parenthesized(Box::new(self.expression(&p.expression)?))
            }
            ast::Expression::CallExpression(call) => self.call_expression(call)?,
            ast::Expression::NewExpression(new) => Expression::New(Box::new(NewExpression {
                callee: self.expression(&new.callee)?,
                arguments: self.arguments(&new.arguments)?,
            })),
            ast::Expression::ChainExpression(chain) => {
                let inner = match &chain.expression {
                    ast::ChainElement::CallExpression(call) => self.call_expression(call)?,
                    other => match other.as_member_expression() {
                        Some(member) => self.member_expression(member)?,
                        None => {
                            return Err(ParseError::unsupported("TypeScript chain", chain.span));
                        }
                    },
                };
                Expression::OptionalChain(Box::new(inner))
            }
            ast::Expression::ComputedMemberExpression(m) => self.computed_member(m)?,
            ast::Expression::StaticMemberExpression(m) => self.static_member(m)?,
            ast::Expression::PrivateFieldExpression(m) => self.private_field(m)?,
            ast::Expression::PrivateInExpression(p) => {
                Expression::PrivateIn(Box::new(PrivateInExpression {
                    name: atom(&p.left.name),
                    right: self.expression(&p.right)?,
                }))
            }
            ast::Expression::TaggedTemplateExpression(t) => {
                Expression::TaggedTemplate(Box::new(TaggedTemplate {
                    tag: self.expression(&t.tag)?,
                    quasi: Rc::new(self.template(&t.quasi)?),
                }))
            }
            ast::Expression::YieldExpression(y) => Expression::Yield(Box::new(YieldExpression {
                argument: self.optional_expression(y.argument.as_ref())?,
                delegate: y.delegate,
            })),
            ast::Expression::ImportExpression(i) => {
                Expression::Import(Box::new(self.expression(&i.source)?))
            }
            ast::Expression::Super(s) => {
                return Err(ParseError::unsupported("bare super", s.span));
            }
            _ => {
                return Err(ParseError::unsupported(
                    "JSX or TypeScript expression",
                    oxc_span::Span::default(),
                ));
            }
        })
    }

    fn call_expression(&mut self, call: &ast::CallExpression) -> Result<Expression> {
        let arguments = self.arguments(&call.arguments)?;
        if matches!(call.callee, ast::Expression::Super(_)) {
            return Ok(Expression::SuperCall(arguments));
        }
        Ok(Expression::Call(Box::new(CallExpression {
            callee: self.expression(&call.callee)?,
            arguments,
            optional: call.optional,
        })))
    }

    fn member_expression(&mut self, member: &ast::MemberExpression) -> Result<Expression> {
        match member {
            ast::MemberExpression::ComputedMemberExpression(m) => self.computed_member(m),
            ast::MemberExpression::StaticMemberExpression(m) => self.static_member(m),
            ast::MemberExpression::PrivateFieldExpression(m) => self.private_field(m),
        }
    }

    fn member(
        &mut self,
        object: &ast::Expression,
        property: MemberProperty,
        optional: bool,
    ) -> Result<Expression> {
        if matches!(object, ast::Expression::Super(_)) {
            return Ok(Expression::SuperMember(Box::new(property)));
        }
        Ok(Expression::Member(Box::new(MemberExpression {
            object: self.expression(object)?,
            property,
            optional,
        })))
    }

    fn computed_member(&mut self, m: &ast::ComputedMemberExpression) -> Result<Expression> {
        let property = MemberProperty::Computed(self.expression(&m.expression)?);
        self.member(&m.object, property, m.optional)
    }

    fn static_member(&mut self, m: &ast::StaticMemberExpression) -> Result<Expression> {
        let property = MemberProperty::Static(atom(&m.property.name));
        self.member(&m.object, property, m.optional)
    }

    fn private_field(&mut self, m: &ast::PrivateFieldExpression) -> Result<Expression> {
        let property = MemberProperty::Private(atom(&m.field.name));
        self.member(&m.object, property, m.optional)
    }

    fn template(&mut self, template: &ast::TemplateLiteral) -> Result<TemplateLiteral> {
        let quasis = template
            .quasis
            .iter()
            .map(|quasi| TemplateElement {
                cooked: quasi
                    .value
                    .cooked
                    .as_ref()
                    .map(|cooked| literal_atom(cooked, quasi.lone_surrogates)),
                raw: atom(&quasi.value.raw),
            })
            .collect();
        let mut expressions = Vec::with_capacity(template.expressions.len());
        for expression in &template.expressions {
            expressions.push(self.expression(expression)?);
        }
        Ok(TemplateLiteral {
            quasis,
            expressions,
        })
    }

    fn bigint_literal(&self, at: oxc_span::Span) -> Result<BigIntLiteral> {
        let raw = span(at).source_text(self.source);
        let raw = raw.strip_suffix('n').unwrap_or(raw);
        let (radix, digits) = match raw.get(..2) {
            Some("0x" | "0X") => (16, &raw[2..]),
            Some("0o" | "0O") => (8, &raw[2..]),
            Some("0b" | "0B") => (2, &raw[2..]),
            _ => (10, raw),
        };
        let digits: String = digits.chars().filter(|c| *c != '_').collect();
        if digits.is_empty() {
            return Err(ParseError::unsupported("BigInt literal", at));
        }
        Ok(BigIntLiteral {
            digits: digits.into_boxed_str(),
            radix,
        })
    }

    fn regexp_literal(&self, at: oxc_span::Span) -> RegExpLiteral {
        let raw = span(at).source_text(self.source);
        let body = raw.strip_prefix('/').unwrap_or(raw);
        let (pattern, flags) = match body.rfind('/') {
            Some(index) => (&body[..index], &body[index + 1..]),
            None => (body, ""),
        };
        RegExpLiteral {
            pattern: atom(pattern),
            flags: atom(flags),
        }
    }

    fn object_literal(&mut self, object: &ast::ObjectExpression) -> Result<ObjectLiteral> {
        let mut properties = Vec::with_capacity(object.properties.len());
        for property in &object.properties {
            properties.push(match property {
                ast::ObjectPropertyKind::SpreadProperty(spread) => {
                    PropertyDefinition::Spread(self.expression(&spread.argument)?)
                }
                ast::ObjectPropertyKind::ObjectProperty(p) => {
                    let method_kind = match p.kind {
                        ast::PropertyKind::Init if p.method => Some(MethodKind::Method),
                        ast::PropertyKind::Init => None,
                        ast::PropertyKind::Get => Some(MethodKind::Get),
                        ast::PropertyKind::Set => Some(MethodKind::Set),
                    };
                    if let Some(kind) = method_kind {
                        let ast::Expression::FunctionExpression(f) = &p.value else {
                            return Err(ParseError::unsupported("object method", p.span));
                        };
                        let key = self.property_key(&p.key)?;
                        let function = self.function(f, FunctionKind::Method, Some(p.span))?;
                        PropertyDefinition::Method(key, kind, function)
                    } else if p.shorthand {
                        match &p.value {
                            ast::Expression::Identifier(id) => {
                                PropertyDefinition::Shorthand(self.identifier(&id.name, id.span))
                            }
                            _ => return Err(ParseError::unsupported("shorthand property", p.span)),
                        }
                    } else if !p.computed && is_proto_key(&p.key) {
                        PropertyDefinition::Proto(self.expression(&p.value)?)
                    } else {
                        let key = self.property_key(&p.key)?;
                        PropertyDefinition::KeyValue(key, self.expression(&p.value)?)
                    }
                }
            });
        }
        Ok(ObjectLiteral { properties })
    }

    /// Literal keys are static whether or not they were written in brackets;
    /// both forms evaluate to the same property key.
    fn property_key(&mut self, key: &ast::PropertyKey) -> Result<PropertyName> {
        Ok(match key {
            ast::PropertyKey::StaticIdentifier(id) => PropertyName::Static(atom(&id.name)),
            ast::PropertyKey::PrivateIdentifier(id) => {
                return Err(ParseError::unsupported("private name as property key", id.span));
            }
            ast::PropertyKey::StringLiteral(s) => {
                PropertyName::Static(literal_atom(&s.value, s.lone_surrogates))
            }
            ast::PropertyKey::NumericLiteral(n) => {
                PropertyName::Static(canonical_numeric_string(n.value))
            }
            ast::PropertyKey::BigIntLiteral(b) => {
                let literal = self.bigint_literal(b.span)?;
                match u128::from_str_radix(&literal.digits, literal.radix) {
                    Ok(value) => PropertyName::Static(atom(&value.to_string())),
                    Err(_) => {
                        return Err(ParseError::unsupported("BigInt property name", b.span));
                    }
                }
            }
            other => match other.as_expression() {
                Some(expression) => PropertyName::Computed(self.expression(expression)?),
                None => {
                    return Err(ParseError::unsupported(
                        "property key",
                        oxc_span::Span::default(),
                    ));
                }
            },
        })
    }

    fn class_element_name(&mut self, key: &ast::PropertyKey) -> Result<ClassElementName> {
        Ok(match key {
            ast::PropertyKey::PrivateIdentifier(id) => ClassElementName::Private(atom(&id.name)),
            _ => ClassElementName::Property(self.property_key(key)?),
        })
    }

    // Patterns

    fn binding_pattern(&mut self, pattern: &ast::BindingPattern) -> Result<BindingPattern> {
        Ok(match &pattern.kind {
            ast::BindingPatternKind::BindingIdentifier(id) => {
                BindingPattern::Identifier(self.identifier(&id.name, id.span))
            }
            ast::BindingPatternKind::ObjectPattern(object) => {
                let mut properties = Vec::with_capacity(object.properties.len());
                for property in &object.properties {
                    properties.push(BindingProperty {
                        key: self.property_key(&property.key)?,
                        value: self.binding_element(&property.value)?,
                    });
                }
                let rest = match &object.rest {
                    Some(rest) => match &rest.argument.kind {
                        ast::BindingPatternKind::BindingIdentifier(id) => {
                            Some(self.identifier(&id.name, id.span))
                        }
                        _ => return Err(ParseError::unsupported("object rest pattern", rest.span)),
                    },
                    None => None,
                };
                BindingPattern::Object(Rc::new(ObjectBindingPattern { properties, rest }))
            }
            ast::BindingPatternKind::ArrayPattern(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(match element {
                        Some(element) => Some(self.binding_element(element)?),
                        None => None,
                    });
                }
                let rest = match &array.rest {
                    Some(rest) => Some(self.binding_pattern(&rest.argument)?),
                    None => None,
                };
                BindingPattern::Array(Rc::new(ArrayBindingPattern { elements, rest }))
            }
            ast::BindingPatternKind::AssignmentPattern(assignment) => {
                return Err(ParseError::unsupported(
                    "initializer outside binding element",
                    assignment.span,
                ));
            }
        })
    }

    fn binding_element(&mut self, pattern: &ast::BindingPattern) -> Result<BindingElement> {
        if let ast::BindingPatternKind::AssignmentPattern(assignment) = &pattern.kind {
            return Ok(BindingElement {
                target: self.binding_pattern(&assignment.left)?,
                init: Some(self.expression(&assignment.right)?),
            });
        }
        Ok(BindingElement {
            target: self.binding_pattern(pattern)?,
            init: None,
        })
    }

    fn assignment_target(&mut self, target: &ast::AssignmentTarget) -> Result<AssignmentTarget> {
        Ok(match target {
            ast::AssignmentTarget::ArrayAssignmentTarget(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(match element {
                        Some(element) => Some(self.assignment_element(element)?),
                        None => None,
                    });
                }
                let rest = match &array.rest {
                    Some(rest) => Some(self.assignment_target(&rest.target)?),
                    None => None,
                };
                AssignmentTarget::Array(Rc::new(ArrayAssignmentPattern { elements, rest }))
            }
            ast::AssignmentTarget::ObjectAssignmentTarget(object) => {
                let mut properties = Vec::with_capacity(object.properties.len());
                for property in &object.properties {
                    properties.push(match property {
                        ast::AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(p) => {
                            let id = self.identifier(&p.binding.name, p.binding.span);
                            AssignmentProperty {
                                key: PropertyName::Static(id.name.clone()),
                                value: AssignmentElement {
                                    target: AssignmentTarget::Simple(Expression::Identifier(id)),
                                    init: self.optional_expression(p.init.as_ref())?,
                                },
                            }
                        }
                        ast::AssignmentTargetProperty::AssignmentTargetPropertyProperty(p) => {
                            AssignmentProperty {
                                key: self.property_key(&p.name)?,
                                value: self.assignment_element(&p.binding)?,
                            }
                        }
                    });
                }
                let rest = match &object.rest {
                    Some(rest) => Some(self.assignment_target(&rest.target)?),
                    None => None,
                };
                AssignmentTarget::Object(Rc::new(ObjectAssignmentPattern { properties, rest }))
            }
            other => match other.as_simple_assignment_target() {
                Some(simple) => AssignmentTarget::Simple(self.simple_assignment_target(simple)?),
                None => {
                    return Err(ParseError::unsupported(
                        "assignment target",
                        oxc_span::Span::default(),
                    ));
                }
            },
        })
    }

    fn assignment_element(
        &mut self,
        element: &ast::AssignmentTargetMaybeDefault,
    ) -> Result<AssignmentElement> {
        match element {
            ast::AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(with_default) => {
                Ok(AssignmentElement {
                    target: self.assignment_target(&with_default.binding)?,
                    init: Some(self.expression(&with_default.init)?),
                })
            }
            other => match other.as_assignment_target() {
                Some(target) => Ok(AssignmentElement {
                    target: self.assignment_target(target)?,
                    init: None,
                }),
                None => Err(ParseError::unsupported(
                    "assignment element",
                    oxc_span::Span::default(),
                )),
            },
        }
    }

    fn simple_assignment_target(
        &mut self,
        target: &ast::SimpleAssignmentTarget,
    ) -> Result<Expression> {
        match target {
            ast::SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                Ok(Expression::Identifier(self.identifier(&id.name, id.span)))
            }
            ast::SimpleAssignmentTarget::ComputedMemberExpression(m) => self.computed_member(m),
            ast::SimpleAssignmentTarget::StaticMemberExpression(m) => self.static_member(m),
            ast::SimpleAssignmentTarget::PrivateFieldExpression(m) => self.private_field(m),
            _ => Err(ParseError::unsupported(
                "TypeScript assignment target",
                oxc_span::Span::default(),
            )),
        }
    }

    // Functions and classes

    fn formal_parameters(&mut self, params: &ast::FormalParameters) -> Result<FormalParameters> {
        let mut items = Vec::with_capacity(params.items.len());
        for item in &params.items {
            items.push(self.binding_element(&item.pattern)?);
        }
        let rest = match &params.rest {
            Some(rest) => Some(self.binding_pattern(&rest.argument)?),
            None => None,
        };
        Ok(FormalParameters { items, rest })
    }

    /// Run `f` with the strictness of a nested function body.
    fn in_function<T>(
        &mut self,
        strict: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let outer_strict = self.strict;
        self.strict = outer_strict || strict;
        self.function_depth += 1;
        let result = f(self);
        self.function_depth -= 1;
        self.strict = outer_strict;
        result
    }

    fn function(
        &mut self,
        f: &ast::Function,
        kind: FunctionKind,
        source_span: Option<oxc_span::Span>,
    ) -> Result<Rc<FunctionNode>> {
        let Some(body) = &f.body else {
            return Err(ParseError::unsupported("function without body", f.span));
        };
        let name = f.id.as_ref().map(|id| self.identifier(&id.name, id.span));
        let strict = has_use_strict(&body.directives) || kind == FunctionKind::ClassConstructor;
        let (params, statements, strict) = self.in_function(strict, |this| {
            let params = this.formal_parameters(&f.params)?;
            let statements = this.statements(&body.statements)?;
            Ok((params, statements, this.strict))
        })?;
        let scope = FunctionScope::analyze(&params, &statements);
        Ok(Rc::new(FunctionNode {
            name,
            kind,
            is_async: f.r#async,
            is_generator: f.generator,
            params,
            body: FunctionBody::Statements(statements),
            strict,
            scope,
            span: span(source_span.unwrap_or(f.span)),
            source_text: self.source_text(),
        }))
    }

    fn arrow_function(&mut self, f: &ast::ArrowFunctionExpression) -> Result<Rc<FunctionNode>> {
        let strict = has_use_strict(&f.body.directives);
        let (params, body, strict) = self.in_function(strict, |this| {
            let params = this.formal_parameters(&f.params)?;
            let body = if f.expression {
                match f.body.statements.first() {
                    Some(ast::Statement::ExpressionStatement(s)) => {
                        FunctionBody::Expression(this.expression(&s.expression)?)
                    }
                    _ => return Err(ParseError::unsupported("arrow function body", f.span)),
                }
            } else {
                FunctionBody::Statements(this.statements(&f.body.statements)?)
            };
            Ok((params, body, this.strict))
        })?;
        let scope = match &body {
            FunctionBody::Statements(statements) => FunctionScope::analyze(&params, statements),
            FunctionBody::Expression(_) => FunctionScope::analyze(&params, &[]),
        };
        Ok(Rc::new(FunctionNode {
            name: None,
            kind: FunctionKind::Arrow,
            is_async: f.r#async,
            is_generator: false,
            params,
            body,
            strict,
            scope,
            span: span(f.span),
            source_text: self.source_text(),
        }))
    }

    /// Wrap a class field initializer or static block in a method-like
    /// function so `this`, `super` and `new.target` resolve like in methods.
    fn synthesized_function(
        &self,
        kind: FunctionKind,
        body: FunctionBody,
        at: oxc_span::Span,
    ) -> Rc<FunctionNode> {
        let params = FormalParameters {
            items: Vec::new(),
            rest: None,
        };
        let scope = match &body {
            FunctionBody::Statements(statements) => FunctionScope::analyze(&params, statements),
            FunctionBody::Expression(_) => FunctionScope::analyze(&params, &[]),
        };
        Rc::new(FunctionNode {
            name: None,
            kind,
            is_async: false,
            is_generator: false,
            params,
            body,
            strict: true,
            scope,
            span: span(at),
            source_text: self.source_text(),
        })
    }

    fn class(&mut self, class: &ast::Class) -> Result<Rc<ClassNode>> {
        let name = class.id.as_ref().map(|id| self.identifier(&id.name, id.span));
        let outer_strict = self.strict;
        // All parts of a class are strict mode code.
        self.strict = true;
        let result = self.class_body(class);
        self.strict = outer_strict;
        let (heritage, constructor, elements) = result?;
        Ok(Rc::new(ClassNode {
            name,
            heritage,
            constructor,
            elements,
            span: span(class.span),
            source_text: self.source_text(),
        }))
    }

    #[allow(clippy::type_complexity)]
    fn class_body(
        &mut self,
        class: &ast::Class,
    ) -> Result<(Option<Expression>, Option<Rc<FunctionNode>>, Vec<ClassElement>)> {
        let heritage = self.optional_expression(class.super_class.as_ref())?;
        let mut constructor = None;
        let mut elements = Vec::with_capacity(class.body.body.len());
        for element in &class.body.body {
            match element {
                ast::ClassElement::MethodDefinition(m) => {
                    let kind = match m.kind {
                        ast::MethodDefinitionKind::Constructor => {
                            constructor = Some(self.function(
                                &m.value,
                                FunctionKind::ClassConstructor,
                                Some(class.span),
                            )?);
                            continue;
                        }
                        ast::MethodDefinitionKind::Method => MethodKind::Method,
                        ast::MethodDefinitionKind::Get => MethodKind::Get,
                        ast::MethodDefinitionKind::Set => MethodKind::Set,
                    };
                    let key = self.class_element_name(&m.key)?;
                    let function = self.function(&m.value, FunctionKind::Method, Some(m.span))?;
                    elements.push(ClassElement::Method {
                        key,
                        is_static: m.r#static,
                        kind,
                        function,
                    });
                }
                ast::ClassElement::PropertyDefinition(p) => {
                    let key = self.class_element_name(&p.key)?;
                    let initializer = match &p.value {
                        Some(value) => {
                            let value =
                                self.in_function(true, |this| this.expression(value))?;
                            Some(self.synthesized_function(
                                FunctionKind::ClassFieldInitializer,
                                FunctionBody::Expression(value),
                                p.span,
                            ))
                        }
                        None => None,
                    };
                    elements.push(ClassElement::Field {
                        key,
                        is_static: p.r#static,
                        initializer,
                    });
                }
                ast::ClassElement::StaticBlock(block) => {
                    let body = self.in_function(true, |this| this.statements(&block.body))?;
                    elements.push(ClassElement::StaticBlock(self.synthesized_function(
                        FunctionKind::ClassStaticBlock,
                        FunctionBody::Statements(body),
                        block.span,
                    )));
                }
                ast::ClassElement::AccessorProperty(accessor) => {
                    return Err(ParseError::unsupported("auto-accessor", accessor.span));
                }
                _ => {
                    return Err(ParseError::unsupported(
                        "TypeScript class element",
                        class.span,
                    ));
                }
            }
        }
        Ok((heritage, constructor, elements))
    }
}

fn module_export_name(name: &ast::ModuleExportName) -> Atom {
    match name {
        ast::ModuleExportName::IdentifierName(name) => atom(&name.name),
        ast::ModuleExportName::IdentifierReference(name) => atom(&name.name),
        ast::ModuleExportName::StringLiteral(name) => atom(&name.value),
    }
}

fn is_proto_key(key: &ast::PropertyKey) -> bool {
    match key {
        ast::PropertyKey::StaticIdentifier(id) => id.name == "__proto__",
        ast::PropertyKey::StringLiteral(s) => s.value == "__proto__",
        _ => false,
    }
}

fn statement_span(statement: &ast::Statement) -> oxc_span::Span {
    use oxc_span::GetSpan;
    statement.span()
}
