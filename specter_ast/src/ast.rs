// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The syntax tree, shaped after the ECMA-262 grammar productions, consumed by the evaluator.
//!
//! Nodes are owned and reference counted: function and class nodes are
//! shared between the tree and every function object instantiated from them,
//! so a closure keeps exactly the part of the tree it needs alive.

use std::rc::Rc;

use crate::operators::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};
use crate::scope_analysis::{FunctionScope, VarScope};

/// Name of an identifier, binding or label as it appears in source.
pub type Atom = Rc<str>;

/// Byte offsets into the source text of the enclosing script or module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Slice the text this span covers out of `source`.
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or_default()
    }
}

/// Source text shared by all nodes of one parse.
#[derive(Debug, Clone)]
pub struct SourceText(pub Rc<str>);

impl SourceText {
    pub fn slice(&self, span: Span) -> &str {
        span.source_text(&self.0)
    }
}

/// ### [16.1 Scripts](https://tc39.es/ecma262/#sec-scripts)
#[derive(Debug)]
pub struct Script {
    pub body: Vec<Statement>,
    /// True if the script begins with a Use Strict Directive or was parsed
    /// as strict code by its caller (direct eval from strict code).
    pub strict: bool,
    pub scope: VarScope,
    pub source_text: SourceText,
}

/// ### [16.2 Modules](https://tc39.es/ecma262/#sec-modules)
#[derive(Debug)]
pub struct Module {
    pub body: Vec<Statement>,
    pub scope: VarScope,
    pub source_text: SourceText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: Atom,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Empty,
    Debugger,
    Expression(Expression),
    VariableDeclaration(Rc<VariableDeclaration>),
    FunctionDeclaration(Rc<FunctionNode>),
    ClassDeclaration(Rc<ClassNode>),
    Block(Rc<BlockStatement>),
    If(Box<IfStatement>),
    For(Box<ForStatement>),
    ForIn(Box<ForInOfStatement>),
    ForOf(Box<ForInOfStatement>),
    While(Box<WhileStatement>),
    DoWhile(Box<WhileStatement>),
    Continue(Option<Atom>),
    Break(Option<Atom>),
    Return(Option<Expression>),
    With(Box<WithStatement>),
    Switch(Box<SwitchStatement>),
    Labeled(Box<LabeledStatement>),
    Throw(Expression),
    Try(Box<TryStatement>),
    Import(Rc<ImportDeclaration>),
    Export(Rc<ExportDeclaration>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn is_lexical(self) -> bool {
        !matches!(self, Self::Var)
    }
}

#[derive(Debug)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Debug)]
pub struct VariableDeclarator {
    pub target: BindingPattern,
    pub init: Option<Expression>,
}

#[derive(Debug)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Statement,
    pub alternate: Option<Statement>,
}

#[derive(Debug, Clone)]
pub enum ForInit {
    Variable(Rc<VariableDeclaration>),
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Statement,
}

/// Left hand side of a `for-in` / `for-of` head.
#[derive(Debug, Clone)]
pub enum ForBinding {
    /// `for (var x of ...)`, `for (let [a, b] of ...)`
    Declaration(VariableKind, BindingPattern),
    /// `for (x.y of ...)`, `for ([a, b] of ...)`
    Target(AssignmentTarget),
}

#[derive(Debug, Clone)]
pub struct ForInOfStatement {
    pub left: ForBinding,
    pub right: Expression,
    pub body: Statement,
    /// `for await (...)`
    pub is_await: bool,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Statement,
}

#[derive(Debug, Clone)]
pub struct WithStatement {
    pub object: Expression,
    pub body: Statement,
}

#[derive(Debug, Clone)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// `None` for the `default` clause.
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct LabeledStatement {
    pub label: Atom,
    pub body: Statement,
}

#[derive(Debug, Clone)]
pub struct TryStatement {
    pub block: Rc<BlockStatement>,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<Rc<BlockStatement>>,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Option<BindingPattern>,
    pub body: Rc<BlockStatement>,
}

#[derive(Debug, Clone)]
pub enum Expression {
    Null,
    Boolean(bool),
    Number(f64),
    String(Atom),
    BigInt(Rc<BigIntLiteral>),
    RegExp(Rc<RegExpLiteral>),
    Template(Rc<TemplateLiteral>),
    TaggedTemplate(Box<TaggedTemplate>),
    Identifier(Identifier),
    This,
    NewTarget,
    ImportMeta,
    Array(Rc<ArrayLiteral>),
    Object(Rc<ObjectLiteral>),
    Function(Rc<FunctionNode>),
    ArrowFunction(Rc<FunctionNode>),
    Class(Rc<ClassNode>),
    Unary(Box<UnaryExpression>),
    Update(Box<UpdateExpression>),
    Binary(Box<BinaryExpression>),
    /// `#x in obj`
    PrivateIn(Box<PrivateInExpression>),
    Logical(Box<LogicalExpression>),
    Conditional(Box<ConditionalExpression>),
    Assignment(Box<AssignmentExpression>),
    Sequence(Rc<[Expression]>),
    Member(Box<MemberExpression>),
    SuperMember(Box<MemberProperty>),
    Call(Box<CallExpression>),
    SuperCall(Rc<[Argument]>),
    New(Box<NewExpression>),
    /// Delimits the short-circuiting scope of `?.` links inside it.
    OptionalChain(Box<Expression>),
    Yield(Box<YieldExpression>),
    Await(Box<Expression>),
    /// `import(specifier)`
    Import(Box<Expression>),
    /// Parenthesized expressions are transparent except for assignment
    /// target and NamedEvaluation checks.
    Parenthesized(Box<Expression>),
}

impl Expression {
    /// ### [8.4.3 Static Semantics: IsAnonymousFunctionDefinition ( expr )](https://tc39.es/ecma262/#sec-isanonymousfunctiondefinition)
    pub fn is_anonymous_function_definition(&self) -> bool {
        match self {
            Expression::ArrowFunction(_) => true,
            Expression::Function(f) => f.name.is_none(),
            Expression::Class(c) => c.name.is_none(),
            Expression::Parenthesized(e) => e.is_anonymous_function_definition(),
            _ => false,
        }
    }

    /// Strip any wrapping parentheses.
    pub fn inner(&self) -> &Expression {
        match self {
            Expression::Parenthesized(e) => e.inner(),
            _ => self,
        }
    }

    /// True if this is an IdentifierReference, possibly parenthesized.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self.inner() {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct BigIntLiteral {
    /// Digits without prefix, separators or the `n` suffix.
    pub digits: Box<str>,
    pub radix: u32,
}

#[derive(Debug)]
pub struct RegExpLiteral {
    pub pattern: Atom,
    pub flags: Atom,
}

#[derive(Debug)]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug)]
pub struct TemplateElement {
    /// `None` when the element contains an invalid escape sequence, which is
    /// only legal in tagged templates.
    pub cooked: Option<Atom>,
    pub raw: Atom,
}

#[derive(Debug, Clone)]
pub struct TaggedTemplate {
    pub tag: Expression,
    /// The template is reference counted: its address identifies the
    /// template site for the realm's template registry.
    pub quasi: Rc<TemplateLiteral>,
}

#[derive(Debug)]
pub struct ArrayLiteral {
    pub elements: Vec<ArrayElement>,
}

#[derive(Debug)]
pub enum ArrayElement {
    Hole,
    Spread(Expression),
    Expression(Expression),
}

#[derive(Debug)]
pub struct ObjectLiteral {
    pub properties: Vec<PropertyDefinition>,
}

#[derive(Debug)]
pub enum PropertyDefinition {
    KeyValue(PropertyName, Expression),
    Shorthand(Identifier),
    /// `__proto__: value`
    Proto(Expression),
    Method(PropertyName, MethodKind, Rc<FunctionNode>),
    Spread(Expression),
}

/// ### [13.2.5 Object Initializer](https://tc39.es/ecma262/#prod-PropertyName)
#[derive(Debug, Clone)]
pub enum PropertyName {
    /// Identifier names, string literals and numeric literals; numeric
    /// literals are stored as their canonical Number::toString form.
    Static(Atom),
    Computed(Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub argument: Expression,
}

#[derive(Debug, Clone)]
pub struct UpdateExpression {
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Expression,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone)]
pub struct PrivateInExpression {
    pub name: Atom,
    pub right: Expression,
}

#[derive(Debug, Clone)]
pub struct LogicalExpression {
    pub operator: LogicalOperator,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpression {
    pub test: Expression,
    pub consequent: Expression,
    pub alternate: Expression,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpression {
    pub operator: AssignmentOperator,
    pub target: AssignmentTarget,
    pub value: Expression,
}

#[derive(Debug, Clone)]
pub struct MemberExpression {
    pub object: Expression,
    pub property: MemberProperty,
    /// `a?.b`
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub enum MemberProperty {
    Static(Atom),
    Computed(Expression),
    Private(Atom),
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub callee: Expression,
    pub arguments: Rc<[Argument]>,
    /// `f?.()`
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct NewExpression {
    pub callee: Expression,
    pub arguments: Rc<[Argument]>,
}

#[derive(Debug, Clone)]
pub enum Argument {
    Spread(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct YieldExpression {
    pub argument: Option<Expression>,
    /// `yield*`
    pub delegate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Normal,
    Arrow,
    Method,
    ClassConstructor,
    /// Synthesized function evaluating a single class field initializer.
    ClassFieldInitializer,
    /// Synthesized function wrapping the body of a class static block.
    ClassStaticBlock,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Statements(Vec<Statement>),
    /// Concise arrow function bodies and class field initializers.
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct BindingElement {
    pub target: BindingPattern,
    pub init: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct FormalParameters {
    pub items: Vec<BindingElement>,
    pub rest: Option<BindingPattern>,
}

impl FormalParameters {
    /// ### [15.1.3 Static Semantics: IsSimpleParameterList](https://tc39.es/ecma262/#sec-static-semantics-issimpleparameterlist)
    pub fn is_simple_parameter_list(&self) -> bool {
        self.rest.is_none()
            && self.items.iter().all(|item| {
                item.init.is_none() && matches!(item.target, BindingPattern::Identifier(_))
            })
    }

    /// ### [15.1.4 Static Semantics: ContainsExpression](https://tc39.es/ecma262/#sec-static-semantics-containsexpression)
    pub fn contains_expression(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.init.is_some() || item.target.contains_expression())
            || self
                .rest
                .as_ref()
                .is_some_and(BindingPattern::contains_expression)
    }

    /// ### [15.1.5 Static Semantics: ExpectedArgumentCount](https://tc39.es/ecma262/#sec-static-semantics-expectedargumentcount)
    pub fn expected_argument_count(&self) -> usize {
        self.items
            .iter()
            .position(|item| item.init.is_some())
            .unwrap_or(self.items.len())
    }
}

/// A function, method, arrow function, class constructor or synthesized
/// class element function.
#[derive(Debug)]
pub struct FunctionNode {
    pub name: Option<Identifier>,
    pub kind: FunctionKind,
    pub is_async: bool,
    pub is_generator: bool,
    pub params: FormalParameters,
    pub body: FunctionBody,
    /// Function code is strict if it is contained in strict code or its body
    /// begins with a Use Strict Directive.
    pub strict: bool,
    pub scope: FunctionScope,
    pub span: Span,
    pub source_text: SourceText,
}

impl FunctionNode {
    /// Source text matched by this function, used by
    /// `Function.prototype.toString`.
    pub fn source(&self) -> &str {
        self.source_text.slice(self.span)
    }
}

#[derive(Debug)]
pub struct ClassNode {
    pub name: Option<Identifier>,
    pub heritage: Option<Expression>,
    /// `None` when the class has no explicit constructor; the evaluator then
    /// creates the default constructor.
    pub constructor: Option<Rc<FunctionNode>>,
    pub elements: Vec<ClassElement>,
    pub span: Span,
    pub source_text: SourceText,
}

impl ClassNode {
    pub fn source(&self) -> &str {
        self.source_text.slice(self.span)
    }
}

#[derive(Debug, Clone)]
pub enum ClassElementName {
    Property(PropertyName),
    Private(Atom),
}

#[derive(Debug, Clone)]
pub enum ClassElement {
    Method {
        key: ClassElementName,
        is_static: bool,
        kind: MethodKind,
        function: Rc<FunctionNode>,
    },
    Field {
        key: ClassElementName,
        is_static: bool,
        initializer: Option<Rc<FunctionNode>>,
    },
    StaticBlock(Rc<FunctionNode>),
}

#[derive(Debug, Clone)]
pub enum BindingPattern {
    Identifier(Identifier),
    Object(Rc<ObjectBindingPattern>),
    Array(Rc<ArrayBindingPattern>),
}

impl BindingPattern {
    /// ### [8.2.1 Static Semantics: BoundNames](https://tc39.es/ecma262/#sec-static-semantics-boundnames)
    pub fn bound_names(&self, f: &mut impl FnMut(&Identifier)) {
        match self {
            BindingPattern::Identifier(id) => f(id),
            BindingPattern::Object(pattern) => {
                for property in &pattern.properties {
                    property.value.target.bound_names(f);
                }
                if let Some(rest) = &pattern.rest {
                    f(rest);
                }
            }
            BindingPattern::Array(pattern) => {
                for element in pattern.elements.iter().flatten() {
                    element.target.bound_names(f);
                }
                if let Some(rest) = &pattern.rest {
                    rest.bound_names(f);
                }
            }
        }
    }

    pub fn contains_expression(&self) -> bool {
        match self {
            BindingPattern::Identifier(_) => false,
            BindingPattern::Object(pattern) => pattern.properties.iter().any(|property| {
                matches!(property.key, PropertyName::Computed(_))
                    || property.value.init.is_some()
                    || property.value.target.contains_expression()
            }),
            BindingPattern::Array(pattern) => {
                pattern.elements.iter().flatten().any(|element| {
                    element.init.is_some() || element.target.contains_expression()
                }) || pattern
                    .rest
                    .as_ref()
                    .is_some_and(BindingPattern::contains_expression)
            }
        }
    }
}

#[derive(Debug)]
pub struct ObjectBindingPattern {
    pub properties: Vec<BindingProperty>,
    pub rest: Option<Identifier>,
}

#[derive(Debug)]
pub struct BindingProperty {
    pub key: PropertyName,
    pub value: BindingElement,
}

#[derive(Debug)]
pub struct ArrayBindingPattern {
    pub elements: Vec<Option<BindingElement>>,
    pub rest: Option<BindingPattern>,
}

/// Left hand side of an assignment expression or a `for-in/of` head without
/// a declaration.
#[derive(Debug, Clone)]
pub enum AssignmentTarget {
    /// Identifier references, property accesses and `super` property
    /// accesses.
    Simple(Expression),
    Object(Rc<ObjectAssignmentPattern>),
    Array(Rc<ArrayAssignmentPattern>),
}

#[derive(Debug)]
pub struct AssignmentElement {
    pub target: AssignmentTarget,
    pub init: Option<Expression>,
}

#[derive(Debug)]
pub struct AssignmentProperty {
    pub key: PropertyName,
    pub value: AssignmentElement,
}

#[derive(Debug)]
pub struct ObjectAssignmentPattern {
    pub properties: Vec<AssignmentProperty>,
    pub rest: Option<AssignmentTarget>,
}

#[derive(Debug)]
pub struct ArrayAssignmentPattern {
    pub elements: Vec<Option<AssignmentElement>>,
    pub rest: Option<AssignmentTarget>,
}

/// ### [16.2.2 Imports](https://tc39.es/ecma262/#sec-imports)
#[derive(Debug)]
pub struct ImportDeclaration {
    pub module_request: Atom,
    pub bindings: Vec<ImportBinding>,
}

#[derive(Debug)]
pub struct ImportBinding {
    pub import_name: ImportName,
    pub local: Identifier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportName {
    /// `import { x as y }`, `import x` (which imports `default`)
    Named(Atom),
    /// `import * as ns`
    Namespace,
}

/// ### [16.2.3 Exports](https://tc39.es/ecma262/#sec-exports)
#[derive(Debug)]
pub enum ExportDeclaration {
    /// `export var/let/const/function/class ...`
    Declaration(Statement),
    /// `export default ...`
    Default(DefaultExport),
    /// `export { a as b }` and `export { a as b } from "m"`
    Named {
        specifiers: Vec<ExportSpecifier>,
        module_request: Option<Atom>,
    },
    /// `export * from "m"` and `export * as ns from "m"`
    All {
        exported: Option<Atom>,
        module_request: Atom,
    },
}

#[derive(Debug)]
pub enum DefaultExport {
    Function(Rc<FunctionNode>),
    Class(Rc<ClassNode>),
    Expression(Expression),
}

#[derive(Debug)]
pub struct ExportSpecifier {
    pub local: Atom,
    pub exported: Atom,
}
