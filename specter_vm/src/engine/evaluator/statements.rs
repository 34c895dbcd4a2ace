// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [14 ECMAScript Language: Statements and Declarations](https://tc39.es/ecma262/#sec-ecmascript-language-statements-and-declarations)

use std::rc::Rc;

use specter_ast::{
    ast::{
        Atom, BindingPattern, BlockStatement, CatchClause, ClassNode, DefaultExport,
        ExportDeclaration, ForInit, ForStatement, Statement, SwitchStatement, TryStatement,
        VariableDeclaration, VariableKind, WhileStatement, WithStatement,
    },
    scope_analysis::{DEFAULT_EXPORT_BINDING, lexically_scoped_declarations},
};

use super::{
    assignment::{binding_initialization, evaluate_initializer},
    class_definition_evaluation,
    declaration_instantiation::block_declaration_instantiation,
    evaluate_expression, evaluate_statement, evaluate_statement_list,
    for_in_of_statement::{IterationKind, completion_value, for_in_of_loop_evaluation},
    function_definitions::in_async_generator,
    lexical_environment, name_string, named_evaluation, update_empty,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            testing_and_comparison::is_strictly_equal,
            type_conversion::{to_boolean, to_object},
        },
        builtins::ecmascript_function::ClassElementKey,
        execution::{
            Agent, EnvironmentIndex, JsError, agent::resolve_binding, new_declarative_environment,
            new_object_environment,
        },
        types::{
            AbruptCompletion, Completion, HeapString, PropertyKey, Value,
            initialize_referenced_binding, loop_continues, put_value,
        },
    },
    engine::coroutine::await_value,
};

/// ### [14.13.4 Runtime Semantics: LabelledEvaluation](https://tc39.es/ecma262/#sec-labelled-statements-runtime-semantics-labelledevaluation)
///
/// Every statement is evaluated through here. `label_set` holds the labels
/// of the LabelledStatements directly enclosing `statement`.
pub(super) async fn labelled_evaluation(
    agent: &Agent,
    statement: &Statement,
    label_set: Vec<Atom>,
) -> Completion {
    match statement {
        // LabelledStatement : LabelIdentifier : LabelledItem
        Statement::Labeled(labeled) => {
            // 1. Let label be the StringValue of LabelIdentifier.
            let label = &labeled.label;
            // 2. Let newLabelSet be the list-concatenation of labelSet and « label ».
            let mut new_label_set = label_set;
            new_label_set.push(label.clone());
            // 3. Let stmtResult be Completion(LabelledEvaluation of LabelledItem
            // with argument newLabelSet).
            let stmt_result =
                Box::pin(labelled_evaluation(agent, &labeled.body, new_label_set)).await;
            // 4. If stmtResult is a break completion and stmtResult.[[Target]]
            // is label, then
            match stmt_result {
                // a. Set stmtResult to NormalCompletion(stmtResult.[[Value]]).
                Err(AbruptCompletion::Break {
                    label: Some(target),
                    value,
                }) if &target == label => Ok(value),
                // 5. Return ? stmtResult.
                result => result,
            }
        }
        // BreakableStatement : IterationStatement
        Statement::For(_)
        | Statement::ForIn(_)
        | Statement::ForOf(_)
        | Statement::While(_)
        | Statement::DoWhile(_)
        | Statement::Switch(_) => {
            // 1. Let stmtResult be Completion(LoopEvaluation of
            // IterationStatement with argument labelSet).
            let stmt_result = breakable_evaluation(agent, statement, &label_set).await;
            // 2. If stmtResult is a break completion, then
            match stmt_result {
                // a. If stmtResult.[[Target]] is EMPTY, then
                // i. If stmtResult.[[Value]] is EMPTY, set stmtResult to
                // NormalCompletion(undefined).
                // ii. Else, set stmtResult to NormalCompletion(stmtResult.[[Value]]).
                Err(AbruptCompletion::Break { label: None, value }) => {
                    Ok(Some(value.unwrap_or(Value::Undefined)))
                }
                // 3. Return ? stmtResult.
                result => result,
            }
        }
        _ => evaluate(agent, statement).await,
    }
}

async fn breakable_evaluation(
    agent: &Agent,
    statement: &Statement,
    label_set: &[Atom],
) -> Completion {
    match statement {
        Statement::For(statement) => for_loop_evaluation(agent, statement, label_set).await,
        Statement::ForIn(statement) => {
            for_in_of_loop_evaluation(agent, statement, IterationKind::Enumerate, label_set).await
        }
        Statement::ForOf(statement) => {
            let kind = if statement.is_await {
                IterationKind::AsyncIterate
            } else {
                IterationKind::Iterate
            };
            for_in_of_loop_evaluation(agent, statement, kind, label_set).await
        }
        Statement::While(statement) => while_loop_evaluation(agent, statement, label_set).await,
        Statement::DoWhile(statement) => {
            do_while_loop_evaluation(agent, statement, label_set).await
        }
        Statement::Switch(statement) => switch_evaluation(agent, statement).await,
        _ => evaluate(agent, statement).await,
    }
}

/// Runtime Semantics: Evaluation of statements that are neither labelled
/// nor breakable.
async fn evaluate(agent: &Agent, statement: &Statement) -> Completion {
    match statement {
        // EmptyStatement : ;
        // 1. Return EMPTY.
        Statement::Empty => Ok(None),
        // DebuggerStatement : debugger ;
        Statement::Debugger => {
            // 1. If an implementation-defined debugging facility is available
            // and enabled, then
            // a. Perform an implementation-defined debugging action.
            agent.host_hooks().on_debugger_statement(agent);
            // 2. Return EMPTY.
            Ok(None)
        }
        // ExpressionStatement : Expression ;
        Statement::Expression(expression) => {
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Return ? GetValue(exprRef).
            Ok(Some(evaluate_expression(agent, expression).await?))
        }
        Statement::VariableDeclaration(declaration) => {
            evaluate_variable_declaration(agent, declaration).await?;
            Ok(None)
        }
        // HoistableDeclaration : FunctionDeclaration
        // 1. Return EMPTY.
        Statement::FunctionDeclaration(_) => Ok(None),
        Statement::ClassDeclaration(node) => {
            binding_class_declaration_evaluation(agent, node).await?;
            // 2. Return EMPTY.
            Ok(None)
        }
        Statement::Block(block) => evaluate_block(agent, block).await,
        Statement::If(statement) => {
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Let exprValue be ToBoolean(? GetValue(exprRef)).
            let expr_value = to_boolean(agent, evaluate_expression(agent, &statement.test).await?);
            let stmt_completion = if expr_value {
                // 3. If exprValue is true, then
                // a. Let stmtCompletion be Completion(Evaluation of the first
                // Statement).
                evaluate_statement(agent, &statement.consequent).await
            } else if let Some(alternate) = &statement.alternate {
                // 4. Else,
                // a. Let stmtCompletion be Completion(Evaluation of the second
                // Statement).
                evaluate_statement(agent, alternate).await
            } else {
                // 3. If exprValue is false, then
                // a. Return undefined.
                return Ok(Some(Value::Undefined));
            };
            // 5. Return ? UpdateEmpty(stmtCompletion, undefined).
            update_empty(stmt_completion, Value::Undefined)
        }
        // ContinueStatement : continue LabelIdentifier ;
        // 1. Let label be the StringValue of LabelIdentifier.
        // 2. Return Completion Record { [[Type]]: CONTINUE, [[Value]]: EMPTY,
        // [[Target]]: label }.
        Statement::Continue(label) => Err(AbruptCompletion::Continue {
            label: label.clone(),
            value: None,
        }),
        // BreakStatement : break LabelIdentifier ;
        Statement::Break(label) => Err(AbruptCompletion::Break {
            label: label.clone(),
            value: None,
        }),
        Statement::Return(argument) => {
            let value = match argument {
                // ReturnStatement : return ;
                // 1. Return Completion Record { [[Type]]: RETURN, [[Value]]:
                // undefined, [[Target]]: EMPTY }.
                None => Value::Undefined,
                // ReturnStatement : return Expression ;
                Some(argument) => {
                    // 1. Let exprRef be ? Evaluation of Expression.
                    // 2. Let exprValue be ? GetValue(exprRef).
                    let expr_value = evaluate_expression(agent, argument).await?;
                    // 3. If GetGeneratorKind() is ASYNC, set exprValue to ?
                    // Await(exprValue).
                    if in_async_generator(agent) {
                        await_value(agent, expr_value).await?
                    } else {
                        expr_value
                    }
                }
            };
            // 4. Return Completion Record { [[Type]]: RETURN, [[Value]]:
            // exprValue, [[Target]]: EMPTY }.
            Err(AbruptCompletion::Return(value))
        }
        Statement::With(statement) => evaluate_with(agent, statement).await,
        // ThrowStatement : throw Expression ;
        Statement::Throw(expression) => {
            // 1. Let exprRef be ? Evaluation of Expression.
            // 2. Let exprValue be ? GetValue(exprRef).
            let expr_value = evaluate_expression(agent, expression).await?;
            // 3. Return ThrowCompletion(exprValue).
            Err(AbruptCompletion::Throw(JsError::Throw(expr_value)))
        }
        Statement::Try(statement) => evaluate_try(agent, statement).await,
        // ImportDeclaration : import ImportClause FromClause ;
        // 1. Return EMPTY.
        Statement::Import(_) => Ok(None),
        Statement::Export(export) => {
            evaluate_export(agent, export).await?;
            Ok(None)
        }
        Statement::Labeled(_)
        | Statement::For(_)
        | Statement::ForIn(_)
        | Statement::ForOf(_)
        | Statement::While(_)
        | Statement::DoWhile(_)
        | Statement::Switch(_) => labelled_evaluation_boxed(agent, statement).await,
    }
}

async fn labelled_evaluation_boxed(agent: &Agent, statement: &Statement) -> Completion {
    Box::pin(labelled_evaluation(agent, statement, Vec::new())).await
}

/// ### [14.3.1.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-let-and-const-declarations-runtime-semantics-evaluation)
/// and [14.3.2.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-variable-statement-runtime-semantics-evaluation)
pub(super) async fn evaluate_variable_declaration(
    agent: &Agent,
    declaration: &VariableDeclaration,
) -> Completion<()> {
    let is_var = declaration.kind == VariableKind::Var;
    for declarator in &declaration.declarations {
        match (&declarator.target, &declarator.init) {
            // VariableDeclaration : BindingIdentifier
            // 1. Return EMPTY.
            (BindingPattern::Identifier(_), None) if is_var => {}
            (BindingPattern::Identifier(identifier), init) => {
                // 1. Let bindingId be the StringValue of BindingIdentifier.
                // 2. Let lhs be ? ResolveBinding(bindingId).
                let binding_id = name_string(agent, &identifier.name);
                let mut lhs = resolve_binding(agent, binding_id, None)?;
                let value = match init {
                    // 3. If IsAnonymousFunctionDefinition(Initializer) is true, then
                    // a. Let value be ? NamedEvaluation of Initializer with
                    // argument bindingId.
                    // 4. Else,
                    // a. Let rhs be ? Evaluation of Initializer.
                    // b. Let value be ? GetValue(rhs).
                    Some(init) => evaluate_initializer(agent, init, Some(identifier)).await?,
                    // LexicalBinding : BindingIdentifier
                    // 2. Perform ! InitializeReferencedBinding(lhs, undefined).
                    None => Value::Undefined,
                };
                if is_var {
                    // 5. Perform ? PutValue(lhs, value).
                    put_value(agent, &mut lhs, value)?;
                } else {
                    // 5. Perform ! InitializeReferencedBinding(lhs, value).
                    initialize_referenced_binding(agent, &lhs, value)?;
                }
            }
            // LexicalBinding : BindingPattern Initializer
            (pattern, Some(init)) => {
                // 1. Let rhs be ? Evaluation of Initializer.
                // 2. Let value be ? GetValue(rhs).
                let value = evaluate_expression(agent, init).await?;
                // 3. Let env be the running execution context's LexicalEnvironment.
                // 4. Return ? BindingInitialization of BindingPattern with
                // arguments value and env.
                let env = if is_var {
                    None
                } else {
                    Some(lexical_environment(agent)?)
                };
                binding_initialization(agent, pattern, value, env).await?;
            }
            (_, None) => {
                return Err(agent
                    .internal_error("destructuring declaration without an initializer")
                    .into());
            }
        }
    }
    // 3. Return EMPTY.
    Ok(())
}

/// ### [15.7.15 Runtime Semantics: BindingClassDeclarationEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-bindingclassdeclarationevaluation)
async fn binding_class_declaration_evaluation(
    agent: &Agent,
    node: &Rc<ClassNode>,
) -> Completion<()> {
    let (binding, class_name) = match &node.name {
        // ClassDeclaration : class BindingIdentifier ClassTail
        // 1. Let className be the StringValue of BindingIdentifier.
        Some(identifier) => {
            let name = name_string(agent, &identifier.name);
            (name, PropertyKey::from_string(agent, name))
        }
        // ClassDeclaration : class ClassTail
        // 1. Let value be ? ClassDefinitionEvaluation of ClassTail with
        // arguments undefined and "default".
        None => (
            name_string(agent, DEFAULT_EXPORT_BINDING),
            PropertyKey::from_str(agent, "default"),
        ),
    };
    let inner_binding = node.name.as_ref().map(|_| binding);
    // 2. Let value be ? ClassDefinitionEvaluation of ClassTail with arguments
    // className and className.
    let value = class_definition_evaluation(
        agent,
        node,
        inner_binding,
        ClassElementKey::Property(class_name),
    )
    .await?;
    // 4. Let env be the running execution context's LexicalEnvironment.
    // 5. Perform ? InitializeBoundName(className, value, env).
    initialize_bound_name(agent, binding, Value::Object(value))?;
    // 6. Return value.
    Ok(())
}

fn initialize_bound_name(agent: &Agent, name: HeapString, value: Value) -> Completion<()> {
    let env = lexical_environment(agent)?;
    env.initialize_binding(agent, name, value)?;
    Ok(())
}

/// ### [16.2.3.7 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-exports-runtime-semantics-evaluation)
async fn evaluate_export(agent: &Agent, export: &ExportDeclaration) -> Completion<()> {
    match export {
        // ExportDeclaration : export VariableStatement ;
        // ExportDeclaration : export Declaration
        // 1. Return ? Evaluation of Declaration.
        ExportDeclaration::Declaration(declaration) => {
            evaluate_statement(agent, declaration).await?;
        }
        // ExportDeclaration : export default HoistableDeclaration
        // 1. Return ? Evaluation of HoistableDeclaration.
        ExportDeclaration::Default(DefaultExport::Function(_)) => {}
        // ExportDeclaration : export default ClassDeclaration
        ExportDeclaration::Default(DefaultExport::Class(node)) => {
            // 1. Let value be ? BindingClassDeclarationEvaluation of ClassDeclaration.
            // 2. Let className be the sole element of the BoundNames of
            // ClassDeclaration.
            // 3. If className is "*default*", then
            // a. Let env be the running execution context's LexicalEnvironment.
            // b. Perform ? InitializeBoundName("*default*", value, env).
            binding_class_declaration_evaluation(agent, node).await?;
        }
        // ExportDeclaration : export default AssignmentExpression ;
        ExportDeclaration::Default(DefaultExport::Expression(expression)) => {
            let value = if expression.is_anonymous_function_definition() {
                // 1. If IsAnonymousFunctionDefinition(AssignmentExpression) is
                // true, then
                // a. Let value be ? NamedEvaluation of AssignmentExpression
                // with argument "default".
                let name = ClassElementKey::Property(PropertyKey::from_str(agent, "default"));
                named_evaluation(agent, expression, name).await?
            } else {
                // 2. Else,
                // a. Let rhs be ? Evaluation of AssignmentExpression.
                // b. Let value be ? GetValue(rhs).
                evaluate_expression(agent, expression).await?
            };
            // 3. Let env be the running execution context's LexicalEnvironment.
            // 4. Perform ? InitializeBoundName("*default*", value, env).
            let name = name_string(agent, DEFAULT_EXPORT_BINDING);
            initialize_bound_name(agent, name, value)?;
        }
        // ExportDeclaration : export ExportFromClause FromClause ;
        // ExportDeclaration : export NamedExports ;
        // 1. Return EMPTY.
        ExportDeclaration::Named { .. } | ExportDeclaration::All { .. } => {}
    }
    Ok(())
}

/// ### [14.2.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-block-runtime-semantics-evaluation)
async fn evaluate_block(agent: &Agent, block: &BlockStatement) -> Completion {
    // Block : { }
    // 1. Return EMPTY.
    if block.body.is_empty() {
        return Ok(None);
    }
    let declarations = lexically_scoped_declarations(&block.body);
    if declarations.is_empty() {
        // A block without declarations would get an empty environment.
        return evaluate_statement_list(agent, &block.body).await;
    }
    // Block : { StatementList }
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = lexical_environment(agent)?;
    // 2. Let blockEnv be NewDeclarativeEnvironment(oldEnv).
    let block_env = new_declarative_environment(agent, Some(old_env));
    // 3. Perform BlockDeclarationInstantiation(StatementList, blockEnv).
    block_declaration_instantiation(agent, &declarations, block_env)?;
    // 4. Set the running execution context's LexicalEnvironment to blockEnv.
    agent.set_lexical_environment(EnvironmentIndex::Declarative(block_env));
    // 5. Let blockValue be Completion(Evaluation of StatementList).
    let block_value = evaluate_statement_list(agent, &block.body).await;
    // 6. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_lexical_environment(old_env);
    // 7. Return ? blockValue.
    block_value
}

/// ### [14.7.2.2 Runtime Semantics: DoWhileLoopEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-dowhileloopevaluation)
async fn do_while_loop_evaluation(
    agent: &Agent,
    statement: &WhileStatement,
    label_set: &[Atom],
) -> Completion {
    // 1. Let V be undefined.
    let mut v = Value::Undefined;
    // 2. Repeat,
    loop {
        // a. Let stmtResult be Completion(Evaluation of Statement).
        let stmt_result = evaluate_statement(agent, &statement.body).await;
        // b. If LoopContinues(stmtResult, labelSet) is false, return ?
        // UpdateEmpty(stmtResult, V).
        if !loop_continues(&stmt_result, label_set) {
            return update_empty(stmt_result, v);
        }
        // c. If stmtResult.[[Value]] is not EMPTY, set V to stmtResult.[[Value]].
        if let Some(value) = completion_value(&stmt_result) {
            v = value;
        }
        // d. Let exprRef be ? Evaluation of Expression.
        // e. Let exprValue be ? GetValue(exprRef).
        // f. If ToBoolean(exprValue) is false, return V.
        if !to_boolean(agent, evaluate_expression(agent, &statement.test).await?) {
            return Ok(Some(v));
        }
    }
}

/// ### [14.7.3.2 Runtime Semantics: WhileLoopEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-whileloopevaluation)
async fn while_loop_evaluation(
    agent: &Agent,
    statement: &WhileStatement,
    label_set: &[Atom],
) -> Completion {
    // 1. Let V be undefined.
    let mut v = Value::Undefined;
    // 2. Repeat,
    loop {
        // a. Let exprRef be ? Evaluation of Expression.
        // b. Let exprValue be ? GetValue(exprRef).
        // c. If ToBoolean(exprValue) is false, return V.
        if !to_boolean(agent, evaluate_expression(agent, &statement.test).await?) {
            return Ok(Some(v));
        }
        // d. Let stmtResult be Completion(Evaluation of Statement).
        let stmt_result = evaluate_statement(agent, &statement.body).await;
        // e. If LoopContinues(stmtResult, labelSet) is false, return ?
        // UpdateEmpty(stmtResult, V).
        if !loop_continues(&stmt_result, label_set) {
            return update_empty(stmt_result, v);
        }
        // f. If stmtResult.[[Value]] is not EMPTY, set V to stmtResult.[[Value]].
        if let Some(value) = completion_value(&stmt_result) {
            v = value;
        }
    }
}

/// ### [14.7.4.2 Runtime Semantics: ForLoopEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-forloopevaluation)
async fn for_loop_evaluation(
    agent: &Agent,
    statement: &ForStatement,
    label_set: &[Atom],
) -> Completion {
    match &statement.init {
        // ForStatement : for ( LexicalDeclaration Expression ; Expression ) Statement
        Some(ForInit::Variable(declaration)) if declaration.kind.is_lexical() => {
            // 1. Let oldEnv be the running execution context's LexicalEnvironment.
            let old_env = lexical_environment(agent)?;
            // 2. Let loopEnv be NewDeclarativeEnvironment(oldEnv).
            let loop_env = new_declarative_environment(agent, Some(old_env));
            // 3. Let isConst be IsConstantDeclaration of LexicalDeclaration.
            let is_const = declaration.kind == VariableKind::Const;
            // 4. Let boundNames be the BoundNames of LexicalDeclaration.
            let mut bound_names = Vec::new();
            for declarator in &declaration.declarations {
                declarator.target.bound_names(&mut |identifier| {
                    bound_names.push(name_string(agent, &identifier.name))
                });
            }
            // 5. For each element dn of boundNames, do
            for &name in &bound_names {
                if is_const {
                    // a. If isConst is true, then
                    // i. Perform ! loopEnv.CreateImmutableBinding(dn, true).
                    loop_env.create_immutable_binding(agent, name, true);
                } else {
                    // b. Else,
                    // i. Perform ! loopEnv.CreateMutableBinding(dn, false).
                    loop_env.create_mutable_binding(agent, name, false);
                }
            }
            // 6. Set the running execution context's LexicalEnvironment to loopEnv.
            agent.set_lexical_environment(EnvironmentIndex::Declarative(loop_env));
            // 7. Let forDcl be Completion(Evaluation of LexicalDeclaration).
            let for_dcl = evaluate_variable_declaration(agent, declaration).await;
            // 8. If forDcl is an abrupt completion, then
            if let Err(error) = for_dcl {
                // a. Set the running execution context's LexicalEnvironment to oldEnv.
                agent.set_lexical_environment(old_env);
                // b. Return ? forDcl.
                return Err(error);
            }
            // 9. If isConst is false, let perIterationLets be boundNames;
            // otherwise let perIterationLets be a new empty List.
            let per_iteration_lets = if is_const { Vec::new() } else { bound_names };
            // 10-11. Let bodyResult be Completion(ForBodyEvaluation(the first
            // Expression, the second Expression, Statement, perIterationLets,
            // labelSet)).
            let body_result =
                for_body_evaluation(agent, statement, &per_iteration_lets, label_set).await;
            // 12. Set the running execution context's LexicalEnvironment to oldEnv.
            agent.set_lexical_environment(old_env);
            // 13. Return ? bodyResult.
            body_result
        }
        // ForStatement : for ( var VariableDeclarationList ; Expression ; Expression ) Statement
        Some(ForInit::Variable(declaration)) => {
            // 1. Perform ? Evaluation of VariableDeclarationList.
            evaluate_variable_declaration(agent, declaration).await?;
            // 2. Return ? ForBodyEvaluation(the first Expression, the second
            // Expression, Statement, « », labelSet).
            for_body_evaluation(agent, statement, &[], label_set).await
        }
        // ForStatement : for ( Expression ; Expression ; Expression ) Statement
        Some(ForInit::Expression(init)) => {
            // 1. If the first Expression is present, then
            // a. Let exprRef be ? Evaluation of the first Expression.
            // b. Perform ? GetValue(exprRef).
            evaluate_expression(agent, init).await?;
            for_body_evaluation(agent, statement, &[], label_set).await
        }
        None => for_body_evaluation(agent, statement, &[], label_set).await,
    }
}

/// ### [14.7.4.3 ForBodyEvaluation ( test, increment, stmt, perIterationBindings, labelSet )](https://tc39.es/ecma262/#sec-forbodyevaluation)
async fn for_body_evaluation(
    agent: &Agent,
    statement: &ForStatement,
    per_iteration_bindings: &[HeapString],
    label_set: &[Atom],
) -> Completion {
    // 1. Let V be undefined.
    let mut v = Value::Undefined;
    // 2. Perform ? CreatePerIterationEnvironment(perIterationBindings).
    create_per_iteration_environment(agent, per_iteration_bindings)?;
    // 3. Repeat,
    loop {
        // a. If test is not EMPTY, then
        if let Some(test) = &statement.test {
            // i. Let testRef be ? Evaluation of test.
            // ii. Let testValue be ? GetValue(testRef).
            // iii. If ToBoolean(testValue) is false, return V.
            if !to_boolean(agent, evaluate_expression(agent, test).await?) {
                return Ok(Some(v));
            }
        }
        // b. Let result be Completion(Evaluation of stmt).
        let result = evaluate_statement(agent, &statement.body).await;
        // c. If LoopContinues(result, labelSet) is false, return ?
        // UpdateEmpty(result, V).
        if !loop_continues(&result, label_set) {
            return update_empty(result, v);
        }
        // d. If result.[[Value]] is not EMPTY, set V to result.[[Value]].
        if let Some(value) = completion_value(&result) {
            v = value;
        }
        // e. Perform ? CreatePerIterationEnvironment(perIterationBindings).
        create_per_iteration_environment(agent, per_iteration_bindings)?;
        // f. If increment is not EMPTY, then
        if let Some(update) = &statement.update {
            // i. Let incRef be ? Evaluation of increment.
            // ii. Perform ? GetValue(incRef).
            evaluate_expression(agent, update).await?;
        }
    }
}

/// ### [14.7.4.4 CreatePerIterationEnvironment ( perIterationBindings )](https://tc39.es/ecma262/#sec-createperiterationenvironment)
fn create_per_iteration_environment(
    agent: &Agent,
    per_iteration_bindings: &[HeapString],
) -> Completion<()> {
    // 1. If perIterationBindings has any elements, then
    if per_iteration_bindings.is_empty() {
        return Ok(());
    }
    // a. Let lastIterationEnv be the running execution context's LexicalEnvironment.
    let last_iteration_env = lexical_environment(agent)?;
    // b. Let outer be lastIterationEnv.[[OuterEnv]].
    let outer = last_iteration_env.get_outer_env(agent);
    // d. Let thisIterationEnv be NewDeclarativeEnvironment(outer).
    let this_iteration_env = new_declarative_environment(agent, outer);
    // e. For each element bn of perIterationBindings, do
    for &name in per_iteration_bindings {
        // i. Perform ! thisIterationEnv.CreateMutableBinding(bn, false).
        this_iteration_env.create_mutable_binding(agent, name, false);
        // ii. Let lastValue be ? lastIterationEnv.GetBindingValue(bn, true).
        let last_value = last_iteration_env.get_binding_value(agent, name, true)?;
        // iii. Perform ! thisIterationEnv.InitializeBinding(bn, lastValue).
        this_iteration_env.initialize_binding(agent, name, last_value);
    }
    // f. Set the running execution context's LexicalEnvironment to thisIterationEnv.
    agent.set_lexical_environment(EnvironmentIndex::Declarative(this_iteration_env));
    // 2. Return UNUSED.
    Ok(())
}

/// ### [14.11.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-with-statement-runtime-semantics-evaluation)
async fn evaluate_with(agent: &Agent, statement: &WithStatement) -> Completion {
    // 1. Let val be ? Evaluation of Expression.
    let val = evaluate_expression(agent, &statement.object).await?;
    // 2. Let obj be ? ToObject(? GetValue(val)).
    let obj = to_object(agent, val)?;
    // 3. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = lexical_environment(agent)?;
    // 4. Let newEnv be NewObjectEnvironment(obj, true, oldEnv).
    let new_env = new_object_environment(agent, obj, true, Some(old_env));
    // 5. Set the running execution context's LexicalEnvironment to newEnv.
    agent.set_lexical_environment(EnvironmentIndex::Object(new_env));
    // 6. Let C be Completion(Evaluation of Statement).
    let c = evaluate_statement(agent, &statement.body).await;
    // 7. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_lexical_environment(old_env);
    // 8. Return ? UpdateEmpty(C, undefined).
    update_empty(c, Value::Undefined)
}

/// ### [14.12.4 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-switch-statement-runtime-semantics-evaluation)
async fn switch_evaluation(agent: &Agent, statement: &SwitchStatement) -> Completion {
    // 1. Let exprRef be ? Evaluation of Expression.
    // 2. Let switchValue be ? GetValue(exprRef).
    let switch_value = evaluate_expression(agent, &statement.discriminant).await?;
    // 3. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = lexical_environment(agent)?;
    // 4. Let blockEnv be NewDeclarativeEnvironment(oldEnv).
    let block_env = new_declarative_environment(agent, Some(old_env));
    // 5. Perform BlockDeclarationInstantiation(CaseBlock, blockEnv).
    let declarations =
        lexically_scoped_declarations(statement.cases.iter().flat_map(|case| &case.consequent));
    block_declaration_instantiation(agent, &declarations, block_env)?;
    // 6. Set the running execution context's LexicalEnvironment to blockEnv.
    agent.set_lexical_environment(EnvironmentIndex::Declarative(block_env));
    // 7. Let R be Completion(CaseBlockEvaluation of CaseBlock with argument
    // switchValue).
    let r = case_block_evaluation(agent, statement, switch_value).await;
    // 8. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_lexical_environment(old_env);
    // 9. Return R.
    r
}

/// ### [14.12.2 Runtime Semantics: CaseBlockEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-caseblockevaluation)
///
/// Clauses before and after the default clause are tested in source
/// order; evaluation then falls through from the selected clause to the end
/// of the CaseBlock.
async fn case_block_evaluation(
    agent: &Agent,
    statement: &SwitchStatement,
    input: Value,
) -> Completion {
    // 1. Let V be undefined.
    let mut v = Value::Undefined;
    let mut selected = None;
    for (index, case) in statement.cases.iter().enumerate() {
        let Some(test) = &case.test else {
            continue;
        };
        // ### 14.12.3 CaseClauseIsSelected ( C, input )
        // 2. Let exprRef be ? Evaluation of the Expression of C.
        // 3. Let clauseSelector be ? GetValue(exprRef).
        let clause_selector = evaluate_expression(agent, test).await?;
        // 4. Return IsStrictlyEqual(input, clauseSelector).
        if is_strictly_equal(agent, input, clause_selector) {
            selected = Some(index);
            break;
        }
    }
    let selected = selected.or_else(|| statement.cases.iter().position(|case| case.test.is_none()));
    let Some(selected) = selected else {
        return Ok(Some(v));
    };
    for case in &statement.cases[selected..] {
        // a. Let R be Completion(Evaluation of C).
        let r = evaluate_statement_list(agent, &case.consequent).await;
        // b. If R.[[Value]] is not EMPTY, set V to R.[[Value]].
        // c. If R is an abrupt completion, return ? UpdateEmpty(R, V).
        match r {
            Ok(Some(value)) => v = value,
            Ok(None) => {}
            Err(_) => return update_empty(r, v),
        }
    }
    Ok(Some(v))
}

/// ### [14.15.3 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-try-statement-runtime-semantics-evaluation)
///
/// Internal engine errors are not catchable and skip `finally` blocks.
async fn evaluate_try(agent: &Agent, statement: &TryStatement) -> Completion {
    // 1. Let B be Completion(Evaluation of Block).
    let b = evaluate_block(agent, &statement.block).await;
    let c = match (&statement.handler, b) {
        // 2. If B is a throw completion, let C be Completion(CatchClauseEvaluation
        // of Catch with argument B.[[Value]]).
        (Some(handler), Err(AbruptCompletion::Throw(JsError::Throw(thrown)))) => {
            catch_clause_evaluation(agent, handler, thrown).await
        }
        // 3. Else, let C be B.
        (_, b) => b,
    };
    if matches!(&c, Err(completion) if completion.is_internal_error()) {
        return c;
    }
    let f = match &statement.finalizer {
        // 4. Let F be Completion(Evaluation of Finally).
        Some(finalizer) => match evaluate_block(agent, finalizer).await {
            // 5. If F is a normal completion, set F to C.
            Ok(_) => c,
            f => f,
        },
        None => c,
    };
    // 6. Return ? UpdateEmpty(F, undefined).
    update_empty(f, Value::Undefined)
}

/// ### [14.15.2 Runtime Semantics: CatchClauseEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-catchclauseevaluation)
async fn catch_clause_evaluation(
    agent: &Agent,
    handler: &CatchClause,
    thrown_value: Value,
) -> Completion {
    // Catch : catch Block
    // 1. Return ? Evaluation of Block.
    let Some(param) = &handler.param else {
        return evaluate_block(agent, &handler.body).await;
    };
    // Catch : catch ( CatchParameter ) Block
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = lexical_environment(agent)?;
    // 2. Let catchEnv be NewDeclarativeEnvironment(oldEnv).
    let catch_env = new_declarative_environment(agent, Some(old_env));
    // 3. For each element argName of the BoundNames of CatchParameter, do
    // a. Perform ! catchEnv.CreateMutableBinding(argName, false).
    param.bound_names(&mut |identifier| {
        catch_env.create_mutable_binding(agent, name_string(agent, &identifier.name), false);
    });
    // 4. Set the running execution context's LexicalEnvironment to catchEnv.
    let catch_env = EnvironmentIndex::Declarative(catch_env);
    agent.set_lexical_environment(catch_env);
    // 5. Let status be Completion(BindingInitialization of CatchParameter
    // with arguments thrownValue and catchEnv).
    let status = binding_initialization(agent, param, thrown_value, Some(catch_env)).await;
    // 6. If status is an abrupt completion, then
    if let Err(status) = status {
        // a. Set the running execution context's LexicalEnvironment to oldEnv.
        agent.set_lexical_environment(old_env);
        // b. Return ? status.
        return Err(status);
    }
    // 7. Let B be Completion(Evaluation of Block).
    let b = evaluate_block(agent, &handler.body).await;
    // 8. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_lexical_environment(old_env);
    // 9. Return ? B.
    b
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn loops_produce_the_last_body_value() {
        assert_eq!(run_to_string("let i = 0; while (i < 3) { i++; }"), "2");
        assert_eq!(run_to_string("let i = 0; do i += 2; while (i < 5)"), "6");
        assert_eq!(run_to_string("for (var i = 0; i < 0; i++) 1;"), "undefined");
    }

    #[test]
    fn let_in_for_heads_is_copied_per_iteration() {
        assert_eq!(
            run_to_string(
                "let fs = [];
                 for (let i = 0; i < 3; i++) fs.push(() => i);
                 fs.map(f => f()).join()"
            ),
            "0,1,2"
        );
        assert_eq!(
            run_to_string("try { for (const i = 0; i < 2; i++) {} } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn labelled_continue_skips_to_the_outer_loop() {
        assert_eq!(
            run_to_string(
                "let s = '';
                 outer: for (let i = 0; i < 3; i++) {
                     for (let j = 0; j < 3; j++) {
                         if (j === 1) continue outer;
                         s += i + '' + j + ' ';
                     }
                 }
                 s"
            ),
            "00 10 20 "
        );
    }

    #[test]
    fn switch_falls_through_and_honours_default_position() {
        assert_eq!(
            run_to_string(
                "function f(x) {
                     let r = '';
                     switch (x) {
                         case 1: r += 'one ';
                         default: r += 'default ';
                         case 2: r += 'two'; break;
                         case 3: r += 'three';
                     }
                     return r;
                 }
                 [f(1), f(2), f(3), f(4)].join('|')"
            ),
            "one default two|two|three|default two"
        );
        assert_eq!(run_to_string("switch (1) { case 1: 'a'; break; }"), "a");
    }

    #[test]
    fn try_catch_finally_completions() {
        assert_eq!(run_to_string("try { throw 1 } catch (e) { e + 1 }"), "2");
        assert_eq!(
            run_to_string("function f() { try { return 1 } finally { return 2 } } f()"),
            "2"
        );
        assert_eq!(
            run_to_string(
                "let log = [];
                 function f() { try { return 'body' } finally { log.push('finally') } }
                 f() + ':' + log.join()"
            ),
            "body:finally"
        );
        assert_eq!(
            run_to_string("try { throw { a: 1, b: 2 } } catch ({ a, b }) { a + b }"),
            "3"
        );
    }

    #[test]
    fn uncaught_throw_reports_the_value() {
        assert_eq!(run_to_string("throw 'boom'"), "Uncaught boom");
    }

    #[test]
    fn with_statements_resolve_through_the_object() {
        assert_eq!(
            run_to_string("var o = { x: 5 }; var x = 1; with (o) { x = x * 2; } o.x + x"),
            "11"
        );
    }

    #[test]
    fn class_declarations_are_in_tdz_before_evaluation() {
        assert_eq!(
            run_to_string("try { new C(); class C {} } catch (e) { e.name }"),
            "ReferenceError"
        );
    }
}
