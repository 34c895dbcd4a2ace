// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runtime semantics of ECMAScript syntax: Evaluation, LabelledEvaluation,
//! BindingInitialization and the declaration instantiation algorithms.
//!
//! Expressions evaluate to a [`Completion<Value>`] rather than a
//! [`JsResult`] so that a generator resumed with a return completion can
//! unwind through the expression that suspended it.

mod assignment;
mod class_definition_evaluation;
pub(crate) mod declaration_instantiation;
mod expressions;
mod for_in_of_statement;
pub(crate) mod function_definitions;
mod operators;
mod statements;
mod template_literals;

use specter_ast::ast::{Expression, Statement};

pub(crate) use class_definition_evaluation::class_definition_evaluation;
pub(crate) use expressions::named_evaluation;
pub(crate) use operators::apply_string_or_numeric_binary_operator;

use super::EvalFuture;
use crate::ecmascript::{
    execution::{
        Agent, ECMAScriptCodeEvaluationState, EnvironmentIndex, JsResult, PrivateEnvironment,
    },
    types::{Completion, CompletionValue, HeapString, Value},
};

/// ### Evaluation of an expression, followed by GetValue.
pub(crate) fn evaluate_expression<'a>(
    agent: &'a Agent,
    expression: &'a Expression,
) -> EvalFuture<'a, Completion<Value>> {
    Box::pin(expressions::evaluate(agent, expression))
}

/// ### Evaluation of a statement with an empty label set.
pub(crate) fn evaluate_statement<'a>(
    agent: &'a Agent,
    statement: &'a Statement,
) -> EvalFuture<'a, Completion> {
    Box::pin(statements::labelled_evaluation(agent, statement, Vec::new()))
}

/// ### [14.2.2 Runtime Semantics: Evaluation of StatementList](https://tc39.es/ecma262/#sec-block-runtime-semantics-evaluation)
pub(crate) async fn evaluate_statement_list(agent: &Agent, statements: &[Statement]) -> Completion {
    let mut value: CompletionValue = None;
    for statement in statements {
        // 1. Let sl be ? Evaluation of StatementList.
        // 2. Let s be Completion(Evaluation of StatementListItem).
        // 3. Return ? UpdateEmpty(s, sl).
        match evaluate_statement(agent, statement).await {
            Ok(Some(result)) => value = Some(result),
            Ok(None) => {}
            Err(completion) => return Err(completion.update_empty(value)),
        }
    }
    Ok(value)
}

/// ### [6.2.4.7 UpdateEmpty ( completionRecord, value )](https://tc39.es/ecma262/#sec-updateempty)
pub(crate) fn update_empty(completion: Completion, value: Value) -> Completion {
    match completion {
        Ok(None) => Ok(Some(value)),
        Ok(result) => Ok(result),
        Err(completion) => Err(completion.update_empty(Some(value))),
    }
}

fn code_state(agent: &Agent) -> JsResult<ECMAScriptCodeEvaluationState> {
    agent
        .running_execution_context()
        .ecmascript_code
        .ok_or_else(|| agent.internal_error("evaluating code without an ECMAScript code context"))
}

/// The LexicalEnvironment of the running execution context.
pub(crate) fn lexical_environment(agent: &Agent) -> JsResult<EnvironmentIndex> {
    code_state(agent).map(|state| state.lexical_environment)
}

/// The PrivateEnvironment of the running execution context.
pub(crate) fn private_environment(agent: &Agent) -> Option<PrivateEnvironment> {
    agent
        .running_execution_context()
        .ecmascript_code
        .and_then(|state| state.private_environment)
}

/// IsStrict of the code being evaluated.
pub(crate) fn is_strict(agent: &Agent) -> bool {
    agent.running_execution_context().is_strict_mode()
}

pub(crate) fn name_string(agent: &Agent, name: &str) -> HeapString {
    HeapString::from_str(agent, name)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use crate::ecmascript::{
        execution::{Agent, DefaultHostHooks, agent::Options},
    };

    /// Evaluate `source` as a sloppy script in a fresh realm and render the
    /// completion value, or the uncaught exception.
    pub(crate) fn run_to_string(source: &str) -> String {
        let source = source.to_owned();
        // The evaluator recurses deeply in debug builds.
        std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(move || {
                let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
                let realm = agent.create_realm();
                let script = specter_ast::parse_script(&source, false).unwrap();
                match realm.evaluate_script(&agent, script) {
                    Ok(value) => value.to_display_string(&agent),
                    Err(error) => error.to_display_string(&agent),
                }
            })
            .unwrap()
            .join()
            .unwrap()
    }

    /// Evaluate `setup`, drain the job queue, then evaluate `read` in the
    /// same realm and render its result.
    pub(crate) fn run_after_jobs(setup: &str, read: &str) -> String {
        let (setup, read) = (setup.to_owned(), read.to_owned());
        std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(move || {
                let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
                let realm = agent.create_realm();
                let setup = specter_ast::parse_script(&setup, false).unwrap();
                if let Err(error) = realm.evaluate_script(&agent, setup) {
                    return error.to_display_string(&agent);
                }
                let read = specter_ast::parse_script(&read, false).unwrap();
                match realm.evaluate_script(&agent, read) {
                    Ok(value) => value.to_display_string(&agent),
                    Err(error) => error.to_display_string(&agent),
                }
            })
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn statement_lists_keep_the_last_non_empty_value() {
        assert_eq!(run_to_string("1; var x = 2;"), "1");
        assert_eq!(run_to_string("3; if (true) {}"), "undefined");
    }

    #[test]
    fn directive_prologues_produce_completion_values() {
        assert_eq!(run_to_string("'use strict'"), "use strict");
        assert_eq!(run_to_string("eval(\"'a'; 'b'\")"), "b");
    }

    #[test]
    fn lone_surrogate_escapes_are_single_characters() {
        assert_eq!(
            run_to_string(
                "var s = 'x\\ud800'; [s.length, s === 'x\\ufffd', JSON.stringify('\\udc00y')].join()"
            ),
            "2,true,\"\u{fffd}y\""
        );
    }

    #[test]
    fn block_scoped_bindings_do_not_leak() {
        assert_eq!(
            run_to_string("let x = 1; { let x = 2; } x"),
            "1"
        );
        assert_eq!(
            run_to_string("try { { let y = 1; throw 0; } } catch (e) {} typeof y"),
            "undefined"
        );
    }

    #[test]
    fn labelled_breaks_complete_normally() {
        assert_eq!(
            run_to_string("outer: for (;;) { for (;;) { break outer; } } 'done'"),
            "done"
        );
        assert_eq!(run_to_string(";; a: { 1; break a; }"), "1");
    }
}
