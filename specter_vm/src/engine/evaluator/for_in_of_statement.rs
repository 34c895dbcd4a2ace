// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [14.7.5 The for-in, for-of, and for-await-of Statements](https://tc39.es/ecma262/#sec-for-in-and-for-of-statements)

use std::collections::VecDeque;

use ahash::AHashSet;
use specter_ast::ast::{Atom, ForBinding, ForInOfStatement, VariableKind};

use super::{
    assignment::{binding_initialization, destructuring_assignment_evaluation},
    evaluate_expression, evaluate_statement, lexical_environment, name_string, update_empty,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_iterator_objects::{
                IteratorKind, IteratorRecord, get_iterator, iterator_close, iterator_complete,
                iterator_value,
            },
            operations_on_objects::{call, get_method},
            type_conversion::to_object,
        },
        execution::{
            Agent, EnvironmentIndex, JsResult, agent::ExceptionType, new_declarative_environment,
        },
        types::{
            AbruptCompletion, Completion, InternalMethods, Object, PropertyKey, Value,
            loop_continues,
        },
    },
    engine::coroutine::await_value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum IterationKind {
    Enumerate,
    Iterate,
    AsyncIterate,
}

/// ### [14.7.5.10 For-In Iterator Objects](https://tc39.es/ecma262/#sec-for-in-iterator-objects)
///
/// The iterator of a for-in statement is never observable, so it is kept on
/// the Rust side instead of being an ECMAScript object.
struct ForInIterator {
    object: Option<Object>,
    object_was_visited: bool,
    visited_keys: AHashSet<PropertyKey>,
    remaining_keys: VecDeque<PropertyKey>,
}

impl ForInIterator {
    /// ### [14.7.5.9 EnumerateObjectProperties ( O )](https://tc39.es/ecma262/#sec-enumerate-object-properties)
    fn new(object: Object) -> Self {
        Self {
            object: Some(object),
            object_was_visited: false,
            visited_keys: AHashSet::default(),
            remaining_keys: VecDeque::new(),
        }
    }

    /// ### [14.7.5.10.2.1 %ForInIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%foriniteratorprototype%.next)
    fn next(&mut self, agent: &Agent) -> JsResult<Option<Value>> {
        // 4. Repeat,
        while let Some(object) = self.object {
            // a. If O.[[ObjectWasVisited]] is false, then
            if !self.object_was_visited {
                // i. Let keys be ? object.[[OwnPropertyKeys]]().
                // ii. For each element key of keys, do
                // 1. If key is a String, then
                // a. Append key to O.[[RemainingKeys]].
                self.remaining_keys = object
                    .internal_own_property_keys(agent)?
                    .into_iter()
                    .filter(|key| !key.is_symbol())
                    .collect();
                // iii. Set O.[[ObjectWasVisited]] to true.
                self.object_was_visited = true;
            }
            // b. Repeat, while O.[[RemainingKeys]] is not empty,
            while let Some(key) = self.remaining_keys.pop_front() {
                // ii. If there does not exist an element v of
                // O.[[VisitedKeys]] such that SameValue(r, v) is true, then
                if self.visited_keys.contains(&key) {
                    continue;
                }
                // 1. Let desc be ? object.[[GetOwnProperty]](r).
                // 2. If desc is not undefined, then
                if let Some(desc) = object.internal_get_own_property(agent, key)? {
                    // a. Append r to O.[[VisitedKeys]].
                    self.visited_keys.insert(key);
                    // b. If desc.[[Enumerable]] is true, return
                    // CreateIteratorResultObject(r, false).
                    if desc.enumerable == Some(true) {
                        return Ok(Some(key.into_value(agent)));
                    }
                }
            }
            // c. Set O.[[Object]] to ? object.[[GetPrototypeOf]]().
            self.object = object.internal_get_prototype_of(agent)?;
            // d. Set O.[[ObjectWasVisited]] to false.
            self.object_was_visited = false;
        }
        // e. If O.[[Object]] is null, return CreateIteratorResultObject(undefined, true).
        Ok(None)
    }
}

enum ForIterator {
    Enumerate(ForInIterator),
    Iterate(IteratorRecord, IteratorKind),
}

/// LeftHandSideExpression, ForBinding and ForDeclaration of a for-in/of head.
#[derive(Clone, Copy, PartialEq, Eq)]
enum LhsKind {
    Assignment,
    VarBinding,
    LexicalBinding,
}

/// ### [14.7.5.5 Runtime Semantics: ForInOfLoopEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-forinofloopevaluation)
pub(super) async fn for_in_of_loop_evaluation(
    agent: &Agent,
    statement: &ForInOfStatement,
    iteration_kind: IterationKind,
    label_set: &[Atom],
) -> Completion {
    let (lhs_kind, bound_names) = match &statement.left {
        ForBinding::Declaration(VariableKind::Var, _) => (LhsKind::VarBinding, Vec::new()),
        ForBinding::Declaration(_, pattern) => {
            let mut names = Vec::new();
            pattern.bound_names(&mut |identifier| names.push(identifier.name.clone()));
            (LhsKind::LexicalBinding, names)
        }
        ForBinding::Target(_) => (LhsKind::Assignment, Vec::new()),
    };
    // 1. Let keyResult be ? ForIn/OfHeadEvaluation(BoundNames of
    // ForDeclaration, Expression, iterationKind).
    let Some(iterator) = for_in_of_head_evaluation(
        agent,
        &bound_names,
        &statement.right,
        iteration_kind,
    )
    .await?
    else {
        // A for-in over undefined or null completes with break, which the
        // enclosing LabelledEvaluation turns into a normal completion.
        return Err(AbruptCompletion::Break {
            label: None,
            value: None,
        });
    };
    // 2. Return ? ForIn/OfBodyEvaluation(ForDeclaration, Statement,
    // keyResult, iterationKind, lhsKind, labelSet).
    for_in_of_body_evaluation(agent, statement, iterator, lhs_kind, label_set).await
}

/// ### [14.7.5.6 ForIn/OfHeadEvaluation ( uninitializedBoundNames, expr, iterationKind )](https://tc39.es/ecma262/#sec-runtime-semantics-forinofheadevaluation)
///
/// Returns `None` where the head completes with a break.
async fn for_in_of_head_evaluation(
    agent: &Agent,
    uninitialized_bound_names: &[Atom],
    expr: &specter_ast::ast::Expression,
    iteration_kind: IterationKind,
) -> Completion<Option<ForIterator>> {
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = lexical_environment(agent)?;
    // 2. If uninitializedBoundNames is not empty, then
    if !uninitialized_bound_names.is_empty() {
        // b. Let newEnv be NewDeclarativeEnvironment(oldEnv).
        let new_env = new_declarative_environment(agent, Some(old_env));
        // c. For each String name of uninitializedBoundNames, do
        for name in uninitialized_bound_names {
            // i. Perform ! newEnv.CreateMutableBinding(name, false).
            new_env.create_mutable_binding(agent, name_string(agent, name), false);
        }
        // d. Set the running execution context's LexicalEnvironment to newEnv.
        agent.set_lexical_environment(EnvironmentIndex::Declarative(new_env));
    }
    // 3. Let exprRef be Completion(Evaluation of expr).
    let expr_value = evaluate_expression(agent, expr).await;
    // 4. Set the running execution context's LexicalEnvironment to oldEnv.
    agent.set_lexical_environment(old_env);
    // 5. Let exprValue be ? GetValue(? exprRef).
    let expr_value = expr_value?;
    match iteration_kind {
        // 6. If iterationKind is ENUMERATE, then
        IterationKind::Enumerate => {
            // a. If exprValue is either undefined or null, then
            if expr_value.is_nullish() {
                // i. Return Completion Record { [[Type]]: BREAK, [[Value]]:
                // EMPTY, [[Target]]: EMPTY }.
                return Ok(None);
            }
            // b. Let obj be ! ToObject(exprValue).
            let obj = to_object(agent, expr_value)?;
            // c. Let iterator be EnumerateObjectProperties(obj).
            // d. Let nextMethod be ! GetV(iterator, "next").
            // e. Return the Iterator Record { [[Iterator]]: iterator,
            // [[NextMethod]]: nextMethod, [[Done]]: false }.
            Ok(Some(ForIterator::Enumerate(ForInIterator::new(obj))))
        }
        // 7. Else,
        IterationKind::Iterate | IterationKind::AsyncIterate => {
            // b. If iterationKind is ASYNC-ITERATE, let iteratorKind be ASYNC.
            // c. Else, let iteratorKind be SYNC.
            let iterator_kind = if iteration_kind == IterationKind::AsyncIterate {
                IteratorKind::Async
            } else {
                IteratorKind::Sync
            };
            // d. Return ? GetIterator(exprValue, iteratorKind).
            let record = get_iterator(agent, expr_value, iterator_kind)?;
            Ok(Some(ForIterator::Iterate(record, iterator_kind)))
        }
    }
}

/// Take the next value of the loop's iterator, or `None` when it is done.
async fn next_value(agent: &Agent, iterator: &mut ForIterator) -> JsResult<Option<Value>> {
    match iterator {
        ForIterator::Enumerate(iterator) => iterator.next(agent),
        ForIterator::Iterate(record, kind) => {
            // a. Let nextResult be ? Call(iteratorRecord.[[NextMethod]],
            // iteratorRecord.[[Iterator]]).
            let mut next_result =
                call(agent, record.next_method, Value::Object(record.iterator), &[])?;
            // b. If iteratorKind is ASYNC, set nextResult to ? Await(nextResult).
            if *kind == IteratorKind::Async {
                next_result = await_value(agent, next_result).await?;
            }
            // c. If nextResult is not an Object, throw a TypeError exception.
            let Value::Object(next_result) = next_result else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "iterator result is not an object",
                ));
            };
            // d. Let done be ? IteratorComplete(nextResult).
            // e. If done is true, return V.
            if iterator_complete(agent, next_result)? {
                record.done = true;
                return Ok(None);
            }
            // f. Let nextValue be ? IteratorValue(nextResult).
            Ok(Some(iterator_value(agent, next_result)?))
        }
    }
}

/// IteratorClose or AsyncIteratorClose of the loop's iterator, keeping
/// `completion` unless closing throws.
async fn close_for_iterator(
    agent: &Agent,
    iterator: &ForIterator,
    completion: Completion,
) -> Completion {
    let ForIterator::Iterate(record, kind) = iterator else {
        // i. If iterationKind is ENUMERATE, then
        // 1. Return ? status.
        return completion;
    };
    if matches!(&completion, Err(completion) if completion.is_internal_error()) {
        return completion;
    }
    let closing = match &completion {
        Err(AbruptCompletion::Throw(error)) => Err(error.clone()),
        _ => Ok(()),
    };
    if *kind == IteratorKind::Async {
        // 1. If iteratorKind is ASYNC, return ? AsyncIteratorClose(iteratorRecord, status).
        async_iterator_close(agent, record, closing).await?;
    } else {
        // 2. Return ? IteratorClose(iteratorRecord, status).
        iterator_close(agent, record.iterator, closing)?;
    }
    completion
}

/// ### [14.7.5.7 ForIn/OfBodyEvaluation ( lhs, stmt, iteratorRecord, iterationKind, lhsKind, labelSet \[ , iteratorKind \] )](https://tc39.es/ecma262/#sec-runtime-semantics-forin-div-ofbodyevaluation-lhs-stmt-iterator-lhskind-labelset)
async fn for_in_of_body_evaluation(
    agent: &Agent,
    statement: &ForInOfStatement,
    mut iterator: ForIterator,
    lhs_kind: LhsKind,
    label_set: &[Atom],
) -> Completion {
    // 2. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = lexical_environment(agent)?;
    // 3. Let V be undefined.
    let mut v = Value::Undefined;
    // 6. Repeat,
    loop {
        let Some(next_value) = next_value(agent, &mut iterator).await? else {
            return Ok(Some(v));
        };
        // g. If lhsKind is either ASSIGNMENT or VAR-BINDING, then
        // h. Else,
        let status: Completion<()> = match (&statement.left, lhs_kind) {
            (ForBinding::Target(target), _) => {
                // i. If destructuring is true, then
                // 1. If lhsKind is ASSIGNMENT, then
                // a. Let status be Completion(DestructuringAssignmentEvaluation
                // of assignmentPattern with argument nextValue).
                // ii. Else,
                // 1. Let lhsRef be Completion(Evaluation of lhs).
                // 3. Else, let status be Completion(PutValue(lhsRef.[[Value]],
                // nextValue)).
                destructuring_assignment_evaluation(agent, target, next_value).await
            }
            (ForBinding::Declaration(_, pattern), LhsKind::VarBinding) => {
                // 2. Else,
                // a. Assert: lhsKind is VAR-BINDING.
                // c. Let status be Completion(ForBindingBindingInitialization
                // with arguments nextValue and undefined).
                binding_initialization(agent, pattern, next_value, None).await
            }
            (ForBinding::Declaration(kind, pattern), _) => {
                // ii. Let iterationEnv be NewDeclarativeEnvironment(oldEnv).
                let iteration_env = new_declarative_environment(agent, Some(old_env));
                // iii. Perform ForDeclarationBindingInstantiation of lhs with
                // argument iterationEnv.
                pattern.bound_names(&mut |identifier| {
                    let name = name_string(agent, &identifier.name);
                    if *kind == VariableKind::Const {
                        iteration_env.create_immutable_binding(agent, name, true);
                    } else {
                        iteration_env.create_mutable_binding(agent, name, false);
                    }
                });
                // iv. Set the running execution context's LexicalEnvironment to
                // iterationEnv.
                let iteration_env = EnvironmentIndex::Declarative(iteration_env);
                agent.set_lexical_environment(iteration_env);
                // v. If destructuring is true, then
                // 1. Let status be Completion(ForDeclarationBindingInitialization
                // of lhs with arguments nextValue and iterationEnv).
                // vi. Else,
                // 3. Let status be Completion(InitializeReferencedBinding(lhsRef,
                // nextValue)).
                binding_initialization(agent, pattern, next_value, Some(iteration_env)).await
            }
        };
        // i. If status is an abrupt completion, then
        if let Err(status) = status {
            // i. Set the running execution context's LexicalEnvironment to oldEnv.
            agent.set_lexical_environment(old_env);
            return close_for_iterator(agent, &iterator, Err(status)).await;
        }
        // j. Let result be Completion(Evaluation of stmt).
        let result = evaluate_statement(agent, &statement.body).await;
        // k. Set the running execution context's LexicalEnvironment to oldEnv.
        agent.set_lexical_environment(old_env);
        // l. If LoopContinues(result, labelSet) is false, then
        if !loop_continues(&result, label_set) {
            // ii. Set status to Completion(UpdateEmpty(result, V)).
            let status = update_empty(result, v);
            // i. If iterationKind is ENUMERATE, then
            // 1. Return ? UpdateEmpty(result, V).
            // iii. If iteratorKind is ASYNC, return ? AsyncIteratorClose(iteratorRecord, status).
            // iv. Return ? IteratorClose(iteratorRecord, status).
            return close_for_iterator(agent, &iterator, status).await;
        }
        // m. If result.[[Value]] is not EMPTY, set V to result.[[Value]].
        if let Some(value) = completion_value(&result) {
            v = value;
        }
    }
}

/// The \[\[Value\]\] of a completion that loop_continues accepted.
pub(super) fn completion_value(completion: &Completion) -> Option<Value> {
    match completion {
        Ok(value) => *value,
        Err(AbruptCompletion::Continue { value, .. }) => *value,
        Err(_) => None,
    }
}

/// ### [7.4.13 AsyncIteratorClose ( iteratorRecord, completion )](https://tc39.es/ecma262/#sec-asynciteratorclose)
pub(super) async fn async_iterator_close(
    agent: &Agent,
    iterator_record: &IteratorRecord,
    completion: JsResult<()>,
) -> JsResult<()> {
    // 1. Assert: iteratorRecord.[[Iterator]] is an Object.
    // 2. Let iterator be iteratorRecord.[[Iterator]].
    let iterator = iterator_record.iterator;
    // 3. Let innerResult be Completion(GetMethod(iterator, "return")).
    let return_key = PropertyKey::from_str(agent, "return");
    let inner_result = match get_method(agent, Value::Object(iterator), return_key) {
        // 4. If innerResult is a normal completion, then
        Ok(Some(return_method)) => {
            // c. Set innerResult to Completion(Call(return, iterator)).
            match call(agent, Value::Object(return_method), Value::Object(iterator), &[]) {
                // d. If innerResult is a normal completion, set innerResult to
                // Completion(Await(innerResult.[[Value]])).
                Ok(value) => await_value(agent, value).await,
                Err(error) => Err(error),
            }
        }
        // b. If return is undefined, return ? completion.
        Ok(None) => return completion,
        Err(error) => Err(error),
    };
    // 5. If completion is a throw completion, return ? completion.
    completion?;
    // 6. If innerResult is a throw completion, return ? innerResult.
    // 7. If innerResult.[[Value]] is not an Object, throw a TypeError exception.
    if !inner_result?.is_object() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "iterator return() result is not an object",
        ));
    }
    // 8. Return ? completion.
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn for_in_visits_enumerable_keys_along_the_prototype_chain() {
        assert_eq!(
            run_to_string(
                "let proto = { inherited: 1, shadowed: 2 };
                 let o = Object.create(proto);
                 o.own = 3;
                 Object.defineProperty(o, 'shadowed', { value: 4, enumerable: false });
                 let keys = [];
                 for (let k in o) keys.push(k);
                 keys.join()"
            ),
            "own,inherited"
        );
        assert_eq!(run_to_string("for (var k in null) {} typeof k"), "undefined");
        assert_eq!(
            run_to_string("let s = ''; for (var i in [7, 8]) s += i; s"),
            "01"
        );
    }

    #[test]
    fn for_of_binds_a_fresh_binding_per_iteration() {
        assert_eq!(
            run_to_string(
                "let fs = [];
                 for (const x of [1, 2, 3]) fs.push(() => x);
                 fs.map(f => f()).join()"
            ),
            "1,2,3"
        );
    }

    #[test]
    fn for_of_destructures_and_assigns() {
        assert_eq!(
            run_to_string(
                "let o = {}; let sum = 0;
                 for ([o.a, o.b] of [[1, 2], [3, 4]]) sum += o.a * o.b;
                 for (var { length } of ['abc']) {}
                 sum + length"
            ),
            "17"
        );
    }

    #[test]
    fn breaking_out_of_for_of_closes_the_iterator() {
        assert_eq!(
            run_to_string(
                "let closed = false;
                 let iterable = { [Symbol.iterator]() {
                     let i = 0;
                     return {
                         next() { return { value: i++, done: false }; },
                         return() { closed = true; return {}; }
                     };
                 } };
                 for (let v of iterable) { if (v === 2) break; }
                 closed"
            ),
            "true"
        );
    }

    #[test]
    fn for_of_completion_value_is_the_last_body_value() {
        assert_eq!(run_to_string("for (let x of [1, 2]) x * 10;"), "20");
        assert_eq!(run_to_string("for (let x of []) x;"), "undefined");
    }
}
