// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use super::{
    PromiseData,
    promise_abstract_operations::{
        PromiseCapability, as_callable, create_resolving_functions, if_abrupt_reject_promise,
        new_promise_capability, promise_resolve,
    },
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{
            IteratorKind, IteratorRecord, get_iterator, iterator_close, iterator_step_value,
        },
        operations_on_objects::{
            call_function, create_array_from_list, create_data_property_or_throw,
            create_non_enumerable_data_property_or_throw, get, invoke,
        },
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor,
        builtin_function::create_anonymous_builtin_function,
        fundamental_objects::error_objects::create_error_object,
        ordinary::{ordinary_create_from_constructor, ordinary_object_create},
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsError, JsResult, ProtoIntrinsics, Realm,
        agent::ExceptionType,
    },
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

pub(crate) struct PromiseConstructor;

impl Builtin for PromiseConstructor {
    const NAME: &'static str = "Promise";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(PromiseConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for PromiseConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Promise;
}

struct PromiseAll;
impl Builtin for PromiseAll {
    const NAME: &'static str = "all";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::all);
}

struct PromiseAllSettled;
impl Builtin for PromiseAllSettled {
    const NAME: &'static str = "allSettled";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::all_settled);
}

struct PromiseAny;
impl Builtin for PromiseAny {
    const NAME: &'static str = "any";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::any);
}

struct PromiseRace;
impl Builtin for PromiseRace {
    const NAME: &'static str = "race";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::race);
}

struct PromiseReject;
impl Builtin for PromiseReject {
    const NAME: &'static str = "reject";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::reject);
}

struct PromiseResolve;
impl Builtin for PromiseResolve {
    const NAME: &'static str = "resolve";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::resolve);
}

struct PromiseWithResolvers;
impl Builtin for PromiseWithResolvers {
    const NAME: &'static str = "withResolvers";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::with_resolvers);
}

struct PromiseGetSpecies;
impl Builtin for PromiseGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::get_species);
}
impl BuiltinGetter for PromiseGetSpecies {}

/// The combinators of 27.2.4. They share the iteration of the input and
/// differ in the reactions attached to every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromiseCombinator {
    All,
    AllSettled,
    Any,
    Race,
}

/// The state shared by the element functions of one combinator call.
struct PromiseGroup {
    capability: PromiseCapability,
    combinator: PromiseCombinator,
    /// ### valuesList / errors
    values: RefCell<Vec<Value>>,
    /// ### remainingElementsCount
    remaining: Cell<usize>,
}

impl PromiseGroup {
    /// Decrement the remaining element count and settle the combined
    /// promise once it reaches zero.
    fn element_done(&self, agent: &Agent) -> JsResult<()> {
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        if remaining > 0 {
            return Ok(());
        }
        let values = self.values.borrow().clone();
        let values = create_array_from_list(agent, &values);
        match self.combinator {
            PromiseCombinator::Any => {
                // 1. Let error be a newly created AggregateError object.
                let error = create_error_object(
                    agent,
                    ExceptionType::AggregateError,
                    "All promises were rejected",
                );
                // 2. Perform ! DefinePropertyOrThrow(error, "errors",
                // PropertyDescriptor { [[Configurable]]: true, [[Enumerable]]:
                // false, [[Writable]]: true, [[Value]]: CreateArrayFromList(errors) }).
                let key = PropertyKey::from_str(agent, "errors");
                create_non_enumerable_data_property_or_throw(
                    agent,
                    error,
                    key,
                    Value::Object(values),
                )?;
                // 3. Return ThrowCompletion(error).
                self.capability.reject(agent, Value::Object(error))
            }
            // Let valuesArray be CreateArrayFromList(values).
            // Perform ? Call(resultCapability.[[Resolve]], undefined,
            // « valuesArray »).
            _ => self.capability.resolve(agent, Value::Object(values)),
        }
    }

    /// Create an element function that records its argument at `index`.
    /// Functions sharing `already_called` run at most once between them.
    fn element_function(
        self: &Rc<Self>,
        agent: &Agent,
        index: usize,
        settled_status: Option<&'static str>,
        already_called: Rc<Cell<bool>>,
    ) -> Object {
        let group = self.clone();
        create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
            // 1. Let F be the active function object.
            // 2. If F.[[AlreadyCalled]] is true, return undefined.
            // 3. Set F.[[AlreadyCalled]] to true.
            if already_called.replace(true) {
                return Ok(Value::Undefined);
            }
            let x = arguments.get(0);
            let value = match settled_status {
                Some(status) => {
                    // 9. Let obj be OrdinaryObjectCreate(%Object.prototype%).
                    let obj =
                        ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
                    // 10. Perform ! CreateDataPropertyOrThrow(obj, "status", status).
                    let key = PropertyKey::from_str(agent, "status");
                    create_data_property_or_throw(agent, obj, key, Value::from_str(agent, status))?;
                    // 11. Perform ! CreateDataPropertyOrThrow(obj, "value" or
                    // "reason", x).
                    let key = if status == "fulfilled" { "value" } else { "reason" };
                    let key = PropertyKey::from_str(agent, key);
                    create_data_property_or_throw(agent, obj, key, x)?;
                    Value::Object(obj)
                }
                None => x,
            };
            // Set values[index] to x.
            if let Some(slot) = group.values.borrow_mut().get_mut(index) {
                *slot = value;
            }
            // Set remainingElementsCount.[[Value]] to
            // remainingElementsCount.[[Value]] - 1.
            group.element_done(agent)?;
            Ok(Value::Undefined)
        })
    }
}

impl PromiseConstructor {
    /// ### [27.2.3.1 Promise ( executor )](https://tc39.es/ecma262/#sec-promise-executor)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        let Some(new_target) = new_target else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Promise constructor cannot be invoked without 'new'",
            ));
        };
        // 2. If IsCallable(executor) is false, throw a TypeError exception.
        let executor = arguments.get(0);
        let Some(executor) = as_callable(agent, executor) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!(
                    "Promise resolver {} is not a function",
                    executor.to_display_string(agent)
                ),
            ));
        };
        // 3. Let promise be ? OrdinaryCreateFromConstructor(NewTarget,
        // "%Promise.prototype%", « [[PromiseState]], [[PromiseResult]],
        // [[PromiseFulfillReactions]], [[PromiseRejectReactions]],
        // [[PromiseIsHandled]] »).
        // 4. Set promise.[[PromiseState]] to PENDING.
        // 5. Set promise.[[PromiseFulfillReactions]] to a new empty List.
        // 6. Set promise.[[PromiseRejectReactions]] to a new empty List.
        // 7. Set promise.[[PromiseIsHandled]] to false.
        let promise = ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Promise,
            ObjectKind::Promise(Box::<PromiseData>::default()),
        )?;
        // 8. Let resolvingFunctions be CreateResolvingFunctions(promise).
        let (resolve, reject) = create_resolving_functions(agent, promise);
        // 9. Let completion be Completion(Call(executor, undefined,
        // « resolvingFunctions.[[Resolve]], resolvingFunctions.[[Reject]] »)).
        let completion = call_function(
            agent,
            executor,
            Value::Undefined,
            &[Value::Object(resolve), Value::Object(reject)],
        );
        match completion {
            Ok(_) => {}
            // 10. If completion is an abrupt completion, then
            Err(JsError::Throw(error)) => {
                // a. Perform ? Call(resolvingFunctions.[[Reject]], undefined,
                // « completion.[[Value]] »).
                call_function(agent, reject, Value::Undefined, &[error])?;
            }
            Err(error) => return Err(error),
        }
        // 11. Return promise.
        Ok(Value::Object(promise))
    }

    /// ### [27.2.4.1 Promise.all ( iterable )](https://tc39.es/ecma262/#sec-promise.all)
    fn all(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        promise_combinator(agent, this_value, arguments.get(0), PromiseCombinator::All)
    }

    /// ### [27.2.4.2 Promise.allSettled ( iterable )](https://tc39.es/ecma262/#sec-promise.allsettled)
    fn all_settled(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        promise_combinator(agent, this_value, arguments.get(0), PromiseCombinator::AllSettled)
    }

    /// ### [27.2.4.3 Promise.any ( iterable )](https://tc39.es/ecma262/#sec-promise.any)
    fn any(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        promise_combinator(agent, this_value, arguments.get(0), PromiseCombinator::Any)
    }

    /// ### [27.2.4.5 Promise.race ( iterable )](https://tc39.es/ecma262/#sec-promise.race)
    fn race(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        promise_combinator(agent, this_value, arguments.get(0), PromiseCombinator::Race)
    }

    /// ### [27.2.4.6 Promise.reject ( r )](https://tc39.es/ecma262/#sec-promise.reject)
    fn reject(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let C be the this value.
        // 2. Let promiseCapability be ? NewPromiseCapability(C).
        let promise_capability = new_promise_capability(agent, this_value)?;
        // 3. Perform ? Call(promiseCapability.[[Reject]], undefined, « r »).
        promise_capability.reject(agent, arguments.get(0))?;
        // 4. Return promiseCapability.[[Promise]].
        Ok(Value::Object(promise_capability.promise()))
    }

    /// ### [27.2.4.7 Promise.resolve ( x )](https://tc39.es/ecma262/#sec-promise.resolve)
    fn resolve(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let C be the this value.
        // 2. If C is not an Object, throw a TypeError exception.
        let Value::Object(c) = this_value else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Promise.resolve called on non-object",
            ));
        };
        // 3. Return ? PromiseResolve(C, x).
        promise_resolve(agent, c, arguments.get(0)).map(Value::Object)
    }

    /// ### [27.2.4.8 Promise.withResolvers ( )](https://tc39.es/ecma262/#sec-promise.withResolvers)
    fn with_resolvers(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let C be the this value.
        // 2. Let promiseCapability be ? NewPromiseCapability(C).
        let promise_capability = new_promise_capability(agent, this_value)?;
        // 3. Let obj be OrdinaryObjectCreate(%Object.prototype%).
        let obj = ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
        // 4. Perform ! CreateDataPropertyOrThrow(obj, "promise",
        // promiseCapability.[[Promise]]).
        let key = PropertyKey::from_str(agent, "promise");
        create_data_property_or_throw(
            agent,
            obj,
            key,
            Value::Object(promise_capability.promise()),
        )?;
        // 5. Perform ! CreateDataPropertyOrThrow(obj, "resolve",
        // promiseCapability.[[Resolve]]).
        let key = PropertyKey::from_str(agent, "resolve");
        let resolve = promise_capability.resolve_function(agent);
        create_data_property_or_throw(agent, obj, key, Value::Object(resolve))?;
        // 6. Perform ! CreateDataPropertyOrThrow(obj, "reject",
        // promiseCapability.[[Reject]]).
        let key = PropertyKey::from_str(agent, "reject");
        let reject = promise_capability.reject_function(agent);
        create_data_property_or_throw(agent, obj, key, Value::Object(reject))?;
        // 7. Return obj.
        Ok(Value::Object(obj))
    }

    /// ### [27.2.4.9 get Promise \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-promise-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let promise_prototype = realm.intrinsics(agent).promise_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<PromiseConstructor>(agent, realm)
            .with_property_capacity(9)
            .with_builtin_function_property::<PromiseAll>()
            .with_builtin_function_property::<PromiseAllSettled>()
            .with_builtin_function_property::<PromiseAny>()
            .with_prototype_property(promise_prototype)
            .with_builtin_function_property::<PromiseRace>()
            .with_builtin_function_property::<PromiseReject>()
            .with_builtin_function_property::<PromiseResolve>()
            .with_builtin_function_property::<PromiseWithResolvers>()
            .with_builtin_function_getter_property::<PromiseGetSpecies>()
            .build();
    }
}

/// ### [27.2.4.1.1 GetPromiseResolve ( promiseConstructor )](https://tc39.es/ecma262/#sec-getpromiseresolve)
fn get_promise_resolve(agent: &Agent, promise_constructor: Object) -> JsResult<Object> {
    // 1. Let promiseResolve be ? Get(promiseConstructor, "resolve").
    let key = PropertyKey::from_str(agent, "resolve");
    let promise_resolve = get(agent, promise_constructor, key)?;
    // 2. If IsCallable(promiseResolve) is false, throw a TypeError exception.
    // 3. Return promiseResolve.
    as_callable(agent, promise_resolve).ok_or_else(|| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Promise resolve is not a function",
        )
    })
}

/// Steps 1 to 9 shared by Promise.all, Promise.allSettled, Promise.any and
/// Promise.race.
fn promise_combinator(
    agent: &Agent,
    this_value: Value,
    iterable: Value,
    combinator: PromiseCombinator,
) -> JsResult<Value> {
    // 1. Let C be the this value.
    // 2. Let promiseCapability be ? NewPromiseCapability(C).
    let promise_capability = new_promise_capability(agent, this_value)?;
    let Value::Object(c) = this_value else {
        return Err(agent.internal_error("promise capability of a non-object"));
    };
    // 3. Let promiseResolve be Completion(GetPromiseResolve(C)).
    // 4. IfAbruptRejectPromise(promiseResolve, promiseCapability).
    let promise_resolve =
        match if_abrupt_reject_promise(agent, get_promise_resolve(agent, c), promise_capability)? {
            Ok(promise_resolve) => promise_resolve,
            Err(promise) => return Ok(promise),
        };
    // 5. Let iteratorRecord be Completion(GetIterator(iterable, SYNC)).
    // 6. IfAbruptRejectPromise(iteratorRecord, promiseCapability).
    let iterator_record = get_iterator(agent, iterable, IteratorKind::Sync);
    let mut iterator_record =
        match if_abrupt_reject_promise(agent, iterator_record, promise_capability)? {
            Ok(iterator_record) => iterator_record,
            Err(promise) => return Ok(promise),
        };
    // 7. Let result be Completion(PerformPromiseAll(iteratorRecord, C,
    // promiseCapability, promiseResolve)).
    let result = perform_promise_combinator(
        agent,
        &mut iterator_record,
        c,
        promise_capability,
        promise_resolve,
        combinator,
    );
    // 8. If result is an abrupt completion, then
    //     a. If iteratorRecord.[[Done]] is false, set result to
    //     Completion(IteratorClose(iteratorRecord, result)).
    let result = match result {
        Err(JsError::Throw(_)) if !iterator_record.done => {
            iterator_close(agent, iterator_record.iterator, result)
        }
        result => result,
    };
    //     b. IfAbruptRejectPromise(result, promiseCapability).
    // 9. Return ? result.
    match if_abrupt_reject_promise(agent, result, promise_capability)? {
        Ok(value) => Ok(value),
        Err(promise) => Ok(promise),
    }
}

/// ### [27.2.4.1.2 PerformPromiseAll ( iteratorRecord, constructor, resultCapability, promiseResolve )](https://tc39.es/ecma262/#sec-performpromiseall)
///
/// Also PerformPromiseAllSettled, PerformPromiseAny and PerformPromiseRace.
fn perform_promise_combinator(
    agent: &Agent,
    iterator_record: &mut IteratorRecord,
    constructor: Object,
    result_capability: PromiseCapability,
    promise_resolve: Object,
    combinator: PromiseCombinator,
) -> JsResult<Value> {
    // 1. Let values be a new empty List.
    // 2. Let remainingElementsCount be the Record { [[Value]]: 1 }.
    let group = Rc::new(PromiseGroup {
        capability: result_capability,
        combinator,
        values: RefCell::new(Vec::new()),
        remaining: Cell::new(1),
    });
    // 3. Let index be 0.
    let mut index = 0;
    // 4. Repeat,
    loop {
        // a. Let next be ? IteratorStepValue(iteratorRecord).
        let Some(next) = iterator_step_value(agent, iterator_record)? else {
            // b. If next is DONE, then
            if combinator != PromiseCombinator::Race {
                // i. Set remainingElementsCount.[[Value]] to
                // remainingElementsCount.[[Value]] - 1.
                // ii. If remainingElementsCount.[[Value]] = 0, then
                //     1. Let valuesArray be CreateArrayFromList(values).
                //     2. Perform ? Call(resultCapability.[[Resolve]],
                //     undefined, « valuesArray »).
                group.element_done(agent)?;
            }
            // iii. Return resultCapability.[[Promise]].
            return Ok(Value::Object(result_capability.promise()));
        };
        // c. Append undefined to values.
        if combinator != PromiseCombinator::Race {
            group.values.borrow_mut().push(Value::Undefined);
        }
        // d. Let nextPromise be ? Call(promiseResolve, constructor, « next »).
        let next_promise =
            call_function(agent, promise_resolve, Value::Object(constructor), &[next])?;
        // Let alreadyCalled be the Record { [[Value]]: false }.
        let already_called = Rc::new(Cell::new(false));
        let (on_fulfilled, on_rejected) = match combinator {
            // e. Let steps be the algorithm steps defined in Promise.all
            // Resolve Element Functions.
            PromiseCombinator::All => (
                group.element_function(agent, index, None, already_called),
                result_capability.reject_function(agent),
            ),
            PromiseCombinator::AllSettled => (
                group.element_function(agent, index, Some("fulfilled"), already_called.clone()),
                group.element_function(agent, index, Some("rejected"), already_called),
            ),
            PromiseCombinator::Any => (
                result_capability.resolve_function(agent),
                group.element_function(agent, index, None, already_called),
            ),
            // Perform ? Invoke(nextPromise, "then", « resultCapability.[[Resolve]],
            // resultCapability.[[Reject]] »).
            PromiseCombinator::Race => (
                result_capability.resolve_function(agent),
                result_capability.reject_function(agent),
            ),
        };
        // n. Set remainingElementsCount.[[Value]] to
        // remainingElementsCount.[[Value]] + 1.
        if combinator != PromiseCombinator::Race {
            group.remaining.set(group.remaining.get() + 1);
        }
        // o. Perform ? Invoke(nextPromise, "then", « onFulfilled, onRejected »).
        let then = PropertyKey::from_str(agent, "then");
        invoke(
            agent,
            next_promise,
            then,
            &[Value::Object(on_fulfilled), Value::Object(on_rejected)],
        )?;
        // p. Set index to index + 1.
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::{run_after_jobs, run_to_string};

    #[test]
    fn constructor_requires_new_and_a_callable_executor() {
        assert_eq!(
            run_to_string("try { Promise(() => {}) } catch (e) { e.name }"),
            "TypeError"
        );
        assert_eq!(
            run_to_string("try { new Promise(1) } catch (e) { e.name }"),
            "TypeError"
        );
        assert_eq!(run_to_string("Promise.length"), "1");
    }

    #[test]
    fn executor_exceptions_reject_the_promise() {
        assert_eq!(
            run_after_jobs(
                "var r; new Promise(() => { throw 'bad'; }).catch((e) => { r = e; });",
                "r"
            ),
            "bad"
        );
    }

    #[test]
    fn all_keeps_input_order() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 var late = new Promise((resolve) => Promise.resolve().then(() => resolve('late')));
                 Promise.all([late, 2, Promise.resolve(3)]).then((v) => { r = v.join(); });",
                "r"
            ),
            "late,2,3"
        );
        assert_eq!(
            run_after_jobs("var r; Promise.all([]).then((v) => { r = v.length; });", "r"),
            "0"
        );
    }

    #[test]
    fn all_settled_reports_each_outcome() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 Promise.allSettled([1, Promise.reject('no')]).then((v) => {
                     r = v.map((o) => o.status + ':' + (o.value ?? o.reason)).join();
                 });",
                "r"
            ),
            "fulfilled:1,rejected:no"
        );
    }

    #[test]
    fn any_rejects_with_an_aggregate_error() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 Promise.any([Promise.reject(1), Promise.reject(2)]).catch((e) => {
                     r = e.constructor.name + ' ' + e.errors.join();
                 });",
                "r"
            ),
            "AggregateError 1,2"
        );
        assert_eq!(
            run_after_jobs(
                "var r; Promise.any([Promise.reject(1), 2]).then((v) => { r = v; });",
                "r"
            ),
            "2"
        );
    }

    #[test]
    fn race_settles_with_the_first_outcome() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 Promise.race([new Promise(() => {}), Promise.resolve('fast')]).then((v) => { r = v; });",
                "r"
            ),
            "fast"
        );
    }

    #[test]
    fn non_iterable_input_rejects() {
        assert_eq!(
            run_after_jobs("var r; Promise.all(5).catch((e) => { r = e.name; });", "r"),
            "TypeError"
        );
    }

    #[test]
    fn with_resolvers_exposes_the_capability() {
        assert_eq!(
            run_after_jobs(
                "var r; var d = Promise.withResolvers(); d.promise.then((v) => { r = v; }); d.resolve(7);",
                "r"
            ),
            "7"
        );
        assert_eq!(
            run_to_string("Object.keys(Promise.withResolvers()).join()"),
            "promise,resolve,reject"
        );
    }

    #[test]
    fn species_getter_returns_this() {
        assert_eq!(run_to_string("Promise[Symbol.species] === Promise"), "true");
    }
}
