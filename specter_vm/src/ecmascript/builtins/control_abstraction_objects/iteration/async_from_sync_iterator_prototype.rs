// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{
            IteratorRecord, create_iter_result_object, iterator_close, iterator_complete,
            iterator_next, iterator_value,
        },
        operations_on_objects::{call_function, get_method},
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin,
        builtin_function::create_anonymous_builtin_function,
        control_abstraction_objects::promise_objects::promise_abstract_operations::{
            PromiseCapability, perform_promise_then, promise_resolve,
        },
    },
    execution::{Agent, JsError, JsResult, Realm, agent::ExceptionType},
    types::{ObjectKind, PropertyKey, Value},
};

/// ### [27.1.6.2 The %AsyncFromSyncIteratorPrototype% Object](https://tc39.es/ecma262/#sec-%asyncfromsynciteratorprototype%-object)
pub(crate) struct AsyncFromSyncIteratorPrototype;

struct AsyncFromSyncIteratorPrototypeNext;
impl Builtin for AsyncFromSyncIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncFromSyncIteratorPrototype::next);
}

struct AsyncFromSyncIteratorPrototypeReturn;
impl Builtin for AsyncFromSyncIteratorPrototypeReturn {
    const NAME: &'static str = "return";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncFromSyncIteratorPrototype::r#return);
}

struct AsyncFromSyncIteratorPrototypeThrow;
impl Builtin for AsyncFromSyncIteratorPrototypeThrow {
    const NAME: &'static str = "throw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncFromSyncIteratorPrototype::throw);
}

/// The \[\[SyncIteratorRecord\]\] of an Async-from-Sync Iterator.
fn sync_iterator_record(agent: &Agent, this_value: Value) -> JsResult<IteratorRecord> {
    // 2. Assert: O is an Object that has a [[SyncIteratorRecord]] internal slot.
    let record = match this_value {
        Value::Object(o) => match &agent.object(o).kind {
            ObjectKind::AsyncFromSyncIterator(record) => Some(record.clone()),
            _ => None,
        },
        _ => None,
    };
    record.ok_or_else(|| agent.internal_error("not an async-from-sync iterator"))
}

/// Reject the capability with a throw completion and return its promise.
fn reject_with(agent: &Agent, capability: PromiseCapability, error: JsError) -> JsResult<Value> {
    match error {
        JsError::Throw(reason) => {
            capability.reject(agent, reason)?;
            Ok(Value::Object(capability.promise()))
        }
        error => Err(error),
    }
}

impl AsyncFromSyncIteratorPrototype {
    /// ### [27.1.6.2.1 %AsyncFromSyncIteratorPrototype%.next ( \[ value \] )](https://tc39.es/ecma262/#sec-%asyncfromsynciteratorprototype%.next)
    fn next(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 3. Let promiseCapability be ! NewPromiseCapability(%Promise%).
        let capability = PromiseCapability::new_intrinsic(agent);
        // 4. Let syncIteratorRecord be O.[[SyncIteratorRecord]].
        let mut sync_iterator_record = sync_iterator_record(agent, this_value)?;
        // 5. If value is present, then
        //     a. Let result be Completion(IteratorNext(syncIteratorRecord, value)).
        // 6. Else,
        //     a. Let result be Completion(IteratorNext(syncIteratorRecord)).
        let value = (!arguments.is_empty()).then_some(arguments.get(0));
        // 7. IfAbruptRejectPromise(result, promiseCapability).
        let result = match iterator_next(agent, &mut sync_iterator_record, value) {
            Ok(result) => result,
            Err(error) => return reject_with(agent, capability, error),
        };
        // 8. Return AsyncFromSyncIteratorContinuation(result, promiseCapability,
        // syncIteratorRecord, true).
        async_from_sync_iterator_continuation(
            agent,
            Value::Object(result),
            capability,
            &sync_iterator_record,
            true,
        )
    }

    /// ### [27.1.6.2.2 %AsyncFromSyncIteratorPrototype%.return ( \[ value \] )](https://tc39.es/ecma262/#sec-%asyncfromsynciteratorprototype%.return)
    fn r#return(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 3. Let promiseCapability be ! NewPromiseCapability(%Promise%).
        let capability = PromiseCapability::new_intrinsic(agent);
        // 4. Let syncIteratorRecord be O.[[SyncIteratorRecord]].
        let sync_iterator_record = sync_iterator_record(agent, this_value)?;
        // 5. Let syncIterator be syncIteratorRecord.[[Iterator]].
        let sync_iterator = sync_iterator_record.iterator;
        // 6. Let return be Completion(GetMethod(syncIterator, "return")).
        let key = PropertyKey::from_str(agent, "return");
        // 7. IfAbruptRejectPromise(return, promiseCapability).
        let r#return = match get_method(agent, Value::Object(sync_iterator), key) {
            Ok(r#return) => r#return,
            Err(error) => return reject_with(agent, capability, error),
        };
        // 8. If return is undefined, then
        let Some(r#return) = r#return else {
            // a. Let iteratorResult be CreateIteratorResultObject(value, true).
            let iterator_result = create_iter_result_object(agent, arguments.get(0), true);
            // b. Perform ! Call(promiseCapability.[[Resolve]], undefined, « iteratorResult »).
            capability.resolve(agent, Value::Object(iterator_result))?;
            // c. Return promiseCapability.[[Promise]].
            return Ok(Value::Object(capability.promise()));
        };
        // 9. If value is present, then
        //     a. Let result be Completion(Call(return, syncIterator, « value »)).
        // 10. Else,
        //     a. Let result be Completion(Call(return, syncIterator)).
        let call_arguments: &[Value] = if arguments.is_empty() {
            &[]
        } else {
            &arguments[..1]
        };
        // 11. IfAbruptRejectPromise(result, promiseCapability).
        let result = match call_function(
            agent,
            r#return,
            Value::Object(sync_iterator),
            call_arguments,
        ) {
            Ok(result) => result,
            Err(error) => return reject_with(agent, capability, error),
        };
        // 12. If result is not an Object, then
        if !result.is_object() {
            // a. Perform ! Call(promiseCapability.[[Reject]], undefined, « a newly
            // created TypeError object »).
            // b. Return promiseCapability.[[Promise]].
            let error = agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Iterator return method result is not an object",
            );
            return reject_with(agent, capability, error);
        }
        // 13. Return AsyncFromSyncIteratorContinuation(result, promiseCapability,
        // syncIteratorRecord, false).
        async_from_sync_iterator_continuation(
            agent,
            result,
            capability,
            &sync_iterator_record,
            false,
        )
    }

    /// ### [27.1.6.2.3 %AsyncFromSyncIteratorPrototype%.throw ( \[ value \] )](https://tc39.es/ecma262/#sec-%asyncfromsynciteratorprototype%.throw)
    fn throw(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1. Let O be the this value.
        // 3. Let promiseCapability be ! NewPromiseCapability(%Promise%).
        let capability = PromiseCapability::new_intrinsic(agent);
        // 4. Let syncIteratorRecord be O.[[SyncIteratorRecord]].
        let sync_iterator_record = sync_iterator_record(agent, this_value)?;
        // 5. Let syncIterator be syncIteratorRecord.[[Iterator]].
        let sync_iterator = sync_iterator_record.iterator;
        // 6. Let throw be Completion(GetMethod(syncIterator, "throw")).
        let key = PropertyKey::from_str(agent, "throw");
        // 7. IfAbruptRejectPromise(throw, promiseCapability).
        let throw = match get_method(agent, Value::Object(sync_iterator), key) {
            Ok(throw) => throw,
            Err(error) => return reject_with(agent, capability, error),
        };
        // 8. If throw is undefined, then
        let Some(throw) = throw else {
            // a. NOTE: If syncIterator does not have a throw method, close it
            // to give it a chance to clean up before we reject the capability.
            // b. Let closeCompletion be NormalCompletion(EMPTY).
            // c. Let result be Completion(IteratorClose(syncIteratorRecord, closeCompletion)).
            // d. IfAbruptRejectPromise(result, promiseCapability).
            if let Err(error) = iterator_close(agent, sync_iterator, Ok(())) {
                return reject_with(agent, capability, error);
            }
            // e. NOTE: The next step throws a TypeError to indicate that there
            // was a protocol violation: syncIterator does not have a throw method.
            // f. Perform ! Call(promiseCapability.[[Reject]], undefined, « a newly
            // created TypeError object »).
            // g. Return promiseCapability.[[Promise]].
            let error = agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "The iterator does not provide a 'throw' method",
            );
            return reject_with(agent, capability, error);
        };
        // 9. Let result be Completion(Call(throw, syncIterator, « value »)).
        // 10. IfAbruptRejectPromise(result, promiseCapability).
        let result = match call_function(agent, throw, Value::Object(sync_iterator), &[value]) {
            Ok(result) => result,
            Err(error) => return reject_with(agent, capability, error),
        };
        // 11. If result is not an Object, then
        if !result.is_object() {
            let error = agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Iterator throw method result is not an object",
            );
            return reject_with(agent, capability, error);
        }
        // 12. Return AsyncFromSyncIteratorContinuation(result, promiseCapability,
        // syncIteratorRecord, true).
        async_from_sync_iterator_continuation(
            agent,
            result,
            capability,
            &sync_iterator_record,
            true,
        )
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.async_from_sync_iterator_prototype();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(3)
            .with_prototype(intrinsics.async_iterator_prototype())
            .with_builtin_function_property::<AsyncFromSyncIteratorPrototypeNext>()
            .with_builtin_function_property::<AsyncFromSyncIteratorPrototypeReturn>()
            .with_builtin_function_property::<AsyncFromSyncIteratorPrototypeThrow>()
            .build();
    }
}

/// ### [27.1.6.4 AsyncFromSyncIteratorContinuation ( result, promiseCapability, syncIteratorRecord, closeOnRejection )](https://tc39.es/ecma262/#sec-asyncfromsynciteratorcontinuation)
fn async_from_sync_iterator_continuation(
    agent: &Agent,
    result: Value,
    capability: PromiseCapability,
    sync_iterator_record: &IteratorRecord,
    close_on_rejection: bool,
) -> JsResult<Value> {
    let Value::Object(result) = result else {
        return Err(agent.internal_error("iterator result is not an object"));
    };
    // 1. NOTE: Because promiseCapability is derived from the intrinsic
    // %Promise%, the calls to promiseCapability.[[Reject]] entailed by the
    // use IfAbruptRejectPromise below are guaranteed not to throw.
    // 2. Let done be Completion(IteratorComplete(result)).
    // 3. IfAbruptRejectPromise(done, promiseCapability).
    let done = match iterator_complete(agent, result) {
        Ok(done) => done,
        Err(error) => return reject_with(agent, capability, error),
    };
    // 4. Let value be Completion(IteratorValue(result)).
    // 5. IfAbruptRejectPromise(value, promiseCapability).
    let value = match iterator_value(agent, result) {
        Ok(value) => value,
        Err(error) => return reject_with(agent, capability, error),
    };
    // 6. Let valueWrapper be Completion(PromiseResolve(%Promise%, value)).
    let mut value_wrapper = promise_resolve(agent, agent.intrinsics().promise(), value);
    // 7. If valueWrapper is an abrupt completion, done is false, and
    // closeOnRejection is true, then
    if value_wrapper.is_err() && !done && close_on_rejection {
        // a. Set valueWrapper to Completion(IteratorClose(syncIteratorRecord,
        // valueWrapper)).
        value_wrapper = iterator_close(agent, sync_iterator_record.iterator, value_wrapper);
    }
    // 8. IfAbruptRejectPromise(valueWrapper, promiseCapability).
    let value_wrapper = match value_wrapper {
        Ok(value_wrapper) => value_wrapper,
        Err(error) => return reject_with(agent, capability, error),
    };
    // 9. Let unwrap be a new Abstract Closure with parameters (v) that
    // captures done and performs the following steps when called:
    //     a. Return CreateIteratorResultObject(v, done).
    // 10. Let onFulfilled be CreateBuiltinFunction(unwrap, 1, "", « »).
    // 11. NOTE: onFulfilled is used when processing the "value" property of
    // an IteratorResult object in order to wait for its value if it is a
    // promise and re-package the result in a new "unwrapped" IteratorResult
    // object.
    let on_fulfilled = create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        Ok(Value::Object(create_iter_result_object(
            agent,
            arguments.get(0),
            done,
        )))
    });
    // 12. If done is true, or if closeOnRejection is false, then
    //     a. Let onRejected be undefined.
    let on_rejected = if done || !close_on_rejection {
        Value::Undefined
    } else {
        // 13. Else,
        //     a. Let closeIterator be a new Abstract Closure with parameters
        //     (error) that captures syncIteratorRecord and performs the
        //     following steps when called:
        //         i. Return ? IteratorClose(syncIteratorRecord, ThrowCompletion(error)).
        //     b. Let onRejected be CreateBuiltinFunction(closeIterator, 1, "", « »).
        let sync_iterator = sync_iterator_record.iterator;
        Value::Object(create_anonymous_builtin_function(
            agent,
            1,
            move |agent, _, arguments| {
                iterator_close(agent, sync_iterator, Err(JsError::Throw(arguments.get(0))))
            },
        ))
    };
    // 14. Perform PerformPromiseThen(valueWrapper, onFulfilled, onRejected,
    // promiseCapability).
    perform_promise_then(
        agent,
        value_wrapper,
        Value::Object(on_fulfilled),
        on_rejected,
        Some(capability),
    );
    // 15. Return promiseCapability.[[Promise]].
    Ok(Value::Object(capability.promise()))
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_after_jobs;

    #[test]
    fn for_await_unwraps_promises_of_sync_iterables() {
        assert_eq!(
            run_after_jobs(
                "var out = [];
                 (async () => {
                     for await (const v of [Promise.resolve(1), 2, Promise.resolve(3)]) out.push(v);
                 })();",
                "out.join()"
            ),
            "1,2,3"
        );
    }

    #[test]
    fn rejected_values_close_the_sync_iterator() {
        assert_eq!(
            run_after_jobs(
                "var log = [];
                 var iterable = {
                     [Symbol.iterator]() {
                         return {
                             next() { return { value: Promise.reject('bad'), done: false }; },
                             return() { log.push('closed'); return {}; },
                         };
                     },
                 };
                 (async () => {
                     try { for await (const v of iterable) log.push(v); } catch (e) { log.push(e); }
                 })();",
                "log.join()"
            ),
            "closed,bad"
        );
    }
}
