// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    AsyncGeneratorState, async_generator_await_return, async_generator_enqueue,
    async_generator_resume, async_generator_validate, set_state,
};
use crate::{
    ecmascript::{
        abstract_operations::operations_on_iterator_objects::create_iter_result_object,
        builders::ordinary_object_builder::OrdinaryObjectBuilder,
        builtins::{
            ArgumentsList, Behaviour, Builtin,
            control_abstraction_objects::promise_objects::promise_abstract_operations::{
                PromiseCapability, if_abrupt_reject_promise,
            },
        },
        execution::{Agent, JsResult, Realm},
        types::{PropertyKey, Symbol, Value},
    },
    engine::coroutine::Resumption,
};

pub(crate) struct AsyncGeneratorPrototype;

struct AsyncGeneratorPrototypeNext;
impl Builtin for AsyncGeneratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncGeneratorPrototype::next);
}

struct AsyncGeneratorPrototypeReturn;
impl Builtin for AsyncGeneratorPrototypeReturn {
    const NAME: &'static str = "return";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncGeneratorPrototype::r#return);
}

struct AsyncGeneratorPrototypeThrow;
impl Builtin for AsyncGeneratorPrototypeThrow {
    const NAME: &'static str = "throw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncGeneratorPrototype::throw);
}

impl AsyncGeneratorPrototype {
    /// ### [27.6.1.2 %AsyncGeneratorPrototype%.next ( value )](https://tc39.es/ecma262/#sec-asyncgenerator-prototype-next)
    fn next(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1. Let generator be the this value.
        // 2. Let promiseCapability be ! NewPromiseCapability(%Promise%).
        let promise_capability = PromiseCapability::new_intrinsic(agent);
        // 3. Let result be Completion(AsyncGeneratorValidate(generator, EMPTY)).
        let result = async_generator_validate(agent, this_value);
        // 4. IfAbruptRejectPromise(result, promiseCapability).
        let (generator, state) =
            match if_abrupt_reject_promise(agent, result, promise_capability)? {
                Ok(validated) => validated,
                Err(promise) => return Ok(promise),
            };
        // 5. Let state be generator.[[AsyncGeneratorState]].
        // 6. If state is completed, then
        if state == AsyncGeneratorState::Completed {
            // a. Let iteratorResult be CreateIteratorResultObject(undefined, true).
            let iterator_result = create_iter_result_object(agent, Value::Undefined, true);
            // b. Perform ! Call(promiseCapability.[[Resolve]], undefined, « iteratorResult »).
            promise_capability.resolve(agent, Value::Object(iterator_result))?;
            // c. Return promiseCapability.[[Promise]].
            return Ok(Value::Object(promise_capability.promise()));
        }
        // 7. Let completion be NormalCompletion(value).
        let completion = Resumption::Next(value);
        // 8. Perform AsyncGeneratorEnqueue(generator, completion, promiseCapability).
        async_generator_enqueue(agent, generator, completion, promise_capability);
        // 9. If state is either suspended-start or suspended-yield, then
        if matches!(
            state,
            AsyncGeneratorState::SuspendedStart | AsyncGeneratorState::SuspendedYield
        ) {
            // a. Perform AsyncGeneratorResume(generator, completion).
            async_generator_resume(agent, generator, completion)?;
        }
        // 10. Else,
        //     a. Assert: state is either executing or draining-queue.
        // 11. Return promiseCapability.[[Promise]].
        Ok(Value::Object(promise_capability.promise()))
    }

    /// ### [27.6.1.3 %AsyncGeneratorPrototype%.return ( value )](https://tc39.es/ecma262/#sec-asyncgenerator-prototype-return)
    fn r#return(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1. Let generator be the this value.
        // 2. Let promiseCapability be ! NewPromiseCapability(%Promise%).
        let promise_capability = PromiseCapability::new_intrinsic(agent);
        // 3. Let result be Completion(AsyncGeneratorValidate(generator, EMPTY)).
        let result = async_generator_validate(agent, this_value);
        // 4. IfAbruptRejectPromise(result, promiseCapability).
        let (generator, state) =
            match if_abrupt_reject_promise(agent, result, promise_capability)? {
                Ok(validated) => validated,
                Err(promise) => return Ok(promise),
            };
        // 5. Let completion be ReturnCompletion(value).
        let completion = Resumption::Return(value);
        // 6. Perform AsyncGeneratorEnqueue(generator, completion, promiseCapability).
        async_generator_enqueue(agent, generator, completion, promise_capability);
        // 7. Let state be generator.[[AsyncGeneratorState]].
        match state {
            // 8. If state is either suspended-start or completed, then
            AsyncGeneratorState::SuspendedStart | AsyncGeneratorState::Completed => {
                // a. Set generator.[[AsyncGeneratorState]] to draining-queue.
                set_state(agent, generator, AsyncGeneratorState::DrainingQueue);
                // b. Perform AsyncGeneratorAwaitReturn(generator).
                async_generator_await_return(agent, generator)?;
            }
            // 9. Else if state is suspended-yield, then
            AsyncGeneratorState::SuspendedYield => {
                // a. Perform AsyncGeneratorResume(generator, completion).
                async_generator_resume(agent, generator, completion)?;
            }
            // 10. Else,
            //     a. Assert: state is either executing or draining-queue.
            AsyncGeneratorState::Executing | AsyncGeneratorState::DrainingQueue => {}
        }
        // 11. Return promiseCapability.[[Promise]].
        Ok(Value::Object(promise_capability.promise()))
    }

    /// ### [27.6.1.4 %AsyncGeneratorPrototype%.throw ( exception )](https://tc39.es/ecma262/#sec-asyncgenerator-prototype-throw)
    fn throw(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let exception = arguments.get(0);
        // 1. Let generator be the this value.
        // 2. Let promiseCapability be ! NewPromiseCapability(%Promise%).
        let promise_capability = PromiseCapability::new_intrinsic(agent);
        // 3. Let result be Completion(AsyncGeneratorValidate(generator, EMPTY)).
        let result = async_generator_validate(agent, this_value);
        // 4. IfAbruptRejectPromise(result, promiseCapability).
        let (generator, mut state) =
            match if_abrupt_reject_promise(agent, result, promise_capability)? {
                Ok(validated) => validated,
                Err(promise) => return Ok(promise),
            };
        // 5. Let state be generator.[[AsyncGeneratorState]].
        // 6. If state is suspended-start, then
        if state == AsyncGeneratorState::SuspendedStart {
            // a. Set generator.[[AsyncGeneratorState]] to completed.
            set_state(agent, generator, AsyncGeneratorState::Completed);
            // b. Set state to completed.
            state = AsyncGeneratorState::Completed;
        }
        // 7. If state is completed, then
        if state == AsyncGeneratorState::Completed {
            // a. Perform ! Call(promiseCapability.[[Reject]], undefined, « exception »).
            promise_capability.reject(agent, exception)?;
            // b. Return promiseCapability.[[Promise]].
            return Ok(Value::Object(promise_capability.promise()));
        }
        // 8. Let completion be ThrowCompletion(exception).
        let completion = Resumption::Throw(exception);
        // 9. Perform AsyncGeneratorEnqueue(generator, completion, promiseCapability).
        async_generator_enqueue(agent, generator, completion, promise_capability);
        // 10. If state is suspended-yield, then
        if state == AsyncGeneratorState::SuspendedYield {
            // a. Perform AsyncGeneratorResume(generator, completion).
            async_generator_resume(agent, generator, completion)?;
        }
        // 11. Else,
        //     a. Assert: state is either executing or draining-queue.
        // 12. Return promiseCapability.[[Promise]].
        Ok(Value::Object(promise_capability.promise()))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.async_generator_prototype();
        let constructor = PropertyKey::from_str(agent, "constructor");
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(5)
            .with_prototype(intrinsics.async_iterator_prototype())
            // ### [27.6.1.1 %AsyncGeneratorPrototype%.constructor](https://tc39.es/ecma262/#sec-asyncgenerator-prototype-constructor)
            .with_property(|property| {
                property
                    .with_key(constructor)
                    .with_value_readonly(Value::Object(
                        intrinsics.async_generator_function_prototype(),
                    ))
                    .with_enumerable(false)
                    .build()
            })
            .with_builtin_function_property::<AsyncGeneratorPrototypeNext>()
            .with_builtin_function_property::<AsyncGeneratorPrototypeReturn>()
            .with_builtin_function_property::<AsyncGeneratorPrototypeThrow>()
            // ### [27.6.1.5 %AsyncGeneratorPrototype% \[ %Symbol.toStringTag% \]](https://tc39.es/ecma262/#sec-asyncgenerator-prototype-%symbol.tostringtag%)
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "AsyncGenerator"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}
