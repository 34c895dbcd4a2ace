// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::promise_abstract_operations::{
    as_callable, is_promise, new_promise_capability, perform_promise_then, promise_resolve,
};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::{call_function, invoke, species_constructor},
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, builtin_function::create_anonymous_builtin_function,
    },
    execution::{Agent, JsError, JsResult, Realm, agent::ExceptionType},
    types::{Object, PropertyKey, Symbol, Value},
};

pub(crate) struct PromisePrototype;

struct PromisePrototypeCatch;
impl Builtin for PromisePrototypeCatch {
    const NAME: &'static str = "catch";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromisePrototype::catch);
}

struct PromisePrototypeFinally;
impl Builtin for PromisePrototypeFinally {
    const NAME: &'static str = "finally";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromisePrototype::finally);
}

struct PromisePrototypeThen;
impl Builtin for PromisePrototypeThen {
    const NAME: &'static str = "then";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromisePrototype::then);
}

impl PromisePrototype {
    /// ### [27.2.5.1 Promise.prototype.catch ( onRejected )](https://tc39.es/ecma262/#sec-promise.prototype.catch)
    fn catch(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let promise be the this value.
        // 2. Return ? Invoke(promise, "then", « undefined, onRejected »).
        let key = PropertyKey::from_str(agent, "then");
        invoke(agent, this_value, key, &[Value::Undefined, arguments.get(0)])
    }

    /// ### [27.2.5.3 Promise.prototype.finally ( onFinally )](https://tc39.es/ecma262/#sec-promise.prototype.finally)
    fn finally(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let on_finally = arguments.get(0);
        // 1. Let promise be the this value.
        // 2. If promise is not an Object, throw a TypeError exception.
        let Value::Object(promise) = this_value else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Promise.prototype.finally called on non-object",
            ));
        };
        // 3. Let C be ? SpeciesConstructor(promise, %Promise%).
        let c = species_constructor(agent, promise, agent.intrinsics().promise())?;
        // 4. Assert: IsConstructor(C) is true.
        // 5. If IsCallable(onFinally) is false, then
        //     a. Let thenFinally be onFinally.
        //     b. Let catchFinally be onFinally.
        let (then_finally, catch_finally) = match as_callable(agent, on_finally) {
            None => (on_finally, on_finally),
            // 6. Else,
            Some(on_finally) => (
                Value::Object(then_finally_function(agent, c, on_finally)),
                Value::Object(catch_finally_function(agent, c, on_finally)),
            ),
        };
        // 7. Return ? Invoke(promise, "then", « thenFinally, catchFinally »).
        let key = PropertyKey::from_str(agent, "then");
        invoke(agent, this_value, key, &[then_finally, catch_finally])
    }

    /// ### [27.2.5.4 Promise.prototype.then ( onFulfilled, onRejected )](https://tc39.es/ecma262/#sec-promise.prototype.then)
    fn then(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let promise be the this value.
        // 2. If IsPromise(promise) is false, throw a TypeError exception.
        let promise = match this_value {
            Value::Object(promise) if is_promise(agent, this_value) => promise,
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "Method Promise.prototype.then called on incompatible receiver {}",
                        this_value.to_display_string(agent)
                    ),
                ));
            }
        };
        // 3. Let C be ? SpeciesConstructor(promise, %Promise%).
        let c = species_constructor(agent, promise, agent.intrinsics().promise())?;
        // 4. Let resultCapability be ? NewPromiseCapability(C).
        let result_capability = new_promise_capability(agent, Value::Object(c))?;
        // 5. Return PerformPromiseThen(promise, onFulfilled, onRejected,
        // resultCapability).
        perform_promise_then(
            agent,
            promise,
            arguments.get(0),
            arguments.get(1),
            Some(result_capability),
        );
        Ok(Value::Object(result_capability.promise()))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.promise_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(5)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<PromisePrototypeCatch>()
            .with_constructor_property(intrinsics.promise())
            .with_builtin_function_property::<PromisePrototypeFinally>()
            .with_builtin_function_property::<PromisePrototypeThen>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Promise"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

/// Step 6.a to 6.c of Promise.prototype.finally: thenFinally calls
/// `on_finally` and passes the original value through.
fn then_finally_function(agent: &Agent, c: Object, on_finally: Object) -> Object {
    // a. Let thenFinallyClosure be a new Abstract Closure with parameters
    // (value) that captures onFinally and C and performs the following steps
    // when called:
    create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        let value = arguments.get(0);
        // i. Let result be ? Call(onFinally, undefined).
        let result = call_function(agent, on_finally, Value::Undefined, &[])?;
        // ii. Let p be ? PromiseResolve(C, result).
        let p = promise_resolve(agent, c, result)?;
        // iii. Let returnValue be a new Abstract Closure with no parameters
        // that captures value and performs the following steps when called:
        //     1. Return NormalCompletion(value).
        // iv. Let valueThunk be CreateBuiltinFunction(returnValue, 0, "", « »).
        let value_thunk = create_anonymous_builtin_function(agent, 0, move |_, _, _| Ok(value));
        // v. Return ? Invoke(p, "then", « valueThunk »).
        let key = PropertyKey::from_str(agent, "then");
        invoke(agent, Value::Object(p), key, &[Value::Object(value_thunk)])
    })
}

/// Step 6.d to 6.f of Promise.prototype.finally: catchFinally calls
/// `on_finally` and rethrows the original reason.
fn catch_finally_function(agent: &Agent, c: Object, on_finally: Object) -> Object {
    // d. Let catchFinallyClosure be a new Abstract Closure with parameters
    // (reason) that captures onFinally and C and performs the following steps
    // when called:
    create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        let reason = arguments.get(0);
        // i. Let result be ? Call(onFinally, undefined).
        let result = call_function(agent, on_finally, Value::Undefined, &[])?;
        // ii. Let p be ? PromiseResolve(C, result).
        let p = promise_resolve(agent, c, result)?;
        // iii. Let throwReason be a new Abstract Closure with no parameters
        // that captures reason and performs the following steps when called:
        //     1. Return ThrowCompletion(reason).
        // iv. Let thrower be CreateBuiltinFunction(throwReason, 0, "", « »).
        let thrower =
            create_anonymous_builtin_function(agent, 0, move |_, _, _| Err(JsError::Throw(reason)));
        // v. Return ? Invoke(p, "then", « thrower »).
        let key = PropertyKey::from_str(agent, "then");
        invoke(agent, Value::Object(p), key, &[Value::Object(thrower)])
    })
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::{run_after_jobs, run_to_string};

    #[test]
    fn then_rejects_incompatible_receivers() {
        assert_eq!(
            run_to_string("try { Promise.prototype.then.call({}) } catch (e) { e.name }"),
            "TypeError"
        );
        assert_eq!(
            run_to_string("Object.prototype.toString.call(Promise.resolve())"),
            "[object Promise]"
        );
    }

    #[test]
    fn non_callable_handlers_pass_values_through() {
        assert_eq!(
            run_after_jobs(
                "var r; Promise.resolve(5).then(null).then(undefined, 1).then((v) => { r = v; });",
                "r"
            ),
            "5"
        );
        assert_eq!(
            run_after_jobs(
                "var r; Promise.reject(6).then((v) => v).catch((e) => { r = e; });",
                "r"
            ),
            "6"
        );
    }

    #[test]
    fn finally_runs_exactly_once_and_keeps_the_outcome() {
        assert_eq!(
            run_after_jobs(
                "var calls = 0, r;
                 Promise.resolve('v').finally(() => { calls++; return 'ignored'; })
                     .then((v) => { r = v; });",
                "calls + ':' + r"
            ),
            "1:v"
        );
        assert_eq!(
            run_after_jobs(
                "var calls = 0, r;
                 Promise.reject('e').finally(() => { calls++; })
                     .catch((e) => { r = e; });",
                "calls + ':' + r"
            ),
            "1:e"
        );
    }

    #[test]
    fn finally_callback_errors_replace_the_outcome() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 Promise.resolve(1).finally(() => { throw 'override'; }).catch((e) => { r = e; });",
                "r"
            ),
            "override"
        );
    }

    #[test]
    fn handler_results_are_adopted() {
        assert_eq!(
            run_after_jobs(
                "var r; Promise.resolve(1).then((v) => Promise.resolve(v + 1)).then((v) => { r = v; });",
                "r"
            ),
            "2"
        );
    }
}
