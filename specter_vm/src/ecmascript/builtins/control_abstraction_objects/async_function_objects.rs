// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.7 AsyncFunction Objects](https://tc39.es/ecma262/#sec-async-function-objects)

mod async_function_constructor;
mod async_function_prototype;
pub(crate) mod await_reaction;

use std::rc::Rc;

pub(crate) use async_function_constructor::AsyncFunctionConstructor;
pub(crate) use async_function_prototype::AsyncFunctionPrototype;
use await_reaction::{AwaitReaction, await_promise};
use specter_ast::ast::FunctionNode;

use crate::{
    ecmascript::{
        builtins::control_abstraction_objects::promise_objects::promise_abstract_operations::{
            reject_promise, resolve_promise,
        },
        execution::{Agent, JsError, JsResult},
        types::{Object, Value},
    },
    engine::{
        coroutine::{Coroutine, CoroutineBody, CoroutineStep, Resumption, Suspension},
        evaluator::function_definitions::evaluate_function_body,
    },
};

/// ### [27.7.5.1 AsyncFunctionStart ( promiseCapability, asyncFunctionBody )](https://tc39.es/ecma262/#sec-async-functions-abstract-operations-async-function-start)
///
/// Runs the body of `f` until its first `await` and settles `promise` once
/// the body completes.
pub(crate) fn async_function_start(
    agent: &Agent,
    promise: Object,
    f: Object,
    code: Rc<FunctionNode>,
) -> JsResult<()> {
    // 1. Let runningContext be the running execution context.
    // 2. Let asyncContext be a copy of runningContext.
    // 3. NOTE: Copying the execution state is required for AsyncBlockStart
    // to resume its execution. It is ill-defined to resume a currently
    // executing context.
    let async_context = agent.running_execution_context();
    let handle = agent.handle();
    let body: CoroutineBody = Box::pin(async move {
        let agent = handle;
        evaluate_function_body(&agent, f, &code).await
    });
    let coroutine = Coroutine::new(agent, async_context, body);
    // 4. Perform AsyncBlockStart(promiseCapability, asyncFunctionBody,
    // asyncContext).
    async_function_resume(agent, coroutine, promise, Resumption::Next(Value::Undefined))
}

/// ### [27.7.5.2 AsyncBlockStart ( promiseCapability, asyncBody, asyncContext )](https://tc39.es/ecma262/#sec-asyncblockstart)
///
/// Resume the body of an async function and handle where it stops next.
pub(crate) fn async_function_resume(
    agent: &Agent,
    coroutine: Coroutine,
    promise: Object,
    resumption: Resumption,
) -> JsResult<()> {
    match coroutine.resume(agent, resumption)? {
        CoroutineStep::Suspended(Suspension::Await(value)) => {
            let reaction = AwaitReaction::AsyncFunction { coroutine, promise };
            await_promise(agent, value, reaction)
        }
        CoroutineStep::Suspended(Suspension::Yield(_)) => {
            Err(agent.internal_error("async function body yielded"))
        }
        // e. If result is a normal completion, then
        //     i. Perform ! Call(promiseCapability.[[Resolve]], undefined, « undefined »).
        // f. Else if result is a return completion, then
        //     i. Perform ! Call(promiseCapability.[[Resolve]], undefined, « result.[[Value]] »).
        CoroutineStep::Complete(Ok(value)) => {
            tracing::trace!(event = "async_function_settled", rejected = false);
            resolve_promise(agent, promise, value);
            Ok(())
        }
        // g. Else,
        //     i. Assert: result is a throw completion.
        //     ii. Perform ! Call(promiseCapability.[[Reject]], undefined, « result.[[Value]] »).
        CoroutineStep::Complete(Err(JsError::Throw(error))) => {
            tracing::trace!(event = "async_function_settled", rejected = true);
            reject_promise(agent, promise, error);
            Ok(())
        }
        CoroutineStep::Complete(Err(error)) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::{run_after_jobs, run_to_string};

    #[test]
    fn async_functions_return_promises() {
        assert_eq!(
            run_to_string("async function f() { return 1; } Object.prototype.toString.call(f())"),
            "[object Promise]"
        );
        assert_eq!(
            run_after_jobs("var r; (async () => 7)().then((v) => { r = v; });", "r"),
            "7"
        );
    }

    #[test]
    fn await_suspends_until_a_later_job() {
        assert_eq!(
            run_after_jobs(
                "var log = [];
                 async function f() { log.push('start'); var v = await 1; log.push('resumed ' + v); }
                 f();
                 log.push('sync');",
                "log.join()"
            ),
            "start,sync,resumed 1"
        );
    }

    #[test]
    fn rejected_awaits_throw_into_the_body() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 async function f() {
                     try { await Promise.reject('no'); } catch (e) { return 'caught ' + e; }
                 }
                 f().then((v) => { r = v; });",
                "r"
            ),
            "caught no"
        );
        assert_eq!(
            run_after_jobs(
                "var r; (async function () { throw 'bad'; })().catch((e) => { r = e; });",
                "r"
            ),
            "bad"
        );
    }

    #[test]
    fn async_function_constructor_is_reachable() {
        assert_eq!(
            run_to_string(
                "var AsyncFunction = Object.getPrototypeOf(async function () {}).constructor;
                 AsyncFunction.name + ' ' + Object.prototype.toString.call(AsyncFunction.prototype)"
            ),
            "AsyncFunction [object AsyncFunction]"
        );
        assert_eq!(
            run_after_jobs(
                "var r; var AsyncFunction = Object.getPrototypeOf(async function () {}).constructor;
                 new AsyncFunction('a', 'return await a * 2;')(21).then((v) => { r = v; });",
                "r"
            ),
            "42"
        );
    }
}
