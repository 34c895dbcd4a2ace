// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.6 AsyncGenerator Objects](https://tc39.es/ecma262/#sec-asyncgenerator-objects)

mod async_generator_prototype;

use std::{collections::VecDeque, rc::Rc};

pub(crate) use async_generator_prototype::AsyncGeneratorPrototype;
use specter_ast::ast::FunctionNode;

use super::{
    async_function_objects::await_reaction::{AwaitReaction, await_promise},
    promise_objects::promise_abstract_operations::{
        PromiseCapability, perform_promise_then, promise_resolve,
    },
};
use crate::{
    ecmascript::{
        abstract_operations::operations_on_iterator_objects::create_iter_result_object,
        builtins::builtin_function::create_anonymous_builtin_function,
        execution::{Agent, JsError, JsResult, agent::ExceptionType},
        types::{Object, ObjectKind, Value},
    },
    engine::{
        coroutine::{Coroutine, CoroutineBody, CoroutineStep, Resumption, Suspension},
        evaluator::function_definitions::evaluate_function_body,
    },
};

/// ### \[\[AsyncGeneratorState\]\]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum AsyncGeneratorState {
    #[default]
    SuspendedStart,
    SuspendedYield,
    Executing,
    /// The body completed and the queued requests are being settled; a
    /// `return` request may be waiting on its value.
    DrainingQueue,
    Completed,
}

/// ### [27.6.3.1 AsyncGeneratorRequest Records](https://tc39.es/ecma262/#sec-asyncgeneratorrequest-records)
#[derive(Debug, Clone, Copy)]
pub(crate) struct AsyncGeneratorRequest {
    pub(crate) completion: Resumption,
    pub(crate) capability: PromiseCapability,
}

#[derive(Debug, Default)]
pub(crate) struct AsyncGeneratorData {
    pub(crate) state: AsyncGeneratorState,
    /// ### \[\[AsyncGeneratorQueue\]\]
    pub(crate) queue: VecDeque<AsyncGeneratorRequest>,
    /// ### \[\[AsyncGeneratorContext\]\]
    pub(crate) coroutine: Option<Coroutine>,
}

fn with_data<R>(
    agent: &Agent,
    generator: Object,
    f: impl FnOnce(&mut AsyncGeneratorData) -> R,
) -> Option<R> {
    let mut object = agent.object_mut(generator);
    match &mut object.kind {
        ObjectKind::AsyncGenerator(data) => Some(f(data)),
        _ => None,
    }
}

fn set_state(agent: &Agent, generator: Object, state: AsyncGeneratorState) {
    let finished = with_data(agent, generator, |data| {
        tracing::trace!(event = "async_generator_state", from = ?data.state, to = ?state);
        data.state = state;
        if state == AsyncGeneratorState::Completed {
            data.coroutine.take()
        } else {
            None
        }
    });
    // Any execution state of a completed generator can be discarded.
    if let Some(Some(coroutine)) = finished {
        coroutine.abandon(agent);
    }
}

fn queue_front(agent: &Agent, generator: Object) -> Option<AsyncGeneratorRequest> {
    with_data(agent, generator, |data| data.queue.front().copied()).flatten()
}

/// ### [27.6.3.2 AsyncGeneratorStart ( generator, generatorBody )](https://tc39.es/ecma262/#sec-asyncgeneratorstart)
pub(crate) fn async_generator_start(
    agent: &Agent,
    generator: Object,
    f: Object,
    code: Rc<FunctionNode>,
) {
    // 1. Assert: generator.[[AsyncGeneratorState]] is suspended-start.
    // 2. Let genContext be the running execution context.
    // 3. Set the Generator component of genContext to generator.
    let gen_context = agent.running_execution_context();
    // 4. Let closure be a new Abstract Closure with no parameters that
    // captures generatorBody and performs the following steps when called:
    let handle = agent.handle();
    let body: CoroutineBody = Box::pin(async move {
        let agent = handle;
        evaluate_function_body(&agent, f, &code).await
    });
    // 5. Set the code evaluation state of genContext such that when
    // evaluation is resumed for that execution context, closure will be
    // called with no arguments.
    let coroutine = Coroutine::new(agent, gen_context, body);
    // 6. Set generator.[[AsyncGeneratorContext]] to genContext.
    // 7. Set generator.[[AsyncGeneratorQueue]] to a new empty List.
    with_data(agent, generator, |data| data.coroutine = Some(coroutine));
    // 8. Return unused.
}

/// ### [27.6.3.3 AsyncGeneratorValidate ( generator, generatorBrand )](https://tc39.es/ecma262/#sec-asyncgeneratorvalidate)
///
/// Returns the generator and its state.
pub(crate) fn async_generator_validate(
    agent: &Agent,
    generator: Value,
) -> JsResult<(Object, AsyncGeneratorState)> {
    // 1. Perform ? RequireInternalSlot(generator, [[AsyncGeneratorContext]]).
    // 2. Perform ? RequireInternalSlot(generator, [[AsyncGeneratorState]]).
    // 3. Perform ? RequireInternalSlot(generator, [[AsyncGeneratorQueue]]).
    // 4. If generator.[[GeneratorBrand]] is not generatorBrand, throw a
    // TypeError exception.
    let validated = match generator {
        Value::Object(object) => with_data(agent, object, |data| (object, data.state)),
        _ => None,
    };
    // 5. Return unused.
    validated.ok_or_else(|| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not an async generator object",
        )
    })
}

/// ### [27.6.3.4 AsyncGeneratorEnqueue ( generator, completion, promiseCapability )](https://tc39.es/ecma262/#sec-asyncgeneratorenqueue)
pub(crate) fn async_generator_enqueue(
    agent: &Agent,
    generator: Object,
    completion: Resumption,
    capability: PromiseCapability,
) {
    // 1. Let request be AsyncGeneratorRequest { [[Completion]]: completion,
    // [[Capability]]: promiseCapability }.
    let request = AsyncGeneratorRequest {
        completion,
        capability,
    };
    // 2. Append request to generator.[[AsyncGeneratorQueue]].
    with_data(agent, generator, |data| data.queue.push_back(request));
    // 3. Return unused.
}

/// ### [27.6.3.5 AsyncGeneratorCompleteStep ( generator, completion, done \[ , realm \] )](https://tc39.es/ecma262/#sec-asyncgeneratorcompletestep)
///
/// `completion` is either a normal completion or a throw completion.
fn async_generator_complete_step(
    agent: &Agent,
    generator: Object,
    completion: Result<Value, Value>,
    done: bool,
) -> JsResult<()> {
    // 1. Assert: generator.[[AsyncGeneratorQueue]] is not empty.
    // 2. Let next be the first element of generator.[[AsyncGeneratorQueue]].
    // 3. Remove the first element from generator.[[AsyncGeneratorQueue]].
    let Some(next) = with_data(agent, generator, |data| data.queue.pop_front()).flatten() else {
        return Err(agent.internal_error("async generator completed a step with an empty queue"));
    };
    // 4. Let promiseCapability be next.[[Capability]].
    let capability = next.capability;
    // 5. Let value be completion.[[Value]].
    match completion {
        // 6. If completion is a throw completion, then
        //     a. Perform ! Call(promiseCapability.[[Reject]], undefined, « value »).
        Err(value) => capability.reject(agent, value),
        // 7. Else,
        Ok(value) => {
            // c. Let iteratorResult be CreateIteratorResultObject(value, done).
            let iterator_result = create_iter_result_object(agent, value, done);
            // d. Perform ! Call(promiseCapability.[[Resolve]], undefined, « iteratorResult »).
            capability.resolve(agent, Value::Object(iterator_result))
        }
    }
    // 8. Return unused.
}

/// ### [27.6.3.6 AsyncGeneratorResume ( generator, completion )](https://tc39.es/ecma262/#sec-asyncgeneratorresume)
///
/// Runs the body until it awaits, yields to an empty queue or completes.
/// Also continues a body suspended on an `await`.
pub(crate) fn async_generator_resume(
    agent: &Agent,
    generator: Object,
    completion: Resumption,
) -> JsResult<()> {
    // 1. Assert: generator.[[AsyncGeneratorState]] is either suspended-start
    // or suspended-yield.
    // 2. Let genContext be generator.[[AsyncGeneratorContext]].
    let Some(coroutine) = with_data(agent, generator, |data| data.coroutine).flatten() else {
        return Err(agent.internal_error("async generator has no context"));
    };
    // 5. Set generator.[[AsyncGeneratorState]] to executing.
    set_state(agent, generator, AsyncGeneratorState::Executing);
    let mut resumption = completion;
    loop {
        // 6. Push genContext onto the execution context stack; genContext is
        // now the running execution context.
        // 7. Resume the suspended evaluation of genContext using completion
        // as the result of the operation that suspended it. Let result be
        // the Completion Record returned by the resumed computation.
        let step = match coroutine.resume(agent, resumption) {
            Ok(step) => step,
            Err(error) => {
                set_state(agent, generator, AsyncGeneratorState::Completed);
                return Err(error);
            }
        };
        match step {
            CoroutineStep::Suspended(Suspension::Await(value)) => {
                let reaction = AwaitReaction::AsyncGenerator {
                    coroutine,
                    generator,
                };
                return await_promise(agent, value, reaction);
            }
            // AsyncGeneratorYield ( value )
            CoroutineStep::Suspended(Suspension::Yield(value)) => {
                // 9. Perform AsyncGeneratorCompleteStep(generator, completion,
                // false, previousRealm).
                async_generator_complete_step(agent, generator, Ok(value), false)?;
                // 10. Let queue be generator.[[AsyncGeneratorQueue]].
                // 11. If queue is not empty, then
                //     a. NOTE: Execution continues without suspending the generator.
                //     b. Let toYield be the first element of queue.
                //     c. Let resumptionValue be Completion(toYield.[[Completion]]).
                //     d. Return ? AsyncGeneratorUnwrapYieldResumption(resumptionValue).
                if let Some(to_yield) = queue_front(agent, generator) {
                    resumption = to_yield.completion;
                    continue;
                }
                // 12. Else,
                //     a. Set generator.[[AsyncGeneratorState]] to suspended-yield.
                set_state(agent, generator, AsyncGeneratorState::SuspendedYield);
                return Ok(());
            }
            // AsyncGeneratorStart 4.f to 4.k
            CoroutineStep::Complete(result) => {
                // g. Set acGenerator.[[AsyncGeneratorState]] to draining-queue.
                set_state(agent, generator, AsyncGeneratorState::DrainingQueue);
                // h. If result is a normal completion, set result to
                // NormalCompletion(undefined).
                // i. If result is a return completion, set result to
                // NormalCompletion(result.[[Value]]).
                let result = match result {
                    Ok(value) => Ok(value),
                    Err(JsError::Throw(error)) => Err(error),
                    Err(error) => {
                        set_state(agent, generator, AsyncGeneratorState::Completed);
                        return Err(error);
                    }
                };
                // j. Perform AsyncGeneratorCompleteStep(acGenerator, result, true).
                async_generator_complete_step(agent, generator, result, true)?;
                // k. Perform AsyncGeneratorDrainQueue(acGenerator).
                return async_generator_drain_queue(agent, generator);
            }
        }
    }
}

/// ### [27.6.3.9 AsyncGeneratorAwaitReturn ( generator )](https://tc39.es/ecma262/#sec-asyncgeneratorawaitreturn)
pub(crate) fn async_generator_await_return(agent: &Agent, generator: Object) -> JsResult<()> {
    // 1. Assert: generator.[[AsyncGeneratorState]] is draining-queue.
    // 2. Let queue be generator.[[AsyncGeneratorQueue]].
    // 3. Assert: queue is not empty.
    // 4. Let next be the first element of queue.
    // 5. Let completion be Completion(next.[[Completion]]).
    // 6. Assert: completion is a return completion.
    let Some(AsyncGeneratorRequest {
        completion: Resumption::Return(value),
        ..
    }) = queue_front(agent, generator)
    else {
        return Err(agent.internal_error("async generator awaited a return it was not asked for"));
    };
    // 7. Let promiseCompletion be Completion(PromiseResolve(%Promise%,
    // completion.[[Value]])).
    let promise = match promise_resolve(agent, agent.intrinsics().promise(), value) {
        Ok(promise) => promise,
        // 8. If promiseCompletion is an abrupt completion, then
        Err(JsError::Throw(error)) => {
            // a. Perform AsyncGeneratorCompleteStep(generator, promiseCompletion, true).
            async_generator_complete_step(agent, generator, Err(error), true)?;
            // b. Perform AsyncGeneratorDrainQueue(generator).
            // c. Return unused.
            return async_generator_drain_queue(agent, generator);
        }
        Err(error) => return Err(error),
    };
    // 11. Let fulfilledClosure be a new Abstract Closure with parameters
    // (value) that captures generator and performs the following steps when
    // called:
    // 12. Let onFulfilled be CreateBuiltinFunction(fulfilledClosure, 1, "", « »).
    let on_fulfilled = create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        // a. Assert: generator.[[AsyncGeneratorState]] is draining-queue.
        // b. Let result be NormalCompletion(value).
        // c. Perform AsyncGeneratorCompleteStep(generator, result, true).
        async_generator_complete_step(agent, generator, Ok(arguments.get(0)), true)?;
        // d. Perform AsyncGeneratorDrainQueue(generator).
        async_generator_drain_queue(agent, generator)?;
        // e. Return NormalCompletion(undefined).
        Ok(Value::Undefined)
    });
    // 13. Let rejectedClosure be a new Abstract Closure with parameters
    // (reason) that captures generator and performs the following steps
    // when called:
    // 14. Let onRejected be CreateBuiltinFunction(rejectedClosure, 1, "", « »).
    let on_rejected = create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        // b. Let result be ThrowCompletion(reason).
        // c. Perform AsyncGeneratorCompleteStep(generator, result, true).
        async_generator_complete_step(agent, generator, Err(arguments.get(0)), true)?;
        // d. Perform AsyncGeneratorDrainQueue(generator).
        async_generator_drain_queue(agent, generator)?;
        // e. Return NormalCompletion(undefined).
        Ok(Value::Undefined)
    });
    // 15. Perform PerformPromiseThen(promise, onFulfilled, onRejected).
    perform_promise_then(
        agent,
        promise,
        Value::Object(on_fulfilled),
        Value::Object(on_rejected),
        None,
    );
    // 16. Return unused.
    Ok(())
}

/// ### [27.6.3.10 AsyncGeneratorDrainQueue ( generator )](https://tc39.es/ecma262/#sec-asyncgeneratordrainqueue)
pub(crate) fn async_generator_drain_queue(agent: &Agent, generator: Object) -> JsResult<()> {
    // 1. Assert: generator.[[AsyncGeneratorState]] is draining-queue.
    // 2. Let queue be generator.[[AsyncGeneratorQueue]].
    // 3. If queue is empty, then
    //     a. Set generator.[[AsyncGeneratorState]] to completed.
    //     b. Return unused.
    // 4. Let done be false.
    // 5. Repeat, while done is false,
    //     a. Let next be the first element of queue.
    while let Some(next) = queue_front(agent, generator) {
        // b. Let completion be Completion(next.[[Completion]]).
        match next.completion {
            // c. If completion is a return completion, then
            //     i. Perform AsyncGeneratorAwaitReturn(generator).
            //     ii. Set done to true.
            Resumption::Return(_) => return async_generator_await_return(agent, generator),
            // d. Else,
            //     i. If completion is a normal completion, then
            //         1. Set completion to NormalCompletion(undefined).
            //     ii. Perform AsyncGeneratorCompleteStep(generator, completion, true).
            Resumption::Next(_) => {
                async_generator_complete_step(agent, generator, Ok(Value::Undefined), true)?
            }
            Resumption::Throw(error) => {
                async_generator_complete_step(agent, generator, Err(error), true)?
            }
        }
        //     iii. If queue is empty, then
        //         1. Set generator.[[AsyncGeneratorState]] to completed.
        //         2. Set done to true.
    }
    set_state(agent, generator, AsyncGeneratorState::Completed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::{run_after_jobs, run_to_string};

    #[test]
    fn requests_settle_in_order() {
        assert_eq!(
            run_after_jobs(
                "var log = [];
                 async function* g() { yield 1; yield await Promise.resolve(2); return 3; }
                 var it = g();
                 it.next().then((r) => log.push(r.value + ':' + r.done));
                 it.next().then((r) => log.push(r.value + ':' + r.done));
                 it.next().then((r) => log.push(r.value + ':' + r.done));
                 it.next().then((r) => log.push(r.value + ':' + r.done));",
                "log.join()"
            ),
            "1:false,2:false,3:true,undefined:true"
        );
    }

    #[test]
    fn return_on_a_fresh_generator_awaits_the_value() {
        assert_eq!(
            run_after_jobs(
                "var r, ran = false;
                 async function* g() { ran = true; yield 1; }
                 g().return(Promise.resolve('x')).then((res) => { r = res.value + ':' + res.done + ':' + ran; });",
                "r"
            ),
            "x:true:false"
        );
    }

    #[test]
    fn throw_on_a_fresh_generator_rejects() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 async function* g() { yield 1; }
                 var it = g();
                 it.throw('err').catch((e) => { r = e; });
                 it.next().then((res) => { r += ':' + res.done; });",
                "r"
            ),
            "err:true"
        );
    }

    #[test]
    fn return_runs_finally_blocks() {
        assert_eq!(
            run_after_jobs(
                "var log = [];
                 async function* g() { try { yield 1; } finally { log.push('finally'); } }
                 var it = g();
                 it.next().then(() => it.return('done')).then((r) => log.push(r.value));",
                "log.join()"
            ),
            "finally,done"
        );
    }

    #[test]
    fn invalid_receivers_reject_instead_of_throwing() {
        assert_eq!(
            run_after_jobs(
                "var r;
                 var next = Object.getPrototypeOf(async function* () {}).prototype.next;
                 next.call({}).catch((e) => { r = e.name; });",
                "r"
            ),
            "TypeError"
        );
    }

    #[test]
    fn for_await_consumes_async_generators() {
        assert_eq!(
            run_after_jobs(
                "var out = [];
                 async function* g() { yield 'a'; yield 'b'; }
                 (async () => { for await (const v of g()) out.push(v); })();",
                "out.join()"
            ),
            "a,b"
        );
        assert_eq!(
            run_to_string("Object.prototype.toString.call((async function* () {})())"),
            "[object AsyncGenerator]"
        );
    }
}
