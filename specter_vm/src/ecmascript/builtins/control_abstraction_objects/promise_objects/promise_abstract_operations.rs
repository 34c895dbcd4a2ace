// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.1 Promise Abstract Operations](https://tc39.es/ecma262/#sec-promise-abstract-operations)

use std::{cell::Cell, rc::Rc};

use super::{
    PromiseData, PromiseState,
    promise_jobs::{new_promise_reaction_job, new_promise_resolve_thenable_job},
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{call_function, construct, get},
        testing_and_comparison::{is_callable, is_constructor, same_value},
    },
    builtins::{
        builtin_function::{
            BuiltinClosure, create_anonymous_builtin_function, create_builtin_function,
        },
        control_abstraction_objects::async_function_objects::await_reaction::AwaitReaction,
    },
    execution::{
        Agent, JsError, JsResult,
        agent::{ExceptionType, JobQueueName, PromiseRejectionOperation},
    },
    types::{Object, ObjectKind, PropertyKey, Value},
};

/// ### [27.2.1.1 PromiseCapability Records](https://tc39.es/ecma262/#sec-promisecapability-records)
///
/// Promises created by the intrinsic %Promise% are settled directly; the
/// `[[Resolve]]` and `[[Reject]]` functions are only materialised for
/// promises of other constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PromiseCapability {
    /// A Promise instance created by %Promise%. Settling it through the
    /// capability honours the `is_resolved` flag of the pending promise.
    Intrinsic(Object),
    /// A promise-like object of a constructor other than %Promise%.
    Functions {
        promise: Object,
        resolve: Object,
        reject: Object,
    },
}

impl PromiseCapability {
    /// A capability for a fresh pending promise of the current realm.
    pub(crate) fn new_intrinsic(agent: &Agent) -> Self {
        PromiseCapability::Intrinsic(promise_create(agent))
    }

    /// ### \[\[Promise\]\]
    pub(crate) fn promise(self) -> Object {
        match self {
            PromiseCapability::Intrinsic(promise) => promise,
            PromiseCapability::Functions { promise, .. } => promise,
        }
    }

    /// Call the \[\[Resolve\]\] function of the capability.
    pub(crate) fn resolve(self, agent: &Agent, resolution: Value) -> JsResult<()> {
        match self {
            PromiseCapability::Intrinsic(promise) => {
                if !mark_resolved(agent, promise) {
                    return Ok(());
                }
                resolve_promise(agent, promise, resolution);
                Ok(())
            }
            PromiseCapability::Functions { resolve, .. } => {
                call_function(agent, resolve, Value::Undefined, &[resolution]).map(|_| ())
            }
        }
    }

    /// Call the \[\[Reject\]\] function of the capability.
    pub(crate) fn reject(self, agent: &Agent, reason: Value) -> JsResult<()> {
        match self {
            PromiseCapability::Intrinsic(promise) => {
                if !mark_resolved(agent, promise) {
                    return Ok(());
                }
                reject_promise(agent, promise, reason);
                Ok(())
            }
            PromiseCapability::Functions { reject, .. } => {
                call_function(agent, reject, Value::Undefined, &[reason]).map(|_| ())
            }
        }
    }
}

impl PromiseCapability {
    /// The \[\[Resolve\]\] function of the capability as a function object.
    pub(crate) fn resolve_function(self, agent: &Agent) -> Object {
        match self {
            PromiseCapability::Intrinsic(_) => {
                create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
                    self.resolve(agent, arguments.get(0))?;
                    Ok(Value::Undefined)
                })
            }
            PromiseCapability::Functions { resolve, .. } => resolve,
        }
    }

    /// The \[\[Reject\]\] function of the capability as a function object.
    pub(crate) fn reject_function(self, agent: &Agent) -> Object {
        match self {
            PromiseCapability::Intrinsic(_) => {
                create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
                    self.reject(agent, arguments.get(0))?;
                    Ok(Value::Undefined)
                })
            }
            PromiseCapability::Functions { reject, .. } => reject,
        }
    }
}

/// Set the `is_resolved` flag of a pending promise. Returns false if the
/// promise was already resolved or settled.
fn mark_resolved(agent: &Agent, promise: Object) -> bool {
    match &mut agent.object_mut(promise).kind {
        ObjectKind::Promise(data) => match &mut data.state {
            PromiseState::Pending { is_resolved, .. } if !*is_resolved => {
                *is_resolved = true;
                true
            }
            _ => false,
        },
        _ => false,
    }
}

/// ### [27.2.1.1.1 IfAbruptRejectPromise ( value, capability )](https://tc39.es/ecma262/#sec-ifabruptrejectpromise)
///
/// Returns the promise of the capability after rejecting it, or the
/// unwrapped value.
pub(crate) fn if_abrupt_reject_promise<T>(
    agent: &Agent,
    value: JsResult<T>,
    capability: PromiseCapability,
) -> JsResult<Result<T, Value>> {
    match value {
        Ok(value) => Ok(Ok(value)),
        // 1. Assert: value is a Completion Record.
        // 2. If value is an abrupt completion, then
        Err(JsError::Throw(error)) => {
            // a. Perform ? Call(capability.[[Reject]], undefined, « value.[[Value]] »).
            capability.reject(agent, error)?;
            // b. Return capability.[[Promise]].
            Ok(Err(Value::Object(capability.promise())))
        }
        Err(error) => Err(error),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromiseReactionType {
    Fulfill,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PromiseReactionHandler {
    /// ### [9.5.1 JobCallback Records](https://tc39.es/ecma262/#sec-jobcallback-records)
    JobCallback(Object),
    /// Resume a coroutine suspended in Await.
    Await(AwaitReaction),
    /// Pass the value through to the derived promise.
    Empty,
}

/// ### [27.2.1.2 PromiseReaction Records](https://tc39.es/ecma262/#sec-promisereaction-records)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PromiseReactionRecord {
    /// ### \[\[Capability\]\]
    pub(crate) capability: Option<PromiseCapability>,
    /// ### \[\[Type\]\]
    pub(crate) reaction_type: PromiseReactionType,
    /// ### \[\[Handler\]\]
    pub(crate) handler: PromiseReactionHandler,
}

/// ### [27.2.1.3 CreateResolvingFunctions ( promise )](https://tc39.es/ecma262/#sec-createresolvingfunctions)
pub(crate) fn create_resolving_functions(agent: &Agent, promise: Object) -> (Object, Object) {
    // 1. Let alreadyResolved be the Record { [[Value]]: false }.
    let already_resolved = Rc::new(Cell::new(false));
    // 2. Let stepsResolve be the algorithm steps defined in Promise Resolve
    // Functions.
    // 3. Let lengthResolve be the number of non-optional parameters of the
    // function definition in Promise Resolve Functions.
    // 4. Let resolve be CreateBuiltinFunction(stepsResolve, lengthResolve,
    // "", « [[Promise]], [[AlreadyResolved]] »).
    // 5. Set resolve.[[Promise]] to promise.
    // 6. Set resolve.[[AlreadyResolved]] to alreadyResolved.
    let resolve = {
        let already_resolved = already_resolved.clone();
        create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
            // ### [27.2.1.3.2 Promise Resolve Functions](https://tc39.es/ecma262/#sec-promise-resolve-functions)
            // 5. If alreadyResolved.[[Value]] is true, return undefined.
            if already_resolved.replace(true) {
                return Ok(Value::Undefined);
            }
            // 6. Set alreadyResolved.[[Value]] to true.
            resolve_promise(agent, promise, arguments.get(0));
            Ok(Value::Undefined)
        })
    };
    // 7. Let stepsReject be the algorithm steps defined in Promise Reject
    // Functions.
    // 9. Let reject be CreateBuiltinFunction(stepsReject, lengthReject, "",
    // « [[Promise]], [[AlreadyResolved]] »).
    // 10. Set reject.[[Promise]] to promise.
    // 11. Set reject.[[AlreadyResolved]] to alreadyResolved.
    let reject = create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        // ### [27.2.1.3.1 Promise Reject Functions](https://tc39.es/ecma262/#sec-promise-reject-functions)
        // 5. If alreadyResolved.[[Value]] is true, return undefined.
        if already_resolved.replace(true) {
            return Ok(Value::Undefined);
        }
        // 6. Set alreadyResolved.[[Value]] to true.
        // 7. Perform RejectPromise(promise, reason).
        reject_promise(agent, promise, arguments.get(0));
        // 8. Return undefined.
        Ok(Value::Undefined)
    });
    // 12. Return the Record { [[Resolve]]: resolve, [[Reject]]: reject }.
    (resolve, reject)
}

/// Steps 7 to 16 of
/// [27.2.1.3.2 Promise Resolve Functions](https://tc39.es/ecma262/#sec-promise-resolve-functions):
/// resolve `promise` with `resolution` once the AlreadyResolved check
/// passed.
pub(crate) fn resolve_promise(agent: &Agent, promise: Object, resolution: Value) {
    // 7. If SameValue(resolution, promise) is true, then
    if same_value(agent, resolution, Value::Object(promise)) {
        // a. Let selfResolutionError be a newly created TypeError object.
        let self_resolution_error = agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Chaining cycle detected for promise",
        );
        // b. Perform RejectPromise(promise, selfResolutionError).
        // c. Return undefined.
        if let Some(error) = self_resolution_error.value() {
            reject_promise(agent, promise, error);
        }
        return;
    }
    // 8. If resolution is not an Object, then
    let Value::Object(thenable) = resolution else {
        // a. Perform FulfillPromise(promise, resolution).
        // b. Return undefined.
        fulfill_promise(agent, promise, resolution);
        return;
    };
    // 9. Let then be Completion(Get(resolution, "then")).
    let then = get(agent, thenable, PropertyKey::from_str(agent, "then"));
    let then_action = match then {
        // 10. If then is an abrupt completion, then
        Err(error) => {
            // a. Perform RejectPromise(promise, then.[[Value]]).
            // b. Return undefined.
            if let Some(error) = error.value() {
                reject_promise(agent, promise, error);
            }
            return;
        }
        // 11. Let thenAction be then.[[Value]].
        Ok(then_action) => then_action,
    };
    // 12. If IsCallable(thenAction) is false, then
    let Some(then_action) = as_callable(agent, then_action) else {
        // a. Perform FulfillPromise(promise, resolution).
        // b. Return undefined.
        fulfill_promise(agent, promise, resolution);
        return;
    };
    // 13. Let thenJobCallback be HostMakeJobCallback(thenAction).
    // 14. Let job be NewPromiseResolveThenableJob(promise, resolution,
    // thenJobCallback).
    let job = new_promise_resolve_thenable_job(agent, promise, thenable, then_action);
    // 15. Perform HostEnqueuePromiseJob(job.[[Job]], job.[[Realm]]).
    agent.enqueue_job(JobQueueName::PromiseJobs, job);
    // 16. Return undefined.
}

/// The value as a function object if it is callable.
pub(crate) fn as_callable(agent: &Agent, value: Value) -> Option<Object> {
    match value {
        Value::Object(object) if is_callable(agent, value) => Some(object),
        _ => None,
    }
}

/// Move a pending promise to a settled state, returning the reactions of
/// the settled kind. Settled promises are left untouched.
fn settle(
    agent: &Agent,
    promise: Object,
    state: PromiseState,
) -> Option<Vec<PromiseReactionRecord>> {
    let fulfilled = matches!(state, PromiseState::Fulfilled(_));
    let mut object = agent.object_mut(promise);
    let ObjectKind::Promise(data) = &mut object.kind else {
        return None;
    };
    if !matches!(data.state, PromiseState::Pending { .. }) {
        return None;
    }
    match std::mem::replace(&mut data.state, state) {
        PromiseState::Pending {
            fulfill_reactions,
            reject_reactions,
            ..
        } => Some(if fulfilled {
            fulfill_reactions
        } else {
            reject_reactions
        }),
        _ => None,
    }
}

/// ### [27.2.1.4 FulfillPromise ( promise, value )](https://tc39.es/ecma262/#sec-fulfillpromise)
pub(crate) fn fulfill_promise(agent: &Agent, promise: Object, value: Value) {
    // 1. Assert: The value of promise.[[PromiseState]] is PENDING.
    // 2. Let reactions be promise.[[PromiseFulfillReactions]].
    // 3. Set promise.[[PromiseResult]] to value.
    // 4. Set promise.[[PromiseFulfillReactions]] to undefined.
    // 5. Set promise.[[PromiseRejectReactions]] to undefined.
    // 6. Set promise.[[PromiseState]] to FULFILLED.
    let Some(reactions) = settle(agent, promise, PromiseState::Fulfilled(value)) else {
        return;
    };
    // 7. Perform TriggerPromiseReactions(reactions, value).
    trigger_promise_reactions(agent, reactions, value);
    // 8. Return UNUSED.
}

/// ### [27.2.1.7 RejectPromise ( promise, reason )](https://tc39.es/ecma262/#sec-rejectpromise)
pub(crate) fn reject_promise(agent: &Agent, promise: Object, reason: Value) {
    // 1. Assert: The value of promise.[[PromiseState]] is PENDING.
    // 2. Let reactions be promise.[[PromiseRejectReactions]].
    // 3. Set promise.[[PromiseResult]] to reason.
    // 4. Set promise.[[PromiseFulfillReactions]] to undefined.
    // 5. Set promise.[[PromiseRejectReactions]] to undefined.
    // 6. Set promise.[[PromiseState]] to REJECTED.
    let Some(reactions) = settle(agent, promise, PromiseState::Rejected(reason)) else {
        return;
    };
    // 7. If promise.[[PromiseIsHandled]] is false, perform
    // HostPromiseRejectionTracker(promise, "reject").
    if !promise_is_handled(agent, promise) {
        agent
            .host_hooks()
            .promise_rejection_tracker(agent, promise, PromiseRejectionOperation::Reject);
    }
    // 8. Perform TriggerPromiseReactions(reactions, reason).
    trigger_promise_reactions(agent, reactions, reason);
    // 9. Return UNUSED.
}

fn promise_is_handled(agent: &Agent, promise: Object) -> bool {
    match &agent.object(promise).kind {
        ObjectKind::Promise(data) => data.is_handled,
        _ => true,
    }
}

/// ### [27.2.1.8 TriggerPromiseReactions ( reactions, argument )](https://tc39.es/ecma262/#sec-triggerpromisereactions)
fn trigger_promise_reactions(
    agent: &Agent,
    reactions: Vec<PromiseReactionRecord>,
    argument: Value,
) {
    // 1. For each element reaction of reactions, do
    for reaction in reactions {
        // a. Let job be NewPromiseReactionJob(reaction, argument).
        let job = new_promise_reaction_job(agent, reaction, argument);
        // b. Perform HostEnqueuePromiseJob(job.[[Job]], job.[[Realm]]).
        agent.enqueue_job(JobQueueName::PromiseJobs, job);
    }
    // 2. Return UNUSED.
}

/// ### [27.2.1.5 NewPromiseCapability ( C )](https://tc39.es/ecma262/#sec-newpromisecapability)
pub(crate) fn new_promise_capability(agent: &Agent, c: Value) -> JsResult<PromiseCapability> {
    // 1. If IsConstructor(C) is false, throw a TypeError exception.
    let c = match c {
        Value::Object(object) if is_constructor(agent, c) => object,
        _ => {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("{} is not a constructor", c.to_display_string(agent)),
            ));
        }
    };
    if c == agent.intrinsics().promise() {
        return Ok(PromiseCapability::new_intrinsic(agent));
    }
    // 2. NOTE: C is assumed to be a constructor function that supports the
    // parameter conventions of the Promise constructor.
    // 3. Let resolvingFunctions be the Record { [[Resolve]]: undefined,
    // [[Reject]]: undefined }.
    let resolving_functions: Rc<Cell<(Value, Value)>> =
        Rc::new(Cell::new((Value::Undefined, Value::Undefined)));
    // 4. Let executorClosure be a new Abstract Closure with parameters
    // (resolve, reject) that captures resolvingFunctions and performs the
    // following steps when called:
    let captured = resolving_functions.clone();
    let executor_closure: BuiltinClosure = Rc::new(move |agent, _, arguments, _| {
        let (current_resolve, current_reject) = captured.get();
        // a. If resolvingFunctions.[[Resolve]] is not undefined, throw a
        // TypeError exception.
        // b. If resolvingFunctions.[[Reject]] is not undefined, throw a
        // TypeError exception.
        if !current_resolve.is_undefined() || !current_reject.is_undefined() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Promise executor has already been invoked",
            ));
        }
        // c. Set resolvingFunctions.[[Resolve]] to resolve.
        // d. Set resolvingFunctions.[[Reject]] to reject.
        captured.set((arguments.get(0), arguments.get(1)));
        // e. Return undefined.
        Ok(Value::Undefined)
    });
    // 5. Let executor be CreateBuiltinFunction(executorClosure, 2, "", « »).
    let executor = create_builtin_function(
        agent,
        executor_closure,
        2,
        PropertyKey::from_str(agent, ""),
        false,
    );
    // 6. Let promise be ? Construct(C, « executor »).
    let promise = construct(agent, c, &[Value::Object(executor)], None)?;
    let (resolve, reject) = resolving_functions.get();
    // 7. If IsCallable(resolvingFunctions.[[Resolve]]) is false, throw a
    // TypeError exception.
    // 8. If IsCallable(resolvingFunctions.[[Reject]]) is false, throw a
    // TypeError exception.
    let (Some(resolve), Some(reject)) = (as_callable(agent, resolve), as_callable(agent, reject))
    else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Promise resolve or reject function is not callable",
        ));
    };
    // 9. Return the PromiseCapability Record { [[Promise]]: promise,
    // [[Resolve]]: resolvingFunctions.[[Resolve]], [[Reject]]:
    // resolvingFunctions.[[Reject]] }.
    Ok(PromiseCapability::Functions {
        promise,
        resolve,
        reject,
    })
}

/// ### [27.2.1.6 IsPromise ( x )](https://tc39.es/ecma262/#sec-ispromise)
pub(crate) fn is_promise(agent: &Agent, x: Value) -> bool {
    // 1. If x is not an Object, return false.
    // 2. If x does not have a [[PromiseState]] internal slot, return false.
    // 3. Return true.
    match x {
        Value::Object(x) => matches!(agent.object(x).kind, ObjectKind::Promise(_)),
        _ => false,
    }
}

/// A new pending Promise of the current realm: the Promise of
/// NewPromiseCapability(%Promise%).
pub(crate) fn promise_create(agent: &Agent) -> Object {
    let prototype = agent.intrinsics().promise_prototype();
    Object::create(
        agent,
        Some(prototype),
        ObjectKind::Promise(Box::<PromiseData>::default()),
    )
}

/// ### [27.2.4.7.1 PromiseResolve ( C, x )](https://tc39.es/ecma262/#sec-promise-resolve)
pub(crate) fn promise_resolve(agent: &Agent, c: Object, x: Value) -> JsResult<Object> {
    // 1. If IsPromise(x) is true, then
    if let Value::Object(promise) = x
        && is_promise(agent, x)
    {
        // a. Let xConstructor be ? Get(x, "constructor").
        let x_constructor = get(agent, promise, PropertyKey::from_str(agent, "constructor"))?;
        // b. If SameValue(xConstructor, C) is true, return x.
        if same_value(agent, x_constructor, Value::Object(c)) {
            return Ok(promise);
        }
    }
    // 2. Let promiseCapability be ? NewPromiseCapability(C).
    let promise_capability = new_promise_capability(agent, Value::Object(c))?;
    // 3. Perform ? Call(promiseCapability.[[Resolve]], undefined, « x »).
    promise_capability.resolve(agent, x)?;
    // 4. Return promiseCapability.[[Promise]].
    Ok(promise_capability.promise())
}

/// ### [27.2.5.4.1 PerformPromiseThen ( promise, onFulfilled, onRejected \[ , resultCapability \] )](https://tc39.es/ecma262/#sec-performpromisethen)
pub(crate) fn perform_promise_then(
    agent: &Agent,
    promise: Object,
    on_fulfilled: Value,
    on_rejected: Value,
    result_capability: Option<PromiseCapability>,
) {
    // 1. Assert: IsPromise(promise) is true.
    // 3. If IsCallable(onFulfilled) is false, then
    //     a. Let onFulfilledJobCallback be EMPTY.
    // 4. Else,
    //     a. Let onFulfilledJobCallback be HostMakeJobCallback(onFulfilled).
    let on_fulfilled = as_callable(agent, on_fulfilled)
        .map_or(PromiseReactionHandler::Empty, PromiseReactionHandler::JobCallback);
    // 5. If IsCallable(onRejected) is false, then
    //     a. Let onRejectedJobCallback be EMPTY.
    // 6. Else,
    //     a. Let onRejectedJobCallback be HostMakeJobCallback(onRejected).
    let on_rejected = as_callable(agent, on_rejected)
        .map_or(PromiseReactionHandler::Empty, PromiseReactionHandler::JobCallback);
    perform_promise_then_with_handlers(
        agent,
        promise,
        on_fulfilled,
        on_rejected,
        result_capability,
    );
}

/// PerformPromiseThen from step 7, with the reaction handlers already
/// chosen.
pub(crate) fn perform_promise_then_with_handlers(
    agent: &Agent,
    promise: Object,
    on_fulfilled: PromiseReactionHandler,
    on_rejected: PromiseReactionHandler,
    result_capability: Option<PromiseCapability>,
) {
    // 7. Let fulfillReaction be the PromiseReaction Record { [[Capability]]:
    // resultCapability, [[Type]]: FULFILL, [[Handler]]: onFulfilledJobCallback }.
    let fulfill_reaction = PromiseReactionRecord {
        capability: result_capability,
        reaction_type: PromiseReactionType::Fulfill,
        handler: on_fulfilled,
    };
    // 8. Let rejectReaction be the PromiseReaction Record { [[Capability]]:
    // resultCapability, [[Type]]: REJECT, [[Handler]]: onRejectedJobCallback }.
    let reject_reaction = PromiseReactionRecord {
        capability: result_capability,
        reaction_type: PromiseReactionType::Reject,
        handler: on_rejected,
    };
    let (settled, was_handled) = {
        let mut object = agent.object_mut(promise);
        let ObjectKind::Promise(data) = &mut object.kind else {
            return;
        };
        let was_handled = data.is_handled;
        // 12. Set promise.[[PromiseIsHandled]] to true.
        data.is_handled = true;
        match &mut data.state {
            // 9. If promise.[[PromiseState]] is PENDING, then
            PromiseState::Pending {
                fulfill_reactions,
                reject_reactions,
                ..
            } => {
                // a. Append fulfillReaction to promise.[[PromiseFulfillReactions]].
                fulfill_reactions.push(fulfill_reaction);
                // b. Append rejectReaction to promise.[[PromiseRejectReactions]].
                reject_reactions.push(reject_reaction);
                (None, was_handled)
            }
            // 10. Else if promise.[[PromiseState]] is FULFILLED, then
            //     a. Let value be promise.[[PromiseResult]].
            PromiseState::Fulfilled(value) => (Some((fulfill_reaction, *value)), was_handled),
            // 11. Else,
            //     a. Assert: The value of promise.[[PromiseState]] is REJECTED.
            //     b. Let reason be promise.[[PromiseResult]].
            PromiseState::Rejected(reason) => (Some((reject_reaction, *reason)), was_handled),
        }
    };
    if let Some((reaction, argument)) = settled {
        // 11.c. If promise.[[PromiseIsHandled]] is false, perform
        // HostPromiseRejectionTracker(promise, "handle").
        if reaction.reaction_type == PromiseReactionType::Reject && !was_handled {
            agent
                .host_hooks()
                .promise_rejection_tracker(agent, promise, PromiseRejectionOperation::Handle);
        }
        // 10.b / 11.d. Let job be NewPromiseReactionJob(reaction, argument).
        let job = new_promise_reaction_job(agent, reaction, argument);
        // Perform HostEnqueuePromiseJob(fulfillJob.[[Job]], fulfillJob.[[Realm]]).
        agent.enqueue_job(JobQueueName::PromiseJobs, job);
    }
    // 13. If resultCapability is undefined, then
    //     a. Return undefined.
    // 14. Else,
    //     a. Return resultCapability.[[Promise]].
}

/// The settled state of a promise: Some(Ok(value)) when fulfilled,
/// Some(Err(reason)) when rejected.
pub(crate) fn promise_settled_state(
    agent: &Agent,
    promise: Object,
) -> Option<Result<Value, Value>> {
    match &agent.object(promise).kind {
        ObjectKind::Promise(data) => match data.state {
            PromiseState::Pending { .. } => None,
            PromiseState::Fulfilled(value) => Some(Ok(value)),
            PromiseState::Rejected(reason) => Some(Err(reason)),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, agent::Options};

    #[test]
    fn settling_twice_keeps_the_first_result() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        let capability = PromiseCapability::new_intrinsic(&agent);
        capability.resolve(&agent, Value::Number(1.0)).unwrap();
        capability.reject(&agent, Value::Number(2.0)).unwrap();
        assert_eq!(
            promise_settled_state(&agent, capability.promise()),
            Some(Ok(Value::Number(1.0)))
        );
        assert!(is_promise(&agent, Value::Object(capability.promise())));
        assert!(!is_promise(&agent, Value::Undefined));
    }

    #[test]
    fn resolving_with_a_thenable_defers_to_a_job() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        let promise = promise_create(&agent);
        let thenable = promise_create(&agent);
        resolve_promise(&agent, promise, Value::Object(thenable));
        assert_eq!(promise_settled_state(&agent, promise), None);
        assert_eq!(agent.pending_job_count(), 1);
    }
}
