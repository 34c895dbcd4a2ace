// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.2.2 Promise Jobs](https://tc39.es/ecma262/#sec-promise-jobs)

use super::promise_abstract_operations::{
    PromiseReactionHandler, PromiseReactionRecord, PromiseReactionType,
    create_resolving_functions,
};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::{call_function, get_function_realm},
    execution::{
        Agent, JsError, JsResult,
        agent::{InnerJob, Job},
    },
    types::{Object, Value},
};

#[derive(Debug)]
pub(crate) struct PromiseResolveThenableJob {
    promise_to_resolve: Object,
    thenable: Object,
    then: Object,
}

impl PromiseResolveThenableJob {
    pub(crate) fn run(self, agent: &Agent) -> JsResult<()> {
        let Self {
            promise_to_resolve,
            thenable,
            then,
        } = self;
        // The following are substeps of point 1 in NewPromiseResolveThenableJob.
        // a. Let resolvingFunctions be CreateResolvingFunctions(promiseToResolve).
        let (resolve, reject) = create_resolving_functions(agent, promise_to_resolve);
        // b. Let thenCallResult be Completion(HostCallJobCallback(then,
        // thenable, « resolvingFunctions.[[Resolve]], resolvingFunctions.[[Reject]] »)).
        let then_call_result = call_function(
            agent,
            then,
            Value::Object(thenable),
            &[Value::Object(resolve), Value::Object(reject)],
        );
        match then_call_result {
            Ok(_) => Ok(()),
            // c. If thenCallResult is an abrupt completion, then
            Err(JsError::Throw(error)) => {
                // i. Return ? Call(resolvingFunctions.[[Reject]], undefined,
                // « thenCallResult.[[Value]] »).
                call_function(agent, reject, Value::Undefined, &[error]).map(|_| ())
            }
            Err(error) => Err(error),
        }
        // d. Return ? thenCallResult.
    }
}

/// ### [27.2.2.2 NewPromiseResolveThenableJob ( promiseToResolve, thenable, then )](https://tc39.es/ecma262/#sec-newpromiseresolvethenablejob)
pub(crate) fn new_promise_resolve_thenable_job(
    agent: &Agent,
    promise_to_resolve: Object,
    thenable: Object,
    then: Object,
) -> Job {
    // 2. Let getThenRealmResult be Completion(GetFunctionRealm(then.[[Callback]])).
    // 3. If getThenRealmResult is a normal completion, let thenRealm be
    // getThenRealmResult.[[Value]].
    // 4. Else, let thenRealm be the current Realm Record.
    let then_realm = get_function_realm(agent, then).unwrap_or_else(|_| agent.current_realm());
    // 6. Return the Record { [[Job]]: job, [[Realm]]: thenRealm }.
    Job {
        realm: Some(then_realm),
        inner: InnerJob::PromiseResolveThenable(PromiseResolveThenableJob {
            promise_to_resolve,
            thenable,
            then,
        }),
    }
}

#[derive(Debug)]
pub(crate) struct PromiseReactionJob {
    reaction: PromiseReactionRecord,
    argument: Value,
}

impl PromiseReactionJob {
    pub(crate) fn run(self, agent: &Agent) -> JsResult<()> {
        let Self { reaction, argument } = self;
        // The following are substeps of point 1 in NewPromiseReactionJob.
        let handler_result = match reaction.handler {
            PromiseReactionHandler::Empty => match reaction.reaction_type {
                // d.i.1. Let handlerResult be NormalCompletion(argument).
                PromiseReactionType::Fulfill => Ok(argument),
                // d.ii.1. Let handlerResult be ThrowCompletion(argument).
                PromiseReactionType::Reject => Err(JsError::Throw(argument)),
            },
            // e.1. Let handlerResult be Completion(HostCallJobCallback(handler,
            // undefined, « argument »)).
            PromiseReactionHandler::JobCallback(callback) => {
                call_function(agent, callback, Value::Undefined, &[argument])
            }
            PromiseReactionHandler::Await(await_reaction) => {
                // The continuation of an Await never has a capability and
                // never completes abruptly with an exception.
                await_reaction.resume(agent, reaction.reaction_type, argument)?;
                Ok(Value::Undefined)
            }
        };
        // f. If promiseCapability is undefined, then
        let Some(promise_capability) = reaction.capability else {
            // i. Assert: handlerResult is not an abrupt completion.
            // ii. Return empty.
            return match handler_result {
                Err(JsError::Internal(error)) => Err(JsError::Internal(error)),
                _ => Ok(()),
            };
        };
        match handler_result {
            // h. If handlerResult is an abrupt completion, then
            //     i. Return ? Call(promiseCapability.[[Reject]], undefined,
            //     « handlerResult.[[Value]] »).
            Err(JsError::Throw(error)) => promise_capability.reject(agent, error),
            Err(error) => Err(error),
            // i. Else,
            //     i. Return ? Call(promiseCapability.[[Resolve]], undefined,
            //     « handlerResult.[[Value]] »).
            Ok(value) => promise_capability.resolve(agent, value),
        }
    }
}

/// ### [27.2.2.1 NewPromiseReactionJob ( reaction, argument )](https://tc39.es/ecma262/#sec-newpromisereactionjob)
pub(crate) fn new_promise_reaction_job(
    agent: &Agent,
    reaction: PromiseReactionRecord,
    argument: Value,
) -> Job {
    let handler_realm = match reaction.handler {
        // 3. If reaction.[[Handler]] is not empty, then
        //     a. Let getHandlerRealmResult be
        //     Completion(GetFunctionRealm(reaction.[[Handler]].[[Callback]])).
        //     b. If getHandlerRealmResult is a normal completion, set
        //     handlerRealm to getHandlerRealmResult.[[Value]].
        //     c. Else, set handlerRealm to the current Realm Record.
        PromiseReactionHandler::JobCallback(callback) => {
            Some(get_function_realm(agent, callback).unwrap_or_else(|_| agent.current_realm()))
        }
        // Await continuations run in the realm of the suspended body.
        PromiseReactionHandler::Await(await_reaction) => Some(await_reaction.realm(agent)),
        // 2. Let handlerRealm be null.
        PromiseReactionHandler::Empty => None,
    };
    // 4. Return the Record { [[Job]]: job, [[Realm]]: handlerRealm }.
    Job {
        realm: handler_realm,
        inner: InnerJob::PromiseReaction(PromiseReactionJob { reaction, argument }),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_after_jobs;

    #[test]
    fn reactions_run_in_registration_order() {
        assert_eq!(
            run_after_jobs(
                "var log = [];
                 var p = Promise.resolve(1);
                 p.then(() => log.push('a'));
                 p.then(() => log.push('b'));
                 Promise.resolve().then(() => log.push('c'));
                 log.push('sync');",
                "log.join()"
            ),
            "sync,a,b,c"
        );
    }

    #[test]
    fn thenables_are_adopted_one_job_later() {
        assert_eq!(
            run_after_jobs(
                "var log = [];
                 var thenable = { then(resolve) { log.push('then'); resolve(42); } };
                 Promise.resolve(thenable).then((v) => log.push(v));
                 Promise.resolve().then(() => log.push('first'));
                 log.push('sync');",
                "log.join()"
            ),
            "sync,then,first,42"
        );
    }

    #[test]
    fn throwing_then_rejects_the_promise() {
        assert_eq!(
            run_after_jobs(
                "var result;
                 new Promise((resolve) => resolve({ then() { throw 'boom'; } }))
                     .catch((e) => { result = e; });",
                "result"
            ),
            "boom"
        );
    }
}
