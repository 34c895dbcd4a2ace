// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The continuation of an `await`: a promise reaction that resumes the
//! suspended body of an async function or async generator.

use super::async_function_resume;
use crate::{
    ecmascript::{
        builtins::control_abstraction_objects::{
            async_generator_objects::async_generator_resume,
            promise_objects::promise_abstract_operations::{
                PromiseReactionHandler, PromiseReactionType, perform_promise_then_with_handlers,
                promise_resolve,
            },
        },
        execution::{Agent, JsError, JsResult, Realm},
        types::{Object, Value},
    },
    engine::coroutine::{Coroutine, Resumption},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AwaitReaction {
    /// The body of an async function settling `promise` on completion.
    AsyncFunction { coroutine: Coroutine, promise: Object },
    AsyncGenerator { coroutine: Coroutine, generator: Object },
}

impl AwaitReaction {
    fn coroutine(self) -> Coroutine {
        match self {
            AwaitReaction::AsyncFunction { coroutine, .. }
            | AwaitReaction::AsyncGenerator { coroutine, .. } => coroutine,
        }
    }

    /// The realm the suspended body runs in.
    pub(crate) fn realm(self, agent: &Agent) -> Realm {
        self.coroutine().context(agent).realm
    }

    /// Resume the suspended body with the settled value of the awaited
    /// promise.
    pub(crate) fn resume(
        self,
        agent: &Agent,
        reaction_type: PromiseReactionType,
        value: Value,
    ) -> JsResult<()> {
        let resumption = match reaction_type {
            PromiseReactionType::Fulfill => Resumption::Next(value),
            PromiseReactionType::Reject => Resumption::Throw(value),
        };
        match self {
            AwaitReaction::AsyncFunction { coroutine, promise } => {
                async_function_resume(agent, coroutine, promise, resumption)
            }
            AwaitReaction::AsyncGenerator { generator, .. } => {
                async_generator_resume(agent, generator, resumption)
            }
        }
    }
}

/// ### [27.7.5.3 Await ( value )](https://tc39.es/ecma262/#await)
///
/// The part of Await that runs after the body suspended: subscribe the
/// continuation to the resolved promise.
pub(crate) fn await_promise(agent: &Agent, value: Value, reaction: AwaitReaction) -> JsResult<()> {
    // 2. Let promise be ? PromiseResolve(%Promise%, value).
    let promise = match promise_resolve(agent, agent.intrinsics().promise(), value) {
        Ok(promise) => promise,
        // The body continues with the throw completion.
        Err(JsError::Throw(error)) => {
            return reaction.resume(agent, PromiseReactionType::Reject, error);
        }
        Err(error) => return Err(error),
    };
    // 3-7. Let onFulfilled and onRejected resume asyncContext.
    // 9. Perform PerformPromiseThen(promise, onFulfilled, onRejected).
    perform_promise_then_with_handlers(
        agent,
        promise,
        PromiseReactionHandler::Await(reaction),
        PromiseReactionHandler::Await(reaction),
        None,
    );
    Ok(())
}
