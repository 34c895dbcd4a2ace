// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The tree-walking evaluator and the coroutines that suspend it.
//!
//! Every evaluation function is an `async fn` over the AST. Ordinary code is
//! polled exactly once with [`run_sync`] and must complete without
//! suspending. Generator and async function bodies are boxed into a
//! [`coroutine::CoroutineRecord`] and resumed by message passing, so `yield`
//! and `await` are plain `.await` points of the evaluator.

pub(crate) mod coroutine;
pub(crate) mod evaluator;

use std::{
    future::Future,
    pin::{Pin, pin},
    task::{Context, Poll, Waker},
};

use crate::ecmascript::execution::{Agent, JsResult};

/// A boxed evaluation step. Boxing breaks the recursion between the
/// evaluation families.
pub(crate) type EvalFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Drive an evaluation that cannot suspend to completion.
pub(crate) fn run_sync<T>(
    agent: &Agent,
    future: impl Future<Output = JsResult<T>>,
) -> JsResult<T> {
    let future = pin!(future);
    match future.poll(&mut Context::from_waker(Waker::noop())) {
        Poll::Ready(result) => result,
        Poll::Pending => Err(agent.internal_error("synchronous evaluation suspended")),
    }
}
