// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Suspendable evaluation of generator and async function bodies.
//!
//! A coroutine owns the boxed future evaluating a body and the execution
//! context the body runs in. [`Coroutine::resume`] pushes that context,
//! polls the future once and reports whether the body completed or
//! suspended. The body suspends by awaiting [`suspend`], which leaves a
//! [`Suspension`] in the record for the driver and picks up the
//! [`Resumption`] the driver left before polling again.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use crate::ecmascript::{
    execution::{Agent, ExecutionContext, JsError, JsResult},
    types::Value,
};

/// Handle to a coroutine of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Coroutine(pub(crate) u32);

pub(crate) type CoroutineBody = Pin<Box<dyn Future<Output = JsResult<Value>>>>;

pub(crate) struct CoroutineRecord {
    /// None while the body is being polled, and once it completed.
    future: Option<CoroutineBody>,
    resumption: Option<Resumption>,
    suspension: Option<Suspension>,
    /// The execution context of the body while it is suspended.
    context: ExecutionContext,
}

impl std::fmt::Debug for CoroutineRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoroutineRecord")
            .field("suspended", &self.future.is_some())
            .field("resumption", &self.resumption)
            .field("suspension", &self.suspension)
            .field("context", &self.context)
            .finish()
    }
}

impl CoroutineRecord {
    pub(crate) fn take_future(&mut self) -> Option<CoroutineBody> {
        self.future.take()
    }
}

/// The completion a suspended body is resumed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resumption {
    Next(Value),
    Throw(Value),
    Return(Value),
}

/// Why a body suspended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Suspension {
    Yield(Value),
    Await(Value),
}

#[derive(Debug)]
pub(crate) enum CoroutineStep {
    Suspended(Suspension),
    Complete(JsResult<Value>),
}

impl Coroutine {
    /// Create a suspended coroutine that evaluates `body` in `context`.
    /// Nothing runs until the first resume.
    pub(crate) fn new(agent: &Agent, mut context: ExecutionContext, body: CoroutineBody) -> Self {
        let mut heap = agent.heap_mut();
        let coroutine = Coroutine(u32::try_from(heap.coroutines.len()).unwrap_or(u32::MAX));
        context.coroutine = Some(coroutine);
        heap.coroutines.push(CoroutineRecord {
            future: Some(body),
            resumption: None,
            suspension: None,
            context,
        });
        coroutine
    }

    pub(crate) fn context(self, agent: &Agent) -> ExecutionContext {
        agent.heap().coroutines[self.0 as usize].context
    }

    /// Run the body until it suspends or completes.
    pub(crate) fn resume(self, agent: &Agent, resumption: Resumption) -> JsResult<CoroutineStep> {
        let taken = {
            let mut heap = agent.heap_mut();
            let record = &mut heap.coroutines[self.0 as usize];
            record.future.take().map(|future| {
                record.resumption = Some(resumption);
                record.suspension = None;
                (future, record.context)
            })
        };
        let Some((mut future, context)) = taken else {
            return Err(agent.internal_error("resumed a running or completed coroutine"));
        };
        let depth = agent.execution_context_depth();
        agent.push_execution_context(context);
        let poll = future
            .as_mut()
            .poll(&mut Context::from_waker(Waker::noop()));
        // The body may have replaced its lexical environment before it
        // suspended.
        if agent.execution_context_depth() == depth + 1 {
            if let Some(context) = agent.try_running_execution_context() {
                agent.heap_mut().coroutines[self.0 as usize].context = context;
            }
        }
        agent.truncate_execution_context_stack(depth);
        match poll {
            Poll::Ready(result) => {
                drop(future);
                let mut heap = agent.heap_mut();
                let record = &mut heap.coroutines[self.0 as usize];
                record.resumption = None;
                record.suspension = None;
                Ok(CoroutineStep::Complete(result))
            }
            Poll::Pending => {
                let suspension = agent.heap_mut().coroutines[self.0 as usize]
                    .suspension
                    .take();
                match suspension {
                    Some(suspension) => {
                        agent.heap_mut().coroutines[self.0 as usize].future = Some(future);
                        Ok(CoroutineStep::Suspended(suspension))
                    }
                    None => {
                        drop(future);
                        Err(agent.internal_error("coroutine body stalled without suspending"))
                    }
                }
            }
        }
    }

    /// Drop a suspended body without running it any further.
    pub(crate) fn abandon(self, agent: &Agent) {
        let future = agent.heap_mut().coroutines[self.0 as usize].future.take();
        drop(future);
    }
}

/// Future that suspends the running coroutine once.
struct Suspend<'a> {
    agent: &'a Agent,
    coroutine: Coroutine,
    suspension: Option<Suspension>,
}

impl Future for Suspend<'_> {
    type Output = JsResult<Resumption>;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let index = self.coroutine.0 as usize;
        if let Some(suspension) = self.suspension.take() {
            self.agent.heap_mut().coroutines[index].suspension = Some(suspension);
            return Poll::Pending;
        }
        let resumption = self.agent.heap_mut().coroutines[index].resumption.take();
        Poll::Ready(
            resumption.ok_or_else(|| {
                self.agent.internal_error("coroutine resumed without a value")
            }),
        )
    }
}

/// Suspend the body of the running coroutine with `suspension` and return
/// the resumption it is eventually resumed with.
pub(crate) async fn suspend(agent: &Agent, suspension: Suspension) -> JsResult<Resumption> {
    let Some(coroutine) = agent
        .try_running_execution_context()
        .and_then(|context| context.coroutine)
    else {
        return Err(agent.internal_error("suspended outside of a coroutine"));
    };
    Suspend {
        agent,
        coroutine,
        suspension: Some(suspension),
    }
    .await
}

/// ### [27.7.5.3 Await ( value )](https://tc39.es/ecma262/#await)
///
/// The driver of the coroutine resolves `value` and resumes the body with
/// the settled result.
pub(crate) async fn await_value(agent: &Agent, value: Value) -> JsResult<Value> {
    match suspend(agent, Suspension::Await(value)).await? {
        Resumption::Next(value) => Ok(value),
        Resumption::Throw(error) => Err(JsError::Throw(error)),
        Resumption::Return(_) => Err(agent.internal_error("await resumed with a return")),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, agent::Options};

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    fn context(agent: &Agent) -> ExecutionContext {
        ExecutionContext {
            ecmascript_code: None,
            function: None,
            realm: agent.current_realm(),
            script_or_module: None,
            coroutine: None,
        }
    }

    #[test]
    fn suspends_and_resumes_with_values() {
        let agent = agent();
        let handle = agent.handle();
        let body: CoroutineBody = Box::pin(async move {
            let agent = handle;
            let first = match suspend(&agent, Suspension::Yield(Value::Number(1.0))).await? {
                Resumption::Next(value) => value,
                _ => Value::Null,
            };
            Ok(first)
        });
        let coroutine = Coroutine::new(&agent, context(&agent), body);
        let step = coroutine
            .resume(&agent, Resumption::Next(Value::Undefined))
            .unwrap();
        assert!(matches!(
            step,
            CoroutineStep::Suspended(Suspension::Yield(Value::Number(n))) if n == 1.0
        ));
        assert_eq!(agent.execution_context_depth(), 0);
        let step = coroutine
            .resume(&agent, Resumption::Next(Value::Boolean(true)))
            .unwrap();
        assert!(matches!(
            step,
            CoroutineStep::Complete(Ok(Value::Boolean(true)))
        ));
        assert!(agent.heap().coroutines[coroutine.0 as usize].future.is_none());
        assert!(coroutine.resume(&agent, Resumption::Next(Value::Undefined)).is_err());
    }

    #[test]
    fn suspending_outside_a_coroutine_is_an_internal_error() {
        let agent = agent();
        let result = crate::engine::run_sync(&agent, async {
            suspend(&agent, Suspension::Await(Value::Undefined))
                .await
                .map(|_| ())
        });
        assert!(matches!(result, Err(JsError::Internal(_))));
    }
}
