// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{
    cell::{Ref, RefCell, RefMut},
    collections::VecDeque,
    rc::Rc,
};

use specter_ast::ast::Module;
use thiserror::Error;

use super::{
    EnvironmentIndex, ExecutionContext, Intrinsics, PrivateEnvironment, Realm, RealmRecord,
    get_identifier_reference,
};
use crate::{
    ecmascript::{
        builtins::{
            control_abstraction_objects::promise_objects::promise_jobs::{
                PromiseReactionJob, PromiseResolveThenableJob,
            },
            fundamental_objects::error_objects::create_error_object,
        },
        scripts_and_modules::ScriptOrModule,
        types::{HeapString, Object, ObjectHeapData, Reference, Value},
    },
    heap::Heap,
};

#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Depth of the execution context stack at which calls throw a
    /// RangeError.
    pub max_call_depth: usize,
    /// Print parsed syntax trees and job activity to the host.
    pub print_internals: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_call_depth: 2_000,
            print_internals: false,
        }
    }
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// An abrupt throw completion, or a failure of the engine itself.
#[derive(Debug, Clone, PartialEq)]
pub enum JsError {
    /// An ECMAScript exception. Catchable by `try` statements.
    Throw(Value),
    /// A violated engine invariant. Never observable by ECMAScript code.
    Internal(InternalError),
}

impl JsError {
    pub fn value(&self) -> Option<Value> {
        match self {
            JsError::Throw(value) => Some(*value),
            JsError::Internal(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal engine error: {message}")]
pub struct InternalError {
    pub message: String,
}

/// Error returned to the embedder from a top-level evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("uncaught exception")]
    Thrown(Value),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl EvaluationError {
    /// Render the error the way a host would report it.
    pub fn to_display_string(&self, agent: &Agent) -> String {
        match self {
            EvaluationError::Thrown(value) => {
                format!("Uncaught {}", value.to_display_string(agent))
            }
            EvaluationError::Internal(error) => error.to_string(),
        }
    }
}

impl From<JsError> for EvaluationError {
    fn from(error: JsError) -> Self {
        match error {
            JsError::Throw(value) => EvaluationError::Thrown(value),
            JsError::Internal(error) => EvaluationError::Internal(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseRejectionOperation {
    Reject,
    Handle,
}

/// A module returned by [`HostHooks::load_imported_module`].
#[derive(Debug)]
pub struct LoadedModule {
    pub module: Module,
    /// Key identifying the module within a realm, usually a resolved path.
    /// Loading the same key twice yields the same Module Record.
    pub host_defined: Option<Rc<str>>,
}

/// Host-defined behaviour of the engine. Every hook has a permissive
/// default.
pub trait HostHooks: std::fmt::Debug {
    /// Called when a `debugger` statement is evaluated.
    fn on_debugger_statement(&self, _agent: &Agent) {}

    /// ### [19.2.1.2 HostEnsureCanCompileStrings ( calleeRealm, parameterStrings, bodyString, direct )](https://tc39.es/ecma262/#sec-hostensurecancompilestrings)
    fn ensure_can_compile_strings(&self, _agent: &Agent, _callee_realm: Realm) -> JsResult<()> {
        Ok(())
    }

    /// ### [27.2.1.9 HostPromiseRejectionTracker ( promise, operation )](https://tc39.es/ecma262/#sec-host-promise-rejection-tracker)
    fn promise_rejection_tracker(
        &self,
        _agent: &Agent,
        promise: Object,
        operation: PromiseRejectionOperation,
    ) {
        tracing::debug!(
            event = "promise_rejection_tracker",
            promise = promise.0,
            ?operation
        );
    }

    /// ### [20.2.5 HostHasSourceTextAvailable ( func )](https://tc39.es/ecma262/#sec-hosthassourcetextavailable)
    fn has_source_text_available(&self, _agent: &Agent, _function: Object) -> bool {
        true
    }

    /// Output of `print` and `console` methods.
    fn print(&self, message: &str) {
        println!("{message}");
    }

    /// An exception escaped a job.
    fn report_job_error(&self, agent: &Agent, error: Value) {
        tracing::warn!(
            event = "job_error",
            error = %error.to_display_string(agent)
        );
    }

    /// ### [16.2.1.10 HostLoadImportedModule ( referrer, moduleRequest, hostDefined, payload )](https://tc39.es/ecma262/#sec-HostLoadImportedModule)
    ///
    /// `referrer` is the host defined key of the importing module, if any.
    fn load_imported_module(
        &self,
        _referrer: Option<&str>,
        specifier: &str,
    ) -> Result<LoadedModule, String> {
        Err(format!("Cannot find module '{specifier}'"))
    }
}

/// ### [9.5 Jobs and Host Operations to Enqueue Jobs](https://tc39.es/ecma262/#sec-jobs)
#[derive(Debug)]
pub struct Job {
    pub(crate) realm: Option<Realm>,
    pub(crate) inner: InnerJob,
}

#[derive(Debug)]
pub(crate) enum InnerJob {
    PromiseReaction(PromiseReactionJob),
    PromiseResolveThenable(PromiseResolveThenableJob),
}

impl Job {
    pub(crate) fn run(self, agent: &Agent) -> JsResult<()> {
        let realm = self.realm.unwrap_or_else(|| agent.current_realm());
        // A job runs with a fresh execution context for its realm on an
        // otherwise empty stack.
        agent.push_execution_context(ExecutionContext {
            ecmascript_code: None,
            function: None,
            realm,
            script_or_module: None,
            coroutine: None,
        });
        let result = match self.inner {
            InnerJob::PromiseReaction(job) => job.run(agent),
            InnerJob::PromiseResolveThenable(job) => job.run(agent),
        };
        agent.pop_execution_context();
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobQueueName {
    PromiseJobs,
    ScriptJobs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    AggregateError,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

pub(crate) struct AgentInner {
    heap: RefCell<Heap>,
    execution_context_stack: RefCell<Vec<ExecutionContext>>,
    promise_jobs: RefCell<VecDeque<Job>>,
    script_jobs: RefCell<VecDeque<Job>>,
    host_hooks: Rc<dyn HostHooks>,
    options: Options,
}

/// ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
///
/// The agent owns the heap, the execution context stack and the job queues.
/// Coroutines keep non-owning handles to their agent; all state is dropped
/// with the owning handle.
pub struct Agent {
    inner: Rc<AgentInner>,
    is_owner: bool,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("options", &self.inner.options)
            .field("is_owner", &self.is_owner)
            .finish_non_exhaustive()
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        if !self.is_owner {
            return;
        }
        // Suspended coroutine bodies hold agent handles; drop them first so
        // the agent state is released with the owner.
        let futures = match self.inner.heap.try_borrow_mut() {
            Ok(mut heap) => heap
                .coroutines
                .iter_mut()
                .filter_map(|coroutine| coroutine.take_future())
                .collect::<Vec<_>>(),
            Err(_) => Vec::new(),
        };
        drop(futures);
    }
}

impl Agent {
    /// ### [9.7.2 CreateAgent ( )](https://tc39.es/ecma262/#sec-createagent)
    pub fn new(options: Options, host_hooks: Rc<dyn HostHooks>) -> Self {
        Self {
            inner: Rc::new(AgentInner {
                heap: RefCell::new(Heap::new()),
                execution_context_stack: RefCell::new(Vec::new()),
                promise_jobs: RefCell::new(VecDeque::new()),
                script_jobs: RefCell::new(VecDeque::new()),
                host_hooks,
                options,
            }),
            is_owner: true,
        }
    }

    /// A non-owning handle to the same agent.
    pub(crate) fn handle(&self) -> Agent {
        Agent {
            inner: self.inner.clone(),
            is_owner: false,
        }
    }

    pub(crate) fn heap(&self) -> Ref<'_, Heap> {
        self.inner.heap.borrow()
    }

    pub(crate) fn heap_mut(&self) -> RefMut<'_, Heap> {
        self.inner.heap.borrow_mut()
    }

    pub(crate) fn object(&self, object: Object) -> Ref<'_, ObjectHeapData> {
        Ref::map(self.heap(), |heap| &heap.objects[object.0 as usize])
    }

    pub(crate) fn object_mut(&self, object: Object) -> RefMut<'_, ObjectHeapData> {
        RefMut::map(self.heap_mut(), |heap| &mut heap.objects[object.0 as usize])
    }

    pub(crate) fn realm_record(&self, realm: Realm) -> Ref<'_, RealmRecord> {
        Ref::map(self.heap(), |heap| &heap.realms[realm.0 as usize])
    }

    pub(crate) fn realm_record_mut(&self, realm: Realm) -> RefMut<'_, RealmRecord> {
        RefMut::map(self.heap_mut(), |heap| &mut heap.realms[realm.0 as usize])
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    pub(crate) fn host_hooks(&self) -> Rc<dyn HostHooks> {
        self.inner.host_hooks.clone()
    }

    /// ### [9.3.1 CreateRealm ( )](https://tc39.es/ecma262/#sec-createrealm)
    ///
    /// Create a realm with its intrinsics and global object fully set up.
    pub fn create_realm(&self) -> Realm {
        Realm::create(self)
    }

    pub(crate) fn try_running_execution_context(&self) -> Option<ExecutionContext> {
        self.inner.execution_context_stack.borrow().last().copied()
    }

    /// The running execution context. Host calls outside of any evaluation
    /// see a context of the agent's first realm.
    pub(crate) fn running_execution_context(&self) -> ExecutionContext {
        self.try_running_execution_context()
            .unwrap_or(ExecutionContext {
                ecmascript_code: None,
                function: None,
                realm: Realm(0),
                script_or_module: None,
                coroutine: None,
            })
    }

    /// ### [current Realm Record](https://tc39.es/ecma262/#current-realm)
    pub(crate) fn current_realm(&self) -> Realm {
        self.running_execution_context().realm
    }

    pub(crate) fn intrinsics(&self) -> Intrinsics {
        self.current_realm().intrinsics(self)
    }

    pub(crate) fn push_execution_context(&self, context: ExecutionContext) {
        self.inner.execution_context_stack.borrow_mut().push(context);
    }

    pub(crate) fn pop_execution_context(&self) -> Option<ExecutionContext> {
        self.inner.execution_context_stack.borrow_mut().pop()
    }

    /// Drop every execution context above `depth`.
    pub(crate) fn truncate_execution_context_stack(&self, depth: usize) {
        self.inner.execution_context_stack.borrow_mut().truncate(depth);
    }

    /// Number of execution contexts on the stack.
    pub fn execution_context_depth(&self) -> usize {
        self.inner.execution_context_stack.borrow().len()
    }

    pub(crate) fn set_lexical_environment(&self, environment: EnvironmentIndex) {
        if let Some(code) = self
            .inner
            .execution_context_stack
            .borrow_mut()
            .last_mut()
            .and_then(|context| context.ecmascript_code.as_mut())
        {
            code.lexical_environment = environment;
        }
    }

    pub(crate) fn set_variable_environment(&self, environment: EnvironmentIndex) {
        if let Some(code) = self
            .inner
            .execution_context_stack
            .borrow_mut()
            .last_mut()
            .and_then(|context| context.ecmascript_code.as_mut())
        {
            code.variable_environment = environment;
        }
    }

    pub(crate) fn set_private_environment(&self, environment: Option<PrivateEnvironment>) {
        if let Some(code) = self
            .inner
            .execution_context_stack
            .borrow_mut()
            .last_mut()
            .and_then(|context| context.ecmascript_code.as_mut())
        {
            code.private_environment = environment;
        }
    }

    /// ### [9.5.4 HostEnqueuePromiseJob ( job, realm )](https://tc39.es/ecma262/#sec-hostenqueuepromisejob)
    pub(crate) fn enqueue_job(&self, queue_name: JobQueueName, job: Job) {
        tracing::trace!(event = "enqueue_job", ?queue_name);
        match queue_name {
            JobQueueName::PromiseJobs => self.inner.promise_jobs.borrow_mut().push_back(job),
            JobQueueName::ScriptJobs => self.inner.script_jobs.borrow_mut().push_back(job),
        }
    }

    pub fn pending_job_count(&self) -> usize {
        self.inner.promise_jobs.borrow().len() + self.inner.script_jobs.borrow().len()
    }

    /// Run queued jobs until both queues are empty. Promise jobs run before
    /// script jobs, each queue in FIFO order.
    ///
    /// Exceptions escaping a job are reported through
    /// [`HostHooks::report_job_error`]; internal errors stop the loop.
    pub fn run_jobs(&self) -> Result<(), InternalError> {
        loop {
            let next = self.inner.promise_jobs.borrow_mut().pop_front();
            let job = match next {
                Some(job) => job,
                None => match self.inner.script_jobs.borrow_mut().pop_front() {
                    Some(job) => job,
                    None => return Ok(()),
                },
            };
            tracing::trace!(event = "run_job");
            let depth = self.execution_context_depth();
            let result = job.run(self);
            self.truncate_execution_context_stack(depth);
            match result {
                Ok(()) => {}
                Err(JsError::Throw(error)) => self.host_hooks().report_job_error(self, error),
                Err(JsError::Internal(error)) => return Err(error),
            }
        }
    }

    /// ### [5.2.3.2 Throw an Exception](https://tc39.es/ecma262/#sec-throw-an-exception)
    pub(crate) fn throw_exception(&self, kind: ExceptionType, message: String) -> JsError {
        let error = create_error_object(self, kind, &message);
        JsError::Throw(Value::Object(error))
    }

    pub(crate) fn throw_exception_with_static_message(
        &self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        let error = create_error_object(self, kind, message);
        JsError::Throw(Value::Object(error))
    }

    pub(crate) fn internal_error(&self, message: impl Into<String>) -> JsError {
        let message = message.into();
        tracing::error!(event = "internal_error", %message);
        JsError::Internal(InternalError { message })
    }

    /// Check the execution context stack has room for another call.
    pub(crate) fn check_call_depth(&self) -> JsResult<()> {
        if self.execution_context_depth() >= self.options().max_call_depth {
            return Err(self.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Maximum call stack size exceeded",
            ));
        }
        Ok(())
    }
}

/// ### [9.4.1 GetActiveScriptOrModule ( )](https://tc39.es/ecma262/#sec-getactivescriptormodule)
pub(crate) fn get_active_script_or_module(agent: &Agent) -> Option<ScriptOrModule> {
    // 1. If the execution context stack is empty, return null.
    // 2. Let ec be the topmost execution context on the execution context
    // stack whose ScriptOrModule component is not null.
    // 3. If no such execution context exists, return null. Otherwise, return
    // ec's ScriptOrModule.
    agent
        .inner
        .execution_context_stack
        .borrow()
        .iter()
        .rev()
        .find_map(|context| context.script_or_module)
}

/// ### [9.4.2 ResolveBinding ( name \[ , env \] )](https://tc39.es/ecma262/#sec-resolvebinding)
pub(crate) fn resolve_binding(
    agent: &Agent,
    name: HeapString,
    env: Option<EnvironmentIndex>,
) -> JsResult<Reference> {
    let context = agent.running_execution_context();
    // 1. If env is not present or env is undefined, then
    //     a. Set env to the running execution context's LexicalEnvironment.
    let env = env.or_else(|| {
        context
            .ecmascript_code
            .map(|code| code.lexical_environment)
    });
    // 2. Assert: env is an Environment Record.
    // 3. Let strict be IsStrict(the syntactic production that is being
    // evaluated).
    let strict = context.is_strict_mode();
    // 4. Return ? GetIdentifierReference(env, name, strict).
    get_identifier_reference(agent, env, name, strict)
}

/// ### [9.4.3 GetThisEnvironment ( )](https://tc39.es/ecma262/#sec-getthisenvironment)
pub(crate) fn get_this_environment(agent: &Agent) -> JsResult<EnvironmentIndex> {
    // 1. Let env be the running execution context's LexicalEnvironment.
    let mut env = agent
        .running_execution_context()
        .ecmascript_code
        .map(|code| code.lexical_environment);
    // 2. Repeat,
    while let Some(current) = env {
        // a. Let exists be env.HasThisBinding().
        // b. If exists is true, return env.
        if current.has_this_binding(agent) {
            return Ok(current);
        }
        // c. Let outer be env.[[OuterEnv]].
        // d. Assert: outer is not null.
        // e. Set env to outer.
        env = current.get_outer_env(agent);
    }
    Err(agent.internal_error("no environment with a this binding"))
}

/// ### [9.4.4 ResolveThisBinding ( )](https://tc39.es/ecma262/#sec-resolvethisbinding)
pub(crate) fn resolve_this_binding(agent: &Agent) -> JsResult<Value> {
    // 1. Let envRec be GetThisEnvironment().
    // 2. Return ? envRec.GetThisBinding().
    get_this_environment(agent)?.get_this_binding(agent)
}

/// ### [9.4.5 GetNewTarget ( )](https://tc39.es/ecma262/#sec-getnewtarget)
pub(crate) fn get_new_target(agent: &Agent) -> JsResult<Value> {
    // 1. Let envRec be GetThisEnvironment().
    // 2. Assert: envRec has a [[NewTarget]] field.
    // 3. Return envRec.[[NewTarget]].
    match get_this_environment(agent)? {
        EnvironmentIndex::Function(env) => {
            Ok(env.new_target(agent).map_or(Value::Undefined, Value::Object))
        }
        _ => Ok(Value::Undefined),
    }
}
