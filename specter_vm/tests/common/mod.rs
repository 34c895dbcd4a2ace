// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared harness of the integration tests: a host that records what the
//! engine reports to it.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use specter_vm::{
    Agent, HostHooks, LoadedModule, Options, PromiseRejectionOperation, Value,
    ecmascript::types::Object,
};

#[derive(Debug, Default)]
pub struct CapturingHostHooks {
    pub output: RefCell<Vec<String>>,
    pub job_errors: RefCell<Vec<String>>,
    pub rejections: RefCell<Vec<PromiseRejectionOperation>>,
    pub debugger_statements: RefCell<usize>,
    /// Module sources by specifier.
    pub modules: Vec<(&'static str, &'static str)>,
    /// Every (referrer, specifier) pair the engine asked to load.
    pub load_requests: RefCell<Vec<(Option<String>, String)>>,
}

impl HostHooks for CapturingHostHooks {
    fn on_debugger_statement(&self, _agent: &Agent) {
        *self.debugger_statements.borrow_mut() += 1;
    }

    fn promise_rejection_tracker(
        &self,
        _agent: &Agent,
        _promise: Object,
        operation: PromiseRejectionOperation,
    ) {
        self.rejections.borrow_mut().push(operation);
    }

    fn print(&self, message: &str) {
        self.output.borrow_mut().push(message.to_owned());
    }

    fn report_job_error(&self, agent: &Agent, error: Value) {
        self.job_errors
            .borrow_mut()
            .push(error.to_display_string(agent));
    }

    fn load_imported_module(
        &self,
        referrer: Option<&str>,
        specifier: &str,
    ) -> Result<LoadedModule, String> {
        self.load_requests
            .borrow_mut()
            .push((referrer.map(str::to_owned), specifier.to_owned()));
        let (_, source) = self
            .modules
            .iter()
            .find(|(name, _)| *name == specifier)
            .ok_or_else(|| format!("Cannot find module '{specifier}'"))?;
        let module = specter_ast::parse_module(source).map_err(|error| error.message())?;
        Ok(LoadedModule {
            module,
            host_defined: Some(specifier.into()),
        })
    }
}

/// A fresh agent with one realm, evaluating on a thread with a stack large
/// enough for the tree-walking evaluator.
pub fn with_agent<T: Send + 'static>(
    hooks: CapturingHostHooks,
    test: impl FnOnce(&Agent, &CapturingHostHooks) -> T + Send + 'static,
) -> T {
    std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(move || {
            let hooks = Rc::new(hooks);
            let agent = Agent::new(Options::default(), hooks.clone());
            test(&agent, &hooks)
        })
        .unwrap()
        .join()
        .unwrap()
}

/// Evaluate `source` as a script in a fresh realm and render the result.
pub fn eval(agent: &Agent, source: &str) -> String {
    let realm = agent.create_realm();
    eval_in(agent, realm, source)
}

pub fn eval_in(agent: &Agent, realm: specter_vm::Realm, source: &str) -> String {
    let script = specter_ast::parse_script(source, false).unwrap();
    match realm.evaluate_script(agent, script) {
        Ok(value) => value.to_display_string(agent),
        Err(error) => error.to_display_string(agent),
    }
}

/// Evaluate `source` and return what it printed.
pub fn printed(source: &'static str) -> Vec<String> {
    with_agent(CapturingHostHooks::default(), move |agent, hooks| {
        eval(agent, source);
        hooks.output.borrow().clone()
    })
}
