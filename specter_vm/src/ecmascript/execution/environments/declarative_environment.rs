// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use super::{EnvironmentIndex, OuterEnv};
use crate::ecmascript::{
    execution::{Agent, JsError, JsResult, agent::ExceptionType},
    types::{HeapString, Value},
};

/// ### [9.1.1.1 Declarative Environment Records](https://tc39.es/ecma262/#sec-declarative-environment-records)
///
/// A Declarative Environment Record is used to define the effect of
/// ECMAScript language syntactic elements such as FunctionDeclarations,
/// VariableDeclarations, and Catch clauses that directly associate identifier
/// bindings with ECMAScript language values.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeclarativeEnvironmentRecord {
    /// ### \[\[OuterEnv\]\]
    pub(crate) outer_env: OuterEnv,

    /// The environment's bindings.
    pub(crate) bindings: AHashMap<HeapString, Binding>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Binding {
    /// `None` while the binding is uninitialized.
    pub(crate) value: Option<Value>,
    pub(crate) strict: bool,
    pub(crate) mutable: bool,
    pub(crate) deletable: bool,
}

/// Handle to a [`DeclarativeEnvironmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarativeEnvironment(pub(crate) u32);

/// ### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
///
/// The abstract operation NewDeclarativeEnvironment takes argument E (an
/// Environment Record or null) and returns a Declarative Environment Record.
pub(crate) fn new_declarative_environment(
    agent: &Agent,
    outer_env: OuterEnv,
) -> DeclarativeEnvironment {
    // 1. Let env be a new Declarative Environment Record containing no bindings.
    // 2. Set env.[[OuterEnv]] to E.
    // 3. Return env.
    agent
        .heap_mut()
        .environments
        .push_declarative_environment(DeclarativeEnvironmentRecord {
            outer_env,
            bindings: AHashMap::default(),
        })
}

fn uninitialized_binding_error(agent: &Agent, name: HeapString) -> JsError {
    agent.throw_exception(
        ExceptionType::ReferenceError,
        format!(
            "Cannot access '{}' before initialization",
            name.to_rust_string(agent)
        ),
    )
}

impl DeclarativeEnvironment {
    pub(crate) fn get_outer_env(self, agent: &Agent) -> OuterEnv {
        agent.heap().environments.declarative[self.0 as usize].outer_env
    }

    pub(crate) fn get_binding(self, agent: &Agent, name: HeapString) -> Option<Binding> {
        agent.heap().environments.declarative[self.0 as usize]
            .bindings
            .get(&name)
            .copied()
    }

    /// ##### [9.1.1.1.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-hasbinding-n)
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> bool {
        // 1. If envRec has a binding for N, return true.
        // 2. Return false.
        agent.heap().environments.declarative[self.0 as usize]
            .bindings
            .contains_key(&name)
    }

    /// ##### [9.1.1.1.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-declarative-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_deletable: bool,
    ) {
        // 1. Assert: envRec does not already have a binding for N.
        // 2. Create a mutable binding in envRec for N and record that it is
        // uninitialized. If D is true, record that the newly created binding
        // may be deleted by a subsequent DeleteBinding call.
        agent.heap_mut().environments.declarative[self.0 as usize]
            .bindings
            .insert(
                name,
                Binding {
                    value: None,
                    strict: false,
                    mutable: true,
                    deletable: is_deletable,
                },
            );
        // 3. Return UNUSED.
    }

    /// ##### [9.1.1.1.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-createimmutablebinding-n-s)
    pub(crate) fn create_immutable_binding(self, agent: &Agent, name: HeapString, is_strict: bool) {
        // 1. Assert: envRec does not already have a binding for N.
        // 2. Create an immutable binding in envRec for N and record that it is
        // uninitialized. If S is true, record that the newly created binding
        // is a strict binding.
        agent.heap_mut().environments.declarative[self.0 as usize]
            .bindings
            .insert(
                name,
                Binding {
                    value: None,
                    strict: is_strict,
                    mutable: false,
                    deletable: false,
                },
            );
        // 3. Return UNUSED.
    }

    /// ##### [9.1.1.1.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-declarative-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(self, agent: &Agent, name: HeapString, value: Value) {
        // 1. Assert: envRec must have an uninitialized binding for N.
        // 2. Set the bound value for N in envRec to V.
        // 3. Record that the binding for N in envRec has been initialized.
        if let Some(binding) = agent.heap_mut().environments.declarative[self.0 as usize]
            .bindings
            .get_mut(&name)
        {
            binding.value = Some(value);
        }
        // 4. Return UNUSED.
    }

    /// ##### [9.1.1.1.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        // 1. If envRec does not have a binding for N, then
        let Some(binding) = self.get_binding(agent, name) else {
            // a. If S is true, throw a ReferenceError exception.
            if is_strict {
                return Err(agent.throw_exception(
                    ExceptionType::ReferenceError,
                    format!("{} is not defined", name.to_rust_string(agent)),
                ));
            }
            // b. Perform ! envRec.CreateMutableBinding(N, true).
            self.create_mutable_binding(agent, name, true);
            // c. Perform ! envRec.InitializeBinding(N, V).
            self.initialize_binding(agent, name, value);
            // d. Return UNUSED.
            return Ok(());
        };

        // 2. If the binding for N in envRec is a strict binding, set S to true.
        let is_strict = is_strict || binding.strict;

        // 3. If the binding for N in envRec has not yet been initialized, then
        if binding.value.is_none() {
            // a. Throw a ReferenceError exception.
            return Err(uninitialized_binding_error(agent, name));
        }

        // 4. Else if the binding for N in envRec is a mutable binding, then
        if binding.mutable {
            // a. Change its bound value to V.
            self.initialize_binding(agent, name, value);
        } else if is_strict {
            // 5. Else,
            // a. Assert: This is an attempt to change the value of an
            // immutable binding.
            // b. If S is true, throw a TypeError exception.
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Assignment to constant variable.",
            ));
        }

        // 6. Return UNUSED.
        Ok(())
    }

    /// ##### [9.1.1.1.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-getbindingvalue-n-s)
    ///
    /// If the binding exists but is uninitialized a ReferenceError is thrown,
    /// regardless of the value of S.
    pub(crate) fn get_binding_value(
        self,
        agent: &Agent,
        name: HeapString,
        _is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Assert: envRec has a binding for N.
        // 2. If the binding for N in envRec is an uninitialized binding, throw
        // a ReferenceError exception.
        // 3. Return the value currently bound to N in envRec.
        match self.get_binding(agent, name).and_then(|binding| binding.value) {
            Some(value) => Ok(value),
            None => Err(uninitialized_binding_error(agent, name)),
        }
    }

    /// ##### [9.1.1.1.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(self, agent: &Agent, name: HeapString) -> bool {
        let mut heap = agent.heap_mut();
        let record = &mut heap.environments.declarative[self.0 as usize];
        // 1. Assert: envRec has a binding for N.
        // 2. If the binding for N in envRec cannot be deleted, return false.
        if !record.bindings.get(&name).is_some_and(|binding| binding.deletable) {
            return false;
        }
        // 3. Remove the binding for N from envRec.
        record.bindings.remove(&name);
        // 4. Return true.
        true
    }
}

impl From<DeclarativeEnvironment> for EnvironmentIndex {
    fn from(value: DeclarativeEnvironment) -> Self {
        EnvironmentIndex::Declarative(value)
    }
}
