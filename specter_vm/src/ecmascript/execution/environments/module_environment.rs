// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use super::{DeclarativeEnvironment, DeclarativeEnvironmentRecord, EnvironmentIndex, OuterEnv};
use crate::ecmascript::{
    execution::{Agent, JsResult, agent::ExceptionType},
    scripts_and_modules::module::ModuleIdentifier,
    types::{HeapString, Value},
};

/// An immutable binding whose value is the value of a binding in another
/// module's environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndirectBinding {
    pub(crate) module: ModuleIdentifier,
    pub(crate) binding_name: HeapString,
}

/// ### [9.1.1.5 Module Environment Records](https://tc39.es/ecma262/#sec-module-environment-records)
///
/// A Module Environment Record is a Declarative Environment Record that is
/// used to represent the outer scope of an ECMAScript Module. In additional
/// to normal mutable and immutable bindings, Module Environment Records also
/// provide immutable import bindings which are bindings that provide
/// indirect access to a target binding that exists in another Environment
/// Record.
#[derive(Debug, Clone)]
pub(crate) struct ModuleEnvironmentRecord {
    pub(crate) declarative_environment: DeclarativeEnvironment,
    pub(crate) indirect_bindings: AHashMap<HeapString, IndirectBinding>,
}

/// Handle to a [`ModuleEnvironmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleEnvironment(pub(crate) u32);

/// ### [9.1.2.6 NewModuleEnvironment ( E )](https://tc39.es/ecma262/#sec-newmoduleenvironment)
pub(crate) fn new_module_environment(agent: &Agent, outer_env: OuterEnv) -> ModuleEnvironment {
    let mut heap = agent.heap_mut();
    // 1. Let env be a new Module Environment Record containing no bindings.
    // 2. Set env.[[OuterEnv]] to E.
    let declarative_environment =
        heap.environments
            .push_declarative_environment(DeclarativeEnvironmentRecord {
                outer_env,
                bindings: AHashMap::default(),
            });
    // 3. Return env.
    heap.environments
        .push_module_environment(ModuleEnvironmentRecord {
            declarative_environment,
            indirect_bindings: AHashMap::default(),
        })
}

impl ModuleEnvironment {
    pub(crate) fn declarative_environment(self, agent: &Agent) -> DeclarativeEnvironment {
        agent.heap().environments.module[self.0 as usize].declarative_environment
    }

    fn indirect_binding(self, agent: &Agent, name: HeapString) -> Option<IndirectBinding> {
        agent.heap().environments.module[self.0 as usize]
            .indirect_bindings
            .get(&name)
            .copied()
    }

    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> bool {
        self.declarative_environment(agent).has_binding(agent, name)
            || self.indirect_binding(agent, name).is_some()
    }

    /// ### [9.1.1.5.1 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-module-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Assert: S is true.
        // 2. Assert: envRec has a binding for N.
        // 3. If the binding for N is an indirect binding, then
        if let Some(IndirectBinding {
            module,
            binding_name,
        }) = self.indirect_binding(agent, name)
        {
            // a. Let M and N2 be the indirection values provided when this
            // binding for N was created.
            // b. Let targetEnv be M.[[Environment]].
            // c. If targetEnv is EMPTY, throw a ReferenceError exception.
            let Some(target_env) = module.environment(agent) else {
                return Err(agent.throw_exception(
                    ExceptionType::ReferenceError,
                    format!(
                        "Cannot access '{}' before initialization",
                        name.to_rust_string(agent)
                    ),
                ));
            };
            // d. Return ? targetEnv.GetBindingValue(N2, true).
            return target_env.get_binding_value(agent, binding_name, true);
        }
        // 4. If the binding for N in envRec is an uninitialized binding, throw
        // a ReferenceError exception.
        // 5. Return the value currently bound to N in envRec.
        self.declarative_environment(agent)
            .get_binding_value(agent, name, is_strict)
    }

    pub(crate) fn set_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        // Import bindings are immutable strict bindings.
        if self.indirect_binding(agent, name).is_some() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Assignment to constant variable.",
            ));
        }
        self.declarative_environment(agent)
            .set_mutable_binding(agent, name, value, is_strict)
    }

    /// ### [9.1.1.5.5 CreateImportBinding ( N, M, N2 )](https://tc39.es/ecma262/#sec-createimportbinding)
    pub(crate) fn create_import_binding(
        self,
        agent: &Agent,
        name: HeapString,
        module: ModuleIdentifier,
        binding_name: HeapString,
    ) {
        // 1. Assert: envRec does not already have a binding for N.
        // 2. Assert: When M.[[Environment]] is instantiated, it will have a
        // direct binding for N2.
        // 3. Create an immutable indirect binding in envRec for N that
        // references M and N2 as its target binding and record that the
        // binding is initialized.
        agent.heap_mut().environments.module[self.0 as usize]
            .indirect_bindings
            .insert(
                name,
                IndirectBinding {
                    module,
                    binding_name,
                },
            );
        // 4. Return UNUSED.
    }
}

impl From<ModuleEnvironment> for EnvironmentIndex {
    fn from(value: ModuleEnvironment) -> Self {
        EnvironmentIndex::Module(value)
    }
}
