// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.1 Environment Records](https://tc39.es/ecma262/#sec-environment-records)
//!
//! Environment Record is a specification type used to define the association
//! of Identifiers to specific variables and functions, based upon the lexical
//! nesting structure of ECMAScript code. Each time a function body, block,
//! catch clause or script is evaluated a new Environment Record is created to
//! record the identifier bindings created by that code.
//!
//! Records live in arenas in the agent heap and are addressed by `Copy`
//! indices. The \[\[OuterEnv\]\] field of every record is an
//! [`EnvironmentIndex`].

mod declarative_environment;
mod function_environment;
mod global_environment;
mod module_environment;
mod object_environment;
mod private_environment;

pub(crate) use declarative_environment::{
    Binding, DeclarativeEnvironment, DeclarativeEnvironmentRecord, new_declarative_environment,
};
pub(crate) use function_environment::{
    FunctionEnvironment, FunctionEnvironmentRecord, ThisBindingStatus, new_function_environment,
};
pub(crate) use global_environment::{GlobalEnvironment, GlobalEnvironmentRecord};
pub(crate) use module_environment::{
    ModuleEnvironment, ModuleEnvironmentRecord, new_module_environment,
};
pub(crate) use object_environment::{
    ObjectEnvironment, ObjectEnvironmentRecord, new_object_environment,
};
pub use private_environment::PrivateName;
pub(crate) use private_environment::{
    PrivateEnvironment, PrivateEnvironmentRecord, new_private_environment,
    resolve_private_identifier,
};

use super::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, Object, Reference, Value};

/// ### \[\[OuterEnv\]\]
///
/// Either null or a reference to the Environment Record that logically
/// surrounds this one.
pub(crate) type OuterEnv = Option<EnvironmentIndex>;

/// Arena storage of every Environment Record of an agent.
#[derive(Debug, Default)]
pub(crate) struct Environments {
    pub(crate) declarative: Vec<DeclarativeEnvironmentRecord>,
    pub(crate) function: Vec<FunctionEnvironmentRecord>,
    pub(crate) global: Vec<GlobalEnvironmentRecord>,
    pub(crate) module: Vec<ModuleEnvironmentRecord>,
    pub(crate) object: Vec<ObjectEnvironmentRecord>,
    pub(crate) private: Vec<PrivateEnvironmentRecord>,
}

fn next_index<T>(arena: &[T]) -> u32 {
    u32::try_from(arena.len()).unwrap_or(u32::MAX)
}

impl Environments {
    pub(crate) fn push_declarative_environment(
        &mut self,
        record: DeclarativeEnvironmentRecord,
    ) -> DeclarativeEnvironment {
        let index = next_index(&self.declarative);
        self.declarative.push(record);
        DeclarativeEnvironment(index)
    }

    pub(crate) fn push_function_environment(
        &mut self,
        record: FunctionEnvironmentRecord,
    ) -> FunctionEnvironment {
        let index = next_index(&self.function);
        self.function.push(record);
        FunctionEnvironment(index)
    }

    pub(crate) fn push_global_environment(
        &mut self,
        record: GlobalEnvironmentRecord,
    ) -> GlobalEnvironment {
        let index = next_index(&self.global);
        self.global.push(record);
        GlobalEnvironment(index)
    }

    pub(crate) fn push_module_environment(
        &mut self,
        record: ModuleEnvironmentRecord,
    ) -> ModuleEnvironment {
        let index = next_index(&self.module);
        self.module.push(record);
        ModuleEnvironment(index)
    }

    pub(crate) fn push_object_environment(
        &mut self,
        record: ObjectEnvironmentRecord,
    ) -> ObjectEnvironment {
        let index = next_index(&self.object);
        self.object.push(record);
        ObjectEnvironment(index)
    }

    pub(crate) fn push_private_environment(
        &mut self,
        record: PrivateEnvironmentRecord,
    ) -> PrivateEnvironment {
        let index = next_index(&self.private);
        self.private.push(record);
        PrivateEnvironment(index)
    }
}

/// ### [9.1.1 The Environment Record Type Hierarchy](https://tc39.es/ecma262/#sec-the-environment-record-type-hierarchy)
///
/// Handle to an Environment Record of any kind. Function, Global and Module
/// Environment Records are Declarative Environment Records in ECMA-262's
/// class hierarchy; here they wrap a separate declarative record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentIndex {
    Declarative(DeclarativeEnvironment),
    Function(FunctionEnvironment),
    Global(GlobalEnvironment),
    Module(ModuleEnvironment),
    Object(ObjectEnvironment),
}

impl EnvironmentIndex {
    pub(crate) fn get_outer_env(self, agent: &Agent) -> OuterEnv {
        match self {
            EnvironmentIndex::Declarative(e) => e.get_outer_env(agent),
            EnvironmentIndex::Function(e) => e.declarative_environment(agent).get_outer_env(agent),
            EnvironmentIndex::Global(_) => None,
            EnvironmentIndex::Module(e) => e.declarative_environment(agent).get_outer_env(agent),
            EnvironmentIndex::Object(e) => e.get_outer_env(agent),
        }
    }

    /// ### HasBinding ( N )
    ///
    /// Determine if an Environment Record has a binding for the String value
    /// N.
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        match self {
            EnvironmentIndex::Declarative(e) => Ok(e.has_binding(agent, name)),
            EnvironmentIndex::Function(e) => Ok(e.has_binding(agent, name)),
            EnvironmentIndex::Global(e) => e.has_binding(agent, name),
            EnvironmentIndex::Module(e) => Ok(e.has_binding(agent, name)),
            EnvironmentIndex::Object(e) => e.has_binding(agent, name),
        }
    }

    /// ### CreateMutableBinding ( N, D )
    ///
    /// Create a new but uninitialized mutable binding. If D is true the
    /// binding may be subsequently deleted.
    pub(crate) fn create_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(e) => {
                e.create_mutable_binding(agent, name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Function(e) => {
                e.declarative_environment(agent)
                    .create_mutable_binding(agent, name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Global(e) => e.create_mutable_binding(agent, name, is_deletable),
            EnvironmentIndex::Module(e) => {
                e.declarative_environment(agent)
                    .create_mutable_binding(agent, name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Object(e) => e.create_mutable_binding(agent, name, is_deletable),
        }
    }

    /// ### CreateImmutableBinding ( N, S )
    ///
    /// Create a new but uninitialized immutable binding. If S is true then
    /// attempts to set it after it has been initialized will always throw.
    pub(crate) fn create_immutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(e) => e.create_immutable_binding(agent, name, is_strict),
            EnvironmentIndex::Function(e) => e
                .declarative_environment(agent)
                .create_immutable_binding(agent, name, is_strict),
            EnvironmentIndex::Global(e) => {
                return e.create_immutable_binding(agent, name, is_strict);
            }
            EnvironmentIndex::Module(e) => e
                .declarative_environment(agent)
                .create_immutable_binding(agent, name, is_strict),
            EnvironmentIndex::Object(_) => {
                return Err(agent.internal_error(
                    "CreateImmutableBinding is never used with an Object Environment Record",
                ));
            }
        }
        Ok(())
    }

    /// ### InitializeBinding ( N, V )
    pub(crate) fn initialize_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(e) => {
                e.initialize_binding(agent, name, value);
                Ok(())
            }
            EnvironmentIndex::Function(e) => {
                e.declarative_environment(agent)
                    .initialize_binding(agent, name, value);
                Ok(())
            }
            EnvironmentIndex::Global(e) => e.initialize_binding(agent, name, value),
            EnvironmentIndex::Module(e) => {
                e.declarative_environment(agent)
                    .initialize_binding(agent, name, value);
                Ok(())
            }
            EnvironmentIndex::Object(e) => e.initialize_binding(agent, name, value),
        }
    }

    /// ### SetMutableBinding ( N, V, S )
    ///
    /// If S is true and the binding cannot be set throw a TypeError
    /// exception.
    pub(crate) fn set_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(e) => {
                e.set_mutable_binding(agent, name, value, is_strict)
            }
            EnvironmentIndex::Function(e) => e
                .declarative_environment(agent)
                .set_mutable_binding(agent, name, value, is_strict),
            EnvironmentIndex::Global(e) => e.set_mutable_binding(agent, name, value, is_strict),
            EnvironmentIndex::Module(e) => e.set_mutable_binding(agent, name, value, is_strict),
            EnvironmentIndex::Object(e) => e.set_mutable_binding(agent, name, value, is_strict),
        }
    }

    /// ### GetBindingValue ( N, S )
    ///
    /// Returns the value of an already existing binding. If S is true and the
    /// binding does not exist throw a ReferenceError exception.
    pub(crate) fn get_binding_value(
        self,
        agent: &Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        match self {
            EnvironmentIndex::Declarative(e) => e.get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Function(e) => e
                .declarative_environment(agent)
                .get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Global(e) => e.get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Module(e) => e.get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Object(e) => e.get_binding_value(agent, name, is_strict),
        }
    }

    /// ### DeleteBinding ( N )
    pub(crate) fn delete_binding(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        match self {
            EnvironmentIndex::Declarative(e) => Ok(e.delete_binding(agent, name)),
            EnvironmentIndex::Function(e) => {
                Ok(e.declarative_environment(agent).delete_binding(agent, name))
            }
            EnvironmentIndex::Global(e) => e.delete_binding(agent, name),
            // Module Environment Records only contain non-deletable bindings.
            EnvironmentIndex::Module(_) => Ok(false),
            EnvironmentIndex::Object(e) => e.delete_binding(agent, name),
        }
    }

    /// ### HasThisBinding ( )
    pub(crate) fn has_this_binding(self, agent: &Agent) -> bool {
        match self {
            EnvironmentIndex::Declarative(_) | EnvironmentIndex::Object(_) => false,
            EnvironmentIndex::Function(e) => e.has_this_binding(agent),
            EnvironmentIndex::Global(_) | EnvironmentIndex::Module(_) => true,
        }
    }

    /// ### HasSuperBinding ( )
    pub(crate) fn has_super_binding(self, agent: &Agent) -> bool {
        match self {
            EnvironmentIndex::Function(e) => e.has_super_binding(agent),
            _ => false,
        }
    }

    /// ### WithBaseObject ( )
    ///
    /// If this Environment Record is associated with a `with` statement,
    /// return the with object.
    pub(crate) fn with_base_object(self, agent: &Agent) -> Option<Object> {
        match self {
            EnvironmentIndex::Object(e) => e.with_base_object(agent),
            _ => None,
        }
    }

    /// ### GetThisBinding ( )
    pub(crate) fn get_this_binding(self, agent: &Agent) -> JsResult<Value> {
        match self {
            EnvironmentIndex::Function(e) => e.get_this_binding(agent),
            EnvironmentIndex::Global(e) => Ok(Value::Object(e.get_this_binding(agent))),
            EnvironmentIndex::Module(_) => Ok(Value::Undefined),
            EnvironmentIndex::Declarative(_) | EnvironmentIndex::Object(_) => Err(agent
                .internal_error("GetThisBinding on an environment without a this binding")),
        }
    }
}

/// ### [9.1.2.1 GetIdentifierReference ( env, name, strict )](https://tc39.es/ecma262/#sec-getidentifierreference)
///
/// The abstract operation GetIdentifierReference takes arguments env (an
/// Environment Record or null), name (a String), and strict (a Boolean) and
/// returns either a normal completion containing a Reference Record or a
/// throw completion.
pub(crate) fn get_identifier_reference(
    agent: &Agent,
    environment: OuterEnv,
    name: HeapString,
    strict: bool,
) -> JsResult<Reference> {
    let mut environment = environment;
    loop {
        // 1. If env is null, then
        let Some(env) = environment else {
            // a. Return the Reference Record { [[Base]]: UNRESOLVABLE,
            // [[ReferencedName]]: name, [[Strict]]: strict, [[ThisValue]]:
            // EMPTY }.
            return Ok(Reference::unresolvable(name, strict));
        };
        // 2. Let exists be ? env.HasBinding(name).
        // 3. If exists is true, then
        if env.has_binding(agent, name)? {
            // a. Return the Reference Record { [[Base]]: env,
            // [[ReferencedName]]: name, [[Strict]]: strict, [[ThisValue]]:
            // EMPTY }.
            return Ok(Reference::binding(env, name, strict));
        }
        // 4. Else,
        // a. Let outer be env.[[OuterEnv]].
        // b. Return ? GetIdentifierReference(outer, name, strict).
        environment = env.get_outer_env(agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, agent::Options};
    use std::rc::Rc;

    #[test]
    fn identifier_references_walk_outward() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let outer = new_declarative_environment(&agent, None);
        let inner = new_declarative_environment(&agent, Some(EnvironmentIndex::Declarative(outer)));
        let x = HeapString::from_str(&agent, "x");
        let y = HeapString::from_str(&agent, "y");
        outer.create_mutable_binding(&agent, x, false);
        outer.initialize_binding(&agent, x, Value::Number(1.0));

        let reference = get_identifier_reference(
            &agent,
            Some(EnvironmentIndex::Declarative(inner)),
            x,
            true,
        )
        .unwrap();
        assert_eq!(
            reference.base,
            crate::ecmascript::types::Base::Environment(EnvironmentIndex::Declarative(outer))
        );
        let reference = get_identifier_reference(
            &agent,
            Some(EnvironmentIndex::Declarative(inner)),
            y,
            true,
        )
        .unwrap();
        assert!(reference.is_unresolvable_reference());
    }

    #[test]
    fn uninitialized_bindings_throw() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        let env = new_declarative_environment(&agent, None);
        let x = HeapString::from_str(&agent, "x");
        env.create_immutable_binding(&agent, x, true);
        assert!(matches!(
            env.get_binding_value(&agent, x, true),
            Err(crate::ecmascript::execution::JsError::Throw(_))
        ));
        env.initialize_binding(&agent, x, Value::Boolean(true));
        assert_eq!(env.get_binding_value(&agent, x, true), Ok(Value::Boolean(true)));
        // Assignment to a strict immutable binding is a TypeError, even from
        // sloppy code.
        assert!(env.set_mutable_binding(&agent, x, Value::Null, true).is_err());
        assert!(env.set_mutable_binding(&agent, x, Value::Null, false).is_err());
        assert_eq!(env.get_binding_value(&agent, x, true), Ok(Value::Boolean(true)));
        // Sloppy assignment to a sloppy immutable binding is ignored.
        let y = HeapString::from_str(&agent, "y");
        env.create_immutable_binding(&agent, y, false);
        env.initialize_binding(&agent, y, Value::Boolean(false));
        assert!(env.set_mutable_binding(&agent, y, Value::Null, false).is_ok());
        assert!(env.set_mutable_binding(&agent, y, Value::Null, true).is_err());
        assert_eq!(env.get_binding_value(&agent, y, true), Ok(Value::Boolean(false)));
    }
}
