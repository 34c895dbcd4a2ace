// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{EnvironmentIndex, OuterEnv};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{define_property_or_throw, get, has_property, set},
        type_conversion::to_boolean,
    },
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{HeapString, InternalMethods, Object, PropertyDescriptor, PropertyKey, Symbol, Value},
};

/// ### [9.1.1.2 Object Environment Records](https://tc39.es/ecma262/#sec-object-environment-records)
///
/// Each Object Environment Record is associated with an object called its
/// binding object. An Object Environment Record binds the set of string
/// identifier names that directly correspond to the property names of its
/// binding object.
#[derive(Debug, Clone)]
pub(crate) struct ObjectEnvironmentRecord {
    /// ### \[\[BindingObject\]\]
    pub(crate) binding_object: Object,

    /// ### \[\[IsWithEnvironment\]\]
    ///
    /// Indicates whether this Environment Record is created for a `with`
    /// statement.
    pub(crate) is_with_environment: bool,

    /// ### \[\[OuterEnv\]\]
    pub(crate) outer_env: OuterEnv,
}

/// Handle to an [`ObjectEnvironmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectEnvironment(pub(crate) u32);

/// ### [9.1.2.3 NewObjectEnvironment ( O, W, E )](https://tc39.es/ecma262/#sec-newobjectenvironment)
pub(crate) fn new_object_environment(
    agent: &Agent,
    binding_object: Object,
    is_with_environment: bool,
    outer_env: OuterEnv,
) -> ObjectEnvironment {
    // 1. Let env be a new Object Environment Record.
    // 2. Set env.[[BindingObject]] to O.
    // 3. Set env.[[IsWithEnvironment]] to W.
    // 4. Set env.[[OuterEnv]] to E.
    // 5. Return env.
    agent
        .heap_mut()
        .environments
        .push_object_environment(ObjectEnvironmentRecord {
            binding_object,
            is_with_environment,
            outer_env,
        })
}

impl ObjectEnvironment {
    fn record(self, agent: &Agent) -> ObjectEnvironmentRecord {
        agent.heap().environments.object[self.0 as usize].clone()
    }

    pub(crate) fn binding_object(self, agent: &Agent) -> Object {
        agent.heap().environments.object[self.0 as usize].binding_object
    }

    pub(crate) fn get_outer_env(self, agent: &Agent) -> OuterEnv {
        agent.heap().environments.object[self.0 as usize].outer_env
    }

    /// ### [9.1.1.2.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-object-environment-records-hasbinding-n)
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        let record = self.record(agent);
        let key = PropertyKey::from_string(agent, name);
        // 1. Let bindingObject be envRec.[[BindingObject]].
        let binding_object = record.binding_object;
        // 2. Let foundBinding be ? HasProperty(bindingObject, N).
        // 3. If foundBinding is false, return false.
        if !has_property(agent, binding_object, key)? {
            return Ok(false);
        }
        // 4. If envRec.[[IsWithEnvironment]] is false, return true.
        if !record.is_with_environment {
            return Ok(true);
        }
        // 5. Let unscopables be ? Get(bindingObject, %Symbol.unscopables%).
        let unscopables = get(agent, binding_object, Symbol::UNSCOPABLES.into())?;
        // 6. If unscopables is an Object, then
        if let Value::Object(unscopables) = unscopables {
            // a. Let blocked be ToBoolean(? Get(unscopables, N)).
            let blocked = to_boolean(agent, get(agent, unscopables, key)?);
            // b. If blocked is true, return false.
            if blocked {
                return Ok(false);
            }
        }
        // 7. Return true.
        Ok(true)
    }

    /// ### [9.1.1.2.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-object-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        // 1. Let bindingObject be envRec.[[BindingObject]].
        let binding_object = self.binding_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 2. Perform ? DefinePropertyOrThrow(bindingObject, N,
        // PropertyDescriptor { [[Value]]: undefined, [[Writable]]: true,
        // [[Enumerable]]: true, [[Configurable]]: D }).
        define_property_or_throw(
            agent,
            binding_object,
            key,
            PropertyDescriptor {
                value: Some(Value::Undefined),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            },
        )
        // 3. Return UNUSED.
    }

    /// ### [9.1.1.2.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-object-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        // 1. Perform ? envRec.SetMutableBinding(N, V, false).
        self.set_mutable_binding(agent, name, value, false)
        // 2. Return UNUSED.
    }

    /// ### [9.1.1.2.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-object-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        // 1. Let bindingObject be envRec.[[BindingObject]].
        let binding_object = self.binding_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 2. Let stillExists be ? HasProperty(bindingObject, N).
        let still_exists = has_property(agent, binding_object, key)?;
        // 3. If stillExists is false and S is true, throw a ReferenceError
        // exception.
        if !still_exists && is_strict {
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                format!("{} is not defined", name.to_rust_string(agent)),
            ));
        }
        // 4. Perform ? Set(bindingObject, N, V, S).
        set(agent, binding_object, key, value, is_strict)?;
        // 5. Return UNUSED.
        Ok(())
    }

    /// ### [9.1.1.2.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-object-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Let bindingObject be envRec.[[BindingObject]].
        let binding_object = self.binding_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 2. Let value be ? HasProperty(bindingObject, N).
        // 3. If value is false, then
        if !has_property(agent, binding_object, key)? {
            // a. If S is false, return undefined; otherwise throw a
            // ReferenceError exception.
            if !is_strict {
                return Ok(Value::Undefined);
            }
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                format!("{} is not defined", name.to_rust_string(agent)),
            ));
        }
        // 4. Return ? Get(bindingObject, N).
        get(agent, binding_object, key)
    }

    /// ### [9.1.1.2.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-object-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        // 1. Let bindingObject be envRec.[[BindingObject]].
        let binding_object = self.binding_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 2. Return ? bindingObject.[[Delete]](N).
        binding_object.internal_delete(agent, key)
    }

    /// ### [9.1.1.2.10 WithBaseObject ( )](https://tc39.es/ecma262/#sec-object-environment-records-withbaseobject)
    pub(crate) fn with_base_object(self, agent: &Agent) -> Option<Object> {
        let record = self.record(agent);
        // 1. If envRec.[[IsWithEnvironment]] is true, return
        // envRec.[[BindingObject]].
        // 2. Otherwise, return undefined.
        record.is_with_environment.then_some(record.binding_object)
    }
}

impl From<ObjectEnvironment> for EnvironmentIndex {
    fn from(value: ObjectEnvironment) -> Self {
        EnvironmentIndex::Object(value)
    }
}
