// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashSet;

use super::{
    DeclarativeEnvironment, DeclarativeEnvironmentRecord, EnvironmentIndex, ObjectEnvironment,
    ObjectEnvironmentRecord,
};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::{
        define_property_or_throw, has_own_property, set,
    },
    execution::{Agent, JsError, JsResult, agent::ExceptionType},
    types::{HeapString, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value},
};

/// ### [9.1.1.4 Global Environment Records](https://tc39.es/ecma262/#sec-global-environment-records)
///
/// A Global Environment Record is used to represent the outer most scope that
/// is shared by all of the ECMAScript Script elements that are processed in a
/// common realm. It is logically a single record but is specified as a
/// composite encapsulating an Object Environment Record and a Declarative
/// Environment Record.
#[derive(Debug, Clone)]
pub(crate) struct GlobalEnvironmentRecord {
    /// ### \[\[ObjectRecord\]\]
    ///
    /// Binding object is the global object. It contains global built-in
    /// bindings as well as FunctionDeclaration, GeneratorDeclaration,
    /// AsyncFunctionDeclaration, AsyncGeneratorDeclaration, and
    /// VariableDeclaration bindings in global code for the associated realm.
    pub(crate) object_record: ObjectEnvironment,

    /// ### \[\[GlobalThisValue\]\]
    ///
    /// The value returned by `this` in global scope.
    pub(crate) global_this_value: Object,

    /// ### \[\[DeclarativeRecord\]\]
    ///
    /// Contains bindings for all declarations in global code for the
    /// associated realm code except for FunctionDeclaration,
    /// GeneratorDeclaration, AsyncFunctionDeclaration,
    /// AsyncGeneratorDeclaration, and VariableDeclaration bindings.
    pub(crate) declarative_record: DeclarativeEnvironment,

    /// ### \[\[VarNames\]\]
    ///
    /// The string names bound by FunctionDeclaration, GeneratorDeclaration,
    /// AsyncFunctionDeclaration, AsyncGeneratorDeclaration, and
    /// VariableDeclaration declarations in global code for the associated
    /// realm.
    pub(crate) var_names: AHashSet<HeapString>,
}

/// Handle to a [`GlobalEnvironmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalEnvironment(pub(crate) u32);

impl GlobalEnvironment {
    /// ### [9.1.2.5 NewGlobalEnvironment ( G, thisValue )](https://tc39.es/ecma262/#sec-newglobalenvironment)
    pub(crate) fn new(agent: &Agent, global: Object, this_value: Object) -> GlobalEnvironment {
        let mut heap = agent.heap_mut();
        // 1. Let objRec be NewObjectEnvironment(G, false, null).
        let object_record = heap
            .environments
            .push_object_environment(ObjectEnvironmentRecord {
                binding_object: global,
                is_with_environment: false,
                outer_env: None,
            });
        // 2. Let dclRec be NewDeclarativeEnvironment(null).
        let declarative_record =
            heap.environments
                .push_declarative_environment(DeclarativeEnvironmentRecord::default());
        // 3. Let env be a new Global Environment Record.
        // 4. Set env.[[ObjectRecord]] to objRec.
        // 5. Set env.[[GlobalThisValue]] to thisValue.
        // 6. Set env.[[DeclarativeRecord]] to dclRec.
        // 7. Set env.[[VarNames]] to a new empty List.
        // 8. Set env.[[OuterEnv]] to null.
        // 9. Return env.
        heap.environments
            .push_global_environment(GlobalEnvironmentRecord {
                object_record,
                global_this_value: this_value,
                declarative_record,
                var_names: AHashSet::default(),
            })
    }

    fn parts(self, agent: &Agent) -> (ObjectEnvironment, DeclarativeEnvironment) {
        let heap = agent.heap();
        let record = &heap.environments.global[self.0 as usize];
        (record.object_record, record.declarative_record)
    }

    pub(crate) fn declarative_record(self, agent: &Agent) -> DeclarativeEnvironment {
        self.parts(agent).1
    }

    pub(crate) fn object_record(self, agent: &Agent) -> ObjectEnvironment {
        self.parts(agent).0
    }

    pub(crate) fn global_object(self, agent: &Agent) -> Object {
        self.object_record(agent).binding_object(agent)
    }

    /// ### [9.1.1.4.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-hasbinding-n)
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        let (object_record, declarative_record) = self.parts(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, return true.
        if declarative_record.has_binding(agent, name) {
            return Ok(true);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.HasBinding(N).
        object_record.has_binding(agent, name)
    }

    /// ### [9.1.1.4.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-global-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        let declarative_record = self.declarative_record(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, throw a TypeError exception.
        if declarative_record.has_binding(agent, name) {
            return Err(redeclaration_error(agent, name));
        }
        // 3. Return ! DclRec.CreateMutableBinding(N, D).
        declarative_record.create_mutable_binding(agent, name, is_deletable);
        Ok(())
    }

    /// ### [9.1.1.4.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-createimmutablebinding-n-s)
    pub(crate) fn create_immutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<()> {
        let declarative_record = self.declarative_record(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, throw a TypeError exception.
        if declarative_record.has_binding(agent, name) {
            return Err(redeclaration_error(agent, name));
        }
        // 3. Return ! DclRec.CreateImmutableBinding(N, S).
        declarative_record.create_immutable_binding(agent, name, is_strict);
        Ok(())
    }

    /// ### [9.1.1.4.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-global-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        let (object_record, declarative_record) = self.parts(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if declarative_record.has_binding(agent, name) {
            // a. Return ! DclRec.InitializeBinding(N, V).
            declarative_record.initialize_binding(agent, name, value);
            return Ok(());
        }
        // 3. Assert: If the binding exists, it must be in the Object
        // Environment Record.
        // 4. Let ObjRec be envRec.[[ObjectRecord]].
        // 5. Return ? ObjRec.InitializeBinding(N, V).
        object_record.initialize_binding(agent, name, value)
    }

    /// ### [9.1.1.4.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-global-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        let (object_record, declarative_record) = self.parts(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if declarative_record.has_binding(agent, name) {
            // a. Return ? DclRec.SetMutableBinding(N, V, S).
            return declarative_record.set_mutable_binding(agent, name, value, is_strict);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.SetMutableBinding(N, V, S).
        object_record.set_mutable_binding(agent, name, value, is_strict)
    }

    /// ### [9.1.1.4.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        let (object_record, declarative_record) = self.parts(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if declarative_record.has_binding(agent, name) {
            // a. Return ? DclRec.GetBindingValue(N, S).
            return declarative_record.get_binding_value(agent, name, is_strict);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.GetBindingValue(N, S).
        object_record.get_binding_value(agent, name, is_strict)
    }

    /// ### [9.1.1.4.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        let (object_record, declarative_record) = self.parts(agent);
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if declarative_record.has_binding(agent, name) {
            // a. Return ! DclRec.DeleteBinding(N).
            return Ok(declarative_record.delete_binding(agent, name));
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = object_record.binding_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 5. Let existingProp be ? HasOwnProperty(globalObject, N).
        // 6. If existingProp is true, then
        if has_own_property(agent, global_object, key)? {
            // a. Let status be ? ObjRec.DeleteBinding(N).
            let status = object_record.delete_binding(agent, name)?;
            // b. If status is true and envRec.[[VarNames]] contains N, then
            if status {
                // i. Remove N from envRec.[[VarNames]].
                agent.heap_mut().environments.global[self.0 as usize]
                    .var_names
                    .remove(&name);
            }
            // c. Return status.
            return Ok(status);
        }
        // 7. Return true.
        Ok(true)
    }

    /// ### [9.1.1.4.11 GetThisBinding ( )](https://tc39.es/ecma262/#sec-global-environment-records-getthisbinding)
    pub(crate) fn get_this_binding(self, agent: &Agent) -> Object {
        // 1. Return envRec.[[GlobalThisValue]].
        agent.heap().environments.global[self.0 as usize].global_this_value
    }

    /// ### [9.1.1.4.12 HasVarDeclaration ( N )](https://tc39.es/ecma262/#sec-hasvardeclaration)
    pub(crate) fn has_var_declaration(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Let varDeclaredNames be envRec.[[VarNames]].
        // 2. If varDeclaredNames contains N, return true.
        // 3. Return false.
        agent.heap().environments.global[self.0 as usize]
            .var_names
            .contains(&name)
    }

    /// ### [9.1.1.4.13 HasLexicalDeclaration ( N )](https://tc39.es/ecma262/#sec-haslexicaldeclaration)
    pub(crate) fn has_lexical_declaration(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. Return ! DclRec.HasBinding(N).
        self.declarative_record(agent).has_binding(agent, name)
    }

    /// ### [9.1.1.4.14 HasRestrictedGlobalProperty ( N )](https://tc39.es/ecma262/#sec-hasrestrictedglobalproperty)
    pub(crate) fn has_restricted_global_property(
        self,
        agent: &Agent,
        name: HeapString,
    ) -> JsResult<bool> {
        // 1. Let ObjRec be envRec.[[ObjectRecord]].
        // 2. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = self.global_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined, return false.
        // 5. If existingProp.[[Configurable]] is true, return false.
        // 6. Return true.
        Ok(existing_prop.is_some_and(|prop| prop.configurable == Some(false)))
    }

    /// ### [9.1.1.4.15 CanDeclareGlobalVar ( N )](https://tc39.es/ecma262/#sec-candeclareglobalvar)
    pub(crate) fn can_declare_global_var(self, agent: &Agent, name: HeapString) -> JsResult<bool> {
        // 1. Let ObjRec be envRec.[[ObjectRecord]].
        // 2. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = self.global_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        // 4. If hasProperty is true, return true.
        if has_own_property(agent, global_object, key)? {
            return Ok(true);
        }
        // 5. Return ? IsExtensible(globalObject).
        global_object.internal_is_extensible(agent)
    }

    /// ### [9.1.1.4.16 CanDeclareGlobalFunction ( N )](https://tc39.es/ecma262/#sec-candeclareglobalfunction)
    pub(crate) fn can_declare_global_function(
        self,
        agent: &Agent,
        name: HeapString,
    ) -> JsResult<bool> {
        // 1. Let ObjRec be envRec.[[ObjectRecord]].
        // 2. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = self.global_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined, return ? IsExtensible(globalObject).
        let Some(existing_prop) = existing_prop else {
            return global_object.internal_is_extensible(agent);
        };
        // 5. If existingProp.[[Configurable]] is true, return true.
        if existing_prop.configurable == Some(true) {
            return Ok(true);
        }
        // 6. If IsDataDescriptor(existingProp) is true and existingProp has
        // attribute values { [[Writable]]: true, [[Enumerable]]: true }, return
        // true.
        // 7. Return false.
        Ok(existing_prop.is_data_descriptor()
            && existing_prop.writable == Some(true)
            && existing_prop.enumerable == Some(true))
    }

    /// ### [9.1.1.4.17 CreateGlobalVarBinding ( N, D )](https://tc39.es/ecma262/#sec-createglobalvarbinding)
    pub(crate) fn create_global_var_binding(
        self,
        agent: &Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        // 1. Let ObjRec be envRec.[[ObjectRecord]].
        let object_record = self.object_record(agent);
        // 2. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = object_record.binding_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        let has_property = has_own_property(agent, global_object, key)?;
        // 4. Let extensible be ? IsExtensible(globalObject).
        let extensible = global_object.internal_is_extensible(agent)?;
        // 5. If hasProperty is false and extensible is true, then
        if !has_property && extensible {
            // a. Perform ? ObjRec.CreateMutableBinding(N, D).
            object_record.create_mutable_binding(agent, name, is_deletable)?;
            // b. Perform ? ObjRec.InitializeBinding(N, undefined).
            object_record.initialize_binding(agent, name, Value::Undefined)?;
        }
        // 6. If envRec.[[VarNames]] does not contain N, then
        // a. Append N to envRec.[[VarNames]].
        agent.heap_mut().environments.global[self.0 as usize]
            .var_names
            .insert(name);
        // 7. Return UNUSED.
        Ok(())
    }

    /// ### [9.1.1.4.18 CreateGlobalFunctionBinding ( N, V, D )](https://tc39.es/ecma262/#sec-createglobalfunctionbinding)
    pub(crate) fn create_global_function_binding(
        self,
        agent: &Agent,
        name: HeapString,
        value: Value,
        is_deletable: bool,
    ) -> JsResult<()> {
        // 1. Let ObjRec be envRec.[[ObjectRecord]].
        // 2. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = self.global_object(agent);
        let key = PropertyKey::from_string(agent, name);
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined or existingProp.[[Configurable]] is
        // true, then
        let desc = if existing_prop.is_none_or(|prop| prop.configurable == Some(true)) {
            // a. Let desc be the PropertyDescriptor { [[Value]]: V,
            // [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: D }.
            PropertyDescriptor {
                value: Some(value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            }
        } else {
            // 5. Else,
            // a. Let desc be the PropertyDescriptor { [[Value]]: V }.
            PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            }
        };
        // 6. Perform ? DefinePropertyOrThrow(globalObject, N, desc).
        define_property_or_throw(agent, global_object, key, desc)?;
        // 7. Perform ? Set(globalObject, N, V, false).
        set(agent, global_object, key, value, false)?;
        // 8. If envRec.[[VarNames]] does not contain N, then
        // a. Append N to envRec.[[VarNames]].
        agent.heap_mut().environments.global[self.0 as usize]
            .var_names
            .insert(name);
        // 9. Return UNUSED.
        Ok(())
    }
}

fn redeclaration_error(agent: &Agent, name: HeapString) -> JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!(
            "Identifier '{}' has already been declared",
            name.to_rust_string(agent)
        ),
    )
}

impl From<GlobalEnvironment> for EnvironmentIndex {
    fn from(value: GlobalEnvironment) -> Self {
        EnvironmentIndex::Global(value)
    }
}
