// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.6 Module Namespace Exotic Objects](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects)
//!
//! A module namespace exotic object is an exotic object that exposes the
//! bindings exported from an ECMAScript Module. There is a one-to-one
//! correspondence between the String-keyed own properties of a module
//! namespace exotic object and the binding names exported by the Module.

use super::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
    ordinary_has_property, ordinary_own_property_keys, set_immutable_prototype,
};
use crate::ecmascript::{
    abstract_operations::testing_and_comparison::same_value,
    execution::{Agent, JsResult, agent::ExceptionType},
    scripts_and_modules::module::{ModuleIdentifier, ResolvedExport, get_module_namespace},
    types::{
        HeapString, InternalMethods, Object, ObjectKind, Property, PropertyDescriptor,
        PropertyKey, Symbol, Value,
    },
};

#[derive(Debug, Clone)]
pub(crate) struct ModuleNamespaceData {
    /// ### \[\[Module\]\]
    ///
    /// The Module Record whose exports this namespace exposes.
    pub(crate) module: ModuleIdentifier,
    /// ### \[\[Exports\]\]
    ///
    /// The String values of the exported names exposed as own properties of
    /// this object, ordered as if an Array of those String values had been
    /// sorted using %Array.prototype.sort% with undefined as comparator.
    pub(crate) exports: Vec<HeapString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModuleNamespaceObject(pub(crate) Object);

impl ModuleNamespaceObject {
    fn module(self, agent: &Agent) -> Option<ModuleIdentifier> {
        match &agent.object(self.0).kind {
            ObjectKind::ModuleNamespace(data) => Some(data.module),
            _ => None,
        }
    }

    fn exports(self, agent: &Agent) -> Vec<HeapString> {
        match &agent.object(self.0).kind {
            ObjectKind::ModuleNamespace(data) => data.exports.clone(),
            _ => Vec::new(),
        }
    }

    /// The export name `P` refers to, if it is one of \[\[Exports\]\].
    fn export_name(self, agent: &Agent, property_key: PropertyKey) -> Option<HeapString> {
        let name = match property_key {
            PropertyKey::Symbol(_) => return None,
            PropertyKey::String(name) => name,
            PropertyKey::Integer(_) => match property_key.into_value(agent) {
                Value::String(name) => name,
                _ => return None,
            },
        };
        match &agent.object(self.0).kind {
            ObjectKind::ModuleNamespace(data) if data.exports.contains(&name) => Some(name),
            _ => None,
        }
    }
}

impl InternalMethods for ModuleNamespaceObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.4.6.1 \[\[GetPrototypeOf\]\] ( )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-getprototypeof)
    fn internal_get_prototype_of(self, _agent: &Agent) -> JsResult<Option<Object>> {
        // 1. Return null.
        Ok(None)
    }

    /// ### [10.4.6.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-setprototypeof-v)
    fn internal_set_prototype_of(self, agent: &Agent, prototype: Option<Object>) -> JsResult<bool> {
        // 1. Return ! SetImmutablePrototype(O, V).
        set_immutable_prototype(agent, self.0, prototype)
    }

    /// ### [10.4.6.3 \[\[IsExtensible\]\] ( )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-isextensible)
    fn internal_is_extensible(self, _agent: &Agent) -> JsResult<bool> {
        // 1. Return false.
        Ok(false)
    }

    /// ### [10.4.6.4 \[\[PreventExtensions\]\] ( )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-preventextensions)
    fn internal_prevent_extensions(self, _agent: &Agent) -> JsResult<bool> {
        // 1. Return true.
        Ok(true)
    }

    /// ### [10.4.6.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. If P is a Symbol, return OrdinaryGetOwnProperty(O, P).
        if property_key.is_symbol() {
            return Ok(ordinary_get_own_property(agent, self.0, property_key));
        }
        // 2. Let exports be O.[[Exports]].
        // 3. If exports does not contain P, return undefined.
        if self.export_name(agent, property_key).is_none() {
            return Ok(None);
        }
        // 4. Let value be ? O.[[Get]](P, O).
        let value = self.internal_get(agent, property_key, Value::Object(self.0))?;
        // 5. Return PropertyDescriptor { [[Value]]: value, [[Writable]]: true,
        // [[Enumerable]]: true, [[Configurable]]: false }.
        Ok(Some(PropertyDescriptor {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(false),
            ..Default::default()
        }))
    }

    /// ### [10.4.6.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 1. If P is a Symbol, return ! OrdinaryDefineOwnProperty(O, P, Desc).
        if property_key.is_symbol() {
            return ordinary_define_own_property(agent, self.0, property_key, property_descriptor);
        }
        // 2. Let current be ? O.[[GetOwnProperty]](P).
        // 3. If current is undefined, return false.
        let Some(current) = self.internal_get_own_property(agent, property_key)? else {
            return Ok(false);
        };
        // 4. If Desc has a [[Configurable]] field and Desc.[[Configurable]]
        // is true, return false.
        // 5. If Desc has an [[Enumerable]] field and Desc.[[Enumerable]] is
        // false, return false.
        // 6. If IsAccessorDescriptor(Desc) is true, return false.
        // 7. If Desc has a [[Writable]] field and Desc.[[Writable]] is false,
        // return false.
        if property_descriptor.configurable == Some(true)
            || property_descriptor.enumerable == Some(false)
            || property_descriptor.is_accessor_descriptor()
            || property_descriptor.writable == Some(false)
        {
            return Ok(false);
        }
        // 8. If Desc has a [[Value]] field, return SameValue(Desc.[[Value]],
        // current.[[Value]]).
        if let Some(value) = property_descriptor.value {
            return Ok(same_value(
                agent,
                value,
                current.value.unwrap_or(Value::Undefined),
            ));
        }
        // 9. Return true.
        Ok(true)
    }

    /// ### [10.4.6.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-hasproperty-p)
    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. If P is a Symbol, return ! OrdinaryHasProperty(O, P).
        if property_key.is_symbol() {
            return ordinary_has_property(agent, self.0, property_key);
        }
        // 2. Let exports be O.[[Exports]].
        // 3. If exports contains P, return true.
        // 4. Return false.
        Ok(self.export_name(agent, property_key).is_some())
    }

    /// ### [10.4.6.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-get-p-receiver)
    fn internal_get(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1. If P is a Symbol, then
        if property_key.is_symbol() {
            // a. Return ! OrdinaryGet(O, P, Receiver).
            return ordinary_get(agent, self.0, property_key, receiver);
        }
        // 2. Let exports be O.[[Exports]].
        // 3. If exports does not contain P, return undefined.
        let Some(name) = self.export_name(agent, property_key) else {
            return Ok(Value::Undefined);
        };
        // 4. Let m be O.[[Module]].
        let Some(m) = self.module(agent) else {
            return Err(agent.internal_error("namespace object without a module"));
        };
        // 5. Let binding be m.ResolveExport(P).
        // 6. Assert: binding is a ResolvedBinding Record.
        let ResolvedExport::Resolved {
            module: target_module,
            binding_name,
        } = m.resolve_export(agent, name)
        else {
            return Err(agent.internal_error("namespace export does not resolve"));
        };
        // 7. Let targetModule be binding.[[Module]].
        // 8. Assert: targetModule is not undefined.
        // 9. If binding.[[BindingName]] is NAMESPACE, then
        let Some(binding_name) = binding_name else {
            // a. Return GetModuleNamespace(targetModule).
            return Ok(Value::Object(get_module_namespace(agent, target_module)));
        };
        // 10. Let targetEnv be targetModule.[[Environment]].
        // 11. If targetEnv is EMPTY, throw a ReferenceError exception.
        let Some(target_env) = target_module.environment(agent) else {
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                format!(
                    "Cannot access '{}' before initialization",
                    name.to_rust_string(agent)
                ),
            ));
        };
        // 12. Return ? targetEnv.GetBindingValue(binding.[[BindingName]], true).
        target_env.get_binding_value(agent, binding_name, true)
    }

    /// ### [10.4.6.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-set-p-v-receiver)
    fn internal_set(
        self,
        _agent: &Agent,
        _property_key: PropertyKey,
        _value: Value,
        _receiver: Value,
    ) -> JsResult<bool> {
        // 1. Return false.
        Ok(false)
    }

    /// ### [10.4.6.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-delete-p)
    fn internal_delete(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. If P is a Symbol, then
        if property_key.is_symbol() {
            // a. Return ! OrdinaryDelete(O, P).
            return ordinary_delete(agent, self.0, property_key);
        }
        // 2. Let exports be O.[[Exports]].
        // 3. If exports contains P, return false.
        // 4. Return true.
        Ok(self.export_name(agent, property_key).is_none())
    }

    /// ### [10.4.6.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &Agent) -> JsResult<Vec<PropertyKey>> {
        // 1. Let exports be O.[[Exports]].
        // 2. Let symbolKeys be OrdinaryOwnPropertyKeys(O).
        // 3. Return the list-concatenation of exports and symbolKeys.
        let mut keys: Vec<PropertyKey> = self
            .exports(agent)
            .into_iter()
            .map(|name| PropertyKey::from_string(agent, name))
            .collect();
        keys.extend(ordinary_own_property_keys(agent, self.0));
        Ok(keys)
    }
}

/// ### [10.4.6.12 ModuleNamespaceCreate ( module, exports )](https://tc39.es/ecma262/#sec-modulenamespacecreate)
pub(crate) fn module_namespace_create(
    agent: &Agent,
    module: ModuleIdentifier,
    mut exports: Vec<HeapString>,
) -> Object {
    // 5. Let sortedExports be a List whose elements are the elements of
    // exports, sorted according to lexicographic code unit order.
    exports.sort_by_cached_key(|name| name.code_units(agent));
    // 1. Assert: module.[[Namespace]] is EMPTY.
    // 2. Let internalSlotsList be the internal slots listed in Table 33.
    // 3. Let M be MakeBasicObject(internalSlotsList).
    // 4. Set M's essential internal methods to the definitions specified in
    // 10.4.6.
    // 5. Set M.[[Module]] to module.
    // 6. Set M.[[Exports]] to sortedExports.
    let m = Object::create(
        agent,
        None,
        ObjectKind::ModuleNamespace(Box::new(ModuleNamespaceData {
            module,
            exports,
        })),
    );
    // 7. Create own properties of M corresponding to the definitions in
    // 28.3.
    //     28.3.1 %Symbol.toStringTag%
    let tag = Value::from_str(agent, "Module");
    m.insert_property(
        agent,
        PropertyKey::Symbol(Symbol::TO_STRING_TAG),
        Property::data(tag, false, false, false),
    );
    m.set_extensible_slot(agent, false);
    // 8. Set module.[[Namespace]] to M.
    // 9. Return M.
    m
}
