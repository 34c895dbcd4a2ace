// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ExoticKind, Object, PropertyKey};
use crate::ecmascript::{
    builtins::{
        arguments::ArgumentsObject,
        array::ArrayObject,
        module_namespace::ModuleNamespaceObject,
        ordinary::{
            ImmutablePrototypeObject, OrdinaryObject, ordinary_define_own_property, ordinary_delete,
            ordinary_get, ordinary_get_own_property, ordinary_get_prototype_of,
            ordinary_has_property, ordinary_is_extensible, ordinary_own_property_keys,
            ordinary_prevent_extensions, ordinary_set, ordinary_set_prototype_of,
        },
        primitive_objects::StringObject,
        proxy::ProxyObject,
        typed_array::TypedArrayObject,
    },
    execution::{Agent, JsResult},
    types::{PropertyDescriptor, Value},
};

/// ### [6.1.7.2 Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-object-internal-methods-and-internal-slots)
///
/// The default implementations are the ordinary object internal methods.
/// Exotic objects override the methods whose behaviour differs.
pub trait InternalMethods: Copy {
    /// The object whose ordinary slots back this object.
    fn get_backing_object(self) -> Object;

    /// ### \[\[GetPrototypeOf\]\] ( )
    fn internal_get_prototype_of(self, agent: &Agent) -> JsResult<Option<Object>> {
        Ok(ordinary_get_prototype_of(agent, self.get_backing_object()))
    }

    /// ### \[\[SetPrototypeOf\]\] ( V )
    fn internal_set_prototype_of(self, agent: &Agent, prototype: Option<Object>) -> JsResult<bool> {
        Ok(ordinary_set_prototype_of(
            agent,
            self.get_backing_object(),
            prototype,
        ))
    }

    /// ### \[\[IsExtensible\]\] ( )
    fn internal_is_extensible(self, agent: &Agent) -> JsResult<bool> {
        Ok(ordinary_is_extensible(agent, self.get_backing_object()))
    }

    /// ### \[\[PreventExtensions\]\] ( )
    fn internal_prevent_extensions(self, agent: &Agent) -> JsResult<bool> {
        Ok(ordinary_prevent_extensions(agent, self.get_backing_object()))
    }

    /// ### \[\[GetOwnProperty\]\] ( P )
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        Ok(ordinary_get_own_property(
            agent,
            self.get_backing_object(),
            property_key,
        ))
    }

    /// ### \[\[DefineOwnProperty\]\] ( P, Desc )
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        ordinary_define_own_property(
            agent,
            self.get_backing_object(),
            property_key,
            property_descriptor,
        )
    }

    /// ### \[\[HasProperty\]\] ( P )
    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        ordinary_has_property(agent, self.get_backing_object(), property_key)
    }

    /// ### \[\[Get\]\] ( P, Receiver )
    fn internal_get(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        ordinary_get(agent, self.get_backing_object(), property_key, receiver)
    }

    /// ### \[\[Set\]\] ( P, V, Receiver )
    fn internal_set(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        ordinary_set(
            agent,
            self.get_backing_object(),
            property_key,
            value,
            receiver,
        )
    }

    /// ### \[\[Delete\]\] ( P )
    fn internal_delete(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        ordinary_delete(agent, self.get_backing_object(), property_key)
    }

    /// ### \[\[OwnPropertyKeys\]\] ( )
    fn internal_own_property_keys(self, agent: &Agent) -> JsResult<Vec<PropertyKey>> {
        Ok(ordinary_own_property_keys(agent, self.get_backing_object()))
    }
}

/// Forward an internal method call to the implementation of the object's
/// exotic kind.
macro_rules! dispatch {
    ($object:ident, $agent:ident, $method:ident($($argument:expr),*)) => {
        match $object.exotic_kind($agent) {
            ExoticKind::Ordinary => OrdinaryObject($object).$method($agent, $($argument),*),
            ExoticKind::ImmutablePrototype => {
                ImmutablePrototypeObject($object).$method($agent, $($argument),*)
            }
            ExoticKind::Array => ArrayObject($object).$method($agent, $($argument),*),
            ExoticKind::Arguments => ArgumentsObject($object).$method($agent, $($argument),*),
            ExoticKind::StringExotic => StringObject($object).$method($agent, $($argument),*),
            ExoticKind::Proxy => ProxyObject($object).$method($agent, $($argument),*),
            ExoticKind::TypedArray => TypedArrayObject($object).$method($agent, $($argument),*),
            ExoticKind::ModuleNamespace => {
                ModuleNamespaceObject($object).$method($agent, $($argument),*)
            }
        }
    };
}

impl InternalMethods for Object {
    fn get_backing_object(self) -> Object {
        self
    }

    fn internal_get_prototype_of(self, agent: &Agent) -> JsResult<Option<Object>> {
        dispatch!(self, agent, internal_get_prototype_of())
    }

    fn internal_set_prototype_of(self, agent: &Agent, prototype: Option<Object>) -> JsResult<bool> {
        dispatch!(self, agent, internal_set_prototype_of(prototype))
    }

    fn internal_is_extensible(self, agent: &Agent) -> JsResult<bool> {
        dispatch!(self, agent, internal_is_extensible())
    }

    fn internal_prevent_extensions(self, agent: &Agent) -> JsResult<bool> {
        dispatch!(self, agent, internal_prevent_extensions())
    }

    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        dispatch!(self, agent, internal_get_own_property(property_key))
    }

    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        dispatch!(
            self,
            agent,
            internal_define_own_property(property_key, property_descriptor)
        )
    }

    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        dispatch!(self, agent, internal_has_property(property_key))
    }

    fn internal_get(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        dispatch!(self, agent, internal_get(property_key, receiver))
    }

    fn internal_set(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        dispatch!(self, agent, internal_set(property_key, value, receiver))
    }

    fn internal_delete(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        dispatch!(self, agent, internal_delete(property_key))
    }

    fn internal_own_property_keys(self, agent: &Agent) -> JsResult<Vec<PropertyKey>> {
        dispatch!(self, agent, internal_own_property_keys())
    }
}
