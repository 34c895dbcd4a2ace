// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    ordinary_object_builder::builtin_key,
    property_builder::{NoKey, PropertyBuilder},
};
use crate::ecmascript::{
    builtins::{
        Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsic, BuiltinIntrinsicConstructor,
        builtin_function::BuiltinFunctionData,
    },
    execution::{Agent, Realm},
    types::{
        HeapString, Object, ObjectHeapData, ObjectKind, Property, PropertyKey, PropertyStorage,
        Value,
    },
};

/// Builder for built-in function objects defined by ECMA-262.
pub(crate) struct BuiltinFunctionBuilder<'agent> {
    pub(crate) agent: &'agent Agent,
    realm: Realm,
    this: Option<Object>,
    prototype: Option<Object>,
    behaviour: Behaviour,
    length: u8,
    name: &'static str,
    name_prefix: Option<&'static str>,
    properties: Vec<(PropertyKey, Property)>,
}

impl<'agent> BuiltinFunctionBuilder<'agent> {
    pub(crate) fn new<T: Builtin>(agent: &'agent Agent, realm: Realm) -> Self {
        Self {
            agent,
            realm,
            this: None,
            prototype: None,
            behaviour: T::BEHAVIOUR,
            length: T::LENGTH,
            name: T::NAME,
            name_prefix: None,
            properties: Vec::new(),
        }
    }

    /// Build into the preallocated intrinsic constructor object.
    pub(crate) fn new_intrinsic_constructor<T: BuiltinIntrinsicConstructor>(
        agent: &'agent Agent,
        realm: Realm,
    ) -> Self {
        let this = realm.intrinsics(agent).get(T::INDEX);
        Self {
            this: Some(this),
            ..Self::new::<T>(agent, realm)
        }
    }

    /// Build into the preallocated intrinsic function object.
    pub(crate) fn new_intrinsic_function<T: BuiltinIntrinsic>(
        agent: &'agent Agent,
        realm: Realm,
    ) -> Self {
        let this = realm.intrinsics(agent).get(T::INDEX);
        Self {
            this: Some(this),
            ..Self::new::<T>(agent, realm)
        }
    }

    /// Prefix of the `name` property, such as "get".
    pub(crate) fn with_name_prefix(mut self, prefix: &'static str) -> Self {
        self.name_prefix = Some(prefix);
        self
    }

    /// The \[\[Prototype\]\] of the function. Defaults to the realm's
    /// %Function.prototype%.
    pub(crate) fn with_prototype(mut self, prototype: Object) -> Self {
        self.prototype = Some(prototype);
        self
    }

    pub(crate) fn with_property_capacity(mut self, capacity: usize) -> Self {
        self.properties.reserve(capacity);
        self
    }

    /// The non-writable, non-enumerable and non-configurable `prototype`
    /// property of a constructor.
    pub(crate) fn with_prototype_property(mut self, prototype: Object) -> Self {
        let key = PropertyKey::from_str(self.agent, "prototype");
        self.properties.push((
            key,
            Property::data(Value::Object(prototype), false, false, false),
        ));
        self
    }

    pub(crate) fn with_data_property(mut self, key: PropertyKey, value: Value) -> Self {
        self.properties
            .push((key, Property::data(value, true, false, true)));
        self
    }

    pub(crate) fn with_property(
        mut self,
        creator: impl FnOnce(PropertyBuilder<'_, NoKey>) -> (PropertyKey, Property),
    ) -> Self {
        let property = creator(PropertyBuilder::new(self.agent));
        self.properties.push(property);
        self
    }

    pub(crate) fn with_builtin_function_property<T: Builtin>(mut self) -> Self {
        let function = BuiltinFunctionBuilder::new::<T>(self.agent, self.realm).build();
        let key = builtin_key::<T>(self.agent);
        self.properties.push((
            key,
            Property::data(
                Value::Object(function),
                T::WRITABLE,
                T::ENUMERABLE,
                T::CONFIGURABLE,
            ),
        ));
        self
    }

    pub(crate) fn with_builtin_function_getter_property<T: BuiltinGetter>(mut self) -> Self {
        let getter = BuiltinFunctionBuilder::new::<T>(self.agent, self.realm)
            .with_name_prefix("get")
            .build();
        let key = builtin_key::<T>(self.agent);
        self.properties.push((
            key,
            Property::accessor(Some(getter), None, T::ENUMERABLE, T::CONFIGURABLE),
        ));
        self
    }

    pub(crate) fn build(self) -> Object {
        let agent = self.agent;
        let prototype = self
            .prototype
            .unwrap_or_else(|| self.realm.intrinsics(agent).function_prototype());
        let name = match self.name_prefix {
            Some(prefix) => HeapString::from_str(agent, &format!("{prefix} {}", self.name)),
            None => HeapString::from_str(agent, self.name),
        };
        let mut properties = PropertyStorage::with_capacity(self.properties.len() + 2);
        properties.insert(
            PropertyKey::from_str(agent, "length"),
            Property::data(Value::from(u32::from(self.length)), false, false, true),
        );
        properties.insert(
            PropertyKey::from_str(agent, "name"),
            Property::data(Value::String(name), false, false, true),
        );
        for (key, property) in self.properties {
            properties.insert(key, property);
        }
        let data = ObjectHeapData {
            prototype: Some(prototype),
            extensible: true,
            properties,
            private_elements: Vec::new(),
            kind: ObjectKind::BuiltinFunction(BuiltinFunctionData {
                behaviour: self.behaviour,
                realm: self.realm,
                initial_name: Some(name),
            }),
        };
        let mut heap = agent.heap_mut();
        match self.this {
            Some(this) => {
                heap.objects[this.0 as usize] = data;
                this
            }
            None => heap.create_object(data),
        }
    }
}
