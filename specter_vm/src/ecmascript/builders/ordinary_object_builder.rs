// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    builtin_function_builder::BuiltinFunctionBuilder,
    property_builder::{NoKey, PropertyBuilder},
};
use crate::ecmascript::{
    builtins::{Builtin, BuiltinGetter, BuiltinIntrinsic},
    execution::{Agent, Realm},
    types::{
        Object, ObjectHeapData, ObjectKind, Property, PropertyKey, PropertyStorage, Value,
    },
};

/// Builder for ordinary objects and intrinsic objects that are not
/// functions.
pub(crate) struct OrdinaryObjectBuilder<'agent> {
    pub(crate) agent: &'agent Agent,
    realm: Realm,
    this: Option<Object>,
    prototype: Option<Object>,
    extensible: bool,
    kind: ObjectKind,
    properties: PropertyStorage,
}

impl<'agent> OrdinaryObjectBuilder<'agent> {
    pub(crate) fn new(agent: &'agent Agent, realm: Realm) -> Self {
        Self {
            agent,
            realm,
            this: None,
            prototype: None,
            extensible: true,
            kind: ObjectKind::Ordinary,
            properties: PropertyStorage::default(),
        }
    }

    /// Build into the preallocated intrinsic object `this`.
    pub(crate) fn new_intrinsic_object(agent: &'agent Agent, realm: Realm, this: Object) -> Self {
        Self {
            this: Some(this),
            ..Self::new(agent, realm)
        }
    }

    pub(crate) fn with_prototype(mut self, prototype: Object) -> Self {
        self.prototype = Some(prototype);
        self
    }

    pub(crate) fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_property_capacity(mut self, capacity: usize) -> Self {
        self.properties = PropertyStorage::with_capacity(capacity);
        self
    }

    /// Add a writable, non-enumerable and configurable data property.
    pub(crate) fn with_data_property(mut self, key: PropertyKey, value: Value) -> Self {
        self.properties
            .insert(key, Property::data(value, true, false, true));
        self
    }

    pub(crate) fn with_property(
        mut self,
        creator: impl FnOnce(PropertyBuilder<'_, NoKey>) -> (PropertyKey, Property),
    ) -> Self {
        let (key, property) = creator(PropertyBuilder::new(self.agent));
        self.properties.insert(key, property);
        self
    }

    pub(crate) fn with_constructor_property(self, constructor: Object) -> Self {
        let key = PropertyKey::from_str(self.agent, "constructor");
        self.with_data_property(key, Value::Object(constructor))
    }

    pub(crate) fn with_builtin_function_property<T: Builtin>(mut self) -> Self {
        let function = BuiltinFunctionBuilder::new::<T>(self.agent, self.realm).build();
        self.insert_builtin::<T>(function);
        self
    }

    pub(crate) fn with_builtin_intrinsic_function_property<T: BuiltinIntrinsic>(mut self) -> Self {
        let function = BuiltinFunctionBuilder::new_intrinsic_function::<T>(self.agent, self.realm)
            .build();
        self.insert_builtin::<T>(function);
        self
    }

    pub(crate) fn with_builtin_function_getter_property<T: BuiltinGetter>(mut self) -> Self {
        let getter = BuiltinFunctionBuilder::new::<T>(self.agent, self.realm)
            .with_name_prefix("get")
            .build();
        let key = builtin_key::<T>(self.agent);
        self.properties.insert(
            key,
            Property::accessor(Some(getter), None, T::ENUMERABLE, T::CONFIGURABLE),
        );
        self
    }

    fn insert_builtin<T: Builtin>(&mut self, function: Object) {
        let key = builtin_key::<T>(self.agent);
        self.properties.insert(
            key,
            Property::data(
                Value::Object(function),
                T::WRITABLE,
                T::ENUMERABLE,
                T::CONFIGURABLE,
            ),
        );
    }

    pub(crate) fn build(self) -> Object {
        let data = ObjectHeapData {
            prototype: self.prototype,
            extensible: self.extensible,
            properties: self.properties,
            private_elements: Vec::new(),
            kind: self.kind,
        };
        let mut heap = self.agent.heap_mut();
        match self.this {
            Some(this) => {
                heap.objects[this.0 as usize] = data;
                this
            }
            None => heap.create_object(data),
        }
    }
}

/// The property key a built-in function is installed under.
pub(crate) fn builtin_key<T: Builtin>(agent: &Agent) -> PropertyKey {
    match T::KEY {
        Some(symbol) => PropertyKey::Symbol(symbol),
        None => PropertyKey::from_str(agent, T::NAME),
    }
}
