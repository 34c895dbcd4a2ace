// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod data;
mod internal_methods;
mod property_key;
mod property_storage;

pub(crate) use data::{
    ExoticKind, ObjectHeapData, ObjectKind, PrivateElement, PrivateElementKind,
};
pub use internal_methods::InternalMethods;
pub use property_key::PropertyKey;
pub(crate) use property_storage::PropertyStorage;
pub use property_storage::{Property, PropertyValue};

use crate::ecmascript::{execution::Agent, types::Value};

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
///
/// Handle to an object in the agent heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Object(pub(crate) u32);

impl Object {
    pub(crate) fn create(agent: &Agent, prototype: Option<Object>, kind: ObjectKind) -> Self {
        agent
            .heap_mut()
            .create_object(ObjectHeapData::new(prototype, kind))
    }

    pub(crate) fn exotic_kind(self, agent: &Agent) -> ExoticKind {
        agent.object(self).kind.exotic_kind()
    }

    /// The \[\[Prototype\]\] slot, without invoking any exotic behaviour.
    pub(crate) fn prototype_slot(self, agent: &Agent) -> Option<Object> {
        agent.object(self).prototype
    }

    pub(crate) fn set_prototype_slot(self, agent: &Agent, prototype: Option<Object>) {
        agent.object_mut(self).prototype = prototype;
    }

    pub(crate) fn extensible_slot(self, agent: &Agent) -> bool {
        agent.object(self).extensible
    }

    pub(crate) fn set_extensible_slot(self, agent: &Agent, extensible: bool) {
        agent.object_mut(self).extensible = extensible;
    }

    /// Own property from the property storage, ignoring exotic behaviour.
    pub(crate) fn property_slot(self, agent: &Agent, key: PropertyKey) -> Option<Property> {
        agent.object(self).properties.get(&key).copied()
    }

    /// Write an own property into the property storage directly.
    pub(crate) fn insert_property(self, agent: &Agent, key: PropertyKey, property: Property) {
        agent.object_mut(self).properties.insert(key, property);
    }

    pub(crate) fn remove_property(self, agent: &Agent, key: PropertyKey) -> Option<Property> {
        agent.object_mut(self).properties.remove(&key)
    }

    /// Own keys of the property storage in \[\[OwnPropertyKeys\]\] order.
    pub(crate) fn storage_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        agent.object(self).properties.ordered_keys()
    }

    /// Replace the value of an existing data property in place, or create a
    /// writable, enumerable and configurable one.
    pub(crate) fn set_data_slot(self, agent: &Agent, key: PropertyKey, value: Value) {
        let mut heap = agent.heap_mut();
        let properties = &mut heap.objects[self.0 as usize].properties;
        if let Some(Property {
            value: PropertyValue::Data { value: slot, .. },
            ..
        }) = properties.get_mut(&key)
        {
            *slot = value;
            return;
        }
        properties.insert(key, Property::data(value, true, true, true));
    }

    /// True if this object has an \[\[ErrorData\]\] internal slot.
    pub fn is_error(self, agent: &Agent) -> bool {
        matches!(agent.object(self).kind, ObjectKind::Error)
    }

    pub fn is_array_exotic(self, agent: &Agent) -> bool {
        matches!(agent.object(self).kind, ObjectKind::Array)
    }
}
