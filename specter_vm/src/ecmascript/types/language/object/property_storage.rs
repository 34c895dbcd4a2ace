// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::RandomState;
use hashbrown::HashMap;

use super::{Object, PropertyKey};
use crate::ecmascript::types::{PropertyDescriptor, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Data { value: Value, writable: bool },
    Accessor {
        get: Option<Object>,
        set: Option<Object>,
    },
}

/// A stored property. Unlike a [`PropertyDescriptor`] every field is
/// present and the property is always fully data or fully accessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property {
    pub value: PropertyValue,
    pub enumerable: bool,
    pub configurable: bool,
}

impl Property {
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: PropertyValue::Data { value, writable },
            enumerable,
            configurable,
        }
    }

    pub fn accessor(
        get: Option<Object>,
        set: Option<Object>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self {
            value: PropertyValue::Accessor { get, set },
            enumerable,
            configurable,
        }
    }

    pub fn to_descriptor(self) -> PropertyDescriptor {
        match self.value {
            PropertyValue::Data { value, writable } => PropertyDescriptor {
                value: Some(value),
                writable: Some(writable),
                get: None,
                set: None,
                enumerable: Some(self.enumerable),
                configurable: Some(self.configurable),
            },
            PropertyValue::Accessor { get, set } => PropertyDescriptor {
                value: None,
                writable: None,
                get: Some(get),
                set: Some(set),
                enumerable: Some(self.enumerable),
                configurable: Some(self.configurable),
            },
        }
    }
}

/// Insertion ordered property table.
#[derive(Debug, Default)]
pub(crate) struct PropertyStorage {
    entries: Vec<Option<(PropertyKey, Property)>>,
    index: HashMap<PropertyKey, usize, RandomState>,
    removed: usize,
}

impl PropertyStorage {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            removed: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn get(&self, key: &PropertyKey) -> Option<&Property> {
        let position = *self.index.get(key)?;
        self.entries[position].as_ref().map(|(_, property)| property)
    }

    pub(crate) fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut Property> {
        let position = *self.index.get(key)?;
        self.entries[position].as_mut().map(|(_, property)| property)
    }

    /// Insert or replace a property. Replacing keeps the original position.
    pub(crate) fn insert(&mut self, key: PropertyKey, property: Property) {
        if let Some(&position) = self.index.get(&key) {
            self.entries[position] = Some((key, property));
            return;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(Some((key, property)));
    }

    pub(crate) fn remove(&mut self, key: &PropertyKey) -> Option<Property> {
        let position = self.index.remove(key)?;
        let (_, property) = self.entries[position].take()?;
        self.removed += 1;
        if self.removed > 16 && self.removed * 2 > self.entries.len() {
            self.compact();
        }
        Some(property)
    }

    fn compact(&mut self) {
        self.entries.retain(Option::is_some);
        self.index.clear();
        for (position, entry) in self.entries.iter().enumerate() {
            if let Some((key, _)) = entry {
                self.index.insert(*key, position);
            }
        }
        self.removed = 0;
    }

    /// Entries in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (PropertyKey, Property)> + '_ {
        self.entries.iter().flatten().copied()
    }

    /// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
    pub(crate) fn ordered_keys(&self) -> Vec<PropertyKey> {
        let mut keys = Vec::with_capacity(self.len());
        // 2. For each own property key P of O such that P is an array index,
        // in ascending numeric index order, do
        let mut indices: Vec<u32> = self
            .iter()
            .filter_map(|(key, _)| key.as_array_index())
            .collect();
        indices.sort_unstable();
        keys.extend(indices.into_iter().map(PropertyKey::Integer));
        // 3. For each own property key P of O such that P is a String and P
        // is not an array index, in ascending chronological order of
        // property creation, do
        keys.extend(
            self.iter()
                .map(|(key, _)| key)
                .filter(|key| matches!(key, PropertyKey::String(_))),
        );
        // 4. For each own property key P of O such that P is a Symbol, in
        // ascending chronological order of property creation, do
        keys.extend(self.iter().map(|(key, _)| key).filter(|key| key.is_symbol()));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::types::{HeapString, Symbol};

    fn data(n: f64) -> Property {
        Property::data(Value::Number(n), true, true, true)
    }

    #[test]
    fn own_keys_order() {
        let mut storage = PropertyStorage::default();
        storage.insert(PropertyKey::String(HeapString(7)), data(0.0));
        storage.insert(PropertyKey::Symbol(Symbol(1)), data(1.0));
        storage.insert(PropertyKey::Integer(10), data(2.0));
        storage.insert(PropertyKey::String(HeapString(3)), data(3.0));
        storage.insert(PropertyKey::Integer(2), data(4.0));
        assert_eq!(
            storage.ordered_keys(),
            [
                PropertyKey::Integer(2),
                PropertyKey::Integer(10),
                PropertyKey::String(HeapString(7)),
                PropertyKey::String(HeapString(3)),
                PropertyKey::Symbol(Symbol(1)),
            ]
        );
    }

    #[test]
    fn removal_keeps_order_of_remaining_keys() {
        let mut storage = PropertyStorage::default();
        for i in 0..40 {
            storage.insert(PropertyKey::String(HeapString(i)), data(f64::from(i)));
        }
        for i in 0..30 {
            assert!(storage.remove(&PropertyKey::String(HeapString(i))).is_some());
        }
        let keys: Vec<_> = storage.iter().map(|(key, _)| key).collect();
        assert_eq!(keys.len(), 10);
        assert_eq!(keys[0], PropertyKey::String(HeapString(30)));
        assert!(storage.get(&PropertyKey::String(HeapString(39))).is_some());
        // Re-adding a removed key appends it at the end.
        storage.insert(PropertyKey::String(HeapString(0)), data(0.0));
        assert_eq!(
            storage.iter().last().map(|(key, _)| key),
            Some(PropertyKey::String(HeapString(0)))
        );
    }
}
