// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [24.1 Map Objects](https://tc39.es/ecma262/#sec-map-objects)

mod map_constructor;
mod map_iterator_prototype;
mod map_prototype;

use ahash::AHashMap;
pub(crate) use map_constructor::MapConstructor;
pub(crate) use map_iterator_prototype::{
    MapIteratorPrototype, collection_entry_result, next_collection_entry,
};
pub(crate) use map_prototype::MapPrototype;
use num_bigint::BigInt;

use crate::ecmascript::{
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{HeapString, Object, ObjectKind, Symbol, Value},
};

/// A Map or Set key normalised so that keys equal under SameValueZero hash
/// and compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum MapKey {
    Undefined,
    Null,
    Boolean(bool),
    /// Bits of the number with -0 folded into +0 and every NaN folded into
    /// one.
    Number(u64),
    String(HeapString),
    Symbol(Symbol),
    BigInt(BigInt),
    Object(Object),
}

impl MapKey {
    pub(crate) fn new(agent: &Agent, value: Value) -> Self {
        match value {
            Value::Undefined => MapKey::Undefined,
            Value::Null => MapKey::Null,
            Value::Boolean(value) => MapKey::Boolean(value),
            Value::Number(value) if value.is_nan() => MapKey::Number(f64::NAN.to_bits()),
            Value::Number(value) if value == 0.0 => MapKey::Number(0f64.to_bits()),
            Value::Number(value) => MapKey::Number(value.to_bits()),
            Value::String(value) => MapKey::String(value),
            Value::Symbol(value) => MapKey::Symbol(value),
            Value::BigInt(value) => MapKey::BigInt(value.value(agent)),
            Value::Object(value) => MapKey::Object(value),
        }
    }
}

/// ### \[\[MapData\]\] / \[\[SetData\]\]
///
/// Entries in insertion order. Deleted entries leave an empty slot behind so
/// that the positions held by live iterators stay valid; a Set stores each
/// value as both key and value.
#[derive(Debug, Default)]
pub(crate) struct MapData {
    entries: Vec<Option<(Value, Value)>>,
    index: AHashMap<MapKey, usize>,
}

impl MapData {
    pub(crate) fn size(&self) -> usize {
        self.index.len()
    }

    /// Number of slots, including emptied ones. Iterators walk up to this
    /// bound.
    pub(crate) fn slot_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn slot(&self, index: usize) -> Option<(Value, Value)> {
        self.entries.get(index).copied().flatten()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (Value, Value)> + '_ {
        self.entries.iter().filter_map(|entry| *entry)
    }

    pub(crate) fn get(&self, key: &MapKey) -> Option<Value> {
        let index = *self.index.get(key)?;
        self.slot(index).map(|(_, value)| value)
    }

    pub(crate) fn has(&self, key: &MapKey) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or overwrite. A new key is appended after every existing
    /// entry.
    pub(crate) fn set(&mut self, key: MapKey, key_value: Value, value: Value) {
        let key_value = canonicalize_keyed_collection_key(key_value);
        match self.index.get(&key) {
            Some(&index) => self.entries[index] = Some((key_value, value)),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(Some((key_value, value)));
            }
        }
    }

    pub(crate) fn delete(&mut self, key: &MapKey) -> bool {
        match self.index.remove(key) {
            Some(index) => {
                self.entries[index] = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
    }
}

/// ### [24.5.1 CanonicalizeKeyedCollectionKey ( key )](https://tc39.es/ecma262/#sec-canonicalizekeyedcollectionkey)
///
/// -0 is stored as +0.
pub(crate) fn canonicalize_keyed_collection_key(key: Value) -> Value {
    match key {
        Value::Number(number) if number == 0.0 => Value::Number(0.0),
        key => key,
    }
}

/// Which internal slot a keyed collection method expects on its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyedCollection {
    Map,
    Set,
}

/// ### [10.1.15 RequireInternalSlot ( O, internalSlot )](https://tc39.es/ecma262/#sec-requireinternalslot)
/// for \[\[MapData\]\] and \[\[SetData\]\]. The TypeError names `method`.
pub(crate) fn require_collection(
    agent: &Agent,
    value: Value,
    collection: KeyedCollection,
    method: &str,
) -> JsResult<Object> {
    if let Value::Object(object) = value
        && matches!(
            (&agent.object(object).kind, collection),
            (ObjectKind::Map(_), KeyedCollection::Map) | (ObjectKind::Set(_), KeyedCollection::Set)
        )
    {
        return Ok(object);
    }
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        format!(
            "Method {method} called on incompatible receiver {}",
            value.to_display_string(agent)
        ),
    ))
}

/// Run `f` on the \[\[MapData\]\] or \[\[SetData\]\] of `this_value`.
pub(crate) fn with_collection_data<R>(
    agent: &Agent,
    this_value: Value,
    collection: KeyedCollection,
    method: &str,
    f: impl FnOnce(&mut MapData) -> R,
) -> JsResult<R> {
    let object = require_collection(agent, this_value, collection, method)?;
    let mut object = agent.object_mut(object);
    match &mut object.kind {
        ObjectKind::Map(data) | ObjectKind::Set(data) => Ok(f(data)),
        _ => Err(agent.internal_error("keyed collection lost its data slot")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, agent::Options};

    #[test]
    fn keys_follow_same_value_zero() {
        let agent = Agent::new(Options::default(), std::rc::Rc::new(DefaultHostHooks));
        assert_eq!(
            MapKey::new(&agent, Value::Number(-0.0)),
            MapKey::new(&agent, Value::Number(0.0))
        );
        assert_eq!(
            MapKey::new(&agent, Value::Number(f64::NAN)),
            MapKey::new(&agent, Value::Number(-f64::NAN))
        );
        assert_ne!(
            MapKey::new(&agent, Value::Number(1.0)),
            MapKey::new(&agent, Value::from_str(&agent, "1"))
        );
    }

    #[test]
    fn deleted_slots_keep_positions() {
        let mut data = MapData::default();
        data.set(MapKey::Number(1f64.to_bits()), 1.into(), 10.into());
        data.set(MapKey::Number(2f64.to_bits()), 2.into(), 20.into());
        assert!(data.delete(&MapKey::Number(1f64.to_bits())));
        assert_eq!(data.size(), 1);
        assert_eq!(data.slot_count(), 2);
        assert_eq!(data.slot(0), None);
        data.set(MapKey::Number(1f64.to_bits()), 1.into(), 11.into());
        assert_eq!(
            data.entries().collect::<Vec<_>>(),
            vec![(2.into(), 20.into()), (1.into(), 11.into())]
        );
    }
}
