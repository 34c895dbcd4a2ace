// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [24.1.5 Map Iterator Objects](https://tc39.es/ecma262/#sec-map-iterator-objects)

use super::{KeyedCollection, require_collection};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::create_iter_result_object,
        operations_on_objects::create_array_from_list,
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin,
        indexed_collections::array_iterator_objects::CollectionIteratorKind,
    },
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

/// ### [24.1.5.1 CreateMapIterator ( map, kind )](https://tc39.es/ecma262/#sec-createmapiterator)
pub(super) fn create_map_iterator(
    agent: &Agent,
    map: Value,
    kind: CollectionIteratorKind,
) -> JsResult<Value> {
    // 1. Perform ? RequireInternalSlot(map, [[MapData]]).
    let method = match kind {
        CollectionIteratorKind::Key => "Map.prototype.keys",
        CollectionIteratorKind::Value => "Map.prototype.values",
        CollectionIteratorKind::KeyValue => "Map.prototype.entries",
    };
    let map = require_collection(agent, map, KeyedCollection::Map, method)?;
    // 2. Let closure be a new Abstract Closure with no parameters that
    // captures map and kind and performs the following steps when called:
    // 3. Return CreateIteratorFromClosure(closure, "%MapIteratorPrototype%",
    // %MapIteratorPrototype%).
    let iterator = Object::create(
        agent,
        Some(agent.intrinsics().map_iterator_prototype()),
        ObjectKind::MapIterator {
            iterated: Some(map),
            next_index: 0,
            kind,
        },
    );
    Ok(Value::Object(iterator))
}

/// Advance a Map or Set iterator: the next live entry of `iterated` at or
/// after `next_index`, with the index to continue from.
pub(crate) fn next_collection_entry(
    agent: &Agent,
    iterated: Object,
    next_index: usize,
) -> Option<((Value, Value), usize)> {
    let object = agent.object(iterated);
    let data = match &object.kind {
        ObjectKind::Map(data) | ObjectKind::Set(data) => data,
        _ => return None,
    };
    (next_index..data.slot_count())
        .find_map(|index| data.slot(index).map(|entry| (entry, index + 1)))
}

/// The iterator result for one entry of a keyed collection.
pub(crate) fn collection_entry_result(
    agent: &Agent,
    (key, value): (Value, Value),
    kind: CollectionIteratorKind,
) -> Object {
    let result = match kind {
        CollectionIteratorKind::Key => key,
        CollectionIteratorKind::Value => value,
        CollectionIteratorKind::KeyValue => {
            Value::Object(create_array_from_list(agent, &[key, value]))
        }
    };
    create_iter_result_object(agent, result, false)
}

pub(crate) struct MapIteratorPrototype;

struct MapIteratorPrototypeNext;
impl Builtin for MapIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapIteratorPrototype::next);
}

impl MapIteratorPrototype {
    /// ### [24.1.5.2.1 %MapIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%mapiteratorprototype%.next)
    fn next(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? GeneratorResume(this value, EMPTY, "%MapIteratorPrototype%").
        let state = match this_value {
            Value::Object(iterator) => match agent.object(iterator).kind {
                ObjectKind::MapIterator {
                    iterated,
                    next_index,
                    kind,
                } => Some((iterator, iterated, next_index, kind)),
                _ => None,
            },
            _ => None,
        };
        let Some((iterator, iterated, next_index, kind)) = state else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!(
                    "Method %MapIteratorPrototype%.next called on incompatible receiver {}",
                    this_value.to_display_string(agent)
                ),
            ));
        };
        let entry = iterated.and_then(|map| next_collection_entry(agent, map, next_index));
        let result = match entry {
            Some((entry, next_index)) => {
                set_iterator_state(agent, iterator, iterated, next_index);
                collection_entry_result(agent, entry, kind)
            }
            None => {
                // The closure has returned; the iterator stays exhausted.
                set_iterator_state(agent, iterator, None, next_index);
                create_iter_result_object(agent, Value::Undefined, true)
            }
        };
        Ok(Value::Object(result))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.map_iterator_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(2)
            .with_prototype(intrinsics.iterator_prototype())
            .with_builtin_function_property::<MapIteratorPrototypeNext>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Map Iterator"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

fn set_iterator_state(
    agent: &Agent,
    iterator: Object,
    new_iterated: Option<Object>,
    new_next_index: usize,
) {
    if let ObjectKind::MapIterator {
        iterated,
        next_index,
        ..
    } = &mut agent.object_mut(iterator).kind
    {
        *iterated = new_iterated;
        *next_index = new_next_index;
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn iterators_observe_later_mutation() {
        assert_eq!(
            run_to_string(
                "var m = new Map([[1, 'a'], [2, 'b']]);
                 var it = m.keys(); var first = it.next().value;
                 m.delete(2); m.set(3, 'c');
                 [first, it.next().value, it.next().done].join()"
            ),
            "1,3,true"
        );
    }

    #[test]
    fn exhausted_iterators_stay_done() {
        assert_eq!(
            run_to_string(
                "var m = new Map(); var it = m.values(); it.next(); m.set(1, 1);
                 it.next().done"
            ),
            "true"
        );
        assert_eq!(
            run_to_string(
                "var it = new Map().entries();
                 [Object.prototype.toString.call(it), typeof it[Symbol.iterator]].join()"
            ),
            "[object Map Iterator],function"
        );
    }

    #[test]
    fn cleared_maps_end_iteration() {
        assert_eq!(
            run_to_string(
                "var m = new Map([[1, 1], [2, 2]]); var it = m.entries(); it.next();
                 m.clear(); it.next().done + ':' + m.size"
            ),
            "true:0"
        );
    }
}
