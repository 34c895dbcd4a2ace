// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [24.2.6 Set Iterator Objects](https://tc39.es/ecma262/#sec-set-iterator-objects)

use crate::ecmascript::{
    abstract_operations::operations_on_iterator_objects::create_iter_result_object,
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin,
        indexed_collections::array_iterator_objects::CollectionIteratorKind,
        keyed_collections::map_objects::{
            KeyedCollection, collection_entry_result, next_collection_entry, require_collection,
        },
    },
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

/// ### [24.2.6.1 CreateSetIterator ( set, kind )](https://tc39.es/ecma262/#sec-createsetiterator)
pub(super) fn create_set_iterator(
    agent: &Agent,
    set: Value,
    kind: CollectionIteratorKind,
) -> JsResult<Value> {
    // 1. Perform ? RequireInternalSlot(set, [[SetData]]).
    let method = match kind {
        CollectionIteratorKind::KeyValue => "Set.prototype.entries",
        _ => "Set.prototype.values",
    };
    let set = require_collection(agent, set, KeyedCollection::Set, method)?;
    // 2. Let closure be a new Abstract Closure with no parameters that
    // captures set and kind and performs the following steps when called:
    // 3. Return CreateIteratorFromClosure(closure, "%SetIteratorPrototype%",
    // %SetIteratorPrototype%).
    let iterator = Object::create(
        agent,
        Some(agent.intrinsics().set_iterator_prototype()),
        ObjectKind::SetIterator {
            iterated: Some(set),
            next_index: 0,
            kind,
        },
    );
    Ok(Value::Object(iterator))
}

pub(crate) struct SetIteratorPrototype;

struct SetIteratorPrototypeNext;
impl Builtin for SetIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetIteratorPrototype::next);
}

impl SetIteratorPrototype {
    /// ### [24.2.6.2.1 %SetIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%setiteratorprototype%.next)
    fn next(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let state = match this_value {
            Value::Object(iterator) => match agent.object(iterator).kind {
                ObjectKind::SetIterator {
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
                    "Method %SetIteratorPrototype%.next called on incompatible receiver {}",
                    this_value.to_display_string(agent)
                ),
            ));
        };
        let entry = iterated.and_then(|set| next_collection_entry(agent, set, next_index));
        let (iterated, next_index) = match entry {
            Some((_, next_index)) => (iterated, next_index),
            None => (None, next_index),
        };
        if let ObjectKind::SetIterator {
            iterated: slot_iterated,
            next_index: slot_next_index,
            ..
        } = &mut agent.object_mut(iterator).kind
        {
            *slot_iterated = iterated;
            *slot_next_index = next_index;
        }
        let result = match entry {
            Some((entry, _)) => collection_entry_result(agent, entry, kind),
            None => create_iter_result_object(agent, Value::Undefined, true),
        };
        Ok(Value::Object(result))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.set_iterator_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(2)
            .with_prototype(intrinsics.iterator_prototype())
            .with_builtin_function_property::<SetIteratorPrototypeNext>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Set Iterator"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn values_added_during_iteration_are_visited() {
        assert_eq!(
            run_to_string(
                "var s = new Set([1]); var out = [];
                 for (var v of s) { out.push(v); if (v < 4) s.add(v + 1); }
                 out.join()"
            ),
            "1,2,3,4"
        );
    }

    #[test]
    fn next_rejects_other_iterators() {
        assert_eq!(
            run_to_string(
                "var next = new Set().values().next;
                 try { next.call(new Map().keys()) } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }
}
