// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    KeyedCollection, MapData, MapKey, map_iterator_prototype::create_map_iterator,
    with_collection_data,
};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::call_function,
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter,
        control_abstraction_objects::promise_objects::promise_abstract_operations::as_callable,
        indexed_collections::array_iterator_objects::CollectionIteratorKind,
    },
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{PropertyKey, Symbol, Value},
};

pub(crate) struct MapPrototype;

struct MapPrototypeClear;
impl Builtin for MapPrototypeClear {
    const NAME: &'static str = "clear";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::clear);
}

struct MapPrototypeDelete;
impl Builtin for MapPrototypeDelete {
    const NAME: &'static str = "delete";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::delete);
}

struct MapPrototypeEntries;
impl Builtin for MapPrototypeEntries {
    const NAME: &'static str = "entries";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::entries);
}

struct MapPrototypeForEach;
impl Builtin for MapPrototypeForEach {
    const NAME: &'static str = "forEach";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::for_each);
}

struct MapPrototypeGet;
impl Builtin for MapPrototypeGet {
    const NAME: &'static str = "get";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::get);
}

struct MapPrototypeHas;
impl Builtin for MapPrototypeHas {
    const NAME: &'static str = "has";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::has);
}

struct MapPrototypeKeys;
impl Builtin for MapPrototypeKeys {
    const NAME: &'static str = "keys";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::keys);
}

struct MapPrototypeSet;
impl Builtin for MapPrototypeSet {
    const NAME: &'static str = "set";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::set);
}

struct MapPrototypeGetSize;
impl Builtin for MapPrototypeGetSize {
    const NAME: &'static str = "size";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::get_size);
}
impl BuiltinGetter for MapPrototypeGetSize {}

struct MapPrototypeValues;
impl Builtin for MapPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::values);
}

fn with_map_data<R>(
    agent: &Agent,
    this_value: Value,
    method: &str,
    f: impl FnOnce(&mut MapData) -> R,
) -> JsResult<R> {
    with_collection_data(agent, this_value, KeyedCollection::Map, method, f)
}

impl MapPrototype {
    /// ### [24.1.3.1 Map.prototype.clear ( )](https://tc39.es/ecma262/#sec-map.prototype.clear)
    fn clear(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let M be the this value.
        // 2. Perform ? RequireInternalSlot(M, [[MapData]]).
        // 3. For each Record { [[Key]], [[Value]] } p of M.[[MapData]], do
        //     a. Set p.[[Key]] to EMPTY.
        //     b. Set p.[[Value]] to EMPTY.
        with_map_data(agent, this_value, "Map.prototype.clear", |data| data.clear())?;
        // 4. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [24.1.3.3 Map.prototype.delete ( key )](https://tc39.es/ecma262/#sec-map.prototype.delete)
    fn delete(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key = MapKey::new(agent, arguments.get(0));
        // 3. For each Record { [[Key]], [[Value]] } p of M.[[MapData]], do
        //     a. If p.[[Key]] is not EMPTY and SameValue(p.[[Key]], key) is
        //     true, then
        //         i. Set p.[[Key]] to EMPTY.
        //         ii. Set p.[[Value]] to EMPTY.
        //         iii. Return true.
        // 4. Return false.
        let deleted =
            with_map_data(agent, this_value, "Map.prototype.delete", |data| data.delete(&key))?;
        Ok(Value::Boolean(deleted))
    }

    /// ### [24.1.3.4 Map.prototype.entries ( )](https://tc39.es/ecma262/#sec-map.prototype.entries)
    fn entries(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let M be the this value.
        // 2. Return ? CreateMapIterator(M, KEY+VALUE).
        create_map_iterator(agent, this_value, CollectionIteratorKind::KeyValue)
    }

    /// ### [24.1.3.5 Map.prototype.forEach ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-map.prototype.foreach)
    fn for_each(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let M be the this value.
        // 2. Perform ? RequireInternalSlot(M, [[MapData]]).
        with_map_data(agent, this_value, "Map.prototype.forEach", |_| ())?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let Some(callback_fn) = as_callable(agent, arguments.get(0)) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Map.prototype.forEach callback is not a function",
            ));
        };
        let this_arg = arguments.get(1);
        // 4. Let entries be M.[[MapData]].
        // 5. Let numEntries be the number of elements in entries.
        // 6. Let index be 0.
        let mut index = 0;
        // 7. Repeat, while index < numEntries,
        loop {
            // Entries added by the callback are visited too.
            let (entry, count) = with_map_data(agent, this_value, "Map.prototype.forEach", |data| {
                (data.slot(index), data.slot_count())
            })?;
            if index >= count {
                break;
            }
            // a. Let e be entries[index].
            // b. Set index to index + 1.
            index += 1;
            // c. If e.[[Key]] is not EMPTY, then
            if let Some((key, value)) = entry {
                // i. Perform ? Call(callbackfn, thisArg, « e.[[Value]], e.[[Key]], M »).
                call_function(agent, callback_fn, this_arg, &[value, key, this_value])?;
            }
        }
        // 8. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [24.1.3.6 Map.prototype.get ( key )](https://tc39.es/ecma262/#sec-map.prototype.get)
    fn get(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key = MapKey::new(agent, arguments.get(0));
        let value = with_map_data(agent, this_value, "Map.prototype.get", |data| data.get(&key))?;
        // 5. Return undefined.
        Ok(value.unwrap_or(Value::Undefined))
    }

    /// ### [24.1.3.7 Map.prototype.has ( key )](https://tc39.es/ecma262/#sec-map.prototype.has)
    fn has(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key = MapKey::new(agent, arguments.get(0));
        let has = with_map_data(agent, this_value, "Map.prototype.has", |data| data.has(&key))?;
        Ok(Value::Boolean(has))
    }

    /// ### [24.1.3.8 Map.prototype.keys ( )](https://tc39.es/ecma262/#sec-map.prototype.keys)
    fn keys(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        create_map_iterator(agent, this_value, CollectionIteratorKind::Key)
    }

    /// ### [24.1.3.9 Map.prototype.set ( key, value )](https://tc39.es/ecma262/#sec-map.prototype.set)
    fn set(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key_value = arguments.get(0);
        let key = MapKey::new(agent, key_value);
        // 3. Set key to CanonicalizeKeyedCollectionKey(key).
        // 4. For each Record { [[Key]], [[Value]] } p of M.[[MapData]], do
        //     a. If p.[[Key]] is not EMPTY and SameValue(p.[[Key]], key) is
        //     true, then
        //         i. Set p.[[Value]] to value.
        //         ii. Return M.
        // 5. Let p be the Record { [[Key]]: key, [[Value]]: value }.
        // 6. Append p to M.[[MapData]].
        let value = arguments.get(1);
        with_map_data(agent, this_value, "Map.prototype.set", |data| {
            data.set(key, key_value, value)
        })?;
        // 7. Return M.
        Ok(this_value)
    }

    /// ### [24.1.3.10 get Map.prototype.size](https://tc39.es/ecma262/#sec-get-map.prototype.size)
    fn get_size(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let size = with_map_data(agent, this_value, "get Map.prototype.size", |data| data.size())?;
        Ok(Value::from(size))
    }

    /// ### [24.1.3.11 Map.prototype.values ( )](https://tc39.es/ecma262/#sec-map.prototype.values)
    fn values(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        create_map_iterator(agent, this_value, CollectionIteratorKind::Value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.map_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        let this = OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(13)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<MapPrototypeClear>()
            .with_constructor_property(intrinsics.map())
            .with_builtin_function_property::<MapPrototypeDelete>()
            .with_builtin_function_property::<MapPrototypeEntries>()
            .with_builtin_function_property::<MapPrototypeForEach>()
            .with_builtin_function_property::<MapPrototypeGet>()
            .with_builtin_function_property::<MapPrototypeHas>()
            .with_builtin_function_property::<MapPrototypeKeys>()
            .with_builtin_function_property::<MapPrototypeSet>()
            .with_builtin_function_getter_property::<MapPrototypeGetSize>()
            .with_builtin_function_property::<MapPrototypeValues>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Map"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
        // 24.1.3.12 Map.prototype [ %Symbol.iterator% ] ( )
        // The initial value of the %Symbol.iterator% property is %Map.prototype.entries%.
        let entries = PropertyKey::from_str(agent, "entries");
        if let Some(entries) = this.property_slot(agent, entries) {
            this.insert_property(agent, PropertyKey::Symbol(Symbol::ITERATOR), entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn keys_use_same_value_zero() {
        assert_eq!(
            run_to_string(
                "var m = new Map(); m.set(-0, 'zero').set(NaN, 'nan');
                 [m.get(0), m.get(NaN), Object.is([...m.keys()][0], 0), m.has('0')].join()"
            ),
            "zero,nan,true,false"
        );
    }

    #[test]
    fn insertion_order_survives_updates_and_deletes() {
        assert_eq!(
            run_to_string(
                "var m = new Map([['a', 1], ['b', 2], ['c', 3]]);
                 m.set('a', 10); m.delete('b'); m.set('b', 20);
                 JSON.stringify([...m])"
            ),
            "[[\"a\",10],[\"c\",3],[\"b\",20]]"
        );
    }

    #[test]
    fn for_each_sees_entries_added_during_iteration() {
        assert_eq!(
            run_to_string(
                "var m = new Map([[1, 1]]); var seen = [];
                 m.forEach((v, k, map) => { seen.push(k); if (k < 3) map.set(k + 1, v); });
                 seen.join()"
            ),
            "1,2,3"
        );
    }

    #[test]
    fn iterator_is_entries_and_receivers_are_checked() {
        assert_eq!(
            run_to_string("Map.prototype[Symbol.iterator] === Map.prototype.entries"),
            "true"
        );
        assert_eq!(
            run_to_string("try { Map.prototype.get.call(new Set(), 1) } catch (e) { e.name }"),
            "TypeError"
        );
        assert_eq!(
            run_to_string("Object.prototype.toString.call(new Map())"),
            "[object Map]"
        );
    }
}
