// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::set_iterator_prototype::create_set_iterator;
use crate::ecmascript::{
    abstract_operations::operations_on_objects::call_function,
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter,
        control_abstraction_objects::promise_objects::promise_abstract_operations::as_callable,
        indexed_collections::array_iterator_objects::CollectionIteratorKind,
        keyed_collections::map_objects::{
            KeyedCollection, MapData, MapKey, canonicalize_keyed_collection_key,
            with_collection_data,
        },
    },
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{PropertyKey, Symbol, Value},
};

pub(crate) struct SetPrototype;

struct SetPrototypeAdd;
impl Builtin for SetPrototypeAdd {
    const NAME: &'static str = "add";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::add);
}

struct SetPrototypeClear;
impl Builtin for SetPrototypeClear {
    const NAME: &'static str = "clear";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::clear);
}

struct SetPrototypeDelete;
impl Builtin for SetPrototypeDelete {
    const NAME: &'static str = "delete";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::delete);
}

struct SetPrototypeEntries;
impl Builtin for SetPrototypeEntries {
    const NAME: &'static str = "entries";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::entries);
}

struct SetPrototypeForEach;
impl Builtin for SetPrototypeForEach {
    const NAME: &'static str = "forEach";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::for_each);
}

struct SetPrototypeHas;
impl Builtin for SetPrototypeHas {
    const NAME: &'static str = "has";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::has);
}

struct SetPrototypeGetSize;
impl Builtin for SetPrototypeGetSize {
    const NAME: &'static str = "size";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::get_size);
}
impl BuiltinGetter for SetPrototypeGetSize {}

struct SetPrototypeValues;
impl Builtin for SetPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::values);
}

fn with_set_data<R>(
    agent: &Agent,
    this_value: Value,
    method: &str,
    f: impl FnOnce(&mut MapData) -> R,
) -> JsResult<R> {
    with_collection_data(agent, this_value, KeyedCollection::Set, method, f)
}

impl SetPrototype {
    /// ### [24.2.4.1 Set.prototype.add ( value )](https://tc39.es/ecma262/#sec-set.prototype.add)
    fn add(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 3. Set value to CanonicalizeKeyedCollectionKey(value).
        let value = canonicalize_keyed_collection_key(arguments.get(0));
        let key = MapKey::new(agent, value);
        // 4. For each element e of S.[[SetData]], do
        //     a. If e is not EMPTY and SameValue(e, value) is true, then
        //         i. Return S.
        // 5. Append value to S.[[SetData]].
        with_set_data(agent, this_value, "Set.prototype.add", |data| {
            if !data.has(&key) {
                data.set(key, value, value);
            }
        })?;
        // 6. Return S.
        Ok(this_value)
    }

    /// ### [24.2.4.2 Set.prototype.clear ( )](https://tc39.es/ecma262/#sec-set.prototype.clear)
    fn clear(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        with_set_data(agent, this_value, "Set.prototype.clear", |data| data.clear())?;
        Ok(Value::Undefined)
    }

    /// ### [24.2.4.4 Set.prototype.delete ( value )](https://tc39.es/ecma262/#sec-set.prototype.delete)
    fn delete(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key = MapKey::new(agent, arguments.get(0));
        let deleted =
            with_set_data(agent, this_value, "Set.prototype.delete", |data| data.delete(&key))?;
        Ok(Value::Boolean(deleted))
    }

    /// ### [24.2.4.5 Set.prototype.entries ( )](https://tc39.es/ecma262/#sec-set.prototype.entries)
    fn entries(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 2. Return ? CreateSetIterator(S, KEY+VALUE).
        create_set_iterator(agent, this_value, CollectionIteratorKind::KeyValue)
    }

    /// ### [24.2.4.6 Set.prototype.forEach ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-set.prototype.foreach)
    fn for_each(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        with_set_data(agent, this_value, "Set.prototype.forEach", |_| ())?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let Some(callback_fn) = as_callable(agent, arguments.get(0)) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Set.prototype.forEach callback is not a function",
            ));
        };
        let this_arg = arguments.get(1);
        let mut index = 0;
        // 7. Repeat, while index < numEntries,
        loop {
            let (entry, count) = with_set_data(agent, this_value, "Set.prototype.forEach", |data| {
                (data.slot(index), data.slot_count())
            })?;
            if index >= count {
                break;
            }
            index += 1;
            // c. If e is not EMPTY, then
            if let Some((value, _)) = entry {
                // i. Perform ? Call(callbackfn, thisArg, « e, e, S »).
                call_function(agent, callback_fn, this_arg, &[value, value, this_value])?;
            }
        }
        Ok(Value::Undefined)
    }

    /// ### [24.2.4.8 Set.prototype.has ( value )](https://tc39.es/ecma262/#sec-set.prototype.has)
    fn has(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key = MapKey::new(agent, arguments.get(0));
        let has = with_set_data(agent, this_value, "Set.prototype.has", |data| data.has(&key))?;
        Ok(Value::Boolean(has))
    }

    /// ### [24.2.4.14 get Set.prototype.size](https://tc39.es/ecma262/#sec-get-set.prototype.size)
    fn get_size(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let size = with_set_data(agent, this_value, "get Set.prototype.size", |data| data.size())?;
        Ok(Value::from(size))
    }

    /// ### [24.2.4.17 Set.prototype.values ( )](https://tc39.es/ecma262/#sec-set.prototype.values)
    fn values(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        create_set_iterator(agent, this_value, CollectionIteratorKind::Value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.set_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        let this = OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(12)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<SetPrototypeAdd>()
            .with_builtin_function_property::<SetPrototypeClear>()
            .with_constructor_property(intrinsics.set())
            .with_builtin_function_property::<SetPrototypeDelete>()
            .with_builtin_function_property::<SetPrototypeEntries>()
            .with_builtin_function_property::<SetPrototypeForEach>()
            .with_builtin_function_property::<SetPrototypeHas>()
            .with_builtin_function_getter_property::<SetPrototypeGetSize>()
            .with_builtin_function_property::<SetPrototypeValues>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Set"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
        // 24.2.4.10 Set.prototype.keys ( )
        // 24.2.4.18 Set.prototype [ %Symbol.iterator% ] ( )
        // The initial value of both properties is %Set.prototype.values%.
        let values = PropertyKey::from_str(agent, "values");
        if let Some(values) = this.property_slot(agent, values) {
            this.insert_property(agent, PropertyKey::from_str(agent, "keys"), values);
            this.insert_property(agent, PropertyKey::Symbol(Symbol::ITERATOR), values);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn values_are_unique_under_same_value_zero() {
        assert_eq!(
            run_to_string("var s = new Set([1, 1, -0, 0, NaN, NaN, '1']); s.size"),
            "4"
        );
        assert_eq!(
            run_to_string("var s = new Set(); s.add(-0); Object.is([...s][0], 0)"),
            "true"
        );
        assert_eq!(
            run_to_string(
                "var s = new Set([-0]); var seen = [];
                 s.forEach(v => seen.push(1 / v));
                 [1 / [...s][0], 1 / s.values().next().value, seen[0]].join()"
            ),
            "Infinity,Infinity,Infinity"
        );
    }

    #[test]
    fn keys_and_iterator_alias_values() {
        assert_eq!(
            run_to_string(
                "Set.prototype.keys === Set.prototype.values &&
                 Set.prototype[Symbol.iterator] === Set.prototype.values"
            ),
            "true"
        );
        assert_eq!(
            run_to_string("JSON.stringify([...new Set(['a', 'b']).entries()])"),
            "[[\"a\",\"a\"],[\"b\",\"b\"]]"
        );
    }

    #[test]
    fn delete_and_for_each() {
        assert_eq!(
            run_to_string(
                "var s = new Set([1, 2, 3]); s.delete(2); var out = [];
                 s.forEach(function (v, k, set) { out.push([v, k, set === s].join('/')); });
                 out.join() + ':' + s.has(2)"
            ),
            "1/1/true,3/3/true:false"
        );
    }
}
