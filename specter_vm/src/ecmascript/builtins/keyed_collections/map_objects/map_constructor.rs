// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::MapData;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{
            IteratorKind, get_iterator, if_abrupt_close_iterator, iterator_close,
            iterator_step_value,
        },
        operations_on_objects::{call_function, get},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor,
        control_abstraction_objects::promise_objects::promise_abstract_operations::as_callable,
        ordinary::ordinary_create_from_constructor,
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

pub(crate) struct MapConstructor;

impl Builtin for MapConstructor {
    const NAME: &'static str = "Map";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(MapConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for MapConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Map;
}

struct MapGetSpecies;
impl Builtin for MapGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapConstructor::get_species);
}
impl BuiltinGetter for MapGetSpecies {}

impl MapConstructor {
    /// ### [24.1.1.1 Map ( \[ iterable \] )](https://tc39.es/ecma262/#sec-map-iterable)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        let Some(new_target) = new_target else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Constructor Map requires 'new'",
            ));
        };
        // 2. Let map be ? OrdinaryCreateFromConstructor(NewTarget,
        // "%Map.prototype%", « [[MapData]] »).
        // 3. Set map.[[MapData]] to a new empty List.
        let map = ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Map,
            ObjectKind::Map(Box::<MapData>::default()),
        )?;
        // 4. If iterable is either undefined or null, return map.
        let iterable = arguments.get(0);
        if iterable.is_nullish() {
            return Ok(Value::Object(map));
        }
        // 5. Let adder be ? Get(map, "set").
        let adder = get(agent, map, PropertyKey::from_str(agent, "set"))?;
        // 6. If IsCallable(adder) is false, throw a TypeError exception.
        let Some(adder) = as_callable(agent, adder) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Map.prototype.set is not callable",
            ));
        };
        // 7. Return ? AddEntriesFromIterable(map, iterable, adder).
        add_entries_from_iterable(agent, map, iterable, adder)?;
        Ok(Value::Object(map))
    }

    /// ### [24.1.2.3 get Map \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-map-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let map_prototype = realm.intrinsics(agent).map_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<MapConstructor>(agent, realm)
            .with_property_capacity(2)
            .with_prototype_property(map_prototype)
            .with_builtin_function_getter_property::<MapGetSpecies>()
            .build();
    }
}

/// ### [24.1.1.2 AddEntriesFromIterable ( target, iterable, adder )](https://tc39.es/ecma262/#sec-add-entries-from-iterable)
fn add_entries_from_iterable(
    agent: &Agent,
    target: Object,
    iterable: Value,
    adder: Object,
) -> JsResult<()> {
    // 1. Let iteratorRecord be ? GetIterator(iterable, sync).
    let mut iterator_record = get_iterator(agent, iterable, IteratorKind::Sync)?;
    // 2. Repeat,
    loop {
        // a. Let next be ? IteratorStepValue(iteratorRecord).
        // b. If next is DONE, return target.
        let Some(next) = iterator_step_value(agent, &mut iterator_record)? else {
            return Ok(());
        };
        // c. If next is not an Object, then
        let Value::Object(next) = next else {
            // i. Let error be ThrowCompletion(a newly created TypeError object).
            let error = Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!(
                    "Iterator value {} is not an entry object",
                    next.to_display_string(agent)
                ),
            ));
            // ii. Return ? IteratorClose(iteratorRecord, error).
            return iterator_close(agent, iterator_record.iterator, error);
        };
        // d. Let k be Completion(Get(next, "0")).
        // e. IfAbruptCloseIterator(k, iteratorRecord).
        let k = get(agent, next, PropertyKey::Integer(0));
        let k = if_abrupt_close_iterator(agent, k, &iterator_record)?;
        // f. Let v be Completion(Get(next, "1")).
        // g. IfAbruptCloseIterator(v, iteratorRecord).
        let v = get(agent, next, PropertyKey::Integer(1));
        let v = if_abrupt_close_iterator(agent, v, &iterator_record)?;
        // h. Let status be Completion(Call(adder, target, « k, v »)).
        let status = call_function(agent, adder, Value::Object(target), &[k, v]);
        // i. IfAbruptCloseIterator(status, iteratorRecord).
        if_abrupt_close_iterator(agent, status, &iterator_record)?;
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn constructs_from_entries() {
        assert_eq!(
            run_to_string("var m = new Map([[1, 'a'], [2, 'b'], [1, 'c']]); m.size + m.get(1)"),
            "2c"
        );
        assert_eq!(
            run_to_string("try { Map() } catch (e) { e instanceof TypeError }"),
            "true"
        );
    }

    #[test]
    fn non_object_entries_close_the_iterator() {
        assert_eq!(
            run_to_string(
                "var closed = false;
                 var iterable = { [Symbol.iterator]() {
                     return { next() { return { value: 1, done: false }; },
                              return() { closed = true; return {}; } };
                 } };
                 try { new Map(iterable); } catch (e) { closed + ':' + e.name }"
            ),
            "true:TypeError"
        );
    }

    #[test]
    fn uses_the_overridden_adder() {
        assert_eq!(
            run_to_string(
                "class Logged extends Map { set(k, v) { log.push(k); return super.set(k, v); } }
                 var log = []; new Logged([['x', 1], ['y', 2]]); log.join()"
            ),
            "x,y"
        );
    }
}
