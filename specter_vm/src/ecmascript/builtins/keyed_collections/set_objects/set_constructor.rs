// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{
            IteratorKind, get_iterator, if_abrupt_close_iterator, iterator_step_value,
        },
        operations_on_objects::{call_function, get},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor,
        control_abstraction_objects::promise_objects::promise_abstract_operations::as_callable,
        keyed_collections::map_objects::MapData, ordinary::ordinary_create_from_constructor,
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

pub(crate) struct SetConstructor;

impl Builtin for SetConstructor {
    const NAME: &'static str = "Set";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(SetConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for SetConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Set;
}

struct SetGetSpecies;
impl Builtin for SetGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetConstructor::get_species);
}
impl BuiltinGetter for SetGetSpecies {}

impl SetConstructor {
    /// ### [24.2.2.1 Set ( \[ iterable \] )](https://tc39.es/ecma262/#sec-set-iterable)
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
                "Constructor Set requires 'new'",
            ));
        };
        // 2. Let set be ? OrdinaryCreateFromConstructor(NewTarget,
        // "%Set.prototype%", « [[SetData]] »).
        // 3. Set set.[[SetData]] to a new empty List.
        let set = ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Set,
            ObjectKind::Set(Box::<MapData>::default()),
        )?;
        // 4. If iterable is either undefined or null, return set.
        let iterable = arguments.get(0);
        if iterable.is_nullish() {
            return Ok(Value::Object(set));
        }
        // 5. Let adder be ? Get(set, "add").
        let adder = get(agent, set, PropertyKey::from_str(agent, "add"))?;
        // 6. If IsCallable(adder) is false, throw a TypeError exception.
        let Some(adder) = as_callable(agent, adder) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Set.prototype.add is not callable",
            ));
        };
        // 7. Let iteratorRecord be ? GetIterator(iterable, sync).
        let mut iterator_record = get_iterator(agent, iterable, IteratorKind::Sync)?;
        // 8. Repeat,
        //     a. Let next be ? IteratorStepValue(iteratorRecord).
        //     b. If next is DONE, return set.
        while let Some(next) = iterator_step_value(agent, &mut iterator_record)? {
            // c. Let status be Completion(Call(adder, set, « next »)).
            let status = call_function(agent, adder, Value::Object(set), &[next]);
            // d. IfAbruptCloseIterator(status, iteratorRecord).
            if_abrupt_close_iterator(agent, status, &iterator_record)?;
        }
        Ok(Value::Object(set))
    }

    /// ### [24.2.3.2 get Set \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-set-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let set_prototype = realm.intrinsics(agent).set_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<SetConstructor>(agent, realm)
            .with_property_capacity(2)
            .with_prototype_property(set_prototype)
            .with_builtin_function_getter_property::<SetGetSpecies>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn constructs_from_any_iterable() {
        assert_eq!(
            run_to_string("var s = new Set('hello'); s.size + ':' + [...s].join('')"),
            "4:helo"
        );
        assert_eq!(run_to_string("new Set(null).size"), "0");
    }

    #[test]
    fn adder_errors_close_the_iterator() {
        assert_eq!(
            run_to_string(
                "var closed = false;
                 var iterable = { [Symbol.iterator]() {
                     return { next() { return { value: 1, done: false }; },
                              return() { closed = true; return {}; } };
                 } };
                 class Failing extends Set { add() { throw new Error('no'); } }
                 try { new Failing(iterable); } catch (e) { closed + ':' + e.message }"
            ),
            "true:no"
        );
    }
}
