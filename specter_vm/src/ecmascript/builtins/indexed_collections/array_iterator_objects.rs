// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.1.5 Array Iterator Objects](https://tc39.es/ecma262/#sec-array-iterator-objects)

use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::create_iter_result_object,
        operations_on_objects::{create_array_from_list, get, length_of_array_like},
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, typed_array::typed_array_data},
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

/// What an Array, Map or Set iterator yields for each element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CollectionIteratorKind {
    Key,
    Value,
    KeyValue,
}

/// ### [23.1.5.1 CreateArrayIterator ( array, kind )](https://tc39.es/ecma262/#sec-createarrayiterator)
pub(crate) fn create_array_iterator(
    agent: &Agent,
    array: Object,
    kind: CollectionIteratorKind,
) -> Object {
    // 1. Let iterator be OrdinaryObjectCreate(%ArrayIteratorPrototype%,
    // « [[IteratedArrayLike]], [[ArrayLikeNextIndex]], [[ArrayLikeIterationKind]] »).
    // 2. Set iterator.[[IteratedArrayLike]] to array.
    // 3. Set iterator.[[ArrayLikeNextIndex]] to 0.
    // 4. Set iterator.[[ArrayLikeIterationKind]] to kind.
    // 5. Return iterator.
    Object::create(
        agent,
        Some(agent.intrinsics().array_iterator_prototype()),
        ObjectKind::ArrayIterator {
            iterated: Some(array),
            next_index: 0,
            kind,
        },
    )
}

pub(crate) struct ArrayIteratorPrototype;

struct ArrayIteratorPrototypeNext;
impl Builtin for ArrayIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayIteratorPrototype::next);
}

impl ArrayIteratorPrototype {
    /// ### [23.1.5.2.1 %ArrayIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%arrayiteratorprototype%.next)
    fn next(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let state = match this_value {
            Value::Object(iterator) => match agent.object(iterator).kind {
                ObjectKind::ArrayIterator {
                    iterated,
                    next_index,
                    kind,
                } => Some((iterator, iterated, next_index, kind)),
                _ => None,
            },
            _ => None,
        };
        let Some((iterator, iterated, index, kind)) = state else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!(
                    "Method %ArrayIteratorPrototype%.next called on incompatible receiver {}",
                    this_value.to_display_string(agent)
                ),
            ));
        };
        let Some(array) = iterated else {
            return Ok(Value::Object(create_iter_result_object(
                agent,
                Value::Undefined,
                true,
            )));
        };
        // a. If array has a [[TypedArrayName]] internal slot, then
        //     i. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(array, SEQ-CST).
        //     ii. If IsTypedArrayOutOfBounds(taRecord) is true, throw a
        //     TypeError exception.
        //     iii. Let len be TypedArrayLength(taRecord).
        // b. Else,
        //     i. Let len be ? LengthOfArrayLike(array).
        let len = match typed_array_data(agent, array) {
            Some(data) => data.array_length as u64,
            None => length_of_array_like(agent, array)?,
        };
        // c. If index ≥ len, return NormalCompletion(undefined).
        if index >= len {
            set_iterator_state(agent, iterator, None, index);
            return Ok(Value::Object(create_iter_result_object(
                agent,
                Value::Undefined,
                true,
            )));
        }
        // d. Let indexNumber be 𝔽(index).
        let index_number = Value::from(index as f64);
        // e. If kind is KEY, then
        //     i. Let result be indexNumber.
        // f. Else,
        //     i. Let elementKey be ! ToString(indexNumber).
        //     ii. Let elementValue be ? Get(array, elementKey).
        //     iii. If kind is VALUE, then
        //         1. Let result be elementValue.
        //     iv. Else,
        //         1. Assert: kind is KEY+VALUE.
        //         2. Let result be CreateArrayFromList(« indexNumber, elementValue »).
        let result = match kind {
            CollectionIteratorKind::Key => index_number,
            CollectionIteratorKind::Value | CollectionIteratorKind::KeyValue => {
                let element_value = get(agent, array, PropertyKey::from_index(agent, index))?;
                if kind == CollectionIteratorKind::Value {
                    element_value
                } else {
                    Value::Object(create_array_from_list(agent, &[index_number, element_value]))
                }
            }
        };
        // g. Perform ? GeneratorYield(CreateIteratorResultObject(result, false)).
        // h. Set index to index + 1.
        set_iterator_state(agent, iterator, Some(array), index + 1);
        Ok(Value::Object(create_iter_result_object(agent, result, false)))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.array_iterator_prototype();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(2)
            .with_prototype(intrinsics.iterator_prototype())
            .with_builtin_function_property::<ArrayIteratorPrototypeNext>()
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::TO_STRING_TAG))
                    .with_value_readonly(Value::from_str(agent, "Array Iterator"))
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
    new_next_index: u64,
) {
    if let ObjectKind::ArrayIterator {
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
    fn iterates_keys_values_and_entries() {
        assert_eq!(
            run_to_string(
                "var a = ['x', , 'z'];
                 [[...a.keys()].join(), [...a.values()].join(), [...a.entries()].join('|'),
                  [...a].length].join(' ')"
            ),
            "0,1,2 x,,z 0,x|1,|2,z 3"
        );
    }

    #[test]
    fn length_is_read_on_every_step() {
        assert_eq!(
            run_to_string(
                "var a = [1]; var it = a.values(); it.next(); a.push(2);
                 var second = it.next().value; var end = it.next().done; a.push(3);
                 [second, end, it.next().done].join()"
            ),
            "2,true,true"
        );
    }

    #[test]
    fn generic_over_array_likes() {
        assert_eq!(
            run_to_string(
                "var it = Array.prototype.values.call({ length: 2, 0: 'a', 1: 'b' });
                 [it.next().value, it.next().value, it.next().done,
                  Object.prototype.toString.call(it),
                  Object.getPrototypeOf(Object.getPrototypeOf(it)) ===
                      Object.getPrototypeOf(Object.getPrototypeOf([][Symbol.iterator]()))
                 ].join()"
            ),
            "a,b,true,[object Array Iterator],true"
        );
    }
}
