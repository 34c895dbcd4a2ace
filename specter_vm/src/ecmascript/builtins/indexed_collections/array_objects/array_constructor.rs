// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{
            get_iterator_from_method, if_abrupt_close_iterator, iterator_close,
            iterator_step_value,
        },
        operations_on_objects::{
            call_function, construct, create_data_property_or_throw, get, get_method,
            length_of_array_like, set,
        },
        testing_and_comparison::{is_array, is_callable, is_constructor, same_value_zero},
        type_conversion::{to_object, to_uint32},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor,
        array::{array_create, array_create_checked},
        ordinary::get_prototype_from_constructor,
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{Object, PropertyKey, Symbol, Value},
};

/// 2^53 - 1, the largest length an array-like may reach.
pub(crate) const MAX_SAFE_LENGTH: u64 = (1 << 53) - 1;

pub(crate) struct ArrayConstructor;

impl Builtin for ArrayConstructor {
    const NAME: &'static str = "Array";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ArrayConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for ArrayConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Array;
}

struct ArrayFrom;
impl Builtin for ArrayFrom {
    const NAME: &'static str = "from";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::from);
}

struct ArrayIsArray;
impl Builtin for ArrayIsArray {
    const NAME: &'static str = "isArray";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::is_array);
}

struct ArrayOf;
impl Builtin for ArrayOf {
    const NAME: &'static str = "of";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::of);
}

struct ArrayGetSpecies;
impl Builtin for ArrayGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::get_species);
}
impl BuiltinGetter for ArrayGetSpecies {}

impl ArrayConstructor {
    /// ### [23.1.1.1 Array ( ...values )](https://tc39.es/ecma262/#sec-array)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, let newTarget be the active function
        // object; else let newTarget be NewTarget.
        let new_target = new_target.unwrap_or_else(|| agent.intrinsics().array());
        // 2. Let proto be ? GetPrototypeFromConstructor(newTarget, "%Array.prototype%").
        let proto = get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::Array)?;
        // 3. Let numberOfArgs be the number of elements in values.
        match arguments.len() {
            // 4. If numberOfArgs = 0, then
            //     a. Return ! ArrayCreate(0, proto).
            0 => Ok(Value::Object(array_create(agent, 0, Some(proto)))),
            // 5. Else if numberOfArgs = 1, then
            1 => {
                // a. Let len be values[0].
                let len = arguments.get(0);
                // b. Let array be ! ArrayCreate(0, proto).
                let array = array_create(agent, 0, Some(proto));
                // c. If len is not a Number, then
                let int_len = if let Value::Number(_) = len {
                    // d. Else,
                    // i. Let intLen be ! ToUint32(len).
                    let int_len = to_uint32(agent, len)?;
                    // ii. If SameValueZero(intLen, len) is false, throw a
                    // RangeError exception.
                    if !same_value_zero(agent, Value::from(int_len), len) {
                        return Err(agent.throw_exception_with_static_message(
                            ExceptionType::RangeError,
                            "Invalid array length",
                        ));
                    }
                    int_len
                } else {
                    // i. Perform ! CreateDataPropertyOrThrow(array, "0", len).
                    create_data_property_or_throw(agent, array, PropertyKey::Integer(0), len)?;
                    // ii. Let intLen be 1𝔽.
                    1
                };
                // e. Perform ! Set(array, "length", intLen, true).
                set(
                    agent,
                    array,
                    PropertyKey::from_str(agent, "length"),
                    Value::from(int_len),
                    true,
                )?;
                // f. Return array.
                Ok(Value::Object(array))
            }
            // 6. Else,
            number_of_args => {
                // a. Assert: numberOfArgs ≥ 2.
                // b. Let array be ? ArrayCreate(numberOfArgs, proto).
                let array = array_create_checked(agent, number_of_args as u64, Some(proto))?;
                // c. Let k be 0.
                // d. Repeat, while k < numberOfArgs,
                for (k, item_k) in arguments.iter().enumerate() {
                    // i. Let Pk be ! ToString(𝔽(k)).
                    // ii. Let itemK be values[k].
                    // iii. Perform ! CreateDataPropertyOrThrow(array, Pk, itemK).
                    create_data_property_or_throw(
                        agent,
                        array,
                        PropertyKey::from_index(agent, k as u64),
                        *item_k,
                    )?;
                    // iv. Set k to k + 1.
                }
                // e. Assert: The mathematical value of array's "length"
                // property is numberOfArgs.
                // f. Return array.
                Ok(Value::Object(array))
            }
        }
    }

    /// ### [23.1.2.1 Array.from ( items \[ , mapper \[ , thisArg \] \] )](https://tc39.es/ecma262/#sec-array.from)
    fn from(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let items = arguments.get(0);
        let mapper = arguments.get(1);
        let this_arg = arguments.get(2);
        // 1. Let C be the this value.
        let c = this_value;
        // 2. If mapper is undefined, then
        //     a. Let mapping be false.
        // 3. Else,
        //     a. If IsCallable(mapper) is false, throw a TypeError exception.
        //     b. Let mapping be true.
        let mapper = if mapper.is_undefined() {
            None
        } else {
            match mapper {
                Value::Object(callable) if is_callable(agent, mapper) => Some(callable),
                _ => {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        format!("{} is not a function", mapper.to_display_string(agent)),
                    ));
                }
            }
        };
        // 4. Let usingIterator be ? GetMethod(items, %Symbol.iterator%).
        let using_iterator = get_method(agent, items, Symbol::ITERATOR.into())?;
        // 5. If usingIterator is not undefined, then
        if let Some(using_iterator) = using_iterator {
            // a. If IsConstructor(C) is true, then
            //     i. Let A be ? Construct(C).
            // b. Else,
            //     i. Let A be ! ArrayCreate(0).
            let a = match c {
                Value::Object(constructor) if is_constructor(agent, c) => {
                    construct(agent, constructor, &[], None)?
                }
                _ => array_create(agent, 0, None),
            };
            // c. Let iteratorRecord be ? GetIteratorFromMethod(items, usingIterator).
            let mut iterator_record = get_iterator_from_method(agent, items, using_iterator)?;
            // d. Let k be 0.
            let mut k = 0u64;
            // e. Repeat,
            loop {
                // i. If k ≥ 2^53 - 1, then
                if k >= MAX_SAFE_LENGTH {
                    // 1. Let error be ThrowCompletion(a newly created
                    // TypeError object).
                    let error = Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "Array length exceeds the maximum safe integer",
                    ));
                    // 2. Return ? IteratorClose(iteratorRecord, error).
                    return iterator_close(agent, iterator_record.iterator, error);
                }
                // ii. Let Pk be ! ToString(𝔽(k)).
                let pk = PropertyKey::from_index(agent, k);
                // iii. Let next be ? IteratorStepValue(iteratorRecord).
                let Some(next) = iterator_step_value(agent, &mut iterator_record)? else {
                    // iv. If next is DONE, then
                    //     1. Perform ? Set(A, "length", 𝔽(k), true).
                    set(
                        agent,
                        a,
                        PropertyKey::from_str(agent, "length"),
                        Value::from(k as f64),
                        true,
                    )?;
                    //     2. Return A.
                    return Ok(Value::Object(a));
                };
                // v. If mapping is true, then
                let mapped_value = if let Some(mapper) = mapper {
                    // 1. Let mappedValue be Completion(Call(mapper, thisArg, « next, 𝔽(k) »)).
                    let mapped_value =
                        call_function(agent, mapper, this_arg, &[next, Value::from(k as f64)]);
                    // 2. IfAbruptCloseIterator(mappedValue, iteratorRecord).
                    if_abrupt_close_iterator(agent, mapped_value, &iterator_record)?
                } else {
                    // vi. Else,
                    //     1. Let mappedValue be next.
                    next
                };
                // vii. Let defineStatus be Completion(CreateDataPropertyOrThrow(A, Pk, mappedValue)).
                let define_status = create_data_property_or_throw(agent, a, pk, mapped_value);
                // viii. IfAbruptCloseIterator(defineStatus, iteratorRecord).
                if_abrupt_close_iterator(agent, define_status, &iterator_record)?;
                // ix. Set k to k + 1.
                k += 1;
            }
        }
        // 6. NOTE: items is not an Iterable so assume it is an array-like object.
        // 7. Let arrayLike be ! ToObject(items).
        let array_like = to_object(agent, items)?;
        // 8. Let len be ? LengthOfArrayLike(arrayLike).
        let len = length_of_array_like(agent, array_like)?;
        // 9. If IsConstructor(C) is true, then
        //     a. Let A be ? Construct(C, « 𝔽(len) »).
        // 10. Else,
        //     a. Let A be ? ArrayCreate(len).
        let a = match c {
            Value::Object(constructor) if is_constructor(agent, c) => {
                construct(agent, constructor, &[Value::from(len as f64)], None)?
            }
            _ => array_create_checked(agent, len, None)?,
        };
        // 11. Let k be 0.
        // 12. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            let pk = PropertyKey::from_index(agent, k);
            // b. Let kValue be ? Get(arrayLike, Pk).
            let k_value = get(agent, array_like, pk)?;
            // c. If mapping is true, then
            //     i. Let mappedValue be ? Call(mapper, thisArg, « kValue, 𝔽(k) »).
            // d. Else,
            //     i. Let mappedValue be kValue.
            let mapped_value = match mapper {
                Some(mapper) => {
                    call_function(agent, mapper, this_arg, &[k_value, Value::from(k as f64)])?
                }
                None => k_value,
            };
            // e. Perform ? CreateDataPropertyOrThrow(A, Pk, mappedValue).
            create_data_property_or_throw(agent, a, pk, mapped_value)?;
            // f. Set k to k + 1.
        }
        // 13. Perform ? Set(A, "length", 𝔽(len), true).
        set(
            agent,
            a,
            PropertyKey::from_str(agent, "length"),
            Value::from(len as f64),
            true,
        )?;
        // 14. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.2.2 Array.isArray ( arg )](https://tc39.es/ecma262/#sec-array.isarray)
    fn is_array(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? IsArray(arg).
        is_array(agent, arguments.get(0)).map(Value::Boolean)
    }

    /// ### [23.1.2.3 Array.of ( ...items )](https://tc39.es/ecma262/#sec-array.of)
    fn of(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let len be the number of elements in items.
        let len = arguments.len();
        // 2. Let lenNumber be 𝔽(len).
        let len_number = Value::from(len);
        // 3. Let C be the this value.
        // 4. If IsConstructor(C) is true, then
        //     a. Let A be ? Construct(C, « lenNumber »).
        // 5. Else,
        //     a. Let A be ? ArrayCreate(len).
        let a = match this_value {
            Value::Object(c) if is_constructor(agent, this_value) => {
                construct(agent, c, &[len_number], None)?
            }
            _ => array_create_checked(agent, len as u64, None)?,
        };
        // 6. Let k be 0.
        // 7. Repeat, while k < len,
        for (k, k_value) in arguments.iter().enumerate() {
            // a. Let kValue be items[k].
            // b. Let Pk be ! ToString(𝔽(k)).
            // c. Perform ? CreateDataPropertyOrThrow(A, Pk, kValue).
            create_data_property_or_throw(
                agent,
                a,
                PropertyKey::from_index(agent, k as u64),
                *k_value,
            )?;
            // d. Set k to k + 1.
        }
        // 8. Perform ? Set(A, "length", lenNumber, true).
        set(agent, a, PropertyKey::from_str(agent, "length"), len_number, true)?;
        // 9. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.2.5 get Array \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-array-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let array_prototype = realm.intrinsics(agent).array_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<ArrayConstructor>(agent, realm)
            .with_property_capacity(5)
            .with_builtin_function_property::<ArrayFrom>()
            .with_builtin_function_property::<ArrayIsArray>()
            .with_builtin_function_property::<ArrayOf>()
            .with_prototype_property(array_prototype)
            .with_builtin_function_getter_property::<ArrayGetSpecies>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn constructor_argument_forms() {
        assert_eq!(
            run_to_string(
                "[Array().length, Array(3).length, new Array('3').length, Array(1, 2, 3).join('-'),
                  0 in Array(3)].join()"
            ),
            "0,3,1,1-2-3,false"
        );
        assert_eq!(
            run_to_string("try { new Array(1.5) } catch (e) { e.name }"),
            "RangeError"
        );
        assert_eq!(
            run_to_string("try { Array(-1) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn from_iterables_and_array_likes() {
        assert_eq!(
            run_to_string(
                "[Array.from('abc').join(), Array.from(new Set([1, 1, 2])).join(),
                  Array.from({ length: 2, 0: 'x' }).join(),
                  Array.from([1, 2], function (x, i) { return x * this.k + i }, { k: 10 }).join()
                 ].join(' ')"
            ),
            "a,b,c 1,2 x, 10,21"
        );
        assert_eq!(
            run_to_string("try { Array.from([], 1) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn from_closes_the_iterator_when_the_mapper_throws() {
        assert_eq!(
            run_to_string(
                "var closed = false;
                 var iterable = { [Symbol.iterator]() { return {
                     next() { return { value: 1, done: false } },
                     return() { closed = true; return {} } } } };
                 try { Array.from(iterable, () => { throw 'boom' }) } catch (e) {}
                 closed"
            ),
            "true"
        );
    }

    #[test]
    fn of_is_array_and_species() {
        assert_eq!(
            run_to_string(
                "class MyArray extends Array {}
                 var m = MyArray.of(7, 8);
                 [Array.of(7).length, m instanceof MyArray, m.length, Array.isArray(m),
                  Array.isArray({ length: 0 }), Array.isArray(new Proxy([], {})),
                  Array[Symbol.species] === Array].join()"
            ),
            "1,true,2,true,false,true,true"
        );
    }
}
