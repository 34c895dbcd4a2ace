// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::Ordering;

use super::array_constructor::MAX_SAFE_LENGTH;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call_function, create_data_property_or_throw, delete_property_or_throw, get,
            has_property, invoke, length_of_array_like, set,
        },
        testing_and_comparison::{is_array, is_callable, is_strictly_equal, same_value_zero},
        type_conversion::{to_boolean, to_integer_or_infinity, to_number, to_object, to_string},
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsic,
        array::{array_create_checked, array_species_create},
        indexed_collections::array_iterator_objects::{
            CollectionIteratorKind, create_array_iterator,
        },
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{HeapString, Object, ObjectKind, PropertyKey, Symbol, Value},
};

pub(crate) struct ArrayPrototype;

macro_rules! array_method {
    ($($builtin:ident, $name:literal, $length:literal, $function:ident;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = $length;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::$function);
            }
        )*
    };
}

array_method! {
    ArrayPrototypeAt, "at", 1, at;
    ArrayPrototypeConcat, "concat", 1, concat;
    ArrayPrototypeCopyWithin, "copyWithin", 2, copy_within;
    ArrayPrototypeEntries, "entries", 0, entries;
    ArrayPrototypeEvery, "every", 1, every;
    ArrayPrototypeFill, "fill", 1, fill;
    ArrayPrototypeFilter, "filter", 1, filter;
    ArrayPrototypeFind, "find", 1, find;
    ArrayPrototypeFindIndex, "findIndex", 1, find_index;
    ArrayPrototypeFindLast, "findLast", 1, find_last;
    ArrayPrototypeFindLastIndex, "findLastIndex", 1, find_last_index;
    ArrayPrototypeFlat, "flat", 0, flat;
    ArrayPrototypeFlatMap, "flatMap", 1, flat_map;
    ArrayPrototypeForEach, "forEach", 1, for_each;
    ArrayPrototypeIncludes, "includes", 1, includes;
    ArrayPrototypeIndexOf, "indexOf", 1, index_of;
    ArrayPrototypeJoin, "join", 1, join;
    ArrayPrototypeKeys, "keys", 0, keys;
    ArrayPrototypeLastIndexOf, "lastIndexOf", 1, last_index_of;
    ArrayPrototypeMap, "map", 1, map;
    ArrayPrototypePop, "pop", 0, pop;
    ArrayPrototypePush, "push", 1, push;
    ArrayPrototypeReduce, "reduce", 1, reduce;
    ArrayPrototypeReduceRight, "reduceRight", 1, reduce_right;
    ArrayPrototypeReverse, "reverse", 0, reverse;
    ArrayPrototypeShift, "shift", 0, shift;
    ArrayPrototypeSlice, "slice", 2, slice;
    ArrayPrototypeSome, "some", 1, some;
    ArrayPrototypeSort, "sort", 1, sort;
    ArrayPrototypeSplice, "splice", 2, splice;
    ArrayPrototypeToLocaleString, "toLocaleString", 0, to_locale_string;
    ArrayPrototypeToReversed, "toReversed", 0, to_reversed;
    ArrayPrototypeToSorted, "toSorted", 1, to_sorted;
    ArrayPrototypeToSpliced, "toSpliced", 2, to_spliced;
    ArrayPrototypeUnshift, "unshift", 1, unshift;
    ArrayPrototypeWith, "with", 2, with;
}

struct ArrayPrototypeToString;
impl Builtin for ArrayPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::to_string);
}
impl BuiltinIntrinsic for ArrayPrototypeToString {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ArrayPrototypeToString;
}

struct ArrayPrototypeValues;
impl Builtin for ArrayPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::values);
}
impl BuiltinIntrinsic for ArrayPrototypeValues {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ArrayPrototypeValues;
}

/// Names listed in
/// [23.1.3.41 Array.prototype \[ %Symbol.unscopables% \]](https://tc39.es/ecma262/#sec-array.prototype-%symbol.unscopables%).
const UNSCOPABLES: [&str; 16] = [
    "at",
    "copyWithin",
    "entries",
    "fill",
    "find",
    "findIndex",
    "findLast",
    "findLastIndex",
    "flat",
    "flatMap",
    "includes",
    "keys",
    "toReversed",
    "toSorted",
    "toSpliced",
    "values",
];

fn length_key(agent: &Agent) -> PropertyKey {
    PropertyKey::from_str(agent, "length")
}

fn index_key(agent: &Agent, index: u64) -> PropertyKey {
    PropertyKey::from_index(agent, index)
}

fn index_value(index: u64) -> Value {
    Value::Number(index as f64)
}

/// ToObject(this value) followed by LengthOfArrayLike: the preamble of
/// nearly every Array.prototype method.
fn object_and_length(agent: &Agent, this_value: Value) -> JsResult<(Object, u64)> {
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    Ok((o, len))
}

fn require_callable(agent: &Agent, value: Value) -> JsResult<Object> {
    match value {
        Value::Object(callable) if is_callable(agent, value) => Ok(callable),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{} is not a function", value.to_display_string(agent)),
        )),
    }
}

fn too_long(agent: &Agent) -> crate::ecmascript::execution::JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Array length exceeds the maximum safe integer",
    )
}

/// Resolve a relative index argument such as `start` or `end` against
/// `len`: negative values count from the end, and the result is clamped to
/// `0..=len`. An undefined argument resolves to `default`.
fn relative_index(agent: &Agent, value: Value, len: u64, default: u64) -> JsResult<u64> {
    if value.is_undefined() {
        return Ok(default);
    }
    let relative = to_integer_or_infinity(agent, value)?;
    let len = len as f64;
    let index = if relative < 0.0 {
        (len + relative).max(0.0)
    } else {
        relative.min(len)
    };
    Ok(index as u64)
}

/// Number of elements to remove for `splice` and `toSpliced`.
fn skip_count(
    agent: &Agent,
    arguments: ArgumentsList,
    len: u64,
    actual_start: u64,
) -> JsResult<u64> {
    match arguments.len() {
        // If start is not present, then let actualSkipCount be 0.
        0 => Ok(0),
        // Else if skipCount is not present, then let actualSkipCount be
        // len - actualStart.
        1 => Ok(len - actual_start),
        // Else, let sc be ? ToIntegerOrInfinity(skipCount) and let
        // actualSkipCount be the result of clamping sc between 0 and
        // len - actualStart.
        _ => {
            let sc = to_integer_or_infinity(agent, arguments.get(1))?;
            Ok(sc.clamp(0.0, (len - actual_start) as f64) as u64)
        }
    }
}

impl ArrayPrototype {
    /// ### [23.1.3.1 Array.prototype.at ( index )](https://tc39.es/ecma262/#sec-array.prototype.at)
    fn at(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        // 2. Let len be ? LengthOfArrayLike(O).
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 4. If relativeIndex ≥ 0, then
        //     a. Let k be relativeIndex.
        // 5. Else,
        //     a. Let k be len + relativeIndex.
        let k = if relative_index >= 0.0 {
            relative_index
        } else {
            len as f64 + relative_index
        };
        // 6. If k < 0 or k ≥ len, return undefined.
        if k < 0.0 || k >= len as f64 {
            return Ok(Value::Undefined);
        }
        // 7. Return ? Get(O, ! ToString(𝔽(k))).
        get(agent, o, index_key(agent, k as u64))
    }

    /// ### [23.1.3.2 Array.prototype.concat ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.concat)
    fn concat(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 2. Let A be ? ArraySpeciesCreate(O, 0).
        let a = array_species_create(agent, o, 0)?;
        // 3. Let n be 0.
        let mut n = 0u64;
        // 4. Prepend O to items.
        // 5. For each element E of items, do
        for e in std::iter::once(Value::Object(o)).chain(arguments.iter().copied()) {
            // a. Let spreadable be ? IsConcatSpreadable(E).
            // b. If spreadable is true, then
            if let Some(e) = is_concat_spreadable(agent, e)? {
                // i. Let len be ? LengthOfArrayLike(E).
                let len = length_of_array_like(agent, e)?;
                // ii. If n + len > 2^53 - 1, throw a TypeError exception.
                if n + len > MAX_SAFE_LENGTH {
                    return Err(too_long(agent));
                }
                // iii. Let k be 0.
                // iv. Repeat, while k < len,
                for k in 0..len {
                    // 1. Let Pk be ! ToString(𝔽(k)).
                    let pk = index_key(agent, k);
                    // 2. Let exists be ? HasProperty(E, Pk).
                    // 3. If exists is true, then
                    if has_property(agent, e, pk)? {
                        // a. Let subElement be ? Get(E, Pk).
                        let sub_element = get(agent, e, pk)?;
                        // b. Perform ? CreateDataPropertyOrThrow(A, ! ToString(𝔽(n)), subElement).
                        create_data_property_or_throw(agent, a, index_key(agent, n), sub_element)?;
                    }
                    // 4. Set n to n + 1.
                    n += 1;
                    // 5. Set k to k + 1.
                }
            } else {
                // c. Else,
                // i. NOTE: E is added as a single item rather than spread.
                // ii. If n ≥ 2^53 - 1, throw a TypeError exception.
                if n >= MAX_SAFE_LENGTH {
                    return Err(too_long(agent));
                }
                // iii. Perform ? CreateDataPropertyOrThrow(A, ! ToString(𝔽(n)), E).
                create_data_property_or_throw(agent, a, index_key(agent, n), e)?;
                // iv. Set n to n + 1.
                n += 1;
            }
        }
        // 6. Perform ? Set(A, "length", 𝔽(n), true).
        set(agent, a, length_key(agent), index_value(n), true)?;
        // 7. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.4 Array.prototype.copyWithin ( target, start \[ , end \] )](https://tc39.es/ecma262/#sec-array.prototype.copywithin)
    fn copy_within(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        // 2. Let len be ? LengthOfArrayLike(O).
        let (o, len) = object_and_length(agent, this_value)?;
        // 3-5. Let to be the resolved target.
        let to = relative_index(agent, arguments.get(0), len, 0)?;
        // 6-8. Let from be the resolved start.
        let from = relative_index(agent, arguments.get(1), len, 0)?;
        // 9-11. Let final be the resolved end, len if end is undefined.
        let r#final = relative_index(agent, arguments.get(2), len, len)?;
        // 12. Let count be min(final - from, len - to).
        let mut count = r#final.saturating_sub(from).min(len - to) as i64;
        let (mut from, mut to) = (from as i64, to as i64);
        // 13. If from < to and to < from + count, then
        let direction = if from < to && to < from + count {
            // a. Let direction be -1.
            // b. Set from to from + count - 1.
            from += count - 1;
            // c. Set to to to + count - 1.
            to += count - 1;
            -1
        } else {
            // 14. Else,
            //     a. Let direction be 1.
            1
        };
        // 15. Repeat, while count > 0,
        while count > 0 {
            // a. Let fromKey be ! ToString(𝔽(from)).
            let from_key = index_key(agent, from as u64);
            // b. Let toKey be ! ToString(𝔽(to)).
            let to_key = index_key(agent, to as u64);
            // c. Let fromPresent be ? HasProperty(O, fromKey).
            // d. If fromPresent is true, then
            if has_property(agent, o, from_key)? {
                // i. Let fromValue be ? Get(O, fromKey).
                let from_value = get(agent, o, from_key)?;
                // ii. Perform ? Set(O, toKey, fromValue, true).
                set(agent, o, to_key, from_value, true)?;
            } else {
                // e. Else,
                //     i. Assert: fromPresent is false.
                //     ii. Perform ? DeletePropertyOrThrow(O, toKey).
                delete_property_or_throw(agent, o, to_key)?;
            }
            // f. Set from to from + direction.
            from += direction;
            // g. Set to to to + direction.
            to += direction;
            // h. Set count to count - 1.
            count -= 1;
        }
        // 16. Return O.
        Ok(Value::Object(o))
    }

    /// ### [23.1.3.5 Array.prototype.entries ( )](https://tc39.es/ecma262/#sec-array.prototype.entries)
    fn entries(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 2. Return CreateArrayIterator(O, KEY+VALUE).
        Ok(Value::Object(create_array_iterator(
            agent,
            o,
            CollectionIteratorKind::KeyValue,
        )))
    }

    /// ### [23.1.3.6 Array.prototype.every ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.every)
    fn every(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 4. Let k be 0.
        // 5. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            let pk = index_key(agent, k);
            // b. Let kPresent be ? HasProperty(O, Pk).
            // c. If kPresent is true, then
            if has_property(agent, o, pk)? {
                // i. Let kValue be ? Get(O, Pk).
                let k_value = get(agent, o, pk)?;
                // ii. Let testResult be ToBoolean(? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »)).
                let test_result = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[k_value, index_value(k), Value::Object(o)],
                )?;
                // iii. If testResult is false, return false.
                if !to_boolean(agent, test_result) {
                    return Ok(Value::Boolean(false));
                }
            }
            // d. Set k to k + 1.
        }
        // 6. Return true.
        Ok(Value::Boolean(true))
    }

    /// ### [23.1.3.7 Array.prototype.fill ( value \[ , start \[ , end \] \] )](https://tc39.es/ecma262/#sec-array.prototype.fill)
    fn fill(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1. Let O be ? ToObject(this value).
        // 2. Let len be ? LengthOfArrayLike(O).
        let (o, len) = object_and_length(agent, this_value)?;
        // 3-5. Let k be the resolved start.
        let k = relative_index(agent, arguments.get(1), len, 0)?;
        // 6-8. Let final be the resolved end.
        let r#final = relative_index(agent, arguments.get(2), len, len)?;
        // 9. Repeat, while k < final,
        for k in k..r#final {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Perform ? Set(O, Pk, value, true).
            set(agent, o, index_key(agent, k), value, true)?;
            // c. Set k to k + 1.
        }
        // 10. Return O.
        Ok(Value::Object(o))
    }

    /// ### [23.1.3.8 Array.prototype.filter ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.filter)
    fn filter(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 4. Let A be ? ArraySpeciesCreate(O, 0).
        let a = array_species_create(agent, o, 0)?;
        // 5. Let k be 0.
        // 6. Let to be 0.
        let mut to = 0;
        // 7. Repeat, while k < len,
        for k in 0..len {
            let pk = index_key(agent, k);
            if has_property(agent, o, pk)? {
                // i. Let kValue be ? Get(O, Pk).
                let k_value = get(agent, o, pk)?;
                // ii. Let selected be ToBoolean(? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »)).
                let selected = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[k_value, index_value(k), Value::Object(o)],
                )?;
                // iii. If selected is true, then
                if to_boolean(agent, selected) {
                    // 1. Perform ? CreateDataPropertyOrThrow(A, ! ToString(𝔽(to)), kValue).
                    create_data_property_or_throw(agent, a, index_key(agent, to), k_value)?;
                    // 2. Set to to to + 1.
                    to += 1;
                }
            }
        }
        // 8. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.9 Array.prototype.find ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.find)
    fn find(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. Let findRec be ? FindViaPredicate(O, len, ASCENDING, predicate, thisArg).
        let find_rec = find_via_predicate(agent, o, len, true, arguments.get(0), arguments.get(1))?;
        // 4. Return findRec.[[Value]].
        Ok(find_rec.map_or(Value::Undefined, |(_, value)| value))
    }

    /// ### [23.1.3.10 Array.prototype.findIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findindex)
    fn find_index(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let find_rec = find_via_predicate(agent, o, len, true, arguments.get(0), arguments.get(1))?;
        // 4. Return findRec.[[Index]].
        Ok(find_rec.map_or(Value::Number(-1.0), |(index, _)| index_value(index)))
    }

    /// ### [23.1.3.11 Array.prototype.findLast ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findlast)
    fn find_last(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let find_rec =
            find_via_predicate(agent, o, len, false, arguments.get(0), arguments.get(1))?;
        Ok(find_rec.map_or(Value::Undefined, |(_, value)| value))
    }

    /// ### [23.1.3.12 Array.prototype.findLastIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findlastindex)
    fn find_last_index(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let find_rec =
            find_via_predicate(agent, o, len, false, arguments.get(0), arguments.get(1))?;
        Ok(find_rec.map_or(Value::Number(-1.0), |(index, _)| index_value(index)))
    }

    /// ### [23.1.3.13 Array.prototype.flat ( \[ depth \] )](https://tc39.es/ecma262/#sec-array.prototype.flat)
    fn flat(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        // 2. Let sourceLen be ? LengthOfArrayLike(O).
        let (o, source_len) = object_and_length(agent, this_value)?;
        // 3. Let depthNum be 1.
        // 4. If depth is not undefined, then
        //     a. Set depthNum to ? ToIntegerOrInfinity(depth).
        //     b. If depthNum < 0, set depthNum to 0.
        let depth = arguments.get(0);
        let depth_num = if depth.is_undefined() {
            1.0
        } else {
            to_integer_or_infinity(agent, depth)?.max(0.0)
        };
        // 5. Let A be ? ArraySpeciesCreate(O, 0).
        let a = array_species_create(agent, o, 0)?;
        // 6. Perform ? FlattenIntoArray(A, O, sourceLen, 0, depthNum).
        flatten_into_array(agent, a, o, source_len, 0, depth_num, None, 0)?;
        // 7. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.14 Array.prototype.flatMap ( mapperFunction \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.flatmap)
    fn flat_map(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, source_len) = object_and_length(agent, this_value)?;
        // 3. If IsCallable(mapperFunction) is false, throw a TypeError exception.
        let mapper = require_callable(agent, arguments.get(0))?;
        // 4. Let A be ? ArraySpeciesCreate(O, 0).
        let a = array_species_create(agent, o, 0)?;
        // 5. Perform ? FlattenIntoArray(A, O, sourceLen, 0, 1, mapperFunction, thisArg).
        flatten_into_array(
            agent,
            a,
            o,
            source_len,
            0,
            1.0,
            Some((mapper, arguments.get(1))),
            0,
        )?;
        // 6. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.15 Array.prototype.forEach ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.foreach)
    fn for_each(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        for k in 0..len {
            let pk = index_key(agent, k);
            if has_property(agent, o, pk)? {
                let k_value = get(agent, o, pk)?;
                // ii. Perform ? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »).
                call_function(
                    agent,
                    callback,
                    this_arg,
                    &[k_value, index_value(k), Value::Object(o)],
                )?;
            }
        }
        // 6. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [23.1.3.16 Array.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.includes)
    fn includes(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let search_element = arguments.get(0);
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If len = 0, return false.
        if len == 0 {
            return Ok(Value::Boolean(false));
        }
        // 4-9. Let k be the start index from fromIndex.
        let Some(k) = search_start(agent, arguments.get(1), len)? else {
            return Ok(Value::Boolean(false));
        };
        // 10. Repeat, while k < len,
        for k in k..len {
            // a. Let elementK be ? Get(O, ! ToString(𝔽(k))).
            let element_k = get(agent, o, index_key(agent, k))?;
            // b. If SameValueZero(searchElement, elementK) is true, return true.
            if same_value_zero(agent, search_element, element_k) {
                return Ok(Value::Boolean(true));
            }
        }
        // 11. Return false.
        Ok(Value::Boolean(false))
    }

    /// ### [23.1.3.17 Array.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.indexof)
    fn index_of(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let search_element = arguments.get(0);
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If len = 0, return -1𝔽.
        if len == 0 {
            return Ok(Value::Number(-1.0));
        }
        let Some(k) = search_start(agent, arguments.get(1), len)? else {
            return Ok(Value::Number(-1.0));
        };
        // 10. Repeat, while k < len,
        for k in k..len {
            let pk = index_key(agent, k);
            // a. Let kPresent be ? HasProperty(O, Pk).
            // b. If kPresent is true, then
            if has_property(agent, o, pk)? {
                // i. Let elementK be ? Get(O, Pk).
                let element_k = get(agent, o, pk)?;
                // ii. If IsStrictlyEqual(searchElement, elementK) is true, return 𝔽(k).
                if is_strictly_equal(agent, search_element, element_k) {
                    return Ok(index_value(k));
                }
            }
        }
        // 11. Return -1𝔽.
        Ok(Value::Number(-1.0))
    }

    /// ### [23.1.3.18 Array.prototype.join ( separator )](https://tc39.es/ecma262/#sec-array.prototype.join)
    fn join(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If separator is undefined, let sep be ",".
        // 4. Else, let sep be ? ToString(separator).
        let separator = arguments.get(0);
        let sep = if separator.is_undefined() {
            ",".into()
        } else {
            to_string(agent, separator)?.as_rc(agent)
        };
        // 5. Let R be the empty String.
        let mut r = String::new();
        // 6. Let k be 0.
        // 7. Repeat, while k < len,
        for k in 0..len {
            // a. If k > 0, set R to the string-concatenation of R and sep.
            if k > 0 {
                r.push_str(&sep);
            }
            // b. Let element be ? Get(O, ! ToString(𝔽(k))).
            let element = get(agent, o, index_key(agent, k))?;
            // c. If element is either undefined or null, let next be the
            // empty String; otherwise, let next be ? ToString(element).
            // d. Set R to the string-concatenation of R and next.
            if !element.is_nullish() {
                r.push_str(&to_string(agent, element)?.as_rc(agent));
            }
        }
        // 8. Return R.
        Ok(Value::from_string(agent, r))
    }

    /// ### [23.1.3.19 Array.prototype.keys ( )](https://tc39.es/ecma262/#sec-array.prototype.keys)
    fn keys(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 2. Return CreateArrayIterator(O, KEY).
        Ok(Value::Object(create_array_iterator(
            agent,
            o,
            CollectionIteratorKind::Key,
        )))
    }

    /// ### [23.1.3.20 Array.prototype.lastIndexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.lastindexof)
    fn last_index_of(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let search_element = arguments.get(0);
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If len = 0, return -1𝔽.
        if len == 0 {
            return Ok(Value::Number(-1.0));
        }
        // 4. If fromIndex is present, let n be ? ToIntegerOrInfinity(fromIndex);
        // else let n be len - 1.
        let n = if arguments.len() > 1 {
            to_integer_or_infinity(agent, arguments.get(1))?
        } else {
            len as f64 - 1.0
        };
        // 5. If n = -∞, return -1𝔽.
        // 6. If n ≥ 0, then
        //     a. Let k be min(n, len - 1).
        // 7. Else,
        //     a. Let k be len + n.
        let k = if n >= 0.0 {
            n.min(len as f64 - 1.0)
        } else {
            len as f64 + n
        };
        if k < 0.0 {
            return Ok(Value::Number(-1.0));
        }
        // 8. Repeat, while k ≥ 0,
        for k in (0..=k as u64).rev() {
            let pk = index_key(agent, k);
            if has_property(agent, o, pk)? {
                let element_k = get(agent, o, pk)?;
                if is_strictly_equal(agent, search_element, element_k) {
                    return Ok(index_value(k));
                }
            }
        }
        // 9. Return -1𝔽.
        Ok(Value::Number(-1.0))
    }

    /// ### [23.1.3.21 Array.prototype.map ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.map)
    fn map(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If IsCallable(callbackfn) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 4. Let A be ? ArraySpeciesCreate(O, len).
        let a = array_species_create(agent, o, len)?;
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for k in 0..len {
            let pk = index_key(agent, k);
            if has_property(agent, o, pk)? {
                let k_value = get(agent, o, pk)?;
                // ii. Let mappedValue be ? Call(callbackfn, thisArg, « kValue, 𝔽(k), O »).
                let mapped_value = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[k_value, index_value(k), Value::Object(o)],
                )?;
                // iii. Perform ? CreateDataPropertyOrThrow(A, Pk, mappedValue).
                create_data_property_or_throw(agent, a, pk, mapped_value)?;
            }
        }
        // 7. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.22 Array.prototype.pop ( )](https://tc39.es/ecma262/#sec-array.prototype.pop)
    fn pop(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If len = 0, then
        if len == 0 {
            // a. Perform ? Set(O, "length", +0𝔽, true).
            set(agent, o, length_key(agent), Value::Number(0.0), true)?;
            // b. Return undefined.
            return Ok(Value::Undefined);
        }
        // 4. Else,
        //     a. Assert: len > 0.
        //     b. Let newLen be 𝔽(len - 1).
        let new_len = len - 1;
        // c. Let index be ! ToString(newLen).
        let index = index_key(agent, new_len);
        // d. Let element be ? Get(O, index).
        let element = get(agent, o, index)?;
        // e. Perform ? DeletePropertyOrThrow(O, index).
        delete_property_or_throw(agent, o, index)?;
        // f. Perform ? Set(O, "length", newLen, true).
        set(agent, o, length_key(agent), index_value(new_len), true)?;
        // g. Return element.
        Ok(element)
    }

    /// ### [23.1.3.23 Array.prototype.push ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.push)
    fn push(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, mut len) = object_and_length(agent, this_value)?;
        // 3. Let argCount be the number of elements in items.
        let arg_count = arguments.len() as u64;
        // 4. If len + argCount > 2^53 - 1, throw a TypeError exception.
        if len + arg_count > MAX_SAFE_LENGTH {
            return Err(too_long(agent));
        }
        // 5. For each element E of items, do
        for e in arguments.iter() {
            // a. Perform ? Set(O, ! ToString(𝔽(len)), E, true).
            set(agent, o, index_key(agent, len), *e, true)?;
            // b. Set len to len + 1.
            len += 1;
        }
        // 6. Perform ? Set(O, "length", 𝔽(len), true).
        set(agent, o, length_key(agent), index_value(len), true)?;
        // 7. Return 𝔽(len).
        Ok(index_value(len))
    }

    /// ### [23.1.3.24 Array.prototype.reduce ( callbackfn \[ , initialValue \] )](https://tc39.es/ecma262/#sec-array.prototype.reduce)
    fn reduce(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let callback = require_callable(agent, arguments.get(0))?;
        reduce_with(agent, o, callback, arguments, 0..len)
    }

    /// ### [23.1.3.25 Array.prototype.reduceRight ( callbackfn \[ , initialValue \] )](https://tc39.es/ecma262/#sec-array.prototype.reduceright)
    fn reduce_right(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let callback = require_callable(agent, arguments.get(0))?;
        reduce_with(agent, o, callback, arguments, (0..len).rev())
    }

    /// ### [23.1.3.26 Array.prototype.reverse ( )](https://tc39.es/ecma262/#sec-array.prototype.reverse)
    fn reverse(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. Let middle be floor(len / 2).
        let middle = len / 2;
        // 4. Let lower be 0.
        // 5. Repeat, while lower ≠ middle,
        for lower in 0..middle {
            // a. Let upper be len - lower - 1.
            let upper = len - lower - 1;
            // b. Let upperP be ! ToString(𝔽(upper)).
            let upper_p = index_key(agent, upper);
            // c. Let lowerP be ! ToString(𝔽(lower)).
            let lower_p = index_key(agent, lower);
            // d. Let lowerExists be ? HasProperty(O, lowerP).
            // e. If lowerExists is true, then
            //     i. Let lowerValue be ? Get(O, lowerP).
            let lower_value = if has_property(agent, o, lower_p)? {
                Some(get(agent, o, lower_p)?)
            } else {
                None
            };
            // f. Let upperExists be ? HasProperty(O, upperP).
            // g. If upperExists is true, then
            //     i. Let upperValue be ? Get(O, upperP).
            let upper_value = if has_property(agent, o, upper_p)? {
                Some(get(agent, o, upper_p)?)
            } else {
                None
            };
            match (lower_value, upper_value) {
                // h. If lowerExists is true and upperExists is true, then
                (Some(lower_value), Some(upper_value)) => {
                    set(agent, o, lower_p, upper_value, true)?;
                    set(agent, o, upper_p, lower_value, true)?;
                }
                // i. Else if lowerExists is false and upperExists is true, then
                (None, Some(upper_value)) => {
                    set(agent, o, lower_p, upper_value, true)?;
                    delete_property_or_throw(agent, o, upper_p)?;
                }
                // j. Else if lowerExists is true and upperExists is false, then
                (Some(lower_value), None) => {
                    delete_property_or_throw(agent, o, lower_p)?;
                    set(agent, o, upper_p, lower_value, true)?;
                }
                // k. Else,
                //     i. Assert: lowerExists and upperExists are both false.
                //     ii. NOTE: No action is required.
                (None, None) => {}
            }
            // l. Set lower to lower + 1.
        }
        // 6. Return O.
        Ok(Value::Object(o))
    }

    /// ### [23.1.3.27 Array.prototype.shift ( )](https://tc39.es/ecma262/#sec-array.prototype.shift)
    fn shift(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. If len = 0, then
        if len == 0 {
            // a. Perform ? Set(O, "length", +0𝔽, true).
            set(agent, o, length_key(agent), Value::Number(0.0), true)?;
            // b. Return undefined.
            return Ok(Value::Undefined);
        }
        // 4. Let first be ? Get(O, "0").
        let first = get(agent, o, PropertyKey::Integer(0))?;
        // 5. Let k be 1.
        // 6. Repeat, while k < len,
        for k in 1..len {
            move_element(agent, o, k, k - 1)?;
        }
        // 7. Perform ? DeletePropertyOrThrow(O, ! ToString(𝔽(len - 1))).
        delete_property_or_throw(agent, o, index_key(agent, len - 1))?;
        // 8. Perform ? Set(O, "length", 𝔽(len - 1), true).
        set(agent, o, length_key(agent), index_value(len - 1), true)?;
        // 9. Return first.
        Ok(first)
    }

    /// ### [23.1.3.28 Array.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-array.prototype.slice)
    fn slice(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3-5. Let k be the resolved start.
        let k = relative_index(agent, arguments.get(0), len, 0)?;
        // 6-8. Let final be the resolved end.
        let r#final = relative_index(agent, arguments.get(1), len, len)?;
        // 9. Let count be max(final - k, 0).
        let count = r#final.saturating_sub(k);
        // 10. Let A be ? ArraySpeciesCreate(O, count).
        let a = array_species_create(agent, o, count)?;
        // 11. Let n be 0.
        let mut n = 0;
        // 12. Repeat, while k < final,
        for k in k..r#final {
            let pk = index_key(agent, k);
            // b. Let kPresent be ? HasProperty(O, Pk).
            // c. If kPresent is true, then
            if has_property(agent, o, pk)? {
                // i. Let kValue be ? Get(O, Pk).
                let k_value = get(agent, o, pk)?;
                // ii. Perform ? CreateDataPropertyOrThrow(A, ! ToString(𝔽(n)), kValue).
                create_data_property_or_throw(agent, a, index_key(agent, n), k_value)?;
            }
            // d. Set k to k + 1.
            // e. Set n to n + 1.
            n += 1;
        }
        // 13. Perform ? Set(A, "length", 𝔽(n), true).
        set(agent, a, length_key(agent), index_value(n), true)?;
        // 14. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.29 Array.prototype.some ( callbackfn \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.some)
    fn some(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        for k in 0..len {
            let pk = index_key(agent, k);
            if has_property(agent, o, pk)? {
                let k_value = get(agent, o, pk)?;
                let test_result = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[k_value, index_value(k), Value::Object(o)],
                )?;
                // iii. If testResult is true, return true.
                if to_boolean(agent, test_result) {
                    return Ok(Value::Boolean(true));
                }
            }
        }
        // 6. Return false.
        Ok(Value::Boolean(false))
    }

    /// ### [23.1.3.30 Array.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-array.prototype.sort)
    fn sort(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If comparator is not undefined and IsCallable(comparator) is
        // false, throw a TypeError exception.
        let comparator = optional_comparator(agent, arguments.get(0))?;
        // 2. Let obj be ? ToObject(this value).
        // 3. Let len be ? LengthOfArrayLike(obj).
        let (obj, len) = object_and_length(agent, this_value)?;
        // 4. Let SortCompare be a new Abstract Closure with parameters (x, y)
        // that captures comparator and performs the following steps when
        // called:
        //     a. Return ? CompareArrayElements(x, y, comparator).
        // 5. Let sortedList be ? SortIndexedProperties(obj, len, SortCompare, SKIP-HOLES).
        let sorted_list = sort_indexed_properties(agent, obj, len, comparator, true)?;
        // 6. Let itemCount be the number of elements in sortedList.
        let item_count = sorted_list.len() as u64;
        // 7. Let j be 0.
        // 8. Repeat, while j < itemCount,
        for (j, value) in sorted_list.into_iter().enumerate() {
            // a. Perform ? Set(obj, ! ToString(𝔽(j)), sortedList[j], true).
            set(agent, obj, index_key(agent, j as u64), value, true)?;
            // b. Set j to j + 1.
        }
        // 9. NOTE: The call to SortIndexedProperties in step 5 uses
        // SKIP-HOLES. The remaining indices are deleted to preserve the
        // number of holes that were detected and excluded from the sort.
        // 10. Repeat, while j < len,
        for j in item_count..len {
            // a. Perform ? DeletePropertyOrThrow(obj, ! ToString(𝔽(j))).
            delete_property_or_throw(agent, obj, index_key(agent, j))?;
            // b. Set j to j + 1.
        }
        // 11. Return obj.
        Ok(Value::Object(obj))
    }

    /// ### [23.1.3.31 Array.prototype.splice ( start, deleteCount, ...items )](https://tc39.es/ecma262/#sec-array.prototype.splice)
    fn splice(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3-6. Let actualStart be the resolved start.
        let actual_start = relative_index(agent, arguments.get(0), len, 0)?;
        // 7. Let itemCount be the number of elements in items.
        let items = arguments.slice_from(2);
        let item_count = items.len() as u64;
        // 8-10. Let actualDeleteCount be the number of elements to remove.
        let actual_delete_count = skip_count(agent, arguments, len, actual_start)?;
        // 11. If len + itemCount - actualDeleteCount > 2^53 - 1, throw a
        // TypeError exception.
        if len + item_count - actual_delete_count > MAX_SAFE_LENGTH {
            return Err(too_long(agent));
        }
        // 12. Let A be ? ArraySpeciesCreate(O, actualDeleteCount).
        let a = array_species_create(agent, o, actual_delete_count)?;
        // 13. Let k be 0.
        // 14. Repeat, while k < actualDeleteCount,
        for k in 0..actual_delete_count {
            // a. Let from be ! ToString(𝔽(actualStart + k)).
            let from = index_key(agent, actual_start + k);
            // b. If ? HasProperty(O, from) is true, then
            if has_property(agent, o, from)? {
                // i. Let fromValue be ? Get(O, from).
                let from_value = get(agent, o, from)?;
                // ii. Perform ? CreateDataPropertyOrThrow(A, ! ToString(𝔽(k)), fromValue).
                create_data_property_or_throw(agent, a, index_key(agent, k), from_value)?;
            }
            // c. Set k to k + 1.
        }
        // 15. Perform ? Set(A, "length", 𝔽(actualDeleteCount), true).
        set(agent, a, length_key(agent), index_value(actual_delete_count), true)?;
        // 16. If itemCount < actualDeleteCount, then
        if item_count < actual_delete_count {
            // a. Set k to actualStart.
            // b. Repeat, while k < (len - actualDeleteCount),
            for k in actual_start..(len - actual_delete_count) {
                // i. Let from be ! ToString(𝔽(k + actualDeleteCount)).
                // ii. Let to be ! ToString(𝔽(k + itemCount)).
                move_element(agent, o, k + actual_delete_count, k + item_count)?;
            }
            // c. Set k to len.
            // d. Repeat, while k > (len - actualDeleteCount + itemCount),
            for k in ((len - actual_delete_count + item_count)..len).rev() {
                // i. Perform ? DeletePropertyOrThrow(O, ! ToString(𝔽(k - 1))).
                delete_property_or_throw(agent, o, index_key(agent, k))?;
            }
        } else if item_count > actual_delete_count {
            // 17. Else if itemCount > actualDeleteCount, then
            // a. Set k to (len - actualDeleteCount).
            // b. Repeat, while k > actualStart,
            for k in (actual_start..(len - actual_delete_count)).rev() {
                // i. Let from be ! ToString(𝔽(k + actualDeleteCount - 1)).
                // ii. Let to be ! ToString(𝔽(k + itemCount - 1)).
                move_element(agent, o, k + actual_delete_count, k + item_count)?;
            }
        }
        // 18. Set k to actualStart.
        // 19. For each element E of items, do
        for (k, e) in (actual_start..).zip(items.iter()) {
            // a. Perform ? Set(O, ! ToString(𝔽(k)), E, true).
            set(agent, o, index_key(agent, k), *e, true)?;
        }
        // 20. Perform ? Set(O, "length", 𝔽(len - actualDeleteCount + itemCount), true).
        set(
            agent,
            o,
            length_key(agent),
            index_value(len - actual_delete_count + item_count),
            true,
        )?;
        // 21. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.32 Array.prototype.toLocaleString ( \[ reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-array.prototype.tolocalestring)
    fn to_locale_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let array be ? ToObject(this value).
        // 2. Let len be ? LengthOfArrayLike(array).
        let (array, len) = object_and_length(agent, this_value)?;
        // 3. Let separator be the implementation-defined list-separator
        // String appropriate for the host environment's current locale.
        let separator = ",";
        // 4. Let R be the empty String.
        let mut r = String::new();
        let to_locale_string = PropertyKey::from_str(agent, "toLocaleString");
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for k in 0..len {
            // a. If k > 0, set R to the string-concatenation of R and separator.
            if k > 0 {
                r.push_str(separator);
            }
            // b. Let nextElement be ? Get(array, ! ToString(𝔽(k))).
            let next_element = get(agent, array, index_key(agent, k))?;
            // c. If nextElement is neither undefined nor null, then
            if !next_element.is_nullish() {
                // i. Let S be ? ToString(? Invoke(nextElement, "toLocaleString")).
                let s = invoke(agent, next_element, to_locale_string, &[])?;
                // ii. Set R to the string-concatenation of R and S.
                r.push_str(&to_string(agent, s)?.as_rc(agent));
            }
        }
        // 7. Return R.
        Ok(Value::from_string(agent, r))
    }

    /// ### [23.1.3.33 Array.prototype.toReversed ( )](https://tc39.es/ecma262/#sec-array.prototype.toreversed)
    fn to_reversed(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. Let A be ? ArrayCreate(len).
        let a = array_create_checked(agent, len, None)?;
        // 4. Let k be 0.
        // 5. Repeat, while k < len,
        for k in 0..len {
            // a. Let from be ! ToString(𝔽(len - k - 1)).
            // b. Let Pk be ! ToString(𝔽(k)).
            // c. Let fromValue be ? Get(O, from).
            let from_value = get(agent, o, index_key(agent, len - k - 1))?;
            // d. Perform ! CreateDataPropertyOrThrow(A, Pk, fromValue).
            create_data_property_or_throw(agent, a, index_key(agent, k), from_value)?;
        }
        // 6. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.34 Array.prototype.toSorted ( comparator )](https://tc39.es/ecma262/#sec-array.prototype.tosorted)
    fn to_sorted(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If comparator is not undefined and IsCallable(comparator) is
        // false, throw a TypeError exception.
        let comparator = optional_comparator(agent, arguments.get(0))?;
        let (o, len) = object_and_length(agent, this_value)?;
        // 4. Let A be ? ArrayCreate(len).
        let a = array_create_checked(agent, len, None)?;
        // 6. Let sortedList be ? SortIndexedProperties(O, len, SortCompare, READ-THROUGH-HOLES).
        let sorted_list = sort_indexed_properties(agent, o, len, comparator, false)?;
        // 7. Let j be 0.
        // 8. Repeat, while j < len,
        for (j, value) in sorted_list.into_iter().enumerate() {
            // a. Perform ! CreateDataPropertyOrThrow(A, ! ToString(𝔽(j)), sortedList[j]).
            create_data_property_or_throw(agent, a, index_key(agent, j as u64), value)?;
        }
        // 9. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.35 Array.prototype.toSpliced ( start, skipCount, ...items )](https://tc39.es/ecma262/#sec-array.prototype.tospliced)
    fn to_spliced(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3-6. Let actualStart be the resolved start.
        let actual_start = relative_index(agent, arguments.get(0), len, 0)?;
        // 7. Let insertCount be the number of elements in items.
        let items = arguments.slice_from(2);
        let insert_count = items.len() as u64;
        // 8-10. Let actualSkipCount be the number of elements to skip.
        let actual_skip_count = skip_count(agent, arguments, len, actual_start)?;
        // 11. Let newLen be len + insertCount - actualSkipCount.
        let new_len = len + insert_count - actual_skip_count;
        // 12. If newLen > 2^53 - 1, throw a TypeError exception.
        if new_len > MAX_SAFE_LENGTH {
            return Err(too_long(agent));
        }
        // 13. Let A be ? ArrayCreate(newLen).
        let a = array_create_checked(agent, new_len, None)?;
        // 14. Let i be 0.
        let mut i = 0;
        // 15. Let r be actualStart + actualSkipCount.
        let mut r = actual_start + actual_skip_count;
        // 16. Repeat, while i < actualStart,
        while i < actual_start {
            // a. Let Pi be ! ToString(𝔽(i)).
            let pi = index_key(agent, i);
            // b. Let iValue be ? Get(O, Pi).
            let i_value = get(agent, o, pi)?;
            // c. Perform ! CreateDataPropertyOrThrow(A, Pi, iValue).
            create_data_property_or_throw(agent, a, pi, i_value)?;
            // d. Set i to i + 1.
            i += 1;
        }
        // 17. For each element E of items, do
        for e in items {
            // a. Let Pi be ! ToString(𝔽(i)).
            // b. Perform ! CreateDataPropertyOrThrow(A, Pi, E).
            create_data_property_or_throw(agent, a, index_key(agent, i), *e)?;
            // c. Set i to i + 1.
            i += 1;
        }
        // 18. Repeat, while i < newLen,
        while i < new_len {
            // a. Let Pi be ! ToString(𝔽(i)).
            // b. Let from be ! ToString(𝔽(r)).
            // c. Let fromValue be ? Get(O, from).
            let from_value = get(agent, o, index_key(agent, r))?;
            // d. Perform ! CreateDataPropertyOrThrow(A, Pi, fromValue).
            create_data_property_or_throw(agent, a, index_key(agent, i), from_value)?;
            // e. Set i to i + 1.
            i += 1;
            // f. Set r to r + 1.
            r += 1;
        }
        // 19. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.1.3.36 Array.prototype.toString ( )](https://tc39.es/ecma262/#sec-array.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let array be ? ToObject(this value).
        let array = to_object(agent, this_value)?;
        // 2. Let func be ? Get(array, "join").
        let func = get(agent, array, PropertyKey::from_str(agent, "join"))?;
        // 3. If IsCallable(func) is false, set func to the intrinsic
        // function %Object.prototype.toString%.
        let func = match func {
            Value::Object(func) if is_callable(agent, Value::Object(func)) => func,
            _ => agent.intrinsics().object_prototype_to_string(),
        };
        // 4. Return ? Call(func, array).
        call_function(agent, func, Value::Object(array), &[])
    }

    /// ### [23.1.3.37 Array.prototype.unshift ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.unshift)
    fn unshift(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. Let argCount be the number of elements in items.
        let arg_count = arguments.len() as u64;
        // 4. If argCount > 0, then
        if arg_count > 0 {
            // a. If len + argCount > 2^53 - 1, throw a TypeError exception.
            if len + arg_count > MAX_SAFE_LENGTH {
                return Err(too_long(agent));
            }
            // b. Let k be len.
            // c. Repeat, while k > 0,
            for k in (1..=len).rev() {
                // i. Let from be ! ToString(𝔽(k - 1)).
                // ii. Let to be ! ToString(𝔽(k + argCount - 1)).
                move_element(agent, o, k - 1, k + arg_count - 1)?;
            }
            // d. Let j be +0𝔽.
            // e. For each element E of items, do
            for (j, e) in arguments.iter().enumerate() {
                // i. Perform ? Set(O, ! ToString(j), E, true).
                set(agent, o, index_key(agent, j as u64), *e, true)?;
            }
        }
        // 5. Perform ? Set(O, "length", 𝔽(len + argCount), true).
        set(agent, o, length_key(agent), index_value(len + arg_count), true)?;
        // 6. Return 𝔽(len + argCount).
        Ok(index_value(len + arg_count))
    }

    /// ### [23.1.3.38 Array.prototype.values ( )](https://tc39.es/ecma262/#sec-array.prototype.values)
    fn values(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 2. Return CreateArrayIterator(O, VALUE).
        Ok(Value::Object(create_array_iterator(
            agent,
            o,
            CollectionIteratorKind::Value,
        )))
    }

    /// ### [23.1.3.39 Array.prototype.with ( index, value )](https://tc39.es/ecma262/#sec-array.prototype.with)
    fn with(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, len) = object_and_length(agent, this_value)?;
        // 3. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 4. If relativeIndex ≥ 0, let actualIndex be relativeIndex.
        // 5. Else, let actualIndex be len + relativeIndex.
        let actual_index = if relative_index >= 0.0 {
            relative_index
        } else {
            len as f64 + relative_index
        };
        // 6. If actualIndex ≥ len or actualIndex < 0, throw a RangeError exception.
        if actual_index >= len as f64 || actual_index < 0.0 {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Index out of range",
            ));
        }
        let actual_index = actual_index as u64;
        // 7. Let A be ? ArrayCreate(len).
        let a = array_create_checked(agent, len, None)?;
        // 8. Let k be 0.
        // 9. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            let pk = index_key(agent, k);
            // b. If k = actualIndex, let fromValue be value.
            // c. Else, let fromValue be ? Get(O, Pk).
            let from_value = if k == actual_index {
                arguments.get(1)
            } else {
                get(agent, o, pk)?
            };
            // d. Perform ! CreateDataPropertyOrThrow(A, Pk, fromValue).
            create_data_property_or_throw(agent, a, pk, from_value)?;
        }
        // 10. Return A.
        Ok(Value::Object(a))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.array_prototype();
        let array_prototype_values = intrinsics.array_prototype_values();

        // 23.1.3.41 Array.prototype [ %Symbol.unscopables% ]
        let unscopable_list = UNSCOPABLES
            .iter()
            .fold(OrdinaryObjectBuilder::new(agent, realm), |builder, name| {
                builder.with_property(|property| {
                    property
                        .with_key(PropertyKey::from_str(agent, name))
                        .with_value(Value::Boolean(true))
                        .build()
                })
            })
            .build();

        // The Array prototype object is an Array exotic object whose
        // "length" is +0𝔽.
        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_kind(ObjectKind::Array)
            .with_property_capacity(43)
            .with_prototype(intrinsics.object_prototype())
            .with_property(|property| {
                property
                    .with_key(length_key(agent))
                    .with_value(Value::Number(0.0))
                    .with_enumerable(false)
                    .with_configurable(false)
                    .build()
            })
            .with_builtin_function_property::<ArrayPrototypeAt>()
            .with_builtin_function_property::<ArrayPrototypeConcat>()
            .with_constructor_property(intrinsics.array())
            .with_builtin_function_property::<ArrayPrototypeCopyWithin>()
            .with_builtin_function_property::<ArrayPrototypeEntries>()
            .with_builtin_function_property::<ArrayPrototypeEvery>()
            .with_builtin_function_property::<ArrayPrototypeFill>()
            .with_builtin_function_property::<ArrayPrototypeFilter>()
            .with_builtin_function_property::<ArrayPrototypeFind>()
            .with_builtin_function_property::<ArrayPrototypeFindIndex>()
            .with_builtin_function_property::<ArrayPrototypeFindLast>()
            .with_builtin_function_property::<ArrayPrototypeFindLastIndex>()
            .with_builtin_function_property::<ArrayPrototypeFlat>()
            .with_builtin_function_property::<ArrayPrototypeFlatMap>()
            .with_builtin_function_property::<ArrayPrototypeForEach>()
            .with_builtin_function_property::<ArrayPrototypeIncludes>()
            .with_builtin_function_property::<ArrayPrototypeIndexOf>()
            .with_builtin_function_property::<ArrayPrototypeJoin>()
            .with_builtin_function_property::<ArrayPrototypeKeys>()
            .with_builtin_function_property::<ArrayPrototypeLastIndexOf>()
            .with_builtin_function_property::<ArrayPrototypeMap>()
            .with_builtin_function_property::<ArrayPrototypePop>()
            .with_builtin_function_property::<ArrayPrototypePush>()
            .with_builtin_function_property::<ArrayPrototypeReduce>()
            .with_builtin_function_property::<ArrayPrototypeReduceRight>()
            .with_builtin_function_property::<ArrayPrototypeReverse>()
            .with_builtin_function_property::<ArrayPrototypeShift>()
            .with_builtin_function_property::<ArrayPrototypeSlice>()
            .with_builtin_function_property::<ArrayPrototypeSome>()
            .with_builtin_function_property::<ArrayPrototypeSort>()
            .with_builtin_function_property::<ArrayPrototypeSplice>()
            .with_builtin_function_property::<ArrayPrototypeToLocaleString>()
            .with_builtin_function_property::<ArrayPrototypeToReversed>()
            .with_builtin_function_property::<ArrayPrototypeToSorted>()
            .with_builtin_function_property::<ArrayPrototypeToSpliced>()
            .with_builtin_intrinsic_function_property::<ArrayPrototypeToString>()
            .with_builtin_function_property::<ArrayPrototypeUnshift>()
            .with_builtin_intrinsic_function_property::<ArrayPrototypeValues>()
            .with_builtin_function_property::<ArrayPrototypeWith>()
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::ITERATOR))
                    .with_value(Value::Object(array_prototype_values))
                    .with_enumerable(ArrayPrototypeValues::ENUMERABLE)
                    .with_configurable(ArrayPrototypeValues::CONFIGURABLE)
                    .build()
            })
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::UNSCOPABLES))
                    .with_value_readonly(Value::Object(unscopable_list))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

/// ### [23.1.3.2.1 IsConcatSpreadable ( O )](https://tc39.es/ecma262/#sec-isconcatspreadable)
///
/// Returns the object when it should be spread.
fn is_concat_spreadable(agent: &Agent, o: Value) -> JsResult<Option<Object>> {
    // 1. If O is not an Object, return false.
    let Value::Object(object) = o else {
        return Ok(None);
    };
    // 2. Let spreadable be ? Get(O, %Symbol.isConcatSpreadable%).
    let spreadable = get(agent, object, Symbol::IS_CONCAT_SPREADABLE.into())?;
    // 3. If spreadable is not undefined, return ToBoolean(spreadable).
    // 4. Return ? IsArray(O).
    let spread = if spreadable.is_undefined() {
        is_array(agent, o)?
    } else {
        to_boolean(agent, spreadable)
    };
    Ok(spread.then_some(object))
}

/// ### [23.1.3.12.1 FindViaPredicate ( O, len, direction, predicate, thisArg )](https://tc39.es/ecma262/#sec-findviapredicate)
///
/// Returns the index and value of the first match, or None for the
/// not-found record.
pub(crate) fn find_via_predicate(
    agent: &Agent,
    o: Object,
    len: u64,
    ascending: bool,
    predicate: Value,
    this_arg: Value,
) -> JsResult<Option<(u64, Value)>> {
    // 1. If IsCallable(predicate) is false, throw a TypeError exception.
    let predicate = require_callable(agent, predicate)?;
    // 2. If direction is ASCENDING, then
    //     a. Let indices be a List of the integers in the interval from 0
    //     (inclusive) to len (exclusive), in ascending order.
    // 3. Else,
    //     a. Let indices be a List of the integers in the interval from 0
    //     (inclusive) to len (exclusive), in descending order.
    let indices: Box<dyn Iterator<Item = u64>> = if ascending {
        Box::new(0..len)
    } else {
        Box::new((0..len).rev())
    };
    // 4. For each integer k of indices, do
    for k in indices {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. NOTE: If O is a TypedArray, the following invocation of Get
        // will return a normal completion.
        // c. Let kValue be ? Get(O, Pk).
        let k_value = get(agent, o, index_key(agent, k))?;
        // d. Let testResult be ? Call(predicate, thisArg, « kValue, 𝔽(k), O »).
        let test_result = call_function(
            agent,
            predicate,
            this_arg,
            &[k_value, index_value(k), Value::Object(o)],
        )?;
        // e. If ToBoolean(testResult) is true, return the Record {
        // [[Index]]: 𝔽(k), [[Value]]: kValue }.
        if to_boolean(agent, test_result) {
            return Ok(Some((k, k_value)));
        }
    }
    // 5. Return the Record { [[Index]]: -1𝔽, [[Value]]: undefined }.
    Ok(None)
}

/// The first index `includes` and `indexOf` examine, or None when
/// `fromIndex` is +∞.
fn search_start(agent: &Agent, from_index: Value, len: u64) -> JsResult<Option<u64>> {
    // 4. Let n be ? ToIntegerOrInfinity(fromIndex).
    // 5. Assert: If fromIndex is undefined, then n is 0.
    let n = to_integer_or_infinity(agent, from_index)?;
    // 6. If n = +∞, return false.
    if n == f64::INFINITY {
        return Ok(None);
    }
    // 7. Else if n = -∞, set n to 0.
    // 8. If n ≥ 0, then
    //     a. Let k be n.
    // 9. Else,
    //     a. Let k be len + n.
    //     b. If k < 0, set k to 0.
    let k = if n >= 0.0 {
        n
    } else {
        (len as f64 + n).max(0.0)
    };
    Ok(Some(k as u64))
}

/// ### [23.1.3.13.1 FlattenIntoArray ( target, source, sourceLen, start, depth \[ , mapperFunction \[ , thisArg \] \] )](https://tc39.es/ecma262/#sec-flattenintoarray)
///
/// `nesting` counts the recursion so that self-containing arrays end in a
/// RangeError.
#[allow(clippy::too_many_arguments)]
fn flatten_into_array(
    agent: &Agent,
    target: Object,
    source: Object,
    source_len: u64,
    start: u64,
    depth: f64,
    mapper: Option<(Object, Value)>,
    nesting: usize,
) -> JsResult<u64> {
    if nesting >= agent.options().max_call_depth {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Maximum call stack size exceeded",
        ));
    }
    // 1. Assert: If mapperFunction is present, then IsCallable(mapperFunction)
    // is true, thisArg is present, and depth is 1.
    // 2. Let targetIndex be start.
    let mut target_index = start;
    // 3. Let sourceIndex be +0𝔽.
    // 4. Repeat, while ℝ(sourceIndex) < sourceLen,
    for source_index in 0..source_len {
        // a. Let P be ! ToString(sourceIndex).
        let p = index_key(agent, source_index);
        // b. Let exists be ? HasProperty(source, P).
        // c. If exists is true, then
        if !has_property(agent, source, p)? {
            continue;
        }
        // i. Let element be ? Get(source, P).
        let mut element = get(agent, source, p)?;
        // ii. If mapperFunction is present, then
        if let Some((mapper, this_arg)) = mapper {
            // 1. Set element to ? Call(mapperFunction, thisArg, « element, sourceIndex, source »).
            element = call_function(
                agent,
                mapper,
                this_arg,
                &[element, index_value(source_index), Value::Object(source)],
            )?;
        }
        // iii. Let shouldFlatten be false.
        // iv. If depth > 0, then
        //     1. Set shouldFlatten to ? IsArray(element).
        let should_flatten = depth > 0.0 && is_array(agent, element)?;
        // v. If shouldFlatten is true, then
        if should_flatten && let Value::Object(element) = element {
            // 1. If depth = +∞, let newDepth be +∞.
            // 2. Else, let newDepth be depth - 1.
            let new_depth = depth - 1.0;
            // 3. Let elementLen be ? LengthOfArrayLike(element).
            let element_len = length_of_array_like(agent, element)?;
            // 4. Set targetIndex to ? FlattenIntoArray(target, element,
            // elementLen, targetIndex, newDepth).
            target_index = flatten_into_array(
                agent,
                target,
                element,
                element_len,
                target_index,
                new_depth,
                None,
                nesting + 1,
            )?;
        } else {
            // vi. Else,
            // 1. If targetIndex ≥ 2^53 - 1, throw a TypeError exception.
            if target_index >= MAX_SAFE_LENGTH {
                return Err(too_long(agent));
            }
            // 2. Perform ? CreateDataPropertyOrThrow(target, ! ToString(𝔽(targetIndex)), element).
            create_data_property_or_throw(agent, target, index_key(agent, target_index), element)?;
            // 3. Set targetIndex to targetIndex + 1.
            target_index += 1;
        }
        // d. Set sourceIndex to sourceIndex + 1𝔽.
    }
    // 5. Return targetIndex.
    Ok(target_index)
}

/// Steps shared by `reduce` and `reduceRight`; `indices` yields the visit
/// order.
fn reduce_with(
    agent: &Agent,
    o: Object,
    callback: Object,
    arguments: ArgumentsList,
    mut indices: impl Iterator<Item = u64>,
) -> JsResult<Value> {
    // 4. If len = 0 and initialValue is not present, throw a TypeError exception.
    // 5. Let k be 0.
    // 6. Let accumulator be undefined.
    // 7. If initialValue is present, then
    //     a. Set accumulator to initialValue.
    let mut accumulator = if arguments.len() > 1 {
        arguments.get(1)
    } else {
        // 8. Else,
        //     a. Let kPresent be false.
        //     b. Repeat, while kPresent is false and k < len,
        //         i. Let Pk be ! ToString(𝔽(k)).
        //         ii. Set kPresent to ? HasProperty(O, Pk).
        //         iii. If kPresent is true, then
        //             1. Set accumulator to ? Get(O, Pk).
        //         iv. Set k to k + 1.
        let mut first = None;
        for k in indices.by_ref() {
            let pk = index_key(agent, k);
            if has_property(agent, o, pk)? {
                first = Some(get(agent, o, pk)?);
                break;
            }
        }
        // c. If kPresent is false, throw a TypeError exception.
        first.ok_or_else(|| {
            agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Reduce of empty array with no initial value",
            )
        })?
    };
    // 9. Repeat, while k < len,
    for k in indices {
        let pk = index_key(agent, k);
        // b. Let kPresent be ? HasProperty(O, Pk).
        // c. If kPresent is true, then
        if has_property(agent, o, pk)? {
            // i. Let kValue be ? Get(O, Pk).
            let k_value = get(agent, o, pk)?;
            // ii. Set accumulator to ? Call(callbackfn, undefined, «
            // accumulator, kValue, 𝔽(k), O »).
            accumulator = call_function(
                agent,
                callback,
                Value::Undefined,
                &[accumulator, k_value, index_value(k), Value::Object(o)],
            )?;
        }
    }
    // 10. Return accumulator.
    Ok(accumulator)
}

/// Copy the element at `from` to `to`, or delete `to` when `from` is a
/// hole: the inner step of `shift`, `splice` and `unshift`.
fn move_element(agent: &Agent, o: Object, from: u64, to: u64) -> JsResult<()> {
    let from = index_key(agent, from);
    let to = index_key(agent, to);
    // Let fromPresent be ? HasProperty(O, from).
    if has_property(agent, o, from)? {
        // Let fromValue be ? Get(O, from).
        // Perform ? Set(O, to, fromValue, true).
        let from_value = get(agent, o, from)?;
        set(agent, o, to, from_value, true)
    } else {
        // Perform ? DeletePropertyOrThrow(O, to).
        delete_property_or_throw(agent, o, to)
    }
}

fn optional_comparator(agent: &Agent, comparator: Value) -> JsResult<Option<Object>> {
    if comparator.is_undefined() {
        return Ok(None);
    }
    match comparator {
        Value::Object(comparator) if is_callable(agent, Value::Object(comparator)) => {
            Ok(Some(comparator))
        }
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "The comparison function must be either a function or undefined",
        )),
    }
}

/// ### [23.1.3.30.1 SortIndexedProperties ( obj, len, SortCompare, holes )](https://tc39.es/ecma262/#sec-sortindexedproperties)
fn sort_indexed_properties(
    agent: &Agent,
    obj: Object,
    len: u64,
    comparator: Option<Object>,
    skip_holes: bool,
) -> JsResult<Vec<Value>> {
    // 1. Let items be a new empty List.
    let mut items = Vec::new();
    // 2. Let k be 0.
    // 3. Repeat, while k < len,
    for k in 0..len {
        // a. Let Pk be ! ToString(𝔽(k)).
        let pk = index_key(agent, k);
        // b. If holes is SKIP-HOLES, then
        //     i. Let kRead be ? HasProperty(obj, Pk).
        // c. Else,
        //     i. Let kRead be true.
        // d. If kRead is true, then
        if !skip_holes || has_property(agent, obj, pk)? {
            // i. Let kValue be ? Get(obj, Pk).
            // ii. Append kValue to items.
            items.push(get(agent, obj, pk)?);
        }
        // e. Set k to k + 1.
    }
    // 4. Sort items using an implementation-defined sequence of calls to
    // SortCompare. If any such call returns an abrupt completion, stop
    // before performing any further calls to SortCompare and return that
    // Completion Record.
    // 5. Return items.
    sort_values(items, |x, y| compare_array_elements(agent, x, y, comparator))
}

/// Stable merge sort driven by a fallible comparison. The first abrupt
/// comparison stops the sort; an inconsistent comparator only yields an
/// implementation-defined order.
pub(crate) fn sort_values(
    mut items: Vec<Value>,
    mut compare: impl FnMut(Value, Value) -> JsResult<Ordering>,
) -> JsResult<Vec<Value>> {
    let len = items.len();
    let mut merged = Vec::with_capacity(len);
    let mut width = 1;
    while width < len {
        merged.clear();
        let mut start = 0;
        while start < len {
            let middle = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, middle);
            while left < middle && right < end {
                if compare(items[right], items[left])? == Ordering::Less {
                    merged.push(items[right]);
                    right += 1;
                } else {
                    merged.push(items[left]);
                    left += 1;
                }
            }
            merged.extend_from_slice(&items[left..middle]);
            merged.extend_from_slice(&items[right..end]);
            start = end;
        }
        std::mem::swap(&mut items, &mut merged);
        width *= 2;
    }
    Ok(items)
}

/// ### [23.1.3.30.2 CompareArrayElements ( x, y, comparator )](https://tc39.es/ecma262/#sec-comparearrayelements)
pub(crate) fn compare_array_elements(
    agent: &Agent,
    x: Value,
    y: Value,
    comparator: Option<Object>,
) -> JsResult<Ordering> {
    match (x, y) {
        // 1. If x and y are both undefined, return +0𝔽.
        (Value::Undefined, Value::Undefined) => return Ok(Ordering::Equal),
        // 2. If x is undefined, return 1𝔽.
        (Value::Undefined, _) => return Ok(Ordering::Greater),
        // 3. If y is undefined, return -1𝔽.
        (_, Value::Undefined) => return Ok(Ordering::Less),
        _ => {}
    }
    // 4. If comparator is not undefined, then
    if let Some(comparator) = comparator {
        // a. Let v be ? ToNumber(? Call(comparator, undefined, « x, y »)).
        let v = call_function(agent, comparator, Value::Undefined, &[x, y])?;
        let v = to_number(agent, v)?;
        // b. If v is NaN, return +0𝔽.
        // c. Return v.
        return Ok(v.partial_cmp(&0.0).unwrap_or(Ordering::Equal));
    }
    // 5. Let xString be ? ToString(x).
    let x_string = to_string(agent, x)?;
    // 6. Let yString be ? ToString(y).
    let y_string = to_string(agent, y)?;
    // 7-11. Compare the strings by their sequences of code units.
    Ok(compare_code_units(agent, x_string, y_string))
}

fn compare_code_units(agent: &Agent, x: HeapString, y: HeapString) -> Ordering {
    if x == y {
        return Ordering::Equal;
    }
    let x = x.as_rc(agent);
    let y = y.as_rc(agent);
    x.encode_utf16().cmp(y.encode_utf16())
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn prototype_is_an_array_with_unscopables() {
        assert_eq!(
            run_to_string(
                "var u = Array.prototype[Symbol.unscopables];
                 [Array.isArray(Array.prototype), Array.prototype.length,
                  String(Object.getPrototypeOf(u)), u.flat, u.map,
                  Array.prototype[Symbol.iterator] === Array.prototype.values].join()"
            ),
            "true,0,null,true,,true"
        );
        assert_eq!(
            run_to_string("var keys = 1; with ([]) { typeof keys }"),
            "number"
        );
    }

    #[test]
    fn stack_and_queue_methods() {
        assert_eq!(
            run_to_string(
                "var a = [1, 2];
                 var pushed = a.push(3, 4); var popped = a.pop();
                 var shifted = a.shift(); var unshifted = a.unshift(0, 0.5);
                 [pushed, popped, shifted, unshifted, a.join(' ')].join('|')"
            ),
            "4|4|1|4|0 0.5 2 3"
        );
        assert_eq!(
            run_to_string("var a = []; [a.pop(), a.shift(), a.length].join()"),
            ",,0"
        );
    }

    #[test]
    fn iteration_methods_skip_holes() {
        assert_eq!(
            run_to_string(
                "var visited = []; [1, , 3].forEach(function (x, i) { visited.push(i) });
                 [visited.join(), [1, , 3].map(x => x * 2).length, 1 in [1, , 3].map(x => x),
                  [1, 2, 3, 4].filter(x => x % 2).join(), [1, 2].every(x => x > 0),
                  [1, 2].some(x => x > 1), [].every(x => false)].join(' ')"
            ),
            "0,2 3 false 1,3 true true true"
        );
    }

    #[test]
    fn find_family() {
        assert_eq!(
            run_to_string(
                "var a = [5, 12, 8, 130, 44];
                 [a.find(x => x > 10), a.findIndex(x => x > 10), a.findLast(x => x > 10),
                  a.findLastIndex(x => x > 10), a.find(x => x > 1000), a.findIndex(x => x > 1000)
                 ].join()"
            ),
            "12,1,44,4,,-1"
        );
    }

    #[test]
    fn searching() {
        assert_eq!(
            run_to_string(
                "var a = [1, NaN, 2, 1];
                 [a.indexOf(1), a.lastIndexOf(1), a.indexOf(NaN), a.includes(NaN),
                  a.indexOf(1, 1), a.lastIndexOf(1, -2), a.includes(2, -1), [, ].includes(undefined),
                  [, ].indexOf(undefined), a.at(-1), a.at(9)].join()"
            ),
            "0,3,-1,true,3,0,false,true,-1,1,"
        );
    }

    #[test]
    fn join_and_to_string() {
        assert_eq!(
            run_to_string(
                "[[1, null, undefined, 'x'].join(), [1, [2, [3]]].toString(), [].join(),
                  ['a', 'b'].join(''), Array.prototype.toString.call({ join: null })].join('|')"
            ),
            "1,,,x|1,2,3||ab|[object Object]"
        );
        assert_eq!(
            run_to_string("[1, 'a', { toLocaleString() { return 'L' } }].toLocaleString()"),
            "1,a,L"
        );
    }

    #[test]
    fn reduce_and_reduce_right() {
        assert_eq!(
            run_to_string(
                "[[1, 2, 3].reduce((a, b) => a + b), ['a', 'b', 'c'].reduceRight((a, b) => a + b),
                  [].reduce((a, b) => a, 'init'), [, 5].reduce((a, b) => a + b)].join()"
            ),
            "6,cba,init,5"
        );
        assert_eq!(
            run_to_string("try { [].reduce((a, b) => a) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn slicing_and_splicing() {
        assert_eq!(
            run_to_string(
                "var a = [0, 1, 2, 3, 4];
                 var removed = a.splice(1, 2, 'x', 'y', 'z');
                 [a.slice(1, -1).join(), a.slice(-2).join(), removed.join(), a.join(),
                  [1, 2, 3].splice(1).join(), [1, 2, 3].toSpliced(0, 1, 9, 8).join()].join(' ')"
            ),
            "x,y,z,3 3,4 1,2 0,x,y,z,3,4 2,3 9,8,2,3"
        );
        assert_eq!(
            run_to_string("var a = [1, 2, 3, 4, 5]; a.splice(1, 3); a.join() + ':' + a.length"),
            "1,5:2"
        );
    }

    #[test]
    fn concat_spreads_arrays_and_spreadables() {
        assert_eq!(
            run_to_string(
                "var spreadable = { length: 2, 0: 'a', 1: 'b', [Symbol.isConcatSpreadable]: true };
                 var a = [1].concat([2, [3]], 4, spreadable);
                 [a.length, a.join('|')].join(' ')"
            ),
            "6 1|2|3|4|a|b"
        );
    }

    #[test]
    fn sorting() {
        assert_eq!(
            run_to_string(
                "[[10, 9, 1, undefined, 2].sort().join(), [3, 1, 2].sort((a, b) => b - a).join(),
                  ['b', , 'a'].sort().length, 2 in ['b', , 'a'].sort(),
                  [3, 1, 2].toSorted().join()].join(' ')"
            ),
            "1,10,2,9, 3,2,1 3 false 1,2,3"
        );
        assert_eq!(
            run_to_string(
                "var pairs = [[1, 'a'], [0, 'b'], [1, 'c'], [0, 'd']];
                 pairs.sort((x, y) => x[0] - y[0]).map(p => p[1]).join('')"
            ),
            "bdac"
        );
        assert_eq!(
            run_to_string("try { [2, 1].sort(() => { throw 'stop' }) } catch (e) { e }"),
            "stop"
        );
        assert_eq!(
            run_to_string("try { [].sort(1) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn reversing_filling_and_copying() {
        assert_eq!(
            run_to_string(
                "var holes = [1, , 3, , ]; holes.reverse();
                 [[1, 2, 3].reverse().join(), Object.keys(holes).join(),
                  [1, 2, 3, 4].fill(0, 1, -1).join(), [1, 2, 3, 4, 5].copyWithin(0, 3).join(),
                  [1, 2, 3, 4, 5].copyWithin(1, 0, 3).join(), [1, 2, 3].toReversed().join()
                 ].join(' ')"
            ),
            "3,2,1 1,3 1,0,0,4 4,5,3,4,5 1,1,2,3,5 3,2,1"
        );
    }

    #[test]
    fn flattening() {
        assert_eq!(
            run_to_string(
                "[[1, [2, [3, [4]]]].flat().length, [1, [2, [3, [4]]]].flat(Infinity).join(),
                  [1, 2].flatMap(x => [x, x * 10]).join(), [[1], , [2]].flat().join()].join(' ')"
            ),
            "3 1,2,3,4 1,10,2,20 1,2"
        );
    }

    #[test]
    fn with_copies_and_checks_the_index() {
        assert_eq!(
            run_to_string(
                "var a = [1, 2, 3]; var b = a.with(-1, 9); [a.join(), b.join()].join(' ')"
            ),
            "1,2,3 1,2,9"
        );
        assert_eq!(
            run_to_string("try { [1].with(1, 0) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn species_controls_derived_results() {
        assert_eq!(
            run_to_string(
                "class Sub extends Array {}
                 var s = Sub.from([1, 2, 3]);
                 [s.map(x => x) instanceof Sub, s.filter(Boolean) instanceof Sub,
                  s.slice() instanceof Sub, s.toReversed() instanceof Sub].join()"
            ),
            "true,true,true,false"
        );
    }

    #[test]
    fn methods_are_generic() {
        assert_eq!(
            run_to_string(
                "var o = { length: 2, 0: 'a', 1: 'b' };
                 Array.prototype.push.call(o, 'c');
                 [o.length, Array.prototype.join.call(o, '-'),
                  Array.prototype.map.call('ab', c => c + c).join()].join(' ')"
            ),
            "3 a-b-c aa,bb"
        );
    }
}
