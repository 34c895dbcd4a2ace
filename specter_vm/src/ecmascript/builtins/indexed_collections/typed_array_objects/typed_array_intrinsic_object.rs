// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.2.1 The %TypedArray% Intrinsic Object](https://tc39.es/ecma262/#sec-%typedarray%-intrinsic-object)
//! and [23.2.3 Properties of the %TypedArray% Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-%typedarrayprototype%-object)

use std::cmp::Ordering;

use super::abstract_operations::{
    element, set_element, typed_array_create_from_constructor, typed_array_create_same_type,
    typed_array_species_create, validate_typed_array,
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{get_iterator_from_method, iterator_to_list},
        operations_on_objects::{
            call_function, get, get_method, invoke, length_of_array_like,
        },
        testing_and_comparison::{
            is_callable, is_constructor, is_strictly_equal, same_value_zero,
        },
        type_conversion::{to_boolean, to_integer_or_infinity, to_number, to_object, to_string},
    },
    builders::{
        builtin_function_builder::BuiltinFunctionBuilder,
        ordinary_object_builder::OrdinaryObjectBuilder,
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsic,
        BuiltinIntrinsicConstructor,
        indexed_collections::{
            array_iterator_objects::{CollectionIteratorKind, create_array_iterator},
            array_objects::{find_via_predicate, sort_values},
        },
        structured_data::array_buffer_objects::copy_buffer_bytes,
        typed_array::{TypedArrayData, is_valid_integer_index, typed_array_data},
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, PropertyKey, Symbol, Value},
};

pub(crate) struct TypedArrayIntrinsicObject;

impl Builtin for TypedArrayIntrinsicObject {
    const NAME: &'static str = "TypedArray";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(TypedArrayIntrinsicObject::constructor);
}
impl BuiltinIntrinsicConstructor for TypedArrayIntrinsicObject {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::TypedArray;
}

struct TypedArrayFrom;
impl Builtin for TypedArrayFrom {
    const NAME: &'static str = "from";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayIntrinsicObject::from);
}

struct TypedArrayOf;
impl Builtin for TypedArrayOf {
    const NAME: &'static str = "of";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayIntrinsicObject::of);
}

struct TypedArrayGetSpecies;
impl Builtin for TypedArrayGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayIntrinsicObject::get_species);
}
impl BuiltinGetter for TypedArrayGetSpecies {}

/// Where `%TypedArray%.from` reads its elements.
enum FromSource {
    List(Vec<Value>),
    ArrayLike(Object),
}

impl TypedArrayIntrinsicObject {
    /// ### [23.2.1.1 %TypedArray% ( )](https://tc39.es/ecma262/#sec-%typedarray%)
    fn constructor(
        agent: &Agent,
        _: Value,
        _: ArgumentsList,
        _: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Throw a TypeError exception.
        Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Abstract class TypedArray not directly constructable",
        ))
    }

    /// ### [23.2.2.1 %TypedArray%.from ( source \[ , mapper \[ , thisArg \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.from)
    fn from(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let source = arguments.get(0);
        let mapper = arguments.get(1);
        let this_arg = arguments.get(2);
        // 1. Let C be the this value.
        // 2. If IsConstructor(C) is false, throw a TypeError exception.
        let c = require_constructor(agent, this_value)?;
        // 3. If mapper is undefined, then
        //     a. Let mapping be false.
        // 4. Else,
        //     a. If IsCallable(mapper) is false, throw a TypeError exception.
        //     b. Let mapping be true.
        let mapper = if mapper.is_undefined() {
            None
        } else {
            Some(require_callable(agent, mapper)?)
        };
        // 5. Let usingIterator be ? GetMethod(source, %Symbol.iterator%).
        let using_iterator = get_method(agent, source, PropertyKey::Symbol(Symbol::ITERATOR))?;
        // 6. If usingIterator is not undefined, then
        //     a. Let values be ? IteratorToList(? GetIteratorFromMethod(source, usingIterator)).
        // 7. NOTE: source is not an Iterable so assume it is already an
        // array-like object.
        // 8. Let arrayLike be ! ToObject(source).
        let values = match using_iterator {
            Some(using_iterator) => {
                let mut iterator_record = get_iterator_from_method(agent, source, using_iterator)?;
                FromSource::List(iterator_to_list(agent, &mut iterator_record)?)
            }
            None => FromSource::ArrayLike(to_object(agent, source)?),
        };
        // b. Let len be the number of elements in values.
        // 9. Let len be ? LengthOfArrayLike(arrayLike).
        let len = match &values {
            FromSource::List(values) => values.len() as u64,
            FromSource::ArrayLike(array_like) => length_of_array_like(agent, *array_like)?,
        };
        // c. Let targetObj be ? TypedArrayCreateFromConstructor(C, « 𝔽(len) »).
        let (target_obj, _) =
            typed_array_create_from_constructor(agent, c, &[Value::Number(len as f64)])?;
        // d. Let k be 0.
        // e. Repeat, while k < len,
        for k in 0..len {
            // i. Let Pk be ! ToString(𝔽(k)).
            // ii. Let kValue be the first element of values.
            // iii. Remove the first element from values.
            let k_value = match &values {
                FromSource::List(values) => values[k as usize],
                FromSource::ArrayLike(array_like) => {
                    get(agent, *array_like, PropertyKey::from_index(agent, k))?
                }
            };
            // iv. If mapping is true, then
            //     1. Let mappedValue be ? Call(mapper, thisArg, « kValue, 𝔽(k) »).
            // v. Else,
            //     1. Let mappedValue be kValue.
            let mapped_value = match mapper {
                Some(mapper) => call_function(
                    agent,
                    mapper,
                    this_arg,
                    &[k_value, Value::Number(k as f64)],
                )?,
                None => k_value,
            };
            // vi. Perform ? Set(targetObj, Pk, mappedValue, true).
            set_element(agent, target_obj, k, mapped_value)?;
        }
        // 13. Return targetObj.
        Ok(Value::Object(target_obj))
    }

    /// ### [23.2.2.2 %TypedArray%.of ( ...items )](https://tc39.es/ecma262/#sec-%typedarray%.of)
    fn of(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let len be the number of elements in items.
        let len = arguments.len();
        // 2. Let C be the this value.
        // 3. If IsConstructor(C) is false, throw a TypeError exception.
        let c = require_constructor(agent, this_value)?;
        // 4. Let newObj be ? TypedArrayCreateFromConstructor(C, « 𝔽(len) »).
        let (new_obj, _) = typed_array_create_from_constructor(agent, c, &[Value::from(len)])?;
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for (k, k_value) in arguments.iter().enumerate() {
            // a. Let kValue be items[k].
            // b. Let Pk be ! ToString(𝔽(k)).
            // c. Perform ? Set(newObj, Pk, kValue, true).
            set_element(agent, new_obj, k as u64, *k_value)?;
        }
        // 7. Return newObj.
        Ok(Value::Object(new_obj))
    }

    /// ### [23.2.2.4 get %TypedArray% \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-%typedarray%-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        BuiltinFunctionBuilder::new_intrinsic_constructor::<TypedArrayIntrinsicObject>(agent, realm)
            .with_property_capacity(4)
            .with_builtin_function_property::<TypedArrayFrom>()
            .with_builtin_function_property::<TypedArrayOf>()
            .with_prototype_property(intrinsics.typed_array_prototype())
            .with_builtin_function_getter_property::<TypedArrayGetSpecies>()
            .build();
        TypedArrayPrototype::create_intrinsic(agent, realm);
    }
}

macro_rules! typed_array_method {
    ($($builtin:ident, $name:literal, $length:literal, $function:ident;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = $length;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::$function);
            }
        )*
    };
}

typed_array_method! {
    TypedArrayPrototypeAt, "at", 1, at;
    TypedArrayPrototypeCopyWithin, "copyWithin", 2, copy_within;
    TypedArrayPrototypeEntries, "entries", 0, entries;
    TypedArrayPrototypeEvery, "every", 1, every;
    TypedArrayPrototypeFill, "fill", 1, fill;
    TypedArrayPrototypeFilter, "filter", 1, filter;
    TypedArrayPrototypeFind, "find", 1, find;
    TypedArrayPrototypeFindIndex, "findIndex", 1, find_index;
    TypedArrayPrototypeFindLast, "findLast", 1, find_last;
    TypedArrayPrototypeFindLastIndex, "findLastIndex", 1, find_last_index;
    TypedArrayPrototypeForEach, "forEach", 1, for_each;
    TypedArrayPrototypeIncludes, "includes", 1, includes;
    TypedArrayPrototypeIndexOf, "indexOf", 1, index_of;
    TypedArrayPrototypeJoin, "join", 1, join;
    TypedArrayPrototypeKeys, "keys", 0, keys;
    TypedArrayPrototypeLastIndexOf, "lastIndexOf", 1, last_index_of;
    TypedArrayPrototypeMap, "map", 1, map;
    TypedArrayPrototypeReduce, "reduce", 1, reduce;
    TypedArrayPrototypeReduceRight, "reduceRight", 1, reduce_right;
    TypedArrayPrototypeReverse, "reverse", 0, reverse;
    TypedArrayPrototypeSet, "set", 1, set;
    TypedArrayPrototypeSlice, "slice", 2, slice;
    TypedArrayPrototypeSome, "some", 1, some;
    TypedArrayPrototypeSort, "sort", 1, sort;
    TypedArrayPrototypeSubarray, "subarray", 2, subarray;
    TypedArrayPrototypeToLocaleString, "toLocaleString", 0, to_locale_string;
    TypedArrayPrototypeToReversed, "toReversed", 0, to_reversed;
    TypedArrayPrototypeToSorted, "toSorted", 1, to_sorted;
    TypedArrayPrototypeWith, "with", 2, with;
}

struct TypedArrayPrototypeValues;
impl Builtin for TypedArrayPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::values);
}
impl BuiltinIntrinsic for TypedArrayPrototypeValues {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::TypedArrayPrototypeValues;
}

macro_rules! typed_array_getter {
    ($($builtin:ident, $name:literal, $function:ident;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = 0;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::$function);
            }
            impl BuiltinGetter for $builtin {}
        )*
    };
}

typed_array_getter! {
    TypedArrayPrototypeGetBuffer, "buffer", get_buffer;
    TypedArrayPrototypeGetByteLength, "byteLength", get_byte_length;
    TypedArrayPrototypeGetByteOffset, "byteOffset", get_byte_offset;
    TypedArrayPrototypeGetLength, "length", get_length;
}

struct TypedArrayPrototypeGetToStringTag;
impl Builtin for TypedArrayPrototypeGetToStringTag {
    const NAME: &'static str = "[Symbol.toStringTag]";
    const KEY: Option<Symbol> = Some(Symbol::TO_STRING_TAG);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::get_to_string_tag);
}
impl BuiltinGetter for TypedArrayPrototypeGetToStringTag {}

fn require_callable(agent: &Agent, value: Value) -> JsResult<Object> {
    match value {
        Value::Object(callable) if is_callable(agent, value) => Ok(callable),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{} is not a function", value.to_display_string(agent)),
        )),
    }
}

fn require_constructor(agent: &Agent, value: Value) -> JsResult<Object> {
    match value {
        Value::Object(constructor) if is_constructor(agent, value) => Ok(constructor),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{} is not a constructor", value.to_display_string(agent)),
        )),
    }
}

/// Resolve a relative index argument against `len`: negative values count
/// from the end and the result is clamped to `0..=len`. Undefined resolves
/// to `default`.
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

/// All elements of a TypedArray, in index order.
fn elements(agent: &Agent, o: Object, data: TypedArrayData) -> Vec<Value> {
    (0..data.array_length as u64)
        .map(|k| element(agent, o, k))
        .collect()
}

/// ### [23.2.4.7 CompareTypedArrayElements ( x, y, comparator )](https://tc39.es/ecma262/#sec-comparetypedarrayelements)
fn compare_typed_array_elements(
    agent: &Agent,
    x: Value,
    y: Value,
    comparator: Option<Object>,
) -> JsResult<Ordering> {
    // 2. If comparator is not undefined, then
    if let Some(comparator) = comparator {
        // a. Let v be ? ToNumber(? Call(comparator, undefined, « x, y »)).
        let v = call_function(agent, comparator, Value::Undefined, &[x, y])?;
        let v = to_number(agent, v)?;
        // b. If v is NaN, return +0𝔽.
        // c. Return v.
        return Ok(v.partial_cmp(&0.0).unwrap_or(Ordering::Equal));
    }
    let (Value::Number(x), Value::Number(y)) = (x, y) else {
        return Ok(Ordering::Equal);
    };
    Ok(match (x.is_nan(), y.is_nan()) {
        // 3. If x and y are both NaN, return +0𝔽.
        (true, true) => Ordering::Equal,
        // 4. If x is NaN, return 1𝔽.
        (true, false) => Ordering::Greater,
        // 5. If y is NaN, return -1𝔽.
        (false, true) => Ordering::Less,
        // 6. If x < y, return -1𝔽.
        // 7. If x > y, return 1𝔽.
        // 8. If x is -0𝔽 and y is +0𝔽, return -1𝔽.
        // 9. If x is +0𝔽 and y is -0𝔽, return 1𝔽.
        // 10. Return +0𝔽.
        (false, false) => x.total_cmp(&y),
    })
}

fn optional_comparator(agent: &Agent, comparator: Value) -> JsResult<Option<Object>> {
    if comparator.is_undefined() {
        return Ok(None);
    }
    match comparator {
        Value::Object(object) if is_callable(agent, comparator) => Ok(Some(object)),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "The comparison function must be either a function or undefined",
        )),
    }
}

pub(crate) struct TypedArrayPrototype;

impl TypedArrayPrototype {
    /// ### [23.2.3.1 %TypedArray%.prototype.at ( index )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.at)
    fn at(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, SEQ-CST).
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.at")?;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = data.array_length as f64;
        // 4. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If relativeIndex ≥ 0, then
        //     a. Let k be relativeIndex.
        // 6. Else,
        //     a. Let k be len + relativeIndex.
        let k = if relative_index >= 0.0 {
            relative_index
        } else {
            len + relative_index
        };
        // 7. If k < 0 or k ≥ len, return undefined.
        if k < 0.0 || k >= len {
            return Ok(Value::Undefined);
        }
        // 8. Return ! Get(O, ! ToString(𝔽(k))).
        Ok(element(agent, o, k as u64))
    }

    /// ### [23.2.3.2 get %TypedArray%.prototype.buffer](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.buffer)
    fn get_buffer(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        // 3. Assert: O has a [[ViewedArrayBuffer]] internal slot.
        let (_, data) =
            validate_typed_array(agent, this_value, "get %TypedArray%.prototype.buffer")?;
        // 4. Let buffer be O.[[ViewedArrayBuffer]].
        // 5. Return buffer.
        Ok(Value::Object(data.viewed_array_buffer))
    }

    /// ### [23.2.3.3 get %TypedArray%.prototype.byteLength](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.bytelength)
    fn get_byte_length(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (_, data) =
            validate_typed_array(agent, this_value, "get %TypedArray%.prototype.byteLength")?;
        // 6. Return 𝔽(TypedArrayByteLength(taRecord)).
        Ok(Value::from(data.byte_length()))
    }

    /// ### [23.2.3.4 get %TypedArray%.prototype.byteOffset](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.byteoffset)
    fn get_byte_offset(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (_, data) =
            validate_typed_array(agent, this_value, "get %TypedArray%.prototype.byteOffset")?;
        // 7. Let offset be O.[[ByteOffset]].
        // 8. Return 𝔽(offset).
        Ok(Value::from(data.byte_offset))
    }

    /// ### [23.2.3.6 %TypedArray%.prototype.copyWithin ( target, start \[ , end \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.copywithin)
    fn copy_within(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.copyWithin")?;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = data.array_length as u64;
        // 4-6. Let targetIndex be the clamped relative target.
        let target_index = relative_index(agent, arguments.get(0), len, 0)?;
        // 7-9. Let startIndex be the clamped relative start.
        let start_index = relative_index(agent, arguments.get(1), len, 0)?;
        // 10-12. Let endIndex be the clamped relative end.
        let end_index = relative_index(agent, arguments.get(2), len, len)?;
        // 13. Let count be min(endIndex - startIndex, len - targetIndex).
        let count = end_index
            .saturating_sub(start_index)
            .min(len - target_index);
        // 14. If count > 0, then
        if count > 0 {
            // e. Let elementSize be TypedArrayElementSize(O).
            let element_size = data.kind.element_size();
            // f. Let byteOffset be O.[[ByteOffset]].
            // h. Let toByteIndex be (targetIndex × elementSize) + byteOffset.
            // i. Let fromByteIndex be (startIndex × elementSize) + byteOffset.
            // j. Let countBytes be count × elementSize.
            // k-l. Copy the bytes, preserving overlapping source data.
            copy_buffer_bytes(
                agent,
                data.viewed_array_buffer,
                data.byte_offset + start_index as usize * element_size,
                data.viewed_array_buffer,
                data.byte_offset + target_index as usize * element_size,
                count as usize * element_size,
            );
        }
        // 15. Return O.
        Ok(Value::Object(o))
    }

    /// ### [23.2.3.7 %TypedArray%.prototype.entries ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.entries)
    fn entries(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, _) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.entries")?;
        // 3. Return CreateArrayIterator(O, KEY+VALUE).
        Ok(Value::Object(create_array_iterator(
            agent,
            o,
            CollectionIteratorKind::KeyValue,
        )))
    }

    /// ### [23.2.3.8 %TypedArray%.prototype.every ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.every)
    fn every(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.every")?;
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for k in 0..data.array_length as u64 {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ! Get(O, Pk).
            let k_value = element(agent, o, k);
            // c. Let testResult be ToBoolean(? Call(callback, thisArg, « kValue, 𝔽(k), O »)).
            let test_result = call_function(
                agent,
                callback,
                this_arg,
                &[k_value, Value::Number(k as f64), Value::Object(o)],
            )?;
            // d. If testResult is false, return false.
            if !to_boolean(agent, test_result) {
                return Ok(Value::Boolean(false));
            }
        }
        // 7. Return true.
        Ok(Value::Boolean(true))
    }

    /// ### [23.2.3.9 %TypedArray%.prototype.fill ( value \[ , start \[ , end \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.fill)
    fn fill(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.fill")?;
        let len = data.array_length as u64;
        // 5. Otherwise, set value to ? ToNumber(value).
        let value = Value::Number(to_number(agent, arguments.get(0))?);
        // 6-8. Let startIndex be the clamped relative start.
        let start_index = relative_index(agent, arguments.get(1), len, 0)?;
        // 9-11. Let endIndex be the clamped relative end.
        let end_index = relative_index(agent, arguments.get(2), len, len)?;
        // 16. Let k be startIndex.
        // 17. Repeat, while k < endIndex,
        for k in start_index..end_index {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Perform ! Set(O, Pk, value, true).
            set_element(agent, o, k, value)?;
        }
        // 18. Return O.
        Ok(Value::Object(o))
    }

    /// ### [23.2.3.10 %TypedArray%.prototype.filter ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.filter)
    fn filter(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.filter")?;
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let kept be a new empty List.
        let mut kept = Vec::new();
        // 6. Let captured be 0.
        // 7. Let k be 0.
        // 8. Repeat, while k < len,
        for k in 0..data.array_length as u64 {
            // b. Let kValue be ! Get(O, Pk).
            let k_value = element(agent, o, k);
            // c. Let selected be ToBoolean(? Call(callback, thisArg, « kValue, 𝔽(k), O »)).
            let selected = call_function(
                agent,
                callback,
                this_arg,
                &[k_value, Value::Number(k as f64), Value::Object(o)],
            )?;
            // d. If selected is true, then
            //     i. Append kValue to kept.
            //     ii. Set captured to captured + 1.
            if to_boolean(agent, selected) {
                kept.push(k_value);
            }
        }
        // 9. Let A be ? TypedArraySpeciesCreate(O, « 𝔽(captured) »).
        let (a, _) = typed_array_species_create(agent, o, data.kind, &[Value::from(kept.len())])?;
        // 10. Let n be 0.
        // 11. For each element e of kept, do
        for (n, e) in kept.into_iter().enumerate() {
            // a. Perform ! Set(A, ! ToString(𝔽(n)), e, true).
            set_element(agent, a, n as u64, e)?;
        }
        // 12. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.2.3.11 %TypedArray%.prototype.find ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.find)
    fn find(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.find")?;
        // 4. Let findRec be ? FindViaPredicate(O, len, ASCENDING, predicate, thisArg).
        let find_rec = find_via_predicate(
            agent,
            o,
            data.array_length as u64,
            true,
            arguments.get(0),
            arguments.get(1),
        )?;
        // 5. Return findRec.[[Value]].
        Ok(find_rec.map_or(Value::Undefined, |(_, value)| value))
    }

    /// ### [23.2.3.12 %TypedArray%.prototype.findIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.findindex)
    fn find_index(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.findIndex")?;
        let find_rec = find_via_predicate(
            agent,
            o,
            data.array_length as u64,
            true,
            arguments.get(0),
            arguments.get(1),
        )?;
        // 5. Return findRec.[[Index]].
        Ok(Value::Number(find_rec.map_or(-1.0, |(index, _)| index as f64)))
    }

    /// ### [23.2.3.13 %TypedArray%.prototype.findLast ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.findlast)
    fn find_last(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.findLast")?;
        // 4. Let findRec be ? FindViaPredicate(O, len, DESCENDING, predicate, thisArg).
        let find_rec = find_via_predicate(
            agent,
            o,
            data.array_length as u64,
            false,
            arguments.get(0),
            arguments.get(1),
        )?;
        Ok(find_rec.map_or(Value::Undefined, |(_, value)| value))
    }

    /// ### [23.2.3.14 %TypedArray%.prototype.findLastIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.findlastindex)
    fn find_last_index(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.findLastIndex")?;
        let find_rec = find_via_predicate(
            agent,
            o,
            data.array_length as u64,
            false,
            arguments.get(0),
            arguments.get(1),
        )?;
        Ok(Value::Number(find_rec.map_or(-1.0, |(index, _)| index as f64)))
    }

    /// ### [23.2.3.15 %TypedArray%.prototype.forEach ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.foreach)
    fn for_each(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.forEach")?;
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        for k in 0..data.array_length as u64 {
            let k_value = element(agent, o, k);
            // c. Perform ? Call(callback, thisArg, « kValue, 𝔽(k), O »).
            call_function(
                agent,
                callback,
                this_arg,
                &[k_value, Value::Number(k as f64), Value::Object(o)],
            )?;
        }
        // 7. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [23.2.3.16 %TypedArray%.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.includes)
    fn includes(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.includes")?;
        let len = data.array_length as u64;
        // 4. If len = 0, return false.
        if len == 0 {
            return Ok(Value::Boolean(false));
        }
        let Some(start) = search_start(agent, arguments.get(1), len)? else {
            return Ok(Value::Boolean(false));
        };
        let search_element = arguments.get(0);
        // 11. Repeat, while k < len,
        for k in start..len {
            // a. Let elementK be ! Get(O, ! ToString(𝔽(k))).
            // b. If SameValueZero(searchElement, elementK) is true, return true.
            if same_value_zero(agent, search_element, element(agent, o, k)) {
                return Ok(Value::Boolean(true));
            }
        }
        // 12. Return false.
        Ok(Value::Boolean(false))
    }

    /// ### [23.2.3.17 %TypedArray%.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.indexof)
    fn index_of(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.indexOf")?;
        let len = data.array_length as u64;
        // 4. If len = 0, return -1𝔽.
        if len == 0 {
            return Ok(Value::Number(-1.0));
        }
        let Some(start) = search_start(agent, arguments.get(1), len)? else {
            return Ok(Value::Number(-1.0));
        };
        let search_element = arguments.get(0);
        for k in start..len {
            // i. Let elementK be ! Get(O, kString).
            // ii. If IsStrictlyEqual(searchElement, elementK) is true, return 𝔽(k).
            if is_strictly_equal(agent, search_element, element(agent, o, k)) {
                return Ok(Value::Number(k as f64));
            }
        }
        // 12. Return -1𝔽.
        Ok(Value::Number(-1.0))
    }

    /// ### [23.2.3.18 %TypedArray%.prototype.join ( separator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.join)
    fn join(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.join")?;
        // 4. If separator is undefined, let sep be ",".
        // 5. Else, let sep be ? ToString(separator).
        let separator = arguments.get(0);
        let sep = if separator.is_undefined() {
            ",".into()
        } else {
            to_string(agent, separator)?.as_rc(agent)
        };
        // 6. Let R be the empty String.
        let mut r = String::new();
        // 8. Repeat, while k < len,
        for k in 0..data.array_length as u64 {
            // a. If k > 0, set R to the string-concatenation of R and sep.
            if k > 0 {
                r.push_str(&sep);
            }
            // b. Let element be ! Get(O, ! ToString(𝔽(k))).
            // c. If element is undefined, let next be the empty String;
            // otherwise, let next be ! ToString(element).
            let element = element(agent, o, k);
            if !element.is_undefined() {
                r.push_str(&to_string(agent, element)?.as_rc(agent));
            }
        }
        // 9. Return R.
        Ok(Value::from_string(agent, r))
    }

    /// ### [23.2.3.19 %TypedArray%.prototype.keys ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.keys)
    fn keys(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, _) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.keys")?;
        // 3. Return CreateArrayIterator(O, KEY).
        Ok(Value::Object(create_array_iterator(
            agent,
            o,
            CollectionIteratorKind::Key,
        )))
    }

    /// ### [23.2.3.20 %TypedArray%.prototype.lastIndexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.lastindexof)
    fn last_index_of(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.lastIndexOf")?;
        let len = data.array_length as u64;
        // 4. If len = 0, return -1𝔽.
        if len == 0 {
            return Ok(Value::Number(-1.0));
        }
        // 5. If fromIndex is present, let n be ? ToIntegerOrInfinity(fromIndex);
        // else let n be len - 1.
        let n = if arguments.len() > 1 {
            to_integer_or_infinity(agent, arguments.get(1))?
        } else {
            (len - 1) as f64
        };
        // 6. If n = -∞, return -1𝔽.
        // 7. If n ≥ 0, then
        //     a. Let k be min(n, len - 1).
        // 8. Else,
        //     a. Let k be len + n.
        let k = if n >= 0.0 {
            n.min((len - 1) as f64)
        } else {
            len as f64 + n
        };
        if k < 0.0 {
            return Ok(Value::Number(-1.0));
        }
        let search_element = arguments.get(0);
        // 9. Repeat, while k ≥ 0,
        for k in (0..=k as u64).rev() {
            if is_strictly_equal(agent, search_element, element(agent, o, k)) {
                return Ok(Value::Number(k as f64));
            }
        }
        // 10. Return -1𝔽.
        Ok(Value::Number(-1.0))
    }

    /// ### [23.2.3.21 get %TypedArray%.prototype.length](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.length)
    fn get_length(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (_, data) =
            validate_typed_array(agent, this_value, "get %TypedArray%.prototype.length")?;
        // 7. Return 𝔽(length).
        Ok(Value::from(data.array_length))
    }

    /// ### [23.2.3.22 %TypedArray%.prototype.map ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.map)
    fn map(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.map")?;
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let A be ? TypedArraySpeciesCreate(O, « 𝔽(len) »).
        let (a, _) =
            typed_array_species_create(agent, o, data.kind, &[Value::from(data.array_length)])?;
        // 7. Repeat, while k < len,
        for k in 0..data.array_length as u64 {
            // b. Let kValue be ! Get(O, Pk).
            let k_value = element(agent, o, k);
            // c. Let mappedValue be ? Call(callback, thisArg, « kValue, 𝔽(k), O »).
            let mapped_value = call_function(
                agent,
                callback,
                this_arg,
                &[k_value, Value::Number(k as f64), Value::Object(o)],
            )?;
            // d. Perform ? Set(A, Pk, mappedValue, true).
            set_element(agent, a, k, mapped_value)?;
        }
        // 8. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.2.3.23 %TypedArray%.prototype.reduce ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reduce)
    fn reduce(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.reduce")?;
        reduce_with(agent, o, arguments, 0..data.array_length as u64)
    }

    /// ### [23.2.3.24 %TypedArray%.prototype.reduceRight ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reduceright)
    fn reduce_right(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.reduceRight")?;
        reduce_with(agent, o, arguments, (0..data.array_length as u64).rev())
    }

    /// ### [23.2.3.25 %TypedArray%.prototype.reverse ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reverse)
    fn reverse(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.reverse")?;
        let len = data.array_length as u64;
        // 4. Let middle be floor(len / 2).
        // 5. Let lower be 0.
        // 6. Repeat, while lower ≠ middle,
        for lower in 0..len / 2 {
            // a. Let upper be len - lower - 1.
            let upper = len - lower - 1;
            // d. Let lowerValue be ! Get(O, lowerP).
            // e. Let upperValue be ! Get(O, upperP).
            let lower_value = element(agent, o, lower);
            let upper_value = element(agent, o, upper);
            // f. Perform ! Set(O, lowerP, upperValue, true).
            // g. Perform ! Set(O, upperP, lowerValue, true).
            set_element(agent, o, lower, upper_value)?;
            set_element(agent, o, upper, lower_value)?;
        }
        // 7. Return O.
        Ok(Value::Object(o))
    }

    /// ### [23.2.3.26 %TypedArray%.prototype.set ( source \[ , offset \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.set)
    fn set(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let source = arguments.get(0);
        // 1. Let target be the this value.
        // 2. Perform ? RequireInternalSlot(target, [[TypedArrayName]]).
        let (target, target_data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.set")?;
        // 4. Let targetOffset be ? ToIntegerOrInfinity(offset).
        let target_offset = to_integer_or_infinity(agent, arguments.get(1))?;
        // 5. If targetOffset < 0, throw a RangeError exception.
        if target_offset < 0.0 {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Offset must be a non-negative integer",
            ));
        }
        let out_of_bounds = || {
            agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Source is too large for the target offset",
            )
        };
        let target_length = target_data.array_length as f64;
        // 6. If source is an Object that has a [[TypedArrayName]] internal
        // slot, then
        if let Value::Object(source) = source
            && let Some(src_data) = typed_array_data(agent, source)
        {
            // a. Perform ? SetTypedArrayFromTypedArray(target, targetOffset, source).
            // 9. Let srcLength be TypedArrayLength(srcRecord).
            // 21. If targetOffset = +∞, throw a RangeError exception.
            // 22. If srcLength + targetOffset > targetLength, throw a
            // RangeError exception.
            if src_data.array_length as f64 + target_offset > target_length {
                return Err(out_of_bounds());
            }
            let target_offset = target_offset as usize;
            if src_data.kind == target_data.kind {
                // 26. Else if srcType is targetType, then
                //     a. NOTE: The transfer must be performed in a manner
                //     that preserves the bit-level encoding of the source data.
                copy_buffer_bytes(
                    agent,
                    src_data.viewed_array_buffer,
                    src_data.byte_offset,
                    target_data.viewed_array_buffer,
                    target_data.byte_offset + target_offset * target_data.kind.element_size(),
                    src_data.byte_length(),
                );
            } else {
                // 24. If IsSharedArrayBuffer(srcBuffer) and ... then
                //     a. Let srcBuffer be ? CloneArrayBuffer(srcBuffer,
                //     srcByteOffset, srcByteLength).
                // Reading every value first covers sources that share the
                // target's buffer.
                let values = elements(agent, source, src_data);
                for (k, value) in values.into_iter().enumerate() {
                    set_element(agent, target, (target_offset + k) as u64, value)?;
                }
            }
            // 8. Return undefined.
            return Ok(Value::Undefined);
        }
        // 7. Else,
        //     a. Perform ? SetTypedArrayFromArrayLike(target, targetOffset, source).
        // 6. Let src be ? ToObject(source).
        let src = to_object(agent, source)?;
        // 7. Let srcLength be ? LengthOfArrayLike(src).
        let src_length = length_of_array_like(agent, src)?;
        // 8. If targetOffset = +∞, throw a RangeError exception.
        // 9. If srcLength + targetOffset > targetLength, throw a RangeError
        // exception.
        if src_length as f64 + target_offset > target_length {
            return Err(out_of_bounds());
        }
        let target_offset = target_offset as u64;
        // 10. Let k be 0.
        // 11. Repeat, while k < srcLength,
        for k in 0..src_length {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let value be ? Get(src, Pk).
            let value = get(agent, src, PropertyKey::from_index(agent, k))?;
            // c. Let targetIndex be 𝔽(targetOffset + k).
            // d. Perform ? TypedArraySetElement(target, targetIndex, value).
            set_element(agent, target, target_offset + k, value)?;
        }
        Ok(Value::Undefined)
    }

    /// ### [23.2.3.27 %TypedArray%.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.slice)
    fn slice(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.slice")?;
        let src_array_length = data.array_length as u64;
        // 4-6. Let startIndex be the clamped relative start.
        let start_index = relative_index(agent, arguments.get(0), src_array_length, 0)?;
        // 7-9. Let endIndex be the clamped relative end.
        let end_index =
            relative_index(agent, arguments.get(1), src_array_length, src_array_length)?;
        // 10. Let countBytes be max(endIndex - startIndex, 0).
        let count = end_index.saturating_sub(start_index);
        // 11. Let A be ? TypedArraySpeciesCreate(O, « 𝔽(count) »).
        let (a, a_data) =
            typed_array_species_create(agent, o, data.kind, &[Value::Number(count as f64)])?;
        // 12. If count > 0, then
        if count > 0 {
            // e. If srcType is targetType, then
            if a_data.kind == data.kind {
                // i. NOTE: The transfer must be performed in a manner that
                // preserves the bit-level encoding of the source data.
                let element_size = data.kind.element_size();
                let count_bytes = (count as usize * element_size).min(a_data.byte_length());
                copy_buffer_bytes(
                    agent,
                    data.viewed_array_buffer,
                    data.byte_offset + start_index as usize * element_size,
                    a_data.viewed_array_buffer,
                    a_data.byte_offset,
                    count_bytes,
                );
            } else {
                // f. Else,
                //     i. Let n be 0.
                //     ii. Let k be startIndex.
                //     iii. Repeat, while k < endIndex,
                for (n, k) in (start_index..end_index).enumerate() {
                    // 2. Let kValue be ! Get(O, Pk).
                    // 3. Perform ! Set(A, ! ToString(𝔽(n)), kValue, true).
                    let k_value = element(agent, o, k);
                    set_element(agent, a, n as u64, k_value)?;
                }
            }
        }
        // 13. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.2.3.28 %TypedArray%.prototype.some ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.some)
    fn some(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.some")?;
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        for k in 0..data.array_length as u64 {
            let k_value = element(agent, o, k);
            let test_result = call_function(
                agent,
                callback,
                this_arg,
                &[k_value, Value::Number(k as f64), Value::Object(o)],
            )?;
            // d. If testResult is true, return true.
            if to_boolean(agent, test_result) {
                return Ok(Value::Boolean(true));
            }
        }
        // 7. Return false.
        Ok(Value::Boolean(false))
    }

    /// ### [23.2.3.29 %TypedArray%.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.sort)
    fn sort(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If comparator is not undefined and IsCallable(comparator) is
        // false, throw a TypeError exception.
        let comparator = optional_comparator(agent, arguments.get(0))?;
        // 2. Let obj be the this value.
        // 3. Let taRecord be ? ValidateTypedArray(obj, SEQ-CST).
        let (obj, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.sort")?;
        // 5. NOTE: The following closure performs a numeric comparison
        // rather than the string comparison used in 23.1.3.30.
        // 6. Let SortCompare be a new Abstract Closure ...
        // 7. Let sortedList be ? SortIndexedProperties(obj, len, SortCompare,
        // READ-THROUGH-HOLES).
        let sorted_list = sort_values(elements(agent, obj, data), |x, y| {
            compare_typed_array_elements(agent, x, y, comparator)
        })?;
        // 8. Let j be 0.
        // 9. Repeat, while j < len,
        for (j, value) in sorted_list.into_iter().enumerate() {
            // a. Perform ! Set(obj, ! ToString(𝔽(j)), sortedList[j], true).
            set_element(agent, obj, j as u64, value)?;
        }
        // 10. Return obj.
        Ok(Value::Object(obj))
    }

    /// ### [23.2.3.30 %TypedArray%.prototype.subarray ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.subarray)
    fn subarray(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.subarray")?;
        // 4. Let buffer be O.[[ViewedArrayBuffer]].
        // 6. Let srcLength be TypedArrayLength(srcRecord).
        let src_length = data.array_length as u64;
        // 7-9. Let startIndex be the clamped relative start.
        let start_index = relative_index(agent, arguments.get(0), src_length, 0)?;
        // 10. Let elementSize be TypedArrayElementSize(O).
        let element_size = data.kind.element_size();
        // 11. Let srcByteOffset be O.[[ByteOffset]].
        // 12. Let beginByteOffset be srcByteOffset + (startIndex × elementSize).
        let begin_byte_offset = data.byte_offset + start_index as usize * element_size;
        // 14. Else,
        //     a-c. Let endIndex be the clamped relative end.
        let end_index = relative_index(agent, arguments.get(1), src_length, src_length)?;
        //     d. Let newLength be max(endIndex - startIndex, 0).
        let new_length = end_index.saturating_sub(start_index);
        //     e. Let argumentsList be « buffer, 𝔽(beginByteOffset), 𝔽(newLength) ».
        // 15. Return ? TypedArraySpeciesCreate(O, argumentsList).
        let (result, _) = typed_array_species_create(
            agent,
            o,
            data.kind,
            &[
                Value::Object(data.viewed_array_buffer),
                Value::from(begin_byte_offset),
                Value::Number(new_length as f64),
            ],
        )?;
        Ok(Value::Object(result))
    }

    /// ### [23.2.3.31 %TypedArray%.prototype.toLocaleString ( \[ reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.tolocalestring)
    fn to_locale_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (array, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.toLocaleString")?;
        let to_locale_string = PropertyKey::from_str(agent, "toLocaleString");
        let mut r = String::new();
        for k in 0..data.array_length as u64 {
            if k > 0 {
                r.push(',');
            }
            let next_element = element(agent, array, k);
            if !next_element.is_nullish() {
                let s = invoke(agent, next_element, to_locale_string, &[])?;
                r.push_str(&to_string(agent, s)?.as_rc(agent));
            }
        }
        Ok(Value::from_string(agent, r))
    }

    /// ### [23.2.3.32 %TypedArray%.prototype.toReversed ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.toreversed)
    fn to_reversed(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, data) =
            validate_typed_array(agent, this_value, "%TypedArray%.prototype.toReversed")?;
        let length = data.array_length as u64;
        // 4. Let A be ? TypedArrayCreateSameType(O, length).
        let a = typed_array_create_same_type(agent, data.kind, length)?;
        // 5. Let k be 0.
        // 6. Repeat, while k < length,
        for k in 0..length {
            // a. Let from be ! ToString(𝔽(length - k - 1)).
            // b. Let Pk be ! ToString(𝔽(k)).
            // c. Let fromValue be ! Get(O, from).
            // d. Perform ! Set(A, Pk, fromValue, true).
            set_element(agent, a, k, element(agent, o, length - k - 1))?;
        }
        // 7. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.2.3.33 %TypedArray%.prototype.toSorted ( comparator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.tosorted)
    fn to_sorted(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If comparator is not undefined and IsCallable(comparator) is
        // false, throw a TypeError exception.
        let comparator = optional_comparator(agent, arguments.get(0))?;
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.toSorted")?;
        // 5. Let A be ? TypedArrayCreateSameType(O, len).
        let a = typed_array_create_same_type(agent, data.kind, data.array_length as u64)?;
        // 9. Let sortedList be ? SortIndexedProperties(O, len, SortCompare,
        // READ-THROUGH-HOLES).
        let sorted_list = sort_values(elements(agent, o, data), |x, y| {
            compare_typed_array_elements(agent, x, y, comparator)
        })?;
        // 10. Let j be 0.
        // 11. Repeat, while j < len,
        for (j, value) in sorted_list.into_iter().enumerate() {
            // a. Perform ! Set(A, ! ToString(𝔽(j)), sortedList[j], true).
            set_element(agent, a, j as u64, value)?;
        }
        // 12. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.2.3.35 %TypedArray%.prototype.values ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.values)
    fn values(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let (o, _) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.values")?;
        // 3. Return CreateArrayIterator(O, VALUE).
        Ok(Value::Object(create_array_iterator(
            agent,
            o,
            CollectionIteratorKind::Value,
        )))
    }

    /// ### [23.2.3.36 %TypedArray%.prototype.with ( index, value )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.with)
    fn with(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (o, data) = validate_typed_array(agent, this_value, "%TypedArray%.prototype.with")?;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = data.array_length as u64;
        // 4. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If relativeIndex ≥ 0, let actualIndex be relativeIndex.
        // 6. Else, let actualIndex be len + relativeIndex.
        let actual_index = if relative_index >= 0.0 {
            relative_index
        } else {
            len as f64 + relative_index
        };
        // 8. Else, let numericValue be ? ToNumber(value).
        let numeric_value = Value::Number(to_number(agent, arguments.get(1))?);
        // 9. If IsValidIntegerIndex(O, 𝔽(actualIndex)) is false, throw a
        // RangeError exception.
        let Some(actual_index) = is_valid_integer_index(agent, o, actual_index) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Index out of range",
            ));
        };
        // 10. Let A be ? TypedArrayCreateSameType(O, len).
        let a = typed_array_create_same_type(agent, data.kind, len)?;
        // 11. Let k be 0.
        // 12. Repeat, while k < len,
        for k in 0..len {
            // c. If k = actualIndex, let fromValue be numericValue.
            // d. Else, let fromValue be ! Get(O, Pk).
            let from_value = if k == actual_index as u64 {
                numeric_value
            } else {
                element(agent, o, k)
            };
            // e. Perform ! Set(A, Pk, fromValue, true).
            set_element(agent, a, k, from_value)?;
        }
        // 13. Return A.
        Ok(Value::Object(a))
    }

    /// ### [23.2.3.38 get %TypedArray%.prototype \[ %Symbol.toStringTag% \]](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype-%symbol.tostringtag%)
    fn get_to_string_tag(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. If O is not an Object, return undefined.
        // 3. If O does not have a [[TypedArrayName]] internal slot, return undefined.
        // 4. Let name be O.[[TypedArrayName]].
        // 5. Assert: name is a String.
        // 6. Return name.
        Ok(match this_value {
            Value::Object(o) => typed_array_data(agent, o)
                .map_or(Value::Undefined, |data| Value::from_str(agent, data.kind.name())),
            _ => Value::Undefined,
        })
    }

    fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.typed_array_prototype();
        let typed_array_prototype_values = intrinsics.typed_array_prototype_values();
        // 23.2.3.34 %TypedArray%.prototype.toString ( )
        // The initial value is %Array.prototype.toString%.
        let array_prototype_to_string = intrinsics.array_prototype_to_string();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(38)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<TypedArrayPrototypeAt>()
            .with_builtin_function_getter_property::<TypedArrayPrototypeGetBuffer>()
            .with_builtin_function_getter_property::<TypedArrayPrototypeGetByteLength>()
            .with_builtin_function_getter_property::<TypedArrayPrototypeGetByteOffset>()
            .with_constructor_property(intrinsics.typed_array())
            .with_builtin_function_property::<TypedArrayPrototypeCopyWithin>()
            .with_builtin_function_property::<TypedArrayPrototypeEntries>()
            .with_builtin_function_property::<TypedArrayPrototypeEvery>()
            .with_builtin_function_property::<TypedArrayPrototypeFill>()
            .with_builtin_function_property::<TypedArrayPrototypeFilter>()
            .with_builtin_function_property::<TypedArrayPrototypeFind>()
            .with_builtin_function_property::<TypedArrayPrototypeFindIndex>()
            .with_builtin_function_property::<TypedArrayPrototypeFindLast>()
            .with_builtin_function_property::<TypedArrayPrototypeFindLastIndex>()
            .with_builtin_function_property::<TypedArrayPrototypeForEach>()
            .with_builtin_function_property::<TypedArrayPrototypeIncludes>()
            .with_builtin_function_property::<TypedArrayPrototypeIndexOf>()
            .with_builtin_function_property::<TypedArrayPrototypeJoin>()
            .with_builtin_function_property::<TypedArrayPrototypeKeys>()
            .with_builtin_function_property::<TypedArrayPrototypeLastIndexOf>()
            .with_builtin_function_getter_property::<TypedArrayPrototypeGetLength>()
            .with_builtin_function_property::<TypedArrayPrototypeMap>()
            .with_builtin_function_property::<TypedArrayPrototypeReduce>()
            .with_builtin_function_property::<TypedArrayPrototypeReduceRight>()
            .with_builtin_function_property::<TypedArrayPrototypeReverse>()
            .with_builtin_function_property::<TypedArrayPrototypeSet>()
            .with_builtin_function_property::<TypedArrayPrototypeSlice>()
            .with_builtin_function_property::<TypedArrayPrototypeSome>()
            .with_builtin_function_property::<TypedArrayPrototypeSort>()
            .with_builtin_function_property::<TypedArrayPrototypeSubarray>()
            .with_builtin_function_property::<TypedArrayPrototypeToLocaleString>()
            .with_builtin_function_property::<TypedArrayPrototypeToReversed>()
            .with_builtin_function_property::<TypedArrayPrototypeToSorted>()
            .with_property(|property| {
                property
                    .with_key(PropertyKey::from_str(agent, "toString"))
                    .with_value(Value::Object(array_prototype_to_string))
                    .with_enumerable(false)
                    .build()
            })
            .with_builtin_intrinsic_function_property::<TypedArrayPrototypeValues>()
            .with_builtin_function_property::<TypedArrayPrototypeWith>()
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::ITERATOR))
                    .with_value(Value::Object(typed_array_prototype_values))
                    .with_enumerable(TypedArrayPrototypeValues::ENUMERABLE)
                    .with_configurable(TypedArrayPrototypeValues::CONFIGURABLE)
                    .build()
            })
            .with_builtin_function_getter_property::<TypedArrayPrototypeGetToStringTag>()
            .build();
    }
}

/// The first index `includes` and `indexOf` examine, or None when
/// `fromIndex` is +∞.
fn search_start(agent: &Agent, from_index: Value, len: u64) -> JsResult<Option<u64>> {
    // 5. Let n be ? ToIntegerOrInfinity(fromIndex).
    let n = to_integer_or_infinity(agent, from_index)?;
    // 7. If n = +∞, return false.
    if n == f64::INFINITY {
        return Ok(None);
    }
    // 9. If n ≥ 0, then
    //     a. Let k be n.
    // 10. Else,
    //     a. Let k be len + n.
    //     b. If k < 0, set k to 0.
    let k = if n >= 0.0 {
        n
    } else {
        (len as f64 + n).max(0.0)
    };
    Ok(Some(k.min(len as f64) as u64))
}

/// Steps shared by `reduce` and `reduceRight`; `indices` yields the visit
/// order.
fn reduce_with(
    agent: &Agent,
    o: Object,
    arguments: ArgumentsList,
    mut indices: impl Iterator<Item = u64>,
) -> JsResult<Value> {
    // 4. If IsCallable(callback) is false, throw a TypeError exception.
    let callback = require_callable(agent, arguments.get(0))?;
    // 7. If initialValue is present, then
    //     a. Set accumulator to initialValue.
    // 8. Else,
    //     a. Let Pk be ! ToString(𝔽(k)).
    //     b. Set accumulator to ! Get(O, Pk).
    //     c. Set k to k + 1.
    let mut accumulator = if arguments.len() > 1 {
        arguments.get(1)
    } else {
        // 5. If len = 0 and initialValue is not present, throw a TypeError
        // exception.
        let first = indices.next().ok_or_else(|| {
            agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Reduce of empty array with no initial value",
            )
        })?;
        element(agent, o, first)
    };
    // 9. Repeat, while k < len,
    for k in indices {
        // b. Let kValue be ! Get(O, Pk).
        let k_value = element(agent, o, k);
        // c. Set accumulator to ? Call(callback, undefined, « accumulator,
        // kValue, 𝔽(k), O »).
        accumulator = call_function(
            agent,
            callback,
            Value::Undefined,
            &[accumulator, k_value, Value::Number(k as f64), Value::Object(o)],
        )?;
    }
    // 10. Return accumulator.
    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn typed_array_is_abstract() {
        assert_eq!(
            run_to_string(
                "var TypedArray = Object.getPrototypeOf(Uint8Array);
                 var results = [];
                 try { TypedArray() } catch (e) { results.push(e.name) }
                 try { new TypedArray() } catch (e) { results.push(e.name) }
                 results.push(TypedArray.name, TypedArray[Symbol.species] === TypedArray);
                 results.join()"
            ),
            "TypeError,TypeError,TypedArray,true"
        );
    }

    #[test]
    fn from_and_of_use_the_receiver() {
        assert_eq!(
            run_to_string(
                "[Uint8Array.from([1, 2, 300]).join(), Int16Array.from('123', x => x * 2).join(),
                  Float32Array.from({ length: 2, 0: 0.5 }).join(), Int8Array.of(1, -1, 255).join(),
                  Uint8Array.from(new Set([3, 4])) instanceof Uint8Array].join(' ')"
            ),
            "1,2,44 2,4,6 0.5,NaN 1,-1,-1 true"
        );
        assert_eq!(
            run_to_string("try { Uint8Array.from.call({}, []) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn getters_require_a_typed_array() {
        assert_eq!(
            run_to_string(
                "var a = new Int32Array(new ArrayBuffer(16), 4, 2);
                 var proto = Object.getPrototypeOf(Int8Array.prototype);
                 var tag = Object.getOwnPropertyDescriptor(proto, Symbol.toStringTag).get;
                 [a.length, a.byteLength, a.byteOffset, a.buffer.byteLength, a[Symbol.toStringTag],
                  tag.call([]) === undefined, Object.prototype.toString.call(new Float64Array(1))
                 ].join()"
            ),
            "2,8,4,16,Int32Array,true,[object Float64Array]"
        );
        assert_eq!(
            run_to_string(
                "var getter = Object.getOwnPropertyDescriptor(
                     Object.getPrototypeOf(Int8Array.prototype), 'length').get;
                 try { getter.call([1, 2]) } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }

    #[test]
    fn element_access_converts_and_ignores_out_of_range() {
        assert_eq!(
            run_to_string(
                "var a = new Uint8Array(2); a[0] = 257; a[1] = '3'; a[5] = 9; a[-1] = 1;
                 [a.join(), String(a[5]), a.length, Object.keys(a).join(), 5 in a, '1' in a].join(' ')"
            ),
            "1,3 undefined 2 0,1 false true"
        );
    }

    #[test]
    fn iteration_and_searching() {
        assert_eq!(
            run_to_string(
                "var a = new Float64Array([1, NaN, 3, 1]);
                 [a.at(-1), a.includes(NaN), a.indexOf(NaN), a.indexOf(1, 1), a.lastIndexOf(1),
                  a.find(x => x > 1), a.findIndex(x => x > 5), a.findLast(x => x < 3),
                  a.findLastIndex(x => x === 3), [...a.keys()].join(''), [...a.entries()][2].join(':'),
                  a.every(x => x > 0), a.some(x => x > 2)].join()"
            ),
            "1,true,-1,3,3,3,-1,1,2,0123,2:3,false,true"
        );
    }

    #[test]
    fn higher_order_methods() {
        assert_eq!(
            run_to_string(
                "var a = new Int8Array([1, 2, 3, 4]); var seen = [];
                 a.forEach((x, i, arr) => seen.push(i + ':' + x + ':' + (arr === a)));
                 [seen.join(), a.map(x => x * 100).join(), a.filter(x => x % 2).join(),
                  a.reduce((acc, x) => acc + x), a.reduceRight((acc, x) => acc + x, ''),
                  a.filter(x => x > 1) instanceof Int8Array].join(' ')"
            ),
            "0:1:true,1:2:true,2:3:true,3:4:true 100,-56,44,-112 1,3 10 4321 true"
        );
        assert_eq!(
            run_to_string("try { new Int8Array(0).reduce((a, b) => a) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn in_place_mutation() {
        assert_eq!(
            run_to_string(
                "var a = new Uint16Array([1, 2, 3, 4, 5]);
                 var results = [a.copyWithin(0, 3).join()];
                 results.push(a.fill(7, 1, -1).join(), a.reverse().join());
                 results.push(new Int8Array(3).fill('2').join());
                 results.join(' ')"
            ),
            "4,5,3,4,5 4,7,7,7,5 5,7,7,7,4 2,2,2"
        );
    }

    #[test]
    fn set_copies_arrays_and_typed_arrays() {
        assert_eq!(
            run_to_string(
                "var a = new Uint8Array(6);
                 a.set([1, 2]); a.set(new Float32Array([3.7, 260]), 2); a.set(a.subarray(0, 2), 4);
                 a.join()"
            ),
            "1,2,3,4,1,2"
        );
        assert_eq!(
            run_to_string(
                "var a = new Uint8Array(2); var results = [];
                 try { a.set([1, 2, 3]) } catch (e) { results.push(e.name) }
                 try { a.set([1], -1) } catch (e) { results.push(e.name) }
                 try { a.set(new Uint8Array(2), 1) } catch (e) { results.push(e.name) }
                 results.join()"
            ),
            "RangeError,RangeError,RangeError"
        );
    }

    #[test]
    fn slice_copies_and_subarray_shares() {
        assert_eq!(
            run_to_string(
                "var a = new Int16Array([1, 2, 3, 4]);
                 var copy = a.slice(1, 3); var view = a.subarray(1, 3);
                 a[1] = 9;
                 [copy.join(), view.join(), view.byteOffset, view.buffer === a.buffer,
                  a.slice(-1).join(), a.subarray(3, 1).length].join(' ')"
            ),
            "2,3 9,3 2 true 4 0"
        );
    }

    #[test]
    fn sorts_numerically() {
        assert_eq!(
            run_to_string(
                "var a = new Float64Array([3, NaN, -0, 0, 10, -5, 1]);
                 a.sort();
                 [a.join(), Object.is(a[1], -0), Object.is(a[2], 0),
                  new Int8Array([1, 3, 2]).sort((x, y) => y - x).join(),
                  new Uint8Array([10, 9, 100]).toSorted().join()].join(' ')"
            ),
            "-5,0,0,1,3,10,NaN true true 3,2,1 9,10,100"
        );
        assert_eq!(
            run_to_string("try { new Uint8Array(1).sort(1) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn copying_methods_leave_the_receiver_alone() {
        assert_eq!(
            run_to_string(
                "var a = new Uint8Array([1, 2, 3]);
                 [a.toReversed().join(), a.with(-1, 9).join(), a.join(),
                  a.toReversed() instanceof Uint8Array].join(' ')"
            ),
            "3,2,1 1,2,9 1,2,3 true"
        );
        assert_eq!(
            run_to_string("try { new Uint8Array(1).with(1, 0) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn string_conversions_share_the_array_functions() {
        assert_eq!(
            run_to_string(
                "var proto = Object.getPrototypeOf(Int8Array.prototype);
                 [String(new Int8Array([1, -2])), new Float32Array([0.5]).toLocaleString(),
                  new Uint8Array([1, 2]).join('-'), proto.toString === Array.prototype.toString,
                  proto[Symbol.iterator] === proto.values, [...new Uint8Array([5, 6])].join()
                 ].join(' ')"
            ),
            "1,-2 0.5 1-2 true true 5,6"
        );
    }
}
