// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.2.4 Abstract Operations for TypedArray Objects](https://tc39.es/ecma262/#sec-abstract-operations-for-typedarray-objects)
//! and the initialization steps of
//! [23.2.5.1 TypedArray ( ...args )](https://tc39.es/ecma262/#sec-typedarray).

use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{get_iterator_from_method, iterator_to_list},
        operations_on_objects::{
            construct, get, get_method, length_of_array_like, species_constructor,
        },
        type_conversion::to_index,
    },
    builtins::{
        ordinary::get_prototype_from_constructor,
        structured_data::array_buffer_objects::{
            allocate_array_buffer, array_buffer_byte_length, copy_buffer_bytes,
        },
        typed_array::{
            TypedArrayData, TypedArrayKind, typed_array_data, typed_array_get_element,
            typed_array_set_element,
        },
    },
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

/// ### [23.2.4.4 ValidateTypedArray ( O, order )](https://tc39.es/ecma262/#sec-validatetypedarray)
pub(crate) fn validate_typed_array(
    agent: &Agent,
    o: Value,
    method: &str,
) -> JsResult<(Object, TypedArrayData)> {
    // 1. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
    // 2. Assert: O has a [[ViewedArrayBuffer]] internal slot.
    // 3. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, order).
    // 4. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError
    // exception.
    if let Value::Object(object) = o
        && let Some(data) = typed_array_data(agent, object)
    {
        // 5. Return taRecord.
        return Ok((object, data));
    }
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        format!("{method} called on a value that is not a TypedArray"),
    ))
}

/// The element at `index`, which must be in bounds.
pub(crate) fn element(agent: &Agent, o: Object, index: u64) -> Value {
    typed_array_get_element(agent, o, index as f64).unwrap_or(Value::Undefined)
}

/// Set(O, index, value, true) for a TypedArray `o`.
pub(crate) fn set_element(agent: &Agent, o: Object, index: u64, value: Value) -> JsResult<()> {
    typed_array_set_element(agent, o, index as f64, value)
}

fn create_typed_array_object(
    agent: &Agent,
    proto: Object,
    kind: TypedArrayKind,
    buffer: Object,
    byte_offset: usize,
    array_length: usize,
) -> Object {
    Object::create(
        agent,
        Some(proto),
        ObjectKind::TypedArray(TypedArrayData {
            viewed_array_buffer: buffer,
            kind,
            byte_offset,
            array_length,
        }),
    )
}

/// ### [23.2.5.1.6 AllocateTypedArrayBuffer ( O, length )](https://tc39.es/ecma262/#sec-allocatetypedarraybuffer)
///
/// Returns a fresh %ArrayBuffer% large enough for `length` elements.
fn allocate_typed_array_buffer(
    agent: &Agent,
    kind: TypedArrayKind,
    length: u64,
) -> JsResult<Object> {
    // 3. Let elementSize be TypedArrayElementSize(O).
    // 4. Let byteLength be elementSize × length.
    let byte_length = length
        .checked_mul(kind.element_size() as u64)
        .ok_or_else(|| {
            agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Invalid typed array length",
            )
        })?;
    // 5. Let data be ? AllocateArrayBuffer(%ArrayBuffer%, byteLength).
    allocate_array_buffer(agent, agent.intrinsics().array_buffer(), byte_length)
}

/// ### [23.2.5.1.1 AllocateTypedArray ( constructorName, newTarget, defaultProto \[ , length \] )](https://tc39.es/ecma262/#sec-allocatetypedarray)
/// with a length.
pub(crate) fn allocate_typed_array(
    agent: &Agent,
    kind: TypedArrayKind,
    new_target: Object,
    length: u64,
) -> JsResult<Object> {
    // 1. Let proto be ? GetPrototypeFromConstructor(newTarget, defaultProto).
    let proto = get_prototype_from_constructor(agent, new_target, kind.proto_intrinsics())?;
    // 2. Let obj be TypedArrayCreate(proto).
    // 7. If length is present, then
    //     a. Perform ? AllocateTypedArrayBuffer(obj, length).
    let buffer = allocate_typed_array_buffer(agent, kind, length)?;
    // 8. Return obj.
    Ok(create_typed_array_object(
        agent,
        proto,
        kind,
        buffer,
        0,
        length as usize,
    ))
}

/// Steps 4.a-4.d of
/// [23.2.5.1 TypedArray ( ...args )](https://tc39.es/ecma262/#sec-typedarray):
/// construct a TypedArray from an object argument.
pub(crate) fn initialize_typed_array_from_object(
    agent: &Agent,
    kind: TypedArrayKind,
    new_target: Object,
    first_argument: Object,
    byte_offset: Value,
    length: Value,
) -> JsResult<Object> {
    // a. Let O be ? AllocateTypedArray(constructorName, NewTarget, proto).
    let proto = get_prototype_from_constructor(agent, new_target, kind.proto_intrinsics())?;
    // b. If firstArgument has a [[TypedArrayName]] internal slot, then
    if let Some(src_data) = typed_array_data(agent, first_argument) {
        // i. Perform ? InitializeTypedArrayFromTypedArray(O, firstArgument).
        return initialize_typed_array_from_typed_array(
            agent,
            proto,
            kind,
            first_argument,
            src_data,
        );
    }
    // c. Else if firstArgument has an [[ArrayBufferData]] internal slot, then
    if let Some(buffer_byte_length) = array_buffer_byte_length(agent, first_argument) {
        // i. If numberOfArgs > 1, let byteOffset be args[1]; else let
        // byteOffset be undefined.
        // ii. If numberOfArgs > 2, let length be args[2]; else let length be
        // undefined.
        // iii. Perform ? InitializeTypedArrayFromArrayBuffer(O,
        // firstArgument, byteOffset, length).
        return initialize_typed_array_from_array_buffer(
            agent,
            proto,
            kind,
            first_argument,
            buffer_byte_length,
            byte_offset,
            length,
        );
    }
    // d. Else,
    //     i. Assert: firstArgument is an Object and firstArgument does not
    //     have either a [[TypedArrayName]] or an [[ArrayBufferData]]
    //     internal slot.
    //     ii. Let usingIterator be ? GetMethod(firstArgument, %Symbol.iterator%).
    let using_iterator = get_method(
        agent,
        Value::Object(first_argument),
        PropertyKey::Symbol(Symbol::ITERATOR),
    )?;
    // iii. If usingIterator is not undefined, then
    if let Some(using_iterator) = using_iterator {
        // 1. Let values be ? IteratorToList(? GetIteratorFromMethod(firstArgument, usingIterator)).
        let mut iterator_record =
            get_iterator_from_method(agent, Value::Object(first_argument), using_iterator)?;
        let values = iterator_to_list(agent, &mut iterator_record)?;
        // 2. Perform ? InitializeTypedArrayFromList(O, values).
        return initialize_typed_array_from_list(agent, proto, kind, &values);
    }
    // iv. Else,
    //     1. NOTE: firstArgument is not an Iterable so assume it is already
    //     an array-like object.
    //     2. Perform ? InitializeTypedArrayFromArrayLike(O, firstArgument).
    initialize_typed_array_from_array_like(agent, proto, kind, first_argument)
}

/// ### [23.2.5.1.2 InitializeTypedArrayFromTypedArray ( O, srcArray )](https://tc39.es/ecma262/#sec-initializetypedarrayfromtypedarray)
fn initialize_typed_array_from_typed_array(
    agent: &Agent,
    proto: Object,
    kind: TypedArrayKind,
    src_array: Object,
    src_data: TypedArrayData,
) -> JsResult<Object> {
    // 6. Let elementLength be TypedArrayLength(srcRecord).
    let element_length = src_data.array_length;
    // 9. Let byteLength be elementSize × elementLength.
    // 10. If elementType is srcType, then
    //     a. Let data be ? CloneArrayBuffer(srcData, srcByteOffset, byteLength).
    // 11. Else,
    //     a. Let data be ? AllocateArrayBuffer(%ArrayBuffer%, byteLength).
    let data = allocate_typed_array_buffer(agent, kind, element_length as u64)?;
    let o = create_typed_array_object(agent, proto, kind, data, 0, element_length);
    if src_data.kind == kind {
        copy_buffer_bytes(
            agent,
            src_data.viewed_array_buffer,
            src_data.byte_offset,
            data,
            0,
            src_data.byte_length(),
        );
    } else {
        // c. If srcArray.[[ContentType]] is not O.[[ContentType]], throw a
        // TypeError exception.
        // d-g. Copy each element through its Number value.
        for k in 0..element_length as u64 {
            let value = element(agent, src_array, k);
            set_element(agent, o, k, value)?;
        }
    }
    Ok(o)
}

/// ### [23.2.5.1.3 InitializeTypedArrayFromArrayBuffer ( O, buffer, byteOffset, length )](https://tc39.es/ecma262/#sec-initializetypedarrayfromarraybuffer)
fn initialize_typed_array_from_array_buffer(
    agent: &Agent,
    proto: Object,
    kind: TypedArrayKind,
    buffer: Object,
    buffer_byte_length: usize,
    byte_offset: Value,
    length: Value,
) -> JsResult<Object> {
    let range_error = |message: &'static str| {
        agent.throw_exception_with_static_message(ExceptionType::RangeError, message)
    };
    // 1. Let elementSize be TypedArrayElementSize(O).
    let element_size = kind.element_size() as u64;
    // 2. Let offset be ? ToIndex(byteOffset).
    let offset = to_index(agent, byte_offset)?;
    // 3. If offset modulo elementSize ≠ 0, throw a RangeError exception.
    if offset % element_size != 0 {
        return Err(range_error(
            "Start offset of a typed array must be a multiple of its element size",
        ));
    }
    // 5. If length is not undefined, then
    //     a. Let newLength be ? ToIndex(length).
    let new_length = if length.is_undefined() {
        None
    } else {
        Some(to_index(agent, length)?)
    };
    // 6. If IsDetachedBuffer(buffer) is true, throw a TypeError exception.
    // 7. Let bufferByteLength be ArrayBufferByteLength(buffer, SEQ-CST).
    let buffer_byte_length = buffer_byte_length as u64;
    let new_byte_length = match new_length {
        // 9. Else if length is undefined, then
        None => {
            // a. If bufferByteLength modulo elementSize ≠ 0, throw a
            // RangeError exception.
            if buffer_byte_length % element_size != 0 {
                return Err(range_error(
                    "Byte length of a typed array buffer must be a multiple of its element size",
                ));
            }
            // b. Let newByteLength be bufferByteLength - offset.
            // c. If newByteLength < 0, throw a RangeError exception.
            buffer_byte_length
                .checked_sub(offset)
                .ok_or_else(|| range_error("Start offset is outside the bounds of the buffer"))?
        }
        // 10. Else,
        Some(new_length) => {
            // a. Let newByteLength be newLength × elementSize.
            let new_byte_length = new_length.saturating_mul(element_size);
            // b. If offset + newByteLength > bufferByteLength, throw a
            // RangeError exception.
            if offset.saturating_add(new_byte_length) > buffer_byte_length {
                return Err(range_error("Invalid typed array length"));
            }
            new_byte_length
        }
    };
    // 11. Set O.[[ByteLength]] to newByteLength.
    // 12. Set O.[[ArrayLength]] to newByteLength / elementSize.
    // 13. Set O.[[ViewedArrayBuffer]] to buffer.
    // 14. Set O.[[ByteOffset]] to offset.
    Ok(create_typed_array_object(
        agent,
        proto,
        kind,
        buffer,
        offset as usize,
        (new_byte_length / element_size) as usize,
    ))
}

/// ### [23.2.5.1.4 InitializeTypedArrayFromList ( O, values )](https://tc39.es/ecma262/#sec-initializetypedarrayfromlist)
fn initialize_typed_array_from_list(
    agent: &Agent,
    proto: Object,
    kind: TypedArrayKind,
    values: &[Value],
) -> JsResult<Object> {
    // 1. Let len be the number of elements in values.
    let len = values.len();
    // 2. Perform ? AllocateTypedArrayBuffer(O, len).
    let buffer = allocate_typed_array_buffer(agent, kind, len as u64)?;
    let o = create_typed_array_object(agent, proto, kind, buffer, 0, len);
    // 3. Let k be 0.
    // 4. Repeat, while k < len,
    for (k, k_value) in values.iter().enumerate() {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. Let kValue be the first element of values.
        // c. Remove the first element from values.
        // d. Perform ? Set(O, Pk, kValue, true).
        set_element(agent, o, k as u64, *k_value)?;
        // e. Set k to k + 1.
    }
    Ok(o)
}

/// ### [23.2.5.1.5 InitializeTypedArrayFromArrayLike ( O, arrayLike )](https://tc39.es/ecma262/#sec-initializetypedarrayfromarraylike)
fn initialize_typed_array_from_array_like(
    agent: &Agent,
    proto: Object,
    kind: TypedArrayKind,
    array_like: Object,
) -> JsResult<Object> {
    // 1. Let len be ? LengthOfArrayLike(arrayLike).
    let len = length_of_array_like(agent, array_like)?;
    // 2. Perform ? AllocateTypedArrayBuffer(O, len).
    let buffer = allocate_typed_array_buffer(agent, kind, len)?;
    let o = create_typed_array_object(agent, proto, kind, buffer, 0, len as usize);
    // 3. Let k be 0.
    // 4. Repeat, while k < len,
    for k in 0..len {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. Let kValue be ? Get(arrayLike, Pk).
        let k_value = get(agent, array_like, PropertyKey::from_index(agent, k))?;
        // c. Perform ? Set(O, Pk, kValue, true).
        set_element(agent, o, k, k_value)?;
        // d. Set k to k + 1.
    }
    Ok(o)
}

/// ### [23.2.4.2 TypedArrayCreateFromConstructor ( constructor, argumentList )](https://tc39.es/ecma262/#sec-typedarraycreatefromconstructor)
pub(crate) fn typed_array_create_from_constructor(
    agent: &Agent,
    constructor: Object,
    argument_list: &[Value],
) -> JsResult<(Object, TypedArrayData)> {
    // 1. Let newTypedArray be ? Construct(constructor, argumentList).
    let new_typed_array = construct(agent, constructor, argument_list, None)?;
    // 2. Let taRecord be ? ValidateTypedArray(newTypedArray, SEQ-CST).
    let (new_typed_array, data) =
        validate_typed_array(agent, Value::Object(new_typed_array), "TypedArray constructor")?;
    // 3. If the number of elements in argumentList is 1 and argumentList[0]
    // is a Number, then
    if let [Value::Number(length)] = argument_list {
        // b. Let length be TypedArrayLength(taRecord).
        // c. If length < ℝ(argumentList[0]), throw a TypeError exception.
        if (data.array_length as f64) < *length {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Derived TypedArray constructor created an array which was too small",
            ));
        }
    }
    // 4. Return newTypedArray.
    Ok((new_typed_array, data))
}

/// ### [23.2.4.1 TypedArraySpeciesCreate ( exemplar, argumentList )](https://tc39.es/ecma262/#sec-typedarray-species-create)
pub(crate) fn typed_array_species_create(
    agent: &Agent,
    exemplar: Object,
    exemplar_kind: TypedArrayKind,
    argument_list: &[Value],
) -> JsResult<(Object, TypedArrayData)> {
    // 1. Let defaultConstructor be the intrinsic object associated with the
    // constructor name exemplar.[[TypedArrayName]] in Table 71.
    let default_constructor = agent
        .intrinsics()
        .get(exemplar_kind.constructor_intrinsic());
    // 2. Let constructor be ? SpeciesConstructor(exemplar, defaultConstructor).
    let constructor = species_constructor(agent, exemplar, default_constructor)?;
    // 3. Let result be ? TypedArrayCreateFromConstructor(constructor, argumentList).
    // 4. If result.[[ContentType]] is not exemplar.[[ContentType]], throw a
    // TypeError exception.
    // 5. Return result.
    typed_array_create_from_constructor(agent, constructor, argument_list)
}

/// ### [23.2.4.3 TypedArrayCreateSameType ( exemplar, length )](https://tc39.es/ecma262/#sec-typedarray-create-same-type)
pub(crate) fn typed_array_create_same_type(
    agent: &Agent,
    exemplar_kind: TypedArrayKind,
    length: u64,
) -> JsResult<Object> {
    // 1. Let constructor be the intrinsic object associated with the
    // constructor name exemplar.[[TypedArrayName]] in Table 71.
    let constructor = agent.intrinsics().get(exemplar_kind.constructor_intrinsic());
    // 2. Let result be ? TypedArrayCreateFromConstructor(constructor, « 𝔽(length) »).
    // 3. Return result.
    allocate_typed_array(agent, exemplar_kind, constructor, length)
}
