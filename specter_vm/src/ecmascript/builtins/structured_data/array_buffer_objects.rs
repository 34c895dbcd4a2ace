// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25.1 ArrayBuffer Objects](https://tc39.es/ecma262/#sec-arraybuffer-objects)
//!
//! ArrayBuffers are fixed-length and never detached.

mod array_buffer_constructor;
mod array_buffer_prototype;

pub(crate) use array_buffer_constructor::ArrayBufferConstructor;
pub(crate) use array_buffer_prototype::ArrayBufferPrototype;

use crate::ecmascript::{
    abstract_operations::type_conversion::{
        to_int8_number, to_int16_number, to_int32_number, to_uint8_clamp_number,
        to_uint8_number, to_uint16_number, to_uint32_number,
    },
    builtins::{ordinary::ordinary_create_from_constructor, typed_array::TypedArrayKind},
    execution::{Agent, JsResult, ProtoIntrinsics, agent::ExceptionType},
    types::{Object, ObjectKind, Value},
};

/// The internal slots of an ArrayBuffer.
#[derive(Debug, Default)]
pub(crate) struct ArrayBufferData {
    /// ### \[\[ArrayBufferData\]\]
    ///
    /// \[\[ArrayBufferByteLength\]\] is the length of the block.
    pub(crate) block: Box<[u8]>,
}

/// Byte length of `o`, if it is an ArrayBuffer.
pub(crate) fn array_buffer_byte_length(agent: &Agent, o: Object) -> Option<usize> {
    match &agent.object(o).kind {
        ObjectKind::ArrayBuffer(data) => Some(data.block.len()),
        _ => None,
    }
}

/// ### [6.2.9.1 CreateByteDataBlock ( size )](https://tc39.es/ecma262/#sec-createbytedatablock)
fn create_byte_data_block(agent: &Agent, size: u64) -> JsResult<Box<[u8]>> {
    // 1. If size > 2^53 - 1, throw a RangeError exception.
    // 2. Let db be a new Data Block value consisting of size bytes. If it is
    // impossible to create such a Data Block, throw a RangeError exception.
    let mut block = Vec::new();
    let size = usize::try_from(size).ok().filter(|size| block.try_reserve_exact(*size).is_ok());
    let Some(size) = size else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Array buffer allocation failed",
        ));
    };
    // 3. Set all of the bytes of db to 0.
    block.resize(size, 0);
    // 4. Return db.
    Ok(block.into_boxed_slice())
}

/// ### [25.1.3.1 AllocateArrayBuffer ( constructor, byteLength \[ , maxByteLength \] )](https://tc39.es/ecma262/#sec-allocatearraybuffer)
pub(crate) fn allocate_array_buffer(
    agent: &Agent,
    constructor: Object,
    byte_length: u64,
) -> JsResult<Object> {
    // 3. Let obj be ? OrdinaryCreateFromConstructor(constructor,
    // "%ArrayBuffer.prototype%", slots).
    let obj = ordinary_create_from_constructor(
        agent,
        constructor,
        ProtoIntrinsics::ArrayBuffer,
        ObjectKind::ArrayBuffer(ArrayBufferData::default()),
    )?;
    // 4. Let block be ? CreateByteDataBlock(byteLength).
    let block = create_byte_data_block(agent, byte_length)?;
    // 5. Set obj.[[ArrayBufferData]] to block.
    // 6. Set obj.[[ArrayBufferByteLength]] to byteLength.
    if let ObjectKind::ArrayBuffer(data) = &mut agent.object_mut(obj).kind {
        data.block = block;
    }
    // 9. Return obj.
    Ok(obj)
}

/// Copy `count` bytes between two buffers, which may be the same one.
pub(crate) fn copy_buffer_bytes(
    agent: &Agent,
    source: Object,
    source_index: usize,
    target: Object,
    target_index: usize,
    count: usize,
) {
    let bytes = match &agent.object(source).kind {
        ObjectKind::ArrayBuffer(data) => data
            .block
            .get(source_index..source_index + count)
            .map(<[u8]>::to_vec),
        _ => None,
    };
    if let Some(bytes) = bytes
        && let ObjectKind::ArrayBuffer(data) = &mut agent.object_mut(target).kind
        && let Some(target) = data.block.get_mut(target_index..target_index + count)
    {
        target.copy_from_slice(&bytes);
    }
}

/// ### [25.1.3.12 RawBytesToNumeric ( type, rawBytes, isLittleEndian )](https://tc39.es/ecma262/#sec-rawbytestonumeric)
fn raw_bytes_to_numeric(kind: TypedArrayKind, raw: &[u8]) -> f64 {
    // Element sizes are checked by the caller.
    let mut bytes = [0u8; 8];
    bytes[..raw.len()].copy_from_slice(raw);
    let [b0, b1, b2, b3, ..] = bytes;
    match kind {
        TypedArrayKind::Int8 => f64::from(b0 as i8),
        TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => f64::from(b0),
        TypedArrayKind::Int16 => f64::from(i16::from_le_bytes([b0, b1])),
        TypedArrayKind::Uint16 => f64::from(u16::from_le_bytes([b0, b1])),
        TypedArrayKind::Int32 => f64::from(i32::from_le_bytes([b0, b1, b2, b3])),
        TypedArrayKind::Uint32 => f64::from(u32::from_le_bytes([b0, b1, b2, b3])),
        TypedArrayKind::Float32 => f64::from(f32::from_le_bytes([b0, b1, b2, b3])),
        TypedArrayKind::Float64 => f64::from_le_bytes(bytes),
    }
}

/// ### [25.1.3.17 NumericToRawBytes ( type, value, isLittleEndian )](https://tc39.es/ecma262/#sec-numerictorawbytes)
fn numeric_to_raw_bytes(kind: TypedArrayKind, value: f64) -> ([u8; 8], usize) {
    let mut bytes = [0u8; 8];
    let size = kind.element_size();
    match kind {
        TypedArrayKind::Int8 => bytes[0] = to_int8_number(value) as u8,
        TypedArrayKind::Uint8 => bytes[0] = to_uint8_number(value),
        TypedArrayKind::Uint8Clamped => bytes[0] = to_uint8_clamp_number(value),
        TypedArrayKind::Int16 => bytes[..2].copy_from_slice(&to_int16_number(value).to_le_bytes()),
        TypedArrayKind::Uint16 => {
            bytes[..2].copy_from_slice(&to_uint16_number(value).to_le_bytes())
        }
        TypedArrayKind::Int32 => bytes[..4].copy_from_slice(&to_int32_number(value).to_le_bytes()),
        TypedArrayKind::Uint32 => {
            bytes[..4].copy_from_slice(&to_uint32_number(value).to_le_bytes())
        }
        // Rounds to nearest, ties to even.
        TypedArrayKind::Float32 => bytes[..4].copy_from_slice(&(value as f32).to_le_bytes()),
        TypedArrayKind::Float64 => bytes = value.to_le_bytes(),
    }
    (bytes, size)
}

/// ### [25.1.3.15 GetValueFromBuffer ( arrayBuffer, byteIndex, type, isTypedArray, order \[ , isLittleEndian \] )](https://tc39.es/ecma262/#sec-getvaluefrombuffer)
///
/// Elements are stored little-endian. Reads outside the block produce
/// undefined.
pub(crate) fn get_value_from_buffer(
    agent: &Agent,
    array_buffer: Object,
    byte_index: usize,
    kind: TypedArrayKind,
) -> Value {
    // 1. Assert: IsDetachedBuffer(arrayBuffer) is false.
    // 2. Assert: There are sufficient bytes in arrayBuffer starting at
    // byteIndex to represent a value of type.
    // 3. Let block be arrayBuffer.[[ArrayBufferData]].
    // 4. Let elementSize be the Element Size value specified in Table 71
    // for Element Type type.
    let element_size = kind.element_size();
    let object = agent.object(array_buffer);
    let ObjectKind::ArrayBuffer(data) = &object.kind else {
        return Value::Undefined;
    };
    // 6. Else,
    //     a. Let rawValue be a List whose elements are bytes from block at
    //     indices in the interval from byteIndex (inclusive) to byteIndex +
    //     elementSize (exclusive).
    let Some(raw_value) = data.block.get(byte_index..byte_index + element_size) else {
        return Value::Undefined;
    };
    // 7. Assert: The number of elements in rawValue is elementSize.
    // 8. If isLittleEndian is not present, set isLittleEndian to the value
    // of the [[LittleEndian]] field of the surrounding agent's Agent Record.
    // 9. Return RawBytesToNumeric(type, rawValue, isLittleEndian).
    Value::Number(raw_bytes_to_numeric(kind, raw_value))
}

/// ### [25.1.3.18 SetValueInBuffer ( arrayBuffer, byteIndex, type, value, isTypedArray, order \[ , isLittleEndian \] )](https://tc39.es/ecma262/#sec-setvalueinbuffer)
pub(crate) fn set_value_in_buffer(
    agent: &Agent,
    array_buffer: Object,
    byte_index: usize,
    kind: TypedArrayKind,
    value: f64,
) {
    // 6. Let elementSize be the Element Size value specified in Table 71
    // for Element Type type.
    // 8. Let rawBytes be NumericToRawBytes(type, value, isLittleEndian).
    let (raw_bytes, element_size) = numeric_to_raw_bytes(kind, value);
    // 10. Else,
    //     a. Store the individual bytes of rawBytes into block, starting at
    //     block[byteIndex].
    if let ObjectKind::ArrayBuffer(data) = &mut agent.object_mut(array_buffer).kind
        && let Some(target) = data.block.get_mut(byte_index..byte_index + element_size)
    {
        target.copy_from_slice(&raw_bytes[..element_size]);
    }
    // 11. Return UNUSED.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_conversions_wrap_and_clamp() {
        let encode = |kind, value| {
            let (bytes, size) = numeric_to_raw_bytes(kind, value);
            raw_bytes_to_numeric(kind, &bytes[..size])
        };
        assert_eq!(encode(TypedArrayKind::Int8, 200.0), -56.0);
        assert_eq!(encode(TypedArrayKind::Uint8, -1.0), 255.0);
        assert_eq!(encode(TypedArrayKind::Uint8Clamped, 300.0), 255.0);
        assert_eq!(encode(TypedArrayKind::Uint8Clamped, 2.5), 2.0);
        assert_eq!(encode(TypedArrayKind::Uint8Clamped, 3.5), 4.0);
        assert_eq!(encode(TypedArrayKind::Int16, 32768.0), -32768.0);
        assert_eq!(encode(TypedArrayKind::Uint32, -1.0), 4294967295.0);
        assert_eq!(encode(TypedArrayKind::Int32, f64::NAN), 0.0);
        assert_eq!(encode(TypedArrayKind::Float32, 0.1), f64::from(0.1f32));
        assert!(encode(TypedArrayKind::Float64, f64::NAN).is_nan());
    }

    #[test]
    fn elements_are_little_endian() {
        let (bytes, size) = numeric_to_raw_bytes(TypedArrayKind::Uint16, 0x0102 as f64);
        assert_eq!(&bytes[..size], &[0x02, 0x01]);
        let (bytes, size) = numeric_to_raw_bytes(TypedArrayKind::Int32, -2.0);
        assert_eq!(&bytes[..size], &[0xfe, 0xff, 0xff, 0xff]);
    }
}
