// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.5 TypedArray Exotic Objects](https://tc39.es/ecma262/#sec-typedarray-exotic-objects)
//!
//! A TypedArray is an exotic object that performs special handling of
//! integer index property keys. TypedArrays here always view a fixed-length
//! ArrayBuffer, which cannot be detached or resized.

use super::{
    ordinary::{
        ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
        ordinary_has_property, ordinary_own_property_keys, ordinary_set,
    },
    structured_data::array_buffer_objects::{get_value_from_buffer, set_value_in_buffer},
};
use crate::ecmascript::{
    abstract_operations::type_conversion::to_number,
    execution::{Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics},
    types::{
        InternalMethods, Object, ObjectKind, PropertyDescriptor, PropertyKey, Value,
        canonical_numeric_index_string,
    },
};

/// ### [Table 71: The TypedArray Constructors](https://tc39.es/ecma262/#table-the-typedarray-constructors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypedArrayKind {
    pub(crate) const ALL: [TypedArrayKind; 9] = [
        TypedArrayKind::Int8,
        TypedArrayKind::Uint8,
        TypedArrayKind::Uint8Clamped,
        TypedArrayKind::Int16,
        TypedArrayKind::Uint16,
        TypedArrayKind::Int32,
        TypedArrayKind::Uint32,
        TypedArrayKind::Float32,
        TypedArrayKind::Float64,
    ];

    /// The \[\[TypedArrayName\]\] of the kind.
    pub(crate) const fn name(self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }

    /// Element Size in bytes.
    pub(crate) const fn element_size(self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::Float64 => 8,
        }
    }

    pub(crate) const fn proto_intrinsics(self) -> ProtoIntrinsics {
        match self {
            TypedArrayKind::Int8 => ProtoIntrinsics::Int8Array,
            TypedArrayKind::Uint8 => ProtoIntrinsics::Uint8Array,
            TypedArrayKind::Uint8Clamped => ProtoIntrinsics::Uint8ClampedArray,
            TypedArrayKind::Int16 => ProtoIntrinsics::Int16Array,
            TypedArrayKind::Uint16 => ProtoIntrinsics::Uint16Array,
            TypedArrayKind::Int32 => ProtoIntrinsics::Int32Array,
            TypedArrayKind::Uint32 => ProtoIntrinsics::Uint32Array,
            TypedArrayKind::Float32 => ProtoIntrinsics::Float32Array,
            TypedArrayKind::Float64 => ProtoIntrinsics::Float64Array,
        }
    }

    pub(crate) const fn constructor_intrinsic(self) -> IntrinsicObjectIndex {
        match self {
            TypedArrayKind::Int8 => IntrinsicObjectIndex::Int8Array,
            TypedArrayKind::Uint8 => IntrinsicObjectIndex::Uint8Array,
            TypedArrayKind::Uint8Clamped => IntrinsicObjectIndex::Uint8ClampedArray,
            TypedArrayKind::Int16 => IntrinsicObjectIndex::Int16Array,
            TypedArrayKind::Uint16 => IntrinsicObjectIndex::Uint16Array,
            TypedArrayKind::Int32 => IntrinsicObjectIndex::Int32Array,
            TypedArrayKind::Uint32 => IntrinsicObjectIndex::Uint32Array,
            TypedArrayKind::Float32 => IntrinsicObjectIndex::Float32Array,
            TypedArrayKind::Float64 => IntrinsicObjectIndex::Float64Array,
        }
    }
}

/// The internal slots of a TypedArray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypedArrayData {
    /// ### \[\[ViewedArrayBuffer\]\]
    pub(crate) viewed_array_buffer: Object,
    /// ### \[\[TypedArrayName\]\] and \[\[ContentType\]\]
    pub(crate) kind: TypedArrayKind,
    /// ### \[\[ByteOffset\]\]
    pub(crate) byte_offset: usize,
    /// ### \[\[ArrayLength\]\]
    pub(crate) array_length: usize,
}

impl TypedArrayData {
    pub(crate) fn byte_length(&self) -> usize {
        self.array_length * self.kind.element_size()
    }
}

/// The internal slots of `o`, if it is a TypedArray.
pub(crate) fn typed_array_data(agent: &Agent, o: Object) -> Option<TypedArrayData> {
    match agent.object(o).kind {
        ObjectKind::TypedArray(data) => Some(data),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypedArrayObject(pub(crate) Object);

/// The numeric index a property key denotes, per CanonicalNumericIndexString.
fn numeric_index(agent: &Agent, property_key: PropertyKey) -> Option<f64> {
    match property_key {
        PropertyKey::Integer(index) => Some(f64::from(index)),
        PropertyKey::String(string) => {
            canonical_numeric_index_string(agent.heap().get_string(string))
        }
        PropertyKey::Symbol(_) => None,
    }
}

impl InternalMethods for TypedArrayObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.4.5.1 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-typedarray-getownproperty)
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. If P is a String, then
        //     a. Let numericIndex be CanonicalNumericIndexString(P).
        //     b. If numericIndex is not undefined, then
        if let Some(numeric_index) = numeric_index(agent, property_key) {
            // i. Let value be TypedArrayGetElement(O, numericIndex).
            // ii. If value is undefined, return undefined.
            let Some(value) = typed_array_get_element(agent, self.0, numeric_index) else {
                return Ok(None);
            };
            // iii. Return the PropertyDescriptor { [[Value]]: value,
            // [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]:
            // true }.
            return Ok(Some(PropertyDescriptor {
                value: Some(value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            }));
        }
        // 2. Return OrdinaryGetOwnProperty(O, P).
        Ok(ordinary_get_own_property(agent, self.0, property_key))
    }

    /// ### [10.4.5.2 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-typedarray-hasproperty)
    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. If P is a String, then
        //     a. Let numericIndex be CanonicalNumericIndexString(P).
        //     b. If numericIndex is not undefined, return
        //     IsValidIntegerIndex(O, numericIndex).
        if let Some(numeric_index) = numeric_index(agent, property_key) {
            return Ok(is_valid_integer_index(agent, self.0, numeric_index).is_some());
        }
        // 2. Return ? OrdinaryHasProperty(O, P).
        ordinary_has_property(agent, self.0, property_key)
    }

    /// ### [10.4.5.3 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-typedarray-defineownproperty)
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 1. If P is a String, then
        //     a. Let numericIndex be CanonicalNumericIndexString(P).
        //     b. If numericIndex is not undefined, then
        let Some(numeric_index) = numeric_index(agent, property_key) else {
            // 2. Return ! OrdinaryDefineOwnProperty(O, P, Desc).
            return ordinary_define_own_property(agent, self.0, property_key, property_descriptor);
        };
        // i. If IsValidIntegerIndex(O, numericIndex) is false, return false.
        if is_valid_integer_index(agent, self.0, numeric_index).is_none() {
            return Ok(false);
        }
        // ii. If Desc has a [[Configurable]] field and
        // Desc.[[Configurable]] is false, return false.
        // iii. If Desc has an [[Enumerable]] field and Desc.[[Enumerable]]
        // is false, return false.
        // iv. If IsAccessorDescriptor(Desc) is true, return false.
        // v. If Desc has a [[Writable]] field and Desc.[[Writable]] is
        // false, return false.
        if property_descriptor.configurable == Some(false)
            || property_descriptor.enumerable == Some(false)
            || property_descriptor.is_accessor_descriptor()
            || property_descriptor.writable == Some(false)
        {
            return Ok(false);
        }
        // vi. If Desc has a [[Value]] field, perform ?
        // TypedArraySetElement(O, numericIndex, Desc.[[Value]]).
        if let Some(value) = property_descriptor.value {
            typed_array_set_element(agent, self.0, numeric_index, value)?;
        }
        // vii. Return true.
        Ok(true)
    }

    /// ### [10.4.5.4 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-typedarray-get)
    fn internal_get(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1. If P is a String, then
        //     a. Let numericIndex be CanonicalNumericIndexString(P).
        //     b. If numericIndex is not undefined, then
        //         i. Return TypedArrayGetElement(O, numericIndex).
        if let Some(numeric_index) = numeric_index(agent, property_key) {
            return Ok(typed_array_get_element(agent, self.0, numeric_index)
                .unwrap_or(Value::Undefined));
        }
        // 2. Return ? OrdinaryGet(O, P, Receiver).
        ordinary_get(agent, self.0, property_key, receiver)
    }

    /// ### [10.4.5.5 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-typedarray-set)
    fn internal_set(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        // 1. If P is a String, then
        //     a. Let numericIndex be CanonicalNumericIndexString(P).
        //     b. If numericIndex is not undefined, then
        if let Some(numeric_index) = numeric_index(agent, property_key) {
            // i. If SameValue(O, Receiver) is true, then
            if receiver == Value::Object(self.0) {
                // 1. Perform ? TypedArraySetElement(O, numericIndex, V).
                typed_array_set_element(agent, self.0, numeric_index, value)?;
                // 2. Return true.
                return Ok(true);
            }
            // ii. If IsValidIntegerIndex(O, numericIndex) is false, return
            // true.
            if is_valid_integer_index(agent, self.0, numeric_index).is_none() {
                return Ok(true);
            }
        }
        // 2. Return ? OrdinarySet(O, P, V, Receiver).
        ordinary_set(agent, self.0, property_key, value, receiver)
    }

    /// ### [10.4.5.6 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-typedarray-delete)
    fn internal_delete(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. If P is a String, then
        //     a. Let numericIndex be CanonicalNumericIndexString(P).
        //     b. If numericIndex is not undefined, then
        //         i. If IsValidIntegerIndex(O, numericIndex) is false, return
        //         true; else return false.
        if let Some(numeric_index) = numeric_index(agent, property_key) {
            return Ok(is_valid_integer_index(agent, self.0, numeric_index).is_none());
        }
        // 2. Return ! OrdinaryDelete(O, P).
        ordinary_delete(agent, self.0, property_key)
    }

    /// ### [10.4.5.7 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-typedarray-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &Agent) -> JsResult<Vec<PropertyKey>> {
        // 1. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, SEQ-CST).
        // 2. Let keys be a new empty List.
        let length = typed_array_data(agent, self.0).map_or(0, |data| data.array_length);
        let storage_keys = ordinary_own_property_keys(agent, self.0);
        let mut keys = Vec::with_capacity(length + storage_keys.len());
        // 3. If IsTypedArrayOutOfBounds(taRecord) is false, then
        //     a. Let length be TypedArrayLength(taRecord).
        //     b. For each integer i such that 0 ≤ i < length, in ascending
        //     order, do
        //         i. Append ! ToString(𝔽(i)) to keys.
        keys.extend((0..length).map(|i| PropertyKey::from_index(agent, i as u64)));
        // 4. For each own property key P of O such that P is a String and P
        // is not an integer index, in ascending chronological order of
        // property creation, do
        // 5. For each own property key P of O such that P is a Symbol, in
        // ascending chronological order of property creation, do
        keys.extend(storage_keys);
        // 6. Return keys.
        Ok(keys)
    }
}

/// ### [10.4.5.14 IsValidIntegerIndex ( O, index )](https://tc39.es/ecma262/#sec-isvalidintegerindex)
///
/// Returns the index as a `usize` when it is valid.
pub(crate) fn is_valid_integer_index(agent: &Agent, o: Object, index: f64) -> Option<usize> {
    // 1. If IsDetachedBuffer(O.[[ViewedArrayBuffer]]) is true, return false.
    // 2. If IsIntegralNumber(index) is false, return false.
    if !index.is_finite() || index.trunc() != index {
        return None;
    }
    // 3. If index is -0𝔽, return false.
    if index == 0.0 && index.is_sign_negative() {
        return None;
    }
    // 4. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, UNORDERED).
    // 5. NOTE: Bounds checking is not a synchronizing operation when O's
    // backing buffer is a growable SharedArrayBuffer.
    // 6. If IsTypedArrayOutOfBounds(taRecord) is true, return false.
    // 7. Let length be TypedArrayLength(taRecord).
    let length = typed_array_data(agent, o)?.array_length;
    // 8. If ℝ(index) < 0 or ℝ(index) ≥ length, return false.
    if index < 0.0 || index >= length as f64 {
        return None;
    }
    // 9. Return true.
    Some(index as usize)
}

/// ### [10.4.5.15 TypedArrayGetElement ( O, index )](https://tc39.es/ecma262/#sec-typedarraygetelement)
pub(crate) fn typed_array_get_element(agent: &Agent, o: Object, index: f64) -> Option<Value> {
    // 1. If IsValidIntegerIndex(O, index) is false, return undefined.
    let index = is_valid_integer_index(agent, o, index)?;
    let data = typed_array_data(agent, o)?;
    // 2. Let offset be O.[[ByteOffset]].
    // 3. Let elementSize be TypedArrayElementSize(O).
    // 4. Let byteIndexInBuffer be (ℝ(index) × elementSize) + offset.
    let byte_index = index * data.kind.element_size() + data.byte_offset;
    // 5. Let elementType be TypedArrayElementType(O).
    // 6. Return GetValueFromBuffer(O.[[ViewedArrayBuffer]],
    // byteIndexInBuffer, elementType, true, UNORDERED).
    Some(get_value_from_buffer(
        agent,
        data.viewed_array_buffer,
        byte_index,
        data.kind,
    ))
}

/// ### [10.4.5.16 TypedArraySetElement ( O, index, value )](https://tc39.es/ecma262/#sec-typedarraysetelement)
pub(crate) fn typed_array_set_element(
    agent: &Agent,
    o: Object,
    index: f64,
    value: Value,
) -> JsResult<()> {
    // 1. If O.[[ContentType]] is BIGINT, let numValue be ? ToBigInt(value).
    // 2. Otherwise, let numValue be ? ToNumber(value).
    let num_value = to_number(agent, value)?;
    // 3. If IsValidIntegerIndex(O, index) is true, then
    if let Some(index) = is_valid_integer_index(agent, o, index)
        && let Some(data) = typed_array_data(agent, o)
    {
        // a. Let offset be O.[[ByteOffset]].
        // b. Let elementSize be TypedArrayElementSize(O).
        // c. Let byteIndexInBuffer be (ℝ(index) × elementSize) + offset.
        let byte_index = index * data.kind.element_size() + data.byte_offset;
        // d. Let elementType be TypedArrayElementType(O).
        // e. Perform SetValueInBuffer(O.[[ViewedArrayBuffer]],
        // byteIndexInBuffer, elementType, numValue, true, UNORDERED).
        set_value_in_buffer(
            agent,
            data.viewed_array_buffer,
            byte_index,
            data.kind,
            num_value,
        );
    }
    // 4. Return UNUSED.
    Ok(())
}
