// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
//!
//! An Array is an exotic object that gives special treatment to array index
//! property keys. A property whose property name is an array index is also
//! called an element. Every Array has a non-configurable "length" property
//! whose value is always a non-negative integral Number whose mathematical
//! value is strictly less than 2^32.

use super::ordinary::ordinary_define_own_property;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{construct, get, get_function_realm},
        testing_and_comparison::{is_array, is_constructor},
        type_conversion::{to_number, to_uint32},
    },
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{
        InternalMethods, Object, ObjectKind, Property, PropertyDescriptor, PropertyKey,
        PropertyValue, Symbol, Value,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArrayObject(pub(crate) Object);

impl InternalMethods for ArrayObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.4.2.1 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        let a = self.0;
        // 1. If P is "length", then
        if property_key.as_str_eq(agent, "length") {
            // a. Return ? ArraySetLength(A, Desc).
            return array_set_length(agent, a, property_descriptor);
        }
        // 2. Else if P is an array index, then
        let Some(index) = property_key.as_array_index() else {
            // 3. Return ! OrdinaryDefineOwnProperty(A, P, Desc).
            return ordinary_define_own_property(agent, a, property_key, property_descriptor);
        };
        // a. Let lengthDesc be OrdinaryGetOwnProperty(A, "length").
        // b. Assert: IsDataDescriptor(lengthDesc) is true.
        // c. Assert: lengthDesc.[[Configurable]] is false.
        // d. Let length be lengthDesc.[[Value]].
        // e. Assert: length is a non-negative integral Number.
        let (length, length_writable) = array_length_slot(agent, a);
        // f. Let index be ! ToUint32(P).
        // g. If index ≥ length and lengthDesc.[[Writable]] is false, return
        // false.
        if index >= length && !length_writable {
            return Ok(false);
        }
        // h. Let succeeded be ! OrdinaryDefineOwnProperty(A, P, Desc).
        let succeeded = ordinary_define_own_property(agent, a, property_key, property_descriptor)?;
        // i. If succeeded is false, return false.
        if !succeeded {
            return Ok(false);
        }
        // j. If index ≥ length, then
        if index >= length {
            // i. Set lengthDesc.[[Value]] to index + 1𝔽.
            // ii. Set succeeded to ! OrdinaryDefineOwnProperty(A, "length",
            // lengthDesc).
            // iii. Assert: succeeded is true.
            write_array_length(agent, a, index + 1, length_writable);
        }
        // k. Return true.
        Ok(true)
    }
}

/// The value and writability of the "length" property of an Array.
fn array_length_slot(agent: &Agent, a: Object) -> (u32, bool) {
    let key = PropertyKey::from_str(agent, "length");
    match a.property_slot(agent, key).map(|property| property.value) {
        Some(PropertyValue::Data {
            value: Value::Number(length),
            writable,
        }) => (length as u32, writable),
        _ => (0, true),
    }
}

fn write_array_length(agent: &Agent, a: Object, length: u32, writable: bool) {
    let key = PropertyKey::from_str(agent, "length");
    a.insert_property(
        agent,
        key,
        Property::data(Value::from(length), writable, false, false),
    );
}

/// ### [10.4.2.2 ArrayCreate ( length \[ , proto \] )](https://tc39.es/ecma262/#sec-arraycreate)
///
/// The caller checks `length` against 2^32 - 1 and throws the RangeError.
pub(crate) fn array_create(agent: &Agent, length: u64, proto: Option<Object>) -> Object {
    // 1. If length > 2^32 - 1, throw a RangeError exception.
    let length = u32::try_from(length).unwrap_or(u32::MAX);
    // 2. If proto is not present, set proto to %Array.prototype%.
    let proto = proto.unwrap_or_else(|| agent.intrinsics().array_prototype());
    // 3. Let A be MakeBasicObject(« [[Prototype]], [[Extensible]] »).
    // 4. Set A.[[Prototype]] to proto.
    // 5. Set A.[[DefineOwnProperty]] as specified in 10.4.2.1.
    let a = Object::create(agent, Some(proto), ObjectKind::Array);
    // 6. Perform ! OrdinaryDefineOwnProperty(A, "length",
    // PropertyDescriptor { [[Value]]: 𝔽(length), [[Writable]]: true,
    // [[Enumerable]]: false, [[Configurable]]: false }).
    write_array_length(agent, a, length, true);
    // 7. Return A.
    a
}

/// ArrayCreate with the RangeError check of step 1.
pub(crate) fn array_create_checked(
    agent: &Agent,
    length: u64,
    proto: Option<Object>,
) -> JsResult<Object> {
    if length > u64::from(u32::MAX) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    Ok(array_create(agent, length, proto))
}

/// ### [10.4.2.3 ArraySpeciesCreate ( originalArray, length )](https://tc39.es/ecma262/#sec-arrayspeciescreate)
pub(crate) fn array_species_create(
    agent: &Agent,
    original_array: Object,
    length: u64,
) -> JsResult<Object> {
    // 1. Let isArray be ? IsArray(originalArray).
    // 2. If isArray is false, return ? ArrayCreate(length).
    if !is_array(agent, Value::Object(original_array))? {
        return array_create_checked(agent, length, None);
    }
    // 3. Let C be ? Get(originalArray, "constructor").
    let mut c = get(
        agent,
        original_array,
        PropertyKey::from_str(agent, "constructor"),
    )?;
    // 4. If IsConstructor(C) is true, then
    if let Value::Object(constructor) = c
        && is_constructor(agent, c)
    {
        // a. Let thisRealm be the current Realm Record.
        let this_realm = agent.current_realm();
        // b. Let realmC be ? GetFunctionRealm(C).
        let realm_c = get_function_realm(agent, constructor)?;
        // c. If thisRealm and realmC are not the same Realm Record, then
        // i. If SameValue(C, realmC.[[Intrinsics]].[[%Array%]]) is true, set
        // C to undefined.
        if this_realm != realm_c && constructor == realm_c.intrinsics(agent).array() {
            c = Value::Undefined;
        }
    }
    // 5. If C is an Object, then
    if let Value::Object(constructor) = c {
        // a. Set C to ? Get(C, @@species).
        c = get(agent, constructor, PropertyKey::Symbol(Symbol::SPECIES))?;
        // b. If C is null, set C to undefined.
        if c.is_null() {
            c = Value::Undefined;
        }
    }
    // 6. If C is undefined, return ? ArrayCreate(length).
    if c.is_undefined() {
        return array_create_checked(agent, length, None);
    }
    // 7. If IsConstructor(C) is false, throw a TypeError exception.
    let Value::Object(c) = c else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Array species is not a constructor",
        ));
    };
    if !is_constructor(agent, Value::Object(c)) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Array species is not a constructor",
        ));
    }
    // 8. Return ? Construct(C, « 𝔽(length) »).
    construct(agent, c, &[Value::Number(length as f64)], None)
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
pub(crate) fn array_set_length(
    agent: &Agent,
    a: Object,
    desc: PropertyDescriptor,
) -> JsResult<bool> {
    let length_key = PropertyKey::from_str(agent, "length");
    // 1. If Desc does not have a [[Value]] field, then
    let Some(desc_value) = desc.value else {
        // a. Return ! OrdinaryDefineOwnProperty(A, "length", Desc).
        return ordinary_define_own_property(agent, a, length_key, desc);
    };
    // 2. Let newLenDesc be a copy of Desc.
    let mut new_len_desc = desc;
    // 3. Let newLen be ? ToUint32(Desc.[[Value]]).
    let new_len = to_uint32(agent, desc_value)?;
    // 4. Let numberLen be ? ToNumber(Desc.[[Value]]).
    let number_len = to_number(agent, desc_value)?;
    // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError
    // exception.
    if f64::from(new_len) != number_len {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    // 6. Set newLenDesc.[[Value]] to newLen.
    new_len_desc.value = Some(Value::from(new_len));
    // 7. Let oldLenDesc be OrdinaryGetOwnProperty(A, "length").
    // 8. Assert: IsDataDescriptor(oldLenDesc) is true.
    // 9. Assert: oldLenDesc.[[Configurable]] is false.
    // 10. Let oldLen be oldLenDesc.[[Value]].
    let (old_len, old_len_writable) = array_length_slot(agent, a);
    // 11. If newLen ≥ oldLen, then
    if new_len >= old_len {
        // a. Return ! OrdinaryDefineOwnProperty(A, "length", newLenDesc).
        return ordinary_define_own_property(agent, a, length_key, new_len_desc);
    }
    // 12. If oldLenDesc.[[Writable]] is false, return false.
    if !old_len_writable {
        return Ok(false);
    }
    // 13. If newLenDesc does not have a [[Writable]] field or
    // newLenDesc.[[Writable]] is true, then
    let new_writable = if new_len_desc.writable != Some(false) {
        // a. Let newWritable be true.
        true
    } else {
        // 14. Else,
        // a. NOTE: Setting the [[Writable]] attribute to false is deferred in
        // case any elements cannot be deleted.
        // b. Let newWritable be false.
        // c. Set newLenDesc.[[Writable]] to true.
        new_len_desc.writable = Some(true);
        false
    };
    // 15. Let succeeded be ! OrdinaryDefineOwnProperty(A, "length",
    // newLenDesc).
    let succeeded = ordinary_define_own_property(agent, a, length_key, new_len_desc)?;
    // 16. If succeeded is false, return false.
    if !succeeded {
        return Ok(false);
    }
    // 17. For each own property key P of A such that P is an array index and
    // ! ToUint32(P) ≥ newLen, in descending numeric index order, do
    let mut indices: Vec<u32> = a
        .storage_keys(agent)
        .into_iter()
        .filter_map(PropertyKey::as_array_index)
        .filter(|index| *index >= new_len)
        .collect();
    indices.sort_unstable_by(|x, y| y.cmp(x));
    for index in indices {
        // a. Let deleteSucceeded be ! A.[[Delete]](P).
        let delete_succeeded = a.internal_delete(agent, PropertyKey::Integer(index))?;
        // b. If deleteSucceeded is false, then
        if !delete_succeeded {
            // i. Set newLenDesc.[[Value]] to ! ToUint32(P) + 1𝔽.
            // ii. If newWritable is false, set newLenDesc.[[Writable]] to
            // false.
            // iii. Perform ! OrdinaryDefineOwnProperty(A, "length",
            // newLenDesc).
            write_array_length(agent, a, index + 1, new_writable);
            // iv. Return false.
            return Ok(false);
        }
    }
    // 18. If newWritable is false, then
    if !new_writable {
        // a. Set succeeded to ! OrdinaryDefineOwnProperty(A, "length",
        // PropertyDescriptor { [[Writable]]: false }).
        // b. Assert: succeeded is true.
        let (length, _) = array_length_slot(agent, a);
        write_array_length(agent, a, length, false);
    }
    // 19. Return true.
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::{create_data_property_or_throw, get, set},
        builtins::ordinary::ordinary_get_own_property,
        execution::{DefaultHostHooks, agent::Options},
    };

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    fn array_length(agent: &Agent, a: Object) -> u32 {
        array_length_slot(agent, a).0
    }

    fn array_length_is_writable(agent: &Agent, a: Object) -> bool {
        ordinary_get_own_property(agent, a, PropertyKey::from_str(agent, "length"))
            .is_some_and(|desc| desc.writable == Some(true))
    }

    #[test]
    fn writing_past_the_end_grows_length() {
        let agent = agent();
        let array = array_create(&agent, 0, None);
        create_data_property_or_throw(&agent, array, PropertyKey::Integer(4), Value::Null)
            .unwrap();
        assert_eq!(array_length(&agent, array), 5);
    }

    #[test]
    fn shrinking_length_deletes_elements() {
        let agent = agent();
        let array = array_create(&agent, 0, None);
        for i in 0..4 {
            create_data_property_or_throw(&agent, array, PropertyKey::Integer(i), Value::from(i))
                .unwrap();
        }
        let length = PropertyKey::from_str(&agent, "length");
        set(&agent, array, length, Value::from(1u32), true).unwrap();
        assert_eq!(array_length(&agent, array), 1);
        assert_eq!(
            get(&agent, array, PropertyKey::Integer(2)).unwrap(),
            Value::Undefined
        );
        assert_eq!(
            get(&agent, array, PropertyKey::Integer(0)).unwrap(),
            Value::from(0u32)
        );
    }

    #[test]
    fn invalid_lengths_throw_range_errors() {
        let agent = agent();
        let array = array_create(&agent, 0, None);
        let length = PropertyKey::from_str(&agent, "length");
        assert!(set(&agent, array, length, Value::Number(1.5), true).is_err());
        assert!(set(&agent, array, length, Value::Number(-1.0), true).is_err());
        assert!(array_create_checked(&agent, u64::from(u32::MAX) + 1, None).is_err());
    }

    #[test]
    fn non_writable_length_blocks_growth() {
        let agent = agent();
        let array = array_create(&agent, 2, None);
        let length = PropertyKey::from_str(&agent, "length");
        let desc = PropertyDescriptor {
            writable: Some(false),
            ..Default::default()
        };
        assert!(array.internal_define_own_property(&agent, length, desc).unwrap());
        assert!(!array_length_is_writable(&agent, array));
        assert!(
            !array
                .internal_define_own_property(
                    &agent,
                    PropertyKey::Integer(5),
                    PropertyDescriptor::new_data_descriptor(Value::Null)
                )
                .unwrap()
        );
    }
}
