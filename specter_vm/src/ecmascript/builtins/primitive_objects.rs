// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean, Number, String, Symbol and BigInt objects keep their primitive
//! in an \[\[XData\]\] internal slot. String objects are also exotic.

use super::ordinary::{
    is_compatible_property_descriptor, ordinary_define_own_property, ordinary_get_own_property,
    ordinary_own_property_keys,
};
use crate::ecmascript::{
    execution::{Agent, JsResult},
    types::{
        HeapString, InternalMethods, Object, ObjectKind, Property, PropertyDescriptor,
        PropertyKey, Value,
    },
};

/// ### [10.4.3 String Exotic Objects](https://tc39.es/ecma262/#sec-string-exotic-objects)
///
/// A String object is an exotic object that encapsulates a String value and
/// exposes virtual integer-indexed data properties corresponding to the
/// individual code unit elements of the String value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringObject(pub(crate) Object);

impl StringObject {
    fn string_data(self, agent: &Agent) -> Option<HeapString> {
        match agent.object(self.0).kind {
            ObjectKind::PrimitiveWrapper(Value::String(string)) => Some(string),
            _ => None,
        }
    }
}

impl InternalMethods for StringObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.4.3.1 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-string-exotic-objects-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. Let desc be OrdinaryGetOwnProperty(S, P).
        // 2. If desc is not undefined, return desc.
        if let Some(desc) = ordinary_get_own_property(agent, self.0, property_key) {
            return Ok(Some(desc));
        }
        // 3. Return StringGetOwnProperty(S, P).
        Ok(string_get_own_property(agent, self, property_key))
    }

    /// ### [10.4.3.2 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-string-exotic-objects-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 1. Let stringDesc be StringGetOwnProperty(S, P).
        // 2. If stringDesc is not undefined, then
        if let Some(string_desc) = string_get_own_property(agent, self, property_key) {
            // a. Let extensible be S.[[Extensible]].
            let extensible = self.0.extensible_slot(agent);
            // b. Return IsCompatiblePropertyDescriptor(extensible, Desc, stringDesc).
            return Ok(is_compatible_property_descriptor(
                agent,
                extensible,
                property_descriptor,
                Some(string_desc),
            ));
        }
        // 3. Return ! OrdinaryDefineOwnProperty(S, P, Desc).
        ordinary_define_own_property(agent, self.0, property_key, property_descriptor)
    }

    /// ### [10.4.3.3 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-string-exotic-objects-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &Agent) -> JsResult<Vec<PropertyKey>> {
        // 1. Let keys be a new empty List.
        // 2. Let str be O.[[StringData]].
        // 3. Assert: str is a String.
        // 4. Let len be the length of str.
        let len = self
            .string_data(agent)
            .map_or(0, |string| string.utf16_len(agent));
        let storage_keys = ordinary_own_property_keys(agent, self.0);
        let mut keys = Vec::with_capacity(len + storage_keys.len());
        // 5. For each integer i such that 0 ≤ i < len, in ascending order, do
        //     a. Append ! ToString(𝔽(i)) to keys.
        keys.extend((0..len).map(|i| PropertyKey::from_index(agent, i as u64)));
        // 6. For each own property key P of O such that P is an array index
        // and ! ToIntegerOrInfinity(P) ≥ len, in ascending numeric index
        // order, do
        // 7. For each own property key P of O such that P is a String and P
        // is not an array index, in ascending chronological order of
        // property creation, do
        // 8. For each own property key P of O such that P is a Symbol, in
        // ascending chronological order of property creation, do
        keys.extend(storage_keys.into_iter().filter(|key| {
            key.as_array_index()
                .is_none_or(|index| index as usize >= len)
        }));
        // 9. Return keys.
        Ok(keys)
    }
}

/// ### [10.4.3.4 StringCreate ( value, prototype )](https://tc39.es/ecma262/#sec-stringcreate)
pub(crate) fn string_create(agent: &Agent, value: HeapString, prototype: Option<Object>) -> Object {
    // 1. Let S be MakeBasicObject(« [[Prototype]], [[Extensible]], [[StringData]] »).
    // 2. Set S.[[Prototype]] to prototype.
    // 3. Set S.[[StringData]] to value.
    // 4. Set S.[[GetOwnProperty]] as specified in 10.4.3.1.
    // 5. Set S.[[DefineOwnProperty]] as specified in 10.4.3.2.
    // 6. Set S.[[OwnPropertyKeys]] as specified in 10.4.3.3.
    let s = Object::create(
        agent,
        prototype,
        ObjectKind::PrimitiveWrapper(Value::String(value)),
    );
    // 7. Let length be the length of value.
    let length = value.utf16_len(agent);
    // 8. Perform ! DefinePropertyOrThrow(S, "length", PropertyDescriptor {
    // [[Value]]: 𝔽(length), [[Writable]]: false, [[Enumerable]]: false,
    // [[Configurable]]: false }).
    let key = PropertyKey::from_str(agent, "length");
    s.insert_property(
        agent,
        key,
        Property::data(Value::from(length), false, false, false),
    );
    // 9. Return S.
    s
}

/// ### [10.4.3.5 StringGetOwnProperty ( S, P )](https://tc39.es/ecma262/#sec-stringgetownproperty)
fn string_get_own_property(
    agent: &Agent,
    s: StringObject,
    property_key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. If P is not a String, return undefined.
    // 2. Let index be CanonicalNumericIndexString(P).
    // 3. If index is undefined, return undefined.
    // 4. If IsIntegralNumber(index) is false, return undefined.
    // 5. If index is -0𝔽 or index < -0𝔽, return undefined.
    // Every integral index below the length of a String is an array index.
    let index = property_key.as_array_index()? as usize;
    // 6. Let str be S.[[StringData]].
    // 7. Assert: str is a String.
    let string = s.string_data(agent)?;
    // 8. Let len be the length of str.
    // 9. If ℝ(index) ≥ len, return undefined.
    // 10. Let resultStr be the substring of str from ℝ(index) to ℝ(index) + 1.
    let unit = string.code_unit_at(agent, index)?;
    let result_str = HeapString::from_code_units(agent, &[unit]);
    // 11. Return the PropertyDescriptor { [[Value]]: resultStr, [[Writable]]:
    // false, [[Enumerable]]: true, [[Configurable]]: false }.
    Some(PropertyDescriptor {
        value: Some(Value::String(result_str)),
        writable: Some(false),
        enumerable: Some(true),
        configurable: Some(false),
        ..Default::default()
    })
}

/// The primitive held by a Boolean, Number, String, Symbol or BigInt object.
pub(crate) fn primitive_value(agent: &Agent, o: Object) -> Option<Value> {
    match agent.object(o).kind {
        ObjectKind::PrimitiveWrapper(value) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::get,
        execution::{DefaultHostHooks, agent::Options},
    };

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    #[test]
    fn code_units_are_read_only_properties() {
        let agent = agent();
        let value = HeapString::from_str(&agent, "ab");
        let s = string_create(&agent, value, None);
        assert_eq!(
            get(&agent, s, PropertyKey::Integer(1)),
            Ok(Value::from_str(&agent, "b"))
        );
        assert_eq!(get(&agent, s, PropertyKey::Integer(2)), Ok(Value::Undefined));
        let redefine = PropertyDescriptor::new_data_descriptor(Value::from_str(&agent, "x"));
        assert_eq!(
            s.internal_define_own_property(&agent, PropertyKey::Integer(0), redefine),
            Ok(false)
        );
    }

    #[test]
    fn own_keys_list_indices_first() {
        let agent = agent();
        let value = HeapString::from_str(&agent, "hi");
        let s = string_create(&agent, value, None);
        let extra = PropertyKey::from_str(&agent, "extra");
        s.insert_property(&agent, extra, Property::data(Value::Null, true, true, true));
        s.insert_property(
            &agent,
            PropertyKey::Integer(5),
            Property::data(Value::Null, true, true, true),
        );
        let keys = s.internal_own_property_keys(&agent).unwrap();
        let length = PropertyKey::from_str(&agent, "length");
        assert_eq!(
            keys,
            vec![
                PropertyKey::Integer(0),
                PropertyKey::Integer(1),
                PropertyKey::Integer(5),
                length,
                extra
            ]
        );
    }
}
