// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.1 Ordinary Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots)

use crate::ecmascript::{
    abstract_operations::operations_on_objects::{call_function, get, get_function_realm},
    execution::{Agent, JsResult, ProtoIntrinsics, agent::ExceptionType},
    types::{
        ExoticKind, InternalMethods, Object, ObjectKind, Property, PropertyDescriptor,
        PropertyKey, Value,
    },
};

/// An object using only the ordinary internal methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrdinaryObject(pub(crate) Object);

impl InternalMethods for OrdinaryObject {
    fn get_backing_object(self) -> Object {
        self.0
    }
}

/// ### [10.4.7 Immutable Prototype Exotic Objects](https://tc39.es/ecma262/#sec-immutable-prototype-exotic-objects)
///
/// An immutable prototype exotic object is an exotic object that has a
/// \[\[Prototype\]\] internal slot that will not change once it is
/// initialized. %Object.prototype% is the only one defined by ECMA-262.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImmutablePrototypeObject(pub(crate) Object);

impl InternalMethods for ImmutablePrototypeObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.4.7.1 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-immutable-prototype-exotic-objects-setprototypeof-v)
    fn internal_set_prototype_of(self, agent: &Agent, prototype: Option<Object>) -> JsResult<bool> {
        // 1. Return ? SetImmutablePrototype(O, V).
        set_immutable_prototype(agent, self.0, prototype)
    }
}

/// ### [10.4.7.2 SetImmutablePrototype ( O, V )](https://tc39.es/ecma262/#sec-set-immutable-prototype)
pub(crate) fn set_immutable_prototype(
    agent: &Agent,
    o: Object,
    v: Option<Object>,
) -> JsResult<bool> {
    // 1. Let current be ? O.[[GetPrototypeOf]]().
    let current = ordinary_get_prototype_of(agent, o);
    // 2. If SameValue(V, current) is true, return true.
    // 3. Return false.
    Ok(v == current)
}

/// ### [10.1.1.1 OrdinaryGetPrototypeOf ( O )](https://tc39.es/ecma262/#sec-ordinarygetprototypeof)
pub(crate) fn ordinary_get_prototype_of(agent: &Agent, o: Object) -> Option<Object> {
    // 1. Return O.[[Prototype]].
    o.prototype_slot(agent)
}

/// ### [10.1.2.1 OrdinarySetPrototypeOf ( O, V )](https://tc39.es/ecma262/#sec-ordinarysetprototypeof)
pub(crate) fn ordinary_set_prototype_of(agent: &Agent, o: Object, v: Option<Object>) -> bool {
    // 1. Let current be O.[[Prototype]].
    let current = o.prototype_slot(agent);
    // 2. If SameValue(V, current) is true, return true.
    if v == current {
        return true;
    }
    // 3. Let extensible be O.[[Extensible]].
    // 4. If extensible is false, return false.
    if !o.extensible_slot(agent) {
        return false;
    }
    // 5. Let p be V.
    let mut p = v;
    // 6. Let done be false.
    // 7. Repeat, while done is false,
    while let Some(proto) = p {
        // a. If p is null, then
        //     i. Set done to true.
        // b. Else if SameValue(p, O) is true, then
        if proto == o {
            // i. Return false.
            return false;
        }
        // c. Else,
        // i. If p.[[GetPrototypeOf]] is not the ordinary object internal
        // method defined in 10.1.1, set done to true.
        if proto.exotic_kind(agent) == ExoticKind::Proxy {
            break;
        }
        // ii. Else, set p to p.[[Prototype]].
        p = proto.prototype_slot(agent);
    }
    // 8. Set O.[[Prototype]] to V.
    o.set_prototype_slot(agent, v);
    // 9. Return true.
    true
}

/// ### [10.1.3.1 OrdinaryIsExtensible ( O )](https://tc39.es/ecma262/#sec-ordinaryisextensible)
pub(crate) fn ordinary_is_extensible(agent: &Agent, o: Object) -> bool {
    // 1. Return O.[[Extensible]].
    o.extensible_slot(agent)
}

/// ### [10.1.4.1 OrdinaryPreventExtensions ( O )](https://tc39.es/ecma262/#sec-ordinarypreventextensions)
pub(crate) fn ordinary_prevent_extensions(agent: &Agent, o: Object) -> bool {
    // 1. Set O.[[Extensible]] to false.
    o.set_extensible_slot(agent, false);
    // 2. Return true.
    true
}

/// ### [10.1.5.1 OrdinaryGetOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinarygetownproperty)
pub(crate) fn ordinary_get_own_property(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. If O does not have an own property with key P, return undefined.
    // 2. Let D be a newly created Property Descriptor with no fields.
    // 3. Let X be O's own property whose key is P.
    // 4. If X is a data property, then
    //     a. Set D.[[Value]] to the value of X's [[Value]] attribute.
    //     b. Set D.[[Writable]] to the value of X's [[Writable]] attribute.
    // 5. Else,
    //     a. Assert: X is an accessor property.
    //     b. Set D.[[Get]] to the value of X's [[Get]] attribute.
    //     c. Set D.[[Set]] to the value of X's [[Set]] attribute.
    // 6. Set D.[[Enumerable]] to the value of X's [[Enumerable]] attribute.
    // 7. Set D.[[Configurable]] to the value of X's [[Configurable]] attribute.
    // 8. Return D.
    o.property_slot(agent, property_key)
        .map(Property::to_descriptor)
}

/// ### [10.1.6.1 OrdinaryDefineOwnProperty ( O, P, Desc )](https://tc39.es/ecma262/#sec-ordinarydefineownproperty)
pub(crate) fn ordinary_define_own_property(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    // 1. Let current be ? O.[[GetOwnProperty]](P).
    let current = o.internal_get_own_property(agent, property_key)?;
    // 2. Let extensible be ? IsExtensible(O).
    let extensible = o.internal_is_extensible(agent)?;
    // 3. Return ValidateAndApplyPropertyDescriptor(O, P, extensible, Desc, current).
    Ok(validate_and_apply_property_descriptor(
        agent,
        Some(o),
        property_key,
        extensible,
        descriptor,
        current,
    ))
}

/// ### [10.1.6.2 IsCompatiblePropertyDescriptor ( Extensible, Desc, Current )](https://tc39.es/ecma262/#sec-iscompatiblepropertydescriptor)
pub(crate) fn is_compatible_property_descriptor(
    agent: &Agent,
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> bool {
    // 1. Return ValidateAndApplyPropertyDescriptor(undefined, "", Extensible, Desc, Current).
    validate_and_apply_property_descriptor(
        agent,
        None,
        PropertyKey::Integer(0),
        extensible,
        descriptor,
        current,
    )
}

/// ### [10.1.6.3 ValidateAndApplyPropertyDescriptor ( O, P, extensible, Desc, current )](https://tc39.es/ecma262/#sec-validateandapplypropertydescriptor)
///
/// Returns true if and only if `descriptor` can be applied as the property
/// of an object with specified extensibility and current property
/// `current`. If the descriptor can be applied and `o` is present, it is
/// written into the property storage of `o`.
pub(crate) fn validate_and_apply_property_descriptor(
    agent: &Agent,
    o: Option<Object>,
    property_key: PropertyKey,
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> bool {
    // 1. Assert: P is a property key.
    // 2. If current is undefined, then
    let Some(current) = current else {
        // a. If extensible is false, return false.
        if !extensible {
            return false;
        }
        // b. If O is undefined, return true.
        // c. If IsAccessorDescriptor(Desc) is true, then
        //     i. Create an own accessor property named P of object O whose
        //     [[Get]], [[Set]], [[Enumerable]], and [[Configurable]]
        //     attributes are set to the value of the corresponding field in
        //     Desc if Desc has that field, or to the attribute's default
        //     value otherwise.
        // d. Else,
        //     i. Create an own data property named P of object O whose
        //     [[Value]], [[Writable]], [[Enumerable]], and [[Configurable]]
        //     attributes are set to the value of the corresponding field in
        //     Desc if Desc has that field, or to the attribute's default
        //     value otherwise.
        if let Some(o) = o {
            o.insert_property(agent, property_key, descriptor.complete());
        }
        // e. Return true.
        return true;
    };
    // 3. Assert: current is a fully populated Property Descriptor.
    let current_configurable = current.configurable.unwrap_or(false);
    let current_enumerable = current.enumerable.unwrap_or(false);
    // 4. If Desc does not have any fields, return true.
    if descriptor == PropertyDescriptor::default() {
        return true;
    }
    // 5. If current.[[Configurable]] is false, then
    if !current_configurable {
        // a. If Desc has a [[Configurable]] field and Desc.[[Configurable]]
        // is true, return false.
        if descriptor.configurable == Some(true) {
            return false;
        }
        // b. If Desc has an [[Enumerable]] field and Desc.[[Enumerable]] is
        // not current.[[Enumerable]], return false.
        if descriptor
            .enumerable
            .is_some_and(|enumerable| enumerable != current_enumerable)
        {
            return false;
        }
        // c. If IsGenericDescriptor(Desc) is false and
        // IsAccessorDescriptor(Desc) is not IsAccessorDescriptor(current),
        // return false.
        if !descriptor.is_generic_descriptor()
            && descriptor.is_accessor_descriptor() != current.is_accessor_descriptor()
        {
            return false;
        }
        // d. If IsAccessorDescriptor(current) is true, then
        if current.is_accessor_descriptor() {
            // i. If Desc has a [[Get]] field and SameValue(Desc.[[Get]],
            // current.[[Get]]) is false, return false.
            if descriptor.get.is_some_and(|get| Some(get) != current.get) {
                return false;
            }
            // ii. If Desc has a [[Set]] field and SameValue(Desc.[[Set]],
            // current.[[Set]]) is false, return false.
            if descriptor.set.is_some_and(|set| Some(set) != current.set) {
                return false;
            }
        } else if current.writable == Some(false) {
            // e. Else if current.[[Writable]] is false, then
            // i. If Desc has a [[Writable]] field and Desc.[[Writable]] is
            // true, return false.
            if descriptor.writable == Some(true) {
                return false;
            }
            // ii. If Desc has a [[Value]] field and SameValue(Desc.[[Value]],
            // current.[[Value]]) is false, return false.
            if let (Some(value), Some(current_value)) = (descriptor.value, current.value)
                && !super::super::abstract_operations::testing_and_comparison::same_value(
                    agent,
                    value,
                    current_value,
                )
            {
                return false;
            }
        }
    }
    // 6. If O is not undefined, then
    if let Some(o) = o {
        let enumerable = descriptor.enumerable.unwrap_or(current_enumerable);
        let configurable = descriptor.configurable.unwrap_or(current_configurable);
        let property = if current.is_data_descriptor() && descriptor.is_accessor_descriptor() {
            // a. If IsDataDescriptor(current) is true and
            // IsAccessorDescriptor(Desc) is true, then
            // i. If Desc has a [[Configurable]] field, let configurable be
            // Desc.[[Configurable]]; else let configurable be
            // current.[[Configurable]].
            // ii. If Desc has a [[Enumerable]] field, let enumerable be
            // Desc.[[Enumerable]]; else let enumerable be
            // current.[[Enumerable]].
            // iii. Replace the property named P of object O with an accessor
            // property whose [[Configurable]] and [[Enumerable]] attributes
            // are set to configurable and enumerable, respectively, and whose
            // [[Get]] and [[Set]] attributes are set to the value of the
            // corresponding field in Desc if Desc has that field, or to the
            // attribute's default value otherwise.
            Property::accessor(
                descriptor.get.flatten(),
                descriptor.set.flatten(),
                enumerable,
                configurable,
            )
        } else if current.is_accessor_descriptor() && descriptor.is_data_descriptor() {
            // b. Else if IsAccessorDescriptor(current) is true and
            // IsDataDescriptor(Desc) is true, then
            // iii. Replace the property named P of object O with a data
            // property whose [[Configurable]] and [[Enumerable]] attributes
            // are set to configurable and enumerable, respectively, and whose
            // [[Value]] and [[Writable]] attributes are set to the value of
            // the corresponding field in Desc if Desc has that field, or to
            // the attribute's default value otherwise.
            Property::data(
                descriptor.value.unwrap_or(Value::Undefined),
                descriptor.writable.unwrap_or(false),
                enumerable,
                configurable,
            )
        } else if current.is_accessor_descriptor() {
            // c. Else,
            // i. For each field of Desc, set the corresponding attribute of
            // the property named P of object O to the value of the field.
            Property::accessor(
                descriptor.get.unwrap_or(current.get.flatten()),
                descriptor.set.unwrap_or(current.set.flatten()),
                enumerable,
                configurable,
            )
        } else {
            Property::data(
                descriptor
                    .value
                    .or(current.value)
                    .unwrap_or(Value::Undefined),
                descriptor
                    .writable
                    .or(current.writable)
                    .unwrap_or(false),
                enumerable,
                configurable,
            )
        };
        o.insert_property(agent, property_key, property);
    }
    // 7. Return true.
    true
}

/// ### [10.1.7.1 OrdinaryHasProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinaryhasproperty)
pub(crate) fn ordinary_has_property(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
) -> JsResult<bool> {
    // 1. Let hasOwn be ? O.[[GetOwnProperty]](P).
    // 2. If hasOwn is not undefined, return true.
    if o.internal_get_own_property(agent, property_key)?.is_some() {
        return Ok(true);
    }
    // 3. Let parent be ? O.[[GetPrototypeOf]]().
    // 4. If parent is not null, then
    match o.internal_get_prototype_of(agent)? {
        // a. Return ? parent.[[HasProperty]](P).
        Some(parent) => parent.internal_has_property(agent, property_key),
        // 5. Return false.
        None => Ok(false),
    }
}

/// ### [10.1.8.1 OrdinaryGet ( O, P, Receiver )](https://tc39.es/ecma262/#sec-ordinaryget)
pub(crate) fn ordinary_get(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
    receiver: Value,
) -> JsResult<Value> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let Some(descriptor) = o.internal_get_own_property(agent, property_key)? else {
        // 2. If desc is undefined, then
        // a. Let parent be ? O.[[GetPrototypeOf]]().
        // b. If parent is null, return undefined.
        // c. Return ? parent.[[Get]](P, Receiver).
        return match o.internal_get_prototype_of(agent)? {
            Some(parent) => parent.internal_get(agent, property_key, receiver),
            None => Ok(Value::Undefined),
        };
    };
    // 3. If IsDataDescriptor(desc) is true, return desc.[[Value]].
    if let Some(value) = descriptor.value {
        return Ok(value);
    }
    // 4. Assert: IsAccessorDescriptor(desc) is true.
    // 5. Let getter be desc.[[Get]].
    // 6. If getter is undefined, return undefined.
    let Some(getter) = descriptor.get.flatten() else {
        return Ok(Value::Undefined);
    };
    // 7. Return ? Call(getter, Receiver).
    call_function(agent, getter, receiver, &[])
}

/// ### [10.1.9.1 OrdinarySet ( O, P, V, Receiver )](https://tc39.es/ecma262/#sec-ordinaryset)
pub(crate) fn ordinary_set(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
    value: Value,
    receiver: Value,
) -> JsResult<bool> {
    // 1. Let ownDesc be ? O.[[GetOwnProperty]](P).
    let own_descriptor = o.internal_get_own_property(agent, property_key)?;
    // 2. Return ? OrdinarySetWithOwnDescriptor(O, P, V, Receiver, ownDesc).
    ordinary_set_with_own_descriptor(agent, o, property_key, value, receiver, own_descriptor)
}

/// ### [10.1.9.2 OrdinarySetWithOwnDescriptor ( O, P, V, Receiver, ownDesc )](https://tc39.es/ecma262/#sec-ordinarysetwithowndescriptor)
pub(crate) fn ordinary_set_with_own_descriptor(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
    value: Value,
    receiver: Value,
    own_descriptor: Option<PropertyDescriptor>,
) -> JsResult<bool> {
    // 1. If ownDesc is undefined, then
    let own_descriptor = match own_descriptor {
        Some(own_descriptor) => own_descriptor,
        None => {
            // a. Let parent be ? O.[[GetPrototypeOf]]().
            // b. If parent is not null, then
            if let Some(parent) = o.internal_get_prototype_of(agent)? {
                // i. Return ? parent.[[Set]](P, V, Receiver).
                return parent.internal_set(agent, property_key, value, receiver);
            }
            // c. Else,
            // i. Set ownDesc to the PropertyDescriptor { [[Value]]:
            // undefined, [[Writable]]: true, [[Enumerable]]: true,
            // [[Configurable]]: true }.
            PropertyDescriptor::new_data_descriptor(Value::Undefined)
        }
    };
    // 2. If IsDataDescriptor(ownDesc) is true, then
    if own_descriptor.is_data_descriptor() {
        // a. If ownDesc.[[Writable]] is false, return false.
        if own_descriptor.writable != Some(true) {
            return Ok(false);
        }
        // b. If Receiver is not an Object, return false.
        let Value::Object(receiver) = receiver else {
            return Ok(false);
        };
        // c. Let existingDescriptor be ? Receiver.[[GetOwnProperty]](P).
        // d. If existingDescriptor is not undefined, then
        if let Some(existing_descriptor) =
            receiver.internal_get_own_property(agent, property_key)?
        {
            // i. If IsAccessorDescriptor(existingDescriptor) is true, return
            // false.
            if existing_descriptor.is_accessor_descriptor() {
                return Ok(false);
            }
            // ii. If existingDescriptor.[[Writable]] is false, return false.
            if existing_descriptor.writable == Some(false) {
                return Ok(false);
            }
            // iii. Let valueDesc be the PropertyDescriptor { [[Value]]: V }.
            let value_descriptor = PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            };
            // iv. Return ? Receiver.[[DefineOwnProperty]](P, valueDesc).
            return receiver.internal_define_own_property(agent, property_key, value_descriptor);
        }
        // e. Else,
        // i. Assert: Receiver does not currently have a property P.
        // ii. Return ? CreateDataProperty(Receiver, P, V).
        return receiver.internal_define_own_property(
            agent,
            property_key,
            PropertyDescriptor::new_data_descriptor(value),
        );
    }
    // 3. Assert: IsAccessorDescriptor(ownDesc) is true.
    // 4. Let setter be ownDesc.[[Set]].
    // 5. If setter is undefined, return false.
    let Some(setter) = own_descriptor.set.flatten() else {
        return Ok(false);
    };
    // 6. Perform ? Call(setter, Receiver, « V »).
    call_function(agent, setter, receiver, &[value])?;
    // 7. Return true.
    Ok(true)
}

/// ### [10.1.10.1 OrdinaryDelete ( O, P )](https://tc39.es/ecma262/#sec-ordinarydelete)
pub(crate) fn ordinary_delete(
    agent: &Agent,
    o: Object,
    property_key: PropertyKey,
) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let Some(descriptor) = o.internal_get_own_property(agent, property_key)? else {
        // 2. If desc is undefined, return true.
        return Ok(true);
    };
    // 3. If desc.[[Configurable]] is true, then
    if descriptor.configurable == Some(true) {
        // a. Remove the own property with name P from O.
        o.remove_property(agent, property_key);
        // b. Return true.
        return Ok(true);
    }
    // 4. Return false.
    Ok(false)
}

/// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
pub(crate) fn ordinary_own_property_keys(agent: &Agent, o: Object) -> Vec<PropertyKey> {
    o.storage_keys(agent)
}

/// ### [10.1.12 OrdinaryObjectCreate ( proto \[ , additionalInternalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinaryobjectcreate)
pub(crate) fn ordinary_object_create(agent: &Agent, proto: Option<Object>) -> Object {
    // 1. Let internalSlotsList be « [[Prototype]], [[Extensible]] ».
    // 2. If additionalInternalSlotsList is present, set internalSlotsList to
    // the list-concatenation of internalSlotsList and
    // additionalInternalSlotsList.
    // 3. Let O be MakeBasicObject(internalSlotsList).
    // 4. Set O.[[Prototype]] to proto.
    // 5. Return O.
    Object::create(agent, proto, ObjectKind::Ordinary)
}

/// OrdinaryObjectCreate with one of the current realm's intrinsic
/// prototypes, or null.
pub(crate) fn ordinary_object_create_with_intrinsics(
    agent: &Agent,
    proto: Option<ProtoIntrinsics>,
) -> Object {
    let proto = proto.map(|proto| agent.intrinsics().get(proto.intrinsic()));
    ordinary_object_create(agent, proto)
}

/// ### [10.1.13 OrdinaryCreateFromConstructor ( constructor, intrinsicDefaultProto \[ , internalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinarycreatefromconstructor)
///
/// The internal slots of the new object are given by `kind`.
pub(crate) fn ordinary_create_from_constructor(
    agent: &Agent,
    constructor: Object,
    intrinsic_default_proto: ProtoIntrinsics,
    kind: ObjectKind,
) -> JsResult<Object> {
    // 1. Assert: intrinsicDefaultProto is this specification's name of an
    // intrinsic object. The corresponding object must be an intrinsic that is
    // intended to be used as the [[Prototype]] value of an object.
    // 2. Let proto be ? GetPrototypeFromConstructor(constructor,
    // intrinsicDefaultProto).
    let proto = get_prototype_from_constructor(agent, constructor, intrinsic_default_proto)?;
    // 3. If internalSlotsList is present, let slotsList be internalSlotsList.
    // 4. Else, let slotsList be a new empty List.
    // 5. Return OrdinaryObjectCreate(proto, slotsList).
    Ok(Object::create(agent, Some(proto), kind))
}

/// ### [10.1.14 GetPrototypeFromConstructor ( constructor, intrinsicDefaultProto )](https://tc39.es/ecma262/#sec-getprototypefromconstructor)
pub(crate) fn get_prototype_from_constructor(
    agent: &Agent,
    constructor: Object,
    intrinsic_default_proto: ProtoIntrinsics,
) -> JsResult<Object> {
    // 1. Assert: intrinsicDefaultProto is this specification's name of an
    // intrinsic object.
    // 2. Let proto be ? Get(constructor, "prototype").
    let proto = get(agent, constructor, PropertyKey::from_str(agent, "prototype"))?;
    match proto {
        Value::Object(proto) => Ok(proto),
        // 3. If proto is not an Object, then
        _ => {
            // a. Let realm be ? GetFunctionRealm(constructor).
            let realm = get_function_realm(agent, constructor)?;
            // b. Set proto to realm's intrinsic object named
            // intrinsicDefaultProto.
            Ok(realm
                .intrinsics(agent)
                .get(intrinsic_default_proto.intrinsic()))
        }
    }
    // 4. Return proto.
}

/// Throw a TypeError unless `value` is an object, for built-ins that
/// require an object receiver.
pub(crate) fn require_object(agent: &Agent, value: Value, what: &str) -> JsResult<Object> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{what} called on non-object"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, agent::Options};

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    #[test]
    fn non_configurable_properties_cannot_change() {
        let agent = agent();
        let o = ordinary_object_create(&agent, None);
        let key = PropertyKey::from_str(&agent, "x");
        let frozen = PropertyDescriptor {
            value: Some(Value::Number(1.0)),
            writable: Some(false),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        };
        assert_eq!(ordinary_define_own_property(&agent, o, key, frozen), Ok(true));
        // Redefining with the same value is allowed.
        assert_eq!(ordinary_define_own_property(&agent, o, key, frozen), Ok(true));
        let changed = PropertyDescriptor {
            value: Some(Value::Number(2.0)),
            ..Default::default()
        };
        assert_eq!(ordinary_define_own_property(&agent, o, key, changed), Ok(false));
        assert_eq!(ordinary_delete(&agent, o, key), Ok(false));
        assert_eq!(
            ordinary_get(&agent, o, key, Value::Object(o)),
            Ok(Value::Number(1.0))
        );
    }

    #[test]
    fn data_to_accessor_conversion_keeps_attributes() {
        let agent = agent();
        let o = ordinary_object_create(&agent, None);
        let key = PropertyKey::from_str(&agent, "x");
        assert_eq!(
            ordinary_define_own_property(
                &agent,
                o,
                key,
                PropertyDescriptor::new_data_descriptor(Value::Null)
            ),
            Ok(true)
        );
        let accessor = PropertyDescriptor {
            get: Some(None),
            ..Default::default()
        };
        assert_eq!(ordinary_define_own_property(&agent, o, key, accessor), Ok(true));
        let descriptor = ordinary_get_own_property(&agent, o, key).unwrap();
        assert!(descriptor.is_accessor_descriptor());
        assert_eq!(descriptor.enumerable, Some(true));
        assert_eq!(descriptor.configurable, Some(true));
    }

    #[test]
    fn prototype_cycles_are_rejected() {
        let agent = agent();
        let a = ordinary_object_create(&agent, None);
        let b = ordinary_object_create(&agent, Some(a));
        assert!(!ordinary_set_prototype_of(&agent, a, Some(b)));
        assert!(ordinary_set_prototype_of(&agent, b, None));
        assert!(ordinary_set_prototype_of(&agent, a, Some(b)));
    }

    #[test]
    fn set_creates_own_property_on_receiver() {
        let agent = agent();
        let proto = ordinary_object_create(&agent, None);
        let o = ordinary_object_create(&agent, Some(proto));
        let key = PropertyKey::from_str(&agent, "y");
        assert_eq!(
            ordinary_set(&agent, o, key, Value::Boolean(true), Value::Object(o)),
            Ok(true)
        );
        assert!(ordinary_get_own_property(&agent, proto, key).is_none());
        assert_eq!(
            ordinary_get_own_property(&agent, o, key).and_then(|desc| desc.value),
            Some(Value::Boolean(true))
        );
    }
}
