// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::{
            IteratorKind, get_iterator, if_abrupt_close_iterator, iterator_close,
            iterator_step_value,
        },
        operations_on_objects::{
            EnumerablePropertiesKind, IntegrityLevel, create_array_from_list,
            create_data_property_or_throw, define_property_or_throw, enumerable_own_properties,
            get, has_own_property, set, set_integrity_level, test_integrity_level,
        },
        testing_and_comparison::{require_object_coercible, same_value},
        type_conversion::{to_object, to_property_key},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        ordinary::{ordinary_create_from_constructor, ordinary_object_create},
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{InternalMethods, Object, ObjectKind, PropertyDescriptor, PropertyKey, Value},
};

pub(crate) struct ObjectConstructor;

impl Builtin for ObjectConstructor {
    const NAME: &'static str = "Object";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ObjectConstructor::constructor);
}
impl BuiltinIntrinsicConstructor for ObjectConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Object;
}

struct ObjectAssign;
impl Builtin for ObjectAssign {
    const NAME: &'static str = "assign";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::assign);
}
struct ObjectCreate;
impl Builtin for ObjectCreate {
    const NAME: &'static str = "create";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::create);
}
struct ObjectDefineProperties;
impl Builtin for ObjectDefineProperties {
    const NAME: &'static str = "defineProperties";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::define_properties);
}
struct ObjectDefineProperty;
impl Builtin for ObjectDefineProperty {
    const NAME: &'static str = "defineProperty";
    const LENGTH: u8 = 3;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::define_property);
}
struct ObjectEntries;
impl Builtin for ObjectEntries {
    const NAME: &'static str = "entries";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::entries);
}
struct ObjectFreeze;
impl Builtin for ObjectFreeze {
    const NAME: &'static str = "freeze";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::freeze);
}
struct ObjectFromEntries;
impl Builtin for ObjectFromEntries {
    const NAME: &'static str = "fromEntries";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::from_entries);
}
struct ObjectGetOwnPropertyDescriptor;
impl Builtin for ObjectGetOwnPropertyDescriptor {
    const NAME: &'static str = "getOwnPropertyDescriptor";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::get_own_property_descriptor);
}
struct ObjectGetOwnPropertyDescriptors;
impl Builtin for ObjectGetOwnPropertyDescriptors {
    const NAME: &'static str = "getOwnPropertyDescriptors";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour =
        Behaviour::Regular(ObjectConstructor::get_own_property_descriptors);
}
struct ObjectGetOwnPropertyNames;
impl Builtin for ObjectGetOwnPropertyNames {
    const NAME: &'static str = "getOwnPropertyNames";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::get_own_property_names);
}
struct ObjectGetOwnPropertySymbols;
impl Builtin for ObjectGetOwnPropertySymbols {
    const NAME: &'static str = "getOwnPropertySymbols";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::get_own_property_symbols);
}
struct ObjectGetPrototypeOf;
impl Builtin for ObjectGetPrototypeOf {
    const NAME: &'static str = "getPrototypeOf";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::get_prototype_of);
}
struct ObjectHasOwn;
impl Builtin for ObjectHasOwn {
    const NAME: &'static str = "hasOwn";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::has_own);
}
struct ObjectIs;
impl Builtin for ObjectIs {
    const NAME: &'static str = "is";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is);
}
struct ObjectIsExtensible;
impl Builtin for ObjectIsExtensible {
    const NAME: &'static str = "isExtensible";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is_extensible);
}
struct ObjectIsFrozen;
impl Builtin for ObjectIsFrozen {
    const NAME: &'static str = "isFrozen";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is_frozen);
}
struct ObjectIsSealed;
impl Builtin for ObjectIsSealed {
    const NAME: &'static str = "isSealed";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is_sealed);
}
struct ObjectKeys;
impl Builtin for ObjectKeys {
    const NAME: &'static str = "keys";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::keys);
}
struct ObjectPreventExtensions;
impl Builtin for ObjectPreventExtensions {
    const NAME: &'static str = "preventExtensions";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::prevent_extensions);
}
struct ObjectSeal;
impl Builtin for ObjectSeal {
    const NAME: &'static str = "seal";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::seal);
}
struct ObjectSetPrototypeOf;
impl Builtin for ObjectSetPrototypeOf {
    const NAME: &'static str = "setPrototypeOf";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::set_prototype_of);
}
struct ObjectValues;
impl Builtin for ObjectValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::values);
}

impl ObjectConstructor {
    /// ### [20.1.1.1 Object ( \[ value \] )](https://tc39.es/ecma262/#sec-object-value)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1. If NewTarget is neither undefined nor the active function
        // object, then
        if let Some(new_target) = new_target
            && Some(new_target) != agent.running_execution_context().function
        {
            // a. Return ? OrdinaryCreateFromConstructor(NewTarget, "%Object.prototype%").
            let object = ordinary_create_from_constructor(
                agent,
                new_target,
                ProtoIntrinsics::Object,
                ObjectKind::Ordinary,
            )?;
            return Ok(Value::Object(object));
        }
        // 2. If value is either undefined or null, return
        // OrdinaryObjectCreate(%Object.prototype%).
        if value.is_nullish() {
            let prototype = agent.intrinsics().object_prototype();
            return Ok(Value::Object(ordinary_object_create(agent, Some(prototype))));
        }
        // 3. Return ! ToObject(value).
        Ok(Value::Object(to_object(agent, value)?))
    }

    /// ### [20.1.2.1 Object.assign ( target, ...sources )](https://tc39.es/ecma262/#sec-object.assign)
    fn assign(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let to be ? ToObject(target).
        let to = to_object(agent, arguments.get(0))?;
        // 2. If only one argument was passed, return to.
        // 3. For each element nextSource of sources, do
        for &next_source in arguments.slice_from(1) {
            // a. If nextSource is neither undefined nor null, then
            if next_source.is_nullish() {
                continue;
            }
            // i. Let from be ! ToObject(nextSource).
            let from = to_object(agent, next_source)?;
            // ii. Let keys be ? from.[[OwnPropertyKeys]]().
            let keys = from.internal_own_property_keys(agent)?;
            // iii. For each element nextKey of keys, do
            for next_key in keys {
                // 1. Let desc be ? from.[[GetOwnProperty]](nextKey).
                let desc = from.internal_get_own_property(agent, next_key)?;
                // 2. If desc is not undefined and desc.[[Enumerable]] is true, then
                if desc.is_some_and(|desc| desc.enumerable == Some(true)) {
                    // a. Let propValue be ? Get(from, nextKey).
                    let prop_value = get(agent, from, next_key)?;
                    // b. Perform ? Set(to, nextKey, propValue, true).
                    set(agent, to, next_key, prop_value, true)?;
                }
            }
        }
        // 4. Return to.
        Ok(Value::Object(to))
    }

    /// ### [20.1.2.2 Object.create ( O, Properties )](https://tc39.es/ecma262/#sec-object.create)
    fn create(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object and O is not null, throw a TypeError exception.
        let proto = match arguments.get(0) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ));
            }
        };
        // 2. Let obj be OrdinaryObjectCreate(O).
        let obj = ordinary_object_create(agent, proto);
        // 3. If Properties is not undefined, then
        let properties = arguments.get(1);
        if !properties.is_undefined() {
            // a. Return ? ObjectDefineProperties(obj, Properties).
            object_define_properties(agent, obj, properties)?;
        }
        // 4. Return obj.
        Ok(Value::Object(obj))
    }

    /// ### [20.1.2.3 Object.defineProperties ( O, Properties )](https://tc39.es/ecma262/#sec-object.defineproperties)
    fn define_properties(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, throw a TypeError exception.
        let o = require_object_argument(agent, arguments.get(0))?;
        // 2. Return ? ObjectDefineProperties(O, Properties).
        object_define_properties(agent, o, arguments.get(1))?;
        Ok(Value::Object(o))
    }

    /// ### [20.1.2.4 Object.defineProperty ( O, P, Attributes )](https://tc39.es/ecma262/#sec-object.defineproperty)
    fn define_property(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, throw a TypeError exception.
        let o = require_object_argument(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(P).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? ToPropertyDescriptor(Attributes).
        let desc = PropertyDescriptor::to_property_descriptor(agent, arguments.get(2))?;
        // 4. Perform ? DefinePropertyOrThrow(O, key, desc).
        define_property_or_throw(agent, o, key, desc)?;
        // 5. Return O.
        Ok(Value::Object(o))
    }

    /// ### [20.1.2.5 Object.entries ( O )](https://tc39.es/ecma262/#sec-object.entries)
    fn entries(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Let entryList be ? EnumerableOwnProperties(obj, KEY+VALUE).
        let entry_list = enumerable_own_properties(agent, obj, EnumerablePropertiesKind::KeyValue)?;
        // 3. Return CreateArrayFromList(entryList).
        Ok(Value::Object(create_array_from_list(agent, &entry_list)))
    }

    /// ### [20.1.2.6 Object.freeze ( O )](https://tc39.es/ecma262/#sec-object.freeze)
    fn freeze(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, return O.
        let Value::Object(o) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        // 2. Let status be ? SetIntegrityLevel(O, FROZEN).
        let status = set_integrity_level(agent, o, IntegrityLevel::Frozen)?;
        // 3. If status is false, throw a TypeError exception.
        if !status {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not freeze object",
            ));
        }
        // 4. Return O.
        Ok(Value::Object(o))
    }

    /// ### [20.1.2.7 Object.fromEntries ( iterable )](https://tc39.es/ecma262/#sec-object.fromentries)
    fn from_entries(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let iterable = arguments.get(0);
        // 1. Perform ? RequireObjectCoercible(iterable).
        require_object_coercible(agent, iterable)?;
        // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%).
        let obj = ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
        // 4. Let closure be a new Abstract Closure with parameters (key, value)
        // that captures obj and performs the following steps when called:
        // 6. Return ? AddEntriesFromIterable(obj, iterable, adder).
        let mut iterator_record = get_iterator(agent, iterable, IteratorKind::Sync)?;
        loop {
            let Some(next) = iterator_step_value(agent, &mut iterator_record)? else {
                return Ok(Value::Object(obj));
            };
            let Value::Object(entry) = next else {
                let error = agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("Iterator value {} is not an entry object", next.to_display_string(agent)),
                );
                return iterator_close(agent, iterator_record.iterator, Err(error));
            };
            let key = get(agent, entry, PropertyKey::from_index(agent, 0));
            let key = if_abrupt_close_iterator(agent, key, &iterator_record)?;
            let value = get(agent, entry, PropertyKey::from_index(agent, 1));
            let value = if_abrupt_close_iterator(agent, value, &iterator_record)?;
            // a. Let propertyKey be ? ToPropertyKey(key).
            // b. Perform ! CreateDataPropertyOrThrow(obj, propertyKey, value).
            let added = to_property_key(agent, key)
                .and_then(|key| create_data_property_or_throw(agent, obj, key, value));
            if_abrupt_close_iterator(agent, added, &iterator_record)?;
        }
    }

    /// ### [20.1.2.8 Object.getOwnPropertyDescriptor ( O, P )](https://tc39.es/ecma262/#sec-object.getownpropertydescriptor)
    fn get_own_property_descriptor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(P).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? obj.[[GetOwnProperty]](key).
        let desc = obj.internal_get_own_property(agent, key)?;
        // 4. Return FromPropertyDescriptor(desc).
        PropertyDescriptor::from_property_descriptor(desc, agent)
    }

    /// ### [20.1.2.9 Object.getOwnPropertyDescriptors ( O )](https://tc39.es/ecma262/#sec-object.getownpropertydescriptors)
    fn get_own_property_descriptors(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Let ownKeys be ? obj.[[OwnPropertyKeys]]().
        let own_keys = obj.internal_own_property_keys(agent)?;
        // 3. Let descriptors be OrdinaryObjectCreate(%Object.prototype%).
        let descriptors =
            ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
        // 4. For each element key of ownKeys, do
        for key in own_keys {
            // a. Let desc be ? obj.[[GetOwnProperty]](key).
            let desc = obj.internal_get_own_property(agent, key)?;
            // b. Let descriptor be FromPropertyDescriptor(desc).
            let descriptor = PropertyDescriptor::from_property_descriptor(desc, agent)?;
            // c. If descriptor is not undefined, perform !
            // CreateDataPropertyOrThrow(descriptors, key, descriptor).
            if !descriptor.is_undefined() {
                create_data_property_or_throw(agent, descriptors, key, descriptor)?;
            }
        }
        // 5. Return descriptors.
        Ok(Value::Object(descriptors))
    }

    /// ### [20.1.2.10 Object.getOwnPropertyNames ( O )](https://tc39.es/ecma262/#sec-object.getownpropertynames)
    fn get_own_property_names(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Return CreateArrayFromList(? GetOwnPropertyKeys(O, STRING)).
        let keys = get_own_property_keys(agent, arguments.get(0), false)?;
        Ok(Value::Object(create_array_from_list(agent, &keys)))
    }

    /// ### [20.1.2.11 Object.getOwnPropertySymbols ( O )](https://tc39.es/ecma262/#sec-object.getownpropertysymbols)
    fn get_own_property_symbols(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Return CreateArrayFromList(? GetOwnPropertyKeys(O, SYMBOL)).
        let keys = get_own_property_keys(agent, arguments.get(0), true)?;
        Ok(Value::Object(create_array_from_list(agent, &keys)))
    }

    /// ### [20.1.2.12 Object.getPrototypeOf ( O )](https://tc39.es/ecma262/#sec-object.getprototypeof)
    fn get_prototype_of(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Return ? obj.[[GetPrototypeOf]]().
        Ok(obj
            .internal_get_prototype_of(agent)?
            .map_or(Value::Null, Value::Object))
    }

    /// ### [20.1.2.14 Object.hasOwn ( O, P )](https://tc39.es/ecma262/#sec-object.hasown)
    fn has_own(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Let key be ? ToPropertyKey(P).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Return ? HasOwnProperty(obj, key).
        Ok(Value::Boolean(has_own_property(agent, obj, key)?))
    }

    /// ### [20.1.2.15 Object.is ( value1, value2 )](https://tc39.es/ecma262/#sec-object.is)
    fn is(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Return SameValue(value1, value2).
        Ok(Value::Boolean(same_value(
            agent,
            arguments.get(0),
            arguments.get(1),
        )))
    }

    /// ### [20.1.2.16 Object.isExtensible ( O )](https://tc39.es/ecma262/#sec-object.isextensible)
    fn is_extensible(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, return false.
        let Value::Object(o) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        // 2. Return ? IsExtensible(O).
        Ok(Value::Boolean(o.internal_is_extensible(agent)?))
    }

    /// ### [20.1.2.17 Object.isFrozen ( O )](https://tc39.es/ecma262/#sec-object.isfrozen)
    fn is_frozen(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, return true.
        let Value::Object(o) = arguments.get(0) else {
            return Ok(Value::Boolean(true));
        };
        // 2. Return ? TestIntegrityLevel(O, FROZEN).
        Ok(Value::Boolean(test_integrity_level(
            agent,
            o,
            IntegrityLevel::Frozen,
        )?))
    }

    /// ### [20.1.2.18 Object.isSealed ( O )](https://tc39.es/ecma262/#sec-object.issealed)
    fn is_sealed(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, return true.
        let Value::Object(o) = arguments.get(0) else {
            return Ok(Value::Boolean(true));
        };
        // 2. Return ? TestIntegrityLevel(O, SEALED).
        Ok(Value::Boolean(test_integrity_level(
            agent,
            o,
            IntegrityLevel::Sealed,
        )?))
    }

    /// ### [20.1.2.19 Object.keys ( O )](https://tc39.es/ecma262/#sec-object.keys)
    fn keys(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Let keyList be ? EnumerableOwnProperties(obj, KEY).
        let key_list = enumerable_own_properties(agent, obj, EnumerablePropertiesKind::Key)?;
        // 3. Return CreateArrayFromList(keyList).
        Ok(Value::Object(create_array_from_list(agent, &key_list)))
    }

    /// ### [20.1.2.20 Object.preventExtensions ( O )](https://tc39.es/ecma262/#sec-object.preventextensions)
    fn prevent_extensions(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, return O.
        let Value::Object(o) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        // 2. Let status be ? O.[[PreventExtensions]]().
        // 3. If status is false, throw a TypeError exception.
        if !o.internal_prevent_extensions(agent)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not prevent extensions",
            ));
        }
        // 4. Return O.
        Ok(Value::Object(o))
    }

    /// ### [20.1.2.22 Object.seal ( O )](https://tc39.es/ecma262/#sec-object.seal)
    fn seal(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If O is not an Object, return O.
        let Value::Object(o) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        // 2. Let status be ? SetIntegrityLevel(O, SEALED).
        // 3. If status is false, throw a TypeError exception.
        if !set_integrity_level(agent, o, IntegrityLevel::Sealed)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not seal object",
            ));
        }
        // 4. Return O.
        Ok(Value::Object(o))
    }

    /// ### [20.1.2.23 Object.setPrototypeOf ( O, proto )](https://tc39.es/ecma262/#sec-object.setprototypeof)
    fn set_prototype_of(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Set O to ? RequireObjectCoercible(O).
        let o = require_object_coercible(agent, arguments.get(0))?;
        // 2. If proto is not an Object and proto is not null, throw a TypeError exception.
        let proto = match arguments.get(1) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ));
            }
        };
        // 3. If O is not an Object, return O.
        let Value::Object(o) = o else {
            return Ok(o);
        };
        // 4. Let status be ? O.[[SetPrototypeOf]](proto).
        // 5. If status is false, throw a TypeError exception.
        if !o.internal_set_prototype_of(agent, proto)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not set prototype of object",
            ));
        }
        // 6. Return O.
        Ok(Value::Object(o))
    }

    /// ### [20.1.2.24 Object.values ( O )](https://tc39.es/ecma262/#sec-object.values)
    fn values(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let obj be ? ToObject(O).
        let obj = to_object(agent, arguments.get(0))?;
        // 2. Let valueList be ? EnumerableOwnProperties(obj, VALUE).
        let value_list = enumerable_own_properties(agent, obj, EnumerablePropertiesKind::Value)?;
        // 3. Return CreateArrayFromList(valueList).
        Ok(Value::Object(create_array_from_list(agent, &value_list)))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let object_prototype = intrinsics.object_prototype();

        BuiltinFunctionBuilder::new_intrinsic_constructor::<ObjectConstructor>(agent, realm)
            .with_property_capacity(23)
            .with_builtin_function_property::<ObjectAssign>()
            .with_builtin_function_property::<ObjectCreate>()
            .with_builtin_function_property::<ObjectDefineProperties>()
            .with_builtin_function_property::<ObjectDefineProperty>()
            .with_builtin_function_property::<ObjectEntries>()
            .with_builtin_function_property::<ObjectFreeze>()
            .with_builtin_function_property::<ObjectFromEntries>()
            .with_builtin_function_property::<ObjectGetOwnPropertyDescriptor>()
            .with_builtin_function_property::<ObjectGetOwnPropertyDescriptors>()
            .with_builtin_function_property::<ObjectGetOwnPropertyNames>()
            .with_builtin_function_property::<ObjectGetOwnPropertySymbols>()
            .with_builtin_function_property::<ObjectGetPrototypeOf>()
            .with_builtin_function_property::<ObjectHasOwn>()
            .with_builtin_function_property::<ObjectIs>()
            .with_builtin_function_property::<ObjectIsExtensible>()
            .with_builtin_function_property::<ObjectIsFrozen>()
            .with_builtin_function_property::<ObjectIsSealed>()
            .with_builtin_function_property::<ObjectKeys>()
            .with_builtin_function_property::<ObjectPreventExtensions>()
            .with_prototype_property(object_prototype)
            .with_builtin_function_property::<ObjectSeal>()
            .with_builtin_function_property::<ObjectSetPrototypeOf>()
            .with_builtin_function_property::<ObjectValues>()
            .build();
    }
}

fn require_object_argument(agent: &Agent, value: Value) -> JsResult<Object> {
    match value {
        Value::Object(o) => Ok(o),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{} is not an object", value.to_display_string(agent)),
        )),
    }
}

/// ### [20.1.2.3.1 ObjectDefineProperties ( O, Properties )](https://tc39.es/ecma262/#sec-objectdefineproperties)
fn object_define_properties(
    agent: &Agent,
    o: Object,
    properties: Value,
) -> JsResult<()> {
    // 1. Let props be ? ToObject(Properties).
    let props = to_object(agent, properties)?;
    // 2. Let keys be ? props.[[OwnPropertyKeys]]().
    let keys = props.internal_own_property_keys(agent)?;
    // 3. Let descriptors be a new empty List.
    let mut descriptors = Vec::with_capacity(keys.len());
    // 4. For each element nextKey of keys, do
    for next_key in keys {
        // a. Let propDesc be ? props.[[GetOwnProperty]](nextKey).
        let prop_desc = props.internal_get_own_property(agent, next_key)?;
        // b. If propDesc is not undefined and propDesc.[[Enumerable]] is true, then
        if prop_desc.is_some_and(|desc| desc.enumerable == Some(true)) {
            // i. Let descObj be ? Get(props, nextKey).
            let desc_obj = get(agent, props, next_key)?;
            // ii. Let desc be ? ToPropertyDescriptor(descObj).
            let desc = PropertyDescriptor::to_property_descriptor(agent, desc_obj)?;
            // iii. Append the Record { [[Key]]: nextKey, [[Descriptor]]: desc } to descriptors.
            descriptors.push((next_key, desc));
        }
    }
    // 5. For each element property of descriptors, do
    for (key, desc) in descriptors {
        // a. Perform ? DefinePropertyOrThrow(O, property.[[Key]], property.[[Descriptor]]).
        define_property_or_throw(agent, o, key, desc)?;
    }
    // 6. Return O.
    Ok(())
}

/// ### [20.1.2.11.1 GetOwnPropertyKeys ( O, type )](https://tc39.es/ecma262/#sec-getownpropertykeys)
fn get_own_property_keys(agent: &Agent, o: Value, symbols: bool) -> JsResult<Vec<Value>> {
    // 1. Let obj be ? ToObject(O).
    let obj = to_object(agent, o)?;
    // 2. Let keys be ? obj.[[OwnPropertyKeys]]().
    let keys = obj.internal_own_property_keys(agent)?;
    // 3. Let nameList be a new empty List.
    // 4. For each element nextKey of keys, do
    //     a. If nextKey is a Symbol and type is SYMBOL, or if nextKey is a
    //     String and type is STRING, then
    //         i. Append nextKey to nameList.
    // 5. Return nameList.
    Ok(keys
        .into_iter()
        .filter(|key| key.is_symbol() == symbols)
        .map(|key| key.into_value(agent))
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn keys_follow_own_property_key_order() {
        assert_eq!(
            run_to_string("Object.keys({ b: 1, 2: 0, a: 2, 1: 0 }).join()"),
            "1,2,b,a"
        );
        assert_eq!(
            run_to_string("Object.entries({ x: 1, y: 'z' }).join(';')"),
            "x,1;y,z"
        );
    }

    #[test]
    fn define_property_rejects_incompatible_redefinition() {
        assert_eq!(
            run_to_string(
                "var o = {}; Object.defineProperty(o, 'x', { value: 1 });
                 try { Object.defineProperty(o, 'x', { value: 2 }); 'no' } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }

    #[test]
    fn set_prototype_of_rejects_cycles() {
        assert_eq!(
            run_to_string(
                "var a = {}; var b = Object.create(a);
                 try { Object.setPrototypeOf(a, b); 'no' } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }

    #[test]
    fn from_entries_and_assign() {
        assert_eq!(
            run_to_string("var o = Object.fromEntries([['a', 1], ['b', 2]]); Object.assign({}, o, null, { c: 3 }).c + o.b"),
            "5"
        );
    }

    #[test]
    fn freeze_and_seal_report_integrity() {
        assert_eq!(
            run_to_string("var o = Object.seal({ x: 1 }); o.x = 2; [Object.isSealed(o), Object.isFrozen(o), o.x].join()"),
            "true,false,2"
        );
    }

    #[test]
    fn symbols_are_listed_separately() {
        assert_eq!(
            run_to_string("var s = Symbol('k'); var o = { [s]: 1, n: 2 }; Object.getOwnPropertyNames(o).length + Object.getOwnPropertySymbols(o).length"),
            "2"
        );
    }
}
