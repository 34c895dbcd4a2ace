// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use super::{
    testing_and_comparison::{is_callable, is_constructor},
    type_conversion::{to_length, to_property_key},
};
use crate::ecmascript::{
    builtins::{
        ArgumentsList,
        array::array_create,
        bound_function::{bound_function_call, bound_function_construct},
        builtin_function::{builtin_call, builtin_construct},
        ecmascript_function::{ecmascript_function_call, ecmascript_function_construct},
        proxy::{proxy_call, proxy_construct},
    },
    execution::{Agent, JsResult, PrivateName, Realm, agent::ExceptionType},
    types::{
        InternalMethods, Object, ObjectKind, PrivateElement, PrivateElementKind,
        PropertyDescriptor, PropertyKey, Symbol, Value,
    },
};

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
///
/// The abstract operation Get takes arguments O (an Object) and P (a
/// property key) and returns either a normal completion containing an
/// ECMAScript language value or a throw completion. It is used to retrieve
/// the value of a specific property of an object.
pub(crate) fn get(agent: &Agent, o: Object, p: PropertyKey) -> JsResult<Value> {
    // 1. Return ? O.[[Get]](P, O).
    o.internal_get(agent, p, Value::Object(o))
}

/// ### [7.3.3 GetV ( V, P )](https://tc39.es/ecma262/#sec-getv)
///
/// The abstract operation GetV takes arguments V (an ECMAScript language
/// value) and P (a property key) and returns either a normal completion
/// containing an ECMAScript language value or a throw completion. It is used
/// to retrieve the value of a specific property of an ECMAScript language
/// value. If the value is not an object, the property lookup is performed
/// using a wrapper object appropriate for the type of the value.
pub(crate) fn get_v(agent: &Agent, v: Value, p: PropertyKey) -> JsResult<Value> {
    let mut reference = crate::ecmascript::types::Reference::property(
        v,
        crate::ecmascript::types::ReferencedName::PropertyKey(p),
        true,
    );
    // 1. Let O be ? ToObject(V).
    // 2. Return ? O.[[Get]](P, V).
    crate::ecmascript::types::get_value(agent, &mut reference)
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
///
/// The abstract operation Set takes arguments O (an Object), P (a property
/// key), V (an ECMAScript language value), and Throw (a Boolean) and returns
/// either a normal completion containing UNUSED or a throw completion. It is
/// used to set the value of a specific property of an object. V is the new
/// value for the property.
pub(crate) fn set(agent: &Agent, o: Object, p: PropertyKey, v: Value, throw: bool) -> JsResult<()> {
    // 1. Let success be ? O.[[Set]](P, V, O).
    let success = o.internal_set(agent, p, v, Value::Object(o))?;
    // 2. If success is false and Throw is true, throw a TypeError exception.
    if !success && throw {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Cannot assign to read only property '{}' of object",
                p.to_display(agent)
            ),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.5 CreateDataProperty ( O, P, V )](https://tc39.es/ecma262/#sec-createdataproperty)
///
/// The abstract operation CreateDataProperty takes arguments O (an Object),
/// P (a property key), and V (an ECMAScript language value) and returns
/// either a normal completion containing a Boolean or a throw completion. It
/// is used to create a new own property of an object.
///
/// > NOTE: This abstract operation creates a property whose attributes are
/// > set to the same defaults used for properties created by the ECMAScript
/// > language assignment operator. Normally, the property will not already
/// > exist. If it does exist and is not configurable or if O is not
/// > extensible, \[\[DefineOwnProperty\]\] will return false.
pub(crate) fn create_data_property(
    agent: &Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
) -> JsResult<bool> {
    // 1. Let newDesc be the PropertyDescriptor { [[Value]]: V, [[Writable]]:
    // true, [[Enumerable]]: true, [[Configurable]]: true }.
    let new_desc = PropertyDescriptor::new_data_descriptor(v);
    // 2. Return ? O.[[DefineOwnProperty]](P, newDesc).
    o.internal_define_own_property(agent, p, new_desc)
}

/// ### [7.3.7 CreateDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createdatapropertyorthrow)
pub(crate) fn create_data_property_or_throw(
    agent: &Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
) -> JsResult<()> {
    // 1. Let success be ? CreateDataProperty(O, P, V).
    let success = create_data_property(agent, o, p, v)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot define property '{}'", p.to_display(agent)),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.8 CreateNonEnumerableDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createnonenumerabledatapropertyorthrow)
pub(crate) fn create_non_enumerable_data_property_or_throw(
    agent: &Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
) -> JsResult<()> {
    // 1. Assert: O is an ordinary, extensible object with no non-configurable
    // properties.
    // 2. Let newDesc be the PropertyDescriptor { [[Value]]: V, [[Writable]]:
    // true, [[Enumerable]]: false, [[Configurable]]: true }.
    let new_desc = PropertyDescriptor {
        value: Some(v),
        writable: Some(true),
        enumerable: Some(false),
        configurable: Some(true),
        ..Default::default()
    };
    // 3. Perform ! DefinePropertyOrThrow(O, P, newDesc).
    define_property_or_throw(agent, o, p, new_desc)
}

/// ### [7.3.9 DefinePropertyOrThrow ( O, P, desc )](https://tc39.es/ecma262/#sec-definepropertyorthrow)
///
/// The abstract operation DefinePropertyOrThrow takes arguments O (an
/// Object), P (a property key), and desc (a Property Descriptor) and returns
/// either a normal completion containing UNUSED or a throw completion. It is
/// used to call the \[\[DefineOwnProperty\]\] internal method of an object
/// in a manner that will throw a TypeError exception if the requested
/// property update cannot be performed.
pub(crate) fn define_property_or_throw(
    agent: &Agent,
    o: Object,
    p: PropertyKey,
    desc: PropertyDescriptor,
) -> JsResult<()> {
    // 1. Let success be ? O.[[DefineOwnProperty]](P, desc).
    let success = o.internal_define_own_property(agent, p, desc)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot redefine property: {}", p.to_display(agent)),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.10 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub(crate) fn delete_property_or_throw(agent: &Agent, o: Object, p: PropertyKey) -> JsResult<()> {
    // 1. Let success be ? O.[[Delete]](P).
    let success = o.internal_delete(agent, p)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot delete property '{}'", p.to_display(agent)),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.11 GetMethod ( V, P )](https://tc39.es/ecma262/#sec-getmethod)
///
/// The abstract operation GetMethod takes arguments V (an ECMAScript
/// language value) and P (a property key) and returns either a normal
/// completion containing either a function object or undefined, or a throw
/// completion. It is used to get the value of a specific property of an
/// ECMAScript language value when the value of the property is expected to
/// be a function.
pub(crate) fn get_method(agent: &Agent, v: Value, p: PropertyKey) -> JsResult<Option<Object>> {
    // 1. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p)?;
    // 2. If func is either undefined or null, return undefined.
    if func.is_nullish() {
        return Ok(None);
    }
    // 3. If IsCallable(func) is false, throw a TypeError exception.
    match func {
        Value::Object(func) if is_callable(agent, Value::Object(func)) => {
            // 4. Return func.
            Ok(Some(func))
        }
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{} is not a function", func.to_display_string(agent)),
        )),
    }
}

/// ### [7.3.12 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
pub(crate) fn has_property(agent: &Agent, o: Object, p: PropertyKey) -> JsResult<bool> {
    // 1. Return ? O.[[HasProperty]](P).
    o.internal_has_property(agent, p)
}

/// ### [7.3.13 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub(crate) fn has_own_property(agent: &Agent, o: Object, p: PropertyKey) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    // 2. If desc is undefined, return false.
    // 3. Return true.
    Ok(o.internal_get_own_property(agent, p)?.is_some())
}

/// ### [7.3.14 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
///
/// The abstract operation Call takes arguments F (an ECMAScript language
/// value) and V (an ECMAScript language value) and optional argument
/// argumentsList (a List of ECMAScript language values) and returns either a
/// normal completion containing an ECMAScript language value or a throw
/// completion. It is used to call the \[\[Call\]\] internal method of a
/// function object. F is the function object, V is an ECMAScript language
/// value that is the this value of the \[\[Call\]\], and argumentsList is
/// the value passed to the corresponding argument of the internal method.
/// If argumentsList is not present, a new empty List is used as its value.
pub(crate) fn call(agent: &Agent, f: Value, v: Value, arguments_list: &[Value]) -> JsResult<Value> {
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    match f {
        Value::Object(f) if is_callable(agent, Value::Object(f)) => {
            // 3. Return ? F.[[Call]](V, argumentsList).
            call_function(agent, f, v, arguments_list)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{} is not a function", f.to_display_string(agent)),
        )),
    }
}

/// The \[\[Call\]\] internal method of a function object.
pub(crate) fn call_function(
    agent: &Agent,
    f: Object,
    this_argument: Value,
    arguments_list: &[Value],
) -> JsResult<Value> {
    agent.check_call_depth()?;
    let arguments_list = ArgumentsList(arguments_list);
    let kind = match &agent.object(f).kind {
        ObjectKind::ECMAScriptFunction(_) => 0,
        ObjectKind::BuiltinFunction(_) | ObjectKind::BuiltinClosure(_) => 1,
        ObjectKind::BoundFunction(_) => 2,
        ObjectKind::Proxy(data) if data.is_callable => 3,
        _ => 4,
    };
    match kind {
        0 => ecmascript_function_call(agent, f, this_argument, arguments_list),
        1 => builtin_call(agent, f, this_argument, arguments_list),
        2 => bound_function_call(agent, f, arguments_list),
        3 => proxy_call(agent, f, this_argument, arguments_list),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "object is not a function",
        )),
    }
}

/// ### [7.3.15 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
///
/// The abstract operation Construct takes argument F (a constructor) and
/// optional arguments argumentsList (a List of ECMAScript language values)
/// and newTarget (a constructor) and returns either a normal completion
/// containing an Object or a throw completion. It is used to call the
/// \[\[Construct\]\] internal method of a function object. argumentsList and
/// newTarget are the values to be passed as the corresponding arguments of
/// the internal method. If argumentsList is not present, a new empty List is
/// used as its value. If newTarget is not present, F is used as its value.
pub(crate) fn construct(
    agent: &Agent,
    f: Object,
    arguments_list: &[Value],
    new_target: Option<Object>,
) -> JsResult<Object> {
    agent.check_call_depth()?;
    // 1. If newTarget is not present, set newTarget to F.
    let new_target = new_target.unwrap_or(f);
    let arguments_list = ArgumentsList(arguments_list);
    // 2. If argumentsList is not present, set argumentsList to a new empty
    // List.
    // 3. Return ? F.[[Construct]](argumentsList, newTarget).
    let kind = match &agent.object(f).kind {
        ObjectKind::ECMAScriptFunction(_) => 0,
        ObjectKind::BuiltinFunction(_) | ObjectKind::BuiltinClosure(_) => 1,
        ObjectKind::BoundFunction(_) => 2,
        ObjectKind::Proxy(data) if data.is_constructor => 3,
        _ => 4,
    };
    match kind {
        0 => ecmascript_function_construct(agent, f, arguments_list, new_target),
        1 => builtin_construct(agent, f, arguments_list, new_target),
        2 => bound_function_construct(agent, f, arguments_list, new_target),
        3 => proxy_construct(agent, f, arguments_list, new_target),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "object is not a constructor",
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntegrityLevel {
    Sealed,
    Frozen,
}

/// ### [7.3.16 SetIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-setintegritylevel)
pub(crate) fn set_integrity_level(
    agent: &Agent,
    o: Object,
    level: IntegrityLevel,
) -> JsResult<bool> {
    // 1. Let status be ? O.[[PreventExtensions]]().
    let status = o.internal_prevent_extensions(agent)?;
    // 2. If status is false, return false.
    if !status {
        return Ok(false);
    }
    // 3. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    match level {
        // 4. If level is SEALED, then
        IntegrityLevel::Sealed => {
            // a. For each element k of keys, do
            for k in keys {
                // i. Perform ? DefinePropertyOrThrow(O, k, PropertyDescriptor {
                // [[Configurable]]: false }).
                define_property_or_throw(
                    agent,
                    o,
                    k,
                    PropertyDescriptor {
                        configurable: Some(false),
                        ..Default::default()
                    },
                )?;
            }
        }
        // 5. Else,
        IntegrityLevel::Frozen => {
            // a. Assert: level is FROZEN.
            // b. For each element k of keys, do
            for k in keys {
                // i. Let currentDesc be ? O.[[GetOwnProperty]](k).
                // ii. If currentDesc is not undefined, then
                if let Some(current_desc) = o.internal_get_own_property(agent, k)? {
                    // 1. If IsAccessorDescriptor(currentDesc) is true, then
                    let desc = if current_desc.is_accessor_descriptor() {
                        // a. Let desc be the PropertyDescriptor {
                        // [[Configurable]]: false }.
                        PropertyDescriptor {
                            configurable: Some(false),
                            ..Default::default()
                        }
                    } else {
                        // 2. Else,
                        // a. Let desc be the PropertyDescriptor {
                        // [[Configurable]]: false, [[Writable]]: false }.
                        PropertyDescriptor {
                            configurable: Some(false),
                            writable: Some(false),
                            ..Default::default()
                        }
                    };
                    // 3. Perform ? DefinePropertyOrThrow(O, k, desc).
                    define_property_or_throw(agent, o, k, desc)?;
                }
            }
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.17 TestIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-testintegritylevel)
pub(crate) fn test_integrity_level(
    agent: &Agent,
    o: Object,
    level: IntegrityLevel,
) -> JsResult<bool> {
    // 1. Let extensible be ? IsExtensible(O).
    // 2. NOTE: If the object is extensible, none of its properties are
    // examined.
    // 3. If extensible is true, return false.
    if o.internal_is_extensible(agent)? {
        return Ok(false);
    }
    // 4. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    // 5. For each element k of keys, do
    for k in keys {
        // a. Let currentDesc be ? O.[[GetOwnProperty]](k).
        // b. If currentDesc is not undefined, then
        if let Some(current_desc) = o.internal_get_own_property(agent, k)? {
            // i. If currentDesc.[[Configurable]] is true, return false.
            if current_desc.configurable == Some(true) {
                return Ok(false);
            }
            // ii. If level is FROZEN and IsDataDescriptor(currentDesc) is
            // true, then
            // 1. If currentDesc.[[Writable]] is true, return false.
            if level == IntegrityLevel::Frozen
                && current_desc.is_data_descriptor()
                && current_desc.writable == Some(true)
            {
                return Ok(false);
            }
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.18 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub(crate) fn create_array_from_list(agent: &Agent, elements: &[Value]) -> Object {
    // 1. Let array be ! ArrayCreate(0).
    let array = array_create(agent, 0, None);
    // 2. Let n be 0.
    // 3. For each element e of elements, do
    for (n, e) in elements.iter().enumerate() {
        // a. Perform ! CreateDataPropertyOrThrow(array, ! ToString(𝔽(n)), e).
        // b. Set n to n + 1.
        let key = PropertyKey::from_index(agent, n as u64);
        array.set_data_slot(agent, key, *e);
    }
    let length = PropertyKey::from_str(agent, "length");
    array.set_data_slot(agent, length, Value::from(elements.len()));
    // 4. Return array.
    array
}

/// ### [7.3.19 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
pub(crate) fn length_of_array_like(agent: &Agent, obj: Object) -> JsResult<u64> {
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    let length = get(agent, obj, PropertyKey::from_str(agent, "length"))?;
    to_length(agent, length)
}

/// ### [7.3.20 CreateListFromArrayLike ( obj \[ , elementTypes \] )](https://tc39.es/ecma262/#sec-createlistfromarraylike)
pub(crate) fn create_list_from_array_like(agent: &Agent, obj: Value) -> JsResult<Vec<Value>> {
    // 2. If obj is not an Object, throw a TypeError exception.
    let Value::Object(object) = obj else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "CreateListFromArrayLike called on non-object",
        ));
    };
    // 3. Let len be ? LengthOfArrayLike(obj).
    let len = length_of_array_like(agent, object)?;
    // 4. Let list be a new empty List.
    let mut list = Vec::with_capacity(len.min(1024) as usize);
    // 5. Let index be 0.
    // 6. Repeat, while index < len,
    for index in 0..len {
        // a. Let indexName be ! ToString(𝔽(index)).
        let index_name = PropertyKey::from_index(agent, index);
        // b. Let next be ? Get(obj, indexName).
        let next = get(agent, object, index_name)?;
        // d. Append next to list.
        // e. Set index to index + 1.
        list.push(next);
    }
    // 7. Return list.
    Ok(list)
}

/// CreateListFromArrayLike with elementTypes « String, Symbol ».
pub(crate) fn create_property_key_list_from_array_like(
    agent: &Agent,
    obj: Value,
) -> JsResult<Vec<PropertyKey>> {
    let list = create_list_from_array_like(agent, obj)?;
    list.into_iter()
        .map(|next| match next {
            // c. If elementTypes does not contain Type(next), throw a
            // TypeError exception.
            Value::String(_) | Value::Symbol(_) => to_property_key(agent, next),
            _ => Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("{} is not a valid property name", next.to_display_string(agent)),
            )),
        })
        .collect()
}

/// ### [7.3.21 Invoke ( V, P \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-invoke)
pub(crate) fn invoke(
    agent: &Agent,
    v: Value,
    p: PropertyKey,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. If argumentsList is not present, set argumentsList to a new empty
    // List.
    // 2. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p)?;
    // 3. Return ? Call(func, V, argumentsList).
    call(agent, func, v, arguments_list)
}

/// ### [7.3.22 OrdinaryHasInstance ( C, O )](https://tc39.es/ecma262/#sec-ordinaryhasinstance)
pub(crate) fn ordinary_has_instance(agent: &Agent, c: Value, o: Value) -> JsResult<bool> {
    // 1. If IsCallable(C) is false, return false.
    let Value::Object(c) = c else {
        return Ok(false);
    };
    if !is_callable(agent, Value::Object(c)) {
        return Ok(false);
    }
    // 2. If C has a [[BoundTargetFunction]] internal slot, then
    let bound_target = match &agent.object(c).kind {
        ObjectKind::BoundFunction(data) => Some(data.bound_target_function),
        _ => None,
    };
    if let Some(bc) = bound_target {
        // a. Let BC be C.[[BoundTargetFunction]].
        // b. Return ? InstanceofOperator(O, BC).
        return instance_of_operator(agent, o, Value::Object(bc));
    }
    // 3. If O is not an Object, return false.
    let Value::Object(mut o) = o else {
        return Ok(false);
    };
    // 4. Let P be ? Get(C, "prototype").
    let p = get(agent, c, PropertyKey::from_str(agent, "prototype"))?;
    // 5. If P is not an Object, throw a TypeError exception.
    let Value::Object(p) = p else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Function has non-object prototype in instanceof check",
        ));
    };
    // 6. Repeat,
    loop {
        // a. Set O to ? O.[[GetPrototypeOf]]().
        let Some(prototype) = o.internal_get_prototype_of(agent)? else {
            // b. If O is null, return false.
            return Ok(false);
        };
        // c. If SameValue(P, O) is true, return true.
        if prototype == p {
            return Ok(true);
        }
        o = prototype;
    }
}

/// ### [13.10.2 InstanceofOperator ( V, target )](https://tc39.es/ecma262/#sec-instanceofoperator)
pub(crate) fn instance_of_operator(agent: &Agent, v: Value, target: Value) -> JsResult<bool> {
    // 1. If target is not an Object, throw a TypeError exception.
    if !target.is_object() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Right-hand side of 'instanceof' is not an object: {}",
                target.to_display_string(agent)
            ),
        ));
    }
    // 2. Let instOfHandler be ? GetMethod(target, @@hasInstance).
    let inst_of_handler = get_method(agent, target, PropertyKey::Symbol(Symbol::HAS_INSTANCE))?;
    // 3. If instOfHandler is not undefined, then
    if let Some(handler) = inst_of_handler {
        // a. Return ToBoolean(? Call(instOfHandler, target, « V »)).
        let result = call_function(agent, handler, target, &[v])?;
        return Ok(super::type_conversion::to_boolean(agent, result));
    }
    // 4. If IsCallable(target) is false, throw a TypeError exception.
    if !is_callable(agent, target) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Right-hand side of 'instanceof' is not callable",
        ));
    }
    // 5. Return ? OrdinaryHasInstance(target, V).
    ordinary_has_instance(agent, target, v)
}

/// ### [7.3.23 SpeciesConstructor ( O, defaultConstructor )](https://tc39.es/ecma262/#sec-speciesconstructor)
pub(crate) fn species_constructor(
    agent: &Agent,
    o: Object,
    default_constructor: Object,
) -> JsResult<Object> {
    // 1. Let C be ? Get(O, "constructor").
    let c = get(agent, o, PropertyKey::from_str(agent, "constructor"))?;
    // 2. If C is undefined, return defaultConstructor.
    if c.is_undefined() {
        return Ok(default_constructor);
    }
    // 3. If C is not an Object, throw a TypeError exception.
    let Value::Object(c) = c else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "object.constructor is not an object",
        ));
    };
    // 4. Let S be ? Get(C, @@species).
    let s = get(agent, c, PropertyKey::Symbol(Symbol::SPECIES))?;
    // 5. If S is either undefined or null, return defaultConstructor.
    if s.is_nullish() {
        return Ok(default_constructor);
    }
    // 6. If IsConstructor(S) is true, return S.
    if let Value::Object(s) = s
        && is_constructor(agent, Value::Object(s))
    {
        return Ok(s);
    }
    // 7. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "object.constructor[Symbol.species] is not a constructor",
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumerablePropertiesKind {
    Key,
    Value,
    KeyValue,
}

/// ### [7.3.24 EnumerableOwnProperties ( O, kind )](https://tc39.es/ecma262/#sec-enumerableownproperties)
pub(crate) fn enumerable_own_properties(
    agent: &Agent,
    o: Object,
    kind: EnumerablePropertiesKind,
) -> JsResult<Vec<Value>> {
    // 1. Let ownKeys be ? O.[[OwnPropertyKeys]]().
    let own_keys = o.internal_own_property_keys(agent)?;
    // 2. Let results be a new empty List.
    let mut results = Vec::with_capacity(own_keys.len());
    // 3. For each element key of ownKeys, do
    for key in own_keys {
        // a. If key is a String, then
        if key.is_symbol() {
            continue;
        }
        // i. Let desc be ? O.[[GetOwnProperty]](key).
        let desc = o.internal_get_own_property(agent, key)?;
        // ii. If desc is not undefined and desc.[[Enumerable]] is true, then
        if !desc.is_some_and(|desc| desc.enumerable == Some(true)) {
            continue;
        }
        let key_value = key.into_value(agent);
        // 1. If kind is KEY, then
        if kind == EnumerablePropertiesKind::Key {
            // a. Append key to results.
            results.push(key_value);
            continue;
        }
        // 2. Else,
        // a. Let value be ? Get(O, key).
        let value = get(agent, o, key)?;
        // b. If kind is VALUE, then
        if kind == EnumerablePropertiesKind::Value {
            // i. Append value to results.
            results.push(value);
        } else {
            // c. Else,
            // i. Assert: kind is KEY+VALUE.
            // ii. Let entry be CreateArrayFromList(« key, value »).
            let entry = create_array_from_list(agent, &[key_value, value]);
            // iii. Append entry to results.
            results.push(Value::Object(entry));
        }
    }
    // 4. Return results.
    Ok(results)
}

/// ### [7.3.25 GetFunctionRealm ( obj )](https://tc39.es/ecma262/#sec-getfunctionrealm)
pub(crate) fn get_function_realm(agent: &Agent, obj: Object) -> JsResult<Realm> {
    enum Next {
        Realm(Realm),
        Object(Object),
        Revoked,
        Current,
    }
    let next = match &agent.object(obj).kind {
        // 1. If obj has a [[Realm]] internal slot, then
        // a. Return obj.[[Realm]].
        ObjectKind::ECMAScriptFunction(data) => Next::Realm(data.realm),
        ObjectKind::BuiltinFunction(data) => Next::Realm(data.realm),
        ObjectKind::BuiltinClosure(data) => Next::Realm(data.realm),
        // 2. If obj is a bound function exotic object, then
        // a. Let boundTargetFunction be obj.[[BoundTargetFunction]].
        // b. Return ? GetFunctionRealm(boundTargetFunction).
        ObjectKind::BoundFunction(data) => Next::Object(data.bound_target_function),
        // 3. If obj is a Proxy exotic object, then
        ObjectKind::Proxy(data) => match data.target {
            // b. Let proxyTarget be obj.[[ProxyTarget]].
            // c. Return ? GetFunctionRealm(proxyTarget).
            Some(target) => Next::Object(target),
            // a. Perform ? ValidateNonRevokedProxy(obj).
            None => Next::Revoked,
        },
        // 4. Return the current Realm Record.
        _ => Next::Current,
    };
    match next {
        Next::Realm(realm) => Ok(realm),
        Next::Object(object) => get_function_realm(agent, object),
        Next::Revoked => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot perform operation on a revoked proxy",
        )),
        Next::Current => Ok(agent.current_realm()),
    }
}

/// ### [7.3.26 CopyDataProperties ( target, source, excludedItems )](https://tc39.es/ecma262/#sec-copydataproperties)
pub(crate) fn copy_data_properties(
    agent: &Agent,
    target: Object,
    source: Value,
    excluded_items: &[PropertyKey],
) -> JsResult<()> {
    // 1. If source is either undefined or null, return UNUSED.
    if source.is_nullish() {
        return Ok(());
    }
    // 2. Let from be ! ToObject(source).
    let from = super::type_conversion::to_object(agent, source)?;
    // 3. Let keys be ? from.[[OwnPropertyKeys]]().
    let keys = from.internal_own_property_keys(agent)?;
    // 4. For each element nextKey of keys, do
    for next_key in keys {
        // a. Let excluded be false.
        // b. For each element e of excludedItems, do
        // i. If SameValue(e, nextKey) is true, then
        // 1. Set excluded to true.
        if excluded_items.contains(&next_key) {
            continue;
        }
        // c. If excluded is false, then
        // i. Let desc be ? from.[[GetOwnProperty]](nextKey).
        let desc = from.internal_get_own_property(agent, next_key)?;
        // ii. If desc is not undefined and desc.[[Enumerable]] is true, then
        if desc.is_some_and(|desc| desc.enumerable == Some(true)) {
            // 1. Let propValue be ? Get(from, nextKey).
            let prop_value = get(agent, from, next_key)?;
            // 2. Perform ! CreateDataPropertyOrThrow(target, nextKey, propValue).
            create_data_property_or_throw(agent, target, next_key, prop_value)?;
        }
    }
    // 5. Return UNUSED.
    Ok(())
}

/// ### [7.3.27 PrivateElementFind ( O, P )](https://tc39.es/ecma262/#sec-privateelementfind)
pub(crate) fn private_element_find(
    agent: &Agent,
    o: Object,
    p: PrivateName,
) -> Option<PrivateElement> {
    // 1. If O.[[PrivateElements]] contains a PrivateElement pe such that
    // pe.[[Key]] is P, then
    // a. Return pe.
    // 2. Return EMPTY.
    agent
        .object(o)
        .private_elements
        .iter()
        .find(|element| element.key == p)
        .copied()
}

fn private_name_display(agent: &Agent, p: PrivateName) -> String {
    p.description(agent).to_rust_string(agent)
}

/// ### [7.3.28 PrivateFieldAdd ( O, P, value )](https://tc39.es/ecma262/#sec-privatefieldadd)
pub(crate) fn private_field_add(
    agent: &Agent,
    o: Object,
    p: PrivateName,
    value: Value,
) -> JsResult<()> {
    // 1. If the host is a web browser, then
    // a. Perform ? HostEnsureCanAddPrivateElement(O).
    // 2. Let entry be PrivateElementFind(O, P).
    // 3. If entry is not EMPTY, throw a TypeError exception.
    if private_element_find(agent, o, p).is_some() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Cannot initialize {} twice on the same object",
                private_name_display(agent, p)
            ),
        ));
    }
    // 4. Append PrivateElement { [[Key]]: P, [[Kind]]: FIELD, [[Value]]:
    // value } to O.[[PrivateElements]].
    agent.object_mut(o).private_elements.push(PrivateElement {
        key: p,
        kind: PrivateElementKind::Field(value),
    });
    // 5. Return UNUSED.
    Ok(())
}

/// ### [7.3.29 PrivateMethodOrAccessorAdd ( O, method )](https://tc39.es/ecma262/#sec-privatemethodoraccessoradd)
pub(crate) fn private_method_or_accessor_add(
    agent: &Agent,
    o: Object,
    method: PrivateElement,
) -> JsResult<()> {
    // 1. Assert: method.[[Kind]] is either METHOD or ACCESSOR.
    // 3. Let entry be PrivateElementFind(O, method.[[Key]]).
    // 4. If entry is not EMPTY, throw a TypeError exception.
    if private_element_find(agent, o, method.key).is_some() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Cannot initialize private methods of class {} twice on the same object",
                private_name_display(agent, method.key)
            ),
        ));
    }
    // 5. Append method to O.[[PrivateElements]].
    agent.object_mut(o).private_elements.push(method);
    // 6. Return UNUSED.
    Ok(())
}

/// ### [7.3.31 PrivateGet ( O, P )](https://tc39.es/ecma262/#sec-privateget)
pub(crate) fn private_get(agent: &Agent, o: Object, p: PrivateName) -> JsResult<Value> {
    // 1. Let entry be PrivateElementFind(O, P).
    // 2. If entry is EMPTY, throw a TypeError exception.
    let Some(entry) = private_element_find(agent, o, p) else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Cannot read private member {} from an object whose class did not declare it",
                private_name_display(agent, p)
            ),
        ));
    };
    match entry.kind {
        // 3. If entry.[[Kind]] is either FIELD or METHOD, then
        // a. Return entry.[[Value]].
        PrivateElementKind::Field(value) => Ok(value),
        PrivateElementKind::Method(method) => Ok(Value::Object(method)),
        // 4. Assert: entry.[[Kind]] is ACCESSOR.
        PrivateElementKind::Accessor { get, .. } => {
            // 5. If entry.[[Get]] is undefined, throw a TypeError exception.
            let Some(getter) = get else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("'{}' was defined without a getter", private_name_display(agent, p)),
                ));
            };
            // 6. Let getter be entry.[[Get]].
            // 7. Return ? Call(getter, O).
            call_function(agent, getter, Value::Object(o), &[])
        }
    }
}

/// ### [7.3.32 PrivateSet ( O, P, value )](https://tc39.es/ecma262/#sec-privateset)
pub(crate) fn private_set(agent: &Agent, o: Object, p: PrivateName, value: Value) -> JsResult<()> {
    // 1. Let entry be PrivateElementFind(O, P).
    // 2. If entry is EMPTY, throw a TypeError exception.
    let Some(entry) = private_element_find(agent, o, p) else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Cannot write private member {} to an object whose class did not declare it",
                private_name_display(agent, p)
            ),
        ));
    };
    match entry.kind {
        // 3. If entry.[[Kind]] is FIELD, then
        PrivateElementKind::Field(_) => {
            // a. Set entry.[[Value]] to value.
            let mut object = agent.object_mut(o);
            if let Some(element) = object
                .private_elements
                .iter_mut()
                .find(|element| element.key == p)
            {
                element.kind = PrivateElementKind::Field(value);
            }
            Ok(())
        }
        // 4. Else if entry.[[Kind]] is METHOD, then
        // a. Throw a TypeError exception.
        PrivateElementKind::Method(_) => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Private method {} is not writable",
                private_name_display(agent, p)
            ),
        )),
        // 5. Else,
        PrivateElementKind::Accessor { set, .. } => {
            // a. Assert: entry.[[Kind]] is ACCESSOR.
            // b. If entry.[[Set]] is undefined, throw a TypeError exception.
            let Some(setter) = set else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("'{}' was defined without a setter", private_name_display(agent, p)),
                ));
            };
            // c. Let setter be entry.[[Set]].
            // d. Perform ? Call(setter, O, « value »).
            call_function(agent, setter, Value::Object(o), &[value])?;
            // 6. Return UNUSED.
            Ok(())
        }
    }
}
