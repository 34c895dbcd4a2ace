// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.5 Proxy Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots)
//!
//! A Proxy object is an exotic object whose essential internal methods are
//! partially implemented using ECMAScript code. Every Proxy object has an
//! internal slot called \[\[ProxyHandler\]\]. The value of
//! \[\[ProxyHandler\]\] is an object, called the proxy's handler object, or
//! null. Methods of a handler object may be used to augment the
//! implementation for one or more of the Proxy object's internal methods.
//! Every Proxy object also has an internal slot called \[\[ProxyTarget\]\]
//! whose value is either an object or null. This object is called the
//! proxy's target object.

use ahash::AHashSet;

use super::{ArgumentsList, ordinary::is_compatible_property_descriptor};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call, call_function, construct, create_array_from_list,
            create_property_key_list_from_array_like, get_method,
        },
        testing_and_comparison::{is_callable, is_constructor, is_extensible, same_value},
        type_conversion::to_boolean,
    },
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{
        InternalMethods, Object, ObjectHeapData, ObjectKind, PropertyDescriptor, PropertyKey,
        Value,
    },
};

/// The internal slots of a Proxy exotic object. Both slots are None once
/// the proxy is revoked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProxyData {
    /// ### \[\[ProxyTarget\]\]
    pub(crate) target: Option<Object>,
    /// ### \[\[ProxyHandler\]\]
    pub(crate) handler: Option<Object>,
    /// The target was callable when the proxy was created.
    pub(crate) is_callable: bool,
    /// The target was a constructor when the proxy was created.
    pub(crate) is_constructor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProxyObject(pub(crate) Object);

/// The \[\[ProxyTarget\]\] of a proxy, or None if it has been revoked.
pub(crate) fn proxy_target(agent: &Agent, o: Object) -> Option<Object> {
    match &agent.object(o).kind {
        ObjectKind::Proxy(data) => data.target,
        _ => None,
    }
}

/// Revoke a proxy: set both its slots to null.
pub(crate) fn proxy_revoke(agent: &Agent, o: Object) {
    if let ObjectKind::Proxy(data) = &mut agent.object_mut(o).kind {
        data.target = None;
        data.handler = None;
    }
}

/// ### [10.5.14 ValidateNonRevokedProxy ( proxy )](https://tc39.es/ecma262/#sec-validatenonrevokedproxy)
///
/// Returns the target and handler of a proxy that has not been revoked.
fn validate_non_revoked_proxy(agent: &Agent, proxy: Object) -> JsResult<(Object, Object)> {
    let (target, handler) = match &agent.object(proxy).kind {
        ObjectKind::Proxy(data) => (data.target, data.handler),
        _ => (None, None),
    };
    match (target, handler) {
        (Some(target), Some(handler)) => Ok((target, handler)),
        // 1. If proxy.[[ProxyTarget]] is null, throw a TypeError exception.
        // 2. Assert: proxy.[[ProxyHandler]] is not null.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot perform operation on a revoked proxy",
        )),
    }
}

fn trap(agent: &Agent, handler: Object, name: &str) -> JsResult<Option<Object>> {
    get_method(agent, Value::Object(handler), PropertyKey::from_str(agent, name))
}

fn invariant_violation(
    agent: &Agent,
    trap: &str,
    message: &str,
) -> crate::ecmascript::execution::JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("'{trap}' on proxy: {message}"),
    )
}

impl InternalMethods for ProxyObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.5.1 \[\[GetPrototypeOf\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getprototypeof)
    fn internal_get_prototype_of(self, agent: &Agent) -> JsResult<Option<Object>> {
        // 1. Perform ? ValidateNonRevokedProxy(O).
        // 2. Let target be O.[[ProxyTarget]].
        // 3. Let handler be O.[[ProxyHandler]].
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 4. Assert: handler is an Object.
        // 5. Let trap be ? GetMethod(handler, "getPrototypeOf").
        let Some(trap) = trap(agent, handler, "getPrototypeOf")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[GetPrototypeOf]]().
            return target.internal_get_prototype_of(agent);
        };
        // 7. Let handlerProto be ? Call(trap, handler, « target »).
        let handler_proto = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target)],
        )?;
        // 8. If handlerProto is not an Object and handlerProto is not null,
        // throw a TypeError exception.
        let handler_proto = match handler_proto {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => {
                return Err(invariant_violation(
                    agent,
                    "getPrototypeOf",
                    "trap returned neither object nor null",
                ));
            }
        };
        // 9. Let extensibleTarget be ? IsExtensible(target).
        // 10. If extensibleTarget is true, return handlerProto.
        if is_extensible(agent, target)? {
            return Ok(handler_proto);
        }
        // 11. Let targetProto be ? target.[[GetPrototypeOf]]().
        let target_proto = target.internal_get_prototype_of(agent)?;
        // 12. If SameValue(handlerProto, targetProto) is false, throw a
        // TypeError exception.
        if handler_proto != target_proto {
            return Err(invariant_violation(
                agent,
                "getPrototypeOf",
                "proxy target is non-extensible but the trap did not return its actual prototype",
            ));
        }
        // 13. Return handlerProto.
        Ok(handler_proto)
    }

    /// ### [10.5.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-setprototypeof-v)
    fn internal_set_prototype_of(self, agent: &Agent, prototype: Option<Object>) -> JsResult<bool> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "setPrototypeOf").
        let Some(trap) = trap(agent, handler, "setPrototypeOf")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[SetPrototypeOf]](V).
            return target.internal_set_prototype_of(agent, prototype);
        };
        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target, V »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target), Value::from(prototype)],
        )?;
        // 8. If booleanTrapResult is false, return false.
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        // 9. Let extensibleTarget be ? IsExtensible(target).
        // 10. If extensibleTarget is true, return true.
        if is_extensible(agent, target)? {
            return Ok(true);
        }
        // 11. Let targetProto be ? target.[[GetPrototypeOf]]().
        let target_proto = target.internal_get_prototype_of(agent)?;
        // 12. If SameValue(V, targetProto) is false, throw a TypeError
        // exception.
        if prototype != target_proto {
            return Err(invariant_violation(
                agent,
                "setPrototypeOf",
                "trap returned truish for setting a new prototype on the non-extensible proxy target",
            ));
        }
        // 13. Return true.
        Ok(true)
    }

    /// ### [10.5.3 \[\[IsExtensible\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-isextensible)
    fn internal_is_extensible(self, agent: &Agent) -> JsResult<bool> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "isExtensible").
        let Some(trap) = trap(agent, handler, "isExtensible")? else {
            // 6. If trap is undefined, then
            // a. Return ? IsExtensible(target).
            return is_extensible(agent, target);
        };
        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target)],
        )?;
        let boolean_trap_result = to_boolean(agent, result);
        // 8. Let targetResult be ? IsExtensible(target).
        let target_result = is_extensible(agent, target)?;
        // 9. If booleanTrapResult is not targetResult, throw a TypeError
        // exception.
        if boolean_trap_result != target_result {
            return Err(invariant_violation(
                agent,
                "isExtensible",
                "trap result does not reflect extensibility of proxy target",
            ));
        }
        // 10. Return booleanTrapResult.
        Ok(boolean_trap_result)
    }

    /// ### [10.5.4 \[\[PreventExtensions\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-preventextensions)
    fn internal_prevent_extensions(self, agent: &Agent) -> JsResult<bool> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "preventExtensions").
        let Some(trap) = trap(agent, handler, "preventExtensions")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[PreventExtensions]]().
            return target.internal_prevent_extensions(agent);
        };
        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target)],
        )?;
        let boolean_trap_result = to_boolean(agent, result);
        // 8. If booleanTrapResult is true, then
        // a. Let extensibleTarget be ? IsExtensible(target).
        // b. If extensibleTarget is true, throw a TypeError exception.
        if boolean_trap_result && is_extensible(agent, target)? {
            return Err(invariant_violation(
                agent,
                "preventExtensions",
                "trap returned truish but the proxy target is extensible",
            ));
        }
        // 9. Return booleanTrapResult.
        Ok(boolean_trap_result)
    }

    /// ### [10.5.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        const TRAP: &str = "getOwnPropertyDescriptor";
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "getOwnPropertyDescriptor").
        let Some(trap) = trap(agent, handler, TRAP)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[GetOwnProperty]](P).
            return target.internal_get_own_property(agent, property_key);
        };
        // 7. Let trapResultObj be ? Call(trap, handler, « target, P »).
        let trap_result_obj = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target), property_key.into_value(agent)],
        )?;
        // 8. If trapResultObj is not an Object and trapResultObj is not
        // undefined, throw a TypeError exception.
        if !trap_result_obj.is_object() && !trap_result_obj.is_undefined() {
            return Err(invariant_violation(
                agent,
                TRAP,
                "trap returned neither object nor undefined",
            ));
        }
        // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
        let target_desc = target.internal_get_own_property(agent, property_key)?;
        // 10. If trapResultObj is undefined, then
        if trap_result_obj.is_undefined() {
            // a. If targetDesc is undefined, return undefined.
            let Some(target_desc) = target_desc else {
                return Ok(None);
            };
            // b. If targetDesc.[[Configurable]] is false, throw a TypeError
            // exception.
            if target_desc.configurable == Some(false) {
                return Err(invariant_violation(
                    agent,
                    TRAP,
                    "trap returned undefined for a non-configurable property",
                ));
            }
            // c. Let extensibleTarget be ? IsExtensible(target).
            // d. If extensibleTarget is false, throw a TypeError exception.
            if !is_extensible(agent, target)? {
                return Err(invariant_violation(
                    agent,
                    TRAP,
                    "trap returned undefined for a property of a non-extensible target",
                ));
            }
            // e. Return undefined.
            return Ok(None);
        }
        // 11. Let extensibleTarget be ? IsExtensible(target).
        let extensible_target = is_extensible(agent, target)?;
        // 12. Let resultDesc be ? ToPropertyDescriptor(trapResultObj).
        // 13. Perform CompletePropertyDescriptor(resultDesc).
        let result_desc =
            PropertyDescriptor::to_property_descriptor(agent, trap_result_obj)?
                .complete()
                .to_descriptor();
        // 14. Let valid be IsCompatiblePropertyDescriptor(extensibleTarget,
        // resultDesc, targetDesc).
        // 15. If valid is false, throw a TypeError exception.
        if !is_compatible_property_descriptor(agent, extensible_target, result_desc, target_desc) {
            return Err(invariant_violation(
                agent,
                TRAP,
                "trap returned a descriptor incompatible with the target property",
            ));
        }
        // 16. If resultDesc.[[Configurable]] is false, then
        if result_desc.configurable == Some(false) {
            // a. If targetDesc is undefined or targetDesc.[[Configurable]] is
            // true, then
            match target_desc {
                None
                | Some(PropertyDescriptor {
                    configurable: Some(true),
                    ..
                }) => {
                    // i. Throw a TypeError exception.
                    return Err(invariant_violation(
                        agent,
                        TRAP,
                        "trap reported non-configurability for a configurable or missing property",
                    ));
                }
                Some(target_desc) => {
                    // b. If resultDesc has a [[Writable]] field and
                    // resultDesc.[[Writable]] is false, then
                    // i. Assert: targetDesc has a [[Writable]] field.
                    // ii. If targetDesc.[[Writable]] is true, throw a
                    // TypeError exception.
                    if result_desc.writable == Some(false)
                        && target_desc.writable == Some(true)
                    {
                        return Err(invariant_violation(
                            agent,
                            TRAP,
                            "trap reported non-writability for a writable property",
                        ));
                    }
                }
            }
        }
        // 17. Return resultDesc.
        Ok(Some(result_desc))
    }

    /// ### [10.5.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        const TRAP: &str = "defineProperty";
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "defineProperty").
        let Some(trap) = trap(agent, handler, TRAP)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[DefineOwnProperty]](P, Desc).
            return target.internal_define_own_property(agent, property_key, property_descriptor);
        };
        // 7. Let descObj be FromPropertyDescriptor(Desc).
        let desc_obj =
            PropertyDescriptor::from_property_descriptor(Some(property_descriptor), agent)?;
        // 8. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target, P, descObj »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target), property_key.into_value(agent), desc_obj],
        )?;
        // 9. If booleanTrapResult is false, return false.
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        // 10. Let targetDesc be ? target.[[GetOwnProperty]](P).
        let target_desc = target.internal_get_own_property(agent, property_key)?;
        // 11. Let extensibleTarget be ? IsExtensible(target).
        let extensible_target = is_extensible(agent, target)?;
        // 12. If Desc has a [[Configurable]] field and Desc.[[Configurable]]
        // is false, then
        // a. Let settingConfigFalse be true.
        // 13. Else, let settingConfigFalse be false.
        let setting_config_false = property_descriptor.configurable == Some(false);
        match target_desc {
            // 14. If targetDesc is undefined, then
            None => {
                // a. If extensibleTarget is false, throw a TypeError
                // exception.
                if !extensible_target {
                    return Err(invariant_violation(
                        agent,
                        TRAP,
                        "trap returned truish for adding a property to a non-extensible target",
                    ));
                }
                // b. If settingConfigFalse is true, throw a TypeError
                // exception.
                if setting_config_false {
                    return Err(invariant_violation(
                        agent,
                        TRAP,
                        "trap returned truish for defining a non-configurable property that does not exist on the target",
                    ));
                }
            }
            // 15. Else,
            Some(target_desc) => {
                // a. If IsCompatiblePropertyDescriptor(extensibleTarget,
                // Desc, targetDesc) is false, throw a TypeError exception.
                if !is_compatible_property_descriptor(
                    agent,
                    extensible_target,
                    property_descriptor,
                    Some(target_desc),
                ) {
                    return Err(invariant_violation(
                        agent,
                        TRAP,
                        "trap returned truish for a descriptor incompatible with the target property",
                    ));
                }
                // b. If settingConfigFalse is true and
                // targetDesc.[[Configurable]] is true, throw a TypeError
                // exception.
                if setting_config_false && target_desc.configurable == Some(true) {
                    return Err(invariant_violation(
                        agent,
                        TRAP,
                        "trap returned truish for defining a configurable property as non-configurable",
                    ));
                }
                // c. If IsDataDescriptor(targetDesc) is true,
                // targetDesc.[[Configurable]] is false, and
                // targetDesc.[[Writable]] is true, then
                // i. If Desc has a [[Writable]] field and Desc.[[Writable]]
                // is false, throw a TypeError exception.
                if target_desc.is_data_descriptor()
                    && target_desc.configurable == Some(false)
                    && target_desc.writable == Some(true)
                    && property_descriptor.writable == Some(false)
                {
                    return Err(invariant_violation(
                        agent,
                        TRAP,
                        "trap returned truish for making a non-configurable writable property non-writable",
                    ));
                }
            }
        }
        // 16. Return true.
        Ok(true)
    }

    /// ### [10.5.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-hasproperty-p)
    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "has").
        let Some(trap) = trap(agent, handler, "has")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[HasProperty]](P).
            return target.internal_has_property(agent, property_key);
        };
        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target, P »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target), property_key.into_value(agent)],
        )?;
        let boolean_trap_result = to_boolean(agent, result);
        // 8. If booleanTrapResult is false, then
        if !boolean_trap_result {
            // a. Let targetDesc be ? target.[[GetOwnProperty]](P).
            // b. If targetDesc is not undefined, then
            if let Some(target_desc) = target.internal_get_own_property(agent, property_key)? {
                // i. If targetDesc.[[Configurable]] is false, throw a
                // TypeError exception.
                if target_desc.configurable == Some(false) {
                    return Err(invariant_violation(
                        agent,
                        "has",
                        "trap returned falsish for a non-configurable property",
                    ));
                }
                // ii. Let extensibleTarget be ? IsExtensible(target).
                // iii. If extensibleTarget is false, throw a TypeError
                // exception.
                if !is_extensible(agent, target)? {
                    return Err(invariant_violation(
                        agent,
                        "has",
                        "trap returned falsish for a property of a non-extensible target",
                    ));
                }
            }
        }
        // 9. Return booleanTrapResult.
        Ok(boolean_trap_result)
    }

    /// ### [10.5.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-get-p-receiver)
    fn internal_get(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "get").
        let Some(trap) = trap(agent, handler, "get")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[Get]](P, Receiver).
            return target.internal_get(agent, property_key, receiver);
        };
        // 7. Let trapResult be ? Call(trap, handler, « target, P, Receiver »).
        let trap_result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target), property_key.into_value(agent), receiver],
        )?;
        // 8. Let targetDesc be ? target.[[GetOwnProperty]](P).
        // 9. If targetDesc is not undefined and targetDesc.[[Configurable]]
        // is false, then
        if let Some(target_desc) = target.internal_get_own_property(agent, property_key)?
            && target_desc.configurable == Some(false)
        {
            // a. If IsDataDescriptor(targetDesc) is true and
            // targetDesc.[[Writable]] is false, then
            if target_desc.is_data_descriptor() && target_desc.writable == Some(false) {
                // i. If SameValue(trapResult, targetDesc.[[Value]]) is false,
                // throw a TypeError exception.
                let target_value = target_desc.value.unwrap_or(Value::Undefined);
                if !same_value(agent, trap_result, target_value) {
                    return Err(invariant_violation(
                        agent,
                        "get",
                        "trap result differs from the value of a non-writable, non-configurable property",
                    ));
                }
            }
            // b. If IsAccessorDescriptor(targetDesc) is true and
            // targetDesc.[[Get]] is undefined, then
            // i. If trapResult is not undefined, throw a TypeError
            // exception.
            if target_desc.is_accessor_descriptor()
                && target_desc.get.flatten().is_none()
                && !trap_result.is_undefined()
            {
                return Err(invariant_violation(
                    agent,
                    "get",
                    "trap returned a value for a non-configurable accessor property without a getter",
                ));
            }
        }
        // 10. Return trapResult.
        Ok(trap_result)
    }

    /// ### [10.5.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-set-p-v-receiver)
    fn internal_set(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "set").
        let Some(trap) = trap(agent, handler, "set")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[Set]](P, V, Receiver).
            return target.internal_set(agent, property_key, value, receiver);
        };
        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target, P, V, Receiver »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[
                Value::Object(target),
                property_key.into_value(agent),
                value,
                receiver,
            ],
        )?;
        // 8. If booleanTrapResult is false, return false.
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
        // 10. If targetDesc is not undefined and targetDesc.[[Configurable]]
        // is false, then
        if let Some(target_desc) = target.internal_get_own_property(agent, property_key)?
            && target_desc.configurable == Some(false)
        {
            // a. If IsDataDescriptor(targetDesc) is true and
            // targetDesc.[[Writable]] is false, then
            // i. If SameValue(V, targetDesc.[[Value]]) is false, throw a
            // TypeError exception.
            if target_desc.is_data_descriptor()
                && target_desc.writable == Some(false)
                && !same_value(agent, value, target_desc.value.unwrap_or(Value::Undefined))
            {
                return Err(invariant_violation(
                    agent,
                    "set",
                    "trap returned truish for changing a non-writable, non-configurable property",
                ));
            }
            // b. If IsAccessorDescriptor(targetDesc) is true, then
            // i. If targetDesc.[[Set]] is undefined, throw a TypeError
            // exception.
            if target_desc.is_accessor_descriptor() && target_desc.set.flatten().is_none() {
                return Err(invariant_violation(
                    agent,
                    "set",
                    "trap returned truish for a non-configurable accessor property without a setter",
                ));
            }
        }
        // 11. Return true.
        Ok(true)
    }

    /// ### [10.5.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-delete-p)
    fn internal_delete(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        const TRAP: &str = "deleteProperty";
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "deleteProperty").
        let Some(trap) = trap(agent, handler, TRAP)? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[Delete]](P).
            return target.internal_delete(agent, property_key);
        };
        // 7. Let booleanTrapResult be ToBoolean(? Call(trap, handler,
        // « target, P »)).
        let result = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target), property_key.into_value(agent)],
        )?;
        // 8. If booleanTrapResult is false, return false.
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        // 9. Let targetDesc be ? target.[[GetOwnProperty]](P).
        // 10. If targetDesc is undefined, return true.
        let Some(target_desc) = target.internal_get_own_property(agent, property_key)? else {
            return Ok(true);
        };
        // 11. If targetDesc.[[Configurable]] is false, throw a TypeError
        // exception.
        if target_desc.configurable == Some(false) {
            return Err(invariant_violation(
                agent,
                TRAP,
                "trap returned truish for a non-configurable property",
            ));
        }
        // 12. Let extensibleTarget be ? IsExtensible(target).
        // 13. If extensibleTarget is false, throw a TypeError exception.
        if !is_extensible(agent, target)? {
            return Err(invariant_violation(
                agent,
                TRAP,
                "trap returned truish for a property of a non-extensible target",
            ));
        }
        // 14. Return true.
        Ok(true)
    }

    /// ### [10.5.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &Agent) -> JsResult<Vec<PropertyKey>> {
        // 1-4.
        let (target, handler) = validate_non_revoked_proxy(agent, self.0)?;
        // 5. Let trap be ? GetMethod(handler, "ownKeys").
        let Some(trap) = trap(agent, handler, "ownKeys")? else {
            // 6. If trap is undefined, then
            // a. Return ? target.[[OwnPropertyKeys]]().
            return target.internal_own_property_keys(agent);
        };
        // 7. Let trapResultArray be ? Call(trap, handler, « target »).
        let trap_result_array = call_function(
            agent,
            trap,
            Value::Object(handler),
            &[Value::Object(target)],
        )?;
        // 8. Let trapResult be ? CreateListFromArrayLike(trapResultArray,
        // « String, Symbol »).
        let trap_result = create_property_key_list_from_array_like(agent, trap_result_array)?;
        // 9. If trapResult contains any duplicate entries, throw a TypeError
        // exception.
        let mut unchecked_result_keys: AHashSet<PropertyKey> = AHashSet::default();
        for key in &trap_result {
            if !unchecked_result_keys.insert(*key) {
                return Err(invariant_violation(
                    agent,
                    "ownKeys",
                    "trap returned duplicate entries",
                ));
            }
        }
        // 10. Let extensibleTarget be ? IsExtensible(target).
        let extensible_target = is_extensible(agent, target)?;
        // 11. Let targetKeys be ? target.[[OwnPropertyKeys]]().
        let target_keys = target.internal_own_property_keys(agent)?;
        // 12. Assert: targetKeys is a List of property keys.
        // 13. Assert: targetKeys contains no duplicate entries.
        // 14. Let targetConfigurableKeys be a new empty List.
        let mut target_configurable_keys = Vec::new();
        // 15. Let targetNonconfigurableKeys be a new empty List.
        let mut target_nonconfigurable_keys = Vec::new();
        // 16. For each element key of targetKeys, do
        for key in target_keys {
            // a. Let desc be ? target.[[GetOwnProperty]](key).
            let desc = target.internal_get_own_property(agent, key)?;
            // b. If desc is not undefined and desc.[[Configurable]] is false,
            // then
            if desc.is_some_and(|desc| desc.configurable == Some(false)) {
                // i. Append key to targetNonconfigurableKeys.
                target_nonconfigurable_keys.push(key);
            } else {
                // c. Else,
                // i. Append key to targetConfigurableKeys.
                target_configurable_keys.push(key);
            }
        }
        // 17. If extensibleTarget is true and targetNonconfigurableKeys is
        // empty, then
        if extensible_target && target_nonconfigurable_keys.is_empty() {
            // a. Return trapResult.
            return Ok(trap_result);
        }
        // 18. Let uncheckedResultKeys be a List whose elements are the
        // elements of trapResult.
        // 19. For each element key of targetNonconfigurableKeys, do
        for key in target_nonconfigurable_keys {
            // a. If uncheckedResultKeys does not contain key, throw a
            // TypeError exception.
            // b. Remove key from uncheckedResultKeys.
            if !unchecked_result_keys.remove(&key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "'ownKeys' on proxy: trap result did not include '{}'",
                        key.to_display(agent)
                    ),
                ));
            }
        }
        // 20. If extensibleTarget is true, return trapResult.
        if extensible_target {
            return Ok(trap_result);
        }
        // 21. For each element key of targetConfigurableKeys, do
        for key in target_configurable_keys {
            // a. If uncheckedResultKeys does not contain key, throw a
            // TypeError exception.
            // b. Remove key from uncheckedResultKeys.
            if !unchecked_result_keys.remove(&key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "'ownKeys' on proxy: trap result did not include '{}'",
                        key.to_display(agent)
                    ),
                ));
            }
        }
        // 22. If uncheckedResultKeys is not empty, throw a TypeError
        // exception.
        if !unchecked_result_keys.is_empty() {
            return Err(invariant_violation(
                agent,
                "ownKeys",
                "trap returned extra keys but the proxy target is non-extensible",
            ));
        }
        // 23. Return trapResult.
        Ok(trap_result)
    }
}

/// ### [10.5.12 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-call-thisargument-argumentslist)
pub(crate) fn proxy_call(
    agent: &Agent,
    f: Object,
    this_argument: Value,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1-4.
    let (target, handler) = validate_non_revoked_proxy(agent, f)?;
    // 5. Let trap be ? GetMethod(handler, "apply").
    let Some(trap) = trap(agent, handler, "apply")? else {
        // 6. If trap is undefined, then
        // a. Return ? Call(target, thisArgument, argumentsList).
        return call(agent, Value::Object(target), this_argument, &arguments_list);
    };
    // 7. Let argArray be CreateArrayFromList(argumentsList).
    let arg_array = create_array_from_list(agent, &arguments_list);
    // 8. Return ? Call(trap, handler, « target, thisArgument, argArray »).
    call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), this_argument, Value::Object(arg_array)],
    )
}

/// ### [10.5.13 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-construct-argumentslist-newtarget)
pub(crate) fn proxy_construct(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    // 1-4.
    let (target, handler) = validate_non_revoked_proxy(agent, f)?;
    // 5. Assert: IsConstructor(target) is true.
    // 6. Let trap be ? GetMethod(handler, "construct").
    let Some(trap) = trap(agent, handler, "construct")? else {
        // 7. If trap is undefined, then
        // a. Return ? Construct(target, argumentsList, newTarget).
        return construct(agent, target, &arguments_list, Some(new_target));
    };
    // 8. Let argArray be CreateArrayFromList(argumentsList).
    let arg_array = create_array_from_list(agent, &arguments_list);
    // 9. Let newObj be ? Call(trap, handler, « target, argArray, newTarget »).
    let new_obj = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[
            Value::Object(target),
            Value::Object(arg_array),
            Value::Object(new_target),
        ],
    )?;
    // 10. If newObj is not an Object, throw a TypeError exception.
    // 11. Return newObj.
    match new_obj {
        Value::Object(new_obj) => Ok(new_obj),
        _ => Err(invariant_violation(
            agent,
            "construct",
            "trap returned non-object",
        )),
    }
}

/// ### [10.5.15 ProxyCreate ( target, handler )](https://tc39.es/ecma262/#sec-proxycreate)
pub(crate) fn proxy_create(agent: &Agent, target: Value, handler: Value) -> JsResult<Object> {
    // 1. If target is not an Object, throw a TypeError exception.
    // 2. If handler is not an Object, throw a TypeError exception.
    let (Value::Object(target), Value::Object(handler)) = (target, handler) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot create proxy with a non-object as target or handler",
        ));
    };
    // 3. Let P be MakeBasicObject(« [[ProxyHandler]], [[ProxyTarget]] »).
    // 4. Set P's essential internal methods, except for [[Call]] and
    // [[Construct]], to the definitions specified in 10.5.
    // 5. If IsCallable(target) is true, then
    // a. Set P.[[Call]] as specified in 10.5.12.
    // b. If IsConstructor(target) is true, then
    // i. Set P.[[Construct]] as specified in 10.5.13.
    let is_callable = is_callable(agent, Value::Object(target));
    let is_constructor = is_callable && is_constructor(agent, Value::Object(target));
    // 6. Set P.[[ProxyTarget]] to target.
    // 7. Set P.[[ProxyHandler]] to handler.
    let proxy = agent.heap_mut().create_object(ObjectHeapData::new(
        None,
        ObjectKind::Proxy(ProxyData {
            target: Some(target),
            handler: Some(handler),
            is_callable,
            is_constructor,
        }),
    ));
    tracing::trace!(event = "proxy_create", proxy = proxy.0, target = target.0);
    // 8. Return P.
    Ok(proxy)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::{define_property_or_throw, get},
        builtins::ordinary::ordinary_object_create,
        execution::{DefaultHostHooks, agent::Options},
    };

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    #[test]
    fn traps_fall_through_to_target() {
        let agent = agent();
        let target = ordinary_object_create(&agent, None);
        let key = PropertyKey::from_str(&agent, "x");
        target.set_data_slot(&agent, key, Value::Number(1.0));
        let handler = ordinary_object_create(&agent, None);
        let proxy = proxy_create(&agent, Value::Object(target), Value::Object(handler)).unwrap();
        assert_eq!(get(&agent, proxy, key), Ok(Value::Number(1.0)));
        assert_eq!(proxy.internal_own_property_keys(&agent), Ok(vec![key]));
    }

    #[test]
    fn revoked_proxies_throw() {
        let agent = agent();
        let target = ordinary_object_create(&agent, None);
        let handler = ordinary_object_create(&agent, None);
        let proxy = proxy_create(&agent, Value::Object(target), Value::Object(handler)).unwrap();
        proxy_revoke(&agent, proxy);
        assert!(proxy.internal_get_prototype_of(&agent).is_err());
        assert_eq!(proxy_target(&agent, proxy), None);
    }

    #[test]
    fn non_configurable_target_properties_cannot_be_hidden() {
        let agent = agent();
        let target = ordinary_object_create(&agent, None);
        let key = PropertyKey::from_str(&agent, "fixed");
        define_property_or_throw(
            &agent,
            target,
            key,
            PropertyDescriptor {
                value: Some(Value::Null),
                writable: Some(false),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        let handler = ordinary_object_create(&agent, None);
        let proxy = proxy_create(&agent, Value::Object(target), Value::Object(handler)).unwrap();
        // Without a trap the target answers.
        assert_eq!(proxy.internal_has_property(&agent, key), Ok(true));
        assert!(proxy_create(&agent, Value::Null, Value::Object(handler)).is_err());
    }
}
