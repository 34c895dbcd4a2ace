// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{private_get, private_set, set},
        type_conversion::{to_object, to_property_key},
    },
    execution::{Agent, EnvironmentIndex, JsResult, PrivateName, agent::ExceptionType},
    types::{HeapString, InternalMethods, Object, PropertyKey, Value},
};

/// ### [6.2.5 The Reference Record Specification Type](https://tc39.es/ecma262/#sec-reference-record-specification-type)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Reference {
    /// ### \[\[Base]]
    pub(crate) base: Base,
    /// ### \[\[ReferencedName]]
    pub(crate) referenced_name: ReferencedName,
    /// ### \[\[Strict]]
    pub(crate) strict: bool,
    /// ### \[\[ThisValue]]
    ///
    /// Only present for Super References.
    pub(crate) this_value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Base {
    Value(Value),
    Environment(EnvironmentIndex),
    Unresolvable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ReferencedName {
    /// Binding names of environment references and unresolvable references.
    Binding(HeapString),
    PropertyKey(PropertyKey),
    /// A computed member expression whose key has not been passed through
    /// ToPropertyKey yet.
    Value(Value),
    PrivateName(PrivateName),
}

impl Reference {
    pub(crate) fn binding(environment: EnvironmentIndex, name: HeapString, strict: bool) -> Self {
        Self {
            base: Base::Environment(environment),
            referenced_name: ReferencedName::Binding(name),
            strict,
            this_value: None,
        }
    }

    pub(crate) fn unresolvable(name: HeapString, strict: bool) -> Self {
        Self {
            base: Base::Unresolvable,
            referenced_name: ReferencedName::Binding(name),
            strict,
            this_value: None,
        }
    }

    pub(crate) fn property(base: Value, referenced_name: ReferencedName, strict: bool) -> Self {
        Self {
            base: Base::Value(base),
            referenced_name,
            strict,
            this_value: None,
        }
    }

    /// ### [6.2.5.1 IsPropertyReference ( V )](https://tc39.es/ecma262/#sec-ispropertyreference)
    pub(crate) fn is_property_reference(&self) -> bool {
        matches!(self.base, Base::Value(_))
    }

    /// ### [6.2.5.2 IsUnresolvableReference ( V )](https://tc39.es/ecma262/#sec-isunresolvablereference)
    pub(crate) fn is_unresolvable_reference(&self) -> bool {
        matches!(self.base, Base::Unresolvable)
    }

    /// ### [6.2.5.3 IsSuperReference ( V )](https://tc39.es/ecma262/#sec-issuperreference)
    pub(crate) fn is_super_reference(&self) -> bool {
        self.this_value.is_some()
    }

    /// ### [6.2.5.4 IsPrivateReference ( V )](https://tc39.es/ecma262/#sec-isprivatereference)
    pub(crate) fn is_private_reference(&self) -> bool {
        matches!(self.referenced_name, ReferencedName::PrivateName(_))
    }

    /// Convert a deferred computed key with ToPropertyKey, once.
    pub(crate) fn property_key(&mut self, agent: &Agent) -> JsResult<PropertyKey> {
        match self.referenced_name {
            ReferencedName::PropertyKey(key) => Ok(key),
            ReferencedName::Value(value) => {
                let key = to_property_key(agent, value)?;
                self.referenced_name = ReferencedName::PropertyKey(key);
                Ok(key)
            }
            ReferencedName::Binding(name) => Ok(PropertyKey::from_string(agent, name)),
            ReferencedName::PrivateName(_) => Err(agent.internal_error(
                "private reference used as a property reference",
            )),
        }
    }

    /// Name for error messages.
    pub(crate) fn display_name(&self, agent: &Agent) -> String {
        match self.referenced_name {
            ReferencedName::Binding(name) => name.to_rust_string(agent),
            ReferencedName::PropertyKey(key) => key.to_display(agent),
            ReferencedName::Value(Value::String(name)) => name.to_rust_string(agent),
            ReferencedName::Value(value) => value.to_display_string(agent),
            ReferencedName::PrivateName(name) => name.description(agent).to_rust_string(agent),
        }
    }
}

/// The prototype a primitive value's wrapper object would have.
pub(crate) fn primitive_prototype(agent: &Agent, value: Value) -> Option<Object> {
    let intrinsics = agent.intrinsics();
    match value {
        Value::Boolean(_) => Some(intrinsics.boolean_prototype()),
        Value::Number(_) => Some(intrinsics.number_prototype()),
        Value::String(_) => Some(intrinsics.string_prototype()),
        Value::Symbol(_) => Some(intrinsics.symbol_prototype()),
        Value::BigInt(_) => Some(intrinsics.bigint_prototype()),
        Value::Undefined | Value::Null | Value::Object(_) => None,
    }
}

/// Own properties a String wrapper object would have for `key`.
fn string_own_value(agent: &Agent, string: HeapString, key: PropertyKey) -> Option<Value> {
    match key {
        PropertyKey::Integer(index) => {
            let unit = string.code_unit_at(agent, index as usize)?;
            Some(Value::String(HeapString::from_code_units(agent, &[unit])))
        }
        key if key.as_str_eq(agent, "length") => Some(Value::from(string.utf16_len(agent))),
        _ => None,
    }
}

/// ### [6.2.5.5 GetValue ( V )](https://tc39.es/ecma262/#sec-getvalue)
pub(crate) fn get_value(agent: &Agent, reference: &mut Reference) -> JsResult<Value> {
    match reference.base {
        // 2. If IsPropertyReference(V) is true, then
        Base::Value(base) => {
            // a. Let baseObj be ? ToObject(V.[[Base]]).
            if base.is_nullish() {
                let name = reference.display_name(agent);
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "Cannot read properties of {} (reading '{name}')",
                        base.to_display_string(agent)
                    ),
                ));
            }
            // b. If IsPrivateReference(V) is true, then
            if let ReferencedName::PrivateName(name) = reference.referenced_name {
                // i. Return ? PrivateGet(baseObj, V.[[ReferencedName]]).
                let base_object = to_object(agent, base)?;
                return private_get(agent, base_object, name);
            }
            // c. If V.[[ReferencedName]] is not a property key, then
            // i. Set V.[[ReferencedName]] to ? ToPropertyKey(V.[[ReferencedName]]).
            let key = reference.property_key(agent)?;
            let this_value = get_this_value(reference);
            // d. Return ? baseObj.[[Get]](V.[[ReferencedName]], GetThisValue(V)).
            match base {
                Value::Object(object) => object.internal_get(agent, key, this_value),
                Value::String(string) => match string_own_value(agent, string, key) {
                    Some(value) => Ok(value),
                    None => agent
                        .intrinsics()
                        .string_prototype()
                        .internal_get(agent, key, this_value),
                },
                _ => match primitive_prototype(agent, base) {
                    Some(prototype) => prototype.internal_get(agent, key, this_value),
                    None => Ok(Value::Undefined),
                },
            }
        }
        // 1. If V is not a Reference Record, return V.
        // 3. Else,
        Base::Environment(environment) => {
            let ReferencedName::Binding(name) = reference.referenced_name else {
                return Err(agent.internal_error("environment reference without a binding name"));
            };
            // b. Return ? base.GetBindingValue(V.[[ReferencedName]], V.[[Strict]]).
            environment.get_binding_value(agent, name, reference.strict)
        }
        // If IsUnresolvableReference(V) is true, throw a ReferenceError exception.
        Base::Unresolvable => Err(agent.throw_exception(
            ExceptionType::ReferenceError,
            format!("{} is not defined", reference.display_name(agent)),
        )),
    }
}

/// ### [6.2.5.6 PutValue ( V, W )](https://tc39.es/ecma262/#sec-putvalue)
pub(crate) fn put_value(agent: &Agent, reference: &mut Reference, value: Value) -> JsResult<()> {
    match reference.base {
        // 3. If IsUnresolvableReference(V) is true, then
        Base::Unresolvable => {
            // a. If V.[[Strict]] is true, throw a ReferenceError exception.
            if reference.strict {
                return Err(agent.throw_exception(
                    ExceptionType::ReferenceError,
                    format!("{} is not defined", reference.display_name(agent)),
                ));
            }
            // b. Let globalObj be GetGlobalObject().
            let global_object = agent.current_realm().global_object(agent);
            // c. Perform ? Set(globalObj, V.[[ReferencedName]], W, false).
            let key = reference.property_key(agent)?;
            set(agent, global_object, key, value, false)?;
            // d. Return unused.
            Ok(())
        }
        // 4. If IsPropertyReference(V) is true, then
        Base::Value(base) => {
            if base.is_nullish() {
                let name = reference.display_name(agent);
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "Cannot set properties of {} (setting '{name}')",
                        base.to_display_string(agent)
                    ),
                ));
            }
            // b. If IsPrivateReference(V) is true, then
            if let ReferencedName::PrivateName(name) = reference.referenced_name {
                // i. Return ? PrivateSet(baseObj, V.[[ReferencedName]], W).
                let base_object = to_object(agent, base)?;
                return private_set(agent, base_object, name, value);
            }
            // c. If V.[[ReferencedName]] is not a property key, then
            let key = reference.property_key(agent)?;
            let this_value = get_this_value(reference);
            // d. Let succeeded be ? baseObj.[[Set]](V.[[ReferencedName]], W, GetThisValue(V)).
            let succeeded = match base {
                Value::Object(object) => object.internal_set(agent, key, value, this_value)?,
                Value::String(string) if string_own_value(agent, string, key).is_some() => false,
                _ => match primitive_prototype(agent, base) {
                    Some(prototype) => prototype.internal_set(agent, key, value, this_value)?,
                    None => false,
                },
            };
            // e. If succeeded is false and V.[[Strict]] is true, throw a
            // TypeError exception.
            if !succeeded && reference.strict {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "Cannot assign to read only property '{}' of {}",
                        key.to_display(agent),
                        base.to_display_string(agent)
                    ),
                ));
            }
            // f. Return unused.
            Ok(())
        }
        // 5. Else,
        Base::Environment(environment) => {
            let ReferencedName::Binding(name) = reference.referenced_name else {
                return Err(agent.internal_error("environment reference without a binding name"));
            };
            // c. Return ? base.SetMutableBinding(V.[[ReferencedName]], W, V.[[Strict]]).
            environment.set_mutable_binding(agent, name, value, reference.strict)
        }
    }
}

/// ### [6.2.5.7 GetThisValue ( V )](https://tc39.es/ecma262/#sec-getthisvalue)
pub(crate) fn get_this_value(reference: &Reference) -> Value {
    // 2. If IsSuperReference(V) is true, return V.[[ThisValue]]; otherwise
    // return V.[[Base]].
    match (reference.this_value, reference.base) {
        (Some(this_value), _) => this_value,
        (None, Base::Value(base)) => base,
        (None, _) => Value::Undefined,
    }
}

/// ### [6.2.5.8 InitializeReferencedBinding ( V, W )](https://tc39.es/ecma262/#sec-initializereferencedbinding)
pub(crate) fn initialize_referenced_binding(
    agent: &Agent,
    reference: &Reference,
    value: Value,
) -> JsResult<()> {
    // 1. Assert: IsUnresolvableReference(V) is false.
    // 2. Let base be V.[[Base]].
    // 3. Assert: base is an Environment Record.
    let (Base::Environment(environment), ReferencedName::Binding(name)) =
        (reference.base, reference.referenced_name)
    else {
        return Err(agent.internal_error("initialized reference is not a binding"));
    };
    // 4. Return ? base.InitializeBinding(V.[[ReferencedName]], W).
    environment.initialize_binding(agent, name, value)
}
