// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{create_data_property_or_throw, get, has_property},
        testing_and_comparison::is_callable,
        type_conversion::to_boolean,
    },
    builtins::ordinary::ordinary_object_create_with_intrinsics,
    execution::{Agent, JsResult, ProtoIntrinsics, agent::ExceptionType},
    types::{Object, Property, PropertyKey, PropertyValue, Value},
};

/// ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)
///
/// Fields that are absent are `None`. The `get` and `set` fields are
/// `Some(None)` when present with the value undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// \[\[Value\]\]
    pub value: Option<Value>,
    /// \[\[Writable\]\]
    pub writable: Option<bool>,
    /// \[\[Get\]\]
    pub get: Option<Option<Object>>,
    /// \[\[Set\]\]
    pub set: Option<Option<Object>>,
    /// \[\[Enumerable\]\]
    pub enumerable: Option<bool>,
    /// \[\[Configurable\]\]
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn new_data_descriptor(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(true),
            ..Default::default()
        }
    }

    /// ### [6.2.6.1 IsAccessorDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isaccessordescriptor)
    pub fn is_accessor_descriptor(&self) -> bool {
        // 2. If Desc has a [[Get]] field, return true.
        // 3. If Desc has a [[Set]] field, return true.
        self.get.is_some() || self.set.is_some()
    }

    /// ### [6.2.6.2 IsDataDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isdatadescriptor)
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// ### [6.2.6.3 IsGenericDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isgenericdescriptor)
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    /// ### [6.2.6.6 CompletePropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-completepropertydescriptor)
    ///
    /// Completes the descriptor into a stored property.
    pub fn complete(&self) -> Property {
        let enumerable = self.enumerable.unwrap_or(false);
        let configurable = self.configurable.unwrap_or(false);
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            Property::data(
                self.value.unwrap_or(Value::Undefined),
                self.writable.unwrap_or(false),
                enumerable,
                configurable,
            )
        } else {
            Property::accessor(
                self.get.flatten(),
                self.set.flatten(),
                enumerable,
                configurable,
            )
        }
    }

    /// ### [6.2.6.4 FromPropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-frompropertydescriptor)
    pub fn from_property_descriptor(desc: Option<Self>, agent: &Agent) -> JsResult<Value> {
        // 1. If Desc is undefined, return undefined.
        let Some(desc) = desc else {
            return Ok(Value::Undefined);
        };
        // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%).
        let obj = ordinary_object_create_with_intrinsics(agent, Some(ProtoIntrinsics::Object));
        // 4. If Desc has a [[Value]] field, then
        if let Some(value) = desc.value {
            create_data_property_or_throw(
                agent,
                obj,
                PropertyKey::from_str(agent, "value"),
                value,
            )?;
        }
        // 5. If Desc has a [[Writable]] field, then
        if let Some(writable) = desc.writable {
            create_data_property_or_throw(
                agent,
                obj,
                PropertyKey::from_str(agent, "writable"),
                writable.into(),
            )?;
        }
        // 6. If Desc has a [[Get]] field, then
        if let Some(getter) = desc.get {
            create_data_property_or_throw(
                agent,
                obj,
                PropertyKey::from_str(agent, "get"),
                getter.map_or(Value::Undefined, Value::Object),
            )?;
        }
        // 7. If Desc has a [[Set]] field, then
        if let Some(setter) = desc.set {
            create_data_property_or_throw(
                agent,
                obj,
                PropertyKey::from_str(agent, "set"),
                setter.map_or(Value::Undefined, Value::Object),
            )?;
        }
        // 8. If Desc has an [[Enumerable]] field, then
        if let Some(enumerable) = desc.enumerable {
            create_data_property_or_throw(
                agent,
                obj,
                PropertyKey::from_str(agent, "enumerable"),
                enumerable.into(),
            )?;
        }
        // 9. If Desc has a [[Configurable]] field, then
        if let Some(configurable) = desc.configurable {
            create_data_property_or_throw(
                agent,
                obj,
                PropertyKey::from_str(agent, "configurable"),
                configurable.into(),
            )?;
        }
        // 10. Return obj.
        Ok(Value::Object(obj))
    }

    /// ### [6.2.6.5 ToPropertyDescriptor ( Obj )](https://tc39.es/ecma262/#sec-topropertydescriptor)
    pub fn to_property_descriptor(agent: &Agent, obj: Value) -> JsResult<Self> {
        // 1. If Obj is not an Object, throw a TypeError exception.
        let Value::Object(obj) = obj else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!(
                    "Property description must be an object: {}",
                    obj.to_display_string(agent)
                ),
            ));
        };
        // 2. Let desc be a new Property Descriptor that initially has no
        // fields.
        let mut desc = PropertyDescriptor::default();
        let field = |name: &str| -> JsResult<Option<Value>> {
            let key = PropertyKey::from_str(agent, name);
            if has_property(agent, obj, key)? {
                Ok(Some(get(agent, obj, key)?))
            } else {
                Ok(None)
            }
        };
        // 3. Let hasEnumerable be ? HasProperty(Obj, "enumerable").
        if let Some(enumerable) = field("enumerable")? {
            desc.enumerable = Some(to_boolean(agent, enumerable));
        }
        // 5. Let hasConfigurable be ? HasProperty(Obj, "configurable").
        if let Some(configurable) = field("configurable")? {
            desc.configurable = Some(to_boolean(agent, configurable));
        }
        // 7. Let hasValue be ? HasProperty(Obj, "value").
        if let Some(value) = field("value")? {
            desc.value = Some(value);
        }
        // 9. Let hasWritable be ? HasProperty(Obj, "writable").
        if let Some(writable) = field("writable")? {
            desc.writable = Some(to_boolean(agent, writable));
        }
        // 11. Let hasGet be ? HasProperty(Obj, "get").
        if let Some(getter) = field("get")? {
            // b. If IsCallable(getter) is false and getter is not undefined,
            // throw a TypeError exception.
            desc.get = Some(accessor_function(agent, getter, "Getter")?);
        }
        // 13. Let hasSet be ? HasProperty(Obj, "set").
        if let Some(setter) = field("set")? {
            desc.set = Some(accessor_function(agent, setter, "Setter")?);
        }
        // 15. If desc has a [[Get]] field or desc has a [[Set]] field, then
        // a. If desc has a [[Value]] field or desc has a [[Writable]] field,
        // throw a TypeError exception.
        if desc.is_accessor_descriptor() && desc.is_data_descriptor() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
            ));
        }
        // 16. Return desc.
        Ok(desc)
    }
}

fn accessor_function(agent: &Agent, value: Value, which: &str) -> JsResult<Option<Object>> {
    match value {
        Value::Undefined => Ok(None),
        Value::Object(function) if is_callable(agent, value) => Ok(Some(function)),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{which} must be a function: {}", value.to_display_string(agent)),
        )),
    }
}

impl From<Property> for PropertyDescriptor {
    fn from(property: Property) -> Self {
        property.to_descriptor()
    }
}

impl PropertyValue {
    pub fn is_data(&self) -> bool {
        matches!(self, PropertyValue::Data { .. })
    }
}
