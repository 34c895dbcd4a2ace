// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    execution::Agent,
    types::{Object, Property, PropertyKey, PropertyValue, Value},
};

#[doc(hidden)]
#[derive(Default, Clone, Copy)]
pub(crate) struct NoKey;

#[doc(hidden)]
#[derive(Clone, Copy)]
pub(crate) struct CreatorKey(PropertyKey);

/// Builder for a single property of an object under construction.
pub(crate) struct PropertyBuilder<'agent, K> {
    pub(crate) agent: &'agent Agent,
    key: K,
    value: PropertyValue,
    enumerable: bool,
    configurable: bool,
}

impl<'agent> PropertyBuilder<'agent, NoKey> {
    pub(crate) fn new(agent: &'agent Agent) -> Self {
        PropertyBuilder {
            agent,
            key: NoKey,
            value: PropertyValue::Data {
                value: Value::Undefined,
                writable: true,
            },
            enumerable: true,
            configurable: true,
        }
    }

    /// Set the property key.
    pub(crate) fn with_key(self, key: PropertyKey) -> PropertyBuilder<'agent, CreatorKey> {
        PropertyBuilder {
            agent: self.agent,
            key: CreatorKey(key),
            value: self.value,
            enumerable: self.enumerable,
            configurable: self.configurable,
        }
    }
}

impl<'agent, K> PropertyBuilder<'agent, K> {
    /// Make the property a writable data property.
    pub(crate) fn with_value(mut self, value: Value) -> Self {
        self.value = PropertyValue::Data {
            value,
            writable: true,
        };
        self
    }

    /// Make the property a read-only data property.
    pub(crate) fn with_value_readonly(mut self, value: Value) -> Self {
        self.value = PropertyValue::Data {
            value,
            writable: false,
        };
        self
    }

    pub(crate) fn with_getter_and_setter_functions(
        mut self,
        getter: Object,
        setter: Object,
    ) -> Self {
        self.value = PropertyValue::Accessor {
            get: Some(getter),
            set: Some(setter),
        };
        self
    }

    pub(crate) fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    pub(crate) fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }
}

impl PropertyBuilder<'_, CreatorKey> {
    pub(crate) fn build(self) -> (PropertyKey, Property) {
        (
            self.key.0,
            Property {
                value: self.value,
                enumerable: self.enumerable,
                configurable: self.configurable,
            },
        )
    }
}
