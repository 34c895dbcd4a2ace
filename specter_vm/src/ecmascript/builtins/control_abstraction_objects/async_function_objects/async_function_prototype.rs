// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    execution::{Agent, Realm},
    types::{PropertyKey, Symbol, Value},
};

/// ### [27.7.3 Properties of the AsyncFunction Prototype Object](https://tc39.es/ecma262/#sec-async-function-prototype-properties)
pub(crate) struct AsyncFunctionPrototype;

impl AsyncFunctionPrototype {
    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.async_function_prototype();
        let constructor = PropertyKey::from_str(agent, "constructor");
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(2)
            .with_prototype(intrinsics.function_prototype())
            // ### [27.7.3.1 AsyncFunction.prototype.constructor](https://tc39.es/ecma262/#sec-async-function-prototype-properties-constructor)
            .with_property(|property| {
                property
                    .with_key(constructor)
                    .with_value_readonly(Value::Object(intrinsics.async_function()))
                    .with_enumerable(false)
                    .build()
            })
            // ### [27.7.3.2 AsyncFunction.prototype \[ %Symbol.toStringTag% \]](https://tc39.es/ecma262/#sec-async-function-prototype-%symbol.tostringtag%)
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "AsyncFunction"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}
