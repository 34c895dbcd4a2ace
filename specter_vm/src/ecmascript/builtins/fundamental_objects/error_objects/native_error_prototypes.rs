// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    execution::{Agent, Realm, agent::ExceptionType},
    types::{PropertyKey, Value},
};

/// ### [20.5.6.3 Properties of the NativeError Prototype Objects](https://tc39.es/ecma262/#sec-properties-of-the-nativeerror-prototype-objects)
pub(crate) struct NativeErrorPrototypes;

impl NativeErrorPrototypes {
    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let error_prototype = intrinsics.error_prototype();
        let prototypes = [
            (ExceptionType::EvalError, intrinsics.eval_error_prototype(), intrinsics.eval_error()),
            (
                ExceptionType::RangeError,
                intrinsics.range_error_prototype(),
                intrinsics.range_error(),
            ),
            (
                ExceptionType::ReferenceError,
                intrinsics.reference_error_prototype(),
                intrinsics.reference_error(),
            ),
            (
                ExceptionType::SyntaxError,
                intrinsics.syntax_error_prototype(),
                intrinsics.syntax_error(),
            ),
            (ExceptionType::TypeError, intrinsics.type_error_prototype(), intrinsics.type_error()),
            (ExceptionType::UriError, intrinsics.uri_error_prototype(), intrinsics.uri_error()),
            (
                ExceptionType::AggregateError,
                intrinsics.aggregate_error_prototype(),
                intrinsics.aggregate_error(),
            ),
        ];
        for (kind, this, constructor) in prototypes {
            let message = PropertyKey::from_str(agent, "message");
            let name = PropertyKey::from_str(agent, "name");
            OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
                .with_property_capacity(3)
                .with_prototype(error_prototype)
                .with_constructor_property(constructor)
                .with_data_property(message, Value::from_str(agent, ""))
                .with_data_property(name, Value::from_str(agent, kind.name()))
                .build();
        }
    }
}
