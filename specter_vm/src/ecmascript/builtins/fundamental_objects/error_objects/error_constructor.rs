// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::construct_error;
use crate::ecmascript::{
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor},
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, Value},
};

pub(crate) struct ErrorConstructor;

impl Builtin for ErrorConstructor {
    const NAME: &'static str = "Error";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ErrorConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for ErrorConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Error;
}

impl ErrorConstructor {
    /// ### [20.5.1.1 Error ( message \[ , options \] )](https://tc39.es/ecma262/#sec-error-message)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let o = construct_error(
            agent,
            ExceptionType::Error,
            arguments.get(0),
            arguments.get(1),
            new_target,
        )?;
        Ok(Value::Object(o))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let error_prototype = intrinsics.error_prototype();

        BuiltinFunctionBuilder::new_intrinsic_constructor::<ErrorConstructor>(agent, realm)
            .with_property_capacity(1)
            .with_prototype_property(error_prototype)
            .build();
    }
}
