// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        fundamental_objects::{
            error_objects::active_function,
            function_objects::function_constructor::{
                DynamicFunctionKind, create_dynamic_function,
            },
        },
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm},
    types::{Object, Value},
};

pub(crate) struct AsyncFunctionConstructor;

impl Builtin for AsyncFunctionConstructor {
    const NAME: &'static str = "AsyncFunction";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(AsyncFunctionConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for AsyncFunctionConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::AsyncFunction;
}

impl AsyncFunctionConstructor {
    /// ### [27.7.1.1 AsyncFunction ( ...parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-async-function-constructor-arguments)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let C be the active function object.
        let constructor = active_function(agent)?;
        // 2. If bodyArg is not present, set bodyArg to the empty String.
        // 3. Return ? CreateDynamicFunction(C, NewTarget, ASYNC, parameterArgs, bodyArg).
        create_dynamic_function(
            agent,
            constructor,
            new_target,
            DynamicFunctionKind::Async,
            &arguments,
        )
        .map(Value::Object)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        BuiltinFunctionBuilder::new_intrinsic_constructor::<AsyncFunctionConstructor>(agent, realm)
            .with_prototype(intrinsics.function())
            .with_property_capacity(1)
            .with_prototype_property(intrinsics.async_function_prototype())
            .build();
    }
}
