// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.4 AsyncGeneratorFunction Objects](https://tc39.es/ecma262/#sec-asyncgeneratorfunction-objects)

use crate::ecmascript::{
    builders::{
        builtin_function_builder::BuiltinFunctionBuilder,
        ordinary_object_builder::OrdinaryObjectBuilder,
    },
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
    types::{Object, PropertyKey, Symbol, Value},
};

pub(crate) struct AsyncGeneratorFunctionConstructor;

impl Builtin for AsyncGeneratorFunctionConstructor {
    const NAME: &'static str = "AsyncGeneratorFunction";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour =
        Behaviour::Constructor(AsyncGeneratorFunctionConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for AsyncGeneratorFunctionConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::AsyncGeneratorFunction;
}

impl AsyncGeneratorFunctionConstructor {
    /// ### [27.4.1.1 AsyncGeneratorFunction ( ...parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-asyncgeneratorfunction)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let C be the active function object.
        let constructor = active_function(agent)?;
        // 2. If bodyArg is not present, set bodyArg to the empty String.
        // 3. Return ? CreateDynamicFunction(C, NewTarget, ASYNC-GENERATOR,
        // parameterArgs, bodyArg).
        create_dynamic_function(
            agent,
            constructor,
            new_target,
            DynamicFunctionKind::AsyncGenerator,
            &arguments,
        )
        .map(Value::Object)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        BuiltinFunctionBuilder::new_intrinsic_constructor::<AsyncGeneratorFunctionConstructor>(
            agent, realm,
        )
        .with_prototype(intrinsics.function())
        .with_property_capacity(1)
        .with_prototype_property(intrinsics.async_generator_function_prototype())
        .build();
    }
}

/// ### [27.4.3 Properties of the AsyncGeneratorFunction Prototype Object](https://tc39.es/ecma262/#sec-properties-of-asyncgeneratorfunction-prototype)
pub(crate) struct AsyncGeneratorFunctionPrototype;

impl AsyncGeneratorFunctionPrototype {
    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.async_generator_function_prototype();
        let constructor = PropertyKey::from_str(agent, "constructor");
        let prototype = PropertyKey::from_str(agent, "prototype");

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(3)
            .with_prototype(intrinsics.function_prototype())
            .with_property(|property| {
                property
                    .with_key(constructor)
                    .with_value_readonly(Value::Object(intrinsics.async_generator_function()))
                    .with_enumerable(false)
                    .build()
            })
            .with_property(|property| {
                property
                    .with_key(prototype)
                    .with_value_readonly(Value::Object(intrinsics.async_generator_prototype()))
                    .with_enumerable(false)
                    .build()
            })
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::TO_STRING_TAG))
                    .with_value_readonly(Value::from_str(agent, "AsyncGeneratorFunction"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}
