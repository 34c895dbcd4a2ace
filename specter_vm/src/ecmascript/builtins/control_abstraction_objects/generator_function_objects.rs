// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.3 GeneratorFunction Objects](https://tc39.es/ecma262/#sec-generatorfunction-objects)

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

pub(crate) struct GeneratorFunctionConstructor;

impl Builtin for GeneratorFunctionConstructor {
    const NAME: &'static str = "GeneratorFunction";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(GeneratorFunctionConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for GeneratorFunctionConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::GeneratorFunction;
}

impl GeneratorFunctionConstructor {
    /// ### [27.3.1.1 GeneratorFunction ( ...parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-generatorfunction)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let C be the active function object.
        let constructor = active_function(agent)?;
        // 2. If bodyArg is not present, set bodyArg to the empty String.
        // 3. Return ? CreateDynamicFunction(C, NewTarget, GENERATOR, parameterArgs, bodyArg).
        create_dynamic_function(
            agent,
            constructor,
            new_target,
            DynamicFunctionKind::Generator,
            &arguments,
        )
        .map(Value::Object)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        BuiltinFunctionBuilder::new_intrinsic_constructor::<GeneratorFunctionConstructor>(
            agent, realm,
        )
        .with_prototype(intrinsics.function())
        .with_property_capacity(1)
        .with_prototype_property(intrinsics.generator_function_prototype())
        .build();
    }
}

/// ### [27.3.3 Properties of the GeneratorFunction Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-generatorfunction-prototype-object)
pub(crate) struct GeneratorFunctionPrototype;

impl GeneratorFunctionPrototype {
    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.generator_function_prototype();
        let constructor = PropertyKey::from_str(agent, "constructor");
        let prototype = PropertyKey::from_str(agent, "prototype");

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(3)
            .with_prototype(intrinsics.function_prototype())
            .with_property(|property| {
                property
                    .with_key(constructor)
                    .with_value_readonly(Value::Object(intrinsics.generator_function()))
                    .with_enumerable(false)
                    .build()
            })
            .with_property(|property| {
                property
                    .with_key(prototype)
                    .with_value_readonly(Value::Object(intrinsics.generator_prototype()))
                    .with_enumerable(false)
                    .build()
            })
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::TO_STRING_TAG))
                    .with_value_readonly(Value::from_str(agent, "GeneratorFunction"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn generator_function_constructor_builds_generators() {
        assert_eq!(
            run_to_string(
                "var GeneratorFunction = Object.getPrototypeOf(function* () {}).constructor;
                 var g = new GeneratorFunction('a', 'yield a; yield a + 1;');
                 var it = g(4);
                 [GeneratorFunction.name, it.next().value, it.next().value].join()"
            ),
            "GeneratorFunction,4,5"
        );
    }

    #[test]
    fn generator_function_prototype_links() {
        assert_eq!(
            run_to_string(
                "var GeneratorFunction = Object.getPrototypeOf(function* () {}).constructor;
                 var proto = GeneratorFunction.prototype;
                 [Object.getPrototypeOf(proto) === Function.prototype,
                  proto.prototype === Object.getPrototypeOf((function* () {})()).__proto__,
                  Object.prototype.toString.call(proto)].join()"
            ),
            "true,true,[object GeneratorFunction]"
        );
    }
}
