// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::generator_resume;
use crate::{
    ecmascript::{
        builders::ordinary_object_builder::OrdinaryObjectBuilder,
        builtins::{ArgumentsList, Behaviour, Builtin},
        execution::{Agent, JsResult, Realm},
        types::{PropertyKey, Symbol, Value},
    },
    engine::coroutine::Resumption,
};

pub(crate) struct GeneratorPrototype;

struct GeneratorPrototypeNext;
impl Builtin for GeneratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GeneratorPrototype::next);
}

struct GeneratorPrototypeReturn;
impl Builtin for GeneratorPrototypeReturn {
    const NAME: &'static str = "return";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GeneratorPrototype::r#return);
}

struct GeneratorPrototypeThrow;
impl Builtin for GeneratorPrototypeThrow {
    const NAME: &'static str = "throw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GeneratorPrototype::throw);
}

impl GeneratorPrototype {
    /// ### [27.5.1.2 %GeneratorPrototype%.next ( value )](https://tc39.es/ecma262/#sec-generator.prototype.next)
    fn next(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? GeneratorResume(this value, value, EMPTY).
        generator_resume(agent, this_value, Resumption::Next(arguments.get(0)))
    }

    /// ### [27.5.1.3 %GeneratorPrototype%.return ( value )](https://tc39.es/ecma262/#sec-generator.prototype.return)
    fn r#return(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let g be the this value.
        // 2. Let C be ReturnCompletion(value).
        // 3. Return ? GeneratorResumeAbrupt(g, C, EMPTY).
        generator_resume(agent, this_value, Resumption::Return(arguments.get(0)))
    }

    /// ### [27.5.1.4 %GeneratorPrototype%.throw ( exception )](https://tc39.es/ecma262/#sec-generator.prototype.throw)
    fn throw(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let g be the this value.
        // 2. Let C be ThrowCompletion(exception).
        // 3. Return ? GeneratorResumeAbrupt(g, C, EMPTY).
        generator_resume(agent, this_value, Resumption::Throw(arguments.get(0)))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.generator_prototype();
        let constructor = PropertyKey::from_str(agent, "constructor");
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(5)
            .with_prototype(intrinsics.iterator_prototype())
            // ### [27.5.1.1 %GeneratorPrototype%.constructor](https://tc39.es/ecma262/#sec-generator.prototype.constructor)
            .with_property(|property| {
                property
                    .with_key(constructor)
                    .with_value_readonly(Value::Object(intrinsics.generator_function_prototype()))
                    .with_enumerable(false)
                    .build()
            })
            .with_builtin_function_property::<GeneratorPrototypeNext>()
            .with_builtin_function_property::<GeneratorPrototypeReturn>()
            .with_builtin_function_property::<GeneratorPrototypeThrow>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Generator"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}
