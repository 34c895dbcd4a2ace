// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.3 Boolean Objects](https://tc39.es/ecma262/#sec-boolean-objects)

use crate::ecmascript::{
    abstract_operations::type_conversion::to_boolean,
    builders::{
        builtin_function_builder::BuiltinFunctionBuilder,
        ordinary_object_builder::OrdinaryObjectBuilder,
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        ordinary::ordinary_create_from_constructor, primitive_objects::primitive_value,
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{Object, ObjectKind, Value},
};

pub(crate) struct BooleanConstructor;

impl Builtin for BooleanConstructor {
    const NAME: &'static str = "Boolean";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(BooleanConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for BooleanConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Boolean;
}

impl BooleanConstructor {
    /// ### [20.3.1.1 Boolean ( value )](https://tc39.es/ecma262/#sec-boolean-constructor-boolean-value)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let b be ToBoolean(value).
        let b = to_boolean(agent, arguments.get(0));
        // 2. If NewTarget is undefined, return b.
        let Some(new_target) = new_target else {
            return Ok(Value::Boolean(b));
        };
        // 3. Let O be ? OrdinaryCreateFromConstructor(NewTarget,
        // "%Boolean.prototype%", « [[BooleanData]] »).
        // 4. Set O.[[BooleanData]] to b.
        let o = ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Boolean,
            ObjectKind::PrimitiveWrapper(Value::Boolean(b)),
        )?;
        // 5. Return O.
        Ok(Value::Object(o))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let boolean_prototype = realm.intrinsics(agent).boolean_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<BooleanConstructor>(agent, realm)
            .with_property_capacity(1)
            .with_prototype_property(boolean_prototype)
            .build();
    }
}

pub(crate) struct BooleanPrototype;

struct BooleanPrototypeToString;
impl Builtin for BooleanPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BooleanPrototype::to_string);
}

struct BooleanPrototypeValueOf;
impl Builtin for BooleanPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BooleanPrototype::value_of);
}

impl BooleanPrototype {
    /// ### [20.3.3.2 Boolean.prototype.toString ( )](https://tc39.es/ecma262/#sec-boolean.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let b be ? ThisBooleanValue(this value).
        let b = this_boolean_value(agent, this_value)?;
        // 2. If b is true, return "true"; else return "false".
        Ok(Value::from_str(agent, if b { "true" } else { "false" }))
    }

    /// ### [20.3.3.3 Boolean.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-boolean.prototype.valueof)
    fn value_of(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ThisBooleanValue(this value).
        this_boolean_value(agent, this_value).map(Value::Boolean)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.boolean_prototype();

        // The Boolean prototype object is itself a Boolean object; it has a
        // [[BooleanData]] internal slot with the value false.
        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_kind(ObjectKind::PrimitiveWrapper(Value::Boolean(false)))
            .with_prototype(intrinsics.object_prototype())
            .with_property_capacity(3)
            .with_constructor_property(intrinsics.boolean())
            .with_builtin_function_property::<BooleanPrototypeToString>()
            .with_builtin_function_property::<BooleanPrototypeValueOf>()
            .build();
    }
}

/// ### [20.3.3.3.1 ThisBooleanValue ( value )](https://tc39.es/ecma262/#sec-thisbooleanvalue)
fn this_boolean_value(agent: &Agent, value: Value) -> JsResult<bool> {
    // 2. If value is an Object and value has a [[BooleanData]] internal slot,
    // then
    //   a. Let b be value.[[BooleanData]].
    let value = match value {
        Value::Object(o) => primitive_value(agent, o).unwrap_or(value),
        _ => value,
    };
    match value {
        // 1. If value is a Boolean, return value.
        Value::Boolean(b) => Ok(b),
        // 3. Throw a TypeError exception.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Boolean.prototype method called on incompatible receiver",
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn boolean_conversion_and_wrapping() {
        assert_eq!(run_to_string("Boolean('') + ' ' + Boolean({})"), "false true");
        assert_eq!(run_to_string("typeof new Boolean(false)"), "object");
        assert_eq!(run_to_string("new Boolean(false) ? 1 : 2"), "1");
        assert_eq!(run_to_string("new Boolean(0).valueOf()"), "false");
    }

    #[test]
    fn prototype_methods_require_booleans() {
        assert_eq!(run_to_string("true.toString()"), "true");
        assert_eq!(run_to_string("Boolean.prototype.valueOf()"), "false");
        assert_eq!(
            run_to_string("try { Boolean.prototype.toString.call(1) } catch (e) { e.name }"),
            "TypeError"
        );
    }
}
