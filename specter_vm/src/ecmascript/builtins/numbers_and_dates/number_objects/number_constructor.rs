// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        testing_and_comparison::is_integral_number,
        type_conversion::{bigint_to_number, to_numeric},
    },
    builders::{
        builtin_function_builder::BuiltinFunctionBuilder,
        property_builder::{NoKey, PropertyBuilder},
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        ordinary::ordinary_create_from_constructor,
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm},
    types::{Numeric, Object, ObjectKind, Property, PropertyKey, Value},
};

/// ### [21.1.1.1 Number ( value )](https://tc39.es/ecma262/#sec-number-constructor-number-value)
pub(crate) struct NumberConstructor;

impl Builtin for NumberConstructor {
    const NAME: &'static str = "Number";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(NumberConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for NumberConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Number;
}

struct NumberIsFinite;
impl Builtin for NumberIsFinite {
    const NAME: &'static str = "isFinite";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_finite);
}

struct NumberIsInteger;
impl Builtin for NumberIsInteger {
    const NAME: &'static str = "isInteger";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_integer);
}

struct NumberIsNaN;
impl Builtin for NumberIsNaN {
    const NAME: &'static str = "isNaN";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_nan);
}

struct NumberIsSafeInteger;
impl Builtin for NumberIsSafeInteger {
    const NAME: &'static str = "isSafeInteger";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_safe_integer);
}

/// 2^53 - 1
const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

impl NumberConstructor {
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If value is present, then
        let n = if arguments.is_empty() {
            // 2. Else, let n be +0𝔽.
            0.0
        } else {
            // a. Let prim be ? ToNumeric(value).
            match to_numeric(agent, arguments.get(0))? {
                // b. If prim is a BigInt, let n be 𝔽(ℝ(prim)).
                Numeric::BigInt(b) => bigint_to_number(agent, b),
                // c. Otherwise, let n be prim.
                Numeric::Number(n) => n,
            }
        };
        // 3. If NewTarget is undefined, return n.
        let Some(new_target) = new_target else {
            return Ok(Value::Number(n));
        };
        // 4. Let O be ? OrdinaryCreateFromConstructor(NewTarget,
        // "%Number.prototype%", « [[NumberData]] »).
        // 5. Set O.[[NumberData]] to n.
        let o = ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Number,
            ObjectKind::PrimitiveWrapper(Value::Number(n)),
        )?;
        // 6. Return O.
        Ok(Value::Object(o))
    }

    /// ### [21.1.2.2 Number.isFinite ( number )](https://tc39.es/ecma262/#sec-number.isfinite)
    fn is_finite(_: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If number is not a Number, return false.
        // 2. If number is not finite, return false.
        // 3. Otherwise, return true.
        Ok(Value::Boolean(
            matches!(arguments.get(0), Value::Number(n) if n.is_finite()),
        ))
    }

    /// ### [21.1.2.3 Number.isInteger ( number )](https://tc39.es/ecma262/#sec-number.isinteger)
    fn is_integer(_: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Return IsIntegralNumber(number).
        Ok(Value::Boolean(is_integral_number(arguments.get(0))))
    }

    /// ### [21.1.2.4 Number.isNaN ( number )](https://tc39.es/ecma262/#sec-number.isnan)
    fn is_nan(_: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If number is not a Number, return false.
        // 2. If number is NaN, return true.
        Ok(Value::Boolean(
            matches!(arguments.get(0), Value::Number(n) if n.is_nan()),
        ))
    }

    /// ### [21.1.2.5 Number.isSafeInteger ( number )](https://tc39.es/ecma262/#sec-number.issafeinteger)
    fn is_safe_integer(_: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If IsIntegralNumber(number) is true, then
        //     a. If abs(ℝ(number)) ≤ 2**53 - 1, return true.
        // 2. Return false.
        let number = arguments.get(0);
        Ok(Value::Boolean(
            is_integral_number(number)
                && matches!(number, Value::Number(n) if n.abs() <= MAX_SAFE_INTEGER),
        ))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let number_prototype = intrinsics.number_prototype();
        let parse_float = intrinsics.parse_float();
        let parse_int = intrinsics.parse_int();

        let constant = |name: &str, value: f64| {
            number_constant(PropertyKey::from_str(agent, name), value)
        };

        BuiltinFunctionBuilder::new_intrinsic_constructor::<NumberConstructor>(agent, realm)
            .with_property_capacity(14)
            .with_property(constant("EPSILON", f64::EPSILON))
            .with_builtin_function_property::<NumberIsFinite>()
            .with_builtin_function_property::<NumberIsInteger>()
            .with_builtin_function_property::<NumberIsNaN>()
            .with_builtin_function_property::<NumberIsSafeInteger>()
            .with_property(constant("MAX_SAFE_INTEGER", MAX_SAFE_INTEGER))
            .with_property(constant("MAX_VALUE", f64::MAX))
            .with_property(constant("MIN_SAFE_INTEGER", -MAX_SAFE_INTEGER))
            .with_property(constant("MIN_VALUE", 5e-324))
            .with_property(constant("NaN", f64::NAN))
            .with_property(constant("NEGATIVE_INFINITY", f64::NEG_INFINITY))
            .with_data_property(
                PropertyKey::from_str(agent, "parseFloat"),
                Value::Object(parse_float),
            )
            .with_data_property(
                PropertyKey::from_str(agent, "parseInt"),
                Value::Object(parse_int),
            )
            .with_property(constant("POSITIVE_INFINITY", f64::INFINITY))
            .with_prototype_property(number_prototype)
            .build();
    }
}

/// A non-writable, non-enumerable, non-configurable Number valued property.
pub(crate) fn number_constant(
    key: PropertyKey,
    value: f64,
) -> impl FnOnce(PropertyBuilder<'_, NoKey>) -> (PropertyKey, Property) {
    move |property| {
        property
            .with_key(key)
            .with_value_readonly(Value::Number(value))
            .with_enumerable(false)
            .with_configurable(false)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn converts_and_wraps() {
        assert_eq!(run_to_string("Number('  12  ') + Number() + Number(10n)"), "22");
        assert_eq!(run_to_string("typeof new Number(1) + ':' + (new Number(5) + 1)"), "object:6");
        assert_eq!(run_to_string("Number('0x1f') + ':' + Number('1e3')"), "31:1000");
    }

    #[test]
    fn predicates_do_not_coerce() {
        assert_eq!(
            run_to_string(
                "[Number.isNaN('x'), Number.isNaN(NaN), Number.isFinite('1'),
                  Number.isInteger(5.0), Number.isInteger(5.5),
                  Number.isSafeInteger(2 ** 53), Number.isSafeInteger(2 ** 53 - 1)].join()"
            ),
            "false,true,false,true,false,false,true"
        );
    }

    #[test]
    fn constants_are_frozen_and_parsers_are_shared() {
        assert_eq!(
            run_to_string(
                "Number.parseInt === parseInt && Number.parseFloat === parseFloat &&
                 Object.getOwnPropertyDescriptor(Number, 'MAX_SAFE_INTEGER').writable === false &&
                 Number.MIN_VALUE > 0 && Number.EPSILON === 2 ** -52"
            ),
            "true"
        );
    }
}
