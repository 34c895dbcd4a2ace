// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::ecmascript::{
    abstract_operations::type_conversion::{PreferredType, to_bigint, to_index, to_primitive},
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor},
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{
        HeapBigInt, MAX_BIGINT_BITS, Object, Value, num_bigint_from_f64, number_to_string,
    },
};

/// ### [21.2.1.1 BigInt ( value )](https://tc39.es/ecma262/#sec-bigint-constructor-number-value)
pub(crate) struct BigIntConstructor;

impl Builtin for BigIntConstructor {
    const NAME: &'static str = "BigInt";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(BigIntConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for BigIntConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::BigInt;
}

struct BigIntAsIntN;
impl Builtin for BigIntAsIntN {
    const NAME: &'static str = "asIntN";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntConstructor::as_int_n);
}

struct BigIntAsUintN;
impl Builtin for BigIntAsUintN {
    const NAME: &'static str = "asUintN";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntConstructor::as_uint_n);
}

impl BigIntConstructor {
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is not undefined, throw a TypeError exception.
        if new_target.is_some() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "BigInt is not a constructor",
            ));
        }
        // 2. Let prim be ? ToPrimitive(value, NUMBER).
        let prim = to_primitive(agent, arguments.get(0), Some(PreferredType::Number))?;
        // 3. If prim is a Number, return ? NumberToBigInt(prim).
        if let Value::Number(number) = prim {
            return number_to_bigint(agent, number).map(Value::BigInt);
        }
        // 4. Otherwise, return ? ToBigInt(prim).
        to_bigint(agent, prim).map(Value::BigInt)
    }

    /// ### [21.2.2.1 BigInt.asIntN ( bits, bigint )](https://tc39.es/ecma262/#sec-bigint.asintn)
    fn as_int_n(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Set bits to ? ToIndex(bits).
        let bits = to_index(agent, arguments.get(0))?;
        // 2. Set bigint to ? ToBigInt(bigint).
        let bigint = to_bigint(agent, arguments.get(1))?.value(agent);
        if bits == 0 {
            return Ok(Value::BigInt(HeapBigInt::new(agent, BigInt::zero())));
        }
        // Already in -2**(bits-1) .. 2**(bits-1).
        if bigint.bits() < bits {
            return Ok(Value::BigInt(HeapBigInt::new(agent, bigint)));
        }
        // 3. Let mod be ℝ(bigint) modulo 2**bits.
        let modulus = BigInt::one() << bits;
        let remainder = ((bigint % &modulus) + &modulus) % &modulus;
        // 4. If mod ≥ 2**(bits - 1), return ℤ(mod - 2**bits); otherwise,
        // return ℤ(mod).
        let result = if remainder >= (BigInt::one() << (bits - 1)) {
            remainder - modulus
        } else {
            remainder
        };
        Ok(Value::BigInt(HeapBigInt::new(agent, result)))
    }

    /// ### [21.2.2.2 BigInt.asUintN ( bits, bigint )](https://tc39.es/ecma262/#sec-bigint.asuintn)
    fn as_uint_n(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Set bits to ? ToIndex(bits).
        let bits = to_index(agent, arguments.get(0))?;
        // 2. Set bigint to ? ToBigInt(bigint).
        let bigint = to_bigint(agent, arguments.get(1))?.value(agent);
        // Non-negative values narrower than the modulus are unchanged.
        if bigint >= BigInt::zero() && bigint.bits() <= bits {
            return Ok(Value::BigInt(HeapBigInt::new(agent, bigint)));
        }
        if bits > MAX_BIGINT_BITS {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Maximum BigInt size exceeded",
            ));
        }
        // 3. Return ℤ(ℝ(bigint) modulo 2**bits).
        let modulus = BigInt::one() << bits;
        let result = ((bigint % &modulus) + &modulus) % &modulus;
        Ok(Value::BigInt(HeapBigInt::new(agent, result)))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let bigint_prototype = realm.intrinsics(agent).bigint_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<BigIntConstructor>(agent, realm)
            .with_property_capacity(3)
            .with_builtin_function_property::<BigIntAsIntN>()
            .with_builtin_function_property::<BigIntAsUintN>()
            .with_prototype_property(bigint_prototype)
            .build();
    }
}

/// ### [21.2.1.1.1 NumberToBigInt ( number )](https://tc39.es/ecma262/#sec-numbertobigint)
fn number_to_bigint(agent: &Agent, number: f64) -> JsResult<HeapBigInt> {
    // 1. If IsIntegralNumber(number) is false, throw a RangeError exception.
    // 2. Return ℤ(ℝ(number)).
    match num_bigint_from_f64(number) {
        Some(value) => Ok(HeapBigInt::new(agent, value)),
        None => Err(agent.throw_exception(
            ExceptionType::RangeError,
            format!(
                "The number {} cannot be converted to a BigInt because it is not an integer",
                number_to_string(number)
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn converts_numbers_strings_and_booleans() {
        assert_eq!(
            run_to_string("[BigInt(10), BigInt('0x10'), BigInt(true), BigInt(' 7 '), typeof BigInt(1)].join()"),
            "10,16,1,7,bigint"
        );
        assert_eq!(run_to_string("try { BigInt(1.5) } catch (e) { e.name }"), "RangeError");
        assert_eq!(run_to_string("try { BigInt('1.5') } catch (e) { e.name }"), "SyntaxError");
        assert_eq!(run_to_string("try { new BigInt(1) } catch (e) { e.name }"), "TypeError");
    }

    #[test]
    fn as_int_n_and_as_uint_n_wrap() {
        assert_eq!(
            run_to_string(
                "[BigInt.asIntN(8, 255n), BigInt.asIntN(8, 127n), BigInt.asIntN(8, -129n),
                  BigInt.asUintN(8, -1n), BigInt.asUintN(8, 256n), BigInt.asIntN(0, 5n),
                  BigInt.asIntN(64, 2n ** 63n)].join()"
            ),
            "-1,127,127,255,0,0,-9223372036854775808"
        );
    }
}
