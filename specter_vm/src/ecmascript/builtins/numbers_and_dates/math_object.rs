// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.3 The Math Object](https://tc39.es/ecma262/#sec-math-object)

use crate::ecmascript::{
    abstract_operations::type_conversion::{to_number, to_uint32, to_uint32_number},
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin,
        numbers_and_dates::number_objects::number_constant,
    },
    execution::{Agent, JsResult, Realm},
    types::{PropertyKey, Symbol, Value, exponentiate},
};

pub(crate) struct MathObject;

/// Declares a Math function of one argument that applies `$op` to
/// ToNumber(x).
macro_rules! math_unary {
    ($($builtin:ident, $name:literal, $op:expr;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = 1;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _, arguments| {
                    // 1. Let n be ? ToNumber(x).
                    let n = to_number(agent, arguments.get(0))?;
                    let op: fn(f64) -> f64 = $op;
                    Ok(Value::Number(op(n)))
                });
            }
        )*
    };
}

math_unary! {
    MathObjectAbs, "abs", f64::abs;
    MathObjectAcos, "acos", f64::acos;
    MathObjectAcosh, "acosh", f64::acosh;
    MathObjectAsin, "asin", f64::asin;
    MathObjectAsinh, "asinh", asinh;
    MathObjectAtan, "atan", f64::atan;
    MathObjectAtanh, "atanh", f64::atanh;
    MathObjectCbrt, "cbrt", f64::cbrt;
    MathObjectCeil, "ceil", f64::ceil;
    MathObjectClz32, "clz32", |n| f64::from(to_uint32_number(n).leading_zeros());
    MathObjectCos, "cos", f64::cos;
    MathObjectCosh, "cosh", f64::cosh;
    MathObjectExp, "exp", f64::exp;
    MathObjectExpm1, "expm1", f64::exp_m1;
    MathObjectFloor, "floor", f64::floor;
    MathObjectFround, "fround", |n| f64::from(n as f32);
    MathObjectLog, "log", f64::ln;
    MathObjectLog1p, "log1p", f64::ln_1p;
    MathObjectLog10, "log10", f64::log10;
    MathObjectLog2, "log2", f64::log2;
    MathObjectRound, "round", round;
    MathObjectSign, "sign", sign;
    MathObjectSin, "sin", f64::sin;
    MathObjectSinh, "sinh", f64::sinh;
    MathObjectSqrt, "sqrt", f64::sqrt;
    MathObjectTan, "tan", f64::tan;
    MathObjectTanh, "tanh", f64::tanh;
    MathObjectTrunc, "trunc", f64::trunc;
}

struct MathObjectAtan2;
impl Builtin for MathObjectAtan2 {
    const NAME: &'static str = "atan2";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::atan2);
}

struct MathObjectHypot;
impl Builtin for MathObjectHypot {
    const NAME: &'static str = "hypot";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::hypot);
}

struct MathObjectImul;
impl Builtin for MathObjectImul {
    const NAME: &'static str = "imul";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::imul);
}

struct MathObjectMax;
impl Builtin for MathObjectMax {
    const NAME: &'static str = "max";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::max);
}

struct MathObjectMin;
impl Builtin for MathObjectMin {
    const NAME: &'static str = "min";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::min);
}

struct MathObjectPow;
impl Builtin for MathObjectPow {
    const NAME: &'static str = "pow";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::pow);
}

struct MathObjectRandom;
impl Builtin for MathObjectRandom {
    const NAME: &'static str = "random";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::random);
}

/// `f64::asinh` loses the sign of -0.
fn asinh(n: f64) -> f64 {
    if n == 0.0 { n } else { n.asinh() }
}

/// ### [21.3.2.28 Math.round ( x )](https://tc39.es/ecma262/#sec-math.round)
fn round(n: f64) -> f64 {
    // 2. If n is not finite or n is an integral Number, return n.
    if !n.is_finite() || n.trunc() == n {
        return n;
    }
    // 3. If n < 0.5𝔽 and n > +0𝔽, return +0𝔽.
    if n > 0.0 && n < 0.5 {
        return 0.0;
    }
    // 4. If n < -0𝔽 and n ≥ -0.5𝔽, return -0𝔽.
    if (-0.5..0.0).contains(&n) {
        return -0.0;
    }
    // 5. Return the integral Number closest to n, preferring the Number
    // closer to +∞ in the case of a tie.
    let floor = n.floor();
    if n - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// ### [21.3.2.29 Math.sign ( x )](https://tc39.es/ecma262/#sec-math.sign)
fn sign(n: f64) -> f64 {
    // 2. If n is one of NaN, +0𝔽, or -0𝔽, return n.
    if n.is_nan() || n == 0.0 {
        return n;
    }
    // 3. If n < -0𝔽, return -1𝔽.
    // 4. Return 1𝔽.
    n.signum()
}

/// Coerce every argument with ToNumber before looking at any of them.
fn coerce_all(agent: &Agent, arguments: ArgumentsList) -> JsResult<Vec<f64>> {
    // 1. Let coerced be a new empty List.
    // 2. For each element arg of args, do
    //     a. Let n be ? ToNumber(arg).
    //     b. Append n to coerced.
    arguments
        .iter()
        .map(|argument| to_number(agent, *argument))
        .collect()
}

impl MathObject {
    /// ### [21.3.2.8 Math.atan2 ( y, x )](https://tc39.es/ecma262/#sec-math.atan2)
    fn atan2(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let ny be ? ToNumber(y).
        let ny = to_number(agent, arguments.get(0))?;
        // 2. Let nx be ? ToNumber(x).
        let nx = to_number(agent, arguments.get(1))?;
        Ok(Value::Number(ny.atan2(nx)))
    }

    /// ### [21.3.2.18 Math.hypot ( ...args )](https://tc39.es/ecma262/#sec-math.hypot)
    fn hypot(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let coerced = coerce_all(agent, arguments)?;
        // 3. For each element number of coerced, do
        //     a. If number is either +∞𝔽 or -∞𝔽, return +∞𝔽.
        if coerced.iter().any(|number| number.is_infinite()) {
            return Ok(Value::Number(f64::INFINITY));
        }
        // 5. For each element number of coerced, do
        //     a. If number is NaN, return NaN.
        if coerced.iter().any(|number| number.is_nan()) {
            return Ok(Value::Number(f64::NAN));
        }
        // 6. If onlyZero is true, return +0𝔽.
        // 7. Return an implementation-approximated Number value representing
        // the square root of the sum of squares of the mathematical values of
        // the elements of coerced.
        let scale = coerced.iter().fold(0f64, |max, number| max.max(number.abs()));
        if scale == 0.0 {
            return Ok(Value::Number(0.0));
        }
        let sum: f64 = coerced.iter().map(|number| (number / scale).powi(2)).sum();
        Ok(Value::Number(scale * sum.sqrt()))
    }

    /// ### [21.3.2.19 Math.imul ( x, y )](https://tc39.es/ecma262/#sec-math.imul)
    fn imul(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let a be ℝ(? ToUint32(x)).
        let a = to_uint32(agent, arguments.get(0))?;
        // 2. Let b be ℝ(? ToUint32(y)).
        let b = to_uint32(agent, arguments.get(1))?;
        // 3. Let product be (a × b) modulo 2**32.
        // 4. If product ≥ 2**31, return 𝔽(product - 2**32); otherwise return
        // 𝔽(product).
        Ok(Value::Number(f64::from(a.wrapping_mul(b) as i32)))
    }

    /// ### [21.3.2.24 Math.max ( ...args )](https://tc39.es/ecma262/#sec-math.max)
    fn max(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let coerced = coerce_all(agent, arguments)?;
        // 3. Let highest be -∞𝔽.
        let mut highest = f64::NEG_INFINITY;
        // 4. For each element number of coerced, do
        for number in coerced {
            // a. If number is NaN, return NaN.
            if number.is_nan() {
                return Ok(Value::Number(f64::NAN));
            }
            // b. If number is +0𝔽 and highest is -0𝔽, set highest to +0𝔽.
            // c. If number > highest, set highest to number.
            if number > highest || (number == 0.0 && highest == 0.0 && !number.is_sign_negative())
            {
                highest = number;
            }
        }
        // 5. Return highest.
        Ok(Value::Number(highest))
    }

    /// ### [21.3.2.25 Math.min ( ...args )](https://tc39.es/ecma262/#sec-math.min)
    fn min(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let coerced = coerce_all(agent, arguments)?;
        // 3. Let lowest be +∞𝔽.
        let mut lowest = f64::INFINITY;
        // 4. For each element number of coerced, do
        for number in coerced {
            // a. If number is NaN, return NaN.
            if number.is_nan() {
                return Ok(Value::Number(f64::NAN));
            }
            // b. If number is -0𝔽 and lowest is +0𝔽, set lowest to -0𝔽.
            // c. If number < lowest, set lowest to number.
            if number < lowest || (number == 0.0 && lowest == 0.0 && number.is_sign_negative()) {
                lowest = number;
            }
        }
        // 5. Return lowest.
        Ok(Value::Number(lowest))
    }

    /// ### [21.3.2.26 Math.pow ( base, exponent )](https://tc39.es/ecma262/#sec-math.pow)
    fn pow(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Set base to ? ToNumber(base).
        let base = to_number(agent, arguments.get(0))?;
        // 2. Set exponent to ? ToNumber(exponent).
        let exponent = to_number(agent, arguments.get(1))?;
        // 3. Return Number::exponentiate(base, exponent).
        Ok(Value::Number(exponentiate(base, exponent)))
    }

    /// ### [21.3.2.27 Math.random ( )](https://tc39.es/ecma262/#sec-math.random)
    fn random(_: &Agent, _: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Number(rand::random::<f64>()))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.math();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);
        let constant =
            |name: &str, value: f64| number_constant(PropertyKey::from_str(agent, name), value);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(44)
            .with_prototype(intrinsics.object_prototype())
            .with_property(constant("E", std::f64::consts::E))
            .with_property(constant("LN10", std::f64::consts::LN_10))
            .with_property(constant("LN2", std::f64::consts::LN_2))
            .with_property(constant("LOG10E", std::f64::consts::LOG10_E))
            .with_property(constant("LOG2E", std::f64::consts::LOG2_E))
            .with_property(constant("PI", std::f64::consts::PI))
            .with_property(constant("SQRT1_2", std::f64::consts::FRAC_1_SQRT_2))
            .with_property(constant("SQRT2", std::f64::consts::SQRT_2))
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Math"))
                    .with_enumerable(false)
                    .build()
            })
            .with_builtin_function_property::<MathObjectAbs>()
            .with_builtin_function_property::<MathObjectAcos>()
            .with_builtin_function_property::<MathObjectAcosh>()
            .with_builtin_function_property::<MathObjectAsin>()
            .with_builtin_function_property::<MathObjectAsinh>()
            .with_builtin_function_property::<MathObjectAtan>()
            .with_builtin_function_property::<MathObjectAtanh>()
            .with_builtin_function_property::<MathObjectAtan2>()
            .with_builtin_function_property::<MathObjectCbrt>()
            .with_builtin_function_property::<MathObjectCeil>()
            .with_builtin_function_property::<MathObjectClz32>()
            .with_builtin_function_property::<MathObjectCos>()
            .with_builtin_function_property::<MathObjectCosh>()
            .with_builtin_function_property::<MathObjectExp>()
            .with_builtin_function_property::<MathObjectExpm1>()
            .with_builtin_function_property::<MathObjectFloor>()
            .with_builtin_function_property::<MathObjectFround>()
            .with_builtin_function_property::<MathObjectHypot>()
            .with_builtin_function_property::<MathObjectImul>()
            .with_builtin_function_property::<MathObjectLog>()
            .with_builtin_function_property::<MathObjectLog1p>()
            .with_builtin_function_property::<MathObjectLog10>()
            .with_builtin_function_property::<MathObjectLog2>()
            .with_builtin_function_property::<MathObjectMax>()
            .with_builtin_function_property::<MathObjectMin>()
            .with_builtin_function_property::<MathObjectPow>()
            .with_builtin_function_property::<MathObjectRandom>()
            .with_builtin_function_property::<MathObjectRound>()
            .with_builtin_function_property::<MathObjectSign>()
            .with_builtin_function_property::<MathObjectSin>()
            .with_builtin_function_property::<MathObjectSinh>()
            .with_builtin_function_property::<MathObjectSqrt>()
            .with_builtin_function_property::<MathObjectTan>()
            .with_builtin_function_property::<MathObjectTanh>()
            .with_builtin_function_property::<MathObjectTrunc>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use super::round;
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn round_prefers_positive_infinity_on_ties() {
        assert_eq!(round(2.5), 3.0);
        assert_eq!(round(-2.5), -2.0);
        assert!(round(-0.2).is_sign_negative());
        assert_eq!(round(0.49999999999999994), 0.0);
    }

    #[test]
    fn min_and_max_order_signed_zeros() {
        assert_eq!(
            run_to_string(
                "[Object.is(Math.max(-0, 0), 0), Object.is(Math.min(0, -0), -0),
                  Math.max(), Math.min(), Math.max(1, NaN, 3)].join()"
            ),
            "true,true,-Infinity,Infinity,NaN"
        );
    }

    #[test]
    fn integer_helpers() {
        assert_eq!(
            run_to_string("[Math.imul(0xffffffff, 5), Math.clz32(1), Math.clz32(0), Math.sign(-3), Math.trunc(-4.7)].join()"),
            "-5,31,32,-1,-4"
        );
        assert_eq!(run_to_string("Math.hypot(3, 4) + ':' + Math.hypot(NaN, Infinity)"), "5:Infinity");
        assert_eq!(run_to_string("Math.fround(5.5) + ':' + Math.pow(2, 10)"), "5.5:1024");
    }

    #[test]
    fn constants_and_random() {
        assert_eq!(
            run_to_string(
                "var r = Math.random();
                 [r >= 0 && r < 1, Math.PI === 3.141592653589793,
                  Object.prototype.toString.call(Math),
                  Object.getOwnPropertyDescriptor(Math, 'E').writable].join()"
            ),
            "true,true,[object Math],false"
        );
    }
}
