// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::type_conversion::to_integer_or_infinity,
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, primitive_objects::primitive_value},
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{ObjectKind, Value, number_to_string, number_to_string_radix},
};

pub(crate) struct NumberPrototype;

struct NumberPrototypeToExponential;
impl Builtin for NumberPrototypeToExponential {
    const NAME: &'static str = "toExponential";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_exponential);
}

struct NumberPrototypeToFixed;
impl Builtin for NumberPrototypeToFixed {
    const NAME: &'static str = "toFixed";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_fixed);
}

struct NumberPrototypeToLocaleString;
impl Builtin for NumberPrototypeToLocaleString {
    const NAME: &'static str = "toLocaleString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_locale_string);
}

struct NumberPrototypeToPrecision;
impl Builtin for NumberPrototypeToPrecision {
    const NAME: &'static str = "toPrecision";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_precision);
}

struct NumberPrototypeToString;
impl Builtin for NumberPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_string);
}

struct NumberPrototypeValueOf;
impl Builtin for NumberPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::value_of);
}

impl NumberPrototype {
    /// ### [21.1.3.2 Number.prototype.toExponential ( fractionDigits )](https://tc39.es/ecma262/#sec-number.prototype.toexponential)
    fn to_exponential(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let fraction_digits = arguments.get(0);
        // 1. Let x be ? ThisNumberValue(this value).
        let x = this_number_value(agent, this_value)?;
        // 2. Let f be ? ToIntegerOrInfinity(fractionDigits).
        let f = to_integer_or_infinity(agent, fraction_digits)?;
        // 4. If x is not finite, return Number::toString(x, 10).
        if !x.is_finite() {
            return Ok(Value::from_string(agent, number_to_string(x)));
        }
        // 5. If f < 0 or f > 100, throw a RangeError exception.
        if !(0.0..=100.0).contains(&f) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toExponential() argument must be between 0 and 100",
            ));
        }
        // 6. Set x to ℝ(x).
        // 7. Let s be the empty String.
        // 8. If x < 0, then set s to "-" and x to -x.
        let sign = if x < 0.0 { "-" } else { "" };
        let x = x.abs();
        // 9. If x = 0, then
        //     a. Let m be the String value consisting of f + 1 occurrences of
        //     the code unit 0x0030 (DIGIT ZERO).
        //     b. Let e be 0.
        // 10. Else,
        //     a. If fractionDigits is not undefined, then let e and n be
        //     integers such that 10**f ≤ n < 10**(f + 1) and for which
        //     n × 10**(e - f) - x is as close to zero as possible. If there
        //     are two such sets of e and n, pick the e and n for which
        //     n × 10**(e - f) is larger.
        //     b. Else, let e, n, and f be integers such that f ≥ 0,
        //     10**f ≤ n < 10**(f + 1), 𝔽(n × 10**(e - f)) is 𝔽(x), and f is
        //     as small as possible.
        let (digits, e) = if x == 0.0 {
            let count = if fraction_digits.is_undefined() { 1 } else { f as usize + 1 };
            ("0".repeat(count), 0)
        } else if fraction_digits.is_undefined() {
            shortest_digits(x)
        } else {
            rounded_digits(x, f as usize + 1)
        };
        // 11. If f ≠ 0, then insert a "." after the first digit of m.
        let (a, b) = digits.split_at(1);
        let m = if b.is_empty() { a.to_owned() } else { format!("{a}.{b}") };
        // 12-14. Append "e", the exponent sign and the exponent digits.
        let c = if e < 0 { '-' } else { '+' };
        Ok(Value::from_string(agent, format!("{sign}{m}e{c}{}", e.unsigned_abs())))
    }

    /// ### [21.1.3.3 Number.prototype.toFixed ( fractionDigits )](https://tc39.es/ecma262/#sec-number.prototype.tofixed)
    ///
    /// > NOTE: The output of toFixed may be more precise than toString for
    /// > some values because toString only prints enough significant digits
    /// > to distinguish the number from adjacent Number values.
    fn to_fixed(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let x be ? ThisNumberValue(this value).
        let x = this_number_value(agent, this_value)?;
        // 2. Let f be ? ToIntegerOrInfinity(fractionDigits).
        let f = to_integer_or_infinity(agent, arguments.get(0))?;
        // 4. If f is not finite, throw a RangeError exception.
        // 5. If f < 0 or f > 100, throw a RangeError exception.
        if !(0.0..=100.0).contains(&f) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toFixed() digits argument must be between 0 and 100",
            ));
        }
        // 6. If x is not finite, return Number::toString(x, 10).
        // 10. If x ≥ 10**21, then let m be ! ToString(𝔽(x)).
        if !x.is_finite() || x.abs() >= 1e21 {
            return Ok(Value::from_string(agent, number_to_string(x)));
        }
        let mut buffer = ryu_js::Buffer::new();
        let fixed = buffer.format_to_fixed(x, f as u8);
        Ok(Value::from_str(agent, fixed))
    }

    /// ### [21.1.3.4 Number.prototype.toLocaleString ( \[ reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-number.prototype.tolocalestring)
    ///
    /// Without ECMA-402 this is the same as `toString()`.
    fn to_locale_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let x = this_number_value(agent, this_value)?;
        Ok(Value::from_string(agent, number_to_string(x)))
    }

    /// ### [21.1.3.5 Number.prototype.toPrecision ( precision )](https://tc39.es/ecma262/#sec-number.prototype.toprecision)
    fn to_precision(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let precision = arguments.get(0);
        // 1. Let x be ? ThisNumberValue(this value).
        let x = this_number_value(agent, this_value)?;
        // 2. If precision is undefined, return ! ToString(x).
        if precision.is_undefined() {
            return Ok(Value::from_string(agent, number_to_string(x)));
        }
        // 3. Let p be ? ToIntegerOrInfinity(precision).
        let p = to_integer_or_infinity(agent, precision)?;
        // 4. If x is not finite, return Number::toString(x, 10).
        if !x.is_finite() {
            return Ok(Value::from_string(agent, number_to_string(x)));
        }
        // 5. If p < 1 or p > 100, throw a RangeError exception.
        if !(1.0..=100.0).contains(&p) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toPrecision() argument must be between 1 and 100",
            ));
        }
        let p = p as usize;
        // 7. Let s be the empty String.
        // 8. If x < 0, then set s to "-" and x to -x.
        let sign = if x < 0.0 { "-" } else { "" };
        let x = x.abs();
        // 9. If x = 0, then let m be p zeroes and e be 0.
        // 10. Else, let e and n be integers such that 10**(p - 1) ≤ n < 10**p
        // and for which n × 10**(e - p + 1) - x is as close to zero as
        // possible, picking the larger n on a tie.
        let (m, e) = if x == 0.0 {
            ("0".repeat(p), 0)
        } else {
            rounded_digits(x, p)
        };
        let p = p as i32;
        // c. If e < -6 or e ≥ p, then use exponential notation.
        if x != 0.0 && (e < -6 || e >= p) {
            let (a, b) = m.split_at(1);
            let m = if b.is_empty() { a.to_owned() } else { format!("{a}.{b}") };
            let c = if e < 0 { '-' } else { '+' };
            return Ok(Value::from_string(
                agent,
                format!("{sign}{m}e{c}{}", e.unsigned_abs()),
            ));
        }
        // 11. If e = p - 1, return the string-concatenation of s and m.
        if e == p - 1 {
            return Ok(Value::from_string(agent, format!("{sign}{m}")));
        }
        let result = if e >= 0 {
            // 12. If e ≥ 0, then insert a "." after the first e + 1 digits.
            let (a, b) = m.split_at(e as usize + 1);
            format!("{sign}{a}.{b}")
        } else {
            // 13. Else, prefix "0." and -(e + 1) zeroes.
            format!("{sign}0.{}{m}", "0".repeat((-(e + 1)) as usize))
        };
        // 14. Return the string-concatenation of s and m.
        Ok(Value::from_string(agent, result))
    }

    /// ### [21.1.3.6 Number.prototype.toString ( \[ radix \] )](https://tc39.es/ecma262/#sec-number.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let x be ? ThisNumberValue(this value).
        let x = this_number_value(agent, this_value)?;
        let radix = arguments.get(0);
        // 2. If radix is undefined, let radixMV be 10.
        if radix.is_undefined() {
            return Ok(Value::from_string(agent, number_to_string(x)));
        }
        // 3. Else, let radixMV be ? ToIntegerOrInfinity(radix).
        let radix = to_integer_or_infinity(agent, radix)?;
        // 4. If radixMV is not in the inclusive interval from 2 to 36, throw a
        // RangeError exception.
        if !(2.0..=36.0).contains(&radix) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toString() radix must be between 2 and 36",
            ));
        }
        // 5. Return Number::toString(x, radixMV).
        Ok(Value::from_string(agent, number_to_string_radix(x, radix as u32)))
    }

    /// ### [21.1.3.7 Number.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-number.prototype.valueof)
    fn value_of(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ThisNumberValue(this value).
        this_number_value(agent, this_value).map(Value::Number)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.number_prototype();

        // The Number prototype object is itself a Number object; it has a
        // [[NumberData]] internal slot with the value +0𝔽.
        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_kind(ObjectKind::PrimitiveWrapper(Value::Number(0.0)))
            .with_prototype(intrinsics.object_prototype())
            .with_property_capacity(7)
            .with_constructor_property(intrinsics.number())
            .with_builtin_function_property::<NumberPrototypeToExponential>()
            .with_builtin_function_property::<NumberPrototypeToFixed>()
            .with_builtin_function_property::<NumberPrototypeToLocaleString>()
            .with_builtin_function_property::<NumberPrototypeToPrecision>()
            .with_builtin_function_property::<NumberPrototypeToString>()
            .with_builtin_function_property::<NumberPrototypeValueOf>()
            .build();
    }
}

/// ### [21.1.3.7.1 ThisNumberValue ( value )](https://tc39.es/ecma262/#sec-thisnumbervalue)
pub(crate) fn this_number_value(agent: &Agent, value: Value) -> JsResult<f64> {
    // 2. If value is an Object and value has a [[NumberData]] internal slot,
    // then
    //   a. Let n be value.[[NumberData]].
    let value = match value {
        Value::Object(o) => primitive_value(agent, o).unwrap_or(value),
        _ => value,
    };
    match value {
        // 1. If value is a Number, return value.
        Value::Number(n) => Ok(n),
        // 3. Throw a TypeError exception.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Number.prototype method called on incompatible receiver",
        )),
    }
}

/// Split Rust's scientific formatting `d.ddde±x` of a finite, positive
/// number into its digits and decimal exponent.
fn split_scientific(formatted: &str) -> (String, i32) {
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted, "0"));
    let digits = mantissa.replace('.', "");
    (digits, exponent.parse().unwrap_or(0))
}

/// The fewest significant digits that round-trip `x`, with the exponent of
/// the first digit.
fn shortest_digits(x: f64) -> (String, i32) {
    split_scientific(&format!("{x:e}"))
}

/// Exactly `count` significant digits of `x`, rounded half away from zero
/// on its exact binary value.
fn rounded_digits(x: f64, count: usize) -> (String, i32) {
    // 767 significant decimal digits are enough for the exact expansion of
    // any double.
    let (exact, mut exponent) = split_scientific(&format!("{x:.767e}"));
    let mut digits: Vec<u8> = exact.into_bytes();
    let round_up = digits.get(count).is_some_and(|digit| *digit >= b'5');
    digits.truncate(count);
    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            // 9.99 rounded into 10.0: one more power of ten.
            digits.insert(0, b'1');
            digits.truncate(count);
            exponent += 1;
        }
    }
    (String::from_utf8_lossy(&digits).into_owned(), exponent)
}

#[cfg(test)]
mod tests {
    use super::rounded_digits;
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn rounding_carries_into_the_exponent() {
        assert_eq!(rounded_digits(9.99, 2), ("10".to_owned(), 1));
        assert_eq!(rounded_digits(0.000123, 1), ("1".to_owned(), -4));
        assert_eq!(rounded_digits(2.5, 1), ("3".to_owned(), 0));
    }

    #[test]
    fn to_fixed_and_to_exponential() {
        assert_eq!(
            run_to_string("[(1.005).toFixed(2), (123.456).toFixed(1), (-1.5).toFixed(0), (1e21).toFixed(2)].join()"),
            "1.00,123.5,-2,1e+21"
        );
        assert_eq!(
            run_to_string("[(123456).toExponential(2), (0.00015).toExponential(), (0).toExponential(), (-5).toExponential(1)].join()"),
            "1.23e+5,1.5e-4,0e+0,-5.0e+0"
        );
        assert_eq!(
            run_to_string("try { (1).toFixed(101) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn to_precision_switches_notation() {
        assert_eq!(
            run_to_string(
                "[(123.456).toPrecision(4), (0.000123).toPrecision(2), (123456).toPrecision(2),
                  (1e-7).toPrecision(1), (5).toPrecision(3), (0).toPrecision(2)].join()"
            ),
            "123.5,0.00012,1.2e+5,1e-7,5.00,0.0"
        );
    }

    #[test]
    fn to_string_with_radix() {
        assert_eq!(
            run_to_string("[(255).toString(16), (255).toString(2), (-8).toString(8), (0.5).toString(2)].join()"),
            "ff,11111111,-10,0.1"
        );
        assert_eq!(
            run_to_string("try { (1).toString(1) } catch (e) { e.name }"),
            "RangeError"
        );
        assert_eq!(
            run_to_string("try { Number.prototype.valueOf.call('1') } catch (e) { e.name }"),
            "TypeError"
        );
    }
}
