// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The ECMAScript language implicitly performs automatic type conversion as
//! needed. To clarify the semantics of certain constructs it is useful to
//! define a set of conversion abstract operations. The conversion abstract
//! operations are polymorphic; they can accept a value of any ECMAScript
//! language type. But no other specification types are used with these
//! operations.

use num_bigint::BigInt;
use num_traits::Num;

use super::{
    operations_on_objects::{call_function, get, get_method},
    testing_and_comparison::is_callable,
};
use crate::ecmascript::{
    builtins::{ordinary::ordinary_object_create, primitive_objects::string_create},
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{
        HeapBigInt, HeapString, Numeric, Object, ObjectKind, PropertyKey, Symbol, Value,
        bigint_to_f64, is_js_whitespace, number_to_string, primitive_prototype, string_to_number,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
///
/// The abstract operation ToPrimitive takes argument input (an ECMAScript
/// language value) and optional argument preferredType (STRING or NUMBER)
/// and returns either a normal completion containing an ECMAScript language
/// value or a throw completion. It converts its input argument to a
/// non-Object type. If an object is capable of converting to more than one
/// primitive type, it may use the optional hint preferredType to favour
/// that type.
pub(crate) fn to_primitive(
    agent: &Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    let Value::Object(input) = input else {
        // 2. Return input.
        return Ok(input);
    };
    // a. Let exoticToPrim be ? GetMethod(input, @@toPrimitive).
    let exotic_to_prim = get_method(agent, Value::Object(input), Symbol::TO_PRIMITIVE.into())?;
    // b. If exoticToPrim is not undefined, then
    if let Some(exotic_to_prim) = exotic_to_prim {
        let hint = match preferred_type {
            // i. If preferredType is not present, then
            // 1. Let hint be "default".
            None => "default",
            // ii. Else if preferredType is STRING, then
            // 1. Let hint be "string".
            Some(PreferredType::String) => "string",
            // iii. Else,
            // 1. Assert: preferredType is NUMBER.
            // 2. Let hint be "number".
            Some(PreferredType::Number) => "number",
        };
        let hint = Value::from_str(agent, hint);
        // iv. Let result be ? Call(exoticToPrim, input, « hint »).
        let result = call_function(agent, exotic_to_prim, Value::Object(input), &[hint])?;
        // v. If result is not an Object, return result.
        // vi. Throw a TypeError exception.
        if result.is_object() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot convert object to primitive value",
            ));
        }
        return Ok(result);
    }
    // c. If preferredType is not present, let preferredType be NUMBER.
    // d. Return ? OrdinaryToPrimitive(input, preferredType).
    ordinary_to_primitive(
        agent,
        input,
        preferred_type.unwrap_or(PreferredType::Number),
    )
}

/// ### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
pub(crate) fn ordinary_to_primitive(
    agent: &Agent,
    o: Object,
    hint: PreferredType,
) -> JsResult<Value> {
    // 1. If hint is STRING, then
    //     a. Let methodNames be « "toString", "valueOf" ».
    // 2. Else,
    //     a. Let methodNames be « "valueOf", "toString" ».
    let method_names = match hint {
        PreferredType::String => ["toString", "valueOf"],
        PreferredType::Number => ["valueOf", "toString"],
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let method = get(agent, o, PropertyKey::from_str(agent, name))?;
        // b. If IsCallable(method) is true, then
        if let Value::Object(method) = method
            && is_callable(agent, Value::Object(method))
        {
            // i. Let result be ? Call(method, O).
            let result = call_function(agent, method, Value::Object(o), &[])?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub(crate) fn to_boolean(agent: &Agent, argument: Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(b) => b,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or the
        // empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Number(n) => !(n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(agent),
        Value::BigInt(b) => !b.is_zero(agent),
        // 3. NOTE: This step is replaced in section B.3.6.1.
        // 4. Return true.
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// ### [7.1.3 ToNumeric ( value )](https://tc39.es/ecma262/#sec-tonumeric)
pub(crate) fn to_numeric(agent: &Agent, value: Value) -> JsResult<Numeric> {
    // 1. Let primValue be ? ToPrimitive(value, NUMBER).
    let prim_value = to_primitive(agent, value, Some(PreferredType::Number))?;
    // 2. If primValue is a BigInt, return primValue.
    if let Value::BigInt(b) = prim_value {
        return Ok(Numeric::BigInt(b));
    }
    // 3. Return ? ToNumber(primValue).
    Ok(Numeric::Number(to_number(agent, prim_value)?))
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub(crate) fn to_number(agent: &Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(n) => Ok(n),
        // 2. If argument is either a Symbol or a BigInt, throw a TypeError
        // exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a number",
        )),
        Value::BigInt(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a BigInt value to a number",
        )),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(s) => Ok(string_to_number(&s.as_rc(agent))),
        // 7. Assert: argument is an Object.
        Value::Object(_) => {
            // 8. Let primValue be ? ToPrimitive(argument, NUMBER).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::Number))?;
            // 9. Assert: primValue is not an Object.
            // 10. Return ? ToNumber(primValue).
            to_number(agent, prim_value)
        }
    }
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub(crate) fn to_integer_or_infinity(agent: &Agent, argument: Value) -> JsResult<f64> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    Ok(to_integer_or_infinity_number(number))
}

pub(crate) fn to_integer_or_infinity_number(number: f64) -> f64 {
    // 2. If number is one of NaN, +0𝔽, or -0𝔽, return 0.
    if number.is_nan() || number == 0.0 {
        return 0.0;
    }
    // 3. If number is one of +∞𝔽 or -∞𝔽, return number.
    // 4. Let integer be floor(abs(ℝ(number))).
    // 5. If number < -0𝔽, set integer to -integer.
    // 6. Return integer.
    number.trunc()
}

/// Modulo 2^bits, as used by ToInt32 and friends.
fn modulo_pow2(number: f64, bits: i32) -> f64 {
    // 1. If number is not finite or number is either +0𝔽 or -0𝔽, return +0𝔽.
    if !number.is_finite() || number == 0.0 {
        return 0.0;
    }
    // 2. Let int be truncate(ℝ(number)).
    let int = number.trunc();
    // 3. Let int32bit be int modulo 2^32.
    let modulus = 2f64.powi(bits);
    int.rem_euclid(modulus)
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub(crate) fn to_int32(agent: &Agent, argument: Value) -> JsResult<i32> {
    Ok(to_int32_number(to_number(agent, argument)?))
}

pub(crate) fn to_int32_number(number: f64) -> i32 {
    // 4. If int32bit ≥ 2^31, return 𝔽(int32bit - 2^32); otherwise return
    // 𝔽(int32bit).
    modulo_pow2(number, 32) as u32 as i32
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub(crate) fn to_uint32(agent: &Agent, argument: Value) -> JsResult<u32> {
    Ok(to_uint32_number(to_number(agent, argument)?))
}

pub(crate) fn to_uint32_number(number: f64) -> u32 {
    modulo_pow2(number, 32) as u32
}

/// ### [7.1.8 ToInt16 ( argument )](https://tc39.es/ecma262/#sec-toint16)
pub(crate) fn to_int16_number(number: f64) -> i16 {
    modulo_pow2(number, 16) as u16 as i16
}

/// ### [7.1.9 ToUint16 ( argument )](https://tc39.es/ecma262/#sec-touint16)
pub(crate) fn to_uint16_number(number: f64) -> u16 {
    modulo_pow2(number, 16) as u16
}

/// ### [7.1.10 ToInt8 ( argument )](https://tc39.es/ecma262/#sec-toint8)
pub(crate) fn to_int8_number(number: f64) -> i8 {
    modulo_pow2(number, 8) as u8 as i8
}

/// ### [7.1.11 ToUint8 ( argument )](https://tc39.es/ecma262/#sec-touint8)
pub(crate) fn to_uint8_number(number: f64) -> u8 {
    modulo_pow2(number, 8) as u8
}

/// ### [7.1.12 ToUint8Clamp ( argument )](https://tc39.es/ecma262/#sec-touint8clamp)
pub(crate) fn to_uint8_clamp_number(number: f64) -> u8 {
    // 2. If number is NaN, return +0𝔽.
    if number.is_nan() {
        return 0;
    }
    // 3. Let mv be the extended mathematical value of number.
    // 4. Let clamped be the result of clamping mv between 0 and 255.
    let clamped = number.clamp(0.0, 255.0);
    // 5. Let f be floor(clamped).
    let f = clamped.floor();
    // 6. If clamped < f + 0.5, return 𝔽(f).
    if clamped < f + 0.5 {
        return f as u8;
    }
    // 7. If clamped > f + 0.5, return 𝔽(f + 1).
    if clamped > f + 0.5 {
        return (f + 1.0) as u8;
    }
    // 8. If f is even, return 𝔽(f). Otherwise, return 𝔽(f + 1).
    if f % 2.0 == 0.0 { f as u8 } else { (f + 1.0) as u8 }
}

/// ### [7.1.13 ToBigInt ( argument )](https://tc39.es/ecma262/#sec-tobigint)
pub(crate) fn to_bigint(agent: &Agent, argument: Value) -> JsResult<HeapBigInt> {
    // 1. Let prim be ? ToPrimitive(argument, NUMBER).
    let prim = to_primitive(agent, argument, Some(PreferredType::Number))?;
    // 2. Return the value that prim corresponds to in Table 12.
    match prim {
        Value::Undefined | Value::Null => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot convert {} to a BigInt", prim.to_display_string(agent)),
        )),
        Value::Boolean(b) => Ok(HeapBigInt::from_i64(agent, i64::from(b))),
        Value::BigInt(b) => Ok(b),
        Value::Number(n) => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot convert {} to a BigInt", number_to_string(n)),
        )),
        Value::String(s) => {
            // 1. Let n be StringToBigInt(prim).
            let text = s.as_rc(agent);
            match string_to_bigint(&text) {
                Some(n) => Ok(HeapBigInt::new(agent, n)),
                // 2. If n is undefined, throw a SyntaxError exception.
                None => Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    format!("Cannot convert {text} to a BigInt"),
                )),
            }
        }
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a BigInt",
        )),
        Value::Object(_) => Err(agent.internal_error("ToPrimitive returned an object")),
    }
}

/// ### [7.1.14 StringToBigInt ( str )](https://tc39.es/ecma262/#sec-stringtobigint)
pub(crate) fn string_to_bigint(value: &str) -> Option<BigInt> {
    // 1. Let literal be ParseText(str, StringIntegerLiteral).
    let literal = value.trim_matches(is_js_whitespace);
    // 2. If literal is a List of errors, return undefined.
    // 3. Let mv be the MV of literal.
    // 4. Assert: mv is an integer.
    // 5. Return ℤ(mv).
    if literal.is_empty() {
        return Some(BigInt::from(0));
    }
    let bytes = literal.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => 16,
            b'o' | b'O' => 8,
            b'b' | b'B' => 2,
            _ => 0,
        };
        if radix != 0 {
            let digits = &literal[2..];
            if !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return BigInt::from_str_radix(digits, radix).ok();
        }
    }
    let (negative, digits) = match bytes[0] {
        b'+' => (false, &literal[1..]),
        b'-' => (true, &literal[1..]),
        _ => (false, literal),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = BigInt::from_str_radix(digits, 10).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub(crate) fn to_string(agent: &Agent, argument: Value) -> JsResult<HeapString> {
    match argument {
        // 1. If argument is a String, return argument.
        Value::String(s) => Ok(s),
        // 2. If argument is a Symbol, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a string",
        )),
        // 3. If argument is undefined, return "undefined".
        Value::Undefined => Ok(HeapString::from_str(agent, "undefined")),
        // 4. If argument is null, return "null".
        Value::Null => Ok(HeapString::from_str(agent, "null")),
        // 5. If argument is true, return "true".
        // 6. If argument is false, return "false".
        Value::Boolean(b) => Ok(HeapString::from_str(agent, if b { "true" } else { "false" })),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(n) => Ok(HeapString::from_str(agent, &number_to_string(n))),
        // 8. If argument is a BigInt, return BigInt::toString(argument, 10).
        Value::BigInt(b) => {
            let text = b.to_string_radix(agent, 10);
            Ok(HeapString::from_str(agent, &text))
        }
        // 9. Assert: argument is an Object.
        Value::Object(_) => {
            // 10. Let primValue be ? ToPrimitive(argument, STRING).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::String))?;
            // 11. Assert: primValue is not an Object.
            // 12. Return ? ToString(primValue).
            to_string(agent, prim_value)
        }
    }
}

/// ToString of a value into Rust text.
pub(crate) fn to_rust_string(agent: &Agent, argument: Value) -> JsResult<String> {
    Ok(to_string(agent, argument)?.to_rust_string(agent))
}

/// ### [7.1.18 ToObject ( argument )](https://tc39.es/ecma262/#sec-toobject)
pub(crate) fn to_object(agent: &Agent, argument: Value) -> JsResult<Object> {
    match argument {
        // Throw a TypeError exception.
        Value::Undefined | Value::Null => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Cannot convert {} to object",
                argument.to_display_string(agent)
            ),
        )),
        // Return argument.
        Value::Object(object) => Ok(object),
        // Return a new String object whose [[StringData]] internal slot is
        // set to argument.
        Value::String(string) => Ok(string_create(
            agent,
            string,
            primitive_prototype(agent, argument),
        )),
        // Return a new Boolean, Number, Symbol or BigInt object whose
        // internal slot is set to argument.
        _ => {
            let prototype = primitive_prototype(agent, argument);
            let object = ordinary_object_create(agent, prototype);
            agent.object_mut(object).kind = ObjectKind::PrimitiveWrapper(argument);
            Ok(object)
        }
    }
}

/// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
pub(crate) fn to_property_key(agent: &Agent, argument: Value) -> JsResult<PropertyKey> {
    // Fast path for keys that need no conversion.
    match argument {
        Value::String(s) => return Ok(PropertyKey::from_string(agent, s)),
        Value::Symbol(s) => return Ok(PropertyKey::Symbol(s)),
        Value::Number(n) if n >= 0.0 && n <= f64::from(u32::MAX - 1) && n.trunc() == n => {
            // -0 stringifies to "0" as well.
            return Ok(PropertyKey::Integer(n as u32));
        }
        _ => {}
    }
    // 1. Let key be ? ToPrimitive(argument, STRING).
    let key = to_primitive(agent, argument, Some(PreferredType::String))?;
    // 2. If key is a Symbol, then
    if let Value::Symbol(symbol) = key {
        // a. Return key.
        return Ok(PropertyKey::Symbol(symbol));
    }
    // 3. Return ! ToString(key).
    let key = to_string(agent, key)?;
    Ok(PropertyKey::from_string(agent, key))
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub(crate) fn to_length(agent: &Agent, argument: Value) -> JsResult<u64> {
    // 1. Let len be ? ToIntegerOrInfinity(argument).
    let len = to_integer_or_infinity(agent, argument)?;
    // 2. If len ≤ 0, return +0𝔽.
    if len <= 0.0 {
        return Ok(0);
    }
    // 3. Return 𝔽(min(len, 2^53 - 1)).
    Ok(len.min(9_007_199_254_740_991.0) as u64)
}

/// ### [7.1.22 ToIndex ( value )](https://tc39.es/ecma262/#sec-toindex)
pub(crate) fn to_index(agent: &Agent, value: Value) -> JsResult<u64> {
    // 1. Let integer be ? ToIntegerOrInfinity(value).
    let integer = to_integer_or_infinity(agent, value)?;
    // 2. If integer is not in the inclusive interval from 0 to 2^53 - 1,
    // throw a RangeError exception.
    if !(0.0..=9_007_199_254_740_991.0).contains(&integer) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Index out of range",
        ));
    }
    // 3. Return integer.
    Ok(integer as u64)
}

/// ### [6.1.6.2.21 BigInt::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-bigint-tostring)
/// applied to a Number, as used by the Number conversions of BigInts.
pub(crate) fn bigint_to_number(agent: &Agent, value: HeapBigInt) -> f64 {
    bigint_to_f64(&value.value(agent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn integer_conversions_wrap() {
        assert_eq!(to_int32_number(4294967296.0 + 5.0), 5);
        assert_eq!(to_int32_number(2147483648.0), -2147483648);
        assert_eq!(to_int32_number(-1.5), -1);
        assert_eq!(to_uint32_number(-1.0), 4294967295);
        assert_eq!(to_int32_number(f64::NAN), 0);
        assert_eq!(to_int8_number(200.0), -56);
        assert_eq!(to_uint16_number(65537.0), 1);
    }

    #[test]
    fn uint8_clamp_rounds_half_to_even() {
        assert_eq!(to_uint8_clamp_number(2.5), 2);
        assert_eq!(to_uint8_clamp_number(3.5), 4);
        assert_eq!(to_uint8_clamp_number(-3.0), 0);
        assert_eq!(to_uint8_clamp_number(300.0), 255);
    }

    #[test]
    fn string_integer_literals() {
        assert_eq!(string_to_bigint(" 42 "), Some(BigInt::from(42)));
        assert_eq!(string_to_bigint("-7"), Some(BigInt::from(-7)));
        assert_eq!(string_to_bigint("0x1f"), Some(BigInt::from(31)));
        assert_eq!(string_to_bigint(""), Some(BigInt::from(0)));
        assert_eq!(string_to_bigint("1.5"), None);
        assert_eq!(string_to_bigint("-0x1"), None);
    }

    #[test]
    fn strings_convert_to_string_exotic_objects() {
        assert_eq!(
            run_to_string(
                "var o = Object('ab');
                 [o.length, o[1], Object.keys(o).join('/'),
                  JSON.stringify(Array.prototype.map.call('ab', c => c + c)),
                  Array.prototype.indexOf.call('abc', 'c')].join()"
            ),
            "2,b,0/1,[\"aa\",\"bb\"],2"
        );
    }
}
