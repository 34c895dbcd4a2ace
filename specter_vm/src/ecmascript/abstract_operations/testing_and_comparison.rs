// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use std::cmp::Ordering;

use super::type_conversion::{
    PreferredType, string_to_bigint, to_boolean, to_number, to_numeric, to_primitive,
};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::get,
    builtins::{behaviour_is_constructor, proxy::proxy_target},
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{
        HeapBigInt, InternalMethods, Numeric, Object, ObjectKind, PropertyKey, Symbol, Value,
        bigint_less_than, compare_bigint_number, number_same_value, number_same_value_zero,
        string_to_number,
    },
};

/// ### [7.2.1 RequireObjectCoercible ( argument )](https://tc39.es/ecma262/#sec-requireobjectcoercible)
///
/// The abstract operation RequireObjectCoercible takes argument argument (an
/// ECMAScript language value) and returns either a normal completion
/// containing an ECMAScript language value or a throw completion. It throws
/// an error if argument is a value that cannot be converted to an Object
/// using ToObject.
pub(crate) fn require_object_coercible(agent: &Agent, argument: Value) -> JsResult<Value> {
    if argument.is_nullish() {
        Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "{} is not coercible to an object",
                argument.to_display_string(agent)
            ),
        ))
    } else {
        Ok(argument)
    }
}

/// ### [7.2.2 IsArray ( argument )](https://tc39.es/ecma262/#sec-isarray)
pub(crate) fn is_array(agent: &Agent, argument: Value) -> JsResult<bool> {
    // 1. If argument is not an Object, return false.
    let Value::Object(argument) = argument else {
        return Ok(false);
    };
    // 2. If argument is an Array exotic object, return true.
    if argument.is_array_exotic(agent) {
        return Ok(true);
    }
    // 3. If argument is a Proxy exotic object, then
    if matches!(agent.object(argument).kind, ObjectKind::Proxy(_)) {
        // a. Perform ? ValidateNonRevokedProxy(argument).
        // b. Let proxyTarget be argument.[[ProxyTarget]].
        let Some(target) = proxy_target(agent, argument) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot perform 'IsArray' on a proxy that has been revoked",
            ));
        };
        // c. Return ? IsArray(proxyTarget).
        return is_array(agent, Value::Object(target));
    }
    // 4. Return false.
    Ok(false)
}

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
///
/// The abstract operation IsCallable takes argument argument (an ECMAScript
/// language value) and returns a Boolean. It determines if argument is a
/// callable function with a \[\[Call\]\] internal method.
pub(crate) fn is_callable(agent: &Agent, argument: Value) -> bool {
    // 1. If argument is not an Object, return false.
    let Value::Object(argument) = argument else {
        return false;
    };
    // 2. If argument has a [[Call]] internal method, return true.
    // 3. Return false.
    match &agent.object(argument).kind {
        ObjectKind::ECMAScriptFunction(_)
        | ObjectKind::BuiltinFunction(_)
        | ObjectKind::BuiltinClosure(_)
        | ObjectKind::BoundFunction(_) => true,
        ObjectKind::Proxy(data) => data.is_callable,
        _ => false,
    }
}

/// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
///
/// The abstract operation IsConstructor takes argument argument (an
/// ECMAScript language value) and returns a Boolean. It determines if
/// argument is a function object with a \[\[Construct\]\] internal method.
pub(crate) fn is_constructor(agent: &Agent, argument: Value) -> bool {
    // 1. If argument is not an Object, return false.
    let Value::Object(argument) = argument else {
        return false;
    };
    // 2. If argument has a [[Construct]] internal method, return true.
    // 3. Return false.
    let bound_target = match &agent.object(argument).kind {
        ObjectKind::ECMAScriptFunction(data) => return data.constructor_kind.is_some(),
        ObjectKind::BuiltinFunction(data) => return behaviour_is_constructor(data.behaviour),
        ObjectKind::BuiltinClosure(data) => return data.is_constructor,
        ObjectKind::Proxy(data) => return data.is_constructor,
        ObjectKind::BoundFunction(data) => data.bound_target_function,
        _ => return false,
    };
    is_constructor(agent, Value::Object(bound_target))
}

/// ### [7.2.5 IsExtensible ( O )](https://tc39.es/ecma262/#sec-isextensible-o)
pub(crate) fn is_extensible(agent: &Agent, o: Object) -> JsResult<bool> {
    // 1. Return ? O.[[IsExtensible]]().
    o.internal_is_extensible(agent)
}

/// ### [7.2.6 IsIntegralNumber ( argument )](https://tc39.es/ecma262/#sec-isintegralnumber)
pub(crate) fn is_integral_number(argument: Value) -> bool {
    // 1. If argument is not a Number, return false.
    let Value::Number(argument) = argument else {
        return false;
    };
    // 2. If argument is not finite, return false.
    // 3. If truncate(ℝ(argument)) ≠ ℝ(argument), return false.
    // 4. Return true.
    argument.is_finite() && argument.trunc() == argument
}

/// ### [7.2.8 IsRegExp ( argument )](https://tc39.es/ecma262/#sec-isregexp)
pub(crate) fn is_reg_exp(agent: &Agent, argument: Value) -> JsResult<bool> {
    // 1. If argument is not an Object, return false.
    let Value::Object(object) = argument else {
        return Ok(false);
    };
    // 2. Let matcher be ? Get(argument, @@match).
    let matcher = get(agent, object, PropertyKey::Symbol(Symbol::MATCH))?;
    // 3. If matcher is not undefined, return ToBoolean(matcher).
    if !matcher.is_undefined() {
        return Ok(to_boolean(agent, matcher));
    }
    // 4. If argument has a [[RegExpMatcher]] internal slot, return true.
    // 5. Return false.
    #[cfg(feature = "regexp")]
    {
        Ok(matches!(agent.object(object).kind, ObjectKind::RegExp(_)))
    }
    #[cfg(not(feature = "regexp"))]
    {
        Ok(false)
    }
}

/// ### [7.2.9 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
///
/// The abstract operation SameValue takes arguments x (an ECMAScript
/// language value) and y (an ECMAScript language value) and returns a
/// Boolean. It determines whether or not the two arguments are the same
/// value.
pub(crate) fn same_value(agent: &Agent, x: Value, y: Value) -> bool {
    // 2. If x is a Number, then
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        // a. Return Number::sameValue(x, y).
        return number_same_value(x, y);
    }
    // 1. If Type(x) is not Type(y), return false.
    // 3. Return SameValueNonNumber(x, y).
    same_value_non_number(agent, x, y)
}

/// ### [7.2.10 SameValueZero ( x, y )](https://tc39.es/ecma262/#sec-samevaluezero)
pub(crate) fn same_value_zero(agent: &Agent, x: Value, y: Value) -> bool {
    // 2. If x is a Number, then
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        // a. Return Number::sameValueZero(x, y).
        return number_same_value_zero(x, y);
    }
    // 3. Return SameValueNonNumber(x, y).
    same_value_non_number(agent, x, y)
}

/// ### [7.2.11 SameValueNonNumber ( x, y )](https://tc39.es/ecma262/#sec-samevaluenonnumber)
fn same_value_non_number(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        // 2. If x is either null or undefined, return true.
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        // 3. If x is a BigInt, then
        // a. Return BigInt::equal(x, y).
        (Value::BigInt(x), Value::BigInt(y)) => HeapBigInt::equal(agent, x, y),
        // 4. If x is a String, then
        // a. If x and y have the same length and the same code units in the
        // same positions, return true; otherwise, return false.
        // Strings are interned, so equal contents share one handle.
        (Value::String(x), Value::String(y)) => x == y,
        // 5. If x is a Boolean, then
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        // 6. NOTE: All other ECMAScript language values are compared by
        // identity.
        // 7. If x is y, return true; otherwise, return false.
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x == y,
        _ => false,
    }
}

/// ### [7.2.14 IsLessThan ( x, y, LeftFirst )](https://tc39.es/ecma262/#sec-islessthan)
///
/// Returns `None` for the undefined result of IsLessThan, which happens when either
/// operand is NaN.
pub(crate) fn is_less_than<const LEFT_FIRST: bool>(
    agent: &Agent,
    x: Value,
    y: Value,
) -> JsResult<Option<bool>> {
    // 1. If LeftFirst is true, then
    let (px, py) = if LEFT_FIRST {
        // a. Let px be ? ToPrimitive(x, NUMBER).
        let px = to_primitive(agent, x, Some(PreferredType::Number))?;
        // b. Let py be ? ToPrimitive(y, NUMBER).
        let py = to_primitive(agent, y, Some(PreferredType::Number))?;
        (px, py)
    } else {
        // 2. Else,
        // a. NOTE: The order of evaluation needs to be reversed to preserve
        // left to right evaluation.
        // b. Let py be ? ToPrimitive(y, NUMBER).
        let py = to_primitive(agent, y, Some(PreferredType::Number))?;
        // c. Let px be ? ToPrimitive(x, NUMBER).
        let px = to_primitive(agent, x, Some(PreferredType::Number))?;
        (px, py)
    };

    // 3. If px is a String and py is a String, then
    if let (Value::String(sx), Value::String(sy)) = (px, py) {
        // a. Let lx be the length of px.
        // b. Let ly be the length of py.
        // c. For each integer i such that 0 ≤ i < min(lx, ly), in ascending
        // order, do
        // i. Let cx be the numeric value of the code unit at index i within px.
        // ii. Let cy be the numeric value of the code unit at index i within py.
        // iii. If cx < cy, return true.
        // iv. If cx > cy, return false.
        // d. If lx < ly, return true. Otherwise, return false.
        let x = sx.code_units(agent);
        let y = sy.code_units(agent);
        return Ok(Some(x < y));
    }

    // 4. Else,
    // a. If px is a BigInt and py is a String, then
    if let (Value::BigInt(bx), Value::String(sy)) = (px, py) {
        // i. Let ny be StringToBigInt(py).
        // ii. If ny is undefined, return undefined.
        let Some(ny) = string_to_bigint(&sy.as_rc(agent)) else {
            return Ok(None);
        };
        // iii. Return BigInt::lessThan(px, ny).
        return Ok(Some(bx.value(agent) < ny));
    }
    // b. If px is a String and py is a BigInt, then
    if let (Value::String(sx), Value::BigInt(by)) = (px, py) {
        // i. Let nx be StringToBigInt(px).
        // ii. If nx is undefined, return undefined.
        let Some(nx) = string_to_bigint(&sx.as_rc(agent)) else {
            return Ok(None);
        };
        // iii. Return BigInt::lessThan(nx, py).
        return Ok(Some(nx < by.value(agent)));
    }

    // c. NOTE: Because px and py are primitive values, evaluation order is
    // not important.
    // d. Let nx be ? ToNumeric(px).
    let nx = to_numeric(agent, px)?;
    // e. Let ny be ? ToNumeric(py).
    let ny = to_numeric(agent, py)?;

    match (nx, ny) {
        // f. If Type(nx) is Type(ny), then
        // i. If nx is a Number, then
        // 1. Return Number::lessThan(nx, ny).
        (Numeric::Number(x), Numeric::Number(y)) => {
            if x.is_nan() || y.is_nan() {
                Ok(None)
            } else {
                Ok(Some(x < y))
            }
        }
        // ii. Else,
        // 1. Assert: nx is a BigInt.
        // 2. Return BigInt::lessThan(nx, ny).
        (Numeric::BigInt(x), Numeric::BigInt(y)) => Ok(Some(bigint_less_than(agent, x, y))),
        // g. Assert: nx is a BigInt and ny is a Number, or nx is a Number and
        // ny is a BigInt.
        // h. If nx or ny is NaN, return undefined.
        // i. If nx is -∞𝔽 or ny is +∞𝔽, return true.
        // j. If nx is +∞𝔽 or ny is -∞𝔽, return false.
        // k. If ℝ(nx) < ℝ(ny), return true; otherwise return false.
        (Numeric::BigInt(x), Numeric::Number(y)) => Ok(
            compare_bigint_number(&x.value(agent), y).map(|ordering| ordering == Ordering::Less),
        ),
        (Numeric::Number(x), Numeric::BigInt(y)) => Ok(compare_bigint_number(&y.value(agent), x)
            .map(|ordering| ordering == Ordering::Greater)),
    }
}

/// ### [7.2.15 IsLooselyEqual ( x, y )](https://tc39.es/ecma262/#sec-islooselyequal)
///
/// The abstract operation IsLooselyEqual takes arguments x (an ECMAScript
/// language value) and y (an ECMAScript language value) and returns either
/// a normal completion containing a Boolean or a throw completion. It
/// provides the semantics for the == operator.
pub(crate) fn is_loosely_equal(agent: &Agent, x: Value, y: Value) -> JsResult<bool> {
    match (x, y) {
        // 1. If Type(x) is Type(y), then
        // a. Return IsStrictlyEqual(x, y).
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => Ok(true),
        (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Boolean(_), Value::Boolean(_))
        | (Value::Symbol(_), Value::Symbol(_))
        | (Value::BigInt(_), Value::BigInt(_))
        | (Value::Object(_), Value::Object(_)) => Ok(is_strictly_equal(agent, x, y)),
        // 2. If x is null and y is undefined, return true.
        // 3. If x is undefined and y is null, return true.
        // 4. NOTE: This step is replaced in section B.3.6.2.
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => Ok(false),
        // 5. If x is a Number and y is a String, return ! IsLooselyEqual(x,
        // ! ToNumber(y)).
        (Value::Number(_), Value::String(y)) => {
            let y = string_to_number(&y.as_rc(agent));
            is_loosely_equal(agent, x, Value::Number(y))
        }
        // 6. If x is a String and y is a Number, return ! IsLooselyEqual(!
        // ToNumber(x), y).
        (Value::String(x), Value::Number(_)) => {
            let x = string_to_number(&x.as_rc(agent));
            is_loosely_equal(agent, Value::Number(x), y)
        }
        // 7. If x is a BigInt and y is a String, then
        (Value::BigInt(bx), Value::String(sy)) => {
            // a. Let n be StringToBigInt(y).
            // b. If n is undefined, return false.
            // c. Return ! IsLooselyEqual(x, n).
            Ok(string_to_bigint(&sy.as_rc(agent)).is_some_and(|n| bx.value(agent) == n))
        }
        // 8. If x is a String and y is a BigInt, return ! IsLooselyEqual(y, x).
        (Value::String(_), Value::BigInt(_)) => is_loosely_equal(agent, y, x),
        // 9. If x is a Boolean, return ! IsLooselyEqual(! ToNumber(x), y).
        (Value::Boolean(_), _) => {
            let x = to_number(agent, x)?;
            is_loosely_equal(agent, Value::Number(x), y)
        }
        // 10. If y is a Boolean, return ! IsLooselyEqual(x, ! ToNumber(y)).
        (_, Value::Boolean(_)) => {
            let y = to_number(agent, y)?;
            is_loosely_equal(agent, x, Value::Number(y))
        }
        // 11. If x is either a String, a Number, a BigInt, or a Symbol and y
        // is an Object, return ! IsLooselyEqual(x, ? ToPrimitive(y)).
        (_, Value::Object(_)) => {
            let y = to_primitive(agent, y, None)?;
            is_loosely_equal(agent, x, y)
        }
        // 12. If x is an Object and y is either a String, a Number, a BigInt,
        // or a Symbol, return ! IsLooselyEqual(? ToPrimitive(x), y).
        (Value::Object(_), _) => {
            let x = to_primitive(agent, x, None)?;
            is_loosely_equal(agent, x, y)
        }
        // 13. If x is a BigInt and y is a Number, or if x is a Number and y
        // is a BigInt, then
        // a. If x is not finite or y is not finite, return false.
        // b. If ℝ(x) = ℝ(y), return true; otherwise return false.
        (Value::BigInt(x), Value::Number(y)) | (Value::Number(y), Value::BigInt(x)) => {
            Ok(compare_bigint_number(&x.value(agent), y) == Some(Ordering::Equal))
        }
        // 14. Return false.
        _ => Ok(false),
    }
}

/// ### [7.2.16 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
pub(crate) fn is_strictly_equal(agent: &Agent, x: Value, y: Value) -> bool {
    // 2. If x is a Number, then
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        // a. Return Number::equal(x, y).
        return x == y;
    }
    // 1. If Type(x) is not Type(y), return false.
    // 3. Return SameValueNonNumber(x, y).
    same_value_non_number(agent, x, y)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, agent::Options};

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    #[test]
    fn same_value_distinguishes_signed_zero() {
        let agent = agent();
        assert!(!same_value(&agent, Value::Number(0.0), Value::Number(-0.0)));
        assert!(same_value_zero(&agent, Value::Number(0.0), Value::Number(-0.0)));
        assert!(same_value(&agent, Value::Number(f64::NAN), Value::Number(f64::NAN)));
        assert!(!is_strictly_equal(&agent, Value::Number(f64::NAN), Value::Number(f64::NAN)));
        assert!(is_strictly_equal(&agent, Value::Number(0.0), Value::Number(-0.0)));
    }

    #[test]
    fn loose_equality_coerces() {
        let agent = agent();
        let one = Value::from_str(&agent, "1");
        assert_eq!(is_loosely_equal(&agent, Value::Number(1.0), one), Ok(true));
        assert_eq!(is_loosely_equal(&agent, Value::Null, Value::Undefined), Ok(true));
        assert_eq!(is_loosely_equal(&agent, Value::Null, Value::Number(0.0)), Ok(false));
        assert_eq!(
            is_loosely_equal(&agent, Value::Boolean(true), Value::Number(1.0)),
            Ok(true)
        );
        let big = Value::BigInt(HeapBigInt::from_i64(&agent, 1));
        assert_eq!(is_loosely_equal(&agent, big, Value::Number(1.0)), Ok(true));
        assert_eq!(is_loosely_equal(&agent, big, one), Ok(true));
    }

    #[test]
    fn string_comparison_uses_code_units() {
        let agent = agent();
        let a = Value::from_str(&agent, "a");
        let b = Value::from_str(&agent, "b");
        assert_eq!(is_less_than::<true>(&agent, a, b), Ok(Some(true)));
        assert_eq!(is_less_than::<true>(&agent, b, a), Ok(Some(false)));
        assert_eq!(
            is_less_than::<true>(&agent, Value::Number(f64::NAN), Value::Number(1.0)),
            Ok(None)
        );
    }
}
