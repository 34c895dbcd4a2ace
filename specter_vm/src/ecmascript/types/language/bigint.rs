// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.6.2 The BigInt Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-bigint-type)

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

use crate::ecmascript::execution::{Agent, JsError, JsResult, agent::ExceptionType};

/// Handle to an immutable arbitrary precision integer in the agent heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapBigInt(pub(crate) u32);

impl HeapBigInt {
    pub fn new(agent: &Agent, value: BigInt) -> Self {
        agent.heap_mut().create_bigint(value)
    }

    pub fn from_i64(agent: &Agent, value: i64) -> Self {
        Self::new(agent, BigInt::from(value))
    }

    pub fn value(self, agent: &Agent) -> BigInt {
        agent.heap().bigints[self.0 as usize].clone()
    }

    pub fn is_zero(self, agent: &Agent) -> bool {
        agent.heap().bigints[self.0 as usize].is_zero()
    }

    /// ### [6.1.6.2.21 BigInt::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-bigint-tostring)
    pub fn to_string_radix(self, agent: &Agent, radix: u32) -> String {
        agent.heap().bigints[self.0 as usize].to_str_radix(radix)
    }

    /// ### [6.1.6.2.13 BigInt::equal ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-bigint-equal)
    pub fn equal(agent: &Agent, x: Self, y: Self) -> bool {
        let heap = agent.heap();
        heap.bigints[x.0 as usize] == heap.bigints[y.0 as usize]
    }
}

/// Largest BigInt the engine creates, in bits. Operations whose result
/// would be wider throw a RangeError instead of exhausting host memory.
pub(crate) const MAX_BIGINT_BITS: u64 = 1 << 30;

/// Arithmetic of the BigInt type, shared by the binary operators and the
/// BigInt builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BigIntOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponentiate,
    LeftShift,
    SignedRightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

pub(crate) fn bigint_binary(
    agent: &Agent,
    operation: BigIntOperation,
    x: HeapBigInt,
    y: HeapBigInt,
) -> JsResult<HeapBigInt> {
    let x = x.value(agent);
    let y = y.value(agent);
    let result = match operation {
        BigIntOperation::Add => x + y,
        BigIntOperation::Subtract => x - y,
        BigIntOperation::Multiply => {
            if x.bits() + y.bits() > MAX_BIGINT_BITS {
                return Err(size_exceeded(agent));
            }
            x * y
        }
        BigIntOperation::Divide | BigIntOperation::Remainder => {
            // 1. If y is 0ℤ, throw a RangeError exception.
            if y.is_zero() {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Division by zero",
                ));
            }
            // Truncating division and remainder with the sign of the
            // dividend, as num-bigint implements them.
            if operation == BigIntOperation::Divide {
                x / y
            } else {
                x % y
            }
        }
        BigIntOperation::Exponentiate => {
            // 1. If exponent < 0ℤ, throw a RangeError exception.
            if y.is_negative() {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Exponent must be non-negative",
                ));
            }
            // 0, 1 and -1 stay narrow for any exponent.
            if x.bits() <= 1 {
                let odd = y.bit(0);
                let result = if x.is_zero() {
                    BigInt::from(u8::from(y.is_zero()))
                } else if x.is_negative() && odd {
                    BigInt::from(-1)
                } else {
                    BigInt::from(1)
                };
                return Ok(HeapBigInt::new(agent, result));
            }
            let exponent = match y.to_u32() {
                Some(exponent)
                    if x.bits().saturating_mul(u64::from(exponent)) <= MAX_BIGINT_BITS =>
                {
                    exponent
                }
                _ => return Err(size_exceeded(agent)),
            };
            num_traits::pow::Pow::pow(x, exponent)
        }
        BigIntOperation::LeftShift | BigIntOperation::SignedRightShift => {
            let left = operation == BigIntOperation::LeftShift;
            let (left, magnitude) = if y.is_negative() {
                (!left, -y)
            } else {
                (left, y)
            };
            let shift = magnitude.to_u64().unwrap_or(u64::MAX);
            if x.is_zero() {
                BigInt::zero()
            } else if left {
                if x.bits().saturating_add(shift) > MAX_BIGINT_BITS {
                    return Err(size_exceeded(agent));
                }
                x << shift
            } else if shift >= x.bits() {
                // Every bit is shifted out.
                if x.is_negative() {
                    BigInt::from(-1)
                } else {
                    BigInt::zero()
                }
            } else {
                floor_shift_right(x, shift)
            }
        }
        BigIntOperation::BitwiseAnd => x & y,
        BigIntOperation::BitwiseOr => x | y,
        BigIntOperation::BitwiseXor => x ^ y,
    };
    Ok(HeapBigInt::new(agent, result))
}

fn size_exceeded(agent: &Agent) -> JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::RangeError,
        "Maximum BigInt size exceeded",
    )
}

fn floor_shift_right(x: BigInt, shift: u64) -> BigInt {
    if x.sign() != Sign::Minus {
        return x >> shift;
    }
    // -((-x - 1) >> n) - 1
    let one = BigInt::from(1);
    -(((-x) - &one) >> shift) - one
}

/// ### [6.1.6.2.14 BigInt::lessThan ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-bigint-lessThan)
pub(crate) fn bigint_less_than(agent: &Agent, x: HeapBigInt, y: HeapBigInt) -> bool {
    let heap = agent.heap();
    heap.bigints[x.0 as usize] < heap.bigints[y.0 as usize]
}

/// Compare a BigInt with a Number, as used by IsLessThan and
/// IsLooselyEqual. Returns `None` when the Number is NaN.
pub(crate) fn compare_bigint_number(value: &BigInt, number: f64) -> Option<std::cmp::Ordering> {
    use std::cmp::Ordering;
    if number.is_nan() {
        return None;
    }
    if number == f64::INFINITY {
        return Some(Ordering::Less);
    }
    if number == f64::NEG_INFINITY {
        return Some(Ordering::Greater);
    }
    let truncated = number.trunc();
    let integer = num_bigint_from_f64(truncated)?;
    match value.cmp(&integer) {
        Ordering::Equal => {
            let fraction = number - truncated;
            if fraction > 0.0 {
                Some(Ordering::Less)
            } else if fraction < 0.0 {
                Some(Ordering::Greater)
            } else {
                Some(Ordering::Equal)
            }
        }
        ordering => Some(ordering),
    }
}

/// Exact conversion of an integral `f64` to a BigInt.
pub(crate) fn num_bigint_from_f64(value: f64) -> Option<BigInt> {
    if !value.is_finite() || value.trunc() != value {
        return None;
    }
    num_traits::FromPrimitive::from_f64(value)
}

/// ### [6.1.6.2.20 BigInt::toNumber](https://tc39.es/ecma262/#sec-numeric-types-bigint-tonumber)
pub(crate) fn bigint_to_f64(value: &BigInt) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn signed_right_shift_floors() {
        assert_eq!(floor_shift_right(BigInt::from(-5), 1), BigInt::from(-3));
        assert_eq!(floor_shift_right(BigInt::from(5), 1), BigInt::from(2));
    }

    #[test]
    fn oversized_results_throw_range_errors() {
        assert_eq!(
            run_to_string(
                "var names = [];
                 for (var f of [() => 1n << 100000000000n, () => 2n ** 4294967296n,
                                () => 3n ** 1000000000n, () => -1n >> -2000000000n]) {
                     try { f(); names.push('none'); } catch (e) { names.push(e.name); }
                 }
                 names.join()"
            ),
            "RangeError,RangeError,RangeError,RangeError"
        );
        assert_eq!(
            run_to_string(
                "[1n ** 100000000000n, (-1n) ** 100000000001n, 0n ** 0n, 0n << 100000000000n,
                  5n >> 100000000000n, -5n >> 100000000000n, 5n << -100000000000n].join()"
            ),
            "1,-1,1,0,0,-1,0"
        );
    }

    #[test]
    fn bigint_number_comparison() {
        use std::cmp::Ordering;
        let ten = BigInt::from(10);
        assert_eq!(compare_bigint_number(&ten, 10.5), Some(Ordering::Less));
        assert_eq!(compare_bigint_number(&ten, 10.0), Some(Ordering::Equal));
        assert_eq!(compare_bigint_number(&ten, 9.5), Some(Ordering::Greater));
        assert_eq!(compare_bigint_number(&ten, f64::NAN), None);
    }
}
