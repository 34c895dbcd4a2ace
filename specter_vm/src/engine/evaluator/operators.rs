// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [13.5 Unary Operators](https://tc39.es/ecma262/#sec-unary-operators) to [13.12 Binary Bitwise Operators](https://tc39.es/ecma262/#sec-binary-bitwise-operators)

use specter_ast::{
    ast::{BinaryExpression, Expression, UnaryExpression, UpdateExpression},
    operators::{BinaryOperator, UnaryOperator, UpdateOperator},
};

use super::{
    evaluate_expression,
    expressions::{chain_reference, evaluate_reference},
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{has_property, instance_of_operator, private_element_find},
        testing_and_comparison::{is_less_than, is_loosely_equal, is_strictly_equal},
        type_conversion::{
            to_boolean, to_int32_number, to_numeric, to_object, to_primitive,
            to_property_key, to_string, to_uint32_number,
        },
    },
    execution::{Agent, JsResult, agent::ExceptionType, resolve_private_identifier},
    types::{
        Base, BigIntOperation, Completion, HeapBigInt, HeapString, InternalMethods, Numeric,
        ReferencedName, Value, bigint_binary, exponentiate, get_value, put_value,
    },
};

/// ### [13.15.3 ApplyStringOrNumericBinaryOperator ( lval, opText, rval )](https://tc39.es/ecma262/#sec-applystringornumericbinaryoperator)
pub(crate) fn apply_string_or_numeric_binary_operator(
    agent: &Agent,
    lval: Value,
    op: BinaryOperator,
    rval: Value,
) -> JsResult<Value> {
    let (lval, rval) = if op == BinaryOperator::Addition {
        // 1. If opText is +, then
        // a. Let lprim be ? ToPrimitive(lval).
        let lprim = to_primitive(agent, lval, None)?;
        // b. Let rprim be ? ToPrimitive(rval).
        let rprim = to_primitive(agent, rval, None)?;
        // c. If lprim is a String or rprim is a String, then
        if lprim.is_string() || rprim.is_string() {
            // i. Let lstr be ? ToString(lprim).
            let lstr = to_string(agent, lprim)?;
            // ii. Let rstr be ? ToString(rprim).
            let rstr = to_string(agent, rprim)?;
            // iii. Return the string-concatenation of lstr and rstr.
            return Ok(Value::String(HeapString::concat(agent, &[lstr, rstr])));
        }
        // d. Set lval to lprim.
        // e. Set rval to rprim.
        (lprim, rprim)
    } else {
        (lval, rval)
    };
    // 2. NOTE: At this point, it must be a numeric operation.
    // 3. Let lnum be ? ToNumeric(lval).
    let lnum = to_numeric(agent, lval)?;
    // 4. Let rnum be ? ToNumeric(rval).
    let rnum = to_numeric(agent, rval)?;
    match (lnum, rnum) {
        // 7. Let operation be the abstract operation associated with opText
        // and Type(lnum) in the following table:
        // 8. Return operation(lnum, rnum).
        (Numeric::Number(x), Numeric::Number(y)) => Ok(Value::Number(number_operation(op, x, y))),
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            let operation = match op {
                BinaryOperator::Addition => BigIntOperation::Add,
                BinaryOperator::Subtraction => BigIntOperation::Subtract,
                BinaryOperator::Multiplication => BigIntOperation::Multiply,
                BinaryOperator::Division => BigIntOperation::Divide,
                BinaryOperator::Remainder => BigIntOperation::Remainder,
                BinaryOperator::Exponential => BigIntOperation::Exponentiate,
                BinaryOperator::ShiftLeft => BigIntOperation::LeftShift,
                BinaryOperator::ShiftRight => BigIntOperation::SignedRightShift,
                BinaryOperator::ShiftRightZeroFill => {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "BigInts have no unsigned right shift, use >> instead",
                    ));
                }
                BinaryOperator::BitwiseAnd => BigIntOperation::BitwiseAnd,
                BinaryOperator::BitwiseOr => BigIntOperation::BitwiseOr,
                BinaryOperator::BitwiseXor => BigIntOperation::BitwiseXor,
                _ => return Err(agent.internal_error("not a numeric binary operator")),
            };
            Ok(Value::BigInt(bigint_binary(agent, operation, x, y)?))
        }
        // 5. If Type(lnum) is not Type(rnum), throw a TypeError exception.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot mix BigInt and other types, use explicit conversions",
        )),
    }
}

/// The Number::* operations of Table 38.
fn number_operation(op: BinaryOperator, x: f64, y: f64) -> f64 {
    match op {
        BinaryOperator::Addition => x + y,
        BinaryOperator::Subtraction => x - y,
        BinaryOperator::Multiplication => x * y,
        BinaryOperator::Division => x / y,
        // ### [6.1.6.1.6 Number::remainder ( n, d )](https://tc39.es/ecma262/#sec-numeric-types-number-remainder)
        BinaryOperator::Remainder => {
            if x.is_nan() || y.is_nan() || x.is_infinite() || y == 0.0 {
                f64::NAN
            } else if y.is_infinite() || x == 0.0 {
                x
            } else {
                // Rust's % truncates like ECMA-262's r = n - (d × q); the
                // sign of a zero result follows the dividend.
                let r = x % y;
                if r == 0.0 { 0.0_f64.copysign(x) } else { r }
            }
        }
        BinaryOperator::Exponential => exponentiate(x, y),
        BinaryOperator::ShiftLeft => {
            f64::from(to_int32_number(x).wrapping_shl(to_uint32_number(y) % 32))
        }
        BinaryOperator::ShiftRight => {
            f64::from(to_int32_number(x).wrapping_shr(to_uint32_number(y) % 32))
        }
        BinaryOperator::ShiftRightZeroFill => {
            f64::from(to_uint32_number(x).wrapping_shr(to_uint32_number(y) % 32))
        }
        BinaryOperator::BitwiseAnd => f64::from(to_int32_number(x) & to_int32_number(y)),
        BinaryOperator::BitwiseOr => f64::from(to_int32_number(x) | to_int32_number(y)),
        BinaryOperator::BitwiseXor => f64::from(to_int32_number(x) ^ to_int32_number(y)),
        _ => f64::NAN,
    }
}

/// Evaluation of a binary expression whose operands are both evaluated
/// before the operator applies.
pub(super) async fn evaluate_binary_expression(
    agent: &Agent,
    expression: &BinaryExpression,
) -> Completion<Value> {
    // 1. Let lref be ? Evaluation of the left operand.
    // 2. Let lval be ? GetValue(lref).
    let lval = evaluate_expression(agent, &expression.left).await?;
    // 3. Let rref be ? Evaluation of the right operand.
    // 4. Let rval be ? GetValue(rref).
    let rval = evaluate_expression(agent, &expression.right).await?;
    Ok(binary_operation(agent, expression.operator, lval, rval)?)
}

pub(crate) fn binary_operation(
    agent: &Agent,
    op: BinaryOperator,
    lval: Value,
    rval: Value,
) -> JsResult<Value> {
    let result = match op {
        // ### [13.10.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-relational-operators-runtime-semantics-evaluation)
        BinaryOperator::LessThan => {
            // 5. Let r be ? IsLessThan(lval, rval, true).
            // 6. If r is undefined, return false. Otherwise, return r.
            is_less_than::<true>(agent, lval, rval)?.unwrap_or(false)
        }
        BinaryOperator::GreaterThan => {
            // 5. Let r be ? IsLessThan(rval, lval, false).
            is_less_than::<false>(agent, rval, lval)?.unwrap_or(false)
        }
        BinaryOperator::LessEqualThan => {
            // 5. Let r be ? IsLessThan(rval, lval, false).
            // 6. If r is either true or undefined, return false. Otherwise,
            // return true.
            is_less_than::<false>(agent, rval, lval)? == Some(false)
        }
        BinaryOperator::GreaterEqualThan => {
            // 5. Let r be ? IsLessThan(lval, rval, true).
            is_less_than::<true>(agent, lval, rval)? == Some(false)
        }
        BinaryOperator::Instanceof => {
            // 5. Return ? InstanceofOperator(lval, rval).
            instance_of_operator(agent, lval, rval)?
        }
        BinaryOperator::In => {
            // 5. If rval is not an Object, throw a TypeError exception.
            let Value::Object(rval) = rval else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "Cannot use 'in' operator to search for a key in {}",
                        rval.to_display_string(agent)
                    ),
                ));
            };
            // 6. Return ? HasProperty(rval, ? ToPropertyKey(lval)).
            let key = to_property_key(agent, lval)?;
            has_property(agent, rval, key)?
        }
        // ### [13.11.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-equality-operators-runtime-semantics-evaluation)
        BinaryOperator::Equality => is_loosely_equal(agent, lval, rval)?,
        BinaryOperator::Inequality => !is_loosely_equal(agent, lval, rval)?,
        BinaryOperator::StrictEquality => is_strictly_equal(agent, lval, rval),
        BinaryOperator::StrictInequality => !is_strictly_equal(agent, lval, rval),
        // ### [13.15.4 EvaluateStringOrNumericBinaryExpression ( leftOperand, opText, rightOperand )](https://tc39.es/ecma262/#sec-evaluatestringornumericbinaryexpression)
        _ => return apply_string_or_numeric_binary_operator(agent, lval, op, rval),
    };
    Ok(Value::Boolean(result))
}

/// ### [13.10.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-relational-operators-runtime-semantics-evaluation)
///
/// RelationalExpression : PrivateIdentifier in ShiftExpression
pub(super) async fn evaluate_private_in(
    agent: &Agent,
    name: &str,
    right: &Expression,
) -> Completion<Value> {
    // 1. Let privateIdentifier be the StringValue of PrivateIdentifier.
    // 2. Let rref be ? Evaluation of ShiftExpression.
    // 3. Let rval be ? GetValue(rref).
    let rval = evaluate_expression(agent, right).await?;
    // 4. If rval is not an Object, throw a TypeError exception.
    let Value::Object(rval) = rval else {
        return Err(agent
            .throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot use 'in' operator to search for a private field in a primitive",
            )
            .into());
    };
    // 5. Let privateEnv be the running execution context's PrivateEnvironment.
    // 6. Let privateName be ResolvePrivateIdentifier(privateEnv, privateIdentifier).
    let identifier = HeapString::from_str(agent, &format!("#{name}"));
    let Some(private_name) =
        resolve_private_identifier(agent, super::private_environment(agent), identifier)
    else {
        return Err(agent
            .throw_exception(
                ExceptionType::SyntaxError,
                format!("Private field '#{name}' must be declared in an enclosing class"),
            )
            .into());
    };
    // 7. If PrivateElementFind(rval, privateName) is not EMPTY, return true.
    // 8. Return false.
    Ok(Value::Boolean(
        private_element_find(agent, rval, private_name).is_some(),
    ))
}

/// ### [13.5 Unary Operators](https://tc39.es/ecma262/#sec-unary-operators)
pub(super) async fn evaluate_unary_expression(
    agent: &Agent,
    expression: &UnaryExpression,
) -> Completion<Value> {
    match expression.operator {
        UnaryOperator::Delete => evaluate_delete(agent, &expression.argument).await,
        UnaryOperator::Typeof => evaluate_typeof(agent, &expression.argument).await,
        // ### [13.5.2.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-void-operator-runtime-semantics-evaluation)
        UnaryOperator::Void => {
            // 1. Let expr be ? Evaluation of UnaryExpression.
            // 2. Perform ? GetValue(expr).
            evaluate_expression(agent, &expression.argument).await?;
            // 3. Return undefined.
            Ok(Value::Undefined)
        }
        // ### [13.5.4.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-unary-plus-operator-runtime-semantics-evaluation)
        UnaryOperator::Plus => {
            let value = evaluate_expression(agent, &expression.argument).await?;
            // 2. Return ? ToNumber(? GetValue(expr)).
            Ok(Value::Number(
                crate::ecmascript::abstract_operations::type_conversion::to_number(agent, value)?,
            ))
        }
        // ### [13.5.5.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-unary-minus-operator-runtime-semantics-evaluation)
        UnaryOperator::Minus => {
            let value = evaluate_expression(agent, &expression.argument).await?;
            // 2. Let oldValue be ? ToNumeric(? GetValue(expr)).
            // 3. If oldValue is a Number, return Number::unaryMinus(oldValue).
            // 4. Else, return BigInt::unaryMinus(oldValue).
            Ok(match to_numeric(agent, value)? {
                Numeric::Number(n) => Value::Number(-n),
                Numeric::BigInt(b) => {
                    let negated = -b.value(agent);
                    Value::BigInt(HeapBigInt::new(agent, negated))
                }
            })
        }
        // ### [13.5.6.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-bitwise-not-operator-runtime-semantics-evaluation)
        UnaryOperator::BitwiseNot => {
            let value = evaluate_expression(agent, &expression.argument).await?;
            Ok(match to_numeric(agent, value)? {
                Numeric::Number(n) => Value::from(!to_int32_number(n)),
                Numeric::BigInt(b) => {
                    let not = !b.value(agent);
                    Value::BigInt(HeapBigInt::new(agent, not))
                }
            })
        }
        // ### [13.5.7.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-logical-not-operator-runtime-semantics-evaluation)
        UnaryOperator::LogicalNot => {
            let value = evaluate_expression(agent, &expression.argument).await?;
            // 2. Let oldValue be ToBoolean(? GetValue(expr)).
            // 3. If oldValue is true, return false.
            // 4. Return true.
            Ok(Value::Boolean(!to_boolean(agent, value)))
        }
    }
}

/// ### [13.5.1.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-delete-operator-runtime-semantics-evaluation)
async fn evaluate_delete(agent: &Agent, argument: &Expression) -> Completion<Value> {
    // 1. Let ref be ? Evaluation of UnaryExpression.
    let reference = match argument.inner() {
        Expression::Identifier(_) | Expression::Member(_) | Expression::SuperMember(_) => {
            evaluate_reference(agent, argument).await?
        }
        Expression::OptionalChain(chain) => match chain_reference(agent, chain).await? {
            Some(reference) => reference,
            // `delete a?.b` with a nullish `a` short-circuits.
            None => return Ok(Value::Boolean(true)),
        },
        _ => {
            // 2. If ref is not a Reference Record, return true.
            evaluate_expression(agent, argument).await?;
            return Ok(Value::Boolean(true));
        }
    };
    // 3. If IsUnresolvableReference(ref) is true, then
    match reference.base {
        // a. Assert: ref.[[Strict]] is false.
        // b. Return true.
        Base::Unresolvable => Ok(Value::Boolean(true)),
        // 4. If IsPropertyReference(ref) is true, then
        Base::Value(base) => {
            // a. Assert: IsPrivateReference(ref) is false.
            if reference.is_private_reference() {
                return Err(agent.internal_error("deleting a private reference").into());
            }
            // b. If IsSuperReference(ref) is true, throw a ReferenceError exception.
            if reference.is_super_reference() {
                return Err(agent
                    .throw_exception_with_static_message(
                        ExceptionType::ReferenceError,
                        "Unsupported reference to 'super'",
                    )
                    .into());
            }
            // c. Let baseObj be ? ToObject(ref.[[Base]]).
            let base_obj = to_object(agent, base)?;
            // d. If ref.[[ReferencedName]] is not a property key, then
            // i. Set ref.[[ReferencedName]] to ? ToPropertyKey(ref.[[ReferencedName]]).
            let mut reference = reference;
            let key = reference.property_key(agent)?;
            // e. Let deleteStatus be ? baseObj.[[Delete]](ref.[[ReferencedName]]).
            let delete_status = base_obj.internal_delete(agent, key)?;
            // f. If deleteStatus is false and ref.[[Strict]] is true, throw a
            // TypeError exception.
            if !delete_status && reference.strict {
                return Err(agent
                    .throw_exception(
                        ExceptionType::TypeError,
                        format!("Cannot delete property '{}'", key.to_display(agent)),
                    )
                    .into());
            }
            // g. Return deleteStatus.
            Ok(Value::Boolean(delete_status))
        }
        // 5. Else,
        Base::Environment(base) => {
            // a. Let base be ref.[[Base]].
            // b. Assert: base is an Environment Record.
            let ReferencedName::Binding(name) = reference.referenced_name else {
                return Err(agent.internal_error("environment reference without a name").into());
            };
            // c. Return ? base.DeleteBinding(ref.[[ReferencedName]]).
            Ok(Value::Boolean(base.delete_binding(agent, name)?))
        }
    }
}

/// ### [13.5.3.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-typeof-operator-runtime-semantics-evaluation)
async fn evaluate_typeof(agent: &Agent, argument: &Expression) -> Completion<Value> {
    // 1. Let val be ? Evaluation of UnaryExpression.
    let val = if argument.as_identifier().is_some() {
        let mut reference = evaluate_reference(agent, argument).await?;
        // 2. If val is a Reference Record, then
        // a. If IsUnresolvableReference(val) is true, return "undefined".
        if reference.is_unresolvable_reference() {
            return Ok(Value::from_str(agent, "undefined"));
        }
        // 3. Set val to ? GetValue(val).
        get_value(agent, &mut reference)?
    } else {
        evaluate_expression(agent, argument).await?
    };
    // 4. NOTE: This step is replaced in section B.3.6.3.
    // 5. Return a String according to Table 41.
    Ok(Value::from_str(agent, val.type_of(agent)))
}

/// ### [13.4 Update Expressions](https://tc39.es/ecma262/#sec-update-expressions)
pub(super) async fn evaluate_update_expression(
    agent: &Agent,
    expression: &UpdateExpression,
) -> Completion<Value> {
    // 1. Let expr be ? Evaluation of LeftHandSideExpression.
    let mut expr = evaluate_reference(agent, &expression.argument).await?;
    // 2. Let oldValue be ? ToNumeric(? GetValue(expr)).
    let old_value = get_value(agent, &mut expr)?;
    let old_value = to_numeric(agent, old_value)?;
    let new_value = match (old_value, expression.operator) {
        // 3. If oldValue is a Number, then
        // a. Let newValue be Number::add(oldValue, 1𝔽).
        (Numeric::Number(n), UpdateOperator::Increment) => Value::Number(n + 1.0),
        (Numeric::Number(n), UpdateOperator::Decrement) => Value::Number(n - 1.0),
        // 4. Else,
        // a. Assert: oldValue is a BigInt.
        // b. Let newValue be BigInt::add(oldValue, 1ℤ).
        (Numeric::BigInt(b), UpdateOperator::Increment) => {
            Value::BigInt(HeapBigInt::new(agent, b.value(agent) + 1))
        }
        (Numeric::BigInt(b), UpdateOperator::Decrement) => {
            Value::BigInt(HeapBigInt::new(agent, b.value(agent) - 1))
        }
    };
    // 5. Perform ? PutValue(expr, newValue).
    put_value(agent, &mut expr, new_value)?;
    // 6. Return oldValue (postfix) or newValue (prefix).
    Ok(if expression.prefix {
        new_value
    } else {
        Value::from(old_value)
    })
}

#[cfg(test)]
mod tests {
    use super::number_operation;
    use specter_ast::operators::BinaryOperator;

    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn remainder_keeps_the_sign_of_the_dividend() {
        assert!(number_operation(BinaryOperator::Remainder, -4.0, 2.0).is_sign_negative());
        assert_eq!(number_operation(BinaryOperator::Remainder, 5.5, 2.0), 1.5);
        assert!(number_operation(BinaryOperator::Remainder, 1.0, 0.0).is_nan());
    }

    #[test]
    fn shifts_mask_the_shift_count() {
        assert_eq!(number_operation(BinaryOperator::ShiftLeft, 1.0, 33.0), 2.0);
        assert_eq!(
            number_operation(BinaryOperator::ShiftRightZeroFill, -1.0, 0.0),
            4294967295.0
        );
    }

    #[test]
    fn addition_concatenates_when_either_side_is_a_string() {
        assert_eq!(run_to_string("1 + '2'"), "12");
        assert_eq!(run_to_string("({ valueOf() { return 3; } }) + 4"), "7");
        assert_eq!(run_to_string("10n ** 3n"), "1000n");
        assert_eq!(
            run_to_string("try { 1n + 1 } catch (e) { e instanceof TypeError }"),
            "true"
        );
    }

    #[test]
    fn typeof_an_undeclared_binding_is_undefined() {
        assert_eq!(run_to_string("typeof notDeclared"), "undefined");
        assert_eq!(run_to_string("typeof function () {}"), "function");
    }

    #[test]
    fn delete_reports_non_configurable_properties() {
        assert_eq!(
            run_to_string("var o = {}; Object.defineProperty(o, 'x', { value: 1 }); delete o.x"),
            "false"
        );
        assert_eq!(
            run_to_string("'use strict'; var o = Object.freeze({ x: 1 }); try { delete o.x } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn postfix_updates_return_the_old_numeric_value() {
        assert_eq!(run_to_string("var x = '5'; x++"), "5");
        assert_eq!(run_to_string("var x = 1n; ++x"), "2n");
    }
}
