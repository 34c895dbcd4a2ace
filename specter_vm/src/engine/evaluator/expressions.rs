// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [13 ECMAScript Language: Expressions](https://tc39.es/ecma262/#sec-ecmascript-language-expressions)
//!
//! Primary expressions, literals, member and call expressions, optional
//! chains and `super`. Operators live in [`super::operators`] and
//! assignment in [`super::assignment`].

use std::rc::Rc;

use num_bigint::BigInt;
use specter_ast::{
    ast::{
        Argument, ArrayElement, ArrayLiteral, CallExpression, ClassNode, Expression,
        LogicalExpression, MemberProperty, NewExpression, ObjectLiteral,
        PropertyDefinition, PropertyName, TaggedTemplate,
    },
    operators::LogicalOperator,
};

use super::{
    assignment::evaluate_assignment_expression,
    class_definition_evaluation, evaluate_expression,
    function_definitions::{
        evaluate_await, evaluate_yield, instantiate_function_expression,
        method_definition_evaluation,
    },
    is_strict, name_string,
    operators::{
        evaluate_binary_expression, evaluate_private_in, evaluate_unary_expression,
        evaluate_update_expression,
    },
    private_environment,
    template_literals::{evaluate_template_literal, get_template_object},
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_iterator_objects::{IteratorKind, get_iterator, iterator_step_value},
            operations_on_objects::{
                call, construct, copy_data_properties, create_data_property_or_throw, set,
            },
            testing_and_comparison::{is_callable, is_constructor},
            type_conversion::{to_boolean, to_property_key},
        },
        builtins::{
            array::array_create,
            ecmascript_function::{ClassElementKey, initialize_instance_elements},
            global_object::perform_eval,
            ordinary::ordinary_object_create,
        },
        execution::{
            Agent, EnvironmentIndex, JsError,
            agent::{
                ExceptionType, get_new_target, get_this_environment, resolve_binding,
                resolve_this_binding,
            },
            resolve_private_identifier,
        },
        scripts_and_modules::module::{evaluate_import_call, import_meta_object},
        types::{
            Base, Completion, HeapBigInt, InternalMethods, Object, PropertyKey,
            Reference, ReferencedName, Value, get_this_value, get_value,
        },
    },
    engine::EvalFuture,
};

/// Evaluation of `expression` followed by GetValue.
pub(super) async fn evaluate(agent: &Agent, expression: &Expression) -> Completion<Value> {
    match expression {
        // ### [13.2.3.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-literals-runtime-semantics-evaluation)
        Expression::Null => Ok(Value::Null),
        Expression::Boolean(value) => Ok(Value::Boolean(*value)),
        Expression::Number(value) => Ok(Value::Number(*value)),
        Expression::String(value) => Ok(Value::from_str(agent, value)),
        Expression::BigInt(literal) => {
            let value = BigInt::parse_bytes(literal.digits.as_bytes(), literal.radix)
                .ok_or_else(|| agent.internal_error("malformed BigInt literal"))?;
            Ok(Value::BigInt(HeapBigInt::new(agent, value)))
        }
        Expression::RegExp(literal) => {
            evaluate_regexp_literal(agent, &literal.pattern, &literal.flags)
        }
        Expression::Template(template) => evaluate_template_literal(agent, template).await,
        Expression::TaggedTemplate(tagged) => evaluate_tagged_template(agent, tagged).await,
        Expression::Identifier(_)
        | Expression::Member(_)
        | Expression::SuperMember(_) => {
            let mut reference = evaluate_reference(agent, expression).await?;
            Ok(get_value(agent, &mut reference)?)
        }
        // ### [13.2.1.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-this-keyword-runtime-semantics-evaluation)
        Expression::This => Ok(resolve_this_binding(agent)?),
        // ### [13.3.12.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-meta-properties-runtime-semantics-evaluation)
        Expression::NewTarget => Ok(get_new_target(agent)?),
        Expression::ImportMeta => Ok(Value::Object(import_meta_object(agent)?)),
        Expression::Array(literal) => evaluate_array_literal(agent, literal).await,
        Expression::Object(literal) => evaluate_object_literal(agent, literal).await,
        Expression::Function(node) | Expression::ArrowFunction(node) => Ok(Value::Object(
            instantiate_function_expression(agent, node, None)?,
        )),
        Expression::Class(node) => evaluate_class_expression(agent, node, None).await,
        Expression::Unary(unary) => evaluate_unary_expression(agent, unary).await,
        Expression::Update(update) => evaluate_update_expression(agent, update).await,
        Expression::Binary(binary) => evaluate_binary_expression(agent, binary).await,
        Expression::PrivateIn(private_in) => {
            evaluate_private_in(agent, &private_in.name, &private_in.right).await
        }
        Expression::Logical(logical) => evaluate_logical_expression(agent, logical).await,
        // ### [13.14.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-conditional-operator-runtime-semantics-evaluation)
        Expression::Conditional(conditional) => {
            // 1. Let lref be ? Evaluation of ShortCircuitExpression.
            // 2. Let lval be ToBoolean(? GetValue(lref)).
            let lval = evaluate_expression(agent, &conditional.test).await?;
            // 3. If lval is true, then
            if to_boolean(agent, lval) {
                // a. Let trueRef be ? Evaluation of the first AssignmentExpression.
                // b. Return ? GetValue(trueRef).
                evaluate_expression(agent, &conditional.consequent).await
            } else {
                // a. Let falseRef be ? Evaluation of the second AssignmentExpression.
                // b. Return ? GetValue(falseRef).
                evaluate_expression(agent, &conditional.alternate).await
            }
        }
        Expression::Assignment(assignment) => {
            evaluate_assignment_expression(agent, assignment).await
        }
        // ### [13.16.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-comma-operator-runtime-semantics-evaluation)
        Expression::Sequence(expressions) => {
            let mut value = Value::Undefined;
            for expression in expressions.iter() {
                // 1. Let lref be ? Evaluation of Expression.
                // 2. Perform ? GetValue(lref).
                value = evaluate_expression(agent, expression).await?;
            }
            Ok(value)
        }
        Expression::Call(call_expression) => {
            evaluate_call_expression(agent, call_expression, false)
                .await
                .map(|value| value.unwrap_or(Value::Undefined))
        }
        Expression::SuperCall(arguments) => evaluate_super_call(agent, arguments).await,
        Expression::New(new_expression) => evaluate_new_expression(agent, new_expression).await,
        // ### [13.3.9.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-optional-chaining-evaluation)
        Expression::OptionalChain(chain) => Ok(chain_value(agent, chain)
            .await?
            .unwrap_or(Value::Undefined)),
        Expression::Yield(yield_expression) => evaluate_yield(agent, yield_expression).await,
        Expression::Await(argument) => evaluate_await(agent, argument).await,
        // ### [13.3.10.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-import-call-runtime-semantics-evaluation)
        Expression::Import(specifier) => {
            // 1. Let referrer be GetActiveScriptOrModule().
            // 3. Let argRef be ? Evaluation of AssignmentExpression.
            // 4. Let specifier be ? GetValue(argRef).
            let specifier = evaluate_expression(agent, specifier).await?;
            Ok(evaluate_import_call(agent, specifier)?)
        }
        Expression::Parenthesized(inner) => evaluate_expression(agent, inner).await,
    }
}

/// Evaluation of an expression that produces a Reference Record.
pub(super) fn evaluate_reference<'a>(
    agent: &'a Agent,
    expression: &'a Expression,
) -> EvalFuture<'a, Completion<Reference>> {
    Box::pin(async move {
        match expression {
            // ### [13.1.3 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-identifiers-runtime-semantics-evaluation)
            Expression::Identifier(identifier) => {
                // 1. Return ? ResolveBinding(StringValue of Identifier).
                let name = name_string(agent, &identifier.name);
                Ok(resolve_binding(agent, name, None)?)
            }
            // ### [13.3.2.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-property-accessors-runtime-semantics-evaluation)
            Expression::Member(member) => {
                // 1. Let baseReference be ? Evaluation of MemberExpression.
                // 2. Let baseValue be ? GetValue(baseReference).
                let base_value = evaluate_expression(agent, &member.object).await?;
                member_reference(agent, base_value, &member.property).await
            }
            Expression::SuperMember(property) => super_property_reference(agent, property).await,
            Expression::Parenthesized(inner) => evaluate_reference(agent, inner).await,
            _ => Err(agent
                .throw_exception_with_static_message(
                    ExceptionType::SyntaxError,
                    "Invalid left-hand side in assignment",
                )
                .into()),
        }
    })
}

/// The Reference Record of `base_value[property]`.
async fn member_reference(
    agent: &Agent,
    base_value: Value,
    property: &MemberProperty,
) -> Completion<Reference> {
    // 3. If the source text matched by this MemberExpression is strict mode
    // code, let strict be true; else let strict be false.
    let strict = is_strict(agent);
    match property {
        // ### [13.3.3 EvaluatePropertyAccessWithIdentifierKey ( baseValue, identifierName, strict )](https://tc39.es/ecma262/#sec-evaluate-property-access-with-identifier-key)
        MemberProperty::Static(name) => {
            // 1. Let propertyNameString be the StringValue of identifierName.
            // 2. Return the Reference Record { [[Base]]: baseValue,
            // [[ReferencedName]]: propertyNameString, [[Strict]]: strict,
            // [[ThisValue]]: EMPTY }.
            let key = PropertyKey::from_str(agent, name);
            Ok(Reference::property(
                base_value,
                ReferencedName::PropertyKey(key),
                strict,
            ))
        }
        // ### [13.3.4 EvaluatePropertyAccessWithExpressionKey ( baseValue, expression, strict )](https://tc39.es/ecma262/#sec-evaluate-property-access-with-expression-key)
        MemberProperty::Computed(expression) => {
            // 1. Let propertyNameReference be ? Evaluation of expression.
            // 2. Let propertyNameValue be ? GetValue(propertyNameReference).
            let property_name_value = evaluate_expression(agent, expression).await?;
            // 3. NOTE: In most cases, ToPropertyKey will be performed on
            // propertyNameValue immediately after this step.
            // 4. Return the Reference Record { [[Base]]: baseValue,
            // [[ReferencedName]]: propertyNameValue, [[Strict]]: strict,
            // [[ThisValue]]: EMPTY }.
            Ok(Reference::property(
                base_value,
                ReferencedName::Value(property_name_value),
                strict,
            ))
        }
        // ### [13.3.5 MakePrivateReference ( baseValue, privateIdentifier )](https://tc39.es/ecma262/#sec-makeprivatereference)
        MemberProperty::Private(name) => {
            // 1. Let privateEnv be the running execution context's PrivateEnvironment.
            // 2. Assert: privateEnv is not null.
            // 3. Let privateName be ResolvePrivateIdentifier(privateEnv, privateIdentifier).
            let identifier = name_string(agent, &format!("#{name}"));
            let Some(private_name) =
                resolve_private_identifier(agent, private_environment(agent), identifier)
            else {
                return Err(agent
                    .throw_exception(
                        ExceptionType::SyntaxError,
                        format!("Private field '#{name}' must be declared in an enclosing class"),
                    )
                    .into());
            };
            // 4. Return the Reference Record { [[Base]]: baseValue,
            // [[ReferencedName]]: privateName, [[Strict]]: true,
            // [[ThisValue]]: EMPTY }.
            Ok(Reference::property(
                base_value,
                ReferencedName::PrivateName(private_name),
                true,
            ))
        }
    }
}

/// ### [13.3.7.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-super-keyword-runtime-semantics-evaluation)
///
/// SuperProperty : super [ Expression ] and super . IdentifierName
async fn super_property_reference(
    agent: &Agent,
    property: &MemberProperty,
) -> Completion<Reference> {
    // 1. Let env be GetThisEnvironment().
    let env = get_this_environment(agent)?;
    // 2. Let actualThis be ? env.GetThisBinding().
    let actual_this = env.get_this_binding(agent)?;
    // 3. Let propertyNameReference be ? Evaluation of Expression.
    // 4. Let propertyNameValue be ? GetValue(propertyNameReference).
    // 5. Let propertyKey be ? ToPropertyKey(propertyNameValue).
    let property_key = match property {
        MemberProperty::Static(name) => PropertyKey::from_str(agent, name),
        MemberProperty::Computed(expression) => {
            let value = evaluate_expression(agent, expression).await?;
            to_property_key(agent, value)?
        }
        MemberProperty::Private(_) => {
            return Err(agent.internal_error("private name on super").into());
        }
    };
    // 6. Let strict be IsStrict(this SuperProperty).
    // 7. Return MakeSuperPropertyReference(actualThis, propertyKey, strict).
    make_super_property_reference(agent, env, actual_this, property_key, is_strict(agent))
}

/// ### [13.3.7.3 MakeSuperPropertyReference ( actualThis, propertyKey, strict )](https://tc39.es/ecma262/#sec-makesuperpropertyreference)
fn make_super_property_reference(
    agent: &Agent,
    env: EnvironmentIndex,
    actual_this: Value,
    property_key: PropertyKey,
    strict: bool,
) -> Completion<Reference> {
    // 1. Let env be GetThisEnvironment().
    // 2. Assert: env.HasSuperBinding() is true.
    let EnvironmentIndex::Function(env) = env else {
        return Err(agent
            .throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "'super' keyword unexpected here",
            )
            .into());
    };
    // 3. Let baseValue be ? env.GetSuperBase().
    let base_value = env.get_super_base(agent)?;
    // 4. Return the Reference Record { [[Base]]: baseValue,
    // [[ReferencedName]]: propertyKey, [[Strict]]: strict,
    // [[ThisValue]]: actualThis }.
    Ok(Reference {
        base: Base::Value(base_value),
        referenced_name: ReferencedName::PropertyKey(property_key),
        strict,
        this_value: Some(actual_this),
    })
}

/// Reference of a member link inside an optional chain. `None` when an
/// optional link short-circuited.
pub(super) fn chain_reference<'a>(
    agent: &'a Agent,
    expression: &'a Expression,
) -> EvalFuture<'a, Completion<Option<Reference>>> {
    Box::pin(async move {
        match expression {
            Expression::Member(member) => {
                let Some(base_value) = chain_value(agent, &member.object).await? else {
                    return Ok(None);
                };
                // OptionalChain : ?. IdentifierName
                // 1. If baseValue is either undefined or null, then
                // a. Return undefined.
                if member.optional && base_value.is_nullish() {
                    return Ok(None);
                }
                Ok(Some(
                    member_reference(agent, base_value, &member.property).await?,
                ))
            }
            _ => Ok(Some(evaluate_reference(agent, expression).await?)),
        }
    })
}

/// Value of a link inside an optional chain. `None` when an optional link
/// short-circuited.
fn chain_value<'a>(
    agent: &'a Agent,
    expression: &'a Expression,
) -> EvalFuture<'a, Completion<Option<Value>>> {
    Box::pin(async move {
        match expression {
            Expression::Member(_) => match chain_reference(agent, expression).await? {
                Some(mut reference) => Ok(Some(get_value(agent, &mut reference)?)),
                None => Ok(None),
            },
            Expression::Call(call_expression) => {
                evaluate_call_expression(agent, call_expression, true).await
            }
            _ => Ok(Some(evaluate_expression(agent, expression).await?)),
        }
    })
}

/// ### [13.3.6.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-function-calls-runtime-semantics-evaluation)
///
/// `in_chain` is set for calls that are links of an optional chain; those
/// return `None` when the chain short-circuits.
async fn evaluate_call_expression(
    agent: &Agent,
    expression: &CallExpression,
    in_chain: bool,
) -> Completion<Option<Value>> {
    let callee = &expression.callee;
    // 1. Let expr be the CallMemberExpression that is covered by
    // CoverCallExpressionAndAsyncArrowHead.
    // 2. Let memberExpr be the MemberExpression of expr.
    // 3. Let arguments be the Arguments of expr.
    // 4. Let ref be ? Evaluation of memberExpr.
    let reference = match callee.inner() {
        Expression::Member(_) if in_chain => match chain_reference(agent, callee.inner()).await? {
            Some(reference) => Some(reference),
            None => return Ok(None),
        },
        Expression::Identifier(_) | Expression::Member(_) | Expression::SuperMember(_) => {
            Some(evaluate_reference(agent, callee).await?)
        }
        _ => None,
    };
    let (func, this_value) = match reference {
        Some(mut reference) => {
            // 5. Let func be ? GetValue(ref).
            let func = get_value(agent, &mut reference)?;
            (func, Some(reference))
        }
        None => {
            let func = if in_chain {
                match chain_value(agent, callee).await? {
                    Some(func) => func,
                    None => return Ok(None),
                }
            } else {
                evaluate_expression(agent, callee).await?
            };
            (func, None)
        }
    };
    // OptionalChain : ?. Arguments
    if expression.optional && func.is_nullish() {
        return Ok(None);
    }
    // 6. If ref is a Reference Record, IsPropertyReference(ref) is false, and
    // ref.[[ReferencedName]] is "eval", then
    if let Some(reference) = &this_value
        && callee.as_identifier().is_some_and(|identifier| &*identifier.name == "eval")
        && !reference.is_property_reference()
        // a. If SameValue(func, %eval%) is true, then
        && func == Value::Object(agent.intrinsics().eval())
    {
        // i. Let argList be ? ArgumentListEvaluation of arguments.
        let arg_list = argument_list_evaluation(agent, &expression.arguments).await?;
        // ii. If argList has no elements, return undefined.
        let Some(eval_arg) = arg_list.first().copied() else {
            return Ok(Some(Value::Undefined));
        };
        // iii. Let evalArg be the first element of argList.
        // iv. If IsStrict(this CallExpression) is true, let strictCaller be
        // true. Otherwise let strictCaller be false.
        let strict_caller = is_strict(agent);
        // v. Return ? PerformEval(evalArg, strictCaller, true).
        return Ok(Some(perform_eval(agent, eval_arg, strict_caller, true)?));
    }
    // 7. Let thisCall be this CallExpression.
    // 8. Let tailCall be IsInTailPosition(thisCall).
    // 9. Return ? EvaluateCall(func, ref, arguments, tailCall).
    let this_value = this_value.map_or(Value::Undefined, |reference| {
        reference_this_value(agent, &reference)
    });
    evaluate_call(agent, func, this_value, &expression.arguments, callee)
        .await
        .map(Some)
}

/// Steps 1 and 2 of EvaluateCall: the this value a call through
/// `reference` receives.
fn reference_this_value(agent: &Agent, reference: &Reference) -> Value {
    match reference.base {
        // a. If IsPropertyReference(ref) is true, then
        // i. Let thisValue be GetThisValue(ref).
        Base::Value(_) => get_this_value(reference),
        // b. Else,
        // i. Let refEnv be ref.[[Base]].
        // ii. Assert: refEnv is an Environment Record.
        // iii. Let thisValue be refEnv.WithBaseObject().
        Base::Environment(env) => env
            .with_base_object(agent)
            .map_or(Value::Undefined, Value::Object),
        Base::Unresolvable => Value::Undefined,
    }
}

/// ### [13.3.6.2 EvaluateCall ( func, ref, arguments, tailPosition )](https://tc39.es/ecma262/#sec-evaluatecall)
async fn evaluate_call(
    agent: &Agent,
    func: Value,
    this_value: Value,
    arguments: &[Argument],
    callee: &Expression,
) -> Completion<Value> {
    // 3. Let argList be ? ArgumentListEvaluation of arguments.
    let arg_list = argument_list_evaluation(agent, arguments).await?;
    // 4. If func is not an Object, throw a TypeError exception.
    // 5. If IsCallable(func) is false, throw a TypeError exception.
    if !is_callable(agent, func) {
        return Err(agent
            .throw_exception(
                ExceptionType::TypeError,
                format!("{} is not a function", callee_display(callee)),
            )
            .into());
    }
    // 6. If tailPosition is true, perform PrepareForTailCall().
    // 7. Return ? Call(func, thisValue, argList).
    Ok(call(agent, func, this_value, &arg_list)?)
}

/// Source-like rendering of a callee for error messages.
fn callee_display(callee: &Expression) -> String {
    match callee.inner() {
        Expression::Identifier(identifier) => identifier.name.to_string(),
        Expression::This => "this".to_owned(),
        Expression::Member(member) => {
            let object = callee_display(&member.object);
            match &member.property {
                MemberProperty::Static(name) => format!("{object}.{name}"),
                MemberProperty::Private(name) => format!("{object}.#{name}"),
                MemberProperty::Computed(_) => format!("{object}[...]"),
            }
        }
        Expression::SuperMember(property) => match &**property {
            MemberProperty::Static(name) => format!("super.{name}"),
            _ => "super[...]".to_owned(),
        },
        Expression::Call(call) => format!("{}(...)", callee_display(&call.callee)),
        _ => "expression".to_owned(),
    }
}

/// ### [13.3.8.1 Runtime Semantics: ArgumentListEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-argumentlistevaluation)
pub(super) async fn argument_list_evaluation(
    agent: &Agent,
    arguments: &[Argument],
) -> Completion<Vec<Value>> {
    let mut list = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            Argument::Expression(expression) => {
                // 1. Let ref be ? Evaluation of AssignmentExpression.
                // 2. Let arg be ? GetValue(ref).
                list.push(evaluate_expression(agent, expression).await?);
            }
            Argument::Spread(expression) => {
                // 1. Let list be a new empty List.
                // 2. Let spreadRef be ? Evaluation of AssignmentExpression.
                // 3. Let spreadObj be ? GetValue(spreadRef).
                let spread_obj = evaluate_expression(agent, expression).await?;
                // 4. Let iteratorRecord be ? GetIterator(spreadObj, SYNC).
                let mut iterator_record = get_iterator(agent, spread_obj, IteratorKind::Sync)?;
                // 5. Repeat,
                // a. Let next be ? IteratorStepValue(iteratorRecord).
                // b. If next is DONE, return list.
                // c. Append next to list.
                while let Some(next) = iterator_step_value(agent, &mut iterator_record)? {
                    list.push(next);
                }
            }
        }
    }
    Ok(list)
}

/// ### [13.3.5.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-new-operator-runtime-semantics-evaluation)
///
/// EvaluateNew ( constructExpr, arguments )
async fn evaluate_new_expression(agent: &Agent, expression: &NewExpression) -> Completion<Value> {
    // 1. Let ref be ? Evaluation of constructExpr.
    // 2. Let constructor be ? GetValue(ref).
    let constructor = evaluate_expression(agent, &expression.callee).await?;
    // 3. If arguments is EMPTY, then
    // a. Let argList be a new empty List.
    // 4. Else,
    // a. Let argList be ? ArgumentListEvaluation of arguments.
    let arg_list = argument_list_evaluation(agent, &expression.arguments).await?;
    // 5. If IsConstructor(constructor) is false, throw a TypeError exception.
    let Value::Object(constructor) = constructor else {
        return Err(not_a_constructor(agent, &expression.callee).into());
    };
    if !is_constructor(agent, Value::Object(constructor)) {
        return Err(not_a_constructor(agent, &expression.callee).into());
    }
    // 6. Return ? Construct(constructor, argList).
    Ok(Value::Object(construct(agent, constructor, &arg_list, None)?))
}

fn not_a_constructor(agent: &Agent, callee: &Expression) -> JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("{} is not a constructor", callee_display(callee)),
    )
}

/// ### [13.3.7.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-super-keyword-runtime-semantics-evaluation)
///
/// SuperCall : super Arguments
async fn evaluate_super_call(agent: &Agent, arguments: &[Argument]) -> Completion<Value> {
    // 1. Let newTarget be GetNewTarget().
    // 2. Assert: newTarget is an Object.
    let Value::Object(new_target) = get_new_target(agent)? else {
        return Err(agent
            .throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "'super' keyword unexpected here",
            )
            .into());
    };
    // 3. Let func be GetSuperConstructor().
    let EnvironmentIndex::Function(this_env) = get_this_environment(agent)? else {
        return Err(agent.internal_error("super call outside of a function").into());
    };
    // GetSuperConstructor ( )
    // 1. Let envRec be GetThisEnvironment().
    // 2. Assert: envRec is a Function Environment Record.
    // 3. Let activeFunction be envRec.[[FunctionObject]].
    let active_function = this_env.function_object(agent);
    // 4. Assert: activeFunction is an ECMAScript function object.
    // 5. Let superConstructor be ! activeFunction.[[GetPrototypeOf]]().
    let func = active_function.internal_get_prototype_of(agent)?;
    // 4. Let argList be ? ArgumentListEvaluation of Arguments.
    let arg_list = argument_list_evaluation(agent, arguments).await?;
    // 5. If IsConstructor(func) is false, throw a TypeError exception.
    let Some(func) = func.filter(|func| is_constructor(agent, Value::Object(*func))) else {
        return Err(agent
            .throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Super constructor is not a constructor",
            )
            .into());
    };
    // 6. Let result be ? Construct(func, argList, newTarget).
    let result = construct(agent, func, &arg_list, Some(new_target))?;
    // 7. Let thisER be GetThisEnvironment().
    // 8. Perform ? thisER.BindThisValue(result).
    this_env.bind_this_value(agent, Value::Object(result))?;
    // 9. Let F be thisER.[[FunctionObject]].
    // 10. Assert: F is an ECMAScript function object.
    // 11. Perform ? InitializeInstanceElements(result, F).
    initialize_instance_elements(agent, result, active_function)?;
    // 12. Return result.
    Ok(Value::Object(result))
}

/// ### [13.3.11.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-tagged-templates-runtime-semantics-evaluation)
async fn evaluate_tagged_template(agent: &Agent, tagged: &TaggedTemplate) -> Completion<Value> {
    let tag = &tagged.tag;
    // 1. Let tagRef be ? Evaluation of MemberExpression.
    // 2. Let tagFunc be ? GetValue(tagRef).
    let (tag_func, this_value) = match tag.inner() {
        Expression::Identifier(_) | Expression::Member(_) | Expression::SuperMember(_) => {
            let mut reference = evaluate_reference(agent, tag).await?;
            let func = get_value(agent, &mut reference)?;
            (func, reference_this_value(agent, &reference))
        }
        _ => (evaluate_expression(agent, tag).await?, Value::Undefined),
    };
    // 3. Let thisCall be this MemberExpression.
    // 4. Let tailCall be IsInTailPosition(thisCall).
    // 5. Return ? EvaluateCall(tagFunc, tagRef, TemplateLiteral, tailCall).
    // ArgumentListEvaluation of TemplateLiteral:
    // 1. Let templateLiteral be this TemplateLiteral.
    // 2. Let siteObj be GetTemplateObject(templateLiteral).
    let site_obj = get_template_object(agent, &tagged.quasi)?;
    // 3. Let remaining be ? ArgumentListEvaluation of SubstitutionTemplate.
    let mut arg_list = Vec::with_capacity(tagged.quasi.expressions.len() + 1);
    arg_list.push(Value::Object(site_obj));
    for expression in &tagged.quasi.expressions {
        arg_list.push(evaluate_expression(agent, expression).await?);
    }
    if !is_callable(agent, tag_func) {
        return Err(agent
            .throw_exception(
                ExceptionType::TypeError,
                format!("{} is not a function", callee_display(tag)),
            )
            .into());
    }
    // 4. Return the list-concatenation of « siteObj » and remaining.
    Ok(call(agent, tag_func, this_value, &arg_list)?)
}

/// ### [13.13.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-binary-logical-operators-runtime-semantics-evaluation)
async fn evaluate_logical_expression(
    agent: &Agent,
    expression: &LogicalExpression,
) -> Completion<Value> {
    // 1. Let lref be ? Evaluation of the left operand.
    // 2. Let lval be ? GetValue(lref).
    let lval = evaluate_expression(agent, &expression.left).await?;
    let short_circuits = match expression.operator {
        // 3. Let lbool be ToBoolean(lval).
        // 4. If lbool is false, return lval.
        LogicalOperator::And => !to_boolean(agent, lval),
        // 4. If lbool is true, return lval.
        LogicalOperator::Or => to_boolean(agent, lval),
        // 3. If lval is neither undefined nor null, return lval.
        LogicalOperator::Coalesce => !lval.is_nullish(),
    };
    if short_circuits {
        return Ok(lval);
    }
    // 5. Let rref be ? Evaluation of the right operand.
    // 6. Return ? GetValue(rref).
    evaluate_expression(agent, &expression.right).await
}

/// ### [13.2.4.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-array-initializer-runtime-semantics-evaluation)
async fn evaluate_array_literal(agent: &Agent, literal: &ArrayLiteral) -> Completion<Value> {
    // 1. Let array be ! ArrayCreate(0).
    let array = array_create(agent, 0, None);
    // 2. Perform ? ArrayAccumulation of ElementList with arguments array and 0.
    let mut next_index: u64 = 0;
    for element in &literal.elements {
        match element {
            // Elision : ,
            // 1. Let len be nextIndex + 1.
            ArrayElement::Hole => next_index += 1,
            ArrayElement::Expression(expression) => {
                // 1. Let initResult be ? Evaluation of AssignmentExpression.
                // 2. Let initValue be ? GetValue(initResult).
                let init_value = evaluate_expression(agent, expression).await?;
                // 3. Perform ! CreateDataPropertyOrThrow(array,
                // ! ToString(𝔽(nextIndex)), initValue).
                let key = PropertyKey::from_index(agent, next_index);
                create_data_property_or_throw(agent, array, key, init_value)?;
                // 4. Return nextIndex + 1.
                next_index += 1;
            }
            // SpreadElement : ... AssignmentExpression
            ArrayElement::Spread(expression) => {
                // 1. Let spreadRef be ? Evaluation of AssignmentExpression.
                // 2. Let spreadObj be ? GetValue(spreadRef).
                let spread_obj = evaluate_expression(agent, expression).await?;
                // 3. Let iteratorRecord be ? GetIterator(spreadObj, SYNC).
                let mut iterator_record = get_iterator(agent, spread_obj, IteratorKind::Sync)?;
                // 4. Repeat,
                // a. Let next be ? IteratorStepValue(iteratorRecord).
                // b. If next is DONE, return nextIndex.
                while let Some(next) = iterator_step_value(agent, &mut iterator_record)? {
                    // c. Perform ! CreateDataPropertyOrThrow(array,
                    // ! ToString(𝔽(nextIndex)), next).
                    let key = PropertyKey::from_index(agent, next_index);
                    create_data_property_or_throw(agent, array, key, next)?;
                    // d. Set nextIndex to nextIndex + 1.
                    next_index += 1;
                }
            }
        }
    }
    // Trailing elisions still count towards the length.
    let length = PropertyKey::from_str(agent, "length");
    set(agent, array, length, Value::from_f64(next_index as f64), true)?;
    // 3. Return array.
    Ok(Value::Object(array))
}

/// ### [13.2.5.4 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-object-initializer-runtime-semantics-evaluation)
async fn evaluate_object_literal(agent: &Agent, literal: &ObjectLiteral) -> Completion<Value> {
    // 1. Let obj be OrdinaryObjectCreate(%Object.prototype%).
    let obj = ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
    // 2. Perform ? PropertyDefinitionEvaluation of PropertyDefinitionList
    // with argument obj.
    for property in &literal.properties {
        property_definition_evaluation(agent, obj, property).await?;
    }
    // 3. Return obj.
    Ok(Value::Object(obj))
}

/// ### [13.2.5.5 Runtime Semantics: PropertyDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-propertydefinitionevaluation)
async fn property_definition_evaluation(
    agent: &Agent,
    object: Object,
    property: &PropertyDefinition,
) -> Completion<()> {
    match property {
        // PropertyDefinition : PropertyName : AssignmentExpression
        PropertyDefinition::KeyValue(name, value) => {
            // 1. Let propKey be ? Evaluation of PropertyName.
            let prop_key = evaluate_property_name(agent, name).await?;
            // 5. If IsAnonymousFunctionDefinition(AssignmentExpression) is
            // true and isProtoSetter is false, then
            let prop_value = if value.is_anonymous_function_definition() {
                // a. Let propValue be ? NamedEvaluation of AssignmentExpression
                // with argument propKey.
                named_evaluation(agent, value, ClassElementKey::Property(prop_key)).await?
            } else {
                // a. Let exprValueRef be ? Evaluation of AssignmentExpression.
                // b. Let propValue be ? GetValue(exprValueRef).
                evaluate_expression(agent, value).await?
            };
            // 8. Assert: object is an ordinary, extensible object with no
            // non-configurable properties.
            // 9. Perform ! CreateDataPropertyOrThrow(object, propKey, propValue).
            create_data_property_or_throw(agent, object, prop_key, prop_value)?;
        }
        // PropertyDefinition : IdentifierReference
        PropertyDefinition::Shorthand(identifier) => {
            // 1. Let propName be the StringValue of IdentifierReference.
            let prop_name = PropertyKey::from_str(agent, &identifier.name);
            // 2. Let exprValue be ? Evaluation of IdentifierReference.
            // 3. Let propValue be ? GetValue(exprValue).
            let name = name_string(agent, &identifier.name);
            let mut reference = resolve_binding(agent, name, None)?;
            let prop_value = get_value(agent, &mut reference)?;
            // 5. Perform ! CreateDataPropertyOrThrow(object, propName, propValue).
            create_data_property_or_throw(agent, object, prop_name, prop_value)?;
        }
        // PropertyDefinition : __proto__ : AssignmentExpression
        PropertyDefinition::Proto(value) => {
            let prop_value = evaluate_expression(agent, value).await?;
            // 6. If isProtoSetter is true, then
            // a. If propValue is an Object or propValue is null, then
            // i. Perform ! object.[[SetPrototypeOf]](propValue).
            // b. Return UNUSED.
            match prop_value {
                Value::Object(proto) => {
                    object.internal_set_prototype_of(agent, Some(proto))?;
                }
                Value::Null => {
                    object.internal_set_prototype_of(agent, None)?;
                }
                _ => {}
            }
        }
        // PropertyDefinition : MethodDefinition
        PropertyDefinition::Method(name, kind, node) => {
            // 1. Perform ? MethodDefinitionEvaluation of MethodDefinition with
            // arguments object and true.
            let key = evaluate_property_name(agent, name).await?;
            method_definition_evaluation(
                agent,
                object,
                ClassElementKey::Property(key),
                *kind,
                node,
                true,
            )?;
        }
        // PropertyDefinition : ... AssignmentExpression
        PropertyDefinition::Spread(expression) => {
            // 1. Let exprValue be ? Evaluation of AssignmentExpression.
            // 2. Let fromValue be ? GetValue(exprValue).
            let from_value = evaluate_expression(agent, expression).await?;
            // 3. Let excludedNames be a new empty List.
            // 4. Perform ? CopyDataProperties(object, fromValue, excludedNames).
            copy_data_properties(agent, object, from_value, &[])?;
        }
    }
    // Return UNUSED.
    Ok(())
}

/// ### [13.2.5.4 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-object-initializer-runtime-semantics-evaluation)
///
/// Evaluation of a PropertyName to a property key.
pub(super) async fn evaluate_property_name(
    agent: &Agent,
    name: &PropertyName,
) -> Completion<PropertyKey> {
    match name {
        // LiteralPropertyName : IdentifierName, StringLiteral, NumericLiteral
        // 1. Return the StringValue of IdentifierName.
        PropertyName::Static(name) => Ok(PropertyKey::from_str(agent, name)),
        // ComputedPropertyName : [ AssignmentExpression ]
        PropertyName::Computed(expression) => {
            // 1. Let exprValue be ? Evaluation of AssignmentExpression.
            // 2. Let propName be ? GetValue(exprValue).
            let prop_name = evaluate_expression(agent, expression).await?;
            // 3. Return ? ToPropertyKey(propName).
            Ok(to_property_key(agent, prop_name)?)
        }
    }
}

/// ### [8.4.5 Runtime Semantics: NamedEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-namedevaluation)
pub(crate) async fn named_evaluation(
    agent: &Agent,
    expression: &Expression,
    name: ClassElementKey,
) -> Completion<Value> {
    match expression.inner() {
        // FunctionExpression : function ( FormalParameters ) { FunctionBody }
        // 1. Return InstantiateOrdinaryFunctionExpression of FunctionExpression
        // with argument name.
        // ArrowFunction : ArrowParameters => ConciseBody
        // 1. Return InstantiateArrowFunctionExpression of ArrowFunction with
        // argument name.
        Expression::Function(node) | Expression::ArrowFunction(node) => Ok(Value::Object(
            instantiate_function_expression(agent, node, Some(name))?,
        )),
        // ClassExpression : class ClassTail
        // 1. Let value be ? ClassDefinitionEvaluation of ClassTail with
        // arguments undefined and name.
        // 2. Set value.[[SourceText]] to the source text matched by
        // ClassExpression.
        // 3. Return value.
        Expression::Class(node) => evaluate_class_expression(agent, node, Some(name)).await,
        _ => evaluate_expression(agent, expression).await,
    }
}

/// ### [15.7.16 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-class-definitions-runtime-semantics-evaluation)
async fn evaluate_class_expression(
    agent: &Agent,
    node: &Rc<ClassNode>,
    name: Option<ClassElementKey>,
) -> Completion<Value> {
    let value = match &node.name {
        // ClassExpression : class BindingIdentifier ClassTail
        Some(identifier) => {
            // 1. Let className be the StringValue of BindingIdentifier.
            let class_name = name_string(agent, &identifier.name);
            // 2. Let value be ? ClassDefinitionEvaluation of ClassTail with
            // arguments className and className.
            let key = ClassElementKey::Property(PropertyKey::from_string(agent, class_name));
            class_definition_evaluation(agent, node, Some(class_name), key).await?
        }
        // ClassExpression : class ClassTail
        // 1. Let value be ? ClassDefinitionEvaluation of ClassTail with
        // arguments undefined and "".
        None => {
            let name =
                name.unwrap_or_else(|| ClassElementKey::Property(PropertyKey::from_str(agent, "")));
            class_definition_evaluation(agent, node, None, name).await?
        }
    };
    // 3. Set value.[[SourceText]] to the source text matched by ClassExpression.
    // 4. Return value.
    Ok(Value::Object(value))
}

/// ### [22.2.3.1 RegExpCreate ( P, F )](https://tc39.es/ecma262/#sec-regexpcreate) of a literal
fn evaluate_regexp_literal(agent: &Agent, pattern: &str, flags: &str) -> Completion<Value> {
    #[cfg(feature = "regexp")]
    {
        use crate::ecmascript::builtins::text_processing::regexp_objects::reg_exp_create;
        // 1. Let pattern be CodePointsToString(BodyText of RegularExpressionLiteral).
        // 2. Let flags be CodePointsToString(FlagText of RegularExpressionLiteral).
        // 3. Return ! RegExpCreate(pattern, flags).
        let pattern = Value::from_str(agent, pattern);
        let flags = Value::from_str(agent, flags);
        Ok(Value::Object(reg_exp_create(agent, pattern, flags)?))
    }
    #[cfg(not(feature = "regexp"))]
    {
        let _ = (pattern, flags);
        Err(agent
            .throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "Regular expressions are not supported",
            )
            .into())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn method_calls_receive_their_base_as_this() {
        assert_eq!(
            run_to_string("var o = { x: 3, f() { return this.x; } }; o.f() + (o.f)()"),
            "6"
        );
        assert_eq!(
            run_to_string("var o = { f() { return this; } }; var g = o.f; g() === undefined || g() === globalThis"),
            "true"
        );
    }

    #[test]
    fn optional_chains_short_circuit_the_whole_chain() {
        assert_eq!(run_to_string("var a = null; a?.b.c.d"), "undefined");
        assert_eq!(run_to_string("var a = { b: { c: 1 } }; a?.b.c"), "1");
        assert_eq!(run_to_string("var f; f?.()"), "undefined");
        assert_eq!(
            run_to_string("var o = { m() { return this.v; }, v: 7 }; o.m?.()"),
            "7"
        );
    }

    #[test]
    fn spread_arguments_and_array_holes() {
        assert_eq!(
            run_to_string("function f(a, b, c) { return a + b + c; } f(...[1, 2], 3)"),
            "6"
        );
        assert_eq!(run_to_string("[1, , 3].length"), "3");
        assert_eq!(run_to_string("[1, ,].length"), "2");
        assert_eq!(run_to_string("1 in [0, , 2]"), "false");
    }

    #[test]
    fn object_literals_support_accessors_spread_and_proto() {
        assert_eq!(
            run_to_string("var o = { get x() { return 4; }, ...{ y: 5 } }; o.x + o.y"),
            "9"
        );
        assert_eq!(
            run_to_string("var p = { z: 1 }; var o = { __proto__: p }; Object.getPrototypeOf(o) === p"),
            "true"
        );
        assert_eq!(run_to_string("var k = 'a'; ({ [k + 'b']: 2 }).ab"), "2");
    }

    #[test]
    fn calling_a_non_function_names_the_callee() {
        assert_eq!(
            run_to_string("var o = {}; o.missing()"),
            "Uncaught TypeError: o.missing is not a function"
        );
        assert_eq!(
            run_to_string("new 1"),
            "Uncaught TypeError: expression is not a constructor"
        );
    }

    #[test]
    fn direct_eval_sees_the_calling_scope() {
        assert_eq!(
            run_to_string("function f() { var x = 10; return eval('x + 1'); } f()"),
            "11"
        );
        assert_eq!(
            run_to_string("var x = 'global'; function f() { var x = 'local'; return (0, eval)('x'); } f()"),
            "global"
        );
    }

    #[test]
    fn super_property_access_uses_the_home_object() {
        assert_eq!(
            run_to_string(
                "var base = { greet() { return 'hi ' + this.name; } };
                 var derived = { __proto__: base, name: 'd', greet() { return super.greet() + '!'; } };
                 derived.greet()"
            ),
            "hi d!"
        );
    }

    #[test]
    fn bigint_literals_in_every_radix() {
        assert_eq!(run_to_string("0x10n + 0b1n + 0o7n + 10n"), "34n");
    }
}
