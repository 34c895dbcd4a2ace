// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [13.15 Assignment Operators](https://tc39.es/ecma262/#sec-assignment-operators)
//!
//! Assignment expressions, destructuring assignment and the
//! BindingInitialization family used by declarations and parameters.

use specter_ast::{
    ast::{
        ArrayAssignmentPattern, ArrayBindingPattern, AssignmentElement, AssignmentExpression,
        AssignmentTarget, BindingElement, BindingPattern, Expression, Identifier,
        ObjectAssignmentPattern, ObjectBindingPattern,
    },
    operators::AssignmentOperator,
};

use super::{
    apply_string_or_numeric_binary_operator, evaluate_expression,
    expressions::{evaluate_property_name, evaluate_reference},
    name_string, named_evaluation,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_iterator_objects::{
                IteratorKind, IteratorRecord, get_iterator, iterator_close, iterator_step,
                iterator_step_value,
            },
            operations_on_objects::{copy_data_properties, create_data_property_or_throw, get_v},
            testing_and_comparison::require_object_coercible,
            type_conversion::to_boolean,
        },
        builtins::{
            array::array_create, ecmascript_function::ClassElementKey,
            ordinary::ordinary_object_create,
        },
        execution::{Agent, EnvironmentIndex, agent::resolve_binding},
        types::{
            AbruptCompletion, Completion, Object, PropertyKey, Reference, Value, get_value,
            initialize_referenced_binding, put_value,
        },
    },
    engine::EvalFuture,
};

/// Close `iterator` after an abrupt completion of destructuring, keeping
/// the original completion.
pub(super) fn close_iterator_after<T>(
    agent: &Agent,
    iterator: Object,
    completion: Completion<T>,
) -> Completion<T> {
    match completion {
        Ok(value) => Ok(iterator_close(agent, iterator, Ok(value))?),
        Err(AbruptCompletion::Throw(error)) => {
            // A throw completion wins over whatever closing the iterator does.
            let _ = iterator_close::<()>(agent, iterator, Err(error.clone()));
            Err(AbruptCompletion::Throw(error))
        }
        Err(completion) => {
            iterator_close(agent, iterator, Ok(()))?;
            Err(completion)
        }
    }
}

fn function_name_key(agent: &Agent, identifier: &Identifier) -> ClassElementKey {
    ClassElementKey::Property(PropertyKey::from_str(agent, &identifier.name))
}

/// Evaluate an Initializer, giving anonymous functions the name of the
/// identifier they are assigned to.
pub(super) async fn evaluate_initializer(
    agent: &Agent,
    initializer: &Expression,
    target_name: Option<&Identifier>,
) -> Completion<Value> {
    match target_name {
        // a. If IsAnonymousFunctionDefinition(Initializer) is true, then
        //     i. Let v be ? NamedEvaluation of Initializer with argument bindingId.
        Some(identifier) if initializer.is_anonymous_function_definition() => {
            named_evaluation(agent, initializer, function_name_key(agent, identifier)).await
        }
        // b. Else,
        //     i. Let defaultValue be ? Evaluation of Initializer.
        //     ii. Set v to ? GetValue(defaultValue).
        _ => evaluate_expression(agent, initializer).await,
    }
}

/// ### [13.15.2 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-assignment-operators-runtime-semantics-evaluation)
pub(super) async fn evaluate_assignment_expression(
    agent: &Agent,
    expression: &AssignmentExpression,
) -> Completion<Value> {
    let target = match (&expression.target, expression.operator) {
        (AssignmentTarget::Simple(target), _) => target,
        // AssignmentExpression : LeftHandSideExpression = AssignmentExpression
        // 2. Let assignmentPattern be the AssignmentPattern that is covered by
        // LeftHandSideExpression.
        (pattern, _) => {
            // 3. Let rref be ? Evaluation of AssignmentExpression.
            // 4. Let rval be ? GetValue(rref).
            let rval = evaluate_expression(agent, &expression.value).await?;
            // 5. Perform ? DestructuringAssignmentEvaluation of
            // assignmentPattern with argument rval.
            destructuring_assignment_evaluation(agent, pattern, rval).await?;
            // 6. Return rval.
            return Ok(rval);
        }
    };
    // 1. If LeftHandSideExpression is neither an ObjectLiteral nor an
    // ArrayLiteral, then
    //     a. Let lref be ? Evaluation of LeftHandSideExpression.
    let mut lref = evaluate_reference(agent, target).await?;
    let rval = match expression.operator {
        AssignmentOperator::Assign => {
            // b. If IsAnonymousFunctionDefinition(AssignmentExpression) and
            // IsIdentifierRef of LeftHandSideExpression are both true, then
            //     i. Let lhs be the StringValue of LeftHandSideExpression.
            //     ii. Let rval be ? NamedEvaluation of AssignmentExpression with argument lhs.
            // c. Else,
            //     i. Let rref be ? Evaluation of AssignmentExpression.
            //     ii. Let rval be ? GetValue(rref).
            evaluate_initializer(agent, &expression.value, target.as_identifier()).await?
        }
        // AssignmentExpression : LeftHandSideExpression AssignmentOperator AssignmentExpression
        AssignmentOperator::Compound(operator) => {
            // 2. Let lval be ? GetValue(lref).
            let lval = get_value(agent, &mut lref)?;
            // 3. Let rref be ? Evaluation of AssignmentExpression.
            // 4. Let rval be ? GetValue(rref).
            let rval = evaluate_expression(agent, &expression.value).await?;
            // 5. Let assignmentOpText be the source text matched by AssignmentOperator.
            // 6. Let opText be the sequence of Unicode code points associated
            // with assignmentOpText in the following table:
            // 7. Let r be ? ApplyStringOrNumericBinaryOperator(lval, opText, rval).
            apply_string_or_numeric_binary_operator(agent, lval, operator, rval)?
        }
        logical => {
            // 2. Let lval be ? GetValue(lref).
            let lval = get_value(agent, &mut lref)?;
            let short_circuits = match logical {
                // AssignmentExpression : LeftHandSideExpression &&= AssignmentExpression
                // 3. Let lbool be ToBoolean(lval).
                // 4. If lbool is false, return lval.
                AssignmentOperator::LogicalAnd => !to_boolean(agent, lval),
                // AssignmentExpression : LeftHandSideExpression ||= AssignmentExpression
                // 4. If lbool is true, return lval.
                AssignmentOperator::LogicalOr => to_boolean(agent, lval),
                // AssignmentExpression : LeftHandSideExpression ??= AssignmentExpression
                // 3. If lval is neither undefined nor null, return lval.
                _ => !lval.is_nullish(),
            };
            if short_circuits {
                return Ok(lval);
            }
            // 5. If IsAnonymousFunctionDefinition(AssignmentExpression) is true
            // and IsIdentifierRef of LeftHandSideExpression is true, then
            //     a. Let lhs be the StringValue of LeftHandSideExpression.
            //     b. Let rval be ? NamedEvaluation of AssignmentExpression with argument lhs.
            // 6. Else,
            //     a. Let rref be ? Evaluation of AssignmentExpression.
            //     b. Let rval be ? GetValue(rref).
            evaluate_initializer(agent, &expression.value, target.as_identifier()).await?
        }
    };
    // Perform ? PutValue(lref, rval).
    put_value(agent, &mut lref, rval)?;
    // Return rval.
    Ok(rval)
}

/// ### [13.15.5.2 Runtime Semantics: DestructuringAssignmentEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-destructuringassignmentevaluation)
pub(super) fn destructuring_assignment_evaluation<'a>(
    agent: &'a Agent,
    pattern: &'a AssignmentTarget,
    value: Value,
) -> EvalFuture<'a, Completion<()>> {
    Box::pin(async move {
        match pattern {
            AssignmentTarget::Simple(target) => {
                let mut lref = evaluate_reference(agent, target).await?;
                put_value(agent, &mut lref, value)?;
                Ok(())
            }
            AssignmentTarget::Object(pattern) => {
                object_destructuring_assignment(agent, pattern, value).await
            }
            AssignmentTarget::Array(pattern) => {
                // 1. Let iteratorRecord be ? GetIterator(value, SYNC).
                let mut iterator_record = get_iterator(agent, value, IteratorKind::Sync)?;
                // 2. Let result be Completion(IteratorDestructuringAssignmentEvaluation
                // of AssignmentElementList with argument iteratorRecord).
                let result =
                    array_destructuring_assignment(agent, pattern, &mut iterator_record).await;
                // 3. If iteratorRecord.[[Done]] is false, return ?
                // IteratorClose(iteratorRecord, result).
                if !iterator_record.done {
                    return close_iterator_after(agent, iterator_record.iterator, result);
                }
                // 4. Return ? result.
                result
            }
        }
    })
}

async fn object_destructuring_assignment(
    agent: &Agent,
    pattern: &ObjectAssignmentPattern,
    value: Value,
) -> Completion<()> {
    // 1. Perform ? RequireObjectCoercible(value).
    require_object_coercible(agent, value)?;
    // 2. Let excludedNames be ? PropertyDestructuringAssignmentEvaluation of
    // AssignmentPropertyList with argument value.
    let mut excluded_names = Vec::with_capacity(pattern.properties.len());
    for property in &pattern.properties {
        // AssignmentProperty : PropertyName : AssignmentElement
        // 1. Let name be ? Evaluation of PropertyName.
        let name = evaluate_property_name(agent, &property.key).await?;
        // 2. Perform ? KeyedDestructuringAssignmentEvaluation of
        // AssignmentElement with arguments value and name.
        keyed_destructuring_assignment(agent, &property.value, value, name).await?;
        // 3. Return « name ».
        excluded_names.push(name);
    }
    // 3. Return ? RestDestructuringAssignmentEvaluation of AssignmentRestProperty
    // with arguments value and excludedNames.
    if let Some(rest) = &pattern.rest {
        // 1. Let lref be ? Evaluation of DestructuringAssignmentTarget.
        let AssignmentTarget::Simple(rest) = rest else {
            return Err(agent.internal_error("rest property target is a pattern").into());
        };
        let mut lref = evaluate_reference(agent, rest).await?;
        // 2. Let restObj be OrdinaryObjectCreate(%Object.prototype%).
        let rest_obj = ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
        // 3. Perform ? CopyDataProperties(restObj, value, excludedNames).
        copy_data_properties(agent, rest_obj, value, &excluded_names)?;
        // 4. Return ? PutValue(lref, restObj).
        put_value(agent, &mut lref, Value::Object(rest_obj))?;
    }
    Ok(())
}

/// ### [13.15.5.6 Runtime Semantics: KeyedDestructuringAssignmentEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-keyeddestructuringassignmentevaluation)
async fn keyed_destructuring_assignment(
    agent: &Agent,
    element: &AssignmentElement,
    value: Value,
    property_name: PropertyKey,
) -> Completion<()> {
    // 1. If DestructuringAssignmentTarget is neither an ObjectLiteral nor an
    // ArrayLiteral, then
    //     a. Let lref be ? Evaluation of DestructuringAssignmentTarget.
    let lref = match &element.target {
        AssignmentTarget::Simple(target) => Some(evaluate_reference(agent, target).await?),
        _ => None,
    };
    // 2. Let v be ? GetV(value, propertyName).
    let v = get_v(agent, value, property_name)?;
    // 3. If Initializer is present and v is undefined, then
    let rhs_value = match &element.init {
        Some(init) if v.is_undefined() => {
            evaluate_initializer(agent, init, simple_identifier(&element.target)).await?
        }
        // 4. Else, let rhsValue be v.
        _ => v,
    };
    assign_to_element(agent, &element.target, lref, rhs_value).await
}

fn simple_identifier(target: &AssignmentTarget) -> Option<&Identifier> {
    match target {
        AssignmentTarget::Simple(target) => target.as_identifier(),
        _ => None,
    }
}

/// The final steps shared by the destructuring assignment evaluations.
async fn assign_to_element(
    agent: &Agent,
    target: &AssignmentTarget,
    lref: Option<Reference>,
    value: Value,
) -> Completion<()> {
    match lref {
        // 7. Return ? PutValue(lref, rhsValue).
        Some(mut lref) => {
            put_value(agent, &mut lref, value)?;
            Ok(())
        }
        // 5. If DestructuringAssignmentTarget is an ObjectLiteral or an
        // ArrayLiteral, then
        //     a. Let assignmentPattern be the AssignmentPattern that is
        //     covered by DestructuringAssignmentTarget.
        //     b. Return ? DestructuringAssignmentEvaluation of
        //     assignmentPattern with argument rhsValue.
        None => destructuring_assignment_evaluation(agent, target, value).await,
    }
}

/// ### [13.15.5.5 Runtime Semantics: IteratorDestructuringAssignmentEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-iteratordestructuringassignmentevaluation)
async fn array_destructuring_assignment(
    agent: &Agent,
    pattern: &ArrayAssignmentPattern,
    iterator_record: &mut IteratorRecord,
) -> Completion<()> {
    for element in &pattern.elements {
        let Some(element) = element else {
            // AssignmentElisionElement : Elision
            // 1. If iteratorRecord.[[Done]] is false, then
            if !iterator_record.done {
                // a. Perform ? IteratorStep(iteratorRecord).
                iterator_step(agent, iterator_record)?;
            }
            continue;
        };
        // AssignmentElement : DestructuringAssignmentTarget Initializer opt
        // 1. If DestructuringAssignmentTarget is neither an ObjectLiteral nor
        // an ArrayLiteral, then
        //     a. Let lref be ? Evaluation of DestructuringAssignmentTarget.
        let lref = match &element.target {
            AssignmentTarget::Simple(target) => Some(evaluate_reference(agent, target).await?),
            _ => None,
        };
        // 2. Let value be undefined.
        // 3. If iteratorRecord.[[Done]] is false, then
        //     a. Let next be ? IteratorStepValue(iteratorRecord).
        //     b. If next is not DONE, then
        //         i. Set value to next.
        let value = if iterator_record.done {
            Value::Undefined
        } else {
            iterator_step_value(agent, iterator_record)?.unwrap_or(Value::Undefined)
        };
        // 4. If Initializer is present and value is undefined, then
        let value = match &element.init {
            Some(init) if value.is_undefined() => {
                evaluate_initializer(agent, init, simple_identifier(&element.target)).await?
            }
            _ => value,
        };
        assign_to_element(agent, &element.target, lref, value).await?;
    }
    // AssignmentRestElement : ... DestructuringAssignmentTarget
    if let Some(rest) = &pattern.rest {
        // 1. If DestructuringAssignmentTarget is neither an ObjectLiteral nor
        // an ArrayLiteral, then
        //     a. Let lref be ? Evaluation of DestructuringAssignmentTarget.
        let lref = match rest {
            AssignmentTarget::Simple(target) => Some(evaluate_reference(agent, target).await?),
            _ => None,
        };
        // 2. Let A be ! ArrayCreate(0).
        // 3. Let n be 0.
        // 4. Repeat, while iteratorRecord.[[Done]] is false,
        let values = collect_rest(agent, iterator_record)?;
        let a = array_from_values(agent, &values)?;
        assign_to_element(agent, rest, lref, Value::Object(a)).await?;
    }
    Ok(())
}

/// Step the iterator until it is done, collecting the values.
fn collect_rest(
    agent: &Agent,
    iterator_record: &mut IteratorRecord,
) -> crate::ecmascript::execution::JsResult<Vec<Value>> {
    let mut values = Vec::new();
    // a. Let next be ? IteratorStepValue(iteratorRecord).
    // b. If next is not DONE, then
    //     i. Perform ! CreateDataPropertyOrThrow(A, ! ToString(𝔽(n)), next).
    //     ii. Set n to n + 1.
    while !iterator_record.done {
        if let Some(next) = iterator_step_value(agent, iterator_record)? {
            values.push(next);
        }
    }
    Ok(values)
}

fn array_from_values(
    agent: &Agent,
    values: &[Value],
) -> crate::ecmascript::execution::JsResult<Object> {
    let a = array_create(agent, 0, None);
    for (n, value) in values.iter().enumerate() {
        create_data_property_or_throw(agent, a, PropertyKey::from_index(agent, n as u64), *value)?;
    }
    Ok(a)
}

/// ### [8.6.2 Runtime Semantics: BindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-bindinginitialization)
///
/// With `environment` None the value is assigned with PutValue, which is
/// how `var` declarations and sloppy duplicate parameters bind.
pub(crate) fn binding_initialization<'a>(
    agent: &'a Agent,
    pattern: &'a BindingPattern,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> EvalFuture<'a, Completion<()>> {
    Box::pin(async move {
        match pattern {
            // BindingIdentifier : Identifier
            // 1. Let name be the StringValue of Identifier.
            // 2. Return ? InitializeBoundName(name, value, environment).
            BindingPattern::Identifier(identifier) => {
                initialize_bound_name(agent, identifier, value, environment)?;
                Ok(())
            }
            // BindingPattern : ObjectBindingPattern
            BindingPattern::Object(pattern) => {
                // 1. Perform ? RequireObjectCoercible(value).
                require_object_coercible(agent, value)?;
                // 2. Return ? BindingInitialization of ObjectBindingPattern with
                // arguments value and environment.
                object_binding_initialization(agent, pattern, value, environment).await
            }
            // BindingPattern : ArrayBindingPattern
            BindingPattern::Array(pattern) => {
                // 1. Let iteratorRecord be ? GetIterator(value, SYNC).
                let mut iterator_record = get_iterator(agent, value, IteratorKind::Sync)?;
                // 2. Let result be Completion(IteratorBindingInitialization of
                // ArrayBindingPattern with arguments iteratorRecord and
                // environment).
                let result =
                    array_binding_initialization(agent, pattern, &mut iterator_record, environment)
                        .await;
                // 3. If iteratorRecord.[[Done]] is false, return ?
                // IteratorClose(iteratorRecord, result).
                if !iterator_record.done {
                    return close_iterator_after(agent, iterator_record.iterator, result);
                }
                // 4. Return ? result.
                result
            }
        }
    })
}

/// ### [8.6.3 Runtime Semantics: InitializeBoundName ( name, value, environment )](https://tc39.es/ecma262/#sec-initializeboundname)
fn initialize_bound_name(
    agent: &Agent,
    identifier: &Identifier,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> crate::ecmascript::execution::JsResult<()> {
    let name = name_string(agent, &identifier.name);
    match environment {
        // 1. If environment is not undefined, then
        //     a. Perform ! environment.InitializeBinding(name, value).
        Some(environment) => environment.initialize_binding(agent, name, value),
        // 2. Else,
        //     a. Let lhs be ? ResolveBinding(name).
        //     b. Return ? PutValue(lhs, value).
        None => {
            let mut lhs = resolve_binding(agent, name, None)?;
            put_value(agent, &mut lhs, value)
        }
    }
}

/// Bind `value` through a reference resolved before the value was
/// computed.
fn bind_resolved(
    agent: &Agent,
    lhs: &mut Reference,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> crate::ecmascript::execution::JsResult<()> {
    // 6. If environment is undefined, return ? PutValue(lhs, v).
    // 7. Return ? InitializeReferencedBinding(lhs, v).
    match environment {
        None => put_value(agent, lhs, value),
        Some(_) => initialize_referenced_binding(agent, lhs, value),
    }
}

async fn object_binding_initialization(
    agent: &Agent,
    pattern: &ObjectBindingPattern,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> Completion<()> {
    // 1. Let excludedNames be ? PropertyBindingInitialization of
    // BindingPropertyList with arguments value and environment.
    let mut excluded_names = Vec::with_capacity(pattern.properties.len());
    for property in &pattern.properties {
        // BindingProperty : PropertyName : BindingElement
        // 1. Let P be ? Evaluation of PropertyName.
        let p = evaluate_property_name(agent, &property.key).await?;
        // 2. Perform ? KeyedBindingInitialization of BindingElement with
        // arguments value, environment, and P.
        keyed_binding_initialization(agent, &property.value, value, environment, p).await?;
        // 3. Return « P ».
        excluded_names.push(p);
    }
    // 2. Perform ? RestBindingInitialization of BindingRestProperty with
    // arguments value, environment, and excludedNames.
    if let Some(rest) = &pattern.rest {
        // 1. Let lhs be ? ResolveBinding(StringValue of BindingIdentifier, environment).
        let mut lhs = resolve_binding(agent, name_string(agent, &rest.name), environment)?;
        // 2. Let restObj be OrdinaryObjectCreate(%Object.prototype%).
        let rest_obj = ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
        // 3. Perform ? CopyDataProperties(restObj, value, excludedNames).
        copy_data_properties(agent, rest_obj, value, &excluded_names)?;
        bind_resolved(agent, &mut lhs, Value::Object(rest_obj), environment)?;
    }
    Ok(())
}

/// ### [8.6.7 Runtime Semantics: KeyedBindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-keyedbindinginitialization)
async fn keyed_binding_initialization(
    agent: &Agent,
    element: &BindingElement,
    value: Value,
    environment: Option<EnvironmentIndex>,
    property_name: PropertyKey,
) -> Completion<()> {
    match &element.target {
        // SingleNameBinding : BindingIdentifier Initializer opt
        BindingPattern::Identifier(identifier) => {
            // 1. Let bindingId be the StringValue of BindingIdentifier.
            // 2. Let lhs be ? ResolveBinding(bindingId, environment).
            let mut lhs =
                resolve_binding(agent, name_string(agent, &identifier.name), environment)?;
            // 3. Let v be ? GetV(value, propertyName).
            let v = get_v(agent, value, property_name)?;
            // 4. If Initializer is present and v is undefined, then
            let v = match &element.init {
                Some(init) if v.is_undefined() => {
                    evaluate_initializer(agent, init, Some(identifier)).await?
                }
                _ => v,
            };
            bind_resolved(agent, &mut lhs, v, environment)?;
            Ok(())
        }
        // BindingElement : BindingPattern Initializer opt
        pattern => {
            // 1. Let v be ? GetV(value, propertyName).
            let v = get_v(agent, value, property_name)?;
            // 2. If Initializer is present and v is undefined, then
            let v = match &element.init {
                Some(init) if v.is_undefined() => evaluate_expression(agent, init).await?,
                _ => v,
            };
            // 3. Return ? BindingInitialization of BindingPattern with
            // arguments v and environment.
            binding_initialization(agent, pattern, v, environment).await
        }
    }
}

/// ### [8.6.4 Runtime Semantics: IteratorBindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-iteratorbindinginitialization)
async fn array_binding_initialization(
    agent: &Agent,
    pattern: &ArrayBindingPattern,
    iterator_record: &mut IteratorRecord,
    environment: Option<EnvironmentIndex>,
) -> Completion<()> {
    for element in &pattern.elements {
        let Some(element) = element else {
            // Elision : ,
            // 1. If iteratorRecord.[[Done]] is false, then
            if !iterator_record.done {
                // a. Perform ? IteratorStep(iteratorRecord).
                iterator_step(agent, iterator_record)?;
            }
            continue;
        };
        // SingleNameBinding : BindingIdentifier Initializer opt
        // 2. Let lhs be ? ResolveBinding(bindingId, environment).
        let lhs = match &element.target {
            BindingPattern::Identifier(identifier) => Some(resolve_binding(
                agent,
                name_string(agent, &identifier.name),
                environment,
            )?),
            _ => None,
        };
        // 3. Let v be undefined.
        // 4. If iteratorRecord.[[Done]] is false, then
        //     a. Let next be ? IteratorStepValue(iteratorRecord).
        //     b. If next is not DONE, then
        //         i. Set v to next.
        let v = if iterator_record.done {
            Value::Undefined
        } else {
            iterator_step_value(agent, iterator_record)?.unwrap_or(Value::Undefined)
        };
        // 5. If Initializer is present and v is undefined, then
        let v = match (&element.init, &element.target) {
            (Some(init), BindingPattern::Identifier(identifier)) if v.is_undefined() => {
                evaluate_initializer(agent, init, Some(identifier)).await?
            }
            (Some(init), _) if v.is_undefined() => evaluate_expression(agent, init).await?,
            _ => v,
        };
        match lhs {
            Some(mut lhs) => bind_resolved(agent, &mut lhs, v, environment)?,
            None => binding_initialization(agent, &element.target, v, environment).await?,
        }
    }
    // BindingRestElement : ... BindingIdentifier
    // BindingRestElement : ... BindingPattern
    if let Some(rest) = &pattern.rest {
        // 1. Let lhs be ? ResolveBinding(StringValue of BindingIdentifier, environment).
        let lhs = match rest {
            BindingPattern::Identifier(identifier) => Some(resolve_binding(
                agent,
                name_string(agent, &identifier.name),
                environment,
            )?),
            _ => None,
        };
        // 2. Let A be ! ArrayCreate(0).
        // 3. Let n be 0.
        // 4. Repeat,
        let values = collect_rest(agent, iterator_record)?;
        let a = Value::Object(array_from_values(agent, &values)?);
        match lhs {
            // b. If next is DONE, then
            //     i. If environment is undefined, return ? PutValue(lhs, A).
            //     ii. Return ? InitializeReferencedBinding(lhs, A).
            Some(mut lhs) => bind_resolved(agent, &mut lhs, a, environment)?,
            // b. If next is DONE, then
            //     i. Return ? BindingInitialization of BindingPattern with
            //     arguments A and environment.
            None => binding_initialization(agent, rest, a, environment).await?,
        }
    }
    Ok(())
}

/// IteratorBindingInitialization of a single formal parameter, whose value
/// is taken directly from the arguments list.
pub(super) async fn binding_element_initialization(
    agent: &Agent,
    element: &BindingElement,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> Completion<()> {
    match &element.target {
        BindingPattern::Identifier(identifier) => {
            let mut lhs =
                resolve_binding(agent, name_string(agent, &identifier.name), environment)?;
            let v = match &element.init {
                Some(init) if value.is_undefined() => {
                    evaluate_initializer(agent, init, Some(identifier)).await?
                }
                _ => value,
            };
            bind_resolved(agent, &mut lhs, v, environment)?;
            Ok(())
        }
        pattern => {
            let v = match &element.init {
                Some(init) if value.is_undefined() => evaluate_expression(agent, init).await?,
                _ => value,
            };
            binding_initialization(agent, pattern, v, environment).await
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn compound_and_logical_assignment() {
        assert_eq!(run_to_string("var x = 2; x **= 3; x"), "8");
        assert_eq!(run_to_string("var s = 'a'; s += 1; s"), "a1");
        assert_eq!(
            run_to_string("var calls = 0; var o = { get x() { calls++; return 1; } }; o.x ||= 2; calls"),
            "1"
        );
        assert_eq!(run_to_string("var n = null; n ??= 5; n"), "5");
        assert_eq!(run_to_string("var a = 0; a &&= 9; a"), "0");
    }

    #[test]
    fn destructuring_assignment_applies_defaults_and_rest() {
        assert_eq!(
            run_to_string("var a, b, r; ({ a, b = 2, ...r } = { a: 1, c: 3, d: 4 }); [a, b, Object.keys(r)].join()"),
            "1,2,c,d"
        );
        assert_eq!(
            run_to_string("var x, y, z; [x, , [y] = [7], ...z] = [1, 2, undefined, 4, 5]; [x, y, z.join('')].join()"),
            "1,7,45"
        );
    }

    #[test]
    fn destructuring_closes_unfinished_iterators() {
        assert_eq!(
            run_to_string(
                "var closed = false;
                 var it = { [Symbol.iterator]() { return { next() { return { value: 1, done: false }; }, return() { closed = true; return {}; } }; } };
                 var [a] = it; closed"
            ),
            "true"
        );
    }

    #[test]
    fn anonymous_functions_are_named_by_their_binding() {
        assert_eq!(run_to_string("var { f = function () {} } = {}; f.name"), "f");
        assert_eq!(run_to_string("var g; g = class {}; g.name"), "g");
    }

    #[test]
    fn destructuring_null_throws_a_type_error() {
        assert_eq!(
            run_to_string("try { var { a } = null; } catch (e) { e instanceof TypeError }"),
            "true"
        );
    }
}
