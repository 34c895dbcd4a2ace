// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::ArgumentsList;
use crate::ecmascript::{
    abstract_operations::operations_on_objects::{call_function, construct},
    execution::{Agent, JsResult},
    types::{InternalMethods, Object, ObjectHeapData, ObjectKind, Value},
};

/// ### [10.4.1 Bound Function Exotic Objects](https://tc39.es/ecma262/#sec-bound-function-exotic-objects)
///
/// A bound function exotic object is an exotic object that wraps another
/// function object. A bound function exotic object is callable (it has a
/// \[\[Call\]\] internal method and may have a \[\[Construct\]\] internal
/// method). Calling a bound function exotic object generally results in a
/// call of its wrapped function.
#[derive(Debug, Clone)]
pub(crate) struct BoundFunctionData {
    /// ### \[\[BoundTargetFunction\]\]
    ///
    /// The wrapped function object.
    pub(crate) bound_target_function: Object,
    /// ### \[\[BoundThis\]\]
    ///
    /// The value that is always passed as the this value when calling the
    /// wrapped function.
    pub(crate) bound_this: Value,
    /// ### \[\[BoundArguments\]\]
    ///
    /// A list of values whose elements are used as the first arguments to
    /// any call to the wrapped function.
    pub(crate) bound_arguments: Box<[Value]>,
}

fn bound_slots(agent: &Agent, f: Object) -> Option<(Object, Value, Vec<Value>)> {
    match &agent.object(f).kind {
        ObjectKind::BoundFunction(data) => Some((
            data.bound_target_function,
            data.bound_this,
            data.bound_arguments.to_vec(),
        )),
        _ => None,
    }
}

/// ### [10.4.1.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-call-thisargument-argumentslist)
pub(crate) fn bound_function_call(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Let target be F.[[BoundTargetFunction]].
    // 2. Let boundThis be F.[[BoundThis]].
    // 3. Let boundArgs be F.[[BoundArguments]].
    let Some((target, bound_this, mut args)) = bound_slots(agent, f) else {
        return Err(agent.internal_error("not a bound function"));
    };
    // 4. Let args be the list-concatenation of boundArgs and argumentsList.
    args.extend_from_slice(&arguments_list);
    // 5. Return ? Call(target, boundThis, args).
    call_function(agent, target, bound_this, &args)
}

/// ### [10.4.1.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-construct-argumentslist-newtarget)
pub(crate) fn bound_function_construct(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    // 1. Let target be F.[[BoundTargetFunction]].
    // 2. Assert: IsConstructor(target) is true.
    // 3. Let boundArgs be F.[[BoundArguments]].
    let Some((target, _, mut args)) = bound_slots(agent, f) else {
        return Err(agent.internal_error("not a bound function"));
    };
    // 4. Let args be the list-concatenation of boundArgs and argumentsList.
    args.extend_from_slice(&arguments_list);
    // 5. If SameValue(F, newTarget) is true, set newTarget to target.
    let new_target = if new_target == f { target } else { new_target };
    // 6. Return ? Construct(target, args, newTarget).
    construct(agent, target, &args, Some(new_target))
}

/// ### [10.4.1.3 BoundFunctionCreate ( targetFunction, boundThis, boundArgs )](https://tc39.es/ecma262/#sec-boundfunctioncreate)
pub(crate) fn bound_function_create(
    agent: &Agent,
    target_function: Object,
    bound_this: Value,
    bound_args: &[Value],
) -> JsResult<Object> {
    // 1. Let proto be ? targetFunction.[[GetPrototypeOf]]().
    let proto = target_function.internal_get_prototype_of(agent)?;
    // 2. Let internalSlotsList be the list-concatenation of « [[Prototype]],
    // [[Extensible]] » and the internal slots listed in Table 31.
    // 3. Let obj be MakeBasicObject(internalSlotsList).
    // 4. Set obj.[[Prototype]] to proto.
    // 5. Set obj.[[Call]] as described in 10.4.1.1.
    // 6. If IsConstructor(targetFunction) is true, then
    // a. Set obj.[[Construct]] as described in 10.4.1.2.
    // 7. Set obj.[[BoundTargetFunction]] to targetFunction.
    // 8. Set obj.[[BoundThis]] to boundThis.
    // 9. Set obj.[[BoundArguments]] to boundArgs.
    let obj = agent.heap_mut().create_object(ObjectHeapData::new(
        proto,
        ObjectKind::BoundFunction(Box::new(BoundFunctionData {
            bound_target_function: target_function,
            bound_this,
            bound_arguments: bound_args.into(),
        })),
    ));
    // 10. Return obj.
    Ok(obj)
}
