// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{ops::Deref, rc::Rc};

use crate::ecmascript::{
    execution::{
        Agent, ExecutionContext, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType,
    },
    types::{HeapString, Object, ObjectHeapData, ObjectKind, Property, PropertyKey, Symbol, Value},
};

/// The arguments of a call to a built-in function. Missing arguments read as
/// undefined.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ArgumentsList<'a>(pub(crate) &'a [Value]);

impl<'a> ArgumentsList<'a> {
    pub(crate) const EMPTY: ArgumentsList<'static> = ArgumentsList(&[]);

    /// The argument at `index`, or undefined.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Value {
        self.0.get(index).copied().unwrap_or(Value::Undefined)
    }

    /// The arguments after the first `start`.
    pub(crate) fn slice_from(&self, start: usize) -> &'a [Value] {
        self.0.get(start..).unwrap_or_default()
    }
}

impl Deref for ArgumentsList<'_> {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

pub(crate) type RegularFn = fn(&Agent, Value, ArgumentsList) -> JsResult<Value>;
pub(crate) type ConstructorFn =
    fn(&Agent, Value, ArgumentsList, Option<Object>) -> JsResult<Value>;

/// The behaviour of a built-in function defined by ECMA-262. Constructor
/// behaviours receive the NewTarget, or None when called.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Behaviour {
    Regular(RegularFn),
    Constructor(ConstructorFn),
}

pub(crate) fn behaviour_is_constructor(behaviour: Behaviour) -> bool {
    matches!(behaviour, Behaviour::Constructor(_))
}

/// Static description of a built-in function property.
pub(crate) trait Builtin {
    const NAME: &'static str;
    const LENGTH: u8;
    const BEHAVIOUR: Behaviour;

    /// Set if the property key is a Symbol rather than `NAME`.
    const KEY: Option<Symbol> = None;

    /// If the builtin function is created as a property then this controls
    /// the property's `[[Writable]]` value.
    const WRITABLE: bool = true;
    /// If the builtin function is created as a property then this controls
    /// the property's `[[Enumerable]]` value.
    const ENUMERABLE: bool = false;
    /// If the builtin function is created as a property then this controls
    /// the property's `[[Configurable]]` value.
    const CONFIGURABLE: bool = true;
}

/// A built-in constructor that is an intrinsic of the realm.
pub(crate) trait BuiltinIntrinsicConstructor: Builtin {
    const INDEX: IntrinsicObjectIndex;
}

/// A built-in function that is an intrinsic of the realm.
pub(crate) trait BuiltinIntrinsic: Builtin {
    const INDEX: IntrinsicObjectIndex;
}

/// A built-in function installed as the getter of an accessor property
/// named `NAME`.
pub(crate) trait BuiltinGetter: Builtin {}

/// The internal slots of a built-in function object defined by ECMA-262.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuiltinFunctionData {
    pub(crate) behaviour: Behaviour,
    /// ### \[\[Realm\]\]
    pub(crate) realm: Realm,
    /// ### \[\[InitialName\]\]
    pub(crate) initial_name: Option<HeapString>,
}

/// Behaviour of a built-in function created from an Abstract Closure. The
/// closure captures the additional internal slots of the function.
pub(crate) type BuiltinClosure =
    Rc<dyn Fn(&Agent, Value, ArgumentsList, Option<Object>) -> JsResult<Value>>;

#[derive(Clone)]
pub(crate) struct BuiltinClosureData {
    pub(crate) closure: BuiltinClosure,
    /// ### \[\[Realm\]\]
    pub(crate) realm: Realm,
    pub(crate) is_constructor: bool,
    /// ### \[\[InitialName\]\]
    pub(crate) initial_name: Option<HeapString>,
}

impl std::fmt::Debug for BuiltinClosureData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinClosureData")
            .field("realm", &self.realm)
            .field("is_constructor", &self.is_constructor)
            .field("initial_name", &self.initial_name)
            .finish_non_exhaustive()
    }
}

/// ### [10.3.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-built-in-function-objects-call-thisargument-argumentslist)
///
/// The [[Call]] internal method of a built-in function object F takes
/// arguments thisArgument (an ECMAScript language value) and argumentsList (a
/// List of ECMAScript language values) and returns either a normal completion
/// containing an ECMAScript language value or a throw completion.
pub(crate) fn builtin_call(
    agent: &Agent,
    f: Object,
    this_argument: Value,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Return ? BuiltinCallOrConstruct(F, thisArgument, argumentsList, undefined).
    builtin_call_or_construct(agent, f, this_argument, arguments_list, None)
}

/// ### [10.3.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-built-in-function-objects-construct-argumentslist-newtarget)
///
/// The [[Construct]] internal method of a built-in function object F (when
/// the method is present) takes arguments argumentsList (a List of
/// ECMAScript language values) and newTarget (a constructor) and returns
/// either a normal completion containing an Object or a throw completion.
pub(crate) fn builtin_construct(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    // 1. Let result be ? BuiltinCallOrConstruct(F, uninitialized, argumentsList, newTarget).
    let result =
        builtin_call_or_construct(agent, f, Value::Undefined, arguments_list, Some(new_target))?;
    // 2. Assert: result is an Object.
    // 3. Return result.
    match result {
        Value::Object(result) => Ok(result),
        _ => Err(agent.internal_error("built-in constructor returned a primitive")),
    }
}

enum Callee {
    Behaviour(Behaviour),
    Closure(BuiltinClosure),
}

/// ### [10.3.3 BuiltinCallOrConstruct ( F, thisArgument, argumentsList, newTarget )](https://tc39.es/ecma262/#sec-builtincallorconstruct)
fn builtin_call_or_construct(
    agent: &Agent,
    f: Object,
    this_argument: Value,
    arguments_list: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    // 1. Let callerContext be the running execution context.
    // 2. If callerContext is not already suspended, suspend callerContext.
    // 5. Let calleeRealm be F.[[Realm]].
    let (callee, callee_realm) = match &agent.object(f).kind {
        ObjectKind::BuiltinFunction(data) => (Callee::Behaviour(data.behaviour), data.realm),
        ObjectKind::BuiltinClosure(data) => (Callee::Closure(data.closure.clone()), data.realm),
        _ => return Err(agent.internal_error("not a built-in function")),
    };
    // 3. Let calleeContext be a new execution context.
    let callee_context = ExecutionContext {
        // 8. Perform any necessary implementation-defined initialization of calleeContext.
        ecmascript_code: None,
        // 4. Set the Function of calleeContext to F.
        function: Some(f),
        // 6. Set the Realm of calleeContext to calleeRealm.
        realm: callee_realm,
        // 7. Set the ScriptOrModule of calleeContext to null.
        script_or_module: None,
        coroutine: None,
    };
    // 9. Push calleeContext onto the execution context stack; calleeContext
    // is now the running execution context.
    agent.push_execution_context(callee_context);
    // 10. Let result be the Completion Record that is the result of
    // evaluating F in a manner that conforms to the specification of F. If
    // thisArgument is uninitialized, the this value is uninitialized;
    // otherwise, thisArgument provides the this value. argumentsList
    // provides the named parameters. newTarget provides the NewTarget value.
    let result = match callee {
        Callee::Behaviour(Behaviour::Regular(func)) => {
            if new_target.is_some() {
                Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Not a constructor",
                ))
            } else {
                func(agent, this_argument, arguments_list)
            }
        }
        Callee::Behaviour(Behaviour::Constructor(func)) => {
            func(agent, this_argument, arguments_list, new_target)
        }
        Callee::Closure(closure) => closure(agent, this_argument, arguments_list, new_target),
    };
    // 12. Remove calleeContext from the execution context stack and restore
    // callerContext as the running execution context.
    agent.pop_execution_context();
    // 13. Return ? result.
    result
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
///
/// Creates a built-in function from an Abstract Closure. The closure holds
/// the additional internal slots of the function.
pub(crate) fn create_builtin_function(
    agent: &Agent,
    closure: BuiltinClosure,
    length: u32,
    name: PropertyKey,
    is_constructor: bool,
) -> Object {
    // 1. If realm is not present, set realm to the current Realm Record.
    let realm = agent.current_realm();
    // 2. If prototype is not present, set prototype to
    // realm.[[Intrinsics]].[[%Function.prototype%]].
    let prototype = realm.intrinsics(agent).function_prototype();
    // 11. If prefix is not present, then
    //     a. Perform SetFunctionName(func, name).
    let name = match name {
        PropertyKey::Symbol(symbol) => match symbol.description(agent) {
            Some(description) => HeapString::from_str(
                agent,
                &format!("[{}]", description.as_rc(agent)),
            ),
            None => HeapString::from_str(agent, ""),
        },
        key => match key.into_value(agent) {
            Value::String(name) => name,
            _ => HeapString::from_str(agent, ""),
        },
    };
    // 5. Let func be a new built-in function object that, when called,
    // performs the action described by behaviour using the provided
    // arguments as the values of the corresponding parameters specified by
    // behaviour.
    let mut data = ObjectHeapData::new(
        // 6. Set func.[[Prototype]] to prototype.
        // 7. Set func.[[Extensible]] to true.
        Some(prototype),
        ObjectKind::BuiltinClosure(BuiltinClosureData {
            closure,
            // 8. Set func.[[Realm]] to realm.
            realm,
            is_constructor,
            // 9. Set func.[[InitialName]] to null.
            initial_name: Some(name),
        }),
    );
    // 10. Perform SetFunctionLength(func, length).
    let length_key = PropertyKey::from_str(agent, "length");
    data.properties.insert(
        length_key,
        Property::data(Value::from(length), false, false, true),
    );
    let name_key = PropertyKey::from_str(agent, "name");
    data.properties
        .insert(name_key, Property::data(Value::String(name), false, false, true));
    // 13. Return func.
    agent.heap_mut().create_object(data)
}

/// Shorthand for a nameless closure of length `length` that is not a
/// constructor: the resolving functions and reaction handlers of Promises.
pub(crate) fn create_anonymous_builtin_function(
    agent: &Agent,
    length: u32,
    closure: impl Fn(&Agent, Value, ArgumentsList) -> JsResult<Value> + 'static,
) -> Object {
    let name = PropertyKey::from_str(agent, "");
    create_builtin_function(
        agent,
        Rc::new(move |agent, this, arguments, _| closure(agent, this, arguments)),
        length,
        name,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arguments_are_undefined() {
        let values = [Value::Number(1.0)];
        let arguments = ArgumentsList(&values);
        assert_eq!(arguments.get(0), Value::Number(1.0));
        assert_eq!(arguments.get(1), Value::Undefined);
        assert_eq!(arguments.slice_from(1), &[] as &[Value]);
        assert_eq!(arguments.slice_from(5), &[] as &[Value]);
        assert_eq!(ArgumentsList::EMPTY.len(), 0);
    }
}
