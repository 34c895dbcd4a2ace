// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)

mod error_constructor;
mod error_prototype;
mod native_error_constructors;
mod native_error_prototypes;

pub(crate) use error_constructor::ErrorConstructor;
pub(crate) use error_prototype::ErrorPrototype;
pub(crate) use native_error_constructors::NativeErrorConstructors;
pub(crate) use native_error_prototypes::NativeErrorPrototypes;

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            create_non_enumerable_data_property_or_throw, get, has_property,
        },
        type_conversion::to_string,
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsic,
        ordinary::ordinary_create_from_constructor,
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{Object, ObjectKind, Property, PropertyKey, Value},
};

impl ExceptionType {
    /// The `name` of errors of this type.
    pub(crate) const fn name(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::AggregateError => "AggregateError",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        }
    }

    pub(crate) const fn proto_intrinsics(self) -> ProtoIntrinsics {
        match self {
            ExceptionType::Error => ProtoIntrinsics::Error,
            ExceptionType::AggregateError => ProtoIntrinsics::AggregateError,
            ExceptionType::EvalError => ProtoIntrinsics::EvalError,
            ExceptionType::RangeError => ProtoIntrinsics::RangeError,
            ExceptionType::ReferenceError => ProtoIntrinsics::ReferenceError,
            ExceptionType::SyntaxError => ProtoIntrinsics::SyntaxError,
            ExceptionType::TypeError => ProtoIntrinsics::TypeError,
            ExceptionType::UriError => ProtoIntrinsics::UriError,
        }
    }
}

/// Create an error object of the given type in the current realm, with an
/// own non-enumerable `message` property.
pub(crate) fn create_error_object(agent: &Agent, kind: ExceptionType, message: &str) -> Object {
    let prototype = agent.intrinsics().get(kind.proto_intrinsics().intrinsic());
    let error = Object::create(agent, Some(prototype), ObjectKind::Error);
    let key = PropertyKey::from_str(agent, "message");
    let message = Value::from_str(agent, message);
    error.insert_property(agent, key, Property::data(message, true, false, true));
    error
}

/// Steps shared by the Error and NativeError constructors: create the
/// object from NewTarget, then install `message` and `cause`.
pub(super) fn construct_error(
    agent: &Agent,
    kind: ExceptionType,
    message: Value,
    options: Value,
    new_target: Option<Object>,
) -> JsResult<Object> {
    // 1. If NewTarget is undefined, let newTarget be the active function
    // object; else let newTarget be NewTarget.
    let new_target = match new_target {
        Some(new_target) => new_target,
        None => active_function(agent)?,
    };
    // 2. Let O be ? OrdinaryCreateFromConstructor(newTarget,
    // "%NativeError.prototype%", « [[ErrorData]] »).
    let o = ordinary_create_from_constructor(
        agent,
        new_target,
        kind.proto_intrinsics(),
        ObjectKind::Error,
    )?;
    // 3. If message is not undefined, then
    if !message.is_undefined() {
        // a. Let msg be ? ToString(message).
        let msg = to_string(agent, message)?;
        // b. Perform CreateNonEnumerableDataPropertyOrThrow(O, "message", msg).
        let key = PropertyKey::from_str(agent, "message");
        create_non_enumerable_data_property_or_throw(agent, o, key, Value::String(msg))?;
    }
    // 4. Perform ? InstallErrorCause(O, options).
    install_error_cause(agent, o, options)?;
    // 5. Return O.
    Ok(o)
}

/// ### [20.5.8.1 InstallErrorCause ( O, options )](https://tc39.es/ecma262/#sec-installerrorcause)
fn install_error_cause(agent: &Agent, o: Object, options: Value) -> JsResult<()> {
    // 1. If options is an Object and ? HasProperty(options, "cause") is true, then
    let Value::Object(options) = options else {
        return Ok(());
    };
    let key = PropertyKey::from_str(agent, "cause");
    if has_property(agent, options, key)? {
        // a. Let cause be ? Get(options, "cause").
        let cause = get(agent, options, key)?;
        // b. Perform CreateNonEnumerableDataPropertyOrThrow(O, "cause", cause).
        create_non_enumerable_data_property_or_throw(agent, o, key, cause)?;
    }
    // 2. Return UNUSED.
    Ok(())
}

pub(crate) fn active_function(agent: &Agent) -> JsResult<Object> {
    agent
        .running_execution_context()
        .function
        .ok_or_else(|| agent.internal_error("no active function object"))
}

/// ### [10.2.4.1 %ThrowTypeError% ( )](https://tc39.es/ecma262/#sec-%throwtypeerror%)
pub(crate) struct ThrowTypeError;

impl Builtin for ThrowTypeError {
    const NAME: &'static str = "";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ThrowTypeError::behaviour);
}

impl BuiltinIntrinsic for ThrowTypeError {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ThrowTypeError;
}

impl ThrowTypeError {
    fn behaviour(agent: &Agent, _: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Throw a TypeError exception.
        Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "'caller', 'callee', and 'arguments' properties may not be accessed on strict mode functions or the arguments objects for calls to them",
        ))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let this = BuiltinFunctionBuilder::new_intrinsic_function::<ThrowTypeError>(agent, realm)
            .build();
        // The "length" property of this function has the attributes {
        // [[Writable]]: false, [[Enumerable]]: false, [[Configurable]]: false }.
        // The "name" property of this function has the attributes { [[Writable]]:
        // false, [[Enumerable]]: false, [[Configurable]]: false }.
        for (name, value) in [("length", Value::from(0)), ("name", Value::from_str(agent, ""))] {
            let key = PropertyKey::from_str(agent, name);
            this.insert_property(agent, key, Property::data(value, false, false, false));
        }
        // The value of the [[Extensible]] internal slot of this function is false.
        this.set_extensible_slot(agent, false);
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn error_constructors_install_message_and_cause() {
        assert_eq!(
            run_to_string("var e = new RangeError('bad', { cause: 7 }); e.message + e.cause + e.name"),
            "bad7RangeError"
        );
        assert_eq!(
            run_to_string("Object.prototype.hasOwnProperty.call(Error(), 'message')"),
            "false"
        );
        assert_eq!(run_to_string("TypeError('x') instanceof Error"), "true");
    }

    #[test]
    fn error_to_string_joins_name_and_message() {
        assert_eq!(run_to_string("String(new SyntaxError('oops'))"), "SyntaxError: oops");
        assert_eq!(
            run_to_string("Error.prototype.toString.call({ name: '', message: 'm' })"),
            "m"
        );
        assert_eq!(run_to_string("String(new Error())"), "Error");
    }

    #[test]
    fn aggregate_error_collects_errors() {
        assert_eq!(
            run_to_string("var e = new AggregateError([1, 2], 'many'); e.errors.length + e.message"),
            "2many"
        );
    }

    #[test]
    fn thrower_is_frozen_and_throws() {
        assert_eq!(
            run_to_string(
                "(function () {
                    'use strict';
                    var d = Object.getOwnPropertyDescriptor(arguments, 'callee');
                    try { d.get(); } catch (e) { return e instanceof TypeError && !Object.isExtensible(d.get); }
                 })()"
            ),
            "true"
        );
    }
}
