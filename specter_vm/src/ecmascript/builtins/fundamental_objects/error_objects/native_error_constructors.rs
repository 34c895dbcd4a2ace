// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::construct_error;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_iterator_objects::iterable_to_list,
        operations_on_objects::{create_array_from_list, define_property_or_throw},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor},
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, PropertyDescriptor, PropertyKey, Value},
};

/// Defines the constructor struct of one NativeError type.
macro_rules! native_error_constructor {
    ($name:ident, $kind:ident, $index:ident, $method:ident) => {
        struct $name;
        impl Builtin for $name {
            const NAME: &'static str = ExceptionType::$kind.name();
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Constructor(NativeErrorConstructors::$method);
        }
        impl BuiltinIntrinsicConstructor for $name {
            const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::$index;
        }
    };
}

native_error_constructor!(EvalErrorConstructor, EvalError, EvalError, eval_error_constructor);
native_error_constructor!(RangeErrorConstructor, RangeError, RangeError, range_error_constructor);
native_error_constructor!(
    ReferenceErrorConstructor,
    ReferenceError,
    ReferenceError,
    reference_error_constructor
);
native_error_constructor!(
    SyntaxErrorConstructor,
    SyntaxError,
    SyntaxError,
    syntax_error_constructor
);
native_error_constructor!(TypeErrorConstructor, TypeError, TypeError, type_error_constructor);
native_error_constructor!(UriErrorConstructor, UriError, UriError, uri_error_constructor);

struct AggregateErrorConstructor;
impl Builtin for AggregateErrorConstructor {
    const NAME: &'static str = "AggregateError";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour =
        Behaviour::Constructor(NativeErrorConstructors::aggregate_error_constructor);
}
impl BuiltinIntrinsicConstructor for AggregateErrorConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::AggregateError;
}

/// ### [20.5.6 NativeError Object Structure](https://tc39.es/ecma262/#sec-nativeerror-object-structure)
pub(crate) struct NativeErrorConstructors;

impl NativeErrorConstructors {
    /// ### [20.5.6.1.1 NativeError ( message \[ , options \] )](https://tc39.es/ecma262/#sec-nativeerror)
    fn constructor(
        agent: &Agent,
        kind: ExceptionType,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let o = construct_error(agent, kind, arguments.get(0), arguments.get(1), new_target)?;
        Ok(Value::Object(o))
    }

    fn eval_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, ExceptionType::EvalError, arguments, new_target)
    }

    fn range_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, ExceptionType::RangeError, arguments, new_target)
    }

    fn reference_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, ExceptionType::ReferenceError, arguments, new_target)
    }

    fn syntax_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, ExceptionType::SyntaxError, arguments, new_target)
    }

    fn type_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, ExceptionType::TypeError, arguments, new_target)
    }

    fn uri_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, ExceptionType::UriError, arguments, new_target)
    }

    /// ### [20.5.7.1.1 AggregateError ( errors, message \[ , options \] )](https://tc39.es/ecma262/#sec-aggregate-error)
    fn aggregate_error_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1-4. Create O and install message and cause.
        let o = construct_error(
            agent,
            ExceptionType::AggregateError,
            arguments.get(1),
            arguments.get(2),
            new_target,
        )?;
        // 5. Let errorsList be ? IteratorToList(? GetIterator(errors, SYNC)).
        let errors_list = iterable_to_list(agent, arguments.get(0))?;
        // 6. Perform ! DefinePropertyOrThrow(O, "errors", PropertyDescriptor {
        // [[Configurable]]: true, [[Enumerable]]: false, [[Writable]]: true,
        // [[Value]]: CreateArrayFromList(errorsList) }).
        let errors = create_array_from_list(agent, &errors_list);
        define_property_or_throw(
            agent,
            o,
            PropertyKey::from_str(agent, "errors"),
            PropertyDescriptor {
                value: Some(Value::Object(errors)),
                writable: Some(true),
                enumerable: Some(false),
                configurable: Some(true),
                ..Default::default()
            },
        )?;
        // 7. Return O.
        Ok(Value::Object(o))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        // The [[Prototype]] of every NativeError constructor is %Error%.
        let error_constructor = intrinsics.error();

        BuiltinFunctionBuilder::new_intrinsic_constructor::<EvalErrorConstructor>(agent, realm)
            .with_prototype(error_constructor)
            .with_prototype_property(intrinsics.eval_error_prototype())
            .build();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<RangeErrorConstructor>(agent, realm)
            .with_prototype(error_constructor)
            .with_prototype_property(intrinsics.range_error_prototype())
            .build();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<ReferenceErrorConstructor>(
            agent, realm,
        )
        .with_prototype(error_constructor)
        .with_prototype_property(intrinsics.reference_error_prototype())
        .build();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<SyntaxErrorConstructor>(agent, realm)
            .with_prototype(error_constructor)
            .with_prototype_property(intrinsics.syntax_error_prototype())
            .build();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<TypeErrorConstructor>(agent, realm)
            .with_prototype(error_constructor)
            .with_prototype_property(intrinsics.type_error_prototype())
            .build();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<UriErrorConstructor>(agent, realm)
            .with_prototype(error_constructor)
            .with_prototype_property(intrinsics.uri_error_prototype())
            .build();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<AggregateErrorConstructor>(
            agent, realm,
        )
        .with_prototype(error_constructor)
        .with_prototype_property(intrinsics.aggregate_error_prototype())
        .build();
    }
}
