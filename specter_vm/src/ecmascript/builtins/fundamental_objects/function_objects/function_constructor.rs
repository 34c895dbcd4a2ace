// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use specter_ast::parse_dynamic_function;

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::define_property_or_throw, type_conversion::to_rust_string,
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        ecmascript_function::{
            ClassElementKey, make_constructor, ordinary_function_create, set_function_name,
        },
        fundamental_objects::error_objects::active_function,
        ordinary::{get_prototype_from_constructor, ordinary_object_create},
    },
    execution::{
        Agent, EnvironmentIndex, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm,
        agent::ExceptionType,
    },
    types::{Object, PropertyDescriptor, PropertyKey, Value},
};

/// The kind of function created by [`create_dynamic_function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DynamicFunctionKind {
    Normal,
    Generator,
    Async,
    AsyncGenerator,
}

impl DynamicFunctionKind {
    fn prefix(self) -> &'static str {
        match self {
            DynamicFunctionKind::Normal => "function",
            DynamicFunctionKind::Generator => "function*",
            DynamicFunctionKind::Async => "async function",
            DynamicFunctionKind::AsyncGenerator => "async function*",
        }
    }

    fn fallback_proto(self) -> ProtoIntrinsics {
        match self {
            DynamicFunctionKind::Normal => ProtoIntrinsics::Function,
            DynamicFunctionKind::Generator => ProtoIntrinsics::GeneratorFunction,
            DynamicFunctionKind::Async => ProtoIntrinsics::AsyncFunction,
            DynamicFunctionKind::AsyncGenerator => ProtoIntrinsics::AsyncGeneratorFunction,
        }
    }
}

pub(crate) struct FunctionConstructor;

impl Builtin for FunctionConstructor {
    const NAME: &'static str = "Function";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(FunctionConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for FunctionConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Function;
}

impl FunctionConstructor {
    /// ### [20.2.1.1 Function ( ...parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-function-p1-p2-pn-body)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let C be the active function object.
        let constructor = active_function(agent)?;
        // 2. If bodyArg is not present, set bodyArg to the empty String.
        // 3. Return ? CreateDynamicFunction(C, NewTarget, NORMAL, parameterArgs, bodyArg).
        let f = create_dynamic_function(
            agent,
            constructor,
            new_target,
            DynamicFunctionKind::Normal,
            &arguments,
        )?;
        Ok(Value::Object(f))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        BuiltinFunctionBuilder::new_intrinsic_constructor::<FunctionConstructor>(agent, realm)
            .with_property_capacity(1)
            .with_prototype_property(intrinsics.function_prototype())
            .build();
    }
}

/// ### [20.2.1.1.1 CreateDynamicFunction ( constructor, newTarget, kind, parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-createdynamicfunction)
///
/// `arguments` holds the parameter arguments followed by the body argument.
pub(crate) fn create_dynamic_function(
    agent: &Agent,
    constructor: Object,
    new_target: Option<Object>,
    kind: DynamicFunctionKind,
    arguments: &[Value],
) -> JsResult<Object> {
    // 1. If newTarget is undefined, set newTarget to constructor.
    let new_target = new_target.unwrap_or(constructor);
    // 2. Perform ? HostEnsureCanCompileStrings(currentRealm, parameterStrings,
    // bodyString, false).
    let realm = agent.current_realm();
    agent.host_hooks().ensure_can_compile_strings(agent, realm)?;
    // 8. Let argCount be the number of elements in parameterArgs.
    let (parameter_args, body_arg) = match arguments.split_last() {
        Some((body, parameters)) => (parameters, *body),
        None => (arguments, Value::Undefined),
    };
    // 10. Let parameterStrings be a new empty List.
    // 11. For each element arg of parameterArgs, do
    //   a. Append ? ToString(arg) to parameterStrings.
    let mut parameter_strings = Vec::with_capacity(parameter_args.len());
    for arg in parameter_args {
        parameter_strings.push(to_rust_string(agent, *arg)?);
    }
    // 12. Let bodyString be ? ToString(bodyArg).
    let body_string = if body_arg.is_undefined() && arguments.is_empty() {
        String::new()
    } else {
        to_rust_string(agent, body_arg)?
    };
    // 15. Let P be the empty String, or the parameterStrings joined by ",".
    let p = parameter_strings.join(",");
    // 16. Let bodyParseString be the string-concatenation of 0x000A (LINE
    // FEED), bodyString, and 0x000A (LINE FEED).
    // 17. Let sourceString be the string-concatenation of prefix, "
    // anonymous(", P, 0x000A (LINE FEED), ") {", bodyParseString, and "}".
    let source_string = format!("{} anonymous({p}\n) {{\n{body_string}\n}}", kind.prefix());
    tracing::trace!(event = "create_dynamic_function", kind = ?kind, len = source_string.len());
    // 19. Let parameters be ParseText(P, parameterSym).
    // 22. Let expr be ParseText(sourceText, exprSym).
    // 23. If expr is a List of errors, throw a SyntaxError exception.
    let code = parse_dynamic_function(&source_string)
        .map_err(|error| agent.throw_exception(ExceptionType::SyntaxError, error.message()))?;
    let parsed_kind = match (code.is_async, code.is_generator) {
        (false, false) => DynamicFunctionKind::Normal,
        (false, true) => DynamicFunctionKind::Generator,
        (true, false) => DynamicFunctionKind::Async,
        (true, true) => DynamicFunctionKind::AsyncGenerator,
    };
    if parsed_kind != kind || code.name.as_ref().is_none_or(|name| &*name.name != "anonymous") {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "Invalid function parameters or body",
        ));
    }
    // 24. Let proto be ? GetPrototypeFromConstructor(newTarget, fallbackProto).
    let proto = get_prototype_from_constructor(agent, new_target, kind.fallback_proto())?;
    // 25. Let env be currentRealm.[[GlobalEnv]].
    let env = EnvironmentIndex::Global(realm.global_env(agent));
    // 26. Let privateEnv be null.
    // 27. Let F be OrdinaryFunctionCreate(proto, sourceText, parameters, body,
    // NON-LEXICAL-THIS, env, privateEnv).
    let f = ordinary_function_create(agent, proto, code, env, None);
    // 28. Perform SetFunctionName(F, "anonymous").
    let name = PropertyKey::from_str(agent, "anonymous");
    set_function_name(agent, f, ClassElementKey::Property(name), None);
    let intrinsics = agent.intrinsics();
    let instance_prototype = match kind {
        // 29. If kind is GENERATOR, then
        // a. Let prototype be OrdinaryObjectCreate(%GeneratorFunction.prototype.prototype%).
        DynamicFunctionKind::Generator => intrinsics.generator_prototype(),
        // 30. Else if kind is ASYNC-GENERATOR, then
        // a. Let prototype be OrdinaryObjectCreate(%AsyncGeneratorFunction.prototype.prototype%).
        DynamicFunctionKind::AsyncGenerator => intrinsics.async_generator_prototype(),
        // 31. Else if kind is NORMAL, then
        // a. Perform MakeConstructor(F).
        DynamicFunctionKind::Normal => {
            make_constructor(agent, f, true, None);
            return Ok(f);
        }
        // 32. NOTE: Functions whose kind is ASYNC are not constructible and do
        // not have a [[Construct]] internal method or a "prototype" property.
        DynamicFunctionKind::Async => return Ok(f),
    };
    // b. Perform ! DefinePropertyOrThrow(F, "prototype", PropertyDescriptor {
    // [[Value]]: prototype, [[Writable]]: true, [[Enumerable]]: false,
    // [[Configurable]]: false }).
    let prototype = ordinary_object_create(agent, Some(instance_prototype));
    define_property_or_throw(
        agent,
        f,
        PropertyKey::from_str(agent, "prototype"),
        PropertyDescriptor {
            value: Some(Value::Object(prototype)),
            writable: Some(true),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        },
    )?;
    // 33. Return F.
    Ok(f)
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn function_constructor_compiles_parameters_and_body() {
        assert_eq!(run_to_string("new Function('a', 'b', 'return a + b')(2, 3)"), "5");
        assert_eq!(run_to_string("Function('return this')() === globalThis"), "true");
        assert_eq!(run_to_string("Function().name"), "anonymous");
        assert_eq!(
            run_to_string("String(Function('a,b', 'return 1'))"),
            "function anonymous(a,b\n) {\nreturn 1\n}"
        );
    }

    #[test]
    fn dynamic_functions_close_over_the_global_scope() {
        assert_eq!(
            run_to_string("var x = 'global'; (function () { var x = 'local'; return Function('return x')(); })()"),
            "global"
        );
    }

    #[test]
    fn malformed_source_is_a_syntax_error() {
        assert_eq!(
            run_to_string("try { Function('a', '}'); } catch (e) { e instanceof SyntaxError }"),
            "true"
        );
        assert_eq!(
            run_to_string("try { Function('){}, (function(', ''); } catch (e) { e.name }"),
            "SyntaxError"
        );
    }
}
