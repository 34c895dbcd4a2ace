// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.2 ECMAScript Function Objects](https://tc39.es/ecma262/#sec-ecmascript-function-objects)
//!
//! ECMAScript function objects encapsulate parameterized ECMAScript code
//! closed over a lexical environment and support the dynamic evaluation of
//! that code.

use std::rc::Rc;

use specter_ast::ast::{ClassNode, FunctionKind, FunctionNode};

use super::{
    ArgumentsList,
    control_abstraction_objects::{
        async_function_objects::async_function_start,
        async_generator_objects::async_generator_start,
        generator_objects::{GeneratorData, generator_start},
        promise_objects::promise_abstract_operations::{promise_create, reject_promise},
    },
    ordinary::ordinary_create_from_constructor,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                call_function, construct, create_data_property_or_throw, define_property_or_throw,
                private_field_add, private_method_or_accessor_add,
            },
            testing_and_comparison::is_constructor,
            type_conversion::to_object,
        },
        execution::{
            Agent, ECMAScriptCodeEvaluationState, EnvironmentIndex, ExecutionContext, JsError,
            JsResult, PrivateEnvironment, PrivateName, ProtoIntrinsics, Realm,
            ThisBindingStatus, agent::{ExceptionType, get_active_script_or_module},
            new_function_environment,
        },
        scripts_and_modules::ScriptOrModule,
        types::{
            HeapString, InternalMethods, Object, ObjectHeapData, ObjectKind, PrivateElement,
            Property, PropertyDescriptor, PropertyKey, Value,
        },
    },
    engine::{
        evaluator::function_definitions::{
            evaluate_function_body, function_declaration_instantiation,
        },
        run_sync,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstructorKind {
    Base,
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ThisMode {
    /// `this` refers to the this value of a lexically enclosing function.
    Lexical,
    /// The this value is used exactly as provided by an invocation.
    Strict,
    /// An undefined or null this value is interpreted as a reference to the
    /// global object, and any other this value is first passed to ToObject.
    Global,
}

/// The key of a class element: a property key or a Private Name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ClassElementKey {
    Property(PropertyKey),
    Private(PrivateName),
}

/// ### [6.2.12 ClassFieldDefinition Records](https://tc39.es/ecma262/#sec-classfielddefinition-record-specification-type)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClassFieldDefinition {
    /// ### \[\[Name\]\]
    pub(crate) name: ClassElementKey,
    /// ### \[\[Initializer\]\]
    pub(crate) initializer: Option<Object>,
}

/// The internal slots of an ECMAScript function object (Table 30).
#[derive(Debug)]
pub(crate) struct ECMAScriptFunctionData {
    /// ### \[\[Environment\]\]
    ///
    /// The Environment Record that the function was closed over. Used as the
    /// outer environment when evaluating the code of the function.
    pub(crate) environment: EnvironmentIndex,

    /// ### \[\[PrivateEnvironment\]\]
    pub(crate) private_environment: Option<PrivateEnvironment>,

    /// ### \[\[ECMAScriptCode\]\]
    ///
    /// Holds the parameters and body of the function. None for the default
    /// constructor of a class.
    pub(crate) code: Option<Rc<FunctionNode>>,

    /// ### \[\[ConstructorKind\]\]
    ///
    /// None if the function has no \[\[Construct\]\] internal method.
    pub(crate) constructor_kind: Option<ConstructorKind>,

    /// ### \[\[Realm\]\]
    pub(crate) realm: Realm,

    /// ### \[\[ScriptOrModule\]\]
    pub(crate) script_or_module: Option<ScriptOrModule>,

    /// ### \[\[ThisMode\]\]
    pub(crate) this_mode: ThisMode,

    /// ### \[\[Strict\]\]
    pub(crate) strict: bool,

    /// ### \[\[HomeObject\]\]
    ///
    /// If the function uses `super`, this is the object whose
    /// \[\[GetPrototypeOf\]\] provides the object where `super` property
    /// lookups begin.
    pub(crate) home_object: Option<Object>,

    /// ### \[\[SourceText\]\] of class constructors
    ///
    /// The source text of a class constructor is that of the whole class.
    pub(crate) class_node: Option<Rc<ClassNode>>,

    /// ### \[\[Fields\]\]
    pub(crate) fields: Vec<ClassFieldDefinition>,

    /// ### \[\[PrivateMethods\]\]
    pub(crate) private_methods: Vec<PrivateElement>,

    /// ### \[\[ClassFieldInitializerName\]\]
    pub(crate) class_field_initializer_name: Option<ClassElementKey>,

    /// ### \[\[IsClassConstructor\]\]
    pub(crate) is_class_constructor: bool,
}

/// Run `f` with the function data of `object`, or None if it is not an
/// ECMAScript function object.
fn with_function_data<R>(
    agent: &Agent,
    object: Object,
    f: impl FnOnce(&ECMAScriptFunctionData) -> R,
) -> Option<R> {
    match &agent.object(object).kind {
        ObjectKind::ECMAScriptFunction(data) => Some(f(data)),
        _ => None,
    }
}

fn with_function_data_mut<R>(
    agent: &Agent,
    object: Object,
    f: impl FnOnce(&mut ECMAScriptFunctionData) -> R,
) -> Option<R> {
    match &mut agent.object_mut(object).kind {
        ObjectKind::ECMAScriptFunction(data) => Some(f(data)),
        _ => None,
    }
}

/// The \[\[ECMAScriptCode\]\] of an ECMAScript function object.
pub(crate) fn function_code(agent: &Agent, f: Object) -> Option<Rc<FunctionNode>> {
    with_function_data(agent, f, |data| data.code.clone()).flatten()
}

pub(crate) fn class_field_initializer_name(agent: &Agent, f: Object) -> Option<ClassElementKey> {
    with_function_data(agent, f, |data| data.class_field_initializer_name).flatten()
}

pub(crate) fn is_derived_constructor(agent: &Agent, f: Object) -> bool {
    with_function_data(agent, f, |data| {
        data.constructor_kind == Some(ConstructorKind::Derived)
    })
    .unwrap_or(false)
}

/// The source text returned by `Function.prototype.toString`, if `f` is an
/// ECMAScript function object.
pub(crate) fn function_source_text(agent: &Agent, f: Object) -> Option<String> {
    with_function_data(agent, f, |data| match (&data.class_node, &data.code) {
        (Some(class), _) => Some(class.source().to_owned()),
        (None, Some(code)) => Some(code.source().to_owned()),
        (None, None) => None,
    })
    .flatten()
}

/// ### [10.2.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-call-thisargument-argumentslist)
pub(crate) fn ecmascript_function_call(
    agent: &Agent,
    f: Object,
    this_argument: Value,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Let callerContext be the running execution context.
    let depth = agent.execution_context_depth();
    // 2. Let calleeContext be PrepareForOrdinaryCall(F, undefined).
    let callee_context = prepare_for_ordinary_call(agent, f, None)?;
    // 3. Assert: calleeContext is now the running execution context.
    // 4. If F.[[IsClassConstructor]] is true, then
    if with_function_data(agent, f, |data| data.is_class_constructor).unwrap_or(false) {
        // a. Let error be a newly created TypeError object.
        // b. NOTE: error is created in calleeContext with F's associated
        // Realm Record.
        let error = agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Class constructor cannot be invoked without 'new'",
        );
        // c. Remove calleeContext from the execution context stack and
        // restore callerContext as the running execution context.
        agent.truncate_execution_context_stack(depth);
        // d. Return ThrowCompletion(error).
        return Err(error);
    }
    // 5. Perform OrdinaryCallBindThis(F, calleeContext, thisArgument).
    let result = ordinary_call_bind_this(agent, f, callee_context, this_argument)
        // 6. Let result be Completion(OrdinaryCallEvaluateBody(F, argumentsList)).
        .and_then(|()| ordinary_call_evaluate_body(agent, f, arguments_list));
    // 7. Remove calleeContext from the execution context stack and restore
    // callerContext as the running execution context.
    agent.truncate_execution_context_stack(depth);
    // 8. If result is a return completion, return result.[[Value]].
    // 9. ReturnIfAbrupt(result).
    // 10. Return undefined.
    result
}

/// ### [10.2.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-construct-argumentslist-newtarget)
pub(crate) fn ecmascript_function_construct(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    // 1. Let callerContext be the running execution context.
    let depth = agent.execution_context_depth();
    // 2. Let kind be F.[[ConstructorKind]].
    let Some(kind) = with_function_data(agent, f, |data| data.constructor_kind).flatten() else {
        return Err(agent.internal_error("constructed a function without [[Construct]]"));
    };
    // 3. If kind is BASE, then
    let this_argument = if kind == ConstructorKind::Base {
        // a. Let thisArgument be ? OrdinaryCreateFromConstructor(newTarget,
        // "%Object.prototype%").
        Some(ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Object,
            ObjectKind::Ordinary,
        )?)
    } else {
        None
    };
    // 4. Let calleeContext be PrepareForOrdinaryCall(F, newTarget).
    let callee_context = prepare_for_ordinary_call(agent, f, Some(new_target))?;
    // 5. Assert: calleeContext is now the running execution context.
    // 6. If kind is BASE, then
    if let Some(this_argument) = this_argument {
        // a. Perform OrdinaryCallBindThis(F, calleeContext, thisArgument).
        // b. Let initializeResult be Completion(InitializeInstanceElements(thisArgument, F)).
        let initialize_result =
            ordinary_call_bind_this(agent, f, callee_context, Value::Object(this_argument))
                .and_then(|()| initialize_instance_elements(agent, this_argument, f));
        // c. If initializeResult is an abrupt completion, then
        if let Err(error) = initialize_result {
            // i. Remove calleeContext from the execution context stack and
            // restore callerContext as the running execution context.
            agent.truncate_execution_context_stack(depth);
            // ii. Return ? initializeResult.
            return Err(error);
        }
    }
    // 7. Let constructorEnv be the LexicalEnvironment of calleeContext.
    let constructor_env = callee_context
        .ecmascript_code
        .map(|code| code.lexical_environment);
    // 8. Let result be Completion(OrdinaryCallEvaluateBody(F, argumentsList)).
    let result = ordinary_call_evaluate_body(agent, f, arguments_list);
    // 9. Remove calleeContext from the execution context stack and restore
    // callerContext as the running execution context.
    agent.truncate_execution_context_stack(depth);
    // 10. If result is a return completion, then
    match result? {
        // a. If result.[[Value]] is an Object, return result.[[Value]].
        Value::Object(result) => return Ok(result),
        // b. If kind is BASE, return thisArgument.
        Value::Undefined => {
            if let Some(this_argument) = this_argument {
                return Ok(this_argument);
            }
        }
        // c. If result.[[Value]] is not undefined, throw a TypeError exception.
        _ => {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Derived constructors may only return object or undefined",
            ));
        }
    }
    // 11. Else, ReturnIfAbrupt(result).
    // 12. Let thisBinding be ? constructorEnv.GetThisBinding().
    let Some(constructor_env) = constructor_env else {
        return Err(agent.internal_error("constructor context without an environment"));
    };
    // 13. Assert: thisBinding is an Object.
    // 14. Return thisBinding.
    match constructor_env.get_this_binding(agent)? {
        Value::Object(this_binding) => Ok(this_binding),
        _ => Err(agent.internal_error("constructor this binding is not an object")),
    }
}

/// ### [10.2.1.1 PrepareForOrdinaryCall ( F, newTarget )](https://tc39.es/ecma262/#sec-prepareforordinarycall)
///
/// Pushes the callee context and returns a copy of it.
fn prepare_for_ordinary_call(
    agent: &Agent,
    f: Object,
    new_target: Option<Object>,
) -> JsResult<ExecutionContext> {
    // 1. Let callerContext be the running execution context.
    // 6. Let calleeRealm be F.[[Realm]].
    let Some((callee_realm, script_or_module, private_environment, strict)) =
        with_function_data(agent, f, |data| {
            (
                data.realm,
                data.script_or_module,
                data.private_environment,
                data.strict,
            )
        })
    else {
        return Err(agent.internal_error("not an ECMAScript function object"));
    };
    // 10. Let localEnv be NewFunctionEnvironment(F, newTarget).
    let local_env = EnvironmentIndex::Function(new_function_environment(agent, f, new_target));
    // 2. Let calleeContext be a new ECMAScript code execution context.
    let callee_context = ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            // 11. Set the LexicalEnvironment of calleeContext to localEnv.
            lexical_environment: local_env,
            // 12. Set the VariableEnvironment of calleeContext to localEnv.
            variable_environment: local_env,
            // 13. Set the PrivateEnvironment of calleeContext to F.[[PrivateEnvironment]].
            private_environment,
            is_strict_mode: strict,
        }),
        // 3. Set the Function of calleeContext to F.
        function: Some(f),
        // 7. Set the Realm of calleeContext to calleeRealm.
        realm: callee_realm,
        // 8. Set the ScriptOrModule of calleeContext to F.[[ScriptOrModule]].
        script_or_module,
        coroutine: None,
    };
    // 14. If callerContext is not already suspended, suspend callerContext.
    // 15. Push calleeContext onto the execution context stack;
    // calleeContext is now the running execution context.
    agent.push_execution_context(callee_context);
    // 16. NOTE: Any exception objects produced after this point are
    // associated with calleeRealm.
    // 17. Return calleeContext.
    Ok(callee_context)
}

/// ### [10.2.1.2 OrdinaryCallBindThis ( F, calleeContext, thisArgument )](https://tc39.es/ecma262/#sec-ordinarycallbindthis)
fn ordinary_call_bind_this(
    agent: &Agent,
    f: Object,
    callee_context: ExecutionContext,
    this_argument: Value,
) -> JsResult<()> {
    // 1. Let thisMode be F.[[ThisMode]].
    // 3. Let calleeRealm be F.[[Realm]].
    let Some((this_mode, callee_realm)) =
        with_function_data(agent, f, |data| (data.this_mode, data.realm))
    else {
        return Err(agent.internal_error("not an ECMAScript function object"));
    };
    // 2. If thisMode is LEXICAL, return UNUSED.
    if this_mode == ThisMode::Lexical {
        return Ok(());
    }
    // 4. Let localEnv be the LexicalEnvironment of calleeContext.
    // 7. Assert: localEnv is a Function Environment Record.
    let Some(EnvironmentIndex::Function(local_env)) = callee_context
        .ecmascript_code
        .map(|code| code.lexical_environment)
    else {
        return Err(agent.internal_error("callee context has no function environment"));
    };
    // 5. If thisMode is STRICT, then
    let this_value = if this_mode == ThisMode::Strict {
        // a. Let thisValue be thisArgument.
        this_argument
    } else if this_argument.is_nullish() {
        // 6. Else,
        // a. If thisArgument is either undefined or null, then
        // i. Let globalEnv be calleeRealm.[[GlobalEnv]].
        // ii. Assert: globalEnv is a Global Environment Record.
        // iii. Let thisValue be globalEnv.[[GlobalThisValue]].
        Value::Object(callee_realm.global_env(agent).get_this_binding(agent))
    } else {
        // b. Else,
        // i. Let thisValue be ! ToObject(thisArgument).
        // ii. NOTE: ToObject produces wrapper objects using calleeRealm.
        Value::Object(to_object(agent, this_argument)?)
    };
    // 8. Assert: The next step never returns an abrupt completion because
    // localEnv.[[ThisBindingStatus]] is not INITIALIZED.
    debug_assert_ne!(
        local_env.this_binding_status(agent),
        ThisBindingStatus::Initialized
    );
    // 9. Perform ! localEnv.BindThisValue(thisValue).
    local_env.bind_this_value(agent, this_value)?;
    // 10. Return UNUSED.
    Ok(())
}

/// ### [10.2.1.4 OrdinaryCallEvaluateBody ( F, argumentsList )](https://tc39.es/ecma262/#sec-ordinarycallevaluatebody)
///
/// Returns the return value of the body, or undefined if it completed
/// normally.
fn ordinary_call_evaluate_body(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Return ? EvaluateBody of F.[[ECMAScriptCode]] with arguments F and
    // argumentsList.
    let Some(code) = function_code(agent, f) else {
        return default_constructor_body(agent, f, arguments_list);
    };
    match (code.is_async, code.is_generator) {
        // FunctionBody, ConciseBody, ClassStaticBlockBody and Initializer
        (false, false) => run_sync(agent, async {
            // 1. Perform ? FunctionDeclarationInstantiation(functionObject, argumentsList).
            function_declaration_instantiation(agent, f, &code, &arguments_list).await?;
            // 2. Return ? Evaluation of FunctionStatementList.
            evaluate_function_body(agent, f, &code).await
        }),
        // GeneratorBody
        (false, true) => evaluate_generator_body(agent, f, code, arguments_list),
        // AsyncFunctionBody and AsyncConciseBody
        (true, false) => evaluate_async_function_body(agent, f, code, arguments_list),
        // AsyncGeneratorBody
        (true, true) => evaluate_async_generator_body(agent, f, code, arguments_list),
    }
}

/// ### [15.5.2 Runtime Semantics: EvaluateGeneratorBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluategeneratorbody)
fn evaluate_generator_body(
    agent: &Agent,
    f: Object,
    code: Rc<FunctionNode>,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject, argumentsList).
    run_sync(
        agent,
        function_declaration_instantiation(agent, f, &code, &arguments_list),
    )?;
    // 2. Let G be ? OrdinaryCreateFromConstructor(functionObject,
    // "%GeneratorFunction.prototype.prototype%", « [[GeneratorState]],
    // [[GeneratorContext]], [[GeneratorBrand]] »).
    let g = ordinary_create_from_constructor(
        agent,
        f,
        ProtoIntrinsics::Generator,
        ObjectKind::Generator(GeneratorData::default()),
    )?;
    // 3. Set G.[[GeneratorBrand]] to EMPTY.
    // 4. Perform GeneratorStart(G, FunctionBody).
    generator_start(agent, g, f, code);
    // 5. Return ReturnCompletion(G).
    Ok(Value::Object(g))
}

/// ### [15.6.2 Runtime Semantics: EvaluateAsyncGeneratorBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluateasyncgeneratorbody)
fn evaluate_async_generator_body(
    agent: &Agent,
    f: Object,
    code: Rc<FunctionNode>,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject, argumentsList).
    run_sync(
        agent,
        function_declaration_instantiation(agent, f, &code, &arguments_list),
    )?;
    // 2. Let generator be ? OrdinaryCreateFromConstructor(functionObject,
    // "%AsyncGeneratorFunction.prototype.prototype%", « [[AsyncGeneratorState]],
    // [[AsyncGeneratorContext]], [[AsyncGeneratorQueue]], [[GeneratorBrand]] »).
    let generator = ordinary_create_from_constructor(
        agent,
        f,
        ProtoIntrinsics::AsyncGenerator,
        ObjectKind::AsyncGenerator(Box::default()),
    )?;
    // 3. Set generator.[[GeneratorBrand]] to EMPTY.
    // 4. Perform AsyncGeneratorStart(generator, FunctionBody).
    async_generator_start(agent, generator, f, code);
    // 5. Return ReturnCompletion(generator).
    Ok(Value::Object(generator))
}

/// ### [15.8.4 Runtime Semantics: EvaluateAsyncFunctionBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluateasyncfunctionbody)
///
/// Also covers EvaluateAsyncConciseBody of async arrow functions.
fn evaluate_async_function_body(
    agent: &Agent,
    f: Object,
    code: Rc<FunctionNode>,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // 1. Let promiseCapability be ! NewPromiseCapability(%Promise%).
    let promise = promise_create(agent);
    // 2. Let declResult be Completion(FunctionDeclarationInstantiation(functionObject, argumentsList)).
    let decl_result = run_sync(
        agent,
        function_declaration_instantiation(agent, f, &code, &arguments_list),
    );
    match decl_result {
        // 3. If declResult is an abrupt completion, then
        // a. Perform ! Call(promiseCapability.[[Reject]], undefined, « declResult.[[Value]] »).
        Err(JsError::Throw(error)) => reject_promise(agent, promise, error),
        Err(error) => return Err(error),
        // 4. Else,
        // a. Perform AsyncFunctionStart(promiseCapability, FunctionBody).
        Ok(()) => async_function_start(agent, promise, f, code)?,
    }
    // 5. Return ReturnCompletion(promiseCapability.[[Promise]]).
    Ok(Value::Object(promise))
}

/// The behaviour of a default class constructor, from step 14.a of
/// [15.7.14 ClassDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-classdefinitionevaluation).
///
/// Called only through \[\[Construct\]\]: a base constructor already
/// created and initialized `this`.
fn default_constructor_body(
    agent: &Agent,
    f: Object,
    arguments_list: ArgumentsList,
) -> JsResult<Value> {
    // d. If F.[[ConstructorKind]] is DERIVED, then
    if !is_derived_constructor(agent, f) {
        return Ok(Value::Undefined);
    }
    let this_env = agent
        .running_execution_context()
        .ecmascript_code
        .map(|code| code.lexical_environment);
    let Some(EnvironmentIndex::Function(this_env)) = this_env else {
        return Err(agent.internal_error("default constructor without a function environment"));
    };
    // ii. Let func be ! F.[[GetPrototypeOf]]().
    let func = f.internal_get_prototype_of(agent)?;
    // iii. If IsConstructor(func) is false, throw a TypeError exception.
    let Some(func) = func.filter(|func| is_constructor(agent, Value::Object(*func))) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Super constructor is not a constructor",
        ));
    };
    // b. If NewTarget is undefined, throw a TypeError exception.
    let new_target = this_env.new_target(agent);
    // iv. Let result be ? Construct(func, args, NewTarget).
    let result = construct(agent, func, &arguments_list, new_target)?;
    this_env.bind_this_value(agent, Value::Object(result))?;
    // f. Perform ? InitializeInstanceElements(result, F).
    initialize_instance_elements(agent, result, f)?;
    // g. Return result.
    Ok(Value::Object(result))
}

/// ### [10.2.3 OrdinaryFunctionCreate ( functionPrototype, sourceText, ParameterList, Body, thisMode, env, privateEnv )](https://tc39.es/ecma262/#sec-ordinaryfunctioncreate)
pub(crate) fn ordinary_function_create(
    agent: &Agent,
    function_prototype: Object,
    code: Rc<FunctionNode>,
    env: EnvironmentIndex,
    private_env: Option<PrivateEnvironment>,
) -> Object {
    // 5. If thisMode is LEXICAL-THIS, set F.[[ThisMode]] to LEXICAL.
    // 6. Else if Strict is true, set F.[[ThisMode]] to STRICT.
    // 7. Else, set F.[[ThisMode]] to GLOBAL.
    let strict = code.strict;
    let this_mode = if code.kind == FunctionKind::Arrow {
        ThisMode::Lexical
    } else if strict {
        ThisMode::Strict
    } else {
        ThisMode::Global
    };
    // 16. Let len be the ExpectedArgumentCount of ParameterList.
    let len = code.params.expected_argument_count();
    // 1. Let internalSlotsList be the internal slots listed in Table 30.
    // 2. Let F be OrdinaryObjectCreate(functionPrototype, internalSlotsList).
    let data = ECMAScriptFunctionData {
        // 9. Set F.[[Environment]] to env.
        environment: env,
        // 10. Set F.[[PrivateEnvironment]] to privateEnv.
        private_environment: private_env,
        // 3. Set F.[[Call]] to the definition specified in 10.2.1.
        // 4. Set F.[[SourceText]] to sourceText.
        // 5. Set F.[[FormalParameters]] to ParameterList.
        // 6. Set F.[[ECMAScriptCode]] to Body.
        code: Some(code),
        constructor_kind: None,
        // 13. Set F.[[Realm]] to the current Realm Record.
        realm: agent.current_realm(),
        // 11. Set F.[[ScriptOrModule]] to GetActiveScriptOrModule().
        script_or_module: get_active_script_or_module(agent),
        this_mode,
        // 7. Let Strict be IsStrict(Body).
        // 8. Set F.[[Strict]] to Strict.
        strict,
        // 14. Set F.[[HomeObject]] to undefined.
        home_object: None,
        class_node: None,
        // 15. Set F.[[Fields]] to a new empty List.
        fields: Vec::new(),
        // 16. Set F.[[PrivateMethods]] to a new empty List.
        private_methods: Vec::new(),
        // 17. Set F.[[ClassFieldInitializerName]] to EMPTY.
        class_field_initializer_name: None,
        // 12. Set F.[[IsClassConstructor]] to false.
        is_class_constructor: false,
    };
    let f = Object::create(
        agent,
        Some(function_prototype),
        ObjectKind::ECMAScriptFunction(Box::new(data)),
    );
    // 17. Perform SetFunctionLength(F, len).
    set_function_length(agent, f, len);
    // 18. Return F.
    f
}

/// Create the default constructor of a class: an ECMAScript function object
/// without \[\[ECMAScriptCode\]\] that behaves like `constructor(...args) {
/// super(...args); }` when derived and `constructor() {}` otherwise.
pub(crate) fn default_class_constructor_create(
    agent: &Agent,
    function_prototype: Object,
    env: EnvironmentIndex,
    private_env: Option<PrivateEnvironment>,
) -> Object {
    let data = ECMAScriptFunctionData {
        environment: env,
        private_environment: private_env,
        code: None,
        constructor_kind: None,
        realm: agent.current_realm(),
        script_or_module: get_active_script_or_module(agent),
        this_mode: ThisMode::Strict,
        strict: true,
        home_object: None,
        class_node: None,
        fields: Vec::new(),
        private_methods: Vec::new(),
        class_field_initializer_name: None,
        is_class_constructor: false,
    };
    let f = Object::create(
        agent,
        Some(function_prototype),
        ObjectKind::ECMAScriptFunction(Box::new(data)),
    );
    set_function_length(agent, f, 0);
    f
}

/// ### [10.2.5 MakeConstructor ( F \[ , writablePrototype \[ , prototype \] \] )](https://tc39.es/ecma262/#sec-makeconstructor)
pub(crate) fn make_constructor(
    agent: &Agent,
    f: Object,
    writable_prototype: bool,
    prototype: Option<Object>,
) {
    // 1. If F is an ECMAScript function object, then
    // a. Assert: IsConstructor(F) is false.
    // b. Assert: F is an extensible object that does not have a "prototype"
    // own property.
    // c. Set F.[[Construct]] to the definition specified in 10.2.2.
    // 3. Set F.[[ConstructorKind]] to BASE.
    with_function_data_mut(agent, f, |data| {
        data.constructor_kind = Some(ConstructorKind::Base);
    });
    // 4. If writablePrototype is not present, set writablePrototype to true.
    // 5. If prototype is not present, then
    let prototype = prototype.unwrap_or_else(|| {
        // a. Set prototype to OrdinaryObjectCreate(%Object.prototype%).
        let object_prototype = agent.intrinsics().object_prototype();
        let mut data = ObjectHeapData::new(Some(object_prototype), ObjectKind::Ordinary);
        // b. Perform ! DefinePropertyOrThrow(prototype, "constructor",
        // PropertyDescriptor { [[Value]]: F, [[Writable]]:
        // writablePrototype, [[Enumerable]]: false, [[Configurable]]: true }).
        data.properties.insert(
            PropertyKey::from_str(agent, "constructor"),
            Property::data(Value::Object(f), writable_prototype, false, true),
        );
        agent.heap_mut().create_object(data)
    });
    // 6. Perform ! DefinePropertyOrThrow(F, "prototype", PropertyDescriptor
    // { [[Value]]: prototype, [[Writable]]: writablePrototype,
    // [[Enumerable]]: false, [[Configurable]]: false }).
    let key = PropertyKey::from_str(agent, "prototype");
    f.insert_property(
        agent,
        key,
        Property::data(Value::Object(prototype), writable_prototype, false, false),
    );
    // 7. Return UNUSED.
}

/// ### [10.2.6 MakeClassConstructor ( F )](https://tc39.es/ecma262/#sec-makeclassconstructor)
pub(crate) fn make_class_constructor(
    agent: &Agent,
    f: Object,
    class_node: Rc<ClassNode>,
    kind: ConstructorKind,
) {
    with_function_data_mut(agent, f, |data| {
        // 2. Set F.[[IsClassConstructor]] to true.
        data.is_class_constructor = true;
        data.constructor_kind = Some(kind);
        data.class_node = Some(class_node);
    });
}

/// ### [10.2.7 MakeMethod ( F, homeObject )](https://tc39.es/ecma262/#sec-makemethod)
pub(crate) fn make_method(agent: &Agent, f: Object, home_object: Object) {
    // 1. Set F.[[HomeObject]] to homeObject.
    with_function_data_mut(agent, f, |data| data.home_object = Some(home_object));
    // 2. Return UNUSED.
}

pub(crate) fn set_class_field_initializer_name(agent: &Agent, f: Object, name: ClassElementKey) {
    with_function_data_mut(agent, f, |data| {
        data.class_field_initializer_name = Some(name);
    });
}

/// Store the \[\[Fields\]\] and \[\[PrivateMethods\]\] of a class
/// constructor.
pub(crate) fn set_class_elements(
    agent: &Agent,
    f: Object,
    fields: Vec<ClassFieldDefinition>,
    private_methods: Vec<PrivateElement>,
) {
    with_function_data_mut(agent, f, |data| {
        data.fields = fields;
        data.private_methods = private_methods;
    });
}

/// ### [10.2.9 SetFunctionName ( F, name \[ , prefix \] )](https://tc39.es/ecma262/#sec-setfunctionname)
pub(crate) fn set_function_name(
    agent: &Agent,
    f: Object,
    name: ClassElementKey,
    prefix: Option<&str>,
) {
    // 1. Assert: F is an extensible object that does not have a "name" own
    // property.
    let name = match name {
        // 2. If name is a Symbol, then
        ClassElementKey::Property(PropertyKey::Symbol(symbol)) => {
            // a. Let description be name.[[Description]].
            match symbol.description(agent) {
                // b. If description is undefined, set name to the empty String.
                None => String::new(),
                // c. Else, set name to the string-concatenation of "[",
                // description, and "]".
                Some(description) => format!("[{}]", description.as_rc(agent)),
            }
        }
        // 3. Else if name is a Private Name, then
        // a. Set name to name.[[Description]].
        ClassElementKey::Private(name) => name.description(agent).to_rust_string(agent),
        ClassElementKey::Property(key) => key.to_display(agent),
    };
    // 4. If F has an [[InitialName]] internal slot, then
    // a. Set F.[[InitialName]] to name.
    // 5. If prefix is present, then
    let name = match prefix {
        // a. Set name to the string-concatenation of prefix, the code unit
        // 0x0020 (SPACE), and name.
        Some(prefix) => format!("{prefix} {name}"),
        None => name,
    };
    let name = HeapString::from_str(agent, &name);
    // 6. Perform ! DefinePropertyOrThrow(F, "name", PropertyDescriptor {
    // [[Value]]: name, [[Writable]]: false, [[Enumerable]]: false,
    // [[Configurable]]: true }).
    let key = PropertyKey::from_str(agent, "name");
    f.insert_property(
        agent,
        key,
        Property::data(Value::String(name), false, false, true),
    );
    // 7. Return UNUSED.
}

/// ### [10.2.10 SetFunctionLength ( F, length )](https://tc39.es/ecma262/#sec-setfunctionlength)
pub(crate) fn set_function_length(agent: &Agent, f: Object, length: usize) {
    // 1. Assert: F is an extensible object that does not have a "length"
    // own property.
    // 2. Perform ! DefinePropertyOrThrow(F, "length", PropertyDescriptor {
    // [[Value]]: 𝔽(length), [[Writable]]: false, [[Enumerable]]: false,
    // [[Configurable]]: true }).
    let key = PropertyKey::from_str(agent, "length");
    f.insert_property(
        agent,
        key,
        Property::data(Value::from(length), false, false, true),
    );
    // 3. Return UNUSED.
}

/// ### [7.3.33 DefineField ( receiver, fieldRecord )](https://tc39.es/ecma262/#sec-definefield)
pub(crate) fn define_field(
    agent: &Agent,
    receiver: Object,
    field_record: ClassFieldDefinition,
) -> JsResult<()> {
    // 1. Let fieldName be fieldRecord.[[Name]].
    // 2. Let initializer be fieldRecord.[[Initializer]].
    // 3. If initializer is not EMPTY, then
    let init_value = match field_record.initializer {
        // a. Let initValue be ? Call(initializer, receiver).
        Some(initializer) => call_function(agent, initializer, Value::Object(receiver), &[])?,
        // 4. Else, let initValue be undefined.
        None => Value::Undefined,
    };
    match field_record.name {
        // 5. If fieldName is a Private Name, then
        // a. Perform ? PrivateFieldAdd(receiver, fieldName, initValue).
        ClassElementKey::Private(name) => private_field_add(agent, receiver, name, init_value),
        // 6. Else,
        // a. Assert: fieldName is a property key.
        // b. Perform ? CreateDataPropertyOrThrow(receiver, fieldName, initValue).
        ClassElementKey::Property(key) => {
            create_data_property_or_throw(agent, receiver, key, init_value)
        }
    }
    // 7. Return UNUSED.
}

/// ### [7.3.34 InitializeInstanceElements ( O, constructor )](https://tc39.es/ecma262/#sec-initializeinstanceelements)
pub(crate) fn initialize_instance_elements(
    agent: &Agent,
    o: Object,
    constructor: Object,
) -> JsResult<()> {
    // 1. Let methods be the value of constructor.[[PrivateMethods]].
    // 3. Let fields be the value of constructor.[[Fields]].
    let Some((methods, fields)) = with_function_data(agent, constructor, |data| {
        (data.private_methods.clone(), data.fields.clone())
    }) else {
        return Ok(());
    };
    // 2. For each PrivateElement method of methods, do
    for method in methods {
        // a. Perform ? PrivateMethodOrAccessorAdd(O, method).
        private_method_or_accessor_add(agent, o, method)?;
    }
    // 4. For each element fieldRecord of fields, do
    for field_record in fields {
        // a. Perform ? DefineField(O, fieldRecord).
        define_field(agent, o, field_record)?;
    }
    // 5. Return UNUSED.
    Ok(())
}

/// Define a method property the way object literals and class bodies do:
/// writable and configurable, enumerable as requested.
pub(crate) fn define_method_property(
    agent: &Agent,
    home_object: Object,
    key: PropertyKey,
    closure: Object,
    enumerable: bool,
) -> JsResult<()> {
    // 1. Let desc be the PropertyDescriptor { [[Value]]: closure,
    // [[Writable]]: true, [[Enumerable]]: enumerable, [[Configurable]]: true }.
    let desc = PropertyDescriptor {
        value: Some(Value::Object(closure)),
        writable: Some(true),
        enumerable: Some(enumerable),
        configurable: Some(true),
        ..Default::default()
    };
    // 2. Perform ? DefinePropertyOrThrow(homeObject, key, desc).
    define_property_or_throw(agent, home_object, key, desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::get,
        execution::{DefaultHostHooks, agent::Options},
    };

    fn agent() -> Agent {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        agent
    }

    fn function_node(source: &str) -> Rc<FunctionNode> {
        specter_ast::parse_dynamic_function(source).unwrap()
    }

    fn instantiate(agent: &Agent, source: &str) -> Object {
        let realm = agent.current_realm();
        let env = EnvironmentIndex::Global(realm.global_env(agent));
        let prototype = agent.intrinsics().function_prototype();
        ordinary_function_create(agent, prototype, function_node(source), env, None)
    }

    #[test]
    fn length_counts_parameters_before_the_first_default() {
        let agent = agent();
        let f = instantiate(&agent, "function f(a, b = 1, c) {}");
        let key = PropertyKey::from_str(&agent, "length");
        assert_eq!(get(&agent, f, key), Ok(Value::Number(1.0)));
    }

    #[test]
    fn symbol_names_are_bracketed() {
        let agent = agent();
        let f = instantiate(&agent, "function () {}");
        let description = HeapString::from_str(&agent, "tag");
        let symbol = crate::ecmascript::types::Symbol::new(&agent, Some(description));
        set_function_name(
            &agent,
            f,
            ClassElementKey::Property(PropertyKey::Symbol(symbol)),
            Some("get"),
        );
        let key = PropertyKey::from_str(&agent, "name");
        assert_eq!(get(&agent, f, key), Ok(Value::from_str(&agent, "get [tag]")));
    }

    #[test]
    fn calls_return_the_body_result() {
        let agent = agent();
        let f = instantiate(&agent, "function (a, b) { return a * b; }");
        let result = call_function(&agent, f, Value::Undefined, &[
            Value::Number(6.0),
            Value::Number(7.0),
        ]);
        assert_eq!(result, Ok(Value::Number(42.0)));
        assert_eq!(agent.execution_context_depth(), 0);
    }

    #[test]
    fn make_constructor_links_the_prototype_back() {
        let agent = agent();
        let f = instantiate(&agent, "function () {}");
        make_constructor(&agent, f, true, None);
        assert!(is_constructor(&agent, Value::Object(f)));
        let prototype = get(&agent, f, PropertyKey::from_str(&agent, "prototype")).unwrap();
        let Value::Object(prototype) = prototype else {
            panic!("prototype is not an object");
        };
        let constructor = get(&agent, prototype, PropertyKey::from_str(&agent, "constructor"));
        assert_eq!(constructor, Ok(Value::Object(f)));
    }
}
