// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [15 ECMAScript Language: Functions and Classes](https://tc39.es/ecma262/#sec-ecmascript-language-functions-and-classes)
//!
//! FunctionDeclarationInstantiation, the instantiation of function and
//! method definitions, and the evaluation of `yield` and `yield*`.

use std::rc::Rc;

use specter_ast::ast::{Atom, FunctionBody, FunctionKind, FunctionNode, MethodKind, YieldExpression};

use super::{
    assignment::{binding_element_initialization, binding_initialization},
    evaluate_expression, evaluate_statement_list,
    for_in_of_statement::async_iterator_close,
    lexical_environment, name_string, named_evaluation, private_environment,
};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_iterator_objects::{
                IteratorKind, IteratorRecord, create_iter_result_object, get_iterator,
                iterator_close, iterator_complete, iterator_value,
            },
            operations_on_objects::{
                call, create_array_from_list, define_property_or_throw, get_method,
            },
        },
        builtins::{
            arguments::{create_mapped_arguments_object, create_unmapped_arguments_object},
            ecmascript_function::{
                ClassElementKey, class_field_initializer_name, define_method_property,
                function_code, make_constructor, make_method, ordinary_function_create,
                set_function_name,
            },
            ordinary::ordinary_object_create,
        },
        execution::{
            Agent, EnvironmentIndex, JsError, JsResult, PrivateEnvironment,
            agent::ExceptionType, new_declarative_environment,
        },
        types::{
            AbruptCompletion, Completion, HeapString, Object, PrivateElement, PrivateElementKind,
            PropertyDescriptor, PropertyKey, Value,
        },
    },
    engine::coroutine::{Resumption, Suspension, await_value, suspend},
};

/// Collapse the completion of code that cannot yield into a [`JsResult`].
fn into_js_result<T>(agent: &Agent, completion: Completion<T>) -> JsResult<T> {
    completion.map_err(|completion| match completion {
        AbruptCompletion::Throw(error) => error,
        _ => agent.internal_error("unexpected completion in function prologue"),
    })
}

/// ### [10.2.11 FunctionDeclarationInstantiation ( func, argumentsList )](https://tc39.es/ecma262/#sec-functiondeclarationinstantiation)
pub(crate) async fn function_declaration_instantiation(
    agent: &Agent,
    func: Object,
    code: &FunctionNode,
    arguments_list: &[Value],
) -> JsResult<()> {
    // 1. Let calleeContext be the running execution context.
    // 2. Let code be func.[[ECMAScriptCode]].
    // 3. Let strict be func.[[Strict]].
    let strict = code.strict;
    let scope = &code.scope;
    // 5. Let parameterNames be the BoundNames of formals.
    // 6. If parameterNames has any duplicate entries, let hasDuplicates be
    // true. Otherwise, let hasDuplicates be false.
    let has_duplicates = scope.has_duplicate_parameters;
    // 7. Let simpleParameterList be IsSimpleParameterList of formals.
    let simple_parameter_list = scope.is_simple_parameter_list;
    // 8. Let hasParameterExpressions be ContainsExpression of formals.
    let has_parameter_expressions = scope.has_parameter_expressions;
    // 9. Let varNames be the VarDeclaredNames of code.
    let var_names = &scope.body.var_names;
    // 11. Let lexicalNames be the LexicallyDeclaredNames of code.
    let lexical_declarations = &scope.body.lexical_declarations;
    // 12. Let functionNames be a new empty List.
    // 13. Let functionsToInitialize be a new empty List.
    // 14. For each element d of varDeclarations, in reverse List order, do
    let functions_to_initialize = &scope.body.functions_to_initialize;
    let function_names: Vec<&str> = functions_to_initialize
        .iter()
        .filter_map(|f| f.name.as_ref().map(|name| &*name.name))
        .collect();
    let parameter_names = &scope.parameter_names;
    let names_arguments = |name: &str| name == "arguments";
    // 15. Let argumentsObjectNeeded be true.
    // 16. If func.[[ThisMode]] is LEXICAL, then
    //     a. NOTE: Arrow functions never have an arguments object.
    //     b. Set argumentsObjectNeeded to false.
    // 17. Else if parameterNames contains "arguments", then
    //     a. Set argumentsObjectNeeded to false.
    // 18. Else if hasParameterExpressions is false, then
    //     a. If functionNames contains "arguments" or lexicalNames contains
    //     "arguments", then
    //         i. Set argumentsObjectNeeded to false.
    let arguments_object_needed = !matches!(
        code.kind,
        FunctionKind::Arrow | FunctionKind::ClassFieldInitializer | FunctionKind::ClassStaticBlock
    ) && !parameter_names.iter().any(|name| names_arguments(name))
        && (has_parameter_expressions
            || !(function_names.iter().any(|name| names_arguments(name))
                || lexical_declarations
                    .iter()
                    .any(|declaration| names_arguments(declaration.name()))));

    // 19. If strict is true or hasParameterExpressions is false, then
    //     a. NOTE: Only a single Environment Record is needed for the
    //     parameters, since calls to eval in strict mode code cannot create
    //     new bindings which are visible outside of the eval.
    //     b. Let env be the LexicalEnvironment of calleeContext.
    // 20. Else,
    //     a. NOTE: A separate Environment Record is needed to ensure that
    //     bindings created by direct eval calls in the formal parameter list
    //     are outside the environment where parameters are declared.
    //     b. Let calleeEnv be the LexicalEnvironment of calleeContext.
    //     c. Let env be NewDeclarativeEnvironment(calleeEnv).
    //     d. Assert: The VariableEnvironment of calleeContext is calleeEnv.
    //     e. Set the LexicalEnvironment of calleeContext to env.
    let callee_env = lexical_environment(agent)?;
    let env = if strict || !has_parameter_expressions {
        callee_env
    } else {
        let env =
            EnvironmentIndex::Declarative(new_declarative_environment(agent, Some(callee_env)));
        agent.set_lexical_environment(env);
        env
    };

    // 21. For each String paramName of parameterNames, do
    let mut parameter_bindings: Vec<Atom> = Vec::with_capacity(parameter_names.len() + 1);
    for param_name in parameter_names {
        let name = name_string(agent, param_name);
        // a. Let alreadyDeclared be ! env.HasBinding(paramName).
        // b. NOTE: Early errors ensure that duplicate parameter names can only
        // occur in non-strict functions that do not have parameter default
        // values or rest parameters.
        // c. If alreadyDeclared is false, then
        if !env.has_binding(agent, name)? {
            // i. Perform ! env.CreateMutableBinding(paramName, false).
            env.create_mutable_binding(agent, name, false)?;
            // ii. If hasDuplicates is true, then
            if has_duplicates {
                // 1. Perform ! env.InitializeBinding(paramName, undefined).
                env.initialize_binding(agent, name, Value::Undefined)?;
            }
        }
        parameter_bindings.push(param_name.clone());
    }

    // 22. If argumentsObjectNeeded is true, then
    if arguments_object_needed {
        // a. If strict is true or simpleParameterList is false, then
        let ao = if strict || !simple_parameter_list {
            // i. Let ao be CreateUnmappedArgumentsObject(argumentsList).
            create_unmapped_arguments_object(agent, arguments_list)
        } else {
            // b. Else,
            // i. NOTE: A mapped argument object is only provided for
            // non-strict functions that don't have a rest parameter, any
            // parameter default value initializers, or any destructured
            // parameters.
            // ii. Let ao be CreateMappedArgumentsObject(func, formals,
            // argumentsList, env).
            let names: Vec<HeapString> = parameter_names
                .iter()
                .map(|name| name_string(agent, name))
                .collect();
            create_mapped_arguments_object(agent, func, &names, arguments_list, env)
        };
        let arguments = name_string(agent, "arguments");
        // c. If strict is true, then
        if strict {
            // i. Perform ! env.CreateImmutableBinding("arguments", false).
            // ii. NOTE: In strict mode code early errors prevent attempting
            // to assign to this binding, so its mutability is not observable.
            env.create_immutable_binding(agent, arguments, false)?;
        } else {
            // d. Else,
            // i. Perform ! env.CreateMutableBinding("arguments", false).
            env.create_mutable_binding(agent, arguments, false)?;
        }
        // e. Perform ! env.InitializeBinding("arguments", ao).
        env.initialize_binding(agent, arguments, Value::Object(ao))?;
        // f. Let parameterBindings be the list-concatenation of
        // parameterNames and « "arguments" ».
        parameter_bindings.push(Atom::from("arguments"));
    }
    // 23. Else,
    //     a. Let parameterBindings be parameterNames.

    // 24. Let iteratorRecord be CreateListIteratorRecord(argumentsList).
    // 25. If hasDuplicates is true, then
    //     a. Let usedEnv be undefined.
    // 26. Else,
    //     a. Let usedEnv be env.
    let used_env = if has_duplicates { None } else { Some(env) };
    // 27. NOTE: The following step cannot return a ReturnCompletion because
    // the only way such a completion can arise in expression position is by
    // use of YieldExpression, which is forbidden in parameter lists.
    // 28. Perform ? IteratorBindingInitialization of formals with arguments
    // iteratorRecord and usedEnv.
    for (index, item) in code.params.items.iter().enumerate() {
        let value = arguments_list.get(index).copied().unwrap_or(Value::Undefined);
        into_js_result(
            agent,
            binding_element_initialization(agent, item, value, used_env).await,
        )?;
    }
    if let Some(rest) = &code.params.rest {
        let rest_values = arguments_list
            .get(code.params.items.len()..)
            .unwrap_or_default();
        let rest_array = create_array_from_list(agent, rest_values);
        into_js_result(
            agent,
            binding_initialization(agent, rest, Value::Object(rest_array), used_env).await,
        )?;
    }

    // 29. If hasParameterExpressions is false, then
    let var_env = if !has_parameter_expressions {
        // a. NOTE: Only a single Environment Record is needed for the
        // parameters and top-level vars.
        // b. Let instantiatedVarNames be a copy of the List parameterBindings.
        let mut instantiated_var_names = parameter_bindings.clone();
        // c. For each element n of varNames, do
        for n in var_names {
            // i. If instantiatedVarNames does not contain n, then
            if !instantiated_var_names.contains(n) {
                // 1. Append n to instantiatedVarNames.
                instantiated_var_names.push(n.clone());
                let name = name_string(agent, n);
                // 2. Perform ! env.CreateMutableBinding(n, false).
                env.create_mutable_binding(agent, name, false)?;
                // 3. Perform ! env.InitializeBinding(n, undefined).
                env.initialize_binding(agent, name, Value::Undefined)?;
            }
        }
        // d. Let varEnv be env.
        env
    } else {
        // 30. Else,
        // a. NOTE: A separate Environment Record is needed to ensure that
        // closures created by expressions in the formal parameter list do not
        // have visibility of declarations in the function body.
        // b. Let varEnv be NewDeclarativeEnvironment(env).
        let var_env = EnvironmentIndex::Declarative(new_declarative_environment(agent, Some(env)));
        // c. Set the VariableEnvironment of calleeContext to varEnv.
        agent.set_variable_environment(var_env);
        // d. Let instantiatedVarNames be a new empty List.
        let mut instantiated_var_names: Vec<&Atom> = Vec::new();
        // e. For each element n of varNames, do
        for n in var_names {
            // i. If instantiatedVarNames does not contain n, then
            if !instantiated_var_names.contains(&n) {
                // 1. Append n to instantiatedVarNames.
                instantiated_var_names.push(n);
                let name = name_string(agent, n);
                // 2. Perform ! varEnv.CreateMutableBinding(n, false).
                var_env.create_mutable_binding(agent, name, false)?;
                // 3. If parameterBindings does not contain n, or if
                // functionNames contains n, then
                let initial_value =
                    if !parameter_bindings.contains(n) || function_names.contains(&&**n) {
                        // a. Let initialValue be undefined.
                        Value::Undefined
                    } else {
                        // 4. Else,
                        // a. Let initialValue be ! env.GetBindingValue(n, false).
                        env.get_binding_value(agent, name, false)?
                    };
                // 5. Perform ! varEnv.InitializeBinding(n, initialValue).
                var_env.initialize_binding(agent, name, initial_value)?;
                // 6. NOTE: A var with the same name as a formal parameter
                // initially has the same value as the corresponding
                // initialized parameter.
            }
        }
        var_env
    };
    // 31. NOTE: Annex B.3.2.1 adds additional steps at this point.

    // 32. If strict is false, then
    let lex_env = if !strict {
        // a. Let lexEnv be NewDeclarativeEnvironment(varEnv).
        // b. NOTE: Non-strict functions use a separate Environment Record for
        // top-level lexical declarations so that a direct eval can determine
        // whether any var scoped declarations introduced by the eval code
        // conflict with pre-existing top-level lexically scoped declarations.
        EnvironmentIndex::Declarative(new_declarative_environment(agent, Some(var_env)))
    } else {
        // 33. Else,
        // a. Let lexEnv be varEnv.
        var_env
    };
    // 34. Set the LexicalEnvironment of calleeContext to lexEnv.
    agent.set_lexical_environment(lex_env);

    // 35. Let lexDeclarations be the LexicallyScopedDeclarations of code.
    // 36. For each element d of lexDeclarations, do
    for d in lexical_declarations {
        // a. NOTE: A lexically declared name cannot be the same as a
        // function/generator declaration, formal parameter, or a var name.
        // Lexically declared names are only instantiated here but not
        // initialized.
        let name = name_string(agent, d.name());
        // b. For each element dn of the BoundNames of d, do
        if d.is_constant_declaration() {
            // i. If IsConstantDeclaration of d is true, then
            // 1. Perform ! lexEnv.CreateImmutableBinding(dn, true).
            lex_env.create_immutable_binding(agent, name, true)?;
        } else {
            // ii. Else,
            // 1. Perform ! lexEnv.CreateMutableBinding(dn, false).
            lex_env.create_mutable_binding(agent, name, false)?;
        }
    }

    // 37. Let privateEnv be the PrivateEnvironment of calleeContext.
    let private_env = private_environment(agent);
    // 38. For each Parse Node f of functionsToInitialize, do
    for f in functions_to_initialize {
        // a. Let fn be the sole element of the BoundNames of f.
        let Some(name) = &f.name else {
            continue;
        };
        let name = name_string(agent, &name.name);
        // b. Let fo be InstantiateFunctionObject of f with arguments lexEnv
        // and privateEnv.
        let fo = instantiate_function_object(agent, f, lex_env, private_env);
        // c. Perform ! varEnv.SetMutableBinding(fn, fo, false).
        var_env.set_mutable_binding(agent, name, Value::Object(fo), false)?;
    }
    // 39. Return UNUSED.
    Ok(())
}

/// ### [10.2.1.4 OrdinaryCallEvaluateBody ( F, argumentsList )](https://tc39.es/ecma262/#sec-ordinarycallevaluatebody)
///
/// Evaluation of FunctionStatementList, ConciseBody and the Initializer of
/// a class field once the declarations are instantiated.
pub(crate) async fn evaluate_function_body(
    agent: &Agent,
    f: Object,
    code: &FunctionNode,
) -> JsResult<Value> {
    match &code.body {
        FunctionBody::Statements(statements) => {
            match evaluate_statement_list(agent, statements).await {
                // A body that completes normally returns undefined.
                Ok(_) => Ok(Value::Undefined),
                Err(completion) => completion.into_function_result(agent),
            }
        }
        FunctionBody::Expression(expression) => {
            let result = match class_field_initializer_name(agent, f) {
                // ### [15.7.10 Runtime Semantics: EvaluateBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluatebody)
                // Initializer : = AssignmentExpression
                // 3. If IsAnonymousFunctionDefinition(AssignmentExpression) is
                // true, then
                //     a. Let value be ? NamedEvaluation of Initializer with
                //     argument functionObject.[[ClassFieldInitializerName]].
                Some(name)
                    if code.kind == FunctionKind::ClassFieldInitializer
                        && expression.is_anonymous_function_definition() =>
                {
                    named_evaluation(agent, expression, name).await
                }
                // 4. Else,
                //     a. Let rhs be ? Evaluation of AssignmentExpression.
                //     b. Let value be ? GetValue(rhs).
                _ => evaluate_expression(agent, expression).await,
            };
            match result {
                Ok(value) => Ok(value),
                Err(completion) => completion.into_function_result(agent),
            }
        }
    }
}

/// The \[\[Prototype\]\] of a function object created from `node`.
fn function_prototype_for(agent: &Agent, node: &FunctionNode) -> Object {
    let intrinsics = agent.intrinsics();
    match (node.is_async, node.is_generator) {
        (false, false) => intrinsics.function_prototype(),
        (false, true) => intrinsics.generator_function_prototype(),
        (true, false) => intrinsics.async_function_prototype(),
        (true, true) => intrinsics.async_generator_function_prototype(),
    }
}

/// Give a freshly created function object the `prototype` property its
/// kind calls for.
fn make_function_prototype(agent: &Agent, f: Object, node: &FunctionNode) -> JsResult<()> {
    let intrinsics = agent.intrinsics();
    let instance_prototype = match (node.is_async, node.is_generator) {
        (false, false) => {
            if node.kind == FunctionKind::Normal {
                // Perform MakeConstructor(F).
                make_constructor(agent, f, true, None);
            }
            return Ok(());
        }
        (true, false) => return Ok(()),
        // Let prototype be OrdinaryObjectCreate(%GeneratorFunction.prototype.prototype%).
        (false, true) => intrinsics.generator_prototype(),
        // Let prototype be OrdinaryObjectCreate(%AsyncGeneratorFunction.prototype.prototype%).
        (true, true) => intrinsics.async_generator_prototype(),
    };
    let prototype = ordinary_object_create(agent, Some(instance_prototype));
    // Perform ! DefinePropertyOrThrow(F, "prototype", PropertyDescriptor {
    // [[Value]]: prototype, [[Writable]]: true, [[Enumerable]]: false,
    // [[Configurable]]: false }).
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
    )
}

/// ### [15.2.4 Runtime Semantics: InstantiateOrdinaryFunctionObject](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionobject)
///
/// Also InstantiateGeneratorFunctionObject,
/// InstantiateAsyncGeneratorFunctionObject and
/// InstantiateAsyncFunctionObject of function declarations.
pub(crate) fn instantiate_function_object(
    agent: &Agent,
    node: &Rc<FunctionNode>,
    env: EnvironmentIndex,
    private_env: Option<PrivateEnvironment>,
) -> Object {
    // 1. Let name be the StringValue of BindingIdentifier, or "default".
    let name = node.name.as_ref().map_or("default", |name| &name.name);
    let name = PropertyKey::from_str(agent, name);
    // 2. Let sourceText be the source text matched by FunctionDeclaration.
    // 3. Let F be OrdinaryFunctionCreate(%Function.prototype%, sourceText,
    // FormalParameters, FunctionBody, NON-LEXICAL-THIS, env, privateEnv).
    let f = ordinary_function_create(
        agent,
        function_prototype_for(agent, node),
        node.clone(),
        env,
        private_env,
    );
    // 4. Perform SetFunctionName(F, name).
    set_function_name(agent, f, ClassElementKey::Property(name), None);
    // 5. Perform MakeConstructor(F).
    // Defining "prototype" on a fresh extensible function cannot fail.
    let _ = make_function_prototype(agent, f, node);
    // 6. Return F.
    f
}

/// ### [15.2.5 Runtime Semantics: InstantiateOrdinaryFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionexpression)
///
/// Together with InstantiateArrowFunctionExpression and the generator and
/// async variants. `name` is the name given by NamedEvaluation.
pub(super) fn instantiate_function_expression(
    agent: &Agent,
    node: &Rc<FunctionNode>,
    name: Option<ClassElementKey>,
) -> JsResult<Object> {
    // 2. Let env be the LexicalEnvironment of the running execution context.
    let env = lexical_environment(agent)?;
    // 3. Let privateEnv be the running execution context's PrivateEnvironment.
    let private_env = private_environment(agent);
    let own_name = node
        .name
        .as_ref()
        .filter(|_| node.kind != FunctionKind::Arrow);
    let Some(own_name) = own_name else {
        // 1. If name is not present, set name to "".
        let name =
            name.unwrap_or_else(|| ClassElementKey::Property(PropertyKey::from_str(agent, "")));
        // 5. Let closure be OrdinaryFunctionCreate(%Function.prototype%,
        // sourceText, FormalParameters, FunctionBody, NON-LEXICAL-THIS, env,
        // privateEnv).
        let closure = ordinary_function_create(
            agent,
            function_prototype_for(agent, node),
            node.clone(),
            env,
            private_env,
        );
        // 6. Perform SetFunctionName(closure, name).
        set_function_name(agent, closure, name, None);
        // 7. Perform MakeConstructor(closure).
        make_function_prototype(agent, closure, node)?;
        // 8. Return closure.
        return Ok(closure);
    };
    // FunctionExpression : function BindingIdentifier ( FormalParameters ) { FunctionBody }
    // 1. Assert: name is not present.
    // 2. Set name to the StringValue of BindingIdentifier.
    let binding = name_string(agent, &own_name.name);
    // 5. Let funcEnv be NewDeclarativeEnvironment(outerEnv).
    let func_env = new_declarative_environment(agent, Some(env));
    // 6. Perform ! funcEnv.CreateImmutableBinding(name, false).
    func_env.create_immutable_binding(agent, binding, false);
    // 8. Let closure be OrdinaryFunctionCreate(%Function.prototype%,
    // sourceText, FormalParameters, FunctionBody, NON-LEXICAL-THIS, funcEnv,
    // privateEnv).
    let closure = ordinary_function_create(
        agent,
        function_prototype_for(agent, node),
        node.clone(),
        EnvironmentIndex::Declarative(func_env),
        private_env,
    );
    // 9. Perform SetFunctionName(closure, name).
    set_function_name(
        agent,
        closure,
        ClassElementKey::Property(PropertyKey::from_string(agent, binding)),
        None,
    );
    // 10. Perform MakeConstructor(closure).
    make_function_prototype(agent, closure, node)?;
    // 11. Perform ! funcEnv.InitializeBinding(name, closure).
    func_env.initialize_binding(agent, binding, Value::Object(closure));
    // 12. Return closure.
    Ok(closure)
}

/// ### [15.4.4 Runtime Semantics: DefineMethod](https://tc39.es/ecma262/#sec-runtime-semantics-definemethod)
///
/// Creates the closure of a method with `object` as its home object.
pub(super) fn define_method(
    agent: &Agent,
    object: Object,
    node: &Rc<FunctionNode>,
    function_prototype: Option<Object>,
) -> JsResult<Object> {
    // 2. Let env be the running execution context's LexicalEnvironment.
    let env = lexical_environment(agent)?;
    // 3. Let privateEnv be the running execution context's PrivateEnvironment.
    let private_env = private_environment(agent);
    // 4. If functionPrototype is present, then
    //     a. Let prototype be functionPrototype.
    // 5. Else,
    //     a. Let prototype be %Function.prototype%.
    let prototype = function_prototype.unwrap_or_else(|| function_prototype_for(agent, node));
    // 7. Let closure be OrdinaryFunctionCreate(prototype, sourceText,
    // UniqueFormalParameters, FunctionBody, NON-LEXICAL-THIS, env, privateEnv).
    let closure = ordinary_function_create(agent, prototype, node.clone(), env, private_env);
    // 8. Perform MakeMethod(closure, object).
    make_method(agent, closure, object);
    // 9. Return the Record { [[Key]]: propKey, [[Closure]]: closure }.
    Ok(closure)
}

/// ### [15.4.5 Runtime Semantics: MethodDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-methoddefinitionevaluation)
///
/// Defines the method on `object`, or returns the PrivateElement of a
/// private method.
pub(super) fn method_definition_evaluation(
    agent: &Agent,
    object: Object,
    key: ClassElementKey,
    kind: MethodKind,
    node: &Rc<FunctionNode>,
    enumerable: bool,
) -> JsResult<Option<PrivateElement>> {
    // 1. Let methodDef be ? DefineMethod of MethodDefinition with argument object.
    let closure = define_method(agent, object, node, None)?;
    let prefix = match kind {
        MethodKind::Method => None,
        MethodKind::Get => Some("get"),
        MethodKind::Set => Some("set"),
    };
    // 2. Perform SetFunctionName(methodDef.[[Closure]], methodDef.[[Key]]).
    set_function_name(agent, closure, key, prefix);
    if kind == MethodKind::Method {
        // Generator and async generator methods get a "prototype" object.
        make_function_prototype(agent, closure, node)?;
    }
    match (key, kind) {
        // 3. Return ? DefineMethodProperty(object, methodDef.[[Key]],
        // methodDef.[[Closure]], enumerable).
        (ClassElementKey::Property(key), MethodKind::Method) => {
            define_method_property(agent, object, key, closure, enumerable)?;
            Ok(None)
        }
        (ClassElementKey::Property(key), _) => {
            // 8. Let desc be the PropertyDescriptor { [[Get]]: closure,
            // [[Enumerable]]: enumerable, [[Configurable]]: true }.
            let mut desc = PropertyDescriptor {
                enumerable: Some(enumerable),
                configurable: Some(true),
                ..Default::default()
            };
            if kind == MethodKind::Get {
                desc.get = Some(Some(closure));
            } else {
                desc.set = Some(Some(closure));
            }
            // 9. Perform ? DefinePropertyOrThrow(object, propKey, desc).
            define_property_or_throw(agent, object, key, desc)?;
            Ok(None)
        }
        // 7. If propKey is a Private Name, then
        // a. Return PrivateElement { [[Key]]: propKey, [[Kind]]: ACCESSOR,
        // [[Get]]: closure, [[Set]]: undefined }.
        (ClassElementKey::Private(name), kind) => Ok(Some(PrivateElement {
            key: name,
            kind: match kind {
                MethodKind::Method => PrivateElementKind::Method(closure),
                MethodKind::Get => PrivateElementKind::Accessor {
                    get: Some(closure),
                    set: None,
                },
                MethodKind::Set => PrivateElementKind::Accessor {
                    get: None,
                    set: Some(closure),
                },
            },
        })),
    }
}

/// (is_generator, is_async) of the function whose code is running.
fn running_function_kind(agent: &Agent) -> (bool, bool) {
    agent
        .running_execution_context()
        .function
        .and_then(|f| function_code(agent, f))
        .map_or((false, false), |code| (code.is_generator, code.is_async))
}

/// True while the body of an async generator is being evaluated.
pub(super) fn in_async_generator(agent: &Agent) -> bool {
    running_function_kind(agent) == (true, true)
}

/// Turn the completion a generator body was resumed with into the result
/// of the suspending expression.
fn resumption_completion(resumption: Resumption) -> Completion<Value> {
    match resumption {
        Resumption::Next(value) => Ok(value),
        Resumption::Throw(error) => Err(AbruptCompletion::Throw(JsError::Throw(error))),
        Resumption::Return(value) => Err(AbruptCompletion::Return(value)),
    }
}

/// ### [27.5.3.7 GeneratorYield ( iteratorResult )](https://tc39.es/ecma262/#sec-generatoryield)
async fn generator_yield_raw(agent: &Agent, iterator_result: Object) -> JsResult<Resumption> {
    // 1. Let genContext be the running execution context.
    // 7. Remove genContext from the execution context stack and restore the
    // execution context that is at the top of the execution context stack as
    // the running execution context.
    // 8. Let callerContext be the running execution context.
    // 9. Resume callerContext passing NormalCompletion(iteratorResult).
    suspend(agent, Suspension::Yield(Value::Object(iterator_result))).await
}

/// ### [27.6.3.8 AsyncGeneratorYield ( value )](https://tc39.es/ecma262/#sec-asyncgeneratoryield)
///
/// Returns the resumption the generator was resumed with after
/// [27.6.3.7 AsyncGeneratorUnwrapYieldResumption](https://tc39.es/ecma262/#sec-asyncgeneratorunwrapyieldresumption)
/// awaited a return value.
async fn async_generator_yield_raw(agent: &Agent, value: Value) -> JsResult<Resumption> {
    // 9. Perform AsyncGeneratorCompleteStep(generator, completion, false,
    // previousRealm).
    // 10-12. The driver resumes the generator with the next request of its
    // queue, or leaves it in the suspended-yield state.
    let resumption = suspend(agent, Suspension::Yield(value)).await?;
    // AsyncGeneratorUnwrapYieldResumption ( resumptionValue )
    // 1. If resumptionValue is not a return completion, return ? resumptionValue.
    let Resumption::Return(value) = resumption else {
        return Ok(resumption);
    };
    // 2. Let awaited be Completion(Await(resumptionValue.[[Value]])).
    // 3. If awaited is a throw completion, return ? awaited.
    // 4. Assert: awaited is a normal completion.
    // 5. Return ReturnCompletion(awaited.[[Value]]).
    Ok(match await_value(agent, value).await {
        Ok(awaited) => Resumption::Return(awaited),
        Err(JsError::Throw(error)) => Resumption::Throw(error),
        Err(error) => return Err(error),
    })
}

/// ### [15.5.5 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-generator-function-definitions-runtime-semantics-evaluation)
pub(super) async fn evaluate_yield(
    agent: &Agent,
    expression: &YieldExpression,
) -> Completion<Value> {
    if expression.delegate {
        return evaluate_yield_delegate(agent, expression).await;
    }
    // YieldExpression : yield AssignmentExpression
    // 1. Let exprRef be ? Evaluation of AssignmentExpression.
    // 2. Let value be ? GetValue(exprRef).
    let value = match &expression.argument {
        Some(argument) => evaluate_expression(agent, argument).await?,
        // YieldExpression : yield
        None => Value::Undefined,
    };
    // 3. Return ? Yield(value).
    yield_value(agent, value).await
}

/// ### [27.5.3.8 Yield ( value )](https://tc39.es/ecma262/#sec-yield)
async fn yield_value(agent: &Agent, value: Value) -> Completion<Value> {
    // 1. Let generatorKind be GetGeneratorKind().
    // 2. If generatorKind is ASYNC, return ? AsyncGeneratorYield(? Await(value)).
    if in_async_generator(agent) {
        let value = await_value(agent, value).await?;
        let resumption = async_generator_yield_raw(agent, value).await?;
        return resumption_completion(resumption);
    }
    // 3. Otherwise, return ? GeneratorYield(CreateIteratorResultObject(value, false)).
    let iterator_result = create_iter_result_object(agent, value, false);
    let resumption = generator_yield_raw(agent, iterator_result).await?;
    resumption_completion(resumption)
}

/// Call a method of the delegate iterator of `yield*`, awaiting the result
/// in async generators, and require an object result.
async fn delegate_step(
    agent: &Agent,
    method: Value,
    iterator: Object,
    argument: Value,
    is_async: bool,
) -> JsResult<Object> {
    let mut inner_result = call(agent, method, Value::Object(iterator), &[argument])?;
    // If generatorKind is ASYNC, set innerResult to ? Await(innerResult).
    if is_async {
        inner_result = await_value(agent, inner_result).await?;
    }
    // If innerResult is not an Object, throw a TypeError exception.
    match inner_result {
        Value::Object(inner_result) => Ok(inner_result),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Iterator result is not an object",
        )),
    }
}

/// Yield the result of an inner iterator step to the caller of the outer
/// generator.
async fn delegate_yield(
    agent: &Agent,
    inner_result: Object,
    is_async: bool,
) -> JsResult<Resumption> {
    if is_async {
        // If generatorKind is ASYNC, set received to
        // Completion(AsyncGeneratorYield(? IteratorValue(innerResult))).
        let value = iterator_value(agent, inner_result)?;
        async_generator_yield_raw(agent, value).await
    } else {
        // Else, set received to Completion(GeneratorYield(innerResult)).
        generator_yield_raw(agent, inner_result).await
    }
}

/// YieldExpression : yield * AssignmentExpression
async fn evaluate_yield_delegate(
    agent: &Agent,
    expression: &YieldExpression,
) -> Completion<Value> {
    // 1. Let generatorKind be GetGeneratorKind().
    let is_async = in_async_generator(agent);
    // 2. Let exprRef be ? Evaluation of AssignmentExpression.
    // 3. Let value be ? GetValue(exprRef).
    let value = match &expression.argument {
        Some(argument) => evaluate_expression(agent, argument).await?,
        None => Value::Undefined,
    };
    // 4. Let iteratorRecord be ? GetIterator(value, generatorKind).
    let kind = if is_async {
        IteratorKind::Async
    } else {
        IteratorKind::Sync
    };
    let iterator_record: IteratorRecord = get_iterator(agent, value, kind)?;
    // 5. Let iterator be iteratorRecord.[[Iterator]].
    let iterator = iterator_record.iterator;
    // 6. Let received be NormalCompletion(undefined).
    let mut received = Resumption::Next(Value::Undefined);
    // 7. Repeat,
    loop {
        let inner_result = match received {
            // a. If received is a normal completion, then
            Resumption::Next(value) => {
                // i. Let innerResult be ? Call(iteratorRecord.[[NextMethod]],
                // iteratorRecord.[[Iterator]], « received.[[Value]] »).
                // ii. If generatorKind is ASYNC, set innerResult to ? Await(innerResult).
                // iii. If innerResult is not an Object, throw a TypeError exception.
                let inner_result =
                    delegate_step(agent, iterator_record.next_method, iterator, value, is_async)
                        .await?;
                // iv. Let done be ? IteratorComplete(innerResult).
                // v. If done is true, then
                if iterator_complete(agent, inner_result)? {
                    // 1. Return ? IteratorValue(innerResult).
                    return Ok(iterator_value(agent, inner_result)?);
                }
                inner_result
            }
            // b. Else if received is a throw completion, then
            Resumption::Throw(error) => {
                // i. Let throw be ? GetMethod(iterator, "throw").
                let throw = get_method(
                    agent,
                    Value::Object(iterator),
                    PropertyKey::from_str(agent, "throw"),
                )?;
                // ii. If throw is not undefined, then
                if let Some(throw) = throw {
                    // 1. Let innerResult be ? Call(throw, iterator, « received.[[Value]] »).
                    // 2. If generatorKind is ASYNC, set innerResult to ? Await(innerResult).
                    // 3. NOTE: Exceptions from the inner iterator throw method
                    // are propagated. Normal completions from an inner throw
                    // method are processed similarly to an inner next.
                    // 4. If innerResult is not an Object, throw a TypeError exception.
                    let inner_result =
                        delegate_step(agent, Value::Object(throw), iterator, error, is_async)
                            .await?;
                    // 5. Let done be ? IteratorComplete(innerResult).
                    // 6. If done is true, then
                    if iterator_complete(agent, inner_result)? {
                        // a. Return ? IteratorValue(innerResult).
                        return Ok(iterator_value(agent, inner_result)?);
                    }
                    inner_result
                } else {
                    // iii. Else,
                    // 1. NOTE: If iterator does not have a throw method, this
                    // throw is going to terminate the yield* loop. But first
                    // we need to give iterator a chance to clean up.
                    // 2. Let closeCompletion be NormalCompletion(EMPTY).
                    // 3. If generatorKind is ASYNC, perform ?
                    // AsyncIteratorClose(iteratorRecord, closeCompletion).
                    // 4. Else, perform ? IteratorClose(iteratorRecord,
                    // closeCompletion).
                    if is_async {
                        async_iterator_close(agent, &iterator_record, Ok(())).await?;
                    } else {
                        iterator_close(agent, iterator, Ok(()))?;
                    }
                    // 5. NOTE: The next step throws a TypeError to indicate
                    // that there was a yield* protocol violation: iterator
                    // does not have a throw method.
                    // 6. Throw a TypeError exception.
                    return Err(agent
                        .throw_exception_with_static_message(
                            ExceptionType::TypeError,
                            "The iterator does not provide a 'throw' method",
                        )
                        .into());
                }
            }
            // c. Else,
            Resumption::Return(value) => {
                // i. Assert: received is a return completion.
                // ii. Let return be ? GetMethod(iterator, "return").
                let r#return = get_method(
                    agent,
                    Value::Object(iterator),
                    PropertyKey::from_str(agent, "return"),
                )?;
                // iii. If return is undefined, then
                let Some(r#return) = r#return else {
                    // 1. Set value to received.[[Value]].
                    // 2. If generatorKind is ASYNC, then
                    //     a. Set value to ? Await(value).
                    let value = if is_async {
                        await_value(agent, value).await?
                    } else {
                        value
                    };
                    // 3. Return ReturnCompletion(value).
                    return Err(AbruptCompletion::Return(value));
                };
                // iv. Let innerReturnResult be ? Call(return, iterator, « received.[[Value]] »).
                // v. If generatorKind is ASYNC, set innerReturnResult to ? Await(innerReturnResult).
                // vi. If innerReturnResult is not an Object, throw a TypeError exception.
                let inner_return_result =
                    delegate_step(agent, Value::Object(r#return), iterator, value, is_async)
                        .await?;
                // vii. Let done be ? IteratorComplete(innerReturnResult).
                // viii. If done is true, then
                if iterator_complete(agent, inner_return_result)? {
                    // 1. Set value to ? IteratorValue(innerReturnResult).
                    // 2. Return ReturnCompletion(value).
                    return Err(AbruptCompletion::Return(iterator_value(
                        agent,
                        inner_return_result,
                    )?));
                }
                inner_return_result
            }
        };
        // If generatorKind is ASYNC, set received to
        // Completion(AsyncGeneratorYield(? IteratorValue(innerResult))).
        // Else, set received to Completion(GeneratorYield(innerResult)).
        received = delegate_yield(agent, inner_result, is_async).await?;
    }
}

/// ### [27.7.5.3 Await ( value )](https://tc39.es/ecma262/#await)
///
/// AwaitExpression : await UnaryExpression
pub(super) async fn evaluate_await(
    agent: &Agent,
    argument: &specter_ast::ast::Expression,
) -> Completion<Value> {
    // 1. Let exprRef be ? Evaluation of UnaryExpression.
    // 2. Let value be ? GetValue(exprRef).
    let value = evaluate_expression(agent, argument).await?;
    // 3. Return ? Await(value).
    Ok(await_value(agent, value).await?)
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn parameters_with_defaults_see_earlier_parameters() {
        assert_eq!(
            run_to_string("function f(a, b = a * 2, ...rest) { return [a, b, rest.length].join(); } f(3)"),
            "3,6,0"
        );
        assert_eq!(
            run_to_string("function f(a, { b } = { b: a }) { var a; return b; } f(7)"),
            "7"
        );
    }

    #[test]
    fn sloppy_arguments_objects_are_mapped() {
        assert_eq!(
            run_to_string("function f(a) { arguments[0] = 2; return a; } f(1)"),
            "2"
        );
        assert_eq!(
            run_to_string("function f(a) { 'use strict'; arguments[0] = 2; return a; } f(1)"),
            "1"
        );
        assert_eq!(
            run_to_string("var f = () => typeof arguments; f()"),
            "undefined"
        );
    }

    #[test]
    fn hoisted_functions_are_callable_before_their_declaration() {
        assert_eq!(
            run_to_string("function outer() { return inner(); function inner() { return 'ok'; } } outer()"),
            "ok"
        );
    }

    #[test]
    fn named_function_expressions_bind_their_own_name() {
        assert_eq!(
            run_to_string("var f = function g(n) { return n ? g(n - 1) + 1 : 0; }; f(3)"),
            "3"
        );
        assert_eq!(run_to_string("var f = function g() {}; f.name"), "g");
        assert_eq!(run_to_string("var h = () => {}; h.name"), "h");
    }

    #[test]
    fn generators_yield_and_delegate() {
        assert_eq!(
            run_to_string(
                "function* inner() { const x = yield 1; return x * 2; }
                 function* outer() { const r = yield* inner(); yield r; }
                 const g = outer();
                 [g.next().value, g.next(5).value, g.next().done].join()"
            ),
            "1,10,true"
        );
    }

    #[test]
    fn generator_return_runs_finally_blocks() {
        assert_eq!(
            run_to_string(
                "var log = [];
                 function* g() { try { yield 1; } finally { log.push('cleanup'); } }
                 var it = g(); it.next(); it.return(4).value + log.join()"
            ),
            "4cleanup"
        );
    }
}
