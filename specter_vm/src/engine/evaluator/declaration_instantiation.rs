// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The declaration instantiation algorithms of scripts, blocks and eval
//! code. FunctionDeclarationInstantiation lives with the function
//! definitions.

use ahash::AHashSet;
use specter_ast::scope_analysis::{LexicallyScopedDeclaration, VarScope};

use super::{function_definitions::instantiate_function_object, name_string, private_environment};
use crate::ecmascript::{
    execution::{
        Agent, DeclarativeEnvironment, EnvironmentIndex, GlobalEnvironment, JsError, JsResult,
        PrivateEnvironment, agent::ExceptionType,
    },
    types::{HeapString, Value},
};

fn already_declared(agent: &Agent, name: &str) -> JsError {
    agent.throw_exception(
        ExceptionType::SyntaxError,
        format!("Identifier '{name}' has already been declared"),
    )
}

fn function_name(agent: &Agent, declaration: &LexicallyScopedDeclaration) -> HeapString {
    name_string(agent, declaration.name())
}

/// VarDeclaredNames that are not also the name of a hoisted function, in
/// source order.
fn declared_var_names<'a>(
    scope: &'a VarScope,
    declared_function_names: &'a AHashSet<&'a str>,
) -> impl Iterator<Item = &'a str> {
    scope
        .var_names
        .iter()
        .map(|name| &**name)
        .filter(move |name| !declared_function_names.contains(name))
}

/// The declaredFunctionNames of the declaration instantiation algorithms.
fn declared_function_names(scope: &VarScope) -> AHashSet<&str> {
    scope
        .functions_to_initialize
        .iter()
        .filter_map(|function| function.name.as_ref().map(|name| &*name.name))
        .collect()
}

/// ### [16.1.7 GlobalDeclarationInstantiation ( script, env )](https://tc39.es/ecma262/#sec-globaldeclarationinstantiation)
pub(crate) fn global_declaration_instantiation(
    agent: &Agent,
    scope: &VarScope,
    env: GlobalEnvironment,
) -> JsResult<()> {
    // 1. Let lexNames be the LexicallyDeclaredNames of script.
    // 2. Let varNames be the VarDeclaredNames of script.
    // 3. For each element name of lexNames, do
    for declaration in &scope.lexical_declarations {
        let name = declaration.name();
        let heap_name = name_string(agent, name);
        // a. If HasLexicalDeclaration(env, name) is true, throw a SyntaxError exception.
        // b. Let hasRestrictedGlobal be ? HasRestrictedGlobalProperty(env, name).
        // c. NOTE: Global var and function bindings (except those that are
        // introduced by non-strict direct eval) are non-configurable and are
        // therefore restricted global properties.
        // d. If hasRestrictedGlobal is true, throw a SyntaxError exception.
        if env.has_var_declaration(agent, heap_name)
            || env.has_lexical_declaration(agent, heap_name)
            || env.has_restricted_global_property(agent, heap_name)?
        {
            return Err(already_declared(agent, name));
        }
    }
    // 4. For each element name of varNames, do
    for name in &scope.var_names {
        // a. If HasLexicalDeclaration(env, name) is true, throw a SyntaxError
        // exception.
        if env.has_lexical_declaration(agent, name_string(agent, name)) {
            return Err(already_declared(agent, name));
        }
    }
    // 5. Let varDeclarations be the VarScopedDeclarations of script.
    // 6. Let functionsToInitialize be a new empty List.
    // 7. Let declaredFunctionNames be a new empty List.
    // 8. For each element d of varDeclarations, in reverse List order, do
    let declared_function_names = declared_function_names(scope);
    for function in &scope.functions_to_initialize {
        let Some(name) = &function.name else {
            continue;
        };
        // 1. Let fnDefinable be ? CanDeclareGlobalFunction(env, fn).
        // 2. If fnDefinable is false, throw a TypeError exception.
        if !env.can_declare_global_function(agent, name_string(agent, &name.name))? {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("Cannot declare global function '{}'", name.name),
            ));
        }
    }
    // 9. Let declaredVarNames be a new empty List.
    // 10. For each element d of varDeclarations, do
    let mut declared_var_names_list = Vec::new();
    for name in declared_var_names(scope, &declared_function_names) {
        let heap_name = name_string(agent, name);
        // a. Let vnDefinable be ? CanDeclareGlobalVar(env, vn).
        // b. If vnDefinable is false, throw a TypeError exception.
        if !env.can_declare_global_var(agent, heap_name)? {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("Cannot declare global variable '{name}'"),
            ));
        }
        // c. If declaredVarNames does not contain vn, then
        // i. Append vn to declaredVarNames.
        declared_var_names_list.push(heap_name);
    }
    // 11. NOTE: No abnormal terminations occur after this algorithm step if
    // the global object is an ordinary object.
    // 13. Let privateEnv be null.
    // 14. For each element d of lexDeclarations, do
    for declaration in &scope.lexical_declarations {
        let name = function_name(agent, declaration);
        // a. NOTE: Lexically declared names are only instantiated here but
        // not initialized.
        // b. For each element dn of the BoundNames of d, do
        if declaration.is_constant_declaration() {
            // i. If IsConstantDeclaration of d is true, then
            // 1. Perform ? env.CreateImmutableBinding(dn, true).
            env.create_immutable_binding(agent, name, true)?;
        } else {
            // ii. Else,
            // 1. Perform ? env.CreateMutableBinding(dn, false).
            env.create_mutable_binding(agent, name, false)?;
        }
    }
    // 15. For each Parse Node f of functionsToInitialize, do
    for function in &scope.functions_to_initialize {
        let Some(name) = &function.name else {
            continue;
        };
        // a. Let fn be the sole element of the BoundNames of f.
        // b. Let fo be InstantiateFunctionObject of f with arguments env and
        // privateEnv.
        let fo = instantiate_function_object(agent, function, EnvironmentIndex::Global(env), None);
        // c. Perform ? CreateGlobalFunctionBinding(env, fn, fo, false).
        env.create_global_function_binding(
            agent,
            name_string(agent, &name.name),
            Value::Object(fo),
            false,
        )?;
    }
    // 16. For each String vn of declaredVarNames, do
    for name in declared_var_names_list {
        // a. Perform ? CreateGlobalVarBinding(env, vn, false).
        env.create_global_var_binding(agent, name, false)?;
    }
    // 17. Return UNUSED.
    Ok(())
}

/// ### [14.2.3 BlockDeclarationInstantiation ( code, env )](https://tc39.es/ecma262/#sec-blockdeclarationinstantiation)
pub(crate) fn block_declaration_instantiation(
    agent: &Agent,
    declarations: &[LexicallyScopedDeclaration],
    env: DeclarativeEnvironment,
) -> JsResult<()> {
    // 1. Let declarations be the LexicallyScopedDeclarations of code.
    // 2. Let privateEnv be the running execution context's PrivateEnvironment.
    let private_env = private_environment(agent);
    // 3. For each element d of declarations, do
    for declaration in declarations {
        let name = function_name(agent, declaration);
        // a. For each element dn of the BoundNames of d, do
        if declaration.is_constant_declaration() {
            // i. If IsConstantDeclaration of d is true, then
            // 1. Perform ! env.CreateImmutableBinding(dn, true).
            env.create_immutable_binding(agent, name, true);
        } else if !env.has_binding(agent, name) {
            // ii. Else,
            // 1. Perform ! env.CreateMutableBinding(dn, false).
            // Sloppy blocks may repeat a function declaration.
            env.create_mutable_binding(agent, name, false);
        }
        // b. If d is either a FunctionDeclaration, a GeneratorDeclaration, an
        // AsyncFunctionDeclaration, or an AsyncGeneratorDeclaration, then
        if let LexicallyScopedDeclaration::Function(function) = declaration {
            // i. Let fn be the sole element of the BoundNames of d.
            // ii. Let fo be InstantiateFunctionObject of d with arguments env
            // and privateEnv.
            let fo = instantiate_function_object(
                agent,
                function,
                EnvironmentIndex::Declarative(env),
                private_env,
            );
            // iii. Perform ! env.InitializeBinding(fn, fo).
            let initialized = env
                .get_binding(agent, name)
                .is_some_and(|binding| binding.value.is_some());
            if initialized {
                env.set_mutable_binding(agent, name, Value::Object(fo), false)?;
            } else {
                env.initialize_binding(agent, name, Value::Object(fo));
            }
        }
    }
    // 4. Return UNUSED.
    Ok(())
}

/// ### [19.2.1.3 EvalDeclarationInstantiation ( body, varEnv, lexEnv, privateEnv, strict )](https://tc39.es/ecma262/#sec-evaldeclarationinstantiation)
pub(crate) fn eval_declaration_instantiation(
    agent: &Agent,
    scope: &VarScope,
    var_env: EnvironmentIndex,
    lex_env: DeclarativeEnvironment,
    private_env: Option<PrivateEnvironment>,
    strict: bool,
) -> JsResult<()> {
    // 1. Let varNames be the VarDeclaredNames of body.
    // 2. Let varDeclarations be the VarScopedDeclarations of body.
    // 3. If strict is false, then
    if !strict {
        // a. If varEnv is a Global Environment Record, then
        if let EnvironmentIndex::Global(var_env) = var_env {
            // i. For each element name of varNames, do
            for name in &scope.var_names {
                // 1. If HasLexicalDeclaration(varEnv, name) is true, throw a
                // SyntaxError exception.
                // 2. NOTE: eval will not create a global var declaration that
                // would be shadowed by a global lexical declaration.
                if var_env.has_lexical_declaration(agent, name_string(agent, name)) {
                    return Err(already_declared(agent, name));
                }
            }
        }
        // b. Let thisEnv be lexEnv.
        // c. Assert: The following loop will terminate.
        let mut this_env = lex_env.get_outer_env(agent);
        // d. Repeat, while thisEnv and varEnv are not the same Environment
        // Record,
        while let Some(env) = this_env {
            if env == var_env {
                break;
            }
            // i. If thisEnv is not an Object Environment Record, then
            if !matches!(env, EnvironmentIndex::Object(_)) {
                // 1. NOTE: The environment of with statements cannot contain any
                // lexical declaration so it doesn't need to be checked for
                // var/let hoisting conflicts.
                // 2. For each element name of varNames, do
                for name in &scope.var_names {
                    // a. If ! thisEnv.HasBinding(name) is true, then
                    // i. Throw a SyntaxError exception.
                    if env.has_binding(agent, name_string(agent, name))? {
                        return Err(already_declared(agent, name));
                    }
                }
            }
            // ii. Set thisEnv to thisEnv.[[OuterEnv]].
            this_env = env.get_outer_env(agent);
        }
    }
    // 8. For each element d of varDeclarations, in reverse List order, do
    let declared_function_names = declared_function_names(scope);
    if let EnvironmentIndex::Global(var_env) = var_env {
        for function in &scope.functions_to_initialize {
            let Some(name) = &function.name else {
                continue;
            };
            // 1. Let fnDefinable be ? CanDeclareGlobalFunction(varEnv, fn).
            // 2. If fnDefinable is false, throw a TypeError exception.
            if !var_env.can_declare_global_function(agent, name_string(agent, &name.name))? {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("Cannot declare global function '{}'", name.name),
                ));
            }
        }
    }
    // 9. Let declaredVarNames be a new empty List.
    // 10. For each element d of varDeclarations, do
    let mut declared_var_names_list = Vec::new();
    for name in declared_var_names(scope, &declared_function_names) {
        let heap_name = name_string(agent, name);
        if let EnvironmentIndex::Global(var_env) = var_env {
            // 1. Let vnDefinable be ? CanDeclareGlobalVar(varEnv, vn).
            // 2. If vnDefinable is false, throw a TypeError exception.
            if !var_env.can_declare_global_var(agent, heap_name)? {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("Cannot declare global variable '{name}'"),
                ));
            }
        }
        declared_var_names_list.push(heap_name);
    }
    // 14. Let lexDeclarations be the LexicallyScopedDeclarations of body.
    // 15. For each element d of lexDeclarations, do
    for declaration in &scope.lexical_declarations {
        let name = function_name(agent, declaration);
        if declaration.is_constant_declaration() {
            // 1. Perform ? lexEnv.CreateImmutableBinding(dn, true).
            lex_env.create_immutable_binding(agent, name, true);
        } else {
            // 1. Perform ? lexEnv.CreateMutableBinding(dn, false).
            lex_env.create_mutable_binding(agent, name, false);
        }
    }
    // 16. For each Parse Node f of functionsToInitialize, do
    for function in &scope.functions_to_initialize {
        let Some(name) = &function.name else {
            continue;
        };
        let name = name_string(agent, &name.name);
        // b. Let fo be InstantiateFunctionObject of f with arguments lexEnv
        // and privateEnv.
        let fo = instantiate_function_object(
            agent,
            function,
            EnvironmentIndex::Declarative(lex_env),
            private_env,
        );
        match var_env {
            // c. If varEnv is a Global Environment Record, then
            // i. Perform ? CreateGlobalFunctionBinding(varEnv, fn, fo, true).
            EnvironmentIndex::Global(var_env) => {
                var_env.create_global_function_binding(agent, name, Value::Object(fo), true)?;
            }
            // d. Else,
            _ => {
                // i. Let bindingExists be ! varEnv.HasBinding(fn).
                if !var_env.has_binding(agent, name)? {
                    // ii. If bindingExists is false, then
                    // 2. Perform ! varEnv.CreateMutableBinding(fn, true).
                    var_env.create_mutable_binding(agent, name, true)?;
                    // 3. Perform ! varEnv.InitializeBinding(fn, fo).
                    var_env.initialize_binding(agent, name, Value::Object(fo))?;
                } else {
                    // iii. Else,
                    // 1. Perform ! varEnv.SetMutableBinding(fn, fo, false).
                    var_env.set_mutable_binding(agent, name, Value::Object(fo), false)?;
                }
            }
        }
    }
    // 17. For each String vn of declaredVarNames, do
    for name in declared_var_names_list {
        match var_env {
            // a. If varEnv is a Global Environment Record, then
            // i. Perform ? CreateGlobalVarBinding(varEnv, vn, true).
            EnvironmentIndex::Global(var_env) => {
                var_env.create_global_var_binding(agent, name, true)?;
            }
            // b. Else,
            _ => {
                // i. Let bindingExists be ! varEnv.HasBinding(vn).
                // ii. If bindingExists is false, then
                if !var_env.has_binding(agent, name)? {
                    // 2. Perform ! varEnv.CreateMutableBinding(vn, true).
                    var_env.create_mutable_binding(agent, name, true)?;
                    // 3. Perform ! varEnv.InitializeBinding(vn, undefined).
                    var_env.initialize_binding(agent, name, Value::Undefined)?;
                }
            }
        }
    }
    // 18. Return UNUSED.
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn global_lexical_redeclaration_is_a_syntax_error() {
        assert_eq!(
            run_to_string("let a = 1; eval('var a = 2')"),
            "Uncaught SyntaxError: Identifier 'a' has already been declared"
        );
    }

    #[test]
    fn global_functions_become_global_object_properties() {
        assert_eq!(
            run_to_string("function g() {} var v; typeof globalThis.g + ',' + ('v' in globalThis)"),
            "function,true"
        );
        assert_eq!(run_to_string("let l = 1; 'l' in globalThis"), "false");
    }

    #[test]
    fn block_functions_are_initialized_on_entry() {
        assert_eq!(
            run_to_string("{ let r = f(); function f() { return 'hoisted'; } r }"),
            "hoisted"
        );
    }

    #[test]
    fn sloppy_eval_declares_vars_in_the_calling_function() {
        assert_eq!(
            run_to_string("function f() { eval('var x = 3'); return x; } f()"),
            "3"
        );
        assert_eq!(
            run_to_string("function f() { 'use strict'; eval('var x = 3'); return typeof x; } f()"),
            "undefined"
        );
        assert_eq!(
            run_to_string("function f() { let y; { eval('var y = 1'); } } try { f() } catch (e) { e.name }"),
            "SyntaxError"
        );
    }

    #[test]
    fn eval_let_bindings_stay_in_the_eval() {
        assert_eq!(run_to_string("eval('let q = 1; q'); typeof q"), "undefined");
    }
}
