// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use specter_ast::ast::{Atom, Script};

use super::{ScriptOrModule, module::ModuleIdentifier};
use crate::{
    ecmascript::{
        execution::{
            Agent, ECMAScriptCodeEvaluationState, EnvironmentIndex, ExecutionContext, JsResult,
            Realm,
        },
        types::CompletionValue,
    },
    engine::{
        evaluator::{
            declaration_instantiation::global_declaration_instantiation, evaluate_statement_list,
        },
        run_sync,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScriptIdentifier(u32);

impl ScriptIdentifier {
    pub(crate) fn realm(self, agent: &Agent) -> Realm {
        agent.heap().scripts[self.0 as usize].realm
    }

    fn ecmascript_code(self, agent: &Agent) -> Rc<Script> {
        agent.heap().scripts[self.0 as usize].ecmascript_code.clone()
    }

    pub(crate) fn host_defined(self, agent: &Agent) -> Option<Rc<str>> {
        agent.heap().scripts[self.0 as usize].host_defined.clone()
    }

    pub(crate) fn loaded_module(self, agent: &Agent, specifier: &str) -> Option<ModuleIdentifier> {
        agent.heap().scripts[self.0 as usize]
            .loaded_modules
            .iter()
            .find(|(loaded, _)| &**loaded == specifier)
            .map(|(_, module)| *module)
    }

    pub(crate) fn insert_loaded_module(
        self,
        agent: &Agent,
        specifier: Atom,
        module: ModuleIdentifier,
    ) {
        agent.heap_mut().scripts[self.0 as usize]
            .loaded_modules
            .push((specifier, module));
    }
}

/// ### [16.1.4 Script Records](https://tc39.es/ecma262/#sec-script-records)
///
/// A Script Record encapsulates information about a script being evaluated.
#[derive(Debug)]
pub(crate) struct ScriptRecord {
    /// ### \[\[Realm\]\]
    ///
    /// The realm within which this script was created.
    realm: Realm,

    /// ### \[\[ECMAScriptCode\]\]
    ///
    /// The result of parsing the source text of this script.
    ecmascript_code: Rc<Script>,

    /// ### \[\[LoadedModules\]\]
    ///
    /// A map from the specifier strings imported by this script to the
    /// resolved Module Record.
    loaded_modules: Vec<(Atom, ModuleIdentifier)>,

    /// ### \[\[HostDefined\]\]
    host_defined: Option<Rc<str>>,
}

impl ScriptRecord {
    /// Store a parsed script in the heap as a Script Record of `realm`.
    pub(crate) fn create(agent: &Agent, realm: Realm, script: Script) -> ScriptIdentifier {
        let mut heap = agent.heap_mut();
        let index = u32::try_from(heap.scripts.len()).unwrap_or(u32::MAX);
        heap.scripts.push(ScriptRecord {
            realm,
            ecmascript_code: Rc::new(script),
            loaded_modules: Vec::new(),
            host_defined: None,
        });
        ScriptIdentifier(index)
    }
}

/// ### [16.1.6 ScriptEvaluation ( scriptRecord )](https://tc39.es/ecma262/#sec-runtime-semantics-scriptevaluation)
///
/// The completion value of the script is None if the script body
/// completed with an empty value.
pub(crate) fn script_evaluation(
    agent: &Agent,
    script_record: ScriptIdentifier,
) -> JsResult<CompletionValue> {
    let realm = script_record.realm(agent);
    let script = script_record.ecmascript_code(agent);
    // 1. Let globalEnv be scriptRecord.[[Realm]].[[GlobalEnv]].
    let global_env = realm.global_env(agent);
    // 2. Let scriptContext be a new ECMAScript code execution context.
    let script_context = ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            // 6. Set the VariableEnvironment of scriptContext to globalEnv.
            variable_environment: EnvironmentIndex::Global(global_env),
            // 7. Set the LexicalEnvironment of scriptContext to globalEnv.
            lexical_environment: EnvironmentIndex::Global(global_env),
            // 8. Set the PrivateEnvironment of scriptContext to null.
            private_environment: None,
            is_strict_mode: script.strict,
        }),
        // 3. Set the Function of scriptContext to null.
        function: None,
        // 4. Set the Realm of scriptContext to scriptRecord.[[Realm]].
        realm,
        // 5. Set the ScriptOrModule of scriptContext to scriptRecord.
        script_or_module: Some(ScriptOrModule::Script(script_record)),
        coroutine: None,
    };
    // 9. Suspend the running execution context.
    // 10. Push scriptContext onto the execution context stack; scriptContext
    // is now the running execution context.
    let depth = agent.execution_context_depth();
    agent.push_execution_context(script_context);
    tracing::trace!(event = "script_evaluation", script = script_record.0, strict = script.strict);
    // 11. Let script be scriptRecord.[[ECMAScriptCode]].
    // 12. Let result be Completion(GlobalDeclarationInstantiation(script, globalEnv)).
    let result = global_declaration_instantiation(agent, &script.scope, global_env).and_then(|()| {
        // 13. If result is a normal completion, then
        //     a. Set result to Completion(Evaluation of script).
        run_sync(agent, async {
            match evaluate_statement_list(agent, &script.body).await {
                Ok(value) => Ok(value),
                Err(completion) => completion.into_script_result(agent),
            }
        })
    });
    // 14. Suspend scriptContext and remove it from the execution context stack.
    // 15. Assert: The execution context stack is not empty.
    // 16. Resume the context that is now on the top of the execution context
    // stack as the running execution context.
    agent.truncate_execution_context_stack(depth);
    // 17. Return ? result.
    result
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::ecmascript::execution::{Agent, DefaultHostHooks, agent::Options};

    #[test]
    fn scripts_share_the_global_environment() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let realm = agent.create_realm();
        let first = specter_ast::parse_script("let counter = 1; var total = 10;", false).unwrap();
        realm.evaluate_script(&agent, first).unwrap();
        let second = specter_ast::parse_script("counter + total", false).unwrap();
        let value = realm.evaluate_script(&agent, second).unwrap();
        assert_eq!(value.to_display_string(&agent), "11");
    }

    #[test]
    fn redeclared_lexical_bindings_fail_before_evaluation() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let realm = agent.create_realm();
        let first = specter_ast::parse_script("let x = 1;", false).unwrap();
        realm.evaluate_script(&agent, first).unwrap();
        let second = specter_ast::parse_script("var y = 2; let x = 3;", false).unwrap();
        let error = realm.evaluate_script(&agent, second).unwrap_err();
        assert!(error.to_display_string(&agent).contains("SyntaxError"));
        let third = specter_ast::parse_script("typeof y", false).unwrap();
        let value = realm.evaluate_script(&agent, third).unwrap();
        assert_eq!(value.to_display_string(&agent), "undefined");
    }

    #[test]
    fn the_execution_context_stack_is_restored() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let realm = agent.create_realm();
        let depth = agent.execution_context_depth();
        let script = specter_ast::parse_script("throw new Error('boom')", false).unwrap();
        assert!(realm.evaluate_script(&agent, script).is_err());
        assert_eq!(agent.execution_context_depth(), depth);
    }
}
