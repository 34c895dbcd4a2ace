// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{EnvironmentIndex, PrivateEnvironment, Realm};
use crate::{
    ecmascript::{scripts_and_modules::ScriptOrModule, types::Object},
    engine::coroutine::Coroutine,
};

/// Additional state of execution contexts that evaluate ECMAScript code.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ECMAScriptCodeEvaluationState {
    /// ### LexicalEnvironment
    ///
    /// Identifies the Environment Record used to resolve identifier
    /// references made by code within this execution context.
    pub(crate) lexical_environment: EnvironmentIndex,

    /// ### VariableEnvironment
    ///
    /// Identifies the Environment Record that holds bindings created by
    /// VariableStatements within this execution context.
    pub(crate) variable_environment: EnvironmentIndex,

    /// ### PrivateEnvironment
    ///
    /// Identifies the PrivateEnvironment Record that holds Private Names
    /// created by ClassElements in the nearest containing class. None if
    /// there is no containing class.
    pub(crate) private_environment: Option<PrivateEnvironment>,

    pub(crate) is_strict_mode: bool,
}

/// ### [9.4 Execution Contexts](https://tc39.es/ecma262/#sec-execution-contexts)
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext {
    pub(crate) ecmascript_code: Option<ECMAScriptCodeEvaluationState>,

    /// ### Function
    ///
    /// If this execution context is evaluating the code of a function object,
    /// then the value of this component is that function object. If the
    /// context is evaluating the code of a Script or Module, the value is
    /// None.
    pub(crate) function: Option<Object>,

    /// ### Realm
    ///
    /// The Realm Record from which associated code accesses ECMAScript
    /// resources.
    pub(crate) realm: Realm,

    /// ### ScriptOrModule
    ///
    /// The Module Record or Script Record from which associated code
    /// originates.
    pub(crate) script_or_module: Option<ScriptOrModule>,

    /// The coroutine evaluating the body of a generator or async function.
    pub(crate) coroutine: Option<Coroutine>,
}

impl ExecutionContext {
    pub(crate) fn is_strict_mode(&self) -> bool {
        self.ecmascript_code
            .is_some_and(|code| code.is_strict_mode)
    }
}
