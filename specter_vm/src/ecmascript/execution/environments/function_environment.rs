// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    DeclarativeEnvironment, DeclarativeEnvironmentRecord, EnvironmentIndex, OuterEnv,
};
use crate::ecmascript::{
    builtins::ecmascript_function::ThisMode,
    execution::{Agent, JsResult, agent::ExceptionType},
    types::{HeapString, InternalMethods, Object, ObjectKind, Value},
};

/// ### \[\[ThisBindingStatus\]\]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ThisBindingStatus {
    /// Function is an ArrowFunction and does not have a local `this` value.
    Lexical,
    /// Function is a normal function and `this` has been bound.
    Initialized,
    /// Function is a normal function and `this` has not been bound yet.
    Uninitialized,
}

/// ### [9.1.1.3 Function Environment Records](https://tc39.es/ecma262/#sec-function-environment-records)
///
/// A Function Environment Record is a Declarative Environment Record that is
/// used to represent the top-level scope of a function and, if the function
/// is not an ArrowFunction, provides a `this` binding. If a function is not
/// an ArrowFunction function and references `super`, its Function
/// Environment Record also contains the state that is used to perform
/// `super` method invocations from within the function.
#[derive(Debug, Clone)]
pub(crate) struct FunctionEnvironmentRecord {
    /// ### \[\[ThisValue\]\]
    ///
    /// This is the `this` value used for this invocation of the function.
    pub(crate) this_value: Option<Value>,

    /// ### \[\[ThisBindingStatus\]\]
    pub(crate) this_binding_status: ThisBindingStatus,

    /// ### \[\[FunctionObject\]\]
    ///
    /// The function object whose invocation caused this Environment Record
    /// to be created.
    pub(crate) function_object: Object,

    /// ### \[\[NewTarget\]\]
    ///
    /// If this Environment Record was created by the \[\[Construct\]\]
    /// internal method, \[\[NewTarget\]\] is the value of the \[\[Construct\]\]
    /// newTarget parameter. Otherwise, its value is undefined.
    pub(crate) new_target: Option<Object>,

    /// The bindings of the record.
    pub(crate) declarative_environment: DeclarativeEnvironment,
}

/// Handle to a [`FunctionEnvironmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionEnvironment(pub(crate) u32);

/// ### [9.1.2.4 NewFunctionEnvironment ( F, newTarget )](https://tc39.es/ecma262/#sec-newfunctionenvironment)
///
/// The abstract operation NewFunctionEnvironment takes arguments F (an
/// ECMAScript function object) and newTarget (an Object or undefined) and
/// returns a Function Environment Record.
pub(crate) fn new_function_environment(
    agent: &Agent,
    function: Object,
    new_target: Option<Object>,
) -> FunctionEnvironment {
    let (this_mode, outer_env) = match &agent.object(function).kind {
        ObjectKind::ECMAScriptFunction(data) => (data.this_mode, Some(data.environment)),
        _ => (ThisMode::Strict, None),
    };
    // 1. Let env be a new Function Environment Record containing no bindings.
    // 2. Set env.[[FunctionObject]] to F.
    // 3. If F.[[ThisMode]] is LEXICAL, set env.[[ThisBindingStatus]] to LEXICAL.
    // 4. Else, set env.[[ThisBindingStatus]] to UNINITIALIZED.
    let this_binding_status = if this_mode == ThisMode::Lexical {
        ThisBindingStatus::Lexical
    } else {
        ThisBindingStatus::Uninitialized
    };
    // 5. Set env.[[NewTarget]] to newTarget.
    // 6. Set env.[[OuterEnv]] to F.[[Environment]].
    let mut heap = agent.heap_mut();
    let declarative_environment =
        heap.environments
            .push_declarative_environment(DeclarativeEnvironmentRecord {
                outer_env,
                bindings: Default::default(),
            });
    // 7. Return env.
    heap.environments
        .push_function_environment(FunctionEnvironmentRecord {
            this_value: None,
            this_binding_status,
            function_object: function,
            new_target,
            declarative_environment,
        })
}

impl FunctionEnvironment {
    pub(crate) fn declarative_environment(self, agent: &Agent) -> DeclarativeEnvironment {
        agent.heap().environments.function[self.0 as usize].declarative_environment
    }

    pub(crate) fn function_object(self, agent: &Agent) -> Object {
        agent.heap().environments.function[self.0 as usize].function_object
    }

    pub(crate) fn new_target(self, agent: &Agent) -> Option<Object> {
        agent.heap().environments.function[self.0 as usize].new_target
    }

    pub(crate) fn this_binding_status(self, agent: &Agent) -> ThisBindingStatus {
        agent.heap().environments.function[self.0 as usize].this_binding_status
    }

    pub(crate) fn get_outer_env(self, agent: &Agent) -> OuterEnv {
        self.declarative_environment(agent).get_outer_env(agent)
    }

    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> bool {
        self.declarative_environment(agent).has_binding(agent, name)
    }

    /// ### [9.1.1.3.1 BindThisValue ( envRec, V )](https://tc39.es/ecma262/#sec-bindthisvalue)
    pub(crate) fn bind_this_value(self, agent: &Agent, value: Value) -> JsResult<Value> {
        let status = self.this_binding_status(agent);
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        debug_assert_ne!(status, ThisBindingStatus::Lexical);
        // 2. If envRec.[[ThisBindingStatus]] is INITIALIZED, throw a
        // ReferenceError exception.
        if status == ThisBindingStatus::Initialized {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::ReferenceError,
                "Super constructor may only be called once",
            ));
        }
        // 3. Set envRec.[[ThisValue]] to V.
        // 4. Set envRec.[[ThisBindingStatus]] to INITIALIZED.
        let mut heap = agent.heap_mut();
        let record = &mut heap.environments.function[self.0 as usize];
        record.this_value = Some(value);
        record.this_binding_status = ThisBindingStatus::Initialized;
        // 5. Return V.
        Ok(value)
    }

    /// ### [9.1.1.3.2 HasThisBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-hasthisbinding)
    pub(crate) fn has_this_binding(self, agent: &Agent) -> bool {
        // 1. If envRec.[[ThisBindingStatus]] is LEXICAL, return false;
        // otherwise, return true.
        self.this_binding_status(agent) != ThisBindingStatus::Lexical
    }

    /// ### [9.1.1.3.3 HasSuperBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-hassuperbinding)
    pub(crate) fn has_super_binding(self, agent: &Agent) -> bool {
        // 1. If envRec.[[ThisBindingStatus]] is LEXICAL, return false.
        if self.this_binding_status(agent) == ThisBindingStatus::Lexical {
            return false;
        }
        // 2. If envRec.[[FunctionObject]].[[HomeObject]] is undefined, return
        // false; otherwise, return true.
        let function = self.function_object(agent);
        matches!(
            &agent.object(function).kind,
            ObjectKind::ECMAScriptFunction(data) if data.home_object.is_some()
        )
    }

    /// ### [9.1.1.3.4 GetThisBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-getthisbinding)
    pub(crate) fn get_this_binding(self, agent: &Agent) -> JsResult<Value> {
        let (status, this_value) = {
            let heap = agent.heap();
            let record = &heap.environments.function[self.0 as usize];
            (record.this_binding_status, record.this_value)
        };
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        // 2. If envRec.[[ThisBindingStatus]] is UNINITIALIZED, throw a
        // ReferenceError exception.
        match (status, this_value) {
            (ThisBindingStatus::Initialized, Some(value)) => Ok(value),
            // 3. Return envRec.[[ThisValue]].
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::ReferenceError,
                "Must call super constructor in derived class before accessing 'this' or returning from derived constructor",
            )),
        }
    }

    /// ### [9.1.1.3.5 GetSuperBase ( )](https://tc39.es/ecma262/#sec-getsuperbase)
    pub(crate) fn get_super_base(self, agent: &Agent) -> JsResult<Value> {
        let function = self.function_object(agent);
        // 1. Let home be envRec.[[FunctionObject]].[[HomeObject]].
        let home = match &agent.object(function).kind {
            ObjectKind::ECMAScriptFunction(data) => data.home_object,
            _ => None,
        };
        // 2. If home is undefined, return undefined.
        let Some(home) = home else {
            return Ok(Value::Undefined);
        };
        // 3. Assert: home is an ordinary object.
        // 4. Return ? home.[[GetPrototypeOf]]().
        Ok(home.internal_get_prototype_of(agent)?.into())
    }
}

impl From<FunctionEnvironment> for EnvironmentIndex {
    fn from(value: FunctionEnvironment) -> Self {
        EnvironmentIndex::Function(value)
    }
}
