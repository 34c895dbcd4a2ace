// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [9 Executable Code and Execution Contexts](https://tc39.es/ecma262/#sec-executable-code-and-execution-contexts)

pub mod agent;
mod default_host_hooks;
mod environments;
mod execution_context;
mod realm;

pub use agent::{Agent, EvaluationError, JsError, JsResult};
pub use default_host_hooks::DefaultHostHooks;
pub(crate) use environments::{
    DeclarativeEnvironment, EnvironmentIndex, Environments, GlobalEnvironment,
    ModuleEnvironment, PrivateEnvironment, ThisBindingStatus, get_identifier_reference,
    new_declarative_environment, new_function_environment, new_module_environment,
    new_object_environment, new_private_environment, resolve_private_identifier,
};
pub use environments::PrivateName;
pub(crate) use execution_context::{ECMAScriptCodeEvaluationState, ExecutionContext};
pub use realm::Realm;
pub(crate) use realm::{IntrinsicObjectIndex, Intrinsics, ProtoIntrinsics, RealmRecord};
