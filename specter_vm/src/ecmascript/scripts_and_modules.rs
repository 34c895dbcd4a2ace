// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [16 ECMAScript Language: Scripts and Modules](https://tc39.es/ecma262/#sec-ecmascript-language-scripts-and-modules)

use std::rc::Rc;

use self::{module::ModuleIdentifier, script::ScriptIdentifier};
use super::execution::Agent;

pub(crate) mod module;
pub(crate) mod script;

/// The Script Record or Module Record from which code originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptOrModule {
    Script(ScriptIdentifier),
    Module(ModuleIdentifier),
}

impl ScriptOrModule {
    /// The key the host gave to the record when it was loaded.
    pub(crate) fn host_defined(self, agent: &Agent) -> Option<Rc<str>> {
        match self {
            ScriptOrModule::Script(script) => script.host_defined(agent),
            ScriptOrModule::Module(module) => module.host_defined(agent),
        }
    }
}
