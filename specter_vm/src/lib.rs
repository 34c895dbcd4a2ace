// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Specter is an ECMAScript execution engine that evaluates the abstract
//! syntax tree produced by `specter_ast` by following the algorithms of
//! ECMA-262 step by step.
//!
//! An embedder creates an [`Agent`] with its [`HostHooks`], creates one or
//! more [`Realm`]s in it and evaluates parsed Scripts and Modules in those
//! realms:
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use specter_vm::{Agent, DefaultHostHooks, Options};
//!
//! let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
//! let realm = agent.create_realm();
//! let script = specter_ast::parse_script("1 + 1", false).unwrap();
//! let value = realm.evaluate_script(&agent, script).unwrap();
//! assert_eq!(value.to_display_string(&agent), "2");
//! ```

pub mod ecmascript;
mod engine;
mod heap;

pub use ecmascript::{
    execution::{
        Agent, DefaultHostHooks, EvaluationError, JsError, JsResult, Realm,
        agent::{HostHooks, InternalError, LoadedModule, Options, PromiseRejectionOperation},
    },
    types::Value,
};
