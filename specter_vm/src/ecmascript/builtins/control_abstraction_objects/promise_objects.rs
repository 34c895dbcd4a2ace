// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.2 Promise Objects](https://tc39.es/ecma262/#sec-promise-objects)

pub(crate) mod promise_abstract_operations;
pub(crate) mod promise_constructor;
pub(crate) mod promise_jobs;
pub(crate) mod promise_prototype;

use promise_abstract_operations::PromiseReactionRecord;

use crate::ecmascript::types::Value;

/// The internal slots of a Promise instance.
#[derive(Debug, Default)]
pub(crate) struct PromiseData {
    /// ### \[\[PromiseState\]\]
    pub(crate) state: PromiseState,
    /// ### \[\[PromiseIsHandled\]\]
    ///
    /// Whether the promise has ever had a fulfillment or rejection handler.
    pub(crate) is_handled: bool,
}

#[derive(Debug)]
pub(crate) enum PromiseState {
    Pending {
        /// ### \[\[PromiseFulfillReactions\]\]
        fulfill_reactions: Vec<PromiseReactionRecord>,
        /// ### \[\[PromiseRejectReactions\]\]
        reject_reactions: Vec<PromiseReactionRecord>,
        /// True once the promise was locked in to another promise or
        /// thenable by its internal resolution.
        is_resolved: bool,
    },
    Fulfilled(Value),
    Rejected(Value),
}

impl Default for PromiseState {
    fn default() -> Self {
        PromiseState::Pending {
            fulfill_reactions: Vec::new(),
            reject_reactions: Vec::new(),
            is_resolved: false,
        }
    }
}
