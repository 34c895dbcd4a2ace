// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use crate::ecmascript::{execution::Agent, types::HeapString};

/// ### [6.2.12 Private Names](https://tc39.es/ecma262/#sec-private-names)
///
/// The Private Name specification type is used to describe a globally unique
/// value (one which differs from any other Private Name, even if they are
/// otherwise indistinguishable) which represents the key of a private class
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrivateName(pub(crate) u32);

impl PrivateName {
    pub(crate) fn new(agent: &Agent, description: HeapString) -> Self {
        PrivateName(agent.heap_mut().create_private_name(description))
    }

    /// ### \[\[Description\]\]
    ///
    /// The identifier of the private name, including the leading `#`.
    pub fn description(self, agent: &Agent) -> HeapString {
        agent.heap().private_names[self.0 as usize]
    }
}

/// ### [9.2 PrivateEnvironment Records](https://tc39.es/ecma262/#sec-privateenvironment-records)
///
/// A PrivateEnvironment Record is a specification mechanism used to track
/// Private Names based upon the lexical nesting structure of ClassDeclarations
/// and ClassExpressions in ECMAScript code.
#[derive(Debug, Clone, Default)]
pub(crate) struct PrivateEnvironmentRecord {
    /// ### \[\[OuterPrivateEnvironment\]\]
    ///
    /// The PrivateEnvironment Record of the nearest containing class. null if
    /// the class with which this PrivateEnvironment Record is associated is
    /// not contained in any other class.
    pub(crate) outer_private_environment: Option<PrivateEnvironment>,

    /// ### \[\[Names\]\]
    ///
    /// The Private Names declared by this class, keyed by their
    /// identifiers.
    pub(crate) names: AHashMap<HeapString, PrivateName>,
}

/// Handle to a [`PrivateEnvironmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrivateEnvironment(pub(crate) u32);

/// ### [9.2.1.1 NewPrivateEnvironment ( outerPrivEnv )](https://tc39.es/ecma262/#sec-newprivateenvironment)
pub(crate) fn new_private_environment(
    agent: &Agent,
    outer_private_environment: Option<PrivateEnvironment>,
) -> PrivateEnvironment {
    // 1. Let names be a new empty List.
    // 2. Return the PrivateEnvironment Record {
    // [[OuterPrivateEnvironment]]: outerPrivEnv, [[Names]]: names }.
    agent
        .heap_mut()
        .environments
        .push_private_environment(PrivateEnvironmentRecord {
            outer_private_environment,
            names: AHashMap::default(),
        })
}

impl PrivateEnvironment {
    /// Add a Private Name for `identifier` unless one exists already.
    /// Getter and setter pairs share one name.
    pub(crate) fn add_private_name(self, agent: &Agent, identifier: HeapString) -> PrivateName {
        let existing = agent.heap().environments.private[self.0 as usize]
            .names
            .get(&identifier)
            .copied();
        if let Some(name) = existing {
            return name;
        }
        let name = PrivateName::new(agent, identifier);
        agent.heap_mut().environments.private[self.0 as usize]
            .names
            .insert(identifier, name);
        name
    }
}

/// ### [9.2.1.2 ResolvePrivateIdentifier ( privateEnv, identifier )](https://tc39.es/ecma262/#sec-resolve-private-identifier)
///
/// Returns `None` if no enclosing class declares the identifier, which only
/// happens in direct eval code; other code is rejected by the parser.
pub(crate) fn resolve_private_identifier(
    agent: &Agent,
    private_environment: Option<PrivateEnvironment>,
    identifier: HeapString,
) -> Option<PrivateName> {
    let heap = agent.heap();
    let mut current = private_environment;
    while let Some(environment) = current {
        let record = &heap.environments.private[environment.0 as usize];
        // 1. Let names be privateEnv.[[Names]].
        // 2. For each Private Name pn of names, do
        // a. If pn.[[Description]] is identifier, then
        if let Some(name) = record.names.get(&identifier) {
            // i. Return pn.
            return Some(*name);
        }
        // 3. Let outerPrivateEnvironment be privateEnv.[[OuterPrivateEnvironment]].
        // 4. Assert: outerPrivateEnvironment is not null.
        // 5. Return ResolvePrivateIdentifier(outerPrivateEnvironment, identifier).
        current = record.outer_private_environment;
    }
    None
}
