// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::HeapString;
use crate::ecmascript::execution::Agent;

/// ### [6.1.5 The Symbol Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-symbol-type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub(crate) u32);

#[derive(Debug, Clone, Copy)]
pub(crate) struct SymbolHeapData {
    /// ### \[\[Description\]\]
    pub(crate) descriptor: Option<HeapString>,
}

impl Symbol {
    pub const ASYNC_ITERATOR: Symbol = Symbol(0);
    pub const HAS_INSTANCE: Symbol = Symbol(1);
    pub const IS_CONCAT_SPREADABLE: Symbol = Symbol(2);
    pub const ITERATOR: Symbol = Symbol(3);
    pub const MATCH: Symbol = Symbol(4);
    pub const MATCH_ALL: Symbol = Symbol(5);
    pub const REPLACE: Symbol = Symbol(6);
    pub const SEARCH: Symbol = Symbol(7);
    pub const SPECIES: Symbol = Symbol(8);
    pub const SPLIT: Symbol = Symbol(9);
    pub const TO_PRIMITIVE: Symbol = Symbol(10);
    pub const TO_STRING_TAG: Symbol = Symbol(11);
    pub const UNSCOPABLES: Symbol = Symbol(12);

    /// ### [6.1.5.1 Well-Known Symbols](https://tc39.es/ecma262/#sec-well-known-symbols)
    ///
    /// Indexed by the constants above.
    pub(crate) const WELL_KNOWN_DESCRIPTIONS: [&'static str; 13] = [
        "Symbol.asyncIterator",
        "Symbol.hasInstance",
        "Symbol.isConcatSpreadable",
        "Symbol.iterator",
        "Symbol.match",
        "Symbol.matchAll",
        "Symbol.replace",
        "Symbol.search",
        "Symbol.species",
        "Symbol.split",
        "Symbol.toPrimitive",
        "Symbol.toStringTag",
        "Symbol.unscopables",
    ];

    pub fn new(agent: &Agent, description: Option<HeapString>) -> Self {
        agent.heap_mut().create_symbol(description)
    }

    pub fn description(self, agent: &Agent) -> Option<HeapString> {
        agent.heap().symbols[self.0 as usize].descriptor
    }

    /// ### [20.4.3.3.1 SymbolDescriptiveString ( sym )](https://tc39.es/ecma262/#sec-symboldescriptivestring)
    pub fn descriptive_string(self, agent: &Agent) -> HeapString {
        // 1. Let desc be sym's [[Description]] value.
        // 2. If desc is undefined, set desc to the empty String.
        let description = self
            .description(agent)
            .map(|d| d.as_rc(agent))
            .unwrap_or_else(|| "".into());
        // 4. Return the string-concatenation of "Symbol(", desc, and ")".
        HeapString::from_str(agent, &format!("Symbol({description})"))
    }
}
