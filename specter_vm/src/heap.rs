// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena storage for every heap allocated engine entity.
//!
//! Values refer into the heap through `Copy` index handles. Nothing is ever
//! freed while the agent lives: an agent is a unit of isolation and is
//! dropped as a whole.

use std::rc::Rc;

use ahash::RandomState;
use hashbrown::HashMap;
use num_bigint::BigInt;

use crate::{
    ecmascript::{
        execution::{Environments, RealmRecord},
        scripts_and_modules::{module::ModuleRecord, script::ScriptRecord},
        types::{HeapBigInt, HeapString, Object, ObjectHeapData, Symbol, SymbolHeapData},
    },
    engine::coroutine::CoroutineRecord,
};

pub(crate) struct Heap {
    pub(crate) objects: Vec<ObjectHeapData>,
    strings: Vec<Rc<str>>,
    string_lookup: HashMap<Rc<str>, HeapString, RandomState>,
    pub(crate) symbols: Vec<SymbolHeapData>,
    pub(crate) bigints: Vec<BigInt>,
    pub(crate) environments: Environments,
    pub(crate) realms: Vec<RealmRecord>,
    pub(crate) coroutines: Vec<CoroutineRecord>,
    pub(crate) scripts: Vec<ScriptRecord>,
    pub(crate) modules: Vec<ModuleRecord>,
    /// Descriptions of the Private Names created by class definitions.
    pub(crate) private_names: Vec<HeapString>,
    /// ### \[\[GlobalSymbolRegistry\]\]
    ///
    /// Shared by all realms of the agent.
    pub(crate) global_symbol_registry: HashMap<HeapString, Symbol, RandomState>,
}

impl Heap {
    pub(crate) fn new() -> Self {
        let mut heap = Self {
            objects: Vec::with_capacity(1024),
            strings: Vec::with_capacity(1024),
            string_lookup: HashMap::with_capacity_and_hasher(1024, RandomState::new()),
            symbols: Vec::with_capacity(32),
            bigints: Vec::new(),
            environments: Environments::default(),
            realms: Vec::new(),
            coroutines: Vec::new(),
            scripts: Vec::new(),
            modules: Vec::new(),
            private_names: Vec::new(),
            global_symbol_registry: HashMap::with_hasher(RandomState::new()),
        };
        // Well-known symbols are allocated first so their handles are
        // constants shared by every realm of the agent.
        for description in Symbol::WELL_KNOWN_DESCRIPTIONS {
            let descriptor = heap.alloc_string(description);
            heap.symbols.push(SymbolHeapData {
                descriptor: Some(descriptor),
            });
        }
        heap
    }

    pub(crate) fn create_object(&mut self, data: ObjectHeapData) -> Object {
        let index = u32::try_from(self.objects.len()).unwrap_or(u32::MAX);
        self.objects.push(data);
        Object(index)
    }

    pub(crate) fn alloc_string(&mut self, value: &str) -> HeapString {
        if let Some(string) = self.string_lookup.get(value) {
            return *string;
        }
        let string = HeapString(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        let value: Rc<str> = Rc::from(value);
        self.strings.push(value.clone());
        self.string_lookup.insert(value, string);
        string
    }

    pub(crate) fn get_string(&self, string: HeapString) -> &Rc<str> {
        &self.strings[string.0 as usize]
    }

    pub(crate) fn create_symbol(&mut self, descriptor: Option<HeapString>) -> Symbol {
        let index = u32::try_from(self.symbols.len()).unwrap_or(u32::MAX);
        self.symbols.push(SymbolHeapData { descriptor });
        Symbol(index)
    }

    pub(crate) fn create_bigint(&mut self, value: BigInt) -> HeapBigInt {
        let index = u32::try_from(self.bigints.len()).unwrap_or(u32::MAX);
        self.bigints.push(value);
        HeapBigInt(index)
    }

    pub(crate) fn create_private_name(&mut self, description: HeapString) -> u32 {
        let index = u32::try_from(self.private_names.len()).unwrap_or(u32::MAX);
        self.private_names.push(description);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_interned() {
        let mut heap = Heap::new();
        let a = heap.alloc_string("length");
        let b = heap.alloc_string("length");
        let c = heap.alloc_string("name");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(&**heap.get_string(c), "name");
    }

    #[test]
    fn well_known_symbols_are_preallocated() {
        let heap = Heap::new();
        let descriptor = heap.symbols[Symbol::ITERATOR.0 as usize].descriptor.unwrap();
        assert_eq!(&**heap.get_string(descriptor), "Symbol.iterator");
    }
}
