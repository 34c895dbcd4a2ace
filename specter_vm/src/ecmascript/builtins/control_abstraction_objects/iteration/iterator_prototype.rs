// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin},
    execution::{Agent, JsResult, Realm},
    types::{Symbol, Value},
};

/// ### [27.1.3 The %IteratorPrototype% Object](https://tc39.es/ecma262/#sec-%iteratorprototype%-object)
pub(crate) struct IteratorPrototype;

struct IteratorPrototypeIterator;
impl Builtin for IteratorPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<Symbol> = Some(Symbol::ITERATOR);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(IteratorPrototype::iterator);
}

impl IteratorPrototype {
    /// ### [27.1.3.1 %IteratorPrototype% \[ %Symbol.iterator% \] ( )](https://tc39.es/ecma262/#sec-%iteratorprototype%-%symbol.iterator%)
    fn iterator(_agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.iterator_prototype();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(1)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<IteratorPrototypeIterator>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn iterators_return_themselves() {
        assert_eq!(
            run_to_string(
                "var it = [][Symbol.iterator]();
                 var proto = Object.getPrototypeOf(Object.getPrototypeOf(it));
                 [it[Symbol.iterator]() === it, proto[Symbol.iterator].name].join()"
            ),
            "true,[Symbol.iterator]"
        );
    }
}
