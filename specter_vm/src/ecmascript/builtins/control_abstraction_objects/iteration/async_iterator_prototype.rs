// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin},
    execution::{Agent, JsResult, Realm},
    types::{Symbol, Value},
};

/// ### [27.1.4 The %AsyncIteratorPrototype% Object](https://tc39.es/ecma262/#sec-asynciteratorprototype)
pub(crate) struct AsyncIteratorPrototype;

struct AsyncIteratorPrototypeAsyncIterator;
impl Builtin for AsyncIteratorPrototypeAsyncIterator {
    const NAME: &'static str = "[Symbol.asyncIterator]";
    const KEY: Option<Symbol> = Some(Symbol::ASYNC_ITERATOR);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(AsyncIteratorPrototype::async_iterator);
}

impl AsyncIteratorPrototype {
    /// ### [27.1.4.1 %AsyncIteratorPrototype% \[ %Symbol.asyncIterator% \] ( )](https://tc39.es/ecma262/#sec-asynciteratorprototype-asynciterator)
    fn async_iterator(_agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.async_iterator_prototype();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(1)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<AsyncIteratorPrototypeAsyncIterator>()
            .build();
    }
}
