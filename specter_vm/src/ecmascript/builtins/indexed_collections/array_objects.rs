// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.1 Array Objects](https://tc39.es/ecma262/#sec-array-objects)

mod array_constructor;
mod array_prototype;

pub(crate) use array_constructor::ArrayConstructor;
pub(crate) use array_prototype::{ArrayPrototype, find_via_predicate, sort_values};
