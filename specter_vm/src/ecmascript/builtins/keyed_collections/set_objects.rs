// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [24.2 Set Objects](https://tc39.es/ecma262/#sec-set-objects)
//!
//! Sets share the entry storage of Maps; every entry holds its value as
//! both key and value.

mod set_constructor;
mod set_iterator_prototype;
mod set_prototype;

pub(crate) use set_constructor::SetConstructor;
pub(crate) use set_iterator_prototype::SetIteratorPrototype;
pub(crate) use set_prototype::SetPrototype;
