// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.1 Number Objects](https://tc39.es/ecma262/#sec-number-objects)

mod number_constructor;
mod number_prototype;

pub(crate) use number_constructor::{NumberConstructor, number_constant};
pub(crate) use number_prototype::NumberPrototype;
