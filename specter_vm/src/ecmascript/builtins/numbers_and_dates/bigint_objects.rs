// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.2 BigInt Objects](https://tc39.es/ecma262/#sec-bigint-objects)

mod bigint_constructor;
mod bigint_prototype;

pub(crate) use bigint_constructor::BigIntConstructor;
pub(crate) use bigint_prototype::BigIntPrototype;
