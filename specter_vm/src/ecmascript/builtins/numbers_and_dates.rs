// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [21 Numbers and Dates](https://tc39.es/ecma262/#sec-numbers-and-dates)

pub(crate) mod bigint_objects;
pub(crate) mod math_object;
pub(crate) mod number_objects;
