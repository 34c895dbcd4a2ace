// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.1 String Objects](https://tc39.es/ecma262/#sec-string-objects)

pub(crate) mod string_constructor;
pub(crate) mod string_iterator_objects;
pub(crate) mod string_prototype;
