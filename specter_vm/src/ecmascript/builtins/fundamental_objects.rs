// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # [20 Fundamental Objects](https://tc39.es/ecma262/#sec-fundamental-objects)

pub(crate) mod boolean_objects;
pub(crate) mod error_objects;
pub(crate) mod function_objects;
pub(crate) mod object_objects;
pub(crate) mod symbol_objects;
