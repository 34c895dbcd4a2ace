// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # [28 Reflection](https://tc39.es/ecma262/#sec-reflection)

mod proxy_constructor;
mod reflect_object;

pub(crate) use proxy_constructor::ProxyConstructor;
pub(crate) use reflect_object::ReflectObject;
