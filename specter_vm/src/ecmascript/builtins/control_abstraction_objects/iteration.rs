// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.1 Iteration](https://tc39.es/ecma262/#sec-iteration)

mod async_from_sync_iterator_prototype;
mod async_iterator_prototype;
mod iterator_prototype;

pub(crate) use async_from_sync_iterator_prototype::AsyncFromSyncIteratorPrototype;
pub(crate) use async_iterator_prototype::AsyncIteratorPrototype;
pub(crate) use iterator_prototype::IteratorPrototype;
