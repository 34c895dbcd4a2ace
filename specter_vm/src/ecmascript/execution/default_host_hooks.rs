// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::agent::HostHooks;

/// Host hooks that use the default behaviour of every hook.
#[derive(Debug, Default)]
pub struct DefaultHostHooks;

impl HostHooks for DefaultHostHooks {}
