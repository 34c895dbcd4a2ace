// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod completion;
mod property_descriptor;
mod reference;

pub(crate) use completion::{AbruptCompletion, Completion, CompletionValue, loop_continues};
pub use property_descriptor::PropertyDescriptor;
pub(crate) use reference::{
    Base, Reference, ReferencedName, get_this_value, get_value, initialize_referenced_binding,
    primitive_prototype, put_value,
};
