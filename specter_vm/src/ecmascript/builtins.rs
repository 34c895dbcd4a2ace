// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # [10 Ordinary and Exotic Objects Behaviours](https://tc39.es/ecma262/#sec-ordinary-and-exotic-objects-behaviours)
//!
//! Every object lives in the agent heap as an [`ObjectHeapData`]: the
//! ordinary slots (prototype, extensibility, properties, private elements)
//! plus an [`ObjectKind`] holding the internal slots that make an object a
//! function, an array, a Proxy, a Promise, and so on.
//!
//! An object is _exotic_ when some of its internal methods differ from the
//! ordinary ones. The exotic kinds each have a newtype implementing
//! [`InternalMethods`] that overrides exactly the methods the specification
//! redefines, and forwards everything else to the ordinary algorithms in
//! [`ordinary`]. Objects that merely carry extra internal slots, like Maps
//! or Promises, are ordinary objects in this sense.
//!
//! The remaining modules follow the clause structure of ECMA-262 and define
//! the built-in objects of a realm.
//!
//! [`ObjectHeapData`]: crate::ecmascript::types::ObjectHeapData
//! [`ObjectKind`]: crate::ecmascript::types::ObjectKind
//! [`InternalMethods`]: crate::ecmascript::types::InternalMethods

pub(crate) mod arguments;
pub(crate) mod array;
pub(crate) mod bound_function;
pub(crate) mod builtin_function;
pub(crate) mod console_object;
pub(crate) mod control_abstraction_objects;
pub(crate) mod ecmascript_function;
pub(crate) mod fundamental_objects;
pub(crate) mod global_object;
pub(crate) mod indexed_collections;
pub(crate) mod keyed_collections;
pub(crate) mod module_namespace;
pub(crate) mod numbers_and_dates;
pub(crate) mod ordinary;
pub(crate) mod primitive_objects;
pub(crate) mod proxy;
pub(crate) mod reflection;
pub(crate) mod structured_data;
pub(crate) mod text_processing;
pub(crate) mod typed_array;

pub(crate) use builtin_function::{
    ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsic,
    BuiltinIntrinsicConstructor, behaviour_is_constructor,
};
