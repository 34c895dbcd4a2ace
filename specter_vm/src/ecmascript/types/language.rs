// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod bigint;
mod number;
mod object;
mod string;
mod symbol;
mod value;

pub use bigint::HeapBigInt;
pub(crate) use bigint::{
    BigIntOperation, MAX_BIGINT_BITS, bigint_binary, bigint_less_than, bigint_to_f64,
    compare_bigint_number, num_bigint_from_f64,
};
pub use object::{InternalMethods, Object, Property, PropertyKey, PropertyValue};
pub(crate) use object::{
    ExoticKind, ObjectHeapData, ObjectKind, PrivateElement, PrivateElementKind, PropertyStorage,
};
pub(crate) use number::{
    exponentiate, is_js_whitespace, number_to_string, number_to_string_radix,
    same_value as number_same_value, same_value_zero as number_same_value_zero,
    string_to_number,
};
pub use string::HeapString;
pub(crate) use string::canonical_numeric_index_string;
pub use symbol::Symbol;
pub(crate) use symbol::SymbolHeapData;
pub use value::{Numeric, Value};
