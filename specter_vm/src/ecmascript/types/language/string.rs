// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
//!
//! Strings are interned in the agent heap and stored as UTF-8. Indexing,
//! lengths and comparisons follow the String type's definition as a sequence
//! of UTF-16 code units. Lone surrogate code units cannot be represented and
//! are replaced by U+FFFD when a string is created from code units.

use std::rc::Rc;

use crate::ecmascript::execution::Agent;

/// Handle to an interned string. Equal handles mean equal contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapString(pub(crate) u32);

impl HeapString {
    pub fn from_str(agent: &Agent, value: &str) -> Self {
        agent.heap_mut().alloc_string(value)
    }

    pub fn from_code_units(agent: &Agent, units: &[u16]) -> Self {
        Self::from_str(agent, &String::from_utf16_lossy(units))
    }

    /// Contents of the string.
    pub fn as_rc(self, agent: &Agent) -> Rc<str> {
        agent.heap().get_string(self).clone()
    }

    pub fn to_rust_string(self, agent: &Agent) -> String {
        self.as_rc(agent).to_string()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent.heap().get_string(self).is_empty()
    }

    /// Length in UTF-16 code units.
    pub fn utf16_len(self, agent: &Agent) -> usize {
        utf16_len(agent.heap().get_string(self))
    }

    pub fn code_units(self, agent: &Agent) -> Vec<u16> {
        agent.heap().get_string(self).encode_utf16().collect()
    }

    /// Code unit at `index`, if in bounds.
    pub fn code_unit_at(self, agent: &Agent, index: usize) -> Option<u16> {
        agent.heap().get_string(self).encode_utf16().nth(index)
    }

    /// Substring between two code unit offsets.
    pub fn substring(self, agent: &Agent, start: usize, end: usize) -> Self {
        let units = self.code_units(agent);
        let end = end.min(units.len());
        let start = start.min(end);
        Self::from_code_units(agent, &units[start..end])
    }

    pub fn concat(agent: &Agent, parts: &[HeapString]) -> Self {
        let mut result = String::new();
        {
            let heap = agent.heap();
            for part in parts {
                result.push_str(heap.get_string(*part));
            }
        }
        Self::from_str(agent, &result)
    }
}

pub(crate) fn utf16_len(value: &str) -> usize {
    value.chars().map(char::len_utf16).sum()
}

/// ### [7.1.21 CanonicalNumericIndexString ( argument )](https://tc39.es/ecma262/#sec-canonicalnumericindexstring)
///
/// Returns the Number value of `value` if it is the canonical String form of
/// a Number.
pub(crate) fn canonical_numeric_index_string(value: &str) -> Option<f64> {
    // 1. If argument is "-0", return -0𝔽.
    if value == "-0" {
        return Some(-0.0);
    }
    // 2. Let n be ! ToNumber(argument).
    let n = super::number::string_to_number(value);
    // 3. If ! ToString(n) is argument, return n.
    if super::number::number_to_string(n) == value {
        return Some(n);
    }
    // 4. Return undefined.
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_lengths() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("\u{1F600}"), 2);
        assert_eq!(utf16_len(""), 0);
    }

    #[test]
    fn canonical_numeric_strings() {
        assert_eq!(canonical_numeric_index_string("1"), Some(1.0));
        assert_eq!(canonical_numeric_index_string("1.5"), Some(1.5));
        assert!(
            canonical_numeric_index_string("-0")
                .is_some_and(|n| n == 0.0 && n.is_sign_negative())
        );
        assert_eq!(canonical_numeric_index_string("01"), None);
        assert_eq!(canonical_numeric_index_string("1e3"), None);
        assert!(canonical_numeric_index_string("NaN").is_some_and(f64::is_nan));
    }
}
