// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    execution::Agent,
    types::{HeapString, Symbol, Value},
};

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
///
/// A property key is a String or a Symbol. Strings that are array indices
/// (canonical numeric strings of integers in `0..2^32 - 1`) are stored as
/// integers so that their ordering in `[[OwnPropertyKeys]]` is cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Integer(u32),
    String(HeapString),
    Symbol(Symbol),
}

/// Largest array index is 2^32 - 2.
pub(crate) const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// Parse a canonical array index: no sign, no leading zeros, at most
/// 2^32 - 2.
pub(crate) fn parse_array_index(value: &str) -> Option<u32> {
    let bytes = value.as_bytes();
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }
    if bytes[0] == b'0' {
        return (bytes.len() == 1).then_some(0);
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let index: u64 = value.parse().ok()?;
    (index <= u64::from(MAX_ARRAY_INDEX)).then_some(index as u32)
}

impl PropertyKey {
    pub fn from_str(agent: &Agent, value: &str) -> Self {
        match parse_array_index(value) {
            Some(index) => PropertyKey::Integer(index),
            None => PropertyKey::String(HeapString::from_str(agent, value)),
        }
    }

    pub fn from_string(agent: &Agent, value: HeapString) -> Self {
        let index = parse_array_index(agent.heap().get_string(value));
        match index {
            Some(index) => PropertyKey::Integer(index),
            None => PropertyKey::String(value),
        }
    }

    pub fn from_index(agent: &Agent, index: u64) -> Self {
        match u32::try_from(index) {
            Ok(index) if index <= MAX_ARRAY_INDEX => PropertyKey::Integer(index),
            _ => PropertyKey::String(HeapString::from_str(agent, &index.to_string())),
        }
    }

    pub fn is_symbol(self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    pub fn as_array_index(self) -> Option<u32> {
        match self {
            PropertyKey::Integer(index) => Some(index),
            _ => None,
        }
    }

    /// The key as an ECMAScript language value.
    pub fn into_value(self, agent: &Agent) -> Value {
        match self {
            PropertyKey::Integer(index) => {
                Value::String(HeapString::from_str(agent, &index.to_string()))
            }
            PropertyKey::String(string) => Value::String(string),
            PropertyKey::Symbol(symbol) => Value::Symbol(symbol),
        }
    }

    /// Key as Rust text for error messages and function names. Symbols are
    /// rendered as `[description]`.
    pub fn to_display(self, agent: &Agent) -> String {
        match self {
            PropertyKey::Integer(index) => index.to_string(),
            PropertyKey::String(string) => string.to_rust_string(agent),
            PropertyKey::Symbol(symbol) => match symbol.description(agent) {
                Some(description) => format!("[{}]", description.as_rc(agent)),
                None => String::new(),
            },
        }
    }

    /// String key contents, if this is a String key.
    pub(crate) fn as_str_eq(self, agent: &Agent, expected: &str) -> bool {
        match self {
            PropertyKey::Integer(index) => parse_array_index(expected) == Some(index),
            PropertyKey::String(string) => &**agent.heap().get_string(string) == expected,
            PropertyKey::Symbol(_) => false,
        }
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_index_canonicalisation() {
        assert_eq!(parse_array_index("0"), Some(0));
        assert_eq!(parse_array_index("42"), Some(42));
        assert_eq!(parse_array_index("4294967294"), Some(u32::MAX - 1));
        assert_eq!(parse_array_index("4294967295"), None);
        assert_eq!(parse_array_index("01"), None);
        assert_eq!(parse_array_index("-1"), None);
        assert_eq!(parse_array_index("1.0"), None);
        assert_eq!(parse_array_index(""), None);
    }
}
