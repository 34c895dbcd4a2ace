// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)
//!
//! Numbers are host `f64` values. Only the operations whose ECMAScript
//! definition differs from IEEE 754 as implemented by Rust live here.

/// WhiteSpace and LineTerminator code points, as trimmed by StringToNumber
/// and `String.prototype.trim`.
pub(crate) fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}' | '\n' | '\r' | '\u{2028}'
            | '\u{2029}'
    ) || (c != '\u{85}' && !c.is_ascii() && c.is_whitespace())
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
pub(crate) fn string_to_number(value: &str) -> f64 {
    let trimmed = value.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }
    let bytes = trimmed.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => 16,
            b'o' | b'O' => 8,
            b'b' | b'B' => 2,
            _ => 0,
        };
        if radix != 0 {
            return parse_non_decimal_integer(&trimmed[2..], radix);
        }
    }
    let (sign, unsigned) = match bytes[0] {
        b'+' => (1.0, &trimmed[1..]),
        b'-' => (-1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if !is_str_unsigned_decimal_literal(unsigned) {
        return f64::NAN;
    }
    match fast_float::parse::<f64, _>(unsigned) {
        Ok(n) => sign * n,
        Err(_) => f64::NAN,
    }
}

fn parse_non_decimal_integer(digits: &str, radix: u32) -> f64 {
    let mut result = 0.0f64;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            return f64::NAN;
        };
        result = result * f64::from(radix) + f64::from(digit);
    }
    result
}

/// StrUnsignedDecimalLiteral without the `Infinity` alternative.
fn is_str_unsigned_decimal_literal(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    let integer_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digit_count = i - integer_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let fraction_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digit_count += i - fraction_start;
    }
    if digit_count == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return false;
        }
    }
    i == bytes.len()
}

/// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
/// with a radix of 10.
pub(crate) fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format_finite(value).to_owned()
}

/// Number::toString for radixes other than 10.
pub(crate) fn number_to_string_radix(value: f64, radix: u32) -> String {
    if radix == 10 || !value.is_finite() || value == 0.0 {
        return number_to_string(value);
    }
    let negative = value < 0.0;
    let value = value.abs();
    let mut integer = value.trunc();
    let mut fraction = value - integer;

    let mut integer_digits = Vec::new();
    if integer == 0.0 {
        integer_digits.push(b'0');
    }
    let radix_f = f64::from(radix);
    while integer >= 1.0 {
        let digit = (integer % radix_f) as u32;
        integer_digits.push(digit_char(digit));
        integer = (integer / radix_f).trunc();
    }
    integer_digits.reverse();

    let mut result = String::with_capacity(integer_digits.len() + 20);
    if negative {
        result.push('-');
    }
    result.push_str(&String::from_utf8_lossy(&integer_digits));
    if fraction > 0.0 {
        result.push('.');
        // Enough digits to distinguish any double in base 2.
        let mut remaining = 52;
        while fraction > 0.0 && remaining > 0 {
            fraction *= radix_f;
            let digit = fraction.trunc() as u32;
            result.push(char::from(digit_char(digit)));
            fraction -= f64::from(digit);
            remaining -= 1;
        }
    }
    result
}

fn digit_char(digit: u32) -> u8 {
    b"0123456789abcdefghijklmnopqrstuvwxyz"[digit as usize % 36]
}

/// ### [6.1.6.1.3 Number::exponentiate ( base, exponent )](https://tc39.es/ecma262/#sec-numeric-types-number-exponentiate)
pub(crate) fn exponentiate(base: f64, exponent: f64) -> f64 {
    // 1. If exponent is NaN, return NaN.
    if exponent.is_nan() {
        return f64::NAN;
    }
    // 2. If exponent is either +0𝔽 or -0𝔽, return 1𝔽.
    if exponent == 0.0 {
        return 1.0;
    }
    // 3. If base is NaN, return NaN.
    if base.is_nan() {
        return f64::NAN;
    }
    // If abs(ℝ(base)) = 1 and exponent is +∞𝔽 or -∞𝔽, return NaN.
    if base.abs() == 1.0 && exponent.is_infinite() {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// ### [6.1.6.1.14 Number::sameValue ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-number-sameValue)
pub(crate) fn same_value(x: f64, y: f64) -> bool {
    if x.is_nan() && y.is_nan() {
        return true;
    }
    x == y && x.is_sign_negative() == y.is_sign_negative()
}

/// ### [6.1.6.1.15 Number::sameValueZero ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-number-sameValueZero)
pub(crate) fn same_value_zero(x: f64, y: f64) -> bool {
    (x.is_nan() && y.is_nan()) || x == y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_number_grammar() {
        assert_eq!(string_to_number("  42\n"), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("5."), 5.0);
        assert_eq!(string_to_number("1e3"), 1000.0);
        assert!(string_to_number("-0").is_sign_negative());
        assert!(string_to_number("1_000").is_nan());
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("-0x10").is_nan());
        assert!(string_to_number("1e").is_nan());
        assert!(string_to_number(".").is_nan());
    }

    #[test]
    fn number_formatting() {
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(123e-20), "1.23e-18");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string_radix(255.0, 16), "ff");
        assert_eq!(number_to_string_radix(-10.0, 2), "-1010");
        assert_eq!(number_to_string_radix(0.5, 2), "0.1");
    }

    #[test]
    fn exponentiation_edge_cases() {
        assert!(exponentiate(1.0, f64::INFINITY).is_nan());
        assert!(exponentiate(-1.0, f64::NEG_INFINITY).is_nan());
        assert_eq!(exponentiate(f64::NAN, 0.0), 1.0);
        assert_eq!(exponentiate(2.0, 10.0), 1024.0);
    }

    #[test]
    fn same_value_distinguishes_zeros() {
        assert!(!same_value(0.0, -0.0));
        assert!(same_value(f64::NAN, f64::NAN));
        assert!(same_value_zero(0.0, -0.0));
    }
}
