// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use super::string_iterator_objects::{code_point_at, create_string_iterator};
#[cfg(feature = "regexp")]
use crate::ecmascript::{
    abstract_operations::operations_on_objects::invoke,
    builtins::text_processing::regexp_objects::reg_exp_create,
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{call_function, create_array_from_list, get, get_method},
        testing_and_comparison::{is_callable, is_reg_exp, require_object_coercible},
        type_conversion::{
            to_integer_or_infinity, to_length, to_number, to_string, to_uint32,
        },
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, primitive_objects::primitive_value},
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{HeapString, Object, ObjectKind, PropertyKey, Symbol, Value, is_js_whitespace},
};

/// Longest string, in code units, that the string builtins will create.
pub(crate) const MAX_STRING_LENGTH: usize = 1 << 30;

pub(crate) struct StringPrototype;

macro_rules! string_method {
    ($($builtin:ident, $name:literal, $length:literal, $function:ident;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = $length;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(StringPrototype::$function);
            }
        )*
    };
}

string_method! {
    StringPrototypeAt, "at", 1, at;
    StringPrototypeCharAt, "charAt", 1, char_at;
    StringPrototypeCharCodeAt, "charCodeAt", 1, char_code_at;
    StringPrototypeCodePointAt, "codePointAt", 1, code_point_at;
    StringPrototypeConcat, "concat", 1, concat;
    StringPrototypeEndsWith, "endsWith", 1, ends_with;
    StringPrototypeIncludes, "includes", 1, includes;
    StringPrototypeIndexOf, "indexOf", 1, index_of;
    StringPrototypeIsWellFormed, "isWellFormed", 0, is_well_formed;
    StringPrototypeLastIndexOf, "lastIndexOf", 1, last_index_of;
    StringPrototypeLocaleCompare, "localeCompare", 1, locale_compare;
    StringPrototypeNormalize, "normalize", 0, normalize;
    StringPrototypePadEnd, "padEnd", 1, pad_end;
    StringPrototypePadStart, "padStart", 1, pad_start;
    StringPrototypeRepeat, "repeat", 1, repeat;
    StringPrototypeReplace, "replace", 2, replace;
    StringPrototypeReplaceAll, "replaceAll", 2, replace_all;
    StringPrototypeSlice, "slice", 2, slice;
    StringPrototypeSplit, "split", 2, split;
    StringPrototypeStartsWith, "startsWith", 1, starts_with;
    StringPrototypeSubstring, "substring", 2, substring;
    StringPrototypeToLocaleLowerCase, "toLocaleLowerCase", 0, to_lower_case;
    StringPrototypeToLocaleUpperCase, "toLocaleUpperCase", 0, to_upper_case;
    StringPrototypeToLowerCase, "toLowerCase", 0, to_lower_case;
    StringPrototypeToString, "toString", 0, value_of;
    StringPrototypeToUpperCase, "toUpperCase", 0, to_upper_case;
    StringPrototypeToWellFormed, "toWellFormed", 0, to_well_formed;
    StringPrototypeTrim, "trim", 0, trim;
    StringPrototypeTrimEnd, "trimEnd", 0, trim_end;
    StringPrototypeTrimStart, "trimStart", 0, trim_start;
    StringPrototypeValueOf, "valueOf", 0, value_of;
}

#[cfg(feature = "regexp")]
string_method! {
    StringPrototypeMatch, "match", 1, r#match;
    StringPrototypeSearch, "search", 1, search;
}

#[cfg(feature = "annex-b")]
string_method! {
    StringPrototypeSubstr, "substr", 2, substr;
}

struct StringPrototypeIterator;
impl Builtin for StringPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<Symbol> = Some(Symbol::ITERATOR);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringPrototype::iterator);
}

/// ### [B.2.2.2.1 CreateHTML ( string, tag, attribute, value )](https://tc39.es/ecma262/#sec-createhtml)
/// methods.
#[cfg(feature = "annex-b")]
macro_rules! html_method {
    ($($builtin:ident, $name:literal, $tag:literal, $attribute:literal;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = if $attribute.is_empty() { 0 } else { 1 };
                const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments| {
                    create_html(agent, this_value, $tag, $attribute, arguments.get(0))
                });
            }
        )*
    };
}

#[cfg(feature = "annex-b")]
html_method! {
    StringPrototypeAnchor, "anchor", "a", "name";
    StringPrototypeBig, "big", "big", "";
    StringPrototypeBlink, "blink", "blink", "";
    StringPrototypeBold, "bold", "b", "";
    StringPrototypeFixed, "fixed", "tt", "";
    StringPrototypeFontcolor, "fontcolor", "font", "color";
    StringPrototypeFontsize, "fontsize", "font", "size";
    StringPrototypeItalics, "italics", "i", "";
    StringPrototypeLink, "link", "a", "href";
    StringPrototypeSmall, "small", "small", "";
    StringPrototypeStrike, "strike", "strike", "";
    StringPrototypeSub, "sub", "sub", "";
    StringPrototypeSup, "sup", "sup", "";
}

#[cfg(feature = "annex-b")]
fn create_html(
    agent: &Agent,
    this_value: Value,
    tag: &str,
    attribute: &str,
    value: Value,
) -> JsResult<Value> {
    // 1. Let str be ? RequireObjectCoercible(string).
    // 2. Let S be ? ToString(str).
    let s = coerce_this_string(agent, this_value)?.as_rc(agent);
    // 3. Let p1 be the string-concatenation of "<" and tag.
    let mut p1 = format!("<{tag}");
    // 4. If attribute is not the empty String, then
    if !attribute.is_empty() {
        // a. Let V be ? ToString(value).
        let v = to_string(agent, value)?.as_rc(agent);
        // b. Let escapedV be the String value that is the same as V except
        // that each occurrence of the code unit 0x0022 (QUOTATION MARK) in V
        // has been replaced with the six code unit sequence "&quot;".
        let escaped_v = v.replace('"', "&quot;");
        // c. Set p1 to the string-concatenation of p1, " ", attribute, "=\"",
        // escapedV and "\"".
        p1.push_str(&format!(" {attribute}=\"{escaped_v}\""));
    }
    // 5-8. Return p1 ">" S "</" tag ">".
    Ok(Value::from_string(agent, format!("{p1}>{s}</{tag}>")))
}

/// ? ToString(? RequireObjectCoercible(this value))
fn coerce_this_string(agent: &Agent, this_value: Value) -> JsResult<HeapString> {
    let o = require_object_coercible(agent, this_value)?;
    to_string(agent, o)
}

fn string_value(agent: &Agent, units: &[u16]) -> Value {
    Value::String(HeapString::from_code_units(agent, units))
}

/// Clamp an integer-or-infinity between 0 and `len`.
fn clamp_position(position: f64, len: usize) -> usize {
    position.clamp(0.0, len as f64) as usize
}

/// A relative index as taken by `slice`: negative values count from the
/// end.
fn relative_position(position: f64, len: usize) -> usize {
    if position < 0.0 {
        (len as f64 + position).max(0.0) as usize
    } else {
        position.min(len as f64) as usize
    }
}

/// ### [6.1.4.1 StringIndexOf ( string, searchValue, fromIndex )](https://tc39.es/ecma262/#sec-stringindexof)
pub(crate) fn string_index_of(
    string: &[u16],
    search_value: &[u16],
    from_index: usize,
) -> Option<usize> {
    // 1. Let len be the length of string.
    let len = string.len();
    // 2. If searchValue is the empty String and fromIndex ≤ len, return
    // fromIndex.
    if search_value.is_empty() {
        return (from_index <= len).then_some(from_index);
    }
    // 3. Let searchLen be the length of searchValue.
    // 4. For each integer i such that fromIndex ≤ i ≤ len - searchLen, in
    // ascending order, do
    //     a. Let candidate be the substring of string from i to i + searchLen.
    //     b. If candidate is searchValue, return i.
    // 5. Return NOT-FOUND.
    if from_index >= len {
        return None;
    }
    string[from_index..]
        .windows(search_value.len())
        .position(|candidate| candidate == search_value)
        .map(|offset| offset + from_index)
}

/// ### [22.1.3.19.1 GetSubstitution ( matched, str, position, captures, namedCaptures, replacementTemplate )](https://tc39.es/ecma262/#sec-getsubstitution)
///
/// `captures` holds Strings or undefined.
pub(crate) fn get_substitution(
    agent: &Agent,
    matched: &[u16],
    string: &[u16],
    position: usize,
    captures: &[Value],
    named_captures: Value,
    replacement_template: &[u16],
) -> JsResult<Vec<u16>> {
    const DOLLAR: u16 = b'$' as u16;
    let is_digit = |unit: u16| (u16::from(b'0')..=u16::from(b'9')).contains(&unit);
    // 1. Let stringLength be the length of str.
    let string_length = string.len();
    // 2. Assert: position ≤ stringLength.
    let position = position.min(string_length);
    // 3. Let result be the empty String.
    let mut result = Vec::with_capacity(replacement_template.len());
    // 4. Let templateRemainder be replacementTemplate.
    let mut remainder = replacement_template;
    // 5. Repeat, while templateRemainder is not the empty String,
    while let Some(&first) = remainder.first() {
        let next = remainder.get(1).copied();
        // a. NOTE: The following steps isolate ref (a prefix of
        // templateRemainder), determine refReplacement (its replacement),
        // and then append that replacement to result.
        let consumed = if first != DOLLAR || next.is_none() {
            // g. Else, let ref be the substring of templateRemainder from 0
            // to 1 and let refReplacement be ref.
            result.push(first);
            1
        } else {
            match next.map(u8::try_from) {
                // b. If templateRemainder starts with "$$", then let
                // refReplacement be "$".
                Some(Ok(b'$')) => {
                    result.push(DOLLAR);
                    2
                }
                // c. Else if templateRemainder starts with "$`", then let
                // refReplacement be the substring of str from 0 to position.
                Some(Ok(b'`')) => {
                    result.extend_from_slice(&string[..position]);
                    2
                }
                // d. Else if templateRemainder starts with "$&", then let
                // refReplacement be matched.
                Some(Ok(b'&')) => {
                    result.extend_from_slice(matched);
                    2
                }
                // e. Else if templateRemainder starts with "$'", then
                Some(Ok(b'\'')) => {
                    // i. Let matchLength be the length of matched.
                    // ii. Let tailPos be position + matchLength.
                    // iii. Let refReplacement be the substring of str from
                    // min(tailPos, stringLength).
                    let tail_pos = (position + matched.len()).min(string_length);
                    result.extend_from_slice(&string[tail_pos..]);
                    2
                }
                // f. Else if templateRemainder starts with "$" followed by 1
                // or more decimal digits, then
                Some(Ok(digit)) if digit.is_ascii_digit() => {
                    // i. If templateRemainder starts with "$" followed by 2 or
                    // more decimal digits, let digitCount be 2. Otherwise,
                    // let digitCount be 1.
                    let second = remainder.get(2).copied().filter(|unit| is_digit(*unit));
                    let one = usize::from(digit - b'0');
                    let captures_len = captures.len();
                    // iv. Let index be ℝ(StringToNumber(digits)).
                    // vi. If index > m and digitCount = 2, then set
                    // digitCount to 1 and index to the first digit.
                    let (index, digit_count) = match second {
                        Some(second) => {
                            let two = one * 10 + usize::from(second - u16::from(b'0'));
                            if two > captures_len { (one, 1) } else { (two, 2) }
                        }
                        None => (one, 1),
                    };
                    // viii. Let ref be the substring of templateRemainder
                    // from 0 to 1 + digitCount.
                    let reference = &remainder[..1 + digit_count];
                    // ix. If 1 ≤ index ≤ captureLen, then
                    if (1..=captures_len).contains(&index) {
                        // 1. Let capture be captures[index - 1].
                        // 2. If capture is undefined, then let refReplacement
                        // be the empty String.
                        // 3. Else, let refReplacement be capture.
                        if let Value::String(capture) = captures[index - 1] {
                            result.extend(capture.code_units(agent));
                        }
                    } else {
                        // x. Else, let refReplacement be ref.
                        result.extend_from_slice(reference);
                    }
                    1 + digit_count
                }
                // g. Else if templateRemainder starts with "$<", then
                Some(Ok(b'<')) => {
                    // i. Let gtPos be StringIndexOf(templateRemainder, ">", 0).
                    let gt_pos = string_index_of(remainder, &[u16::from(b'>')], 0);
                    match (gt_pos, named_captures) {
                        // ii. If gtPos is NOT-FOUND or namedCaptures is
                        // undefined, then let ref be "$<" and refReplacement
                        // be ref.
                        (None, _) | (_, Value::Undefined) => {
                            result.extend_from_slice(&remainder[..2]);
                            2
                        }
                        // iii. Else,
                        (Some(gt_pos), named_captures) => {
                            // 2. Let groupName be the substring of
                            // templateRemainder from 2 to gtPos.
                            let group_name = String::from_utf16_lossy(&remainder[2..gt_pos]);
                            // 3. Assert: namedCaptures is an Object.
                            let Value::Object(named_captures) = named_captures else {
                                return Err(agent.internal_error("named captures is not an object"));
                            };
                            // 4. Let capture be ? Get(namedCaptures,
                            // groupName).
                            let key = PropertyKey::from_str(agent, &group_name);
                            let capture = get(agent, named_captures, key)?;
                            // 5. If capture is undefined, then let
                            // refReplacement be the empty String.
                            // 6. Else, let refReplacement be ? ToString(capture).
                            if !capture.is_undefined() {
                                result.extend(to_string(agent, capture)?.code_units(agent));
                            }
                            gt_pos + 1
                        }
                    }
                }
                _ => {
                    result.push(first);
                    1
                }
            }
        };
        // i. Let refLength be the length of ref.
        // j. Set templateRemainder to the substring of templateRemainder
        // from refLength.
        remainder = &remainder[consumed..];
    }
    // 6. Return result.
    Ok(result)
}

/// Placement of the filler in `padStart` and `padEnd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Start,
    End,
}

impl StringPrototype {
    /// ### [22.1.3.1 String.prototype.at ( index )](https://tc39.es/ecma262/#sec-string.prototype.at)
    fn at(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? RequireObjectCoercible(this value).
        // 2. Let S be ? ToString(O).
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        // 3. Let len be the length of S.
        let len = s.len() as f64;
        // 4. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If relativeIndex ≥ 0, then let k be relativeIndex.
        // 6. Else, let k be len + relativeIndex.
        let k = if relative_index >= 0.0 { relative_index } else { len + relative_index };
        // 7. If k < 0 or k ≥ len, return undefined.
        if k < 0.0 || k >= len {
            return Ok(Value::Undefined);
        }
        // 8. Return the substring of S from k to k + 1.
        let k = k as usize;
        Ok(string_value(agent, &s[k..k + 1]))
    }

    /// ### [22.1.3.2 String.prototype.charAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.charat)
    fn char_at(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        // 3. Let position be ? ToIntegerOrInfinity(pos).
        let position = to_integer_or_infinity(agent, arguments.get(0))?;
        // 4. Let size be the length of S.
        // 5. If position < 0 or position ≥ size, return the empty String.
        if position < 0.0 || position >= s.len() as f64 {
            return Ok(Value::from_str(agent, ""));
        }
        // 6. Return the substring of S from position to position + 1.
        let position = position as usize;
        Ok(string_value(agent, &s[position..position + 1]))
    }

    /// ### [22.1.3.3 String.prototype.charCodeAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.charcodeat)
    fn char_code_at(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        let position = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If position < 0 or position ≥ size, return NaN.
        if position < 0.0 || position >= s.len() as f64 {
            return Ok(Value::Number(f64::NAN));
        }
        // 6. Return the Number value for the numeric value of the code unit at
        // index position within the String S.
        Ok(Value::from(u32::from(s[position as usize])))
    }

    /// ### [22.1.3.4 String.prototype.codePointAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.codepointat)
    fn code_point_at(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        let position = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If position < 0 or position ≥ size, return undefined.
        if position < 0.0 || position >= s.len() as f64 {
            return Ok(Value::Undefined);
        }
        // 6. Let cp be CodePointAt(S, position).
        // 7. Return 𝔽(cp.[[CodePoint]]).
        Ok(code_point_at(&s, position as usize)
            .map_or(Value::Undefined, |(code_point, _, _)| Value::from(code_point)))
    }

    /// ### [22.1.3.5 String.prototype.concat ( ...args )](https://tc39.es/ecma262/#sec-string.prototype.concat)
    fn concat(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 3. Let R be S.
        let mut r = vec![coerce_this_string(agent, this_value)?];
        // 4. For each element next of args, do
        for next in arguments.iter() {
            // a. Let nextString be ? ToString(next).
            // b. Set R to the string-concatenation of R and nextString.
            r.push(to_string(agent, *next)?);
        }
        // 5. Return R.
        Ok(Value::String(HeapString::concat(agent, &r)))
    }

    /// ### [22.1.3.7 String.prototype.endsWith ( searchString \[ , endPosition \] )](https://tc39.es/ecma262/#sec-string.prototype.endswith)
    fn ends_with(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        let search_string = arguments.get(0);
        // 3. Let isRegExp be ? IsRegExp(searchString).
        // 4. If isRegExp is true, throw a TypeError exception.
        if is_reg_exp(agent, search_string)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "First argument to String.prototype.endsWith must not be a regular expression",
            ));
        }
        // 5. Let searchStr be ? ToString(searchString).
        let search_str = to_string(agent, search_string)?.code_units(agent);
        // 6. Let len be the length of S.
        let len = s.len();
        // 7. If endPosition is undefined, let pos be len; else let pos be ?
        // ToIntegerOrInfinity(endPosition).
        let end_position = arguments.get(1);
        let end = if end_position.is_undefined() {
            len
        } else {
            // 8. Let end be the result of clamping pos between 0 and len.
            clamp_position(to_integer_or_infinity(agent, end_position)?, len)
        };
        // 10. If searchLength = 0, return true.
        // 11. Let start be end - searchLength.
        // 12. If start < 0, return false.
        // 13. Let substring be the substring of S from start to end.
        // 14. If substring is searchStr, return true.
        Ok(Value::Boolean(
            end.checked_sub(search_str.len())
                .is_some_and(|start| s[start..end] == search_str[..]),
        ))
    }

    /// ### [22.1.3.8 String.prototype.includes ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.includes)
    fn includes(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        let search_string = arguments.get(0);
        if is_reg_exp(agent, search_string)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "First argument to String.prototype.includes must not be a regular expression",
            ));
        }
        let search_str = to_string(agent, search_string)?.code_units(agent);
        // 6. Let pos be ? ToIntegerOrInfinity(position).
        // 9. Let start be the result of clamping pos between 0 and len.
        let start = clamp_position(to_integer_or_infinity(agent, arguments.get(1))?, s.len());
        // 10. Let index be StringIndexOf(S, searchStr, start).
        // 11. If index is NOT-FOUND, return false.
        Ok(Value::Boolean(string_index_of(&s, &search_str, start).is_some()))
    }

    /// ### [22.1.3.9 String.prototype.indexOf ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.indexof)
    fn index_of(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        // 3. Let searchStr be ? ToString(searchString).
        let search_str = to_string(agent, arguments.get(0))?.code_units(agent);
        // 4. Let pos be ? ToIntegerOrInfinity(position).
        // 7. Let start be the result of clamping pos between 0 and len.
        let start = clamp_position(to_integer_or_infinity(agent, arguments.get(1))?, s.len());
        // 8. Let result be StringIndexOf(S, searchStr, start).
        // 9. If result is NOT-FOUND, return -1𝔽.
        // 10. Return 𝔽(result).
        Ok(match string_index_of(&s, &search_str, start) {
            Some(index) => Value::from(index),
            None => Value::Number(-1.0),
        })
    }

    /// ### [22.1.3.10 String.prototype.isWellFormed ( )](https://tc39.es/ecma262/#sec-string.prototype.iswellformed)
    ///
    /// Strings never hold lone surrogates, so every string is well formed.
    fn is_well_formed(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        coerce_this_string(agent, this_value)?;
        Ok(Value::Boolean(true))
    }

    /// ### [22.1.3.11 String.prototype.lastIndexOf ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.lastindexof)
    fn last_index_of(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        // 3. Let searchStr be ? ToString(searchString).
        let search_str = to_string(agent, arguments.get(0))?.code_units(agent);
        // 4. Let numPos be ? ToNumber(position).
        let num_pos = to_number(agent, arguments.get(1))?;
        // 5. If numPos is NaN, let pos be +∞; otherwise, let pos be !
        // ToIntegerOrInfinity(numPos).
        let pos = if num_pos.is_nan() { f64::INFINITY } else { num_pos.trunc() };
        // 6. Let len be the length of S.
        let len = s.len();
        // 7. Let searchLen be the length of searchStr.
        let search_len = search_str.len();
        // 8. Let start be the result of clamping pos between 0 and len.
        let start = clamp_position(pos, len);
        // 9. If searchStr is the empty String, return 𝔽(start).
        if search_str.is_empty() {
            return Ok(Value::from(start));
        }
        // 10. For each integer i such that 0 ≤ i ≤ start, in descending
        // order, do
        //     a. Let candidate be the substring of S from i to i + searchLen.
        //     b. If candidate is searchStr, return 𝔽(i).
        let Some(last) = len.checked_sub(search_len) else {
            return Ok(Value::Number(-1.0));
        };
        let found = (0..=start.min(last))
            .rev()
            .find(|&i| s[i..i + search_len] == search_str[..]);
        // 11. Return -1𝔽.
        Ok(found.map_or(Value::Number(-1.0), Value::from))
    }

    /// ### [22.1.3.12 String.prototype.localeCompare ( that \[ , reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-string.prototype.localecompare)
    ///
    /// Compares by code point.
    fn locale_compare(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        // 3. Let thatValue be ? ToString(that).
        let that_value = to_string(agent, arguments.get(0))?.as_rc(agent);
        let ordering = s.nfc().cmp(that_value.nfc());
        Ok(Value::Number(match ordering {
            Ordering::Less => -1.0,
            Ordering::Equal => 0.0,
            Ordering::Greater => 1.0,
        }))
    }

    /// ### [22.1.3.13 String.prototype.match ( regexp )](https://tc39.es/ecma262/#sec-string.prototype.match)
    #[cfg(feature = "regexp")]
    fn r#match(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        regexp_dispatch(agent, this_value, arguments.get(0), Symbol::MATCH, Value::Undefined)
    }

    /// ### [22.1.3.15 String.prototype.normalize ( \[ form \] )](https://tc39.es/ecma262/#sec-string.prototype.normalize)
    fn normalize(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        // 3. If form is undefined, let f be "NFC".
        // 4. Else, let f be ? ToString(form).
        let form = arguments.get(0);
        let f = if form.is_undefined() {
            "NFC".into()
        } else {
            to_string(agent, form)?.as_rc(agent)
        };
        // 5. If f is not one of "NFC", "NFD", "NFKC", or "NFKD", throw a
        // RangeError exception.
        // 6. Let ns be the String value that is the result of normalizing S
        // into the normalization form named by f as specified in the latest
        // Unicode Standard, Normalization Forms.
        let ns: String = match &*f {
            "NFC" => s.nfc().collect(),
            "NFD" => s.nfd().collect(),
            "NFKC" => s.nfkc().collect(),
            "NFKD" => s.nfkd().collect(),
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    format!("The normalization form should be one of NFC, NFD, NFKC, NFKD, not {f}"),
                ));
            }
        };
        // 7. Return ns.
        Ok(Value::from_string(agent, ns))
    }

    /// ### [22.1.3.16 String.prototype.padEnd ( maxLength \[ , fillString \] )](https://tc39.es/ecma262/#sec-string.prototype.padend)
    fn pad_end(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 2. Return ? StringPaddingBuiltinsImpl(O, maxLength, fillString, END).
        string_padding_builtins_impl(agent, this_value, arguments, Placement::End)
    }

    /// ### [22.1.3.17 String.prototype.padStart ( maxLength \[ , fillString \] )](https://tc39.es/ecma262/#sec-string.prototype.padstart)
    fn pad_start(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        string_padding_builtins_impl(agent, this_value, arguments, Placement::Start)
    }

    /// ### [22.1.3.18 String.prototype.repeat ( count )](https://tc39.es/ecma262/#sec-string.prototype.repeat)
    fn repeat(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?;
        // 3. Let n be ? ToIntegerOrInfinity(count).
        let n = to_integer_or_infinity(agent, arguments.get(0))?;
        // 4. If n < 0 or n = +∞, throw a RangeError exception.
        if n < 0.0 || n == f64::INFINITY {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                format!("Invalid count value: {n}"),
            ));
        }
        // 5. If n = 0, return the empty String.
        let len = s.utf16_len(agent);
        if n == 0.0 || len == 0 {
            return Ok(Value::from_str(agent, ""));
        }
        if n * len as f64 > MAX_STRING_LENGTH as f64 {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Invalid string length",
            ));
        }
        // 6. Return the String value that is made from n copies of S appended
        // together.
        Ok(Value::from_string(agent, s.as_rc(agent).repeat(n as usize)))
    }

    /// ### [22.1.3.19 String.prototype.replace ( searchValue, replaceValue )](https://tc39.es/ecma262/#sec-string.prototype.replace)
    fn replace(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let search_value = arguments.get(0);
        let replace_value = arguments.get(1);
        // 1. Let O be ? RequireObjectCoercible(this value).
        let o = require_object_coercible(agent, this_value)?;
        // 2. If searchValue is neither undefined nor null, then
        if !search_value.is_nullish() {
            // a. Let replacer be ? GetMethod(searchValue, @@replace).
            let replacer = get_method(agent, search_value, PropertyKey::Symbol(Symbol::REPLACE))?;
            // b. If replacer is not undefined, then
            if let Some(replacer) = replacer {
                // i. Return ? Call(replacer, searchValue, « O, replaceValue »).
                return call_function(agent, replacer, search_value, &[o, replace_value]);
            }
        }
        // 3. Let string be ? ToString(O).
        let string = to_string(agent, o)?.code_units(agent);
        // 4. Let searchString be ? ToString(searchValue).
        let search_string = to_string(agent, search_value)?.code_units(agent);
        // 5. Let functionalReplace be IsCallable(replaceValue).
        // 6. If functionalReplace is false, then
        //     a. Set replaceValue to ? ToString(replaceValue).
        let replacer = Replacer::new(agent, replace_value)?;
        // 7. Let searchLength be the length of searchString.
        let search_length = search_string.len();
        // 8. Let position be StringIndexOf(string, searchString, 0).
        // 9. If position is NOT-FOUND, return string.
        let Some(position) = string_index_of(&string, &search_string, 0) else {
            return Ok(string_value(agent, &string));
        };
        // 10. Let preceding be the substring of string from 0 to position.
        // 11. Let following be the substring of string from position +
        // searchLength.
        // 12. If functionalReplace is true, then
        //     a. Let replacement be ? ToString(? Call(replaceValue,
        //     undefined, « searchString, 𝔽(position), string »)).
        // 13. Else,
        //     c. Let replacement be ! GetSubstitution(searchString, string,
        //     position, captures, undefined, replaceValue).
        let replacement = replacer.replacement(agent, &search_string, &string, position)?;
        // 14. Return the string-concatenation of preceding, replacement, and
        // following.
        let mut result = string[..position].to_vec();
        result.extend_from_slice(&replacement);
        result.extend_from_slice(&string[position + search_length..]);
        Ok(string_value(agent, &result))
    }

    /// ### [22.1.3.20 String.prototype.replaceAll ( searchValue, replaceValue )](https://tc39.es/ecma262/#sec-string.prototype.replaceall)
    fn replace_all(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let search_value = arguments.get(0);
        let replace_value = arguments.get(1);
        // 1. Let O be ? RequireObjectCoercible(this value).
        let o = require_object_coercible(agent, this_value)?;
        // 2. If searchValue is neither undefined nor null, then
        if !search_value.is_nullish() {
            // a. Let isRegExp be ? IsRegExp(searchValue).
            // b. If isRegExp is true, then
            if is_reg_exp(agent, search_value)?
                && let Value::Object(search_object) = search_value
            {
                // i. Let flags be ? Get(searchValue, "flags").
                let flags = get(agent, search_object, PropertyKey::from_str(agent, "flags"))?;
                // ii. Perform ? RequireObjectCoercible(flags).
                require_object_coercible(agent, flags)?;
                // iii. If ? ToString(flags) does not contain "g", throw a
                // TypeError exception.
                if !to_string(agent, flags)?.as_rc(agent).contains('g') {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "replaceAll must be called with a global RegExp",
                    ));
                }
            }
            // c. Let replacer be ? GetMethod(searchValue, @@replace).
            let replacer = get_method(agent, search_value, PropertyKey::Symbol(Symbol::REPLACE))?;
            // d. If replacer is not undefined, then
            if let Some(replacer) = replacer {
                // i. Return ? Call(replacer, searchValue, « O, replaceValue »).
                return call_function(agent, replacer, search_value, &[o, replace_value]);
            }
        }
        // 3. Let string be ? ToString(O).
        let string = to_string(agent, o)?.code_units(agent);
        // 4. Let searchString be ? ToString(searchValue).
        let search_string = to_string(agent, search_value)?.code_units(agent);
        // 5-6. functionalReplace
        let replacer = Replacer::new(agent, replace_value)?;
        // 7. Let searchLength be the length of searchString.
        let search_length = search_string.len();
        // 8. Let advanceBy be max(1, searchLength).
        let advance_by = search_length.max(1);
        // 9. Let matchPositions be a new empty List.
        let mut match_positions = Vec::new();
        // 10. Let position be StringIndexOf(string, searchString, 0).
        let mut position = string_index_of(&string, &search_string, 0);
        // 11. Repeat, while position is not NOT-FOUND,
        while let Some(p) = position {
            // a. Append position to matchPositions.
            match_positions.push(p);
            // b. Set position to StringIndexOf(string, searchString, position
            // + advanceBy).
            position = string_index_of(&string, &search_string, p + advance_by);
        }
        // 12. Let endOfLastMatch be 0.
        let mut end_of_last_match = 0;
        // 13. Let result be the empty String.
        let mut result = Vec::with_capacity(string.len());
        // 14. For each element p of matchPositions, do
        for p in match_positions {
            // a. Let preserved be the substring of string from endOfLastMatch
            // to p.
            result.extend_from_slice(&string[end_of_last_match..p]);
            // b-c. Let replacement be the functional or substituted
            // replacement.
            let replacement = replacer.replacement(agent, &search_string, &string, p)?;
            // d. Set result to the string-concatenation of result, preserved,
            // and replacement.
            result.extend_from_slice(&replacement);
            // e. Set endOfLastMatch to p + searchLength.
            end_of_last_match = p + search_length;
        }
        // 15. If endOfLastMatch < the length of string, then
        //     a. Set result to the string-concatenation of result and the
        //     substring of string from endOfLastMatch.
        if end_of_last_match < string.len() {
            result.extend_from_slice(&string[end_of_last_match..]);
        }
        // 16. Return result.
        Ok(string_value(agent, &result))
    }

    /// ### [22.1.3.21 String.prototype.search ( regexp )](https://tc39.es/ecma262/#sec-string.prototype.search)
    #[cfg(feature = "regexp")]
    fn search(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        regexp_dispatch(agent, this_value, arguments.get(0), Symbol::SEARCH, Value::Undefined)
    }

    /// ### [22.1.3.22 String.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-string.prototype.slice)
    fn slice(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        // 3. Let len be the length of S.
        let len = s.len();
        // 4. Let intStart be ? ToIntegerOrInfinity(start).
        // 5-7. Clamp relative to len.
        let from = relative_position(to_integer_or_infinity(agent, arguments.get(0))?, len);
        // 8. If end is undefined, let intEnd be len; else let intEnd be ?
        // ToIntegerOrInfinity(end).
        let end = arguments.get(1);
        let to = if end.is_undefined() {
            len
        } else {
            relative_position(to_integer_or_infinity(agent, end)?, len)
        };
        // 12. If from ≥ to, return the empty String.
        if from >= to {
            return Ok(Value::from_str(agent, ""));
        }
        // 13. Return the substring of S from from to to.
        Ok(string_value(agent, &s[from..to]))
    }

    /// ### [22.1.3.23 String.prototype.split ( separator, limit )](https://tc39.es/ecma262/#sec-string.prototype.split)
    fn split(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let separator = arguments.get(0);
        let limit = arguments.get(1);
        // 1. Let O be ? RequireObjectCoercible(this value).
        let o = require_object_coercible(agent, this_value)?;
        // 2. If separator is neither undefined nor null, then
        if !separator.is_nullish() {
            // a. Let splitter be ? GetMethod(separator, @@split).
            let splitter = get_method(agent, separator, PropertyKey::Symbol(Symbol::SPLIT))?;
            // b. If splitter is not undefined, then
            if let Some(splitter) = splitter {
                // i. Return ? Call(splitter, separator, « O, limit »).
                return call_function(agent, splitter, separator, &[o, limit]);
            }
        }
        // 3. Let S be ? ToString(O).
        let s = to_string(agent, o)?;
        // 4. If limit is undefined, let lim be 2**32 - 1; else let lim be
        // ℝ(? ToUint32(limit)).
        let lim = if limit.is_undefined() {
            u32::MAX
        } else {
            to_uint32(agent, limit)?
        } as usize;
        // 5. Let R be ? ToString(separator).
        let r = to_string(agent, separator)?.code_units(agent);
        // 6. If lim = 0, then
        if lim == 0 {
            // a. Return CreateArrayFromList(« »).
            return Ok(Value::Object(create_array_from_list(agent, &[])));
        }
        // 7. If separator is undefined, then
        if separator.is_undefined() {
            // a. Return CreateArrayFromList(« S »).
            return Ok(Value::Object(create_array_from_list(agent, &[Value::String(s)])));
        }
        let s_units = s.code_units(agent);
        // 8. Let separatorLength be the length of R.
        let separator_length = r.len();
        // 9. If separatorLength = 0, then
        if separator_length == 0 {
            // a. Let strLen be the length of S.
            // b. Let outLen be the result of clamping lim between 0 and
            // strLen.
            // c. Let head be the substring of S from 0 to outLen.
            // d. Let codeUnits be a List consisting of the sequence of code
            // units that are the elements of head.
            // e. Return CreateArrayFromList(codeUnits).
            let code_units: Vec<Value> = s_units
                .iter()
                .take(lim)
                .map(|unit| string_value(agent, &[*unit]))
                .collect();
            return Ok(Value::Object(create_array_from_list(agent, &code_units)));
        }
        // 10. If S is the empty String, return CreateArrayFromList(« S »).
        if s_units.is_empty() {
            return Ok(Value::Object(create_array_from_list(agent, &[Value::String(s)])));
        }
        // 11. Let substrings be a new empty List.
        let mut substrings = Vec::new();
        // 12. Let i be 0.
        let mut i = 0;
        // 13. Let j be StringIndexOf(S, R, 0).
        let mut j = string_index_of(&s_units, &r, 0);
        // 14. Repeat, while j is not NOT-FOUND,
        while let Some(found) = j {
            // a. Let T be the substring of S from i to j.
            // b. Append T to substrings.
            substrings.push(string_value(agent, &s_units[i..found]));
            // c. If the number of elements in substrings is lim, return
            // CreateArrayFromList(substrings).
            if substrings.len() == lim {
                return Ok(Value::Object(create_array_from_list(agent, &substrings)));
            }
            // d. Set i to j + separatorLength.
            i = found + separator_length;
            // e. Set j to StringIndexOf(S, R, i).
            j = string_index_of(&s_units, &r, i);
        }
        // 15. Let T be the substring of S from i.
        // 16. Append T to substrings.
        substrings.push(string_value(agent, &s_units[i..]));
        // 17. Return CreateArrayFromList(substrings).
        Ok(Value::Object(create_array_from_list(agent, &substrings)))
    }

    /// ### [22.1.3.24 String.prototype.startsWith ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.startswith)
    fn starts_with(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        let search_string = arguments.get(0);
        if is_reg_exp(agent, search_string)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "First argument to String.prototype.startsWith must not be a regular expression",
            ));
        }
        let search_str = to_string(agent, search_string)?.code_units(agent);
        // 7. If position is undefined, let pos be 0; else let pos be ?
        // ToIntegerOrInfinity(position).
        // 8. Let start be the result of clamping pos between 0 and len.
        let start = clamp_position(to_integer_or_infinity(agent, arguments.get(1))?, s.len());
        // 10. If searchLength = 0, return true.
        // 11. Let end be start + searchLength.
        // 12. If end > len, return false.
        // 13. Let substring be the substring of S from start to end.
        // 14. If substring is searchStr, return true.
        let end = start + search_str.len();
        Ok(Value::Boolean(end <= s.len() && s[start..end] == search_str[..]))
    }

    /// ### [22.1.3.25 String.prototype.substring ( start, end )](https://tc39.es/ecma262/#sec-string.prototype.substring)
    fn substring(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        let len = s.len();
        // 4. Let intStart be ? ToIntegerOrInfinity(start).
        let int_start = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If end is undefined, let intEnd be len; else let intEnd be ?
        // ToIntegerOrInfinity(end).
        let end = arguments.get(1);
        let int_end = if end.is_undefined() {
            len as f64
        } else {
            to_integer_or_infinity(agent, end)?
        };
        // 6. Let finalStart be the result of clamping intStart between 0 and
        // len.
        let final_start = clamp_position(int_start, len);
        // 7. Let finalEnd be the result of clamping intEnd between 0 and len.
        let final_end = clamp_position(int_end, len);
        // 8. Let from be min(finalStart, finalEnd).
        // 9. Let to be max(finalStart, finalEnd).
        let from = final_start.min(final_end);
        let to = final_start.max(final_end);
        // 10. Return the substring of S from from to to.
        Ok(string_value(agent, &s[from..to]))
    }

    /// ### [22.1.3.28 String.prototype.toLowerCase ( )](https://tc39.es/ecma262/#sec-string.prototype.tolowercase)
    fn to_lower_case(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        Ok(Value::from_string(agent, s.to_lowercase()))
    }

    /// ### [22.1.3.30 String.prototype.toUpperCase ( )](https://tc39.es/ecma262/#sec-string.prototype.touppercase)
    fn to_upper_case(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        Ok(Value::from_string(agent, s.to_uppercase()))
    }

    /// ### [22.1.3.31 String.prototype.toWellFormed ( )](https://tc39.es/ecma262/#sec-string.prototype.towellformed)
    fn to_well_formed(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        coerce_this_string(agent, this_value).map(Value::String)
    }

    /// ### [22.1.3.32 String.prototype.trim ( )](https://tc39.es/ecma262/#sec-string.prototype.trim)
    fn trim(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        Ok(Value::from_str(agent, s.trim_matches(is_js_whitespace)))
    }

    /// ### [22.1.3.33 String.prototype.trimEnd ( )](https://tc39.es/ecma262/#sec-string.prototype.trimend)
    fn trim_end(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        Ok(Value::from_str(agent, s.trim_end_matches(is_js_whitespace)))
    }

    /// ### [22.1.3.34 String.prototype.trimStart ( )](https://tc39.es/ecma262/#sec-string.prototype.trimstart)
    fn trim_start(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.as_rc(agent);
        Ok(Value::from_str(agent, s.trim_start_matches(is_js_whitespace)))
    }

    /// ### [22.1.3.35 String.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-string.prototype.valueof)
    ///
    /// Also `String.prototype.toString`, which has the same steps.
    fn value_of(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ThisStringValue(this value).
        this_string_value(agent, this_value).map(Value::String)
    }

    /// ### [22.1.3.36 String.prototype \[ %Symbol.iterator% \] ( )](https://tc39.es/ecma262/#sec-string.prototype-%symbol.iterator%)
    fn iterator(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? RequireObjectCoercible(this value).
        // 2. Let s be ? ToString(O).
        let s = coerce_this_string(agent, this_value)?;
        // 3-5. Return CreateIteratorFromClosure(closure,
        // "%StringIteratorPrototype%", %StringIteratorPrototype%).
        Ok(Value::Object(create_string_iterator(agent, s)))
    }

    /// ### [B.2.2.1 String.prototype.substr ( start, length )](https://tc39.es/ecma262/#sec-string.prototype.substr)
    #[cfg(feature = "annex-b")]
    fn substr(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = coerce_this_string(agent, this_value)?.code_units(agent);
        // 3. Let size be the length of S.
        let size = s.len();
        // 4. Let intStart be ? ToIntegerOrInfinity(start).
        // 5-7. Resolve intStart relative to size.
        let int_start = relative_position(to_integer_or_infinity(agent, arguments.get(0))?, size);
        // 8. If length is undefined, let intLength be size; otherwise let
        // intLength be ? ToIntegerOrInfinity(length).
        let length = arguments.get(1);
        let int_length = if length.is_undefined() {
            size
        } else {
            // 9. Set intLength to the result of clamping intLength between 0
            // and size.
            clamp_position(to_integer_or_infinity(agent, length)?, size)
        };
        // 10. Let intEnd be min(intStart + intLength, size).
        let int_end = (int_start + int_length).min(size);
        // 11. Return the substring of S from intStart to intEnd.
        Ok(string_value(agent, &s[int_start..int_end]))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.string_prototype();

        // The String prototype object is a String exotic object whose
        // [[StringData]] is the empty String and whose "length" is +0𝔽.
        let builder = OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_kind(ObjectKind::PrimitiveWrapper(Value::from_str(agent, "")))
            .with_prototype(intrinsics.object_prototype())
            .with_property_capacity(52)
            .with_property(|property| {
                property
                    .with_key(PropertyKey::from_str(agent, "length"))
                    .with_value_readonly(Value::from(0))
                    .with_enumerable(false)
                    .with_configurable(false)
                    .build()
            })
            .with_builtin_function_property::<StringPrototypeAt>()
            .with_builtin_function_property::<StringPrototypeCharAt>()
            .with_builtin_function_property::<StringPrototypeCharCodeAt>()
            .with_builtin_function_property::<StringPrototypeCodePointAt>()
            .with_builtin_function_property::<StringPrototypeConcat>()
            .with_constructor_property(intrinsics.string())
            .with_builtin_function_property::<StringPrototypeEndsWith>()
            .with_builtin_function_property::<StringPrototypeIncludes>()
            .with_builtin_function_property::<StringPrototypeIndexOf>()
            .with_builtin_function_property::<StringPrototypeIsWellFormed>()
            .with_builtin_function_property::<StringPrototypeLastIndexOf>()
            .with_builtin_function_property::<StringPrototypeLocaleCompare>();
        #[cfg(feature = "regexp")]
        let builder = builder.with_builtin_function_property::<StringPrototypeMatch>();
        let builder = builder
            .with_builtin_function_property::<StringPrototypeNormalize>()
            .with_builtin_function_property::<StringPrototypePadEnd>()
            .with_builtin_function_property::<StringPrototypePadStart>()
            .with_builtin_function_property::<StringPrototypeRepeat>()
            .with_builtin_function_property::<StringPrototypeReplace>()
            .with_builtin_function_property::<StringPrototypeReplaceAll>();
        #[cfg(feature = "regexp")]
        let builder = builder.with_builtin_function_property::<StringPrototypeSearch>();
        let builder = builder
            .with_builtin_function_property::<StringPrototypeSlice>()
            .with_builtin_function_property::<StringPrototypeSplit>()
            .with_builtin_function_property::<StringPrototypeStartsWith>()
            .with_builtin_function_property::<StringPrototypeSubstring>()
            .with_builtin_function_property::<StringPrototypeToLocaleLowerCase>()
            .with_builtin_function_property::<StringPrototypeToLocaleUpperCase>()
            .with_builtin_function_property::<StringPrototypeToLowerCase>()
            .with_builtin_function_property::<StringPrototypeToString>()
            .with_builtin_function_property::<StringPrototypeToUpperCase>()
            .with_builtin_function_property::<StringPrototypeToWellFormed>()
            .with_builtin_function_property::<StringPrototypeTrim>()
            .with_builtin_function_property::<StringPrototypeTrimEnd>()
            .with_builtin_function_property::<StringPrototypeTrimStart>()
            .with_builtin_function_property::<StringPrototypeValueOf>()
            .with_builtin_function_property::<StringPrototypeIterator>();
        #[cfg(feature = "annex-b")]
        let builder = builder
            .with_builtin_function_property::<StringPrototypeSubstr>()
            .with_builtin_function_property::<StringPrototypeAnchor>()
            .with_builtin_function_property::<StringPrototypeBig>()
            .with_builtin_function_property::<StringPrototypeBlink>()
            .with_builtin_function_property::<StringPrototypeBold>()
            .with_builtin_function_property::<StringPrototypeFixed>()
            .with_builtin_function_property::<StringPrototypeFontcolor>()
            .with_builtin_function_property::<StringPrototypeFontsize>()
            .with_builtin_function_property::<StringPrototypeItalics>()
            .with_builtin_function_property::<StringPrototypeLink>()
            .with_builtin_function_property::<StringPrototypeSmall>()
            .with_builtin_function_property::<StringPrototypeStrike>()
            .with_builtin_function_property::<StringPrototypeSub>()
            .with_builtin_function_property::<StringPrototypeSup>();
        let _this = builder.build();

        // B.2.2.15 String.prototype.trimLeft ( )
        // B.2.2.16 String.prototype.trimRight ( )
        // The initial values are %String.prototype.trimStart% and
        // %String.prototype.trimEnd%.
        #[cfg(feature = "annex-b")]
        for (alias, original) in [("trimLeft", "trimStart"), ("trimRight", "trimEnd")] {
            let original = PropertyKey::from_str(agent, original);
            if let Some(property) = _this.property_slot(agent, original) {
                _this.insert_property(agent, PropertyKey::from_str(agent, alias), property);
            }
        }
    }
}

/// A `replaceValue`: either a function or a replacement template.
enum Replacer {
    Function(Object),
    Template(Vec<u16>),
}

impl Replacer {
    fn new(agent: &Agent, replace_value: Value) -> JsResult<Self> {
        match replace_value {
            Value::Object(function) if is_callable(agent, replace_value) => {
                Ok(Replacer::Function(function))
            }
            _ => Ok(Replacer::Template(
                to_string(agent, replace_value)?.code_units(agent),
            )),
        }
    }

    /// The replacement of a plain string match of `matched` at `position`.
    fn replacement(
        &self,
        agent: &Agent,
        matched: &[u16],
        string: &[u16],
        position: usize,
    ) -> JsResult<Vec<u16>> {
        match self {
            Replacer::Function(function) => {
                let arguments = [
                    string_value(agent, matched),
                    Value::from(position),
                    string_value(agent, string),
                ];
                let replacement = call_function(agent, *function, Value::Undefined, &arguments)?;
                Ok(to_string(agent, replacement)?.code_units(agent))
            }
            Replacer::Template(template) => get_substitution(
                agent,
                matched,
                string,
                position,
                &[],
                Value::Undefined,
                template,
            ),
        }
    }
}

/// Shared steps of `match` and `search`: defer to the argument's method if
/// it has one, otherwise to a fresh RegExp built from it.
#[cfg(feature = "regexp")]
fn regexp_dispatch(
    agent: &Agent,
    this_value: Value,
    regexp: Value,
    symbol: Symbol,
    flags: Value,
) -> JsResult<Value> {
    // 1. Let O be ? RequireObjectCoercible(this value).
    let o = require_object_coercible(agent, this_value)?;
    // 2. If regexp is neither undefined nor null, then
    if !regexp.is_nullish() {
        // a. Let matcher be ? GetMethod(regexp, @@match).
        // b. If matcher is not undefined, then
        if let Some(matcher) = get_method(agent, regexp, PropertyKey::Symbol(symbol))? {
            // i. Return ? Call(matcher, regexp, « O »).
            return call_function(agent, matcher, regexp, &[o]);
        }
    }
    // 3. Let S be ? ToString(O).
    let s = to_string(agent, o)?;
    // 4. Let rx be ? RegExpCreate(regexp, undefined).
    let rx = reg_exp_create(agent, regexp, flags)?;
    // 5. Return ? Invoke(rx, @@match, « S »).
    invoke(agent, Value::Object(rx), PropertyKey::Symbol(symbol), &[Value::String(s)])
}

/// ### [22.1.3.17.1 StringPaddingBuiltinsImpl ( O, maxLength, fillString, placement )](https://tc39.es/ecma262/#sec-stringpaddingbuiltinsimpl)
fn string_padding_builtins_impl(
    agent: &Agent,
    this_value: Value,
    arguments: ArgumentsList,
    placement: Placement,
) -> JsResult<Value> {
    // 1. Let S be ? ToString(O).
    let s = coerce_this_string(agent, this_value)?;
    // 2. Let intMaxLength be ℝ(? ToLength(maxLength)).
    let int_max_length = to_length(agent, arguments.get(0))? as usize;
    // 3. Let stringLength be the length of S.
    let string_length = s.utf16_len(agent);
    // 4. If intMaxLength ≤ stringLength, return S.
    if int_max_length <= string_length {
        return Ok(Value::String(s));
    }
    // 5. If fillString is undefined, set fillString to the String value
    // consisting solely of the code unit 0x0020 (SPACE).
    // 6. Else, set fillString to ? ToString(fillString).
    let fill_string = arguments.get(1);
    let fill_string = if fill_string.is_undefined() {
        vec![u16::from(b' ')]
    } else {
        to_string(agent, fill_string)?.code_units(agent)
    };
    // 7. Return StringPad(S, intMaxLength, fillString, placement).
    // 2. If fillString is the empty String, return S.
    if fill_string.is_empty() {
        return Ok(Value::String(s));
    }
    if int_max_length > MAX_STRING_LENGTH {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid string length",
        ));
    }
    // 3. Let fillLen be maxLength - stringLength.
    let fill_len = int_max_length - string_length;
    // 4. Let truncatedStringFiller be the String value consisting of
    // repeated concatenations of fillString truncated to length fillLen.
    let filler = fill_string.iter().copied().cycle().take(fill_len);
    let units = s.code_units(agent);
    // 5. If placement is START, return the string-concatenation of
    // truncatedStringFiller and S.
    // 6. Else, return the string-concatenation of S and
    // truncatedStringFiller.
    let result: Vec<u16> = match placement {
        Placement::Start => filler.chain(units).collect(),
        Placement::End => units.into_iter().chain(filler).collect(),
    };
    Ok(string_value(agent, &result))
}

/// ### [22.1.3.35.1 ThisStringValue ( value )](https://tc39.es/ecma262/#sec-thisstringvalue)
fn this_string_value(agent: &Agent, value: Value) -> JsResult<HeapString> {
    // 2. If value is an Object and value has a [[StringData]] internal slot,
    // then
    //   a. Let s be value.[[StringData]].
    let value = match value {
        Value::Object(o) => primitive_value(agent, o).unwrap_or(value),
        _ => value,
    };
    match value {
        // 1. If value is a String, return value.
        Value::String(s) => Ok(s),
        // 3. Throw a TypeError exception.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "String.prototype method called on incompatible receiver",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{get_substitution, string_index_of};
    use crate::{
        ecmascript::{
            execution::{Agent, DefaultHostHooks, agent::Options},
            types::Value,
        },
        engine::evaluator::tests::run_to_string,
    };

    fn units(value: &str) -> Vec<u16> {
        value.encode_utf16().collect()
    }

    #[test]
    fn index_of_handles_empty_needles() {
        assert_eq!(string_index_of(&units("abc"), &units(""), 3), Some(3));
        assert_eq!(string_index_of(&units("abc"), &units(""), 4), None);
        assert_eq!(string_index_of(&units("abcabc"), &units("ca"), 0), Some(2));
        assert_eq!(string_index_of(&units("abc"), &units("c"), 3), None);
    }

    #[test]
    fn substitution_patterns() {
        let agent = Agent::new(Options::default(), std::rc::Rc::new(DefaultHostHooks));
        let string = units("hello world");
        let captures = [Value::from_str(&agent, "wor"), Value::Undefined];
        let substitute = |template: &str| {
            let result = get_substitution(
                &agent,
                &units("world"),
                &string,
                6,
                &captures,
                Value::Undefined,
                &units(template),
            )
            .unwrap();
            String::from_utf16(&result).unwrap()
        };
        assert_eq!(substitute("[$&]"), "[world]");
        assert_eq!(substitute("$`|$'"), "hello |");
        assert_eq!(substitute("$$1 $1 $2 $3 $01 $10"), "$1 wor  $3 wor wor0");
        assert_eq!(substitute("$<name> $"), "$<name> $");
    }

    #[test]
    fn searching() {
        assert_eq!(
            run_to_string(
                "var s = 'abcabc';
                 [s.indexOf('c'), s.indexOf('c', 3), s.lastIndexOf('c'), s.lastIndexOf('c', 4),
                  s.includes('ca'), s.startsWith('bc', 1), s.endsWith('ca', 4), s.endsWith('ab', 4), s.indexOf('')].join()"
            ),
            "2,5,5,2,true,true,true,false,0"
        );
        assert_eq!(
            run_to_string("try { 'a'.startsWith(/a/) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn slicing_by_code_unit() {
        assert_eq!(
            run_to_string(
                "var s = 'hello';
                 [s.slice(1, -1), s.slice(-2), s.substring(3, 1), s.at(-1),
                  s.charAt(9) === '', s.charCodeAt(0), '😀'.codePointAt(0), '😀'.length].join()"
            ),
            "ell,lo,el,o,true,104,128512,2"
        );
    }

    #[test]
    fn replacing_strings() {
        assert_eq!(
            run_to_string(
                "['aXbXc'.replace('X', '-'), 'aXbXc'.replaceAll('X', '[$&]'),
                  'abc'.replace('b', (m, p, s) => m.toUpperCase() + p + s.length),
                  'xx'.replaceAll('', '_'), 'abc'.replace('z', 'y')].join('|')"
            ),
            "a-bXc|a[X]b[X]c|aB13c|_x_x_|abc"
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn splitting() {
        assert_eq!(
            run_to_string(
                "JSON.stringify(['a,b,,c'.split(','), 'abc'.split(''), 'abc'.split(), ''.split(','),
                                 'a,b,c'.split(',', 2), 'ab'.split('', 1)])"
            ),
            r#"[["a","b","","c"],["a","b","c"],["abc"],[""],["a","b"],["a"]]"#
        );
    }

    #[test]
    fn padding_repeating_and_trimming() {
        assert_eq!(
            run_to_string(
                "['5'.padStart(3, '0'), 'ab'.padEnd(7, 'xyz'), 'a'.padStart(3), 'abc'.padEnd(2),
                  'ab'.repeat(3), '  x \\n'.trim() + '|', '  x '.trimStart() + '|',
                  '  x '.trimEnd() + '|'].join()"
            ),
            "005,abxyzxy,  a,abc,ababab,x|,x |,  x|"
        );
        assert_eq!(run_to_string("try { 'a'.repeat(-1) } catch (e) { e.name }"), "RangeError");
    }

    #[test]
    fn case_mapping_and_normalization() {
        assert_eq!(
            run_to_string(
                "['Straße'.toUpperCase(), 'ÀB'.toLowerCase(),
                  '\\u0041\\u030A'.normalize() === '\\u00C5', '\\u00C5'.normalize('NFD').length,
                  'a'.localeCompare('b'), 'b'.localeCompare('a'), 'a'.localeCompare('a')].join()"
            ),
            "STRASSE,àb,true,2,-1,1,0"
        );
        assert_eq!(
            run_to_string("try { 'a'.normalize('X') } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[cfg(feature = "annex-b")]
    #[test]
    fn annex_b_methods() {
        assert_eq!(
            run_to_string(
                "['hello'.substr(-3, 2), 'a'.bold(), 'a'.anchor('\"x\"'), String.prototype.trimLeft === String.prototype.trimStart].join()"
            ),
            "ll,<b>a</b>,<a name=\"&quot;x&quot;\">a</a>,true"
        );
    }

    #[test]
    fn receivers_and_wrappers() {
        assert_eq!(
            run_to_string(
                "[String.prototype.length, new String('ab').valueOf(), String.prototype.toString.call('x'),
                  Object.getPrototypeOf('') === String.prototype].join()"
            ),
            "0,ab,x,true"
        );
        assert_eq!(
            run_to_string("try { String.prototype.toString.call({}) } catch (e) { e.name }"),
            "TypeError"
        );
        assert_eq!(
            run_to_string("try { String.prototype.trim.call(null) } catch (e) { e.name }"),
            "TypeError"
        );
    }
}
