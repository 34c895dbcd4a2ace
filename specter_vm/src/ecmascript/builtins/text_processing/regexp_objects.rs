// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.2 RegExp (Regular Expression) Objects](https://tc39.es/ecma262/#sec-regexp-regular-expression-objects)
//!
//! Patterns are rewritten into the syntax of the `regex` crate and matched
//! with it. Backreferences and lookaround assertions have no counterpart
//! there and are rejected with a SyntaxError.

pub(crate) mod regexp_constructor;
pub(crate) mod regexp_prototype;

use std::{fmt, iter::Peekable, str::Chars};

use regex::{Regex, RegexBuilder};

use super::string_objects::string_iterator_objects::code_point_at;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call_function, create_array_from_list, create_data_property_or_throw, get, set,
        },
        testing_and_comparison::is_callable,
        type_conversion::{to_length, to_string},
    },
    builtins::ordinary::{ordinary_create_from_constructor, ordinary_object_create},
    execution::{Agent, JsResult, ProtoIntrinsics, agent::ExceptionType},
    types::{HeapString, Object, ObjectKind, Property, PropertyKey, Value},
};

/// The \[\[OriginalFlags\]\] of a RegExp, parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RegExpFlags {
    pub(crate) has_indices: bool,
    pub(crate) global: bool,
    pub(crate) ignore_case: bool,
    pub(crate) multiline: bool,
    pub(crate) dot_all: bool,
    pub(crate) unicode: bool,
    pub(crate) unicode_sets: bool,
    pub(crate) sticky: bool,
}

impl RegExpFlags {
    /// Parse a flags string. Unknown and repeated flags are rejected, as is
    /// combining `u` with `v`.
    pub(crate) fn parse(flags: &str) -> Option<Self> {
        let mut result = Self::default();
        for flag in flags.chars() {
            let slot = match flag {
                'd' => &mut result.has_indices,
                'g' => &mut result.global,
                'i' => &mut result.ignore_case,
                'm' => &mut result.multiline,
                's' => &mut result.dot_all,
                'u' => &mut result.unicode,
                'v' => &mut result.unicode_sets,
                'y' => &mut result.sticky,
                _ => return None,
            };
            if *slot {
                return None;
            }
            *slot = true;
        }
        if result.unicode && result.unicode_sets {
            return None;
        }
        Some(result)
    }

    /// Whether the pattern matches by code point rather than by code unit.
    pub(crate) fn full_unicode(self) -> bool {
        self.unicode || self.unicode_sets
    }
}

impl fmt::Display for RegExpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.has_indices, 'd'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
            (self.sticky, 'y'),
        ];
        for (_, flag) in flags.into_iter().filter(|(set, _)| *set) {
            write!(f, "{flag}")?;
        }
        Ok(())
    }
}

/// The internal slots of a RegExp instance.
#[derive(Debug)]
pub(crate) struct RegExpData {
    /// ### \[\[OriginalSource\]\]
    pub(crate) original_source: HeapString,
    /// ### \[\[OriginalFlags\]\]
    pub(crate) original_flags: RegExpFlags,
    /// ### \[\[RegExpMatcher\]\]
    pub(crate) matcher: Regex,
}

impl RegExpData {
    /// The `/source/flags` rendering used when inspecting a RegExp.
    pub(crate) fn display(&self, agent: &Agent) -> String {
        let source = self.original_source.as_rc(agent);
        format!("/{}/{}", escape_reg_exp_pattern(&source), self.original_flags)
    }
}

fn compile_pattern(pattern: &str, flags: RegExpFlags) -> Result<Regex, String> {
    let translated = translate_pattern(pattern, flags)?;
    RegexBuilder::new(&translated)
        .case_insensitive(flags.ignore_case)
        .multi_line(flags.multiline)
        .dot_matches_new_line(flags.dot_all)
        .build()
        .map_err(|error| error.to_string())
}

fn push_literal(out: &mut String, c: char) {
    let mut buffer = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buffer)));
}

fn is_quantifier_body(body: &str) -> bool {
    let (min, max) = body.split_once(',').unwrap_or((body, ""));
    !min.is_empty()
        && min.chars().all(|c| c.is_ascii_digit())
        && max.chars().all(|c| c.is_ascii_digit())
}

fn take_hex(chars: &mut Peekable<Chars<'_>>, count: usize) -> Option<u32> {
    let mut look = chars.clone();
    let mut value = 0;
    for _ in 0..count {
        value = value * 16 + look.next()?.to_digit(16)?;
    }
    *chars = look;
    Some(value)
}

/// Rewrite an ECMAScript pattern into `regex` crate syntax.
fn translate_pattern(source: &str, flags: RegExpFlags) -> Result<String, String> {
    let mut out = String::with_capacity(source.len() + 8);
    let mut chars = source.chars().peekable();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or("\\ at end of pattern")?;
                translate_escape(escaped, &mut chars, in_class, flags, &mut out)?;
            }
            '[' if !in_class => match (chars.peek().copied(), chars.clone().nth(1)) {
                // [^] matches every character and [] none.
                (Some('^'), Some(']')) => {
                    chars.nth(1);
                    out.push_str(r"[\s\S]");
                }
                (Some(']'), _) => {
                    chars.next();
                    out.push_str(r"[^\s\S]");
                }
                (Some('^'), _) => {
                    chars.next();
                    in_class = true;
                    out.push_str("[^");
                }
                _ => {
                    in_class = true;
                    out.push('[');
                }
            },
            '[' => out.push_str(r"\["),
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            ']' => out.push_str(r"\]"),
            '&' | '~' if in_class => {
                out.push('\\');
                out.push(c);
            }
            '-' if in_class && chars.peek() == Some(&'-') => {
                chars.next();
                out.push_str(r"-\-");
            }
            '.' if !in_class && !flags.dot_all => out.push_str(r"[^\n\r\x{2028}\x{2029}]"),
            '(' if !in_class && chars.peek() == Some(&'?') => {
                let mut look = chars.clone();
                look.next();
                match (look.next(), look.next()) {
                    (Some(':'), _) => out.push_str("(?:"),
                    (Some('<'), Some('=' | '!')) | (Some('=' | '!'), _) => {
                        return Err("lookaround assertions are not supported".into());
                    }
                    (Some('<'), _) => out.push_str("(?<"),
                    _ => return Err("invalid group".into()),
                }
                chars.nth(1);
            }
            '{' if !in_class => {
                let mut look = chars.clone();
                let mut body = String::new();
                while let Some(&next) = look.peek()
                    && (next.is_ascii_digit() || next == ',')
                {
                    body.push(next);
                    look.next();
                }
                if look.peek() == Some(&'}') && is_quantifier_body(&body) {
                    look.next();
                    chars = look;
                    out.push('{');
                    out.push_str(&body);
                    out.push('}');
                } else {
                    out.push_str(r"\{");
                }
            }
            '}' if !in_class => out.push_str(r"\}"),
            _ => out.push(c),
        }
    }
    if in_class {
        return Err("missing terminating ] for character class".into());
    }
    Ok(out)
}

fn translate_escape(
    escaped: char,
    chars: &mut Peekable<Chars<'_>>,
    in_class: bool,
    flags: RegExpFlags,
    out: &mut String,
) -> Result<(), String> {
    match escaped {
        'd' => out.push_str("[0-9]"),
        'D' => out.push_str("[^0-9]"),
        'w' => out.push_str("[0-9A-Za-z_]"),
        'W' => out.push_str("[^0-9A-Za-z_]"),
        's' => out.push_str(r"[\s\x{FEFF}]"),
        'S' => out.push_str(r"[^\s\x{FEFF}]"),
        'b' if in_class => out.push_str(r"\x08"),
        'b' | 'B' => {
            out.push('\\');
            out.push(escaped);
        }
        'n' | 'r' | 't' | 'f' | 'v' => {
            out.push('\\');
            out.push(escaped);
        }
        '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push_str(r"\x00"),
        '1'..='9' => return Err("backreferences are not supported".into()),
        'k' if chars.peek() == Some(&'<') => {
            return Err("backreferences are not supported".into());
        }
        'c' => match chars.peek().copied() {
            Some(letter) if letter.is_ascii_alphabetic() => {
                chars.next();
                out.push_str(&format!(r"\x{{{:X}}}", u32::from(letter) % 32));
            }
            _ => out.push_str(r"\\c"),
        },
        'x' => match take_hex(chars, 2) {
            Some(value) => out.push_str(&format!(r"\x{{{value:X}}}")),
            None => out.push('x'),
        },
        'u' => {
            let code_point = if flags.full_unicode() && chars.peek() == Some(&'{') {
                let mut look = chars.clone();
                look.next();
                let mut value: u32 = 0;
                let mut digits = 0;
                while let Some(digit) = look.peek().and_then(|c| c.to_digit(16)) {
                    value = value.saturating_mul(16).saturating_add(digit);
                    digits += 1;
                    look.next();
                }
                if digits == 0 || look.next() != Some('}') || value > 0x10FFFF {
                    return Err("invalid Unicode escape".into());
                }
                *chars = look;
                Some(value)
            } else {
                take_hex(chars, 4)
            };
            let Some(mut code_point) = code_point else {
                out.push('u');
                return Ok(());
            };
            // Join an escaped surrogate pair into one code point.
            if (0xD800..0xDC00).contains(&code_point) {
                let mut look = chars.clone();
                if look.next() == Some('\\')
                    && look.next() == Some('u')
                    && let Some(low) = take_hex(&mut look, 4)
                    && (0xDC00..0xE000).contains(&low)
                {
                    *chars = look;
                    code_point = 0x10000 + ((code_point - 0xD800) << 10) + (low - 0xDC00);
                }
            }
            match char::from_u32(code_point) {
                Some(c) => push_literal(out, c),
                None => return Err("lone surrogates are not supported".into()),
            }
        }
        'p' | 'P' if flags.full_unicode() => {
            out.push('\\');
            out.push(escaped);
        }
        _ => push_literal(out, escaped),
    }
    Ok(())
}

/// ### [22.2.6.13.1 EscapeRegExpPattern ( P, F )](https://tc39.es/ecma262/#sec-escaperegexppattern)
pub(crate) fn escape_reg_exp_pattern(source: &str) -> String {
    if source.is_empty() {
        return "(?:)".to_owned();
    }
    let mut escaped = String::with_capacity(source.len());
    let mut in_class = false;
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped.push('\\');
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
            }
            '/' if !in_class => escaped.push_str("\\/"),
            '[' => {
                in_class = true;
                escaped.push('[');
            }
            ']' => {
                in_class = false;
                escaped.push(']');
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// ### [22.2.3.1 RegExpCreate ( P, F )](https://tc39.es/ecma262/#sec-regexpcreate)
pub(crate) fn reg_exp_create(agent: &Agent, p: Value, f: Value) -> JsResult<Object> {
    // 1. Let obj be ! RegExpAlloc(%RegExp%).
    let obj = reg_exp_alloc(agent, agent.intrinsics().regexp())?;
    // 2. Return ? RegExpInitialize(obj, P, F).
    reg_exp_initialize(agent, obj, p, f)
}

/// ### [22.2.3.2 RegExpAlloc ( newTarget )](https://tc39.es/ecma262/#sec-regexpalloc)
pub(crate) fn reg_exp_alloc(agent: &Agent, new_target: Object) -> JsResult<Object> {
    // 1. Let obj be ? OrdinaryCreateFromConstructor(newTarget,
    // "%RegExp.prototype%", « [[OriginalSource]], [[OriginalFlags]],
    // [[RegExpRecord]], [[RegExpMatcher]] »).
    let obj =
        ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::RegExp,
            ObjectKind::Ordinary,
        )?;
    // 2. Perform ! DefinePropertyOrThrow(obj, "lastIndex", PropertyDescriptor
    // { [[Writable]]: true, [[Enumerable]]: false, [[Configurable]]: false }).
    obj.insert_property(
        agent,
        PropertyKey::from_str(agent, "lastIndex"),
        Property::data(Value::Undefined, true, false, false),
    );
    // 3. Return obj.
    Ok(obj)
}

/// ### [22.2.3.3 RegExpInitialize ( obj, pattern, flags )](https://tc39.es/ecma262/#sec-regexpinitialize)
pub(crate) fn reg_exp_initialize(
    agent: &Agent,
    obj: Object,
    pattern: Value,
    flags: Value,
) -> JsResult<Object> {
    // 1. If pattern is undefined, let P be the empty String.
    // 2. Else, let P be ? ToString(pattern).
    let p = if pattern.is_undefined() {
        HeapString::from_str(agent, "")
    } else {
        to_string(agent, pattern)?
    };
    // 3. If flags is undefined, let F be the empty String.
    // 4. Else, let F be ? ToString(flags).
    let f = if flags.is_undefined() {
        String::new()
    } else {
        to_string(agent, flags)?.as_rc(agent).to_string()
    };
    // 5. If F contains any code unit other than "d", "g", "i", "m", "s", "u",
    // "v", or "y", or if F contains any code unit more than once, throw a
    // SyntaxError exception.
    let Some(original_flags) = RegExpFlags::parse(&f) else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            format!("Invalid regular expression flags '{f}'"),
        ));
    };
    // 13. Let parseResult be ParsePattern(patternText, u, v).
    // 14. If parseResult is a non-empty List of SyntaxError objects, throw a
    // SyntaxError exception.
    // 21. Set obj.[[RegExpMatcher]] to CompilePattern of parseResult with
    // argument rer.
    let source = p.as_rc(agent);
    let matcher = compile_pattern(&source, original_flags).map_err(|message| {
        tracing::debug!(event = "regexp_rejected", pattern = %source, %message);
        agent.throw_exception(
            ExceptionType::SyntaxError,
            format!("Invalid regular expression: /{source}/{original_flags}: {message}"),
        )
    })?;
    // 16. Set obj.[[OriginalSource]] to P.
    // 17. Set obj.[[OriginalFlags]] to F.
    agent.object_mut(obj).kind = ObjectKind::RegExp(Box::new(RegExpData {
        original_source: p,
        original_flags,
        matcher,
    }));
    // 22. Perform ? Set(obj, "lastIndex", +0𝔽, true).
    set(agent, obj, PropertyKey::from_str(agent, "lastIndex"), Value::from(0), true)?;
    // 23. Return obj.
    Ok(obj)
}

/// The \[\[OriginalFlags\]\] of `o` if it is a RegExp instance.
pub(crate) fn reg_exp_flags(agent: &Agent, o: Object) -> Option<RegExpFlags> {
    match &agent.object(o).kind {
        ObjectKind::RegExp(data) => Some(data.original_flags),
        _ => None,
    }
}

/// ### [22.2.7.1 RegExpExec ( R, S )](https://tc39.es/ecma262/#sec-regexpexec)
pub(crate) fn reg_exp_exec(agent: &Agent, r: Object, s: HeapString) -> JsResult<Option<Object>> {
    // 1. Let exec be ? Get(R, "exec").
    let exec = get(agent, r, PropertyKey::from_str(agent, "exec"))?;
    // 2. If IsCallable(exec) is true, then
    if let Value::Object(exec) = exec
        && is_callable(agent, Value::Object(exec))
    {
        // a. Let result be ? Call(exec, R, « S »).
        let result = call_function(agent, exec, Value::Object(r), &[Value::String(s)])?;
        // b. If result is not an Object and result is not null, throw a
        // TypeError exception.
        // c. Return result.
        return match result {
            Value::Object(result) => Ok(Some(result)),
            Value::Null => Ok(None),
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "RegExp exec method returned something other than an Object or null",
            )),
        };
    }
    // 3. Perform ? RequireInternalSlot(R, [[RegExpMatcher]]).
    if reg_exp_flags(agent, r).is_none() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "RegExp exec called on incompatible receiver",
        ));
    }
    // 4. Return ? RegExpBuiltinExec(R, S).
    reg_exp_builtin_exec(agent, r, s)
}

/// Byte offset in `s` of the first character that starts at or after UTF-16
/// position `index`.
fn byte_offset_of(s: &str, index: usize) -> usize {
    let mut units = 0;
    for (offset, c) in s.char_indices() {
        if units >= index {
            return offset;
        }
        units += c.len_utf16();
    }
    s.len()
}

fn utf16_index_of(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset].encode_utf16().count()
}

/// ### [22.2.7.2 RegExpBuiltinExec ( R, S )](https://tc39.es/ecma262/#sec-regexpbuiltinexec)
pub(crate) fn reg_exp_builtin_exec(
    agent: &Agent,
    r: Object,
    s: HeapString,
) -> JsResult<Option<Object>> {
    let last_index_key = PropertyKey::from_str(agent, "lastIndex");
    // 1. Let length be the length of S.
    let input = s.as_rc(agent);
    let length = s.utf16_len(agent);
    // 2. Let lastIndex be ℝ(? ToLength(! Get(R, "lastIndex"))).
    let last_index = get(agent, r, last_index_key)?;
    let mut last_index = to_length(agent, last_index)? as usize;
    // 3. Let flags be R.[[OriginalFlags]].
    let (flags, matcher) = match &agent.object(r).kind {
        ObjectKind::RegExp(data) => (data.original_flags, data.matcher.clone()),
        _ => return Err(agent.internal_error("RegExpBuiltinExec on a non-RegExp")),
    };
    // 4. If flags contains "g", let global be true; else let global be false.
    // 5. If flags contains "y", let sticky be true; else let sticky be false.
    // 6. If flags contains "d", let hasIndices be true; else let hasIndices
    // be false.
    let global = flags.global;
    let sticky = flags.sticky;
    // 7. If global is false and sticky is false, set lastIndex to 0.
    if !global && !sticky {
        last_index = 0;
    }
    // 13. Repeat, while matchSucceeded is false,
    //     a. If lastIndex > length, then
    //         i. If global is true or sticky is true, then
    //             1. Perform ? Set(R, "lastIndex", +0𝔽, true).
    //         ii. Return null.
    //     b. Let inputIndex be the index into input of the character that was
    //     obtained from element lastIndex of S.
    //     c. Let r be matcher(input, inputIndex).
    //     d. If r is FAILURE, then
    //         i. If sticky is true, then ... Return null.
    //         ii. Set lastIndex to AdvanceStringIndex(S, lastIndex, fullUnicode).
    let input_index = byte_offset_of(&input, last_index);
    let captures = if last_index > length {
        None
    } else {
        matcher
            .captures_at(&input, input_index)
            .filter(|captures| !sticky || captures.get(0).is_some_and(|m| m.start() == input_index))
    };
    let Some(captures) = captures else {
        if global || sticky {
            set(agent, r, last_index_key, Value::from(0), true)?;
        }
        return Ok(None);
    };
    let Some(whole) = captures.get(0) else {
        return Err(agent.internal_error("regex match without a whole-match group"));
    };
    // 14. Let e be r.[[EndIndex]].
    // 15. If fullUnicode is true, set e to GetStringIndex(S, e).
    let match_index = utf16_index_of(&input, whole.start());
    let e = utf16_index_of(&input, whole.end());
    // 16. If global is true or sticky is true, then
    if global || sticky {
        // a. Perform ? Set(R, "lastIndex", 𝔽(e), true).
        set(agent, r, last_index_key, Value::from(e), true)?;
    }
    // 17. Let n be the number of elements in r.[[Captures]].
    // 20. Let A be ! ArrayCreate(n + 1).
    // 29. Perform ! CreateDataPropertyOrThrow(A, "0", matchedSubstr).
    // 32. For each integer i such that 1 ≤ i ≤ n, in ascending order, do
    //     a. Let captureI be ith element of r.[[Captures]].
    //     b. If captureI is undefined, let capturedValue be undefined.
    //     c. Else, let capturedValue be the substring of S from the capture.
    let mut captured_values = Vec::with_capacity(captures.len());
    let mut index_pairs = Vec::with_capacity(captures.len());
    for capture in captures.iter() {
        match capture {
            Some(capture) => {
                captured_values.push(Value::from_str(agent, capture.as_str()));
                index_pairs.push(Some((
                    utf16_index_of(&input, capture.start()),
                    utf16_index_of(&input, capture.end()),
                )));
            }
            None => {
                captured_values.push(Value::Undefined);
                index_pairs.push(None);
            }
        }
    }
    let a = create_array_from_list(agent, &captured_values);
    // 22. Perform ! CreateDataPropertyOrThrow(A, "index", 𝔽(lastIndex)).
    create_data_property_or_throw(
        agent,
        a,
        PropertyKey::from_str(agent, "index"),
        Value::from(match_index),
    )?;
    // 23. Perform ! CreateDataPropertyOrThrow(A, "input", S).
    create_data_property_or_throw(
        agent,
        a,
        PropertyKey::from_str(agent, "input"),
        Value::String(s),
    )?;
    // 30. If R contains any GroupName, then
    //     a. Let groups be OrdinaryObjectCreate(null).
    //     b. Let hasGroups be true.
    // 31. Perform ! CreateDataPropertyOrThrow(A, "groups", groups).
    let group_names: Vec<(usize, &str)> = matcher
        .capture_names()
        .enumerate()
        .filter_map(|(i, name)| name.map(|name| (i, name)))
        .collect();
    let groups = named_groups(agent, &group_names, |i| captured_values[i])?;
    create_data_property_or_throw(agent, a, PropertyKey::from_str(agent, "groups"), groups)?;
    // 33. If hasIndices is true, then
    if flags.has_indices {
        // a. Let indicesArray be MakeMatchIndicesIndexPairArray(S, indices,
        // groupNames, hasGroups).
        let pairs: Vec<Value> = index_pairs
            .iter()
            .map(|pair| match pair {
                Some((start, end)) => Value::Object(create_array_from_list(
                    agent,
                    &[Value::from(*start), Value::from(*end)],
                )),
                None => Value::Undefined,
            })
            .collect();
        let indices = create_array_from_list(agent, &pairs);
        let index_groups = named_groups(agent, &group_names, |i| pairs[i])?;
        create_data_property_or_throw(
            agent,
            indices,
            PropertyKey::from_str(agent, "groups"),
            index_groups,
        )?;
        // b. Perform ! CreateDataPropertyOrThrow(A, "indices", indicesArray).
        create_data_property_or_throw(
            agent,
            a,
            PropertyKey::from_str(agent, "indices"),
            Value::Object(indices),
        )?;
    }
    tracing::trace!(event = "regexp_matched", index = match_index, end = e);
    // 34. Return A.
    Ok(Some(a))
}

/// The `groups` object of a match: undefined without named groups, else a
/// null-prototype object mapping each name to `value_of(group index)`.
fn named_groups(
    agent: &Agent,
    group_names: &[(usize, &str)],
    value_of: impl Fn(usize) -> Value,
) -> JsResult<Value> {
    if group_names.is_empty() {
        return Ok(Value::Undefined);
    }
    let groups = ordinary_object_create(agent, None);
    for (i, name) in group_names {
        create_data_property_or_throw(
            agent,
            groups,
            PropertyKey::from_str(agent, name),
            value_of(*i),
        )?;
    }
    Ok(Value::Object(groups))
}

/// ### [22.2.7.3 AdvanceStringIndex ( S, index, unicode )](https://tc39.es/ecma262/#sec-advancestringindex)
pub(crate) fn advance_string_index(
    agent: &Agent,
    s: HeapString,
    index: usize,
    unicode: bool,
) -> usize {
    // 2. If unicode is false, return index + 1.
    if !unicode {
        return index + 1;
    }
    // 3. Let length be the length of S.
    let units = s.code_units(agent);
    // 4. If index + 1 ≥ length, return index + 1.
    if index + 1 >= units.len() {
        return index + 1;
    }
    // 5. Let cp be CodePointAt(S, index).
    // 6. Return index + cp.[[CodeUnitCount]].
    index + code_point_at(&units, index).map_or(1, |(_, count, _)| count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(pattern: &str, flags: &str) -> Result<String, String> {
        translate_pattern(pattern, RegExpFlags::parse(flags).unwrap())
    }

    #[test]
    fn flags_parse_and_print_canonically() {
        let flags = RegExpFlags::parse("ygi").unwrap();
        assert!(flags.global && flags.sticky && flags.ignore_case);
        assert_eq!(flags.to_string(), "giy");
        assert_eq!(RegExpFlags::parse("gg"), None);
        assert_eq!(RegExpFlags::parse("x"), None);
        assert_eq!(RegExpFlags::parse("uv"), None);
    }

    #[test]
    fn patterns_translate_to_regex_syntax() {
        assert_eq!(translate(r"\d+", "").unwrap(), "[0-9]+");
        assert_eq!(translate(".", "").unwrap(), r"[^\n\r\x{2028}\x{2029}]");
        assert_eq!(translate(".", "s").unwrap(), ".");
        assert_eq!(translate("a{2,}b{", "").unwrap(), r"a{2,}b\{");
        assert_eq!(translate("[^]", "").unwrap(), r"[\s\S]");
        assert_eq!(translate(r"[a&&b]", "").unwrap(), r"[a\&\&b]");
        assert_eq!(translate(r"A\/", "").unwrap(), "A/");
        assert_eq!(translate(r"😀", "").unwrap(), "😀");
        assert_eq!(translate(r"(?<year>\d{4})", "").unwrap(), "(?<year>[0-9]{4})");
        assert!(translate(r"(a)\1", "").is_err());
        assert!(translate("(?=a)", "").is_err());
        assert!(translate("[a", "").is_err());
    }

    #[test]
    fn compiled_patterns_follow_flags() {
        let regex = compile_pattern("^b", RegExpFlags::parse("im").unwrap()).unwrap();
        assert!(regex.is_match("a\nB"));
        let regex = compile_pattern("a.c", RegExpFlags::default()).unwrap();
        assert!(!regex.is_match("a\rc"));
    }

    #[test]
    fn patterns_escape_for_source() {
        assert_eq!(escape_reg_exp_pattern(""), "(?:)");
        assert_eq!(escape_reg_exp_pattern("a/b"), "a\\/b");
        assert_eq!(escape_reg_exp_pattern("[/]\\/"), "[/]\\/");
        assert_eq!(escape_reg_exp_pattern("\n"), "\\n");
    }

    #[test]
    fn utf16_offsets() {
        let s = "a😀b";
        assert_eq!(byte_offset_of(s, 1), 1);
        assert_eq!(byte_offset_of(s, 2), 5);
        assert_eq!(byte_offset_of(s, 3), 5);
        assert_eq!(byte_offset_of(s, 9), s.len());
        assert_eq!(utf16_index_of(s, 5), 3);
    }
}
