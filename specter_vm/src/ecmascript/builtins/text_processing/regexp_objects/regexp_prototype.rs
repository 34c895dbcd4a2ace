// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{
    RegExpFlags, advance_string_index, escape_reg_exp_pattern, reg_exp_builtin_exec,
    reg_exp_exec, reg_exp_flags,
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call_function, construct, create_array_from_list, get, length_of_array_like, set,
            species_constructor,
        },
        testing_and_comparison::{is_callable, same_value},
        type_conversion::{
            to_boolean, to_integer_or_infinity, to_length, to_object, to_string, to_uint32,
        },
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter,
        text_processing::string_objects::string_prototype::get_substitution,
    },
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{HeapString, Object, ObjectKind, PropertyKey, Symbol, Value},
};

pub(crate) struct RegExpPrototype;

struct RegExpPrototypeExec;
impl Builtin for RegExpPrototypeExec {
    const NAME: &'static str = "exec";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::exec);
}

struct RegExpPrototypeGetFlags;
impl Builtin for RegExpPrototypeGetFlags {
    const NAME: &'static str = "flags";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_flags);
}
impl BuiltinGetter for RegExpPrototypeGetFlags {}

struct RegExpPrototypeGetSource;
impl Builtin for RegExpPrototypeGetSource {
    const NAME: &'static str = "source";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_source);
}
impl BuiltinGetter for RegExpPrototypeGetSource {}

/// One getter per flag, each performing
/// [22.2.6.4.1 RegExpHasFlag ( R, codeUnit )](https://tc39.es/ecma262/#sec-regexphasflag).
macro_rules! flag_getter {
    ($($builtin:ident, $name:literal, $field:ident;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = 0;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _| {
                    reg_exp_has_flag(agent, this_value, $name, |flags| flags.$field)
                });
            }
            impl BuiltinGetter for $builtin {}
        )*
    };
}

flag_getter! {
    RegExpPrototypeGetDotAll, "dotAll", dot_all;
    RegExpPrototypeGetGlobal, "global", global;
    RegExpPrototypeGetHasIndices, "hasIndices", has_indices;
    RegExpPrototypeGetIgnoreCase, "ignoreCase", ignore_case;
    RegExpPrototypeGetMultiline, "multiline", multiline;
    RegExpPrototypeGetSticky, "sticky", sticky;
    RegExpPrototypeGetUnicode, "unicode", unicode;
    RegExpPrototypeGetUnicodeSets, "unicodeSets", unicode_sets;
}

struct RegExpPrototypeTest;
impl Builtin for RegExpPrototypeTest {
    const NAME: &'static str = "test";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::test);
}

struct RegExpPrototypeToString;
impl Builtin for RegExpPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::to_string);
}

struct RegExpPrototypeMatch;
impl Builtin for RegExpPrototypeMatch {
    const NAME: &'static str = "[Symbol.match]";
    const KEY: Option<Symbol> = Some(Symbol::MATCH);
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::r#match);
}

struct RegExpPrototypeReplace;
impl Builtin for RegExpPrototypeReplace {
    const NAME: &'static str = "[Symbol.replace]";
    const KEY: Option<Symbol> = Some(Symbol::REPLACE);
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::replace);
}

struct RegExpPrototypeSearch;
impl Builtin for RegExpPrototypeSearch {
    const NAME: &'static str = "[Symbol.search]";
    const KEY: Option<Symbol> = Some(Symbol::SEARCH);
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::search);
}

struct RegExpPrototypeSplit;
impl Builtin for RegExpPrototypeSplit {
    const NAME: &'static str = "[Symbol.split]";
    const KEY: Option<Symbol> = Some(Symbol::SPLIT);
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::split);
}

fn require_object(agent: &Agent, value: Value, method: &str) -> JsResult<Object> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "RegExp.prototype.{method} called on incompatible receiver {}",
                value.to_display_string(agent)
            ),
        )),
    }
}

/// ### [22.2.6.4.1 RegExpHasFlag ( R, codeUnit )](https://tc39.es/ecma262/#sec-regexphasflag)
fn reg_exp_has_flag(
    agent: &Agent,
    r: Value,
    name: &str,
    flag: impl FnOnce(RegExpFlags) -> bool,
) -> JsResult<Value> {
    // 1. If R is not an Object, throw a TypeError exception.
    let r = require_object(agent, r, name)?;
    // 2. If R does not have an [[OriginalFlags]] internal slot, then
    let Some(flags) = reg_exp_flags(agent, r) else {
        // a. If SameValue(R, %RegExp.prototype%) is true, return undefined.
        if r == agent.intrinsics().regexp_prototype() {
            return Ok(Value::Undefined);
        }
        // b. Otherwise, throw a TypeError exception.
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("RegExp.prototype.{name} getter called on a non-RegExp object"),
        ));
    };
    // 3-5. Return whether flags contains codeUnit.
    Ok(Value::Boolean(flag(flags)))
}

fn flags_string(agent: &Agent, rx: Object) -> JsResult<String> {
    let flags = get(agent, rx, PropertyKey::from_str(agent, "flags"))?;
    Ok(to_string(agent, flags)?.as_rc(agent).to_string())
}

fn last_index_key(agent: &Agent) -> PropertyKey {
    PropertyKey::from_str(agent, "lastIndex")
}

/// Advance `lastIndex` past an empty match so a global match loop makes
/// progress.
fn step_past_empty_match(
    agent: &Agent,
    rx: Object,
    s: HeapString,
    full_unicode: bool,
) -> JsResult<()> {
    // i. Let thisIndex be ℝ(? ToLength(? Get(rx, "lastIndex"))).
    let this_index = get(agent, rx, last_index_key(agent))?;
    let this_index = to_length(agent, this_index)? as usize;
    // ii. Let nextIndex be AdvanceStringIndex(S, thisIndex, fullUnicode).
    let next_index = advance_string_index(agent, s, this_index, full_unicode);
    // iii. Perform ? Set(rx, "lastIndex", 𝔽(nextIndex), true).
    set(agent, rx, last_index_key(agent), Value::from(next_index), true)
}

fn matched_string(agent: &Agent, result: Object) -> JsResult<HeapString> {
    let matched = get(agent, result, PropertyKey::from_index(agent, 0))?;
    to_string(agent, matched)
}

impl RegExpPrototype {
    /// ### [22.2.6.2 RegExp.prototype.exec ( string )](https://tc39.es/ecma262/#sec-regexp.prototype.exec)
    fn exec(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let R be the this value.
        // 2. Perform ? RequireInternalSlot(R, [[RegExpMatcher]]).
        let r = match this_value {
            Value::Object(r) if reg_exp_flags(agent, r).is_some() => r,
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!(
                        "RegExp.prototype.exec called on incompatible receiver {}",
                        this_value.to_display_string(agent)
                    ),
                ));
            }
        };
        // 3. Let S be ? ToString(string).
        let s = to_string(agent, arguments.get(0))?;
        // 4. Return ? RegExpBuiltinExec(R, S).
        Ok(reg_exp_builtin_exec(agent, r, s)?.map_or(Value::Null, Value::Object))
    }

    /// ### [22.2.6.4 get RegExp.prototype.flags](https://tc39.es/ecma262/#sec-get-regexp.prototype.flags)
    fn get_flags(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let R be the this value.
        // 2. If R is not an Object, throw a TypeError exception.
        let r = require_object(agent, this_value, "flags")?;
        // 3. Let codeUnits be a new empty List.
        let mut code_units = String::new();
        // 4-19. For each flag property in order, if ToBoolean(? Get(R, name))
        // is true, append its code unit.
        for (name, flag) in [
            ("hasIndices", 'd'),
            ("global", 'g'),
            ("ignoreCase", 'i'),
            ("multiline", 'm'),
            ("dotAll", 's'),
            ("unicode", 'u'),
            ("unicodeSets", 'v'),
            ("sticky", 'y'),
        ] {
            let value = get(agent, r, PropertyKey::from_str(agent, name))?;
            if to_boolean(agent, value) {
                code_units.push(flag);
            }
        }
        // 20. Return the String value whose code units are the elements of
        // the List codeUnits.
        Ok(Value::from_string(agent, code_units))
    }

    /// ### [22.2.6.13 get RegExp.prototype.source](https://tc39.es/ecma262/#sec-get-regexp.prototype.source)
    fn get_source(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let R be the this value.
        // 2. If R is not an Object, throw a TypeError exception.
        let r = require_object(agent, this_value, "source")?;
        // 3. If R does not have an [[OriginalSource]] internal slot, then
        let source = match &agent.object(r).kind {
            ObjectKind::RegExp(data) => Some(data.original_source),
            _ => None,
        };
        let Some(source) = source else {
            // a. If SameValue(R, %RegExp.prototype%) is true, return "(?:)".
            if r == agent.intrinsics().regexp_prototype() {
                return Ok(Value::from_str(agent, "(?:)"));
            }
            // b. Otherwise, throw a TypeError exception.
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "RegExp.prototype.source getter called on a non-RegExp object",
            ));
        };
        // 4. Assert: R has an [[OriginalFlags]] internal slot.
        // 5. Let src be R.[[OriginalSource]].
        // 6. Let flags be R.[[OriginalFlags]].
        // 7. Return EscapeRegExpPattern(src, flags).
        let escaped = escape_reg_exp_pattern(&source.as_rc(agent));
        Ok(Value::from_string(agent, escaped))
    }

    /// ### [22.2.6.16 RegExp.prototype.test ( S )](https://tc39.es/ecma262/#sec-regexp.prototype.test)
    fn test(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let R be the this value.
        // 2. If R is not an Object, throw a TypeError exception.
        let r = require_object(agent, this_value, "test")?;
        // 3. Let string be ? ToString(S).
        let string = to_string(agent, arguments.get(0))?;
        // 4. Let match be ? RegExpExec(R, string).
        // 5. If match is not null, return true; else return false.
        Ok(Value::Boolean(reg_exp_exec(agent, r, string)?.is_some()))
    }

    /// ### [22.2.6.17 RegExp.prototype.toString ( )](https://tc39.es/ecma262/#sec-regexp.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let R be the this value.
        // 2. If R is not an Object, throw a TypeError exception.
        let r = require_object(agent, this_value, "toString")?;
        // 3. Let pattern be ? ToString(? Get(R, "source")).
        let pattern = get(agent, r, PropertyKey::from_str(agent, "source"))?;
        let pattern = to_string(agent, pattern)?.as_rc(agent);
        // 4. Let flags be ? ToString(? Get(R, "flags")).
        let flags = flags_string(agent, r)?;
        // 5. Let result be the string-concatenation of "/", pattern, "/", and
        // flags.
        // 6. Return result.
        Ok(Value::from_string(agent, format!("/{pattern}/{flags}")))
    }

    /// ### [22.2.6.8 RegExp.prototype \[ %Symbol.match% \] ( string )](https://tc39.es/ecma262/#sec-regexp.prototype-%symbol.match%)
    fn r#match(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let rx be the this value.
        // 2. If rx is not an Object, throw a TypeError exception.
        let rx = require_object(agent, this_value, "[Symbol.match]")?;
        // 3. Let S be ? ToString(string).
        let s = to_string(agent, arguments.get(0))?;
        // 4. Let flags be ? ToString(? Get(rx, "flags")).
        let flags = flags_string(agent, rx)?;
        // 5. If flags does not contain "g", then
        if !flags.contains('g') {
            // a. Return ? RegExpExec(rx, S).
            return Ok(reg_exp_exec(agent, rx, s)?.map_or(Value::Null, Value::Object));
        }
        // 6. Else,
        // a. If flags contains "u" or flags contains "v", let fullUnicode be
        // true. Otherwise, let fullUnicode be false.
        let full_unicode = flags.contains('u') || flags.contains('v');
        // b. Perform ? Set(rx, "lastIndex", +0𝔽, true).
        set(agent, rx, last_index_key(agent), Value::from(0), true)?;
        // c. Let A be ! ArrayCreate(0).
        let mut a = Vec::new();
        // e. Repeat,
        loop {
            // i. Let result be ? RegExpExec(rx, S).
            // ii. If result is null, then
            let Some(result) = reg_exp_exec(agent, rx, s)? else {
                // 1. If n = 0, return null.
                // 2. Return A.
                return Ok(if a.is_empty() {
                    Value::Null
                } else {
                    Value::Object(create_array_from_list(agent, &a))
                });
            };
            // iii. Else,
            // 1. Let matchStr be ? ToString(? Get(result, "0")).
            let match_str = matched_string(agent, result)?;
            // 2. Perform ! CreateDataPropertyOrThrow(A, ! ToString(𝔽(n)),
            // matchStr).
            a.push(Value::String(match_str));
            // 3. If matchStr is the empty String, then
            if match_str.utf16_len(agent) == 0 {
                step_past_empty_match(agent, rx, s, full_unicode)?;
            }
        }
    }

    /// ### [22.2.6.11 RegExp.prototype \[ %Symbol.replace% \] ( string, replaceValue )](https://tc39.es/ecma262/#sec-regexp.prototype-%symbol.replace%)
    fn replace(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut replace_value = arguments.get(1);
        // 1. Let rx be the this value.
        // 2. If rx is not an Object, throw a TypeError exception.
        let rx = require_object(agent, this_value, "[Symbol.replace]")?;
        // 3. Let S be ? ToString(string).
        let s = to_string(agent, arguments.get(0))?;
        let s_units = s.code_units(agent);
        // 4. Let lengthS be the length of S.
        let length_s = s_units.len();
        // 5. Let functionalReplace be IsCallable(replaceValue).
        let functional_replace = is_callable(agent, replace_value);
        // 6. If functionalReplace is false, then
        if !functional_replace {
            // a. Set replaceValue to ? ToString(replaceValue).
            replace_value = Value::String(to_string(agent, replace_value)?);
        }
        // 7. Let flags be ? ToString(? Get(rx, "flags")).
        let flags = flags_string(agent, rx)?;
        // 8. If flags contains "g", let global be true. Otherwise, let global
        // be false.
        let global = flags.contains('g');
        // 9. If global is true, then
        let full_unicode = flags.contains('u') || flags.contains('v');
        if global {
            // b. Perform ? Set(rx, "lastIndex", +0𝔽, true).
            set(agent, rx, last_index_key(agent), Value::from(0), true)?;
        }
        // 10. Let results be a new empty List.
        let mut results = Vec::new();
        // 11. Let done be false.
        // 12. Repeat, while done is false,
        //     a. Let result be ? RegExpExec(rx, S).
        //     b. If result is null, set done to true.
        while let Some(result) = reg_exp_exec(agent, rx, s)? {
            // c. Else,
            // i. Append result to results.
            results.push(result);
            // ii. If global is false, set done to true.
            if !global {
                break;
            }
            // iii. Else,
            // 1. Let matchStr be ? ToString(? Get(result, "0")).
            let match_str = matched_string(agent, result)?;
            // 2. If matchStr is the empty String, then
            if match_str.utf16_len(agent) == 0 {
                step_past_empty_match(agent, rx, s, full_unicode)?;
            }
        }
        // 13. Let accumulatedResult be the empty String.
        let mut accumulated_result: Vec<u16> = Vec::with_capacity(length_s);
        // 14. Let nextSourcePosition be 0.
        let mut next_source_position = 0;
        // 15. For each element result of results, do
        for result in results {
            // a. Let resultLength be ? LengthOfArrayLike(result).
            let result_length = length_of_array_like(agent, result)?;
            // b. Let nCaptures be max(resultLength - 1, 0).
            let n_captures = result_length.saturating_sub(1);
            // c. Let matched be ? ToString(? Get(result, "0")).
            let matched = matched_string(agent, result)?.code_units(agent);
            // d. Let matchLength be the length of matched.
            let match_length = matched.len();
            // e. Let position be ? ToIntegerOrInfinity(? Get(result, "index")).
            let position = get(agent, result, PropertyKey::from_str(agent, "index"))?;
            let position = to_integer_or_infinity(agent, position)?;
            // f. Set position to the result of clamping position between 0
            // and lengthS.
            let position = position.clamp(0.0, length_s as f64) as usize;
            // g. Let captures be a new empty List.
            let mut captures = Vec::with_capacity(n_captures as usize);
            // h. Let n be 1.
            // i. Repeat, while n ≤ nCaptures,
            for n in 1..=n_captures {
                // i. Let capN be ? Get(result, ! ToString(𝔽(n))).
                let cap_n = get(agent, result, PropertyKey::from_index(agent, n))?;
                // ii. If capN is not undefined, then
                //     1. Set capN to ? ToString(capN).
                // iii. Append capN to captures.
                captures.push(if cap_n.is_undefined() {
                    Value::Undefined
                } else {
                    Value::String(to_string(agent, cap_n)?)
                });
            }
            // j. Let namedCaptures be ? Get(result, "groups").
            let mut named_captures = get(agent, result, PropertyKey::from_str(agent, "groups"))?;
            // k. If functionalReplace is true, then
            let replacement = if functional_replace {
                // i. Let replacerArgs be the list-concatenation of « matched »,
                // captures, and « 𝔽(position), S ».
                let mut replacer_args = Vec::with_capacity(captures.len() + 4);
                replacer_args.push(Value::String(HeapString::from_code_units(agent, &matched)));
                replacer_args.extend_from_slice(&captures);
                replacer_args.push(Value::from(position));
                replacer_args.push(Value::String(s));
                // ii. If namedCaptures is not undefined, then
                //     1. Append namedCaptures to replacerArgs.
                if !named_captures.is_undefined() {
                    replacer_args.push(named_captures);
                }
                // iii. Let replValue be ? Call(replaceValue, undefined,
                // replacerArgs).
                let Value::Object(replace_function) = replace_value else {
                    return Err(agent.internal_error("callable replace value is not an object"));
                };
                let repl_value =
                    call_function(agent, replace_function, Value::Undefined, &replacer_args)?;
                // iv. Let replacement be ? ToString(replValue).
                to_string(agent, repl_value)?.code_units(agent)
            } else {
                // l. Else,
                // i. If namedCaptures is not undefined, then
                //     1. Set namedCaptures to ? ToObject(namedCaptures).
                if !named_captures.is_undefined() {
                    named_captures = Value::Object(to_object(agent, named_captures)?);
                }
                // ii. Let replacement be ? GetSubstitution(matched, S,
                // position, captures, namedCaptures, replaceValue).
                let Value::String(template) = replace_value else {
                    return Err(agent.internal_error("replace template is not a string"));
                };
                get_substitution(
                    agent,
                    &matched,
                    &s_units,
                    position,
                    &captures,
                    named_captures,
                    &template.code_units(agent),
                )?
            };
            // m. If position ≥ nextSourcePosition, then
            if position >= next_source_position {
                // i. NOTE: position should not normally move backwards.
                // ii. Set accumulatedResult to the string-concatenation of
                // accumulatedResult, the substring of S from
                // nextSourcePosition to position, and replacement.
                accumulated_result.extend_from_slice(&s_units[next_source_position..position]);
                accumulated_result.extend_from_slice(&replacement);
                // iii. Set nextSourcePosition to position + matchLength.
                next_source_position = position + match_length;
            }
        }
        // 16. If nextSourcePosition ≥ lengthS, return accumulatedResult.
        // 17. Return the string-concatenation of accumulatedResult and the
        // substring of S from nextSourcePosition.
        if next_source_position < length_s {
            accumulated_result.extend_from_slice(&s_units[next_source_position..]);
        }
        Ok(Value::String(HeapString::from_code_units(agent, &accumulated_result)))
    }

    /// ### [22.2.6.12 RegExp.prototype \[ %Symbol.search% \] ( string )](https://tc39.es/ecma262/#sec-regexp.prototype-%symbol.search%)
    fn search(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let rx be the this value.
        // 2. If rx is not an Object, throw a TypeError exception.
        let rx = require_object(agent, this_value, "[Symbol.search]")?;
        // 3. Let S be ? ToString(string).
        let s = to_string(agent, arguments.get(0))?;
        // 4. Let previousLastIndex be ? Get(rx, "lastIndex").
        let previous_last_index = get(agent, rx, last_index_key(agent))?;
        // 5. If SameValue(previousLastIndex, +0𝔽) is false, then
        if !same_value(agent, previous_last_index, Value::from(0)) {
            // a. Perform ? Set(rx, "lastIndex", +0𝔽, true).
            set(agent, rx, last_index_key(agent), Value::from(0), true)?;
        }
        // 6. Let result be ? RegExpExec(rx, S).
        let result = reg_exp_exec(agent, rx, s)?;
        // 7. Let currentLastIndex be ? Get(rx, "lastIndex").
        let current_last_index = get(agent, rx, last_index_key(agent))?;
        // 8. If SameValue(currentLastIndex, previousLastIndex) is false, then
        if !same_value(agent, current_last_index, previous_last_index) {
            // a. Perform ? Set(rx, "lastIndex", previousLastIndex, true).
            set(agent, rx, last_index_key(agent), previous_last_index, true)?;
        }
        // 9. If result is null, return -1𝔽.
        // 10. Return ? Get(result, "index").
        match result {
            Some(result) => get(agent, result, PropertyKey::from_str(agent, "index")),
            None => Ok(Value::Number(-1.0)),
        }
    }

    /// ### [22.2.6.14 RegExp.prototype \[ %Symbol.split% \] ( string, limit )](https://tc39.es/ecma262/#sec-regexp.prototype-%symbol.split%)
    fn split(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let limit = arguments.get(1);
        // 1. Let rx be the this value.
        // 2. If rx is not an Object, throw a TypeError exception.
        let rx = require_object(agent, this_value, "[Symbol.split]")?;
        // 3. Let S be ? ToString(string).
        let s = to_string(agent, arguments.get(0))?;
        // 4. Let C be ? SpeciesConstructor(rx, %RegExp%).
        let c = species_constructor(agent, rx, agent.intrinsics().regexp())?;
        // 5. Let flags be ? ToString(? Get(rx, "flags")).
        let flags = flags_string(agent, rx)?;
        // 6. If flags contains "u" or flags contains "v", let unicodeMatching
        // be true.
        let unicode_matching = flags.contains('u') || flags.contains('v');
        // 8. If flags contains "y", let newFlags be flags.
        // 9. Else, let newFlags be the string-concatenation of flags and "y".
        let new_flags = if flags.contains('y') { flags } else { format!("{flags}y") };
        // 10. Let splitter be ? Construct(C, « rx, newFlags »).
        let splitter = construct(
            agent,
            c,
            &[Value::Object(rx), Value::from_string(agent, new_flags)],
            None,
        )?;
        // 11. Let A be ! ArrayCreate(0).
        let mut a = Vec::new();
        // 13. If limit is undefined, let lim be 2**32 - 1; else let lim be ℝ(?
        // ToUint32(limit)).
        let lim = if limit.is_undefined() {
            u32::MAX
        } else {
            to_uint32(agent, limit)?
        } as usize;
        // 14. If lim = 0, return A.
        if lim == 0 {
            return Ok(Value::Object(create_array_from_list(agent, &[])));
        }
        let s_units = s.code_units(agent);
        // 15. If S is the empty String, then
        if s_units.is_empty() {
            // a. Let z be ? RegExpExec(splitter, S).
            // b. If z is not null, return A.
            if reg_exp_exec(agent, splitter, s)?.is_none() {
                // c. Perform ! CreateDataPropertyOrThrow(A, "0", S).
                a.push(Value::String(s));
            }
            // d. Return A.
            return Ok(Value::Object(create_array_from_list(agent, &a)));
        }
        // 16. Let size be the length of S.
        let size = s_units.len();
        // 17. Let p be 0.
        let mut p = 0;
        // 18. Let q be p.
        let mut q = p;
        let substring = |from: usize, to: usize| {
            Value::String(HeapString::from_code_units(agent, &s_units[from..to]))
        };
        // 19. Repeat, while q < size,
        while q < size {
            // a. Perform ? Set(splitter, "lastIndex", 𝔽(q), true).
            set(agent, splitter, last_index_key(agent), Value::from(q), true)?;
            // b. Let z be ? RegExpExec(splitter, S).
            // c. If z is null, set q to AdvanceStringIndex(S, q,
            // unicodeMatching).
            let Some(z) = reg_exp_exec(agent, splitter, s)? else {
                q = advance_string_index(agent, s, q, unicode_matching);
                continue;
            };
            // d. Else,
            // i. Let e be ℝ(? ToLength(? Get(splitter, "lastIndex"))).
            let e = get(agent, splitter, last_index_key(agent))?;
            // ii. Set e to min(e, size).
            let e = (to_length(agent, e)? as usize).min(size);
            // iii. If e = p, set q to AdvanceStringIndex(S, q,
            // unicodeMatching).
            if e == p {
                q = advance_string_index(agent, s, q, unicode_matching);
                continue;
            }
            // iv. Else,
            // 1. Let T be the substring of S from p to q.
            // 2. Perform ! CreateDataPropertyOrThrow(A, ! ToString(𝔽(lengthA)), T).
            a.push(substring(p, q));
            // 3. Set lengthA to lengthA + 1.
            // 4. If lengthA = lim, return A.
            if a.len() == lim {
                return Ok(Value::Object(create_array_from_list(agent, &a)));
            }
            // 5. Set p to e.
            p = e;
            // 6. Let numberOfCaptures be ? LengthOfArrayLike(z).
            // 7. Set numberOfCaptures to max(numberOfCaptures - 1, 0).
            let number_of_captures = length_of_array_like(agent, z)?.saturating_sub(1);
            // 8. Let i be 1.
            // 9. Repeat, while i ≤ numberOfCaptures,
            for i in 1..=number_of_captures {
                // a. Let nextCapture be ? Get(z, ! ToString(𝔽(i))).
                let next_capture = get(agent, z, PropertyKey::from_index(agent, i))?;
                // b. Perform ! CreateDataPropertyOrThrow(A, ! ToString(𝔽(lengthA)), nextCapture).
                a.push(next_capture);
                // d. Set lengthA to lengthA + 1.
                // e. If lengthA = lim, return A.
                if a.len() == lim {
                    return Ok(Value::Object(create_array_from_list(agent, &a)));
                }
            }
            // 10. Set q to p.
            q = p;
        }
        // 20. Let T be the substring of S from p to size.
        // 21. Perform ! CreateDataPropertyOrThrow(A, ! ToString(𝔽(lengthA)), T).
        a.push(substring(p.min(size), size));
        // 22. Return A.
        Ok(Value::Object(create_array_from_list(agent, &a)))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.regexp_prototype();
        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_prototype(intrinsics.object_prototype())
            .with_property_capacity(19)
            .with_constructor_property(intrinsics.regexp())
            .with_builtin_function_getter_property::<RegExpPrototypeGetDotAll>()
            .with_builtin_function_property::<RegExpPrototypeExec>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetFlags>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetGlobal>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetHasIndices>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetIgnoreCase>()
            .with_builtin_function_property::<RegExpPrototypeMatch>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetMultiline>()
            .with_builtin_function_property::<RegExpPrototypeReplace>()
            .with_builtin_function_property::<RegExpPrototypeSearch>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetSource>()
            .with_builtin_function_property::<RegExpPrototypeSplit>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetSticky>()
            .with_builtin_function_property::<RegExpPrototypeTest>()
            .with_builtin_function_property::<RegExpPrototypeToString>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetUnicode>()
            .with_builtin_function_getter_property::<RegExpPrototypeGetUnicodeSets>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn exec_reports_captures_and_positions() {
        assert_eq!(
            run_to_string(
                "var m = /(\\d+)-(x)?(?<tail>\\w+)/.exec('ab 12-cd');
                 [m[0], m[1], m[2], m[3], m.index, m.input, m.groups.tail, m.length].join('|')"
            ),
            "12-cd|12||cd|3|ab 12-cd|cd|4"
        );
        assert_eq!(run_to_string("String(/z/.exec('abc'))"), "null");
    }

    #[test]
    fn global_and_sticky_track_last_index() {
        assert_eq!(
            run_to_string(
                "var r = /a/g; var out = [];
                 while (r.test('banana')) out.push(r.lastIndex);
                 out.push(r.lastIndex);
                 var y = /b/y; out.push(y.test('ab'), y.lastIndex);
                 y.lastIndex = 1; out.push(y.test('ab'), y.lastIndex);
                 out.join()"
            ),
            "2,4,6,0,false,0,true,2"
        );
    }

    #[test]
    fn indices_follow_utf16_positions() {
        assert_eq!(
            run_to_string("var m = /(b)/d.exec('😀b'); [m.index, m.indices[0], m.indices[1]].join('|')"),
            "2|2,3|2,3"
        );
    }

    #[test]
    fn flags_and_source() {
        assert_eq!(
            run_to_string(
                "var r = /a\\/b/gimsuy;
                 [r.flags, r.source, r.global, r.sticky, r.hasIndices, String(r),
                  RegExp.prototype.source, String(RegExp.prototype.global), String(RegExp.prototype)].join(' ')"
            ),
            "gimsuy a\\/b true true false /a\\/b/gimsuy (?:) undefined /(?:)/"
        );
        assert_eq!(
            run_to_string(
                "try { Object.getOwnPropertyDescriptor(RegExp.prototype, 'global').get.call({}) } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }

    #[test]
    fn string_methods_delegate_to_regexps() {
        assert_eq!(
            run_to_string(
                "['a1b22c333'.match(/\\d+/g).join(), String('abc'.match(/x/g)), 'abc'.search(/c/),
                  'a-b_c'.split(/[-_]/).join(), 'a1b2'.split(/(\\d)/).join(),
                  'aaa'.replace(/a/g, 'b'), 'john smith'.replace(/(\\w+)\\s(\\w+)/, '$2, $1'),
                  '2024-05'.replace(/(?<y>\\d+)-(?<m>\\d+)/, '$<m>/$<y>'),
                  'abc'.replace(/b/, (m, p) => m.toUpperCase() + p),
                  'xAx'.replaceAll(/x/g, '-'), ''.split(/a/).length, 'abc'.split(/(?:)/).join()].join(' ')"
            ),
            "1,22,333 null 2 a,b,c a,1,b,2, bbb smith, john 05/2024 aB1c -A- 1 a,b,c"
        );
        assert_eq!(
            run_to_string("try { 'a'.replaceAll(/a/, 'b') } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn empty_matches_advance() {
        assert_eq!(run_to_string("'abc'.replace(/(?:)/g, '-')"), "-a-b-c-");
        assert_eq!(run_to_string("'😀'.match(/(?:)/gu).length"), "2");
    }

    #[test]
    fn custom_exec_is_honoured() {
        assert_eq!(
            run_to_string(
                "var r = /x/; var calls = 0;
                 r.exec = function (s) { calls++; return null; };
                 [r.test('x'), calls].join()"
            ),
            "false,1"
        );
    }
}
