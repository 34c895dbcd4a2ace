// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{get, length_of_array_like},
        type_conversion::{to_number, to_object, to_string, to_uint16_number},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        ordinary::get_prototype_from_constructor, primitive_objects::string_create,
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{HeapString, Object, PropertyKey, Value, number_to_string},
};

pub(crate) struct StringConstructor;

impl Builtin for StringConstructor {
    const NAME: &'static str = "String";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(StringConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for StringConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::String;
}

struct StringFromCharCode;
impl Builtin for StringFromCharCode {
    const NAME: &'static str = "fromCharCode";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::from_char_code);
}

struct StringFromCodePoint;
impl Builtin for StringFromCodePoint {
    const NAME: &'static str = "fromCodePoint";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::from_code_point);
}

struct StringRaw;
impl Builtin for StringRaw {
    const NAME: &'static str = "raw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::raw);
}

impl StringConstructor {
    /// ### [22.1.1.1 String ( value )](https://tc39.es/ecma262/#sec-string-constructor-string-value)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If value is not present, then
        let s = if arguments.is_empty() {
            // a. Let s be the empty String.
            HeapString::from_str(agent, "")
        } else {
            let value = arguments.get(0);
            match value {
                // a. If NewTarget is undefined and value is a Symbol, return
                // SymbolDescriptiveString(value).
                Value::Symbol(symbol) if new_target.is_none() => {
                    return Ok(Value::String(symbol.descriptive_string(agent)));
                }
                // b. Let s be ? ToString(value).
                _ => to_string(agent, value)?,
            }
        };
        // 3. If NewTarget is undefined, return s.
        let Some(new_target) = new_target else {
            return Ok(Value::String(s));
        };
        // 4. Return StringCreate(s, ? GetPrototypeFromConstructor(NewTarget,
        // "%String.prototype%")).
        let prototype = get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::String)?;
        Ok(Value::Object(string_create(agent, s, Some(prototype))))
    }

    /// ### [22.1.2.1 String.fromCharCode ( ...codeUnits )](https://tc39.es/ecma262/#sec-string.fromcharcode)
    fn from_char_code(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let result be the empty String.
        let mut result = Vec::with_capacity(arguments.len());
        // 2. For each element next of codeUnits, do
        for next in arguments.iter() {
            // a. Let nextCU be the code unit whose numeric value is
            // ℝ(? ToUint16(next)).
            let next_cu = to_uint16_number(to_number(agent, *next)?);
            // b. Set result to the string-concatenation of result and nextCU.
            result.push(next_cu);
        }
        // 3. Return result.
        Ok(Value::String(HeapString::from_code_units(agent, &result)))
    }

    /// ### [22.1.2.2 String.fromCodePoint ( ...codePoints )](https://tc39.es/ecma262/#sec-string.fromcodepoint)
    fn from_code_point(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let result be the empty String.
        let mut result = Vec::with_capacity(arguments.len());
        // 2. For each element next of codePoints, do
        for next in arguments.iter() {
            // a. Let nextCP be ? ToNumber(next).
            let next_cp = to_number(agent, *next)?;
            // b. If IsIntegralNumber(nextCP) is false, throw a RangeError
            // exception.
            // c. If ℝ(nextCP) < 0 or ℝ(nextCP) > 0x10FFFF, throw a RangeError
            // exception.
            if next_cp.trunc() != next_cp || !(0.0..=1114111.0).contains(&next_cp) {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    format!("Invalid code point {}", number_to_string(next_cp)),
                ));
            }
            // d. Set result to the string-concatenation of result and
            // UTF16EncodeCodePoint(ℝ(nextCP)).
            let code_point = next_cp as u32;
            match char::from_u32(code_point) {
                Some(c) => {
                    let mut buffer = [0u16; 2];
                    result.extend_from_slice(c.encode_utf16(&mut buffer));
                }
                // Surrogate code points encode as themselves.
                None => result.push(code_point as u16),
            }
        }
        // 4. Assert: If codePoints is empty, then result is the empty String.
        // 5. Return result.
        Ok(Value::String(HeapString::from_code_units(agent, &result)))
    }

    /// ### [22.1.2.4 String.raw ( template, ...substitutions )](https://tc39.es/ecma262/#sec-string.raw)
    fn raw(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let substitutions = arguments.slice_from(1);
        // 1. Let substitutionCount be the number of elements in substitutions.
        let substitution_count = substitutions.len() as u64;
        // 2. Let cooked be ? ToObject(template).
        let cooked = to_object(agent, arguments.get(0))?;
        // 3. Let literals be ? ToObject(? Get(cooked, "raw")).
        let literals = get(agent, cooked, PropertyKey::from_str(agent, "raw"))?;
        let literals = to_object(agent, literals)?;
        // 4. Let literalCount be ? LengthOfArrayLike(literals).
        let literal_count = length_of_array_like(agent, literals)?;
        // 5. If literalCount ≤ 0, return the empty String.
        let mut r = String::new();
        // 6. Let R be the empty String.
        // 7. Let nextIndex be 0.
        let mut next_index = 0;
        // 8. Repeat,
        while next_index < literal_count {
            // a. Let nextLiteralVal be ? Get(literals, ! ToString(𝔽(nextIndex))).
            let next_literal_val =
                get(agent, literals, PropertyKey::from_index(agent, next_index))?;
            // b. Let nextLiteral be ? ToString(nextLiteralVal).
            let next_literal = to_string(agent, next_literal_val)?;
            // c. Set R to the string-concatenation of R and nextLiteral.
            r.push_str(&next_literal.as_rc(agent));
            // d. If nextIndex + 1 = literalCount, return R.
            if next_index + 1 == literal_count {
                break;
            }
            // e. If nextIndex < substitutionCount, then
            if next_index < substitution_count {
                // i. Let nextSubVal be substitutions[nextIndex].
                // ii. Let nextSub be ? ToString(nextSubVal).
                let next_sub = to_string(agent, substitutions[next_index as usize])?;
                // iii. Set R to the string-concatenation of R and nextSub.
                r.push_str(&next_sub.as_rc(agent));
            }
            // f. Set nextIndex to nextIndex + 1.
            next_index += 1;
        }
        Ok(Value::from_string(agent, r))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let string_prototype = realm.intrinsics(agent).string_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<StringConstructor>(agent, realm)
            .with_property_capacity(4)
            .with_builtin_function_property::<StringFromCharCode>()
            .with_builtin_function_property::<StringFromCodePoint>()
            .with_prototype_property(string_prototype)
            .with_builtin_function_property::<StringRaw>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn converts_and_wraps() {
        assert_eq!(
            run_to_string("[String(), String(12), String(Symbol('s')), String(null)].join('|')"),
            "|12|Symbol(s)|null"
        );
        assert_eq!(
            run_to_string("var s = new String('ab'); typeof s + ':' + s.length + ':' + s[1]"),
            "object:2:b"
        );
        assert_eq!(run_to_string("try { new String(Symbol()) } catch (e) { e.name }"), "TypeError");
    }

    #[test]
    fn from_char_code_and_code_point() {
        assert_eq!(
            run_to_string("String.fromCharCode(72, 105, 0x10041) + String.fromCodePoint(0x1F600).length"),
            "HiA2"
        );
        assert_eq!(
            run_to_string("try { String.fromCodePoint(-1) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn raw_interleaves_substitutions() {
        assert_eq!(run_to_string("String.raw`a\\n${1}b${2}`"), "a\\n1b2");
        assert_eq!(
            run_to_string("String.raw({ raw: ['x', 'y', 'z'] }, 1)"),
            "x1yz"
        );
    }
}
