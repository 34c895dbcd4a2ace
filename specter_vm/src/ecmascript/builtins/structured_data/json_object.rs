// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25.5 The JSON Object](https://tc39.es/ecma262/#sec-json-object)

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            EnumerablePropertiesKind, call_function, create_data_property,
            create_data_property_or_throw, enumerable_own_properties, get, get_v,
            length_of_array_like,
        },
        testing_and_comparison::{is_array, is_callable},
        type_conversion::{to_integer_or_infinity, to_number, to_property_key, to_string},
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, array::array_create,
        ordinary::ordinary_object_create_with_intrinsics,
    },
    execution::{Agent, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType},
    types::{
        InternalMethods, Object, ObjectKind, PropertyKey, Symbol, Value, number_to_string,
        string_to_number,
    },
};

pub(crate) struct JSONObject;

struct JSONObjectParse;
impl Builtin for JSONObjectParse {
    const NAME: &'static str = "parse";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(JSONObject::parse);
}

struct JSONObjectStringify;
impl Builtin for JSONObjectStringify {
    const NAME: &'static str = "stringify";
    const LENGTH: u8 = 3;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(JSONObject::stringify);
}

impl JSONObject {
    /// ### [25.5.1 JSON.parse ( text \[ , reviver \] )](https://tc39.es/ecma262/#sec-json.parse)
    ///
    /// The optional reviver parameter is a function that takes two
    /// parameters, key and value. It is called with each of the key/value
    /// pairs produced by the parse, and its return value is used instead of
    /// the original value. If it returns undefined then the property is
    /// deleted from the result.
    fn parse(agent: &Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let text = arguments.get(0);
        let reviver = arguments.get(1);
        // 1. Let jsonString be ? ToString(text).
        let json_string = to_string(agent, text)?.as_rc(agent);
        // 2. Parse StringToCodePoints(jsonString) as a JSON text as specified
        // in ECMA-404. Throw a SyntaxError exception if it is not a valid JSON
        // text as defined in that specification.
        let json_value = serde_json::from_str::<serde_json::Value>(&json_string).map_err(|error| {
            agent.throw_exception(ExceptionType::SyntaxError, format!("JSON.parse: {error}"))
        })?;
        // 3-9. Let unfiltered be the result of evaluating the text.
        let unfiltered = value_from_json(agent, &json_value)?;
        // 11. If IsCallable(reviver) is true, then
        if let Value::Object(reviver) = reviver
            && is_callable(agent, Value::Object(reviver))
        {
            // a. Let root be OrdinaryObjectCreate(%Object.prototype%).
            let root = ordinary_object_create_with_intrinsics(agent, Some(ProtoIntrinsics::Object));
            // b. Let rootName be the empty String.
            let root_name = PropertyKey::from_str(agent, "");
            // c. Perform ! CreateDataPropertyOrThrow(root, rootName, unfiltered).
            create_data_property_or_throw(agent, root, root_name, unfiltered)?;
            // d. Return ? InternalizeJSONProperty(root, rootName, reviver).
            return internalize_json_property(agent, root, root_name, reviver);
        }
        // 12. Else,
        //     a. Return unfiltered.
        Ok(unfiltered)
    }

    /// ### [25.5.2 JSON.stringify ( value \[ , replacer \[ , space \] \] )](https://tc39.es/ecma262/#sec-json.stringify)
    fn stringify(agent: &Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let value = arguments.get(0);
        let replacer = arguments.get(1);
        let space = arguments.get(2);
        // 1. Let stack be a new empty List.
        // 2. Let indent be the empty String.
        // 3. Let PropertyList be undefined.
        // 4. Let ReplacerFunction be undefined.
        let mut state = JsonSerializationRecord::default();
        // 5. If replacer is an Object, then
        if let Value::Object(replacer_object) = replacer {
            // a. If IsCallable(replacer) is true, then
            if is_callable(agent, replacer) {
                // i. Set ReplacerFunction to replacer.
                state.replacer_function = Some(replacer_object);
            } else if is_array(agent, replacer)? {
                // b. Else,
                //     i. Let isArray be ? IsArray(replacer).
                //     ii. If isArray is true, then
                state.property_list = Some(property_list_from_array(agent, replacer_object)?);
            }
        }
        // 6. If space is an Object, then
        //     a. If space has a [[NumberData]] internal slot, then
        //         i. Set space to ? ToNumber(space).
        //     b. Else if space has a [[StringData]] internal slot, then
        //         i. Set space to ? ToString(space).
        let space = match space {
            Value::Object(object) => match primitive_wrapper_value(agent, object) {
                Some(Value::Number(_)) => Value::Number(to_number(agent, space)?),
                Some(Value::String(_)) => Value::String(to_string(agent, space)?),
                _ => space,
            },
            _ => space,
        };
        // 7. If space is a Number, then
        //     a. Let spaceMV be ! ToIntegerOrInfinity(space).
        //     b. Set spaceMV to min(10, spaceMV).
        //     c. If spaceMV < 1, let gap be the empty String; otherwise let
        //     gap be the String value containing spaceMV occurrences of the
        //     code unit 0x0020 (SPACE).
        // 8. Else if space is a String, then
        //     a. If the length of space ≤ 10, let gap be space; otherwise let
        //     gap be the substring of space from 0 to 10.
        // 9. Else,
        //     a. Let gap be the empty String.
        state.gap = match space {
            Value::Number(_) => {
                let space_mv = to_integer_or_infinity(agent, space)?.min(10.0);
                if space_mv < 1.0 {
                    String::new()
                } else {
                    " ".repeat(space_mv as usize)
                }
            }
            Value::String(space) => {
                let units = space.code_units(agent);
                String::from_utf16_lossy(&units[..units.len().min(10)])
            }
            _ => String::new(),
        };
        // 10. Let wrapper be OrdinaryObjectCreate(%Object.prototype%).
        let wrapper = ordinary_object_create_with_intrinsics(agent, Some(ProtoIntrinsics::Object));
        // 11. Perform ! CreateDataPropertyOrThrow(wrapper, the empty String, value).
        let empty = PropertyKey::from_str(agent, "");
        create_data_property_or_throw(agent, wrapper, empty, value)?;
        // 12. Let state be the JSON Serialization Record { [[ReplacerFunction]]:
        // ReplacerFunction, [[Stack]]: stack, [[Indent]]: indent, [[Gap]]:
        // gap, [[PropertyList]]: PropertyList }.
        // 13. Return ? SerializeJSONProperty(state, the empty String, wrapper).
        Ok(
            match serialize_json_property(agent, &mut state, empty, wrapper)? {
                Some(json) => Value::from_string(agent, json),
                None => Value::Undefined,
            },
        )
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let object_prototype = intrinsics.object_prototype();
        let this = intrinsics.json();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(3)
            .with_prototype(object_prototype)
            .with_builtin_function_property::<JSONObjectParse>()
            .with_builtin_function_property::<JSONObjectStringify>()
            .with_property(|builder| {
                builder
                    .with_key(PropertyKey::Symbol(Symbol::TO_STRING_TAG))
                    .with_value_readonly(Value::from_str(agent, "JSON"))
                    .with_enumerable(false)
                    .with_configurable(true)
                    .build()
            })
            .build();
    }
}

/// ### [25.5.1.1 InternalizeJSONProperty ( holder, name, reviver )](https://tc39.es/ecma262/#sec-internalizejsonproperty)
///
/// > Note 1
/// > This algorithm intentionally does not throw an exception if either
/// > \[\[Delete\]\] or CreateDataProperty return false.
pub(crate) fn internalize_json_property(
    agent: &Agent,
    holder: Object,
    name: PropertyKey,
    reviver: Object,
) -> JsResult<Value> {
    // 1. Let val be ? Get(holder, name).
    let val = get(agent, holder, name)?;
    // 2. If val is an Object, then
    if let Value::Object(object) = val {
        // a. Let isArray be ? IsArray(val).
        // b. If isArray is true, then
        let keys = if is_array(agent, val)? {
            // i. Let len be ? LengthOfArrayLike(val).
            let len = length_of_array_like(agent, object)?;
            // ii. Let I be 0.
            // iii. Repeat, while I < len,
            //     1. Let prop be ! ToString(𝔽(I)).
            (0..len)
                .map(|i| PropertyKey::from_index(agent, i))
                .collect::<Vec<_>>()
        } else {
            // c. Else,
            //     i. Let keys be ? EnumerableOwnProperties(val, KEY).
            enumerable_own_properties(agent, object, EnumerablePropertiesKind::Key)?
                .into_iter()
                .map(|key| to_property_key(agent, key))
                .collect::<JsResult<Vec<_>>>()?
        };
        // ii. For each String P of keys, do
        for p in keys {
            // 1. Let newElement be ? InternalizeJSONProperty(val, P, reviver).
            let new_element = internalize_json_property(agent, object, p, reviver)?;
            // 2. If newElement is undefined, then
            if new_element.is_undefined() {
                // a. Perform ? val.[[Delete]](P).
                object.internal_delete(agent, p)?;
            } else {
                // 3. Else,
                //     a. Perform ? CreateDataProperty(val, P, newElement).
                create_data_property(agent, object, p, new_element)?;
            }
        }
    }
    // 3. Return ? Call(reviver, holder, « name, val »).
    let name = name.into_value(agent);
    call_function(agent, reviver, Value::Object(holder), &[name, val])
}

/// Realize a parsed JSON text as ECMAScript values. Objects keep the source
/// order of their members; a repeated member name keeps its first position
/// and its last value.
pub(crate) fn value_from_json(agent: &Agent, json: &serde_json::Value) -> JsResult<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(value) => Ok(Value::Boolean(*value)),
        // Numbers keep their source text, so magnitudes beyond f64 round to
        // ±Infinity or ±0 as StringToNumber rounds them.
        serde_json::Value::Number(number) => Ok(Value::Number(string_to_number(number.as_str()))),
        serde_json::Value::String(value) => Ok(Value::from_str(agent, value)),
        serde_json::Value::Array(elements) => {
            let array = array_create(agent, 0, None);
            for (i, element) in elements.iter().enumerate() {
                let element = value_from_json(agent, element)?;
                create_data_property(
                    agent,
                    array,
                    PropertyKey::from_index(agent, i as u64),
                    element,
                )?;
            }
            Ok(Value::Object(array))
        }
        serde_json::Value::Object(members) => {
            let object =
                ordinary_object_create_with_intrinsics(agent, Some(ProtoIntrinsics::Object));
            for (key, member) in members {
                let member = value_from_json(agent, member)?;
                create_data_property(agent, object, PropertyKey::from_str(agent, key), member)?;
            }
            Ok(Value::Object(object))
        }
    }
}

/// ### [25.5.2.1 JSON Serialization Record](https://tc39.es/ecma262/#sec-json-serialization-record)
#[derive(Debug, Default)]
struct JsonSerializationRecord {
    /// ### \[\[ReplacerFunction\]\]
    replacer_function: Option<Object>,
    /// ### \[\[Stack\]\]
    stack: Vec<Object>,
    /// ### \[\[Indent\]\]
    indent: String,
    /// ### \[\[Gap\]\]
    gap: String,
    /// ### \[\[PropertyList\]\]
    property_list: Option<Vec<PropertyKey>>,
}

/// The value wrapped by a Boolean, Number, String or BigInt object.
fn primitive_wrapper_value(agent: &Agent, object: Object) -> Option<Value> {
    match agent.object(object).kind {
        ObjectKind::PrimitiveWrapper(value) => Some(value),
        _ => None,
    }
}

/// Step 5.b.ii of JSON.stringify: the property list of an array replacer.
fn property_list_from_array(agent: &Agent, replacer: Object) -> JsResult<Vec<PropertyKey>> {
    // 1. Set PropertyList to a new empty List.
    let mut property_list = Vec::new();
    // 2. Let len be ? LengthOfArrayLike(replacer).
    let len = length_of_array_like(agent, replacer)?;
    // 3. Let k be 0.
    // 4. Repeat, while k < len,
    for k in 0..len {
        // a. Let prop be ! ToString(𝔽(k)).
        // b. Let v be ? Get(replacer, prop).
        let v = get(agent, replacer, PropertyKey::from_index(agent, k))?;
        // c. Let item be undefined.
        // d. If v is a String, then
        //     i. Set item to v.
        // e. Else if v is a Number, then
        //     i. Set item to ! ToString(v).
        // f. Else if v is an Object, then
        //     i. If v has a [[StringData]] or [[NumberData]] internal slot,
        //     set item to ? ToString(v).
        let item = match v {
            Value::String(_) | Value::Number(_) => Some(to_string(agent, v)?),
            Value::Object(object) => match primitive_wrapper_value(agent, object) {
                Some(Value::String(_) | Value::Number(_)) => Some(to_string(agent, v)?),
                _ => None,
            },
            _ => None,
        };
        // g. If item is not undefined and PropertyList does not contain
        // item, then
        //     i. Append item to PropertyList.
        if let Some(item) = item {
            let item = PropertyKey::from_string(agent, item);
            if !property_list.contains(&item) {
                property_list.push(item);
            }
        }
        // h. Set k to k + 1.
    }
    Ok(property_list)
}

/// ### [25.5.2.2 SerializeJSONProperty ( state, key, holder )](https://tc39.es/ecma262/#sec-serializejsonproperty)
///
/// Returns None for undefined.
fn serialize_json_property(
    agent: &Agent,
    state: &mut JsonSerializationRecord,
    key: PropertyKey,
    holder: Object,
) -> JsResult<Option<String>> {
    // 1. Let value be ? Get(holder, key).
    let mut value = get(agent, holder, key)?;
    // 2. If value is an Object or value is a BigInt, then
    if matches!(value, Value::Object(_) | Value::BigInt(_)) {
        // a. Let toJSON be ? GetV(value, "toJSON").
        let to_json = get_v(agent, value, PropertyKey::from_str(agent, "toJSON"))?;
        // b. If IsCallable(toJSON) is true, then
        if let Value::Object(to_json) = to_json
            && is_callable(agent, Value::Object(to_json))
        {
            // i. Set value to ? Call(toJSON, value, « key »).
            let key = key.into_value(agent);
            value = call_function(agent, to_json, value, &[key])?;
        }
    }
    // 3. If state.[[ReplacerFunction]] is not undefined, then
    if let Some(replacer) = state.replacer_function {
        // a. Set value to ? Call(state.[[ReplacerFunction]], holder, « key, value »).
        let key = key.into_value(agent);
        value = call_function(agent, replacer, Value::Object(holder), &[key, value])?;
    }
    // 4. If value is an Object, then
    if let Value::Object(object) = value {
        value = match primitive_wrapper_value(agent, object) {
            // a. If value has a [[NumberData]] internal slot, then
            //     i. Set value to ? ToNumber(value).
            Some(Value::Number(_)) => Value::Number(to_number(agent, value)?),
            // b. Else if value has a [[StringData]] internal slot, then
            //     i. Set value to ? ToString(value).
            Some(Value::String(_)) => Value::String(to_string(agent, value)?),
            // c. Else if value has a [[BooleanData]] internal slot, then
            //     i. Set value to value.[[BooleanData]].
            // d. Else if value has a [[BigIntData]] internal slot, then
            //     i. Set value to value.[[BigIntData]].
            Some(inner @ (Value::Boolean(_) | Value::BigInt(_))) => inner,
            _ => value,
        };
    }
    match value {
        // 5. If value is null, return "null".
        Value::Null => Ok(Some("null".to_owned())),
        // 6. If value is true, return "true".
        // 7. If value is false, return "false".
        Value::Boolean(value) => Ok(Some(value.to_string())),
        // 8. If value is a String, return QuoteJSONString(value).
        Value::String(value) => Ok(Some(quote_json_string(&value.as_rc(agent)))),
        // 9. If value is a Number, then
        //     a. If value is finite, return ! ToString(value).
        //     b. Return "null".
        Value::Number(value) if value.is_finite() => Ok(Some(number_to_string(value))),
        Value::Number(_) => Ok(Some("null".to_owned())),
        // 10. If value is a BigInt, throw a TypeError exception.
        Value::BigInt(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Do not know how to serialize a BigInt",
        )),
        // 11. If value is an Object and IsCallable(value) is false, then
        Value::Object(object) if !is_callable(agent, value) => {
            // a. Let isArray be ? IsArray(value).
            // b. If isArray is true, return ? SerializeJSONArray(state, value).
            // c. Return ? SerializeJSONObject(state, value).
            if is_array(agent, value)? {
                serialize_json_array(agent, state, object).map(Some)
            } else {
                serialize_json_object(agent, state, object).map(Some)
            }
        }
        // 12. Return undefined.
        _ => Ok(None),
    }
}

/// ### [25.5.2.3 QuoteJSONString ( value )](https://tc39.es/ecma262/#sec-quotejsonstring)
fn quote_json_string(value: &str) -> String {
    // 1. Let product be the String value consisting solely of the code unit
    // 0x0022 (QUOTATION MARK).
    let mut product = String::with_capacity(value.len() + 2);
    product.push('"');
    // 2. For each code point C of StringToCodePoints(value), do
    for c in value.chars() {
        match c {
            // a. If C is listed in the “Code Point” column of Table 75, then
            //     i. Set product to the string-concatenation of product and
            //     the escape sequence for C as specified in the “Escape
            //     Sequence” column of the corresponding row.
            '\u{8}' => product.push_str("\\b"),
            '\t' => product.push_str("\\t"),
            '\n' => product.push_str("\\n"),
            '\u{c}' => product.push_str("\\f"),
            '\r' => product.push_str("\\r"),
            '"' => product.push_str("\\\""),
            '\\' => product.push_str("\\\\"),
            // b. Else if C has a numeric value less than 0x0020 (SPACE) or C
            // has the same numeric value as a leading surrogate or trailing
            // surrogate, then
            //     i. Let unit be the code unit whose numeric value is the
            //     numeric value of C.
            //     ii. Set product to the string-concatenation of product and
            //     UnicodeEscape(unit).
            c if (c as u32) < 0x20 => product.push_str(&format!("\\u{:04x}", c as u32)),
            // c. Else,
            //     i. Set product to the string-concatenation of product and
            //     UTF16EncodeCodePoint(C).
            c => product.push(c),
        }
    }
    // 3. Set product to the string-concatenation of product and the code
    // unit 0x0022 (QUOTATION MARK).
    product.push('"');
    // 4. Return product.
    product
}

/// Shared prologue of SerializeJSONObject and SerializeJSONArray: the cycle
/// check and entering a new indentation level. Returns the stepback.
fn enter_structure(
    agent: &Agent,
    state: &mut JsonSerializationRecord,
    value: Object,
) -> JsResult<String> {
    // 1. If state.[[Stack]] contains value, throw a TypeError exception
    // because the structure is cyclical.
    if state.stack.contains(&value) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Converting circular structure to JSON",
        ));
    }
    if state.stack.len() >= agent.options().max_call_depth {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Maximum call stack size exceeded",
        ));
    }
    // 2. Append value to state.[[Stack]].
    state.stack.push(value);
    // 3. Let stepback be state.[[Indent]].
    let stepback = state.indent.clone();
    // 4. Set state.[[Indent]] to the string-concatenation of state.[[Indent]]
    // and state.[[Gap]].
    state.indent.push_str(&state.gap);
    Ok(stepback)
}

/// Joins the members of an object or array, then leaves the indentation
/// level entered by [`enter_structure`].
fn leave_structure(
    state: &mut JsonSerializationRecord,
    partial: Vec<String>,
    stepback: String,
    (open, close): (char, char),
) -> String {
    // If partial is empty, then
    //     Let final be "{}" or "[]".
    let r#final = if partial.is_empty() {
        format!("{open}{close}")
    } else if state.gap.is_empty() {
        // If state.[[Gap]] is the empty String, then
        //     Let properties be the String value formed by concatenating all
        //     the element Strings of partial with each adjacent pair of
        //     Strings separated with the code unit 0x002C (COMMA).
        format!("{open}{}{close}", partial.join(","))
    } else {
        // Else,
        //     Let separator be the string-concatenation of the code unit
        //     0x002C (COMMA), the code unit 0x000A (LINE FEED), and
        //     state.[[Indent]].
        let separator = format!(",\n{}", state.indent);
        format!(
            "{open}\n{}{}\n{stepback}{close}",
            state.indent,
            partial.join(&separator)
        )
    };
    // Remove the last element of state.[[Stack]].
    state.stack.pop();
    // Set state.[[Indent]] to stepback.
    state.indent = stepback;
    // Return final.
    r#final
}

/// ### [25.5.2.5 SerializeJSONObject ( state, value )](https://tc39.es/ecma262/#sec-serializejsonobject)
fn serialize_json_object(
    agent: &Agent,
    state: &mut JsonSerializationRecord,
    value: Object,
) -> JsResult<String> {
    // 1-4.
    let stepback = enter_structure(agent, state, value)?;
    // 5. If state.[[PropertyList]] is not undefined, then
    //     a. Let K be state.[[PropertyList]].
    // 6. Else,
    //     a. Let K be ? EnumerableOwnProperties(value, KEY).
    let k = match &state.property_list {
        Some(property_list) => property_list.clone(),
        None => enumerable_own_properties(agent, value, EnumerablePropertiesKind::Key)?
            .into_iter()
            .map(|key| to_property_key(agent, key))
            .collect::<JsResult<Vec<_>>>()?,
    };
    // 7. Let partial be a new empty List.
    let mut partial = Vec::with_capacity(k.len());
    // 8. For each element P of K, do
    for p in k {
        // a. Let strP be ? SerializeJSONProperty(state, P, value).
        // b. If strP is not undefined, then
        if let Some(str_p) = serialize_json_property(agent, state, p, value)? {
            // i. Let member be QuoteJSONString(P).
            let mut member = quote_json_string(&p.to_display(agent));
            // ii. Set member to the string-concatenation of member and ":".
            member.push(':');
            // iii. If state.[[Gap]] is not the empty String, then
            //     1. Set member to the string-concatenation of member and the
            //     code unit 0x0020 (SPACE).
            if !state.gap.is_empty() {
                member.push(' ');
            }
            // iv. Set member to the string-concatenation of member and strP.
            member.push_str(&str_p);
            // v. Append member to partial.
            partial.push(member);
        }
    }
    // 9-13.
    Ok(leave_structure(state, partial, stepback, ('{', '}')))
}

/// ### [25.5.2.6 SerializeJSONArray ( state, value )](https://tc39.es/ecma262/#sec-serializejsonarray)
fn serialize_json_array(
    agent: &Agent,
    state: &mut JsonSerializationRecord,
    value: Object,
) -> JsResult<String> {
    // 1-4.
    let stepback = enter_structure(agent, state, value)?;
    // 5. Let partial be a new empty List.
    // 6. Let len be ? LengthOfArrayLike(value).
    let len = length_of_array_like(agent, value)?;
    let mut partial = Vec::new();
    // 7. Let index be 0.
    // 8. Repeat, while index < len,
    for index in 0..len {
        // a. Let strP be ? SerializeJSONProperty(state, ! ToString(𝔽(index)), value).
        let str_p = serialize_json_property(
            agent,
            state,
            PropertyKey::from_index(agent, index),
            value,
        )?;
        // b. If strP is undefined, then
        //     i. Append "null" to partial.
        // c. Else,
        //     i. Append strP to partial.
        partial.push(str_p.unwrap_or_else(|| "null".to_owned()));
        // d. Set index to index + 1.
    }
    // 9-13.
    Ok(leave_structure(state, partial, stepback, ('[', ']')))
}

#[cfg(test)]
mod tests {
    use super::quote_json_string;
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quote_json_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote_json_string("\u{1}\u{1f}"), r#""\u0001\u001f""#);
        assert_eq!(quote_json_string("é😀"), "\"é😀\"");
    }

    #[test]
    fn parse_builds_values_in_source_order() {
        assert_eq!(
            run_to_string(
                r#"var o = JSON.parse('{"b": 1, "a": [true, null, "x"], "n": -1.5e2, "b": 2}');
                   [Object.keys(o).join(), o.b, o.a.length, String(o.a[1]), o.a[2], o.n,
                    Array.isArray(o.a)].join(' ')"#
            ),
            "b,a,n 2 3 null x -150 true"
        );
    }

    #[test]
    fn parse_rounds_numbers_outside_the_f64_range() {
        assert_eq!(
            run_to_string(
                r#"var o = JSON.parse('[1e400, -1e400, 1e-400, -0, 12345678901234567890]');
                   [o[0], o[1], o[2], 1 / o[3], o[4]].join()"#
            ),
            "Infinity,-Infinity,0,-Infinity,12345678901234567000"
        );
    }

    #[test]
    fn parse_rejects_invalid_text() {
        assert_eq!(
            run_to_string(
                r#"["{a: 1}", "[1,]", "'x'", "", "01"]
                    .map(t => { try { JSON.parse(t); return 'ok' } catch (e) { return e.name } })
                    .join()"#
            ),
            "SyntaxError,SyntaxError,SyntaxError,SyntaxError,SyntaxError"
        );
    }

    #[test]
    fn reviver_transforms_and_deletes() {
        assert_eq!(
            run_to_string(
                r#"var seen = [];
                   var o = JSON.parse('{"a": 1, "b": {"c": 2}, "d": 3}', function (k, v) {
                       seen.push(k);
                       if (k === 'd') return undefined;
                       return typeof v === 'number' ? v * 10 : v;
                   });
                   [seen.join('|'), o.a, o.b.c, 'd' in o].join(' ')"#
            ),
            "a|c|b|d| 10 20 false"
        );
    }

    #[test]
    fn stringify_primitives_and_structures() {
        assert_eq!(
            run_to_string(
                r#"[JSON.stringify({ a: [1, 'x', null, undefined, () => 1], b: undefined,
                                     c: NaN, d: new Number(3), e: Object('s'), f: true }),
                    String(JSON.stringify(undefined)), String(JSON.stringify(function () {})),
                    JSON.stringify('a"b'), JSON.stringify(-0)].join(' ')"#
            ),
            r#"{"a":[1,"x",null,null,null],"c":null,"d":3,"e":"s","f":true} undefined undefined "a\"b" 0"#
        );
    }

    #[test]
    fn stringify_honours_to_json_and_replacers() {
        assert_eq!(
            run_to_string(
                r#"var o = { a: 1, b: 2, c: { a: 3, toJSON(key) { return 'c:' + key } } };
                   [JSON.stringify(o, ['a', 'c']),
                    JSON.stringify(o, (k, v) => typeof v === 'number' ? v + 1 : v),
                    JSON.stringify({ 1: 'x', 2: 'y' }, [1])].join(' ')"#
            ),
            r#"{"a":1,"c":"c:c"} {"a":2,"b":3,"c":"c:c"} {"1":"x"}"#
        );
    }

    #[test]
    fn stringify_indents_with_gap() {
        assert_eq!(
            run_to_string(r#"JSON.stringify({ a: [1, {}], b: [] }, null, 2)"#),
            "{\n  \"a\": [\n    1,\n    {}\n  ],\n  \"b\": []\n}"
        );
        assert_eq!(
            run_to_string(r#"JSON.stringify([1], null, '--------------')"#),
            "[\n----------1\n]"
        );
    }

    #[test]
    fn stringify_rejects_cycles_and_bigints() {
        assert_eq!(
            run_to_string(
                "var a = []; a.push(a);
                 [() => JSON.stringify(a), () => JSON.stringify({ n: 1n })]
                    .map(f => { try { f(); return 'ok' } catch (e) { return e.name } }).join()"
            ),
            "TypeError,TypeError"
        );
        assert_eq!(
            run_to_string("var shared = {}; JSON.stringify([shared, shared])"),
            "[{},{}]"
        );
    }
}
