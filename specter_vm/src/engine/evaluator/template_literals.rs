// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [13.2.8 Template Literals](https://tc39.es/ecma262/#sec-template-literals)

use std::rc::Rc;

use specter_ast::ast::TemplateLiteral;

use super::evaluate_expression;
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{IntegrityLevel, define_property_or_throw, set_integrity_level},
        type_conversion::to_string,
    },
    builtins::array::array_create,
    execution::{Agent, JsResult},
    types::{Completion, HeapString, Object, PropertyDescriptor, PropertyKey, Value},
};

/// ### [13.2.8.6 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-template-literals-runtime-semantics-evaluation)
pub(super) async fn evaluate_template_literal(
    agent: &Agent,
    template: &TemplateLiteral,
) -> Completion<Value> {
    let mut parts = Vec::with_capacity(template.quasis.len() + template.expressions.len());
    for (index, quasi) in template.quasis.iter().enumerate() {
        // 1. Let head be the TV of TemplateHead.
        // Untagged templates never contain invalid escapes, so the cooked
        // value is present.
        let cooked = quasi.cooked.as_deref().unwrap_or_default();
        parts.push(HeapString::from_str(agent, cooked));
        let Some(expression) = template.expressions.get(index) else {
            break;
        };
        // 2. Let subRef be ? Evaluation of Expression.
        // 3. Let sub be ? GetValue(subRef).
        let sub = evaluate_expression(agent, expression).await?;
        // 4. Let middle be ? ToString(sub).
        parts.push(to_string(agent, sub)?);
    }
    // 5. Let tail be ? Evaluation of TemplateSpans.
    // 6. Return the string-concatenation of head, middle, and tail.
    Ok(Value::String(HeapString::concat(agent, &parts)))
}

/// ### [13.2.8.4 GetTemplateObject ( templateLiteral )](https://tc39.es/ecma262/#sec-gettemplateobject)
pub(super) fn get_template_object(
    agent: &Agent,
    template_literal: &Rc<TemplateLiteral>,
) -> JsResult<Object> {
    // 1. Let realm be the current Realm Record.
    let realm = agent.current_realm();
    // 2. Let templateRegistry be realm.[[TemplateMap]].
    // 3. For each element e of templateRegistry, do
    // a. If e.[[Site]] is the same Parse Node as templateLiteral, then
    // i. Return e.[[Array]].
    let existing = agent
        .realm_record(realm)
        .template_map
        .iter()
        .find(|(site, _)| Rc::ptr_eq(site, template_literal))
        .map(|(_, array)| *array);
    if let Some(array) = existing {
        return Ok(array);
    }
    // 4. Let rawStrings be the TemplateStrings of templateLiteral with
    // argument true.
    // 6. Let cookedStrings be the TemplateStrings of templateLiteral with
    // argument false.
    // 7. Let count be the number of elements in the List cookedStrings.
    let count = template_literal.quasis.len();
    // 9. Let template be ! ArrayCreate(count).
    let template = array_create(agent, count as u64, None);
    // 10. Let rawObj be ! ArrayCreate(count).
    let raw_obj = array_create(agent, count as u64, None);
    // 11. Let index be 0.
    // 12. Repeat, while index < count,
    for (index, quasi) in template_literal.quasis.iter().enumerate() {
        // a. Let prop be ! ToString(𝔽(index)).
        let prop = PropertyKey::from_index(agent, index as u64);
        // b. Let cookedValue be cookedStrings[index].
        let cooked_value = quasi
            .cooked
            .as_deref()
            .map_or(Value::Undefined, |cooked| Value::from_str(agent, cooked));
        // c. Perform ! DefinePropertyOrThrow(template, prop, PropertyDescriptor {
        // [[Value]]: cookedValue, [[Writable]]: false, [[Enumerable]]: true,
        // [[Configurable]]: false }).
        define_property_or_throw(agent, template, prop, frozen_element(cooked_value))?;
        // d. Let rawValue be the String value rawStrings[index].
        let raw_value = Value::from_str(agent, &quasi.raw);
        // e. Perform ! DefinePropertyOrThrow(rawObj, prop, PropertyDescriptor {
        // [[Value]]: rawValue, [[Writable]]: false, [[Enumerable]]: true,
        // [[Configurable]]: false }).
        define_property_or_throw(agent, raw_obj, prop, frozen_element(raw_value))?;
        // f. Set index to index + 1.
    }
    // 13. Perform ! SetIntegrityLevel(rawObj, FROZEN).
    set_integrity_level(agent, raw_obj, IntegrityLevel::Frozen)?;
    // 14. Perform ! DefinePropertyOrThrow(template, "raw", PropertyDescriptor {
    // [[Value]]: rawObj, [[Writable]]: false, [[Enumerable]]: false,
    // [[Configurable]]: false }).
    let raw_key = PropertyKey::from_str(agent, "raw");
    define_property_or_throw(
        agent,
        template,
        raw_key,
        PropertyDescriptor {
            value: Some(Value::Object(raw_obj)),
            writable: Some(false),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        },
    )?;
    // 15. Perform ! SetIntegrityLevel(template, FROZEN).
    set_integrity_level(agent, template, IntegrityLevel::Frozen)?;
    // 16. Append the Record { [[Site]]: templateLiteral, [[Array]]: template }
    // to realm.[[TemplateMap]].
    agent
        .realm_record_mut(realm)
        .template_map
        .push((template_literal.clone(), template));
    // 17. Return template.
    Ok(template)
}

fn frozen_element(value: Value) -> PropertyDescriptor {
    PropertyDescriptor {
        value: Some(value),
        writable: Some(false),
        enumerable: Some(true),
        configurable: Some(false),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn substitutions_are_converted_with_to_string() {
        assert_eq!(run_to_string("var n = 2; `a${n}b${n * 2}c`"), "a2b4c");
        assert_eq!(run_to_string("`${{ toString() { return 'x'; } }}`"), "x");
    }

    #[test]
    fn template_objects_are_cached_per_site() {
        assert_eq!(
            run_to_string(
                "function tag(s) { return s; }
                 function f() { return tag`a${1}b`; }
                 f() === f() && Object.isFrozen(f()) && f().raw[1] === 'b'"
            ),
            "true"
        );
        assert_eq!(
            run_to_string("function tag(s) { return s; } tag`x` === tag`x`"),
            "false"
        );
    }

    #[test]
    fn invalid_escapes_cook_to_undefined_in_tagged_templates() {
        assert_eq!(
            run_to_string("(s => s[0] === undefined && s.raw[0] === '\\\\unicode')`\\unicode`"),
            "true"
        );
    }
}
