// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{reg_exp_alloc, reg_exp_initialize};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::get,
        testing_and_comparison::{is_reg_exp, same_value},
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor},
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm},
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

pub(crate) struct RegExpConstructor;

impl Builtin for RegExpConstructor {
    const NAME: &'static str = "RegExp";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(RegExpConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for RegExpConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::RegExp;
}

struct RegExpGetSpecies;
impl Builtin for RegExpGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpConstructor::get_species);
}
impl BuiltinGetter for RegExpGetSpecies {}

impl RegExpConstructor {
    /// ### [22.2.4.1 RegExp ( pattern, flags )](https://tc39.es/ecma262/#sec-regexp-pattern-flags)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let pattern = arguments.get(0);
        let flags = arguments.get(1);
        // 1. Let patternIsRegExp be ? IsRegExp(pattern).
        let pattern_is_reg_exp = is_reg_exp(agent, pattern)?;
        // 2. If NewTarget is undefined, then
        let new_target = match new_target {
            Some(new_target) => new_target,
            None => {
                // a. Let newTarget be the active function object.
                let new_target = agent.intrinsics().regexp();
                // b. If patternIsRegExp is true and flags is undefined, then
                if pattern_is_reg_exp
                    && flags.is_undefined()
                    && let Value::Object(pattern) = pattern
                {
                    // i. Let patternConstructor be ? Get(pattern, "constructor").
                    let pattern_constructor =
                        get(agent, pattern, PropertyKey::from_str(agent, "constructor"))?;
                    // ii. If SameValue(newTarget, patternConstructor) is true,
                    // return pattern.
                    if same_value(agent, Value::Object(new_target), pattern_constructor) {
                        return Ok(Value::Object(pattern));
                    }
                }
                new_target
            }
        };
        // 4. If pattern is an Object and pattern has a [[RegExpMatcher]]
        // internal slot, then
        let original = match pattern {
            Value::Object(object) => match &agent.object(object).kind {
                ObjectKind::RegExp(data) => Some((data.original_source, data.original_flags)),
                _ => None,
            },
            _ => None,
        };
        let (p, f) = if let Some((source, original_flags)) = original {
            // a. Let P be pattern.[[OriginalSource]].
            // b. If flags is undefined, let F be pattern.[[OriginalFlags]].
            // c. Else, let F be flags.
            let f = if flags.is_undefined() {
                Value::from_string(agent, original_flags.to_string())
            } else {
                flags
            };
            (Value::String(source), f)
        } else if pattern_is_reg_exp && let Value::Object(pattern) = pattern {
            // 5. Else if patternIsRegExp is true, then
            // a. Let P be ? Get(pattern, "source").
            let p = get(agent, pattern, PropertyKey::from_str(agent, "source"))?;
            // b. If flags is undefined, then let F be ? Get(pattern, "flags").
            // c. Else, let F be flags.
            let f = if flags.is_undefined() {
                get(agent, pattern, PropertyKey::from_str(agent, "flags"))?
            } else {
                flags
            };
            (p, f)
        } else {
            // 6. Else,
            // a. Let P be pattern.
            // b. Let F be flags.
            (pattern, flags)
        };
        // 7. Let O be ? RegExpAlloc(newTarget).
        let o = reg_exp_alloc(agent, new_target)?;
        // 8. Return ? RegExpInitialize(O, P, F).
        reg_exp_initialize(agent, o, p, f).map(Value::Object)
    }

    /// ### [22.2.5.2 get RegExp \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-regexp-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let regexp_prototype = realm.intrinsics(agent).regexp_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<RegExpConstructor>(agent, realm)
            .with_property_capacity(2)
            .with_prototype_property(regexp_prototype)
            .with_builtin_function_getter_property::<RegExpGetSpecies>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn constructs_from_strings_and_regexps() {
        assert_eq!(
            run_to_string(
                "var r = /a+/gi; var copy = new RegExp(r, 'y');
                 [String(new RegExp('b/c', 'm')), String(copy), RegExp(r) === r,
                  new RegExp(r) === r, String(new RegExp(r)), String(RegExp())].join(' ')"
            ),
            "/b\\/c/m /a+/y true false /a+/gi /(?:)/"
        );
    }

    #[test]
    fn invalid_patterns_and_flags_throw_syntax_errors() {
        assert_eq!(
            run_to_string(
                "[() => new RegExp('a', 'gg'), () => new RegExp('('), () => new RegExp('(a)\\\\1')]
                    .map(f => { try { f(); return 'ok' } catch (e) { return e.name } }).join()"
            ),
            "SyntaxError,SyntaxError,SyntaxError"
        );
    }

    #[test]
    fn last_index_is_a_writable_own_property() {
        assert_eq!(
            run_to_string(
                "var d = Object.getOwnPropertyDescriptor(/a/, 'lastIndex');
                 [d.value, d.writable, d.enumerable, d.configurable, RegExp[Symbol.species] === RegExp].join()"
            ),
            "0,true,false,false,true"
        );
    }
}
