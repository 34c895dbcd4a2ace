// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.1.5 String Iterator Objects](https://tc39.es/ecma262/#sec-string-iterator-objects)

use crate::ecmascript::{
    abstract_operations::operations_on_iterator_objects::create_iter_result_object,
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin},
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{HeapString, Object, ObjectKind, PropertyKey, Symbol, Value},
};

/// Iterator over the code points of `string`, as created by
/// `String.prototype[%Symbol.iterator%]`.
pub(crate) fn create_string_iterator(agent: &Agent, string: HeapString) -> Object {
    Object::create(
        agent,
        Some(agent.intrinsics().string_iterator_prototype()),
        ObjectKind::StringIterator {
            iterated: Some(string),
            next_index: 0,
        },
    )
}

pub(crate) struct StringIteratorPrototype;

struct StringIteratorPrototypeNext;
impl Builtin for StringIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringIteratorPrototype::next);
}

impl StringIteratorPrototype {
    /// ### [22.1.5.1.1 %StringIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%stringiteratorprototype%.next)
    fn next(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? GeneratorResume(this value, EMPTY, "%StringIteratorPrototype%").
        let state = match this_value {
            Value::Object(iterator) => match agent.object(iterator).kind {
                ObjectKind::StringIterator {
                    iterated,
                    next_index,
                } => Some((iterator, iterated, next_index)),
                _ => None,
            },
            _ => None,
        };
        let Some((iterator, iterated, position)) = state else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "%StringIteratorPrototype%.next called on incompatible receiver",
            ));
        };
        // a. Let len be the length of s.
        // c. Repeat, while position < len,
        //     i. Let cp be CodePointAt(s, position).
        //     ii. Let nextIndex be position + cp.[[CodeUnitCount]].
        //     iii. Let resultString be the substring of s from position to
        //     nextIndex.
        //     iv. Set position to nextIndex.
        //     v. Perform ? GeneratorYield(CreateIteratorResultObject(
        //     resultString, false)).
        let next = iterated.and_then(|string| {
            let units = string.code_units(agent);
            let (_, count, _) = code_point_at(&units, position)?;
            Some(HeapString::from_code_units(agent, &units[position..position + count]))
                .map(|result| (result, position + count))
        });
        let result = match next {
            Some((result, next_index)) => {
                set_iterator_state(agent, iterator, iterated, next_index);
                create_iter_result_object(agent, Value::String(result), false)
            }
            // d. Return undefined.
            None => {
                set_iterator_state(agent, iterator, None, position);
                create_iter_result_object(agent, Value::Undefined, true)
            }
        };
        Ok(Value::Object(result))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.string_iterator_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(2)
            .with_prototype(intrinsics.iterator_prototype())
            .with_builtin_function_property::<StringIteratorPrototypeNext>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "String Iterator"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

fn set_iterator_state(
    agent: &Agent,
    iterator: Object,
    new_iterated: Option<HeapString>,
    new_next_index: usize,
) {
    if let ObjectKind::StringIterator {
        iterated,
        next_index,
    } = &mut agent.object_mut(iterator).kind
    {
        *iterated = new_iterated;
        *next_index = new_next_index;
    }
}

/// ### [11.1.4 Static Semantics: CodePointAt ( string, position )](https://tc39.es/ecma262/#sec-codepointat)
///
/// The code point at `position` with the number of code units it spans and
/// whether it is a lone surrogate, or None past the end.
pub(crate) fn code_point_at(units: &[u16], position: usize) -> Option<(u32, usize, bool)> {
    // 2. Let first be the code unit at index position within string.
    let first = *units.get(position)?;
    // 3. Let cp be the code point whose numeric value is the numeric value of
    // first.
    // 4. If first is neither a leading surrogate nor a trailing surrogate,
    // then return the Record { [[CodePoint]]: cp, [[CodeUnitCount]]: 1,
    // [[IsUnpairedSurrogate]]: false }.
    if !(0xD800..=0xDFFF).contains(&first) {
        return Some((u32::from(first), 1, false));
    }
    // 5. If first is a trailing surrogate or position + 1 = size, then
    // return { cp, 1, true }.
    if first >= 0xDC00 {
        return Some((u32::from(first), 1, true));
    }
    // 6. Let second be the code unit at index position + 1 within string.
    // 7. If second is not a trailing surrogate, then return { cp, 1, true }.
    match units.get(position + 1) {
        Some(&second) if (0xDC00..=0xDFFF).contains(&second) => {
            // 8. Set cp to UTF16SurrogatePairToCodePoint(first, second).
            let cp = (u32::from(first) - 0xD800) * 0x400 + (u32::from(second) - 0xDC00) + 0x10000;
            // 9. Return the Record { [[CodePoint]]: cp, [[CodeUnitCount]]: 2,
            // [[IsUnpairedSurrogate]]: false }.
            Some((cp, 2, false))
        }
        _ => Some((u32::from(first), 1, true)),
    }
}

#[cfg(test)]
mod tests {
    use super::code_point_at;
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn code_points_pair_surrogates() {
        let units: Vec<u16> = "a😀".encode_utf16().collect();
        assert_eq!(code_point_at(&units, 0), Some((0x61, 1, false)));
        assert_eq!(code_point_at(&units, 1), Some((0x1F600, 2, false)));
        assert_eq!(code_point_at(&units, 2), Some((0xDE00, 1, true)));
        assert_eq!(code_point_at(&units, 3), None);
    }

    #[test]
    fn iterates_by_code_point() {
        assert_eq!(
            run_to_string("var parts = []; for (var c of 'a😀b') parts.push(c.length); parts.join()"),
            "1,2,1"
        );
        assert_eq!(
            run_to_string(
                "var it = ''[Symbol.iterator](); it.next();
                 Object.prototype.toString.call(it) + ':' + it.next().done"
            ),
            "[object String Iterator]:true"
        );
    }
}
