// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{array_buffer_byte_length, copy_buffer_bytes};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{construct, species_constructor},
        type_conversion::to_integer_or_infinity,
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, BuiltinGetter},
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{Object, PropertyKey, Symbol, Value},
};

pub(crate) struct ArrayBufferPrototype;

struct ArrayBufferPrototypeGetByteLength;
impl Builtin for ArrayBufferPrototypeGetByteLength {
    const NAME: &'static str = "byteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::get_byte_length);
}
impl BuiltinGetter for ArrayBufferPrototypeGetByteLength {}

struct ArrayBufferPrototypeSlice;
impl Builtin for ArrayBufferPrototypeSlice {
    const NAME: &'static str = "slice";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::slice);
}

/// RequireInternalSlot(O, \[\[ArrayBufferData\]\]), returning the buffer and
/// its byte length.
fn require_array_buffer(agent: &Agent, o: Value, method: &str) -> JsResult<(Object, usize)> {
    if let Value::Object(buffer) = o
        && let Some(len) = array_buffer_byte_length(agent, buffer)
    {
        return Ok((buffer, len));
    }
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        format!("{method} called on incompatible receiver"),
    ))
}

/// Resolve a relative byte position against `len`.
fn relative_position(agent: &Agent, value: Value, len: usize, default: usize) -> JsResult<usize> {
    if value.is_undefined() {
        return Ok(default);
    }
    let relative = to_integer_or_infinity(agent, value)?;
    let len = len as f64;
    let position = if relative < 0.0 {
        (len + relative).max(0.0)
    } else {
        relative.min(len)
    };
    Ok(position as usize)
}

impl ArrayBufferPrototype {
    /// ### [25.1.6.2 get ArrayBuffer.prototype.byteLength](https://tc39.es/ecma262/#sec-get-arraybuffer.prototype.bytelength)
    fn get_byte_length(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 3. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        // 4. If IsDetachedBuffer(O) is true, return +0𝔽.
        // 5. Let length be O.[[ArrayBufferByteLength]].
        let (_, length) =
            require_array_buffer(agent, this_value, "get ArrayBuffer.prototype.byteLength")?;
        // 6. Return 𝔽(length).
        Ok(Value::from(length))
    }

    /// ### [25.1.6.7 ArrayBuffer.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-arraybuffer.prototype.slice)
    fn slice(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 5. Let len be O.[[ArrayBufferByteLength]].
        let (o, len) = require_array_buffer(agent, this_value, "ArrayBuffer.prototype.slice")?;
        // 6-8. Let first be the resolved start.
        let first = relative_position(agent, arguments.get(0), len, 0)?;
        // 9-11. Let final be the resolved end.
        let r#final = relative_position(agent, arguments.get(1), len, len)?;
        // 12. Let newLen be max(final - first, 0).
        let new_len = r#final.saturating_sub(first);
        // 13. Let ctor be ? SpeciesConstructor(O, %ArrayBuffer%).
        let ctor = species_constructor(agent, o, agent.intrinsics().array_buffer())?;
        // 14. Let new be ? Construct(ctor, « 𝔽(newLen) »).
        let new = construct(agent, ctor, &[Value::from(new_len)], None)?;
        // 15. Perform ? RequireInternalSlot(new, [[ArrayBufferData]]).
        let Some(new_byte_length) = array_buffer_byte_length(agent, new) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Species constructor did not return an ArrayBuffer",
            ));
        };
        // 18. If SameValue(new, O) is true, throw a TypeError exception.
        if new == o {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Species constructor returned the same ArrayBuffer",
            ));
        }
        // 19. If new.[[ArrayBufferByteLength]] < newLen, throw a TypeError exception.
        if new_byte_length < new_len {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Species constructor returned a too small ArrayBuffer",
            ));
        }
        // 22. Let fromBuf be O.[[ArrayBufferData]].
        // 23. Let toBuf be new.[[ArrayBufferData]].
        // 24. Let currentLen be O.[[ArrayBufferByteLength]].
        // 25. If first < currentLen, then
        //     a. Let count be min(newLen, currentLen - first).
        //     b. Perform CopyDataBlockBytes(toBuf, 0, fromBuf, first, count).
        if first < len {
            copy_buffer_bytes(agent, o, first, new, 0, new_len.min(len - first));
        }
        // 26. Return new.
        Ok(Value::Object(new))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.array_buffer_prototype();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(4)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_getter_property::<ArrayBufferPrototypeGetByteLength>()
            .with_constructor_property(intrinsics.array_buffer())
            .with_builtin_function_property::<ArrayBufferPrototypeSlice>()
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::TO_STRING_TAG))
                    .with_value_readonly(Value::from_str(agent, "ArrayBuffer"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn slice_copies_a_byte_range() {
        assert_eq!(
            run_to_string(
                "var bytes = new Uint8Array([1, 2, 3, 4, 5]);
                 var copy = bytes.buffer.slice(1, -1);
                 bytes[2] = 9;
                 [copy.byteLength, Array.from(new Uint8Array(copy)).join(),
                  bytes.buffer.slice(4, 1).byteLength, bytes.buffer.slice(-2).byteLength].join(' ')"
            ),
            "3 2,3,4 0 2"
        );
    }

    #[test]
    fn slice_checks_the_species_result() {
        assert_eq!(
            run_to_string(
                "var b = new ArrayBuffer(4);
                 b.constructor = { [Symbol.species]: function () { return b } };
                 try { b.slice(0) } catch (e) { e.name }"
            ),
            "TypeError"
        );
        assert_eq!(
            run_to_string(
                "try { ArrayBuffer.prototype.slice.call(new Uint8Array(1)) } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }
}
