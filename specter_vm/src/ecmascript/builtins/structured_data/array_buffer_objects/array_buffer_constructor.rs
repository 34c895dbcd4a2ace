// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::allocate_array_buffer;
use crate::ecmascript::{
    abstract_operations::type_conversion::to_index,
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor,
        typed_array::typed_array_data,
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, Symbol, Value},
};

pub(crate) struct ArrayBufferConstructor;
impl Builtin for ArrayBufferConstructor {
    const NAME: &'static str = "ArrayBuffer";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ArrayBufferConstructor::constructor);
}
impl BuiltinIntrinsicConstructor for ArrayBufferConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ArrayBuffer;
}

struct ArrayBufferIsView;
impl Builtin for ArrayBufferIsView {
    const NAME: &'static str = "isView";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferConstructor::is_view);
}

struct ArrayBufferGetSpecies;
impl Builtin for ArrayBufferGetSpecies {
    const NAME: &'static str = "[Symbol.species]";
    const KEY: Option<Symbol> = Some(Symbol::SPECIES);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferConstructor::get_species);
}
impl BuiltinGetter for ArrayBufferGetSpecies {}

impl ArrayBufferConstructor {
    /// ### [25.1.4.1 ArrayBuffer ( length \[ , options \] )](https://tc39.es/ecma262/#sec-arraybuffer-constructor)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        let Some(new_target) = new_target else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Constructor ArrayBuffer requires 'new'",
            ));
        };
        // 2. Let byteLength be ? ToIndex(length).
        let byte_length = to_index(agent, arguments.get(0))?;
        // 4. Return ? AllocateArrayBuffer(NewTarget, byteLength, requestedMaxByteLength).
        allocate_array_buffer(agent, new_target, byte_length).map(Value::Object)
    }

    /// ### [25.1.5.1 ArrayBuffer.isView ( arg )](https://tc39.es/ecma262/#sec-arraybuffer.isview)
    fn is_view(agent: &Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If arg is not an Object, return false.
        // 2. If arg has a [[ViewedArrayBuffer]] internal slot, return true.
        // 3. Return false.
        let is_view = match arguments.get(0) {
            Value::Object(arg) => typed_array_data(agent, arg).is_some(),
            _ => false,
        };
        Ok(Value::Boolean(is_view))
    }

    /// ### [25.1.5.3 get ArrayBuffer \[ %Symbol.species% \]](https://tc39.es/ecma262/#sec-get-arraybuffer-%symbol.species%)
    fn get_species(_: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return the this value.
        Ok(this_value)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let array_buffer_prototype = realm.intrinsics(agent).array_buffer_prototype();
        BuiltinFunctionBuilder::new_intrinsic_constructor::<ArrayBufferConstructor>(agent, realm)
            .with_property_capacity(3)
            .with_builtin_function_property::<ArrayBufferIsView>()
            .with_prototype_property(array_buffer_prototype)
            .with_builtin_function_getter_property::<ArrayBufferGetSpecies>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn allocates_zeroed_buffers() {
        assert_eq!(
            run_to_string(
                "var b = new ArrayBuffer(8);
                 [b.byteLength, new ArrayBuffer().byteLength, new ArrayBuffer('3').byteLength,
                  Object.prototype.toString.call(b), ArrayBuffer[Symbol.species] === ArrayBuffer
                 ].join()"
            ),
            "8,0,3,[object ArrayBuffer],true"
        );
    }

    #[test]
    fn rejects_calls_and_bad_lengths() {
        assert_eq!(
            run_to_string(
                "[() => ArrayBuffer(1), () => new ArrayBuffer(-1), () => new ArrayBuffer(2 ** 53)]
                    .map(f => { try { f(); return 'ok' } catch (e) { return e.name } }).join()"
            ),
            "TypeError,RangeError,RangeError"
        );
    }

    #[test]
    fn is_view_recognises_typed_arrays() {
        assert_eq!(
            run_to_string(
                "[ArrayBuffer.isView(new Uint8Array(2)), ArrayBuffer.isView(new ArrayBuffer(2)),
                  ArrayBuffer.isView([]), ArrayBuffer.isView()].join()"
            ),
            "true,false,false,false"
        );
    }
}
