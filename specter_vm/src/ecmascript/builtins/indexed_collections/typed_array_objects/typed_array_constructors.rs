// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.2.5 The TypedArray Constructors](https://tc39.es/ecma262/#sec-typedarray-constructors)
//! and [23.2.7 Properties of the TypedArray Prototype Objects](https://tc39.es/ecma262/#sec-properties-of-typedarray-prototype-objects)

use super::abstract_operations::{allocate_typed_array, initialize_typed_array_from_object};
use crate::ecmascript::{
    abstract_operations::type_conversion::to_index,
    builders::{
        builtin_function_builder::BuiltinFunctionBuilder,
        ordinary_object_builder::OrdinaryObjectBuilder,
        property_builder::{NoKey, PropertyBuilder},
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor, typed_array::TypedArrayKind,
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, Property, PropertyKey, Value},
};

/// Defines the constructor struct of one TypedArray kind.
macro_rules! typed_array_constructor {
    ($name:ident, $kind:ident, $method:ident) => {
        struct $name;
        impl Builtin for $name {
            const NAME: &'static str = TypedArrayKind::$kind.name();
            const LENGTH: u8 = 3;
            const BEHAVIOUR: Behaviour = Behaviour::Constructor(TypedArrayConstructors::$method);
        }
        impl BuiltinIntrinsicConstructor for $name {
            const INDEX: IntrinsicObjectIndex = TypedArrayKind::$kind.constructor_intrinsic();
        }
    };
}

typed_array_constructor!(Int8ArrayConstructor, Int8, int8_array_constructor);
typed_array_constructor!(Uint8ArrayConstructor, Uint8, uint8_array_constructor);
typed_array_constructor!(
    Uint8ClampedArrayConstructor,
    Uint8Clamped,
    uint8_clamped_array_constructor
);
typed_array_constructor!(Int16ArrayConstructor, Int16, int16_array_constructor);
typed_array_constructor!(Uint16ArrayConstructor, Uint16, uint16_array_constructor);
typed_array_constructor!(Int32ArrayConstructor, Int32, int32_array_constructor);
typed_array_constructor!(Uint32ArrayConstructor, Uint32, uint32_array_constructor);
typed_array_constructor!(Float32ArrayConstructor, Float32, float32_array_constructor);
typed_array_constructor!(Float64ArrayConstructor, Float64, float64_array_constructor);

pub(crate) struct TypedArrayConstructors;

impl TypedArrayConstructors {
    /// ### [23.2.5.1 TypedArray ( ...args )](https://tc39.es/ecma262/#sec-typedarray)
    fn constructor(
        agent: &Agent,
        kind: TypedArrayKind,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        let Some(new_target) = new_target else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("Constructor {} requires 'new'", kind.name()),
            ));
        };
        // 2. Let constructorName be the String value of the Constructor Name
        // value specified in Table 71 for this TypedArray constructor.
        // 3. Let proto be "%TypedArray.prototype%".
        // 4. Let numberOfArgs be the number of elements in args.
        // 5. If numberOfArgs = 0, then
        //     a. Return ? AllocateTypedArray(constructorName, NewTarget, proto, 0).
        // 6. Else,
        //     a. Let firstArgument be args[0].
        let first_argument = arguments.get(0);
        //     b. If firstArgument is an Object, then
        if let Value::Object(first_argument) = first_argument {
            let o = initialize_typed_array_from_object(
                agent,
                kind,
                new_target,
                first_argument,
                arguments.get(1),
                arguments.get(2),
            )?;
            // v. Return O.
            return Ok(Value::Object(o));
        }
        // c. Else,
        //     i. Assert: firstArgument is not an Object.
        //     ii. Let elementLength be ? ToIndex(firstArgument).
        let element_length = to_index(agent, first_argument)?;
        //     iii. Return ? AllocateTypedArray(constructorName, NewTarget,
        //     proto, elementLength).
        allocate_typed_array(agent, kind, new_target, element_length).map(Value::Object)
    }

    fn int8_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Int8, arguments, new_target)
    }

    fn uint8_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Uint8, arguments, new_target)
    }

    fn uint8_clamped_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Uint8Clamped, arguments, new_target)
    }

    fn int16_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Int16, arguments, new_target)
    }

    fn uint16_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Uint16, arguments, new_target)
    }

    fn int32_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Int32, arguments, new_target)
    }

    fn uint32_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Uint32, arguments, new_target)
    }

    fn float32_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Float32, arguments, new_target)
    }

    fn float64_array_constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        Self::constructor(agent, TypedArrayKind::Float64, arguments, new_target)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        create_typed_array::<Int8ArrayConstructor>(agent, realm, TypedArrayKind::Int8);
        create_typed_array::<Uint8ArrayConstructor>(agent, realm, TypedArrayKind::Uint8);
        create_typed_array::<Uint8ClampedArrayConstructor>(
            agent,
            realm,
            TypedArrayKind::Uint8Clamped,
        );
        create_typed_array::<Int16ArrayConstructor>(agent, realm, TypedArrayKind::Int16);
        create_typed_array::<Uint16ArrayConstructor>(agent, realm, TypedArrayKind::Uint16);
        create_typed_array::<Int32ArrayConstructor>(agent, realm, TypedArrayKind::Int32);
        create_typed_array::<Uint32ArrayConstructor>(agent, realm, TypedArrayKind::Uint32);
        create_typed_array::<Float32ArrayConstructor>(agent, realm, TypedArrayKind::Float32);
        create_typed_array::<Float64ArrayConstructor>(agent, realm, TypedArrayKind::Float64);
    }
}

/// Build one TypedArray constructor and its prototype object.
fn create_typed_array<T: BuiltinIntrinsicConstructor>(
    agent: &Agent,
    realm: Realm,
    kind: TypedArrayKind,
) {
    let intrinsics = realm.intrinsics(agent);
    let constructor = intrinsics.get(T::INDEX);
    let prototype = intrinsics.get(kind.proto_intrinsics().intrinsic());
    // 23.2.6 Properties of the TypedArray Constructors
    // The [[Prototype]] of each TypedArray constructor is %TypedArray%.
    BuiltinFunctionBuilder::new_intrinsic_constructor::<T>(agent, realm)
        .with_property_capacity(2)
        .with_prototype(intrinsics.typed_array())
        .with_property(|property| bytes_per_element(property, kind))
        .with_prototype_property(prototype)
        .build();

    // The [[Prototype]] of each TypedArray prototype is %TypedArray.prototype%.
    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, prototype)
        .with_property_capacity(2)
        .with_prototype(intrinsics.typed_array_prototype())
        .with_property(|property| bytes_per_element(property, kind))
        .with_constructor_property(constructor)
        .build();
}

/// ### [23.2.6.1 TypedArray.BYTES_PER_ELEMENT](https://tc39.es/ecma262/#sec-typedarray.bytes_per_element)
/// and [23.2.7.1 TypedArray.prototype.BYTES_PER_ELEMENT](https://tc39.es/ecma262/#sec-typedarray.prototype.bytes_per_element)
fn bytes_per_element(
    property: PropertyBuilder<'_, NoKey>,
    kind: TypedArrayKind,
) -> (PropertyKey, Property) {
    let agent = property.agent;
    property
        .with_key(PropertyKey::from_str(agent, "BYTES_PER_ELEMENT"))
        .with_value_readonly(Value::from(kind.element_size()))
        .with_enumerable(false)
        .with_configurable(false)
        .build()
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn constructs_from_lengths_and_lists() {
        assert_eq!(
            run_to_string(
                "var a = new Uint8Array(3); var b = new Int16Array([1, -2, 70000]);
                 var c = new Float64Array(new Set([0.5, 1.5]));
                 var d = new Int8Array({ length: 2, 0: 200, 1: '7' });
                 [a.length, a.join(), b.join(), c.join(), d.join()].join(' ')"
            ),
            "3 0,0,0 1,-2,4464 0.5,1.5 -56,7"
        );
    }

    #[test]
    fn constructor_requires_new_and_a_valid_length() {
        assert_eq!(
            run_to_string("try { Uint8Array(2) } catch (e) { e.name }"),
            "TypeError"
        );
        assert_eq!(
            run_to_string("try { new Uint8Array(-1) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn views_share_an_array_buffer() {
        assert_eq!(
            run_to_string(
                "var buffer = new ArrayBuffer(8);
                 var bytes = new Uint8Array(buffer, 4); var words = new Uint16Array(buffer, 2, 1);
                 bytes[0] = 1; words[0] = 0x0302;
                 [bytes.length, bytes.byteOffset, words.byteLength,
                  new Uint8Array(buffer).join()].join(' ')"
            ),
            "4 4 2 0,0,2,3,1,0,0,0"
        );
        assert_eq!(
            run_to_string("try { new Int32Array(new ArrayBuffer(8), 2) } catch (e) { e.name }"),
            "RangeError"
        );
        assert_eq!(
            run_to_string("try { new Int32Array(new ArrayBuffer(6)) } catch (e) { e.name }"),
            "RangeError"
        );
        assert_eq!(
            run_to_string("try { new Uint8Array(new ArrayBuffer(4), 2, 3) } catch (e) { e.name }"),
            "RangeError"
        );
    }

    #[test]
    fn copies_other_typed_arrays() {
        assert_eq!(
            run_to_string(
                "var source = new Float32Array([1.5, -1, 300]);
                 var copy = new Float32Array(source); copy[0] = 9;
                 [source[0], copy[0], new Uint8ClampedArray(source).join()].join(' ')"
            ),
            "1.5 9 2,0,255"
        );
    }

    #[test]
    fn prototype_chain_and_bytes_per_element() {
        assert_eq!(
            run_to_string(
                "var TypedArray = Object.getPrototypeOf(Int8Array);
                 [Float64Array.BYTES_PER_ELEMENT, Int16Array.prototype.BYTES_PER_ELEMENT,
                  Object.getPrototypeOf(Uint32Array.prototype) === TypedArray.prototype,
                  Uint32Array.prototype.constructor === Uint32Array, Uint8Array.name,
                  Uint8Array.length, new Int8Array(1) instanceof TypedArray].join()"
            ),
            "8,2,true,true,Uint8Array,3,true"
        );
    }

    #[test]
    fn subclasses_keep_their_prototype() {
        assert_eq!(
            run_to_string(
                "class Bytes extends Uint8Array { sum() { return this.reduce((a, b) => a + b) } }
                 var bytes = new Bytes([1, 2, 3]);
                 [bytes instanceof Bytes, bytes.sum(), bytes.map(x => x * 2) instanceof Bytes].join()"
            ),
            "true,6,true"
        );
    }
}
