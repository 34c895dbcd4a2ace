// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.7.4 Well-Known Intrinsic Objects](https://tc39.es/ecma262/#sec-well-known-intrinsic-objects)
//!
//! Every intrinsic object of a realm is allocated up front as a blank
//! object, so that intrinsics can refer to each other while being populated
//! in any order.

#[cfg(feature = "json")]
use crate::ecmascript::builtins::structured_data::json_object::JSONObject;
#[cfg(feature = "regexp")]
use crate::ecmascript::builtins::text_processing::regexp_objects::{
    regexp_constructor::RegExpConstructor, regexp_prototype::RegExpPrototype,
};
use crate::ecmascript::{
    builtins::{
        console_object::ConsoleObject,
        control_abstraction_objects::{
            async_function_objects::{AsyncFunctionConstructor, AsyncFunctionPrototype},
            async_generator_function_objects::{
                AsyncGeneratorFunctionConstructor, AsyncGeneratorFunctionPrototype,
            },
            async_generator_objects::AsyncGeneratorPrototype,
            generator_function_objects::{GeneratorFunctionConstructor, GeneratorFunctionPrototype},
            generator_objects::GeneratorPrototype,
            iteration::{
                AsyncFromSyncIteratorPrototype, AsyncIteratorPrototype, IteratorPrototype,
            },
            promise_objects::{
                promise_constructor::PromiseConstructor, promise_prototype::PromisePrototype,
            },
        },
        fundamental_objects::{
            boolean_objects::{BooleanConstructor, BooleanPrototype},
            error_objects::{
                ErrorConstructor, ErrorPrototype, NativeErrorConstructors, NativeErrorPrototypes,
                ThrowTypeError,
            },
            function_objects::{
                function_constructor::FunctionConstructor, function_prototype::FunctionPrototype,
            },
            object_objects::{ObjectConstructor, ObjectPrototype},
            symbol_objects::{SymbolConstructor, SymbolPrototype},
        },
        global_object::GlobalObject,
        indexed_collections::{
            array_iterator_objects::ArrayIteratorPrototype,
            array_objects::{ArrayConstructor, ArrayPrototype},
            typed_array_objects::{TypedArrayConstructors, TypedArrayIntrinsicObject},
        },
        keyed_collections::{
            map_objects::{MapConstructor, MapIteratorPrototype, MapPrototype},
            set_objects::{SetConstructor, SetIteratorPrototype, SetPrototype},
        },
        numbers_and_dates::{
            bigint_objects::{BigIntConstructor, BigIntPrototype},
            math_object::MathObject,
            number_objects::{NumberConstructor, NumberPrototype},
        },
        reflection::{ProxyConstructor, ReflectObject},
        structured_data::array_buffer_objects::{ArrayBufferConstructor, ArrayBufferPrototype},
        text_processing::string_objects::{
            string_constructor::StringConstructor, string_iterator_objects::StringIteratorPrototype,
            string_prototype::StringPrototype,
        },
    },
    execution::{Agent, Realm},
    types::{Object, ObjectHeapData},
};

/// Enumerate the intrinsic objects of a realm: generates
/// [`IntrinsicObjectIndex`] and the [`Intrinsics`] table. Intrinsics listed
/// with a field name also get a named accessor; the rest are reached through
/// [`Intrinsics::get`].
macro_rules! intrinsics {
    ($($(#[doc = $doc:literal])* $variant:ident $(=> $field:ident)?,)*) => {
        /// Index of an intrinsic object within the [`Intrinsics`] of a realm.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub(crate) enum IntrinsicObjectIndex {
            $($(#[doc = $doc])* $variant,)*
        }

        impl IntrinsicObjectIndex {
            const COUNT: usize = [$(IntrinsicObjectIndex::$variant,)*].len();
        }

        /// The intrinsic objects of a realm.
        #[derive(Debug, Clone, Copy)]
        pub(crate) struct Intrinsics {
            objects: [Object; IntrinsicObjectIndex::COUNT],
        }

        impl Intrinsics {
            /// Allocate a blank object for every intrinsic.
            fn allocate(agent: &Agent) -> Self {
                let mut heap = agent.heap_mut();
                Self {
                    objects: core::array::from_fn(|_| {
                        heap.create_object(ObjectHeapData::default())
                    }),
                }
            }

            $($(
                pub(crate) fn $field(&self) -> Object {
                    self.objects[IntrinsicObjectIndex::$variant as usize]
                }
            )?)*

            pub(crate) fn get(&self, index: IntrinsicObjectIndex) -> Object {
                self.objects[index as usize]
            }
        }
    };
}

intrinsics! {
    /// %AggregateError%
    AggregateError => aggregate_error,
    /// %AggregateError.prototype%
    AggregateErrorPrototype => aggregate_error_prototype,
    /// %Array%
    Array => array,
    /// %Array.prototype%
    ArrayPrototype => array_prototype,
    /// %Array.prototype.toString%
    ArrayPrototypeToString => array_prototype_to_string,
    /// %Array.prototype.values%
    ArrayPrototypeValues => array_prototype_values,
    /// %ArrayIteratorPrototype%
    ArrayIteratorPrototype => array_iterator_prototype,
    /// %ArrayBuffer%
    ArrayBuffer => array_buffer,
    /// %ArrayBuffer.prototype%
    ArrayBufferPrototype => array_buffer_prototype,
    /// %AsyncFromSyncIteratorPrototype%
    AsyncFromSyncIteratorPrototype => async_from_sync_iterator_prototype,
    /// %AsyncFunction%
    AsyncFunction => async_function,
    /// %AsyncFunction.prototype%
    AsyncFunctionPrototype => async_function_prototype,
    /// %AsyncGeneratorFunction%
    AsyncGeneratorFunction => async_generator_function,
    /// %AsyncGeneratorFunction.prototype%
    AsyncGeneratorFunctionPrototype => async_generator_function_prototype,
    /// %AsyncGeneratorFunction.prototype.prototype%
    AsyncGeneratorPrototype => async_generator_prototype,
    /// %AsyncIteratorPrototype%
    AsyncIteratorPrototype => async_iterator_prototype,
    /// %BigInt%
    BigInt => bigint,
    /// %BigInt.prototype%
    BigIntPrototype => bigint_prototype,
    /// %Boolean%
    Boolean => boolean,
    /// %Boolean.prototype%
    BooleanPrototype => boolean_prototype,
    /// The `console` object.
    Console => console,
    /// %Error%
    Error => error,
    /// %Error.prototype%
    ErrorPrototype => error_prototype,
    /// %eval%
    Eval => eval,
    /// %EvalError%
    EvalError => eval_error,
    /// %EvalError.prototype%
    EvalErrorPrototype => eval_error_prototype,
    /// %Float32Array%
    Float32Array => float32_array,
    /// %Float32Array.prototype%
    Float32ArrayPrototype,
    /// %Float64Array%
    Float64Array => float64_array,
    /// %Float64Array.prototype%
    Float64ArrayPrototype,
    /// %Function%
    Function => function,
    /// %Function.prototype%
    FunctionPrototype => function_prototype,
    /// %GeneratorFunction%
    GeneratorFunction => generator_function,
    /// %GeneratorFunction.prototype%
    GeneratorFunctionPrototype => generator_function_prototype,
    /// %GeneratorFunction.prototype.prototype%
    GeneratorPrototype => generator_prototype,
    /// %Int8Array%
    Int8Array => int8_array,
    /// %Int8Array.prototype%
    Int8ArrayPrototype,
    /// %Int16Array%
    Int16Array => int16_array,
    /// %Int16Array.prototype%
    Int16ArrayPrototype,
    /// %Int32Array%
    Int32Array => int32_array,
    /// %Int32Array.prototype%
    Int32ArrayPrototype,
    /// %isFinite%
    IsFinite => is_finite,
    /// %isNaN%
    IsNaN => is_nan,
    /// %IteratorPrototype%
    IteratorPrototype => iterator_prototype,
    /// %JSON%
    Json => json,
    /// %Map%
    Map => map,
    /// %Map.prototype%
    MapPrototype => map_prototype,
    /// %MapIteratorPrototype%
    MapIteratorPrototype => map_iterator_prototype,
    /// %Math%
    Math => math,
    /// %Number%
    Number => number,
    /// %Number.prototype%
    NumberPrototype => number_prototype,
    /// %Object%
    Object => object,
    /// %Object.prototype%
    ObjectPrototype => object_prototype,
    /// %Object.prototype.toString%
    ObjectPrototypeToString => object_prototype_to_string,
    /// %parseFloat%
    ParseFloat => parse_float,
    /// %parseInt%
    ParseInt => parse_int,
    /// The `print` function.
    Print => print,
    /// %Promise%
    Promise => promise,
    /// %Promise.prototype%
    PromisePrototype => promise_prototype,
    /// %Proxy%
    Proxy => proxy,
    /// %RangeError%
    RangeError => range_error,
    /// %RangeError.prototype%
    RangeErrorPrototype => range_error_prototype,
    /// %ReferenceError%
    ReferenceError => reference_error,
    /// %ReferenceError.prototype%
    ReferenceErrorPrototype => reference_error_prototype,
    /// %Reflect%
    Reflect => reflect,
    /// %RegExp%
    RegExp => regexp,
    /// %RegExp.prototype%
    RegExpPrototype => regexp_prototype,
    /// %Set%
    Set => set,
    /// %Set.prototype%
    SetPrototype => set_prototype,
    /// %SetIteratorPrototype%
    SetIteratorPrototype => set_iterator_prototype,
    /// %String%
    String => string,
    /// %String.prototype%
    StringPrototype => string_prototype,
    /// %StringIteratorPrototype%
    StringIteratorPrototype => string_iterator_prototype,
    /// %Symbol%
    Symbol => symbol,
    /// %Symbol.prototype%
    SymbolPrototype => symbol_prototype,
    /// %SyntaxError%
    SyntaxError => syntax_error,
    /// %SyntaxError.prototype%
    SyntaxErrorPrototype => syntax_error_prototype,
    /// %ThrowTypeError%
    ThrowTypeError => throw_type_error,
    /// %TypedArray%
    TypedArray => typed_array,
    /// %TypedArray.prototype%
    TypedArrayPrototype => typed_array_prototype,
    /// %TypedArray.prototype.values%
    TypedArrayPrototypeValues => typed_array_prototype_values,
    /// %TypeError%
    TypeError => type_error,
    /// %TypeError.prototype%
    TypeErrorPrototype => type_error_prototype,
    /// %Uint8Array%
    Uint8Array => uint8_array,
    /// %Uint8Array.prototype%
    Uint8ArrayPrototype,
    /// %Uint8ClampedArray%
    Uint8ClampedArray => uint8_clamped_array,
    /// %Uint8ClampedArray.prototype%
    Uint8ClampedArrayPrototype,
    /// %Uint16Array%
    Uint16Array => uint16_array,
    /// %Uint16Array.prototype%
    Uint16ArrayPrototype,
    /// %Uint32Array%
    Uint32Array => uint32_array,
    /// %Uint32Array.prototype%
    Uint32ArrayPrototype,
    /// %URIError%
    UriError => uri_error,
    /// %URIError.prototype%
    UriErrorPrototype => uri_error_prototype,
}

/// Default prototypes selected by
/// [GetPrototypeFromConstructor](https://tc39.es/ecma262/#sec-getprototypefromconstructor)
/// when the constructor's `prototype` property is not an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProtoIntrinsics {
    AggregateError,
    Array,
    ArrayBuffer,
    AsyncFunction,
    AsyncGenerator,
    AsyncGeneratorFunction,
    Boolean,
    Error,
    EvalError,
    Float32Array,
    Float64Array,
    Function,
    Generator,
    GeneratorFunction,
    Int8Array,
    Int16Array,
    Int32Array,
    Map,
    Number,
    Object,
    Promise,
    RangeError,
    ReferenceError,
    RegExp,
    Set,
    String,
    SyntaxError,
    TypeError,
    Uint8Array,
    Uint8ClampedArray,
    Uint16Array,
    Uint32Array,
    UriError,
}

impl ProtoIntrinsics {
    pub(crate) const fn intrinsic(self) -> IntrinsicObjectIndex {
        match self {
            ProtoIntrinsics::AggregateError => IntrinsicObjectIndex::AggregateErrorPrototype,
            ProtoIntrinsics::Array => IntrinsicObjectIndex::ArrayPrototype,
            ProtoIntrinsics::ArrayBuffer => IntrinsicObjectIndex::ArrayBufferPrototype,
            ProtoIntrinsics::AsyncFunction => IntrinsicObjectIndex::AsyncFunctionPrototype,
            ProtoIntrinsics::AsyncGenerator => IntrinsicObjectIndex::AsyncGeneratorPrototype,
            ProtoIntrinsics::AsyncGeneratorFunction => {
                IntrinsicObjectIndex::AsyncGeneratorFunctionPrototype
            }
            ProtoIntrinsics::Boolean => IntrinsicObjectIndex::BooleanPrototype,
            ProtoIntrinsics::Error => IntrinsicObjectIndex::ErrorPrototype,
            ProtoIntrinsics::EvalError => IntrinsicObjectIndex::EvalErrorPrototype,
            ProtoIntrinsics::Float32Array => IntrinsicObjectIndex::Float32ArrayPrototype,
            ProtoIntrinsics::Float64Array => IntrinsicObjectIndex::Float64ArrayPrototype,
            ProtoIntrinsics::Function => IntrinsicObjectIndex::FunctionPrototype,
            ProtoIntrinsics::Generator => IntrinsicObjectIndex::GeneratorPrototype,
            ProtoIntrinsics::GeneratorFunction => IntrinsicObjectIndex::GeneratorFunctionPrototype,
            ProtoIntrinsics::Int8Array => IntrinsicObjectIndex::Int8ArrayPrototype,
            ProtoIntrinsics::Int16Array => IntrinsicObjectIndex::Int16ArrayPrototype,
            ProtoIntrinsics::Int32Array => IntrinsicObjectIndex::Int32ArrayPrototype,
            ProtoIntrinsics::Map => IntrinsicObjectIndex::MapPrototype,
            ProtoIntrinsics::Number => IntrinsicObjectIndex::NumberPrototype,
            ProtoIntrinsics::Object => IntrinsicObjectIndex::ObjectPrototype,
            ProtoIntrinsics::Promise => IntrinsicObjectIndex::PromisePrototype,
            ProtoIntrinsics::RangeError => IntrinsicObjectIndex::RangeErrorPrototype,
            ProtoIntrinsics::ReferenceError => IntrinsicObjectIndex::ReferenceErrorPrototype,
            ProtoIntrinsics::RegExp => IntrinsicObjectIndex::RegExpPrototype,
            ProtoIntrinsics::Set => IntrinsicObjectIndex::SetPrototype,
            ProtoIntrinsics::String => IntrinsicObjectIndex::StringPrototype,
            ProtoIntrinsics::SyntaxError => IntrinsicObjectIndex::SyntaxErrorPrototype,
            ProtoIntrinsics::TypeError => IntrinsicObjectIndex::TypeErrorPrototype,
            ProtoIntrinsics::Uint8Array => IntrinsicObjectIndex::Uint8ArrayPrototype,
            ProtoIntrinsics::Uint8ClampedArray => IntrinsicObjectIndex::Uint8ClampedArrayPrototype,
            ProtoIntrinsics::Uint16Array => IntrinsicObjectIndex::Uint16ArrayPrototype,
            ProtoIntrinsics::Uint32Array => IntrinsicObjectIndex::Uint32ArrayPrototype,
            ProtoIntrinsics::UriError => IntrinsicObjectIndex::UriErrorPrototype,
        }
    }
}

impl Intrinsics {
    /// ### [9.3.2 CreateIntrinsics ( realmRec )](https://tc39.es/ecma262/#sec-createintrinsics)
    ///
    /// Allocates the intrinsic objects; [`Intrinsics::populate`] fills them
    /// in once the realm record exists.
    pub(crate) fn create(agent: &Agent) -> Self {
        let intrinsics = Self::allocate(agent);
        debug_assert_eq!(
            intrinsics.uri_error_prototype().0 - intrinsics.aggregate_error().0 + 1,
            IntrinsicObjectIndex::COUNT as u32
        );
        intrinsics
    }

    /// Set the fields of every intrinsic object of `realm` with the values
    /// listed in ECMA-262 clauses 19 through 28.
    pub(crate) fn populate(agent: &Agent, realm: Realm) {
        // Fundamental prototypes first: every other intrinsic links to them.
        ObjectPrototype::create_intrinsic(agent, realm);
        FunctionPrototype::create_intrinsic(agent, realm);
        ObjectConstructor::create_intrinsic(agent, realm);
        FunctionConstructor::create_intrinsic(agent, realm);
        ThrowTypeError::create_intrinsic(agent, realm);
        GlobalObject::create_intrinsic(agent, realm);

        BooleanPrototype::create_intrinsic(agent, realm);
        BooleanConstructor::create_intrinsic(agent, realm);
        SymbolPrototype::create_intrinsic(agent, realm);
        SymbolConstructor::create_intrinsic(agent, realm);
        ErrorPrototype::create_intrinsic(agent, realm);
        ErrorConstructor::create_intrinsic(agent, realm);
        NativeErrorPrototypes::create_intrinsic(agent, realm);
        NativeErrorConstructors::create_intrinsic(agent, realm);

        NumberPrototype::create_intrinsic(agent, realm);
        NumberConstructor::create_intrinsic(agent, realm);
        BigIntPrototype::create_intrinsic(agent, realm);
        BigIntConstructor::create_intrinsic(agent, realm);
        MathObject::create_intrinsic(agent, realm);

        StringPrototype::create_intrinsic(agent, realm);
        StringConstructor::create_intrinsic(agent, realm);
        StringIteratorPrototype::create_intrinsic(agent, realm);
        #[cfg(feature = "regexp")]
        {
            RegExpPrototype::create_intrinsic(agent, realm);
            RegExpConstructor::create_intrinsic(agent, realm);
        }

        IteratorPrototype::create_intrinsic(agent, realm);
        AsyncIteratorPrototype::create_intrinsic(agent, realm);
        AsyncFromSyncIteratorPrototype::create_intrinsic(agent, realm);
        ArrayPrototype::create_intrinsic(agent, realm);
        ArrayConstructor::create_intrinsic(agent, realm);
        ArrayIteratorPrototype::create_intrinsic(agent, realm);
        TypedArrayIntrinsicObject::create_intrinsic(agent, realm);
        TypedArrayConstructors::create_intrinsic(agent, realm);

        MapPrototype::create_intrinsic(agent, realm);
        MapConstructor::create_intrinsic(agent, realm);
        MapIteratorPrototype::create_intrinsic(agent, realm);
        SetPrototype::create_intrinsic(agent, realm);
        SetConstructor::create_intrinsic(agent, realm);
        SetIteratorPrototype::create_intrinsic(agent, realm);

        ArrayBufferPrototype::create_intrinsic(agent, realm);
        ArrayBufferConstructor::create_intrinsic(agent, realm);
        #[cfg(feature = "json")]
        JSONObject::create_intrinsic(agent, realm);

        GeneratorFunctionPrototype::create_intrinsic(agent, realm);
        GeneratorFunctionConstructor::create_intrinsic(agent, realm);
        GeneratorPrototype::create_intrinsic(agent, realm);
        AsyncGeneratorFunctionPrototype::create_intrinsic(agent, realm);
        AsyncGeneratorFunctionConstructor::create_intrinsic(agent, realm);
        AsyncGeneratorPrototype::create_intrinsic(agent, realm);
        PromisePrototype::create_intrinsic(agent, realm);
        PromiseConstructor::create_intrinsic(agent, realm);
        AsyncFunctionPrototype::create_intrinsic(agent, realm);
        AsyncFunctionConstructor::create_intrinsic(agent, realm);

        ReflectObject::create_intrinsic(agent, realm);
        ProxyConstructor::create_intrinsic(agent, realm);
        ConsoleObject::create_intrinsic(agent, realm);
    }
}
