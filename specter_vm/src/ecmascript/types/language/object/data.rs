// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Object, property_storage::PropertyStorage};
#[cfg(feature = "regexp")]
use crate::ecmascript::builtins::text_processing::regexp_objects::RegExpData;
use crate::ecmascript::{
    abstract_operations::operations_on_iterator_objects::IteratorRecord,
    builtins::{
        arguments::ArgumentsMap,
        bound_function::BoundFunctionData,
        builtin_function::{BuiltinClosureData, BuiltinFunctionData},
        control_abstraction_objects::{
            async_generator_objects::AsyncGeneratorData, generator_objects::GeneratorData,
            promise_objects::PromiseData,
        },
        ecmascript_function::ECMAScriptFunctionData,
        indexed_collections::array_iterator_objects::CollectionIteratorKind,
        keyed_collections::map_objects::MapData,
        module_namespace::ModuleNamespaceData,
        proxy::ProxyData,
        structured_data::array_buffer_objects::ArrayBufferData,
        typed_array::TypedArrayData,
    },
    execution::PrivateName,
    types::{HeapString, Value},
};

/// Heap representation of every object: the ordinary object slots plus the
/// internal slots of the object's kind.
#[derive(Debug)]
pub(crate) struct ObjectHeapData {
    /// ### \[\[Prototype\]\]
    pub(crate) prototype: Option<Object>,
    /// ### \[\[Extensible\]\]
    pub(crate) extensible: bool,
    pub(crate) properties: PropertyStorage,
    /// ### \[\[PrivateElements\]\]
    pub(crate) private_elements: Vec<PrivateElement>,
    pub(crate) kind: ObjectKind,
}

impl ObjectHeapData {
    pub(crate) fn new(prototype: Option<Object>, kind: ObjectKind) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: PropertyStorage::default(),
            private_elements: Vec::new(),
            kind,
        }
    }
}

impl Default for ObjectHeapData {
    fn default() -> Self {
        Self::new(None, ObjectKind::Ordinary)
    }
}

/// The internal slots that distinguish built-in and exotic objects from
/// ordinary objects.
#[derive(Debug, Default)]
pub(crate) enum ObjectKind {
    #[default]
    Ordinary,
    /// ### [10.4.7 Immutable Prototype Exotic Objects](https://tc39.es/ecma262/#sec-immutable-prototype-exotic-objects)
    ImmutablePrototype,
    /// ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
    ///
    /// The `length` property is stored as an ordinary data property.
    Array,
    /// ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
    ///
    /// Unmapped arguments objects carry no map and behave as ordinary
    /// objects.
    Arguments(Option<Box<ArgumentsMap>>),
    /// Boolean, Number, String, Symbol and BigInt objects. String objects
    /// are [String Exotic Objects](https://tc39.es/ecma262/#sec-string-exotic-objects).
    PrimitiveWrapper(Value),
    /// ### \[\[ErrorData\]\]
    Error,
    ECMAScriptFunction(Box<ECMAScriptFunctionData>),
    BuiltinFunction(BuiltinFunctionData),
    /// Built-in function created from an Abstract Closure.
    BuiltinClosure(BuiltinClosureData),
    BoundFunction(Box<BoundFunctionData>),
    Proxy(ProxyData),
    Promise(Box<PromiseData>),
    Generator(GeneratorData),
    AsyncGenerator(Box<AsyncGeneratorData>),
    /// ### \[\[SyncIteratorRecord\]\]
    AsyncFromSyncIterator(IteratorRecord),
    ArrayIterator {
        /// None once the iterator is exhausted.
        iterated: Option<Object>,
        next_index: u64,
        kind: CollectionIteratorKind,
    },
    StringIterator {
        iterated: Option<HeapString>,
        /// Position in UTF-16 code units.
        next_index: usize,
    },
    MapIterator {
        iterated: Option<Object>,
        next_index: usize,
        kind: CollectionIteratorKind,
    },
    SetIterator {
        iterated: Option<Object>,
        next_index: usize,
        kind: CollectionIteratorKind,
    },
    #[cfg(feature = "regexp")]
    RegExp(Box<RegExpData>),
    Map(Box<MapData>),
    Set(Box<MapData>),
    ArrayBuffer(ArrayBufferData),
    TypedArray(TypedArrayData),
    ModuleNamespace(Box<ModuleNamespaceData>),
}

/// Which internal method implementations an object uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExoticKind {
    Ordinary,
    ImmutablePrototype,
    Array,
    Arguments,
    StringExotic,
    Proxy,
    TypedArray,
    ModuleNamespace,
}

impl ObjectKind {
    pub(crate) fn exotic_kind(&self) -> ExoticKind {
        match self {
            ObjectKind::ImmutablePrototype => ExoticKind::ImmutablePrototype,
            ObjectKind::Array => ExoticKind::Array,
            ObjectKind::Arguments(Some(_)) => ExoticKind::Arguments,
            ObjectKind::PrimitiveWrapper(Value::String(_)) => ExoticKind::StringExotic,
            ObjectKind::Proxy(_) => ExoticKind::Proxy,
            ObjectKind::TypedArray(_) => ExoticKind::TypedArray,
            ObjectKind::ModuleNamespace(_) => ExoticKind::ModuleNamespace,
            _ => ExoticKind::Ordinary,
        }
    }
}

/// ### [6.2.10 PrivateElement Specification Type](https://tc39.es/ecma262/#sec-privateelement-specification-type)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PrivateElement {
    pub(crate) key: PrivateName,
    pub(crate) kind: PrivateElementKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PrivateElementKind {
    Field(Value),
    Method(Object),
    Accessor {
        get: Option<Object>,
        set: Option<Object>,
    },
}
