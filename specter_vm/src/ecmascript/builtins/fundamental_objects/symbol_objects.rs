// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.4 Symbol Objects](https://tc39.es/ecma262/#sec-symbol-objects)

use crate::ecmascript::{
    abstract_operations::type_conversion::to_string,
    builders::{
        builtin_function_builder::BuiltinFunctionBuilder,
        ordinary_object_builder::OrdinaryObjectBuilder,
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinGetter, BuiltinIntrinsicConstructor,
        primitive_objects::primitive_value,
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, PropertyKey, Symbol, Value},
};

pub(crate) struct SymbolConstructor;

impl Builtin for SymbolConstructor {
    const NAME: &'static str = "Symbol";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(SymbolConstructor::constructor);
}

impl BuiltinIntrinsicConstructor for SymbolConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Symbol;
}

struct SymbolFor;
impl Builtin for SymbolFor {
    const NAME: &'static str = "for";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolConstructor::r#for);
}

struct SymbolKeyFor;
impl Builtin for SymbolKeyFor {
    const NAME: &'static str = "keyFor";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolConstructor::key_for);
}

impl SymbolConstructor {
    /// ### [20.4.1.1 Symbol ( \[ description \] )](https://tc39.es/ecma262/#sec-symbol-description)
    fn constructor(
        agent: &Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is not undefined, throw a TypeError exception.
        if new_target.is_some() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Symbol is not a constructor",
            ));
        }
        // 2. If description is undefined, let descString be undefined.
        // 3. Else, let descString be ? ToString(description).
        let description = arguments.get(0);
        let desc_string = if description.is_undefined() {
            None
        } else {
            Some(to_string(agent, description)?)
        };
        // 4. Return a new Symbol whose [[Description]] is descString.
        Ok(Value::Symbol(Symbol::new(agent, desc_string)))
    }

    /// ### [20.4.2.2 Symbol.for ( key )](https://tc39.es/ecma262/#sec-symbol.for)
    fn r#for(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let stringKey be ? ToString(key).
        let string_key = to_string(agent, arguments.get(0))?;
        // 2. For each element e of the GlobalSymbolRegistry List, do
        //   a. If e.[[Key]] is stringKey, return e.[[Symbol]].
        if let Some(symbol) = agent.heap().global_symbol_registry.get(&string_key) {
            return Ok(Value::Symbol(*symbol));
        }
        // 4. Let newSymbol be a new Symbol whose [[Description]] is stringKey.
        let new_symbol = Symbol::new(agent, Some(string_key));
        // 5. Append the GlobalSymbolRegistry Record { [[Key]]: stringKey,
        // [[Symbol]]: newSymbol } to the GlobalSymbolRegistry List.
        agent
            .heap_mut()
            .global_symbol_registry
            .insert(string_key, new_symbol);
        // 6. Return newSymbol.
        Ok(Value::Symbol(new_symbol))
    }

    /// ### [20.4.2.6 Symbol.keyFor ( sym )](https://tc39.es/ecma262/#sec-symbol.keyfor)
    fn key_for(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If sym is not a Symbol, throw a TypeError exception.
        let Value::Symbol(sym) = arguments.get(0) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Symbol.keyFor requires a Symbol",
            ));
        };
        // 2. Return KeyForSymbol(sym).
        let key = agent
            .heap()
            .global_symbol_registry
            .iter()
            .find_map(|(key, symbol)| (*symbol == sym).then_some(*key));
        Ok(key.map_or(Value::Undefined, Value::String))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let symbol_prototype = realm.intrinsics(agent).symbol_prototype();
        let well_known = [
            ("asyncIterator", Symbol::ASYNC_ITERATOR),
            ("hasInstance", Symbol::HAS_INSTANCE),
            ("isConcatSpreadable", Symbol::IS_CONCAT_SPREADABLE),
            ("iterator", Symbol::ITERATOR),
            ("match", Symbol::MATCH),
            ("matchAll", Symbol::MATCH_ALL),
            ("replace", Symbol::REPLACE),
            ("search", Symbol::SEARCH),
            ("species", Symbol::SPECIES),
            ("split", Symbol::SPLIT),
            ("toPrimitive", Symbol::TO_PRIMITIVE),
            ("toStringTag", Symbol::TO_STRING_TAG),
            ("unscopables", Symbol::UNSCOPABLES),
        ];

        let mut builder =
            BuiltinFunctionBuilder::new_intrinsic_constructor::<SymbolConstructor>(agent, realm)
                .with_property_capacity(16)
                .with_builtin_function_property::<SymbolFor>()
                .with_builtin_function_property::<SymbolKeyFor>()
                .with_prototype_property(symbol_prototype);
        // The well-known symbols are exposed as { [[Writable]]: false,
        // [[Enumerable]]: false, [[Configurable]]: false } properties.
        for (name, symbol) in well_known {
            let key = PropertyKey::from_str(agent, name);
            builder = builder.with_property(|property| {
                property
                    .with_key(key)
                    .with_value_readonly(Value::Symbol(symbol))
                    .with_enumerable(false)
                    .with_configurable(false)
                    .build()
            });
        }
        builder.build();
    }
}

pub(crate) struct SymbolPrototype;

struct SymbolPrototypeGetDescription;
impl Builtin for SymbolPrototypeGetDescription {
    const NAME: &'static str = "description";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::get_description);
}
impl BuiltinGetter for SymbolPrototypeGetDescription {}

struct SymbolPrototypeToString;
impl Builtin for SymbolPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::to_string);
}

struct SymbolPrototypeValueOf;
impl Builtin for SymbolPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::value_of);
}

struct SymbolPrototypeToPrimitive;
impl Builtin for SymbolPrototypeToPrimitive {
    const NAME: &'static str = "[Symbol.toPrimitive]";
    const KEY: Option<Symbol> = Some(Symbol::TO_PRIMITIVE);
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::value_of);
    const WRITABLE: bool = false;
}

impl SymbolPrototype {
    /// ### [20.4.3.2 get Symbol.prototype.description](https://tc39.es/ecma262/#sec-symbol.prototype.description)
    fn get_description(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let s be the this value.
        // 2. Let sym be ? ThisSymbolValue(s).
        let sym = this_symbol_value(agent, this_value)?;
        // 3. Return sym.[[Description]].
        Ok(sym.description(agent).map_or(Value::Undefined, Value::String))
    }

    /// ### [20.4.3.3 Symbol.prototype.toString ( )](https://tc39.es/ecma262/#sec-symbol.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let sym be ? ThisSymbolValue(this value).
        let sym = this_symbol_value(agent, this_value)?;
        // 2. Return SymbolDescriptiveString(sym).
        Ok(Value::String(sym.descriptive_string(agent)))
    }

    /// ### [20.4.3.4 Symbol.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-symbol.prototype.valueof)
    ///
    /// Also [20.4.3.5 Symbol.prototype \[ %Symbol.toPrimitive% \] ( hint )](https://tc39.es/ecma262/#sec-symbol.prototype-%symbol.toprimitive%),
    /// which ignores its argument.
    fn value_of(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ThisSymbolValue(this value).
        this_symbol_value(agent, this_value).map(Value::Symbol)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.symbol_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(6)
            .with_prototype(intrinsics.object_prototype())
            .with_constructor_property(intrinsics.symbol())
            .with_builtin_function_getter_property::<SymbolPrototypeGetDescription>()
            .with_builtin_function_property::<SymbolPrototypeToString>()
            .with_builtin_function_property::<SymbolPrototypeValueOf>()
            .with_builtin_function_property::<SymbolPrototypeToPrimitive>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "Symbol"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

/// ### [20.4.3.4.1 ThisSymbolValue ( value )](https://tc39.es/ecma262/#sec-thissymbolvalue)
fn this_symbol_value(agent: &Agent, value: Value) -> JsResult<Symbol> {
    // 2. If value is an Object and value has a [[SymbolData]] internal slot,
    // then
    //   a. Let s be value.[[SymbolData]].
    let value = match value {
        Value::Object(o) => primitive_value(agent, o).unwrap_or(value),
        _ => value,
    };
    match value {
        // 1. If value is a Symbol, return value.
        Value::Symbol(symbol) => Ok(symbol),
        // 3. Throw a TypeError exception.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Symbol.prototype method called on incompatible receiver",
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn symbols_are_unique_and_describable() {
        assert_eq!(run_to_string("Symbol('a') === Symbol('a')"), "false");
        assert_eq!(run_to_string("Symbol('a').toString()"), "Symbol(a)");
        assert_eq!(run_to_string("Symbol('a').description"), "a");
        assert_eq!(run_to_string("Symbol().description"), "undefined");
        assert_eq!(run_to_string("try { new Symbol() } catch (e) { e.name }"), "TypeError");
    }

    #[test]
    fn registry_shares_symbols_by_key() {
        assert_eq!(run_to_string("Symbol.for('k') === Symbol.for('k')"), "true");
        assert_eq!(run_to_string("Symbol.keyFor(Symbol.for('k'))"), "k");
        assert_eq!(run_to_string("Symbol.keyFor(Symbol('k'))"), "undefined");
        assert_eq!(run_to_string("Symbol.keyFor(Symbol.iterator)"), "undefined");
    }

    #[test]
    fn well_known_symbols_are_frozen_statics() {
        assert_eq!(run_to_string("Symbol.iterator.toString()"), "Symbol(Symbol.iterator)");
        assert_eq!(
            run_to_string("Object.getOwnPropertyDescriptor(Symbol, 'iterator').writable"),
            "false"
        );
        assert_eq!(run_to_string("Object.prototype.toString.call(Symbol())"), "[object Symbol]");
        assert_eq!(run_to_string("try { Symbol() + '' } catch (e) { e.name }"), "TypeError");
    }
}
