// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{get, has_own_property, invoke},
        testing_and_comparison::{is_array, is_callable},
        type_conversion::{to_object, to_property_key},
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, BuiltinIntrinsic},
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm},
    types::{InternalMethods, ObjectKind, PropertyKey, Symbol, Value},
};
#[cfg(feature = "annex-b")]
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::define_property_or_throw,
        testing_and_comparison::require_object_coercible,
    },
    execution::agent::ExceptionType,
    types::PropertyDescriptor,
};

pub(crate) struct ObjectPrototype;

struct ObjectPrototypeHasOwnProperty;
impl Builtin for ObjectPrototypeHasOwnProperty {
    const NAME: &'static str = "hasOwnProperty";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::has_own_property);
}
struct ObjectPrototypeIsPrototypeOf;
impl Builtin for ObjectPrototypeIsPrototypeOf {
    const NAME: &'static str = "isPrototypeOf";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::is_prototype_of);
}
struct ObjectPrototypePropertyIsEnumerable;
impl Builtin for ObjectPrototypePropertyIsEnumerable {
    const NAME: &'static str = "propertyIsEnumerable";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::property_is_enumerable);
}
struct ObjectPrototypeToLocaleString;
impl Builtin for ObjectPrototypeToLocaleString {
    const NAME: &'static str = "toLocaleString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::to_locale_string);
}
pub(crate) struct ObjectPrototypeToString;
impl Builtin for ObjectPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::to_string);
}
impl BuiltinIntrinsic for ObjectPrototypeToString {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ObjectPrototypeToString;
}
struct ObjectPrototypeValueOf;
impl Builtin for ObjectPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::value_of);
}

#[cfg(feature = "annex-b")]
struct ObjectPrototypeGetProto;
#[cfg(feature = "annex-b")]
impl Builtin for ObjectPrototypeGetProto {
    const NAME: &'static str = "get __proto__";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::get_proto);
}
#[cfg(feature = "annex-b")]
struct ObjectPrototypeSetProto;
#[cfg(feature = "annex-b")]
impl Builtin for ObjectPrototypeSetProto {
    const NAME: &'static str = "set __proto__";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::set_proto);
}
#[cfg(feature = "annex-b")]
struct ObjectPrototypeDefineGetter;
#[cfg(feature = "annex-b")]
impl Builtin for ObjectPrototypeDefineGetter {
    const NAME: &'static str = "__defineGetter__";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::define_getter);
}
#[cfg(feature = "annex-b")]
struct ObjectPrototypeDefineSetter;
#[cfg(feature = "annex-b")]
impl Builtin for ObjectPrototypeDefineSetter {
    const NAME: &'static str = "__defineSetter__";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::define_setter);
}
#[cfg(feature = "annex-b")]
struct ObjectPrototypeLookupGetter;
#[cfg(feature = "annex-b")]
impl Builtin for ObjectPrototypeLookupGetter {
    const NAME: &'static str = "__lookupGetter__";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::lookup_getter);
}
#[cfg(feature = "annex-b")]
struct ObjectPrototypeLookupSetter;
#[cfg(feature = "annex-b")]
impl Builtin for ObjectPrototypeLookupSetter {
    const NAME: &'static str = "__lookupSetter__";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::lookup_setter);
}

impl ObjectPrototype {
    /// ### [20.1.3.2 Object.prototype.hasOwnProperty ( V )](https://tc39.es/ecma262/#sec-object.prototype.hasownproperty)
    fn has_own_property(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let P be ? ToPropertyKey(V).
        let p = to_property_key(agent, arguments.get(0))?;
        // 2. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 3. Return ? HasOwnProperty(O, P).
        Ok(Value::Boolean(has_own_property(agent, o, p)?))
    }

    /// ### [20.1.3.3 Object.prototype.isPrototypeOf ( V )](https://tc39.es/ecma262/#sec-object.prototype.isprototypeof)
    fn is_prototype_of(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If V is not an Object, return false.
        let Value::Object(mut v) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        // 2. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 3. Repeat,
        loop {
            // a. Set V to ? V.[[GetPrototypeOf]]().
            // b. If V is null, return false.
            let Some(prototype) = v.internal_get_prototype_of(agent)? else {
                return Ok(Value::Boolean(false));
            };
            // c. If SameValue(O, V) is true, return true.
            if prototype == o {
                return Ok(Value::Boolean(true));
            }
            v = prototype;
        }
    }

    /// ### [20.1.3.4 Object.prototype.propertyIsEnumerable ( V )](https://tc39.es/ecma262/#sec-object.prototype.propertyisenumerable)
    fn property_is_enumerable(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let P be ? ToPropertyKey(V).
        let p = to_property_key(agent, arguments.get(0))?;
        // 2. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 3. Let desc be ? O.[[GetOwnProperty]](P).
        let desc = o.internal_get_own_property(agent, p)?;
        // 4. If desc is undefined, return false.
        // 5. Return desc.[[Enumerable]].
        Ok(Value::Boolean(
            desc.is_some_and(|desc| desc.enumerable == Some(true)),
        ))
    }

    /// ### [20.1.3.5 Object.prototype.toLocaleString ( \[ reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-object.prototype.tolocalestring)
    fn to_locale_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Return ? Invoke(O, "toString").
        invoke(agent, this_value, PropertyKey::from_str(agent, "toString"), &[])
    }

    /// ### [20.1.3.6 Object.prototype.toString ( )](https://tc39.es/ecma262/#sec-object.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. If the this value is undefined, return "[object Undefined]".
        // 2. If the this value is null, return "[object Null]".
        match this_value {
            Value::Undefined => return Ok(Value::from_str(agent, "[object Undefined]")),
            Value::Null => return Ok(Value::from_str(agent, "[object Null]")),
            _ => {}
        }
        // 3. Let O be ! ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 4. Let isArray be ? IsArray(O).
        // 5. If isArray is true, let builtinTag be "Array".
        let builtin_tag = if is_array(agent, Value::Object(o))? {
            "Array"
        } else if is_callable(agent, Value::Object(o)) {
            // 7. Else if O has a [[Call]] internal method, let builtinTag be "Function".
            "Function"
        } else {
            match &agent.object(o).kind {
                // 6. Else if O has a [[ParameterMap]] internal slot, let builtinTag be "Arguments".
                ObjectKind::Arguments(_) => "Arguments",
                // 8. Else if O has an [[ErrorData]] internal slot, let builtinTag be "Error".
                ObjectKind::Error => "Error",
                // 9. Else if O has a [[BooleanData]] internal slot, let builtinTag be "Boolean".
                ObjectKind::PrimitiveWrapper(Value::Boolean(_)) => "Boolean",
                // 10. Else if O has a [[NumberData]] internal slot, let builtinTag be "Number".
                ObjectKind::PrimitiveWrapper(Value::Number(_)) => "Number",
                // 11. Else if O has a [[StringData]] internal slot, let builtinTag be "String".
                ObjectKind::PrimitiveWrapper(Value::String(_)) => "String",
                // 13. Else if O has a [[RegExpMatcher]] internal slot, let builtinTag be "RegExp".
                #[cfg(feature = "regexp")]
                ObjectKind::RegExp(_) => "RegExp",
                // 14. Else, let builtinTag be "Object".
                _ => "Object",
            }
        };
        // 15. Let tag be ? Get(O, %Symbol.toStringTag%).
        let tag = get(agent, o, PropertyKey::Symbol(Symbol::TO_STRING_TAG))?;
        // 16. If tag is not a String, set tag to builtinTag.
        // 17. Return the string-concatenation of "[object ", tag, and "]".
        let result = match tag {
            Value::String(tag) => format!("[object {}]", tag.as_rc(agent)),
            _ => format!("[object {builtin_tag}]"),
        };
        Ok(Value::from_string(agent, result))
    }

    /// ### [20.1.3.7 Object.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-object.prototype.valueof)
    fn value_of(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ToObject(this value).
        Ok(Value::Object(to_object(agent, this_value)?))
    }

    /// ### [B.2.2.1.1 get Object.prototype.\_\_proto\_\_](https://tc39.es/ecma262/#sec-get-object.prototype.__proto__)
    #[cfg(feature = "annex-b")]
    fn get_proto(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? ToObject(this value).
        let o = to_object(agent, this_value)?;
        // 2. Return ? O.[[GetPrototypeOf]]().
        Ok(o.internal_get_prototype_of(agent)?
            .map_or(Value::Null, Value::Object))
    }

    /// ### [B.2.2.1.2 set Object.prototype.\_\_proto\_\_](https://tc39.es/ecma262/#sec-set-object.prototype.__proto__)
    #[cfg(feature = "annex-b")]
    fn set_proto(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be ? RequireObjectCoercible(this value).
        let o = require_object_coercible(agent, this_value)?;
        // 2. If proto is not an Object and proto is not null, return undefined.
        let proto = match arguments.get(0) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => return Ok(Value::Undefined),
        };
        // 3. If O is not an Object, return undefined.
        let Value::Object(o) = o else {
            return Ok(Value::Undefined);
        };
        // 4. Let status be ? O.[[SetPrototypeOf]](proto).
        // 5. If status is false, throw a TypeError exception.
        if !o.internal_set_prototype_of(agent, proto)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not set prototype of object",
            ));
        }
        // 6. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [B.2.2.2 Object.prototype.\_\_defineGetter\_\_ ( P, getter )](https://tc39.es/ecma262/#sec-object.prototype.__defineGetter__)
    #[cfg(feature = "annex-b")]
    fn define_getter(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        define_accessor(agent, this_value, arguments, true)
    }

    /// ### [B.2.2.3 Object.prototype.\_\_defineSetter\_\_ ( P, setter )](https://tc39.es/ecma262/#sec-object.prototype.__defineSetter__)
    #[cfg(feature = "annex-b")]
    fn define_setter(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        define_accessor(agent, this_value, arguments, false)
    }

    /// ### [B.2.2.4 Object.prototype.\_\_lookupGetter\_\_ ( P )](https://tc39.es/ecma262/#sec-object.prototype.__lookupGetter__)
    #[cfg(feature = "annex-b")]
    fn lookup_getter(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        lookup_accessor(agent, this_value, arguments, true)
    }

    /// ### [B.2.2.5 Object.prototype.\_\_lookupSetter\_\_ ( P )](https://tc39.es/ecma262/#sec-object.prototype.__lookupSetter__)
    #[cfg(feature = "annex-b")]
    fn lookup_setter(
        agent: &Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        lookup_accessor(agent, this_value, arguments, false)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.object_prototype();
        let object_constructor = intrinsics.object();

        // The Object prototype object is an immutable prototype exotic
        // object with a null [[Prototype]].
        let builder = OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_kind(ObjectKind::ImmutablePrototype)
            .with_property_capacity(13)
            .with_constructor_property(object_constructor)
            .with_builtin_function_property::<ObjectPrototypeHasOwnProperty>()
            .with_builtin_function_property::<ObjectPrototypeIsPrototypeOf>()
            .with_builtin_function_property::<ObjectPrototypePropertyIsEnumerable>()
            .with_builtin_function_property::<ObjectPrototypeToLocaleString>()
            .with_builtin_intrinsic_function_property::<ObjectPrototypeToString>()
            .with_builtin_function_property::<ObjectPrototypeValueOf>();

        #[cfg(feature = "annex-b")]
        let builder = {
            use crate::ecmascript::builders::builtin_function_builder::BuiltinFunctionBuilder;

            let getter =
                BuiltinFunctionBuilder::new::<ObjectPrototypeGetProto>(agent, realm).build();
            let setter =
                BuiltinFunctionBuilder::new::<ObjectPrototypeSetProto>(agent, realm).build();
            let proto_key = PropertyKey::from_str(agent, "__proto__");
            builder
                .with_property(|property| {
                    property
                        .with_key(proto_key)
                        .with_getter_and_setter_functions(getter, setter)
                        .with_enumerable(false)
                        .build()
                })
                .with_builtin_function_property::<ObjectPrototypeDefineGetter>()
                .with_builtin_function_property::<ObjectPrototypeDefineSetter>()
                .with_builtin_function_property::<ObjectPrototypeLookupGetter>()
                .with_builtin_function_property::<ObjectPrototypeLookupSetter>()
        };

        builder.build();
    }
}

#[cfg(feature = "annex-b")]
fn define_accessor(
    agent: &Agent,
    this_value: Value,
    arguments: ArgumentsList,
    getter: bool,
) -> JsResult<Value> {
    // 1. Let O be ? ToObject(this value).
    let o = to_object(agent, this_value)?;
    // 2. If IsCallable(getter) is false, throw a TypeError exception.
    let Value::Object(function) = arguments.get(1) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Accessor must be a function",
        ));
    };
    if !is_callable(agent, Value::Object(function)) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Accessor must be a function",
        ));
    }
    // 3. Let desc be PropertyDescriptor { [[Get]]: getter, [[Enumerable]]:
    // true, [[Configurable]]: true }.
    let desc = PropertyDescriptor {
        get: getter.then_some(Some(function)),
        set: (!getter).then_some(Some(function)),
        enumerable: Some(true),
        configurable: Some(true),
        ..Default::default()
    };
    // 4. Let key be ? ToPropertyKey(P).
    let key = to_property_key(agent, arguments.get(0))?;
    // 5. Perform ? DefinePropertyOrThrow(O, key, desc).
    define_property_or_throw(agent, o, key, desc)?;
    // 6. Return undefined.
    Ok(Value::Undefined)
}

#[cfg(feature = "annex-b")]
fn lookup_accessor(
    agent: &Agent,
    this_value: Value,
    arguments: ArgumentsList,
    getter: bool,
) -> JsResult<Value> {
    // 1. Let O be ? ToObject(this value).
    let mut o = to_object(agent, this_value)?;
    // 2. Let key be ? ToPropertyKey(P).
    let key = to_property_key(agent, arguments.get(0))?;
    // 3. Repeat,
    loop {
        // a. Let desc be ? O.[[GetOwnProperty]](key).
        // b. If desc is not undefined, then
        if let Some(desc) = o.internal_get_own_property(agent, key)? {
            // i. If IsAccessorDescriptor(desc) is true, return desc.[[Get]].
            // ii. Return undefined.
            let accessor = if getter { desc.get } else { desc.set };
            return Ok(accessor.flatten().map_or(Value::Undefined, Value::Object));
        }
        // c. Set O to ? O.[[GetPrototypeOf]]().
        // d. If O is null, return undefined.
        match o.internal_get_prototype_of(agent)? {
            Some(prototype) => o = prototype,
            None => return Ok(Value::Undefined),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn to_string_reports_builtin_tags() {
        assert_eq!(
            run_to_string(
                "var t = Object.prototype.toString;
                 [t.call([]), t.call(null), t.call(function () {}), t.call(new Error()), t.call(1)].join()"
            ),
            "[object Array],[object Null],[object Function],[object Error],[object Number]"
        );
        assert_eq!(
            run_to_string("String({ [Symbol.toStringTag]: 'Custom' })"),
            "[object Custom]"
        );
    }

    #[test]
    fn object_prototype_is_immutable() {
        assert_eq!(
            run_to_string("Object.setPrototypeOf(Object.prototype, null) === Object.prototype"),
            "true"
        );
        assert_eq!(
            run_to_string("try { Object.setPrototypeOf(Object.prototype, {}); 'no' } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn proto_accessor_reads_and_writes_the_prototype() {
        assert_eq!(
            run_to_string("var p = { x: 1 }; var o = {}; o.__proto__ = p; o.x + (o.__proto__ === p)"),
            "2"
        );
    }

    #[test]
    fn property_is_enumerable_checks_own_properties() {
        assert_eq!(
            run_to_string("var o = { a: 1 }; [o.propertyIsEnumerable('a'), o.propertyIsEnumerable('toString')].join()"),
            "true,false"
        );
    }
}
