// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call_function, construct, create_array_from_list, create_list_from_array_like,
        },
        testing_and_comparison::{is_callable, is_constructor},
        type_conversion::to_property_key,
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin},
    execution::{Agent, JsError, JsResult, Realm, agent::ExceptionType},
    types::{InternalMethods, Object, PropertyDescriptor, PropertyKey, Symbol, Value},
};

pub(crate) struct ReflectObject;

macro_rules! reflect_function {
    ($($builtin:ident, $name:literal, $length:literal, $function:ident;)*) => {
        $(
            struct $builtin;
            impl Builtin for $builtin {
                const NAME: &'static str = $name;
                const LENGTH: u8 = $length;
                const BEHAVIOUR: Behaviour = Behaviour::Regular(ReflectObject::$function);
            }
        )*
    };
}

reflect_function! {
    ReflectObjectApply, "apply", 3, apply;
    ReflectObjectConstruct, "construct", 2, construct;
    ReflectObjectDefineProperty, "defineProperty", 3, define_property;
    ReflectObjectDeleteProperty, "deleteProperty", 2, delete_property;
    ReflectObjectGet, "get", 2, get;
    ReflectObjectGetOwnPropertyDescriptor, "getOwnPropertyDescriptor", 2, get_own_property_descriptor;
    ReflectObjectGetPrototypeOf, "getPrototypeOf", 1, get_prototype_of;
    ReflectObjectHas, "has", 2, has;
    ReflectObjectIsExtensible, "isExtensible", 1, is_extensible;
    ReflectObjectOwnKeys, "ownKeys", 1, own_keys;
    ReflectObjectPreventExtensions, "preventExtensions", 1, prevent_extensions;
    ReflectObjectSet, "set", 3, set;
    ReflectObjectSetPrototypeOf, "setPrototypeOf", 2, set_prototype_of;
}

/// The `target` argument every Reflect function starts by checking.
fn require_target(agent: &Agent, target: Value, function: &str) -> JsResult<Object> {
    // 1. If target is not an Object, throw a TypeError exception.
    match target {
        Value::Object(target) => Ok(target),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Reflect.{function} called on non-object"),
        )),
    }
}

impl ReflectObject {
    /// ### [28.1.1 Reflect.apply ( target, thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-reflect.apply)
    fn apply(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let this_argument = arguments.get(1);
        let arguments_list = arguments.get(2);
        // 1. If IsCallable(target) is false, throw a TypeError exception.
        let target = match arguments.get(0) {
            Value::Object(target) if is_callable(agent, Value::Object(target)) => target,
            target => return Err(not_callable(agent, target)),
        };
        // 2. Let args be ? CreateListFromArrayLike(argumentsList).
        let args = create_list_from_array_like(agent, arguments_list)?;
        // 3. Perform PrepareForTailCall().
        // 4. Return ? Call(target, thisArgument, args).
        call_function(agent, target, this_argument, &args)
    }

    /// ### [28.1.2 Reflect.construct ( target, argumentsList \[ , newTarget \] )](https://tc39.es/ecma262/#sec-reflect.construct)
    fn construct(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let arguments_list = arguments.get(1);
        // 1. If IsConstructor(target) is false, throw a TypeError exception.
        let target = match arguments.get(0) {
            Value::Object(target) if is_constructor(agent, Value::Object(target)) => target,
            target => return Err(not_a_constructor(agent, target)),
        };
        // 2. If newTarget is not present, set newTarget to target.
        // 3. Else if IsConstructor(newTarget) is false, throw a TypeError
        // exception.
        let new_target = if arguments.len() < 3 {
            target
        } else {
            match arguments.get(2) {
                Value::Object(new_target) if is_constructor(agent, Value::Object(new_target)) => {
                    new_target
                }
                new_target => return Err(not_a_constructor(agent, new_target)),
            }
        };
        // 4. Let args be ? CreateListFromArrayLike(argumentsList).
        let args = create_list_from_array_like(agent, arguments_list)?;
        // 5. Return ? Construct(target, args, newTarget).
        construct(agent, target, &args, Some(new_target)).map(Value::Object)
    }

    /// ### [28.1.3 Reflect.defineProperty ( target, propertyKey, attributes )](https://tc39.es/ecma262/#sec-reflect.defineproperty)
    fn define_property(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "defineProperty")?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? ToPropertyDescriptor(attributes).
        let desc = PropertyDescriptor::to_property_descriptor(agent, arguments.get(2))?;
        // 4. Return ? target.[[DefineOwnProperty]](key, desc).
        target
            .internal_define_own_property(agent, key, desc)
            .map(Value::Boolean)
    }

    /// ### [28.1.4 Reflect.deleteProperty ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.deleteproperty)
    fn delete_property(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "deleteProperty")?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Return ? target.[[Delete]](key).
        target.internal_delete(agent, key).map(Value::Boolean)
    }

    /// ### [28.1.5 Reflect.get ( target, propertyKey \[ , receiver \] )](https://tc39.es/ecma262/#sec-reflect.get)
    fn get(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "get")?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. If receiver is not present, then
        //     a. Set receiver to target.
        let receiver = if arguments.len() > 2 {
            arguments.get(2)
        } else {
            Value::Object(target)
        };
        // 4. Return ? target.[[Get]](key, receiver).
        target.internal_get(agent, key, receiver)
    }

    /// ### [28.1.6 Reflect.getOwnPropertyDescriptor ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.getownpropertydescriptor)
    fn get_own_property_descriptor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "getOwnPropertyDescriptor")?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? target.[[GetOwnProperty]](key).
        let desc = target.internal_get_own_property(agent, key)?;
        // 4. Return FromPropertyDescriptor(desc).
        PropertyDescriptor::from_property_descriptor(desc, agent)
    }

    /// ### [28.1.7 Reflect.getPrototypeOf ( target )](https://tc39.es/ecma262/#sec-reflect.getprototypeof)
    fn get_prototype_of(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "getPrototypeOf")?;
        // 2. Return ? target.[[GetPrototypeOf]]().
        Ok(match target.internal_get_prototype_of(agent)? {
            Some(prototype) => Value::Object(prototype),
            None => Value::Null,
        })
    }

    /// ### [28.1.8 Reflect.has ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.has)
    fn has(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "has")?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Return ? target.[[HasProperty]](key).
        target.internal_has_property(agent, key).map(Value::Boolean)
    }

    /// ### [28.1.9 Reflect.isExtensible ( target )](https://tc39.es/ecma262/#sec-reflect.isextensible)
    fn is_extensible(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "isExtensible")?;
        // 2. Return ? target.[[IsExtensible]]().
        target.internal_is_extensible(agent).map(Value::Boolean)
    }

    /// ### [28.1.10 Reflect.ownKeys ( target )](https://tc39.es/ecma262/#sec-reflect.ownkeys)
    fn own_keys(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "ownKeys")?;
        // 2. Let keys be ? target.[[OwnPropertyKeys]]().
        let keys: Vec<Value> = target
            .internal_own_property_keys(agent)?
            .into_iter()
            .map(|key| key.into_value(agent))
            .collect();
        // 3. Return CreateArrayFromList(keys).
        Ok(Value::Object(create_array_from_list(agent, &keys)))
    }

    /// ### [28.1.11 Reflect.preventExtensions ( target )](https://tc39.es/ecma262/#sec-reflect.preventextensions)
    fn prevent_extensions(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "preventExtensions")?;
        // 2. Return ? target.[[PreventExtensions]]().
        target.internal_prevent_extensions(agent).map(Value::Boolean)
    }

    /// ### [28.1.12 Reflect.set ( target, propertyKey, V \[ , receiver \] )](https://tc39.es/ecma262/#sec-reflect.set)
    fn set(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "set")?;
        // 2. Let key be ? ToPropertyKey(propertyKey).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. If receiver is not present, then
        //     a. Set receiver to target.
        let receiver = if arguments.len() > 3 {
            arguments.get(3)
        } else {
            Value::Object(target)
        };
        // 4. Return ? target.[[Set]](key, V, receiver).
        target
            .internal_set(agent, key, arguments.get(2), receiver)
            .map(Value::Boolean)
    }

    /// ### [28.1.13 Reflect.setPrototypeOf ( target, proto )](https://tc39.es/ecma262/#sec-reflect.setprototypeof)
    fn set_prototype_of(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "setPrototypeOf")?;
        // 2. If proto is not an Object and proto is not null, throw a
        // TypeError exception.
        let proto = match arguments.get(1) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ));
            }
        };
        // 3. Return ? target.[[SetPrototypeOf]](proto).
        target
            .internal_set_prototype_of(agent, proto)
            .map(Value::Boolean)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.reflect();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(14)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<ReflectObjectApply>()
            .with_builtin_function_property::<ReflectObjectConstruct>()
            .with_builtin_function_property::<ReflectObjectDefineProperty>()
            .with_builtin_function_property::<ReflectObjectDeleteProperty>()
            .with_builtin_function_property::<ReflectObjectGet>()
            .with_builtin_function_property::<ReflectObjectGetOwnPropertyDescriptor>()
            .with_builtin_function_property::<ReflectObjectGetPrototypeOf>()
            .with_builtin_function_property::<ReflectObjectHas>()
            .with_builtin_function_property::<ReflectObjectIsExtensible>()
            .with_builtin_function_property::<ReflectObjectOwnKeys>()
            .with_builtin_function_property::<ReflectObjectPreventExtensions>()
            .with_builtin_function_property::<ReflectObjectSet>()
            .with_builtin_function_property::<ReflectObjectSetPrototypeOf>()
            // 28.1.14 Reflect [ %Symbol.toStringTag% ]
            .with_property(|property| {
                property
                    .with_key(PropertyKey::Symbol(Symbol::TO_STRING_TAG))
                    .with_value_readonly(Value::from_str(agent, "Reflect"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

fn not_callable(agent: &Agent, value: Value) -> JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("{} is not a function", value.to_display_string(agent)),
    )
}

fn not_a_constructor(agent: &Agent, value: Value) -> JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("{} is not a constructor", value.to_display_string(agent)),
    )
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn apply_and_construct() {
        assert_eq!(
            run_to_string(
                "function Base() { this.kind = new.target.name }
                 function Other() {}
                 var made = Reflect.construct(Base, [], Other);
                 [Reflect.apply(Math.max, null, [1, 5, 3]),
                  Reflect.apply(function () { return this.v }, { v: 'this' }, []),
                  made.kind, Object.getPrototypeOf(made) === Other.prototype].join()"
            ),
            "5,this,Other,true"
        );
        assert_eq!(
            run_to_string(
                "var results = [];
                 try { Reflect.apply(1, null, []) } catch (e) { results.push(e.name) }
                 try { Reflect.construct(() => {}, []) } catch (e) { results.push(e.name) }
                 try { Reflect.construct(Object, [], Math.max) } catch (e) { results.push(e.name) }
                 try { Reflect.apply(Math.max, null, 1) } catch (e) { results.push(e.name) }
                 results.join()"
            ),
            "TypeError,TypeError,TypeError,TypeError"
        );
    }

    #[test]
    fn property_functions_report_success() {
        assert_eq!(
            run_to_string(
                "var o = {}; Object.defineProperty(o, 'fixed', { value: 1 });
                 [Reflect.defineProperty(o, 'x', { value: 2, writable: true }),
                  Reflect.defineProperty(o, 'fixed', { value: 3 }),
                  Reflect.deleteProperty(o, 'fixed'), Reflect.deleteProperty(o, 'missing'),
                  Reflect.set(o, 'x', 4), Reflect.set(o, 'fixed', 5), o.x,
                  Reflect.has(o, 'toString'), Reflect.get(o, 'x'),
                  Reflect.getOwnPropertyDescriptor(o, 'fixed').writable,
                  Reflect.getOwnPropertyDescriptor(o, 'nope')].join()"
            ),
            "true,false,false,true,true,false,4,true,4,false,"
        );
    }

    #[test]
    fn get_and_set_use_the_receiver() {
        assert_eq!(
            run_to_string(
                "var source = { get who() { return this.name }, set who(v) { this.name = v } };
                 var receiver = { name: 'receiver' };
                 Reflect.set(source, 'who', 'changed', receiver);
                 [Reflect.get(source, 'who', receiver), receiver.name, source.name].join()"
            ),
            "changed,changed,"
        );
    }

    #[test]
    fn prototype_and_extensibility() {
        assert_eq!(
            run_to_string(
                "var a = {}; var b = Object.create(a);
                 var frozen = Object.preventExtensions({});
                 [Reflect.getPrototypeOf(b) === a, Reflect.setPrototypeOf(a, b),
                  Reflect.setPrototypeOf(b, null), Reflect.getPrototypeOf(b),
                  Reflect.isExtensible(frozen), Reflect.setPrototypeOf(frozen, a),
                  Reflect.preventExtensions(a), Reflect.isExtensible(a)].join()"
            ),
            "true,false,true,,false,false,true,false"
        );
        assert_eq!(
            run_to_string("try { Reflect.setPrototypeOf({}, 1) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn own_keys_lists_every_key_in_order() {
        assert_eq!(
            run_to_string(
                "var s = Symbol('s');
                 var o = { b: 1, 2: 1, [s]: 1, a: 1, 1: 1 };
                 Object.defineProperty(o, 'hidden', { value: 1 });
                 Reflect.ownKeys(o).map(String).join()"
            ),
            "1,2,b,a,hidden,Symbol(s)"
        );
        assert_eq!(
            run_to_string("try { Reflect.ownKeys(1) } catch (e) { e.message }"),
            "Reflect.ownKeys called on non-object"
        );
    }

    #[test]
    fn reflect_is_a_plain_namespace() {
        assert_eq!(
            run_to_string(
                "[Object.prototype.toString.call(Reflect), typeof Reflect,
                  Reflect.defineProperty.length, Reflect.apply.name].join()"
            ),
            "[object Reflect],object,3,apply"
        );
    }
}
