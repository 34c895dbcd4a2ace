// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{
            call_function, create_list_from_array_like, get, has_own_property,
            ordinary_has_instance,
        },
        testing_and_comparison::is_callable,
        type_conversion::to_integer_or_infinity_number,
    },
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsic,
        bound_function::bound_function_create,
        ecmascript_function::{
            ClassElementKey, function_source_text, set_function_name,
        },
    },
    execution::{Agent, IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType},
    types::{Object, ObjectKind, Property, PropertyKey, Symbol, Value},
};

/// %Function.prototype% is itself a built-in function that accepts any
/// arguments and returns undefined.
pub(crate) struct FunctionPrototype;

impl Builtin for FunctionPrototype {
    const NAME: &'static str = "";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::behaviour);
}

impl BuiltinIntrinsic for FunctionPrototype {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::FunctionPrototype;
}

struct FunctionPrototypeApply;
impl Builtin for FunctionPrototypeApply {
    const NAME: &'static str = "apply";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::apply);
}

struct FunctionPrototypeBind;
impl Builtin for FunctionPrototypeBind {
    const NAME: &'static str = "bind";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::bind);
}

struct FunctionPrototypeCall;
impl Builtin for FunctionPrototypeCall {
    const NAME: &'static str = "call";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::call);
}

struct FunctionPrototypeToString;
impl Builtin for FunctionPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::to_string);
}

struct FunctionPrototypeHasInstance;
impl Builtin for FunctionPrototypeHasInstance {
    const NAME: &'static str = "[Symbol.hasInstance]";
    const KEY: Option<Symbol> = Some(Symbol::HAS_INSTANCE);
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::has_instance);
    const WRITABLE: bool = false;
    const CONFIGURABLE: bool = false;
}

fn require_callable(agent: &Agent, value: Value, method: &str) -> JsResult<Object> {
    match value {
        Value::Object(func) if is_callable(agent, value) => Ok(func),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Function.prototype.{method} called on non-callable value"),
        )),
    }
}

impl FunctionPrototype {
    fn behaviour(_: &Agent, _: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Undefined)
    }

    /// ### [20.2.3.1 Function.prototype.apply ( thisArg, argArray )](https://tc39.es/ecma262/#sec-function.prototype.apply)
    fn apply(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let func be the this value.
        // 2. If IsCallable(func) is false, throw a TypeError exception.
        let func = require_callable(agent, this_value, "apply")?;
        let this_arg = arguments.get(0);
        let arg_array = arguments.get(1);
        // 3. If argArray is either undefined or null, then
        if arg_array.is_nullish() {
            // b. Return ? Call(func, thisArg).
            return call_function(agent, func, this_arg, &[]);
        }
        // 4. Let argList be ? CreateListFromArrayLike(argArray).
        let arg_list = create_list_from_array_like(agent, arg_array)?;
        // 6. Return ? Call(func, thisArg, argList).
        call_function(agent, func, this_arg, &arg_list)
    }

    /// ### [20.2.3.2 Function.prototype.bind ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.bind)
    fn bind(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let Target be the this value.
        // 2. If IsCallable(Target) is false, throw a TypeError exception.
        let target = require_callable(agent, this_value, "bind")?;
        let this_arg = arguments.get(0);
        let args = arguments.slice_from(1);
        // 3. Let F be ? BoundFunctionCreate(Target, thisArg, args).
        let f = bound_function_create(agent, target, this_arg, args)?;
        // 4. Let L be 0.
        let mut l = 0.0;
        // 5. Let targetHasLength be ? HasOwnProperty(Target, "length").
        let length_key = PropertyKey::from_str(agent, "length");
        // 6. If targetHasLength is true, then
        if has_own_property(agent, target, length_key)? {
            // a. Let targetLen be ? Get(Target, "length").
            // b. If targetLen is a Number, then
            if let Value::Number(target_len) = get(agent, target, length_key)? {
                if target_len == f64::INFINITY {
                    // i. If targetLen is +∞𝔽, set L to +∞.
                    l = f64::INFINITY;
                } else if target_len != f64::NEG_INFINITY {
                    // ii. Else if targetLen is -∞𝔽, set L to 0.
                    // iii. Else,
                    // 1. Let targetLenAsInt be ! ToIntegerOrInfinity(targetLen).
                    let target_len_as_int = to_integer_or_infinity_number(target_len);
                    // 2. Assert: targetLenAsInt is finite.
                    // 3. Let argCount be the number of elements in args.
                    // 4. Set L to max(targetLenAsInt - argCount, 0).
                    l = (target_len_as_int - args.len() as f64).max(0.0);
                }
            }
        }
        // 7. Perform SetFunctionLength(F, L).
        let length_key = PropertyKey::from_str(agent, "length");
        f.insert_property(
            agent,
            length_key,
            Property::data(Value::Number(l), false, false, true),
        );
        // 8. Let targetName be ? Get(Target, "name").
        let target_name = get(agent, target, PropertyKey::from_str(agent, "name"))?;
        // 9. If targetName is not a String, set targetName to the empty String.
        let target_name = match target_name {
            Value::String(name) => PropertyKey::from_string(agent, name),
            _ => PropertyKey::from_str(agent, ""),
        };
        // 10. Perform SetFunctionName(F, targetName, "bound").
        set_function_name(agent, f, ClassElementKey::Property(target_name), Some("bound"));
        // 11. Return F.
        Ok(Value::Object(f))
    }

    /// ### [20.2.3.3 Function.prototype.call ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.call)
    fn call(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let func be the this value.
        // 2. If IsCallable(func) is false, throw a TypeError exception.
        let func = require_callable(agent, this_value, "call")?;
        // 4. Return ? Call(func, thisArg, args).
        call_function(agent, func, arguments.get(0), arguments.slice_from(1))
    }

    /// ### [20.2.3.5 Function.prototype.toString ( )](https://tc39.es/ecma262/#sec-function.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let func be the this value.
        let Value::Object(func) = this_value else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Function.prototype.toString requires that 'this' be a Function",
            ));
        };
        // 2. If func is an Object, func has a [[SourceText]] internal slot,
        // func.[[SourceText]] is a sequence of Unicode code points, and
        // HostHasSourceTextAvailable(func) is true, then
        if agent.host_hooks().has_source_text_available(agent, func)
            && let Some(source) = function_source_text(agent, func)
        {
            // a. Return CodePointsToString(func.[[SourceText]]).
            return Ok(Value::from_string(agent, source));
        }
        // 3. If func is a built-in function object, return an
        // implementation-defined String source code representation of func.
        // The representation must have the syntax of a NativeFunction.
        // 4. If func is an Object and IsCallable(func) is true, return an
        // implementation-defined String source code representation of func.
        if !is_callable(agent, this_value) {
            // 5. Throw a TypeError exception.
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Function.prototype.toString requires that 'this' be a Function",
            ));
        }
        let initial_name = match &agent.object(func).kind {
            ObjectKind::BuiltinFunction(data) => data.initial_name,
            ObjectKind::BuiltinClosure(data) => data.initial_name,
            _ => None,
        };
        let name = initial_name.map(|name| name.to_rust_string(agent)).unwrap_or_default();
        Ok(Value::from_string(
            agent,
            format!("function {name}() {{ [native code] }}"),
        ))
    }

    /// ### [20.2.3.6 Function.prototype \[ %Symbol.hasInstance% \] ( V )](https://tc39.es/ecma262/#sec-function.prototype-%symbol.hasinstance%)
    fn has_instance(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let F be the this value.
        // 2. Return ? OrdinaryHasInstance(F, V).
        Ok(Value::Boolean(ordinary_has_instance(
            agent,
            this_value,
            arguments.get(0),
        )?))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let thrower = intrinsics.throw_type_error();
        let caller = PropertyKey::from_str(agent, "caller");
        let arguments = PropertyKey::from_str(agent, "arguments");

        // The Function prototype object has a [[Prototype]] of
        // %Object.prototype% and is itself a function object.
        BuiltinFunctionBuilder::new_intrinsic_function::<FunctionPrototype>(agent, realm)
            .with_prototype(intrinsics.object_prototype())
            .with_property_capacity(8)
            .with_data_property(
                PropertyKey::from_str(agent, "constructor"),
                Value::Object(intrinsics.function()),
            )
            .with_builtin_function_property::<FunctionPrototypeApply>()
            .with_builtin_function_property::<FunctionPrototypeBind>()
            .with_builtin_function_property::<FunctionPrototypeCall>()
            .with_builtin_function_property::<FunctionPrototypeToString>()
            .with_builtin_function_property::<FunctionPrototypeHasInstance>()
            // ### [10.2.4 AddRestrictedFunctionProperties ( F, realm )](https://tc39.es/ecma262/#sec-addrestrictedfunctionproperties)
            .with_property(|property| {
                property
                    .with_key(caller)
                    .with_getter_and_setter_functions(thrower, thrower)
                    .with_enumerable(false)
                    .build()
            })
            .with_property(|property| {
                property
                    .with_key(arguments)
                    .with_getter_and_setter_functions(thrower, thrower)
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
    fn call_and_apply_forward_this_and_arguments() {
        assert_eq!(
            run_to_string("function f(a, b) { return this.x + a + b; } f.call({ x: 1 }, 2, 3)"),
            "6"
        );
        assert_eq!(
            run_to_string("function f(a, b) { return this.x + a + b; } f.apply({ x: 1 }, [2, 3])"),
            "6"
        );
        assert_eq!(run_to_string("Math.max.apply(null, undefined)"), "-Infinity");
    }

    #[test]
    fn bind_sets_name_and_length() {
        assert_eq!(
            run_to_string("function add(a, b, c) { return a + b + c; } var g = add.bind(null, 1); g.name + ' ' + g.length + ' ' + g(2, 3)"),
            "bound add 2 6"
        );
        assert_eq!(
            run_to_string("function P(x) { this.x = x; } var B = P.bind(null, 4); new B().x + (new B() instanceof P ? 1 : 0)"),
            "5"
        );
    }

    #[test]
    fn to_string_returns_source_or_native_code() {
        assert_eq!(run_to_string("(function foo(a) { return a; }).toString()"), "function foo(a) { return a; }");
        assert_eq!(run_to_string("Math.max.toString()"), "function max() { [native code] }");
        assert_eq!(run_to_string("try { Function.prototype.toString.call({}) } catch (e) { e.name }"), "TypeError");
    }

    #[test]
    fn function_prototype_is_callable_and_restricted() {
        assert_eq!(run_to_string("Function.prototype()"), "undefined");
        assert_eq!(run_to_string("Function.prototype.length"), "0");
        assert_eq!(
            run_to_string("try { Function.prototype.caller; } catch (e) { e instanceof TypeError }"),
            "true"
        );
        assert_eq!(run_to_string("Object[Symbol.hasInstance]({})"), "true");
    }
}
