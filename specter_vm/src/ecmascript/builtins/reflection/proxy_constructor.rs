// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{cell::Cell, rc::Rc};

use crate::ecmascript::{
    abstract_operations::operations_on_objects::create_data_property_or_throw,
    builders::builtin_function_builder::BuiltinFunctionBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin, BuiltinIntrinsicConstructor,
        builtin_function::create_anonymous_builtin_function,
        ordinary::ordinary_object_create_with_intrinsics,
        proxy::{proxy_create, proxy_revoke},
    },
    execution::{
        Agent, IntrinsicObjectIndex, JsResult, ProtoIntrinsics, Realm, agent::ExceptionType,
    },
    types::{Object, PropertyKey, Value},
};

pub(crate) struct ProxyConstructor;

impl Builtin for ProxyConstructor {
    const NAME: &'static str = "Proxy";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ProxyConstructor::constructor);
}
impl BuiltinIntrinsicConstructor for ProxyConstructor {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Proxy;
}

struct ProxyRevocable;
impl Builtin for ProxyRevocable {
    const NAME: &'static str = "revocable";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ProxyConstructor::revocable);
}

impl ProxyConstructor {
    /// ### [28.2.1.1 Proxy ( target, handler )](https://tc39.es/ecma262/#sec-proxy-target-handler)
    fn constructor(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        if new_target.is_none() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Constructor Proxy requires 'new'",
            ));
        }
        // 2. Return ? ProxyCreate(target, handler).
        proxy_create(agent, arguments.get(0), arguments.get(1)).map(Value::Object)
    }

    /// ### [28.2.2.1 Proxy.revocable ( target, handler )](https://tc39.es/ecma262/#sec-proxy.revocable)
    fn revocable(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let proxy be ? ProxyCreate(target, handler).
        let proxy = proxy_create(agent, arguments.get(0), arguments.get(1))?;
        // 2. Let revokerClosure be a new Abstract Closure with no parameters
        // that captures nothing and performs the following steps when called:
        //     a. Let F be the active function object.
        //     b. Let p be F.[[RevocableProxy]].
        //     c. If p is null, return NormalCompletion(undefined).
        //     d. Set F.[[RevocableProxy]] to null.
        //     e. Assert: p is a Proxy exotic object.
        //     f. Set p.[[ProxyTarget]] to null.
        //     g. Set p.[[ProxyHandler]] to null.
        //     h. Return NormalCompletion(undefined).
        // 3. Let revoker be CreateBuiltinFunction(revokerClosure, 0, "", «
        // [[RevocableProxy]] »).
        // 4. Set revoker.[[RevocableProxy]] to proxy.
        let revocable_proxy = Rc::new(Cell::new(Some(proxy)));
        let revoker = create_anonymous_builtin_function(agent, 0, move |agent, _, _| {
            if let Some(p) = revocable_proxy.take() {
                proxy_revoke(agent, p);
                tracing::trace!(event = "proxy_revoke", proxy = p.0);
            }
            Ok(Value::Undefined)
        });
        // 5. Let result be OrdinaryObjectCreate(%Object.prototype%).
        let result = ordinary_object_create_with_intrinsics(agent, Some(ProtoIntrinsics::Object));
        // 6. Perform ! CreateDataPropertyOrThrow(result, "proxy", proxy).
        create_data_property_or_throw(
            agent,
            result,
            PropertyKey::from_str(agent, "proxy"),
            Value::Object(proxy),
        )?;
        // 7. Perform ! CreateDataPropertyOrThrow(result, "revoke", revoker).
        create_data_property_or_throw(
            agent,
            result,
            PropertyKey::from_str(agent, "revoke"),
            Value::Object(revoker),
        )?;
        // 8. Return result.
        Ok(Value::Object(result))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        // The Proxy constructor does not have a "prototype" property.
        BuiltinFunctionBuilder::new_intrinsic_constructor::<ProxyConstructor>(agent, realm)
            .with_property_capacity(1)
            .with_builtin_function_property::<ProxyRevocable>()
            .build();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn traps_intercept_operations() {
        assert_eq!(
            run_to_string(
                "var log = [];
                 var p = new Proxy({ a: 1 }, {
                     get(target, key, receiver) { log.push('get ' + String(key)); return target[key] * 10 },
                     has(target, key) { log.push('has ' + key); return key === 'z' },
                 });
                 [p.a, 'z' in p, 'a' in p, log.join(';')].join()"
            ),
            "10,true,false,get a;has z;has a"
        );
    }

    #[test]
    fn constructor_requires_new_and_objects() {
        assert_eq!(
            run_to_string(
                "var results = [];
                 try { Proxy({}, {}) } catch (e) { results.push(e.name) }
                 try { new Proxy(1, {}) } catch (e) { results.push(e.name) }
                 try { new Proxy({}, null) } catch (e) { results.push(e.name) }
                 results.push(Proxy.prototype === undefined, Proxy.length);
                 results.join()"
            ),
            "TypeError,TypeError,TypeError,true,2"
        );
    }

    #[test]
    fn revocation_disables_the_proxy() {
        assert_eq!(
            run_to_string(
                "var r = Proxy.revocable({ x: 1 }, {});
                 var before = r.proxy.x;
                 r.revoke(); r.revoke();
                 var after;
                 try { r.proxy.x } catch (e) { after = e.name }
                 [before, after, r.revoke.name === '', r.revoke.length,
                  Object.keys(r).join('/')].join()"
            ),
            "1,TypeError,true,0,proxy/revoke"
        );
    }

    #[test]
    fn callable_proxies_forward_calls_and_construction() {
        assert_eq!(
            run_to_string(
                "function Point(x) { this.x = x }
                 var p = new Proxy(Point, {
                     apply(target, thisArg, args) { return args.length },
                     construct(target, args, newTarget) { return { made: args[0] } },
                 });
                 [typeof p, p(1, 2, 3), new p(7).made, typeof new Proxy({}, {})].join()"
            ),
            "function,3,7,object"
        );
    }

    #[test]
    fn invariants_are_enforced() {
        assert_eq!(
            run_to_string(
                "var target = {}; Object.defineProperty(target, 'fixed', { value: 1 });
                 var p = new Proxy(target, { get() { return 2 } });
                 try { p.fixed } catch (e) { e.name }"
            ),
            "TypeError"
        );
    }
}
