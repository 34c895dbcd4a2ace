// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use std::rc::Rc;

use common::{CapturingHostHooks, eval, eval_in, printed, with_agent};
use specter_vm::{Agent, DefaultHostHooks, Options};

#[test]
fn block_scoped_bindings_shadow_vars() {
    assert_eq!(
        printed("var x = 1; { let x = 2; print(x); } print(x);"),
        ["2", "1"]
    );
}

#[test]
fn async_generators_drive_for_await_consumers() {
    assert_eq!(
        printed(
            "async function* counter() {
                 let i = 0;
                 while (true) yield await Promise.resolve(i++);
             }
             (async () => {
                 let n = 0;
                 for await (const value of counter()) {
                     print(value);
                     if (++n === 3) break;
                 }
                 print('done');
             })();
             print('sync');"
        ),
        ["sync", "0", "1", "2", "done"]
    );
}

#[test]
fn proxy_traps_are_independent_internal_methods() {
    assert_eq!(
        printed(
            "var target = { first: 1, second: 2 };
             var proxy = new Proxy(target, { get() { return 'trapped'; } });
             print(proxy.anything);
             print(proxy.first);
             print(Object.keys(proxy).join());"
        ),
        ["trapped", "trapped", "first,second"]
    );
}

#[test]
fn finally_return_replaces_a_throw() {
    with_agent(CapturingHostHooks::default(), |agent, _| {
        assert_eq!(
            eval(
                agent,
                "function f() {
                     try { throw new Error('lost'); }
                     finally { return 'from finally'; }
                 }
                 f()"
            ),
            "from finally"
        );
    });
}

#[test]
fn fresh_realms_produce_identical_results() {
    const SOURCE: &str = "var o = { b: 1, a: 2, 10: 'x', 2: 'y', [Symbol.iterator]: 0, c: [1, 2] };
                          o.z = 3;
                          Reflect.ownKeys(o).map(String).join() + ' ' + (0.1 + 0.2)";
    let (first, second, other_agent) = with_agent(CapturingHostHooks::default(), |agent, _| {
        let first = eval(agent, SOURCE);
        let second = eval(agent, SOURCE);
        let other = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let other_agent = eval(&other, SOURCE);
        (first, second, other_agent)
    });
    assert_eq!(first, "2,10,b,a,c,z,Symbol(Symbol.iterator) 0.30000000000000004");
    assert_eq!(first, second);
    assert_eq!(first, other_agent);
}

#[test]
fn realms_do_not_share_globals() {
    with_agent(CapturingHostHooks::default(), |agent, _| {
        let first = agent.create_realm();
        let second = agent.create_realm();
        eval_in(agent, first, "var shared = 'first'; Array.prototype.marker = 1;");
        assert_eq!(eval_in(agent, second, "typeof shared"), "undefined");
        assert_eq!(eval_in(agent, second, "[].marker"), "undefined");
        assert_eq!(eval_in(agent, first, "[].marker"), "1");
    });
}
