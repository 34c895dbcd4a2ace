// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{CapturingHostHooks, eval, with_agent};

fn run(source: &'static str) -> String {
    with_agent(CapturingHostHooks::default(), move |agent, _| eval(agent, source))
}

#[test]
fn descriptors_are_either_data_or_accessor() {
    assert_eq!(
        run("var o = { x: 1, get y() { return 2; } };
             [Object.keys(Object.getOwnPropertyDescriptor(o, 'x')).join('/'),
              Object.keys(Object.getOwnPropertyDescriptor(o, 'y')).join('/')].join(' ')"),
        "value/writable/enumerable/configurable get/set/enumerable/configurable"
    );
    assert_eq!(
        run("try {
                 Object.defineProperty({}, 'x', { value: 1, get() { return 1; } });
             } catch (e) { e.name }"),
        "TypeError"
    );
}

#[test]
fn non_configurable_properties_cannot_be_loosened() {
    assert_eq!(
        run("var o = {};
             Object.defineProperty(o, 'fixed', { value: 1 });
             var results = [];
             for (const change of [{ configurable: true }, { writable: true },
                                   { enumerable: true }, { get() {} }, { value: 2 }]) {
                 try { Object.defineProperty(o, 'fixed', change); results.push('ok'); }
                 catch (e) { results.push(e.name); }
             }
             Object.defineProperty(o, 'fixed', { value: 1, writable: false });
             results.push(Reflect.defineProperty(o, 'fixed', { configurable: true }));
             results.join()"),
        "TypeError,TypeError,TypeError,TypeError,TypeError,false"
    );
}

#[test]
fn non_writable_data_can_still_be_reconfigured_when_configurable() {
    assert_eq!(
        run("var o = {};
             Object.defineProperty(o, 'x', { value: 1, configurable: true });
             Object.defineProperty(o, 'x', { value: 2, writable: true });
             o.x = 3;
             o.x"),
        "3"
    );
}

#[test]
fn prototype_cycles_are_rejected() {
    assert_eq!(
        run("var a = {}; var b = Object.create(a); var c = Object.create(b);
             var results = [];
             try { Object.setPrototypeOf(a, c); } catch (e) { results.push(e.name); }
             results.push(Reflect.setPrototypeOf(a, b));
             try { a.__proto__ = c; } catch (e) { results.push(e.name); }
             results.push(Reflect.setPrototypeOf(a, a));
             var depth = 0;
             for (var p = c; p !== null; p = Object.getPrototypeOf(p)) depth++;
             results.push(depth);
             results.join()"),
        "TypeError,false,TypeError,false,4"
    );
}

#[test]
fn strict_mode_writes_to_read_only_properties_throw() {
    assert_eq!(
        run("'use strict';
             var o = Object.freeze({ x: 1 });
             var results = [];
             try { o.x = 2; } catch (e) { results.push(e.name); }
             try { o.y = 2; } catch (e) { results.push(e.name); }
             try { delete o.x; } catch (e) { results.push(e.name); }
             results.push(Object.isFrozen(o), o.x);
             results.join()"),
        "TypeError,TypeError,TypeError,true,1"
    );
    assert_eq!(
        run("var o = Object.freeze({ x: 1 }); o.x = 2; o.y = 3; [o.x, o.y].join()"),
        "1,"
    );
}

#[test]
fn property_enumeration_order_is_integers_then_insertion() {
    assert_eq!(
        run("var o = { z: 1, 5: 1, a: 1, 1: 1, '-1': 1, '01': 1 };
             delete o.z; o.z = 1;
             Object.keys(o).join()"),
        "1,5,a,-1,01,z"
    );
}
