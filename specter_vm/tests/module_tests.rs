// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{CapturingHostHooks, with_agent};

fn hooks(modules: Vec<(&'static str, &'static str)>) -> CapturingHostHooks {
    CapturingHostHooks {
        modules,
        ..Default::default()
    }
}

#[test]
fn modules_are_loaded_through_the_host() {
    let (result, output, requests) = with_agent(
        hooks(vec![
            ("./math.js", "export const add = (a, b) => a + b;"),
            (
                "./lib.js",
                "import { add } from './math.js'; export const three = add(1, 2);",
            ),
        ]),
        |agent, hooks| {
            let realm = agent.create_realm();
            let module = specter_ast::parse_module(
                "import { three } from './lib.js'; print(three, import.meta.url);",
            )
            .unwrap();
            let result = realm
                .evaluate_module(agent, module, Some("main.js".into()))
                .map(|value| value.to_display_string(agent));
            (
                result,
                hooks.output.borrow().clone(),
                hooks.load_requests.borrow().clone(),
            )
        },
    );
    assert_eq!(result.ok().as_deref(), Some("undefined"));
    assert_eq!(output, ["3 main.js"]);
    assert_eq!(
        requests,
        [
            (Some("main.js".to_owned()), "./lib.js".to_owned()),
            (Some("./lib.js".to_owned()), "./math.js".to_owned()),
        ]
    );
}

#[test]
fn a_module_is_evaluated_once_per_realm() {
    let output = with_agent(
        hooks(vec![("./counter.js", "print('evaluated'); export let n = 1;")]),
        |agent, hooks| {
            let realm = agent.create_realm();
            for _ in 0..2 {
                let module = specter_ast::parse_module(
                    "import { n } from './counter.js'; print(n);",
                )
                .unwrap();
                realm
                    .evaluate_module(agent, module, Some("main.js".into()))
                    .unwrap();
            }
            let script = specter_ast::parse_script(
                "import('./counter.js').then(ns => print('dynamic ' + ns.n));",
                false,
            )
            .unwrap();
            realm.evaluate_script(agent, script).unwrap();
            let other_realm = agent.create_realm();
            let module =
                specter_ast::parse_module("import { n } from './counter.js';").unwrap();
            other_realm.evaluate_module(agent, module, None).unwrap();
            hooks.output.borrow().clone()
        },
    );
    assert_eq!(output, ["evaluated", "1", "dynamic 1", "evaluated"]);
}

#[test]
fn evaluation_errors_reject_the_module() {
    let errors = with_agent(
        hooks(vec![("./bad.js", "throw new Error('bad module');")]),
        |agent, _| {
            let realm = agent.create_realm();
            let mut errors = Vec::new();
            for _ in 0..2 {
                let module = specter_ast::parse_module("import './bad.js';").unwrap();
                let error = realm.evaluate_module(agent, module, None).unwrap_err();
                errors.push(error.to_display_string(agent));
            }
            errors
        },
    );
    assert_eq!(
        errors,
        ["Uncaught Error: bad module", "Uncaught Error: bad module"]
    );
}

#[test]
fn top_level_await_is_rejected_by_the_parser() {
    assert!(specter_ast::parse_module("await Promise.resolve(1);").is_err());
}
