// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use std::{fs, path::PathBuf};

use common::{CapturingHostHooks, with_agent};

/// Evaluate a test source file after the assertion helpers, in one realm.
fn run_source_test(name: &'static str) {
    let path = |file: &str| -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "tests", "sources", file]
            .iter()
            .collect()
    };
    let header = fs::read_to_string(path("assert.js")).expect("Should have been able to read the file");
    let contents = fs::read_to_string(path(name)).expect("Should have been able to read the file");
    with_agent(CapturingHostHooks::default(), move |agent, _| {
        let realm = agent.create_realm();
        let header = specter_ast::parse_script(&header, false).unwrap();
        realm.evaluate_script(agent, header).unwrap();
        let script = specter_ast::parse_script(&contents, false).unwrap();
        if let Err(error) = realm.evaluate_script(agent, script) {
            panic!("Test '{name}' failed: {}", error.to_display_string(agent));
        }
    });
}

#[test]
fn object_prototype_tests() {
    run_source_test("objectPrototype.test.js");
}

#[test]
fn language_tests() {
    run_source_test("language.test.js");
}
