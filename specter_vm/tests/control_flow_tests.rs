// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use common::{CapturingHostHooks, eval, eval_in, printed, with_agent};
use specter_vm::PromiseRejectionOperation;

fn run(source: &'static str) -> String {
    with_agent(CapturingHostHooks::default(), move |agent, _| eval(agent, source))
}

#[test]
fn completed_generators_do_not_run_again() {
    assert_eq!(
        run("var runs = 0;
             function* gen() { runs++; yield 1; }
             var g = gen();
             var results = [g.next().value, g.next().done, g.next().done, g.next().value];
             results.push(runs);
             results.join()"),
        "1,true,true,,1"
    );
}

#[test]
fn re_entrant_generator_resumption_throws() {
    assert_eq!(
        run("var g;
             function* gen() {
                 try { g.next(); } catch (e) { yield e.name; }
             }
             g = gen();
             [g.next().value, g.next().done].join()"),
        "TypeError,true"
    );
}

#[test]
fn generator_return_and_throw_run_finally_blocks() {
    assert_eq!(
        printed(
            "function* gen() {
                 try { yield 1; yield 2; } finally { print('cleanup'); }
             }
             var g = gen(); g.next();
             print(JSON.stringify(g.return(7)));
             var h = gen(); h.next();
             try { h.throw(new Error('stop')); } catch (e) { print(e.message); }
             var fresh = gen();
             print(JSON.stringify(fresh.return(3)));"
        ),
        [
            "cleanup",
            r#"{"value":7,"done":true}"#,
            "cleanup",
            "stop",
            r#"{"value":3,"done":true}"#,
        ]
    );
}

#[test]
fn jobs_run_in_enqueue_order() {
    assert_eq!(
        printed(
            "Promise.resolve().then(() => {
                 print('a1');
                 Promise.resolve().then(() => print('a2'));
             });
             Promise.resolve().then(() => print('b1'));
             queueMicrotaskLike();
             function queueMicrotaskLike() {
                 Promise.reject(new Error('x')).catch(() => print('c1'));
             }
             print('sync');"
        ),
        ["sync", "a1", "b1", "c1", "a2"]
    );
}

#[test]
fn finally_runs_once_per_abrupt_exit() {
    assert_eq!(
        printed(
            "for (var i = 0; i < 3; i++) {
                 try {
                     if (i === 0) continue;
                     if (i === 1) break;
                 } finally { print('loop ' + i); }
             }
             function nested() {
                 try {
                     try { return 'value'; } finally { print('inner'); }
                 } finally { print('outer'); }
             }
             print(nested());
             outer: for (var j = 0; j < 2; j++) {
                 try {
                     try { continue outer; } finally { print('first ' + j); }
                 } finally { print('second ' + j); }
             }
             try {
                 try { throw new Error('boom'); } finally { print('throw inner'); }
             } catch (e) { print(e.message); } finally { print('throw outer'); }"
        ),
        [
            "loop 0",
            "loop 1",
            "inner",
            "outer",
            "value",
            "first 0",
            "second 0",
            "first 1",
            "second 1",
            "throw inner",
            "boom",
            "throw outer",
        ]
    );
}

#[test]
fn rejected_reactions_do_not_stop_other_jobs() {
    with_agent(CapturingHostHooks::default(), |agent, hooks| {
        assert_eq!(
            eval(
                agent,
                "Promise.resolve().then(() => { throw new TypeError('in job'); });
                 Promise.resolve().then(() => print('still runs'));
                 'done'"
            ),
            "done"
        );
        assert_eq!(*hooks.output.borrow(), ["still runs"]);
        assert_eq!(
            *hooks.rejections.borrow(),
            [PromiseRejectionOperation::Reject]
        );
        assert!(hooks.job_errors.borrow().is_empty());
        assert_eq!(agent.pending_job_count(), 0);
    });
}

#[test]
fn unhandled_rejections_are_tracked() {
    with_agent(CapturingHostHooks::default(), |agent, hooks| {
        let realm = agent.create_realm();
        eval_in(agent, realm, "var p = Promise.reject(1);");
        assert_eq!(
            *hooks.rejections.borrow(),
            [PromiseRejectionOperation::Reject]
        );
        eval_in(agent, realm, "p.catch(() => {});");
        assert_eq!(
            *hooks.rejections.borrow(),
            [
                PromiseRejectionOperation::Reject,
                PromiseRejectionOperation::Handle
            ]
        );
    });
}

#[test]
fn debugger_statements_reach_the_host() {
    with_agent(CapturingHostHooks::default(), |agent, hooks| {
        eval(agent, "debugger; for (var i = 0; i < 2; i++) debugger;");
        assert_eq!(*hooks.debugger_statements.borrow(), 3);
    });
}

#[test]
fn runaway_recursion_is_a_range_error() {
    with_agent(CapturingHostHooks::default(), |agent, _| {
        let depth = agent.execution_context_depth();
        assert_eq!(
            eval(agent, "function f() { return f(); } try { f() } catch (e) { e.name }"),
            "RangeError"
        );
        assert_eq!(agent.execution_context_depth(), depth);
    });
}

#[test]
fn recursion_a_thousand_calls_deep_completes() {
    with_agent(CapturingHostHooks::default(), |agent, _| {
        assert_eq!(
            eval(agent, "function depth(n) { return n === 0 ? 0 : 1 + depth(n - 1); } depth(1000)"),
            "1000"
        );
    });
}
