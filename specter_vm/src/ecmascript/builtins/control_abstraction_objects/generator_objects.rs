// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [27.5 Generator Objects](https://tc39.es/ecma262/#sec-generator-objects)

mod generator_prototype;

use std::rc::Rc;

pub(crate) use generator_prototype::GeneratorPrototype;
use specter_ast::ast::FunctionNode;

use crate::{
    ecmascript::{
        abstract_operations::operations_on_iterator_objects::create_iter_result_object,
        execution::{Agent, JsError, JsResult, agent::ExceptionType},
        types::{Object, ObjectKind, Value},
    },
    engine::{
        coroutine::{Coroutine, CoroutineBody, CoroutineStep, Resumption, Suspension},
        evaluator::function_definitions::evaluate_function_body,
    },
};

/// ### \[\[GeneratorState\]\]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum GeneratorState {
    #[default]
    SuspendedStart,
    SuspendedYield,
    Executing,
    Completed,
}

#[derive(Debug, Default)]
pub(crate) struct GeneratorData {
    pub(crate) state: GeneratorState,
    /// ### \[\[GeneratorContext\]\]
    ///
    /// None until GeneratorStart, and after completion.
    pub(crate) coroutine: Option<Coroutine>,
}

/// ### [27.5.3.1 GeneratorStart ( generator, generatorBody )](https://tc39.es/ecma262/#sec-generatorstart)
pub(crate) fn generator_start(agent: &Agent, generator: Object, f: Object, code: Rc<FunctionNode>) {
    // 1. Assert: The value of generator.[[GeneratorState]] is suspended-start.
    // 2. Let genContext be the running execution context.
    // 3. Set the Generator component of genContext to generator.
    let gen_context = agent.running_execution_context();
    // 4. Let closure be a new Abstract Closure with no parameters that
    // captures generatorBody and performs the following steps when called:
    let handle = agent.handle();
    let body: CoroutineBody = Box::pin(async move {
        let agent = handle;
        evaluate_function_body(&agent, f, &code).await
    });
    // 5. Set the code evaluation state of genContext such that when
    // evaluation is resumed for that execution context, closure will be
    // called with no arguments.
    let coroutine = Coroutine::new(agent, gen_context, body);
    // 6. Set generator.[[GeneratorContext]] to genContext.
    if let ObjectKind::Generator(data) = &mut agent.object_mut(generator).kind {
        data.coroutine = Some(coroutine);
    }
    // 7. Return unused.
}

/// ### [27.5.3.2 GeneratorValidate ( generator, generatorBrand )](https://tc39.es/ecma262/#sec-generatorvalidate)
fn generator_validate(agent: &Agent, generator: Value) -> JsResult<(Object, GeneratorState)> {
    // 1. Perform ? RequireInternalSlot(generator, [[GeneratorState]]).
    // 2. Perform ? RequireInternalSlot(generator, [[GeneratorBrand]]).
    // 3. If generator.[[GeneratorBrand]] is not generatorBrand, throw a
    // TypeError exception.
    let state = match generator {
        Value::Object(object) => match &agent.object(object).kind {
            ObjectKind::Generator(data) => Some((object, data.state)),
            _ => None,
        },
        _ => None,
    };
    let Some((generator, state)) = state else {
        return Err(agent
            .throw_exception_with_static_message(ExceptionType::TypeError, "Generator expected"));
    };
    // 4. Assert: generator also has a [[GeneratorContext]] internal slot.
    // 5. Let state be generator.[[GeneratorState]].
    // 6. If state is executing, throw a TypeError exception.
    if state == GeneratorState::Executing {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "The generator is already running",
        ));
    }
    // 7. Return state.
    Ok((generator, state))
}

fn set_generator_state(
    agent: &Agent,
    generator: Object,
    state: GeneratorState,
) -> Option<Coroutine> {
    let mut object = agent.object_mut(generator);
    let ObjectKind::Generator(data) = &mut object.kind else {
        return None;
    };
    tracing::trace!(event = "generator_state", from = ?data.state, to = ?state);
    data.state = state;
    if state == GeneratorState::Completed {
        // Once a generator enters the completed state it never leaves it and
        // its associated execution context is never resumed.
        data.coroutine.take()
    } else {
        data.coroutine
    }
}

/// ### [27.5.3.3 GeneratorResume ( generator, value, generatorBrand )](https://tc39.es/ecma262/#sec-generatorresume)
///
/// Also performs [27.5.3.4 GeneratorResumeAbrupt ( generator, abruptCompletion, generatorBrand )](https://tc39.es/ecma262/#sec-generatorresumeabrupt)
/// when `resumption` is a throw or return.
pub(crate) fn generator_resume(
    agent: &Agent,
    generator: Value,
    resumption: Resumption,
) -> JsResult<Value> {
    // 1. Let state be ? GeneratorValidate(generator, generatorBrand).
    let (generator, mut state) = generator_validate(agent, generator)?;
    // GeneratorResumeAbrupt 2. If state is suspended-start, then
    if state == GeneratorState::SuspendedStart && !matches!(resumption, Resumption::Next(_)) {
        // a. Set generator.[[GeneratorState]] to completed.
        // b. NOTE: Once a generator enters the completed state it never
        // leaves it and its associated execution context is never resumed.
        // Any execution state associated with generator can be discarded
        // at this point.
        if let Some(coroutine) = set_generator_state(agent, generator, GeneratorState::Completed) {
            coroutine.abandon(agent);
        }
        // c. Set state to completed.
        state = GeneratorState::Completed;
    }
    // 2. If state is completed, return CreateIteratorResultObject(undefined, true).
    if state == GeneratorState::Completed {
        return match resumption {
            Resumption::Next(_) => Ok(Value::Object(create_iter_result_object(
                agent,
                Value::Undefined,
                true,
            ))),
            // GeneratorResumeAbrupt 3.a. If abruptCompletion is a return
            // completion, then
            //     i. Return CreateIteratorResultObject(abruptCompletion.[[Value]], true).
            Resumption::Return(value) => Ok(Value::Object(create_iter_result_object(
                agent, value, true,
            ))),
            // b. Return ? abruptCompletion.
            Resumption::Throw(error) => Err(JsError::Throw(error)),
        };
    }
    // 3. Assert: state is either suspended-start or suspended-yield.
    // 4. Let genContext be generator.[[GeneratorContext]].
    // 7. Set generator.[[GeneratorState]] to executing.
    let Some(coroutine) = set_generator_state(agent, generator, GeneratorState::Executing) else {
        return Err(agent.internal_error("generator has no context"));
    };
    // 8. Push genContext onto the execution context stack; genContext is now
    // the running execution context.
    // 9. Resume the suspended evaluation of genContext using
    // NormalCompletion(value) as the result of the operation that suspended
    // it. Let result be the value returned by the resumed computation.
    let step = coroutine.resume(agent, resumption);
    // 10. Assert: When we return here, genContext has already been removed
    // from the execution context stack and callerContext is the currently
    // running execution context.
    match step {
        // GeneratorYield 5. Set generator.[[GeneratorState]] to suspended-yield.
        Ok(CoroutineStep::Suspended(Suspension::Yield(iterator_result))) => {
            set_generator_state(agent, generator, GeneratorState::SuspendedYield);
            // 11. Return ? result.
            Ok(iterator_result)
        }
        Ok(CoroutineStep::Suspended(Suspension::Await(_))) => {
            set_generator_state(agent, generator, GeneratorState::Completed);
            Err(agent.internal_error("generator body awaited"))
        }
        // GeneratorStart 4.g. Set acGenerator.[[GeneratorState]] to completed.
        Ok(CoroutineStep::Complete(result)) => {
            set_generator_state(agent, generator, GeneratorState::Completed);
            // h. If result is a normal completion, then
            //     i. Let resultValue be undefined.
            // i. Else if result is a return completion, then
            //     i. Let resultValue be result.[[Value]].
            // j. Else,
            //     i. Assert: result is a throw completion.
            //     ii. Return ? result.
            // k. Return CreateIteratorResultObject(resultValue, true).
            result.map(|value| Value::Object(create_iter_result_object(agent, value, true)))
        }
        Err(error) => {
            set_generator_state(agent, generator, GeneratorState::Completed);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn generators_yield_then_complete() {
        assert_eq!(
            run_to_string(
                "function* g() { var x = yield 1; yield x * 2; return 'end'; }
                 var it = g();
                 var a = it.next('ignored'), b = it.next(5), c = it.next(), d = it.next();
                 [a.value, a.done, b.value, c.value, c.done, d.value, d.done].join()"
            ),
            "1,false,10,end,true,,true"
        );
    }

    #[test]
    fn abrupt_resumption_before_start_completes_the_generator() {
        assert_eq!(
            run_to_string(
                "var ran = false;
                 function* g() { ran = true; yield 1; }
                 var it = g();
                 var r = it.return(9);
                 [r.value, r.done, it.next().done, ran].join()"
            ),
            "9,true,true,false"
        );
        assert_eq!(
            run_to_string(
                "function* g() { yield 1; }
                 var it = g();
                 try { it.throw('x'); } catch (e) { e + ':' + it.next().done }"
            ),
            "x:true"
        );
    }

    #[test]
    fn return_runs_finally_blocks() {
        assert_eq!(
            run_to_string(
                "var log = [];
                 function* g() { try { yield 1; yield 2; } finally { log.push('cleanup'); } }
                 var it = g();
                 it.next();
                 var r = it.return(3);
                 log.push(r.value, r.done);
                 log.join()"
            ),
            "cleanup,3,true"
        );
    }

    #[test]
    fn throw_can_be_caught_inside_the_body() {
        assert_eq!(
            run_to_string(
                "function* g() { try { yield 1; } catch (e) { yield 'caught ' + e; } }
                 var it = g();
                 it.next();
                 it.throw('boom').value"
            ),
            "caught boom"
        );
    }

    #[test]
    fn reentrant_resumption_is_a_type_error() {
        assert_eq!(
            run_to_string(
                "var it;
                 function* g() { try { it.next(); } catch (e) { yield e.constructor.name; } }
                 it = g();
                 it.next().value"
            ),
            "TypeError"
        );
        assert_eq!(
            run_to_string("try { (function* () {})().next.call({}) } catch (e) { e.name }"),
            "TypeError"
        );
    }

    #[test]
    fn generators_are_iterable() {
        assert_eq!(
            run_to_string(
                "function* g() { yield* [1, 2]; yield 3; }
                 var out = []; for (var v of g()) out.push(v);
                 out.join() + ' ' + Object.prototype.toString.call(g())"
            ),
            "1,2,3 [object Generator]"
        );
    }
}
