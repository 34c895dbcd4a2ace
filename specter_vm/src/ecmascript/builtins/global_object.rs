// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [19 The Global Object](https://tc39.es/ecma262/#sec-global-object)
//!
//! The value properties and constructors of the global object are installed
//! by SetDefaultGlobalBindings; this module defines its function
//! properties.

use specter_ast::parse_script;

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_int32, to_number, to_rust_string, to_string},
        builders::builtin_function_builder::BuiltinFunctionBuilder,
        builtins::{ArgumentsList, Behaviour, Builtin, BuiltinIntrinsic},
        execution::{
            Agent, ECMAScriptCodeEvaluationState, EnvironmentIndex, ExecutionContext,
            IntrinsicObjectIndex, JsResult, Realm, agent::ExceptionType,
            new_declarative_environment,
        },
        types::{Value, is_js_whitespace},
    },
    engine::{
        evaluator::{
            declaration_instantiation::eval_declaration_instantiation, evaluate_statement_list,
        },
        run_sync,
    },
};

pub(crate) struct GlobalObject;

struct GlobalObjectEval;
impl Builtin for GlobalObjectEval {
    const NAME: &'static str = "eval";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GlobalObject::eval);
}
impl BuiltinIntrinsic for GlobalObjectEval {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Eval;
}

struct GlobalObjectIsFinite;
impl Builtin for GlobalObjectIsFinite {
    const NAME: &'static str = "isFinite";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GlobalObject::is_finite);
}
impl BuiltinIntrinsic for GlobalObjectIsFinite {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::IsFinite;
}

struct GlobalObjectIsNaN;
impl Builtin for GlobalObjectIsNaN {
    const NAME: &'static str = "isNaN";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GlobalObject::is_nan);
}
impl BuiltinIntrinsic for GlobalObjectIsNaN {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::IsNaN;
}

pub(crate) struct GlobalObjectParseFloat;
impl Builtin for GlobalObjectParseFloat {
    const NAME: &'static str = "parseFloat";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GlobalObject::parse_float);
}
impl BuiltinIntrinsic for GlobalObjectParseFloat {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ParseFloat;
}

pub(crate) struct GlobalObjectParseInt;
impl Builtin for GlobalObjectParseInt {
    const NAME: &'static str = "parseInt";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GlobalObject::parse_int);
}
impl BuiltinIntrinsic for GlobalObjectParseInt {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::ParseInt;
}

struct GlobalObjectPrint;
impl Builtin for GlobalObjectPrint {
    const NAME: &'static str = "print";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GlobalObject::print);
}
impl BuiltinIntrinsic for GlobalObjectPrint {
    const INDEX: IntrinsicObjectIndex = IntrinsicObjectIndex::Print;
}

impl GlobalObject {
    /// ### [19.2.1 eval ( x )](https://tc39.es/ecma262/#sec-eval-x)
    fn eval(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? PerformEval(x, false, false).
        perform_eval(agent, arguments.get(0), false, false)
    }

    /// ### [19.2.2 isFinite ( number )](https://tc39.es/ecma262/#sec-isfinite-number)
    fn is_finite(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let num be ? ToNumber(number).
        let num = to_number(agent, arguments.get(0))?;
        // 2. If num is not finite, return false.
        // 3. Otherwise, return true.
        Ok(Value::Boolean(num.is_finite()))
    }

    /// ### [19.2.3 isNaN ( number )](https://tc39.es/ecma262/#sec-isnan-number)
    fn is_nan(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let num be ? ToNumber(number).
        let num = to_number(agent, arguments.get(0))?;
        // 2. If num is NaN, return true.
        // 3. Otherwise, return false.
        Ok(Value::Boolean(num.is_nan()))
    }

    /// ### [19.2.4 parseFloat ( string )](https://tc39.es/ecma262/#sec-parsefloat-string)
    pub(crate) fn parse_float(
        agent: &Agent,
        _: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let inputString be ? ToString(string).
        let input_string = to_string(agent, arguments.get(0))?.as_rc(agent);
        Ok(Value::Number(parse_float(&input_string)))
    }

    /// ### [19.2.5 parseInt ( string, radix )](https://tc39.es/ecma262/#sec-parseint-string-radix)
    pub(crate) fn parse_int(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let inputString be ? ToString(string).
        let input_string = to_string(agent, arguments.get(0))?.as_rc(agent);
        // 6. Let R be ℝ(? ToInt32(radix)).
        let radix = to_int32(agent, arguments.get(1))?;
        Ok(Value::Number(parse_int(&input_string, radix)))
    }

    /// Write the arguments, converted to strings and separated by spaces, to
    /// the host's output.
    fn print(agent: &Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut parts = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            parts.push(to_rust_string(agent, *argument)?);
        }
        agent.host_hooks().print(&parts.join(" "));
        Ok(Value::Undefined)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        BuiltinFunctionBuilder::new_intrinsic_function::<GlobalObjectEval>(agent, realm).build();
        BuiltinFunctionBuilder::new_intrinsic_function::<GlobalObjectIsFinite>(agent, realm)
            .build();
        BuiltinFunctionBuilder::new_intrinsic_function::<GlobalObjectIsNaN>(agent, realm).build();
        BuiltinFunctionBuilder::new_intrinsic_function::<GlobalObjectParseFloat>(agent, realm)
            .build();
        BuiltinFunctionBuilder::new_intrinsic_function::<GlobalObjectParseInt>(agent, realm)
            .build();
        BuiltinFunctionBuilder::new_intrinsic_function::<GlobalObjectPrint>(agent, realm).build();
    }
}

/// ### [19.2.1.1 PerformEval ( x, strictCaller, direct )](https://tc39.es/ecma262/#sec-performeval)
pub(crate) fn perform_eval(
    agent: &Agent,
    x: Value,
    strict_caller: bool,
    direct: bool,
) -> JsResult<Value> {
    // 1. Assert: If direct is false, then strictCaller is also false.
    debug_assert!(direct || !strict_caller);
    // 2. If x is not a String, return x.
    let Value::String(x) = x else {
        return Ok(x);
    };
    // 3. Let evalRealm be the current Realm Record.
    let eval_realm = agent.current_realm();
    // 5. Perform ? HostEnsureCanCompileStrings(evalRealm, « », x, direct).
    agent
        .host_hooks()
        .ensure_can_compile_strings(agent, eval_realm)?;
    // 11. Perform the following substeps in an implementation-defined order,
    // possibly interleaving parsing and error detection:
    //   a. Let script be ParseText(x, Script).
    //   b. If script is a List of errors, throw a SyntaxError exception.
    let source = x.as_rc(agent);
    let script = parse_script(&source, strict_caller)
        .map_err(|error| agent.throw_exception(ExceptionType::SyntaxError, error.message()))?;
    tracing::trace!(event = "perform_eval", direct, strict = script.strict, len = source.len());
    // 13. If strictCaller is true, let strictEval be true.
    // 14. Else, let strictEval be ScriptIsStrict of script.
    let strict_eval = strict_caller || script.strict;
    // 15. Let runningContext be the running execution context.
    let running_context = agent.running_execution_context();
    // 16. NOTE: If direct is true, runningContext will be the execution
    // context that performed the direct eval. If direct is false,
    // runningContext will be the execution context for the invocation of the
    // eval function.
    let (lex_outer, var_env, private_env) = match running_context.ecmascript_code {
        // 17. If direct is true, then
        Some(code) if direct => (
            // a. Let lexEnv be NewDeclarativeEnvironment(runningContext's
            // LexicalEnvironment).
            code.lexical_environment,
            // b. Let varEnv be runningContext's VariableEnvironment.
            code.variable_environment,
            // c. Let privateEnv be runningContext's PrivateEnvironment.
            code.private_environment,
        ),
        // 18. Else,
        _ => {
            // a. Let lexEnv be NewDeclarativeEnvironment(evalRealm.[[GlobalEnv]]).
            // b. Let varEnv be evalRealm.[[GlobalEnv]].
            // c. Let privateEnv be null.
            let global_env = EnvironmentIndex::Global(eval_realm.global_env(agent));
            (global_env, global_env, None)
        }
    };
    let lex_env = new_declarative_environment(agent, Some(lex_outer));
    // 19. If strictEval is true, set varEnv to lexEnv.
    let var_env = if strict_eval {
        EnvironmentIndex::Declarative(lex_env)
    } else {
        var_env
    };
    // 20. If runningContext is not already suspended, suspend runningContext.
    // 21. Let evalContext be a new ECMAScript code execution context.
    let eval_context = ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            // 26. Set evalContext's LexicalEnvironment to lexEnv.
            lexical_environment: EnvironmentIndex::Declarative(lex_env),
            // 25. Set evalContext's VariableEnvironment to varEnv.
            variable_environment: var_env,
            // 27. Set evalContext's PrivateEnvironment to privateEnv.
            private_environment: private_env,
            is_strict_mode: strict_eval,
        }),
        // 22. Set evalContext's Function to null.
        function: None,
        // 23. Set evalContext's Realm to evalRealm.
        realm: eval_realm,
        // 24. Set evalContext's ScriptOrModule to runningContext's ScriptOrModule.
        script_or_module: running_context.script_or_module,
        coroutine: None,
    };
    // 28. Push evalContext onto the execution context stack; evalContext is
    // now the running execution context.
    let depth = agent.execution_context_depth();
    agent.push_execution_context(eval_context);
    // 29. Let result be Completion(EvalDeclarationInstantiation(body, varEnv,
    // lexEnv, privateEnv, strictEval)).
    let result = eval_declaration_instantiation(
        agent,
        &script.scope,
        var_env,
        lex_env,
        private_env,
        strict_eval,
    )
    .and_then(|()| {
        // 30. If result is a normal completion, then
        //   a. Set result to Completion(Evaluation of body).
        run_sync(agent, async {
            match evaluate_statement_list(agent, &script.body).await {
                Ok(value) => Ok(value),
                Err(completion) => completion.into_script_result(agent),
            }
        })
    });
    // 32. Suspend evalContext and remove it from the execution context stack.
    // 33. Resume the context that is now on the top of the execution context
    // stack as the running execution context.
    agent.truncate_execution_context_stack(depth);
    // 31. If result is a normal completion and result.[[Value]] is EMPTY, then
    //   a. Set result to NormalCompletion(undefined).
    // 34. Return ? result.
    Ok(result?.unwrap_or(Value::Undefined))
}

/// The numeric value of the longest prefix of `input` that satisfies the
/// syntax of a StrDecimalLiteral, after leading white space.
fn parse_float(input: &str) -> f64 {
    // 2. Let trimmedString be ! TrimString(inputString, START).
    let trimmed = input.trim_start_matches(is_js_whitespace);
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    // "Infinity" is the only non-numeric StrDecimalLiteral.
    if trimmed[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let digits_from = |mut index: usize| {
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        index
    };
    let integer_end = digits_from(end);
    let mut has_digits = integer_end > end;
    end = integer_end;
    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        if fraction_end > end + 1 || has_digits {
            has_digits |= fraction_end > end + 1;
            end = fraction_end;
        }
    }
    // 4. If trimmedPrefix does not contain a StrDecimalLiteral, return NaN.
    if !has_digits {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_start = end + 1;
        if matches!(bytes.get(exponent_start), Some(b'+' | b'-')) {
            exponent_start += 1;
        }
        let exponent_end = digits_from(exponent_start);
        if exponent_end > exponent_start {
            end = exponent_end;
        }
    }
    // 5. Let parsedNumber be ParseText(numberString, StrDecimalLiteral).
    // 7. Return StringToNumber(CodePointsToString(numberString)).
    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_int(input: &str, radix: i32) -> f64 {
    // 2. Let S be ! TrimString(inputString, START).
    let mut s = input.trim_start_matches(is_js_whitespace);
    // 3. Let sign be 1.
    // 4. If S is not empty and the first code unit of S is the code unit
    // 0x002D (HYPHEN-MINUS), set sign to -1.
    let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
    // 5. If S is not empty and the first code unit of S is either the code
    // unit 0x002B (PLUS SIGN) or the code unit 0x002D (HYPHEN-MINUS), set S
    // to the substring of S from index 1.
    if s.starts_with(['+', '-']) {
        s = &s[1..];
    }
    // 7. Let stripPrefix be true.
    let mut strip_prefix = true;
    let mut r = radix;
    // 8. If R ≠ 0, then
    if r != 0 {
        // a. If R < 2 or R > 36, return NaN.
        if !(2..=36).contains(&r) {
            return f64::NAN;
        }
        // b. If R ≠ 16, set stripPrefix to false.
        if r != 16 {
            strip_prefix = false;
        }
    } else {
        // 9. Else,
        //   a. Set R to 10.
        r = 10;
    }
    // 10. If stripPrefix is true, then
    if strip_prefix && (s.starts_with("0x") || s.starts_with("0X")) {
        // a. If the length of S is at least 2 and the first two code units of
        // S are either "0x" or "0X", then
        //   i. Set S to the substring of S from index 2.
        //   ii. Set R to 16.
        s = &s[2..];
        r = 16;
    }
    let radix = r.unsigned_abs();
    // 11. If S contains a code unit that is not a radix-R digit, let end be
    // the index within S of the first such code unit; otherwise, let end be
    // the length of S.
    let end = s
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(s.len());
    // 12. Let Z be the substring of S from 0 to end.
    let z = &s[..end];
    // 13. If Z is empty, return NaN.
    if z.is_empty() {
        return f64::NAN;
    }
    // 14. Let mathInt be the integer value that is represented by Z in
    // radix-R notation.
    let math_int = if radix == 10 {
        z.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        z.chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit))
    };
    // 15. If mathInt = 0, then
    //   a. If sign = -1, return -0𝔽.
    //   b. Return +0𝔽.
    // 16. Return 𝔽(sign × mathInt).
    sign * math_int
}

#[cfg(test)]
mod tests {
    use super::{parse_float, parse_int};
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn parse_float_takes_the_longest_decimal_prefix() {
        assert_eq!(parse_float("  3.25abc"), 3.25);
        assert_eq!(parse_float("-.5e1x"), -5.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-Infinityx"), f64::NEG_INFINITY);
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("-0").is_sign_negative());
    }

    #[test]
    fn parse_int_handles_radix_and_prefix() {
        assert_eq!(parse_int("  42px", 0), 42.0);
        assert_eq!(parse_int("0x1F", 0), 31.0);
        assert_eq!(parse_int("0x1F", 16), 31.0);
        assert_eq!(parse_int("0x1F", 10), 0.0);
        assert_eq!(parse_int("z", 36), 35.0);
        assert_eq!(parse_int("-101", 2), -5.0);
        assert!(parse_int("12", 1).is_nan());
        assert!(parse_int("", 0).is_nan());
        assert!(parse_int("-0", 0).is_sign_negative());
    }

    #[test]
    fn global_number_predicates_convert_arguments() {
        assert_eq!(run_to_string("isNaN('abc') + ' ' + isNaN('12')"), "true false");
        assert_eq!(run_to_string("isFinite('1e3') + ' ' + isFinite(Infinity)"), "true false");
    }

    #[test]
    fn indirect_eval_runs_in_the_global_scope() {
        assert_eq!(
            run_to_string("var x = 'global'; (function () { var x = 'local'; return (0, eval)('x'); })()"),
            "global"
        );
        assert_eq!(
            run_to_string("(function () { var x = 'local'; return eval('x'); })()"),
            "local"
        );
        assert_eq!(run_to_string("eval(42)"), "42");
        assert_eq!(run_to_string("eval('')"), "undefined");
    }

    #[test]
    fn eval_reports_syntax_errors() {
        assert_eq!(run_to_string("try { eval('var'); } catch (e) { e.name }"), "SyntaxError");
    }

    #[test]
    fn strict_eval_keeps_vars_local() {
        assert_eq!(
            run_to_string("'use strict'; eval('var hidden = 1'); typeof hidden"),
            "undefined"
        );
        assert_eq!(run_to_string("eval('\"use strict\"; var s = 1'); typeof s"), "undefined");
        assert_eq!(run_to_string("eval('var t = 1'); t"), "1");
    }
}
