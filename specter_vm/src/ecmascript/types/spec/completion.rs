// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.4 The Completion Record Specification Type](https://tc39.es/ecma262/#sec-completion-record-specification-type)
//!
//! Normal completions are the `Ok` side of a Rust `Result` and abrupt
//! completions the `Err` side, so `?` performs ReturnIfAbrupt.

use specter_ast::ast::Atom;

use crate::ecmascript::{
    execution::{Agent, JsError, JsResult, agent::ExceptionType},
    types::Value,
};

/// The \[\[Value\]\] of a normal completion of a statement. `None` is the
/// ~empty~ of ECMA-262.
pub(crate) type CompletionValue = Option<Value>;

/// A Completion Record: `Ok` is a normal completion.
pub(crate) type Completion<T = CompletionValue> = Result<T, AbruptCompletion>;

/// An abrupt completion. Break and Continue carry the \[\[Target\]\] label
/// and the \[\[Value\]\] accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AbruptCompletion {
    Throw(JsError),
    Return(Value),
    Break {
        label: Option<Atom>,
        value: CompletionValue,
    },
    Continue {
        label: Option<Atom>,
        value: CompletionValue,
    },
}

impl From<JsError> for AbruptCompletion {
    fn from(error: JsError) -> Self {
        AbruptCompletion::Throw(error)
    }
}

impl AbruptCompletion {
    /// ### [6.2.4.7 UpdateEmpty ( completionRecord, value )](https://tc39.es/ecma262/#sec-updateempty)
    pub(crate) fn update_empty(self, value: CompletionValue) -> Self {
        match self {
            AbruptCompletion::Break { label, value: None } => {
                AbruptCompletion::Break { label, value }
            }
            AbruptCompletion::Continue { label, value: None } => {
                AbruptCompletion::Continue { label, value }
            }
            completion => completion,
        }
    }

    /// True for completions that skip `finally` blocks and `catch` clauses.
    pub(crate) fn is_internal_error(&self) -> bool {
        matches!(self, AbruptCompletion::Throw(JsError::Internal(_)))
    }

    /// Collapse the completion of a function body into the function's
    /// result. Break and Continue cannot target anything outside of the
    /// body.
    pub(crate) fn into_function_result(self, agent: &Agent) -> JsResult<Value> {
        match self {
            AbruptCompletion::Throw(error) => Err(error),
            AbruptCompletion::Return(value) => Ok(value),
            AbruptCompletion::Break { .. } | AbruptCompletion::Continue { .. } => {
                Err(escaped_jump(agent, &self))
            }
        }
    }

    /// Collapse the completion of a script or module body. Return is not
    /// allowed outside of functions.
    pub(crate) fn into_script_result(self, agent: &Agent) -> JsResult<CompletionValue> {
        match self {
            AbruptCompletion::Throw(error) => Err(error),
            AbruptCompletion::Return(_)
            | AbruptCompletion::Break { .. }
            | AbruptCompletion::Continue { .. } => Err(escaped_jump(agent, &self)),
        }
    }
}

fn escaped_jump(agent: &Agent, completion: &AbruptCompletion) -> JsError {
    let message = match completion {
        AbruptCompletion::Break {
            label: Some(label), ..
        } => format!("Undefined label '{label}'"),
        AbruptCompletion::Continue {
            label: Some(label), ..
        } => format!("Undefined label '{label}'"),
        AbruptCompletion::Break { .. } => "Illegal break statement".to_owned(),
        AbruptCompletion::Continue { .. } => "Illegal continue statement".to_owned(),
        _ => "Illegal return statement".to_owned(),
    };
    agent.throw_exception(ExceptionType::SyntaxError, message)
}

/// ### [8.9.1 Static Semantics: LoopContinues ( completion, labelSet )](https://tc39.es/ecma262/#sec-loopcontinues)
pub(crate) fn loop_continues(completion: &Completion, label_set: &[Atom]) -> bool {
    match completion {
        // 1. If completion is a normal completion, return true.
        Ok(_) => true,
        // 3. If completion.[[Target]] is empty, return true.
        Err(AbruptCompletion::Continue { label: None, .. }) => true,
        // 4. If labelSet contains completion.[[Target]], return true.
        Err(AbruptCompletion::Continue {
            label: Some(label), ..
        }) => label_set.contains(label),
        // 2. If completion is not a continue completion, return false.
        // 5. Return false.
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_empty_only_fills_empty_values() {
        let completion = AbruptCompletion::Break {
            label: None,
            value: None,
        };
        assert_eq!(
            completion.update_empty(Some(Value::Number(1.0))),
            AbruptCompletion::Break {
                label: None,
                value: Some(Value::Number(1.0))
            }
        );
        let completion = AbruptCompletion::Continue {
            label: None,
            value: Some(Value::Null),
        };
        assert_eq!(
            completion.clone().update_empty(Some(Value::Number(1.0))),
            completion
        );
        let completion = AbruptCompletion::Return(Value::Undefined);
        assert_eq!(completion.clone().update_empty(Some(Value::Null)), completion);
    }

    #[test]
    fn labelled_continue_matches_label_set() {
        let labels: Vec<Atom> = vec!["outer".into()];
        assert!(loop_continues(&Ok(None), &labels));
        assert!(loop_continues(
            &Err(AbruptCompletion::Continue {
                label: Some("outer".into()),
                value: None
            }),
            &labels
        ));
        assert!(!loop_continues(
            &Err(AbruptCompletion::Continue {
                label: Some("inner".into()),
                value: None
            }),
            &labels
        ));
        assert!(!loop_continues(
            &Err(AbruptCompletion::Break {
                label: None,
                value: None
            }),
            &labels
        ));
    }
}
