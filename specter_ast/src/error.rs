// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use oxc_diagnostics::OxcDiagnostic;
use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is not a valid Script or Module.
    #[error("{}", display_diagnostics(.0))]
    Syntax(Vec<OxcDiagnostic>),
    /// The source text is valid but uses syntax the engine does not evaluate
    /// (TypeScript, JSX, decorators, top-level await).
    #[error("unsupported syntax: {what}")]
    Unsupported { what: &'static str, span: Span },
}

impl ParseError {
    pub(crate) fn unsupported(what: &'static str, span: oxc_span::Span) -> Self {
        Self::Unsupported {
            what,
            span: Span::new(span.start, span.end),
        }
    }

    /// First error message, without source context.
    pub fn message(&self) -> String {
        match self {
            ParseError::Syntax(errors) => errors
                .first()
                .map(ToString::to_string)
                .unwrap_or_else(|| "invalid syntax".to_owned()),
            ParseError::Unsupported { what, .. } => format!("unsupported syntax: {what}"),
        }
    }
}

fn display_diagnostics(errors: &[OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
