// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use specter_ast::ParseError;
use specter_vm::{Agent, EvaluationError, HostHooks, LoadedModule, Value};

/// Host hooks of the command line: modules are files, resolved relative to
/// the file that imports them.
#[derive(Debug, Default)]
pub struct CliHostHooks;

impl HostHooks for CliHostHooks {
    fn load_imported_module(
        &self,
        referrer: Option<&str>,
        specifier: &str,
    ) -> Result<LoadedModule, String> {
        let base = referrer
            .and_then(|referrer| Path::new(referrer).parent())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let path = base
            .join(specifier)
            .canonicalize()
            .map_err(|error| format!("Cannot find module '{specifier}': {error}"))?;
        tracing::debug!(event = "load_module_file", path = %path.display());
        let source = std::fs::read_to_string(&path)
            .map_err(|error| format!("Cannot read module '{specifier}': {error}"))?;
        let module = specter_ast::parse_module(&source)
            .map_err(|error| format!("Cannot parse module '{specifier}': {}", error.message()))?;
        Ok(LoadedModule {
            module,
            host_defined: Some(path.to_string_lossy().into()),
        })
    }
}

/// The key a root module is registered under, so that imports of the same
/// file from other modules resolve to it.
pub fn module_key(path: &str) -> Option<std::rc::Rc<str>> {
    Path::new(path)
        .canonicalize()
        .ok()
        .map(|path| path.to_string_lossy().into())
}

pub fn print_result(agent: &Agent, result: Result<Value, EvaluationError>, verbose: bool) {
    match result {
        Ok(result) => {
            if verbose {
                println!("{}", result.to_display_string(agent));
            }
        }
        Err(error) => {
            eprintln!("{}", error.to_display_string(agent));
            std::process::exit(1);
        }
    }
}

/// Exit the program with parse errors.
pub fn exit_with_parse_errors(error: ParseError, source_path: &str, source: &str) -> ! {
    match error {
        ParseError::Syntax(errors) => {
            // This seems to be needed for color and Unicode output.
            let _ = miette::set_hook(Box::new(|_| {
                Box::new(oxc_diagnostics::GraphicalReportHandler::new())
            }));
            let named_source = miette::NamedSource::new(source_path, source.to_owned());

            eprintln!("SyntaxError:");
            for error in errors {
                let report = error.with_source_code(named_source.clone());
                eprintln!("{report:?}");
            }
        }
        ParseError::Unsupported { what, span } => {
            eprintln!(
                "SyntaxError: unsupported syntax: {what}\n  --> {source_path}:{}",
                line_of(source, span.start)
            );
        }
    }
    std::process::exit(1);
}

/// One based line number of a byte offset.
fn line_of(source: &str, offset: u32) -> usize {
    let offset = (offset as usize).min(source.len());
    source.as_bytes()[..offset]
        .iter()
        .filter(|&&byte| byte == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::line_of;

    #[test]
    fn offsets_map_to_lines() {
        let source = "let a;\nlet b;\n\nawait c;";
        assert_eq!(line_of(source, 0), 1);
        assert_eq!(line_of(source, 8), 2);
        assert_eq!(line_of(source, 15), 4);
        assert_eq!(line_of(source, 1000), 4);
    }
}
