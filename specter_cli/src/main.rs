// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
mod helper;
mod theme;

use std::rc::Rc;

use clap::{Parser as ClapParser, Subcommand};
use cliclack::{input, intro, set_theme};
use helper::{CliHostHooks, exit_with_parse_errors, module_key, print_result};
use specter_vm::{Agent, Options};
use theme::DefaultTheme;
use tracing_subscriber::EnvFilter;

/// The tree-walking evaluator recurses on the native stack.
const EVALUATION_STACK_SIZE: usize = 256 * 1024 * 1024;

/// A JavaScript engine
#[derive(Debug, ClapParser)] // requires `derive` feature
#[command(name = "specter")]
#[command(about = "A JavaScript engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parses a file and logs out the AST
    Parse {
        /// Parse the file as a module instead of a script
        #[arg(short, long)]
        module: bool,

        /// The path of the file to parse
        path: String,
    },

    /// Evaluates a file
    Eval {
        #[arg(short, long)]
        verbose: bool,

        /// Evaluate the files as modules
        #[arg(short, long)]
        module: bool,

        /// Evaluate scripts as strict mode code
        #[arg(short, long)]
        strict: bool,

        /// The files to evaluate
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Runs the REPL
    Repl {},
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_tracing(matches!(args.command, Command::Eval { verbose: true, .. }));

    std::thread::Builder::new()
        .name("specter".into())
        .stack_size(EVALUATION_STACK_SIZE)
        .spawn(move || run(args.command).map_err(|error| error.to_string()))?
        .join()
        .map_err(|_| "evaluation thread panicked")??;
    Ok(())
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Parse { module, path } => {
            let file = std::fs::read_to_string(&path)?;
            if module {
                match specter_ast::parse_module(&file) {
                    Ok(module) => println!("{:#?}", module.body),
                    Err(error) => exit_with_parse_errors(error, &path, &file),
                }
            } else {
                match specter_ast::parse_script(&file, false) {
                    Ok(script) => println!("{:#?}", script.body),
                    Err(error) => exit_with_parse_errors(error, &path, &file),
                }
            }
        }
        Command::Eval {
            verbose,
            module,
            strict,
            paths,
        } => {
            let agent = Agent::new(
                Options {
                    print_internals: verbose,
                    ..Default::default()
                },
                Rc::new(CliHostHooks),
            );
            let realm = agent.create_realm();
            for path in paths {
                let file = std::fs::read_to_string(&path)?;
                let result = if module {
                    let module = match specter_ast::parse_module(&file) {
                        Ok(module) => module,
                        Err(error) => exit_with_parse_errors(error, &path, &file),
                    };
                    realm.evaluate_module(&agent, module, module_key(&path))
                } else {
                    let script = match specter_ast::parse_script(&file, strict) {
                        Ok(script) => script,
                        Err(error) => exit_with_parse_errors(error, &path, &file),
                    };
                    realm.evaluate_script(&agent, script)
                };
                print_result(&agent, result, verbose);
            }
        }
        Command::Repl {} => {
            let agent = Agent::new(Options::default(), Rc::new(CliHostHooks));
            let realm = agent.create_realm();

            ctrlc::set_handler(|| std::process::exit(0))?;
            set_theme(DefaultTheme);
            println!("\n\n");
            let mut placeholder = "Enter a line of Javascript".to_string();

            loop {
                intro("Specter Repl (type exit or ctrl+c to exit)")?;
                let input: String = input("").placeholder(&placeholder).interact()?;

                if input.trim() == "exit" {
                    std::process::exit(0);
                }
                placeholder = input.clone();
                let script = match specter_ast::parse_script(&input, false) {
                    Ok(script) => script,
                    Err(error) => {
                        eprintln!("SyntaxError: {}", error.message());
                        continue;
                    }
                };
                match realm.evaluate_script(&agent, script) {
                    Ok(result) => println!("{}\n", result.to_display_string(&agent)),
                    Err(error) => eprintln!("{}", error.to_display_string(&agent)),
                }
            }
        }
    }
    Ok(())
}
