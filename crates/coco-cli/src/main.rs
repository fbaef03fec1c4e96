//! Coco CLI
//!
//! Command-line interface for the Controller Code interpreter.

use anyhow::{Context, bail};
use clap::{Arg, ArgAction, Command};
use coco_interpreter::Interpreter;
use coco_parser::Parser;
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILE: &str = "code.coco";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("coco-cli")
        .version("0.1.0")
        .about("Controller Code interpreter")
        .arg(
            Arg::new("command")
                .short('c')
                .long("command")
                .value_name("STRING")
                .help("Execute a Controller Code string")
                .num_args(1),
        )
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Controller Code file (.coco) to execute [default: code.coco]")
                .index(1),
        )
        .arg(
            Arg::new("file-option")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Controller Code file (.coco) to execute, same as FILE")
                .num_args(1)
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print the raw code, tokens and parsed program first")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let result = matches.get_one::<String>("command").map_or_else(
        || {
            let file_path = matches
                .get_one::<String>("file-option")
                .or_else(|| matches.get_one::<String>("file"))
                .map_or(DEFAULT_FILE, String::as_str);
            execute_file(file_path, verbose)
        },
        |command_str| execute_string(command_str, "<command>", verbose),
    );

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

/// Run Controller Code and print what it printed
///
/// A top-level `return` of an integer becomes the exit code.
fn execute_string(source: &str, filename: &str, verbose: bool) -> Result<i32, anyhow::Error> {
    let parser = Parser::new_with_filename(source, filename)?;
    if verbose {
        print_section("Raw Code", source.trim_end());
        let tokens: Vec<String> = parser
            .tokens()
            .iter()
            .map(|token| format!("{:?} {:?}", token.token, token.text))
            .collect();
        print_section("Tokenized Tokens", &tokens.join("\n"));
    }

    let program = parser.parse()?;
    if verbose {
        let statements: Vec<String> = program
            .statements
            .iter()
            .map(|statement| format!("{:?}", statement.node))
            .collect();
        print_section("Parsed Program", &statements.join("\n"));
        println!("_______Interpreted Result_______");
    }
    debug!(filename, statements = program.statements.len(), "program parsed");

    let mut interpreter = Interpreter::new()
        .with_source(parser.source_map().clone(), parser.filename())
        .with_input(std::io::stdin().lock());

    match interpreter.execute(program) {
        Ok(outcome) => {
            print!("{}", outcome.stdout);
            Ok(outcome
                .value
                .and_then(|value| value.as_int())
                .unwrap_or(0))
        }
        Err(e) => {
            print!("{}", interpreter.take_output());
            Err(e.into())
        }
    }
}

fn execute_file(file_path: &str, verbose: bool) -> Result<i32, anyhow::Error> {
    let path = Path::new(file_path);
    if path.extension().is_none_or(|ext| ext != "coco") {
        bail!("File Error: The supplied file `{file_path}` does not have the file extension `.coco`");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("File Error: The supplied file `{file_path}` can't be read"))?;
    execute_string(&content, file_path, verbose)
}

fn print_section(title: &str, body: &str) {
    println!("_______{title}_______");
    println!("{body}");
}
