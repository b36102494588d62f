//! Monkey interpreter command-line.
//!
//! When called without argument it drops into an interactive
//! read-evaluate-print loop.
//!
//! When called with arguments, it interprets the corresponding files in a
//! single environment, so definitions in one file are visible to the next.

use std::env;
use std::fs;
use std::io;

use anyhow::{bail, Context};

use rmonkey::eval::eval;
use rmonkey::lexer::Lexer;
use rmonkey::object::{Environment, Object};
use rmonkey::parser::Parser;
use rmonkey::repl;

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        run_all_files(args)?;
    } else {
        run_prompt()?;
    }
    Ok(())
}

fn run_all_files(paths: Vec<String>) -> Result<(), anyhow::Error> {
    let env = Environment::new_root();

    for path in &paths {
        let source =
            fs::read_to_string(path).with_context(|| format!("failed to open {}", path))?;

        let mut parser = Parser::new(Lexer::new(&source));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            bail!("{}: parse errors:\n{}", path, parser.errors().join("\n"));
        }

        if let Object::Error(message) = eval(&program, &env) {
            bail!("{}: {}", path, message);
        }
    }

    Ok(())
}

fn run_prompt() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::start(stdin.lock(), &mut stdout)
}
