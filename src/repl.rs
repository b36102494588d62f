//! Read-eval-print loop.

use std::io;
use std::io::prelude::*;

use crate::eval::eval;
use crate::lexer::Lexer;
use crate::object::{Environment, Object};
use crate::parser::Parser;

const PROMPT: &str = ">> ";

/// Run the read-eval-print loop until `input` is exhausted.
///
/// Every line is lexed, parsed, and evaluated against one persistent
/// environment, so definitions survive across lines. If a line has parse
/// errors they are printed tab-indented and the line is skipped; otherwise
/// the result is printed unless it is null.
///
/// # Example
///
/// ```
/// let input = b"let add = fn(x, y) { x + y; };\nadd(3, 4);\n";
/// let mut output: Vec<u8> = Vec::new();
/// rmonkey::repl::start(&input[..], &mut output)?;
///
/// let output = String::from_utf8(output).expect("output is not UTF-8");
/// assert_eq!(output, ">> >> 7\n>> ");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn start<R: BufRead, W: Write>(input: R, output: &mut W) -> io::Result<()> {
    let env = Environment::new_root();
    let mut lines = input.lines();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        let mut parser = Parser::new(Lexer::new(&line));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            for msg in parser.errors() {
                writeln!(output, "\t{}", msg)?;
            }
            continue;
        }

        let evaluated = eval(&program, &env);
        if evaluated != Object::Null {
            writeln!(output, "{}", evaluated.inspect())?;
        }
    }
}
