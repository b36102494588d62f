//! A tree-walking interpreter for the Monkey language.
//!
//! The pipeline turns source text into evaluated results: [`lexer::Lexer`]
//! produces tokens on demand, [`parser::Parser`] builds an [`ast::Program`]
//! with a Pratt-style expression parser, and [`eval::eval`] interprets the
//! tree against a chained [`object::Environment`].
//!
//! # Examples
//!
//! See [`crate::repl`].
//!
//! # Limitations
//!
//! - No static type checking; runtime type errors are first-class
//!   [`object::Object`] error values.
//! - The parser accumulates errors but does not recover: trees produced
//!   after a syntax error may be partial.
//! - No arrays, hashes, or builtin functions.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;
