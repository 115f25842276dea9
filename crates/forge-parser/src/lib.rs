//! Parser front-end for the Forge language family.
//!
//! Three source dialects — **Forge** (brace-delimited), **Suflae**
//! (indentation-delimited), and **Cake** (legacy indentation) — share one
//! token vocabulary and one AST. The parsers here turn a pre-lexed token
//! stream into a typed [`Program`](forge_ast::Program), recovering from
//! errors per declaration and buffering style warnings.
//!
//! The lexer is an external collaborator: it supplies the `Token` vector,
//! including the synthetic `Newline` / `Indent` / `Dedent` tokens for the
//! indentation dialects and a terminal `Eof`.
//!
//! # Usage
//!
//! ```ignore
//! let (program, warnings) = forge_parser::parse_forge(tokens, "main.forge");
//! for warning in &warnings {
//!     eprintln!("{warning}");
//! }
//! println!("{}", program.to_sexp());
//! ```

mod context;
mod cursor;
mod dialect;
mod error;
mod parser;

pub use dialect::{BlockStyle, Dialect};
pub use error::{ParseError, ParseResult};
pub use parser::Parser;

use forge_ast::Program;
use forge_diagnostics::CompileWarning;
use forge_token::Token;

use std::sync::Arc;

/// Parse a Forge (brace-dialect) token stream.
pub fn parse_forge(
    tokens: Vec<Token>,
    file: impl Into<Arc<str>>,
) -> (Program, Vec<CompileWarning>) {
    run(tokens, file, Dialect::forge())
}

/// Parse a Suflae (indentation-dialect) token stream.
pub fn parse_suflae(
    tokens: Vec<Token>,
    file: impl Into<Arc<str>>,
) -> (Program, Vec<CompileWarning>) {
    run(tokens, file, Dialect::suflae())
}

/// Parse a Cake (legacy indentation-dialect) token stream.
pub fn parse_cake(
    tokens: Vec<Token>,
    file: impl Into<Arc<str>>,
) -> (Program, Vec<CompileWarning>) {
    run(tokens, file, Dialect::cake())
}

fn run(
    tokens: Vec<Token>,
    file: impl Into<Arc<str>>,
    dialect: Dialect,
) -> (Program, Vec<CompileWarning>) {
    let mut parser = Parser::new(tokens, file, dialect);
    let program = parser.parse_program();
    let warnings = parser.into_warnings();
    (program, warnings)
}
