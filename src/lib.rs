pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

pub use error::{Error, Result};

use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;

/// Lexes, parses and evaluates `source`. Nothing is evaluated when the
/// parser reports errors; all of them are returned instead.
pub fn run(source: &str, path: &str) -> Result<Value> {
    let mut parser = Parser::new(Lexer::new_from_source(source, path));
    let program = parser.parse_program();
    if parser.has_errors() {
        return Err(Error::Parse(parser.errors().to_vec()));
    }
    Ok(interpreter::evaluate(&program)?)
}
