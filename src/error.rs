//! Errors surfaced by `monkey::run`.

use crate::interpreter::EvalError;
use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The program did not parse; it was not evaluated.
    #[error("found {} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub type Result<T> = std::result::Result<T, Error>;
