use std::fmt;
use std::rc::Rc;
use strum_macros::Display;

/// Path stamped on locations of sources that were not read from a file.
pub const NO_FILEPATH: &str = "<input>";

/// Where a lexeme starts in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: Rc<str>,
    /// 1-indexed.
    pub line: usize,
    /// 1-indexed.
    pub column: usize,
}

impl Location {
    pub fn new(path: &str, line: usize, column: usize) -> Location {
        Location {
            path: Rc::from(path),
            line,
            column,
        }
    }
    /// The cursor before the first character has been read. The column is
    /// pre-incremented by `next_char` before it is used.
    pub fn start(path: &str) -> Location {
        Location::new(path, 1, 0)
    }
    pub fn next_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }
    pub fn next_char(&mut self) {
        self.column += 1;
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[strum(serialize = "ILLEGAL")] Illegal,
    #[strum(serialize = "EOF")] Eof,

    // Literals.
    #[strum(serialize = "IDENTIFIER")] Identifier,
    #[strum(serialize = "INT")] Int,

    // Operators.
    #[strum(serialize = "=")] Assign,
    #[strum(serialize = "==")] Eq,
    #[strum(serialize = "!=")] NotEq,
    #[strum(serialize = "+")] Plus,
    #[strum(serialize = "-")] Minus,
    #[strum(serialize = "*")] Asterisk,
    #[strum(serialize = "/")] Slash,
    #[strum(serialize = "!")] Bang,

    // Delimiters.
    #[strum(serialize = ",")] Comma,
    #[strum(serialize = ";")] Semicolon,
    #[strum(serialize = "(")] LParen,
    #[strum(serialize = ")")] RParen,
    #[strum(serialize = "{")] LBrace,
    #[strum(serialize = "}")] RBrace,
    #[strum(serialize = "<")] LAngle,
    #[strum(serialize = ">")] RAngle,

    // Keywords.
    #[strum(serialize = "FUNCTION")] Function,
    #[strum(serialize = "LET")] Let,
    #[strum(serialize = "IF")] If,
    #[strum(serialize = "ELSE")] Else,
    #[strum(serialize = "RETURN")] Return,
    #[strum(serialize = "TRUE")] True,
    #[strum(serialize = "FALSE")] False,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub location: Location,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, literal: S, location: Location) -> Token {
        Token {
            kind,
            literal: literal.into(),
            location,
        }
    }
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod token_tests {
    use crate::token::{Location, TokenKind};

    #[test]
    fn location_advances() {
        let mut location = Location::start("a.monkey");
        location.next_char();
        location.next_char();
        assert_eq!(location, Location::new("a.monkey", 1, 2));
        location.next_line();
        location.next_char();
        assert_eq!(location, Location::new("a.monkey", 2, 1));
        assert_eq!(location.to_string(), "a.monkey:2:1");
    }

    #[test]
    fn kind_names() {
        assert_eq!(TokenKind::Identifier.to_string(), "IDENTIFIER");
        assert_eq!(TokenKind::NotEq.to_string(), "!=");
        assert_eq!(TokenKind::LBrace.to_string(), "{");
        assert_eq!(TokenKind::Function.to_string(), "FUNCTION");
    }
}
