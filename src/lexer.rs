use crate::token::{Location, Token, TokenKind, NO_FILEPATH};
use phf::phf_map;

/// Produces tokens on demand from a fully materialized source text.
///
/// The lexer never fails: anything it cannot classify is handed out as an
/// `Illegal` token and left for the parser to report. Once the input is
/// exhausted every call returns `Eof` at the same location.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: char,
    location: Location,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer::new_from_source(source, NO_FILEPATH)
    }
    /// `path` is stamped into the location of every token this lexer makes.
    pub fn new_from_source(source: &str, path: &str) -> Lexer {
        let mut lexer = Lexer {
            input: source.chars().collect(),
            position: 0,
            read_position: 0,
            ch: '\0',
            location: Location::start(path),
        };
        lexer.read_char();
        lexer
    }
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        if self.at_end() {
            return Token::new(TokenKind::Eof, "", self.location.clone());
        }
        let kind = match self.ch {
            '=' => return self.one_or_two(TokenKind::Assign, TokenKind::Eq),
            '!' => return self.one_or_two(TokenKind::Bang, TokenKind::NotEq),
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '<' => TokenKind::LAngle,
            '>' => TokenKind::RAngle,
            c if is_letter(c) => return self.identifier(),
            c if c.is_ascii_digit() => return self.integer(),
            _ => TokenKind::Illegal,
        };
        let token = Token::new(kind, self.ch.to_string(), self.location.clone());
        self.read_char();
        token
    }
    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }
    fn read_char(&mut self) {
        if self.read_position > self.input.len() {
            return;
        }
        if self.ch == '\n' {
            self.location.next_line();
        }
        self.location.next_char();
        self.ch = self.peek_char();
        self.position = self.read_position;
        self.read_position += 1;
    }
    fn peek_char(&self) -> char {
        self.input.get(self.read_position).copied().unwrap_or('\0')
    }
    fn skip_whitespace(&mut self) {
        while !self.at_end() && matches!(self.ch, ' ' | '\t' | '\r' | '\n') {
            self.read_char();
        }
    }
    // `=` and `!` are operators on their own, and the first half of `==` and `!=`.
    fn one_or_two(&mut self, single: TokenKind, double: TokenKind) -> Token {
        let location = self.location.clone();
        let first = self.ch;
        self.read_char();
        if self.ch == '=' {
            self.read_char();
            Token::new(double, format!("{}=", first), location)
        } else {
            Token::new(single, first.to_string(), location)
        }
    }
    fn identifier(&mut self) -> Token {
        let location = self.location.clone();
        let literal = self.read_while(is_letter);
        let kind = KEYWORDS
            .get(literal.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        Token::new(kind, literal, location)
    }
    fn integer(&mut self) -> Token {
        let location = self.location.clone();
        let literal = self.read_while(|c| c.is_ascii_digit());
        Token::new(TokenKind::Int, literal, location)
    }
    fn read_while(&mut self, accept: fn(char) -> bool) -> String {
        let start = self.position;
        while !self.at_end() && accept(self.ch) {
            self.read_char();
        }
        self.input[start..self.position].iter().collect()
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "fn" => TokenKind::Function,
    "let" => TokenKind::Let,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "return" => TokenKind::Return,
    "true" => TokenKind::True,
    "false" => TokenKind::False,
};
