use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Location, Token, TokenKind};
use std::collections::HashMap;
use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, trace};

/// A syntax problem, reported at the token that caused it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (at line {line}, col {column})", line = .location.line, column = .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: Location,
}

#[derive(Debug, Display, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x)
}

type PrefixFn = fn(&mut Parser) -> Option<Expression>;
type InfixFn = fn(&mut Parser, Expression) -> Option<Expression>;

struct InfixRule {
    handler: InfixFn,
    precedence: Precedence,
}

/// Pratt parser pulling tokens lazily from a `Lexer`.
///
/// Parsing never stops at the first problem: every error found is recorded
/// and the parser moves on, so `errors()` must be checked before the
/// returned `Program` is trusted. Statements that could not be parsed are
/// left out of the program.
pub struct Parser {
    lexer: Lexer,
    errors: Vec<ParseError>,
    current: Token,
    peek: Token,
    prefix_fns: HashMap<TokenKind, PrefixFn>,
    infix_fns: HashMap<TokenKind, InfixRule>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Parser {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        let mut parser = Parser {
            lexer,
            errors: Vec::new(),
            current,
            peek,
            prefix_fns: HashMap::new(),
            infix_fns: HashMap::new(),
        };

        parser.register_prefix(TokenKind::Identifier, Parser::parse_identifier);
        parser.register_prefix(TokenKind::Int, Parser::parse_integer_literal);
        parser.register_prefix(TokenKind::True, Parser::parse_boolean_literal);
        parser.register_prefix(TokenKind::False, Parser::parse_boolean_literal);
        parser.register_prefix(TokenKind::Bang, Parser::parse_prefix_expression);
        parser.register_prefix(TokenKind::Minus, Parser::parse_prefix_expression);
        parser.register_prefix(TokenKind::LParen, Parser::parse_grouped_expression);
        parser.register_prefix(TokenKind::If, Parser::parse_if_expression);
        parser.register_prefix(TokenKind::Function, Parser::parse_function_literal);

        #[rustfmt::skip]
        let infix: [(TokenKind, InfixFn, Precedence); 9] = [
            (TokenKind::Plus,     Parser::parse_infix_expression, Precedence::Sum),
            (TokenKind::Minus,    Parser::parse_infix_expression, Precedence::Sum),
            (TokenKind::Asterisk, Parser::parse_infix_expression, Precedence::Product),
            (TokenKind::Slash,    Parser::parse_infix_expression, Precedence::Product),
            (TokenKind::LAngle,   Parser::parse_infix_expression, Precedence::LessGreater),
            (TokenKind::RAngle,   Parser::parse_infix_expression, Precedence::LessGreater),
            (TokenKind::Eq,       Parser::parse_infix_expression, Precedence::Equals),
            (TokenKind::NotEq,    Parser::parse_infix_expression, Precedence::Equals),
            (TokenKind::LParen,   Parser::parse_call_expression,  Precedence::Call),
        ];
        for (kind, handler, precedence) in infix.iter() {
            parser.register_infix(*kind, *handler, *precedence);
        }

        parser
    }
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.current.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }
        program
    }
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
    fn register_prefix(&mut self, kind: TokenKind, handler: PrefixFn) {
        self.prefix_fns.insert(kind, handler);
    }
    fn register_infix(&mut self, kind: TokenKind, handler: InfixFn, precedence: Precedence) {
        self.infix_fns.insert(kind, InfixRule { handler, precedence });
    }
    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
        trace!(kind = %self.current.kind, literal = %self.current.literal, location = %self.current.location, "current token");
    }
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }
    /// Moves onto the peeked token if it has the expected kind, and records
    /// an error otherwise.
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.next_token();
            Some(())
        } else {
            let message = format!(
                "expected next token to be {}, got {} '{}' instead",
                kind, self.peek.kind, self.peek.literal
            );
            let location = self.peek.location.clone();
            self.error(message, location);
            None
        }
    }
    fn error(&mut self, message: String, location: Location) {
        debug!(%location, %message, "parse error");
        self.errors.push(ParseError { message, location });
    }
    fn peek_precedence(&self) -> Precedence {
        self.precedence_of(self.peek.kind)
    }
    fn current_precedence(&self) -> Precedence {
        self.precedence_of(self.current.kind)
    }
    fn precedence_of(&self, kind: TokenKind) -> Precedence {
        self.infix_fns
            .get(&kind)
            .map_or(Precedence::Lowest, |rule| rule.precedence)
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }
    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::Identifier)?;
        let name = Identifier {
            token: self.current.clone(),
            name: self.current.literal.clone(),
        };
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Let { token, name, value })
    }
    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let value = if self.peek_is(TokenKind::Semicolon)
            || self.peek_is(TokenKind::RBrace)
            || self.peek_is(TokenKind::Eof)
        {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };
        self.skip_semicolon();
        Some(Statement::Return { token, value })
    }
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Expression { token, value })
    }
    // Semicolons are accepted after any statement but never required.
    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.next_token();
        while !self.current.is(TokenKind::RBrace) && !self.current.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        BlockStatement { token, statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        trace!(%precedence, kind = %self.current.kind, "parse expression");
        let prefix = match self.prefix_fns.get(&self.current.kind) {
            Some(prefix) => *prefix,
            None => {
                let message = format!(
                    "no prefix parse function for {} '{}'",
                    self.current.kind, self.current.literal
                );
                let location = self.current.location.clone();
                self.error(message, location);
                return None;
            }
        };
        let mut left = prefix(self)?;
        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_fns.get(&self.peek.kind) {
                Some(rule) => rule.handler,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }
        Some(left)
    }
    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier {
            token: self.current.clone(),
            name: self.current.literal.clone(),
        }))
    }
    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral {
                token: self.current.clone(),
                value,
            }),
            Err(_) => {
                let message = format!(
                    "could not parse {} as integer literal",
                    self.current.literal
                );
                let location = self.current.location.clone();
                self.error(message, location);
                None
            }
        }
    }
    fn parse_boolean_literal(&mut self) -> Option<Expression> {
        Some(Expression::BooleanLiteral {
            token: self.current.clone(),
            value: self.current.is(TokenKind::True),
        })
    }
    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            operand: Box::new(operand),
        })
    }
    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        let precedence = self.current_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expression)
    }
    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement();
        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };
        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }
    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();
        Some(Expression::FunctionLiteral {
            token,
            parameters,
            body,
        })
    }
    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }
        loop {
            self.expect_peek(TokenKind::Identifier)?;
            parameters.push(Identifier {
                token: self.current.clone(),
                name: self.current.literal.clone(),
            });
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(parameters)
    }
    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_call_arguments()?;
        Some(Expression::Call {
            token,
            callee: Box::new(callee),
            arguments,
        })
    }
    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(arguments);
        }
        loop {
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(arguments)
    }
}
