use crate::token::Token;
use strum_macros::IntoStaticStr;

pub trait Visitor<T, Output> {
    fn visit(&mut self, n: &T) -> Output;
}

/// Anything the parser produces can be rendered back to source.
pub trait Node {
    /// Canonical form with every unary and binary operation parenthesized,
    /// so that two different trees never render the same.
    fn render(&self) -> String;
}

macro_rules! render_with_printer {
    ($($node:ty),+) => {
        $(
            impl Node for $node {
                fn render(&self) -> String {
                    AstPrinter {}.visit(self)
                }
            }
        )+
    };
}

render_with_printer!(Program, Statement, Expression, BlockStatement, Identifier);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token(&self) -> Option<&Token> {
        self.statements.first().map(Statement::token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// The opening brace.
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Option<Expression>,
    },
    Expression {
        /// First token of the expression.
        token: Token,
        value: Expression,
    },
    Block(BlockStatement),
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. } => token,
            Statement::Block(block) => &block.token,
        }
    }
    pub fn kind(&self) -> &'static str {
        self.into()
    }
    pub fn accept<V: Visitor<Statement, T>, T>(&self, v: &mut V) -> T {
        v.visit(self)
    }
}

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    Prefix {
        token: Token,
        operator: String,
        operand: Box<Expression>,
    },
    Infix {
        /// The operator.
        token: Token,
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        /// The opening parenthesis of the argument list.
        token: Token,
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Identifier(identifier) => &identifier.token,
            Expression::IntegerLiteral { token, .. }
            | Expression::BooleanLiteral { token, .. }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::If { token, .. }
            | Expression::FunctionLiteral { token, .. }
            | Expression::Call { token, .. } => token,
        }
    }
    pub fn kind(&self) -> &'static str {
        self.into()
    }
    pub fn accept<V: Visitor<Expression, T>, T>(&self, v: &mut V) -> T {
        v.visit(self)
    }
}

pub struct AstPrinter {}

impl AstPrinter {
    fn parenthesize(&mut self, parts: Vec<&str>) -> String {
        let mut x = String::from("(");
        for part in parts {
            x.push_str(part);
        }
        x.push(')');
        x
    }
    fn join(&mut self, expressions: &[Expression]) -> String {
        expressions
            .iter()
            .map(|e| e.accept(self))
            .collect::<Vec<String>>()
            .join(", ")
    }
    // An expression statement followed by another statement keeps its
    // semicolon, otherwise `a; -b` would read back as the call `a(-b)`.
    fn concat(&mut self, statements: &[Statement]) -> String {
        let mut x = String::new();
        for (i, stmt) in statements.iter().enumerate() {
            x.push_str(&stmt.accept(self));
            if let Statement::Expression { .. } = stmt {
                if i + 1 < statements.len() {
                    x.push(';');
                }
            }
        }
        x
    }
}

impl Visitor<Program, String> for AstPrinter {
    fn visit(&mut self, n: &Program) -> String {
        self.concat(&n.statements)
    }
}

impl Visitor<BlockStatement, String> for AstPrinter {
    fn visit(&mut self, n: &BlockStatement) -> String {
        format!("{{{}}}", self.concat(&n.statements))
    }
}

impl Visitor<Identifier, String> for AstPrinter {
    fn visit(&mut self, n: &Identifier) -> String {
        n.name.clone()
    }
}

impl Visitor<Statement, String> for AstPrinter {
    fn visit(&mut self, n: &Statement) -> String {
        match n {
            Statement::Let { name, value, .. } => {
                format!("let {} = {};", name.name, value.accept(self))
            }
            Statement::Return { value: None, .. } => String::from("return;"),
            Statement::Return {
                value: Some(value), ..
            } => format!("return {};", value.accept(self)),
            Statement::Expression { value, .. } => value.accept(self),
            Statement::Block(block) => self.visit(block),
        }
    }
}

impl Visitor<Expression, String> for AstPrinter {
    fn visit(&mut self, n: &Expression) -> String {
        match n {
            Expression::Identifier(identifier) => identifier.name.clone(),
            Expression::IntegerLiteral { value, .. } => value.to_string(),
            Expression::BooleanLiteral { value, .. } => value.to_string(),
            Expression::Prefix {
                operator, operand, ..
            } => {
                let operand = operand.accept(self);
                self.parenthesize(vec![operator.as_str(), operand.as_str()])
            }
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => {
                let left = left.accept(self);
                let right = right.accept(self);
                self.parenthesize(vec![left.as_str(), " ", operator.as_str(), " ", right.as_str()])
            }
            // The condition is wrapped again because `if` requires literal parentheses.
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = condition.accept(self);
                let consequence = self.visit(consequence);
                let mut x = format!("if ({}) {}", condition, consequence);
                if let Some(alternative) = alternative {
                    x.push_str(" else ");
                    x.push_str(&self.visit(alternative));
                }
                x
            }
            Expression::FunctionLiteral {
                parameters, body, ..
            } => {
                let parameters: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
                let body = self.visit(body);
                format!("fn({}) {}", parameters.join(", "), body)
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                let callee = callee.accept(self);
                format!("{}({})", callee, self.join(arguments))
            }
        }
    }
}
