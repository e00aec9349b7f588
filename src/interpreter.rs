use crate::ast::{BlockStatement, Expression, Program, Statement, Visitor};
use crate::token::{Location, TokenKind};
use crate::value::{Value, NULL};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("cannot evaluate {kind} yet (at line {line}, col {column})", line = .location.line, column = .location.column)]
    Unsupported {
        kind: &'static str,
        location: Location,
    },
    #[error("unsupported prefix operator '{operator}' (at line {line}, col {column})", line = .location.line, column = .location.column)]
    UnsupportedOperator {
        operator: String,
        location: Location,
    },
}

pub type EvalResult = Result<Value, EvalError>;

/// Evaluates a parsed node. Only check this after the parser reported no
/// errors; the tree is not meant to be evaluated otherwise.
pub fn evaluate<N>(node: &N) -> EvalResult
where
    Interpreter: Visitor<N, EvalResult>,
{
    Interpreter::new().visit(node)
}

/// Tree-walking evaluator over integers, booleans and null.
pub struct Interpreter {}

impl Visitor<Program, EvalResult> for Interpreter {
    fn visit(&mut self, program: &Program) -> EvalResult {
        self.evaluate_statements(&program.statements)
    }
}

impl Visitor<BlockStatement, EvalResult> for Interpreter {
    fn visit(&mut self, block: &BlockStatement) -> EvalResult {
        self.evaluate_statements(&block.statements)
    }
}

impl Visitor<Statement, EvalResult> for Interpreter {
    fn visit(&mut self, stmt: &Statement) -> EvalResult {
        match stmt {
            Statement::Expression { value, .. } => value.accept(self),
            Statement::Block(block) => self.visit(block),
            Statement::Let { token, .. } | Statement::Return { token, .. } => {
                unsupported(stmt.kind(), &token.location)
            }
        }
    }
}

impl Visitor<Expression, EvalResult> for Interpreter {
    fn visit(&mut self, expr: &Expression) -> EvalResult {
        match expr {
            Expression::IntegerLiteral { value, .. } => Ok(Value::Integer(*value)),
            Expression::BooleanLiteral { value, .. } => Ok(Value::from(*value)),
            Expression::Prefix {
                token, operand, ..
            } => {
                let operand = operand.accept(self)?;
                match token.kind {
                    TokenKind::Bang => Ok(Value::from(!operand.is_truthy())),
                    _ => {
                        debug!(operator = %token.literal, location = %token.location, "unsupported prefix operator");
                        Err(EvalError::UnsupportedOperator {
                            operator: token.literal.clone(),
                            location: token.location.clone(),
                        })
                    }
                }
            }
            _ => unsupported(expr.kind(), &expr.token().location),
        }
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter {}
    }
    // Every intermediate result is dropped; an empty sequence is null.
    fn evaluate_statements(&mut self, statements: &[Statement]) -> EvalResult {
        let mut result = NULL;
        for stmt in statements {
            result = stmt.accept(self)?;
            trace!(result = %result, "evaluated statement");
        }
        Ok(result)
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}

fn unsupported(kind: &'static str, location: &Location) -> EvalResult {
    debug!(kind, %location, "unsupported node");
    Err(EvalError::Unsupported {
        kind,
        location: location.clone(),
    })
}

#[cfg(test)]
mod interpreter_tests {
    use crate::ast::{BlockStatement, Program, Statement};
    use crate::interpreter::{evaluate, EvalError};
    use crate::token::{Location, Token, TokenKind};
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::value::{Value, FALSE, NULL, TRUE};

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        assert!(!parser.has_errors(), "{:?}", parser.errors());
        program
    }

    fn eval(source: &str) -> Result<Value, EvalError> {
        evaluate(&parse(source))
    }

    #[test]
    fn integer_literals() {
        assert_eq!(eval("5"), Ok(Value::Integer(5)));
        assert_eq!(eval("98"), Ok(Value::Integer(98)));
    }

    #[test]
    fn boolean_literals() {
        assert_eq!(eval("true"), Ok(TRUE));
        assert_eq!(eval("false"), Ok(FALSE));
    }

    #[test]
    fn bang_operator() {
        let tests = vec![
            ("!true", false),
            ("!false", true),
            ("!!true", true),
            ("!5", false),
            ("!!5", true),
            ("!!false", false),
        ];
        for (source, expected) in tests {
            assert_eq!(eval(source), Ok(Value::Boolean(expected)), "{}", source);
        }
    }

    #[test]
    fn last_statement_wins() {
        assert_eq!(eval("1; 2; !3"), Ok(FALSE));
        assert_eq!(eval(""), Ok(NULL));
    }

    #[test]
    fn statements_and_blocks() {
        let program = parse("7; 8");
        assert_eq!(evaluate(&program.statements[0]), Ok(Value::Integer(7)));
        match &program.statements[1] {
            Statement::Expression { value, .. } => {
                assert_eq!(evaluate(value), Ok(Value::Integer(8)))
            }
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    #[test]
    fn hand_built_block_statement_yields_its_last_value() {
        let program = parse("7; !8");
        let block = BlockStatement {
            token: Token::new(TokenKind::LBrace, "{", Location::new("<test>", 1, 1)),
            statements: program.statements,
        };
        let stmt = Statement::Block(block);
        assert_eq!(evaluate(&stmt), Ok(FALSE));
        assert_eq!(stmt.kind(), "Block");
        assert_eq!(stmt.token().kind, TokenKind::LBrace);

        let empty = Statement::Block(BlockStatement {
            token: Token::new(TokenKind::LBrace, "{", Location::new("<test>", 1, 1)),
            statements: vec![],
        });
        assert_eq!(evaluate(&empty), Ok(NULL));
    }

    #[test]
    fn unsupported_nodes() {
        let tests = vec![
            ("let x = 5;", "Let"),
            ("return 1", "Return"),
            ("x", "Identifier"),
            ("1 + 2", "Infix"),
            ("if (true) { 1 }", "If"),
            ("fn(x) { x }", "FunctionLiteral"),
        ];
        for (source, expected) in tests {
            match eval(source) {
                Err(EvalError::Unsupported { kind, .. }) => assert_eq!(kind, expected),
                other => panic!("expected {} to be unsupported, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn unsupported_operator() {
        match eval("-5") {
            Err(err @ EvalError::UnsupportedOperator { .. }) => {
                assert_eq!(err.to_string(), "unsupported prefix operator '-' (at line 1, col 1)")
            }
            other => panic!("expected an unsupported operator, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_location() {
        match eval("true;\n  f(1)") {
            Err(err) => assert_eq!(err.to_string(), "cannot evaluate Call yet (at line 2, col 4)"),
            other => panic!("expected an error, got {:?}", other),
        }
    }
}
