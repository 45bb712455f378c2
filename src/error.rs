use std::fmt::{self, Display};

use crate::object::Object;
use crate::token::{Token, Type};

/// Represents an error that occurs during scanning.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

/// Represents an error that occurs during parsing.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_at_token(f, &self.token, &self.message)
    }
}

/// Represents an error that occurs during resolution.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_at_token(f, &self.token, &self.message)
    }
}

/// Represents an error that occurs during runtime.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}

/// Compile-time errors point at the offending token, or at the end of
/// the file when the parser ran out of tokens.
fn write_at_token(f: &mut fmt::Formatter<'_>, token: &Token, message: &str) -> fmt::Result {
    if token.r#type == Type::EOF {
        write!(f, "[line {}] Error at end: {}", token.line, message)
    } else {
        write!(f, "[line {}] Error at '{}': {}", token.line, token.lexeme, message)
    }
}

/// The evaluator's unwind channel. A `return` statement is not an error:
/// it unwinds through any depth of block execution until the enclosing
/// function call catches it. Runtime faults travel the same `Result`
/// rail but stay a distinct variant so the two can never be confused.
#[derive(Debug)]
pub enum Interrupt {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scan_error_format() {
        let error = ScanError { line: 3, message: "Unexpected character: @".to_string() };
        assert_eq!(error.to_string(), "[line 3] Error: Unexpected character: @");
    }

    #[test]
    fn parse_error_format() {
        let error = ParseError {
            token: Token::new(Type::Semicolon, ";".to_string(), None, 2),
            message: "Expect expression.".to_string(),
        };
        assert_eq!(error.to_string(), "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn parse_error_format_at_end() {
        let error = ParseError {
            token: Token::new(Type::EOF, String::new(), None, 7),
            message: "Expect ';' after value.".to_string(),
        };
        assert_eq!(error.to_string(), "[line 7] Error at end: Expect ';' after value.");
    }

    #[test]
    fn runtime_error_format() {
        let error = RuntimeError {
            token: Token::new(Type::Minus, "-".to_string(), None, 1),
            message: "Operands must be numbers.".to_string(),
        };
        assert_eq!(error.to_string(), "Operands must be numbers.\n[line 1]");
    }
}
