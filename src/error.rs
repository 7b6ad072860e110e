use thiserror::Error;

/// Failure produced while parsing or evaluating an expression.
///
/// The `Display` text of each variant is stable: [`locate_failure`](crate::locate_failure)
/// keys on it, and callers may surface it verbatim.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(InvalidCause),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,
}

/// Why an expression was rejected as invalid.
///
/// Lets a caller pick a repair strategy without parsing the message.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidCause {
    #[error("nothing to evaluate")]
    Empty,
    #[error("empty parentheses")]
    EmptyGroup,
    #[error("expression ends with an operator")]
    TrailingOperator,
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("syntax error at position {position}")]
    Syntax { position: usize },
    #[error("parentheses nested deeper than {limit} levels")]
    TooDeeplyNested { limit: usize },
    #[error("result is not mathematically valid")]
    NotFinite,
}

impl CalcError {
    pub fn is_invalid_expression(&self) -> bool {
        matches!(self, Self::InvalidExpression(_))
    }

    pub fn cause(&self) -> Option<&InvalidCause> {
        match self {
            Self::InvalidExpression(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<InvalidCause> for CalcError {
    fn from(cause: InvalidCause) -> Self {
        Self::InvalidExpression(cause)
    }
}
