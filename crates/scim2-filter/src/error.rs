use thiserror::Error;

/// Error produced while tokenizing or parsing a filter expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unexpected end of filter")]
    UnexpectedEnd,

    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unknown attribute operator '{0}'")]
    UnknownOperator(String),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("expected ')' to close group")]
    UnbalancedParen,

    #[error("trailing input after filter: '{0}'")]
    TrailingInput(String),
}
