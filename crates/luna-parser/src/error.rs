use std::fmt;

use luna_common::span::Span;

/// A syntax error with location information.
///
/// The message holds the Portuguese core text (`Esperado token …` /
/// `Token inesperado …`); the driver adds the `Erro de sintaxe:` prefix
/// and the line/column suffix when reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    /// Create a new syntax error.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
