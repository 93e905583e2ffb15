// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::source::Source;
use crate::token::TokenKind;

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use thiserror::Error;

/// What went wrong while scanning or converting an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `'` opened a string literal that never closes.
    #[error("unterminated string literal")]
    UnterminatedStringLiteral,
    /// A type-prefixed literal such as `guid'...'` never closes.
    #[error("unterminated literal")]
    UnterminatedLiteral,
    /// The character does not start any token.
    #[error("invalid character `{0}`")]
    InvalidCharacter(char),
    /// A decimal point or exponent marker is not followed by a digit.
    #[error("digit expected")]
    DigitExpected,
    /// An identifier was required.
    #[error("identifier expected")]
    ExpectedIdentifier,
    #[error("syntax error")]
    SyntaxError,
    /// Literal token text could not be converted to a value of its kind.
    #[error("invalid {0:?} text")]
    InvalidLiteral(TokenKind),
}

/// The single error type of the expression front end.
///
/// Carries the failure kind, the byte offset it refers to and, when known,
/// the whole expression so that [`fmt::Display`] can draw a caret under the
/// offending character.
#[derive(Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    position: usize,
    expr: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            expr: None,
        }
    }

    pub(crate) fn in_expression(kind: ParseErrorKind, position: usize, text: &str) -> Self {
        Self {
            kind,
            position,
            expr: Some(text.to_string()),
        }
    }

    /// Attaches the expression text the position refers to.
    pub fn with_expression(mut self, text: &str) -> Self {
        self.expr = Some(text.to_string());
        self
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expression(&self) -> Option<&str> {
        self.expr.as_deref()
    }

    /// Renders the caret diagnostic, or a one line message without source.
    pub fn message(&self) -> String {
        let msg = format!("{}", self.kind);
        match &self.expr {
            Some(text) => Source::expression(text).message_at(self.position, "error", &msg),
            None => format!("{msg} at position {}", self.position),
        }
    }
}

impl fmt::Debug for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseError")
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("expression", &self.expression())
            .finish()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl core::error::Error for ParseError {}
