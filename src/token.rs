// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::{ParseError, ParseErrorKind};

use core::fmt;

/// Reserved spellings recognized by the lexer and by token predicates.
pub mod keywords {
    pub const TRUE: &str = "true";
    pub const FALSE: &str = "false";
    pub const NULL: &str = "null";

    pub const EQUAL: &str = "eq";
    pub const NOT_EQUAL: &str = "ne";
    pub const LESS_THAN: &str = "lt";
    pub const GREATER_THAN: &str = "gt";
    pub const LESS_THAN_OR_EQUAL: &str = "le";
    pub const GREATER_THAN_OR_EQUAL: &str = "ge";

    pub const AND: &str = "and";
    pub const OR: &str = "or";
    pub const ADD: &str = "add";
    pub const SUB: &str = "sub";
    pub const MUL: &str = "mul";
    pub const DIV: &str = "div";
    pub const MOD: &str = "mod";

    /// Double precision infinity. `INFf`/`INFF` are the single forms.
    pub const INFINITY: &str = "INF";
    /// Double precision not-a-number. `NaNf`/`NaNF` are the single forms.
    pub const NAN: &str = "NaN";

    // Type prefixes, compared case-insensitively.
    pub const PREFIX_DATETIME: &str = "datetime";
    pub const PREFIX_GUID: &str = "guid";
    pub const PREFIX_BINARY: &str = "binary";
    pub const PREFIX_SHORT_BINARY: &str = "X";

    pub const COMPARISON_OPERATORS: [&str; 6] = [
        EQUAL,
        NOT_EQUAL,
        LESS_THAN,
        GREATER_THAN,
        LESS_THAN_OR_EQUAL,
        GREATER_THAN_OR_EQUAL,
    ];
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum TokenKind {
    End,
    Identifier,
    StringLiteral,
    IntegerLiteral,
    Int64Literal,
    DecimalLiteral,
    DoubleLiteral,
    SingleLiteral,
    BooleanLiteral,
    NullLiteral,
    DateTimeLiteral,
    GuidLiteral,
    BinaryLiteral,
    OpenParen,
    CloseParen,
    Comma,
    Minus,
    Equal,
    Slash,
    Question,
    Dot,
    Star,
}

impl TokenKind {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::DecimalLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::Int64Literal
                | TokenKind::SingleLiteral
        )
    }

    /// Whether tokens of this kind denote a constant value, `null` included.
    pub fn is_literal(self) -> bool {
        self.is_numeric()
            || matches!(
                self,
                TokenKind::StringLiteral
                    | TokenKind::BooleanLiteral
                    | TokenKind::NullLiteral
                    | TokenKind::DateTimeLiteral
                    | TokenKind::GuidLiteral
                    | TokenKind::BinaryLiteral
            )
    }
}

/// One lexical unit of an expression.
///
/// `text` is always the exact slice of the input the token spans, so a
/// string literal keeps its quotes and a type-prefixed literal keeps its
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: usize,
}

impl Token<'static> {
    /// `gt` keyword operator, for parsers that synthesize comparisons.
    pub const GREATER_THAN: Token<'static> = Token::identifier(keywords::GREATER_THAN);

    /// `eq` keyword operator.
    pub const EQUALS_TO: Token<'static> = Token::identifier(keywords::EQUAL);

    /// `lt` keyword operator.
    pub const LESS_THAN: Token<'static> = Token::identifier(keywords::LESS_THAN);

    const fn identifier(text: &'static str) -> Token<'static> {
        Token {
            kind: TokenKind::Identifier,
            text,
            position: 0,
        }
    }
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, position: usize) -> Self {
        Self {
            kind,
            text,
            position,
        }
    }

    pub fn is_comparison_operator(&self) -> bool {
        self.kind == TokenKind::Identifier
            && keywords::COMPARISON_OPERATORS
                .iter()
                .any(|keyword| *keyword == self.text)
    }

    pub fn is_equality_operator(&self) -> bool {
        self.kind == TokenKind::Identifier
            && (self.text == keywords::EQUAL || self.text == keywords::NOT_EQUAL)
    }

    /// Whether the token can appear as a value inside an entity key predicate.
    pub fn is_key_value_token(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::BinaryLiteral
                | TokenKind::BooleanLiteral
                | TokenKind::DateTimeLiteral
                | TokenKind::GuidLiteral
                | TokenKind::StringLiteral
        ) || self.kind.is_numeric()
    }

    pub fn get_identifier(&self) -> Result<&'a str, ParseError> {
        if self.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                self.position,
            ));
        }
        Ok(self.text)
    }

    pub fn identifier_is(&self, id: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == id
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}: [{}]", self.kind, self.position, self.text)
    }
}
