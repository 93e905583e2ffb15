// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Conversion of literal tokens into typed constant values.
//!
//! The lexer only classifies; range checks and escapes are handled here.

use crate::error::{ParseError, ParseErrorKind};
use crate::metadata::PrimitiveType;
use crate::token::{keywords, Token, TokenKind};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use chrono::NaiveDateTime;
use data_encoding::HEXUPPER_PERMISSIVE;
use rust_decimal::Decimal;
use uuid::Uuid;

// Accepted `datetime'...'` layouts. `%.f` also matches an absent fraction.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    DateTime(NaiveDateTime),
    Guid(Uuid),
    Binary(Vec<u8>),
}

impl ConstantValue {
    /// The primitive type of the value; `None` for null.
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        Some(match self {
            ConstantValue::Null => return None,
            ConstantValue::Boolean(_) => PrimitiveType::Boolean,
            ConstantValue::Int32(_) => PrimitiveType::Int32,
            ConstantValue::Int64(_) => PrimitiveType::Int64,
            ConstantValue::Single(_) => PrimitiveType::Single,
            ConstantValue::Double(_) => PrimitiveType::Double,
            ConstantValue::Decimal(_) => PrimitiveType::Decimal,
            ConstantValue::String(_) => PrimitiveType::String,
            ConstantValue::DateTime(_) => PrimitiveType::DateTime,
            ConstantValue::Guid(_) => PrimitiveType::Guid,
            ConstantValue::Binary(_) => PrimitiveType::Binary,
        })
    }
}

// Writes a float so that it lexes back as a float of the same kind.
macro_rules! write_float {
    ($f:expr, $v:expr, $suffix:expr) => {{
        let v = $v;
        if v.is_nan() {
            write!($f, "{}{}", keywords::NAN, $suffix)
        } else if v.is_infinite() {
            let sign = if v < 0.0 { "-" } else { "" };
            write!($f, "{sign}{}{}", keywords::INFINITY, $suffix)
        } else {
            let digits = format!("{v}");
            let point = if digits.contains('.') { "" } else { ".0" };
            write!($f, "{digits}{point}{}", $suffix)
        }
    }};
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => f.write_str(keywords::NULL),
            ConstantValue::Boolean(v) => write!(f, "{v}"),
            ConstantValue::Int32(v) => write!(f, "{v}"),
            ConstantValue::Int64(v) => write!(f, "{v}L"),
            ConstantValue::Single(v) => write_float!(f, *v, "f"),
            ConstantValue::Double(v) => write_float!(f, *v, ""),
            ConstantValue::Decimal(v) => write!(f, "{v}M"),
            ConstantValue::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
            ConstantValue::DateTime(v) => {
                write!(f, "datetime'{}'", v.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
            ConstantValue::Guid(v) => write!(f, "guid'{}'", v.hyphenated()),
            ConstantValue::Binary(v) => write!(f, "X'{}'", HEXUPPER_PERMISSIVE.encode(v)),
        }
    }
}

/// Converts a literal token into its value.
///
/// Non-literal tokens and literal text outside the range of its kind fail with
/// [`ParseErrorKind::InvalidLiteral`] at the token's position.
pub fn parse_literal(token: &Token<'_>) -> Result<ConstantValue, ParseError> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidLiteral(token.kind), token.position);
    let text = token.text;

    let value = match token.kind {
        TokenKind::NullLiteral => ConstantValue::Null,
        TokenKind::BooleanLiteral => match text {
            keywords::TRUE => ConstantValue::Boolean(true),
            keywords::FALSE => ConstantValue::Boolean(false),
            _ => return Err(invalid()),
        },
        TokenKind::StringLiteral => {
            let inner = text
                .strip_prefix('\'')
                .and_then(|t| t.strip_suffix('\''))
                .ok_or_else(invalid)?;
            ConstantValue::String(inner.replace("''", "'"))
        }
        TokenKind::IntegerLiteral => {
            ConstantValue::Int32(number_text(text).parse().map_err(|_| invalid())?)
        }
        TokenKind::Int64Literal => {
            let digits = text.strip_suffix(['l', 'L']).ok_or_else(invalid)?;
            ConstantValue::Int64(number_text(digits).parse().map_err(|_| invalid())?)
        }
        TokenKind::DoubleLiteral => ConstantValue::Double(match text {
            keywords::INFINITY => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            keywords::NAN => f64::NAN,
            _ => {
                let digits = text.strip_suffix(['d', 'D']).unwrap_or(text);
                let v: f64 = number_text(digits).parse().map_err(|_| invalid())?;
                if !v.is_finite() {
                    return Err(invalid());
                }
                v
            }
        }),
        TokenKind::SingleLiteral => {
            let digits = text.strip_suffix(['f', 'F']).ok_or_else(invalid)?;
            ConstantValue::Single(match digits {
                keywords::INFINITY => f32::INFINITY,
                "-INF" => f32::NEG_INFINITY,
                keywords::NAN => f32::NAN,
                _ => {
                    let v: f32 = number_text(digits).parse().map_err(|_| invalid())?;
                    if !v.is_finite() {
                        return Err(invalid());
                    }
                    v
                }
            })
        }
        TokenKind::DecimalLiteral => {
            let digits = number_text(text.strip_suffix(['m', 'M']).ok_or_else(invalid)?);
            let value = if digits.contains(['e', 'E']) {
                Decimal::from_scientific(digits)
            } else {
                Decimal::from_str(digits)
            };
            ConstantValue::Decimal(value.map_err(|_| invalid())?)
        }
        TokenKind::DateTimeLiteral => {
            let payload = quoted_payload(text).ok_or_else(invalid)?;
            let value = DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(payload, format).ok())
                .ok_or_else(invalid)?;
            ConstantValue::DateTime(value)
        }
        TokenKind::GuidLiteral => {
            let payload = quoted_payload(text).ok_or_else(invalid)?;
            ConstantValue::Guid(Uuid::parse_str(payload).map_err(|_| invalid())?)
        }
        TokenKind::BinaryLiteral => {
            let payload = match text.get(..2) {
                Some("0x") | Some("0X") => &text[2..],
                _ => quoted_payload(text).ok_or_else(invalid)?,
            };
            let bytes = HEXUPPER_PERMISSIVE
                .decode(payload.as_bytes())
                .map_err(|_| invalid())?;
            ConstantValue::Binary(bytes)
        }
        _ => return Err(invalid()),
    };

    Ok(value)
}

// Lexer-shaped numbers only: Rust's float parser would also take `inf` or
// `+1`, which the grammar does not.
fn number_text(text: &str) -> &str {
    match text.strip_prefix('-').unwrap_or(text).chars().next() {
        Some(c) if c.is_ascii_digit() => text,
        _ => "",
    }
}

// `prefix'payload'` -> `payload`.
fn quoted_payload(text: &str) -> Option<&str> {
    let open = text.find('\'')?;
    text[open + 1..].strip_suffix('\'')
}
