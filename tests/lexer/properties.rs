// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use odata_query::*;

const IDENTIFIERS: &[&str] = &[
    "a",
    "Name",
    "_private",
    "Order_Details",
    "x1",
    "Ünïcödé",
    "eqx",
    "trueish",
    "nullable",
    "INFINITY",
    "NaNa",
];

const SAMPLE_TOKENS: &[&str] = &[
    "Name",
    "42",
    "42L",
    "4.2",
    "4.2e1",
    "4.2M",
    "4.2f",
    "0x1A",
    "-5",
    "-INF",
    "'a''b'",
    "guid'00000000-0000-0000-0000-000000000000'",
    "datetime'2024-02-29T12:30'",
    "X'0F'",
    "true",
    "null",
    "(",
    "/",
    "*",
];

fn single_token(expr: &str) -> Result<Token<'_>> {
    let mut lexer = Lexer::new(expr)?;
    let token = lexer.current_token();
    assert_eq!(lexer.next_token()?.kind, TokenKind::End, "{expr}");
    Ok(token)
}

fn kinds(expr: &str) -> Result<Vec<(TokenKind, &str)>> {
    Lexer::tokens(expr)
        .map(|t| t.map(|t| (t.kind, t.text)).map_err(Into::into))
        .collect()
}

#[test]
fn identifiers_round_trip() -> Result<()> {
    for id in IDENTIFIERS {
        let token = single_token(id)?;
        assert_eq!(token.kind, TokenKind::Identifier, "{id}");
        assert_eq!(token.text, *id);
        assert_eq!(token.position, 0);
        assert_eq!(token.get_identifier()?, *id);
    }
    Ok(())
}

#[test]
fn peek_is_idempotent() -> Result<()> {
    let expr = "Price add -5 gt 4.2M and Name eq 'a''b'";
    let mut lexer = Lexer::new(expr)?;
    loop {
        let current = lexer.current_token();
        let peeked = lexer.peek_token()?;
        for _ in 0..3 {
            assert_eq!(lexer.peek_token()?, peeked);
            assert_eq!(lexer.current_token(), current);
        }

        let next = lexer.next_token()?;
        assert_eq!(next, peeked);
        if next.kind == TokenKind::End {
            break;
        }
    }
    Ok(())
}

#[test]
fn pairs_keep_text_and_offset() -> Result<()> {
    for first in SAMPLE_TOKENS {
        for second in SAMPLE_TOKENS {
            let expr = format!("{first} {second}");
            let mut lexer = Lexer::new(&expr)?;
            let a = lexer.current_token();
            let b = lexer.next_token()?;

            assert_eq!(a.text, *first, "{expr}");
            assert_eq!(a.position, 0, "{expr}");
            assert_eq!(b.text, *second, "{expr}");
            assert_eq!(b.position, first.len() + 1, "{expr}");
            assert_eq!(lexer.next_token()?.kind, TokenKind::End, "{expr}");
        }
    }
    Ok(())
}

#[test]
fn numeric_classification() -> Result<()> {
    let table = [
        ("42", TokenKind::IntegerLiteral),
        ("42L", TokenKind::Int64Literal),
        ("42l", TokenKind::Int64Literal),
        ("4.2", TokenKind::DoubleLiteral),
        ("4.2e1", TokenKind::DoubleLiteral),
        ("4E-1", TokenKind::DoubleLiteral),
        ("4.2d", TokenKind::DoubleLiteral),
        ("4.2M", TokenKind::DecimalLiteral),
        ("42m", TokenKind::DecimalLiteral),
        ("4.2f", TokenKind::SingleLiteral),
        ("4e+2F", TokenKind::SingleLiteral),
        ("0x1A", TokenKind::BinaryLiteral),
        ("0X", TokenKind::BinaryLiteral),
        ("INF", TokenKind::DoubleLiteral),
        ("NaN", TokenKind::DoubleLiteral),
        ("INFf", TokenKind::SingleLiteral),
        ("NaNF", TokenKind::SingleLiteral),
    ];

    for (expr, kind) in table {
        let token = single_token(expr)?;
        assert_eq!(token.kind, kind, "{expr}");
        assert_eq!(token.text, expr);
    }
    Ok(())
}

#[test]
fn negative_numbers() -> Result<()> {
    assert_eq!(
        kinds("-5")?,
        [(TokenKind::IntegerLiteral, "-5"), (TokenKind::End, "")]
    );
    assert_eq!(
        kinds("- 5")?,
        [
            (TokenKind::Minus, "-"),
            (TokenKind::IntegerLiteral, "5"),
            (TokenKind::End, "")
        ]
    );
    assert_eq!(
        kinds("-INF")?,
        [(TokenKind::DoubleLiteral, "-INF"), (TokenKind::End, "")]
    );
    assert_eq!(
        kinds("-INFf")?,
        [(TokenKind::SingleLiteral, "-INFf"), (TokenKind::End, "")]
    );
    assert_eq!(
        kinds("-x")?,
        [
            (TokenKind::Minus, "-"),
            (TokenKind::Identifier, "x"),
            (TokenKind::End, "")
        ]
    );
    assert_eq!(
        kinds("-4.5e-3M")?,
        [(TokenKind::DecimalLiteral, "-4.5e-3M"), (TokenKind::End, "")]
    );
    Ok(())
}

#[test]
fn type_prefixed_literals() -> Result<()> {
    let guid = "guid'00000000-0000-0000-0000-000000000000'";
    let token = single_token(guid)?;
    assert_eq!(token.kind, TokenKind::GuidLiteral);
    assert_eq!(token.text, guid);

    for (expr, kind) in [
        ("GUID'x'", TokenKind::GuidLiteral),
        ("DateTime'2024-01-01T00:00'", TokenKind::DateTimeLiteral),
        ("binary'0A0B'", TokenKind::BinaryLiteral),
        ("x'0A'", TokenKind::BinaryLiteral),
    ] {
        let token = single_token(expr)?;
        assert_eq!(token.kind, kind, "{expr}");
        assert_eq!(token.text, expr);
    }

    // Without a quote right after it, a prefix is an ordinary identifier.
    assert_eq!(
        kinds("guid 'x'")?,
        [
            (TokenKind::Identifier, "guid"),
            (TokenKind::StringLiteral, "'x'"),
            (TokenKind::End, "")
        ]
    );
    Ok(())
}

#[test]
fn escaped_quotes() -> Result<()> {
    let token = single_token("'a''b'")?;
    assert_eq!(token.kind, TokenKind::StringLiteral);
    assert_eq!(token.text, "'a''b'");

    let token = single_token("''''")?;
    assert_eq!(token.text, "''''");

    for expr in ["'a", "'a''", "'"] {
        let err = Lexer::new(expr).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnterminatedStringLiteral, "{expr}");
        assert_eq!(err.position(), 0);
    }
    Ok(())
}

#[test]
fn keywords() -> Result<()> {
    assert_eq!(single_token("true")?.kind, TokenKind::BooleanLiteral);
    assert_eq!(single_token("false")?.kind, TokenKind::BooleanLiteral);
    assert_eq!(single_token("null")?.kind, TokenKind::NullLiteral);

    // Keywords are case-sensitive.
    assert_eq!(single_token("True")?.kind, TokenKind::Identifier);
    assert_eq!(single_token("NULL")?.kind, TokenKind::Identifier);
    assert_eq!(single_token("inf")?.kind, TokenKind::Identifier);

    let eq = single_token("eq")?;
    assert_eq!(eq.kind, TokenKind::Identifier);
    assert!(eq.is_comparison_operator());
    assert!(eq.is_equality_operator());

    let ne = single_token("ne")?;
    assert!(ne.is_comparison_operator());
    assert!(ne.is_equality_operator());

    for op in ["lt", "gt", "le", "ge"] {
        let token = single_token(op)?;
        assert!(token.is_comparison_operator(), "{op}");
        assert!(!token.is_equality_operator(), "{op}");
    }

    for op in ["and", "Eq", "'eq'"] {
        let token = single_token(op)?;
        assert!(!token.is_comparison_operator(), "{op}");
        assert!(!token.is_equality_operator(), "{op}");
    }
    Ok(())
}

#[test]
fn predefined_operator_tokens() {
    assert!(Token::GREATER_THAN.identifier_is("gt"));
    assert!(Token::EQUALS_TO.is_equality_operator());
    assert!(Token::LESS_THAN.is_comparison_operator());
    assert_eq!(
        BinaryOperatorKind::from_token(&Token::LESS_THAN),
        Some(BinaryOperatorKind::LessThan)
    );
}
