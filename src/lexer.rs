// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::{ParseError, ParseErrorKind};
use crate::source::Source;
use crate::token::{keywords, Token, TokenKind};

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::{self, Debug, Formatter};
use core::iter::FusedIterator;

use log::trace;

// Suffixes of single precision literals, `INFf` and `NaNF` included.
const SINGLE_SUFFIX_LOWER: char = 'f';
const SINGLE_SUFFIX_UPPER: char = 'F';

/// Scanner position and lookahead, restored when a tentative scan is abandoned.
#[derive(Clone, Copy)]
struct Snapshot {
    pos: usize,
    ch: char,
}

/// Single pass scanner over one expression.
///
/// Literal grammar, for reference:
///
/// ```text
/// Null        null
/// Boolean     true | false
/// Int32       digit+
/// Int64       digit+ (L|l)
/// Decimal     digit+ ['.' digit+] (M|m)
/// Single      digit+ ['.' digit+] [(e|E) [+|-] digit+] (f|F) | INFf | NaNf
/// Double      digit+ ['.' digit+] [(e|E) [+|-] digit+] [d|D] | INF | NaN
/// String      "'" (char | "''")* "'"
/// DateTime    datetime "'" yyyy-mm-ddThh:mm[:ss[.fffffff]] "'"
/// Binary      (binary|X) "'" hexdigit* "'" | 0x hexdigit*
/// Guid        guid "'" dddddddd-dddd-dddd-dddd-dddddddddddd "'"
/// ```
///
/// The lexer always holds a current token; [`Lexer::new`] scans the first one.
#[derive(Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    len: usize,
    pos: usize,
    ch: char,
    token: Token<'a>,
}

impl Debug for Lexer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_fmt(format_args!(
            "Lexer ({:?} @ {} [{}])",
            self.text, self.pos, self.token
        ))
    }
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Self {
            text,
            len: text.len(),
            pos: 0,
            ch: '\0',
            token: Token::new(TokenKind::End, "", 0),
        };
        lexer.set_position(0);
        lexer.next_token()?;
        Ok(lexer)
    }

    /// Iterates over every token of `text`, `End` included.
    pub fn tokens(text: &'a str) -> Tokens<'a> {
        Tokens {
            text,
            lexer: None,
            done: false,
        }
    }

    pub fn current_token(&self) -> Token<'a> {
        self.token
    }

    pub fn set_current_token(&mut self, token: Token<'a>) {
        self.token = token;
    }

    pub fn expression_text(&self) -> &'a str {
        self.text
    }

    /// Position of the current token.
    pub fn position(&self) -> usize {
        self.token.position
    }

    pub fn source(&self) -> Source {
        Source::expression(self.text)
    }

    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        while self.ch.is_whitespace() {
            self.advance();
        }

        let start = self.pos;
        let kind = match self.ch {
            _ if self.at_end() => TokenKind::End,
            '(' => self.single(TokenKind::OpenParen),
            ')' => self.single(TokenKind::CloseParen),
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Equal),
            '/' => self.single(TokenKind::Slash),
            '?' => self.single(TokenKind::Question),
            '.' => self.single(TokenKind::Dot),
            '*' => self.single(TokenKind::Star),
            '-' => self.scan_minus(start)?,
            '\'' => self.scan_string(start)?,
            ch if ch.is_alphabetic() || ch == '_' => {
                self.scan_identifier();
                TokenKind::Identifier
            }
            ch if ch.is_ascii_digit() => self.scan_from_digit()?,
            ch => return Err(self.error(ParseErrorKind::InvalidCharacter(ch), start)),
        };

        let mut token = Token::new(kind, &self.text[start..self.pos], start);
        self.scan_type_prefixed_literal(&mut token)?;
        if token.kind == TokenKind::Identifier {
            token.kind = keyword_kind(token.text);
        }

        self.token = token;
        Ok(token)
    }

    /// Returns the token after the current one without consuming it.
    pub fn peek_token(&mut self) -> Result<Token<'a>, ParseError> {
        let snapshot = self.snapshot();
        let token = self.token;

        let result = self.next_token();

        self.restore(snapshot);
        self.token = token;
        result
    }

    /// Reads `ident(.ident)*` starting at the current identifier and leaves
    /// the lexer on the first token after it.
    pub fn read_dotted_identifier(&mut self) -> Result<Cow<'a, str>, ParseError> {
        self.validate_token(TokenKind::Identifier)?;
        let first = self.token.text;
        self.next_token()?;

        let mut dotted: Option<String> = None;
        while self.token.kind == TokenKind::Dot {
            self.next_token()?;
            self.validate_token(TokenKind::Identifier)?;
            let name = dotted.get_or_insert_with(|| String::from(first));
            name.push('.');
            name.push_str(self.token.text);
            self.next_token()?;
        }

        Ok(match dotted {
            Some(name) => Cow::Owned(name),
            None => Cow::Borrowed(first),
        })
    }

    pub fn validate_token(&self, kind: TokenKind) -> Result<(), ParseError> {
        if self.token.kind != kind {
            return Err(self.error(ParseErrorKind::SyntaxError, self.pos));
        }
        Ok(())
    }

    fn error(&self, kind: ParseErrorKind, pos: usize) -> ParseError {
        ParseError::in_expression(kind, pos, self.text)
    }

    fn at_end(&self) -> bool {
        self.pos == self.len
    }

    fn char_at(&self, pos: usize) -> char {
        self.text[pos..].chars().next().unwrap_or('\0')
    }

    fn next_char(&self) -> char {
        if self.at_end() {
            '\0'
        } else {
            self.char_at(self.pos + self.ch.len_utf8())
        }
    }

    fn advance(&mut self) {
        if self.pos < self.len {
            self.pos += self.ch.len_utf8();
        }
        self.ch = self.char_at(self.pos);
    }

    fn set_position(&mut self, pos: usize) {
        self.pos = pos;
        self.ch = self.char_at(pos);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            ch: self.ch,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.pos;
        self.ch = snapshot.ch;
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    // `-` starts a negative number or `-INF`/`-INFf` only when the tentative
    // scan says so. Otherwise the scan is rewound and `-` stands alone.
    fn scan_minus(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let next = self.next_char();
        if next.is_ascii_digit() {
            let snapshot = self.snapshot();
            self.advance();
            let kind = self.scan_from_digit()?;
            if kind.is_numeric() {
                return Ok(kind);
            }

            trace!("rewinding `-` at {start}: {kind:?} is not numeric");
            self.restore(snapshot);
        } else if keywords::INFINITY.starts_with(next) {
            let snapshot = self.snapshot();
            self.advance();
            self.scan_identifier();
            let ident = &self.text[start + 1..self.pos];
            if ident == keywords::INFINITY {
                return Ok(TokenKind::DoubleLiteral);
            }
            if is_single_form(ident, keywords::INFINITY) {
                return Ok(TokenKind::SingleLiteral);
            }

            trace!("rewinding `-` at {start}: `{ident}` is not an infinity literal");
            self.restore(snapshot);
        }

        self.advance();
        Ok(TokenKind::Minus)
    }

    fn scan_string(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let quote = self.ch;
        loop {
            self.advance();
            while !self.at_end() && self.ch != quote {
                self.advance();
            }

            if self.at_end() {
                return Err(self.error(ParseErrorKind::UnterminatedStringLiteral, start));
            }

            // A quote right after the closing quote is an escaped quote.
            self.advance();
            if self.ch != quote {
                break;
            }
        }
        Ok(TokenKind::StringLiteral)
    }

    fn scan_identifier(&mut self) {
        loop {
            self.advance();
            if !(self.ch.is_alphanumeric() || self.ch == '_') {
                break;
            }
        }
    }

    fn scan_digits(&mut self) {
        while self.ch.is_ascii_digit() {
            self.advance();
        }
    }

    fn expect_digit(&self) -> Result<(), ParseError> {
        if !self.ch.is_ascii_digit() {
            return Err(self.error(ParseErrorKind::DigitExpected, self.pos));
        }
        Ok(())
    }

    fn scan_from_digit(&mut self) -> Result<TokenKind, ParseError> {
        let first = self.ch;
        self.advance();

        if first == '0' && matches!(self.ch, 'x' | 'X') {
            loop {
                self.advance();
                if !self.ch.is_ascii_hexdigit() {
                    break;
                }
            }
            return Ok(TokenKind::BinaryLiteral);
        }

        let mut kind = TokenKind::IntegerLiteral;
        self.scan_digits();

        if self.ch == '.' {
            kind = TokenKind::DoubleLiteral;
            self.advance();
            self.expect_digit()?;
            self.scan_digits();
        }

        if matches!(self.ch, 'e' | 'E') {
            kind = TokenKind::DoubleLiteral;
            self.advance();
            if matches!(self.ch, '+' | '-') {
                self.advance();
            }
            self.expect_digit()?;
            self.scan_digits();
        }

        let suffixed = match self.ch {
            'M' | 'm' => Some(TokenKind::DecimalLiteral),
            'D' | 'd' => Some(TokenKind::DoubleLiteral),
            'L' | 'l' => Some(TokenKind::Int64Literal),
            SINGLE_SUFFIX_LOWER | SINGLE_SUFFIX_UPPER => Some(TokenKind::SingleLiteral),
            _ => None,
        };
        if let Some(suffixed) = suffixed {
            self.advance();
            kind = suffixed;
        }

        Ok(kind)
    }

    // `datetime'...'`, `guid'...'`, `binary'...'` and `X'...'` are scanned as
    // an identifier first and extended here up to the closing quote.
    fn scan_type_prefixed_literal(&mut self, token: &mut Token<'a>) -> Result<(), ParseError> {
        if token.kind != TokenKind::Identifier || self.ch != '\'' {
            return Ok(());
        }

        let kind = match token.text {
            t if t.eq_ignore_ascii_case(keywords::PREFIX_DATETIME) => TokenKind::DateTimeLiteral,
            t if t.eq_ignore_ascii_case(keywords::PREFIX_GUID) => TokenKind::GuidLiteral,
            t if t.eq_ignore_ascii_case(keywords::PREFIX_BINARY)
                || t.eq_ignore_ascii_case(keywords::PREFIX_SHORT_BINARY) =>
            {
                TokenKind::BinaryLiteral
            }
            _ => return Ok(()),
        };

        loop {
            self.advance();
            if self.at_end() || self.ch == '\'' {
                break;
            }
        }

        if self.at_end() {
            return Err(self.error(ParseErrorKind::UnterminatedLiteral, token.position));
        }

        self.advance();
        token.kind = kind;
        token.text = &self.text[token.position..self.pos];
        Ok(())
    }
}

fn is_single_form(text: &str, double_form: &str) -> bool {
    text.len() == double_form.len() + 1
        && text.starts_with(double_form)
        && text.ends_with([SINGLE_SUFFIX_LOWER, SINGLE_SUFFIX_UPPER])
}

fn keyword_kind(text: &str) -> TokenKind {
    match text.len() {
        3 if text == keywords::INFINITY || text == keywords::NAN => TokenKind::DoubleLiteral,
        4 if is_single_form(text, keywords::INFINITY) || is_single_form(text, keywords::NAN) => {
            TokenKind::SingleLiteral
        }
        _ if text == keywords::TRUE || text == keywords::FALSE => TokenKind::BooleanLiteral,
        _ if text == keywords::NULL => TokenKind::NullLiteral,
        _ => TokenKind::Identifier,
    }
}

/// Iterator returned by [`Lexer::tokens`].
///
/// Yields `End` as its last item, or stops right after the first error.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    lexer: Option<Lexer<'a>>,
    done: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = match &mut self.lexer {
            Some(lexer) => lexer.next_token(),
            None => Lexer::new(self.text).map(|lexer| {
                let token = lexer.current_token();
                self.lexer = Some(lexer);
                token
            }),
        };

        self.done = !matches!(&result, Ok(token) if token.kind != TokenKind::End);
        Some(result)
    }
}

impl FusedIterator for Tokens<'_> {}
