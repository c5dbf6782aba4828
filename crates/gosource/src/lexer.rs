//! Tokenizer for Go source text.
//!
//! Only the token classes needed to find comment groups and top-level
//! declarations are distinguished. Everything else collapses into
//! [`TokenKind::Literal`] or [`TokenKind::Punct`].

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while},
    character::complete::{anychar, char, multispace1, one_of, satisfy},
    combinator::{cut, recognize},
    multi::many0_count,
    sequence::{pair, preceded},
};
use nom_locate::LocatedSpan;

use crate::error::{LiteralKind, ParseError};

pub(crate) type Span<'a> = LocatedSpan<&'a str>;

type SpanResult<'a, O> = IResult<Span<'a>, O>;

/// The class of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// A `//` comment including the prefix, excluding the line ending.
    LineComment(&'a str),

    /// A `/* */` comment including both delimiters.
    BlockComment(&'a str),

    /// An identifier or keyword.
    Ident(&'a str),

    /// One of `{`, `(` or `[`.
    Open(char),

    /// One of `}`, `)` or `]`.
    Close(char),

    /// A string, rune or number literal.
    Literal,

    /// Any other single character.
    Punct(char),
}

/// A lexed token with its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,

    /// Line the token starts on (1-based).
    pub line: u32,

    /// Line the token ends on. Differs from `line` for block comments and
    /// raw strings spanning several lines.
    pub end_line: u32,

    /// Column the token starts at (1-based, in characters).
    pub column: usize,
}

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Iterator over the tokens of a Go source file.
///
/// Yields a single error and then stops if the input cannot be tokenized.
#[derive(Debug, Clone)]
pub(crate) struct Lexer<'a> {
    input: Span<'a>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`. A leading byte order mark is skipped.
    pub fn new(source: &'a str) -> Lexer<'a> {
        let source = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source);
        Self {
            input: Span::new(source),
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        if let Ok((rest, _)) = multispace1::<_, nom::error::Error<_>>(self.input) {
            self.input = rest;
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.skip_whitespace();
        if self.input.fragment().is_empty() {
            return None;
        }

        let start = self.input;
        let line = start.location_line();
        let column = start.get_utf8_column();

        match parse_token(start) {
            Ok((rest, kind)) => {
                let consumed = rest.location_offset() - start.location_offset();
                let text = &start.fragment()[..consumed];
                self.input = rest;

                Some(Ok(Token {
                    kind,
                    line,
                    end_line: line + text.matches('\n').count() as u32,
                    column,
                }))
            }
            Err(_) => {
                self.failed = true;
                let kind = match start.fragment().chars().next() {
                    Some('/') => LiteralKind::BlockComment,
                    Some('"') => LiteralKind::String,
                    Some('`') => LiteralKind::RawString,
                    Some('\'') => LiteralKind::Rune,
                    _ => return Some(Err(ParseError::InvalidToken { line, column })),
                };

                Some(Err(ParseError::Unterminated { kind, line, column }))
            }
        }
    }
}

fn parse_token<'a>(input: Span<'a>) -> SpanResult<'a, TokenKind<'a>> {
    alt((
        parse_line_comment.map(|s: Span<'a>| TokenKind::LineComment(*s.fragment())),
        parse_block_comment.map(|s: Span<'a>| TokenKind::BlockComment(*s.fragment())),
        parse_raw_string.map(|_| TokenKind::Literal),
        parse_quoted('"').map(|_| TokenKind::Literal),
        parse_quoted('\'').map(|_| TokenKind::Literal),
        parse_ident.map(|s: Span<'a>| TokenKind::Ident(*s.fragment())),
        parse_number.map(|_| TokenKind::Literal),
        one_of("{([").map(TokenKind::Open),
        one_of("})]").map(TokenKind::Close),
        anychar.map(TokenKind::Punct),
    ))
    .parse(input)
}

/// Parses a `//` comment up to, but not including, the line feed.
fn parse_line_comment(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(preceded(tag("//"), take_till(|c: char| c == '\n'))).parse(input)
}

/// Parses a `/* */` comment. Block comments do not nest.
fn parse_block_comment(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(preceded(tag("/*"), cut(pair(take_until("*/"), tag("*/"))))).parse(input)
}

/// Parses a backtick quoted raw string which may span several lines.
fn parse_raw_string(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(preceded(
        char('`'),
        cut(pair(take_till(|c: char| c == '`'), char('`'))),
    ))
    .parse(input)
}

/// Parses an interpreted string or rune literal delimited by `quote`.
///
/// Escape sequences are skipped without validation. A line feed before the
/// closing quote is an error.
fn parse_quoted<'a>(
    quote: char,
) -> impl Parser<Span<'a>, Output = Span<'a>, Error = nom::error::Error<Span<'a>>> {
    recognize(preceded(
        char(quote),
        cut(pair(
            many0_count(alt((
                preceded(char('\\'), anychar),
                satisfy(move |c| c != quote && c != '\\' && c != '\n'),
            ))),
            char(quote),
        )),
    ))
}

fn parse_ident(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn parse_number(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(pair(
        satisfy(|c| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))
    .parse(input)
}
