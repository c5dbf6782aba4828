use thiserror::Error;

/// Error type for source files that cannot be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The file does not start with a `package <name>` clause.
    #[error("at {line}:{column}: expected 'package' clause")]
    MissingPackageClause { line: u32, column: usize },

    /// A literal or block comment is missing its closing delimiter.
    #[error("at {line}:{column}: unterminated {kind}")]
    Unterminated {
        kind: LiteralKind,
        line: u32,
        column: usize,
    },

    /// A closing bracket does not match the innermost open bracket.
    #[error("at {line}:{column}: unexpected '{found}'")]
    UnexpectedDelimiter {
        found: char,
        line: u32,
        column: usize,
    },

    /// An open bracket is still unclosed at the end of the file.
    #[error("at {line}:{column}: '{delimiter}' is never closed")]
    UnclosedDelimiter {
        delimiter: char,
        line: u32,
        column: usize,
    },

    #[error("at {line}:{column}: invalid token")]
    InvalidToken { line: u32, column: usize },
}

impl ParseError {
    /// Returns the line number where the error occured.
    pub fn line_number(&self) -> u32 {
        match self {
            Self::MissingPackageClause { line, .. }
            | Self::Unterminated { line, .. }
            | Self::UnexpectedDelimiter { line, .. }
            | Self::UnclosedDelimiter { line, .. }
            | Self::InvalidToken { line, .. } => *line,
        }
    }
}

/// Delimited source constructs that can be left unterminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    BlockComment,
    String,
    RawString,
    Rune,
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BlockComment => "block comment",
            Self::String => "string literal",
            Self::RawString => "raw string literal",
            Self::Rune => "rune literal",
        })
    }
}
