/// Comment prefix marking a declaration for export from a shared library.
///
/// The keyword must be followed by exactly one space before the exported
/// name. `//export Foo` and `// export Foo` both carry the marker text
/// `export Foo`.
pub const EXPORT_MARKER: &str = "export ";

/// A single `//` or `/* */` comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comment<'a> {
    raw: &'a str,
    line: u32,
    end_line: u32,
}

impl<'a> Comment<'a> {
    pub(crate) fn new(raw: &'a str, line: u32, end_line: u32) -> Comment<'a> {
        Self {
            raw,
            line,
            end_line,
        }
    }

    /// Returns the comment source text including the comment delimiters.
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Returns the line the comment starts on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the line the comment ends on.
    #[inline]
    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    /// Returns `true` if this is a `/* */` comment.
    #[inline]
    pub fn is_block(&self) -> bool {
        self.raw.starts_with("/*")
    }

    /// Returns the comment text without its delimiters.
    ///
    /// For `//` comments a single space following the `//` is also removed
    /// along with a trailing carriage return.
    pub fn text(&self) -> &'a str {
        if let Some(body) = self.raw.strip_prefix("//") {
            let body = body.strip_suffix('\r').unwrap_or(body);
            body.strip_prefix(' ').unwrap_or(body)
        } else {
            self.raw
                .strip_prefix("/*")
                .and_then(|body| body.strip_suffix("*/"))
                .unwrap_or(self.raw)
        }
    }

    /// Returns the exported name if the comment text starts with
    /// [`EXPORT_MARKER`].
    ///
    /// The name is trimmed of surrounding whitespace but is otherwise not
    /// validated and may be empty.
    pub fn export_name(&self) -> Option<&'a str> {
        self.text().strip_prefix(EXPORT_MARKER).map(str::trim)
    }
}

/// A run of adjacent comments with no tokens between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentGroup<'a> {
    comments: Vec<Comment<'a>>,

    /// The group started on the same line as the preceding token.
    trailing: bool,
}

impl<'a> CommentGroup<'a> {
    pub(crate) fn new(first: Comment<'a>, trailing: bool) -> CommentGroup<'a> {
        Self {
            comments: vec![first],
            trailing,
        }
    }

    /// Adds `comment` to the group if it is adjacent to the last comment.
    ///
    /// Trailing groups only extend across the same line. Other groups extend
    /// to a comment starting on the line after the last one ends.
    pub(crate) fn try_push(&mut self, comment: Comment<'a>) -> bool {
        let gap = if self.trailing { 0 } else { 1 };
        if comment.line() <= self.end_line() + gap {
            self.comments.push(comment);
            true
        } else {
            false
        }
    }

    /// Returns the comments in the group in source order.
    #[inline]
    pub fn comments(&self) -> &[Comment<'a>] {
        &self.comments
    }

    /// Returns `true` if the group follows a token on the same line.
    #[inline]
    pub fn is_trailing(&self) -> bool {
        self.trailing
    }

    /// Returns the line the group starts on.
    pub fn line(&self) -> u32 {
        self.comments.first().map(Comment::line).unwrap_or_default()
    }

    /// Returns the line the group ends on.
    pub fn end_line(&self) -> u32 {
        self.comments.last().map(Comment::end_line).unwrap_or_default()
    }
}
