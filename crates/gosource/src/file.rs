use crate::{
    comment::{Comment, CommentGroup},
    error::ParseError,
    keyword::DeclKeyword,
    lexer::{Lexer, Token, TokenKind},
};

/// A top-level declaration and its doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    keyword: DeclKeyword,
    line: u32,
    doc: Option<CommentGroup<'a>>,
}

impl<'a> Declaration<'a> {
    /// Returns the keyword that starts the declaration.
    #[inline]
    pub fn keyword(&self) -> DeclKeyword {
        self.keyword
    }

    /// Returns the line of the declaration keyword.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the comment group attached to the declaration.
    ///
    /// A group is attached when it ends on the line immediately before the
    /// declaration keyword with no tokens in between.
    #[inline]
    pub fn doc(&self) -> Option<&CommentGroup<'a>> {
        self.doc.as_ref()
    }
}

/// A scanned Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile<'a> {
    package: &'a str,
    declarations: Vec<Declaration<'a>>,
    comments: Vec<CommentGroup<'a>>,
}

impl<'a> SourceFile<'a> {
    /// Parses Go source text.
    pub fn parse(source: &'a str) -> Result<SourceFile<'a>, ParseError> {
        let mut builder = SourceFileBuilder::default();
        for token in Lexer::new(source) {
            builder.push(token?)?;
        }
        builder.finish()
    }

    /// Returns the name from the `package` clause.
    #[inline]
    pub fn package_name(&self) -> &'a str {
        self.package
    }

    /// Returns the top-level declarations in source order.
    #[inline]
    pub fn declarations(&self) -> &[Declaration<'a>] {
        &self.declarations
    }

    /// Returns every comment group in the file in source order.
    #[inline]
    pub fn comments(&self) -> &[CommentGroup<'a>] {
        &self.comments
    }

    /// Returns an iterator over the comments carrying an export marker that
    /// are attached to top-level declarations, in source order.
    pub fn export_comments(&self) -> impl Iterator<Item = &Comment<'a>> + '_ {
        self.declarations
            .iter()
            .filter_map(Declaration::doc)
            .flat_map(CommentGroup::comments)
            .filter(|comment| comment.export_name().is_some())
    }

    /// Returns an iterator over the export marker names attached to top-level
    /// declarations, in source order.
    pub fn exports(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.export_comments().filter_map(Comment::export_name)
    }
}

/// Progress through the `package <name>` clause.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum PackageClause<'a> {
    #[default]
    Keyword,
    Name,
    Done(&'a str),
}

#[derive(Debug, Default)]
struct SourceFileBuilder<'a> {
    package: PackageClause<'a>,
    declarations: Vec<Declaration<'a>>,
    comments: Vec<CommentGroup<'a>>,

    /// Comment group that has not been closed by a token yet.
    pending: Option<CommentGroup<'a>>,

    /// Open brackets with their positions.
    brackets: Vec<(char, u32, usize)>,

    /// Line of the end of the last non-comment token.
    last_line: Option<u32>,
}

impl<'a> SourceFileBuilder<'a> {
    fn push(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::LineComment(raw) | TokenKind::BlockComment(raw) => {
                self.push_comment(Comment::new(raw, token.line, token.end_line));
                return Ok(());
            }
            _ => (),
        }

        let doc = self.close_group();
        self.last_line = Some(token.end_line);

        match self.package {
            PackageClause::Keyword => {
                if token.kind != TokenKind::Ident("package") {
                    return Err(ParseError::MissingPackageClause {
                        line: token.line,
                        column: token.column,
                    });
                }
                self.package = PackageClause::Name;
                return Ok(());
            }
            PackageClause::Name => {
                let TokenKind::Ident(name) = token.kind else {
                    return Err(ParseError::MissingPackageClause {
                        line: token.line,
                        column: token.column,
                    });
                };
                self.package = PackageClause::Done(name);
                return Ok(());
            }
            PackageClause::Done(_) => (),
        }

        match token.kind {
            TokenKind::Ident(ident) if self.brackets.is_empty() => {
                if let Some(keyword) = DeclKeyword::parse(ident) {
                    self.declarations.push(Declaration {
                        keyword,
                        line: token.line,
                        doc: doc.filter(|group| group.end_line() + 1 == token.line),
                    });
                }
            }
            TokenKind::Open(ch) => {
                self.brackets.push((ch, token.line, token.column));
            }
            TokenKind::Close(ch) => match self.brackets.pop() {
                Some((open, _, _)) if closing_bracket(open) == ch => (),
                _ => {
                    return Err(ParseError::UnexpectedDelimiter {
                        found: ch,
                        line: token.line,
                        column: token.column,
                    });
                }
            },
            _ => (),
        }

        Ok(())
    }

    fn push_comment(&mut self, comment: Comment<'a>) {
        if let Some(group) = self.pending.as_mut()
            && group.try_push(comment)
        {
            return;
        }

        self.close_group();
        let trailing = self.last_line == Some(comment.line());
        self.pending = Some(CommentGroup::new(comment, trailing));
    }

    /// Closes the pending comment group and returns it if it can serve as a
    /// doc comment for the next token.
    fn close_group(&mut self) -> Option<CommentGroup<'a>> {
        let group = self.pending.take()?;
        self.comments.push(group.clone());
        (!group.is_trailing()).then_some(group)
    }

    fn finish(mut self) -> Result<SourceFile<'a>, ParseError> {
        self.close_group();

        if let Some((delimiter, line, column)) = self.brackets.pop() {
            return Err(ParseError::UnclosedDelimiter {
                delimiter,
                line,
                column,
            });
        }

        let PackageClause::Done(package) = self.package else {
            return Err(ParseError::MissingPackageClause {
                line: self.last_line.unwrap_or(1),
                column: 1,
            });
        };

        Ok(SourceFile {
            package,
            declarations: self.declarations,
            comments: self.comments,
        })
    }
}

fn closing_bracket(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

#[cfg(test)]
mod tests {
    use crate::{DeclKeyword, ParseError, SourceFile};

    fn exports(source: &str) -> Vec<&str> {
        SourceFile::parse(source)
            .expect("Could not parse source")
            .exports()
            .collect()
    }

    #[test]
    fn package_name() {
        let file =
            SourceFile::parse("// Package main.\npackage main\n").expect("Could not parse source");
        assert_eq!(file.package_name(), "main");
        assert!(file.declarations().is_empty());
        assert_eq!(file.comments().len(), 1);
    }

    #[test]
    fn exported_function() {
        let source = r#"package main

import "C"

//export Add
func Add(a, b C.int) C.int {
    return a + b
}

func main() {}
"#;
        assert_eq!(exports(source), ["Add"]);
    }

    #[test]
    fn declarations() {
        let source = "package p\nimport \"C\"\nconst a = 1\nvar b = 2\ntype T struct{}\nfunc f() {}\n";
        let file = SourceFile::parse(source).expect("Could not parse source");
        let keywords = file
            .declarations()
            .iter()
            .map(|decl| decl.keyword())
            .collect::<Vec<_>>();

        assert_eq!(
            keywords,
            [
                DeclKeyword::Import,
                DeclKeyword::Const,
                DeclKeyword::Var,
                DeclKeyword::Type,
                DeclKeyword::Func,
            ]
        );
    }

    #[test]
    fn marker_after_doc_text() {
        let source = "package p\n\n// Sum adds numbers.\n//export Sum\nfunc Sum() {}\n";
        assert_eq!(exports(source), ["Sum"]);
    }

    #[test]
    fn spaced_marker() {
        let source = "package p\n\n// export Sum\nfunc Sum() {}\n";
        assert_eq!(exports(source), ["Sum"]);
    }

    #[test]
    fn detached_comment() {
        let source = "package p\n\n//export Sum\n\nfunc Sum() {}\n";
        assert!(exports(source).is_empty());
    }

    #[test]
    fn nested_comment() {
        let source = "package p\n\nfunc f() {\n    //export Inner\n    var x int\n    _ = x\n}\n";
        assert!(exports(source).is_empty());
    }

    #[test]
    fn trailing_comment_not_attached() {
        let source = "package p\n\nvar x = 1 //export X\nfunc f() {}\n";
        let file = SourceFile::parse(source).expect("Could not parse source");
        assert!(file.exports().next().is_none());
        assert!(file.comments()[0].is_trailing());
    }

    #[test]
    fn file_order() {
        let source = r#"package p

//export First
func First() {}

/*export Second*/
func Second() {}

// unrelated

//export Third
//export ThirdAlias
func Third() {}
"#;
        assert_eq!(exports(source), ["First", "Second", "Third", "ThirdAlias"]);
    }

    #[test]
    fn export_comment_lines() {
        let source = "package p\n\n// Doc.\n//export A\nfunc A() {}\n";
        let file = SourceFile::parse(source).expect("Could not parse source");
        let lines = file
            .export_comments()
            .map(|comment| comment.line())
            .collect::<Vec<_>>();
        assert_eq!(lines, [4]);
    }

    #[test]
    fn exports_marker_not_matched() {
        let source = "package p\n\n//exports Foo\nfunc Foo() {}\n";
        assert!(exports(source).is_empty());
    }

    #[test]
    fn braces_in_literals() {
        let source = "package p\n\nvar s = \"{\"\nvar r = '}'\nvar raw = `\n}\n`\n\n//export F\nfunc F() {}\n";
        assert_eq!(exports(source), ["F"]);
    }

    #[test]
    fn byte_order_mark() {
        let source = "\u{feff}package main\n\nimport \"C\"\n\n//export Add\nfunc Add() {}\n";
        assert_eq!(exports(source), ["Add"]);
    }

    #[test]
    fn missing_package() {
        let err = SourceFile::parse("func main() {}\n").expect_err("Parsing should fail");
        assert!(matches!(err, ParseError::MissingPackageClause { line: 1, .. }));
    }

    #[test]
    fn empty_file() {
        let err = SourceFile::parse("// nothing here\n").expect_err("Parsing should fail");
        assert!(matches!(err, ParseError::MissingPackageClause { .. }));
    }

    #[test]
    fn unclosed_brace() {
        let err = SourceFile::parse("package p\nfunc f() {\n").expect_err("Parsing should fail");
        assert_eq!(
            err,
            ParseError::UnclosedDelimiter {
                delimiter: '{',
                line: 2,
                column: 10,
            }
        );
    }

    #[test]
    fn mismatched_bracket() {
        let err = SourceFile::parse("package p\nvar a = f(]\n").expect_err("Parsing should fail");
        assert!(matches!(
            err,
            ParseError::UnexpectedDelimiter {
                found: ']',
                line: 2,
                ..
            }
        ));
    }
}
