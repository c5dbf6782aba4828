//! Scanner for Go source files.
//!
//! This is not a full Go parser. Source text is tokenized just far enough to
//! recover the `package` clause, comment groups and top-level declarations.
//! That is sufficient for finding `//export` markers on functions that are
//! exported from a `c-shared` build.
//!
//! ```text
//! package main
//!
//! import "C"
//!
//! // Add returns the sum of two integers.
//! //export Add
//! func Add(a, b C.int) C.int {
//!     return a + b
//! }
//! ```
//!
//! Rules
//!
//! - A comment group is a run of comments with no tokens between them where
//!   each comment starts at most one line after the previous one ends.
//! - A comment starting on the same line as a preceding token begins a
//!   trailing group which never extends past that line.
//! - A group is the doc comment of a top-level declaration when it ends on the
//!   line immediately before a `func`, `type`, `var`, `const` or `import`
//!   keyword outside of any brackets.
//! - Every comment in a doc comment group is tested for the [`EXPORT_MARKER`]
//!   prefix.

mod comment;
mod error;
mod file;
mod keyword;
mod lexer;

pub use comment::{Comment, CommentGroup, EXPORT_MARKER};
pub use error::{LiteralKind, ParseError};
pub use file::{Declaration, SourceFile};
pub use keyword::DeclKeyword;
