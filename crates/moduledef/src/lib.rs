//! Writer for Windows [Module-Definition (.Def) Files](https://learn.microsoft.com/en-us/cpp/build/reference/module-definition-dot-def-files)
//!
//! These files contain plaintext export information of a DLL.
//!
//! The files written here only carry a `LIBRARY` header and a single
//! `EXPORTS` statement. Every line after the header is indented with
//! [`DEF_INDENT`].
//! ```text
//! LIBRARY    mylibrary
//! EXPORTS
//!     MyLibraryCreate
//!     MyLibraryHelloWorld
//! ```
//!
//! Module definition files are useful when needing to build an import library
//! for linking with a DLL that was not produced by the MSVC linker. Tools such
//! as `lib.exe`, `dlltool` or `llvm-dlltool` create the import library from
//! the module definition file.
//!
//! Rules
//!
//! The file statement rules are outlined [here](https://learn.microsoft.com/en-us/cpp/build/reference/rules-for-module-definition-statements)
//!
//! Summary:
//! - Statements, attribute keywords, and user-specified identifiers are case sensitive.
//! - A NAME or LIBRARY statement, if used, must precede all other statements.
//! - EXPORTS statement entries must be separated by one or more spaces, tabs or newline characters.
//! - If a string argument matches a reserved word, it must be enclosed in double quotation marks (").
//!
//! Names are written exactly as given. Use [`is_reserved_word`] to detect
//! export names the librarian will reject.

mod definition;
mod keyword;

pub use definition::{DEF_EXTENSION, DEF_INDENT, ModuleDefinition};
pub use keyword::{Keyword, RESERVED_WORDS, is_reserved_word};
