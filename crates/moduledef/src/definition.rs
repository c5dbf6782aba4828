//! see: https://learn.microsoft.com/en-us/cpp/build/reference/exports?view=msvc-170

use std::io::Write;

use crate::keyword::Keyword;

/// Indentation between the `LIBRARY` keyword and the library name and in
/// front of every export name. Exactly 4 spaces.
pub const DEF_INDENT: &str = "    ";

/// File extension for module definition files.
pub const DEF_EXTENSION: &str = "def";

/// A module definition with a `LIBRARY` header and one `EXPORTS` statement.
///
/// Export names are kept in insertion order. Duplicates and names that are
/// not valid identifiers are written as given.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ModuleDefinition<'a> {
    library: &'a str,
    exports: Vec<&'a str>,
}

impl<'a> ModuleDefinition<'a> {
    /// Creates a definition for the library `library` with no exports.
    pub fn new(library: &'a str) -> ModuleDefinition<'a> {
        Self {
            library,
            exports: Vec::new(),
        }
    }

    /// Returns the `[library]` name.
    #[inline]
    pub fn library(&self) -> &'a str {
        self.library
    }

    /// Returns the export names.
    #[inline]
    pub fn exports(&self) -> &[&'a str] {
        &self.exports
    }

    /// Appends an export name.
    pub fn add_export(&mut self, name: &'a str) -> &mut Self {
        self.exports.push(name);
        self
    }

    /// Writes the module definition to `writer`.
    pub fn write_to(&self, mut writer: impl Write) -> std::io::Result<()> {
        write!(writer, "{self}")
    }
}

impl<'a> Extend<&'a str> for ModuleDefinition<'a> {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        self.exports.extend(iter);
    }
}

impl std::fmt::Display for ModuleDefinition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}{DEF_INDENT}{}", Keyword::Library, self.library)?;
        writeln!(f, "{}", Keyword::Exports)?;
        self.exports
            .iter()
            .try_for_each(|name| writeln!(f, "{DEF_INDENT}{name}"))
    }
}
