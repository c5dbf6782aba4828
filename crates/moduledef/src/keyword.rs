/// Module definition file statement keywords written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Exports,
    Library,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exports => "EXPORTS",
            Self::Library => "LIBRARY",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reserved words of the module definition file format.
///
/// See: https://learn.microsoft.com/en-us/cpp/build/reference/reserved-words
pub const RESERVED_WORDS: &[&str] = &[
    "APPLOADER",
    "BASE",
    "CODE",
    "CONFORMING",
    "DATA",
    "DESCRIPTION",
    "DEV386",
    "DISCARDABLE",
    "DYNAMIC",
    "EXECUTE-ONLY",
    "EXECUTEONLY",
    "EXECUTEREAD",
    "EXETYPE",
    "EXPORTS",
    "FIXED",
    "FUNCTIONS",
    "HEAPSIZE",
    "IMPORTS",
    "IMPURE",
    "INCLUDE",
    "INITINSTANCE",
    "IOPL",
    "LIBRARY",
    "LOADONCALL",
    "LONGNAMES",
    "MOVABLE",
    "MOVEABLE",
    "MULTIPLE",
    "NAME",
    "NEWFILES",
    "NODATA",
    "NOIOPL",
    "NONAME",
    "NONCONFORMING",
    "NONDISCARDABLE",
    "NONE",
    "NONSHARED",
    "NOTWINDOWCOMPAT",
    "OBJECTS",
    "OLD",
    "PRELOAD",
    "PRIVATE",
    "PROTMODE",
    "PURE",
    "READONLY",
    "READWRITE",
    "REALMODE",
    "RESIDENT",
    "RESIDENTNAME",
    "SECTIONS",
    "SEGMENTS",
    "SHARED",
    "SINGLE",
    "STACKSIZE",
    "STUB",
    "VERSION",
    "WINDOWAPI",
    "WINDOWCOMPAT",
    "WINDOWS",
];

/// Returns `true` if the specified string is a reserved word.
///
/// Reserved words are case sensitive.
pub fn is_reserved_word(s: impl AsRef<str>) -> bool {
    RESERVED_WORDS.contains(&s.as_ref())
}

#[cfg(test)]
mod tests {
    use super::is_reserved_word;

    #[test]
    fn reserved() {
        assert!(is_reserved_word("DATA"));
        assert!(is_reserved_word("EXECUTE-ONLY"));
        assert!(!is_reserved_word("data"));
        assert!(!is_reserved_word("Add"));
    }
}
