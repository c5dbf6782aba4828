/// Keywords that start a top-level Go declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKeyword {
    Const,
    Func,
    Import,
    Type,
    Var,
}

impl DeclKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Func => "func",
            Self::Import => "import",
            Self::Type => "type",
            Self::Var => "var",
        }
    }

    /// Parses a declaration keyword from an identifier.
    pub fn parse(ident: &str) -> Option<DeclKeyword> {
        Some(match ident {
            "const" => Self::Const,
            "func" => Self::Func,
            "import" => Self::Import,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        })
    }
}

impl std::fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
