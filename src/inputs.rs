use std::path::{Path, PathBuf};

/// Ordered collection of Go source files.
///
/// Duplicate paths are kept. The Go toolchain reports them when building.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    pub fn new() -> FileSet {
        Self::default()
    }

    /// Appends every file from a delimited file list.
    ///
    /// See [`split_file_list`] for the accepted delimiters.
    pub fn extend_from_list(&mut self, list: &str) {
        self.files.extend(split_file_list(list).map(PathBuf::from));
    }

    /// Appends a single file path as-is.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Path> + '_ {
        self.files.iter().map(PathBuf::as_path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for FileSet {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Splits a file list on commas, semicolons and whitespace.
///
/// Empty fields are dropped so `"a.go,,b.go "` yields `a.go` and `b.go`.
pub fn split_file_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|field| !field.is_empty())
}
