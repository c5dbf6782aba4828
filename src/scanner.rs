//! Export marker scanning across a set of Go source files.

use std::path::{Path, PathBuf};

use gosource::{Comment, ParseError, SourceFile};

use crate::inputs::FileSet;

/// Reason a source file was skipped during scanning.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{}: could not read source file: {error}", .path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{}: {error}", .path.display())]
    Parse { path: PathBuf, error: ParseError },
}

/// Returns the export names found across `files`.
///
/// Names are returned in file order followed by in-file order. Files that
/// cannot be read or parsed are skipped with a warning.
pub fn scan_exports(files: &FileSet) -> Vec<String> {
    let mut exports = Vec::new();

    for path in files.iter() {
        match scan_file(path) {
            Ok(names) => {
                log::debug!("{}: found {} export(s)", path.display(), names.len());
                exports.extend(names);
            }
            Err(e) => {
                log::warn!("{e}\nskipping file");
            }
        }
    }

    exports
}

/// Reads and scans a single source file.
pub fn scan_file(path: &Path) -> Result<Vec<String>, ScanError> {
    let source = std::fs::read_to_string(path).map_err(|error| ScanError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    scan_source(path, &source)
}

/// Scans Go source text. `path` is only used for diagnostics.
pub fn scan_source(path: &Path, source: &str) -> Result<Vec<String>, ScanError> {
    let file = SourceFile::parse(source).map_err(|error| ScanError::Parse {
        path: path.to_path_buf(),
        error,
    })?;

    log::trace!(
        "{}: package '{}' has {} top-level declaration(s)",
        path.display(),
        file.package_name(),
        file.declarations().len()
    );

    Ok(file
        .export_comments()
        .filter_map(|comment| {
            let name = comment.export_name()?;
            check_export_name(path, comment, name);
            Some(name.to_owned())
        })
        .collect())
}

/// Warns about export names the librarian is likely to reject.
///
/// Names are still exported as written.
fn check_export_name(path: &Path, comment: &Comment<'_>, name: &str) {
    let location = format!("{}:{}", path.display(), comment.line());

    if name.is_empty() {
        log::warn!("{location}: export marker has an empty name");
    } else if !is_identifier(name) {
        log::warn!("{location}: export name '{name}' is not a valid identifier");
    } else if moduledef::is_reserved_word(name) {
        log::warn!("{location}: export name '{name}' is a reserved module definition keyword");
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
