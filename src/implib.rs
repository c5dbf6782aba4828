//! Import library inspection.
//!
//! `lib.exe` writes one short import member per export. The names from these
//! members are compared against the scanned exports to catch names that the
//! librarian dropped or renamed.

use std::{collections::HashSet, path::Path};

use object::{
    coff::{ImportFile, ImportName},
    read::archive::ArchiveFile,
};

use crate::error::ImplibError;

/// Leading bytes of a short import member header.
const IMPORT_MEMBER_MAGIC: [u8; 4] = [0, 0, 0xff, 0xff];

/// Returns `true` if `data` starts with a short import header.
fn is_import_member(data: &[u8]) -> bool {
    data.starts_with(&IMPORT_MEMBER_MAGIC)
}

/// Returns the names imported by the short import members of an archive.
///
/// Both the public symbol and the import name of each member are included.
/// Members that are not short imports are ignored.
pub fn import_names(data: &[u8]) -> object::read::Result<HashSet<&[u8]>> {
    let archive = ArchiveFile::parse(data)?;
    let mut names = HashSet::new();

    for member in archive.members() {
        let member_data = member?.data(data)?;
        if !is_import_member(member_data) {
            continue;
        }

        let import = ImportFile::parse(member_data)?;
        names.insert(import.symbol());
        if let ImportName::Name(name) = import.import() {
            names.insert(name);
        }
    }

    Ok(names)
}

/// Reads the import library at `path` and returns the exports that do not
/// have an import member.
pub fn missing_exports<'a>(
    path: &Path,
    exports: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<&'a str>, ImplibError> {
    let data = std::fs::read(path).map_err(|error| ImplibError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    let names = import_names(&data).map_err(|error| ImplibError::Parse {
        path: path.to_path_buf(),
        error,
    })?;

    log::debug!("{}: found {} import name(s)", path.display(), names.len());

    Ok(exports
        .into_iter()
        .filter(|export| !names.contains(export.as_bytes()))
        .collect())
}
