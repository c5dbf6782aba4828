use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use moduledef::ModuleDefinition;

use crate::error::DefinitionFileError;

/// Creates or truncates the module definition file at `path`.
///
/// A partially written file is left on disk if writing fails.
pub fn write_definition_file<'a>(
    path: &Path,
    library: &'a str,
    exports: impl IntoIterator<Item = &'a str>,
) -> Result<(), DefinitionFileError> {
    let mut definition = ModuleDefinition::new(library);
    definition.extend(exports);

    let map_err = |error| DefinitionFileError {
        path: path.to_path_buf(),
        error,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(map_err)?);
    definition.write_to(&mut writer).map_err(map_err)?;
    writer.flush().map_err(map_err)?;

    log::debug!(
        "wrote {} export(s) for library '{library}'",
        definition.exports().len()
    );
    log::info!("created {}", path.display());
    Ok(())
}
