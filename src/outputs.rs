//! Output artifact naming.
//!
//! Every build produces three artifacts sharing one base name. For an output
//! name of `mylib.dll` these are `mylib.def`, `mylib.lib` and `mylib.dll`.

use std::path::{Path, PathBuf};

use crate::error::OutputAlreadySet;

/// Extension appended to output names that do not already end with it.
pub const DLL_EXTENSION: &str = ".dll";

/// Base name used when no output name is given.
pub const DEFAULT_DLL_NAME: &str = "go";

/// Name of the shared library being built.
///
/// Always ends with [`DLL_EXTENSION`]. The suffix check is case-sensitive so
/// `FOO.DLL` becomes `FOO.DLL.dll`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputName(String);

impl OutputName {
    /// Normalizes `name` into an output name.
    ///
    /// An empty name selects the default `go.dll`.
    pub fn new(name: impl Into<String>) -> OutputName {
        let mut name = name.into();
        if name.is_empty() {
            name.push_str(DEFAULT_DLL_NAME);
        }

        if !name.ends_with(DLL_EXTENSION) {
            name.push_str(DLL_EXTENSION);
        }

        Self(name)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the output name without the `.dll` suffix.
    pub fn base_name(&self) -> &str {
        self.0.strip_suffix(DLL_EXTENSION).unwrap_or(&self.0)
    }

    /// Returns the name written to the `LIBRARY` statement of the module
    /// definition file.
    ///
    /// This is the final path component of the base name so that an output
    /// name like `out/mylib` names the library `mylib`.
    pub fn library_name(&self) -> &str {
        let base = self.base_name();
        base.rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(base)
    }

    /// Returns the path of the shared library inside `dir`.
    pub fn dll_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.0)
    }

    /// Returns the path of the module definition file inside `dir`.
    pub fn def_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.base_name(), moduledef::DEF_EXTENSION))
    }

    /// Returns the path of the import library inside `dir`.
    pub fn lib_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.lib", self.base_name()))
    }
}

impl Default for OutputName {
    fn default() -> Self {
        Self::new(DEFAULT_DLL_NAME)
    }
}

impl std::fmt::Display for OutputName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output name configuration value that can only be set once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputOption(Option<OutputName>);

impl OutputOption {
    /// Sets the output name.
    ///
    /// Fails if a name was already set, regardless of whether the new value
    /// is the same.
    pub fn set(&mut self, name: impl Into<String>) -> Result<&OutputName, OutputAlreadySet> {
        if let Some(current) = &self.0 {
            return Err(OutputAlreadySet(current.clone()));
        }

        Ok(self.0.insert(OutputName::new(name)))
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the configured output name or the default.
    pub fn get(&self) -> OutputName {
        self.0.clone().unwrap_or_default()
    }
}
