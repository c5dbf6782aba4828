//! Build orchestration.
//!
//! A build runs these stages in order and stops at the first failure:
//!
//! 1. Scan the source files for export markers.
//! 2. Write the module definition file.
//! 3. Create the import library with the MSVC librarian.
//! 4. Check the import library for every export (optional).
//! 5. Compile the shared library with `go build`.
//!
//! Artifacts written by stages before a failure are left on disk.

use std::path::PathBuf;

use crate::{
    compiler::GoCompiler,
    deffile::write_definition_file,
    error::BuildError,
    implib,
    inputs::FileSet,
    outputs::OutputName,
    process::CommandRunner,
    scanner::scan_exports,
    timing::StageTimings,
    toolchain::{TargetArch, Toolchain, default_vswhere_path},
};

/// Settings for a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory receiving every artifact. Empty for the current directory.
    pub out_dir: PathBuf,

    pub arch: TargetArch,

    /// Go executable.
    pub go: PathBuf,

    /// `vswhere.exe` location.
    pub vswhere: PathBuf,

    /// Check the import library for the scanned exports.
    pub verify_implib: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::new(),
            arch: TargetArch::host(),
            go: PathBuf::from("go"),
            vswhere: default_vswhere_path(),
            verify_implib: true,
        }
    }
}

/// Files produced by a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifacts {
    /// Export names in the order they were written to the definition file.
    pub exports: Vec<String>,
    pub def_path: PathBuf,
    pub lib_path: PathBuf,
    pub dll_path: PathBuf,

    /// Exports without an import member in the import library. Always empty
    /// when verification is disabled.
    pub missing_exports: Vec<String>,
}

/// Runs the build stages.
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    options: BuildOptions,
    timings: StageTimings,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn CommandRunner, options: BuildOptions) -> Pipeline<'a> {
        Self {
            runner,
            options,
            timings: StageTimings::default(),
        }
    }

    #[inline]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Returns the time taken by each stage that has run.
    #[inline]
    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    /// Builds `files` into the shared library `output` along with its module
    /// definition file and import library.
    pub fn run(
        &mut self,
        files: &FileSet,
        output: &OutputName,
    ) -> Result<BuildArtifacts, BuildError> {
        let out_dir = self.options.out_dir.as_path();
        let def_path = output.def_path(out_dir);
        let lib_path = output.lib_path(out_dir);
        let dll_path = output.dll_path(out_dir);

        if files.is_empty() {
            log::warn!("no source files specified");
        }

        let exports = self.timings.time("scan", || scan_exports(files));
        if exports.is_empty() {
            log::warn!("no exports found");
        }

        self.timings.time("definition file", || {
            write_definition_file(
                &def_path,
                output.library_name(),
                exports.iter().map(String::as_str),
            )
        })?;

        let toolchain = Toolchain::new(
            self.runner,
            self.options.vswhere.clone(),
            self.options.arch,
        );
        self.timings.time("import library", || {
            toolchain.build_import_library(&def_path, &lib_path)
        })?;

        let missing_exports = if self.options.verify_implib {
            let missing = self.timings.time("verify", || {
                implib::missing_exports(&lib_path, exports.iter().map(String::as_str))
            })?;

            for name in &missing {
                log::warn!(
                    "{}: export '{name}' is missing from the import library",
                    lib_path.display()
                );
            }

            missing.into_iter().map(str::to_owned).collect()
        } else {
            Vec::new()
        };

        let compiler = GoCompiler::new(self.runner, &self.options.go);
        self.timings
            .time("compile", || compiler.build_shared(&dll_path, files))?;

        Ok(BuildArtifacts {
            exports,
            def_path,
            lib_path,
            dll_path,
            missing_exports,
        })
    }
}
