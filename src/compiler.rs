use std::{ffi::OsString, path::Path};

use crate::{
    error::CompileError,
    inputs::FileSet,
    process::{CommandLine, CommandRunner, run_checked},
};

/// The Go compiler driver.
pub struct GoCompiler<'a> {
    runner: &'a dyn CommandRunner,
    go: OsString,
}

impl<'a> GoCompiler<'a> {
    pub fn new(runner: &'a dyn CommandRunner, go: impl Into<OsString>) -> GoCompiler<'a> {
        Self {
            runner,
            go: go.into(),
        }
    }

    /// Returns the command line that builds `files` into the shared library
    /// `output`.
    pub fn build_command(&self, output: &Path, files: &FileSet) -> CommandLine {
        let mut cmd = CommandLine::new(&self.go);
        cmd.args(["build", "-buildmode=c-shared", "-o"])
            .arg(output)
            .args(files.iter());
        cmd
    }

    /// Builds `files` into the shared library `output`.
    ///
    /// With no files `go build` compiles the package in the current
    /// directory.
    pub fn build_shared(&self, output: &Path, files: &FileSet) -> Result<(), CompileError> {
        let cmd = self.build_command(output, files);
        run_checked(self.runner, &cmd).map_err(|source| CompileError {
            path: output.to_path_buf(),
            source,
        })?;

        log::info!("created {}", output.display());
        Ok(())
    }
}
