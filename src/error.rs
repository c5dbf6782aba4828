use std::path::PathBuf;

use crate::{outputs::OutputName, toolchain::MSVC_PATH_KEY};

/// Error from a build stage. Building stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    DefinitionFile(#[from] DefinitionFileError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    ImportLibrary(#[from] ImplibError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// The output name option was given more than once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("output name is already set to '{0}'")]
pub struct OutputAlreadySet(pub OutputName);

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("could not run '{program}': {error}")]
    Spawn {
        program: String,
        error: std::io::Error,
    },

    #[error("'{program}' {}{}", display_status(.status), display_output(.output))]
    Failed {
        program: String,
        status: Option<i32>,
        output: String,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("{}: could not write module definition file: {error}", .path.display())]
pub struct DefinitionFileError {
    pub path: PathBuf,
    pub error: std::io::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("could not locate the MSVC installation")]
    Locate(#[source] CommandError),

    #[error("vswhere output does not contain an '{}' line", MSVC_PATH_KEY)]
    MissingInstallationPath,

    #[error("malformed '{}' line in vswhere output: '{}'", MSVC_PATH_KEY, .0)]
    MalformedInstallationPath(String),

    #[error("could not create import library {}", .path.display())]
    Librarian {
        path: PathBuf,
        #[source]
        source: CommandError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ImplibError {
    #[error("{}: could not read import library: {error}", .path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{}: could not parse import library: {error}", .path.display())]
    Parse {
        path: PathBuf,
        error: object::read::Error,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("could not build {}", .path.display())]
pub struct CompileError {
    pub path: PathBuf,
    #[source]
    pub source: CommandError,
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

fn display_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!("\n{output}")
    }
}
