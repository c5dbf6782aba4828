//! Builds a Windows DLL and its import library from Go sources.
//!
//! Go functions marked with an `//export Name` comment are collected into a
//! module definition file. The MSVC librarian turns that file into an import
//! library and `go build -buildmode=c-shared` produces the DLL itself.
//!
//! ```text
//! godll -o mylib -f main.go,exports.go
//! ```
//!
//! Produces `mylib.def`, `mylib.lib` and `mylib.dll`.

pub mod cli;
pub mod compiler;
pub mod deffile;
pub mod error;
pub mod implib;
pub mod inputs;
pub mod logging;
pub mod outputs;
pub mod pipeline;
pub mod process;
pub mod scanner;
pub mod timing;
pub mod toolchain;

pub use error::BuildError;
pub use inputs::FileSet;
pub use outputs::OutputName;
pub use pipeline::{BuildArtifacts, BuildOptions, Pipeline};
