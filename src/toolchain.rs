//! MSVC toolchain discovery and import library creation.
//!
//! The installation root is looked up with `vswhere.exe`. The librarian then
//! runs inside a `cmd.exe` shell after the matching `vcvars*.bat` script has
//! set up the build environment.
//! ```text
//! cmd.exe /q /c "call "<root>\VC\Auxiliary\Build\vcvars64.bat" && lib /DEF:"go.def" /OUT:"go.lib" /MACHINE:x64"
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::{
    error::ToolchainError,
    process::{CommandLine, CommandRunner, run_checked},
};

/// Key of the `vswhere` output line holding the installation root.
pub const MSVC_PATH_KEY: &str = "installationPath";

/// Length of the `installationPath: ` prefix stripped from the matching
/// `vswhere` output line.
const MSVC_PATH_PREFIX_LEN: usize = MSVC_PATH_KEY.len() + 2;

/// Location of the vcvars scripts relative to the installation root.
const VCVARS_DIR: &str = r"VC\Auxiliary\Build";

/// Target architecture of the import library.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetArch {
    /// 64-bit x86
    #[value(name = "x64", alias = "amd64")]
    X64,

    /// 32-bit x86
    #[value(name = "x86", alias = "i386")]
    X86,
}

impl TargetArch {
    /// Returns the architecture of the running host.
    ///
    /// Every host that is not `x86_64` selects [`TargetArch::X86`].
    pub fn host() -> TargetArch {
        if cfg!(target_arch = "x86_64") {
            Self::X64
        } else {
            Self::X86
        }
    }

    /// Returns the vcvars script name that sets up the environment.
    pub fn vcvars_script(&self) -> &'static str {
        match self {
            Self::X64 => "vcvars64.bat",
            Self::X86 => "vcvars32.bat",
        }
    }

    /// Returns the `/MACHINE` value passed to the librarian.
    pub fn machine(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
        }
    }
}

impl Default for TargetArch {
    fn default() -> Self {
        Self::host()
    }
}

impl std::fmt::Display for TargetArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(v) = self.to_possible_value() {
            write!(f, "{}", v.get_name())?;
        }

        Ok(())
    }
}

/// Returns the default `vswhere.exe` location.
pub fn default_vswhere_path() -> PathBuf {
    let program_files = std::env::var_os("ProgramFiles(x86)")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));

    program_files
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe")
}

/// Extracts the installation root from `vswhere` output.
///
/// Only the first line starting with [`MSVC_PATH_KEY`] is considered.
pub fn parse_installation_path(output: &str) -> Result<PathBuf, ToolchainError> {
    let line = output
        .lines()
        .find(|line| line.starts_with(MSVC_PATH_KEY))
        .ok_or(ToolchainError::MissingInstallationPath)?;

    let root = line
        .get(MSVC_PATH_PREFIX_LEN..)
        .map(str::trim_end)
        .filter(|root| !root.is_empty())
        .ok_or_else(|| ToolchainError::MalformedInstallationPath(line.trim_end().to_owned()))?;

    Ok(PathBuf::from(root))
}

/// The MSVC tools used for creating import libraries.
pub struct Toolchain<'a> {
    runner: &'a dyn CommandRunner,
    vswhere: PathBuf,
    arch: TargetArch,
}

impl<'a> Toolchain<'a> {
    pub fn new(runner: &'a dyn CommandRunner, vswhere: PathBuf, arch: TargetArch) -> Toolchain<'a> {
        Self {
            runner,
            vswhere,
            arch,
        }
    }

    #[inline]
    pub fn arch(&self) -> TargetArch {
        self.arch
    }

    /// Queries `vswhere` for the MSVC installation root.
    pub fn locate_msvc(&self) -> Result<PathBuf, ToolchainError> {
        let output = run_checked(self.runner, &CommandLine::new(&self.vswhere))
            .map_err(ToolchainError::Locate)?;

        let root = parse_installation_path(&output.stdout)?;
        log::debug!("found MSVC installation at {}", root.display());
        Ok(root)
    }

    /// Returns the command line that runs the librarian for the module
    /// definition `def_path` and writes the import library to `lib_path`.
    pub fn librarian_command(&self, root: &Path, def_path: &Path, lib_path: &Path) -> CommandLine {
        let vcvars = format!(
            r"{}\{VCVARS_DIR}\{}",
            root.display(),
            self.arch.vcvars_script()
        );

        let mut cmd = CommandLine::new("cmd.exe");
        cmd.args(["/q", "/c"])
            .arg(format!(
                r#""call "{vcvars}" && lib /DEF:"{}" /OUT:"{}" /MACHINE:{}""#,
                def_path.display(),
                lib_path.display(),
                self.arch.machine()
            ))
            .verbatim(true);
        cmd
    }

    /// Locates MSVC and converts the module definition `def_path` into the
    /// import library `lib_path`.
    pub fn build_import_library(
        &self,
        def_path: &Path,
        lib_path: &Path,
    ) -> Result<(), ToolchainError> {
        let root = self.locate_msvc()?;
        let cmd = self.librarian_command(&root, def_path, lib_path);

        run_checked(self.runner, &cmd).map_err(|source| ToolchainError::Librarian {
            path: lib_path.to_path_buf(),
            source,
        })?;

        log::info!("created {}", lib_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        path::{Path, PathBuf},
    };

    use super::{TargetArch, Toolchain, parse_installation_path};
    use crate::{
        error::{CommandError, ToolchainError},
        process::{CommandLine, CommandOutput, CommandRunner},
    };

    const VSWHERE_OUTPUT: &str = "instanceId: 2a2b5d4c\r\n\
        installDate: 1/1/2024 12:00:00 AM\r\n\
        installationName: VisualStudio/17.9.0\r\n\
        installationPath: C:\\Program Files\\Microsoft Visual Studio\\2022\\Community\r\n\
        installationVersion: 17.9.34607.119\r\n";

    struct FakeRunner {
        outputs: RefCell<Vec<CommandOutput>>,
        seen: RefCell<Vec<CommandLine>>,
    }

    impl FakeRunner {
        fn new(outputs: impl IntoIterator<Item = CommandOutput>) -> FakeRunner {
            let mut outputs = outputs.into_iter().collect::<Vec<_>>();
            outputs.reverse();
            Self {
                outputs: RefCell::new(outputs),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, command: &CommandLine) -> std::io::Result<CommandOutput> {
            self.seen.borrow_mut().push(command.clone());
            Ok(self.outputs.borrow_mut().pop().unwrap_or_default())
        }
    }

    #[test]
    fn installation_path() {
        let root = parse_installation_path(VSWHERE_OUTPUT).expect("Could not parse output");
        assert_eq!(
            root,
            PathBuf::from(r"C:\Program Files\Microsoft Visual Studio\2022\Community")
        );
    }

    #[test]
    fn first_installation_path() {
        let output = "installationPath: C:\\A\ninstallationPath: C:\\B\n";
        let root = parse_installation_path(output).expect("Could not parse output");
        assert_eq!(root, PathBuf::from(r"C:\A"));
    }

    #[test]
    fn missing_installation_path() {
        let err = parse_installation_path("instanceId: 1\n").expect_err("Parsing should fail");
        assert!(matches!(err, ToolchainError::MissingInstallationPath));

        let err = parse_installation_path("").expect_err("Parsing should fail");
        assert!(matches!(err, ToolchainError::MissingInstallationPath));
    }

    #[test]
    fn short_installation_path() {
        for output in ["installationPath", "installationPath: ", "installationPath: \r\n"] {
            let err = parse_installation_path(output).expect_err("Parsing should fail");
            assert!(
                matches!(err, ToolchainError::MalformedInstallationPath(_)),
                "output = {output:?}"
            );
        }
    }

    #[test]
    fn arch_mapping() {
        assert_eq!(TargetArch::X64.vcvars_script(), "vcvars64.bat");
        assert_eq!(TargetArch::X64.machine(), "x64");
        assert_eq!(TargetArch::X86.vcvars_script(), "vcvars32.bat");
        assert_eq!(TargetArch::X86.machine(), "x86");
        assert_eq!(TargetArch::X64.to_string(), "x64");
    }

    #[test]
    fn librarian_command_line() {
        let runner = FakeRunner::new([]);
        let toolchain = Toolchain::new(&runner, PathBuf::from("vswhere.exe"), TargetArch::X64);
        let cmd = toolchain.librarian_command(
            Path::new(r"C:\VS"),
            Path::new("mylib.def"),
            Path::new("mylib.lib"),
        );

        assert!(cmd.is_verbatim());
        assert_eq!(
            cmd.to_string(),
            r#"cmd.exe /q /c "call "C:\VS\VC\Auxiliary\Build\vcvars64.bat" && lib /DEF:"mylib.def" /OUT:"mylib.lib" /MACHINE:x64""#
        );
    }

    #[test]
    fn librarian_command_line_with_spaces() {
        let runner = FakeRunner::new([]);
        let toolchain = Toolchain::new(&runner, PathBuf::from("vswhere.exe"), TargetArch::X64);
        let cmd = toolchain.librarian_command(
            Path::new(r"C:\Program Files\Microsoft Visual Studio\2022\Community"),
            Path::new(r"C:\Users\Jane Doe\build\go.def"),
            Path::new(r"C:\Users\Jane Doe\build\go.lib"),
        );

        assert_eq!(
            cmd.to_string(),
            r#"cmd.exe /q /c "call "C:\Program Files\Microsoft Visual Studio\2022\Community\VC\Auxiliary\Build\vcvars64.bat" && lib /DEF:"C:\Users\Jane Doe\build\go.def" /OUT:"C:\Users\Jane Doe\build\go.lib" /MACHINE:x64""#
        );
    }

    #[test]
    fn locate_then_librarian() {
        let runner = FakeRunner::new([CommandOutput::from_stdout(VSWHERE_OUTPUT)]);
        let toolchain = Toolchain::new(&runner, PathBuf::from("vswhere.exe"), TargetArch::X86);
        toolchain
            .build_import_library(Path::new("go.def"), Path::new("go.lib"))
            .expect("Could not build import library");

        let seen = runner.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].program(), "vswhere.exe");
        assert_eq!(seen[1].program(), "cmd.exe");
        assert!(seen[1].to_string().ends_with("/MACHINE:x86\""));
    }

    #[test]
    fn librarian_failure() {
        let runner = FakeRunner::new([
            CommandOutput::from_stdout(VSWHERE_OUTPUT),
            CommandOutput {
                status: Some(1),
                stdout: "go.def : fatal error LNK1104: cannot open file\r\n".into(),
                stderr: String::new(),
            },
        ]);
        let toolchain = Toolchain::new(&runner, PathBuf::from("vswhere.exe"), TargetArch::X64);
        let err = toolchain
            .build_import_library(Path::new("go.def"), Path::new("go.lib"))
            .expect_err("Librarian should fail");

        match err {
            ToolchainError::Librarian {
                source: CommandError::Failed { output, .. },
                ..
            } => {
                assert_eq!(output, "go.def : fatal error LNK1104: cannot open file");
            }
            o => panic!("Incorrect toolchain error variant: {o:#?}"),
        }
    }

    #[test]
    fn locator_failure() {
        let runner = FakeRunner::new([CommandOutput {
            status: Some(87),
            ..Default::default()
        }]);
        let toolchain = Toolchain::new(&runner, PathBuf::from("vswhere.exe"), TargetArch::X64);
        let err = toolchain.locate_msvc().expect_err("Locating should fail");
        assert!(matches!(err, ToolchainError::Locate(_)));
        assert_eq!(runner.seen.borrow().len(), 1);
    }
}
