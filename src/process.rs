//! External process invocation.
//!
//! Every tool the build runs goes through a [`CommandRunner`] so that the
//! build pipeline can be driven without the real toolchain present.

use std::{
    ffi::{OsStr, OsString},
    process::Command,
};

use crate::error::CommandError;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,

    /// Pass the arguments to the program without quoting.
    ///
    /// Only has an effect on Windows where `cmd.exe` does its own argument
    /// parsing.
    verbatim: bool,
}

impl CommandLine {
    pub fn new(program: impl AsRef<OsStr>) -> CommandLine {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            verbatim: false,
        }
    }

    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut CommandLine {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I>(&mut self, args: I) -> &mut CommandLine
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    pub fn verbatim(&mut self, verbatim: bool) -> &mut CommandLine {
        self.verbatim = verbatim;
        self
    }

    #[inline]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    #[inline]
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }

    /// Returns the file name of the program for diagnostics.
    pub fn program_name(&self) -> String {
        std::path::Path::new(&self.program)
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program.to_string_lossy())?;
        self.args
            .iter()
            .try_for_each(|arg| write!(f, " {}", arg.to_string_lossy()))
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code. `None` if the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Returns a successful output with the specified stdout text.
    pub fn from_stdout(stdout: impl Into<String>) -> CommandOutput {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[inline]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Returns the text to show the user when the process failed.
    ///
    /// This is stderr if anything was written to it. Some tools such as
    /// `lib.exe` report errors on stdout instead.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Capability to run an external command to completion.
pub trait CommandRunner {
    /// Runs the command and waits for it to exit.
    ///
    /// Only failing to start or wait on the process is an error here. A
    /// non-zero exit status is reported through [`CommandOutput::status`].
    fn run(&self, command: &CommandLine) -> std::io::Result<CommandOutput>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> std::io::Result<CommandOutput> {
        let mut cmd = Command::new(command.program());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;

            if command.is_verbatim() {
                for arg in command.get_args() {
                    cmd.raw_arg(arg);
                }
            } else {
                cmd.args(command.get_args());
            }
        }

        #[cfg(not(windows))]
        cmd.args(command.get_args());

        let output = cmd.output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `command` and fails if it could not be started or did not exit
/// successfully.
pub fn run_checked(
    runner: &dyn CommandRunner,
    command: &CommandLine,
) -> Result<CommandOutput, CommandError> {
    log::debug!("running {command}");

    let output = runner.run(command).map_err(|error| CommandError::Spawn {
        program: command.program_name(),
        error,
    })?;

    if !output.success() {
        return Err(CommandError::Failed {
            program: command.program_name(),
            status: output.status,
            output: output.diagnostics().to_owned(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{CommandLine, CommandOutput, CommandRunner, run_checked};
    use crate::error::CommandError;

    struct StaticRunner {
        output: std::io::Result<CommandOutput>,
        seen: RefCell<Vec<CommandLine>>,
    }

    impl CommandRunner for StaticRunner {
        fn run(&self, command: &CommandLine) -> std::io::Result<CommandOutput> {
            self.seen.borrow_mut().push(command.clone());
            match &self.output {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(std::io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn command_line_display() {
        let mut cmd = CommandLine::new("go");
        cmd.args(["build", "-buildmode=c-shared"]).arg("a.go");
        assert_eq!(cmd.to_string(), "go build -buildmode=c-shared a.go");
    }

    #[test]
    fn program_name() {
        let cmd = CommandLine::new("/usr/local/go/bin/go");
        assert_eq!(cmd.program_name(), "go");
    }

    #[test]
    fn diagnostics_prefers_stderr() {
        let output = CommandOutput {
            status: Some(1),
            stdout: "noise\n".into(),
            stderr: "  broken\n".into(),
        };
        assert_eq!(output.diagnostics(), "broken");

        let output = CommandOutput {
            status: Some(1),
            stdout: "LINK : fatal error\r\n".into(),
            stderr: String::new(),
        };
        assert_eq!(output.diagnostics(), "LINK : fatal error");
    }

    #[test]
    fn failed_status() {
        let runner = StaticRunner {
            output: Ok(CommandOutput {
                status: Some(2),
                stdout: String::new(),
                stderr: "bad flag".into(),
            }),
            seen: RefCell::new(Vec::new()),
        };

        let err = run_checked(&runner, &CommandLine::new("go")).expect_err("Command should fail");
        match err {
            CommandError::Failed {
                program,
                status,
                output,
            } => {
                assert_eq!(program, "go");
                assert_eq!(status, Some(2));
                assert_eq!(output, "bad flag");
            }
            o => panic!("Incorrect command error variant: {o:#?}"),
        }
        assert_eq!(runner.seen.borrow().len(), 1);
    }

    #[test]
    fn spawn_failure() {
        let runner = StaticRunner {
            output: Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found")),
            seen: RefCell::new(Vec::new()),
        };

        let err = run_checked(&runner, &CommandLine::new("go")).expect_err("Command should fail");
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
