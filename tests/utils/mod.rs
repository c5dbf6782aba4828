#![allow(unused)]

use std::{cell::RefCell, io::Write};

use godll::process::{CommandLine, CommandOutput, CommandRunner};

pub mod testfs;

pub const VSWHERE_OUTPUT: &str = "instanceId: 0f1d2e3c\r\n\
    installationName: VisualStudio/17.9.0\r\n\
    installationPath: C:\\Program Files\\Microsoft Visual Studio\\2022\\Community\r\n\
    installationVersion: 17.9.34607.119\r\n";

/// Which tool a recorded command line ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Vswhere,
    Librarian,
    Go,
}

impl Tool {
    pub fn of(command: &CommandLine) -> Tool {
        match command.program_name().as_str() {
            "cmd.exe" => Tool::Librarian,
            "vswhere.exe" => Tool::Vswhere,
            _ => Tool::Go,
        }
    }
}

/// Command runner that records every command and answers with canned output.
pub struct RecordingRunner {
    pub commands: RefCell<Vec<CommandLine>>,
    pub vswhere: CommandOutput,
    pub librarian: CommandOutput,
    pub go: CommandOutput,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            vswhere: CommandOutput::from_stdout(VSWHERE_OUTPUT),
            librarian: CommandOutput::from_stdout(""),
            go: CommandOutput::from_stdout(""),
        }
    }
}

impl RecordingRunner {
    pub fn tools(&self) -> Vec<Tool> {
        self.commands.borrow().iter().map(Tool::of).collect()
    }

    /// Returns the recorded command line for `tool` as a string.
    pub fn command(&self, tool: Tool) -> Option<String> {
        self.commands
            .borrow()
            .iter()
            .find(|command| Tool::of(command) == tool)
            .map(ToString::to_string)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandLine) -> std::io::Result<CommandOutput> {
        self.commands.borrow_mut().push(command.clone());
        Ok(match Tool::of(command) {
            Tool::Vswhere => self.vswhere.clone(),
            Tool::Librarian => self.librarian.clone(),
            Tool::Go => self.go.clone(),
        })
    }
}

/// Builds an import library archive with a short import member for each
/// symbol.
pub fn import_library(dll: &str, symbols: &[&str]) -> Vec<u8> {
    let mut archive = b"!<arch>\n".to_vec();

    for symbol in symbols {
        let mut member = Vec::new();
        member.write_all(&0u16.to_le_bytes()).unwrap();
        member.write_all(&0xffffu16.to_le_bytes()).unwrap();
        member.write_all(&0u16.to_le_bytes()).unwrap();
        member.write_all(&0x8664u16.to_le_bytes()).unwrap();
        member.write_all(&0u32.to_le_bytes()).unwrap();
        member
            .write_all(&((symbol.len() + dll.len() + 2) as u32).to_le_bytes())
            .unwrap();
        member.write_all(&0u16.to_le_bytes()).unwrap();
        member.write_all(&(1u16 << 2).to_le_bytes()).unwrap();
        write!(member, "{symbol}\0{dll}\0").unwrap();

        write!(
            archive,
            "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
            format!("{dll}/"),
            0,
            0,
            0,
            0,
            member.len()
        )
        .unwrap();
        archive.extend_from_slice(&member);
        if member.len() % 2 != 0 {
            archive.push(b'\n');
        }
    }

    archive
}
