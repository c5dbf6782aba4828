use std::{io::Write, sync::Mutex};

use clap::ValueEnum;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Log level message strings.
///
/// The log crate sets these to all uppercase letters which is great for doing
/// more general purpose logging in bulk but lowercase letters look nicer in
/// a console window.
const LEVEL_NAMES: [&str; 6] = ["", "error:", "warning:", "info:", "debug:", "trace:"];

const LEVEL_COLORS: [Option<Color>; 6] = [
    None,
    Some(Color::Red),
    Some(Color::Yellow),
    Some(Color::Green),
    Some(Color::White),
    Some(Color::Blue),
];

/// Separator to use for multiline log messages
const NEWLINE_SEPARATOR: &str = "\n>>> ";

/// The main cli logger implementation
pub struct Logger {
    /// Colored stderr writer
    stderr: BufferWriter,

    /// Maximum log level
    max_level: log::Level,

    /// String to prepend to the log message
    ///
    /// This is used for adding an extra newline separator between multiline
    /// log messages.
    prepend: Mutex<&'static str>,
}

impl Logger {
    /// Creates a new logger with the specified options
    pub fn new(max_level: log::Level, colors: ColorOption) -> Self {
        let choice = if should_use_colors(colors) {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };

        Self {
            stderr: BufferWriter::stderr(choice),
            max_level,
            prepend: Mutex::new(""),
        }
    }

    fn write_record(&self, record: &log::Record, prepend: &str) -> std::io::Result<bool> {
        let msg = record.args().to_string();
        let msg_len = msg.len();
        let msg = msg.replace('\n', NEWLINE_SEPARATOR);
        let is_multiline = msg.len() != msg_len;

        let level = record.level() as usize;
        let mut buffer = self.stderr.buffer();
        write!(buffer, "{prepend}{CARGO_PKG_NAME}: ")?;
        buffer.set_color(ColorSpec::new().set_fg(LEVEL_COLORS[level].clone()).set_bold(true))?;
        write!(buffer, "{}", LEVEL_NAMES[level])?;
        buffer.reset()?;
        writeln!(buffer, " {msg}")?;

        self.stderr.print(&buffer)?;
        Ok(is_multiline)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let Ok(mut prepend) = self.prepend.lock() else {
            return;
        };

        // Nothing sensible to do if stderr is gone.
        if let Ok(true) = self.write_record(record, *prepend) {
            *prepend = "\n";
        }
    }

    fn flush(&self) {}
}

/// Color options for the logger
#[derive(ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorOption {
    /// Automatically use colors depending on the environment
    #[value(name = "auto")]
    #[default]
    Auto,

    /// Always use colors
    #[value(name = "always")]
    Always,

    /// Never use colors
    #[value(name = "never")]
    Never,
}

impl std::fmt::Display for ColorOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(v) = self.to_possible_value() {
            write!(f, "{}", v.get_name())?;
        }

        Ok(())
    }
}

pub fn init(max_level: log::Level, colors: ColorOption) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger::new(max_level, colors)))
        .map(|()| log::set_max_level(max_level.to_level_filter()))
}

/// Returns `true` if colors should be used in log messages given the specified
/// color option and environment variable values.
fn should_use_colors(color: ColorOption) -> bool {
    match color {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            if have_nocolor_env() || is_dumb_term() {
                false
            } else if have_clicolor_force() {
                true
            } else if clicolor().is_none_or(|v| v) {
                std::io::IsTerminal::is_terminal(&std::io::stderr())
            } else {
                false
            }
        }
    }
}

/// Returns `true` if the `NO_COLOR` environment variable is set to a non-empty
/// value that is not 0.
///
/// Used for following https://no-color.org/.
fn have_nocolor_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty() && v != "0")
}

/// Returns `true` if `TERM` is set to `dumb`.
fn is_dumb_term() -> bool {
    std::env::var_os("TERM").is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// Returns `true` if the `CLICOLOR_FORCE` environment variable is set to a
/// non-empty value that is not 0.
///
/// Used for following https://bixense.com/clicolors/
fn have_clicolor_force() -> bool {
    std::env::var_os("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0")
}

/// Gets the `CLICOLOR` environment variable value.
///
/// - Returns `None` if not present.
/// - Returns `Some(true)` if present and set to a non-empty value other than 0.
/// - Returns `Some(false)` if present and set to 0 or is empty.
fn clicolor() -> Option<bool> {
    let clicolor = std::env::var_os("CLICOLOR")?;
    Some(!clicolor.is_empty() && clicolor != "0")
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::{ColorOption, should_use_colors};

    #[test]
    fn explicit_color_choice() {
        assert!(should_use_colors(ColorOption::Always));
        assert!(!should_use_colors(ColorOption::Never));
    }

    #[test]
    fn color_option_names() {
        let names = ColorOption::value_variants()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(names, ["auto", "always", "never"]);
        assert_eq!(ColorOption::from_str("NEVER", true), Ok(ColorOption::Never));
    }
}
