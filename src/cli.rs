use std::{
    collections::{HashSet, VecDeque},
    ffi::OsString,
    path::PathBuf,
};

use anyhow::{Context, bail};
use clap::ValueEnum;

use crate::{
    inputs::FileSet, logging::ColorOption, outputs::OutputOption, pipeline::BuildOptions,
    toolchain::TargetArch,
};

const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const CARGO_PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
const CARGO_PKG_REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");
const GIT_SHORT_HASH: Option<&str> = option_env!("GIT_SHORT_HASH");

fn fmt_help(out: impl FnOnce(std::fmt::Arguments)) {
    const HELP_USAGE: &str = "[options] [files...]";
    const HELP_ARGUMENTS: &str = r#"
  files...                   Go source files to build
"#;

    const HELP_OPTIONS: &str = r#"
  -f <files>, --files=<files>
                             Go source files separated by commas, semicolons or spaces [aliases: -files]
  -o <name>, --output=<name> Name of the output DLL [default: go.dll] [aliases: -out, --out, -output]
  --out-dir=<dir>            Directory to write the build artifacts to [default: .]
  --machine=<arch>           Target architecture [default: host] [possible values: x64, x86]
  --go=<path>                Go executable [default: go]
  --vswhere=<path>           vswhere executable [default: %ProgramFiles(x86)%\Microsoft Visual Studio\Installer\vswhere.exe]
  --verify-implib            Check the import library for every export (default)
    --no-verify-implib
  --color-diagnostics[=<color>]
                             Use colors in diagnostic messages [default: auto] [possible values: auto, always, never]
  --print-timing             Print timing information
  -v, --verbose...           Increase logging verbosity
  -h, --help                 Print help and exit
  -V, --version              Print version and exit
"#;

    let argv0 = std::env::args_os().next();

    let prog = argv0
        .as_ref()
        .map(|arg| arg.to_string_lossy())
        .unwrap_or_else(|| CARGO_PKG_NAME.into());

    out(format_args!(
        "{CARGO_PKG_DESCRIPTION}\n\
        Usage: {prog} {HELP_USAGE}\n\n\
        Arguments:\n\
        {arguments}\n\n\
        Options:\n\
        {options}\n\n\
        Issues can be reported on Github: {CARGO_PKG_REPOSITORY}/issues",
        arguments = HELP_ARGUMENTS.trim_matches('\n'),
        options = HELP_OPTIONS.trim_matches('\n'),
    ));
}

/// Dash prefixes accepted for an option name. Single letter names take both.
const DASH_PREFIXES: [&str; 2] = ["--", "-"];

fn flag_opt(name: &str) -> impl for<'a> FnOnce(&'a str) -> bool {
    move |arg| {
        DASH_PREFIXES
            .iter()
            .any(|dashes| arg.strip_prefix(dashes) == Some(name))
    }
}

fn long_opt(name: &str) -> impl for<'a> FnOnce(&'a str) -> bool {
    move |arg| arg.strip_prefix("--").is_some_and(|arg| arg == name)
}

fn long_bool(name: &str) -> impl for<'a> FnOnce(&'a str) -> Option<bool> {
    move |arg| {
        arg.strip_prefix("--").and_then(|arg| {
            if arg == name {
                Some(true)
            } else if arg.strip_prefix("no-").is_some_and(|arg| arg == name) {
                Some(false)
            } else {
                None
            }
        })
    }
}

fn opt_val<P>(name: &str) -> impl for<'a> FnOnce(&'a str, P) -> Option<anyhow::Result<String>>
where
    P: Iterator,
    <P as Iterator>::Item: Into<OsString>,
{
    move |arg, mut it| {
        for dashes in DASH_PREFIXES {
            let Some(rest) = arg.strip_prefix(dashes) else {
                continue;
            };

            if rest == name {
                return Some(
                    it.next()
                        .map(|v| Into::<OsString>::into(v).to_string_lossy().into_owned())
                        .with_context(|| report_missing_value(arg)),
                );
            } else if let Some((flag, val)) = rest.split_once('=')
                && flag == name
            {
                return Some(Ok(val.to_owned()));
            }
        }

        None
    }
}

fn anyval<P>(names: &[&str]) -> impl for<'a> FnOnce(&'a str, P) -> Option<anyhow::Result<String>>
where
    P: Iterator,
    <P as Iterator>::Item: Into<OsString>,
{
    move |arg, mut it| {
        names
            .iter()
            .find_map(|name| opt_val(name)(arg, it.by_ref()))
    }
}

fn anyopt(short_: char, long_: &str) -> impl for<'a> FnOnce(&'a str) -> bool {
    move |arg| {
        arg.strip_prefix('-')
            .is_some_and(|arg| arg.len() == 1 && arg.starts_with(short_))
            || flag_opt(long_)(arg)
    }
}

fn report_missing_value(arg: &str) -> String {
    format!("missing argument value for '{arg}'")
}

#[derive(Debug, Default)]
pub struct CliArgs {
    pub files: FileSet,
    pub output: OutputOption,
    pub options: CliOptions,

    /// A `--` argument was seen. Every following argument is a file.
    files_only: bool,
}

impl CliArgs {
    pub fn try_update_from<I, T>(&mut self, mut arg_iter: I) -> anyhow::Result<()>
    where
        I: Iterator<Item = T>,
        T: Into<OsString>,
    {
        while let Some(arg) = arg_iter.next()
            && !self.options.help
            && !self.options.version
        {
            let arg: OsString = arg.into();
            let arg = arg.to_string_lossy();

            if self.try_update_inputs_from(&arg, arg_iter.by_ref())?
                || self.options.try_update_from(&arg, arg_iter.by_ref())?
            {
            } else {
                bail!("unknown argument: {arg}");
            }
        }

        Ok(())
    }

    fn try_update_inputs_from<I>(&mut self, arg: &str, mut it: I) -> anyhow::Result<bool>
    where
        I: Iterator,
        <I as Iterator>::Item: Into<OsString>,
    {
        let mut anyval = |names| anyval(names)(arg, it.by_ref());

        if self.files_only || !arg.starts_with('-') || arg == "-" {
            self.files.push(arg);
        } else if arg == "--" {
            self.files_only = true;
        } else if let Some(v) = anyval(&["f", "files"]) {
            self.files.extend_from_list(&v?);
        } else if let Some(v) = anyval(&["o", "out", "output"]) {
            self.output.set(v?)?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }
}

#[derive(Debug)]
pub struct CliOptions {
    pub color_diagnostics: ColorOption,
    pub go: Option<PathBuf>,
    pub machine: Option<TargetArch>,
    pub out_dir: Option<PathBuf>,
    pub print_timing: bool,
    pub verify_implib: bool,
    pub vswhere: Option<PathBuf>,
    pub verbose: usize,
    pub help: bool,
    pub version: bool,
}

impl std::default::Default for CliOptions {
    fn default() -> Self {
        Self {
            color_diagnostics: ColorOption::Auto,
            go: None,
            machine: None,
            out_dir: None,
            print_timing: false,
            verify_implib: true,
            vswhere: None,
            verbose: 0,
            help: false,
            version: false,
        }
    }
}

impl CliOptions {
    fn try_update_from<I>(&mut self, arg: &str, mut it: I) -> anyhow::Result<bool>
    where
        I: Iterator,
        <I as Iterator>::Item: Into<OsString>,
    {
        let long_bool = |s| long_bool(s)(arg);
        let long_opt = |s| long_opt(s)(arg);
        let flag_opt = |s| flag_opt(s)(arg);
        let anyopt = |c, s| anyopt(c, s)(arg);
        let mut anyval = |names| anyval(names)(arg, it.by_ref());

        if long_opt("color-diagnostics") {
            self.color_diagnostics = ColorOption::Auto;
        } else if let Some(v) = arg.strip_prefix("--color-diagnostics=") {
            self.color_diagnostics = ColorOption::from_str(v, true)
                .ok()
                .with_context(|| format!("unknown '--color-diagnostics' value: {v}"))?;
        } else if let Some(v) = anyval(&["go"]) {
            self.go = Some(v?.into());
        } else if let Some(v) = anyval(&["machine"]) {
            let v = v?;
            self.machine = Some(
                TargetArch::from_str(&v, true)
                    .ok()
                    .with_context(|| format!("unknown '--machine' value: {v}"))?,
            );
        } else if let Some(v) = anyval(&["out-dir"]) {
            self.out_dir = Some(v?.into());
        } else if flag_opt("print-timing") {
            self.print_timing = true;
        } else if let Some(v) = long_bool("verify-implib") {
            self.verify_implib = v;
        } else if let Some(v) = anyval(&["vswhere"]) {
            self.vswhere = Some(v?.into());
        } else if anyopt('v', "verbose") {
            self.verbose = self.verbose.saturating_add(1);
        } else if let Some(vs) = arg.strip_prefix("-v")
            && !vs.is_empty()
            && vs.chars().all(|v| v == 'v')
        {
            self.verbose = self.verbose.saturating_add(vs.len()).saturating_add(1);
        } else if anyopt('h', "help") {
            self.help = true;
        } else if anyopt('V', "version") {
            self.version = true;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    /// Returns the build settings for these options.
    pub fn build_options(&self) -> BuildOptions {
        let mut options = BuildOptions::default();

        if let Some(out_dir) = &self.out_dir {
            options.out_dir = out_dir.clone();
        }

        if let Some(machine) = self.machine {
            options.arch = machine;
        }

        if let Some(go) = &self.go {
            options.go = go.clone();
        }

        if let Some(vswhere) = &self.vswhere {
            options.vswhere = vswhere.clone();
        }

        options.verify_implib = self.verify_implib;
        options
    }
}

pub fn print_help() {
    fmt_help(|fmt| {
        println!("{fmt}");
    });
}

fn fmt_version(out: impl FnOnce(std::fmt::Arguments)) {
    if let Some(githash) = GIT_SHORT_HASH {
        out(format_args!(
            "{CARGO_PKG_NAME} version {CARGO_PKG_VERSION} ({githash})"
        ));
    } else {
        out(format_args!("{CARGO_PKG_NAME} version {CARGO_PKG_VERSION}"));
    }
}

pub fn print_version() {
    fmt_version(|fmt| {
        println!("{fmt}");
    });
}

pub fn log_cmdline(args: &[OsString]) {
    fmt_version(|fmt| {
        log::info!("{fmt}");
    });

    let args = args.iter().map(|s| s.to_string_lossy()).collect::<Vec<_>>();
    log::info!("command line: {}", args.join(" "));
}

pub fn expand_response_files(cmdline: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut expanded = Vec::new();

    let mut args =
        VecDeque::from_iter(cmdline.map(|arg| argfile::Argument::parse(arg, argfile::PREFIX)));

    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack = Vec::new();
    loop {
        let Some(arg) = args.pop_front() else {
            match stack.pop() {
                Some(parent) => {
                    args = parent;
                    continue;
                }
                None => break,
            }
        };

        match arg {
            argfile::Argument::PassThrough(arg) => {
                expanded.push(arg);
            }
            argfile::Argument::Path(path) => {
                if !visited.insert(path.clone()) {
                    continue;
                }

                let Ok(content) = std::fs::read_to_string(&path) else {
                    args.push_front(argfile::Argument::PassThrough(
                        format!("@{}", path.to_string_lossy()).into(),
                    ));
                    continue;
                };

                stack.push(std::mem::take(&mut args));
                args.extend(argfile::parse_fromfile(&content, argfile::PREFIX));
            }
        }
    }

    expanded
}
