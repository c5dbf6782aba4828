use std::process::ExitCode;

use anyhow::Result;

use godll::{
    cli::{self, CliArgs, CliOptions},
    pipeline::Pipeline,
    process::SystemRunner,
    timing::DurationExt,
};

/// cli entrypoint
fn main() -> ExitCode {
    let mut args = CliArgs::default();
    let cmdline = cli::expand_response_files(std::env::args_os());
    let res = args.try_update_from(cmdline.iter().skip(1).cloned());
    setup_logging(&args.options);

    if args.options.verbose >= 1 {
        cli::log_cmdline(&cmdline);
    }

    if args.options.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    } else if args.options.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    if let Err(e) = res {
        log::error!("{e:#}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = try_main(args) {
        log::error!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main(args: CliArgs) -> Result<()> {
    let output = args.output.get();
    let mut pipeline = Pipeline::new(&SystemRunner, args.options.build_options());

    let result = pipeline.run(&args.files, &output);

    if args.options.print_timing {
        for (stage, elapsed) in pipeline.timings().iter() {
            log::info!("{stage} time: {:.2}", elapsed.display());
        }
        log::info!("build time: {:.2}", pipeline.timings().total().display());
    }

    let artifacts = result?;
    log::debug!(
        "built {} with {} export(s)",
        artifacts.dll_path.display(),
        artifacts.exports.len()
    );

    Ok(())
}

fn setup_logging(options: &CliOptions) {
    let mut max_level = log::Level::Info;
    if options.verbose >= 2 {
        max_level = log::Level::Trace;
    } else if options.verbose >= 1 {
        max_level = log::Level::Debug;
    }

    godll::logging::init(max_level, options.color_diagnostics)
        .expect("logging should only be initialized once");
}
