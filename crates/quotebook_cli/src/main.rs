//! `quotebook` command-line entry point.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::CliArgs;
use commands::AppContext;
use output::Printer;
use quotebook_core::config::resolve_config_path;
use quotebook_core::{extract_folder_id, init_logging, QuotebookConfig};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = if args.config.is_some() {
        QuotebookConfig::load(&config_path)?
    } else {
        QuotebookConfig::load_or_default(&config_path)
    };
    config.apply_env();
    config.apply_overrides(args.root.clone(), args.folder.clone());

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    if let Some(log_dir) = args.log_dir.clone().or_else(|| config.logging.dir.clone()) {
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    log::info!(
        "event=cli_start module=cli status=ok version={}",
        quotebook_core::core_version()
    );

    let folder_input = config
        .storage
        .folder
        .clone()
        .ok_or("no folder configured; pass --folder or set QUOTEBOOK_FOLDER")?;
    let folder = extract_folder_id(&folder_input)
        .ok_or_else(|| format!("cannot read a folder id from `{folder_input}`"))?;

    let ctx = AppContext {
        config,
        folder,
        printer: Printer::new(args.json),
    };
    commands::run(&ctx, args.command)
}
