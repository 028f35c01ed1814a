use anyhow::Result;
use clap::Parser;

use oci_translator::cli::commands::{self, config, serve};
use oci_translator::cli::{Args, Command, SettingsArgs};
use oci_translator::config::ResolvedConfig;
use oci_translator::logging;
use oci_translator::translation::print_languages;
use oci_translator::ui::Style;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Config) => {
            let resolved = resolve_or_exit(&args.settings);
            config::print_config(&resolved);
        }
        Some(Command::Serve) | None => {
            let resolved = resolve_or_exit(&args.settings);
            serve::run_serve(resolved).await?;
        }
    }

    Ok(())
}

/// Configuration problems exit with `EX_CONFIG` rather than a generic failure.
fn resolve_or_exit(settings: &SettingsArgs) -> ResolvedConfig {
    match commands::load_config(settings) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{} {e:#}", Style::error("Error:"));
            std::process::exit(exitcode::CONFIG);
        }
    }
}
