mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use transcribe_runner::catalog::WhisperCatalog;
use transcribe_runner::config::Config;

fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr, so stdout carries only the result)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("transcribe_runner=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = Config::load(cli.config.as_deref())?;
            if !crate::commands::run_transcription(&config, &args, &WhisperCatalog)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Options => {
            crate::commands::show_options(&WhisperCatalog, &mut std::io::stdout().lock())
        }
        Commands::InitConfig { force } => {
            crate::commands::init_config(cli.config.as_deref(), force).map(|_| ())
        }
    }
}
