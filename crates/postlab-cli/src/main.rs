//! Postlab CLI main entry point

use clap::Parser;
use postlab_cli::{
    cli::{Cli, Commands},
    commands::{resolve_config, MigrateCommand, ServeCommand},
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::info;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    // Disable colored output if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("Postlab CLI v{}", env!("CARGO_PKG_VERSION"));

    let config = resolve_config(&cli)?;
    match cli.command {
        Commands::Serve => ServeCommand::run(&config).await,
        Commands::Migrate => MigrateCommand::run(&config.database.url).await,
    }
}
