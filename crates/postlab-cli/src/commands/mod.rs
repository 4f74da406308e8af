//! Subcommand implementations

pub mod migrate;
pub mod serve;

pub use migrate::MigrateCommand;
pub use serve::ServeCommand;

use crate::{cli::Cli, error::CliResult};
use postlab_config::{ConfigLoader, PostlabConfig};

/// Effective configuration: file and environment, then command-line flags.
pub fn resolve_config(cli: &Cli) -> CliResult<PostlabConfig> {
    let mut config = ConfigLoader::new().load(cli.config.as_deref())?;

    if let Some(url) = &cli.db_url {
        config.database.url = url.clone();
    }
    if let Some(addr) = &cli.addr {
        config.server.addr = addr.clone();
    }

    config.validate()?;
    Ok(config)
}
