//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "postlab", about = "Postlab - save, send and replay HTTP requests", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (YAML or JSON)
    #[arg(long, short = 'c', env = "POSTLAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Database URL, overrides the configuration
    #[arg(long, global = true, help = "SQLite database URL, e.g. sqlite://./data/postlab.db")]
    pub db_url: Option<String>,

    /// Listen address, overrides the configuration
    #[arg(long, global = true)]
    pub addr: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve,
    /// Initialize database and run migrations
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "postlab",
            "serve",
            "--addr",
            "0.0.0.0:9090",
            "--db-url",
            "sqlite://./tmp.db",
            "-v",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Serve));
        assert_eq!(cli.addr.as_deref(), Some("0.0.0.0:9090"));
        assert_eq!(cli.db_url.as_deref(), Some("sqlite://./tmp.db"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_migrate_with_config() {
        let cli =
            Cli::try_parse_from(["postlab", "--config", "postlab.yaml", "migrate"]).unwrap();
        assert!(matches!(cli.command, Commands::Migrate));
        assert_eq!(cli.config, Some(PathBuf::from("postlab.yaml")));
        assert!(!cli.no_color);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["postlab"]).is_err());
        assert!(Cli::try_parse_from(["postlab", "launch"]).is_err());
    }
}
