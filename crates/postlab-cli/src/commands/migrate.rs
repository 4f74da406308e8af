//! Database migration command

use crate::{error::CliResult, utils::ColoredOutput};
use postlab_store::SqlStore;
use tracing::info;

pub struct MigrateCommand;

impl MigrateCommand {
    pub async fn run(db_url: &str) -> CliResult<()> {
        info!(database_url = db_url, "initializing database");

        // Opening the store applies any pending migrations
        let store = SqlStore::new(db_url).await?;
        let collections = store.list_collections().await?.len();
        store.close().await;

        println!("{}", ColoredOutput::success("✓ Database initialized successfully"));
        println!("Database: {}", ColoredOutput::highlight(db_url));
        println!("Collections: {}", collections);

        Ok(())
    }
}
