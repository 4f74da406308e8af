mod migrations;
mod rows;
mod store;
mod tx;

pub use migrations::MigrationRunner;
pub use store::SqlStore;
pub use tx::StoreTx;
