pub mod error;
pub mod sql_store;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use sql_store::{SqlStore, StoreTx};
