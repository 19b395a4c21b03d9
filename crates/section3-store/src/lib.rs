//! Storage layer: the persistence port plus in-memory and DuckDB backends.

mod error;
mod memory;
mod port;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use port::{ComplianceStore, StoredContract};

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;
