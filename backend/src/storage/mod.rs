//! # Storage Module
//!
//! Data persistence for the salon back-office. The domain layer depends only
//! on the traits in [`traits`]; two backends implement them:
//!
//! - **memory**: process-lifetime stores seeded from fixtures
//! - **csv**: one CSV file per collection plus YAML documents in a data directory
//!
//! Writes are atomic per operation (snapshot swap in memory, temp file plus
//! rename on disk).

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::{CsvConnection, CsvEntity, CsvRepository, YamlDocument};
pub use memory::{InMemoryDocument, InMemoryRepository};
pub use traits::{DocumentStorage, Repository};
