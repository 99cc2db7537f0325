//! # CSV Storage
//!
//! Human-readable file storage: one CSV file per collection and one YAML
//! file per configuration document, all in a single data directory.

pub mod connection;
pub mod records;
pub mod repository;
pub mod yaml_document;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use records::CsvEntity;
pub use repository::CsvRepository;
pub use yaml_document::YamlDocument;
