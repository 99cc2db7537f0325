//! # Local Collection Manager
//!
//! The CRUD + filter pattern shared by every admin screen:
//!
//! ```text
//! Mutation (validated) -> new EntityStore snapshot -> FilterSet re-applied -> projections
//! ```
//!
//! - [`store`]: immutable ordered snapshot of one entity type
//! - [`filter`]: AND-combined date / category predicates
//! - [`gate`]: two-phase confirmation for deletes
//! - [`manager`]: serialized mutations over a storage-agnostic repository

pub mod filter;
pub mod gate;
pub mod manager;
pub mod store;

pub use filter::FilterSet;
pub use gate::ConfirmationGate;
pub use manager::CollectionManager;
pub use store::EntityStore;
