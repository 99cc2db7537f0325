pub mod entity;
pub mod errors;
pub mod status;
pub mod validation;

pub use entity::{generate_id, Entity};
pub use errors::{CollectionError, CollectionResult};
pub use status::{StatusMachine, TransitionPolicy};
pub use validation::{FieldError, Validate, ValidationErrors};
