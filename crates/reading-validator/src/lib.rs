//! Reading Validation
//!
//! Input-boundary checks for usage and pH submissions. Nothing that fails
//! here is ever appended to a store.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, Validator};
