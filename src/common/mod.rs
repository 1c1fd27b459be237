//! Shared types, parsing helpers, errors and collaborator traits

pub mod errors;
pub mod price;
pub mod traits;
pub mod types;
