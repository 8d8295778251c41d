//! Domain core for the localization backend.
//!
//! Pure logic with no database dependency: shared types, the error taxonomy,
//! search predicate composition, export aggregation and input validation.

pub mod error;
pub mod export;
pub mod search;
pub mod types;
pub mod validation;
