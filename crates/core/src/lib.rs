//! Marquee domain core.
//!
//! Pure logic shared by the store and the HTTP layer: identifiers, the error
//! taxonomy, field validation, listing filters and pagination metadata.
//! Nothing in this crate performs I/O.

pub mod error;
pub mod filters;
pub mod movie;
pub mod pagination;
pub mod types;
pub mod validation;
