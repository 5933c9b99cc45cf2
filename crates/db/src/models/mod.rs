//! Row models and DTOs.

pub mod movie;
