//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod movie_query;
pub mod movie_repo;

pub use movie_repo::MovieRepo;
