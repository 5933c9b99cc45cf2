//! Movie field rules.

use chrono::Datelike;

use crate::validation::{ValidationErrors, Validator};

/// Year of the earliest surviving motion picture.
pub const MIN_YEAR: i32 = 1888;

/// Maximum title length in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

pub const MIN_GENRES: usize = 1;
pub const MAX_GENRES: usize = 5;

/// Borrowed view of the client-controlled movie fields.
///
/// `id`, `created_at` and `version` are assigned by the store and never
/// validated here.
#[derive(Debug, Clone, Copy)]
pub struct MovieDraft<'a> {
    pub title: &'a str,
    pub year: i32,
    pub runtime: i32,
    pub genres: &'a [String],
}

/// Validate a movie against the current calendar year (UTC).
pub fn validate_movie(draft: MovieDraft<'_>) -> Result<(), ValidationErrors> {
    validate_movie_in_year(draft, chrono::Utc::now().year())
}

/// Validate a movie with an explicit upper bound for `year`.
pub fn validate_movie_in_year(
    draft: MovieDraft<'_>,
    current_year: i32,
) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();

    if v.non_empty("title", draft.title) {
        v.max_length("title", draft.title, MAX_TITLE_BYTES);
    }

    v.between("year", draft.year, MIN_YEAR, current_year);
    v.positive("runtime", i64::from(draft.runtime));

    let count = draft.genres.len();
    v.check(
        count >= MIN_GENRES,
        "genres",
        "min_count",
        format!("must contain at least {MIN_GENRES} genre"),
    );
    v.check(
        count <= MAX_GENRES,
        "genres",
        "max_count",
        format!("must not contain more than {MAX_GENRES} genres"),
    );
    v.unique_members("genres", draft.genres);

    v.finish()
}
