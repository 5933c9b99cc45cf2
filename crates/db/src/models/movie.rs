//! Movie entity model and DTOs.

use marquee_core::movie::MovieDraft;
use marquee_core::types::{DbId, Timestamp, Version};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: Version,
}

impl Movie {
    pub fn draft(&self) -> MovieDraft<'_> {
        MovieDraft {
            title: &self.title,
            year: self.year,
            runtime: self.runtime,
            genres: &self.genres,
        }
    }

    /// Overlay the supplied fields of `patch`, stamping the client's version.
    ///
    /// The stamped version is what the conditional write compares against,
    /// so a client that read an older row gets a conflict rather than
    /// overwriting newer data.
    pub fn apply(&mut self, patch: UpdateMovie) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(runtime) = patch.runtime {
            self.runtime = runtime;
        }
        if let Some(genres) = patch.genres {
            self.genres = genres;
        }
        self.version = patch.version;
    }
}

/// DTO for creating a new movie.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
}

impl CreateMovie {
    pub fn draft(&self) -> MovieDraft<'_> {
        MovieDraft {
            title: &self.title,
            year: self.year,
            runtime: self.runtime,
            genres: &self.genres,
        }
    }
}

/// DTO for a partial update. `version` is the version the client last read.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub version: Version,
}

/// A page-query row: the windowed total followed by the movie columns.
#[derive(Debug, FromRow)]
pub(crate) struct MovieListRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub movie: Movie,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: 1,
            created_at: chrono::Utc::now(),
            title: "Heat".into(),
            year: 1995,
            runtime: 170,
            genres: vec!["crime".into()],
            version: 4,
        }
    }

    #[test]
    fn apply_overlays_only_supplied_fields() {
        let mut m = movie();
        m.apply(UpdateMovie {
            title: None,
            year: None,
            runtime: Some(171),
            genres: None,
            version: 4,
        });
        assert_eq!(m.title, "Heat");
        assert_eq!(m.runtime, 171);
        assert_eq!(m.version, 4);
    }

    #[test]
    fn apply_stamps_the_clients_version() {
        let mut m = movie();
        m.apply(UpdateMovie {
            title: Some("Heat (1995)".into()),
            year: None,
            runtime: None,
            genres: None,
            version: 2,
        });
        assert_eq!(m.version, 2);
    }

    #[test]
    fn serializes_created_at_in_camel_case() {
        let json = serde_json::to_value(movie()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["genres"], serde_json::json!(["crime"]));
    }
}
