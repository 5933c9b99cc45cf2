//! Repository for the `movies` table.
//!
//! Updates use optimistic concurrency: the caller passes the version it last
//! read and the write only lands if that version is still current. No row
//! locks are held and nothing is retried here; on [`CoreError::EditConflict`]
//! the caller re-fetches and decides whether to try again.

use std::future::Future;
use std::time::Duration;

use marquee_core::error::CoreError;
use marquee_core::filters::{ListMoviesParams, MovieFilter};
use marquee_core::movie::validate_movie;
use marquee_core::pagination::{calculate_metadata, Metadata};
use marquee_core::types::DbId;
use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};
use crate::models::movie::{CreateMovie, Movie, MovieListRow};
use crate::repositories::movie_query::{count_query, page_query, COLUMNS};

const ENTITY: &str = "Movie";

/// Time budget for single-row statements.
pub const ROW_TIMEOUT: Duration = Duration::from_secs(3);

/// Time budget for listing statements.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(3);

/// Provides CRUD and listing operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Validate and insert a new movie. The store assigns `id`,
    /// `created_at` and `version = 1`.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> StoreResult<Movie> {
        validate_movie(input.draft())?;

        let query = format!(
            "INSERT INTO movies (title, year, runtime, genres)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let movie = bounded(
            "create",
            ROW_TIMEOUT,
            sqlx::query_as::<_, Movie>(&query)
                .bind(&input.title)
                .bind(input.year)
                .bind(input.runtime)
                .bind(&input.genres)
                .fetch_one(pool),
        )
        .await?;

        tracing::info!(id = movie.id, "Movie created");
        Ok(movie)
    }

    /// Find a movie by ID. Ids below 1 never match.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> StoreResult<Option<Movie>> {
        if id < 1 {
            return Ok(None);
        }

        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        bounded(
            "get",
            ROW_TIMEOUT,
            sqlx::query_as::<_, Movie>(&query)
                .bind(id)
                .fetch_optional(pool),
        )
        .await
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing row is an error.
    pub async fn get(pool: &PgPool, id: DbId) -> StoreResult<Movie> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(StoreError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }

    /// Conditionally write every mutable field of `movie`.
    ///
    /// The row must still carry `movie.version`; on success the returned
    /// movie has `version + 1`. If zero rows match (another writer got there
    /// first, or the row was deleted) the call fails with
    /// [`CoreError::EditConflict`] and nothing is changed.
    pub async fn update(pool: &PgPool, movie: &Movie) -> StoreResult<Movie> {
        validate_movie(movie.draft())?;

        let query = format!(
            "UPDATE movies SET
                title = $1,
                year = $2,
                runtime = $3,
                genres = $4,
                version = version + 1
             WHERE id = $5 AND version = $6
             RETURNING {COLUMNS}"
        );
        let updated = bounded(
            "update",
            ROW_TIMEOUT,
            sqlx::query_as::<_, Movie>(&query)
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .bind(movie.id)
                .bind(movie.version)
                .fetch_optional(pool),
        )
        .await?;

        match updated {
            Some(updated) => {
                tracing::info!(id = updated.id, version = updated.version, "Movie updated");
                Ok(updated)
            }
            None => {
                tracing::warn!(
                    id = movie.id,
                    expected_version = movie.version,
                    "Movie update lost optimistic-concurrency check"
                );
                Err(StoreError::Core(CoreError::EditConflict {
                    entity: ENTITY,
                    id: movie.id,
                    version: movie.version,
                }))
            }
        }
    }

    /// Permanently delete a movie by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> StoreResult<()> {
        if id < 1 {
            return Err(StoreError::Core(CoreError::NotFound { entity: ENTITY, id }));
        }

        let result = bounded(
            "delete",
            ROW_TIMEOUT,
            sqlx::query("DELETE FROM movies WHERE id = $1")
                .bind(id)
                .execute(pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Core(CoreError::NotFound { entity: ENTITY, id }));
        }

        tracing::info!(id, "Movie deleted");
        Ok(())
    }

    /// Validate raw listing parameters, then run [`list_filtered`](Self::list_filtered).
    pub async fn list(
        pool: &PgPool,
        params: &ListMoviesParams,
    ) -> StoreResult<(Vec<Movie>, Metadata)> {
        let filter = params.validate()?;
        Self::list_filtered(pool, &filter).await
    }

    /// Fetch one page of movies matching `filter` with its paging metadata.
    ///
    /// A page past the end yields no rows but still reports the true
    /// `total_records` and `last_page`.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &MovieFilter,
    ) -> StoreResult<(Vec<Movie>, Metadata)> {
        let query = page_query(filter.sort);
        let rows = bounded(
            "list",
            LIST_TIMEOUT,
            sqlx::query_as::<_, MovieListRow>(&query)
                .bind(&filter.title)
                .bind(&filter.genres)
                .bind(filter.limit())
                .bind(filter.offset())
                .fetch_all(pool),
        )
        .await?;

        let total_records = match rows.first() {
            Some(row) => row.total_records,
            None if filter.page > 1 => {
                let count_sql = count_query();
                bounded(
                    "count",
                    LIST_TIMEOUT,
                    sqlx::query_scalar::<_, i64>(&count_sql)
                        .bind(&filter.title)
                        .bind(&filter.genres)
                        .fetch_one(pool),
                )
                .await?
            }
            None => 0,
        };

        let metadata = calculate_metadata(total_records, filter.page, filter.page_size);
        let movies = rows.into_iter().map(|row| row.movie).collect();
        Ok((movies, metadata))
    }
}

/// Run a store future under a deadline, mapping expiry to [`StoreError::Timeout`].
///
/// Dropping the future on expiry cancels the statement. Each statement is a
/// single SQL command, so the row set is either fully changed or untouched.
async fn bounded<T, F>(operation: &'static str, after: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::error!(
                operation,
                timeout_ms = after.as_millis() as u64,
                "Store operation timed out"
            );
            Err(StoreError::Timeout { operation, after })
        }
    }
}
