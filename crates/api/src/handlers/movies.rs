//! Handlers for the `/movies` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marquee_core::filters::ListMoviesParams;
use marquee_core::types::DbId;
use marquee_db::models::movie::{CreateMovie, Movie, UpdateMovie};
use marquee_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, ListResponse, MessageResponse};
use crate::state::AppState;

/// Parse a path id. Anything that is not a positive integer cannot name a
/// row, so it is reported as not found.
fn parse_id(raw: &str) -> AppResult<DbId> {
    match raw.parse::<DbId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound(
            "the requested resource could not be found".to_string(),
        )),
    }
}

/// POST /api/v1/movies
pub async fn create(
    State(state): State<AppState>,
    input: Result<Json<CreateMovie>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    let movie = MovieRepo::create(&state.pool, &input).await?;
    let location = format!("/api/v1/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DataResponse { data: movie }),
    ))
}

/// GET /api/v1/movies
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> AppResult<Json<ListResponse<Movie>>> {
    let (records, metadata) = MovieRepo::list(&state.pool, &params).await?;
    Ok(Json(ListResponse { metadata, records }))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Movie>>> {
    let id = parse_id(&id)?;
    let movie = MovieRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// PATCH /api/v1/movies/{id}
///
/// The body must carry the `version` the client last read. The patch is
/// applied to the current row and written conditionally on that version.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    input: Result<Json<UpdateMovie>, JsonRejection>,
) -> AppResult<Json<DataResponse<Movie>>> {
    let id = parse_id(&id)?;
    let Json(input) = input?;
    let mut movie = MovieRepo::get(&state.pool, id).await?;
    movie.apply(input);
    let movie = MovieRepo::update(&state.pool, &movie).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    MovieRepo::delete(&state.pool, id).await?;
    Ok(Json(MessageResponse {
        message: "movie successfully deleted",
    }))
}
