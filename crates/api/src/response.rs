//! Shared response envelope types for API handlers.

use marquee_core::pagination::Metadata;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Listing envelope: `{ "metadata": {...}, "records": [...] }`.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub metadata: Metadata,
    pub records: Vec<T>,
}

/// `{ "message": "..." }` acknowledgement for operations with no payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
