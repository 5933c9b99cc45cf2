//! Paging metadata for listing responses.

use serde::Serialize;

/// Metadata block returned alongside a page of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

/// Derive paging metadata from a total row count.
///
/// With no matching rows every field is zero. Otherwise `current_page` is
/// echoed back unclamped, so a page past the end reports the true
/// `last_page` alongside the requested page.
pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records <= 0 || page_size <= 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}
