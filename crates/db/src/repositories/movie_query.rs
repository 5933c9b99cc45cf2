//! SQL construction for movie listings.
//!
//! Client values are always bound as parameters. The only text spliced into
//! a statement is the ORDER BY fragment, and that comes from the static
//! strings of a [`SortKey`], which can only be obtained from the safelist.
//! Every ordering is total, so paging never skips or repeats a row.
//!
//! Parameter order for both statements: `$1` title term, `$2` genres,
//! then `$3` limit and `$4` offset for the page query.

use marquee_core::filters::{SortColumn, SortKey};

/// Column list shared across queries to avoid repetition.
pub const COLUMNS: &str = "id, created_at, title, year, runtime, genres, version";

/// Title and genre predicate. An empty term or empty genre list matches all rows.
const FILTER_PREDICATE: &str = "\
    ($1::text = '' OR to_tsvector('simple', title) @@ plainto_tsquery('simple', $1::text)) \
    AND (cardinality($2::text[]) = 0 OR genres @> $2::text[])";

/// ORDER BY body for a sort key. Non-id columns are tie-broken on ascending
/// id; an id sort is already total and gets no second key.
pub fn order_by(sort: SortKey) -> String {
    let column = sort.column().as_sql();
    let direction = sort.direction().as_sql();
    if sort.column() == SortColumn::Id {
        format!("{column} {direction}")
    } else {
        format!("{column} {direction}, id ASC")
    }
}

/// One page of movies plus the windowed count of every matching row.
pub fn page_query(sort: SortKey) -> String {
    format!(
        "SELECT count(*) OVER() AS total_records, {COLUMNS} \
         FROM movies \
         WHERE {FILTER_PREDICATE} \
         ORDER BY {order} \
         LIMIT $3 OFFSET $4",
        order = order_by(sort),
    )
}

/// Count of every matching row, for pages that fall past the end.
pub fn count_query() -> String {
    format!("SELECT count(*) FROM movies WHERE {FILTER_PREDICATE}")
}

#[cfg(test)]
mod tests {
    use marquee_core::filters::SORT_SAFELIST;

    use super::*;

    #[test]
    fn descending_year_breaks_ties_on_id() {
        let sort = SortKey::parse("-year").unwrap();
        assert_eq!(order_by(sort), "year DESC, id ASC");
    }

    #[test]
    fn id_sort_has_no_redundant_tie_break() {
        assert_eq!(order_by(SortKey::parse("id").unwrap()), "id ASC");
        assert_eq!(order_by(SortKey::parse("-id").unwrap()), "id DESC");
    }

    #[test]
    fn page_query_binds_every_client_value() {
        for (_, sort) in SORT_SAFELIST {
            let sql = page_query(*sort);
            assert!(sql.contains("count(*) OVER() AS total_records"));
            assert!(sql.contains("LIMIT $3 OFFSET $4"));
            assert!(sql.contains(&format!("ORDER BY {}", order_by(*sort))));
        }
    }

    #[test]
    fn count_query_shares_the_page_predicate() {
        let page = page_query(SortKey::default());
        let count = count_query();
        assert!(page.contains(FILTER_PREDICATE));
        assert!(count.contains(FILTER_PREDICATE));
        assert!(!count.contains("$3"));
    }
}
