//! Listing filters and the sort-key safelist.
//!
//! [`ListMoviesParams`] is the raw, untrusted query-string payload.
//! [`ListMoviesParams::validate`] is the only way to obtain a
//! [`MovieFilter`], and the only place a sort token is checked against
//! [`SORT_SAFELIST`]. Downstream code builds SQL from a `MovieFilter`
//! without re-checking it.

use serde::Deserialize;

use crate::validation::{ValidationErrors, Validator};

pub const DEFAULT_PAGE: i64 = 1;
pub const MAX_PAGE: i64 = 10_000_000;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_SORT: &str = "id";

/// Sortable columns of the `movies` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => "title",
            SortColumn::Year => "year",
            SortColumn::Runtime => "runtime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// An approved column + direction pair.
///
/// Values only come from [`SORT_SAFELIST`], so the SQL fragments they
/// produce are always static strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    column: SortColumn,
    direction: SortDirection,
}

impl SortKey {
    const fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Look up a client token (`"year"`, `"-year"`, ...) in the safelist.
    pub fn parse(token: &str) -> Option<Self> {
        SORT_SAFELIST
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, key)| *key)
    }

    pub fn column(self) -> SortColumn {
        self.column
    }

    pub fn direction(self) -> SortDirection {
        self.direction
    }

    /// The safelist token this key was parsed from.
    pub fn token(self) -> &'static str {
        SORT_SAFELIST
            .iter()
            .find(|(_, key)| *key == self)
            .map(|(t, _)| *t)
            .unwrap_or(DEFAULT_SORT)
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::new(SortColumn::Id, SortDirection::Asc)
    }
}

/// Every sort token a client may send. A leading `-` means descending.
pub const SORT_SAFELIST: &[(&str, SortKey)] = &[
    ("id", SortKey::new(SortColumn::Id, SortDirection::Asc)),
    ("title", SortKey::new(SortColumn::Title, SortDirection::Asc)),
    ("year", SortKey::new(SortColumn::Year, SortDirection::Asc)),
    ("runtime", SortKey::new(SortColumn::Runtime, SortDirection::Asc)),
    ("-id", SortKey::new(SortColumn::Id, SortDirection::Desc)),
    ("-title", SortKey::new(SortColumn::Title, SortDirection::Desc)),
    ("-year", SortKey::new(SortColumn::Year, SortDirection::Desc)),
    ("-runtime", SortKey::new(SortColumn::Runtime, SortDirection::Desc)),
];

/// Raw listing parameters (`?title=&genres=&page=&page_size=&sort=`).
///
/// Everything arrives as an optional string so malformed integers become
/// validation errors instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMoviesParams {
    pub title: Option<String>,
    /// Comma-separated genre list.
    pub genres: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFilter {
    /// Full-text search term; empty matches every title.
    pub title: String,
    /// Required genres; empty means no genre restriction.
    pub genres: Vec<String>,
    pub page: i64,
    pub page_size: i64,
    pub sort: SortKey,
}

impl MovieFilter {
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for MovieFilter {
    fn default() -> Self {
        Self {
            title: String::new(),
            genres: Vec::new(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortKey::default(),
        }
    }
}

impl ListMoviesParams {
    /// Apply defaults and run the filter rule set.
    pub fn validate(&self) -> Result<MovieFilter, ValidationErrors> {
        let mut v = Validator::new();

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let genres = self
            .genres
            .as_deref()
            .map(split_csv)
            .unwrap_or_default();

        let page = read_int(&mut v, "page", self.page.as_deref(), DEFAULT_PAGE);
        if let Some(page) = page {
            if v.check(page > 0, "page", "positive", "must be greater than zero") {
                v.check(
                    page <= MAX_PAGE,
                    "page",
                    "max",
                    "must be a maximum of 10 million",
                );
            }
        }

        let page_size = read_int(
            &mut v,
            "page_size",
            self.page_size.as_deref(),
            DEFAULT_PAGE_SIZE,
        );
        if let Some(page_size) = page_size {
            v.between("page_size", page_size, 1, MAX_PAGE_SIZE);
        }

        let token = match self.sort.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_SORT,
        };
        let sort = SortKey::parse(token);
        v.check(sort.is_some(), "sort", "permitted", "invalid sort value");

        v.finish()?;

        Ok(MovieFilter {
            title,
            genres,
            page: page.unwrap_or(DEFAULT_PAGE),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort: sort.unwrap_or_default(),
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an optional integer parameter, falling back to `default` when absent.
///
/// Returns `None` (and records a violation) when the value is not an integer.
fn read_int(v: &mut Validator, field: &str, raw: Option<&str>, default: i64) -> Option<i64> {
    match raw.map(str::trim) {
        None | Some("") => Some(default),
        Some(s) => match s.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                v.add(field, "integer", "must be an integer value");
                None
            }
        },
    }
}
