//! Field validation primitives.
//!
//! A [`Validator`] runs a series of named checks and accumulates violations
//! instead of failing on the first one, so a client sees every problem with
//! its payload in a single response. Only the first violation per field is
//! kept; later checks on an already-failed field are still evaluated but
//! their messages are dropped.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: &'static str,
    pub message: String,
}

/// Non-empty set of violations produced by [`Validator::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Message recorded for `field`, if that field failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulator for field checks.
///
/// Every check method returns `true` when the value passed, so callers can
/// skip dependent checks on a field that already failed.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Record a violation for `field` unless one is already present.
    pub fn add(&mut self, field: &str, rule: &'static str, message: impl Into<String>) {
        if self.violations.iter().any(|v| v.field == field) {
            return;
        }
        self.violations.push(FieldViolation {
            field: field.to_string(),
            rule,
            message: message.into(),
        });
    }

    /// Record a violation when `ok` is false.
    pub fn check(
        &mut self,
        ok: bool,
        field: &str,
        rule: &'static str,
        message: impl Into<String>,
    ) -> bool {
        if !ok {
            self.add(field, rule, message);
        }
        ok
    }

    pub fn non_empty(&mut self, field: &str, value: &str) -> bool {
        self.check(!value.is_empty(), field, "non_empty", "must be provided")
    }

    /// Length is measured in bytes, not characters.
    pub fn max_length(&mut self, field: &str, value: &str, max: usize) -> bool {
        self.check(
            value.len() <= max,
            field,
            "max_length",
            format!("must not be more than {max} bytes long"),
        )
    }

    /// Inclusive range check.
    pub fn between<T>(&mut self, field: &str, value: T, lo: T, hi: T) -> bool
    where
        T: PartialOrd + fmt::Display,
    {
        self.check(
            value >= lo && value <= hi,
            field,
            "between",
            format!("must be between {lo} and {hi}"),
        )
    }

    pub fn positive(&mut self, field: &str, value: i64) -> bool {
        self.check(value > 0, field, "positive", "must be a positive integer")
    }

    pub fn unique_members<T>(&mut self, field: &str, items: &[T]) -> bool
    where
        T: Eq + Hash,
    {
        self.check(
            unique(items),
            field,
            "unique_members",
            "must not contain duplicate values",
        )
    }

    /// Set-membership check against a fixed list of allowed values.
    pub fn permitted<T>(&mut self, field: &str, value: &T, allowed: &[T]) -> bool
    where
        T: PartialEq,
    {
        self.check(
            allowed.contains(value),
            field,
            "permitted",
            "must be one of the permitted values",
        )
    }

    /// Consume the validator, returning the violations if any were recorded.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

/// True when no two items compare equal.
pub fn unique<T: Eq + Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_checks_finish_ok() {
        let mut v = Validator::new();
        assert!(v.non_empty("title", "Casablanca"));
        assert!(v.max_length("title", "Casablanca", 500));
        assert!(v.between("year", 1942, 1888, 2026));
        assert!(v.positive("runtime", 102));
        assert!(v.unique_members("genres", &["drama", "romance"]));
        assert!(v.permitted("sort", &"id", &["id", "-id"]));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn violations_accumulate_across_fields() {
        let mut v = Validator::new();
        v.non_empty("title", "");
        v.positive("runtime", 0);
        v.between("year", 1800, 1888, 2026);

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("title"), Some("must be provided"));
        assert_eq!(errors.get("runtime"), Some("must be a positive integer"));
        assert_eq!(errors.get("year"), Some("must be between 1888 and 2026"));
    }

    #[test]
    fn first_violation_per_field_wins() {
        let mut v = Validator::new();
        v.non_empty("title", "");
        v.max_length("title", "", 0);
        v.add("title", "custom", "ignored");

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].rule, "non_empty");
    }

    #[test]
    fn max_length_counts_bytes() {
        let mut v = Validator::new();
        // Four characters, eight bytes.
        assert!(!v.max_length("title", "日本語x", 7));
        assert!(v.max_length("other", "日本語x", 10));
    }

    #[test]
    fn duplicate_members_are_rejected() {
        let mut v = Validator::new();
        assert!(!v.unique_members("genres", &["drama", "comedy", "drama"]));
        assert_eq!(
            v.finish().unwrap_err().get("genres"),
            Some("must not contain duplicate values")
        );
    }

    #[test]
    fn permitted_rejects_values_outside_the_list() {
        let mut v = Validator::new();
        assert!(!v.permitted("sort", &"created_at", &["id", "title"]));
        assert!(v.finish().unwrap_err().contains("sort"));
    }

    #[test]
    fn display_joins_violations() {
        let mut v = Validator::new();
        v.non_empty("title", "");
        v.positive("runtime", -5);
        assert_eq!(
            v.finish().unwrap_err().to_string(),
            "title: must be provided; runtime: must be a positive integer"
        );
    }
}
