//! Write-time validation.
//!
//! Editor submissions arrive as untyped JSON. Validation walks the structure
//! and either produces a fully typed document or an ordered list of
//! field-level errors (`path` + `message`) so the admin UI can highlight the
//! exact offending inputs. Validation is pure: nothing is persisted on
//! failure, and nothing is retried.

pub mod page;
pub mod plan;
pub mod post;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as Json};
use thiserror::Error;

pub use page::{validate_page_document, validate_site_content, FeatureRule};
pub use plan::validate_plan_document;
pub use post::validate_post_document;

/// One offending field: `blocks[2].heroTitle` + what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Validation failure for a whole submission, ordered by encounter.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("validation failed: {} field error(s)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

/// Accumulator used by the per-document validators.
#[derive(Debug, Default)]
pub(crate) struct Errors {
    list: Vec<FieldError>,
}

impl Errors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.list.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Succeed with `value` only if no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.list.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { errors: self.list })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON field helpers
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn as_object<'a>(
    value: &'a Json,
    path: &str,
    errors: &mut Errors,
) -> Option<&'a Map<String, Json>> {
    match value.as_object() {
        Some(map) => Some(map),
        None => {
            errors.push(path, "expected an object");
            None
        }
    }
}

/// Required, non-empty after trim.
pub(crate) fn require_str(
    obj: &Map<String, Json>,
    prefix: &str,
    field: &str,
    errors: &mut Errors,
) -> Option<String> {
    let path = join(prefix, field);
    match obj.get(field) {
        Some(Json::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Json::String(_)) => {
            errors.push(path, "must not be empty");
            None
        }
        Some(_) => {
            errors.push(path, "must be a string");
            None
        }
        None => {
            errors.push(path, "is required");
            None
        }
    }
}

/// Optional string; absent or null becomes `None`, wrong type is an error.
pub(crate) fn optional_str(
    obj: &Map<String, Json>,
    prefix: &str,
    field: &str,
    errors: &mut Errors,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Json::Null) => None,
        Some(Json::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(join(prefix, field), "must be a string");
            None
        }
    }
}

/// String that may legitimately be empty (e.g. metaDescription).
pub(crate) fn str_or_empty(
    obj: &Map<String, Json>,
    prefix: &str,
    field: &str,
    errors: &mut Errors,
) -> String {
    match obj.get(field) {
        None | Some(Json::Null) => String::new(),
        Some(Json::String(s)) => s.clone(),
        Some(_) => {
            errors.push(join(prefix, field), "must be a string");
            String::new()
        }
    }
}

pub(crate) fn require_u64(
    obj: &Map<String, Json>,
    prefix: &str,
    field: &str,
    errors: &mut Errors,
) -> Option<u64> {
    let path = join(prefix, field);
    match obj.get(field) {
        Some(v) => match v.as_u64() {
            Some(n) => Some(n),
            None => {
                errors.push(path, "must be a non-negative integer");
                None
            }
        },
        None => {
            errors.push(path, "is required");
            None
        }
    }
}

/// Server-stamped timestamps pass through untouched when present and valid.
pub(crate) fn optional_timestamp(
    obj: &Map<String, Json>,
    prefix: &str,
    field: &str,
    errors: &mut Errors,
) -> Option<DateTime<Utc>> {
    match obj.get(field) {
        None | Some(Json::Null) => None,
        Some(value) => match serde_json::from_value::<DateTime<Utc>>(value.clone()) {
            Ok(ts) => Some(ts),
            Err(_) => {
                errors.push(join(prefix, field), "must be an RFC 3339 timestamp");
                None
            }
        },
    }
}

/// Slug rules: lowercase ASCII alphanumerics and hyphens, no edge hyphens.
pub(crate) fn check_slug(slug: &str, path: &str, errors: &mut Errors) {
    let ok = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !ok {
        errors.push(
            path,
            "must be a slug (lowercase letters, digits, and hyphens)",
        );
    }
}

pub(crate) fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_owned()
    } else {
        format!("{prefix}.{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn require_str_flags_missing_empty_and_wrong_type() {
        let obj = json!({"a": "", "b": 3, "c": "ok"});
        let obj = obj.as_object().unwrap();

        let mut errors = Errors::default();
        assert!(require_str(obj, "", "a", &mut errors).is_none());
        assert!(require_str(obj, "", "b", &mut errors).is_none());
        assert!(require_str(obj, "", "missing", &mut errors).is_none());
        assert_eq!(require_str(obj, "", "c", &mut errors).as_deref(), Some("ok"));

        let err = errors.into_result(()).unwrap_err();
        let paths: Vec<_> = err.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "missing"]);
    }

    #[test]
    fn slug_rules() {
        let mut errors = Errors::default();
        check_slug("vps-hosting-101", "id", &mut errors);
        assert_eq!(errors.len(), 0);

        let mut errors = Errors::default();
        check_slug("-bad", "id", &mut errors);
        check_slug("Bad", "id", &mut errors);
        check_slug("", "id", &mut errors);
        assert_eq!(errors.into_result(()).unwrap_err().errors.len(), 3);
    }

    #[test]
    fn errors_preserve_encounter_order() {
        let mut errors = Errors::default();
        errors.push("z", "first");
        errors.push("a", "second");
        let err = errors.into_result(()).unwrap_err();
        assert_eq!(err.errors[0].path, "z");
        assert_eq!(err.errors[1].path, "a");
    }
}
