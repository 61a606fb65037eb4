//! One descriptor per record kind.
//!
//! A descriptor tells the generic controller everything that differs between
//! screens: which table to read, which parents to embed, which lookup lists a
//! form needs, how a record maps to a draft and a draft to a write payload,
//! and which text fields the search box looks at.

pub mod communications;
pub mod companies;
pub mod contacts;
pub mod deals;
pub mod inventory;
pub mod tasks;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;

use crate::error::ValidationError;
use crate::gateway::{Embed, SelectQuery};

pub use crate::config::ValidationMode;
pub use communications::Communications;
pub use companies::Companies;
pub use contacts::Contacts;
pub use deals::Deals;
pub use inventory::InventoryItems;
pub use tasks::Tasks;

/// A lookup list fetched only to fill a foreign-key selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Companies,
    Contacts,
    Deals,
}

impl ReferenceKind {
    pub fn query(&self) -> SelectQuery {
        match self {
            ReferenceKind::Companies => SelectQuery::from("companies")
                .columns(&["id", "name"])
                .order_by("name", true),
            ReferenceKind::Contacts => SelectQuery::from("contacts")
                .columns(&["id", "first_name", "last_name", "company_id"])
                .order_by("first_name", true),
            ReferenceKind::Deals => SelectQuery::from("deals")
                .columns(&["id", "title", "company_id"])
                .order_by("title", true),
        }
    }
}

pub trait Entity: Send + Sync + 'static {
    /// Row as read, parents embedded
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    /// Form-bound values
    type Draft: Serialize + DeserializeOwned + Clone + Default + PartialEq + Send + Sync + 'static;
    /// Canonical write shape
    type Payload: Serialize + Send + 'static;

    const TABLE: &'static str;
    /// Path segment under `/api`
    const SLUG: &'static str;
    /// Singular name used in prompts and logs
    const NOUN: &'static str;
    const REFERENCES: &'static [ReferenceKind] = &[];

    /// Primary collection, newest first
    fn select() -> SelectQuery {
        SelectQuery::from(Self::TABLE).newest_first()
    }

    fn id(record: &Self::Record) -> &str;

    /// Text the search box is matched against
    fn search_fields(record: &Self::Record) -> Vec<Cow<'_, str>>;

    /// Form values for editing `record`; absent foreign keys become `""`.
    fn draft_from(record: &Self::Record) -> Self::Draft;

    /// Converts form values into the row written to the backend.
    fn normalize(draft: &Self::Draft, now: DateTime<Utc>) -> Self::Payload;

    /// Required fields and numeric ranges, checked only in strict mode.
    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    fn check(draft: &Self::Draft, mode: ValidationMode) -> Result<(), ValidationError> {
        match mode {
            ValidationMode::Lenient => Ok(()),
            ValidationMode::Strict => Self::validate(draft),
        }
    }

    fn delete_prompt() -> String {
        format!("Are you sure you want to delete this {}?", Self::NOUN)
    }
}

pub(crate) fn company_embed() -> Embed {
    Embed::new("companies", "company_id", &["id", "name"])
}

pub(crate) fn contact_embed() -> Embed {
    Embed::new("contacts", "contact_id", &["id", "first_name", "last_name"])
}

pub(crate) fn deal_embed() -> Embed {
    Embed::new("deals", "deal_id", &["id", "title"])
}

/// `""` is the form's "nothing selected"
pub(crate) fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Currency and price inputs; unparsable text is zero.
pub(crate) fn parse_amount(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

/// Whole-number inputs, fractional part dropped.
pub(crate) fn parse_whole(raw: &str) -> Option<i64> {
    parse_number(raw).map(|v| v.trunc() as i64)
}

pub(crate) fn parse_count(raw: &str, fallback: i64) -> i64 {
    parse_whole(raw).unwrap_or(fallback)
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

pub(crate) fn require_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    parse_number(raw).ok_or_else(|| ValidationError::new(field, format!("'{raw}' is not a number")))
}

pub(crate) fn require_non_negative(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = require_number(field, raw)?;
    if value < 0.0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(value)
}

pub(crate) fn require_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_queries() {
        let companies = ReferenceKind::Companies.query().to_params();
        assert_eq!(companies[0].1, "id,name");
        assert_eq!(companies[1].1, "name.asc");

        let contacts = ReferenceKind::Contacts.query();
        assert_eq!(contacts.render_select(), "id,first_name,last_name,company_id");

        let deals = ReferenceKind::Deals.query().to_params();
        assert_eq!(deals[0].1, "id,title,company_id");
        assert_eq!(deals[1].1, "title.asc");
    }

    #[test]
    fn test_lenient_number_parsing() {
        assert_eq!(parse_amount("1500.5"), 1500.5);
        assert_eq!(parse_amount(" 12 "), 12.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_count("150", 0), 150);
        assert_eq!(parse_count("7.9", 0), 7);
        assert_eq!(parse_count("", 1000), 1000);
    }

    #[test]
    fn test_optional_foreign_keys() {
        assert_eq!(optional(""), None);
        assert_eq!(optional("   "), None);
        assert_eq!(optional("c1"), Some("c1".to_string()));
    }

    #[test]
    fn test_range_errors_name_the_field() {
        let err = require_range("probability", 150, 0, 100).unwrap_err();
        assert_eq!(err.field, "probability");
        assert!(err.message.contains("150"));
        assert!(require_range("probability", 100, 0, 100).is_ok());
        assert!(require_non_negative("value", "-1").is_err());
        assert!(require_non_negative("value", "x").is_err());
    }
}
