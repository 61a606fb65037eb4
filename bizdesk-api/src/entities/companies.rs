use chrono::{DateTime, Utc};
use shared_types::{Company, CompanyDraft, CompanyPayload};
use std::borrow::Cow;

use super::{or_empty, require, require_range, Entity};
use crate::error::ValidationError;

pub struct Companies;

impl Entity for Companies {
    type Record = Company;
    type Draft = CompanyDraft;
    type Payload = CompanyPayload;

    const TABLE: &'static str = "companies";
    const SLUG: &'static str = "companies";
    const NOUN: &'static str = "company";

    fn id(record: &Company) -> &str {
        &record.id
    }

    fn search_fields(record: &Company) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(record.name.as_str()),
            Cow::Borrowed(record.industry.as_deref().unwrap_or_default()),
        ]
    }

    fn draft_from(record: &Company) -> CompanyDraft {
        CompanyDraft {
            name: record.name.clone(),
            industry: or_empty(&record.industry),
            size: or_empty(&record.size),
            website: or_empty(&record.website),
            phone: or_empty(&record.phone),
            email: or_empty(&record.email),
            address: or_empty(&record.address),
            notes: or_empty(&record.notes),
            relationship_strength: record.relationship_strength,
        }
    }

    fn normalize(draft: &CompanyDraft, _now: DateTime<Utc>) -> CompanyPayload {
        CompanyPayload {
            name: draft.name.clone(),
            industry: draft.industry.clone(),
            size: draft.size.clone(),
            website: draft.website.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            address: draft.address.clone(),
            notes: draft.notes.clone(),
            relationship_strength: draft.relationship_strength,
        }
    }

    fn validate(draft: &CompanyDraft) -> Result<(), ValidationError> {
        require("name", &draft.name)?;
        require_range(
            "relationship_strength",
            i64::from(draft.relationship_strength),
            1,
            5,
        )
    }
}
