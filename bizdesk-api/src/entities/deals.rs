use chrono::{DateTime, Utc};
use shared_types::{Deal, DealDraft, DealPayload};
use std::borrow::Cow;

use super::{
    company_embed, contact_embed, optional, or_empty, parse_amount, parse_whole, require,
    require_non_negative, require_number, require_range, Entity, ReferenceKind,
};
use crate::error::ValidationError;
use crate::gateway::SelectQuery;

pub struct Deals;

impl Entity for Deals {
    type Record = Deal;
    type Draft = DealDraft;
    type Payload = DealPayload;

    const TABLE: &'static str = "deals";
    const SLUG: &'static str = "deals";
    const NOUN: &'static str = "deal";
    const REFERENCES: &'static [ReferenceKind] =
        &[ReferenceKind::Companies, ReferenceKind::Contacts];

    fn select() -> SelectQuery {
        SelectQuery::from(Self::TABLE)
            .embed(company_embed())
            .embed(contact_embed())
            .newest_first()
    }

    fn id(record: &Deal) -> &str {
        &record.id
    }

    fn search_fields(record: &Deal) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(record.title.as_str()),
            Cow::Borrowed(record.stage.as_str()),
            Cow::Borrowed(record.company_name().unwrap_or_default()),
        ]
    }

    fn draft_from(record: &Deal) -> DealDraft {
        DealDraft {
            company_id: or_empty(&record.company_id),
            contact_id: or_empty(&record.contact_id),
            title: record.title.clone(),
            description: or_empty(&record.description),
            value: record.value.to_string(),
            stage: record.stage,
            probability: record.probability.to_string(),
            expected_close_date: or_empty(&record.expected_close_date),
            status: record.status,
            notes: or_empty(&record.notes),
        }
    }

    fn normalize(draft: &DealDraft, _now: DateTime<Utc>) -> DealPayload {
        let probability = parse_whole(&draft.probability)
            .unwrap_or(0)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;

        DealPayload {
            company_id: optional(&draft.company_id),
            contact_id: optional(&draft.contact_id),
            title: draft.title.clone(),
            description: draft.description.clone(),
            value: parse_amount(&draft.value),
            stage: draft.stage,
            probability,
            expected_close_date: optional(&draft.expected_close_date),
            status: draft.status,
            notes: draft.notes.clone(),
        }
    }

    fn validate(draft: &DealDraft) -> Result<(), ValidationError> {
        require("title", &draft.title)?;
        require_non_negative("value", &draft.value)?;
        let probability = require_number("probability", &draft.probability)?;
        require_range("probability", probability.trunc() as i64, 0, 100)
    }
}
