use chrono::{DateTime, Utc};
use shared_types::{Communication, CommunicationDraft, CommunicationPayload};
use std::borrow::Cow;

use super::{
    company_embed, contact_embed, deal_embed, optional, or_empty, require, Entity, ReferenceKind,
};
use crate::error::ValidationError;
use crate::gateway::SelectQuery;

pub struct Communications;

impl Entity for Communications {
    type Record = Communication;
    type Draft = CommunicationDraft;
    type Payload = CommunicationPayload;

    const TABLE: &'static str = "communications";
    const SLUG: &'static str = "communications";
    const NOUN: &'static str = "communication";
    const REFERENCES: &'static [ReferenceKind] = &[
        ReferenceKind::Companies,
        ReferenceKind::Contacts,
        ReferenceKind::Deals,
    ];

    fn select() -> SelectQuery {
        SelectQuery::from(Self::TABLE)
            .embed(company_embed())
            .embed(contact_embed())
            .embed(deal_embed())
            .newest_first()
    }

    fn id(record: &Communication) -> &str {
        &record.id
    }

    fn search_fields(record: &Communication) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(record.subject.as_str()),
            Cow::Borrowed(record.content.as_deref().unwrap_or_default()),
            Cow::Borrowed(record.company_name().unwrap_or_default()),
        ]
    }

    fn draft_from(record: &Communication) -> CommunicationDraft {
        CommunicationDraft {
            company_id: or_empty(&record.company_id),
            contact_id: or_empty(&record.contact_id),
            deal_id: or_empty(&record.deal_id),
            kind: record.kind,
            subject: record.subject.clone(),
            content: or_empty(&record.content),
            direction: record.direction,
        }
    }

    fn normalize(draft: &CommunicationDraft, _now: DateTime<Utc>) -> CommunicationPayload {
        CommunicationPayload {
            company_id: optional(&draft.company_id),
            contact_id: optional(&draft.contact_id),
            deal_id: optional(&draft.deal_id),
            kind: draft.kind,
            subject: draft.subject.clone(),
            content: draft.content.clone(),
            direction: draft.direction,
        }
    }

    fn validate(draft: &CommunicationDraft) -> Result<(), ValidationError> {
        require("subject", &draft.subject)
    }
}
