use chrono::{DateTime, SecondsFormat, Utc};
use shared_types::{Task, TaskDraft, TaskPayload, TaskStatus};
use std::borrow::Cow;

use super::{
    company_embed, contact_embed, deal_embed, optional, or_empty, require, Entity, ReferenceKind,
};
use crate::error::ValidationError;
use crate::gateway::SelectQuery;

pub struct Tasks;

impl Entity for Tasks {
    type Record = Task;
    type Draft = TaskDraft;
    type Payload = TaskPayload;

    const TABLE: &'static str = "tasks";
    const SLUG: &'static str = "tasks";
    const NOUN: &'static str = "task";
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

    fn id(record: &Task) -> &str {
        &record.id
    }

    fn search_fields(record: &Task) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(record.title.as_str()),
            Cow::Borrowed(record.description.as_deref().unwrap_or_default()),
            Cow::Borrowed(record.company_name().unwrap_or_default()),
        ]
    }

    fn draft_from(record: &Task) -> TaskDraft {
        TaskDraft {
            title: record.title.clone(),
            description: or_empty(&record.description),
            company_id: or_empty(&record.company_id),
            contact_id: or_empty(&record.contact_id),
            deal_id: or_empty(&record.deal_id),
            due_date: or_empty(&record.due_date),
            priority: record.priority,
            status: record.status,
            completed_at: record.completed_at.clone(),
        }
    }

    /// `completed_at` is non-null exactly when the submitted status is completed.
    fn normalize(draft: &TaskDraft, now: DateTime<Utc>) -> TaskPayload {
        let completed_at = match draft.status {
            TaskStatus::Completed => Some(
                draft
                    .completed_at
                    .clone()
                    .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            TaskStatus::Pending | TaskStatus::Cancelled => None,
        };

        TaskPayload {
            title: draft.title.clone(),
            description: draft.description.clone(),
            company_id: optional(&draft.company_id),
            contact_id: optional(&draft.contact_id),
            deal_id: optional(&draft.deal_id),
            due_date: optional(&draft.due_date),
            priority: draft.priority,
            status: draft.status,
            completed_at,
        }
    }

    fn validate(draft: &TaskDraft) -> Result<(), ValidationError> {
        require("title", &draft.title)
    }
}
