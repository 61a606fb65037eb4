use chrono::{DateTime, Utc};
use shared_types::{Contact, ContactDraft, ContactPayload};
use std::borrow::Cow;

use super::{company_embed, optional, or_empty, require, Entity, ReferenceKind};
use crate::error::ValidationError;
use crate::gateway::SelectQuery;

pub struct Contacts;

impl Entity for Contacts {
    type Record = Contact;
    type Draft = ContactDraft;
    type Payload = ContactPayload;

    const TABLE: &'static str = "contacts";
    const SLUG: &'static str = "contacts";
    const NOUN: &'static str = "contact";
    const REFERENCES: &'static [ReferenceKind] = &[ReferenceKind::Companies];

    fn select() -> SelectQuery {
        SelectQuery::from(Self::TABLE)
            .embed(company_embed())
            .newest_first()
    }

    fn id(record: &Contact) -> &str {
        &record.id
    }

    fn search_fields(record: &Contact) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(record.full_name()),
            Cow::Borrowed(record.email.as_deref().unwrap_or_default()),
            Cow::Borrowed(record.title.as_deref().unwrap_or_default()),
            Cow::Borrowed(record.company_name().unwrap_or_default()),
        ]
    }

    fn draft_from(record: &Contact) -> ContactDraft {
        ContactDraft {
            company_id: or_empty(&record.company_id),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            title: or_empty(&record.title),
            email: or_empty(&record.email),
            phone: or_empty(&record.phone),
            department: or_empty(&record.department),
            notes: or_empty(&record.notes),
            is_primary: record.is_primary,
        }
    }

    fn normalize(draft: &ContactDraft, _now: DateTime<Utc>) -> ContactPayload {
        ContactPayload {
            company_id: optional(&draft.company_id),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            title: draft.title.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            department: draft.department.clone(),
            notes: draft.notes.clone(),
            is_primary: draft.is_primary,
        }
    }

    fn validate(draft: &ContactDraft) -> Result<(), ValidationError> {
        require("first_name", &draft.first_name)?;
        require("last_name", &draft.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CompanyRef;

    fn contact(company: Option<&str>) -> Contact {
        Contact {
            id: "p1".to_string(),
            company_id: company.map(|_| "c1".to_string()),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: Some("CTO".to_string()),
            email: None,
            phone: None,
            department: None,
            notes: None,
            is_primary: true,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            companies: company.map(|name| CompanyRef {
                id: "c1".to_string(),
                name: name.to_string(),
                industry: None,
            }),
        }
    }

    #[test]
    fn test_search_includes_full_name_and_company() {
        let record = contact(Some("Acme"));
        let fields = Contacts::search_fields(&record);
        assert_eq!(fields[0], "Ada Lovelace");
        assert_eq!(fields[3], "Acme");
    }

    #[test]
    fn test_missing_company_round_trips_through_empty_sentinel() {
        let draft = Contacts::draft_from(&contact(None));
        assert_eq!(draft.company_id, "");

        let payload = Contacts::normalize(&draft, Utc::now());
        assert_eq!(payload.company_id, None);
        assert!(payload.is_primary);
    }

    #[test]
    fn test_select_embeds_company() {
        assert_eq!(
            Contacts::select().render_select(),
            "*,companies(id,name)"
        );
    }
}
