//! The list/form screen shared by every record kind.

pub mod filter;
mod tasks;

use chrono::Utc;
use serde::Serialize;
use shared_types::{CompanyRef, ContactRef, DealRef, ReferenceLists};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use crate::entities::{Entity, ReferenceKind};
use crate::error::{ControllerError, GatewayError};
use crate::gateway::{fetch_all, Gateway};
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The screen was deactivated while the fetch was in flight
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { id: String },
    Updated { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView<D> {
    pub is_open: bool,
    pub editing_id: Option<String>,
    pub draft: D,
}

/// Serializable snapshot of a screen: visible rows, form and lookup lists.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenView<R, D> {
    pub rows: Vec<R>,
    pub total: usize,
    pub search_term: String,
    pub form: FormView<D>,
    pub references: ReferenceLists,
    pub is_loading: bool,
    pub is_submitting: bool,
}

struct ScreenState<E: Entity> {
    collection: Vec<E::Record>,
    references: ReferenceLists,
    search_term: String,
    draft: E::Draft,
    editing_id: Option<String>,
    is_form_open: bool,
    is_loading: bool,
    is_submitting: bool,
}

impl<E: Entity> Default for ScreenState<E> {
    fn default() -> Self {
        Self {
            collection: Vec::new(),
            references: ReferenceLists::default(),
            search_term: String::new(),
            draft: E::Draft::default(),
            editing_id: None,
            is_form_open: false,
            is_loading: false,
            is_submitting: false,
        }
    }
}

enum ReferenceRows {
    Companies(Vec<CompanyRef>),
    Contacts(Vec<ContactRef>),
    Deals(Vec<DealRef>),
}

async fn fetch_reference(
    gateway: &dyn Gateway,
    kind: ReferenceKind,
) -> Result<ReferenceRows, GatewayError> {
    let query = kind.query();
    Ok(match kind {
        ReferenceKind::Companies => ReferenceRows::Companies(fetch_all(gateway, &query).await?),
        ReferenceKind::Contacts => ReferenceRows::Contacts(fetch_all(gateway, &query).await?),
        ReferenceKind::Deals => ReferenceRows::Deals(fetch_all(gateway, &query).await?),
    })
}

/// Collection, search term and form draft for one record kind.
///
/// Every mutation is followed by a full reload; nothing is patched locally.
/// The state lock is never held across an await.
pub struct Controller<E: Entity> {
    session: SessionContext,
    state: Mutex<ScreenState<E>>,
    generation: AtomicU64,
    latest_load: AtomicU64,
}

impl<E: Entity> Controller<E> {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            state: Mutex::new(ScreenState::default()),
            generation: AtomicU64::new(0),
            latest_load: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScreenState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ScreenState<E>) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetches the collection and lookup lists concurrently.
    ///
    /// Each slice is replaced only if its own fetch succeeded. A failed primary
    /// fetch is returned after the lookup lists are applied. Results are
    /// discarded if the screen was deactivated or a newer load started.
    pub async fn load(&self) -> Result<LoadOutcome, ControllerError> {
        let generation = self.generation();
        let ticket = self.latest_load.fetch_add(1, Ordering::SeqCst) + 1;
        self.with_state(|state| state.is_loading = true);

        let gateway = self.session.gateway();
        let select = E::select();
        let primary = fetch_all::<E::Record>(gateway.as_ref(), &select);
        let references = futures::future::join_all(
            E::REFERENCES
                .iter()
                .map(|kind| fetch_reference(gateway.as_ref(), *kind)),
        );
        let (primary, references) = futures::join!(primary, references);

        if self.generation() != generation {
            debug!("Discarding stale {} load (generation {})", E::TABLE, generation);
            return Ok(LoadOutcome::Discarded);
        }
        if self.latest_load.load(Ordering::SeqCst) != ticket {
            debug!("Discarding superseded {} load (ticket {})", E::TABLE, ticket);
            return Ok(LoadOutcome::Discarded);
        }

        self.with_state(|state| {
            state.is_loading = false;
            for result in references {
                match result {
                    Ok(ReferenceRows::Companies(rows)) => state.references.companies = rows,
                    Ok(ReferenceRows::Contacts(rows)) => state.references.contacts = rows,
                    Ok(ReferenceRows::Deals(rows)) => state.references.deals = rows,
                    Err(e) => warn!("Failed to load lookup list for {}: {}", E::TABLE, e),
                }
            }
            match primary {
                Ok(rows) => {
                    debug!("Loaded {} {}", rows.len(), E::TABLE);
                    state.collection = rows;
                    Ok(LoadOutcome::Applied)
                }
                Err(e) => {
                    error!("Failed to load {}: {}", E::TABLE, e);
                    Err(e.into())
                }
            }
        })
    }

    /// Rows matching the current search term, in collection order.
    pub fn visible(&self) -> Vec<E::Record> {
        let state = self.lock();
        filter::visible::<E>(&state.collection, &state.search_term)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn records(&self) -> Vec<E::Record> {
        self.lock().collection.clone()
    }

    pub fn set_search(&self, term: impl Into<String>) {
        self.with_state(|state| state.search_term = term.into());
    }

    pub fn open_for_create(&self) {
        self.with_state(|state| {
            state.draft = E::Draft::default();
            state.editing_id = None;
            state.is_form_open = true;
        });
    }

    pub fn open_for_edit(&self, id: &str) -> Result<(), ControllerError> {
        self.with_state(|state| {
            let record = state
                .collection
                .iter()
                .find(|record| E::id(record) == id)
                .ok_or_else(|| ControllerError::NotFound {
                    noun: E::NOUN,
                    id: id.to_string(),
                })?;
            state.draft = E::draft_from(record);
            state.editing_id = Some(id.to_string());
            state.is_form_open = true;
            Ok(())
        })
    }

    pub fn set_draft(&self, draft: E::Draft) -> Result<(), ControllerError> {
        self.edit_draft(|current| *current = draft)
    }

    pub fn edit_draft(&self, edit: impl FnOnce(&mut E::Draft)) -> Result<(), ControllerError> {
        self.with_state(|state| {
            if !state.is_form_open {
                return Err(ControllerError::FormClosed);
            }
            edit(&mut state.draft);
            Ok(())
        })
    }

    pub fn draft(&self) -> E::Draft {
        self.lock().draft.clone()
    }

    pub fn close_form(&self) {
        self.with_state(|state| {
            state.is_form_open = false;
            state.editing_id = None;
            state.draft = E::Draft::default();
        });
    }

    /// Writes the draft (update when editing, insert otherwise), closes the
    /// form and reloads. On failure the form stays open with the draft intact.
    pub async fn submit(&self) -> Result<SubmitOutcome, ControllerError> {
        let generation = self.generation();
        let mode = self.session.validation();
        let (draft, editing_id) = self.with_state(|state| {
            if !state.is_form_open {
                return Err(ControllerError::FormClosed);
            }
            if state.is_submitting {
                return Err(ControllerError::Busy);
            }
            E::check(&state.draft, mode)?;
            state.is_submitting = true;
            Ok((state.draft.clone(), state.editing_id.clone()))
        })?;

        let result = self.write(&draft, editing_id).await;
        self.with_state(|state| {
            state.is_submitting = false;
            if result.is_ok() {
                state.is_form_open = false;
                state.editing_id = None;
                state.draft = E::Draft::default();
            }
        });

        let outcome = result?;
        info!("Saved {} {:?}", E::NOUN, outcome);
        self.reload_after_write(generation).await;
        Ok(outcome)
    }

    /// Skipped when the screen was deactivated or reset while the write ran.
    async fn reload_after_write(&self, generation: u64) {
        if self.generation() != generation {
            debug!("Skipping {} reload after write (generation {})", E::TABLE, generation);
            return;
        }
        // A failed reload is already logged; the write itself went through.
        let _ = self.load().await;
    }

    async fn write(
        &self,
        draft: &E::Draft,
        editing_id: Option<String>,
    ) -> Result<SubmitOutcome, ControllerError> {
        let payload = serde_json::to_value(E::normalize(draft, Utc::now()))
            .map_err(GatewayError::from)?;
        let gateway = self.session.gateway();

        match editing_id {
            Some(id) => {
                if let Err(e) = gateway.update(E::TABLE, &id, payload).await {
                    error!("Failed to update {} {}: {}", E::NOUN, id, e);
                    return Err(e.into());
                }
                Ok(SubmitOutcome::Updated { id })
            }
            None => match gateway.insert(E::TABLE, payload).await {
                Ok(row) => {
                    let id = row
                        .get("id")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    Ok(SubmitOutcome::Created { id })
                }
                Err(e) => {
                    error!("Failed to create {}: {}", E::NOUN, e);
                    Err(e.into())
                }
            },
        }
    }

    /// Deletes after `confirm` accepts the prompt, then reloads.
    pub async fn delete(
        &self,
        id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, ControllerError> {
        if !confirm(&E::delete_prompt()) {
            return Ok(DeleteOutcome::Cancelled);
        }
        let generation = self.generation();

        if let Err(e) = self.session.gateway().delete(E::TABLE, id).await {
            error!("Failed to delete {} {}: {}", E::NOUN, id, e);
            return Err(e.into());
        }
        info!("Deleted {} {}", E::NOUN, id);

        self.reload_after_write(generation).await;
        Ok(DeleteOutcome::Deleted)
    }

    pub fn view(&self) -> ScreenView<E::Record, E::Draft> {
        let state = self.lock();
        let rows: Vec<E::Record> = filter::visible::<E>(&state.collection, &state.search_term)
            .into_iter()
            .cloned()
            .collect();
        ScreenView {
            rows,
            total: state.collection.len(),
            search_term: state.search_term.clone(),
            form: FormView {
                is_open: state.is_form_open,
                editing_id: state.editing_id.clone(),
                draft: state.draft.clone(),
            },
            references: state.references.clone(),
            is_loading: state.is_loading,
            is_submitting: state.is_submitting,
        }
    }

    /// Loads already in flight will discard their results.
    pub fn deactivate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.with_state(|state| state.is_loading = false);
    }

    /// Drops everything, as on sign-out.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.with_state(|state| *state = ScreenState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationMode;
    use crate::entities::{Companies, Deals};
    use crate::gateway::SqliteGateway;
    use std::sync::Arc;

    fn session(mode: ValidationMode) -> (tempfile::TempDir, SessionContext) {
        let dir = tempfile::tempdir().unwrap();
        let gateway = SqliteGateway::open(&dir.path().join("bizdesk.sqlite3")).unwrap();
        (dir, SessionContext::new(Arc::new(gateway), mode))
    }

    #[tokio::test]
    async fn test_draft_edits_require_open_form() {
        let (_dir, session) = session(ValidationMode::Lenient);
        let companies = Controller::<Companies>::new(session);

        assert!(matches!(
            companies.edit_draft(|d| d.name = "Acme".to_string()),
            Err(ControllerError::FormClosed)
        ));
        assert!(matches!(companies.submit().await, Err(ControllerError::FormClosed)));

        companies.open_for_create();
        companies.edit_draft(|d| d.name = "Acme".to_string()).unwrap();
        assert_eq!(companies.draft().name, "Acme");

        companies.close_form();
        assert!(!companies.view().form.is_open);
        assert_eq!(companies.draft().name, "");
    }

    #[tokio::test]
    async fn test_open_for_edit_copies_record() {
        let (_dir, session) = session(ValidationMode::Lenient);
        let companies = Controller::<Companies>::new(session);
        companies.open_for_create();
        companies
            .edit_draft(|d| {
                d.name = "Acme".to_string();
                d.relationship_strength = 5;
            })
            .unwrap();
        let SubmitOutcome::Created { id } = companies.submit().await.unwrap() else {
            panic!("expected a created row");
        };

        companies.open_for_edit(&id).unwrap();
        let view = companies.view();
        assert!(view.form.is_open);
        assert_eq!(view.form.editing_id.as_deref(), Some(id.as_str()));
        assert_eq!(view.form.draft.name, "Acme");
        assert_eq!(view.form.draft.relationship_strength, 5);

        assert!(matches!(
            companies.open_for_edit("missing"),
            Err(ControllerError::NotFound { noun: "company", .. })
        ));
    }

    #[tokio::test]
    async fn test_strict_validation_keeps_form_open() {
        let (_dir, session) = session(ValidationMode::Strict);
        let deals = Controller::<Deals>::new(session);
        deals.open_for_create();
        deals
            .edit_draft(|d| {
                d.title = "Big order".to_string();
                d.probability = "150".to_string();
            })
            .unwrap();

        let err = deals.submit().await.unwrap_err();
        assert!(matches!(err, ControllerError::Validation(ref v) if v.field == "probability"));

        let view = deals.view();
        assert!(view.form.is_open);
        assert!(!view.is_submitting);
        assert_eq!(view.form.draft.probability, "150");
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_rows() {
        let (_dir, session) = session(ValidationMode::Lenient);
        let companies = Controller::<Companies>::new(session);
        companies.open_for_create();
        companies.edit_draft(|d| d.name = "Acme".to_string()).unwrap();
        companies.submit().await.unwrap();
        let id = companies.records()[0].id.clone();

        let mut prompt = String::new();
        let outcome = companies
            .delete(&id, |text| {
                prompt = text.to_string();
                false
            })
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(prompt, "Are you sure you want to delete this company?");
        assert_eq!(companies.records().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let (_dir, session) = session(ValidationMode::Lenient);
        let companies = Controller::<Companies>::new(session);
        companies.open_for_create();
        companies.edit_draft(|d| d.name = "Acme".to_string()).unwrap();
        companies.submit().await.unwrap();
        companies.set_search("ac");
        let before = companies.generation();

        companies.reset();

        let view = companies.view();
        assert_eq!(view.total, 0);
        assert_eq!(view.search_term, "");
        assert!(companies.generation() > before);
    }
}
