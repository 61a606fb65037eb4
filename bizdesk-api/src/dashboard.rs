use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use shared_types::{
    Activity, Communication, Company, Contact, DashboardStats, DashboardSummary, DashboardView,
    Deal, DealStage, DealStatus, InventoryItem, StageCount, Task, TaskStatus,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error};

use crate::controller::LoadOutcome;
use crate::entities::{company_embed, contact_embed};
use crate::gateway::{fetch_all, Gateway, SelectQuery};
use crate::session::SessionContext;

const RECENT_ACTIVITY_LIMIT: usize = 5;
const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Everything the dashboard is computed from
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub companies: Vec<Company>,
    pub contacts: Vec<Contact>,
    pub deals: Vec<Deal>,
    pub inventory: Vec<InventoryItem>,
    pub tasks: Vec<Task>,
    /// Newest first, already limited
    pub recent_communications: Vec<Communication>,
}

/// Dates may be plain `YYYY-MM-DD` (midnight UTC) or full RFC 3339.
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.status == TaskStatus::Pending
        && task
            .due_date
            .as_deref()
            .and_then(parse_due_date)
            .is_some_and(|due| due < now)
}

pub fn summarize(data: &DashboardData, now: DateTime<Utc>) -> DashboardSummary {
    let stats = DashboardStats {
        total_companies: data.companies.len(),
        total_contacts: data.contacts.len(),
        total_deals: data.deals.len(),
        total_deal_value: data.deals.iter().map(|deal| deal.value).sum(),
        open_deals: data
            .deals
            .iter()
            .filter(|deal| deal.status == DealStatus::Open)
            .count(),
        low_stock_items: data
            .inventory
            .iter()
            .filter(|item| item.current_stock <= item.min_stock_level)
            .count(),
        pending_tasks: data
            .tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Pending)
            .count(),
        overdue_tasks: data.tasks.iter().filter(|task| is_overdue(task, now)).count(),
    };

    // Stages with no deals are left out
    let deals_by_stage = DealStage::ALL
        .iter()
        .filter_map(|stage| {
            let count = data.deals.iter().filter(|deal| deal.stage == *stage).count();
            (count > 0).then(|| StageCount {
                stage: *stage,
                label: stage.label(),
                count,
            })
        })
        .collect();

    let recent_activities = data
        .recent_communications
        .iter()
        .map(|comm| Activity {
            id: comm.id.clone(),
            kind: comm.kind,
            subject: comm.subject.clone(),
            company: comm.company_name().unwrap_or(UNKNOWN_COMPANY).to_string(),
            contact: comm
                .contacts
                .as_ref()
                .map(|contact| contact.full_name())
                .unwrap_or_default(),
            created_at: comm.created_at.clone(),
        })
        .collect();

    DashboardSummary {
        stats,
        deals_by_stage,
        recent_activities,
    }
}

async fn fetch_or_empty<T: DeserializeOwned>(gateway: &dyn Gateway, query: SelectQuery) -> Vec<T> {
    match fetch_all(gateway, &query).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load {} for dashboard: {}", query.table, e);
            Vec::new()
        }
    }
}

/// The overview tab: counters, deals per stage, latest communications.
pub struct DashboardScreen {
    session: SessionContext,
    state: Mutex<DashboardView>,
    generation: AtomicU64,
    latest_load: AtomicU64,
}

impl DashboardScreen {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            state: Mutex::new(DashboardView::default()),
            generation: AtomicU64::new(0),
            latest_load: AtomicU64::new(0),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut DashboardView) -> T) -> T {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub async fn load(&self) -> LoadOutcome {
        let generation = self.generation.load(Ordering::SeqCst);
        let ticket = self.latest_load.fetch_add(1, Ordering::SeqCst) + 1;
        self.with_state(|state| state.is_loading = true);

        let gateway = self.session.gateway();
        let gateway = gateway.as_ref();
        let (companies, contacts, deals, inventory, tasks, recent_communications) = futures::join!(
            fetch_or_empty::<Company>(gateway, SelectQuery::from("companies")),
            fetch_or_empty::<Contact>(gateway, SelectQuery::from("contacts")),
            fetch_or_empty::<Deal>(gateway, SelectQuery::from("deals")),
            fetch_or_empty::<InventoryItem>(gateway, SelectQuery::from("inventory_items")),
            fetch_or_empty::<Task>(gateway, SelectQuery::from("tasks")),
            fetch_or_empty::<Communication>(
                gateway,
                SelectQuery::from("communications")
                    .embed(company_embed())
                    .embed(contact_embed())
                    .newest_first()
                    .limit(RECENT_ACTIVITY_LIMIT),
            ),
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale dashboard load (generation {})", generation);
            return LoadOutcome::Discarded;
        }
        if self.latest_load.load(Ordering::SeqCst) != ticket {
            debug!("Discarding superseded dashboard load (ticket {})", ticket);
            return LoadOutcome::Discarded;
        }

        let data = DashboardData {
            companies,
            contacts,
            deals,
            inventory,
            tasks,
            recent_communications,
        };
        let summary = summarize(&data, Utc::now());
        self.with_state(|state| {
            state.summary = summary;
            state.is_loading = false;
        });
        LoadOutcome::Applied
    }

    pub fn view(&self) -> DashboardView {
        self.with_state(|state| state.clone())
    }

    pub fn deactivate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.with_state(|state| state.is_loading = false);
    }

    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.with_state(|state| *state = DashboardView::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn deal(stage: &str, status: &str, value: f64) -> Deal {
        serde_json::from_value(json!({
            "id": format!("d-{stage}-{value}"),
            "company_id": null,
            "contact_id": null,
            "title": "Deal",
            "description": null,
            "value": value,
            "stage": stage,
            "probability": 10,
            "expected_close_date": null,
            "status": status,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn task(status: &str, due_date: Option<&str>) -> Task {
        serde_json::from_value(json!({
            "id": "t1",
            "title": "Follow up",
            "description": null,
            "company_id": null,
            "contact_id": null,
            "deal_id": null,
            "due_date": due_date,
            "priority": "medium",
            "status": status,
            "completed_at": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_deal_stats_and_stage_groups() {
        let data = DashboardData {
            deals: vec![
                deal("proposal", "open", 1000.0),
                deal("proposal", "open", 500.5),
                deal("closed-won", "closed", 250.0),
            ],
            ..Default::default()
        };

        let summary = summarize(&data, now());
        assert_eq!(summary.stats.total_deals, 3);
        assert_eq!(summary.stats.total_deal_value, 1750.5);
        assert_eq!(summary.stats.open_deals, 2);

        let stages: Vec<(&str, usize)> = summary
            .deals_by_stage
            .iter()
            .map(|s| (s.label.as_str(), s.count))
            .collect();
        assert_eq!(stages, vec![("Proposal", 2), ("Closed won", 1)]);
    }

    #[test]
    fn test_overdue_counts_only_pending_tasks_past_due() {
        let data = DashboardData {
            tasks: vec![
                task("pending", Some("2024-05-31")),
                task("pending", Some("2024-06-02")),
                task("pending", None),
                task("completed", Some("2024-01-01")),
                task("pending", Some("2024-06-01T11:59:00Z")),
            ],
            ..Default::default()
        };

        let stats = summarize(&data, now()).stats;
        assert_eq!(stats.pending_tasks, 4);
        assert_eq!(stats.overdue_tasks, 2);
    }

    #[test]
    fn test_activity_without_company_is_labelled_unknown() {
        let comm: Communication = serde_json::from_value(json!({
            "id": "m1",
            "company_id": null,
            "contact_id": "p1",
            "deal_id": null,
            "type": "call",
            "subject": "Intro",
            "content": null,
            "direction": "outbound",
            "created_at": "2024-05-01T00:00:00Z",
            "companies": null,
            "contacts": {"id": "p1", "first_name": "Ada", "last_name": "Lovelace"}
        }))
        .unwrap();
        let data = DashboardData {
            recent_communications: vec![comm],
            ..Default::default()
        };

        let activity = &summarize(&data, now()).recent_activities[0];
        assert_eq!(activity.company, "Unknown Company");
        assert_eq!(activity.contact, "Ada Lovelace");
    }

    #[test]
    fn test_low_stock_uses_min_level() {
        let item: InventoryItem = serde_json::from_value(json!({
            "id": "i1", "sku": "S", "name": "Bolt", "description": null, "category": null,
            "brand": null, "current_stock": 10, "min_stock_level": 10, "unit": "pcs",
            "location": null, "supplier": null,
            "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let data = DashboardData {
            inventory: vec![item],
            ..Default::default()
        };
        assert_eq!(summarize(&data, now()).stats.low_stock_items, 1);
    }
}
