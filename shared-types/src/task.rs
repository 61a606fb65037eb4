use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::company::CompanyRef;
use crate::contact::ContactRef;
use crate::deal::DealRef;

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Status after a checkbox toggle: completed flips back to pending,
    /// anything else becomes completed.
    pub fn toggled(&self) -> TaskStatus {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::Cancelled => Self::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub company_id: Option<String>,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub due_date: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub companies: Option<CompanyRef>,
    #[serde(default)]
    pub contacts: Option<ContactRef>,
    #[serde(default)]
    pub deals: Option<DealRef>,
}

impl Task {
    pub fn company_name(&self) -> Option<&str> {
        self.companies.as_ref().map(|c| c.name.as_str())
    }

    /// Status change produced by toggling this task at `now`.
    pub fn toggle(&self, now: DateTime<Utc>) -> TaskStatusChange {
        TaskStatusChange::to(self.status.toggled(), now)
    }
}

/// Patch written when a task's status flips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskStatusChange {
    pub status: TaskStatus,
    pub completed_at: Option<String>,
}

impl TaskStatusChange {
    /// `completed_at` is stamped exactly when the new status is completed.
    pub fn to(status: TaskStatus, now: DateTime<Utc>) -> Self {
        let completed_at = match status {
            TaskStatus::Completed => Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            TaskStatus::Pending | TaskStatus::Cancelled => None,
        };
        Self {
            status,
            completed_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub company_id: String,
    pub contact_id: String,
    pub deal_id: String,
    pub due_date: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Carried over from the record being edited; not a form field
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub company_id: Option<String>,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub due_date: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub completed_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_toggle_is_an_involution_from_pending() {
        let status = TaskStatus::Pending;
        assert_eq!(status.toggled(), TaskStatus::Completed);
        assert_eq!(status.toggled().toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_cancelled_toggles_to_completed() {
        assert_eq!(TaskStatus::Cancelled.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn test_completed_at_tracks_status() {
        let done = TaskStatusChange::to(TaskStatus::Completed, now());
        assert_eq!(done.completed_at.as_deref(), Some("2024-03-01T09:30:00.000Z"));

        let reopened = TaskStatusChange::to(TaskStatus::Pending, now());
        assert_eq!(reopened.completed_at, None);

        let cancelled = TaskStatusChange::to(TaskStatus::Cancelled, now());
        assert_eq!(cancelled.completed_at, None);
    }

    #[test]
    fn test_priority_default_is_medium() {
        let draft = TaskDraft::default();
        assert_eq!(draft.priority, TaskPriority::Medium);
        assert_eq!(draft.status, TaskStatus::Pending);
    }
}
