use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod communication;
pub mod company;
pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod inventory;
pub mod reference;
pub mod session;
pub mod task;

pub use communication::{
    Communication, CommunicationDraft, CommunicationPayload, CommunicationType, Direction,
};
pub use company::{Company, CompanyDraft, CompanyPayload, CompanyRef, RelationshipStrength};
pub use contact::{Contact, ContactDraft, ContactPayload, ContactRef};
pub use dashboard::{Activity, DashboardStats, DashboardSummary, DashboardView, StageCount};
pub use deal::{Deal, DealDraft, DealPayload, DealRef, DealStage, DealStatus};
pub use inventory::{InventoryItem, InventoryItemDraft, InventoryItemPayload, StockStatus};
pub use reference::ReferenceLists;
pub use session::{SelectTabRequest, ShellStatus, ShellView, Tab, UserSession};
pub use task::{
    Task, TaskDraft, TaskPayload, TaskPriority, TaskStatus, TaskStatusChange,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request to change a screen's search filter
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchRequest {
    pub term: String,
}
