use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::communication::CommunicationType;
use crate::deal::DealStage;

/// Headline counters shown on the dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_companies: usize,
    pub total_contacts: usize,
    pub total_deals: usize,
    pub total_deal_value: f64,
    pub open_deals: usize,
    pub low_stock_items: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StageCount {
    pub stage: DealStage,
    pub label: String,
    pub count: usize,
}

/// A recent communication, flattened for the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub subject: String,
    pub company: String,
    pub contact: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub deals_by_stage: Vec<StageCount>,
    pub recent_activities: Vec<Activity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub is_loading: bool,
}
