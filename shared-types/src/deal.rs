use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::company::CompanyRef;
use crate::contact::ContactRef;

/// Pipeline stage of a deal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum DealStage {
    #[default]
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    pub const ALL: [DealStage; 6] = [
        DealStage::Prospecting,
        DealStage::Qualification,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    /// Wire name, e.g. `closed-won`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prospecting => "prospecting",
            Self::Qualification => "qualification",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
        }
    }

    /// Display label, e.g. `Closed won`
    pub fn label(&self) -> String {
        let name = self.as_str().replacen('-', " ", 1);
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum DealStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Deal {
    pub id: String,
    pub company_id: Option<String>,
    pub contact_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub value: f64,
    pub stage: DealStage,
    #[serde(default)]
    pub probability: i32,
    pub expected_close_date: Option<String>,
    #[serde(default)]
    pub actual_close_date: Option<String>,
    pub status: DealStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub companies: Option<CompanyRef>,
    #[serde(default)]
    pub contacts: Option<ContactRef>,
}

impl Deal {
    pub fn company_name(&self) -> Option<&str> {
        self.companies.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DealDraft {
    pub company_id: String,
    pub contact_id: String,
    pub title: String,
    pub description: String,
    /// Raw currency input
    pub value: String,
    pub stage: DealStage,
    /// Raw percentage input
    pub probability: String,
    pub expected_close_date: String,
    pub status: DealStatus,
    pub notes: String,
}

impl Default for DealDraft {
    fn default() -> Self {
        Self {
            company_id: String::new(),
            contact_id: String::new(),
            title: String::new(),
            description: String::new(),
            value: "0".to_string(),
            stage: DealStage::Prospecting,
            probability: "0".to_string(),
            expected_close_date: String::new(),
            status: DealStatus::Open,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DealPayload {
    pub company_id: Option<String>,
    pub contact_id: Option<String>,
    pub title: String,
    pub description: String,
    pub value: f64,
    pub stage: DealStage,
    pub probability: i32,
    pub expected_close_date: Option<String>,
    pub status: DealStatus,
    pub notes: String,
}

/// Deal projection used for selectors and embedded parents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DealRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company_id: Option<String>,
}
