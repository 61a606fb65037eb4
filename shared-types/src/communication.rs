use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::company::CompanyRef;
use crate::contact::ContactRef;
use crate::deal::DealRef;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CommunicationType {
    #[default]
    Email,
    Call,
    Meeting,
    Note,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Inbound,
    #[default]
    Outbound,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Communication {
    pub id: String,
    pub company_id: Option<String>,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub subject: String,
    pub content: Option<String>,
    pub direction: Direction,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub companies: Option<CompanyRef>,
    #[serde(default)]
    pub contacts: Option<ContactRef>,
    #[serde(default)]
    pub deals: Option<DealRef>,
}

impl Communication {
    pub fn company_name(&self) -> Option<&str> {
        self.companies.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommunicationDraft {
    pub company_id: String,
    pub contact_id: String,
    pub deal_id: String,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub subject: String,
    pub content: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommunicationPayload {
    pub company_id: Option<String>,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub subject: String,
    pub content: String,
    pub direction: Direction,
}
