use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::company::CompanyRef;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub company_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Embedded parent company, read-only
    #[serde(default)]
    pub companies: Option<CompanyRef>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn company_name(&self) -> Option<&str> {
        self.companies.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactDraft {
    /// Empty string when no company is selected
    pub company_id: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub notes: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactPayload {
    pub company_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub notes: String,
    pub is_primary: bool,
}

/// Contact projection used for selectors and embedded parents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactRef {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}

impl ContactRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
