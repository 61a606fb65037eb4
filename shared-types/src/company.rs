use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Default relationship strength for a new company ("Good").
pub const DEFAULT_RELATIONSHIP_STRENGTH: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub relationship_strength: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl Company {
    pub fn relationship(&self) -> RelationshipStrength {
        RelationshipStrength::from_level(self.relationship_strength)
    }
}

/// Qualitative reading of `relationship_strength` (1-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipStrength {
    Cold,
    Warm,
    Good,
    Strong,
    Excellent,
    Unknown,
}

impl RelationshipStrength {
    pub fn from_level(level: i32) -> Self {
        match level {
            1 => Self::Cold,
            2 => Self::Warm,
            3 => Self::Good,
            4 => Self::Strong,
            5 => Self::Excellent,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Warm => "Warm",
            Self::Good => "Good",
            Self::Strong => "Strong",
            Self::Excellent => "Excellent",
            Self::Unknown => "Unknown",
        }
    }
}

/// Form values for creating or editing a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyDraft {
    pub name: String,
    pub industry: String,
    pub size: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
    pub relationship_strength: i32,
}

impl Default for CompanyDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            industry: String::new(),
            size: String::new(),
            website: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            notes: String::new(),
            relationship_strength: DEFAULT_RELATIONSHIP_STRENGTH,
        }
    }
}

/// Row written on insert and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyPayload {
    pub name: String,
    pub industry: String,
    pub size: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
    pub relationship_strength: i32,
}

/// Company projection used for selectors and embedded parents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_labels() {
        let labels: Vec<&str> = (0..=6)
            .map(|level| RelationshipStrength::from_level(level).label())
            .collect();
        assert_eq!(
            labels,
            vec!["Unknown", "Cold", "Warm", "Good", "Strong", "Excellent", "Unknown"]
        );
    }

    #[test]
    fn test_draft_defaults_to_good_relationship() {
        let draft = CompanyDraft::default();
        assert_eq!(draft.relationship_strength, 3);
        assert!(draft.name.is_empty());
    }

    #[test]
    fn test_company_ref_without_industry() {
        let parsed: CompanyRef =
            serde_json::from_str(r#"{"id":"c1","name":"Acme"}"#).unwrap();
        assert_eq!(parsed.name, "Acme");
        assert_eq!(parsed.industry, None);
    }
}
