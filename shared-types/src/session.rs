use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Signed-in user as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSession {
    pub user_id: String,
    pub email: Option<String>,
}

/// Screens reachable from the navigation sidebar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Dashboard,
    Companies,
    Contacts,
    Deals,
    Inventory,
    Tasks,
    Communications,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Dashboard,
        Tab::Companies,
        Tab::Contacts,
        Tab::Deals,
        Tab::Inventory,
        Tab::Tasks,
        Tab::Communications,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Companies => "Companies",
            Self::Contacts => "Contacts",
            Self::Deals => "Deals",
            Self::Inventory => "Inventory",
            Self::Tasks => "Tasks",
            Self::Communications => "Communications",
        }
    }
}

/// What the shell is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ShellStatus {
    LoadingSession,
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShellView {
    pub status: ShellStatus,
    pub active_tab: Tab,
    pub user: Option<UserSession>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SelectTabRequest {
    pub tab: Tab,
}
