use shared_types::{ShellStatus, ShellView, Tab};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

use crate::controller::{Controller, LoadOutcome};
use crate::dashboard::DashboardScreen;
use crate::entities::{
    Communications, Companies, Contacts, Deals, Entity, InventoryItems, Tasks,
};
use crate::error::{ControllerError, ShellError};
use crate::session::{SessionContext, SessionPhase};

/// The dashboard plus one controller per record kind
pub struct Screens {
    pub dashboard: DashboardScreen,
    pub companies: Controller<Companies>,
    pub contacts: Controller<Contacts>,
    pub deals: Controller<Deals>,
    pub inventory: Controller<InventoryItems>,
    pub tasks: Controller<Tasks>,
    pub communications: Controller<Communications>,
}

impl Screens {
    pub fn new(session: &SessionContext) -> Self {
        Self {
            dashboard: DashboardScreen::new(session.clone()),
            companies: Controller::new(session.clone()),
            contacts: Controller::new(session.clone()),
            deals: Controller::new(session.clone()),
            inventory: Controller::new(session.clone()),
            tasks: Controller::new(session.clone()),
            communications: Controller::new(session.clone()),
        }
    }

    pub async fn load(&self, tab: Tab) -> Result<LoadOutcome, ControllerError> {
        match tab {
            Tab::Dashboard => Ok(self.dashboard.load().await),
            Tab::Companies => self.companies.load().await,
            Tab::Contacts => self.contacts.load().await,
            Tab::Deals => self.deals.load().await,
            Tab::Inventory => self.inventory.load().await,
            Tab::Tasks => self.tasks.load().await,
            Tab::Communications => self.communications.load().await,
        }
    }

    pub fn deactivate(&self, tab: Tab) {
        match tab {
            Tab::Dashboard => self.dashboard.deactivate(),
            Tab::Companies => self.companies.deactivate(),
            Tab::Contacts => self.contacts.deactivate(),
            Tab::Deals => self.deals.deactivate(),
            Tab::Inventory => self.inventory.deactivate(),
            Tab::Tasks => self.tasks.deactivate(),
            Tab::Communications => self.communications.deactivate(),
        }
    }

    pub fn reset_all(&self) {
        self.dashboard.reset();
        self.companies.reset();
        self.contacts.reset();
        self.deals.reset();
        self.inventory.reset();
        self.tasks.reset();
        self.communications.reset();
    }
}

/// Record kinds reachable as a tab
pub trait Screen: Entity + Sized {
    const TAB: Tab;

    fn controller(screens: &Screens) -> &Controller<Self>;
}

macro_rules! screen {
    ($entity:ty, $tab:expr, $field:ident) => {
        impl Screen for $entity {
            const TAB: Tab = $tab;

            fn controller(screens: &Screens) -> &Controller<Self> {
                &screens.$field
            }
        }
    };
}

screen!(Companies, Tab::Companies, companies);
screen!(Contacts, Tab::Contacts, contacts);
screen!(Deals, Tab::Deals, deals);
screen!(InventoryItems, Tab::Inventory, inventory);
screen!(Tasks, Tab::Tasks, tasks);
screen!(Communications, Tab::Communications, communications);

/// Tab navigation behind the session gate.
pub struct Shell {
    session: SessionContext,
    screens: Screens,
    active_tab: Mutex<Tab>,
}

impl Shell {
    pub fn new(session: SessionContext) -> Self {
        let screens = Screens::new(&session);
        Self {
            session,
            screens,
            active_tab: Mutex::new(Tab::default()),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    pub fn active_tab(&self) -> Tab {
        *self.active_tab.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn swap_tab(&self, tab: Tab) -> Tab {
        std::mem::replace(
            &mut *self.active_tab.lock().unwrap_or_else(PoisonError::into_inner),
            tab,
        )
    }

    pub fn require_session(&self) -> Result<(), ShellError> {
        if self.session.is_signed_in() {
            Ok(())
        } else {
            Err(ShellError::Unauthenticated)
        }
    }

    async fn load_active(&self, tab: Tab) {
        if let Err(e) = self.screens.load(tab).await {
            error!("Failed to load {} tab: {}", tab.label(), e);
        }
    }

    /// Leaves the loading state; a signed-in user lands on the active tab.
    pub async fn resolve_session(&self) -> ShellView {
        if let SessionPhase::SignedIn(_) = self.session.resolve().await {
            self.load_active(self.active_tab()).await;
        }
        self.view()
    }

    pub async fn select_tab(&self, tab: Tab) -> Result<ShellView, ShellError> {
        self.require_session()?;

        let previous = self.swap_tab(tab);
        if previous != tab {
            self.screens.deactivate(previous);
        }
        info!("Switched to {} tab", tab.label());
        self.load_active(tab).await;
        Ok(self.view())
    }

    /// Tears down every screen and returns to the sign-in state.
    pub async fn sign_out(&self) -> ShellView {
        self.session.sign_out().await;
        self.screens.reset_all();
        self.swap_tab(Tab::default());
        info!("Signed out, all screens cleared");
        self.view()
    }

    pub fn view(&self) -> ShellView {
        let (status, user) = match self.session.phase() {
            SessionPhase::Loading => (ShellStatus::LoadingSession, None),
            SessionPhase::SignedOut => (ShellStatus::Unauthenticated, None),
            SessionPhase::SignedIn(user) => (ShellStatus::Authenticated, Some(user)),
        };
        ShellView {
            status,
            active_tab: self.active_tab(),
            user,
        }
    }
}
