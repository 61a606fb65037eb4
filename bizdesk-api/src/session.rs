use shared_types::UserSession;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, info};

use crate::config::ValidationMode;
use crate::gateway::Gateway;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Loading,
    SignedOut,
    SignedIn(UserSession),
}

struct SessionInner {
    gateway: Arc<dyn Gateway>,
    validation: ValidationMode,
    phase: RwLock<SessionPhase>,
}

/// Backend handle and sign-in state, handed to the shell and every screen.
///
/// Cloning is cheap and every clone observes the same phase.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl SessionContext {
    pub fn new(gateway: Arc<dyn Gateway>, validation: ValidationMode) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                gateway,
                validation,
                phase: RwLock::new(SessionPhase::Loading),
            }),
        }
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        self.inner.gateway.clone()
    }

    pub fn validation(&self) -> ValidationMode {
        self.inner.validation
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner
            .phase
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<UserSession> {
        match self.phase() {
            SessionPhase::SignedIn(user) => Some(user),
            SessionPhase::Loading | SessionPhase::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.phase(), SessionPhase::SignedIn(_))
    }

    fn set_phase(&self, phase: SessionPhase) {
        *self
            .inner
            .phase
            .write()
            .unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Asks the backend who is signed in. A failed lookup counts as signed out.
    pub async fn resolve(&self) -> SessionPhase {
        let phase = match self.inner.gateway.current_session().await {
            Ok(Some(user)) => {
                info!("Session resolved for user {}", user.user_id);
                SessionPhase::SignedIn(user)
            }
            Ok(None) => {
                info!("No active session");
                SessionPhase::SignedOut
            }
            Err(e) => {
                error!("Failed to resolve session: {}", e);
                SessionPhase::SignedOut
            }
        };
        self.set_phase(phase.clone());
        phase
    }

    /// Ends the session; the local phase is signed out even if the backend call fails.
    pub async fn sign_out(&self) {
        if let Err(e) = self.inner.gateway.sign_out().await {
            error!("Failed to sign out: {}", e);
        }
        self.set_phase(SessionPhase::SignedOut);
    }
}
