#![allow(dead_code)]

use async_trait::async_trait;
use bizdesk_api::config::ValidationMode;
use bizdesk_api::error::GatewayError;
use bizdesk_api::gateway::{Gateway, SelectQuery, SqliteGateway};
use bizdesk_api::SessionContext;
use serde_json::Value;
use shared_types::UserSession;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn local_gateway() -> (tempfile::TempDir, SqliteGateway) {
    let dir = tempfile::tempdir().unwrap();
    let gateway = SqliteGateway::open(&dir.path().join("bizdesk.sqlite3")).unwrap();
    (dir, gateway)
}

pub async fn signed_in(gateway: Arc<dyn Gateway>, mode: ValidationMode) -> SessionContext {
    let session = SessionContext::new(gateway, mode);
    session.resolve().await;
    session
}

/// Holds the next operation until the test releases it.
pub struct GatedGateway {
    inner: SqliteGateway,
    armed: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedGateway {
    pub fn new(inner: SqliteGateway) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl Gateway for GatedGateway {
    fn kind(&self) -> &'static str {
        "gated"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, GatewayError> {
        self.pass().await;
        self.inner.select(query).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError> {
        self.pass().await;
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        self.pass().await;
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        self.pass().await;
        self.inner.delete(table, id).await
    }

    async fn current_session(&self) -> Result<Option<UserSession>, GatewayError> {
        self.inner.current_session().await
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        self.inner.sign_out().await
    }
}

/// Fails reads and/or writes on demand with a backend error.
pub struct FlakyGateway {
    inner: SqliteGateway,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyGateway {
    pub fn new(inner: SqliteGateway) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    fn outage() -> GatewayError {
        GatewayError::Backend {
            status: 503,
            message: "service unavailable".to_string(),
        }
    }

    fn check(flag: &AtomicBool) -> Result<(), GatewayError> {
        if flag.load(Ordering::SeqCst) {
            Err(Self::outage())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Gateway for FlakyGateway {
    fn kind(&self) -> &'static str {
        "flaky"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, GatewayError> {
        Self::check(&self.fail_reads)?;
        self.inner.select(query).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError> {
        Self::check(&self.fail_writes)?;
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        Self::check(&self.fail_writes)?;
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        Self::check(&self.fail_writes)?;
        self.inner.delete(table, id).await
    }

    async fn current_session(&self) -> Result<Option<UserSession>, GatewayError> {
        Self::check(&self.fail_reads)?;
        self.inner.current_session().await
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        self.inner.sign_out().await
    }
}
