pub mod local;
pub mod query;
pub mod rest;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::UserSession;

use crate::error::GatewayError;

pub use local::SqliteGateway;
pub use query::{Embed, Filter, Order, Projection, SelectQuery};
pub use rest::RestGateway;

/// The backend's query/insert/update/delete surface plus its session state.
///
/// Rows cross this boundary as JSON objects keyed by column name, with
/// embedded parents under the parent's table name. Nothing here retries:
/// a failed call is reported once and the caller decides what to keep.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Short name used in logs and the health endpoint
    fn kind(&self) -> &'static str;

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, GatewayError>;

    /// Inserts one row and returns it as stored (id and timestamps filled in).
    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError>;

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), GatewayError>;

    async fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError>;

    async fn current_session(&self) -> Result<Option<UserSession>, GatewayError>;

    async fn sign_out(&self) -> Result<(), GatewayError>;
}

/// Runs `query` and decodes every row into `T`.
pub async fn fetch_all<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    query: &SelectQuery,
) -> Result<Vec<T>, GatewayError> {
    let rows = gateway.select(query).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(GatewayError::from))
        .collect()
}
