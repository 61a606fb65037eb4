use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BackendConfig, BackendKind};
use crate::gateway::{Gateway, RestGateway, SqliteGateway};

/// Returns the default path of the local backend's database file
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/bizdesk/bizdesk.sqlite3`
/// - **Linux**: `~/.local/share/bizdesk/bizdesk.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\bizdesk\bizdesk.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("bizdesk").join("bizdesk.sqlite3"))
}

/// Builds the gateway selected by the `[backend]` section
pub fn connect_gateway(backend: &BackendConfig) -> anyhow::Result<Arc<dyn Gateway>> {
    match backend.kind {
        BackendKind::Hosted => {
            let url = backend
                .url
                .as_deref()
                .context("backend.url is required for the hosted backend")?;
            let anon_key = backend
                .anon_key
                .as_deref()
                .context("backend.anon_key is required for the hosted backend")?;
            tracing::info!("Using hosted backend at {}", url);
            Ok(Arc::new(RestGateway::new(
                url,
                anon_key,
                backend.access_token.clone(),
            )))
        }
        BackendKind::Local => {
            let db_path = match &backend.database_path {
                Some(path) => path.clone(),
                None => get_db_path()?,
            };
            Ok(Arc::new(SqliteGateway::open(&db_path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_backend_needs_url_and_key() {
        let backend = BackendConfig {
            kind: BackendKind::Hosted,
            url: Some("https://example.supabase.co".to_string()),
            ..Default::default()
        };
        let err = connect_gateway(&backend).err().unwrap();
        assert!(err.to_string().contains("anon_key"));
    }

    #[test]
    fn test_local_backend_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let backend = BackendConfig {
            kind: BackendKind::Local,
            database_path: Some(dir.path().join("data").join("bizdesk.sqlite3")),
            ..Default::default()
        };
        let gateway = connect_gateway(&backend).unwrap();
        assert_eq!(gateway.kind(), "local");
        assert!(dir.path().join("data").join("bizdesk.sqlite3").exists());
    }
}
