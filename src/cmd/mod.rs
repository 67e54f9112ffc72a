//! CLI command handlers.

mod compact;
mod config;
mod models;
mod status;

pub use compact::cmd_compact;
pub use config::cmd_config;
pub use models::cmd_models;
pub use status::cmd_status;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use cinder::cinder_config::{SESSION_FILE, get_cinder_dir};
use cinder::errors::SessionStoreError;
use cinder::orchestrator::SessionStore;
use cinder::session::Session;

/// Resolve the session file path: `--session` flag or the project default.
pub(crate) fn session_path(project_dir: &Path, cli: &crate::Cli) -> PathBuf {
    cli.session
        .clone()
        .unwrap_or_else(|| get_cinder_dir(project_dir).join(SESSION_FILE))
}

/// Load a session file, or `None` when there is no session yet.
pub(crate) fn load_session(path: &Path) -> Result<Option<Session>, SessionStoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).map_err(|source| SessionStoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(serde_json::from_str(&raw)?))
}

/// JSON-file persistence callback used by the compact command.
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn persist(&self, session: &Session) -> Result<(), SessionStoreError> {
        let raw = serde_json::to_string_pretty(session)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionStoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, raw).map_err(|source| SessionStoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
