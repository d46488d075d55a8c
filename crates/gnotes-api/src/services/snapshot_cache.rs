//! File-backed cache of the last analytics snapshot.
//!
//! The analytics view writes its snapshot here after every successful
//! computation. When the AI usage log cannot be read, the cached usage
//! counts are shown instead of zeros.
//!
//! The file location comes from `ANALYTICS_CACHE_PATH`; unset disables
//! the cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use gnotes_core::{AnalyticsSnapshot, Result};

#[derive(Debug, Clone)]
pub struct AnalyticsCache {
    path: Option<Arc<PathBuf>>,
}

impl AnalyticsCache {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(Arc::new(path.into())),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    /// Last stored snapshot. A missing or unreadable file is a miss.
    pub async fn load(&self) -> Option<AnalyticsSnapshot> {
        let path = self.path()?;
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(subsystem = "api", component = "analytics_cache", path = %path.display(), error = %e, "Failed to read analytics cache");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(subsystem = "api", component = "analytics_cache", path = %path.display(), error = %e, "Ignoring corrupt analytics cache");
                None
            }
        }
    }

    /// Replace the stored snapshot. A disabled cache accepts and drops it.
    pub async fn store(&self, snapshot: &AnalyticsSnapshot) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        // write-then-rename so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(subsystem = "api", component = "analytics_cache", path = %path.display(), "Stored analytics snapshot");
        Ok(())
    }
}
