// Artifacts - timestamped files saved during a test run
//
// Layout: `<root>/<ext>/<test>_<YYYYmmdd_HHMMSS>.<ext>`. JSON is
// pretty-printed, png/jpg are written as raw bytes and everything else as text.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Payload of an artifact.
#[derive(Debug, Clone, Copy)]
pub enum Artifact<'a> {
    Json(&'a serde_json::Value),
    Bytes(&'a [u8]),
    Text(&'a str),
}

/// File name `<name>_<YYYYmmdd_HHMMSS>.<ext>` for an artifact created at `at`.
pub fn timestamped_name(name: &str, ext: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.{}", sanitize(name), at.format("%Y%m%d_%H%M%S"), ext)
}

/// Replaces path separators and other awkward characters in test names.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes artifacts below a root directory (normally `reports/artifacts`).
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the artifact for `test_name` with extension `ext` would be written to now.
    pub fn path_for(&self, test_name: &str, ext: &str) -> PathBuf {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.root
            .join(&ext)
            .join(timestamped_name(test_name, &ext, Local::now()))
    }

    /// Saves `artifact` and returns the written path.
    ///
    /// `ext` picks both the sub-directory and the encoding.
    pub async fn save(&self, test_name: &str, ext: &str, artifact: Artifact<'_>) -> Result<PathBuf> {
        let path = self.path_for(test_name, ext);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        let bytes = match (ext.as_str(), artifact) {
            ("json", Artifact::Json(value)) => serde_json::to_vec_pretty(value)?,
            ("json", Artifact::Text(text)) => {
                let value: serde_json::Value = serde_json::from_str(text)?;
                serde_json::to_vec_pretty(&value)?
            }
            ("png" | "jpg" | "jpeg", Artifact::Bytes(bytes)) => bytes.to_vec(),
            ("png" | "jpg" | "jpeg", _) => {
                return Err(Error::InvalidArgument(format!(
                    "{ext} artifacts must be binary"
                )));
            }
            (_, Artifact::Json(value)) => serde_json::to_string(value)?.into_bytes(),
            (_, Artifact::Bytes(bytes)) => String::from_utf8_lossy(bytes).into_owned().into_bytes(),
            (_, Artifact::Text(text)) => text.as_bytes().to_vec(),
        };

        tokio::fs::write(&path, bytes).await?;
        tracing::info!("Saved {} artifact for {} to {}", ext, test_name, path.display());
        Ok(path)
    }

    /// Saves any serializable value as a pretty-printed JSON artifact.
    pub async fn save_json<T: Serialize>(&self, test_name: &str, value: &T) -> Result<PathBuf> {
        let value = serde_json::to_value(value)?;
        self.save(test_name, "json", Artifact::Json(&value)).await
    }
}
