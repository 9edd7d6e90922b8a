use std::path::{Path, PathBuf};

use crate::foundation::error::{RenderProcError, RenderProcResult};

/// Host settings selecting which renderer config to load.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Directory holding renderer config documents.
    pub config_dir: PathBuf,
    /// File name of the active renderer config, relative to `config_dir`.
    pub renderer_config: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            renderer_config: "renderer.json".to_string(),
        }
    }
}

impl Settings {
    pub fn new(config_dir: impl Into<PathBuf>, renderer_config: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            renderer_config: renderer_config.into(),
        }
    }

    /// Settings pointing directly at `path` (its parent directory and file name).
    pub fn for_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(dir, file)
    }

    pub fn renderer_config_path(&self) -> PathBuf {
        self.config_dir.join(&self.renderer_config)
    }

    /// Parse settings from a JSON document.
    pub fn from_reader<R: std::io::Read>(r: R) -> RenderProcResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RenderProcError::serde(format!("parse settings JSON: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
