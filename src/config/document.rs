use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{RenderProcError, RenderProcResult};

/// Size of the scratch buffer used while streaming a config file into the parser.
pub(crate) const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Renderer config document.
///
/// Step descriptors stay raw JSON: generic pass descriptors are forwarded verbatim to the pass
/// `init`, and classification happens per step so errors can name the offending index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    /// Display name, only used for logging.
    pub name: String,
    /// Forwarded untouched to the uniform manager.
    pub uniform_buffers: serde_json::Value,
    pub render_steps: Vec<serde_json::Value>,
}

impl RendererConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> RenderProcResult<Self> {
        serde_json::from_reader(r).map_err(|e| {
            if e.is_io() {
                RenderProcError::Io(e.into())
            } else {
                RenderProcError::serde(format!("parse renderer config JSON: {e}"))
            }
        })
    }

    pub fn from_json_str(s: &str) -> RenderProcResult<Self> {
        Self::from_reader(s.as_bytes())
    }
}

/// Required fields of an `ImageMemoryBarrier` step.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BarrierDesc {
    pub(crate) source_image_layout: String,
    pub(crate) target_image_layout: String,
    pub(crate) image: String,
}

/// Open and parse the config at `path`.
///
/// A file that cannot be opened is not an error: it is logged and reported as `None`, leaving
/// the caller with an empty pipeline. The read buffer is dropped before returning on every path.
pub(crate) fn open_renderer_config(path: &Path) -> RenderProcResult<Option<RendererConfig>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load renderer config, rendering nothing"
            );
            return Ok(None);
        }
    };
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    RendererConfig::from_reader(reader).map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/config/document.rs"]
mod tests;
