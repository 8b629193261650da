use crate::domain::model::{ArtifactLayout, HeaderDefaults};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML overlay for values that rarely change between runs:
///
/// ```toml
/// [defaults]
/// magnitude = 20.0
/// radius = 10.0
///
/// [layout]
/// residual_plane = 2
/// bulge_plane = 1
/// disk_plane = 2
/// ```
///
/// Every section and field is optional; omitted values keep the built-in
/// defaults from the original scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub defaults: HeaderDefaults,
    pub layout: ArtifactLayout,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
