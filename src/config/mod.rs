pub mod cli;
pub mod file;

pub use cli::CliConfig;
pub use file::FileConfig;

use crate::domain::model::{ArtifactLayout, HeaderDefaults, OverwritePolicy};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fully resolved configuration for one run: CLI flags merged with the
/// optional TOML overlay.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub galaxy_dir: PathBuf,
    pub output_dir: PathBuf,
    pub filters: Vec<String>,
    pub range: Range<u32>,
    pub overwrite: OverwritePolicy,
    pub defaults: HeaderDefaults,
    pub layout: ArtifactLayout,
    pub zero_point: bool,
    pub mask: bool,
    pub timeout: Duration,
}

impl RunSettings {
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        Ok(Self {
            galaxy_dir: cli.galaxy_dir.clone(),
            output_dir: cli.output_dir.clone(),
            filters: cli.filters.clone(),
            range: cli.start..cli.end,
            overwrite: if cli.overwrite {
                OverwritePolicy::Always
            } else {
                OverwritePolicy::Never
            },
            defaults: file.defaults,
            layout: file.layout,
            zero_point: cli.zero_point,
            mask: cli.mask,
            timeout: Duration::from_secs(cli.timeout_seconds),
        })
    }
}

impl ConfigProvider for RunSettings {
    fn galaxy_dir(&self) -> &Path {
        &self.galaxy_dir
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn filters(&self) -> &[String] {
        &self.filters
    }

    fn index_range(&self) -> Range<u32> {
        self.range.clone()
    }

    fn overwrite(&self) -> OverwritePolicy {
        self.overwrite
    }

    fn header_defaults(&self) -> &HeaderDefaults {
        &self.defaults
    }

    fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    fn use_zero_point(&self) -> bool {
        self.zero_point
    }

    fn make_mask(&self) -> bool {
        self.mask
    }

    fn process_timeout(&self) -> Duration {
        self.timeout
    }
}
