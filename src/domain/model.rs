use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One unit of work: a single galaxy image of a single filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Filter/base name, e.g. "f606w" or "f814w".
    pub filter: String,
    /// Galaxy index within the filter, e.g. 0 for f606w_gal0.fits.
    pub index: u32,
}

impl WorkItem {
    pub fn new(filter: impl Into<String>, index: u32) -> Self {
        Self {
            filter: filter.into(),
            index,
        }
    }

    /// File name of the input galaxy image.
    pub fn source_name(&self) -> String {
        format!("{}_gal{}.fits", self.filter, self.index)
    }

    /// File name of the PSF image (one per filter, in the working directory).
    pub fn psf_name(&self) -> String {
        format!("{}_psf.fits", self.filter)
    }

    /// File name of an extracted output plane.
    pub fn output_name(&self, kind: OutputKind) -> String {
        format!("{}_{}{}.fits", self.filter, kind.tag(), self.index)
    }
}

/// The four planes extracted per successful fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// Residual plane from the model block.
    Residual,
    /// De Vaucouleurs (bulge) component model.
    Bulge,
    /// Exponential disk component model.
    Disk,
    /// Disk model plus residual, computed element-wise.
    DiskResidual,
}

impl OutputKind {
    /// Short tag used inside output file names.
    pub fn tag(&self) -> &'static str {
        match self {
            OutputKind::Residual => "res",
            OutputKind::Bulge => "devauc",
            OutputKind::Disk => "disk",
            OutputKind::DiskResidual => "disk_res",
        }
    }

    /// Subdirectory of the output directory this kind is written to.
    pub fn subdir(&self) -> &'static str {
        match self {
            OutputKind::Residual => "residual",
            OutputKind::Bulge => "devauc",
            OutputKind::Disk => "disk",
            OutputKind::DiskResidual => "disk_res",
        }
    }
}

/// Seed values read from the source image header before patching the feedme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seeds {
    pub magnitude: f64,
    pub radius: f64,
    /// Photometric zero point (MAG0), only read when enabled in config.
    pub zero_point: Option<f64>,
}

/// Fallback values used when an optional header key cannot be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderDefaults {
    pub magnitude: f64,
    pub radius: f64,
}

impl Default for HeaderDefaults {
    fn default() -> Self {
        Self {
            magnitude: 20.0,
            radius: 10.0,
        }
    }
}

/// Which HDU index holds which plane in the two GALFIT artifacts.
///
/// Model block (imgblock.fits): 0 is empty, 1 is the input, 2 is the
/// residual. Sub-components (subcomps.fits): 1 is the bulge model, 2 is
/// the disk model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactLayout {
    pub residual_plane: usize,
    pub bulge_plane: usize,
    pub disk_plane: usize,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            residual_plane: 2,
            bulge_plane: 1,
            disk_plane: 2,
        }
    }
}

/// Single policy for every extracted output write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Fail with `OutputExists` when the destination is already present.
    Never,
    /// Replace the destination silently.
    Always,
}

/// What one external invocation came back with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Everything the two fit passes left behind.
///
/// GALFIT's exit status is not a reliable success signal, so artifact
/// presence is checked on disk and carried separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitOutcome {
    pub first_pass: ProcessOutcome,
    /// Refinement pass; `None` when the first pass left no result file.
    pub refinement: Option<ProcessOutcome>,
    pub model_block_present: bool,
    pub subcomponents_present: bool,
}

impl FitOutcome {
    pub fn artifacts_present(&self) -> bool {
        self.model_block_present && self.subcomponents_present
    }
}

/// Outputs produced by the extraction stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub outputs: Vec<PathBuf>,
    /// Artifact file names that were expected but absent.
    pub missing_artifacts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    /// All four output planes were written.
    Completed,
    /// The fit ran but artifacts were missing; extraction was skipped.
    Partial,
    /// A fatal error stopped this item; later items still run.
    Aborted,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkStatus::Completed => "completed",
            WorkStatus::Partial => "partial",
            WorkStatus::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}

/// Per work item audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkReport {
    pub item: WorkItem,
    pub status: WorkStatus,
    pub seeds: Option<Seeds>,
    pub fit: Option<FitOutcome>,
    pub outputs: Vec<PathBuf>,
    pub missing_artifacts: Vec<String>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Whole-run audit record, written to the output directory as JSON and CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub completed: usize,
    pub partial: usize,
    pub aborted: usize,
    pub reports: Vec<WorkReport>,
}
