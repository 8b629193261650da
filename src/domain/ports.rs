use crate::core::workspace::Workspace;
use crate::domain::model::{
    ArtifactLayout, Extraction, FitOutcome, HeaderDefaults, OverwritePolicy, ProcessOutcome,
    Seeds, WorkItem,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::ops::Range;
use std::path::Path;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    /// Directory holding the input galaxy images.
    fn galaxy_dir(&self) -> &Path;
    /// Directory extracted planes and run reports are written under.
    fn output_dir(&self) -> &Path;
    /// Filters to process, e.g. ["f606w", "f814w"].
    fn filters(&self) -> &[String];
    /// Galaxy index range, end exclusive.
    fn index_range(&self) -> Range<u32>;
    fn overwrite(&self) -> OverwritePolicy;
    fn header_defaults(&self) -> &HeaderDefaults;
    fn layout(&self) -> &ArtifactLayout;
    /// Whether to read MAG0 and patch the J) zero point record.
    fn use_zero_point(&self) -> bool;
    /// Whether to build mask.fits before each fit.
    fn make_mask(&self) -> bool;
    fn process_timeout(&self) -> Duration;
}

/// Port to the external fitting tool. Mocked in tests so the pipeline can
/// be exercised without a GALFIT installation.
#[async_trait]
pub trait Fitter: Send + Sync {
    /// First pass: fit the patched parameter file in the workspace.
    async fn fit(&self, workspace: &Workspace) -> Result<ProcessOutcome>;
    /// Refinement pass (-o3) over the result file of the first pass.
    async fn refine(&self, workspace: &Workspace) -> Result<ProcessOutcome>;
    /// Build the pixel mask for the given source image.
    async fn make_mask(&self, source: &Path, workspace: &Workspace) -> Result<ProcessOutcome>;
}

/// Stage contract for one work item. The engine drives these in order:
/// seed -> prepare -> invoke -> extract.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Read seed values from the source image header.
    async fn seed(&self, item: &WorkItem) -> Result<Seeds>;
    /// Patch the feedme, build the mask, and clean stale artifacts.
    async fn prepare(&self, item: &WorkItem, seeds: &Seeds) -> Result<()>;
    /// Run the external fit passes and check what they produced.
    async fn invoke(&self, item: &WorkItem) -> Result<FitOutcome>;
    /// Write the extracted planes, or skip when artifacts are missing.
    async fn extract(&self, item: &WorkItem, outcome: &FitOutcome) -> Result<Extraction>;
}
