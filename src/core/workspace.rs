use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Fixed artifact file names GALFIT uses inside its working directory.
pub const MODEL_BLOCK_NAME: &str = "imgblock.fits";
pub const SUBCOMPONENTS_NAME: &str = "subcomps.fits";
pub const FIT_RESULT_NAME: &str = "galfit.01";
pub const MASK_NAME: &str = "mask.fits";

/// Resolved absolute paths for one run directory.
///
/// GALFIT reads and writes fixed file names in its working directory, so
/// two concurrent runs must be given two distinct `Workspace` values.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    /// The GALFIT parameter file ("feedme") patched before each fit.
    pub feedme: PathBuf,
    pub model_block: PathBuf,
    pub subcomponents: PathBuf,
    pub fit_result: PathBuf,
    pub mask: PathBuf,
}

impl Workspace {
    pub fn new(dir: impl Into<PathBuf>, feedme_name: &str) -> Result<Self> {
        let dir = std::fs::canonicalize(dir.into())?;
        Ok(Self {
            feedme: dir.join(feedme_name),
            model_block: dir.join(MODEL_BLOCK_NAME),
            subcomponents: dir.join(SUBCOMPONENTS_NAME),
            fit_result: dir.join(FIT_RESULT_NAME),
            mask: dir.join(MASK_NAME),
            dir,
        })
    }

    /// Remove stale artifacts from a previous run. fit.log is never touched.
    pub fn clean(&self) -> Result<()> {
        for path in [&self.model_block, &self.subcomponents, &self.fit_result] {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!("Deleted stale {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Drop the first-pass result file once the refinement pass consumed it.
    pub fn discard_fit_result(&self) -> Result<()> {
        match std::fs::remove_file(&self.fit_result) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
