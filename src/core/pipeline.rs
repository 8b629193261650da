use crate::adapters::fits;
use crate::core::feedme;
use crate::core::workspace::{Workspace, MODEL_BLOCK_NAME, SUBCOMPONENTS_NAME};
use crate::domain::model::{Extraction, FitOutcome, OutputKind, Seeds, WorkItem};
use crate::domain::ports::{ConfigProvider, Fitter, Pipeline};
use crate::utils::error::{GalfitError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// The production pipeline: seeds from FITS headers, patches the shared
/// feedme, runs two GALFIT passes, and extracts the documented planes.
pub struct FitPipeline<F: Fitter, C: ConfigProvider> {
    fitter: F,
    config: C,
    workspace: Workspace,
}

impl<F: Fitter, C: ConfigProvider> FitPipeline<F, C> {
    pub fn new(fitter: F, config: C, workspace: Workspace) -> Self {
        Self {
            fitter,
            config,
            workspace,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn source_path(&self, item: &WorkItem) -> PathBuf {
        self.config.galaxy_dir().join(item.source_name())
    }

    fn output_path(&self, item: &WorkItem, kind: OutputKind) -> PathBuf {
        self.config
            .output_dir()
            .join(kind.subdir())
            .join(item.output_name(kind))
    }
}

#[async_trait]
impl<F: Fitter, C: ConfigProvider> Pipeline for FitPipeline<F, C> {
    async fn seed(&self, item: &WorkItem) -> Result<Seeds> {
        let source = self.source_path(item);
        if !source.exists() {
            return Err(GalfitError::ConfigError {
                message: format!("source image not found: {}", source.display()),
            });
        }

        let defaults = self.config.header_defaults();
        let magnitude = match fits::read_header_f64(&source, "MAG") {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "MAG not readable from {} ({}); using default {}",
                    source.display(),
                    e,
                    defaults.magnitude
                );
                defaults.magnitude
            }
        };
        let radius = match fits::read_header_f64(&source, "RADIUS") {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "RADIUS not readable from {} ({}); using default {}",
                    source.display(),
                    e,
                    defaults.radius
                );
                defaults.radius
            }
        };

        // The zero point has no sensible default; when requested it must
        // be present.
        let zero_point = if self.config.use_zero_point() {
            let value =
                fits::read_header_f64(&source, "MAG0").map_err(|_| GalfitError::MissingMetadataError {
                    key: "MAG0".to_string(),
                    path: source.clone(),
                })?;
            Some(value)
        } else {
            None
        };

        Ok(Seeds {
            magnitude,
            radius,
            zero_point,
        })
    }

    async fn prepare(&self, item: &WorkItem, seeds: &Seeds) -> Result<()> {
        let source = self.source_path(item);
        let feedme = &self.workspace.feedme;

        // Setup records first: input image, PSF, optional zero point.
        feedme::patch_param(feedme, "A", &source.display().to_string(), 1, true)?;
        feedme::patch_param(feedme, "D", &item.psf_name(), 1, true)?;
        if let Some(mag0) = seeds.zero_point {
            feedme::patch_param(feedme, "J", &mag0.to_string(), 1, true)?;
        }

        // Then the object seeds: object 1 is the bulge, object 2 the disk.
        // Both start from the same header values and are left free.
        for object in 1..=2 {
            feedme::patch_param(feedme, "3", &seeds.magnitude.to_string(), object, false)?;
            feedme::patch_param(feedme, "4", &seeds.radius.to_string(), object, false)?;
        }

        // Mask generation is best effort; a missing or broken `ic` must
        // not stop the fit.
        if self.config.make_mask() {
            match self.fitter.make_mask(&source, &self.workspace).await {
                Ok(outcome) if outcome.succeeded() => {}
                Ok(outcome) => {
                    tracing::warn!(
                        "Mask generation for {} failed ({:?}); continuing without it",
                        source.display(),
                        outcome
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Mask generation for {} failed ({}); continuing without it",
                        source.display(),
                        e
                    );
                }
            }
        }

        self.workspace.clean()
    }

    async fn invoke(&self, item: &WorkItem) -> Result<FitOutcome> {
        let first_pass = self.fitter.fit(&self.workspace).await?;
        if !first_pass.succeeded() {
            tracing::warn!(
                "GALFIT exited abnormally for {} ({:?}); checking artifacts anyway",
                item.source_name(),
                first_pass
            );
        }

        // The presence of galfit.01, not the exit code, decides whether
        // the refinement pass can run.
        let refinement = if self.workspace.fit_result.exists() {
            let outcome = self.fitter.refine(&self.workspace).await?;
            self.workspace.discard_fit_result()?;
            Some(outcome)
        } else {
            tracing::warn!(
                "No {} after the first pass for {}; skipping refinement",
                crate::core::workspace::FIT_RESULT_NAME,
                item.source_name()
            );
            None
        };

        Ok(FitOutcome {
            first_pass,
            refinement,
            model_block_present: self.workspace.model_block.exists(),
            subcomponents_present: self.workspace.subcomponents.exists(),
        })
    }

    async fn extract(&self, item: &WorkItem, outcome: &FitOutcome) -> Result<Extraction> {
        let mut extraction = Extraction::default();
        if !outcome.model_block_present {
            extraction.missing_artifacts.push(MODEL_BLOCK_NAME.to_string());
        }
        if !outcome.subcomponents_present {
            extraction
                .missing_artifacts
                .push(SUBCOMPONENTS_NAME.to_string());
        }
        if !extraction.missing_artifacts.is_empty() {
            tracing::warn!(
                "Skipping extraction for {}: missing {:?}",
                item.source_name(),
                extraction.missing_artifacts
            );
            return Ok(extraction);
        }

        let layout = self.config.layout();
        let residual = fits::read_plane(&self.workspace.model_block, layout.residual_plane)?;
        let bulge = fits::read_plane(&self.workspace.subcomponents, layout.bulge_plane)?;
        let disk = fits::read_plane(&self.workspace.subcomponents, layout.disk_plane)?;
        let disk_residual = fits::composite(&disk, &residual)?;

        let overwrite = self.config.overwrite();
        for (kind, plane) in [
            (OutputKind::Residual, &residual),
            (OutputKind::Bulge, &bulge),
            (OutputKind::Disk, &disk),
            (OutputKind::DiskResidual, &disk_residual),
        ] {
            let path = self.output_path(item, kind);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            fits::write_plane(&path, plane, overwrite)?;
            tracing::info!("Output file: {}", path.display());
            extraction.outputs.push(path);
        }

        Ok(extraction)
    }
}
