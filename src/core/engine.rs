use crate::domain::model::{
    Extraction, FitOutcome, RunSummary, Seeds, WorkItem, WorkReport, WorkStatus,
};
use crate::domain::ports::{ConfigProvider, Pipeline};
use crate::utils::error::Result;
use chrono::Utc;
use std::path::Path;

/// Build the work list: every index in the configured range, every filter.
/// Index-major order so both filters of one galaxy are fitted back to back.
pub fn work_items(config: &impl ConfigProvider) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for index in config.index_range() {
        for filter in config.filters() {
            items.push(WorkItem::new(filter.clone(), index));
        }
    }
    items
}

/// Drives the pipeline stages for each work item in sequence and writes
/// the audit report when the run is over.
pub struct RunEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RunEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, items: &[WorkItem], report_dir: &Path) -> Result<RunSummary> {
        let started_at = Utc::now();
        let mut reports = Vec::with_capacity(items.len());

        for item in items {
            tracing::info!(
                "Processing {} ({} of {})",
                item.source_name(),
                reports.len() + 1,
                items.len()
            );
            reports.push(self.run_item(item).await);
        }

        let finished_at = Utc::now();
        let summary = RunSummary {
            started_at,
            finished_at,
            completed: count(&reports, WorkStatus::Completed),
            partial: count(&reports, WorkStatus::Partial),
            aborted: count(&reports, WorkStatus::Aborted),
            reports,
        };
        self.write_reports(&summary, report_dir)?;

        tracing::info!(
            "Run finished in {}s: {} completed, {} partial, {} aborted",
            (finished_at - started_at).num_seconds(),
            summary.completed,
            summary.partial,
            summary.aborted
        );
        Ok(summary)
    }

    /// One item, start to finish. Fatal errors become an aborted report
    /// instead of stopping the run.
    async fn run_item(&self, item: &WorkItem) -> WorkReport {
        let started_at = Utc::now();
        match self.process(item).await {
            Ok((seeds, fit, extraction)) => {
                let status = if extraction.missing_artifacts.is_empty() {
                    WorkStatus::Completed
                } else {
                    WorkStatus::Partial
                };
                WorkReport {
                    item: item.clone(),
                    status,
                    seeds: Some(seeds),
                    fit: Some(fit),
                    outputs: extraction.outputs,
                    missing_artifacts: extraction.missing_artifacts,
                    error: None,
                    started_at,
                    finished_at: Utc::now(),
                }
            }
            Err(e) => {
                tracing::error!("{} aborted: {}", item.source_name(), e);
                WorkReport {
                    item: item.clone(),
                    status: WorkStatus::Aborted,
                    seeds: None,
                    fit: None,
                    outputs: Vec::new(),
                    missing_artifacts: Vec::new(),
                    error: Some(e.to_string()),
                    started_at,
                    finished_at: Utc::now(),
                }
            }
        }
    }

    async fn process(&self, item: &WorkItem) -> Result<(Seeds, FitOutcome, Extraction)> {
        let seeds = self.pipeline.seed(item).await?;
        self.pipeline.prepare(item, &seeds).await?;
        let fit = self.pipeline.invoke(item).await?;
        let extraction = self.pipeline.extract(item, &fit).await?;
        Ok((seeds, fit, extraction))
    }

    fn write_reports(&self, summary: &RunSummary, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let json_path = dir.join("run_report.json");
        std::fs::write(&json_path, serde_json::to_string_pretty(summary)?)?;

        let csv_path = dir.join("run_report.csv");
        let mut writer = csv::Writer::from_path(&csv_path)?;
        writer.write_record(["filter", "index", "status", "outputs", "missing", "error"])?;
        for report in &summary.reports {
            writer.write_record([
                report.item.filter.clone(),
                report.item.index.to_string(),
                report.status.to_string(),
                report.outputs.len().to_string(),
                report.missing_artifacts.join(";"),
                report.error.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush()?;

        tracing::info!("Audit report written to {}", json_path.display());
        Ok(())
    }
}

fn count(reports: &[WorkReport], status: WorkStatus) -> usize {
    reports.iter().filter(|r| r.status == status).count()
}
