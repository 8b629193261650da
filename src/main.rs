use clap::Parser;
use galfit_runner::core::engine::work_items;
use galfit_runner::utils::{logger, validation::Validate};
use galfit_runner::{CliConfig, FitPipeline, GalfitProcess, RunEngine, RunSettings, Workspace};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting galfit-runner");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match RunSettings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to resolve configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let workspace = match Workspace::new(&cli.workdir, &cli.feedme) {
        Ok(workspace) => workspace,
        Err(e) => {
            tracing::error!("Working directory not usable: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let items = work_items(&settings);
    let report_dir = settings.output_dir.clone();
    tracing::info!(
        "{} work item(s) across {} filter(s)",
        items.len(),
        settings.filters.len()
    );

    let fitter = GalfitProcess::new(settings.timeout);
    let pipeline = FitPipeline::new(fitter, settings, workspace);
    let engine = RunEngine::new(pipeline);

    match engine.run(&items, &report_dir).await {
        Ok(summary) => {
            println!(
                "✅ Run complete: {} completed, {} partial, {} aborted",
                summary.completed, summary.partial, summary.aborted
            );
            println!("📁 Reports written to: {}", report_dir.display());
            if summary.aborted > 0 {
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
