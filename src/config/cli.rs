use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "galfit-runner")]
#[command(about = "Batch driver for GALFIT two-component galaxy fits")]
pub struct CliConfig {
    /// Directory holding the input galaxy images ({filter}_gal{index}.fits)
    #[arg(long, default_value = "galaxies")]
    pub galaxy_dir: PathBuf,

    /// Directory for extracted planes and run reports
    #[arg(long, default_value = "galfit_outputs")]
    pub output_dir: PathBuf,

    /// Directory GALFIT runs in (holds the feedme and its artifacts)
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,

    /// Name of the GALFIT parameter file inside the working directory
    #[arg(long, default_value = "sim.feedme")]
    pub feedme: String,

    /// Filters to process, comma separated
    #[arg(long, value_delimiter = ',', default_value = "f606w,f814w")]
    pub filters: Vec<String>,

    /// First galaxy index, inclusive
    #[arg(long, default_value = "0")]
    pub start: u32,

    /// Last galaxy index, exclusive
    #[arg(long, default_value = "101")]
    pub end: u32,

    /// Overwrite existing output files instead of failing
    #[arg(long)]
    pub overwrite: bool,

    /// Read MAG0 from each source image and patch the J) zero point record
    #[arg(long)]
    pub zero_point: bool,

    /// Generate mask.fits with the `ic` tool before each fit
    #[arg(long)]
    pub mask: bool,

    /// Seconds to wait for each external invocation before killing it
    #[arg(long, default_value = "300")]
    pub timeout_seconds: u64,

    /// Optional TOML file overriding header defaults and plane layout
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
