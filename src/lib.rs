pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::galfit::GalfitProcess;
pub use config::{CliConfig, FileConfig, RunSettings};
pub use core::{engine::RunEngine, pipeline::FitPipeline, workspace::Workspace};
pub use utils::error::{GalfitError, Result};
