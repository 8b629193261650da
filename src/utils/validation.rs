use crate::config::RunSettings;
use crate::utils::error::{GalfitError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        if self.filters.is_empty() {
            return Err(GalfitError::ConfigError {
                message: "no filters configured".to_string(),
            });
        }
        if self.filters.iter().any(|f| f.trim().is_empty()) {
            return Err(GalfitError::ConfigError {
                message: "blank filter name in filter list".to_string(),
            });
        }
        if self.range.is_empty() {
            return Err(GalfitError::ConfigError {
                message: format!(
                    "empty galaxy index range {}..{}",
                    self.range.start, self.range.end
                ),
            });
        }
        if self.timeout.is_zero() {
            return Err(GalfitError::ConfigError {
                message: "process timeout must be greater than zero".to_string(),
            });
        }
        if !self.galaxy_dir.is_dir() {
            return Err(GalfitError::ConfigError {
                message: format!("galaxy directory not found: {}", self.galaxy_dir.display()),
            });
        }
        Ok(())
    }
}
