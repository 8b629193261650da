use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalfitError {
    #[error("FITS operation failed: {0}")]
    FitsError(#[from] fitsio::errors::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Config file parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("External process failed: {command}: {message}")]
    ExternalProcessError { command: String, message: String },

    #[error("Required header key {key} missing from {path:?}")]
    MissingMetadataError { key: String, path: PathBuf },

    #[error("Plane shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatchError {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Output already exists: {path:?} (pass --overwrite to replace)")]
    OutputExistsError { path: PathBuf },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, GalfitError>;
