//! Error types for the reimbursement engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while computing a reimbursement
#[derive(Error, Debug)]
pub enum ReimburseError {
    /// Trip input rejected before any computation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model artifact exists but could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model artifact is not valid JSON or does not match the document shape
    #[error("Failed to parse model artifact: {0}")]
    ModelParse(#[from] serde_json::Error),

    /// Model artifact parsed but violates the schema
    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    /// Tree ensemble produced NaN or infinity
    #[error("Residual prediction is not finite: {0}")]
    NonFiniteResidual(f64),

    /// Amount cannot be represented as whole cents
    #[error("Amount out of range: {0}")]
    Overflow(String),

    /// Configuration file or environment override rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for reimbursement operations
pub type Result<T> = std::result::Result<T, ReimburseError>;
