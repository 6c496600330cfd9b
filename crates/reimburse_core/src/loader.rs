//! Model loading and the injectable model provider.
//!
//! Loading has three outcomes: the artifact is absent (not an error, the
//! residual is zero), loaded, or invalid (a fatal [`ReimburseError`]).
//! [`CachedModelLoader`] performs the read at most once per process; a failed
//! read leaves the cache empty so a later call may retry.

use crate::artifact::ArtifactDocument;
use crate::errors::{ReimburseError, Result};
use crate::residual::ResidualModel;
use once_cell::sync::OnceCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of reading an artifact path
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No file at the path
    Absent,
    /// File parsed and validated
    Loaded(ResidualModel),
}

impl LoadOutcome {
    pub fn into_model(self) -> Option<ResidualModel> {
        match self {
            LoadOutcome::Absent => None,
            LoadOutcome::Loaded(model) => Some(model),
        }
    }
}

/// BLAKE3 fingerprint of raw artifact bytes, hex encoded
pub fn artifact_fingerprint(bytes: &[u8]) -> String {
    hex::encode(blake3::hash(bytes).as_bytes())
}

/// Parse and validate artifact bytes
pub fn parse_artifact(bytes: &[u8]) -> Result<ResidualModel> {
    let document: ArtifactDocument = serde_json::from_slice(bytes)?;
    ResidualModel::from_document(document)
}

/// Read an artifact from disk
pub fn load_artifact(path: &Path) -> Result<LoadOutcome> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Residual model not found at {}; residual correction disabled",
                path.display()
            );
            return Ok(LoadOutcome::Absent);
        }
        Err(source) => {
            return Err(ReimburseError::ModelRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let model = parse_artifact(&bytes)?;

    info!(
        path = %path.display(),
        kind = model.gbdt().kind(),
        trees = model.gbdt().num_trees(),
        features = model.layout().len(),
        fingerprint = %artifact_fingerprint(&bytes),
        "Residual model loaded"
    );
    for name in model.layout().unresolved() {
        warn!("Model feature `{name}` is not derived here; it will read as 0.0");
    }

    Ok(LoadOutcome::Loaded(model))
}

/// Source of the residual model handed to the calculator
pub trait ModelProvider {
    /// `Ok(None)` means no model is available and the residual is zero
    fn residual_model(&self) -> Result<Option<&ResidualModel>>;
}

/// Reads the artifact on first use and keeps it for the provider's lifetime
#[derive(Debug)]
pub struct CachedModelLoader {
    path: PathBuf,
    cell: OnceCell<Option<ResidualModel>>,
}

impl CachedModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the artifact has been read (successfully) yet
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl ModelProvider for CachedModelLoader {
    fn residual_model(&self) -> Result<Option<&ResidualModel>> {
        self.cell
            .get_or_try_init(|| load_artifact(&self.path).map(LoadOutcome::into_model))
            .map(Option::as_ref)
    }
}

/// Provider that never has a model
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModel;

impl ModelProvider for NoModel {
    fn residual_model(&self) -> Result<Option<&ResidualModel>> {
        Ok(None)
    }
}

impl ModelProvider for ResidualModel {
    fn residual_model(&self) -> Result<Option<&ResidualModel>> {
        Ok(Some(self))
    }
}

impl ModelProvider for Option<ResidualModel> {
    fn residual_model(&self) -> Result<Option<&ResidualModel>> {
        Ok(self.as_ref())
    }
}

impl<P: ModelProvider + ?Sized> ModelProvider for &P {
    fn residual_model(&self) -> Result<Option<&ResidualModel>> {
        (**self).residual_model()
    }
}

impl<P: ModelProvider + ?Sized> ModelProvider for Arc<P> {
    fn residual_model(&self) -> Result<Option<&ResidualModel>> {
        (**self).residual_model()
    }
}
