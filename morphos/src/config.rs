//! Configuration for engines and batch extraction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConstructionError;

// ============================================================================
// Enums
// ============================================================================

/// What batch extraction does when one object fails to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectErrorPolicy {
    /// Log the failure, record the object as skipped and continue.
    #[default]
    Skip,
    /// Abort the whole batch with the first failure.
    Fail,
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Evaluate objects on the rayon thread pool. Rows keep label order.
    pub parallel: bool,

    pub on_object_error: ObjectErrorPolicy,

    /// Neighbourhood used for the Euler number: `1` for face neighbours,
    /// `ndim` for full connectivity. `None` selects full connectivity.
    pub euler_connectivity: Option<usize>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            on_object_error: ObjectErrorPolicy::Skip,
            euler_connectivity: None,
        }
    }
}

impl ExtractionConfig {
    /// Loads a YAML or JSON config, chosen by file extension.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        common::serde_io::deserialize_file(path)
    }

    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Checks the config against a label image of rank `ndim`.
    pub fn validate(&self, ndim: usize) -> Result<(), ConstructionError> {
        if let Some(connectivity) = self.euler_connectivity {
            if connectivity != 1 && connectivity != ndim {
                return Err(ConstructionError::InvalidConfig {
                    parameter: "euler_connectivity",
                    reason: format!("expected 1 or {ndim}, got {connectivity}"),
                });
            }
        }
        Ok(())
    }

    pub fn euler_connectivity_for(&self, ndim: usize) -> usize {
        self.euler_connectivity.unwrap_or(ndim)
    }
}
