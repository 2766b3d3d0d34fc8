use thiserror::Error;

use crate::ndimage::NdimageError;
use crate::quantity::Quantity;

/// Errors raised while building an engine, before any object is visited.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("Label image contains no objects")]
    NoObjects,

    #[error("Intensity image shape {intensity:?} is incompatible with label image shape {label:?}")]
    ShapeMismatch {
        label: Vec<usize>,
        intensity: Vec<usize>,
    },

    #[error("Invalid configuration value for '{parameter}': {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },
}

/// Errors raised while evaluating a single object.
///
/// Only the offending object's row fails; iteration can continue.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObjectError {
    #[error("Object {label} is degenerate: {quantity} is undefined")]
    Degenerate { label: u32, quantity: Quantity },

    #[error("Computing {quantity} for object {label} failed: {source}")]
    Dependency {
        label: u32,
        quantity: Quantity,
        #[source]
        source: NdimageError,
    },
}

impl ObjectError {
    /// Label of the object whose evaluation failed.
    pub fn label(&self) -> u32 {
        match self {
            ObjectError::Degenerate { label, .. } | ObjectError::Dependency { label, .. } => *label,
        }
    }

    /// Derived quantity that could not be produced.
    pub fn quantity(&self) -> Quantity {
        match self {
            ObjectError::Degenerate { quantity, .. } | ObjectError::Dependency { quantity, .. } => {
                *quantity
            }
        }
    }
}

pub type ObjectResult<T> = Result<T, ObjectError>;

/// Errors returned by batch extraction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Object(#[from] ObjectError),
}
