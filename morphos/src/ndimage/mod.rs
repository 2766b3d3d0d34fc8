//! N-dimensional image routines consumed by the feature engine.
//!
//! These follow the contracts of the classic `scipy.ndimage` / `skimage.measure`
//! routines the feature catalog is defined against:
//!
//! - [`find_objects`]: per-label bounding boxes
//! - [`img_as_ubyte`]: float to 8-bit conversion
//! - [`moments`], [`moments_central`]: raw and central image moments
//! - [`inertia_tensor`], [`inertia_tensor_eigvals`]: second-order shape tensor
//! - [`convex_hull_image`]: filled convex hull of a binary mask
//! - [`find_outer_boundaries`]: background pixels touching the foreground
//! - [`euler_number`]: Euler characteristic of the foreground

mod boundaries;
mod convex_hull;
mod dtype;
mod euler;
mod inertia;
mod moments;
mod objects;

use thiserror::Error;

pub use boundaries::find_outer_boundaries;
pub use convex_hull::convex_hull_image;
pub use dtype::img_as_ubyte;
pub use euler::euler_number;
pub use inertia::{inertia_tensor, inertia_tensor_eigvals};
pub use moments::{moments, moments_central};
pub use objects::find_objects;

/// Failure of an image routine on malformed input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NdimageError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Value {value} outside of the supported range [{min}, {max}]")]
    ValueRange { value: f64, min: f64, max: f64 },

    #[error("Unsupported input: {0}")]
    Unsupported(String),

    #[error("Eigenvalue decomposition did not converge")]
    NoConvergence,

    #[error("Invalid array shape: {0}")]
    Shape(String),
}

pub type NdimageResult<T> = Result<T, NdimageError>;
