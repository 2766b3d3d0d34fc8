//! Morphos - per-object feature extraction from labeled images.
//!
//! Given a label image (`0` = background, every positive value one object) and a
//! matching intensity image, morphos produces one row of numeric features per
//! object:
//! - intensity statistics over the object, its outer edge and the whole image
//! - raw spatial moments, centroids, Euler number and other shape descriptors
//! - a fixed, lexicographically sorted column layout of 197 named features
//!
//! Intermediate quantities (crop, mask, moments, inertia tensor, ..) are
//! computed lazily and memoized per object in an [`ObjectCache`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use morphos::{extract, ExtractionConfig, IntensityImage, LabelImage, ObjectFeatureIterator};
//!
//! let label = LabelImage::new(labels);
//! let intensity = IntensityImage::from_u8(pixels);
//!
//! // Pull rows one object at a time
//! let engine = ObjectFeatureIterator::new(&label, &intensity)?;
//! let columns = engine.columns();
//! for row in engine {
//!     let values = row?;
//! }
//!
//! // Or build the whole table, in parallel
//! let table = extract(&label, &intensity, &ExtractionConfig::default())?;
//! println!("{} objects, {} columns", table.len(), table.columns.len());
//! ```

mod cache;
mod config;
mod engine;
mod error;
mod extract;
mod feature;
mod image;
pub(crate) mod math;
pub mod ndimage;
mod object_slice;
mod quantity;
mod scene;

// ============================================================================
// Images and objects
// ============================================================================

pub use image::{IntensityImage, LabelImage};
pub use object_slice::{locate_objects, ObjectSlice};

// ============================================================================
// Engine
// ============================================================================

pub use cache::{ObjectCache, MOMENT_ORDER, MOMENT_RANK};
pub use engine::{EngineState, ObjectFeatureIterator};
pub use quantity::{dependency_order, evaluation_order, CycleDetected, Quantity};

// ============================================================================
// Features
// ============================================================================

pub use feature::{
    catalog, Evaluator, Feature, FeatureCategory, FeatureRegistry, FeatureStatus, FEATURE_PREFIX,
};

// ============================================================================
// Batch extraction and configuration
// ============================================================================

pub use config::{ExtractionConfig, ObjectErrorPolicy};
pub use extract::{extract, extract_with_registry, FeatureRow, FeatureTable, SkippedObject};

// ============================================================================
// Errors
// ============================================================================

pub use error::{ConstructionError, ExtractError, ObjectError, ObjectResult};
pub use ndimage::NdimageError;
