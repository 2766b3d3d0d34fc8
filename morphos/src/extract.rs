//! Batch extraction of a whole feature table.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::ObjectCache;
use crate::config::{ExtractionConfig, ObjectErrorPolicy};
use crate::error::{ExtractError, ObjectResult};
use crate::feature::FeatureRegistry;
use crate::image::{IntensityImage, LabelImage};
use crate::object_slice::{locate_objects, ObjectSlice};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    /// 1-based position among the located objects.
    pub object_index: usize,
    pub label: u32,
    pub values: Vec<f64>,
}

/// An object left out of the table under [`ObjectErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedObject {
    pub object_index: usize,
    pub label: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<FeatureRow>,
    pub skipped: Vec<SkippedObject>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Value of `column` in the row of the object with `label`.
    pub fn value(&self, label: u32, column: &str) -> Option<f64> {
        let column = self.column_index(column)?;
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.values[column])
    }

    /// One column across all rows.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let column = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row.values[column]).collect())
    }
}

/// Extracts every builtin feature for every object.
pub fn extract(
    label: &LabelImage,
    intensity: &IntensityImage,
    config: &ExtractionConfig,
) -> Result<FeatureTable, ExtractError> {
    extract_with_registry(label, intensity, config, FeatureRegistry::builtin())
}

pub fn extract_with_registry(
    label: &LabelImage,
    intensity: &IntensityImage,
    config: &ExtractionConfig,
    registry: &FeatureRegistry,
) -> Result<FeatureTable, ExtractError> {
    let scene = Scene::new(label, intensity, config)?;
    let objects = locate_objects(label)?;

    debug!(
        objects = objects.len(),
        parallel = config.parallel,
        "Extracting features"
    );

    // Each evaluation owns its cache; only the scene is shared.
    let evaluate = |(position, object): (usize, &ObjectSlice)| -> ObjectResult<Vec<f64>> {
        let cache = ObjectCache::new(scene.clone(), object.clone(), position + 1);
        registry.evaluate_all(&cache)
    };

    let results: Vec<ObjectResult<Vec<f64>>> = if config.parallel {
        objects.par_iter().enumerate().map(evaluate).collect()
    } else {
        objects.iter().enumerate().map(evaluate).collect()
    };

    let mut table = FeatureTable {
        columns: registry.columns().into_iter().map(str::to_string).collect(),
        rows: Vec::with_capacity(objects.len()),
        skipped: Vec::new(),
    };

    for (position, (object, result)) in objects.iter().zip(results).enumerate() {
        let object_index = position + 1;
        match result {
            Ok(values) => table.rows.push(FeatureRow {
                object_index,
                label: object.label(),
                values,
            }),
            Err(error) => match config.on_object_error {
                ObjectErrorPolicy::Fail => return Err(error.into()),
                ObjectErrorPolicy::Skip => {
                    warn!(label = object.label(), %error, "Skipping object");
                    table.skipped.push(SkippedObject {
                        object_index,
                        label: object.label(),
                        reason: error.to_string(),
                    });
                }
            },
        }
    }

    Ok(table)
}
