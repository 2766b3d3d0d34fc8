//! Feature catalog and registry.
//!
//! A [`Feature`] is a named scalar computed from an [`ObjectCache`]. The
//! [`FeatureRegistry`] keeps features sorted by name; that order is the column
//! order of every row the engine produces.

mod color;
mod location;
mod metadata;
mod shape;
mod texture;

use std::fmt;

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use strum_macros::{Display, EnumIter, EnumString};

use crate::cache::ObjectCache;
use crate::error::ObjectResult;
use crate::quantity::evaluation_order;

/// Marker every feature name starts with. Stripped from column names.
pub const FEATURE_PREFIX: &str = "_feature_";

pub type Evaluator = Box<dyn Fn(&ObjectCache<'_>) -> ObjectResult<f64> + Send + Sync>;

/// Informational grouping, the first word of a feature name.
#[derive(Debug, Display, EnumIter, EnumString, Copy, Clone, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum FeatureCategory {
    Color,
    Location,
    Metadata,
    Shape,
    Texture,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FeatureStatus {
    Implemented,
    /// Declared for column compatibility; always evaluates to `0.0`.
    Placeholder,
}

pub struct Feature {
    name: String,
    category: FeatureCategory,
    status: FeatureStatus,
    evaluator: Evaluator,
}

impl Feature {
    /// `column` is the name without prefix and category, e.g.
    /// `object_mean_intensity` in [`FeatureCategory::Color`].
    pub fn new<F>(category: FeatureCategory, column: &str, evaluator: F) -> Self
    where
        F: Fn(&ObjectCache<'_>) -> ObjectResult<f64> + Send + Sync + 'static,
    {
        Self {
            name: format!("{FEATURE_PREFIX}{category}_{column}"),
            category,
            status: FeatureStatus::Implemented,
            evaluator: Box::new(evaluator),
        }
    }

    pub fn placeholder(category: FeatureCategory, column: &str) -> Self {
        Self {
            status: FeatureStatus::Placeholder,
            ..Self::new(category, column, |_| Ok(0.0))
        }
    }

    /// Full name, including [`FEATURE_PREFIX`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name: the full name without [`FEATURE_PREFIX`].
    pub fn column(&self) -> &str {
        self.name.strip_prefix(FEATURE_PREFIX).unwrap_or(&self.name)
    }

    pub fn category(&self) -> FeatureCategory {
        self.category
    }

    pub fn status(&self) -> FeatureStatus {
        self.status
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == FeatureStatus::Placeholder
    }

    pub fn evaluate(&self, cache: &ObjectCache<'_>) -> ObjectResult<f64> {
        (self.evaluator)(cache)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Every builtin feature, unsorted.
pub fn catalog() -> Vec<Feature> {
    let mut features = Vec::new();
    features.extend(color::features());
    features.extend(location::features());
    features.extend(metadata::features());
    features.extend(shape::features());
    features.extend(texture::features());
    features
}

static BUILTIN: Lazy<FeatureRegistry> = Lazy::new(|| {
    if let Err(cycle) = evaluation_order() {
        panic!("Derived quantities must form a DAG: {cycle}");
    }
    FeatureRegistry::new(catalog())
});

/// Sorted, name-indexed set of features.
#[derive(Debug)]
pub struct FeatureRegistry {
    features: Vec<Feature>,
    index: HashMap<String, usize>,
}

impl FeatureRegistry {
    /// Sorts `features` by name. Panics on a duplicate name.
    pub fn new(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut features: Vec<Feature> = features.into_iter().collect();
        features.sort_by(|a, b| a.name.cmp(&b.name));

        let mut index = HashMap::with_capacity(features.len());
        for (position, feature) in features.iter().enumerate() {
            if index.insert(feature.name.clone(), position).is_some() {
                panic!("Feature {} already exists", feature.name);
            }
        }

        Self { features, index }
    }

    /// The process-wide registry of builtin features.
    pub fn builtin() -> &'static FeatureRegistry {
        &BUILTIN
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Column names in evaluation order.
    pub fn columns(&self) -> Vec<&str> {
        self.features.iter().map(Feature::column).collect()
    }

    /// Column position of a feature, by full or column name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index
            .get(name)
            .or_else(|| self.index.get(&format!("{FEATURE_PREFIX}{name}")))
            .copied()
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.position(name).map(|position| &self.features[position])
    }

    pub fn count(&self, status: FeatureStatus) -> usize {
        self.features.iter().filter(|f| f.status == status).count()
    }

    /// Evaluates every feature in column order. Stops at the first failure.
    pub fn evaluate_all(&self, cache: &ObjectCache<'_>) -> ObjectResult<Vec<f64>> {
        self.features
            .iter()
            .map(|feature| feature.evaluate(cache))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FeatureRegistry {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests;
