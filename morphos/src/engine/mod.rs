//! The object feature iterator.
//!
//! ```text
//! Ready(1) ──► Ready(2) ──► … ──► Ready(N) ──► Exhausted ──► Exhausted …
//! ```
//!
//! Every step builds a fresh [`ObjectCache`] for the next object, evaluates the
//! registry against it and yields the row. The cache of the previous object is
//! dropped before anything is computed for the next one.

use std::iter::FusedIterator;

use tracing::debug;

use crate::cache::ObjectCache;
use crate::config::ExtractionConfig;
use crate::error::{ConstructionError, ObjectResult};
use crate::feature::FeatureRegistry;
use crate::image::{IntensityImage, LabelImage};
use crate::object_slice::{locate_objects, ObjectSlice};
use crate::scene::Scene;

/// Cursor position of an [`ObjectFeatureIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// The next call to `next` evaluates object `i` (1-based).
    Ready(usize),
    Exhausted,
}

#[derive(Debug)]
pub struct ObjectFeatureIterator<'a> {
    scene: Scene<'a>,
    registry: &'a FeatureRegistry,
    objects: Vec<ObjectSlice>,
    state: EngineState,
    current: Option<ObjectCache<'a>>,
}

impl<'a> ObjectFeatureIterator<'a> {
    /// Engine over the builtin features with the default config.
    pub fn new(
        label: &'a LabelImage,
        intensity: &'a IntensityImage,
    ) -> Result<Self, ConstructionError> {
        Self::with_config(label, intensity, &ExtractionConfig::default())
    }

    pub fn with_config(
        label: &'a LabelImage,
        intensity: &'a IntensityImage,
        config: &ExtractionConfig,
    ) -> Result<Self, ConstructionError> {
        Self::with_registry(label, intensity, config, FeatureRegistry::builtin())
    }

    pub fn with_registry(
        label: &'a LabelImage,
        intensity: &'a IntensityImage,
        config: &ExtractionConfig,
        registry: &'a FeatureRegistry,
    ) -> Result<Self, ConstructionError> {
        let scene = Scene::new(label, intensity, config)?;
        let objects = locate_objects(label)?;

        debug!(
            objects = objects.len(),
            multichannel = scene.multichannel(),
            features = registry.len(),
            "Feature engine ready"
        );

        Ok(Self {
            scene,
            registry,
            objects,
            state: EngineState::Ready(1),
            current: None,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Column names, aligned with every yielded row.
    pub fn columns(&self) -> Vec<&'a str> {
        self.registry.columns()
    }

    pub fn registry(&self) -> &'a FeatureRegistry {
        self.registry
    }

    pub fn objects(&self) -> &[ObjectSlice] {
        &self.objects
    }

    /// Cache of the object evaluated by the last call to `next`.
    pub fn current(&self) -> Option<&ObjectCache<'a>> {
        self.current.as_ref()
    }

    /// Moves to the next object with a fresh cache. Returns `None` once all
    /// objects have been visited.
    fn advance(&mut self) -> Option<&ObjectCache<'a>> {
        // Drop the previous object's quantities first, also on the final step.
        self.current = None;

        let EngineState::Ready(index) = self.state else {
            return None;
        };

        let Some(object) = self.objects.get(index - 1) else {
            self.state = EngineState::Exhausted;
            return None;
        };

        self.state = if index < self.objects.len() {
            EngineState::Ready(index + 1)
        } else {
            EngineState::Exhausted
        };

        let cache = ObjectCache::new(self.scene.clone(), object.clone(), index);
        Some(self.current.insert(cache))
    }
}

impl Iterator for ObjectFeatureIterator<'_> {
    type Item = ObjectResult<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let registry = self.registry;
        let cache = self.advance()?;
        Some(registry.evaluate_all(cache))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.state {
            EngineState::Ready(index) => self.objects.len() + 1 - index,
            EngineState::Exhausted => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ObjectFeatureIterator<'_> {}

impl FusedIterator for ObjectFeatureIterator<'_> {}
