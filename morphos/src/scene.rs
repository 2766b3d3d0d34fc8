//! Immutable inputs shared by every object of one extraction.

use std::sync::{Arc, OnceLock};

use crate::config::ExtractionConfig;
use crate::error::ConstructionError;
use crate::image::{is_multichannel, IntensityImage, LabelImage};
use crate::math::statistics::{Statistic, Summary};
use crate::ndimage::{euler_number, NdimageResult};

/// Whole-image values that do not depend on the current object.
///
/// Filled at most once and shared between engines and rayon workers.
#[derive(Debug, Default)]
struct SceneCache {
    intensity_summary: OnceLock<Summary>,
    euler_number: OnceLock<NdimageResult<i64>>,
}

/// Label and intensity images validated against each other.
#[derive(Debug, Clone)]
pub(crate) struct Scene<'a> {
    label: &'a LabelImage,
    intensity: &'a IntensityImage,
    multichannel: bool,
    euler_connectivity: usize,
    shared: Arc<SceneCache>,
}

impl<'a> Scene<'a> {
    pub(crate) fn new(
        label: &'a LabelImage,
        intensity: &'a IntensityImage,
        config: &ExtractionConfig,
    ) -> Result<Self, ConstructionError> {
        let multichannel = is_multichannel(label, intensity)?;
        config.validate(label.ndim())?;

        Ok(Self {
            label,
            intensity,
            multichannel,
            euler_connectivity: config.euler_connectivity_for(label.ndim()),
            shared: Arc::default(),
        })
    }

    #[inline]
    pub(crate) fn label(&self) -> &'a LabelImage {
        self.label
    }

    #[inline]
    pub(crate) fn intensity(&self) -> &'a IntensityImage {
        self.intensity
    }

    #[inline]
    pub(crate) fn multichannel(&self) -> bool {
        self.multichannel
    }

    /// Rank of the label image.
    #[inline]
    pub(crate) fn ndim(&self) -> usize {
        self.label.ndim()
    }

    /// Number of spatial pixels, ignoring the channel axis.
    pub(crate) fn spatial_size(&self) -> usize {
        self.label.shape().iter().product()
    }

    pub(crate) fn intensity_statistic(&self, statistic: Statistic) -> f64 {
        self.shared
            .intensity_summary
            .get_or_init(|| {
                let values = self.intensity.pixels().iter().map(|&v| v as f64).collect();
                Summary::of(values)
            })
            .get(statistic)
    }

    /// Euler number of the whole label image.
    pub(crate) fn euler_number(&self) -> NdimageResult<i64> {
        self.shared
            .euler_number
            .get_or_init(|| euler_number(self.label.labels().view(), self.euler_connectivity))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_scene_validates_inputs() {
        let label = LabelImage::new(array![[0u32, 1], [1, 1]]);
        let intensity = IntensityImage::new(Array3::<f32>::zeros((2, 2, 3)));
        let scene = Scene::new(&label, &intensity, &ExtractionConfig::default()).unwrap();
        assert!(scene.multichannel());
        assert_eq!(scene.spatial_size(), 4);

        let config = ExtractionConfig {
            euler_connectivity: Some(5),
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            Scene::new(&label, &intensity, &config),
            Err(ConstructionError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_whole_image_values_are_shared() {
        let label = LabelImage::new(array![[1u32, 0], [0, 0]]);
        let intensity = IntensityImage::new(array![[0.5f32, 0.0], [0.25, 0.25]]);
        let scene = Scene::new(&label, &intensity, &ExtractionConfig::default()).unwrap();
        let copy = scene.clone();

        assert!((scene.intensity_statistic(Statistic::Integrated) - 1.0).abs() < 1e-12);
        assert!((copy.intensity_statistic(Statistic::Median) - 0.25).abs() < 1e-12);
        assert!(Arc::ptr_eq(&scene.shared, &copy.shared));
        assert_eq!(scene.euler_number(), Ok(1));
    }
}
