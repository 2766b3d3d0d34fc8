//! Label and intensity images.
//!
//! Both images are stored as dynamic-rank `ndarray` arrays in standard (row-major)
//! layout so crops and reshapes never depend on the caller's memory order.

use ndarray::{Array, ArrayD, Dimension};

use crate::error::ConstructionError;

fn into_standard_layout<T: Clone, D: Dimension>(array: Array<T, D>) -> ArrayD<T> {
    let array = array.into_dyn();
    if array.is_standard_layout() {
        array
    } else {
        array.as_standard_layout().into_owned()
    }
}

/// N-dimensional label map. `0` is background, every positive value is one object.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelImage {
    labels: ArrayD<u32>,
}

impl LabelImage {
    pub fn new<D: Dimension>(labels: Array<u32, D>) -> Self {
        Self {
            labels: into_standard_layout(labels),
        }
    }

    #[inline]
    pub fn labels(&self) -> &ArrayD<u32> {
        &self.labels
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.labels.ndim()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.labels.shape()
    }

    /// Number of pixels (voxels) in the image.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_label(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }
}

impl<D: Dimension> From<Array<u32, D>> for LabelImage {
    fn from(labels: Array<u32, D>) -> Self {
        Self::new(labels)
    }
}

/// Floating-point intensity image, spatially matching a [`LabelImage`].
///
/// May carry one extra trailing channel axis (multichannel). Values are expected
/// in the normalised `[0, 1]` range; use [`IntensityImage::from_u8`] or
/// [`IntensityImage::from_u16`] for integer sources.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityImage {
    pixels: ArrayD<f32>,
}

impl IntensityImage {
    pub fn new<D: Dimension>(pixels: Array<f32, D>) -> Self {
        Self {
            pixels: into_standard_layout(pixels),
        }
    }

    /// Normalises 8-bit pixels to `[0, 1]`.
    pub fn from_u8<D: Dimension>(pixels: Array<u8, D>) -> Self {
        Self::new(pixels.mapv(|v| v as f32 / u8::MAX as f32))
    }

    /// Normalises 16-bit pixels to `[0, 1]`.
    pub fn from_u16<D: Dimension>(pixels: Array<u16, D>) -> Self {
        Self::new(pixels.mapv(|v| v as f32 / u16::MAX as f32))
    }

    #[inline]
    pub fn pixels(&self) -> &ArrayD<f32> {
        &self.pixels
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.pixels.ndim()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.pixels.shape()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl<D: Dimension> From<Array<f32, D>> for IntensityImage {
    fn from(pixels: Array<f32, D>) -> Self {
        Self::new(pixels)
    }
}

/// Checks that `intensity` matches `label` spatially.
///
/// Returns `true` when `intensity` carries an extra trailing channel axis.
pub(crate) fn is_multichannel(
    label: &LabelImage,
    intensity: &IntensityImage,
) -> Result<bool, ConstructionError> {
    let label_shape = label.shape();
    let intensity_shape = intensity.shape();

    if label_shape == intensity_shape {
        return Ok(false);
    }
    if intensity_shape.len() == label_shape.len() + 1
        && &intensity_shape[..label_shape.len()] == label_shape
    {
        return Ok(true);
    }

    Err(ConstructionError::ShapeMismatch {
        label: label_shape.to_vec(),
        intensity: intensity_shape.to_vec(),
    })
}
