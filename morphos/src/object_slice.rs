//! Object bounding boxes and the object locator.

use std::ops::Range;

use ndarray::Slice;

use crate::error::ConstructionError;
use crate::image::LabelImage;
use crate::ndimage::find_objects;

/// Minimal axis-aligned bounding box of one labeled object.
///
/// Ranges are half-open `start..stop`, one per spatial axis of the label image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectSlice {
    label: u32,
    ranges: Vec<Range<usize>>,
}

impl ObjectSlice {
    pub fn new(label: u32, ranges: Vec<Range<usize>>) -> Self {
        debug_assert!(label > 0, "background has no object slice");
        Self { label, ranges }
    }

    #[inline]
    pub fn label(&self) -> u32 {
        self.label
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    #[inline]
    pub fn start(&self, axis: usize) -> usize {
        self.ranges[axis].start
    }

    pub fn shape(&self) -> Vec<usize> {
        self.ranges.iter().map(|range| range.len()).collect()
    }

    /// Number of pixels inside the bounding box.
    pub fn size(&self) -> usize {
        self.ranges.iter().map(|range| range.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.iter().any(|range| range.is_empty())
    }

    /// Slice along `axis`; axes beyond the box (channels) are taken whole.
    pub(crate) fn axis_slice(&self, axis: usize) -> Slice {
        match self.ranges.get(axis) {
            Some(range) => Slice::from(range.clone()),
            None => Slice::from(..),
        }
    }
}

/// Finds one bounding box per present label, in ascending label order.
///
/// Labels without pixels are skipped. Fails when the image has no object at all.
pub fn locate_objects(label: &LabelImage) -> Result<Vec<ObjectSlice>, ConstructionError> {
    let objects: Vec<ObjectSlice> = find_objects(label.labels().view())
        .into_iter()
        .flatten()
        .filter(|object| !object.is_empty())
        .collect();

    if objects.is_empty() {
        return Err(ConstructionError::NoObjects);
    }

    Ok(objects)
}
