use std::f64::consts::PI;

use super::{Feature, FeatureCategory};
use crate::cache::ObjectCache;
use crate::error::{ObjectError, ObjectResult};
use crate::ndimage::NdimageError;
use crate::quantity::Quantity;

const CATEGORY: FeatureCategory = FeatureCategory::Shape;

/// Mixed central moments kept in the column layout.
const CENTRAL_MOMENTS: [[usize; 3]; 16] = [
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, 2],
    [0, 1, 3],
    [1, 2, 0],
    [1, 2, 1],
    [1, 3, 2],
    [1, 3, 3],
    [2, 0, 0],
    [2, 0, 1],
    [2, 1, 2],
    [2, 1, 3],
    [3, 2, 0],
    [3, 2, 1],
    [3, 3, 2],
    [3, 3, 3],
];

const PLACEHOLDERS: [&str; 34] = [
    "image_skeleton_branches",
    "image_skeleton_endpoints",
    "image_skeleton_length",
    "image_skeleton_trunks",
    "object_area",
    "object_bounding_box_area",
    "object_bounding_box_maximum_x",
    "object_bounding_box_maximum_y",
    "object_bounding_box_maximum_z",
    "object_bounding_box_minimum_x",
    "object_bounding_box_minimum_y",
    "object_bounding_box_minimum_z",
    "object_bounding_box_volume",
    "object_centroid_z",
    "object_compactness",
    "object_eccentricity",
    "object_form_factor",
    "object_major_axis_length",
    "object_maximum_feret_diameter",
    "object_maximum_radius",
    "object_mean_radius",
    "object_median_radius",
    "object_minimum_feret_diameter",
    "object_minor_axis_length",
    "object_normalized_moment_x_y",
    "object_orientation",
    "object_perimeter",
    "object_solidity",
    "object_surface_area",
    "object_volume",
    "object_skeleton_branches",
    "object_skeleton_endpoints",
    "object_skeleton_length",
    "object_skeleton_trunks",
];

/// Component `axis` of a per-axis quantity.
fn component(
    cache: &ObjectCache<'_>,
    values: &[f64],
    axis: usize,
    quantity: Quantity,
) -> ObjectResult<f64> {
    values.get(axis).copied().ok_or(ObjectError::Dependency {
        label: cache.label(),
        quantity,
        source: NdimageError::DimensionMismatch {
            expected: axis + 1,
            actual: values.len(),
        },
    })
}

pub(super) fn features() -> Vec<Feature> {
    let mut features = vec![
        Feature::new(CATEGORY, "image_area", |cache| {
            Ok(cache.scene().spatial_size() as f64)
        }),
        Feature::new(CATEGORY, "object_centroid_x", |cache| {
            component(cache, cache.centroid()?, 0, Quantity::Centroid)
        }),
        Feature::new(CATEGORY, "object_centroid_y", |cache| {
            component(cache, cache.centroid()?, 1, Quantity::Centroid)
        }),
        Feature::new(CATEGORY, "object_equivalent_diameter", |cache| {
            let ndim = cache.scene().ndim() as f64;
            let area = cache.area()? as f64;
            Ok((2.0 * ndim * area / PI).powf(1.0 / ndim))
        }),
        Feature::new(CATEGORY, "object_euler_number", |cache| {
            Ok(cache.euler_number()? as f64)
        }),
        Feature::new(CATEGORY, "object_extent", |cache| {
            Ok(cache.area()? as f64 / cache.scene().label().len() as f64)
        }),
    ];

    for row in ["x", "y", "z"] {
        features.push(Feature::placeholder(
            CATEGORY,
            &format!("object_inertia_tensor_eigenvalues_{row}"),
        ));
        for column in ["x", "y", "z"] {
            features.push(Feature::placeholder(
                CATEGORY,
                &format!("object_inertia_tensor_{row}_{column}"),
            ));
        }
    }

    for order in 0..7 {
        features.push(Feature::placeholder(CATEGORY, &format!("object_hu_moment_{order}")));
    }

    for [a, b, c] in CENTRAL_MOMENTS {
        features.push(Feature::placeholder(
            CATEGORY,
            &format!("object_central_moment_{a}_{b}_{c}"),
        ));
    }

    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                features.push(Feature::new(
                    CATEGORY,
                    &format!("object_spatial_moment_{a}_{b}_{c}"),
                    move |cache| cache.spatial_moment([a, b, c]),
                ));
            }
        }
    }

    features.extend(
        PLACEHOLDERS
            .iter()
            .map(|column| Feature::placeholder(CATEGORY, column)),
    );
    features
}
