use super::{Feature, FeatureCategory};

/// Haralick descriptors, named as in the published column layout.
const HARALICK: [&str; 13] = [
    "angular_second_moment",
    "contrast",
    "coorelation",
    "sum_of_squares_variance",
    "inverse_difference_moment",
    "sum_average",
    "sum_variance",
    "sum_entropy",
    "entropy",
    "difference_variance",
    "measure_of_correlation_0",
    "measure_of_correlation_1",
    "maximum_correlation_coefficient",
];

pub(super) fn features() -> Vec<Feature> {
    HARALICK
        .iter()
        .map(|name| {
            Feature::placeholder(FeatureCategory::Texture, &format!("object_haralick_{name}"))
        })
        .collect()
}
