use ndarray::ArrayD;
use strum::IntoEnumIterator;

use super::{Feature, FeatureCategory};
use crate::math::statistics::Statistic;

const CATEGORY: FeatureCategory = FeatureCategory::Color;

fn values(array: &ArrayD<f32>) -> Vec<f64> {
    array.iter().map(|&v| v as f64).collect()
}

pub(super) fn features() -> Vec<Feature> {
    let mut features = Vec::new();

    for statistic in Statistic::iter() {
        features.push(Feature::new(
            CATEGORY,
            &format!("image_{statistic}_intensity"),
            move |cache| Ok(cache.scene().intensity_statistic(statistic)),
        ));
    }

    for statistic in Statistic::iter().filter(|s| *s != Statistic::MedianAbsoluteDeviation) {
        features.push(Feature::new(
            CATEGORY,
            &format!("object_edge_{statistic}_intensity"),
            move |cache| Ok(statistic.compute(&mut values(cache.edge()?))),
        ));
    }

    for statistic in Statistic::iter().filter(|s| *s != Statistic::Maximum) {
        features.push(Feature::new(
            CATEGORY,
            &format!("object_{statistic}_intensity"),
            move |cache| Ok(statistic.compute(&mut values(cache.masked()?))),
        ));
    }

    features.extend([
        Feature::new(CATEGORY, "object_maximum_intensity", |cache| {
            Ok(cache.maximum_intensity()? as f64)
        }),
        Feature::new(CATEGORY, "object_maximum_intensity_x", |cache| {
            Ok(cache.maximum_intensity_position(0)? as f64)
        }),
        Feature::new(CATEGORY, "object_maximum_intensity_y", |cache| {
            Ok(cache.maximum_intensity_position(1)? as f64)
        }),
        Feature::placeholder(CATEGORY, "object_center_mass_intensity_x"),
        Feature::placeholder(CATEGORY, "object_center_mass_intensity_y"),
        Feature::placeholder(CATEGORY, "object_mass_displacement"),
    ]);

    features
}
