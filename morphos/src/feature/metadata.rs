use super::{Feature, FeatureCategory};

const CATEGORY: FeatureCategory = FeatureCategory::Metadata;

pub(super) fn features() -> Vec<Feature> {
    vec![
        Feature::new(CATEGORY, "object_index", |cache| {
            Ok(cache.object_index() as f64)
        }),
        Feature::placeholder(CATEGORY, "image_checksum"),
        Feature::placeholder(CATEGORY, "image_filename"),
        Feature::placeholder(CATEGORY, "layer_name"),
        Feature::placeholder(CATEGORY, "layer_type"),
    ]
}
