use super::{Feature, FeatureCategory};

pub(super) fn features() -> Vec<Feature> {
    let mut columns = vec![
        "object_neighborhood_angle".to_string(),
        "object_neighborhood_neighbors".to_string(),
        "object_neighborhood_touching".to_string(),
    ];
    for rank in 0..3 {
        columns.push(format!("object_neighborhood_closest_{rank}_distance"));
        columns.push(format!("object_neighborhood_closest_{rank}_object_index"));
    }

    columns
        .iter()
        .map(|column| Feature::placeholder(FeatureCategory::Location, column))
        .collect()
}
