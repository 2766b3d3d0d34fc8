use ndarray::{array, Array2};
use strum::IntoEnumIterator;

use super::*;
use crate::config::ExtractionConfig;
use crate::image::{IntensityImage, LabelImage};
use crate::object_slice::locate_objects;
use crate::scene::Scene;

fn square_images() -> (LabelImage, IntensityImage) {
    let mut labels = Array2::<u32>::zeros((10, 10));
    let mut pixels = Array2::<f32>::zeros((10, 10));
    labels.slice_mut(ndarray::s![2..5, 2..5]).fill(1);
    pixels.slice_mut(ndarray::s![2..5, 2..5]).fill(0.5);
    (LabelImage::new(labels), IntensityImage::new(pixels))
}

fn first_object<'a>(label: &'a LabelImage, intensity: &'a IntensityImage) -> ObjectCache<'a> {
    let scene = Scene::new(label, intensity, &ExtractionConfig::default()).unwrap();
    let object = locate_objects(label).unwrap().swap_remove(0);
    ObjectCache::new(scene, object, 1)
}

fn value(registry: &FeatureRegistry, row: &[f64], column: &str) -> f64 {
    row[registry.position(column).unwrap()]
}

// ---------------------------------------------------------------------------
// Registry layout
// ---------------------------------------------------------------------------

#[test]
fn test_builtin_catalog_layout() {
    let registry = FeatureRegistry::builtin();
    assert_eq!(registry.len(), 197);
    assert_eq!(registry.count(FeatureStatus::Implemented), 99);
    assert_eq!(registry.count(FeatureStatus::Placeholder), 98);

    let columns = registry.columns();
    assert_eq!(columns.len(), registry.len());
    assert_eq!(columns[0], "color_image_integrated_intensity");
    assert!(columns.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(columns.contains(&"texture_object_haralick_coorelation"));
    assert!(registry
        .iter()
        .all(|f| f.name().starts_with(FEATURE_PREFIX)));
}

#[test]
fn test_names_start_with_category() {
    for feature in FeatureRegistry::builtin() {
        let category = feature.category().to_string();
        assert!(
            feature.column().starts_with(&format!("{category}_")),
            "{} is not in {category}",
            feature.name()
        );
    }
    for category in FeatureCategory::iter() {
        assert!(FeatureRegistry::builtin().iter().any(|f| f.category() == category));
    }
}

#[test]
fn test_lookup_by_full_and_column_name() {
    let registry = FeatureRegistry::builtin();
    let by_column = registry.position("metadata_object_index").unwrap();
    let by_name = registry.position("_feature_metadata_object_index").unwrap();
    assert_eq!(by_column, by_name);
    let object_index = registry.get("metadata_object_index").unwrap();
    assert_eq!(object_index.status(), FeatureStatus::Implemented);
    assert!(registry
        .get("shape_object_perimeter")
        .unwrap()
        .is_placeholder());
    assert!(registry.position("shape_object_nothing").is_none());
}

#[test]
#[should_panic(expected = "already exists")]
fn test_duplicate_names_are_rejected() {
    FeatureRegistry::new([
        Feature::placeholder(FeatureCategory::Shape, "object_area"),
        Feature::placeholder(FeatureCategory::Shape, "object_area"),
    ]);
}

#[test]
fn test_custom_registry_is_sorted() {
    let registry = FeatureRegistry::new([
        Feature::new(FeatureCategory::Shape, "object_b", |_| Ok(2.0)),
        Feature::new(FeatureCategory::Color, "object_a", |_| Ok(1.0)),
    ]);
    assert_eq!(registry.columns(), vec!["color_object_a", "shape_object_b"]);
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn test_square_object_values() {
    let (label, intensity) = square_images();
    let cache = first_object(&label, &intensity);
    let registry = FeatureRegistry::builtin();
    let row = registry.evaluate_all(&cache).unwrap();
    assert_eq!(row.len(), registry.len());

    let close = |column: &str, expected: f64| {
        let actual = value(registry, &row, column);
        assert!((actual - expected).abs() < 1e-6, "{column}: {actual} != {expected}");
    };

    close("color_object_mean_intensity", 0.5);
    close("color_object_integrated_intensity", 4.5);
    close("color_object_maximum_intensity", 0.5);
    close("color_object_minimum_intensity", 0.5);
    close("color_object_standard_deviation_intensity", 0.0);
    close("color_object_maximum_intensity_x", 2.0);
    close("color_object_maximum_intensity_y", 2.0);
    close("color_image_integrated_intensity", 4.5);
    close("color_image_mean_intensity", 0.045);
    close("color_image_maximum_intensity", 0.5);
    close("color_image_median_intensity", 0.0);
    close("color_object_edge_integrated_intensity", 0.0);
    close("metadata_object_index", 1.0);
    close("shape_image_area", 100.0);
    close("shape_object_centroid_x", 3.0);
    close("shape_object_centroid_y", 3.0);
    close("shape_object_euler_number", 1.0);
    close("shape_object_extent", 0.09);
    close("shape_object_equivalent_diameter", (4.0 * 9.0 / std::f64::consts::PI).sqrt());
    close("shape_object_spatial_moment_0_0_0", 9.0 * 128.0);
    close("shape_object_spatial_moment_1_0_0", 0.0);
    close("shape_object_perimeter", 0.0);
}

#[test]
fn test_edge_statistics_see_the_surrounding_ring() {
    let label = LabelImage::new(array![
        [0u32, 0, 0],
        [0, 1, 0],
        [0, 0, 0],
    ]);
    let intensity = IntensityImage::new(array![
        [0.1f32, 0.2, 0.1],
        [0.2, 0.8, 0.2],
        [0.1, 0.2, 0.1],
    ]);
    let cache = first_object(&label, &intensity);
    let registry = FeatureRegistry::builtin();
    let row = registry.evaluate_all(&cache).unwrap();

    // The bounding box is the single pixel, so no background lies inside it.
    assert_eq!(value(registry, &row, "color_object_edge_maximum_intensity"), 0.0);
    assert!((value(registry, &row, "color_object_maximum_intensity") - 0.8).abs() < 1e-6);
    assert_eq!(value(registry, &row, "color_object_maximum_intensity_x"), 1.0);
}

#[test]
fn test_degenerate_object_fails_the_row() {
    let label = LabelImage::new(array![[1u32, 0], [0, 0]]);
    let intensity = IntensityImage::new(Array2::<f32>::zeros((2, 2)));
    let cache = first_object(&label, &intensity);

    let error = FeatureRegistry::builtin().evaluate_all(&cache).unwrap_err();
    assert_eq!(error.label(), 1);
}

#[test]
fn test_one_dimensional_centroid_y_is_a_dependency_error() {
    let label = LabelImage::new(array![0u32, 1, 1]);
    let intensity = IntensityImage::new(array![0.0f32, 0.4, 0.6]);
    let cache = first_object(&label, &intensity);
    let registry = FeatureRegistry::builtin();

    let x = registry
        .get("shape_object_centroid_x")
        .unwrap()
        .evaluate(&cache)
        .unwrap();
    assert!((x - 1.5).abs() < 1e-12);

    let y = registry.get("shape_object_centroid_y").unwrap().evaluate(&cache);
    assert!(matches!(
        y,
        Err(crate::error::ObjectError::Dependency {
            quantity: crate::quantity::Quantity::Centroid,
            ..
        })
    ));
}
