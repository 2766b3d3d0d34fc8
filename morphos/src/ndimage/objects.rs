use ndarray::{ArrayViewD, Dimension};

use crate::object_slice::ObjectSlice;

/// Bounding boxes of every label in `labels`.
///
/// Entry `i` holds the box of label `i + 1`, or `None` when that label has no
/// pixels. Background (`0`) has no entry.
pub fn find_objects(labels: ArrayViewD<'_, u32>) -> Vec<Option<ObjectSlice>> {
    let ndim = labels.ndim();
    let max_label = labels.iter().copied().max().unwrap_or(0) as usize;

    // Inclusive (min, max) corner per label.
    let mut bounds: Vec<Option<(Vec<usize>, Vec<usize>)>> = vec![None; max_label];

    for (index, &label) in labels.indexed_iter() {
        if label == 0 {
            continue;
        }
        let index = index.slice();
        let slot = &mut bounds[label as usize - 1];
        if let Some((lower, upper)) = slot {
            for axis in 0..ndim {
                lower[axis] = lower[axis].min(index[axis]);
                upper[axis] = upper[axis].max(index[axis]);
            }
        } else {
            *slot = Some((index.to_vec(), index.to_vec()));
        }
    }

    bounds
        .into_iter()
        .enumerate()
        .map(|(i, bound)| {
            bound.map(|(lower, upper)| {
                let ranges = lower
                    .iter()
                    .zip(&upper)
                    .map(|(&lo, &hi)| lo..hi + 1)
                    .collect();
                ObjectSlice::new(i as u32 + 1, ranges)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_find_objects_2d() {
        let labels = array![
            [0u32, 0, 0, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 1, 0, 0, 3],
            [0, 0, 0, 0, 3],
        ]
        .into_dyn();
        let objects = find_objects(labels.view());

        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0], Some(ObjectSlice::new(1, vec![1..3, 1..3])));
        assert_eq!(objects[1], None);
        assert_eq!(objects[2], Some(ObjectSlice::new(3, vec![2..4, 4..5])));
    }

    #[test]
    fn test_find_objects_3d() {
        let mut labels = Array3::<u32>::zeros((4, 4, 4));
        labels[[1, 2, 3]] = 1;
        labels[[2, 0, 3]] = 1;
        let objects = find_objects(labels.view().into_dyn());

        assert_eq!(objects, vec![Some(ObjectSlice::new(1, vec![1..3, 0..3, 3..4]))]);
    }

    #[test]
    fn test_find_objects_background_only() {
        let labels = array![[0u32, 0], [0, 0]].into_dyn();
        assert!(find_objects(labels.view()).is_empty());
    }
}
