use ndarray::{ArrayD, ArrayViewD, Dimension, IxDyn};

/// Outer boundary of a binary mask.
///
/// A pixel is on the outer boundary when it is background and at least one
/// of its face neighbours (±1 along a single axis, inside the array) is
/// foreground. The foreground itself is never marked.
pub fn find_outer_boundaries(mask: ArrayViewD<'_, bool>) -> ArrayD<bool> {
    let shape = mask.shape().to_vec();
    let mut boundary = ArrayD::from_elem(IxDyn(&shape), false);
    let mut neighbour = vec![0usize; shape.len()];

    for (index, &inside) in mask.indexed_iter() {
        if inside {
            continue;
        }
        let index = index.slice();
        neighbour.copy_from_slice(index);

        let touches = (0..shape.len()).any(|axis| {
            let at = index[axis];
            let mut hit = false;
            if at > 0 {
                neighbour[axis] = at - 1;
                hit |= mask[IxDyn(&neighbour)];
            }
            if at + 1 < shape[axis] {
                neighbour[axis] = at + 1;
                hit |= mask[IxDyn(&neighbour)];
            }
            neighbour[axis] = at;
            hit
        });

        if touches {
            boundary[IxDyn(index)] = true;
        }
    }

    boundary
}
