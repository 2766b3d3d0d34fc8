use ndarray::{indices, ArrayD, ArrayViewD, Dimension, IxDyn};
use num_traits::Zero;

use super::{NdimageError, NdimageResult};

/// Euler characteristic of the non-zero pixels of `image`.
///
/// `connectivity` follows the `skimage` convention: `1` joins face neighbours
/// only, `ndim` joins every neighbour sharing a corner. Other values are not
/// supported. For 2-D images this is the number of objects minus the number
/// of holes.
pub fn euler_number<T>(image: ArrayViewD<'_, T>, connectivity: usize) -> NdimageResult<i64>
where
    T: Copy + Zero,
{
    let ndim = image.ndim();
    if ndim == 0 {
        return Ok(image.iter().next().map_or(0, |v| i64::from(!v.is_zero())));
    }
    if connectivity == 0 || connectivity > ndim {
        return Err(NdimageError::ValueRange {
            value: connectivity as f64,
            min: 1.0,
            max: ndim as f64,
        });
    }

    let foreground = image.mapv(|v| !v.is_zero());
    if connectivity == ndim {
        Ok(closed_cell_euler(&foreground))
    } else if connectivity == 1 {
        Ok(face_cube_euler(&foreground))
    } else {
        Err(NdimageError::Unsupported(format!(
            "euler number with connectivity {connectivity} in {ndim}-D"
        )))
    }
}

/// Foreground pixels as closed unit cubes. Every cell of the doubled grid
/// (vertex, edge, face, ..) touched by a foreground cube contributes
/// `(-1)^dim`, where `dim` is the number of odd coordinates.
fn closed_cell_euler(foreground: &ArrayD<bool>) -> i64 {
    let shape = foreground.shape();
    let ndim = shape.len();
    let doubled: Vec<usize> = shape.iter().map(|&n| 2 * n + 1).collect();

    let mut candidates: Vec<Vec<usize>> = vec![Vec::with_capacity(2); ndim];
    let mut pixel = vec![0usize; ndim];
    let mut euler = 0i64;

    for cell in indices(IxDyn(&doubled)) {
        let cell = cell.slice();
        let mut odd = 0;
        for axis in 0..ndim {
            let slot = &mut candidates[axis];
            slot.clear();
            let coordinate = cell[axis];
            if coordinate % 2 == 1 {
                odd += 1;
                slot.push(coordinate / 2);
            } else {
                let k = coordinate / 2;
                if k > 0 {
                    slot.push(k - 1);
                }
                if k < shape[axis] {
                    slot.push(k);
                }
            }
        }

        if any_foreground(foreground, &candidates, &mut pixel, 0) {
            euler += if odd % 2 == 0 { 1 } else { -1 };
        }
    }

    euler
}

fn any_foreground(
    foreground: &ArrayD<bool>,
    candidates: &[Vec<usize>],
    pixel: &mut [usize],
    axis: usize,
) -> bool {
    if axis == candidates.len() {
        return foreground[IxDyn(pixel)];
    }
    for &at in &candidates[axis] {
        pixel[axis] = at;
        if any_foreground(foreground, candidates, pixel, axis + 1) {
            return true;
        }
    }
    false
}

/// Foreground pixels as lattice vertices. Every axis-aligned unit cube whose
/// corners are all foreground contributes `(-1)^dim`.
fn face_cube_euler(foreground: &ArrayD<bool>) -> i64 {
    let shape = foreground.shape();
    let ndim = shape.len();
    let mut corner = vec![0usize; ndim];
    let mut euler = 0i64;

    for (origin, &inside) in foreground.indexed_iter() {
        if !inside {
            continue;
        }
        let origin = origin.slice();

        for axes in 0u32..(1 << ndim) {
            let fits = (0..ndim)
                .all(|axis| axes & (1 << axis) == 0 || origin[axis] + 1 < shape[axis]);
            if !fits {
                continue;
            }

            let all_inside = (0u32..(1 << ndim))
                .filter(|offsets| offsets & !axes == 0)
                .all(|offsets| {
                    for axis in 0..ndim {
                        corner[axis] = origin[axis] + ((offsets >> axis) & 1) as usize;
                    }
                    foreground[IxDyn(&corner)]
                });

            if all_inside {
                euler += if axes.count_ones() % 2 == 0 { 1 } else { -1 };
            }
        }
    }

    euler
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_single_pixel() {
        let mut image = ArrayD::<u32>::zeros(IxDyn(&[3, 3]));
        image[[1, 1]] = 4;
        assert_eq!(euler_number(image.view(), 1), Ok(1));
        assert_eq!(euler_number(image.view(), 2), Ok(1));
    }

    #[test]
    fn test_ring_has_one_hole() {
        let image = array![[1u32, 1, 1], [1, 0, 1], [1, 1, 1]].into_dyn();
        assert_eq!(euler_number(image.view(), 1), Ok(0));
        assert_eq!(euler_number(image.view(), 2), Ok(0));
    }

    #[test]
    fn test_diagonal_pixels_depend_on_connectivity() {
        let image = array![[1u32, 0], [0, 1]].into_dyn();
        assert_eq!(euler_number(image.view(), 1), Ok(2));
        assert_eq!(euler_number(image.view(), 2), Ok(1));
    }

    #[test]
    fn test_two_separate_objects() {
        let image = array![[1u32, 1, 0, 0, 2], [1, 1, 0, 0, 2]].into_dyn();
        assert_eq!(euler_number(image.view(), 2), Ok(2));
    }

    #[test]
    fn test_solid_cube() {
        let image = Array3::<u8>::ones((2, 2, 2)).into_dyn();
        assert_eq!(euler_number(image.view(), 1), Ok(1));
        assert_eq!(euler_number(image.view(), 3), Ok(1));
    }

    #[test]
    fn test_invalid_connectivity() {
        let image = ArrayD::<u32>::zeros(IxDyn(&[2, 2]));
        assert!(matches!(
            euler_number(image.view(), 3),
            Err(NdimageError::ValueRange { .. })
        ));
        let volume = ArrayD::<u32>::zeros(IxDyn(&[2, 2, 2]));
        assert!(matches!(
            euler_number(volume.view(), 2),
            Err(NdimageError::Unsupported(_))
        ));
    }
}
