use ndarray::{ArrayD, ArrayViewD, IxDyn};
use num_traits::AsPrimitive;

use super::{NdimageError, NdimageResult};

/// Raw image moments up to `order` along every axis.
///
/// `M[p0, .., pn] = Σ I(x) · Π x_d^p_d`, returned as a tensor of shape
/// `[order + 1; ndim]` where axis `d` indexes the power of coordinate `d`.
pub fn moments<T>(image: ArrayViewD<'_, T>, order: usize) -> ArrayD<f64>
where
    T: Copy + AsPrimitive<f64>,
{
    let origin = vec![0.0; image.ndim()];
    accumulate_moments(image, &origin, order)
}

/// Central image moments about `center`, up to `order` along every axis.
pub fn moments_central<T>(
    image: ArrayViewD<'_, T>,
    center: &[f64],
    order: usize,
) -> NdimageResult<ArrayD<f64>>
where
    T: Copy + AsPrimitive<f64>,
{
    if center.len() != image.ndim() {
        return Err(NdimageError::DimensionMismatch {
            expected: image.ndim(),
            actual: center.len(),
        });
    }
    Ok(accumulate_moments(image, center, order))
}

fn accumulate_moments<T>(image: ArrayViewD<'_, T>, center: &[f64], order: usize) -> ArrayD<f64>
where
    T: Copy + AsPrimitive<f64>,
{
    let ndim = image.ndim();
    let stride = order + 1;
    let mut result = ArrayD::<f64>::zeros(IxDyn(&vec![stride; ndim]));
    // powers[axis * stride + p] = (x_axis - center_axis)^p for the current pixel
    let mut powers = vec![0.0f64; ndim * stride];

    for (index, &value) in image.indexed_iter() {
        let value: f64 = value.as_();
        if value == 0.0 {
            continue;
        }

        for axis in 0..ndim {
            let delta = index[axis] as f64 - center[axis];
            let mut power = 1.0;
            for slot in &mut powers[axis * stride..(axis + 1) * stride] {
                *slot = power;
                power *= delta;
            }
        }

        for (exponents, moment) in result.indexed_iter_mut() {
            let mut term = value;
            for axis in 0..ndim {
                term *= powers[axis * stride + exponents[axis]];
            }
            *moment += term;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_raw_moments_2d() {
        // Pixels at (0, 1) = 2 and (2, 0) = 1.
        let image = array![[0u8, 2], [0, 0], [1, 0]].into_dyn();
        let m = moments(image.view(), 2);

        assert_eq!(m.shape(), &[3, 3]);
        assert_eq!(m[[0, 0]], 3.0);
        assert_eq!(m[[1, 0]], 2.0); // 0*2 + 2*1
        assert_eq!(m[[0, 1]], 2.0); // 1*2 + 0*1
        assert_eq!(m[[2, 0]], 4.0); // 0*2 + 4*1
        assert_eq!(m[[1, 1]], 0.0);
        assert_eq!(m[[0, 2]], 2.0);
    }

    #[test]
    fn test_central_moments_vanish_at_first_order() {
        let image = array![[1.0f64, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 0.0]].into_dyn();
        let m = moments(image.view(), 3);
        let center = [m[[1, 0]] / m[[0, 0]], m[[0, 1]] / m[[0, 0]]];
        assert_eq!(center, [0.5, 0.5]);

        let mu = moments_central(image.view(), &center, 3).unwrap();
        assert_eq!(mu[[0, 0]], 4.0);
        assert!(mu[[1, 0]].abs() < 1e-12);
        assert!(mu[[0, 1]].abs() < 1e-12);
        assert!((mu[[2, 0]] - 1.0).abs() < 1e-12); // 4 * 0.25
        assert!((mu[[0, 2]] - 1.0).abs() < 1e-12);
        assert!(mu[[1, 1]].abs() < 1e-12);
    }

    #[test]
    fn test_moments_3d_shape() {
        let mut image = Array3::<u8>::zeros((2, 3, 4));
        image[[1, 2, 3]] = 1;
        let m = moments(image.view().into_dyn(), 3);
        assert_eq!(m.shape(), &[4, 4, 4]);
        assert_eq!(m[[0, 0, 0]], 1.0);
        assert_eq!(m[[1, 1, 1]], 6.0);
        assert_eq!(m[[0, 0, 3]], 27.0);
    }

    #[test]
    fn test_central_moments_dimension_mismatch() {
        let image = array![[1u8]].into_dyn();
        assert_eq!(
            moments_central(image.view(), &[0.0], 3),
            Err(NdimageError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }
}
