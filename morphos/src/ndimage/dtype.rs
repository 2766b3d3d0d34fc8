use ndarray::{ArrayD, ArrayViewD};

use super::{NdimageError, NdimageResult};

/// Converts a float image in `[-1, 1]` to 8-bit.
///
/// Scales by 255, rounds half to even, then clips negatives to 0.
pub fn img_as_ubyte(image: ArrayViewD<'_, f32>) -> NdimageResult<ArrayD<u8>> {
    if let Some(&value) = image
        .iter()
        .find(|v| !v.is_finite() || **v < -1.0 || **v > 1.0)
    {
        return Err(NdimageError::ValueRange {
            value: value as f64,
            min: -1.0,
            max: 1.0,
        });
    }

    Ok(image.mapv(|v| (v * u8::MAX as f32).round_ties_even().clamp(0.0, 255.0) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scaling_and_rounding() {
        let image = array![[0.0f32, 1.0, 0.5], [-0.5, 0.25, 0.002]].into_dyn();
        let ubyte = img_as_ubyte(image.view()).unwrap();
        // 127.5 rounds to even, 63.75 rounds up, 0.51 rounds up.
        assert_eq!(ubyte, array![[0u8, 255, 128], [0, 64, 1]].into_dyn());
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let image = array![[0.0f32, 1.5]].into_dyn();
        assert!(matches!(
            img_as_ubyte(image.view()),
            Err(NdimageError::ValueRange { .. })
        ));

        let image = array![[f32::NAN]].into_dyn();
        assert!(img_as_ubyte(image.view()).is_err());
    }
}
