use ndarray::{Array1, Array2, ArrayD, ArrayView2, ArrayViewD, Ix1, Ix2};

use super::{NdimageError, NdimageResult};

/// Points on the hull boundary count as inside.
const HULL_TOLERANCE: f64 = 1e-10;

/// Filled convex hull of a binary mask.
///
/// The hull is taken over the midpoints of every foreground pixel's edges
/// (pixel centre ± 0.5 along each axis); a pixel is set when its centre lies
/// inside or on the hull. 0-D masks are copied, 1-D masks are filled between
/// the first and last foreground element. Masks of rank 3 or more are not
/// supported.
pub fn convex_hull_image(mask: ArrayViewD<'_, bool>) -> NdimageResult<ArrayD<bool>> {
    let shape_error = |e: ndarray::ShapeError| NdimageError::Shape(e.to_string());

    match mask.ndim() {
        0 => Ok(mask.to_owned()),
        1 => {
            let line = mask.into_dimensionality::<Ix1>().map_err(shape_error)?;
            Ok(fill_span(line.view()).into_dyn())
        }
        2 => {
            let plane = mask.into_dimensionality::<Ix2>().map_err(shape_error)?;
            Ok(hull_2d(plane).into_dyn())
        }
        ndim => Err(NdimageError::Unsupported(format!("convex hull of a {ndim}-D mask"))),
    }
}

fn fill_span(line: ndarray::ArrayView1<'_, bool>) -> Array1<bool> {
    let first = line.iter().position(|&v| v);
    let last = line.iter().rposition(|&v| v);
    let mut filled = Array1::from_elem(line.len(), false);
    if let (Some(first), Some(last)) = (first, last) {
        filled.slice_mut(ndarray::s![first..=last]).fill(true);
    }
    filled
}

fn hull_2d(mask: ArrayView2<'_, bool>) -> Array2<bool> {
    let mut points = Vec::new();
    for ((row, col), &inside) in mask.indexed_iter() {
        if !inside {
            continue;
        }
        let (r, c) = (row as f64, col as f64);
        points.extend([(r + 0.5, c), (r - 0.5, c), (r, c + 0.5), (r, c - 0.5)]);
    }

    let mut filled = Array2::from_elem(mask.raw_dim(), false);
    if points.is_empty() {
        return filled;
    }

    let hull = monotone_chain(points);
    if hull.len() < 3 {
        // Collinear input cannot come from pixel edge midpoints; keep the mask as is.
        filled.assign(&mask);
        return filled;
    }

    let (rows, cols) = mask.dim();
    let row_min = hull.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let row_max = hull.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let col_min = hull.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let col_max = hull.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let row_range = row_min.ceil().max(0.0) as usize..=(row_max.floor() as usize).min(rows - 1);
    for row in row_range {
        let col_range =
            col_min.ceil().max(0.0) as usize..=(col_max.floor() as usize).min(cols - 1);
        for col in col_range {
            if contains(&hull, (row as f64, col as f64)) {
                filled[[row, col]] = true;
            }
        }
    }

    filled
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Andrew's monotone chain. Returns the hull counter-clockwise without
/// collinear points or a repeated start point.
fn monotone_chain(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    points.dedup();

    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for &p in &points {
        push_turning_left(&mut lower, p);
    }

    let mut upper: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for &p in points.iter().rev() {
        push_turning_left(&mut upper, p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Pops points until `p` makes a strict left turn with the last two, then pushes it.
fn push_turning_left(chain: &mut Vec<(f64, f64)>, p: (f64, f64)) {
    while let [.., a, b] = chain[..] {
        if cross(a, b, p) > 0.0 {
            break;
        }
        chain.pop();
    }
    chain.push(p);
}

fn contains(hull: &[(f64, f64)], point: (f64, f64)) -> bool {
    (0..hull.len()).all(|i| {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        cross(a, b, point) >= -HULL_TOLERANCE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn hull_of(mask: Array2<bool>) -> Array2<bool> {
        convex_hull_image(mask.view().into_dyn())
            .unwrap()
            .into_dimensionality::<Ix2>()
            .unwrap()
    }

    #[test]
    fn test_single_pixel() {
        let mut mask = Array2::from_elem((3, 3), false);
        mask[[1, 2]] = true;
        assert_eq!(hull_of(mask.clone()), mask);
    }

    #[test]
    fn test_l_shape_fills_inner_corner_only() {
        let mask = array![
            [true, false, false],
            [true, false, false],
            [true, true, true],
        ];
        let hull = hull_of(mask);
        assert_eq!(
            hull,
            array![
                [true, false, false],
                [true, true, false],
                [true, true, true],
            ]
        );
    }

    #[test]
    fn test_ring_is_filled() {
        let mask = array![
            [false, true, true, true, false],
            [false, true, false, true, false],
            [false, true, true, true, false],
        ];
        let hull = hull_of(mask);
        assert!(hull[[1, 2]]);
        assert!(!hull[[1, 0]]);
        assert!(!hull[[1, 4]]);
    }

    #[test]
    fn test_empty_mask() {
        let mask = Array2::from_elem((2, 4), false);
        assert_eq!(hull_of(mask.clone()), mask);
    }

    #[test]
    fn test_one_dimensional_span() {
        let mask = array![false, true, false, false, true, false].into_dyn();
        let hull = convex_hull_image(mask.view()).unwrap();
        assert_eq!(hull, array![false, true, true, true, true, false].into_dyn());
    }

    #[test]
    fn test_volume_is_unsupported() {
        let mask = Array3::from_elem((2, 2, 2), true).into_dyn();
        assert!(matches!(
            convex_hull_image(mask.view()),
            Err(NdimageError::Unsupported(_))
        ));
    }
}
