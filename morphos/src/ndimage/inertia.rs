use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::ArrayD;

use super::{NdimageError, NdimageResult};

const EIGEN_MAX_ITERATIONS: usize = 1000;

/// Inertia tensor from central moments `mu` of order two or higher.
///
/// Diagonal entry `i` is the sum of the second-order moments of every axis
/// except `i`; off-diagonal entries are the negated mixed second-order
/// moments. All entries are normalised by the zeroth moment.
pub fn inertia_tensor(mu: &ArrayD<f64>) -> NdimageResult<DMatrix<f64>> {
    let ndim = mu.ndim();
    if let Some(&length) = mu.shape().iter().find(|&&length| length < 3) {
        return Err(NdimageError::Unsupported(format!(
            "inertia tensor needs central moments of order 2, got order {}",
            length.saturating_sub(1)
        )));
    }

    let mut index = vec![0usize; ndim];
    let mu0 = mu[index.as_slice()];

    let second_order: Vec<f64> = (0..ndim)
        .map(|axis| {
            index.fill(0);
            index[axis] = 2;
            mu[index.as_slice()]
        })
        .collect();
    let total: f64 = second_order.iter().sum();

    let mut tensor = DMatrix::<f64>::zeros(ndim, ndim);
    for i in 0..ndim {
        tensor[(i, i)] = (total - second_order[i]) / mu0;
        for j in i + 1..ndim {
            index.fill(0);
            index[i] = 1;
            index[j] = 1;
            let value = -mu[index.as_slice()] / mu0;
            tensor[(i, j)] = value;
            tensor[(j, i)] = value;
        }
    }

    Ok(tensor)
}

/// Eigenvalues of a symmetric inertia tensor, in descending order.
///
/// Round-off can push eigenvalues of a positive semidefinite tensor slightly
/// below zero; those are clipped to 0.
pub fn inertia_tensor_eigvals(tensor: &DMatrix<f64>) -> NdimageResult<Vec<f64>> {
    if !tensor.is_square() {
        return Err(NdimageError::DimensionMismatch {
            expected: tensor.nrows(),
            actual: tensor.ncols(),
        });
    }
    if tensor.is_empty() {
        return Ok(Vec::new());
    }

    let decomposition =
        SymmetricEigen::try_new(tensor.clone(), f64::EPSILON, EIGEN_MAX_ITERATIONS)
            .ok_or(NdimageError::NoConvergence)?;

    let mut eigvals: Vec<f64> = decomposition
        .eigenvalues
        .iter()
        .map(|&value| value.max(0.0))
        .collect();
    eigvals.sort_by(|a, b| b.total_cmp(a));

    Ok(eigvals)
}
