use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{OptimErr, Result};

/// Computes the least-squares loss `(n / 2) * eᵀe`, where `e = y - Xθ` and
/// `n` is the row count of `x`.
///
/// # Arguments
/// * `params` - The parameter vector θ, one entry per column of `x`.
/// * `x` - The design matrix, one row per sample.
/// * `y` - The target vector, index-aligned with the rows of `x`.
///
/// # Returns
/// The loss value, or an error if the shapes are incompatible.
pub fn loss(params: ArrayView1<f32>, x: ArrayView2<f32>, y: ArrayView1<f32>) -> Result<f32> {
    check_dims(params, x, y)?;

    let e = &y - &x.dot(&params);
    Ok(x.nrows() as f32 / 2.0 * e.dot(&e))
}

/// Computes the loss gradient `(-1 / n) * Xᵀe` with respect to `params`.
///
/// Pure: neither input is mutated.
///
/// # Arguments
/// * `params` - The parameter vector θ, one entry per column of `x`.
/// * `x` - The design matrix, one row per sample.
/// * `y` - The target vector, index-aligned with the rows of `x`.
///
/// # Returns
/// The gradient, with the same length as `params`, or an error if the
/// shapes are incompatible.
pub fn gradient(
    params: ArrayView1<f32>,
    x: ArrayView2<f32>,
    y: ArrayView1<f32>,
) -> Result<Array1<f32>> {
    check_dims(params, x, y)?;

    let e = &y - &x.dot(&params);
    Ok(x.t().dot(&e) * (-1.0 / x.nrows() as f32))
}

fn check_dims(params: ArrayView1<f32>, x: ArrayView2<f32>, y: ArrayView1<f32>) -> Result<()> {
    if x.nrows() == 0 {
        return Err(OptimErr::InvalidInput("empty design matrix"));
    }

    if x.ncols() != params.len() {
        return Err(OptimErr::DimMismatch {
            a: "design matrix columns",
            b: "params",
            got: x.ncols(),
            expected: params.len(),
        });
    }

    if x.nrows() != y.len() {
        return Err(OptimErr::DimMismatch {
            a: "design matrix rows",
            b: "targets",
            got: x.nrows(),
            expected: y.len(),
        });
    }

    Ok(())
}
