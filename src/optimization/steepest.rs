use ndarray::{Array1, ArrayView1};

use crate::{OptimErr, Result};

/// Options for [`steepest_descent`].
#[derive(Debug, Clone)]
pub struct DescentOptions {
    /// The iteration budget.
    pub max_iters: usize,
    /// The step size applied to the negative gradient.
    pub learning_rate: f32,
    /// The loop exits once the gradient's Euclidean norm drops to this value.
    pub grad_tolerance: f32,
    /// A progress line is logged every this many iterations; `0` disables it.
    pub print_every: usize,
}

impl Default for DescentOptions {
    fn default() -> Self {
        Self {
            max_iters: 100,
            learning_rate: 0.01,
            grad_tolerance: 1e-3,
            print_every: 50,
        }
    }
}

/// Outcome of a [`steepest_descent`] run.
#[derive(Debug, Clone)]
pub struct DescentResult {
    /// The final point.
    pub x: Array1<f32>,
    /// The objective value at the final point.
    pub value: f32,
    /// The number of update steps taken.
    pub iterations: usize,
    /// Whether the gradient norm reached the tolerance before the iteration
    /// budget ran out.
    pub converged: bool,
}

/// Minimizes an arbitrary differentiable objective by moving along the
/// negative gradient direction at a fixed step size.
///
/// Iterates until the gradient's Euclidean norm drops to
/// `options.grad_tolerance` or the iteration budget is exhausted, whichever
/// comes first. Progress is reported through [`log::info!`] at the
/// configured cadence; the emission has no effect on control flow.
///
/// # Arguments
/// * `f` - The scalar objective, only evaluated for reporting and the final
///   result value.
/// * `grad` - The gradient of `f`; must return a vector with the dimension
///   of its argument.
/// * `x0` - The starting point.
/// * `options` - Step size, budget, tolerance and report cadence.
///
/// # Returns
/// The final point together with its objective value, the step count and
/// the convergence flag, or an error if `x0` is empty or `grad` returns a
/// vector of the wrong dimension.
pub fn steepest_descent<F, G>(
    f: F,
    grad: G,
    x0: Array1<f32>,
    options: &DescentOptions,
) -> Result<DescentResult>
where
    F: Fn(ArrayView1<f32>) -> f32,
    G: Fn(ArrayView1<f32>) -> Array1<f32>,
{
    if x0.is_empty() {
        return Err(OptimErr::InvalidInput("empty starting point"));
    }

    let mut x = x0;
    let mut g = checked_gradient(&grad, x.view())?;
    let mut iterations = 0;

    while iterations < options.max_iters && norm(&g) > options.grad_tolerance {
        iterations += 1;

        if options.print_every != 0 && iterations % options.print_every == 0 {
            log::info!("iteration {iterations}: objective {}", f(x.view()));
        }

        x.scaled_add(-options.learning_rate, &g);
        g = checked_gradient(&grad, x.view())?;
    }

    Ok(DescentResult {
        value: f(x.view()),
        converged: norm(&g) <= options.grad_tolerance,
        iterations,
        x,
    })
}

fn checked_gradient<G>(grad: &G, x: ArrayView1<f32>) -> Result<Array1<f32>>
where
    G: Fn(ArrayView1<f32>) -> Array1<f32>,
{
    let g = grad(x);
    if g.len() != x.len() {
        return Err(OptimErr::DimMismatch {
            a: "gradient",
            b: "point",
            got: g.len(),
            expected: x.len(),
        });
    }

    Ok(g)
}

fn norm(v: &Array1<f32>) -> f32 {
    v.dot(v).sqrt()
}
