use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;

use super::Strategy;
use crate::{OptimErr, Result, objective};

/// Options for the least-squares training loop.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// The update strategy applied on every iteration.
    pub strategy: Strategy,
    /// The number of passes over the partitioned data.
    pub max_iters: usize,
    /// Gradient-norm tolerance. Kept alongside `max_iters` for parity with
    /// [`crate::steepest_descent`]; the least-squares loop always runs its
    /// full iteration budget.
    pub grad_tolerance: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_iters: 100,
            grad_tolerance: 1e-3,
        }
    }
}

/// Performs one update step: one gradient-descent update per row group
/// produced by the strategy's partitioning.
///
/// The groups are consumed strictly in order, and the parameters updated on
/// one group feed the gradient computation of the next. The input vector is
/// left untouched; the updated vector is returned.
///
/// # Arguments
/// * `params` - The current parameter vector.
/// * `strategy` - The strategy providing the partitioning and step size.
/// * `x` - The design matrix, one row per sample.
/// * `y` - The target vector, index-aligned with the rows of `x`.
/// * `rng` - The generator consulted by shuffling strategies.
///
/// # Returns
/// The parameter vector after all groups were consumed, or an error if the
/// shapes are incompatible.
pub fn step<R: Rng>(
    params: ArrayView1<f32>,
    strategy: &Strategy,
    x: ArrayView2<f32>,
    y: ArrayView1<f32>,
    rng: &mut R,
) -> Result<Array1<f32>> {
    let lr = strategy.learning_rate();
    let mut params = params.to_owned();

    for (bx, by) in strategy.partition(x, y, rng)? {
        let grad = objective::gradient(params.view(), bx.view(), by.view())?;
        params.scaled_add(-lr, &grad);
    }

    Ok(params)
}

/// Fits least-squares parameters to `(x, y)` with the configured strategy,
/// seeding shuffles from the thread-local generator.
///
/// See [`fit_with`].
pub fn fit(
    x: ArrayView2<f32>,
    y: ArrayView1<f32>,
    initial: Option<Array1<f32>>,
    options: &FitOptions,
) -> Result<Array1<f32>> {
    fit_with(x, y, initial, options, &mut rand::rng())
}

/// Fits least-squares parameters to `(x, y)` with the configured strategy.
///
/// Runs exactly `options.max_iters` update steps, re-partitioning the data
/// on every iteration, and returns the final parameter vector. With
/// `max_iters == 0` the initial parameters come back unchanged.
///
/// # Arguments
/// * `x` - The design matrix, one row per sample.
/// * `y` - The target vector, index-aligned with the rows of `x`.
/// * `initial` - The starting parameters; zero-initialized to the column
///   count of `x` when absent.
/// * `options` - The strategy and iteration budget.
/// * `rng` - The generator consulted by shuffling strategies.
///
/// # Returns
/// The fitted parameter vector, or an error if the shapes are incompatible.
pub fn fit_with<R: Rng>(
    x: ArrayView2<f32>,
    y: ArrayView1<f32>,
    initial: Option<Array1<f32>>,
    options: &FitOptions,
    rng: &mut R,
) -> Result<Array1<f32>> {
    let mut params = match initial {
        Some(params) => {
            if params.len() != x.ncols() {
                return Err(OptimErr::DimMismatch {
                    a: "initial params",
                    b: "design matrix columns",
                    got: params.len(),
                    expected: x.ncols(),
                });
            }

            params
        }
        None => Array1::zeros(x.ncols()),
    };

    for _ in 0..options.max_iters {
        params = step(params.view(), &options.strategy, x, y, rng)?;
    }

    Ok(params)
}

#[cfg(test)]
mod test {
    use ndarray::{Array1, Array2, array};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    // y = Xθ* exactly, with θ* = [1, 1].
    fn consistent_system() -> (Array2<f32>, Array1<f32>) {
        (array![[1., 0.], [0., 1.], [1., 1.]], array![1., 1., 2.])
    }

    fn batch_options(max_iters: usize) -> FitOptions {
        FitOptions {
            strategy: Strategy::batch(0.1).unwrap(),
            max_iters,
            ..FitOptions::default()
        }
    }

    #[test]
    fn test_zero_iterations_return_initial_params() {
        let (x, y) = consistent_system();
        let initial = array![0.5_f32, -0.25];

        let params = fit(x.view(), y.view(), Some(initial.clone()), &batch_options(0)).unwrap();
        assert_eq!(params, initial);
    }

    #[test]
    fn test_one_batch_step_from_zero() {
        let (x, y) = consistent_system();

        // g = -(1/3) * Xᵀy = [-1, -1], so θ' = θ - 0.1 * g = [0.1, 0.1].
        let params = fit(x.view(), y.view(), None, &batch_options(1)).unwrap();
        assert!((params[0] - 0.1).abs() < 1e-6, "got {params}");
        assert!((params[1] - 0.1).abs() < 1e-6, "got {params}");
    }

    #[test]
    fn test_step_does_not_mutate_input_params() {
        let (x, y) = consistent_system();
        let params = Array1::<f32>::zeros(2);
        let mut rng = StdRng::seed_from_u64(0);

        let updated = step(
            params.view(),
            &Strategy::batch(0.1).unwrap(),
            x.view(),
            y.view(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(params, Array1::<f32>::zeros(2));
        assert_ne!(updated, params);
    }

    #[test]
    fn test_batch_converges_on_consistent_system() {
        let (x, y) = consistent_system();

        let params = fit(x.view(), y.view(), None, &batch_options(200)).unwrap();
        assert!((params[0] - 1.0).abs() < 1e-3, "got {params}");
        assert!((params[1] - 1.0).abs() < 1e-3, "got {params}");
    }

    #[test]
    fn test_batch_loss_never_increases() {
        let (x, y) = consistent_system();
        let strategy = Strategy::batch(0.1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let mut params = Array1::<f32>::zeros(2);
        let mut prev = objective::loss(params.view(), x.view(), y.view()).unwrap();

        for _ in 0..50 {
            params = step(params.view(), &strategy, x.view(), y.view(), &mut rng).unwrap();
            let loss = objective::loss(params.view(), x.view(), y.view()).unwrap();
            assert!(loss <= prev + 1e-6, "loss went up: {prev} -> {loss}");
            prev = loss;
        }
    }

    #[test]
    fn test_stochastic_converges_on_consistent_system() {
        let (x, y) = consistent_system();
        let options = FitOptions {
            strategy: Strategy::stochastic(0.1, true).unwrap(),
            max_iters: 300,
            ..FitOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let params = fit_with(x.view(), y.view(), None, &options, &mut rng).unwrap();
        assert!((params[0] - 1.0).abs() < 1e-2, "got {params}");
        assert!((params[1] - 1.0).abs() < 1e-2, "got {params}");
    }

    #[test]
    fn test_mini_batch_converges_on_consistent_system() {
        let (x, y) = consistent_system();
        let options = FitOptions {
            strategy: Strategy::mini_batch(0.1, 2).unwrap(),
            max_iters: 300,
            ..FitOptions::default()
        };

        let params = fit(x.view(), y.view(), None, &options).unwrap();
        assert!((params[0] - 1.0).abs() < 1e-2, "got {params}");
        assert!((params[1] - 1.0).abs() < 1e-2, "got {params}");
    }

    #[test]
    fn test_unshuffled_stochastic_fit_is_deterministic() {
        let (x, y) = consistent_system();
        let options = FitOptions {
            strategy: Strategy::stochastic(0.05, false).unwrap(),
            max_iters: 40,
            ..FitOptions::default()
        };

        let first = fit(x.view(), y.view(), None, &options).unwrap();
        let second = fit(x.view(), y.view(), None, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_options_fit_converges() {
        let (x, y) = consistent_system();

        let params = fit(x.view(), y.view(), None, &FitOptions::default()).unwrap();
        assert!((params[0] - 1.0).abs() < 0.1, "got {params}");
        assert!((params[1] - 1.0).abs() < 0.1, "got {params}");
    }

    #[test]
    fn test_rejects_mismatched_initial_params() {
        let (x, y) = consistent_system();
        let initial = Array1::<f32>::zeros(3);

        let err = fit(x.view(), y.view(), Some(initial), &batch_options(10));
        assert!(matches!(err, Err(OptimErr::DimMismatch { .. })));
    }

    #[test]
    fn test_rejects_mismatched_targets() {
        let (x, _) = consistent_system();
        let y = array![1.0_f32, 2.0];

        let err = fit(x.view(), y.view(), None, &batch_options(10));
        assert!(matches!(err, Err(OptimErr::DimMismatch { .. })));
    }
}
