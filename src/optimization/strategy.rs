use std::num::NonZeroUsize;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};
use rand::{Rng, seq::SliceRandom};

use crate::{OptimErr, Result};

/// A gradient-descent update strategy.
///
/// A strategy fixes the learning rate and the policy used to split the
/// training data into the groups consumed by one update step. Instances are
/// built through the [`Strategy::batch`], [`Strategy::mini_batch`] and
/// [`Strategy::stochastic`] constructors, which validate their
/// hyperparameters eagerly.
#[derive(Debug, Clone)]
pub struct Strategy {
    learning_rate: f32,
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    Batch,
    MiniBatch { batch_size: NonZeroUsize },
    Stochastic { shuffle: bool },
}

impl Strategy {
    /// Returns a full-batch strategy: one gradient evaluation per iteration
    /// over the whole dataset.
    ///
    /// # Errors
    /// Returns `OptimErr::InvalidConfig` if `learning_rate` is not positive.
    pub fn batch(learning_rate: f32) -> Result<Self> {
        Self::with_kind(learning_rate, Kind::Batch)
    }

    /// Returns a mini-batch strategy: contiguous groups of `batch_size` rows
    /// per update, the final group possibly shorter.
    ///
    /// # Errors
    /// Returns `OptimErr::InvalidConfig` if `learning_rate` is not positive
    /// or `batch_size` is zero.
    pub fn mini_batch(learning_rate: f32, batch_size: usize) -> Result<Self> {
        let batch_size = NonZeroUsize::new(batch_size)
            .ok_or(OptimErr::InvalidConfig("batch size must be at least 1"))?;

        Self::with_kind(learning_rate, Kind::MiniBatch { batch_size })
    }

    /// Returns a single-sample stochastic strategy: one update per row,
    /// visited in original order or, with `shuffle`, in a fresh uniformly
    /// random order on every partitioning.
    ///
    /// # Errors
    /// Returns `OptimErr::InvalidConfig` if `learning_rate` is not positive.
    pub fn stochastic(learning_rate: f32, shuffle: bool) -> Result<Self> {
        Self::with_kind(learning_rate, Kind::Stochastic { shuffle })
    }

    fn with_kind(learning_rate: f32, kind: Kind) -> Result<Self> {
        if !(learning_rate > 0.0) {
            return Err(OptimErr::InvalidConfig("learning rate must be positive"));
        }

        Ok(Self {
            learning_rate,
            kind,
        })
    }

    /// Returns the step size applied to the negative gradient.
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn kind(&self) -> &'static str {
        match self.kind {
            Kind::Batch => "batch",
            Kind::MiniBatch { .. } => "mini-batch",
            Kind::Stochastic { .. } => "stochastic",
        }
    }

    /// Splits the training data into the ordered row groups consumed by one
    /// update step.
    ///
    /// Every row of `x` appears in exactly one group, paired with its
    /// matching target entry. The groups are freshly computed owned copies;
    /// the inputs are never mutated.
    ///
    /// # Arguments
    /// * `x` - The design matrix, one row per sample.
    /// * `y` - The target vector, index-aligned with the rows of `x`.
    /// * `rng` - The generator used when the strategy shuffles.
    ///
    /// # Returns
    /// The `(sub-matrix, sub-targets)` groups in visit order, or an error
    /// if the shapes are incompatible or the batch size exceeds the sample
    /// count.
    pub fn partition<R: Rng>(
        &self,
        x: ArrayView2<f32>,
        y: ArrayView1<f32>,
        rng: &mut R,
    ) -> Result<Vec<(Array2<f32>, Array1<f32>)>> {
        let n = x.nrows();
        if y.len() != n {
            return Err(OptimErr::DimMismatch {
                a: "design matrix rows",
                b: "targets",
                got: n,
                expected: y.len(),
            });
        }

        match self.kind {
            Kind::Batch => Ok(vec![(x.to_owned(), y.to_owned())]),

            Kind::Stochastic { shuffle } => {
                let mut order: Vec<usize> = (0..n).collect();
                if shuffle {
                    order.shuffle(rng);
                }

                Ok(order
                    .into_iter()
                    .map(|i| (x.select(Axis(0), &[i]), y.select(Axis(0), &[i])))
                    .collect())
            }

            Kind::MiniBatch { batch_size } => {
                let size = batch_size.get();
                if size > n {
                    return Err(OptimErr::InvalidConfig(
                        "batch size exceeds the sample count",
                    ));
                }

                Ok((0..n)
                    .step_by(size)
                    .map(|start| {
                        let end = usize::min(start + size, n);
                        (
                            x.slice(s![start..end, ..]).to_owned(),
                            y.slice(s![start..end]).to_owned(),
                        )
                    })
                    .collect())
            }
        }
    }
}

impl Default for Strategy {
    /// Single-sample stochastic descent with learning rate `0.01` and
    /// shuffling enabled.
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            kind: Kind::Stochastic { shuffle: true },
        }
    }
}
