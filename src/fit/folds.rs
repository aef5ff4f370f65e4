//! Deterministic k-fold assignment.
//!
//! Labels `1..=k` are cycled to cover all `n` samples, then shuffled with a
//! seeded `StdRng`. Every sample gets exactly one label and fold sizes differ
//! by at most one.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::CvConfig;
use crate::error::AppError;

/// One fold label (`1..=k`) per sample, in sample order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    pub k: usize,
    pub labels: Vec<usize>,
}

impl FoldAssignment {
    pub fn new(n: usize, config: &CvConfig) -> Result<Self, AppError> {
        let k = config.folds;
        if k < 2 {
            return Err(AppError::input(format!("Fold count must be at least 2 (got {k}).")));
        }
        if n < k {
            return Err(AppError::insufficient(format!(
                "Cannot split {n} samples into {k} folds."
            )));
        }

        let mut labels: Vec<usize> = (1..=k).cycle().take(n).collect();
        let mut rng = StdRng::seed_from_u64(config.seed);
        labels.shuffle(&mut rng);

        Ok(Self { k, labels })
    }

    /// Indices of the held-out samples for `fold` (1-based).
    pub fn test_indices(&self, fold: usize) -> Vec<usize> {
        self.indices_where(|label| label == fold)
    }

    /// Indices of the training samples for `fold` (1-based).
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        self.indices_where(|label| label != fold)
    }

    /// Number of samples carrying each label, indexed `0..k`.
    pub fn fold_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &label in &self.labels {
            sizes[label - 1] += 1;
        }
        sizes
    }

    fn indices_where(&self, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| keep(label))
            .map(|(i, _)| i)
            .collect()
    }
}
