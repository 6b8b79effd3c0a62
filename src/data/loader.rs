//! Generic batching data loader

use super::{BatchSource, Dataset};
use crate::train::Batch;
use crate::Tensor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Groups a [`Dataset`]'s samples into batches.
///
/// With `shuffle` enabled the sample order is re-permuted at the start of
/// every pass; otherwise samples are visited in index order. The final
/// batch of a pass may be smaller than `batch_size`.
pub struct DataLoader<D: Dataset> {
    dataset: D,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
    order: Vec<usize>,
    cursor: usize,
}

impl<D: Dataset> DataLoader<D> {
    /// Create a loader over `dataset`.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn new(dataset: D, batch_size: usize, shuffle: bool) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        let order: Vec<usize> = (0..dataset.len()).collect();
        Self {
            dataset,
            batch_size,
            shuffle,
            rng: StdRng::from_os_rng(),
            order,
            cursor: 0,
        }
    }

    /// Use a fixed shuffling seed, for reproducible passes.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The wrapped dataset.
    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<D: Dataset> BatchSource for DataLoader<D> {
    fn num_samples(&self) -> usize {
        self.dataset.len()
    }

    fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    fn start_epoch(&mut self) {
        if self.shuffle {
            self.order.shuffle(&mut self.rng);
        }
        self.cursor = 0;
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size).min(self.order.len());
        let indices = &self.order[self.cursor..end];

        let mut inputs = Vec::new();
        let mut labels = Vec::with_capacity(indices.len());
        for &idx in indices {
            let sample = self.dataset.get(idx);
            inputs.extend(sample.input.iter().copied());
            labels.push(sample.label);
        }

        self.cursor = end;
        Some(Batch::new(Tensor::from_vec(inputs, false), labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::ToyDataset;

    #[test]
    fn test_num_batches_rounds_up() {
        let loader = DataLoader::new(ToyDataset::new(10, 2), 4, false);
        assert_eq!(loader.num_batches(), 3);
        assert_eq!(loader.num_samples(), 10);
    }

    #[test]
    fn test_unshuffled_pass_in_index_order() {
        let mut loader = DataLoader::new(ToyDataset::new(5, 2), 2, false);
        loader.start_epoch();

        let mut labels = Vec::new();
        while let Some(batch) = loader.next_batch() {
            labels.extend(batch.labels);
        }
        assert_eq!(labels, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_final_batch_may_be_partial() {
        let mut loader = DataLoader::new(ToyDataset::new(5, 2), 2, false);
        loader.start_epoch();

        let sizes: Vec<usize> = std::iter::from_fn(|| loader.next_batch())
            .map(|b| b.len())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_shuffled_pass_covers_every_sample_once() {
        let mut loader = DataLoader::new(ToyDataset::new(7, 2), 3, true).with_seed(42);
        loader.start_epoch();

        let mut labels = Vec::new();
        while let Some(batch) = loader.next_batch() {
            labels.extend(batch.labels);
        }
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_same_seed_gives_identical_passes() {
        let collect = |seed: u64| {
            let mut loader = DataLoader::new(ToyDataset::new(16, 2), 4, true).with_seed(seed);
            loader.start_epoch();
            let mut labels = Vec::new();
            while let Some(batch) = loader.next_batch() {
                labels.extend(batch.labels);
            }
            labels
        };

        assert_eq!(collect(9), collect(9));
    }

    #[test]
    fn test_batch_inputs_flattened_row_major() {
        let mut loader = DataLoader::new(ToyDataset::new(4, 3), 2, false);
        loader.start_epoch();

        let batch = loader.next_batch().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.feature_dim(), 3);
        assert_eq!(
            batch.inputs.to_vec(),
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_exhausted_pass_yields_none_until_restart() {
        let mut loader = DataLoader::new(ToyDataset::new(2, 1), 2, false);
        loader.start_epoch();
        assert!(loader.next_batch().is_some());
        assert!(loader.next_batch().is_none());
        assert!(loader.next_batch().is_none());

        loader.start_epoch();
        assert!(loader.next_batch().is_some());
    }

    #[test]
    #[should_panic(expected = "batch_size must be positive")]
    fn test_zero_batch_size_panics() {
        DataLoader::new(ToyDataset::new(2, 1), 0, false);
    }
}
