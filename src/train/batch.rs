//! Batch data structure

use crate::Tensor;

/// A batch of samples grouped for one training or validation step.
///
/// `inputs` is `[batch_size * feature_dim]` flattened row-major. Labels are
/// carried alongside for API completeness; the reconstruction objective
/// never reads them.
#[derive(Clone)]
pub struct Batch {
    /// Flattened input features.
    pub inputs: Tensor,
    /// Integer class ids, one per sample.
    pub labels: Vec<i64>,
}

impl Batch {
    /// Create a new batch.
    pub fn new(inputs: Tensor, labels: Vec<i64>) -> Self {
        Self { inputs, labels }
    }

    /// Number of samples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the batch holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of a single sample.
    #[must_use]
    pub fn feature_dim(&self) -> usize {
        if self.labels.is_empty() {
            0
        } else {
            self.inputs.len() / self.labels.len()
        }
    }
}
