//! Model abstractions: the [`Module`] contract and concrete layers
//!
//! A [`Module`] is the trainer's view of a model: a differentiable function
//! over a batch tensor, an enumerable parameter set, and a training-mode
//! toggle. The concrete [`AutoEncoder`] is a dense encoder/decoder pair for
//! flattened image inputs.

mod autoencoder;
mod linear;

pub use autoencoder::AutoEncoder;
pub use linear::Linear;

use crate::Tensor;

/// Contract between a model and the training loop.
pub trait Module {
    /// Forward pass over a batch.
    ///
    /// `inputs` is a `[batch_size * feature_dim]` flattened row-major
    /// tensor; the result has the same shape.
    fn forward(&self, inputs: &Tensor, batch_size: usize) -> Tensor;

    /// Named parameter handles, in a stable order.
    ///
    /// The returned tensors alias the module's own storage, so an optimizer
    /// stepping them updates the module in place.
    fn named_parameters(&self) -> Vec<(String, Tensor)>;

    /// Parameter handles without names.
    fn parameters(&self) -> Vec<Tensor> {
        self.named_parameters().into_iter().map(|(_, t)| t).collect()
    }

    /// Toggle training mode.
    fn set_training(&mut self, training: bool);

    /// Whether the module is in training mode.
    fn is_training(&self) -> bool;
}
