//! Dense autoencoder for flattened image inputs

use super::{Linear, Module};
use crate::autograd::ops::{relu, sigmoid};
use crate::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A symmetric dense autoencoder.
///
/// Encoder: `input -> hidden -> latent`, decoder: `latent -> hidden ->
/// input`, with ReLU on the hidden layers. The reconstruction head is
/// linear by default; enable [`AutoEncoder::with_sigmoid_output`] when
/// inputs are normalized to `[0, 1]`.
pub struct AutoEncoder {
    enc1: Linear,
    enc2: Linear,
    dec1: Linear,
    dec2: Linear,
    sigmoid_output: bool,
    training: bool,
}

impl AutoEncoder {
    /// Create an autoencoder with OS-entropy initialization.
    pub fn new(input_dim: usize, hidden_dim: usize, latent_dim: usize) -> Self {
        let mut rng = StdRng::from_os_rng();
        Self::with_rng(input_dim, hidden_dim, latent_dim, &mut rng)
    }

    /// Create an autoencoder with a fixed initialization seed.
    pub fn seeded(input_dim: usize, hidden_dim: usize, latent_dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(input_dim, hidden_dim, latent_dim, &mut rng)
    }

    fn with_rng<R: Rng>(
        input_dim: usize,
        hidden_dim: usize,
        latent_dim: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            enc1: Linear::new(input_dim, hidden_dim, rng),
            enc2: Linear::new(hidden_dim, latent_dim, rng),
            dec1: Linear::new(latent_dim, hidden_dim, rng),
            dec2: Linear::new(hidden_dim, input_dim, rng),
            sigmoid_output: false,
            training: true,
        }
    }

    /// Squash reconstructions through a sigmoid.
    ///
    /// Use with inputs normalized to `[0, 1]`; leave off for `[-1, 1]`.
    #[must_use]
    pub fn with_sigmoid_output(mut self, sigmoid_output: bool) -> Self {
        self.sigmoid_output = sigmoid_output;
        self
    }

    /// Encode a batch into the latent space.
    pub fn encode(&self, inputs: &Tensor, batch_size: usize) -> Tensor {
        let h = relu(&self.enc1.forward(inputs, batch_size));
        self.enc2.forward(&h, batch_size)
    }

    /// Decode a latent batch back to input space.
    pub fn decode(&self, latent: &Tensor, batch_size: usize) -> Tensor {
        let h = relu(&self.dec1.forward(latent, batch_size));
        let out = self.dec2.forward(&h, batch_size);
        if self.sigmoid_output {
            sigmoid(&out)
        } else {
            out
        }
    }

    /// Input feature width.
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.enc1.in_features()
    }

    /// Latent width.
    #[must_use]
    pub fn latent_dim(&self) -> usize {
        self.enc2.out_features()
    }
}

impl Module for AutoEncoder {
    fn forward(&self, inputs: &Tensor, batch_size: usize) -> Tensor {
        let latent = self.encode(inputs, batch_size);
        self.decode(&latent, batch_size)
    }

    fn named_parameters(&self) -> Vec<(String, Tensor)> {
        vec![
            ("enc1.weight".to_string(), self.enc1.weight().clone()),
            ("enc1.bias".to_string(), self.enc1.bias().clone()),
            ("enc2.weight".to_string(), self.enc2.weight().clone()),
            ("enc2.bias".to_string(), self.enc2.bias().clone()),
            ("dec1.weight".to_string(), self.dec1.weight().clone()),
            ("dec1.bias".to_string(), self.dec1.bias().clone()),
            ("dec2.weight".to_string(), self.dec2.weight().clone()),
            ("dec2.bias".to_string(), self.dec2.bias().clone()),
        ]
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_preserves_shape() {
        let model = AutoEncoder::seeded(16, 8, 4, 3);
        let inputs = Tensor::from_vec(vec![0.5; 32], false); // batch of 2
        let out = model.forward(&inputs, 2);
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_sigmoid_output_in_unit_range() {
        let model = AutoEncoder::seeded(8, 4, 2, 3).with_sigmoid_output(true);
        let inputs = Tensor::from_vec(vec![0.9; 8], false);
        let out = model.forward(&inputs, 1);
        assert!(out.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_named_parameters_stable_order() {
        let model = AutoEncoder::seeded(8, 4, 2, 3);
        let names: Vec<String> = model
            .named_parameters()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names[0], "enc1.weight");
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_parameters_alias_module_storage() {
        let model = AutoEncoder::seeded(4, 3, 2, 3);
        let params = model.parameters();

        // Mutating through the handle is visible in the module
        params[0].data_mut()[0] = 42.0;
        assert_eq!(model.named_parameters()[0].1.data()[0], 42.0);
    }

    #[test]
    fn test_training_toggle() {
        let mut model = AutoEncoder::seeded(4, 3, 2, 3);
        assert!(model.is_training());
        model.set_training(false);
        assert!(!model.is_training());
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = AutoEncoder::seeded(8, 4, 2, 99);
        let b = AutoEncoder::seeded(8, 4, 2, 99);
        assert_eq!(
            a.named_parameters()[0].1.to_vec(),
            b.named_parameters()[0].1.to_vec()
        );
    }
}
