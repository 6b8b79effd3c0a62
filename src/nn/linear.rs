//! Fully-connected layer

use crate::autograd::ops::{add_bias, matmul};
use crate::Tensor;
use rand::Rng;

/// A dense layer computing `x @ W + b` over a flattened batch.
///
/// The weight is stored flattened row-major as `in_features x out_features`.
pub struct Linear {
    weight: Tensor,
    bias: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Create a layer with Xavier-uniform initialized weights and zero bias.
    pub fn new<R: Rng>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let bound = (6.0 / (in_features + out_features) as f32).sqrt();
        let weight: Vec<f32> = (0..in_features * out_features)
            .map(|_| rng.random::<f32>() * 2.0 * bound - bound)
            .collect();

        Self {
            weight: Tensor::from_vec(weight, true),
            bias: Tensor::zeros(out_features, true),
            in_features,
            out_features,
        }
    }

    /// Forward pass: `inputs` is `[batch_size * in_features]` flattened.
    pub fn forward(&self, inputs: &Tensor, batch_size: usize) -> Tensor {
        let z = matmul(
            inputs,
            &self.weight,
            batch_size,
            self.in_features,
            self.out_features,
        );
        add_bias(&z, &self.bias, batch_size, self.out_features)
    }

    /// Handle to the weight tensor.
    #[must_use]
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// Handle to the bias tensor.
    #[must_use]
    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    /// Input width.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Output width.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_linear_shapes() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = Linear::new(4, 3, &mut rng);
        assert_eq!(layer.weight().len(), 12);
        assert_eq!(layer.bias().len(), 3);

        let inputs = Tensor::from_vec(vec![1.0; 8], false); // batch of 2
        let out = layer.forward(&inputs, 2);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_linear_init_within_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = Linear::new(10, 10, &mut rng);
        let bound = (6.0 / 20.0f32).sqrt();
        assert!(layer.weight().to_vec().iter().all(|w| w.abs() <= bound));
        assert!(layer.bias().to_vec().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_linear_init_deterministic_for_seed() {
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = Linear::new(5, 5, &mut rng_a);
        let b = Linear::new(5, 5, &mut rng_b);
        assert_eq!(a.weight().to_vec(), b.weight().to_vec());
    }

    #[test]
    fn test_linear_gradients_reach_weights() {
        use crate::autograd::{backward, ops::sum};

        let mut rng = StdRng::seed_from_u64(1);
        let layer = Linear::new(2, 2, &mut rng);
        let inputs = Tensor::from_vec(vec![1.0, 2.0], false);

        let out = layer.forward(&inputs, 1);
        let mut loss = sum(&out);
        backward(&mut loss, None);

        assert!(layer.weight().grad().is_some());
        assert!(layer.bias().grad().is_some());
    }
}
