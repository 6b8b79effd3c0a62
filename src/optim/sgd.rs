//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// SGD optimizer with optional momentum.
pub struct SGD {
    lr: f32,
    momentum: f32,
    velocities: Vec<Option<Array1<f32>>>,
}

impl SGD {
    /// Create a new SGD optimizer.
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            velocities: Vec::new(),
        }
    }

    /// Initialize velocities if needed
    fn ensure_velocities(&mut self, params: &[Tensor]) {
        if self.velocities.is_empty() {
            self.velocities = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_velocities(params);

        for (i, param) in params.iter_mut().enumerate() {
            if let Some(grad) = param.grad() {
                if self.momentum > 0.0 {
                    // v = momentum * v - lr * grad
                    let velocity = if let Some(v) = &self.velocities[i] {
                        v * self.momentum - &grad * self.lr
                    } else {
                        &grad * (-self.lr)
                    };

                    let update = {
                        let data = param.data();
                        &*data + &velocity
                    };
                    *param.data_mut() = update;
                    self.velocities[i] = Some(velocity);
                } else {
                    // param -= lr * grad
                    let update = {
                        let data = param.data();
                        &*data - &(&grad * self.lr)
                    };
                    *param.data_mut() = update;
                }
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_sgd_step() {
        let mut opt = SGD::new(0.1, 0.0);
        let mut params = vec![Tensor::from_vec(vec![1.0, 2.0], true)];
        params[0].set_grad(arr1(&[1.0, 1.0]));

        opt.step(&mut params);

        let data = params[0].to_vec();
        assert!((data[0] - 0.9).abs() < 1e-6);
        assert!((data[1] - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_momentum_accumulates() {
        let mut opt = SGD::new(0.1, 0.9);
        let mut params = vec![Tensor::from_vec(vec![0.0], true)];

        params[0].set_grad(arr1(&[1.0]));
        opt.step(&mut params);
        // First step: v = -0.1, param = -0.1
        assert!((params[0].data()[0] + 0.1).abs() < 1e-6);

        params[0].zero_grad();
        params[0].set_grad(arr1(&[1.0]));
        opt.step(&mut params);
        // Second step: v = 0.9 * -0.1 - 0.1 = -0.19, param = -0.29
        assert!((params[0].data()[0] + 0.29).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_updates_shared_storage() {
        let param = Tensor::from_vec(vec![1.0], true);
        let alias = param.clone();
        param.set_grad(arr1(&[1.0]));

        let mut opt = SGD::new(0.5, 0.0);
        opt.step(&mut [param]);

        // The aliased handle observes the update
        assert!((alias.data()[0] - 0.5).abs() < 1e-6);
    }
}
