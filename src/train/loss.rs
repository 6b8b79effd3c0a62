//! Loss functions for training

use crate::autograd::BackwardOp;
use crate::Tensor;
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// Trait for loss functions.
pub trait LossFn {
    /// Compute loss given predictions and targets.
    ///
    /// Returns a scalar loss tensor carrying a backward op so gradients can
    /// flow to the predictions.
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor;

    /// Name of the loss function.
    fn name(&self) -> &str;
}

/// Mean Squared Error Loss.
///
/// L = mean((predictions - targets)²)
///
/// For a reconstruction objective, pass the input batch as `targets`.
pub struct MSELoss;

impl LossFn for MSELoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "Predictions and targets must have same length"
        );

        let (mse, grad) = {
            let pred_data = predictions.data();
            let target_data = targets.data();
            let diff = &*pred_data - &*target_data;
            let squared = &diff * &diff;
            let mse = squared.mean().unwrap_or(0.0);

            // d(MSE)/d(pred) = 2 * (pred - target) / n
            let n = predictions.len() as f32;
            (mse, &diff * (2.0 / n))
        };

        let mut loss = Tensor::from_vec(vec![mse], true);

        if predictions.requires_grad() {
            loss.set_backward_op(Rc::new(MSEBackward {
                predictions: predictions.clone(),
                grad,
                loss_grad: loss.grad_cell(),
            }));
        }

        loss
    }

    fn name(&self) -> &'static str {
        "MSE"
    }
}

struct MSEBackward {
    predictions: Tensor,
    grad: Array1<f32>,
    loss_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for MSEBackward {
    fn backward(&self) {
        if let Some(upstream) = self.loss_grad.borrow().as_ref() {
            // Scale the local gradient by the upstream scalar
            let grad = &self.grad * upstream[0];
            self.predictions.accumulate_grad(grad);

            if let Some(op) = self.predictions.backward_op() {
                op.backward();
            }
        }
    }
}
