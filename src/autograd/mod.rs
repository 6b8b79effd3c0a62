//! Tape-based autograd engine
//!
//! Provides automatic differentiation using a computational graph with
//! gradient tape. Tensors are flat `f32` arrays with shared storage;
//! matrix-shaped operations take explicit dimensions.

mod backward;
pub mod ops;
mod tensor;

pub use backward::BackwardOp;
pub use ops::*;
pub use tensor::Tensor;

/// Perform backward pass on a tensor.
///
/// Seeds the tensor's gradient with `grad_output`, or with ones when `None`
/// (the usual case for a scalar loss), then walks the tape.
pub fn backward(tensor: &mut Tensor, grad_output: Option<ndarray::Array1<f32>>) {
    if let Some(grad) = grad_output {
        tensor.set_grad(grad);
    } else {
        // Initialize with ones for scalar loss
        let ones = ndarray::Array1::ones(tensor.data().len());
        tensor.set_grad(ones);
    }

    if let Some(op) = tensor.backward_op() {
        op.backward();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_through_chain() {
        // loss = sum(scale(x, 2.0)) → d loss / d x = 2
        let x = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        let scaled = ops::scale(&x, 2.0);
        let mut loss = ops::sum(&scaled);

        backward(&mut loss, None);

        assert_eq!(x.grad().unwrap().to_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_backward_accumulates_across_calls() {
        let x = Tensor::from_vec(vec![1.0], true);
        let mut y1 = ops::scale(&x, 3.0);
        backward(&mut y1, None);
        let mut y2 = ops::scale(&x, 5.0);
        backward(&mut y2, None);

        // Gradients accumulate until zeroed
        assert_eq!(x.grad().unwrap()[0], 8.0);

        x.zero_grad();
        assert!(x.grad().is_none());
    }
}
