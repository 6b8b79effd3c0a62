//! Basic autograd operations: add, scale, sum, bias broadcast

use crate::autograd::{BackwardOp, Tensor};
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// Add two tensors element-wise.
pub fn add(a: &Tensor, b: &Tensor) -> Tensor {
    let data = {
        let a_data = a.data();
        let b_data = b.data();
        &*a_data + &*b_data
    };
    let requires_grad = a.requires_grad() || b.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(AddBackward {
            a: a.clone(),
            b: b.clone(),
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct AddBackward {
    a: Tensor,
    b: Tensor,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for AddBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad.clone());
            }
            if self.b.requires_grad() {
                self.b.accumulate_grad(grad.clone());
            }

            if let Some(op) = self.a.backward_op() {
                op.backward();
            }
            if let Some(op) = self.b.backward_op() {
                op.backward();
            }
        }
    }
}

/// Scale a tensor by a scalar factor.
pub fn scale(a: &Tensor, factor: f32) -> Tensor {
    let data = {
        let a_data = a.data();
        &*a_data * factor
    };
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(ScaleBackward {
            a: a.clone(),
            factor,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct ScaleBackward {
    a: Tensor,
    factor: f32,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for ScaleBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // ∂L/∂a = ∂L/∂out * factor
                let grad_a = grad * self.factor;
                self.a.accumulate_grad(grad_a);
            }

            if let Some(op) = self.a.backward_op() {
                op.backward();
            }
        }
    }
}

/// Sum all elements into a scalar tensor.
pub fn sum(a: &Tensor) -> Tensor {
    let data = Array1::from(vec![a.data().sum()]);
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(SumBackward {
            a: a.clone(),
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct SumBackward {
    a: Tensor,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for SumBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // ∂L/∂a = ∂L/∂sum * 1 (broadcast)
                let grad_val = grad[0];
                let grad_a = Array1::from(vec![grad_val; self.a.len()]);
                self.a.accumulate_grad(grad_a);
            }

            if let Some(op) = self.a.backward_op() {
                op.backward();
            }
        }
    }
}

/// Broadcast-add a bias row to each row of a flattened `rows x cols` matrix.
pub fn add_bias(x: &Tensor, bias: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(x.len(), rows * cols, "Input size mismatch");
    assert_eq!(bias.len(), cols, "Bias size mismatch");

    let data = {
        let x_data = x.data();
        let bias_data = bias.data();
        let mut out = x_data.to_vec();
        for r in 0..rows {
            for c in 0..cols {
                out[r * cols + c] += bias_data[c];
            }
        }
        Array1::from(out)
    };
    let requires_grad = x.requires_grad() || bias.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(AddBiasBackward {
            x: x.clone(),
            bias: bias.clone(),
            rows,
            cols,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct AddBiasBackward {
    x: Tensor,
    bias: Tensor,
    rows: usize,
    cols: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for AddBiasBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.x.requires_grad() {
                // ∂L/∂x = ∂L/∂out (identity)
                self.x.accumulate_grad(grad.clone());
            }
            if self.bias.requires_grad() {
                // ∂L/∂bias = column sums of ∂L/∂out
                let mut grad_bias = vec![0.0f32; self.cols];
                for r in 0..self.rows {
                    for c in 0..self.cols {
                        grad_bias[c] += grad[r * self.cols + c];
                    }
                }
                self.bias.accumulate_grad(Array1::from(grad_bias));
            }

            if let Some(op) = self.x.backward_op() {
                op.backward();
            }
            if let Some(op) = self.bias.backward_op() {
                op.backward();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;

    #[test]
    fn test_add_forward() {
        let a = Tensor::from_vec(vec![1.0, 2.0], false);
        let b = Tensor::from_vec(vec![3.0, 4.0], false);
        let c = add(&a, &b);
        assert_eq!(c.to_vec(), vec![4.0, 6.0]);
        assert!(c.backward_op().is_none());
    }

    #[test]
    fn test_add_backward() {
        let a = Tensor::from_vec(vec![1.0, 2.0], true);
        let b = Tensor::from_vec(vec![3.0, 4.0], true);
        let mut c = add(&a, &b);

        backward(&mut c, None);

        assert_eq!(a.grad().unwrap().to_vec(), vec![1.0, 1.0]);
        assert_eq!(b.grad().unwrap().to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_scale_backward() {
        let a = Tensor::from_vec(vec![1.0, 2.0], true);
        let mut b = scale(&a, 3.0);
        assert_eq!(b.to_vec(), vec![3.0, 6.0]);

        backward(&mut b, None);
        assert_eq!(a.grad().unwrap().to_vec(), vec![3.0, 3.0]);
    }

    #[test]
    fn test_sum_backward() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        let mut s = sum(&a);
        assert_eq!(s.data()[0], 6.0);

        backward(&mut s, None);
        assert_eq!(a.grad().unwrap().to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_add_bias_forward() {
        // 2x3 matrix + bias of 3
        let x = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false);
        let bias = Tensor::from_vec(vec![0.1, 0.2, 0.3], false);
        let out = add_bias(&x, &bias, 2, 3);
        let expected = [1.1, 2.2, 3.3, 4.1, 5.2, 6.3];
        for (got, want) in out.to_vec().iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_add_bias_backward_sums_rows() {
        let x = Tensor::from_vec(vec![0.0; 6], true);
        let bias = Tensor::from_vec(vec![0.0; 3], true);
        let out = add_bias(&x, &bias, 2, 3);

        out.set_grad(Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        out.backward_op().unwrap().backward();

        // Bias gradient sums over the two rows
        assert_eq!(bias.grad().unwrap().to_vec(), vec![5.0, 7.0, 9.0]);
        // Input gradient passes through unchanged
        assert_eq!(
            x.grad().unwrap().to_vec(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }
}
