//! Matrix multiplication autograd operations over flattened row-major storage

use crate::autograd::{BackwardOp, Tensor};
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// Transpose a row-major matrix (rows x cols) to (cols x rows).
#[inline]
pub fn transpose(data: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut transposed = vec![0.0f32; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            transposed[c * rows + r] = data[r * cols + c];
        }
    }
    transposed
}

/// Compute C = A @ B over flattened row-major slices.
pub fn matmul_compute(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    let mut c = vec![0.0f32; m * n];
    for i in 0..m {
        for p in 0..k {
            let a_ip = a[i * k + p];
            if a_ip == 0.0 {
                continue;
            }
            for j in 0..n {
                c[i * n + j] += a_ip * b[p * n + j];
            }
        }
    }
    c
}

/// Matrix multiplication.
///
/// Computes C = A @ B where:
/// - A is m×k (flattened to length m*k)
/// - B is k×n (flattened to length k*n)
/// - C is m×n (flattened to length m*n)
pub fn matmul(a: &Tensor, b: &Tensor, m: usize, k: usize, n: usize) -> Tensor {
    assert_eq!(a.len(), m * k, "Matrix A size mismatch");
    assert_eq!(b.len(), k * n, "Matrix B size mismatch");

    let result_data = {
        let a_data = a.data();
        let b_data = b.data();
        matmul_compute(
            a_data.as_slice().expect("matrix A must be contiguous"),
            b_data.as_slice().expect("matrix B must be contiguous"),
            m,
            k,
            n,
        )
    };

    let requires_grad = a.requires_grad() || b.requires_grad();
    let mut result = Tensor::new(Array1::from(result_data), requires_grad);

    if requires_grad {
        let backward_op = Rc::new(MatmulBackward {
            a: a.clone(),
            b: b.clone(),
            m,
            k,
            n,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct MatmulBackward {
    a: Tensor,
    b: Tensor,
    m: usize,
    k: usize,
    n: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self) {
        if let Some(grad_output) = self.result_grad.borrow().as_ref() {
            // ∂L/∂A = ∂L/∂C @ B^T  (m×n) @ (n×k) = (m×k)
            // ∂L/∂B = A^T @ ∂L/∂C  (k×m) @ (m×n) = (k×n)

            let grad_c = grad_output
                .as_slice()
                .expect("gradient output must be contiguous");

            if self.a.requires_grad() {
                let b_data = self.b.data();
                let b_slice = b_data.as_slice().expect("matrix B must be contiguous");
                let b_t = transpose(b_slice, self.k, self.n);
                let grad_a = matmul_compute(grad_c, &b_t, self.m, self.n, self.k);
                self.a.accumulate_grad(Array1::from(grad_a));
            }

            if self.b.requires_grad() {
                let a_data = self.a.data();
                let a_slice = a_data.as_slice().expect("matrix A must be contiguous");
                let a_t = transpose(a_slice, self.m, self.k);
                let grad_b = matmul_compute(&a_t, grad_c, self.k, self.m, self.n);
                self.b.accumulate_grad(Array1::from(grad_b));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_2x3() {
        // [1, 2, 3]
        // [4, 5, 6]
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = transpose(&data, 2, 3);
        assert_eq!(result, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_matmul_forward() {
        // A = [[1, 2], [3, 4]], B = [[5, 6], [7, 8]]
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], false);
        let b = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], false);
        let c = matmul(&a, &b, 2, 2, 2);
        assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_rectangular() {
        // A is 1x3, B is 3x2
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
        let b = Tensor::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], false);
        let c = matmul(&a, &b, 1, 3, 2);
        assert_eq!(c.to_vec(), vec![4.0, 5.0]);
    }

    #[test]
    fn test_matmul_backward() {
        let a = Tensor::from_vec(vec![1.0, 2.0], true); // 1x2
        let b = Tensor::from_vec(vec![3.0, 4.0], true); // 2x1
        let c = matmul(&a, &b, 1, 2, 1);
        assert_eq!(c.data()[0], 11.0);

        c.set_grad(Array1::from(vec![1.0]));
        c.backward_op().unwrap().backward();

        // grad_A = grad_C @ B^T = [3, 4]
        assert_eq!(a.grad().unwrap().to_vec(), vec![3.0, 4.0]);
        // grad_B = A^T @ grad_C = [1, 2]
        assert_eq!(b.grad().unwrap().to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "Matrix A size mismatch")]
    fn test_matmul_size_mismatch() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
        let b = Tensor::from_vec(vec![1.0], false);
        matmul(&a, &b, 2, 2, 1);
    }
}
