//! Differentiable operations over [`Tensor`](crate::Tensor)

mod activations;
mod basic;
mod matmul;

pub use activations::{relu, sigmoid};
pub use basic::{add, add_bias, scale, sum};
pub use matmul::{matmul, matmul_compute, transpose};
