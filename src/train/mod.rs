//! High-level training loop
//!
//! This module provides the training harness:
//! - [`Batch`] — one step's worth of samples
//! - [`LossFn`] / [`MSELoss`] — the reconstruction objective
//! - [`TrainConfig`] — epoch count, device, reporting, artifact paths
//! - [`Trainer`] — the epoch loop with validation tracking and
//!   best-model checkpointing

mod batch;
mod config;
mod loss;
mod trainer;

pub use batch::Batch;
pub use config::{TrainConfig, DEFAULT_REPORT_INTERVAL};
pub use loss::{LossFn, MSELoss};
pub use trainer::{Trainer, TRAIN_LOSS_CHANNEL, VALIDATION_LOSS_CHANNEL};
