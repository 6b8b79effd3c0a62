//! reconstruir — a minimal training harness for autoencoder-style
//! reconstruction models on small image datasets.
//!
//! The crate provides:
//! - dataset wrappers for MNIST and Fashion-MNIST exposing `(input, label)`
//!   samples with terminal visualization ([`data`])
//! - a batching [`data::DataLoader`] (shuffled for training, ordered for
//!   validation)
//! - a tape-based autograd engine over flat `f32` tensors ([`autograd`])
//! - dense [`nn::AutoEncoder`] models behind the [`nn::Module`] contract
//! - [`optim::SGD`] and [`optim::Adam`] optimizers
//! - a [`train::Trainer`] running the epoch loop: forward, loss, backward,
//!   optimizer step, periodic progress logging, per-epoch validation, and
//!   checkpointing of the best model ([`io`])
//! - a run-scoped scalar log sink ([`logging`])
//!
//! # Example
//!
//! ```no_run
//! use reconstruir::data::{DataLoader, FashionMnistDataset};
//! use reconstruir::nn::AutoEncoder;
//! use reconstruir::optim::Adam;
//! use reconstruir::train::{MSELoss, TrainConfig, Trainer};
//!
//! # fn main() -> reconstruir::Result<()> {
//! let train_set = FashionMnistDataset::from_csv("data/fashion-mnist_train.csv")?;
//! let val_set = FashionMnistDataset::from_csv("data/fashion-mnist_test.csv")?;
//!
//! let mut trainer = Trainer::new(
//!     AutoEncoder::new(784, 128, 32),
//!     Box::new(DataLoader::new(train_set, 64, true)),
//!     Box::new(DataLoader::new(val_set, 64, false)),
//!     Box::new(MSELoss),
//!     Box::new(Adam::default_params(1e-3)),
//!     TrainConfig::new(5),
//! )?;
//! trainer.fit()?;
//! # Ok(())
//! # }
//! ```

pub mod autograd;
pub mod cli;
pub mod data;
pub mod device;
pub mod error;
pub mod io;
pub mod logging;
pub mod nn;
pub mod optim;
pub mod train;

pub use autograd::Tensor;
pub use device::Device;
pub use error::{Error, Result};
