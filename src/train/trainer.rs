//! Epoch-based training loop with validation tracking and checkpointing

use crate::autograd::backward;
use crate::data::BatchSource;
use crate::error::{Error, Result};
use crate::io::{save_checkpoint, CheckpointMetadata};
use crate::logging::ScalarWriter;
use crate::nn::Module;
use crate::optim::Optimizer;
use crate::train::{LossFn, TrainConfig};
use crate::Tensor;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Scalar channel for per-step training loss.
pub const TRAIN_LOSS_CHANNEL: &str = "Loss/train";

/// Scalar channel for per-epoch average validation loss.
pub const VALIDATION_LOSS_CHANNEL: &str = "Loss/validation";

/// Sentinel larger than any realistic loss; the first completed epoch
/// always improves on it.
const BEST_VLOSS_SENTINEL: f32 = 1_000_000.0;

/// Orchestrates the training procedure: epochs, batches, progress logging,
/// per-epoch validation, and best-model checkpointing.
///
/// Construction generates a timestamp-based run identifier, creates the run
/// directory under `config.runs_root`, and opens a [`ScalarWriter`] scoped
/// to it. No training happens until [`Trainer::fit`] is called.
///
/// # Example
///
/// ```no_run
/// use reconstruir::data::{DataLoader, FashionMnistDataset};
/// use reconstruir::nn::AutoEncoder;
/// use reconstruir::optim::Adam;
/// use reconstruir::train::{MSELoss, TrainConfig, Trainer};
///
/// # fn main() -> reconstruir::Result<()> {
/// let train_set = FashionMnistDataset::from_csv("data/fashion-mnist_train.csv")?;
/// let val_set = FashionMnistDataset::from_csv("data/fashion-mnist_test.csv")?;
///
/// let mut trainer = Trainer::new(
///     AutoEncoder::new(784, 128, 32),
///     Box::new(DataLoader::new(train_set, 64, true)),
///     Box::new(DataLoader::new(val_set, 64, false)),
///     Box::new(MSELoss),
///     Box::new(Adam::default_params(1e-3)),
///     TrainConfig::new(5),
/// )?;
/// trainer.fit()?;
/// # Ok(())
/// # }
/// ```
pub struct Trainer<M: Module> {
    model: M,
    train_source: Box<dyn BatchSource>,
    val_source: Box<dyn BatchSource>,
    loss_fn: Box<dyn LossFn>,
    optimizer: Box<dyn Optimizer>,
    config: TrainConfig,
    /// Parameter handles pulled from the model once at construction;
    /// they alias the model's own storage.
    params: Vec<Tensor>,
    run_id: String,
    run_dir: PathBuf,
    writer: ScalarWriter,
    best_vloss: f32,
}

impl<M: Module> Trainer<M> {
    /// Create a trainer and prepare its run directory and log sink.
    pub fn new(
        model: M,
        train_source: Box<dyn BatchSource>,
        val_source: Box<dyn BatchSource>,
        loss_fn: Box<dyn LossFn>,
        optimizer: Box<dyn Optimizer>,
        config: TrainConfig,
    ) -> Result<Self> {
        let run_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let run_dir = config.runs_root.join(&run_id);
        let writer = ScalarWriter::create(&run_dir)?;
        let params = model.parameters();

        Ok(Self {
            model,
            train_source,
            val_source,
            loss_fn,
            optimizer,
            config,
            params,
            run_id,
            run_dir,
            writer,
            best_vloss: BEST_VLOSS_SENTINEL,
        })
    }

    /// Run the full training procedure.
    ///
    /// Returns after all configured epochs complete. Errors from the data
    /// sources, the log sink, or the checkpoint store propagate unmodified
    /// and abort the run mid-epoch with no recovery.
    pub fn fit(&mut self) -> Result<()> {
        for epoch in 0..self.config.n_epochs {
            self.train_one_epoch(epoch);

            let avg_vloss = self.validate(epoch)?;

            if avg_vloss < self.best_vloss {
                self.best_vloss = avg_vloss;
                self.write_checkpoint(epoch, avg_vloss)?;
            }
        }
        Ok(())
    }

    /// Training phase for one epoch.
    fn train_one_epoch(&mut self, epoch: usize) {
        self.model.set_training(true);
        self.train_source.start_epoch();

        let batches_per_epoch = self.train_source.num_batches();
        let num_samples = self.train_source.num_samples();
        let report_interval = self.config.report_interval.max(1);

        let mut batch_idx = 0;
        while let Some(batch) = self.train_source.next_batch() {
            let batch_len = batch.len();
            let inputs = self.config.device.transfer(batch.inputs);

            self.optimizer.zero_grad(&mut self.params);

            let reconstruction = self.model.forward(&inputs, batch_len);
            // Reconstruction objective: the target is the input, labels are unused
            let mut loss = self.loss_fn.forward(&reconstruction, &inputs);
            let loss_value = loss.data()[0];

            backward(&mut loss, None);
            self.optimizer.step(&mut self.params);

            if batch_idx % report_interval == report_interval - 1 {
                let pct = 100.0 * (batch_idx + 1) as f32 / batches_per_epoch.max(1) as f32;
                println!(
                    "Train Epoch: {}/{} [{}/{} ({:.0}%)]\tLoss: {:.6}",
                    epoch + 1,
                    self.config.n_epochs,
                    batch_idx * batch_len,
                    num_samples,
                    pct,
                    loss_value
                );

                let global_step = epoch * batches_per_epoch + batch_idx + 1;
                self.writer
                    .add_scalar(TRAIN_LOSS_CHANNEL, f64::from(loss_value), global_step as u64);
            }

            batch_idx += 1;
        }
    }

    /// Validation phase for one epoch; returns the average validation loss.
    fn validate(&mut self, epoch: usize) -> Result<f32> {
        self.model.set_training(false);
        self.val_source.start_epoch();

        let mut running_vloss = 0.0f64;
        let mut batches_seen = 0usize;

        while let Some(batch) = self.val_source.next_batch() {
            let batch_len = batch.len();
            let inputs = self.config.device.transfer(batch.inputs);

            // Forward and loss only: no gradient zeroing, no optimizer step
            let reconstruction = self.model.forward(&inputs, batch_len);
            let vloss = self.loss_fn.forward(&reconstruction, &inputs);
            running_vloss += f64::from(vloss.data()[0]);
            batches_seen += 1;
        }

        if batches_seen == 0 {
            return Err(Error::EmptyValidationSet);
        }

        let avg_vloss = (running_vloss / batches_seen as f64) as f32;
        println!("Validation loss: {avg_vloss:.6}");

        self.writer
            .add_scalar(VALIDATION_LOSS_CHANNEL, f64::from(avg_vloss), (epoch + 1) as u64);
        // Make this epoch's records durable before the checkpoint decision
        self.writer.flush()?;

        Ok(avg_vloss)
    }

    /// Persist the current parameter snapshot for an improving epoch.
    fn write_checkpoint(&self, epoch: usize, avg_vloss: f32) -> Result<()> {
        let metadata = CheckpointMetadata::new(&self.run_id, "autoencoder")
            .with_custom("epoch", serde_json::json!(epoch + 1))
            .with_custom("val_loss", serde_json::json!(avg_vloss));

        let path = self.run_dir.join(format!("model_{}.json", epoch + 1));
        save_checkpoint(&self.model, metadata, &path)
    }

    /// Run identifier generated at construction.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Directory holding this run's scalar logs and checkpoints.
    #[must_use]
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Best average validation loss seen so far.
    #[must_use]
    pub fn best_vloss(&self) -> f32 {
        self.best_vloss
    }

    /// The model under training.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model under training.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Training configuration.
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }
}
