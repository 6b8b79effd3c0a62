//! Training configuration

use crate::device::Device;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of batches between progress reports.
pub const DEFAULT_REPORT_INTERVAL: usize = 100;

/// Configuration for a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Number of epochs to train.
    pub n_epochs: usize,

    /// Device batches are transferred to before the forward pass.
    pub device: Device,

    /// Emit a progress line and a training-loss record every N batches.
    pub report_interval: usize,

    /// Directory under which per-run directories are created.
    pub runs_root: PathBuf,
}

impl TrainConfig {
    /// Create a config for the given epoch count with defaults elsewhere.
    pub fn new(n_epochs: usize) -> Self {
        Self {
            n_epochs,
            device: Device::Cpu,
            report_interval: DEFAULT_REPORT_INTERVAL,
            runs_root: PathBuf::from("runs"),
        }
    }

    /// Set the compute device.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Set the progress-report interval.
    #[must_use]
    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// Set the root directory for run artifacts.
    #[must_use]
    pub fn with_runs_root(mut self, runs_root: impl Into<PathBuf>) -> Self {
        self.runs_root = runs_root.into();
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
