//! Compute-device selector

use crate::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where batch tensors live during training.
///
/// A single CPU backend is provided; [`Device::transfer`] is the seam where
/// a device copy would happen for an accelerator backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    /// Host memory.
    #[default]
    Cpu,
}

impl Device {
    /// Move a tensor to this device.
    #[must_use]
    pub fn transfer(&self, tensor: Tensor) -> Tensor {
        match self {
            Device::Cpu => tensor,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            other => Err(format!("unknown device '{other}', expected 'cpu'")),
        }
    }
}
