//! Checkpoint state for serialization

use crate::error::{Error, Result};
use crate::nn::Module;
use crate::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Checkpoint metadata: what was saved and under which run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Run or model identifier.
    pub name: String,

    /// Model architecture type (e.g. "autoencoder").
    pub architecture: String,

    /// Crate version that wrote the snapshot.
    pub version: String,

    /// Custom metadata fields (epoch, validation loss, ...).
    pub custom: HashMap<String, serde_json::Value>,
}

impl CheckpointMetadata {
    /// Create new metadata with minimal fields.
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            custom: HashMap::new(),
        }
    }

    /// Add a custom metadata field.
    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom.insert(key.into(), value);
        self
    }
}

/// Information about one saved parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name (e.g. "enc1.weight").
    pub name: String,

    /// Parameter shape.
    pub shape: Vec<usize>,

    /// Whether this parameter requires gradients.
    pub requires_grad: bool,
}

/// Serializable snapshot of a model's parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointState {
    /// Checkpoint metadata.
    pub metadata: CheckpointMetadata,

    /// Parameter table, in module order.
    pub parameters: Vec<ParameterInfo>,

    /// Flattened parameter data, concatenated in table order.
    pub data: Vec<f32>,
}

impl CheckpointState {
    /// Snapshot a module's named parameters.
    pub fn from_module(module: &dyn Module, metadata: CheckpointMetadata) -> Self {
        let mut data = Vec::new();
        let parameters: Vec<ParameterInfo> = module
            .named_parameters()
            .iter()
            .map(|(name, tensor)| {
                data.extend_from_slice(&tensor.to_vec());
                ParameterInfo {
                    name: name.clone(),
                    shape: vec![tensor.len()],
                    requires_grad: tensor.requires_grad(),
                }
            })
            .collect();

        Self {
            metadata,
            parameters,
            data,
        }
    }

    /// Split the flat data back into named tensors.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the data length does not
    /// match the parameter table.
    pub fn into_parameters(self) -> Result<Vec<(String, Tensor)>> {
        let expected: usize = self
            .parameters
            .iter()
            .map(|p| p.shape.iter().product::<usize>())
            .sum();
        if expected != self.data.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![expected],
                actual: vec![self.data.len()],
            });
        }

        let mut offset = 0;
        let tensors = self
            .parameters
            .into_iter()
            .map(|info| {
                let size: usize = info.shape.iter().product();
                let values = self.data[offset..offset + size].to_vec();
                offset += size;
                (info.name, Tensor::from_vec(values, info.requires_grad))
            })
            .collect();

        Ok(tensors)
    }
}
