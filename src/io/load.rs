//! Checkpoint loading

use super::model::CheckpointState;
use crate::error::{Error, Result};
use std::path::Path;

/// Load a checkpoint state from a JSON file written by
/// [`save_checkpoint`](super::save_checkpoint).
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<CheckpointState> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading checkpoint {}", path.display()), e))?;

    serde_json::from_str(&contents)
        .map_err(|e| Error::serialization(format!("decoding checkpoint: {e}")))
}
