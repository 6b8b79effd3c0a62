//! Checkpoint saving

use super::model::{CheckpointMetadata, CheckpointState};
use crate::error::{Error, Result};
use crate::nn::Module;
use std::path::Path;

/// Serialize a module's parameter snapshot to a JSON checkpoint file.
///
/// The parent directory must already exist; the trainer creates the run
/// directory at construction time.
pub fn save_checkpoint(
    module: &dyn Module,
    metadata: CheckpointMetadata,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let state = CheckpointState::from_module(module, metadata);

    let encoded = serde_json::to_string(&state)
        .map_err(|e| Error::serialization(format!("encoding checkpoint: {e}")))?;

    std::fs::write(path, encoded)
        .map_err(|e| Error::io(format!("writing checkpoint {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::AutoEncoder;

    #[test]
    fn test_save_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model_1.json");
        let model = AutoEncoder::seeded(6, 4, 2, 5);

        save_checkpoint(&model, CheckpointMetadata::new("t", "autoencoder"), &path).unwrap();

        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("enc1.weight"));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("model_1.json");
        let model = AutoEncoder::seeded(6, 4, 2, 5);

        let err =
            save_checkpoint(&model, CheckpointMetadata::new("t", "autoencoder"), &path)
                .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
