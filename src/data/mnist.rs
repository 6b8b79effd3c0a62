//! MNIST digit dataset

use super::{Dataset, ImageDataset, Sample};
use mnist::MnistBuilder;
use ndarray::Array1;
use std::path::Path;

const IMAGE_SIZE: usize = 28 * 28;

/// MNIST handwritten digits, loaded from the IDX archive files.
///
/// The underlying loader downloads and extracts the archives into
/// `data_root` when they are not already present, and aborts with its own
/// error output when the files cannot be fetched or parsed.
///
/// Pixels are normalized to `[0, 1]`.
pub struct MnistDataset {
    images: Vec<f32>,
    labels: Vec<u8>,
}

impl MnistDataset {
    /// Load the 60k-image training split.
    pub fn train(data_root: impl AsRef<Path>) -> Self {
        let raw = Self::fetch(data_root);
        Self::from_raw(raw.trn_img, raw.trn_lbl)
    }

    /// Load the 10k-image test split.
    pub fn test(data_root: impl AsRef<Path>) -> Self {
        let raw = Self::fetch(data_root);
        Self::from_raw(raw.tst_img, raw.tst_lbl)
    }

    fn fetch(data_root: impl AsRef<Path>) -> mnist::Mnist {
        MnistBuilder::new()
            .base_path(&data_root.as_ref().to_string_lossy())
            .label_format_digit()
            .training_set_length(60_000)
            .test_set_length(10_000)
            .download_and_extract()
            .finalize()
    }

    fn from_raw(images: Vec<u8>, labels: Vec<u8>) -> Self {
        let images = images.iter().map(|&p| f32::from(p) / 255.0).collect();
        Self { images, labels }
    }
}

impl Dataset for MnistDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn get(&self, index: usize) -> Sample {
        let start = index * IMAGE_SIZE;
        let pixels = self.images[start..start + IMAGE_SIZE].to_vec();
        Sample {
            input: Array1::from(pixels),
            label: i64::from(self.labels[index]),
        }
    }
}

impl ImageDataset for MnistDataset {}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic() -> MnistDataset {
        // Two fake 28x28 images with increasing pixel values
        let images: Vec<u8> = (0..2 * IMAGE_SIZE).map(|i| (i % 256) as u8).collect();
        MnistDataset::from_raw(images, vec![3, 7])
    }

    #[test]
    fn test_len_and_labels() {
        let ds = synthetic();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0).label, 3);
        assert_eq!(ds.get(1).label, 7);
    }

    #[test]
    fn test_pixels_normalized_to_unit_range() {
        let ds = synthetic();
        let sample = ds.get(1);
        assert_eq!(sample.input.len(), IMAGE_SIZE);
        assert!(sample.input.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_samples_are_index_aligned() {
        let ds = synthetic();
        // Image 0 starts at pixel value 0, image 1 at 784 % 256
        assert_eq!(ds.get(0).input[0], 0.0);
        let expected = ((IMAGE_SIZE % 256) as f32) / 255.0;
        assert!((ds.get(1).input[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_render_has_title_and_rows() {
        let ds = synthetic();
        let rendered = ds.render(0);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Label: 3");
        assert_eq!(lines.len(), 29);
    }
}
