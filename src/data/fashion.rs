//! Fashion-MNIST dataset loaded from a CSV export

use super::{Dataset, ImageDataset, Sample};
use crate::error::{Error, Result};
use ndarray::Array1;
use std::path::Path;

const IMAGE_SIZE: usize = 28 * 28;

/// Fashion-MNIST clothing images from a `label,pixel0..pixel783` CSV file
/// (the common Kaggle export, one header row).
///
/// Pixels are normalized to `[-1, 1]`: divided by 255, then centered with
/// `(x - 0.5) / 0.5`.
pub struct FashionMnistDataset {
    images: Vec<f32>,
    labels: Vec<i64>,
}

impl FashionMnistDataset {
    /// Read and normalize the full CSV file into memory.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut images = Vec::new();
        let mut labels = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != IMAGE_SIZE + 1 {
                return Err(Error::Dataset {
                    message: format!(
                        "row {} of {} has {} fields, expected {}",
                        row + 1,
                        path.display(),
                        record.len(),
                        IMAGE_SIZE + 1
                    ),
                });
            }

            let label: i64 = record[0].parse().map_err(|_| Error::Dataset {
                message: format!("row {} of {}: bad label '{}'", row + 1, path.display(), &record[0]),
            })?;
            labels.push(label);

            for field in record.iter().skip(1) {
                let pixel: f32 = field.parse().map_err(|_| Error::Dataset {
                    message: format!("row {} of {}: bad pixel '{field}'", row + 1, path.display()),
                })?;
                let normalized = (pixel / 255.0 - 0.5) / 0.5;
                images.push(normalized);
            }
        }

        Ok(Self { images, labels })
    }
}

impl Dataset for FashionMnistDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn get(&self, index: usize) -> Sample {
        let start = index * IMAGE_SIZE;
        let pixels = self.images[start..start + IMAGE_SIZE].to_vec();
        Sample {
            input: Array1::from(pixels),
            label: self.labels[index],
        }
    }
}

impl ImageDataset for FashionMnistDataset {}
