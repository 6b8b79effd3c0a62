//! Dataset wrappers and batch loading
//!
//! Datasets expose indexable `(input, label)` samples; the [`DataLoader`]
//! groups them into [`Batch`](crate::train::Batch)es — shuffled per pass
//! for training, in index order for validation — and implements the
//! [`BatchSource`] contract the trainer consumes.

mod fashion;
mod loader;
mod mnist;

pub use fashion::FashionMnistDataset;
pub use loader::DataLoader;
pub use mnist::MnistDataset;

use crate::train::Batch;
use ndarray::Array1;
use std::str::FromStr;

/// One `(input, label)` pair.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Flattened input features.
    pub input: Array1<f32>,
    /// Integer class id.
    pub label: i64,
}

/// A finite, indexable, ordered collection of samples.
pub trait Dataset {
    /// Number of samples.
    fn len(&self) -> usize;

    /// Whether the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the sample at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`, like slice indexing.
    fn get(&self, index: usize) -> Sample;
}

/// Provider of batches for one phase of training.
///
/// A source is driven one pass ("epoch") at a time: [`start_epoch`] begins
/// a fresh pass — reshuffling when the source is configured to — and
/// [`next_batch`] yields batches until the pass is exhausted.
///
/// [`start_epoch`]: BatchSource::start_epoch
/// [`next_batch`]: BatchSource::next_batch
pub trait BatchSource {
    /// Total number of samples per pass.
    fn num_samples(&self) -> usize;

    /// Total number of batches per pass.
    fn num_batches(&self) -> usize;

    /// Begin a new pass over the data.
    fn start_epoch(&mut self);

    /// Yield the next batch of the current pass, or `None` when exhausted.
    fn next_batch(&mut self) -> Option<Batch>;
}

/// Shade ramp for terminal image rendering, darkest last.
const SHADE_CHARS: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Datasets of grayscale images that can be rendered to the terminal.
pub trait ImageDataset: Dataset {
    /// Height and width of one image.
    fn image_dims(&self) -> (usize, usize) {
        (28, 28)
    }

    /// Render the sample at `index` as shaded text, one line per pixel row.
    fn render(&self, index: usize) -> String {
        let sample = self.get(index);
        let (rows, cols) = self.image_dims();

        // Normalize to the sample's own extent so both [0,1] and [-1,1]
        // pixel ranges render sensibly
        let min = sample.input.iter().copied().fold(f32::INFINITY, f32::min);
        let max = sample
            .input
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let range = (max - min).max(f32::EPSILON);

        let mut out = String::with_capacity(rows * (cols + 1) + 16);
        out.push_str(&format!("Label: {}\n", sample.label));
        for r in 0..rows {
            for c in 0..cols {
                let v = (sample.input[r * cols + c] - min) / range;
                let idx = (v * (SHADE_CHARS.len() - 1) as f32).round() as usize;
                out.push(SHADE_CHARS[idx.min(SHADE_CHARS.len() - 1)]);
            }
            out.push('\n');
        }
        out
    }

    /// Print the sample at `index` to stdout.
    fn show(&self, index: usize) {
        print!("{}", self.render(index));
    }
}

/// Datasets selectable by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DatasetKind {
    /// MNIST handwritten digits.
    Mnist,
    /// Fashion-MNIST clothing images.
    FashionMnist,
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mnist" => Ok(DatasetKind::Mnist),
            "fashion-mnist" | "fashion_mnist" | "fashion" => Ok(DatasetKind::FashionMnist),
            other => Err(format!(
                "unknown dataset '{other}', expected 'mnist' or 'fashion-mnist'"
            )),
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetKind::Mnist => write!(f, "mnist"),
            DatasetKind::FashionMnist => write!(f, "fashion-mnist"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::{Dataset, Sample};
    use ndarray::Array1;

    /// Small deterministic in-memory dataset for loader tests.
    pub struct ToyDataset {
        pub samples: Vec<Sample>,
    }

    impl ToyDataset {
        /// `n` samples of width `dim`; sample `i` is filled with `i as f32`
        /// and labeled `i`.
        pub fn new(n: usize, dim: usize) -> Self {
            let samples = (0..n)
                .map(|i| Sample {
                    input: Array1::from(vec![i as f32; dim]),
                    label: i as i64,
                })
                .collect();
            Self { samples }
        }
    }

    impl Dataset for ToyDataset {
        fn len(&self) -> usize {
            self.samples.len()
        }

        fn get(&self, index: usize) -> Sample {
            self.samples[index].clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::ToyDataset;
    use super::*;

    #[test]
    fn test_dataset_kind_parsing() {
        assert_eq!("mnist".parse::<DatasetKind>().unwrap(), DatasetKind::Mnist);
        assert_eq!(
            "fashion-mnist".parse::<DatasetKind>().unwrap(),
            DatasetKind::FashionMnist
        );
        assert_eq!(
            "Fashion_MNIST".parse::<DatasetKind>().unwrap(),
            DatasetKind::FashionMnist
        );
        assert!("cifar10".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn test_dataset_kind_display_round_trips() {
        for kind in [DatasetKind::Mnist, DatasetKind::FashionMnist] {
            assert_eq!(kind.to_string().parse::<DatasetKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_render_shape_and_label() {
        struct TinyImages(ToyDataset);
        impl Dataset for TinyImages {
            fn len(&self) -> usize {
                self.0.len()
            }
            fn get(&self, index: usize) -> Sample {
                self.0.get(index)
            }
        }
        impl ImageDataset for TinyImages {
            fn image_dims(&self) -> (usize, usize) {
                (2, 2)
            }
        }

        let ds = TinyImages(ToyDataset::new(3, 4));
        let rendered = ds.render(2);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3); // title + 2 pixel rows
        assert_eq!(lines[0], "Label: 2");
        assert_eq!(lines[1].chars().count(), 2);
    }
}
