//! Command-line interface
//!
//! Two commands:
//! - `train` — fit an autoencoder on MNIST or a Fashion-MNIST CSV export
//! - `show` — render one dataset sample to the terminal

use crate::data::{
    BatchSource, DataLoader, Dataset, DatasetKind, FashionMnistDataset, ImageDataset,
    MnistDataset,
};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::nn::AutoEncoder;
use crate::optim::Adam;
use crate::train::{MSELoss, TrainConfig, Trainer};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const IMAGE_DIM: usize = 28 * 28;

/// Training harness for autoencoder-style reconstruction models.
#[derive(Parser)]
#[command(name = "reconstruir", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train an autoencoder on an image dataset
    Train(TrainArgs),
    /// Render one dataset sample to the terminal
    Show(ShowArgs),
}

/// Dataset selection shared by commands.
#[derive(Args)]
pub struct DataArgs {
    /// Dataset to load: mnist or fashion-mnist
    #[arg(long, default_value = "fashion-mnist")]
    pub dataset: DatasetKind,

    /// Directory holding (or receiving) the MNIST archive files
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    /// Training CSV file (fashion-mnist only)
    #[arg(long)]
    pub train_csv: Option<PathBuf>,

    /// Validation CSV file (fashion-mnist only)
    #[arg(long)]
    pub val_csv: Option<PathBuf>,
}

#[derive(Args)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Number of training epochs
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Samples per batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f32,

    /// Hidden layer width
    #[arg(long, default_value_t = 128)]
    pub hidden_dim: usize,

    /// Latent code width
    #[arg(long, default_value_t = 32)]
    pub latent_dim: usize,

    /// Seed for parameter init and shuffling; omit for OS entropy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Compute device
    #[arg(long, default_value = "cpu")]
    pub device: Device,

    /// Directory under which per-run directories are created
    #[arg(long, default_value = "runs")]
    pub runs_root: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Index of the sample to render
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

/// Dispatch a parsed command line.
pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Train(args) => run_train(args),
        Command::Show(args) => run_show(args),
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let (train_source, val_source) = build_sources(&args.data, args.batch_size, args.seed)?;

    let model = match args.seed {
        Some(seed) => AutoEncoder::seeded(IMAGE_DIM, args.hidden_dim, args.latent_dim, seed),
        None => AutoEncoder::new(IMAGE_DIM, args.hidden_dim, args.latent_dim),
    }
    // MNIST pixels are in [0,1]; Fashion-MNIST is centered to [-1,1]
    .with_sigmoid_output(args.data.dataset == DatasetKind::Mnist);

    let config = TrainConfig::new(args.epochs)
        .with_device(args.device)
        .with_runs_root(args.runs_root);

    let mut trainer = Trainer::new(
        model,
        train_source,
        val_source,
        Box::new(MSELoss),
        Box::new(Adam::default_params(args.lr)),
        config,
    )?;

    println!("Run directory: {}", trainer.run_dir().display());
    trainer.fit()
}

fn build_sources(
    data: &DataArgs,
    batch_size: usize,
    seed: Option<u64>,
) -> Result<(Box<dyn BatchSource>, Box<dyn BatchSource>)> {
    match data.dataset {
        DatasetKind::Mnist => {
            let train = DataLoader::new(MnistDataset::train(&data.data_root), batch_size, true);
            let val = DataLoader::new(MnistDataset::test(&data.data_root), batch_size, false);
            Ok((boxed(train, seed), boxed(val, seed)))
        }
        DatasetKind::FashionMnist => {
            let train_csv = data.train_csv.as_ref().ok_or_else(|| Error::MissingArgument {
                message: "--train-csv is required for fashion-mnist".to_string(),
            })?;
            let val_csv = data.val_csv.as_ref().ok_or_else(|| Error::MissingArgument {
                message: "--val-csv is required for fashion-mnist".to_string(),
            })?;

            let train =
                DataLoader::new(FashionMnistDataset::from_csv(train_csv)?, batch_size, true);
            let val = DataLoader::new(FashionMnistDataset::from_csv(val_csv)?, batch_size, false);
            Ok((boxed(train, seed), boxed(val, seed)))
        }
    }
}

fn boxed<D: Dataset + 'static>(loader: DataLoader<D>, seed: Option<u64>) -> Box<dyn BatchSource> {
    match seed {
        Some(seed) => Box::new(loader.with_seed(seed)),
        None => Box::new(loader),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    match args.data.dataset {
        DatasetKind::Mnist => {
            let ds = MnistDataset::train(&args.data.data_root);
            show_indexed(&ds, args.index)
        }
        DatasetKind::FashionMnist => {
            let csv = args.data.train_csv.as_ref().ok_or_else(|| Error::MissingArgument {
                message: "--train-csv is required for fashion-mnist".to_string(),
            })?;
            let ds = FashionMnistDataset::from_csv(csv)?;
            show_indexed(&ds, args.index)
        }
    }
}

fn show_indexed<D: ImageDataset>(dataset: &D, index: usize) -> Result<()> {
    if index >= dataset.len() {
        return Err(Error::Dataset {
            message: format!(
                "sample index {index} out of range for dataset of {} samples",
                dataset.len()
            ),
        });
    }
    dataset.show(index);
    Ok(())
}
