//! reconstruir CLI
//!
//! # Usage
//!
//! ```bash
//! # Train on a Fashion-MNIST CSV export
//! reconstruir train --train-csv data/fashion-mnist_train.csv \
//!     --val-csv data/fashion-mnist_test.csv --epochs 5
//!
//! # Train on MNIST (archives are downloaded into --data-root)
//! reconstruir train --dataset mnist --epochs 5
//!
//! # Render one sample
//! reconstruir show --dataset mnist --index 12
//! ```

use clap::Parser;
use reconstruir::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
