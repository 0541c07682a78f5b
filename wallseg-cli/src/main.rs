//! Command-line tools for the wall segmentation U-Net.
//!
//! ## Usage
//!
//! ```bash
//! # Show the stage plan for a 161x161 input
//! cargo run --bin wallseg -- info --height 161 --width 161
//!
//! # Verify a configuration end to end
//! cargo run --bin wallseg -- --config model.json check --batch 3 --height 160 --width 160
//!
//! # Inspect the ADE20K wall scenes
//! cargo run --release --bin wallseg -- dataset --root data --split validation
//! ```

mod backend;
mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use wallseg::dataset::Split;

#[derive(Parser)]
#[command(name = "wallseg")]
#[command(about = "U-Net semantic segmentation of walls in indoor scenes")]
struct Cli {
    /// Model configuration file (JSON). Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show backend, configuration and the per-stage plan
    Info {
        /// Input height to plan for
        #[arg(long, default_value_t = 160)]
        height: usize,

        /// Input width to plan for
        #[arg(long, default_value_t = 160)]
        width: usize,
    },

    /// Run one forward pass on random input and verify the output shape
    Check {
        /// Batch size
        #[arg(long, default_value_t = 1)]
        batch: usize,

        /// Input height
        #[arg(long, default_value_t = 160)]
        height: usize,

        /// Input width
        #[arg(long, default_value_t = 160)]
        width: usize,
    },

    /// Collect ADE20K wall scenes and batch the first samples
    Dataset {
        /// Directory containing ADEChallengeData2016/
        #[arg(long, default_value = "data")]
        root: PathBuf,

        /// Dataset split
        #[arg(long, value_enum, default_value_t = SplitArg::Training)]
        split: SplitArg,

        /// Number of samples to batch
        #[arg(long, default_value_t = 4)]
        samples: usize,

        /// Side length samples are resized to
        #[arg(long, default_value_t = 160)]
        size: u32,
    },

    /// Write the default model configuration
    InitConfig {
        /// Output path
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SplitArg {
    Training,
    Validation,
}

impl From<SplitArg> for Split {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Training => Self::Training,
            SplitArg::Validation => Self::Validation,
        }
    }
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { height, width } => {
            let config = commands::load_model_config(cli.config.as_deref())?;
            commands::info(&config, height, width)
        }
        Commands::Check {
            batch,
            height,
            width,
        } => {
            let config = commands::load_model_config(cli.config.as_deref())?;
            commands::check(&config, batch, height, width)
        }
        Commands::Dataset {
            root,
            split,
            samples,
            size,
        } => commands::dataset(root, split.into(), samples, size),
        Commands::InitConfig { path } => commands::init_config(&path),
    }
}
