// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands: `demo` and `init`.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::{demo_use_case::DemoConfig, init_use_case::InitConfig};
use crate::domain::HeadKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every head on the fixed demo input and print output shapes
    Demo(DemoArgs),

    /// Write a config and randomly initialised encoder weights
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Encoder description (bert_config.json)
    #[arg(long, default_value = "configs/bert_tiny.json")]
    pub config: PathBuf,

    /// Encoder weights, without the .mpk.gz extension.
    /// Omit to run on random weights.
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Classes for the classification and labeling heads
    #[arg(long, default_value_t = 5)]
    pub num_classes: usize,

    /// Only run one head: classification, labeling or qa
    #[arg(long)]
    pub task: Option<HeadKind>,
}

impl From<DemoArgs> for DemoConfig {
    fn from(a: DemoArgs) -> Self {
        Self {
            config_path:     a.config,
            checkpoint_path: a.checkpoint,
            num_classes:     a.num_classes,
            heads:           a.task.map_or_else(|| HeadKind::ALL.to_vec(), |k| vec![k]),
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write bert_config.json and bert_model.mpk.gz into
    #[arg(long, default_value = "checkpoints")]
    pub out_dir: PathBuf,

    /// Config to copy; defaults to a tiny two-layer encoder
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl From<InitArgs> for InitConfig {
    fn from(a: InitArgs) -> Self {
        Self {
            config_path: a.config,
            out_dir:     a.out_dir,
        }
    }
}
