// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   1. `demo` — build the three heads, run the fixed input,
//               print output shapes
//   2. `init` — write a checkpoint directory for `demo`

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DemoArgs, InitArgs};

use crate::application::CliBackend;

#[derive(Parser, Debug)]
#[command(
    name = "bert-heads",
    version,
    about = "Classification, labeling and span-extraction heads on a BERT encoder."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Demo(args) => run_demo(args),
            Commands::Init(args) => run_init(args),
        }
    }
}

fn run_demo(args: DemoArgs) -> Result<()> {
    use crate::application::demo_use_case::DemoUseCase;

    let device  = Default::default();
    let reports = DemoUseCase::new(args.into()).execute::<CliBackend>(&device)?;

    for report in reports {
        println!("[{}]\n{}", report.kind.title(), report.shape_line());
    }
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    use crate::application::init_use_case::InitUseCase;

    let device = Default::default();
    let report = InitUseCase::new(args.into()).execute::<CliBackend>(&device)?;

    println!("Config:  {}", report.config_path.display());
    println!("Weights: {}.mpk.gz", report.weights_path.display());
    Ok(())
}
