use anyhow::Result;
use bert_heads::cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bert_heads=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
