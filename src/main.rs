use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use data_parser::cli::Cli;
use data_parser::pipeline;

fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_filter());

    let job = cli.into_job()?;
    pipeline::run(&job).await?;
    Ok(())
}
