use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = scrollreader::cli::Cli::parse();
    scrollreader::logging::init(cli.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        scrollreader::cli::Command::Chapters(args) => {
            scrollreader::catalog::run(args).context("chapters")?;
        }
        scrollreader::cli::Command::Render(args) => {
            scrollreader::export::run(args).await.context("render")?;
        }
        scrollreader::cli::Command::Replay(args) => {
            scrollreader::replay::run(args).await.context("replay")?;
        }
    }

    Ok(())
}
