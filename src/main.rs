use anyhow::Result;
use clap::Parser;
use imobchat::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    imobchat::run(args).await
}
