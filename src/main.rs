use clap::Parser;
use token_deployer::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    token_deployer::run(args).await
}
