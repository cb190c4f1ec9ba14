use clap::{Parser, Subcommand};
use ethers_core::types::Address;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Config file; `config.toml` is used when present and the flag is omitted
    #[clap(short, long)]
    pub config_path: Option<std::path::PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check pipeline dependencies and install the pinned compiler
    Setup,
    /// Compile the token contract and write its artifact
    Compile,
    /// Deploy the compiled token; the key is read from TURA_PRIVATE_KEY
    Deploy,
    /// Read the deployed token state and compare it with the configuration
    Verify {
        #[clap(long)]
        address: Option<Address>,
    },
    /// Report chain id and native balance of an account
    Balance {
        #[clap(long)]
        address: Option<Address>,
    },
}
