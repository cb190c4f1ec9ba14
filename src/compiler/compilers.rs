use super::{fetcher::FetchError, CompilerOutput, Fetcher};
use ethers_solc::{error::SolcError, CompilerInput, Solc};
use semver::Version;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error as DeriveError;

#[derive(Debug, DeriveError)]
pub enum Error {
    #[error("Error while fetching compiler: {0:#}")]
    Fetch(#[from] FetchError),
    #[error("Internal error while compiling: {0}")]
    Internal(#[from] SolcError),
    #[error("Couldn't parse compiler output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Compilation error: {0:?}")]
    Compilation(Vec<String>),
    #[error("contract {contract} not found in {file} compiler output")]
    ContractNotFound { file: String, contract: String },
    #[error("contract {0} has no bytecode")]
    MissingBytecode(String),
}

pub struct Compilers {
    fetcher: Arc<dyn Fetcher>,
}

impl Compilers {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Makes sure the compiler binary is available and returns its path.
    pub async fn ensure(&self, compiler_version: &Version) -> Result<PathBuf, Error> {
        Ok(self.fetcher.fetch(compiler_version).await?)
    }

    /// Runs solc on a standard-json input. `library_base` is used both as the
    /// base path and as the only extra directory the compiler may read from.
    pub async fn compile(
        &self,
        compiler_version: &Version,
        input: &CompilerInput,
        library_base: Option<&Path>,
    ) -> Result<CompilerOutput, Error> {
        let solc_path = self.ensure(compiler_version).await?;
        let mut solc = Solc::from(solc_path);
        if let Some(base) = library_base {
            let base = base.to_string_lossy().to_string();
            solc = solc
                .arg("--base-path")
                .arg(base.clone())
                .arg("--allow-paths")
                .arg(base);
        }

        log::info!(
            "compiling {} source files with solc {}",
            input.sources.len(),
            compiler_version
        );
        let raw = solc.async_compile_output(input).await?;
        let output: CompilerOutput = serde_json::from_slice(&raw)?;

        // Compilations errors, warnings and info messages are returned in `CompilerOutput.errors`
        output.check_errors()?;

        Ok(output)
    }
}
