use async_trait::async_trait;
use ethers_solc::{error::SolcError, Solc};
use semver::Version;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("svm returned error {0}")]
    Svm(#[from] SolcError),
}

/// Provides a path to a solc binary of the requested version.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, ver: &Version) -> Result<PathBuf, FetchError>;
}

/// Installs compilers into the svm home directory. A version that is
/// already installed is returned without downloading it again.
#[derive(Default)]
pub struct SvmFetcher {}

#[async_trait]
impl Fetcher for SvmFetcher {
    async fn fetch(&self, ver: &Version) -> Result<PathBuf, FetchError> {
        if let Some(solc) = Solc::find_svm_installed_version(ver.to_string())? {
            log::debug!("solc {} already installed at {:?}", ver, solc.solc);
            return Ok(solc.solc);
        }
        log::info!("installing solc version {}", ver);
        Solc::install(ver)
            .await
            .map(|x| x.solc)
            .map_err(|err| FetchError::Svm(err.into()))
    }
}
