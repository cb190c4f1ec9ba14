use ethers_core::{abi::Abi, types::Bytes};
use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("artifact file {0:?} not found")]
    NotFound(PathBuf),
    #[error("couldn't access artifact file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("artifact file {path:?} is malformed: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifact abi is not a valid ABI: {0}")]
    InvalidAbi(String),
    #[error("artifact bytecode is not valid hex: {0}")]
    InvalidBytecode(#[from] hex::FromHexError),
}

/// ABI and creation bytecode of a single compiled contract.
///
/// The ABI is kept as raw JSON so it is persisted exactly as the compiler
/// produced it. Bytecode is hex text, without `0x` when it comes from solc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub abi: serde_json::Value,
    pub bytecode: String,
}

impl Artifact {
    pub fn abi(&self) -> Result<Abi, Error> {
        if !self.abi.is_array() {
            return Err(Error::InvalidAbi("expected a json array".into()));
        }
        serde_json::from_value(self.abi.clone()).map_err(|err| Error::InvalidAbi(err.to_string()))
    }

    pub fn bytecode_bytes(&self) -> Result<Bytes, Error> {
        let code = self.bytecode.trim();
        let code = code
            .strip_prefix("0x")
            .or_else(|| code.strip_prefix("0X"))
            .unwrap_or(code);
        Ok(hex::decode(code)?.into())
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, artifact: &Artifact) -> Result<(), Error> {
        let io_err = |source| Error::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let content = serde_json::to_string_pretty(artifact).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(io_err)?;
        log::info!("artifact saved to {:?}", self.path);
        Ok(())
    }

    pub fn load(&self) -> Result<Artifact, Error> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::NotFound(self.path.clone())
            } else {
                Error::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let artifact: Artifact = serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        if !artifact.abi.is_array() {
            return Err(Error::InvalidAbi("expected a json array".into()));
        }
        Ok(artifact)
    }
}
