use crate::settings::ContractSettings;
use ethers_solc::artifacts::{Source, Sources};
use std::{
    collections::BTreeSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("couldn't read contract source {path:?}: {source}")]
    Contract {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("couldn't read library file {path:?}: {source}")]
    Library {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("contract source path {0:?} has no file name")]
    InvalidContractPath(PathBuf),
}

/// Sources to pass to the compiler together with the library files
/// that were requested but not found on disk.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSources {
    pub sources: Sources,
    pub missing: Vec<PathBuf>,
}

impl ResolvedSources {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SourceResolver {
    contract: PathBuf,
    library_root: PathBuf,
    library_prefix: String,
    library_files: Vec<String>,
}

impl SourceResolver {
    pub fn new(
        contract: impl Into<PathBuf>,
        library_root: impl Into<PathBuf>,
        library_prefix: impl Into<String>,
        library_files: Vec<String>,
    ) -> Self {
        Self {
            contract: contract.into(),
            library_root: library_root.into(),
            library_prefix: library_prefix.into(),
            library_files,
        }
    }

    pub fn from_settings(settings: &ContractSettings) -> Self {
        Self::new(
            &settings.source,
            settings.library_root(),
            &settings.library_prefix,
            settings.library_files.clone(),
        )
    }

    /// Key the main contract is registered under: its bare file name.
    pub fn contract_key(&self) -> Result<PathBuf, Error> {
        self.contract
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| Error::InvalidContractPath(self.contract.clone()))
    }

    fn import_key(&self, file: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}/{}",
            self.library_prefix.trim_end_matches('/'),
            file.trim_start_matches('/')
        ))
    }

    pub fn resolve(&self) -> Result<ResolvedSources, Error> {
        let mut resolved = ResolvedSources::default();

        let content = std::fs::read_to_string(&self.contract).map_err(|source| Error::Contract {
            path: self.contract.clone(),
            source,
        })?;
        resolved
            .sources
            .insert(self.contract_key()?, Source::new(content));

        let mut seen = BTreeSet::new();
        for file in &self.library_files {
            if !seen.insert(file.as_str()) {
                continue;
            }
            let path = self.library_root.join(file);
            match read_optional(&path)? {
                Some(content) => {
                    resolved
                        .sources
                        .insert(self.import_key(file), Source::new(content));
                }
                None => {
                    log::debug!("library file {:?} not found", path);
                    resolved.missing.push(path);
                }
            }
        }

        Ok(resolved)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, Error> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Library {
            path: path.to_path_buf(),
            source,
        }),
    }
}
