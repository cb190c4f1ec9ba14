use crate::{
    compiler::{self, Compilers},
    settings::Settings,
};
use std::{
    fmt,
    path::{Path, PathBuf},
    process::ExitStatus,
};
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{dependency} not found at {path:?}")]
    MissingDependency {
        dependency: Dependency,
        path: PathBuf,
    },
    #[error("couldn't run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },
    #[error(transparent)]
    Compiler(#[from] compiler::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    ContractSource,
    Library,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::ContractSource => write!(f, "contract source"),
            Dependency::Library => write!(f, "library"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub solc: PathBuf,
    /// Whether the library had to be installed during this run.
    pub library_installed: bool,
}

/// Checks the inputs the pipeline reads from disk. Returns the list of
/// dependencies that are missing, in the order they are checked.
pub fn missing_dependencies(settings: &Settings) -> Vec<(Dependency, PathBuf)> {
    let mut missing = Vec::new();
    let contract = &settings.contract.source;
    if !contract.is_file() {
        missing.push((Dependency::ContractSource, contract.clone()));
    }
    let library = settings.contract.library_root();
    if !library.is_dir() {
        missing.push((Dependency::Library, library));
    }
    missing
}

async fn run(dir: &Path, program: &str, args: &[&str]) -> Result<(), Error> {
    let command = format!("{} {}", program, args.join(" "));
    log::info!("running `{}` in {:?}", command, dir);
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .await
        .map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;
    if !status.success() {
        return Err(Error::CommandFailed { command, status });
    }
    Ok(())
}

/// Installs the library package with npm into `contracts_dir`.
pub async fn install_library(contracts_dir: &Path, package: &str) -> Result<(), Error> {
    std::fs::create_dir_all(contracts_dir).map_err(|source| Error::Spawn {
        command: format!("mkdir {contracts_dir:?}"),
        source,
    })?;
    if !contracts_dir.join("package.json").exists() {
        run(contracts_dir, "npm", &["init", "-y"]).await?;
    }
    run(contracts_dir, "npm", &["install", package]).await
}

/// Makes sure every dependency of the pipeline is present and the pinned
/// compiler is installed. Safe to call repeatedly: present dependencies and
/// an installed compiler are left alone.
pub async fn setup_environment(
    settings: &Settings,
    compilers: &Compilers,
) -> Result<EnvironmentReport, Error> {
    let mut library_installed = false;
    for (dependency, path) in missing_dependencies(settings) {
        if dependency == Dependency::Library && settings.setup.install_library {
            install_library(
                settings.contract.contracts_dir(),
                &settings.setup.library_package,
            )
            .await?;
            if !path.is_dir() {
                return Err(Error::MissingDependency { dependency, path });
            }
            library_installed = true;
            continue;
        }
        return Err(Error::MissingDependency { dependency, path });
    }
    log::info!("dependencies found");

    let solc = compilers.ensure(&settings.compiler.version).await?;
    Ok(EnvironmentReport {
        solc,
        library_installed,
    })
}
