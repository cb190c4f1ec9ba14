use crate::{
    artifact::ArtifactStore,
    chain,
    cli::{Args, Command},
    compiler::{build_input, Compilers, SvmFetcher},
    consts::{DEFAULT_CONFIG_PATH, PRIVATE_KEY_ENV},
    deployer::{signer_address, ConstructorArgs, Deployer},
    settings::Settings,
    setup,
    sources::SourceResolver,
    verifier::{ExpectedToken, Verifier},
};
use anyhow::{anyhow, Context};
use ethers_core::{types::Address, utils::format_ether};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio_util::sync::CancellationToken;

/// Config file to load. A path given on the command line must exist;
/// the implicit `config.toml` is optional.
pub fn config_file(explicit: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(anyhow!("config file {:?} not found", path)),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            Ok(default.is_file().then(|| default.to_path_buf()))
        }
    }
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let settings = config_file(args.config_path.as_deref())
        .and_then(|path| Settings::load(path.as_deref()))
        .context("invalid configuration")?;

    match args.command {
        Command::Setup => setup(&settings).await,
        Command::Compile => compile(&settings).await,
        Command::Deploy => {
            let private_key = match std::env::var(PRIVATE_KEY_ENV) {
                Ok(key) => key,
                Err(_) => {
                    println!("Error: {PRIVATE_KEY_ENV} environment variable not set");
                    std::process::exit(1);
                }
            };
            deploy(&settings, private_key).await.map(|_| ())
        }
        Command::Verify { address } => verify(&settings, address).await,
        Command::Balance { address } => balance(&settings, address).await,
    }
}

fn compilers() -> Compilers {
    Compilers::new(Arc::new(SvmFetcher::default()))
}

pub async fn setup(settings: &Settings) -> anyhow::Result<()> {
    let report = setup::setup_environment(settings, &compilers()).await?;
    if report.library_installed {
        println!("Installed {}", settings.setup.library_package);
    }
    println!(
        "Solc {} installed successfully at {}",
        settings.compiler.version,
        report.solc.display()
    );
    Ok(())
}

pub async fn compile(settings: &Settings) -> anyhow::Result<()> {
    let resolver = SourceResolver::from_settings(&settings.contract);
    let resolved = resolver.resolve()?;
    if !resolved.is_complete() {
        if !settings.contract.allow_missing_library_files {
            let missing: Vec<_> = resolved
                .missing
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            return Err(anyhow!(
                "missing library files: {}; run `setup` or set contract.allow_missing_library_files",
                missing.join(", ")
            ));
        }
        for path in &resolved.missing {
            log::warn!("skipping missing library file {:?}", path);
        }
    }

    let compilers = compilers();
    let version = &settings.compiler.version;
    compilers.ensure(version).await?;

    let input = build_input(resolved.sources, &settings.compiler);
    let output = compilers
        .compile(version, &input, Some(&settings.contract.library_base))
        .await?;

    let file = resolver.contract_key()?;
    let artifact = output.extract(&file.to_string_lossy(), &settings.contract.name)?;

    let store = ArtifactStore::new(&settings.contract.artifact_path);
    store.save(&artifact)?;
    println!(
        "Contract compiled successfully. Output saved to {}",
        store.path().display()
    );
    Ok(())
}

pub async fn deploy(settings: &Settings, private_key: String) -> anyhow::Result<Address> {
    let artifact = ArtifactStore::new(&settings.contract.artifact_path).load()?;
    let client = chain::connect(&settings.chain.rpc_url);
    let deployer = Deployer::new(&client, &settings.deploy, settings.chain.chain_id);
    let args = ConstructorArgs::from(&settings.token);

    let submitted = {
        let from = signer_address(&private_key)?;
        println!("Deploying from: {:?}", from);
        deployer.submit(&private_key, &artifact, &args).await?
    };
    drop(private_key);
    println!("Deployment transaction sent: {:?}", submitted.tx_hash);

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let confirmed = deployer.confirm(submitted.tx_hash, &cancel).await;
    ctrl_c.abort();

    let (contract_address, _receipt) = confirmed?;
    println!("Contract deployed at: {:?}", contract_address);
    Ok(contract_address)
}

pub async fn verify(settings: &Settings, address: Option<Address>) -> anyhow::Result<()> {
    let artifact = ArtifactStore::new(&settings.contract.artifact_path).load()?;
    let client = chain::connect(&settings.chain.rpc_url);
    let address = address.unwrap_or(settings.verify.contract_address);

    let verifier = Verifier::new(&client, &artifact)?;
    let report = verifier
        .verify(address, &ExpectedToken::from(&settings.token))
        .await?;
    println!("{report}");
    Ok(())
}

pub async fn balance(settings: &Settings, address: Option<Address>) -> anyhow::Result<()> {
    let client = chain::connect(&settings.chain.rpc_url);
    let address = address.unwrap_or(settings.balance.address);

    let report = match chain::check_balance(&client, &settings.chain.rpc_url, address).await {
        Ok(report) => report,
        Err(err @ chain::Error::Connectivity { .. }) => {
            println!("Failed to connect to {}", settings.chain.rpc_url);
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    println!("Connected to chain ID: {}", report.chain_id);
    println!(
        "Balance: {} {}",
        format_ether(report.balance),
        settings.chain.native_symbol
    );
    if report.is_empty() {
        println!(
            "Warning: Account has no {} tokens for deployment",
            settings.chain.native_symbol
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("testnet.toml");
        assert!(config_file(Some(&missing)).is_err());

        std::fs::write(&missing, "[chain]\nchain_id = 1\n").unwrap();
        assert_eq!(config_file(Some(&missing)).unwrap(), Some(missing));
    }

    #[tokio::test]
    async fn missing_explicit_config_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            config_path: Some(dir.path().join("testnet.toml")),
            command: Command::Balance { address: None },
        };

        let err = run(args).await.expect_err("config file is missing");
        let message = format!("{err:#}");
        assert!(message.starts_with("invalid configuration"), "{message}");
        assert!(message.contains("testnet.toml"), "{message}");
    }
}
