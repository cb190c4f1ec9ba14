use crate::consts::*;
use anyhow::anyhow;
use config::{Config, File};
use ethers_core::types::{Address, U256};
use serde::{de::IgnoredAny, Deserialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub chain: ChainSettings,
    pub compiler: CompilerSettings,
    pub contract: ContractSettings,
    pub token: TokenSettings,
    pub deploy: DeploySettings,
    pub verify: VerifySettings,
    pub balance: BalanceSettings,
    pub setup: SetupSettings,

    pub config: IgnoredAny,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainSettings {
    pub rpc_url: Url,
    /// Chain id used for signing. Queried from the node when not set.
    pub chain_id: Option<u64>,
    pub native_symbol: String,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            rpc_url: Url::try_from(DEFAULT_RPC_URL).expect("valid url"),
            chain_id: None,
            native_symbol: DEFAULT_NATIVE_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSettings {
    #[serde(with = "serde_with::rust::display_fromstr")]
    pub version: semver::Version,
    pub optimizer_enabled: bool,
    pub optimizer_runs: usize,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            version: semver::Version::from_str(DEFAULT_SOLC_VERSION).expect("valid version"),
            optimizer_enabled: true,
            optimizer_runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractSettings {
    pub source: PathBuf,
    pub name: String,
    /// Directory the package manager installs into (`node_modules`).
    /// Passed to the compiler as base and allowed path.
    pub library_base: PathBuf,
    pub library_prefix: String,
    pub library_files: Vec<String>,
    pub allow_missing_library_files: bool,
    pub artifact_path: PathBuf,
}

impl ContractSettings {
    /// Directory holding the library sources, e.g. `node_modules/@openzeppelin/contracts`.
    pub fn library_root(&self) -> PathBuf {
        self.library_base.join(&self.library_prefix)
    }

    /// Directory the package manager is run from.
    pub fn contracts_dir(&self) -> &Path {
        self.library_base
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_CONTRACT_SOURCE),
            name: DEFAULT_CONTRACT_NAME.to_string(),
            library_base: PathBuf::from(DEFAULT_LIBRARY_BASE),
            library_prefix: DEFAULT_LIBRARY_PREFIX.to_string(),
            library_files: DEFAULT_LIBRARY_FILES
                .iter()
                .map(|file| file.to_string())
                .collect(),
            allow_missing_library_files: false,
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenSettings {
    pub name: String,
    pub symbol: String,
    /// Supply in whole tokens; scaled by `10^decimals` on deployment.
    pub initial_supply: u64,
    pub decimals: u8,
}

impl TokenSettings {
    /// Initial supply in the token's smallest unit, computed without floating point.
    pub fn supply_in_base_units(&self) -> U256 {
        U256::from(self.initial_supply) * U256::exp10(self.decimals as usize)
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploySettings {
    pub gas_limit: u64,
    /// Seconds to wait for the deployment receipt before giving up.
    pub confirmation_timeout: u64,
    pub poll_interval_ms: u64,
}

impl DeploySettings {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifySettings {
    pub contract_address: Address,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            contract_address: Address::from_str(DEFAULT_VERIFY_ADDRESS).expect("valid address"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BalanceSettings {
    pub address: Address,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            address: Address::from_str(DEFAULT_BALANCE_ADDRESS).expect("valid address"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupSettings {
    /// Run the package manager when the library directory is missing.
    pub install_library: bool,
    pub library_package: String,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            install_library: true,
            library_package: DEFAULT_LIBRARY_PACKAGE.to_string(),
        }
    }
}

impl Settings {
    /// Reads the config file named by `TOKEN_DEPLOYER__CONFIG`, if any,
    /// then applies `TOKEN_DEPLOYER__*` environment overrides.
    pub fn new() -> anyhow::Result<Self> {
        let config_path = std::env::var(format!("{CONFIG_ENV_PREFIX}__CONFIG"))
            .ok()
            .map(PathBuf::from);
        Self::load(config_path.as_deref())
    }

    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(config_path) = config_path {
            builder = builder.add_source(File::from(config_path));
        };
        builder = builder
            .add_source(config::Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"));

        builder
            .build()?
            .try_deserialize()
            .map_err(|err| anyhow!(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn supply_is_exact_fixed_point() {
        let token = TokenSettings::default();
        let expected = U256::from_dec_str("1000000000000000000000000000").unwrap();
        assert_eq!(token.supply_in_base_units(), expected);
        assert_eq!(
            token.supply_in_base_units(),
            U256::from(1_000_000_000u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn library_paths() {
        let contract = ContractSettings::default();
        assert_eq!(
            contract.library_root(),
            PathBuf::from("contracts/node_modules/@openzeppelin/contracts")
        );
        assert_eq!(contract.contracts_dir(), Path::new("contracts"));

        let contract = ContractSettings {
            library_base: PathBuf::from("node_modules"),
            ..Default::default()
        };
        assert_eq!(contract.contracts_dir(), Path::new("."));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
            [chain]
            rpc_url = "http://localhost:8545"
            chain_id = 1337

            [token]
            name = "Other"
            symbol = "OTH"

            [deploy]
            confirmation_timeout = 5
            "#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).expect("Failed to parse config");
        assert_eq!(settings.chain.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(settings.chain.chain_id, Some(1337));
        assert_eq!(settings.token.name, "Other");
        assert_eq!(settings.token.initial_supply, DEFAULT_INITIAL_SUPPLY);
        assert_eq!(
            settings.deploy.confirmation_timeout(),
            Duration::from_secs(5)
        );
        assert_eq!(settings.compiler, CompilerSettings::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[token]\nsuply = 10\n").unwrap();

        Settings::load(Some(&path)).expect_err("unknown field should fail");
    }
}
