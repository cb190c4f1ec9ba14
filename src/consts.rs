pub const DEFAULT_RPC_URL: &str = "http://43.135.26.222:8000";
pub const DEFAULT_NATIVE_SYMBOL: &str = "TURA";

pub const DEFAULT_SOLC_VERSION: &str = "0.8.20";
pub const DEFAULT_OPTIMIZER_RUNS: usize = 200;

pub const DEFAULT_CONTRACT_SOURCE: &str = "contracts/MyToken.sol";
pub const DEFAULT_CONTRACT_NAME: &str = "MyToken";
pub const DEFAULT_ARTIFACT_PATH: &str = "contracts/MyToken.json";
pub const DEFAULT_LIBRARY_BASE: &str = "contracts/node_modules";
pub const DEFAULT_LIBRARY_PREFIX: &str = "@openzeppelin/contracts";
pub const DEFAULT_LIBRARY_PACKAGE: &str = "@openzeppelin/contracts@4.9.6";

/// OpenZeppelin files `MyToken.sol` pulls in, relative to the library root.
/// `utils/Context.sol` is needed by both `ERC20` and `Ownable`.
pub const DEFAULT_LIBRARY_FILES: &[&str] = &[
    "token/ERC20/ERC20.sol",
    "token/ERC20/IERC20.sol",
    "token/ERC20/extensions/IERC20Metadata.sol",
    "utils/Context.sol",
    "access/Ownable.sol",
    "utils/Context.sol",
];

pub const DEFAULT_TOKEN_NAME: &str = "TestWF";
pub const DEFAULT_TOKEN_SYMBOL: &str = "WF";
pub const DEFAULT_INITIAL_SUPPLY: u64 = 1_000_000_000;
pub const DEFAULT_DECIMALS: u8 = 18;

pub const DEFAULT_GAS_LIMIT: u64 = 3_000_000;
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

pub const DEFAULT_VERIFY_ADDRESS: &str = "0x6E15782705b6f4B746f885E4B281e2834CE21FFd";
pub const DEFAULT_BALANCE_ADDRESS: &str = "0xF3e140953B9cFcFAc98dcd5Fe0A65f6D1F06Fe2b";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const PRIVATE_KEY_ENV: &str = "TURA_PRIVATE_KEY";
pub const CONFIG_ENV_PREFIX: &str = "TOKEN_DEPLOYER";
