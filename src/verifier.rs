use crate::{
    artifact::{self, Artifact},
    chain::Client,
    settings::TokenSettings,
};
use ethers_core::{
    abi::{Abi, Token},
    types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest, U256},
    utils::format_units,
};
use ethers_providers::{Middleware, ProviderError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] artifact::Error),
    #[error("function {0} is not part of the contract abi")]
    MissingFunction(String),
    #[error("call to {function} failed: {source}")]
    Call {
        function: String,
        source: ProviderError,
    },
    #[error("couldn't decode {function} result: {reason}")]
    Decode { function: String, reason: String },
}

/// Values the deployed token is expected to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedToken {
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
}

impl From<&TokenSettings> for ExpectedToken {
    fn from(token: &TokenSettings) -> Self {
        Self {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            total_supply: token.supply_in_base_units(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    /// `None` when the abi has no `owner()` function.
    pub owner: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Symbol,
    TotalSupply,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "Name"),
            Field::Symbol => write!(f, "Symbol"),
            Field::TotalSupply => write!(f, "Total Supply"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    pub field: Field,
    pub expected: String,
    pub actual: String,
}

impl FieldCheck {
    fn new(field: Field, expected: impl ToString, actual: impl ToString) -> Self {
        Self {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub address: Address,
    pub state: TokenState,
    pub checks: Vec<FieldCheck>,
}

impl VerificationReport {
    pub fn all_match(&self) -> bool {
        self.checks.iter().all(FieldCheck::matches)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &FieldCheck> {
        self.checks.iter().filter(|check| !check.matches())
    }
}

pub fn compare(state: &TokenState, expected: &ExpectedToken) -> Vec<FieldCheck> {
    vec![
        FieldCheck::new(Field::Name, &expected.name, &state.name),
        FieldCheck::new(Field::Symbol, &expected.symbol, &state.symbol),
        FieldCheck::new(Field::TotalSupply, expected.total_supply, state.total_supply),
    ]
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = &self.state;
        writeln!(f, "Contract Address: {:?}", self.address)?;
        writeln!(f, "Name: {}", state.name)?;
        writeln!(f, "Symbol: {}", state.symbol)?;
        writeln!(f, "Decimals: {}", state.decimals)?;
        writeln!(
            f,
            "Total Supply: {} {}",
            format_amount(state.total_supply, state.decimals),
            state.symbol
        )?;
        match state.owner {
            Some(owner) => writeln!(f, "Owner Address: {:?}", owner)?,
            None => writeln!(f, "Owner Address: unavailable")?,
        }
        writeln!(f)?;

        if self.all_match() {
            return write!(f, "All values match expected configuration ✓");
        }
        writeln!(f, "Warning: Some values don't match expected values:")?;
        for (i, check) in self.checks.iter().enumerate() {
            let mark = if check.matches() { '✓' } else { '✗' };
            write!(
                f,
                "{}: {} (expected: {}, found: {})",
                check.field, mark, check.expected, check.actual
            )?;
            if i + 1 < self.checks.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub struct Verifier<'a> {
    client: &'a Client,
    abi: Abi,
}

impl<'a> Verifier<'a> {
    pub fn new(client: &'a Client, artifact: &Artifact) -> Result<Self, Error> {
        Ok(Self {
            client,
            abi: artifact.abi()?,
        })
    }

    /// Executes a read-only call of an argument-less function and returns
    /// its single output.
    async fn call(&self, address: Address, name: &str) -> Result<Token, Error> {
        let function = self
            .abi
            .function(name)
            .map_err(|_| Error::MissingFunction(name.to_string()))?;
        let data = function.encode_input(&[]).map_err(|err| Error::Decode {
            function: name.to_string(),
            reason: err.to_string(),
        })?;
        let tx: TypedTransaction = TransactionRequest::new().to(address).data(data).into();

        let raw = self
            .client
            .call(&tx, None)
            .await
            .map_err(|source| Error::Call {
                function: name.to_string(),
                source,
            })?;
        let decode_err = |reason: String| Error::Decode {
            function: name.to_string(),
            reason,
        };
        function
            .decode_output(&raw)
            .map_err(|err| decode_err(err.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| decode_err("empty result".into()))
    }

    async fn call_string(&self, address: Address, name: &str) -> Result<String, Error> {
        self.call(address, name)
            .await?
            .into_string()
            .ok_or_else(|| unexpected(name, "string"))
    }

    async fn call_uint(&self, address: Address, name: &str) -> Result<U256, Error> {
        self.call(address, name)
            .await?
            .into_uint()
            .ok_or_else(|| unexpected(name, "uint"))
    }

    pub async fn read_state(&self, address: Address) -> Result<TokenState, Error> {
        let name = self.call_string(address, "name").await?;
        let symbol = self.call_string(address, "symbol").await?;
        let total_supply = self.call_uint(address, "totalSupply").await?;
        let decimals = self.call_uint(address, "decimals").await?;
        if decimals > U256::from(u8::MAX) {
            return Err(unexpected("decimals", "uint8"));
        }

        let owner = if self.abi.function("owner").is_ok() {
            let owner = self
                .call(address, "owner")
                .await?
                .into_address()
                .ok_or_else(|| unexpected("owner", "address"))?;
            Some(owner)
        } else {
            log::warn!("abi has no owner() function, skipping owner check");
            None
        };

        Ok(TokenState {
            name,
            symbol,
            decimals: decimals.low_u32() as u8,
            total_supply,
            owner,
        })
    }

    /// Reads the token state and compares it with `expected`. Mismatches are
    /// part of the report, not errors.
    pub async fn verify(
        &self,
        address: Address,
        expected: &ExpectedToken,
    ) -> Result<VerificationReport, Error> {
        let state = self.read_state(address).await?;
        let checks = compare(&state, expected);
        let report = VerificationReport {
            address,
            state,
            checks,
        };
        for check in report.mismatches() {
            log::warn!(
                "{} mismatch: expected {}, found {}",
                check.field,
                check.expected,
                check.actual
            );
        }
        Ok(report)
    }
}

/// Human readable token amount: thousands-grouped whole units, with the
/// fractional part only when it is non-zero, e.g. `1,000,000,000` or `1,234.5`.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let formatted = match format_units(amount, u32::from(decimals)) {
        Ok(formatted) => formatted,
        Err(_) => return amount.to_string(),
    };
    let (whole, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    let digits = whole.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction.trim_end_matches('0') {
        "" => grouped,
        fraction => format!("{grouped}.{fraction}"),
    }
}

fn unexpected(function: &str, expected: &str) -> Error {
    Error::Decode {
        function: function.to_string(),
        reason: format!("expected {expected} value"),
    }
}
