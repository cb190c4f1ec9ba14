use super::Error;
use crate::artifact::Artifact;
use ethers_solc::artifacts::Severity;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Subset of the solc standard-json output we ask for, kept lossless:
/// the ABI stays raw json and the bytecode stays hex text.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CompilerOutput {
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, Contract>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub formatted_message: Option<String>,
}

impl Diagnostic {
    pub fn formatted(&self) -> &str {
        self.formatted_message.as_deref().unwrap_or(&self.message)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Contract {
    pub abi: Option<serde_json::Value>,
    pub evm: Option<Evm>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Evm {
    pub bytecode: Option<Bytecode>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Bytecode {
    pub object: String,
}

impl CompilerOutput {
    /// Fails with every error-level diagnostic. Warnings and info
    /// messages are only logged.
    pub fn check_errors(&self) -> Result<(), Error> {
        let mut errors = Vec::new();
        for diagnostic in &self.errors {
            if diagnostic.severity == Severity::Error {
                errors.push(diagnostic.formatted().to_string());
            } else {
                log::warn!("solc: {}", diagnostic.formatted());
            }
        }
        if !errors.is_empty() {
            return Err(Error::Compilation(errors));
        }
        Ok(())
    }

    pub fn extract(&self, file: &str, contract: &str) -> Result<Artifact, Error> {
        let compiled = self
            .contracts
            .get(file)
            .and_then(|contracts| contracts.get(contract))
            .ok_or_else(|| Error::ContractNotFound {
                file: file.to_string(),
                contract: contract.to_string(),
            })?;

        let bytecode = compiled
            .evm
            .as_ref()
            .and_then(|evm| evm.bytecode.as_ref())
            .map(|bytecode| bytecode.object.clone())
            .filter(|object| !object.is_empty())
            .ok_or_else(|| Error::MissingBytecode(contract.to_string()))?;

        Ok(Artifact {
            abi: compiled
                .abi
                .clone()
                .unwrap_or_else(|| serde_json::Value::Array(vec![])),
            bytecode,
        })
    }
}
