use crate::settings::CompilerSettings;
use ethers_solc::{
    artifacts::{output_selection::OutputSelection, Optimizer, Settings, Sources},
    CompilerInput,
};
use std::collections::BTreeMap;

/// Only the ABI and creation bytecode are requested from the compiler.
const OUTPUTS: [&str; 2] = ["abi", "evm.bytecode"];

pub fn build_input(sources: Sources, settings: &CompilerSettings) -> CompilerInput {
    let output_selection: OutputSelection = BTreeMap::from([(
        "*".to_string(),
        BTreeMap::from([(
            "*".to_string(),
            OUTPUTS.iter().map(|output| output.to_string()).collect(),
        )]),
    )])
    .into();

    CompilerInput {
        language: "Solidity".to_string(),
        sources,
        settings: Settings {
            optimizer: Optimizer {
                enabled: Some(settings.optimizer_enabled),
                runs: Some(settings.optimizer_runs),
                details: None,
            },
            output_selection,
            // let the compiler pick its own default target
            evm_version: None,
            ..Default::default()
        },
    }
}
