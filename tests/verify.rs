mod common;

use common::{artifact, MockNode, SIGNER};
use ethers_core::types::{Address, U256};
use pretty_assertions::assert_eq;
use token_deployer::{
    chain,
    settings::TokenSettings,
    verifier::{self, ExpectedToken, Field, Verifier},
    Artifact,
};
use url::Url;

fn expected() -> ExpectedToken {
    ExpectedToken::from(&TokenSettings::default())
}

fn full_supply() -> U256 {
    U256::from(1_000_000_000u64) * U256::exp10(18)
}

fn token_address() -> Address {
    "0x6E15782705b6f4B746f885E4B281e2834CE21FFd".parse().unwrap()
}

#[tokio::test]
async fn all_fields_match() {
    let server = MockNode::new()
        .token("TestWF", "WF", full_supply())
        .start()
        .await;
    let client = chain::connect(&Url::parse(&server.uri()).unwrap());
    let verifier = Verifier::new(&client, &artifact()).unwrap();

    let report = verifier
        .verify(token_address(), &expected())
        .await
        .expect("verification failed");

    assert!(report.all_match());
    assert_eq!(report.address, token_address());
    assert_eq!(report.state.decimals, 18);
    assert_eq!(report.state.total_supply, full_supply());
    assert_eq!(report.state.owner, Some(SIGNER.parse().unwrap()));
    assert!(report
        .to_string()
        .contains("All values match expected configuration ✓"));
}

#[tokio::test]
async fn mismatches_are_reported_per_field() {
    let server = MockNode::new()
        .token("TestWF", "WRONG", U256::from(42))
        .start()
        .await;
    let client = chain::connect(&Url::parse(&server.uri()).unwrap());
    let verifier = Verifier::new(&client, &artifact()).unwrap();

    let report = verifier
        .verify(token_address(), &expected())
        .await
        .expect("mismatch is not an error");

    assert!(!report.all_match());
    let checks: Vec<_> = report
        .checks
        .iter()
        .map(|check| (check.field, check.matches()))
        .collect();
    assert_eq!(
        checks,
        vec![
            (Field::Name, true),
            (Field::Symbol, false),
            (Field::TotalSupply, false)
        ]
    );
    let rendered = report.to_string();
    assert!(rendered.contains("Warning: Some values don't match expected values:"));
    assert!(rendered.contains("Symbol: ✗ (expected: WF, found: WRONG)"));
}

#[tokio::test]
async fn repeated_runs_produce_identical_reports() {
    let server = MockNode::new()
        .token("TestWF", "WF", U256::from(7))
        .start()
        .await;
    let client = chain::connect(&Url::parse(&server.uri()).unwrap());
    let verifier = Verifier::new(&client, &artifact()).unwrap();

    let first = verifier.verify(token_address(), &expected()).await.unwrap();
    let second = verifier.verify(token_address(), &expected()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn abi_without_owner_skips_owner_call() {
    let mut artifact = artifact();
    artifact
        .abi
        .as_array_mut()
        .unwrap()
        .retain(|item| item["name"] != "owner");
    let server = MockNode::new()
        .token("TestWF", "WF", full_supply())
        .start()
        .await;
    let client = chain::connect(&Url::parse(&server.uri()).unwrap());

    let report = Verifier::new(&client, &artifact)
        .unwrap()
        .verify(token_address(), &expected())
        .await
        .unwrap();
    assert_eq!(report.state.owner, None);
    assert!(report.all_match());
}

#[tokio::test]
async fn abi_without_name_is_error() {
    let artifact = Artifact {
        abi: serde_json::json!([]),
        bytecode: String::new(),
    };
    let server = MockNode::new().start().await;
    let client = chain::connect(&Url::parse(&server.uri()).unwrap());

    let err = Verifier::new(&client, &artifact)
        .unwrap()
        .read_state(token_address())
        .await
        .unwrap_err();
    assert!(matches!(err, verifier::Error::MissingFunction(name) if name == "name"));
}

#[tokio::test]
async fn reverted_call_is_error() {
    // no contract code at the address: every call reverts
    let server = MockNode::new().start().await;
    let client = chain::connect(&Url::parse(&server.uri()).unwrap());

    let err = Verifier::new(&client, &artifact())
        .unwrap()
        .read_state(token_address())
        .await
        .unwrap_err();
    assert!(matches!(err, verifier::Error::Call { .. }), "{err:?}");
}
