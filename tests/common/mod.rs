#![allow(dead_code)]

use ethers_core::{
    abi::{self, Token},
    types::{Address, TxHash},
    utils::id,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};
use token_deployer::Artifact;
use wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate};

pub const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const SIGNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const CHAIN_ID: &str = "0x539";

pub fn artifact() -> Artifact {
    serde_json::from_str(include_str!("../contracts/MyToken.json")).expect("valid test artifact")
}

pub fn tx_hash() -> TxHash {
    TxHash::repeat_byte(0xab)
}

/// Minimal JSON-RPC node: answers by method name, and `eth_call` by the
/// 4-byte selector of the call data.
#[derive(Default)]
pub struct MockNode {
    results: HashMap<String, Value>,
    errors: HashMap<String, Value>,
    calls: HashMap<String, Value>,
    receipt: Option<Value>,
    pending_polls: usize,
    polls: AtomicUsize,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
            .with_result("web3_clientVersion", json!("Geth/v1.13.0-mock"))
            .with_result("eth_chainId", json!(CHAIN_ID))
    }

    pub fn with_result(mut self, method: &str, result: Value) -> Self {
        self.results.insert(method.to_string(), result);
        self
    }

    pub fn with_error(mut self, method: &str, code: i64, message: &str) -> Self {
        self.errors
            .insert(method.to_string(), json!({"code": code, "message": message}));
        self
    }

    pub fn with_call(mut self, signature: &str, output: &[Token]) -> Self {
        let selector = format!("0x{}", hex::encode(id(signature)));
        let output = format!("0x{}", hex::encode(abi::encode(output)));
        self.calls.insert(selector, json!(output));
        self
    }

    /// Receipt is returned once `pending_polls` receipt requests were
    /// answered with `null`.
    pub fn with_receipt(mut self, receipt: Value, pending_polls: usize) -> Self {
        self.receipt = Some(receipt);
        self.pending_polls = pending_polls;
        self
    }

    pub fn token(self, name: &str, symbol: &str, supply: ethers_core::types::U256) -> Self {
        self.with_call("name()", &[Token::String(name.into())])
            .with_call("symbol()", &[Token::String(symbol.into())])
            .with_call("decimals()", &[Token::Uint(18.into())])
            .with_call("totalSupply()", &[Token::Uint(supply)])
            .with_call(
                "owner()",
                &[Token::Address(SIGNER.parse::<Address>().unwrap())],
            )
    }

    pub async fn start(self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(self)
            .mount(&server)
            .await;
        server
    }

    fn answer(&self, method: &str, params: &Value) -> Result<Value, Value> {
        if let Some(error) = self.errors.get(method) {
            return Err(error.clone());
        }
        match method {
            "eth_call" => {
                let data = params[0]
                    .get("data")
                    .or_else(|| params[0].get("input"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let selector = data.get(..10).unwrap_or_default();
                self.calls
                    .get(selector)
                    .cloned()
                    .ok_or_else(|| json!({"code": -32000, "message": "execution reverted"}))
            }
            "eth_getTransactionReceipt" => {
                let polls = self.polls.fetch_add(1, Ordering::SeqCst);
                match &self.receipt {
                    Some(receipt) if polls >= self.pending_polls => Ok(receipt.clone()),
                    _ => Ok(Value::Null),
                }
            }
            _ => self
                .results
                .get(method)
                .cloned()
                .ok_or_else(|| json!({"code": -32601, "message": "method not found"})),
        }
    }
}

impl Respond for MockNode {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).expect("json-rpc request");
        let method = body["method"].as_str().unwrap_or_default();
        let response = match self.answer(method, &body["params"]) {
            Ok(result) => json!({"jsonrpc": "2.0", "id": body["id"], "result": result}),
            Err(error) => json!({"jsonrpc": "2.0", "id": body["id"], "error": error}),
        };
        ResponseTemplate::new(200).set_body_json(response)
    }
}

pub fn receipt(contract_address: Address, status: u64) -> Value {
    json!({
        "transactionHash": tx_hash(),
        "transactionIndex": "0x0",
        "blockHash": TxHash::repeat_byte(0x01),
        "blockNumber": "0x10",
        "from": SIGNER.to_lowercase(),
        "to": null,
        "cumulativeGasUsed": "0x1e8480",
        "gasUsed": "0x1e8480",
        "contractAddress": contract_address,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "status": format!("{status:#x}"),
        "type": "0x0",
        "effectiveGasPrice": "0x3b9aca00"
    })
}

/// Parameters of every request the node received for `method`.
pub async fn requests_for(server: &MockServer, method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
        .filter(|body| body["method"] == method)
        .map(|body| body["params"].clone())
        .collect()
}
