use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single constructor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstructorArg {
    Address(Address),
    Uint(U256),
    Bool(bool),
    String(String),
}

impl ConstructorArg {
    fn to_sol_value(&self) -> DynSolValue {
        match self {
            Self::Address(address) => DynSolValue::Address(*address),
            Self::Uint(value) => DynSolValue::Uint(*value, 256),
            Self::Bool(value) => DynSolValue::Bool(*value),
            Self::String(value) => DynSolValue::String(value.clone()),
        }
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<Address> for ConstructorArg {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

/// ABI-encode constructor arguments as a parameter list, the form appended to
/// creation bytecode and submitted to explorers.
pub fn encode_constructor_args(args: &[ConstructorArg]) -> Vec<u8> {
    if args.is_empty() {
        return Vec::new();
    }
    DynSolValue::Tuple(args.iter().map(ConstructorArg::to_sol_value).collect())
        .abi_encode_params()
}

/// The outcome of deploying one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub args: Vec<ConstructorArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl DeploymentRecord {
    pub fn new(
        contract_name: impl Into<String>,
        address: Address,
        args: Vec<ConstructorArg>,
    ) -> Self {
        Self {
            contract_name: contract_name.into(),
            address,
            args,
            transaction_hash: None,
            block_number: None,
        }
    }

    pub fn with_receipt(mut self, transaction_hash: B256, block_number: Option<u64>) -> Self {
        self.transaction_hash = Some(transaction_hash);
        self.block_number = block_number;
        self
    }

    /// Hex encoding of the ABI-encoded args, without `0x`.
    pub fn encoded_args_hex(&self) -> String {
        hex::encode(encode_constructor_args(&self.args))
    }
}
