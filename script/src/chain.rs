use crate::artifacts::ArtifactStore;
use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use indicatif::{ProgressBar, ProgressStyle};
use ntnft_lib::{
    encode_constructor_args, ConstructorArg, ContractDeployer, DeployError, DeploymentRecord,
};
use std::time::Duration;
use tracing::{debug, info};

/// Creation code: bytecode followed by the ABI-encoded constructor args.
pub fn creation_code(bytecode: &Bytes, args: &[ConstructorArg]) -> Bytes {
    let mut code = bytecode.to_vec();
    code.extend_from_slice(&encode_constructor_args(args));
    code.into()
}

/// Deploys compiled artifacts through an alloy provider.
///
/// The provider is expected to carry a wallet for `from`; the deployer never
/// signs anything itself.
pub struct AlloyDeployer<P> {
    provider: P,
    artifacts: ArtifactStore,
}

impl<P: Provider> AlloyDeployer<P> {
    pub fn new(provider: P, artifacts: ArtifactStore) -> Self {
        Self {
            provider,
            artifacts,
        }
    }
}

fn confirmation_spinner(contract_name: &str, confirmations: u64) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!(
        "Waiting for {confirmations} confirmation(s) of {contract_name}..."
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

impl<P: Provider> ContractDeployer for AlloyDeployer<P> {
    async fn deploy(
        &self,
        contract_name: &str,
        from: Address,
        args: &[ConstructorArg],
        confirmations: u64,
    ) -> Result<DeploymentRecord, DeployError> {
        let artifact = self.artifacts.load(contract_name)?;
        let code = creation_code(&artifact.bytecode, args);
        debug!("{contract_name} creation code is {} bytes", code.len());

        let tx = TransactionRequest::default()
            .from(from)
            .with_deploy_code(code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::network(contract_name, e))?;
        info!("Pending transaction... {}", pending_tx.tx_hash());

        let pb = confirmation_spinner(contract_name, confirmations);
        let receipt = pending_tx
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await;
        pb.finish_and_clear();
        let receipt = receipt.map_err(|e| DeployError::network(contract_name, e))?;

        if !receipt.status() {
            return Err(DeployError::network(
                contract_name,
                format!("creation reverted in {}", receipt.transaction_hash),
            ));
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::network(contract_name, "receipt has no contract address"))?;

        Ok(
            DeploymentRecord::new(contract_name, address, args.to_vec())
                .with_receipt(receipt.transaction_hash, receipt.block_number),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_code_without_args_is_bytecode() {
        let bytecode = Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]);
        assert_eq!(creation_code(&bytecode, &[]), bytecode);
    }

    #[test]
    fn test_creation_code_appends_verifier_address() {
        let bytecode = Bytes::from_static(&[0x60, 0x80]);
        let verifier = Address::repeat_byte(0x5f);
        let code = creation_code(&bytecode, &[ConstructorArg::Address(verifier)]);

        assert_eq!(code.len(), 2 + 32);
        assert_eq!(&code[..2], bytecode.as_ref());
        assert_eq!(&code[14..], verifier.as_slice());
    }
}
