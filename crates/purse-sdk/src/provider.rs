//! Alloy-backed implementation of the collaborator traits.
//!
//! [`RpcIssuer`] wraps any [`Provider`] (typically built with recommended
//! fillers and a wallet layer) and speaks to the wallet delegate through the
//! generated bindings. Delegation activation additionally needs the
//! account's own key to sign the EIP-7702 authorization; configure it with
//! [`RpcIssuer::with_authority`].

use alloy_consensus::TxReceipt as _;
use alloy_eips::eip7702::{Authorization, SignedAuthorization};
use alloy_network::{TransactionBuilder, TransactionBuilder7702};
use alloy_primitives::{Address, Bytes, Selector, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, TransactionReceipt, TransactionRequest};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;

use purse_types::{AccessoryMethod, AccessoryUpdate};

use crate::contract::PurseDelegate;
use crate::issuer::{
    EventSource, IssuerError, PositionedUpdate, TransactionIssuer, TxnOptions, UpdateReceipt,
};

/// [`TransactionIssuer`] and [`EventSource`] over an alloy provider.
#[derive(Debug, Clone)]
pub struct RpcIssuer<P> {
    provider: P,
    authority: Option<PrivateKeySigner>,
}

impl<P> RpcIssuer<P>
where
    P: Provider,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            authority: None,
        }
    }

    /// Configures the key that signs EIP-7702 authorizations. Must be the
    /// key of the account being delegated.
    pub fn with_authority(mut self, authority: PrivateKeySigner) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn signed_authorization(
        &self,
        account: Address,
        delegate: Address,
    ) -> Result<SignedAuthorization, IssuerError> {
        let authority = self.authority.as_ref().ok_or(IssuerError::NoAuthority)?;
        let chain_id = self.provider.get_chain_id().await?;
        let nonce = self.provider.get_transaction_count(account).await?;
        // Self-sponsored delegation: the delegating account submits the
        // transaction itself, so the authorization nonce runs one ahead of
        // the outer transaction's nonce.
        let nonce = if authority.address() == account {
            nonce + 1
        } else {
            nonce
        };
        let authorization = Authorization {
            chain_id: U256::from(chain_id),
            address: delegate,
            nonce,
        };
        let signature = authority.sign_hash_sync(&authorization.signature_hash())?;
        Ok(authorization.into_signed(signature))
    }
}

/// Decodes the wallet's `AccessoryUpdated` events out of a receipt,
/// rejecting reverted transactions.
fn decode_receipt(
    wallet: Address,
    receipt: TransactionReceipt,
) -> Result<UpdateReceipt, IssuerError> {
    if !receipt.inner.status() {
        return Err(IssuerError::Reverted(receipt.transaction_hash));
    }
    let updates = receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == wallet)
        .filter_map(|log| log.log_decode::<PurseDelegate::AccessoryUpdated>().ok())
        .map(|decoded| AccessoryUpdate::from(&decoded.inner.data))
        .collect();
    Ok(UpdateReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number.unwrap_or_default(),
        updates,
    })
}

#[async_trait]
impl<P> TransactionIssuer for RpcIssuer<P>
where
    P: Provider + Send + Sync,
{
    async fn update_accessories(
        &self,
        wallet: Address,
        updates: &[AccessoryMethod],
        opts: &TxnOptions,
    ) -> Result<UpdateReceipt, IssuerError> {
        let contract = PurseDelegate::new(wallet, &self.provider);
        let updates: Vec<PurseDelegate::MethodUpdate> =
            updates.iter().copied().map(Into::into).collect();

        let mut call = contract.update_accessories(updates);
        if let Some(sender) = opts.sender {
            call = call.from(sender);
        }

        let receipt = call.send().await?.get_receipt().await?;
        tracing::info!(
            wallet = %wallet,
            tx = %receipt.transaction_hash,
            "submitted accessory update"
        );
        decode_receipt(wallet, receipt)
    }

    async fn accessory_by_method_id(
        &self,
        wallet: Address,
        method: Selector,
    ) -> Result<Address, IssuerError> {
        let contract = PurseDelegate::new(wallet, &self.provider);
        Ok(contract.accessoryByMethodId(method).call().await?)
    }

    async fn set_delegate(
        &self,
        account: Address,
        singleton: Address,
        init: &[AccessoryMethod],
    ) -> Result<UpdateReceipt, IssuerError> {
        let authorization = self.signed_authorization(account, singleton).await?;
        let init: Vec<PurseDelegate::MethodUpdate> =
            init.iter().copied().map(Into::into).collect();
        let calldata = PurseDelegate::update_accessoriesCall { updates: init }.abi_encode();

        let tx = TransactionRequest::default()
            .with_to(account)
            .with_input(calldata)
            .with_authorization_list(vec![authorization]);
        let receipt = self.provider.send_transaction(tx).await?.get_receipt().await?;
        tracing::info!(
            account = %account,
            singleton = %singleton,
            tx = %receipt.transaction_hash,
            "activated account delegation"
        );
        decode_receipt(account, receipt)
    }

    async fn remove_delegate(&self, account: Address) -> Result<TxHash, IssuerError> {
        // EIP-7702 clears delegation by authorizing the zero address.
        let authorization = self
            .signed_authorization(account, Address::ZERO)
            .await?;
        let tx = TransactionRequest::default()
            .with_to(account)
            .with_authorization_list(vec![authorization]);
        let receipt = self.provider.send_transaction(tx).await?.get_receipt().await?;
        if !receipt.inner.status() {
            return Err(IssuerError::Reverted(receipt.transaction_hash));
        }
        tracing::info!(account = %account, tx = %receipt.transaction_hash, "removed account delegation");
        Ok(receipt.transaction_hash)
    }

    async fn code_at(&self, account: Address) -> Result<Bytes, IssuerError> {
        Ok(self.provider.get_code_at(account).await?)
    }
}

#[async_trait]
impl<P> EventSource for RpcIssuer<P>
where
    P: Provider + Send + Sync,
{
    async fn accessory_updates(
        &self,
        wallet: Address,
        from_block: u64,
    ) -> Result<Vec<PositionedUpdate>, IssuerError> {
        let filter = Filter::new()
            .address(wallet)
            .event_signature(PurseDelegate::AccessoryUpdated::SIGNATURE_HASH)
            .from_block(from_block);
        let logs = self.provider.get_logs(&filter).await?;

        let mut updates = Vec::with_capacity(logs.len());
        for log in logs {
            let Ok(decoded) = log.log_decode::<PurseDelegate::AccessoryUpdated>() else {
                continue;
            };
            updates.push(PositionedUpdate {
                position: log.block_number.unwrap_or_default(),
                update: AccessoryUpdate::from(&decoded.inner.data),
            });
        }
        Ok(updates)
    }
}
