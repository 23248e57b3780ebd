//! Collaborator boundaries: transaction issuance and event delivery.
//!
//! The registry itself never talks to a chain. Everything that does is
//! behind two traits: [`TransactionIssuer`] executes state-changing calls
//! and authoritative reads, [`EventSource`] supplies historical
//! `AccessoryUpdated` events. The alloy-backed implementation of both lives
//! in [`crate::provider`]; tests substitute in-memory fakes.
//!
//! Errors from these collaborators are propagated untouched - the SDK does
//! not retry, reinterpret, or suppress them.

use alloy_contract::Error as ContractError;
use alloy_primitives::{Address, Bytes, Selector, TxHash};
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;
use async_trait::async_trait;

use purse_types::{AccessoryMethod, AccessoryUpdate};

/// Failure surfaced by a transaction or read issued to the chain.
#[derive(Debug, thiserror::Error)]
pub enum IssuerError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),
    #[error("No signing authority configured for account delegation")]
    NoAuthority,
    #[error("Issuer failure: {0}")]
    Custom(String),
}

/// Per-call transaction options. Absent fields fall back to the issuer's
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct TxnOptions {
    /// Sender override for the outer transaction.
    pub sender: Option<Address>,
}

/// Receipt of a transaction that touched the wallet's dispatch table,
/// carrying the `AccessoryUpdated` events it caused so the caller can fold
/// them back into its registry.
#[derive(Debug, Clone)]
pub struct UpdateReceipt {
    pub transaction_hash: TxHash,
    /// Block the transaction landed in; the ledger position of every event
    /// in `updates`.
    pub block_number: u64,
    /// Emitted ownership changes, in log order.
    pub updates: Vec<AccessoryUpdate>,
}

/// One historical event tagged with its ledger position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PositionedUpdate {
    pub position: u64,
    pub update: AccessoryUpdate,
}

/// Executes state-changing calls against a Purse wallet and authoritative
/// reads of its live dispatch table.
#[async_trait]
pub trait TransactionIssuer: Send + Sync {
    /// Submits one batched `update_accessories` call and returns its receipt
    /// with the emitted events decoded.
    async fn update_accessories(
        &self,
        wallet: Address,
        updates: &[AccessoryMethod],
        opts: &TxnOptions,
    ) -> Result<UpdateReceipt, IssuerError>;

    /// Authoritative read of the live dispatch table: which accessory
    /// currently answers `method` on `wallet`. Zero means unassigned.
    async fn accessory_by_method_id(
        &self,
        wallet: Address,
        method: Selector,
    ) -> Result<Address, IssuerError>;

    /// Activates account delegation for `account` to the `singleton` wallet
    /// delegate, with an initialization payload installing `init`.
    async fn set_delegate(
        &self,
        account: Address,
        singleton: Address,
        init: &[AccessoryMethod],
    ) -> Result<UpdateReceipt, IssuerError>;

    /// Clears `account`'s delegation.
    async fn remove_delegate(&self, account: Address) -> Result<TxHash, IssuerError>;

    /// The runtime code at `account`, for delegation inspection.
    async fn code_at(&self, account: Address) -> Result<Bytes, IssuerError>;
}

/// Supplies the wallet's historical `AccessoryUpdated` stream in ledger
/// order. Live subscriptions bypass this trait and feed single events
/// through `Purse::apply_update` directly.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Every `AccessoryUpdated` emitted by `wallet` at or after `from_block`,
    /// in non-decreasing position order.
    async fn accessory_updates(
        &self,
        wallet: Address,
        from_block: u64,
    ) -> Result<Vec<PositionedUpdate>, IssuerError>;
}
