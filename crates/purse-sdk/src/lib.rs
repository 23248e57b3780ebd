//! Client SDK for Purse wallets.
//!
//! Purse turns an externally-owned account into a smart wallet via EIP-7702
//! delegation to a singleton delegate contract, and extends it with
//! pluggable accessory contracts whose individual method selectors are wired
//! into the wallet's dispatch table. This crate provides the client-side
//! bookkeeping for that scheme:
//!
//! - [`MethodRegistry`] - a local read-through cache of the wallet's
//!   dispatch table, kept consistent by folding the `AccessoryUpdated`
//!   event stream
//! - [`Purse`] - the wallet surface: install/remove accessories, query
//!   installation state, resolve capabilities by name, inspect delegation
//! - [`TransactionIssuer`] / [`EventSource`] - the collaborator boundaries,
//!   with an alloy-provider-backed implementation in [`RpcIssuer`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use alloy_provider::ProviderBuilder;
//! use purse_sdk::{Purse, RpcIssuer, builtin_catalog};
//! use purse_types::{Accessory, DeploymentRegistry};
//!
//! let deployments = DeploymentRegistry::bundled();
//! let mut catalog = builtin_catalog();
//! catalog.bind_deployments(&deployments);
//!
//! let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse()?);
//! let source = RpcIssuer::new(provider.clone());
//! let mut purse = Purse::new(RpcIssuer::new(provider), account, vec![], Arc::new(catalog));
//!
//! purse.sync(&source).await?;
//! let installed = purse.has_accessory(&Accessory::new(multicall)).await?;
//! ```

pub mod contract;
pub mod issuer;
pub mod provider;
pub mod registry;
pub mod wallet;

pub use contract::{builtin_catalog, delegate_interface};
pub use issuer::{
    EventSource, IssuerError, PositionedUpdate, TransactionIssuer, TxnOptions, UpdateReceipt,
};
pub use provider::RpcIssuer;
pub use registry::MethodRegistry;
pub use wallet::{Capability, DelegateStatus, Purse, WalletError};
