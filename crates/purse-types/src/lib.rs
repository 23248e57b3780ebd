//! Core types for the Purse wallet SDK.
//!
//! Purse is an account-abstraction scheme built on EIP-7702 account
//! delegation: an externally-owned account delegates its code to a singleton
//! wallet contract, and pluggable "accessory" contracts contribute individual
//! function selectors to the wallet's dispatch table.
//!
//! This crate holds the value types shared across the SDK:
//!
//! - [`AccessoryMethod`] / [`AccessoryUpdate`] - selector-to-accessory
//!   bindings, as they appear in batched updates and emitted events
//! - [`Accessory`] - one pluggable capability contract, identified by address
//! - [`InterfaceCatalog`] - which named capabilities (events, read calls,
//!   write calls) an accessory interface declares
//! - [`DeploymentRegistry`] - the static table of known singleton and
//!   accessory deployments
//! - [`PurseError`] - the structural error taxonomy
//!
//! Everything here is pure data; transaction submission and event delivery
//! live in `purse-sdk`.

pub mod accessory;
pub mod catalog;
pub mod deployments;
pub mod error;

pub use accessory::*;
pub use catalog::*;
pub use deployments::*;
pub use error::*;
