//! Structural errors raised by the SDK itself.
//!
//! Failures coming back from collaborators (RPC transport, reverted
//! transactions) are not reinterpreted here; `purse-sdk` propagates them
//! transparently. This taxonomy covers only calls that are invalid before
//! any network interaction happens, plus capability lookup misses.

use alloy_primitives::Address;

#[derive(Debug, thiserror::Error)]
pub enum PurseError {
    /// A mutating operation was called with an empty batch.
    #[error("Must provide at least one {0}")]
    EmptyBatch(&'static str),

    /// `initialize` was called without a singleton deployment.
    #[error("Needs a singleton deployment to initialize against")]
    MissingSingleton,

    /// Dynamic dispatch found no tracked accessory exposing the name.
    #[error("Method {0} not a registered accessory method or event")]
    CapabilityNotFound(String),

    /// A named accessory could not be resolved against the deployment
    /// registry for the given singleton version.
    #[error("No deployment of accessory '{reference}' known for singleton {singleton}")]
    UnknownAccessory {
        reference: String,
        singleton: Address,
    },
}
