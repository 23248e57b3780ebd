//! Accessory value types.
//!
//! An accessory is a pluggable capability contract whose individual function
//! selectors can be registered into a Purse wallet's dispatch table. The
//! on-chain wallet tracks ownership per selector, not per accessory, so an
//! accessory can be partially installed at any instant. The types here mirror
//! the wire shapes of that scheme:
//!
//! - [`AccessoryMethod`] - one `(selector, accessory)` binding, the unit of a
//!   batched `update_accessories` call
//! - [`AccessoryUpdate`] - one emitted `AccessoryUpdated` event, recording a
//!   selector's ownership change
//! - [`Accessory`] - the accessory contract itself, identified by address,
//!   with its declared selector set resolved lazily

use std::sync::OnceLock;

use alloy_primitives::{Address, Selector};
use serde::{Deserialize, Serialize};

use crate::catalog::InterfaceCatalog;

/// A single method-selector-to-accessory binding.
///
/// This is the unit of wallet configuration: a batched `update_accessories`
/// transaction carries a list of these, and each one either assigns a
/// selector to an accessory or (with [`Address::ZERO`]) clears it.
///
/// A selector is either unassigned or owned by exactly one accessory address
/// at any on-chain instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryMethod {
    /// The 4-byte function selector being (re)assigned.
    pub method: Selector,

    /// The accessory contract that will own the selector.
    /// [`Address::ZERO`] means "unassigned".
    pub accessory: Address,
}

impl AccessoryMethod {
    /// Binds `method` to `accessory`.
    pub fn new(method: Selector, accessory: Address) -> Self {
        Self { method, accessory }
    }

    /// A binding that clears `method` from the dispatch table.
    pub fn unassigned(method: Selector) -> Self {
        Self {
            method,
            accessory: Address::ZERO,
        }
    }

    /// Whether this binding clears the selector rather than assigning it.
    pub fn is_unassigned(&self) -> bool {
        self.accessory == Address::ZERO
    }
}

/// One `AccessoryUpdated` event, as emitted by the wallet delegate whenever a
/// selector's owner changes.
///
/// `old_accessory` and `new_accessory` use [`Address::ZERO`] as the "none"
/// sentinel: a fresh assignment has a zero `old_accessory`, a pure removal
/// has a zero `new_accessory`, and a rebind has both non-zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryUpdate {
    /// The selector whose ownership changed.
    pub method: Selector,

    /// The previous owner, or zero if the selector was unassigned.
    pub old_accessory: Address,

    /// The new owner, or zero if the selector was cleared.
    pub new_accessory: Address,
}

impl AccessoryUpdate {
    pub fn new(method: Selector, old_accessory: Address, new_accessory: Address) -> Self {
        Self {
            method,
            old_accessory,
            new_accessory,
        }
    }

    /// An update assigning a previously unowned selector.
    pub fn assign(method: Selector, new_accessory: Address) -> Self {
        Self::new(method, Address::ZERO, new_accessory)
    }

    /// An update clearing a selector owned by `old_accessory`.
    pub fn clear(method: Selector, old_accessory: Address) -> Self {
        Self::new(method, old_accessory, Address::ZERO)
    }
}

/// A pluggable capability contract.
///
/// Identity is the contract address alone: two `Accessory` values with the
/// same address compare equal regardless of what has been resolved about
/// their interfaces. The declared selector set is looked up lazily against an
/// [`InterfaceCatalog`] on first read and cached afterwards; an address the
/// catalog does not know resolves to an empty declared set.
#[derive(Debug, Clone)]
pub struct Accessory {
    address: Address,
    methods: OnceLock<Vec<Selector>>,
}

impl Accessory {
    /// An accessory known only by address. Its declared methods resolve on
    /// first access to [`Accessory::methods`].
    pub fn new(address: Address) -> Self {
        Self {
            address,
            methods: OnceLock::new(),
        }
    }

    /// An accessory with an explicitly declared selector set, bypassing
    /// catalog resolution.
    pub fn with_methods(address: Address, methods: Vec<Selector>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(methods);
        Self {
            address,
            methods: cell,
        }
    }

    /// The accessory contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The selectors this accessory's interface declares, resolving through
    /// `catalog` on first read and caching the answer.
    pub fn methods(&self, catalog: &InterfaceCatalog) -> &[Selector] {
        self.methods
            .get_or_init(|| catalog.selectors_of(self.address))
    }

    /// The declared selector set, if it has already been resolved.
    pub fn declared(&self) -> Option<&[Selector]> {
        self.methods.get().map(Vec::as_slice)
    }

    /// The full `(selector, address)` binding list for installing this
    /// accessory.
    pub fn bindings(&self, catalog: &InterfaceCatalog) -> Vec<AccessoryMethod> {
        self.methods(catalog)
            .iter()
            .map(|method| AccessoryMethod::new(*method, self.address))
            .collect()
    }
}

impl PartialEq for Accessory {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Accessory {}

impl std::hash::Hash for Accessory {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl From<Address> for Accessory {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}
