//! Interface catalog: which named capabilities an accessory declares.
//!
//! The wallet delegate executes accessory logic in its own storage context,
//! so a caller interacts with an accessory's methods *through the wallet
//! address*. To dispatch by name the SDK needs to know, per accessory
//! interface, which names exist and what kind of interaction each one is.
//! That knowledge is kept here as plain data, resolved at registration time
//! rather than by reflection at call time.
//!
//! A catalog maps interface names (e.g. `"Multicall"`) to
//! [`AccessoryInterface`] descriptions, and deployment addresses to interface
//! names. Accessory method sets and capability lookups both read through it.

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::{Address, B256, Selector};
use serde::{Deserialize, Serialize};

/// The kind of interaction a named capability represents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityKind {
    /// An emitted log, identified by its topic hash.
    Event,
    /// A read-only contract call.
    ReadCall,
    /// A state-mutating contract call.
    WriteCall,
}

/// One named item of an accessory interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceItem {
    /// An event the accessory emits (through the wallet address).
    Event { name: String, topic: B256 },
    /// A read-only call the accessory answers.
    ReadCall { name: String, selector: Selector },
    /// A state-mutating call the accessory answers.
    WriteCall { name: String, selector: Selector },
}

impl InterfaceItem {
    pub fn name(&self) -> &str {
        match self {
            InterfaceItem::Event { name, .. } => name,
            InterfaceItem::ReadCall { name, .. } => name,
            InterfaceItem::WriteCall { name, .. } => name,
        }
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            InterfaceItem::Event { .. } => CapabilityKind::Event,
            InterfaceItem::ReadCall { .. } => CapabilityKind::ReadCall,
            InterfaceItem::WriteCall { .. } => CapabilityKind::WriteCall,
        }
    }

    /// The dispatch selector, for call items. Events dispatch by topic, not
    /// selector.
    pub fn selector(&self) -> Option<Selector> {
        match self {
            InterfaceItem::Event { .. } => None,
            InterfaceItem::ReadCall { selector, .. } => Some(*selector),
            InterfaceItem::WriteCall { selector, .. } => Some(*selector),
        }
    }

    /// The log topic hash, for event items.
    pub fn topic(&self) -> Option<B256> {
        match self {
            InterfaceItem::Event { topic, .. } => Some(*topic),
            _ => None,
        }
    }
}

/// The declared interface of one accessory contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessoryInterface {
    items: Vec<InterfaceItem>,
}

impl AccessoryInterface {
    pub fn new(items: Vec<InterfaceItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InterfaceItem] {
        &self.items
    }

    /// Looks up an item by name.
    pub fn item(&self, name: &str) -> Option<&InterfaceItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// The selectors this interface wants to own in a wallet's dispatch
    /// table. Events carry no selector and are excluded.
    pub fn selectors(&self) -> Vec<Selector> {
        self.items.iter().filter_map(InterfaceItem::selector).collect()
    }
}

/// Registry of known accessory interfaces and which deployed address serves
/// which interface.
///
/// Interfaces are registered by name; addresses are bound to names
/// separately, so several deployments (versions) of one accessory can share
/// a single interface description.
#[derive(Debug, Clone, Default)]
pub struct InterfaceCatalog {
    interfaces: BTreeMap<String, AccessoryInterface>,
    bindings: HashMap<Address, String>,
}

impl InterfaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an interface description under `name`.
    pub fn register<N: Into<String>>(&mut self, name: N, interface: AccessoryInterface) {
        self.interfaces.insert(name.into(), interface);
    }

    /// Binds a deployed accessory address to a registered interface name.
    pub fn bind<N: Into<String>>(&mut self, address: Address, name: N) {
        self.bindings.insert(address, name.into());
    }

    /// The interface registered under `name`, if any.
    pub fn interface(&self, name: &str) -> Option<&AccessoryInterface> {
        self.interfaces.get(name)
    }

    /// The interface served by a deployed address, if the address is bound.
    pub fn interface_of(&self, address: Address) -> Option<&AccessoryInterface> {
        self.bindings
            .get(&address)
            .and_then(|name| self.interfaces.get(name))
    }

    /// The interface name a deployed address is bound to, if any.
    pub fn name_of(&self, address: Address) -> Option<&str> {
        self.bindings.get(&address).map(String::as_str)
    }

    /// The selectors declared by the interface at `address`, or empty when
    /// the address is unbound.
    pub fn selectors_of(&self, address: Address) -> Vec<Selector> {
        self.interface_of(address)
            .map(AccessoryInterface::selectors)
            .unwrap_or_default()
    }

    /// Registered interface names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    /// Binds every accessory deployment a [`DeploymentRegistry`] knows about
    /// to its interface name. Addresses whose name has no registered
    /// interface are skipped.
    pub fn bind_deployments(&mut self, deployments: &crate::DeploymentRegistry) {
        for singleton in deployments.singletons() {
            let Some(table) = deployments.accessories_for(singleton.address) else {
                continue;
            };
            for (name, addresses) in table {
                if !self.interfaces.contains_key(name) {
                    continue;
                }
                for address in addresses {
                    self.bindings.insert(*address, name.clone());
                }
            }
        }
    }
}
