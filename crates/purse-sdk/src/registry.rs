//! The method-to-accessory registry and its event-folding protocol.
//!
//! A wallet's dispatch table lives on-chain; this registry is the local
//! read-through cache of it, keyed by method selector and kept consistent
//! purely by consuming the wallet's append-only `AccessoryUpdated` stream.
//! Accessories are not installed or removed atomically - each event moves
//! one selector - so accessory-level membership is derived, not stored: an
//! accessory is tracked exactly as long as at least one of its declared
//! selectors still maps to it.
//!
//! Folding is structurally idempotent: re-assigning an existing mapping and
//! re-removing an absent one are both no-ops, so overlapping back-fill and
//! live delivery of the same events converge on the same state. The
//! `last_indexed` watermark records the highest ledger position folded so
//! far and serves as the start point for historical queries; it is not a
//! gate, since several events of one receipt share a block number.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, Selector};

use purse_types::{Accessory, AccessoryUpdate, InterfaceCatalog};

/// Local index of which accessory currently answers which method selector.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    catalog: Arc<InterfaceCatalog>,
    accessories: HashMap<Address, Arc<Accessory>>,
    by_method: HashMap<Selector, Arc<Accessory>>,
    last_indexed: u64,
}

impl MethodRegistry {
    /// An empty registry resolving declared method sets through `catalog`.
    pub fn new(catalog: Arc<InterfaceCatalog>) -> Self {
        Self {
            catalog,
            accessories: HashMap::new(),
            by_method: HashMap::new(),
            last_indexed: 0,
        }
    }

    /// A registry seeded from an explicit accessory list, mapping every
    /// declared selector of every given accessory. This encodes a local
    /// assumption about initial state; reconcile against real events with
    /// [`MethodRegistry::fold`] before trusting it.
    pub fn seeded<I>(catalog: Arc<InterfaceCatalog>, accessories: I) -> Self
    where
        I: IntoIterator<Item = Accessory>,
    {
        let mut registry = Self::new(catalog);
        for accessory in accessories {
            let accessory = Arc::new(accessory);
            for method in accessory.methods(&registry.catalog).to_vec() {
                registry.by_method.insert(method, accessory.clone());
            }
            registry
                .accessories
                .insert(accessory.address(), accessory);
        }
        registry
    }

    /// The catalog this registry resolves declared method sets through.
    pub fn catalog(&self) -> &Arc<InterfaceCatalog> {
        &self.catalog
    }

    /// Applies one `AccessoryUpdated` event observed at ledger position
    /// `position`.
    ///
    /// An assignment (non-zero `new_accessory`) maps the selector to the new
    /// owner, reusing the tracked accessory object for that address or
    /// synthesizing one from the bare address. A removal (zero
    /// `new_accessory`, non-zero `old_accessory`) unmaps the selector and
    /// evicts the old accessory once none of its declared selectors remain
    /// mapped. A rebind takes the assignment path only: the old accessory is
    /// not eviction-checked and stays tracked until one of its selectors is
    /// explicitly cleared.
    pub fn fold(&mut self, update: &AccessoryUpdate, position: u64) {
        if update.new_accessory != Address::ZERO {
            let accessory = self
                .accessories
                .entry(update.new_accessory)
                .or_insert_with(|| Arc::new(Accessory::new(update.new_accessory)))
                .clone();
            tracing::debug!(
                method = %update.method,
                accessory = %update.new_accessory,
                position,
                "accessory method assigned"
            );
            self.by_method.insert(update.method, accessory);
        } else if update.old_accessory != Address::ZERO {
            self.by_method.remove(&update.method);

            if let Some(accessory) = self.accessories.get(&update.old_accessory).cloned() {
                let orphaned = accessory
                    .methods(&self.catalog)
                    .iter()
                    .all(|method| !self.by_method.contains_key(method));
                if orphaned {
                    self.accessories.remove(&update.old_accessory);
                    tracing::debug!(
                        accessory = %update.old_accessory,
                        position,
                        "accessory evicted, no selectors remain"
                    );
                }
            }
        }

        self.last_indexed = self.last_indexed.max(position);
    }

    /// The accessory currently mapped for `method`, if the cache knows one.
    pub fn accessory_for(&self, method: Selector) -> Option<&Arc<Accessory>> {
        self.by_method.get(&method)
    }

    /// The accessories currently believed active, in no particular order.
    pub fn tracked(&self) -> impl Iterator<Item = &Arc<Accessory>> {
        self.accessories.values()
    }

    /// Whether an accessory address is in the tracked set.
    pub fn is_tracked(&self, address: Address) -> bool {
        self.accessories.contains_key(&address)
    }

    /// Whether at least one cached selector currently maps to `address`.
    /// This is the fast path of the read-through `has_accessory` query.
    pub fn owns_any(&self, address: Address) -> bool {
        self.by_method
            .values()
            .any(|accessory| accessory.address() == address)
    }

    /// Number of selectors currently mapped.
    pub fn method_count(&self) -> usize {
        self.by_method.len()
    }

    /// Highest ledger position folded so far.
    pub fn last_indexed(&self) -> u64 {
        self.last_indexed
    }
}
