//! The Purse wallet object.
//!
//! A [`Purse`] pairs an account address with a [`MethodRegistry`] and a
//! [`TransactionIssuer`]. Reads consult the registry first and fall back to
//! authoritative on-chain state; every mutating operation folds the events
//! from its own receipt back into the registry before returning, so the
//! cache tracks what the wallet itself has done without waiting for a
//! subscription to catch up.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, Selector, TxHash, keccak256};

use purse_types::{
    Accessory, AccessoryMethod, AccessoryUpdate, DeploymentRegistry, InterfaceCatalog,
    InterfaceItem, PurseError, SingletonDeployment,
};

use crate::contract::delegate_interface;
use crate::issuer::{EventSource, IssuerError, TransactionIssuer, TxnOptions, UpdateReceipt};
use crate::registry::MethodRegistry;

/// Failure of a wallet operation: either a structurally invalid call, or a
/// collaborator error propagated untouched.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(transparent)]
    Purse(#[from] PurseError),
    #[error(transparent)]
    Issuer(#[from] IssuerError),
}

/// A resolved, dispatchable wallet capability.
///
/// Accessory logic executes in the wallet's storage context via delegation,
/// so the execution target is always the wallet address, regardless of which
/// accessory contributed the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    item: InterfaceItem,
    target: Address,
}

impl Capability {
    pub fn name(&self) -> &str {
        self.item.name()
    }

    pub fn kind(&self) -> purse_types::CapabilityKind {
        self.item.kind()
    }

    pub fn selector(&self) -> Option<Selector> {
        self.item.selector()
    }

    pub fn topic(&self) -> Option<alloy_primitives::B256> {
        self.item.topic()
    }

    /// The address to call (or filter logs on): the wallet itself.
    pub fn target(&self) -> Address {
        self.target
    }
}

/// Outcome of inspecting an account's delegation against the deployment
/// registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DelegateStatus {
    /// The account carries no delegation designator.
    NotDelegated,
    /// Delegated, but the delegate's code hash matches no known Purse
    /// version.
    Unknown { delegate: Address },
    /// Delegated to a known but superseded Purse version.
    Outdated { singleton: Address, latest: Address },
    /// Delegated to the latest known Purse version.
    Latest { singleton: Address },
}

impl DelegateStatus {
    /// The matched singleton address, when the delegate is a known version.
    pub fn singleton(&self) -> Option<Address> {
        match self {
            DelegateStatus::Outdated { singleton, .. } => Some(*singleton),
            DelegateStatus::Latest { singleton } => Some(*singleton),
            _ => None,
        }
    }
}

/// Parses an EIP-7702 delegation designator (`0xef0100 || address`) out of
/// account code.
fn delegation_target(code: &[u8]) -> Option<Address> {
    if code.len() == 23 && code.starts_with(&[0xef, 0x01, 0x00]) {
        Some(Address::from_slice(&code[3..]))
    } else {
        None
    }
}

/// A Purse-enabled account.
#[derive(Debug)]
pub struct Purse<I> {
    address: Address,
    issuer: I,
    registry: MethodRegistry,
    capabilities: HashMap<String, Capability>,
    sender: Option<Address>,
}

impl<I> Purse<I>
where
    I: TransactionIssuer,
{
    /// Wraps an account believed to already be Purse-delegated, seeding the
    /// registry from `accessories`. The seed is a local assumption; run
    /// [`Purse::sync`] to reconcile it against the real event stream.
    pub fn new(
        issuer: I,
        account: Address,
        accessories: Vec<Accessory>,
        catalog: Arc<InterfaceCatalog>,
    ) -> Self {
        let capabilities = delegate_interface()
            .items()
            .iter()
            .map(|item| {
                (
                    item.name().to_string(),
                    Capability {
                        item: item.clone(),
                        target: account,
                    },
                )
            })
            .collect();

        Self {
            address: account,
            issuer,
            registry: MethodRegistry::seeded(catalog, accessories),
            capabilities,
            sender: None,
        }
    }

    /// Sets the default sender for mutating transactions.
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Activates Purse delegation for `account` and returns the wrapped
    /// wallet, pre-seeded with `accessories`.
    ///
    /// The delegation transaction carries an initialization payload binding
    /// every declared method of every given accessory. Fails with
    /// [`PurseError::MissingSingleton`] before any network interaction when
    /// no singleton deployment is supplied.
    pub async fn initialize(
        issuer: I,
        account: Address,
        accessories: Vec<Accessory>,
        singleton: Option<&SingletonDeployment>,
        catalog: Arc<InterfaceCatalog>,
    ) -> Result<Self, WalletError> {
        let singleton = singleton.ok_or(PurseError::MissingSingleton)?;

        let init: Vec<AccessoryMethod> = accessories
            .iter()
            .flat_map(|accessory| accessory.bindings(&catalog))
            .collect();
        let receipt = issuer
            .set_delegate(account, singleton.address, &init)
            .await?;
        tracing::info!(
            account = %account,
            singleton = %singleton.address,
            tx = %receipt.transaction_hash,
            "purse initialized"
        );

        Ok(Self::new(issuer, account, accessories, catalog))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    fn txn_options(&self) -> TxnOptions {
        TxnOptions {
            sender: self.sender,
        }
    }

    fn fold_receipt(&mut self, receipt: &UpdateReceipt) {
        for update in &receipt.updates {
            self.registry.fold(update, receipt.block_number);
        }
    }

    /// Removes the account's delegation entirely.
    pub async fn disable(&self) -> Result<TxHash, WalletError> {
        Ok(self.issuer.remove_delegate(self.address).await?)
    }

    /// Whether the wallet currently has `accessory` installed.
    ///
    /// Fast path: at least one cached selector maps to it. Fallback on a
    /// silent cache: one authoritative read per declared selector, true if
    /// any of them resolves to the accessory. Does not update the cache.
    pub async fn has_accessory(&self, accessory: &Accessory) -> Result<bool, WalletError> {
        if self.registry.owns_any(accessory.address()) {
            return Ok(true);
        }

        for method in accessory.methods(self.registry.catalog()) {
            let owner = self
                .issuer
                .accessory_by_method_id(self.address, *method)
                .await?;
            if owner == accessory.address() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// [`Purse::has_accessory`] for a bare address.
    pub async fn has_accessory_at(&self, address: Address) -> Result<bool, WalletError> {
        self.has_accessory(&Accessory::new(address)).await
    }

    /// Whether every declared selector of `accessory` currently resolves to
    /// it on-chain. Used to detect partially installed accessories.
    pub async fn has_all_methods(&self, accessory: &Accessory) -> Result<bool, WalletError> {
        for method in accessory.methods(self.registry.catalog()) {
            let owner = self
                .issuer
                .accessory_by_method_id(self.address, *method)
                .await?;
            if owner != accessory.address() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Installs the given accessories in one batched transaction, binding
    /// every declared method of every accessory, and folds the emitted
    /// events before returning the receipt.
    pub async fn add_accessories(
        &mut self,
        accessories: &[Accessory],
    ) -> Result<UpdateReceipt, WalletError> {
        if accessories.is_empty() {
            return Err(PurseError::EmptyBatch("accessory").into());
        }

        let updates: Vec<AccessoryMethod> = accessories
            .iter()
            .flat_map(|accessory| accessory.bindings(self.registry.catalog()))
            .collect();
        let opts = self.txn_options();
        let receipt = self
            .issuer
            .update_accessories(self.address, &updates, &opts)
            .await?;
        self.fold_receipt(&receipt);
        Ok(receipt)
    }

    /// Clears the given selectors from the dispatch table in one batched
    /// transaction and folds the emitted events.
    pub async fn remove_methods(
        &mut self,
        methods: &[Selector],
    ) -> Result<UpdateReceipt, WalletError> {
        if methods.is_empty() {
            return Err(PurseError::EmptyBatch("accessory method").into());
        }

        let updates: Vec<AccessoryMethod> = methods
            .iter()
            .map(|method| AccessoryMethod::unassigned(*method))
            .collect();
        let opts = self.txn_options();
        let receipt = self
            .issuer
            .update_accessories(self.address, &updates, &opts)
            .await?;
        self.fold_receipt(&receipt);
        Ok(receipt)
    }

    /// Removes the given accessories by clearing the union of their declared
    /// selectors.
    pub async fn remove_accessories(
        &mut self,
        accessories: &[Accessory],
    ) -> Result<UpdateReceipt, WalletError> {
        let methods: Vec<Selector> = accessories
            .iter()
            .flat_map(|accessory| {
                accessory
                    .methods(self.registry.catalog())
                    .iter()
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect();
        self.remove_methods(&methods).await
    }

    /// Feeds one live event into the registry. Callers must deliver events
    /// in non-decreasing position order, one at a time.
    pub fn apply_update(&mut self, update: &AccessoryUpdate, position: u64) {
        self.registry.fold(update, position);
    }

    /// Back-fills the registry from historical events, starting at the
    /// current watermark. Returns how many events were folded.
    pub async fn sync<S>(&mut self, source: &S) -> Result<usize, WalletError>
    where
        S: EventSource,
    {
        let updates = source
            .accessory_updates(self.address, self.registry.last_indexed())
            .await?;
        for positioned in &updates {
            self.registry.fold(&positioned.update, positioned.position);
        }
        tracing::debug!(
            wallet = %self.address,
            count = updates.len(),
            last_indexed = self.registry.last_indexed(),
            "registry synchronized"
        );
        Ok(updates.len())
    }

    /// Resolves an operation name to a dispatchable capability.
    ///
    /// The wallet's own delegate interface wins; otherwise the tracked
    /// accessories' interfaces are searched and the first hit is merged into
    /// the wallet's effective interface (memoized), rebound to execute at
    /// the wallet's own address.
    pub fn capability(&mut self, name: &str) -> Result<&Capability, PurseError> {
        if !self.capabilities.contains_key(name) {
            let catalog = self.registry.catalog();
            let item = self
                .registry
                .tracked()
                .find_map(|accessory| {
                    catalog
                        .interface_of(accessory.address())
                        .and_then(|interface| interface.item(name))
                })
                .cloned()
                .ok_or_else(|| PurseError::CapabilityNotFound(name.to_string()))?;

            tracing::debug!(wallet = %self.address, capability = name, "capability resolved");
            self.capabilities.insert(
                name.to_string(),
                Capability {
                    item,
                    target: self.address,
                },
            );
        }

        Ok(&self.capabilities[name])
    }

    /// Inspects the account's delegation: reads its code, follows the
    /// EIP-7702 designator, and matches the delegate's code hash against the
    /// deployment registry.
    pub async fn delegate_status(
        &self,
        deployments: &DeploymentRegistry,
    ) -> Result<DelegateStatus, WalletError> {
        let code = self.issuer.code_at(self.address).await?;
        let Some(delegate) = delegation_target(&code) else {
            return Ok(DelegateStatus::NotDelegated);
        };

        let delegate_code: Bytes = self.issuer.code_at(delegate).await?;
        let code_hash = keccak256(&delegate_code);
        match deployments.singleton_by_code_hash(code_hash) {
            None => Ok(DelegateStatus::Unknown { delegate }),
            Some(deployment) => {
                let latest = deployments
                    .latest_singleton()
                    .map(|latest| latest.address)
                    .unwrap_or(deployment.address);
                if deployment.address == latest {
                    Ok(DelegateStatus::Latest {
                        singleton: deployment.address,
                    })
                } else {
                    Ok(DelegateStatus::Outdated {
                        singleton: deployment.address,
                        latest,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::PositionedUpdate;
    use async_trait::async_trait;
    use purse_types::{AccessoryInterface, CapabilityKind};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    fn selector(byte: u8) -> Selector {
        Selector::from([byte, 0, 0, 0])
    }

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    const WALLET: Address = Address::repeat_byte(0x77);

    /// In-memory stand-in for the chain: keeps the live dispatch table,
    /// answers reads from it, and turns update batches into receipts the
    /// way the wallet contract would.
    #[derive(Default)]
    #[derive(Debug)]
    struct MockIssuer {
        live: Mutex<HashMap<Selector, Address>>,
        codes: Mutex<HashMap<Address, Bytes>>,
        next_block: AtomicU64,
        update_calls: AtomicUsize,
        delegate_calls: AtomicUsize,
        read_calls: AtomicUsize,
    }

    impl MockIssuer {
        fn seed_live(&self, method: Selector, accessory: Address) {
            self.live.lock().unwrap().insert(method, accessory);
        }

        fn seed_code(&self, address: Address, code: Bytes) {
            self.codes.lock().unwrap().insert(address, code);
        }

        fn apply_batch(&self, updates: &[AccessoryMethod]) -> UpdateReceipt {
            let mut live = self.live.lock().unwrap();
            let mut emitted = Vec::with_capacity(updates.len());
            for update in updates {
                let old = live.get(&update.method).copied().unwrap_or(Address::ZERO);
                if update.is_unassigned() {
                    live.remove(&update.method);
                } else {
                    live.insert(update.method, update.accessory);
                }
                emitted.push(AccessoryUpdate::new(update.method, old, update.accessory));
            }
            UpdateReceipt {
                transaction_hash: TxHash::ZERO,
                block_number: self.next_block.fetch_add(1, Ordering::SeqCst) + 1,
                updates: emitted,
            }
        }
    }

    #[async_trait]
    impl TransactionIssuer for MockIssuer {
        async fn update_accessories(
            &self,
            _wallet: Address,
            updates: &[AccessoryMethod],
            _opts: &TxnOptions,
        ) -> Result<UpdateReceipt, IssuerError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.apply_batch(updates))
        }

        async fn accessory_by_method_id(
            &self,
            _wallet: Address,
            method: Selector,
        ) -> Result<Address, IssuerError> {
            self.read_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .live
                .lock()
                .unwrap()
                .get(&method)
                .copied()
                .unwrap_or(Address::ZERO))
        }

        async fn set_delegate(
            &self,
            _account: Address,
            _singleton: Address,
            init: &[AccessoryMethod],
        ) -> Result<UpdateReceipt, IssuerError> {
            self.delegate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.apply_batch(init))
        }

        async fn remove_delegate(&self, _account: Address) -> Result<TxHash, IssuerError> {
            Ok(TxHash::ZERO)
        }

        async fn code_at(&self, account: Address) -> Result<Bytes, IssuerError> {
            Ok(self
                .codes
                .lock()
                .unwrap()
                .get(&account)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Canned historical event stream.
    #[derive(Default)]
    struct MockSource {
        history: Vec<PositionedUpdate>,
    }

    #[async_trait]
    impl EventSource for MockSource {
        async fn accessory_updates(
            &self,
            _wallet: Address,
            from_block: u64,
        ) -> Result<Vec<PositionedUpdate>, IssuerError> {
            Ok(self
                .history
                .iter()
                .filter(|positioned| positioned.position >= from_block)
                .copied()
                .collect())
        }
    }

    fn interface(selectors: &[Selector]) -> AccessoryInterface {
        AccessoryInterface::new(
            selectors
                .iter()
                .enumerate()
                .map(|(index, sel)| InterfaceItem::WriteCall {
                    name: format!("op{index}"),
                    selector: *sel,
                })
                .collect(),
        )
    }

    /// Accessory A = {0x01, 0x02, 0x03} at 0xaa..; B = {0x04} at 0xbb..
    fn catalog() -> Arc<InterfaceCatalog> {
        let mut catalog = InterfaceCatalog::new();
        catalog.register(
            "A",
            interface(&[selector(0x01), selector(0x02), selector(0x03)]),
        );
        catalog.register("B", interface(&[selector(0x04)]));
        catalog.bind(addr(0xaa), "A");
        catalog.bind(addr(0xbb), "B");
        Arc::new(catalog)
    }

    fn empty_purse(issuer: MockIssuer) -> Purse<MockIssuer> {
        Purse::new(issuer, WALLET, Vec::new(), catalog())
    }

    #[tokio::test]
    async fn test_empty_batches_rejected_before_any_issuer_call() {
        let mut purse = empty_purse(MockIssuer::default());

        let err = purse.add_accessories(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            WalletError::Purse(PurseError::EmptyBatch("accessory"))
        ));

        let err = purse.remove_methods(&[]).await.unwrap_err();
        assert!(matches!(err, WalletError::Purse(PurseError::EmptyBatch(_))));

        assert_eq!(purse.issuer().update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_initialize_requires_singleton() {
        let issuer = MockIssuer::default();
        let err = Purse::initialize(issuer, WALLET, vec![], None, catalog())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::Purse(PurseError::MissingSingleton)
        ));
    }

    #[tokio::test]
    async fn test_initialize_seeds_registry_and_delegates() {
        let singleton = SingletonDeployment {
            code_hash: keccak256(b"purse-v2"),
            address: addr(0x51),
        };
        let purse = Purse::initialize(
            MockIssuer::default(),
            WALLET,
            vec![Accessory::new(addr(0xaa))],
            Some(&singleton),
            catalog(),
        )
        .await
        .unwrap();

        assert_eq!(purse.issuer().delegate_calls.load(Ordering::SeqCst), 1);
        assert!(purse.registry().is_tracked(addr(0xaa)));
        assert_eq!(purse.registry().method_count(), 3);
    }

    #[tokio::test]
    async fn test_add_accessories_folds_emitted_events() {
        let mut purse = empty_purse(MockIssuer::default());

        let receipt = purse
            .add_accessories(&[Accessory::new(addr(0xaa))])
            .await
            .unwrap();

        assert_eq!(receipt.updates.len(), 3);
        assert!(purse.registry().is_tracked(addr(0xaa)));
        assert_eq!(purse.registry().method_count(), 3);
        assert_eq!(purse.registry().last_indexed(), receipt.block_number);
    }

    #[tokio::test]
    async fn test_remove_accessories_clears_declared_union() {
        let mut purse = empty_purse(MockIssuer::default());
        purse
            .add_accessories(&[Accessory::new(addr(0xaa)), Accessory::new(addr(0xbb))])
            .await
            .unwrap();
        assert_eq!(purse.registry().method_count(), 4);

        purse
            .remove_accessories(&[Accessory::new(addr(0xaa))])
            .await
            .unwrap();
        assert!(!purse.registry().is_tracked(addr(0xaa)));
        assert!(purse.registry().is_tracked(addr(0xbb)));
        assert_eq!(purse.registry().method_count(), 1);
    }

    #[tokio::test]
    async fn test_has_accessory_fast_path_skips_reads() {
        let purse = Purse::new(
            MockIssuer::default(),
            WALLET,
            vec![Accessory::new(addr(0xaa))],
            catalog(),
        );

        assert!(purse.has_accessory(&Accessory::new(addr(0xaa))).await.unwrap());
        assert_eq!(purse.issuer().read_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_has_accessory_falls_back_to_live_reads() {
        // Cache is empty, but live state says one of A's three declared
        // selectors belongs to it: a partial installation still counts.
        let issuer = MockIssuer::default();
        issuer.seed_live(selector(0x02), addr(0xaa));
        let purse = empty_purse(issuer);

        assert!(purse.has_accessory(&Accessory::new(addr(0xaa))).await.unwrap());
        assert!(!purse.has_accessory(&Accessory::new(addr(0xbb))).await.unwrap());
        assert!(purse.issuer().read_calls.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn test_has_all_methods_detects_partial_installation() {
        let issuer = MockIssuer::default();
        issuer.seed_live(selector(0x01), addr(0xaa));
        let purse = empty_purse(issuer);

        let accessory = Accessory::new(addr(0xaa));
        assert!(!purse.has_all_methods(&accessory).await.unwrap());

        purse.issuer().seed_live(selector(0x02), addr(0xaa));
        purse.issuer().seed_live(selector(0x03), addr(0xaa));
        assert!(purse.has_all_methods(&accessory).await.unwrap());
    }

    #[tokio::test]
    async fn test_capability_resolves_accessory_fragments() {
        let mut purse = Purse::new(
            MockIssuer::default(),
            WALLET,
            vec![Accessory::new(addr(0xaa))],
            catalog(),
        );

        let capability = purse.capability("op1").unwrap().clone();
        assert_eq!(capability.kind(), CapabilityKind::WriteCall);
        assert_eq!(capability.selector(), Some(selector(0x02)));
        // Rebound to the wallet, not the accessory.
        assert_eq!(capability.target(), WALLET);

        // Memoized on second lookup.
        assert_eq!(purse.capability("op1").unwrap(), &capability);
    }

    #[tokio::test]
    async fn test_capability_prefers_delegate_interface() {
        let mut purse = empty_purse(MockIssuer::default());
        let capability = purse.capability("update_accessories").unwrap();
        assert_eq!(capability.kind(), CapabilityKind::WriteCall);
        assert_eq!(capability.target(), WALLET);
    }

    #[tokio::test]
    async fn test_capability_miss_names_the_operation() {
        let mut purse = empty_purse(MockIssuer::default());
        let err = purse.capability("op9").unwrap_err();
        assert!(matches!(
            err,
            PurseError::CapabilityNotFound(name) if name == "op9"
        ));
    }

    #[tokio::test]
    async fn test_sync_folds_history_in_order() {
        let source = MockSource {
            history: vec![
                PositionedUpdate {
                    position: 10,
                    update: AccessoryUpdate::assign(selector(0x01), addr(0xaa)),
                },
                PositionedUpdate {
                    position: 11,
                    update: AccessoryUpdate::clear(selector(0x01), addr(0xaa)),
                },
            ],
        };
        let mut purse = empty_purse(MockIssuer::default());

        let folded = purse.sync(&source).await.unwrap();
        assert_eq!(folded, 2);
        assert_eq!(purse.registry().last_indexed(), 11);
        assert_eq!(purse.registry().method_count(), 0);
        assert!(!purse.registry().is_tracked(addr(0xaa)));

        // Re-syncing replays only events at or after the watermark, and
        // replay is a structural no-op.
        let folded = purse.sync(&source).await.unwrap();
        assert_eq!(folded, 1);
        assert_eq!(purse.registry().last_indexed(), 11);
        assert_eq!(purse.registry().method_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_update_end_to_end_scenario() {
        let mut purse = empty_purse(MockIssuer::default());
        let method = Selector::from([0xaa, 0xaa, 0xaa, 0xaa]);

        purse.apply_update(&AccessoryUpdate::assign(method, addr(0xaa)), 10);
        assert!(purse.registry().is_tracked(addr(0xaa)));
        assert_eq!(
            purse.registry().accessory_for(method).unwrap().address(),
            addr(0xaa)
        );
        assert_eq!(purse.registry().last_indexed(), 10);

        purse.apply_update(&AccessoryUpdate::clear(method, addr(0xaa)), 11);
        assert!(!purse.registry().is_tracked(addr(0xaa)));
        assert!(purse.registry().accessory_for(method).is_none());
        assert_eq!(purse.registry().last_indexed(), 11);
    }

    #[tokio::test]
    async fn test_delegate_status_lifecycle() {
        let singleton_v1 = addr(0x51);
        let singleton_v2 = addr(0x52);
        let code_v1 = Bytes::from_static(b"purse singleton v1 runtime");
        let code_v2 = Bytes::from_static(b"purse singleton v2 runtime");
        let deployments = DeploymentRegistry::new(
            vec![
                SingletonDeployment {
                    code_hash: keccak256(&code_v1),
                    address: singleton_v1,
                },
                SingletonDeployment {
                    code_hash: keccak256(&code_v2),
                    address: singleton_v2,
                },
            ],
            HashMap::new(),
        );

        let designator = |delegate: Address| {
            let mut code = vec![0xef, 0x01, 0x00];
            code.extend_from_slice(delegate.as_slice());
            Bytes::from(code)
        };

        let issuer = MockIssuer::default();
        issuer.seed_code(singleton_v1, code_v1);
        issuer.seed_code(singleton_v2, code_v2);

        // No code at all: not delegated.
        let purse = empty_purse(issuer);
        assert_eq!(
            purse.delegate_status(&deployments).await.unwrap(),
            DelegateStatus::NotDelegated
        );

        // Delegated to the outdated version.
        purse.issuer().seed_code(WALLET, designator(singleton_v1));
        assert_eq!(
            purse.delegate_status(&deployments).await.unwrap(),
            DelegateStatus::Outdated {
                singleton: singleton_v1,
                latest: singleton_v2
            }
        );

        // Delegated to the latest version.
        purse.issuer().seed_code(WALLET, designator(singleton_v2));
        assert_eq!(
            purse.delegate_status(&deployments).await.unwrap(),
            DelegateStatus::Latest {
                singleton: singleton_v2
            }
        );

        // Delegated to something the registry does not know.
        purse.issuer().seed_code(WALLET, designator(addr(0x99)));
        purse.issuer().seed_code(addr(0x99), Bytes::from_static(b"other"));
        assert_eq!(
            purse.delegate_status(&deployments).await.unwrap(),
            DelegateStatus::Unknown {
                delegate: addr(0x99)
            }
        );
    }

    #[test]
    fn test_delegation_designator_parsing() {
        let delegate = addr(0x42);
        let mut code = vec![0xef, 0x01, 0x00];
        code.extend_from_slice(delegate.as_slice());
        assert_eq!(delegation_target(&code), Some(delegate));

        assert_eq!(delegation_target(&[]), None);
        assert_eq!(delegation_target(&[0x60, 0x80, 0x60, 0x40]), None);
        // Right prefix, wrong length.
        assert_eq!(delegation_target(&[0xef, 0x01, 0x00, 0x42]), None);
    }
}
