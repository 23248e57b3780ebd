//! Solidity interface bindings for the Purse delegate and its accessories.
//!
//! The wallet delegate exposes exactly three things the SDK cares about: the
//! batched `update_accessories` entry point, the `accessoryByMethodId` view,
//! and the `AccessoryUpdated` event that records every selector ownership
//! change. Accessory interfaces are declared alongside so their selectors and
//! topics can be derived from the definitions instead of hand-written
//! constants.

use alloy_primitives::Selector;
use alloy_sol_types::{SolCall, SolEvent, sol};

use purse_types::{AccessoryInterface, AccessoryMethod, AccessoryUpdate, InterfaceCatalog, InterfaceItem};

sol!(
    /// The Purse wallet delegate. An EOA delegates its code here via
    /// EIP-7702; accessory logic then executes in the account's own storage
    /// context.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract PurseDelegate {
        struct MethodUpdate {
            bytes4 method;
            address accessory;
        }

        /// Emitted once per selector whose owner changed.
        event AccessoryUpdated(
            bytes4 indexed method,
            address indexed old_accessory,
            address indexed new_accessory
        );

        function update_accessories(MethodUpdate[] calldata updates) external;

        function accessoryByMethodId(bytes4 method) external view returns (address accessory);
    }
);

sol!(
    /// Batches arbitrary calls through the wallet.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract Multicall {
        function multicall(bytes[] calldata calls) external payable returns (bytes[] memory results);
    }
);

sol!(
    /// Deploys contracts from the wallet, plain or CREATE2.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract Create {
        function create(bytes calldata initcode) external payable returns (address deployed);
        function create2(bytes32 salt, bytes calldata initcode) external payable returns (address deployed);
    }
);

sol!(
    /// ERC-3156 borrower side: lets the wallet receive flash loans.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract Flashloan {
        function onFlashLoan(
            address initiator,
            address token,
            uint256 amount,
            uint256 fee,
            bytes calldata data
        ) external returns (bytes32);
    }
);

sol!(
    /// ERC-3156 lender side: lets the wallet lend its balances out as flash
    /// loans for a configurable fee.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract Flashlend {
        event FlashFeeSet(address indexed token, uint256 fee);

        function maxFlashLoan(address token) external view returns (uint256);
        function flashFee(address token, uint256 amount) external view returns (uint256);
        function flashLoan(
            address receiver,
            address token,
            uint256 amount,
            bytes calldata data
        ) external returns (bool);
        function setFlashFee(address token, uint256 fee) external;
    }
);

sol!(
    /// Gas sponsorship: approved sponsors may route calls through the wallet.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract Sponsor {
        event SponsorshipUpdated(address indexed sponsor, bool approved);

        function isSponsor(address account) external view returns (bool);
        function setSponsor(address sponsor, bool approved) external;
        function sponsorCall(address payer, bytes calldata data) external payable;
    }
);

impl From<AccessoryMethod> for PurseDelegate::MethodUpdate {
    fn from(value: AccessoryMethod) -> Self {
        Self {
            method: value.method,
            accessory: value.accessory,
        }
    }
}

impl From<&PurseDelegate::AccessoryUpdated> for AccessoryUpdate {
    fn from(event: &PurseDelegate::AccessoryUpdated) -> Self {
        Self {
            method: event.method,
            old_accessory: event.old_accessory,
            new_accessory: event.new_accessory,
        }
    }
}

fn read_call<C: SolCall>(name: &str) -> InterfaceItem {
    InterfaceItem::ReadCall {
        name: name.into(),
        selector: Selector::from(C::SELECTOR),
    }
}

fn write_call<C: SolCall>(name: &str) -> InterfaceItem {
    InterfaceItem::WriteCall {
        name: name.into(),
        selector: Selector::from(C::SELECTOR),
    }
}

fn event<E: SolEvent>(name: &str) -> InterfaceItem {
    InterfaceItem::Event {
        name: name.into(),
        topic: E::SIGNATURE_HASH,
    }
}

/// The wallet delegate's own interface, pre-registered on every wallet so
/// dispatch prefers it over accessory fragments.
pub fn delegate_interface() -> AccessoryInterface {
    AccessoryInterface::new(vec![
        write_call::<PurseDelegate::update_accessoriesCall>("update_accessories"),
        read_call::<PurseDelegate::accessoryByMethodIdCall>("accessoryByMethodId"),
        event::<PurseDelegate::AccessoryUpdated>("AccessoryUpdated"),
    ])
}

/// Catalog of the accessory interfaces this crate ships bindings for.
/// Deployment addresses still need to be bound, typically via
/// [`InterfaceCatalog::bind_deployments`].
pub fn builtin_catalog() -> InterfaceCatalog {
    let mut catalog = InterfaceCatalog::new();
    catalog.register(
        "Multicall",
        AccessoryInterface::new(vec![write_call::<Multicall::multicallCall>("multicall")]),
    );
    catalog.register(
        "Create",
        AccessoryInterface::new(vec![
            write_call::<Create::createCall>("create"),
            write_call::<Create::create2Call>("create2"),
        ]),
    );
    catalog.register(
        "Flashloan",
        AccessoryInterface::new(vec![write_call::<Flashloan::onFlashLoanCall>("onFlashLoan")]),
    );
    catalog.register(
        "Flashlend",
        AccessoryInterface::new(vec![
            event::<Flashlend::FlashFeeSet>("FlashFeeSet"),
            read_call::<Flashlend::maxFlashLoanCall>("maxFlashLoan"),
            read_call::<Flashlend::flashFeeCall>("flashFee"),
            write_call::<Flashlend::flashLoanCall>("flashLoan"),
            write_call::<Flashlend::setFlashFeeCall>("setFlashFee"),
        ]),
    );
    catalog.register(
        "Sponsor",
        AccessoryInterface::new(vec![
            event::<Sponsor::SponsorshipUpdated>("SponsorshipUpdated"),
            read_call::<Sponsor::isSponsorCall>("isSponsor"),
            write_call::<Sponsor::setSponsorCall>("setSponsor"),
            write_call::<Sponsor::sponsorCallCall>("sponsorCall"),
        ]),
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use purse_types::CapabilityKind;

    #[test]
    fn test_builtin_catalog_covers_shipped_accessories() {
        let catalog = builtin_catalog();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec!["Create", "Flashlend", "Flashloan", "Multicall", "Sponsor"]
        );
    }

    #[test]
    fn test_interface_selectors_match_definitions() {
        let catalog = builtin_catalog();
        let flashlend = catalog.interface("Flashlend").unwrap();
        assert_eq!(flashlend.selectors().len(), 4);
        assert!(
            flashlend
                .selectors()
                .contains(&Selector::from(Flashlend::flashFeeCall::SELECTOR))
        );

        let item = flashlend.item("maxFlashLoan").unwrap();
        assert_eq!(item.kind(), CapabilityKind::ReadCall);

        let event = flashlend.item("FlashFeeSet").unwrap();
        assert_eq!(event.topic(), Some(Flashlend::FlashFeeSet::SIGNATURE_HASH));
    }

    #[test]
    fn test_delegate_interface_names() {
        let interface = delegate_interface();
        assert!(interface.item("update_accessories").is_some());
        assert!(interface.item("accessoryByMethodId").is_some());
        assert_eq!(
            interface.item("AccessoryUpdated").unwrap().kind(),
            CapabilityKind::Event
        );
    }

    #[test]
    fn test_update_event_converts_to_value_type() {
        use alloy_primitives::{Address, Selector};

        let event = PurseDelegate::AccessoryUpdated {
            method: Selector::from([0xaa, 0xbb, 0xcc, 0xdd]),
            old_accessory: Address::ZERO,
            new_accessory: Address::repeat_byte(0x42),
        };
        let update = AccessoryUpdate::from(&event);
        assert_eq!(update.method, Selector::from([0xaa, 0xbb, 0xcc, 0xdd]));
        assert_eq!(update.old_accessory, Address::ZERO);
        assert_eq!(update.new_accessory, Address::repeat_byte(0x42));
    }
}
