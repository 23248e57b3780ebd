//! The `check`, `enable`, and `disable` subcommands.

use std::error::Error;
use std::sync::Arc;

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::ProviderBuilder;

use purse_sdk::{DelegateStatus, Purse, RpcIssuer, builtin_catalog};
use purse_types::{Accessory, AccessoryRef, PurseError};

use crate::config::Config;

/// Inspects an account's delegation, then audits which accessory versions it
/// carries for the matched Purse version.
pub async fn check(config: &Config, address: &str) -> Result<(), Box<dyn Error>> {
    let address: Address = address.parse()?;
    let deployments = config.deployments()?;
    let mut catalog = builtin_catalog();
    catalog.bind_deployments(&deployments);

    let provider = ProviderBuilder::new().connect_http(config.rpc_url.clone());
    let purse = Purse::new(RpcIssuer::new(provider), address, Vec::new(), Arc::new(catalog));

    let singleton = match purse.delegate_status(&deployments).await? {
        DelegateStatus::NotDelegated => {
            println!("No delegate detected");
            return Ok(());
        }
        DelegateStatus::Unknown { .. } => {
            println!("Account is not delegated to Purse");
            return Ok(());
        }
        DelegateStatus::Outdated { singleton, latest } => {
            println!("Not using the latest version of Purse, please upgrade to {latest}");
            singleton
        }
        DelegateStatus::Latest { singleton } => {
            println!("Delegated to latest version of Purse!");
            singleton
        }
    };

    let Some(accessory_deployments) = deployments.accessories_for(singleton) else {
        println!("No known accessories for version at {singleton}");
        return Ok(());
    };

    for (name, addresses) in accessory_deployments {
        let mut installed = None;
        for accessory_address in addresses {
            let accessory = Accessory::new(*accessory_address);
            if purse.has_accessory(&accessory).await? {
                installed = Some(accessory);
                break;
            }
        }

        let Some(accessory) = installed else {
            println!("Account doesn't have accessory '{name}'");
            continue;
        };

        if Some(&accessory.address()) == addresses.last() {
            println!("Account has latest accessory '{name}' for Purse version");
        } else if let Some(latest) = addresses.last() {
            println!("Account has an older accessory '{name}' and should be upgraded to {latest}");
        }

        if !purse.has_all_methods(&accessory).await? {
            println!("Account has not installed all necessary methods for accessory!");
        }
    }

    Ok(())
}

/// Activates Purse delegation for the configured account, installing the
/// named accessories in the initialization payload.
pub async fn enable(config: &Config, accessories: &[String]) -> Result<(), Box<dyn Error>> {
    let signer = config.signer()?;
    let account = signer.address();
    let deployments = config.deployments()?;
    let singleton = deployments
        .latest_singleton()
        .ok_or("no singleton deployments known")?;
    let mut catalog = builtin_catalog();
    catalog.bind_deployments(&deployments);

    let mut resolved = Vec::with_capacity(accessories.len());
    for raw in accessories {
        let reference: AccessoryRef = raw.parse()?;
        let address = deployments
            .resolve(singleton.address, &reference)
            .ok_or_else(|| PurseError::UnknownAccessory {
                reference: reference.to_string(),
                singleton: singleton.address,
            })?;
        resolved.push(Accessory::new(address));
    }

    println!("Enabling {} with accessories:", singleton.address);
    for accessory in &resolved {
        println!("- {}", accessory.address());
    }

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer.clone()))
        .connect_http(config.rpc_url.clone());
    let issuer = RpcIssuer::new(provider).with_authority(signer);

    let purse = Purse::initialize(
        issuer,
        account,
        resolved,
        Some(singleton),
        Arc::new(catalog),
    )
    .await?;
    println!("Purse enabled for {}", purse.address());

    Ok(())
}

/// Removes the configured account's delegation.
pub async fn disable(config: &Config) -> Result<(), Box<dyn Error>> {
    let signer = config.signer()?;
    let account = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer.clone()))
        .connect_http(config.rpc_url.clone());
    let issuer = RpcIssuer::new(provider).with_authority(signer);

    let purse = Purse::new(issuer, account, Vec::new(), Arc::new(builtin_catalog()));
    let tx = purse.disable().await?;
    println!("Delegation removed in {tx}");

    Ok(())
}
