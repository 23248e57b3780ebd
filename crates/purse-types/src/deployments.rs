//! Static registry of known Purse deployments.
//!
//! Two lookup tables, immutable once constructed:
//!
//! 1. code-hash of the singleton's runtime code → singleton deployment,
//!    ordered so the last entry is the latest version
//! 2. singleton address → accessory name → ordered accessory deployments,
//!    last is latest
//!
//! The registry is an explicitly constructed configuration object passed to
//! whoever needs it - never process-global state. [`DeploymentRegistry::bundled`]
//! carries the deployments this crate ships with; a JSON document with the
//! same shape can replace or extend it at runtime.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, B256, address, b256};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// One deployed singleton version of the Purse wallet delegate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingletonDeployment {
    /// keccak256 of the singleton's runtime code. Matching a delegated
    /// account's code hash against this identifies the Purse version.
    pub code_hash: B256,

    /// The singleton's deployment address.
    pub address: Address,
}

/// Immutable lookup tables for known singleton and accessory deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRegistry {
    /// Known singleton versions, oldest first. The last entry is "latest".
    singletons: Vec<SingletonDeployment>,

    /// Per-singleton accessory deployments: accessory name → addresses,
    /// oldest first, last is "latest".
    accessories: HashMap<Address, BTreeMap<String, Vec<Address>>>,
}

impl DeploymentRegistry {
    pub fn new(
        singletons: Vec<SingletonDeployment>,
        accessories: HashMap<Address, BTreeMap<String, Vec<Address>>>,
    ) -> Self {
        Self {
            singletons,
            accessories,
        }
    }

    /// The deployments this crate ships with.
    pub fn bundled() -> Self {
        let v1 = SingletonDeployment {
            code_hash: b256!("0xc614b11e5f5e7d2201f54b65f0aae877b2d6c952f2e80b89cdd3fe23a0ea53ee"),
            address: address!("0xD2c583A9001e0d94536c6f57cA34fe975F318848"),
        };
        let v2 = SingletonDeployment {
            code_hash: b256!("0xcd1b5f99b57e7ba51f7df5ff3734747d821897bc0b21e5c6e6739ab7cabf3a1a"),
            address: address!("0x2C04E8A873849DdaD69D3892a9B850A492877782"),
        };

        let mut accessories = HashMap::new();
        accessories.insert(
            v1.address,
            BTreeMap::from([(
                "Multicall".to_string(),
                vec![address!("0x0084b926D31e0E7FAD77a9f7E07eBa57015bcac8")],
            )]),
        );
        accessories.insert(
            v2.address,
            BTreeMap::from([
                (
                    "Create".to_string(),
                    vec![address!("0x780c840277E8B8cf62a7aE3aF4Dd5b9467ADC649")],
                ),
                (
                    "Flashloan".to_string(),
                    vec![address!("0x3DfcDeF53aa20914a636B81eF29410b79f728E0e")],
                ),
                (
                    "Multicall".to_string(),
                    vec![address!("0x9FF116bCc5AEdaa4fC7b81b9a476Bc351A260CcE")],
                ),
                (
                    "Sponsor".to_string(),
                    vec![address!("0x0Fc81C99adc9F052E079e9f05542Ca40366703e9")],
                ),
            ]),
        );

        Self::new(vec![v1, v2], accessories)
    }

    /// Parses a registry from its JSON representation.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// All known singleton versions, oldest first.
    pub fn singletons(&self) -> &[SingletonDeployment] {
        &self.singletons
    }

    /// The latest singleton version, if the registry is non-empty.
    pub fn latest_singleton(&self) -> Option<&SingletonDeployment> {
        self.singletons.last()
    }

    /// Looks up a singleton version by the keccak256 of its runtime code.
    pub fn singleton_by_code_hash(&self, code_hash: B256) -> Option<&SingletonDeployment> {
        self.singletons
            .iter()
            .find(|deployment| deployment.code_hash == code_hash)
    }

    /// The accessory tables for one singleton version, if any are known.
    pub fn accessories_for(
        &self,
        singleton: Address,
    ) -> Option<&BTreeMap<String, Vec<Address>>> {
        self.accessories.get(&singleton)
    }

    /// All known deployments of a named accessory for one singleton version,
    /// oldest first.
    pub fn deployments_of(&self, singleton: Address, name: &str) -> &[Address] {
        self.accessories
            .get(&singleton)
            .and_then(|table| table.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The latest deployment of a named accessory for one singleton version.
    pub fn latest_accessory(&self, singleton: Address, name: &str) -> Option<Address> {
        self.deployments_of(singleton, name).last().copied()
    }

    /// Resolves an [`AccessoryRef`] against one singleton version's tables.
    /// An unversioned reference resolves to the latest deployment.
    pub fn resolve(&self, singleton: Address, reference: &AccessoryRef) -> Option<Address> {
        let deployments = self.deployments_of(singleton, &reference.name);
        match reference.version {
            Some(version) => deployments.get(version).copied(),
            None => deployments.last().copied(),
        }
    }
}

/// A reference to a named accessory, optionally pinned to a version index.
///
/// The textual form is `Name` (latest) or `Name@N` where `N` indexes the
/// deployment list, oldest first.
///
/// # Example
///
/// ```
/// use purse_types::AccessoryRef;
///
/// let latest: AccessoryRef = "Multicall".parse().unwrap();
/// assert_eq!(latest.name, "Multicall");
/// assert!(latest.version.is_none());
///
/// let pinned: AccessoryRef = "Multicall@0".parse().unwrap();
/// assert_eq!(pinned.version, Some(0));
/// assert_eq!(pinned.to_string(), "Multicall@0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessoryRef {
    /// The accessory's registered name (e.g. `Multicall`).
    pub name: String,
    /// Index into the deployment list, oldest first. `None` means latest.
    pub version: Option<usize>,
}

impl AccessoryRef {
    pub fn latest<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn pinned<N: Into<String>>(name: N, version: usize) -> Self {
        Self {
            name: name.into(),
            version: Some(version),
        }
    }
}

impl fmt::Display for AccessoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Error returned when parsing an invalid accessory reference.
#[derive(Debug, thiserror::Error)]
#[error("Invalid accessory reference {0}")]
pub struct AccessoryRefFormatError(String);

impl FromStr for AccessoryRef {
    type Err = AccessoryRefFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            None => {
                if s.is_empty() {
                    return Err(AccessoryRefFormatError(s.into()));
                }
                Ok(AccessoryRef::latest(s))
            }
            Some((name, version)) => {
                if name.is_empty() {
                    return Err(AccessoryRefFormatError(s.into()));
                }
                let version = version
                    .parse::<usize>()
                    .map_err(|_| AccessoryRefFormatError(s.into()))?;
                Ok(AccessoryRef::pinned(name, version))
            }
        }
    }
}

impl Serialize for AccessoryRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccessoryRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AccessoryRef::from_str(&s).map_err(de::Error::custom)
    }
}
