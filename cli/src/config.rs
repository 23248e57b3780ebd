//! Environment-driven CLI configuration.

use std::env;
use std::path::PathBuf;

use alloy_signer_local::PrivateKeySigner;
use url::Url;

use purse_types::DeploymentRegistry;

const DEFAULT_RPC_URL: &str = "http://localhost:8545";

pub struct Config {
    pub rpc_url: Url,
    private_key: Option<String>,
    deployments_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let raw = env::var("PURSE_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let rpc_url = Url::parse(&raw).map_err(|error| format!("invalid PURSE_RPC_URL: {error}"))?;

        Ok(Self {
            rpc_url,
            private_key: env::var("PURSE_PRIVATE_KEY").ok(),
            deployments_path: env::var("PURSE_DEPLOYMENTS").ok().map(PathBuf::from),
        })
    }

    /// The account signer, required by state-changing commands.
    pub fn signer(&self) -> Result<PrivateKeySigner, String> {
        let raw = self
            .private_key
            .as_ref()
            .ok_or("PURSE_PRIVATE_KEY is required for this command")?;
        raw.parse()
            .map_err(|error| format!("invalid PURSE_PRIVATE_KEY: {error}"))
    }

    /// The deployment registry: the bundled tables, unless
    /// `PURSE_DEPLOYMENTS` points at a JSON override.
    pub fn deployments(&self) -> Result<DeploymentRegistry, String> {
        match &self.deployments_path {
            None => Ok(DeploymentRegistry::bundled()),
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|error| format!("failed to read {}: {error}", path.display()))?;
                DeploymentRegistry::from_json(&raw)
                    .map_err(|error| format!("invalid deployment registry {}: {error}", path.display()))
            }
        }
    }
}
