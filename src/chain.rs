//! Target chain configuration
//!
//! The session only uses these values to point the wallet at the right
//! network (`wallet_switchEthereumChain` / `wallet_addEthereumChain`); the
//! chain is never queried directly.

use serde::{Deserialize, Serialize};

/// iExec Sidechain (Bellecour) chain id, hex-encoded for wallet RPC (134)
pub const CHAIN_ID: &str = "0x86";

/// Human-readable chain name shown by the wallet
pub const CHAIN_NAME: &str = "iExec Sidechain";

/// Bellecour mainnet RPC endpoint
pub const RPC_URL: &str = "https://bellecour.iex.ec";

/// Block explorer for the sidechain
pub const EXPLORER_URL: &str = "https://explorer.iex.ec";

/// Native currency ticker
pub const CURRENCY_SYMBOL: &str = "xRLC";

/// Native currency decimals
pub const CURRENCY_DECIMALS: u8 = 18;

/// EIP-3085: providers report this code when asked to switch to a chain
/// they have not been told about yet
pub const UNRECOGNIZED_CHAIN_CODE: i32 = 4902;

/// Native currency entry of a chain definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain definition payload for `wallet_addEthereumChain` (EIP-3085)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDefinition {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDefinition {
    /// Definition of the iExec Sidechain, as handed to the wallet when it
    /// does not recognize the chain id
    pub fn bellecour() -> Self {
        ChainDefinition {
            chain_id: CHAIN_ID.to_string(),
            chain_name: CHAIN_NAME.to_string(),
            native_currency: NativeCurrency {
                name: CURRENCY_SYMBOL.to_string(),
                symbol: CURRENCY_SYMBOL.to_string(),
                decimals: CURRENCY_DECIMALS,
            },
            rpc_urls: vec![RPC_URL.to_string()],
            block_explorer_urls: vec![EXPLORER_URL.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bellecour_definition() {
        let def = ChainDefinition::bellecour();
        assert_eq!(def.chain_id, "0x86");
        assert_eq!(def.native_currency.decimals, 18);
        assert_eq!(def.rpc_urls, vec!["https://bellecour.iex.ec"]);
    }

    #[test]
    fn test_definition_serializes_camel_case() {
        let json = serde_json::to_value(ChainDefinition::bellecour()).unwrap();
        assert_eq!(json["chainId"], "0x86");
        assert_eq!(json["nativeCurrency"]["symbol"], "xRLC");
        assert!(json["blockExplorerUrls"].is_array());
    }
}
