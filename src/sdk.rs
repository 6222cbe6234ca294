//! External data-protector SDK capability
//!
//! The SDK owns encryption, on-chain registration, and task execution; this
//! crate depends on exactly three of its calls and treats everything behind
//! them as a black box.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProtectorError;
use crate::types::{ProcessRequest, ProtectedData, TaskHandle};

/// Capability over the external data-protector SDK
#[async_trait(?Send)]
pub trait DataProtector {
    /// `getProtectedData()`: list records visible to the connected signer
    async fn protected_data(&self) -> Result<Vec<ProtectedData>, ProtectorError>;

    /// `protectData({name, data})`: encrypt and register a new record
    async fn protect(&self, name: &str, data: &Value) -> Result<ProtectedData, ProtectorError>;

    /// `processProtectedData({protectedData, workerpool, app})`: start a
    /// TEE task against a record
    async fn process(&self, request: &ProcessRequest) -> Result<TaskHandle, ProtectorError>;
}

/// Factory producing a chain-bound SDK handle for a connected wallet
///
/// In the browser this wraps the host-supplied constructor that builds the
/// SDK with the provider as signer; tests supply a mock. The connect
/// sequence only invokes it after the wallet is on the target chain.
#[async_trait(?Send)]
pub trait SdkFactory {
    type Sdk: DataProtector;

    async fn connect(&self) -> Result<Self::Sdk, ProtectorError>;
}
