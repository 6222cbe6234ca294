//! Shared types for data-protection flows

use serde::{Deserialize, Serialize};

/// A protected-data record as reported by the external SDK
///
/// Opaque to this crate: records are read and filtered by owner, never
/// constructed or mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedData {
    /// Display name chosen at protection time
    pub name: String,
    /// On-chain address of the record
    pub address: String,
    /// Address that owns the record
    pub owner: String,
    /// Creation time (unix seconds), when the SDK reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<u64>,
    /// Content schema as reported by the SDK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
    /// Storage multiaddress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiaddr: Option<String>,
}

/// Arguments for the SDK's process-protected-data call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Address of the protected record to analyze
    pub protected_data: String,
    /// Workerpool the task is ordered from
    pub workerpool: String,
    /// Address of the application to run
    pub app: String,
}

/// Handle returned by the process-protected-data call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    pub task_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_camel_case() {
        let record: ProtectedData = serde_json::from_value(json!({
            "name": "data.json",
            "address": "0x1234",
            "owner": "0xABCD",
            "creationTimestamp": 1700000000,
            "schema": {"secretText": "string"},
            "multiaddr": "/p2p/Qm..."
        }))
        .unwrap();
        assert_eq!(record.creation_timestamp, Some(1700000000));
        assert_eq!(record.schema.unwrap()["secretText"], "string");
    }

    #[test]
    fn test_record_optional_fields_default() {
        let record: ProtectedData = serde_json::from_value(json!({
            "name": "data.json",
            "address": "0x1234",
            "owner": "0xABCD"
        }))
        .unwrap();
        assert!(record.creation_timestamp.is_none());
        assert!(record.multiaddr.is_none());
    }
}
