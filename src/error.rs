//! Error types for wasm-dataprotector

use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Main error type for wasm-dataprotector operations
#[derive(Debug, Clone, Error)]
pub enum ProtectorError {
    /// No injected Ethereum provider was supplied
    #[error("No Ethereum provider found")]
    NoProvider,
    /// Provider request failed (user rejection, RPC failure)
    #[error("{message}")]
    Wallet {
        /// EIP-1193 numeric error code, when the provider attached one
        code: Option<i32>,
        message: String,
    },
    /// Uploaded file rejected before its content is parsed
    #[error("{0}")]
    InvalidFile(String),
    /// File content is not well-formed JSON
    #[error("Invalid JSON format")]
    InvalidJson,
    /// Parsed document failed structural validation
    #[error("{0}")]
    Validation(String),
    /// External SDK call failed; the message comes from the SDK
    #[error("{0}")]
    Sdk(String),
    /// Operation requires a session state that does not hold
    #[error("{0}")]
    State(String),
    /// Rust/JS value conversion failure at the WASM boundary
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl ProtectorError {
    /// Wallet error without a provider code
    pub fn wallet(message: impl Into<String>) -> Self {
        ProtectorError::Wallet {
            code: None,
            message: message.into(),
        }
    }

    /// The provider's numeric error code, if this is a wallet error carrying one
    pub fn code(&self) -> Option<i32> {
        match self {
            ProtectorError::Wallet { code, .. } => *code,
            _ => None,
        }
    }
}

// REQUIRED: Converts to JS Error with stack trace
impl From<ProtectorError> for JsValue {
    fn from(err: ProtectorError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_error_display() {
        let err = ProtectorError::wallet("User rejected the request");
        assert_eq!(err.to_string(), "User rejected the request");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_wallet_error_code() {
        let err = ProtectorError::Wallet {
            code: Some(4902),
            message: "Unrecognized chain ID".to_string(),
        };
        assert_eq!(err.code(), Some(4902));
    }

    #[test]
    fn test_non_wallet_errors_have_no_code() {
        assert_eq!(ProtectorError::NoProvider.code(), None);
        assert_eq!(ProtectorError::InvalidJson.code(), None);
    }
}
