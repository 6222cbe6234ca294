//! wasm-dataprotector: WASM module for confidential data-protection flows
//!
//! This crate provides:
//! - Wallet session management (connect, resume, account-change tracking)
//! - JSON document validation and normalization for protection
//! - Protected-data submission through the external data-protector SDK
//! - TEE analysis task triggering against protected records
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//! - **Core layer** (`src/*.rs`): Pure Rust logic, no WASM dependencies.
//!   The injected wallet provider and the SDK are capability traits, so the
//!   session controller and flows run under native tests with mocks.
//! - **WASM layer** (`src/wasm/*.rs`): Thin wrappers with `#[wasm_bindgen]`
//!   binding the core to the injected provider object and the JS SDK handle.

pub mod analysis;
pub mod chain;
pub mod error;
pub mod provider;
pub mod records;
pub mod sdk;
pub mod session;
pub mod transform;
pub mod types;
pub mod upload;
pub mod validate;
pub mod wasm;

// Re-export main types for convenience
pub use analysis::{run_analysis, AnalysisFlow, AnalysisReport, AnalysisStats, AnalysisStep};
pub use error::ProtectorError;
pub use provider::{ensure_chain, AccountsSubscription, WalletProvider};
pub use sdk::{DataProtector, SdkFactory};
pub use session::{open_connection, resume_connection, AccountsEvent, Connection, ConnectionState, Session};
pub use transform::arrays_to_objects;
pub use types::{ProcessRequest, ProtectedData, TaskHandle};
pub use upload::UploadDraft;
pub use validate::{validate_document, ValidationError};
pub use wasm::WasmSession;
