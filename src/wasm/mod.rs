//! WASM bindings for wasm-dataprotector
//!
//! This module contains thin wrappers with #[wasm_bindgen] that delegate
//! to the core Rust implementations.

pub mod payload;
pub mod provider;
pub mod sdk;
pub mod session;
pub mod try_into_js_value;

// Re-export WASM types
pub use provider::InjectedProvider;
pub use sdk::{JsDataProtector, JsSdkFactory};
pub use session::WasmSession;
