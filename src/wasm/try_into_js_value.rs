//! Rust to JavaScript value conversion
//!
//! This module provides the TryIntoJsValue trait for converting Rust types
//! to the plain JS objects handed to the provider and the SDK. serde-backed
//! values go through serde-wasm-bindgen's JSON-compatible mode so maps come
//! out as plain objects rather than ES Maps.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::ProtectorError;

/// Error type for JS conversion failures
#[derive(Debug, Clone)]
pub struct JsConversionError(String);

impl JsConversionError {
    pub fn new(msg: &str) -> Self {
        JsConversionError(msg.to_string())
    }
}

impl std::fmt::Display for JsConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<JsConversionError> for JsValue {
    fn from(err: JsConversionError) -> Self {
        js_sys::Error::new(&err.0).into()
    }
}

impl From<JsConversionError> for ProtectorError {
    fn from(err: JsConversionError) -> Self {
        ProtectorError::Conversion(err.0)
    }
}

/// Serialize a value as a plain JS object tree
pub fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ProtectorError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| ProtectorError::Conversion(err.to_string()))
}

/// Trait for converting Rust types to JavaScript values
pub trait TryIntoJsValue {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError>;
}

impl TryIntoJsValue for String {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_str(self))
    }
}

impl TryIntoJsValue for &str {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_str(self))
    }
}

impl TryIntoJsValue for bool {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_bool(*self))
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for Option<T> {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        match self {
            Some(v) => v.try_to_js_value(),
            None => Ok(JsValue::undefined()),
        }
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for Vec<T> {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        let arr = js_sys::Array::new();
        for item in self {
            arr.push(&item.try_to_js_value()?);
        }
        Ok(arr.into())
    }
}

impl<T: TryIntoJsValue + ?Sized> TryIntoJsValue for &T {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        (**self).try_to_js_value()
    }
}

impl TryIntoJsValue for serde_json::Value {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        self.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsConversionError::new(&format!("JSON conversion error: {}", e)))
    }
}

/// Macro for building JavaScript objects
#[macro_export]
macro_rules! js_obj {
    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        use $crate::wasm::try_into_js_value::{TryIntoJsValue, JsConversionError};
        let obj = js_sys::Object::new();
        $(
            js_sys::Reflect::set(
                &obj,
                &wasm_bindgen::JsValue::from_str($key),
                &TryIntoJsValue::try_to_js_value(&$value)?
            ).map_err(|_| JsConversionError::new(&format!("Failed to set property: {}", $key)))?;
        )*
        Ok::<wasm_bindgen::JsValue, JsConversionError>(obj.into())
    }};
}

// WASM tests - only run in wasm32 target
#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_string_conversion() {
        let s = "hello".to_string();
        assert!(s.try_to_js_value().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_option_conversion() {
        let some: Option<String> = Some("value".to_string());
        let none: Option<String> = None;

        assert!(some.try_to_js_value().is_ok());
        assert!(none.try_to_js_value().unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_json_value_becomes_plain_object() {
        let value = serde_json::json!({"a": {"0": 1}});
        let js = value.try_to_js_value().unwrap();
        assert!(js.is_object());
        // Plain object, not an ES Map
        assert!(!js.is_instance_of::<js_sys::Map>());
    }
}
