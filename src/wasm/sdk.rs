//! External SDK binding
//!
//! Wraps the JS data-protector SDK handle. The crate never constructs the
//! SDK class itself; the host page supplies a constructor callback, invoked
//! once the wallet is on the target chain, and the wrapper drives the
//! handle's `core` namespace through the three calls the system depends on.

use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::ProtectorError;
use crate::js_obj;
use crate::sdk::{DataProtector, SdkFactory};
use crate::types::{ProcessRequest, ProtectedData, TaskHandle};
use crate::wasm::try_into_js_value::to_js_value;

/// Host-supplied constructor for the SDK handle
///
/// The page passes `(provider) => new IExecDataProtector(...)`, returning
/// the instance directly or a promise of it.
#[derive(Clone)]
pub struct JsSdkFactory {
    construct: Function,
    provider: JsValue,
}

impl JsSdkFactory {
    pub fn new(construct: Function, provider: JsValue) -> Self {
        JsSdkFactory { construct, provider }
    }
}

#[async_trait(?Send)]
impl SdkFactory for JsSdkFactory {
    type Sdk = JsDataProtector;

    async fn connect(&self) -> Result<JsDataProtector, ProtectorError> {
        let result = self
            .construct
            .call1(&JsValue::NULL, &self.provider)
            .map_err(|err| sdk_error(&err))?;
        let handle = if result.has_type::<Promise>() {
            let promise: Promise = result.unchecked_into();
            JsFuture::from(promise).await.map_err(|err| sdk_error(&err))?
        } else {
            result
        };
        JsDataProtector::new(handle)
    }
}

/// Wrapper around the SDK handle's `core` namespace
#[derive(Clone)]
pub struct JsDataProtector {
    core: Object,
}

impl JsDataProtector {
    /// Accepts either the SDK root object (with a `core` namespace) or the
    /// namespace itself
    pub fn new(handle: JsValue) -> Result<Self, ProtectorError> {
        let core = Reflect::get(&handle, &JsValue::from_str("core"))
            .ok()
            .filter(|core| !core.is_null() && !core.is_undefined())
            .unwrap_or(handle);
        core.dyn_into::<Object>()
            .map(|core| JsDataProtector { core })
            .map_err(|_| ProtectorError::Sdk("Invalid data protector handle".to_string()))
    }

    async fn invoke(&self, method: &str, arg: Option<&JsValue>) -> Result<JsValue, ProtectorError> {
        let function = Reflect::get(&self.core, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ProtectorError::Sdk(format!("SDK method {} not available", method)))?;

        let result = match arg {
            None => function.call0(&self.core),
            Some(arg) => function.call1(&self.core, arg),
        }
        .map_err(|err| sdk_error(&err))?;

        if result.has_type::<Promise>() {
            let promise: Promise = result.unchecked_into();
            JsFuture::from(promise).await.map_err(|err| sdk_error(&err))
        } else {
            Ok(result)
        }
    }
}

/// Extract the SDK's own message text from a rejection
fn sdk_error(value: &JsValue) -> ProtectorError {
    let message = Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "Data protector call failed".to_string());
    ProtectorError::Sdk(message)
}

#[async_trait(?Send)]
impl DataProtector for JsDataProtector {
    async fn protected_data(&self) -> Result<Vec<ProtectedData>, ProtectorError> {
        let value = self.invoke("getProtectedData", None).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| ProtectorError::Conversion(err.to_string()))
    }

    async fn protect(&self, name: &str, data: &Value) -> Result<ProtectedData, ProtectorError> {
        let args = js_obj! {
            "name" => name,
            "data" => data,
        }?;
        let value = self.invoke("protectData", Some(&args)).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| ProtectorError::Conversion(err.to_string()))
    }

    async fn process(&self, request: &ProcessRequest) -> Result<TaskHandle, ProtectorError> {
        let args = to_js_value(request)?;
        let value = self.invoke("processProtectedData", Some(&args)).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| ProtectorError::Conversion(err.to_string()))
    }
}

// WASM tests - only run in wasm32 target
#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_accepts_core_namespace_directly() {
        assert!(JsDataProtector::new(Object::new().into()).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_unwraps_sdk_root() {
        let core = Object::new();
        let root = Object::new();
        Reflect::set(&root, &JsValue::from_str("core"), &core).unwrap();
        assert!(JsDataProtector::new(root.into()).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_rejects_non_object_handle() {
        assert!(JsDataProtector::new(JsValue::from_str("nope")).is_err());
    }

    #[wasm_bindgen_test]
    fn test_sdk_error_prefers_message_field() {
        let err = Object::new();
        Reflect::set(
            &err,
            &JsValue::from_str("message"),
            &JsValue::from_str("protectData failed"),
        )
        .unwrap();
        assert_eq!(sdk_error(&err.into()).to_string(), "protectData failed");
    }
}
