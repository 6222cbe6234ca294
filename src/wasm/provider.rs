//! Injected Ethereum provider binding
//!
//! Wraps the `window.ethereum`-style object a browser wallet injects into
//! the page. All traffic goes through the provider's single
//! `request({method, params})` entry point, awaiting returned promises;
//! account-change events use the provider's `on`/`removeListener` pair.

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::chain::ChainDefinition;
use crate::error::ProtectorError;
use crate::provider::{AccountsSubscription, WalletProvider};
use crate::wasm::try_into_js_value::to_js_value;

const ACCOUNTS_CHANGED: &str = "accountsChanged";

/// Wrapper around the injected provider object
#[derive(Clone)]
pub struct InjectedProvider {
    raw: Object,
}

impl InjectedProvider {
    /// Wrap an injected provider handle; fails when nothing is injected
    pub fn new(raw: JsValue) -> Result<Self, ProtectorError> {
        if raw.is_null() || raw.is_undefined() {
            return Err(ProtectorError::NoProvider);
        }
        let raw = raw.dyn_into::<Object>().map_err(|_| ProtectorError::NoProvider)?;
        Ok(InjectedProvider { raw })
    }

    /// `provider.request({method, params})`, awaiting the returned promise
    async fn request(
        &self,
        method: &str,
        params: Option<&JsValue>,
    ) -> Result<JsValue, ProtectorError> {
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|_| ProtectorError::Conversion("Failed to build request".to_string()))?;
        if let Some(params) = params {
            Reflect::set(&args, &JsValue::from_str("params"), params)
                .map_err(|_| ProtectorError::Conversion("Failed to build request".to_string()))?;
        }

        let request_fn = Reflect::get(&self.raw, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ProtectorError::wallet("Provider has no request method"))?;

        let result = request_fn
            .call1(&self.raw, &args.into())
            .map_err(|err| wallet_error(&err))?;
        if result.has_type::<Promise>() {
            let promise: Promise = result.unchecked_into();
            JsFuture::from(promise)
                .await
                .map_err(|err| wallet_error(&err))
        } else {
            Ok(result)
        }
    }
}

/// Convert a provider rejection into a wallet error, keeping the numeric
/// `code` EIP-1193 attaches (4001 user rejection, 4902 unknown chain)
fn wallet_error(value: &JsValue) -> ProtectorError {
    let code = Reflect::get(value, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64())
        .map(|code| code as i32);
    let message = Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "Wallet request failed".to_string());
    ProtectorError::Wallet { code, message }
}

/// Read an account list out of a provider response
fn account_list(value: JsValue) -> Vec<String> {
    if !Array::is_array(&value) {
        return Vec::new();
    }
    Array::from(&value)
        .iter()
        .filter_map(|account| account.as_string())
        .collect()
}

/// `target.<method>("accountsChanged", callback)`
fn call_event_method(target: &Object, method: &str, callback: &Function) -> bool {
    let Ok(f) = Reflect::get(target, &JsValue::from_str(method)) else {
        return false;
    };
    let Ok(f) = f.dyn_into::<Function>() else {
        return false;
    };
    f.call2(target, &JsValue::from_str(ACCOUNTS_CHANGED), callback)
        .is_ok()
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProtectorError> {
        Ok(account_list(
            self.request("eth_requestAccounts", None).await?,
        ))
    }

    async fn accounts(&self) -> Result<Vec<String>, ProtectorError> {
        Ok(account_list(self.request("eth_accounts", None).await?))
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProtectorError> {
        let target = Object::new();
        Reflect::set(
            &target,
            &JsValue::from_str("chainId"),
            &JsValue::from_str(chain_id),
        )
        .map_err(|_| ProtectorError::Conversion("Failed to build request".to_string()))?;
        let params = Array::of1(&target.into());
        self.request("wallet_switchEthereumChain", Some(&params.into()))
            .await
            .map(|_| ())
    }

    async fn add_chain(&self, definition: &ChainDefinition) -> Result<(), ProtectorError> {
        let definition = to_js_value(definition)?;
        let params = Array::of1(&definition);
        self.request("wallet_addEthereumChain", Some(&params.into()))
            .await
            .map(|_| ())
    }

    fn on_accounts_changed(
        &self,
        mut listener: Box<dyn FnMut(Vec<String>)>,
    ) -> AccountsSubscription {
        let closure = Closure::wrap(Box::new(move |accounts: JsValue| {
            listener(account_list(accounts));
        }) as Box<dyn FnMut(JsValue)>);

        let registered = call_event_method(&self.raw, "on", closure.as_ref().unchecked_ref());
        let callback: Function = closure.as_ref().unchecked_ref::<Function>().clone();
        // Listener lives until removeListener; the closure itself is leaked,
        // which is the wasm-bindgen contract for page-lifetime callbacks
        closure.forget();

        let target = self.raw.clone();
        AccountsSubscription::new(move || {
            if registered {
                call_event_method(&target, "removeListener", &callback);
            }
        })
    }
}

// WASM tests - only run in wasm32 target
#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_rejects_missing_provider() {
        assert!(InjectedProvider::new(JsValue::UNDEFINED).is_err());
        assert!(InjectedProvider::new(JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn test_wraps_plain_object() {
        assert!(InjectedProvider::new(Object::new().into()).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_wallet_error_extracts_code_and_message() {
        let err = Object::new();
        Reflect::set(&err, &JsValue::from_str("code"), &JsValue::from_f64(4902.0)).unwrap();
        Reflect::set(
            &err,
            &JsValue::from_str("message"),
            &JsValue::from_str("Unrecognized chain ID"),
        )
        .unwrap();
        let err = wallet_error(&err.into());
        assert_eq!(err.code(), Some(4902));
        assert_eq!(err.to_string(), "Unrecognized chain ID");
    }

    #[wasm_bindgen_test]
    fn test_account_list_ignores_non_arrays() {
        assert!(account_list(JsValue::from_str("0xAA")).is_empty());
        let accounts = Array::of1(&JsValue::from_str("0xAA"));
        assert_eq!(account_list(accounts.into()), vec!["0xAA".to_string()]);
    }
}
