//! Injected wallet provider capability
//!
//! Browser wallets expose a single `request({method, params})` entry point.
//! This trait narrows it to the calls the session needs, so the controller
//! runs against a mock under native tests and against the injected object in
//! the browser (`wasm::provider::InjectedProvider`).

use async_trait::async_trait;

use crate::chain::{self, ChainDefinition};
use crate::error::ProtectorError;

/// Capability over the injected wallet provider
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Interactive account request (`eth_requestAccounts`); prompts the user
    async fn request_accounts(&self) -> Result<Vec<String>, ProtectorError>;

    /// Non-interactive account query (`eth_accounts`)
    async fn accounts(&self) -> Result<Vec<String>, ProtectorError>;

    /// Point the wallet at a chain (`wallet_switchEthereumChain`)
    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProtectorError>;

    /// Teach the wallet a chain definition (`wallet_addEthereumChain`)
    async fn add_chain(&self, definition: &ChainDefinition) -> Result<(), ProtectorError>;

    /// Register an `accountsChanged` listener
    ///
    /// The listener receives the wallet's full account list on every change.
    /// The returned guard detaches it; registration lasts until then.
    fn on_accounts_changed(&self, listener: Box<dyn FnMut(Vec<String>)>) -> AccountsSubscription;
}

/// Guard for an `accountsChanged` registration
///
/// Calling [`unsubscribe`](Self::unsubscribe) detaches the listener from the
/// provider. Dropping the guard without calling it leaves the listener
/// attached for the page's lifetime.
pub struct AccountsSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl AccountsSubscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        AccountsSubscription {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach the listener from the provider
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Make sure the wallet is pointed at the target chain
///
/// Tries a switch first; a provider code 4902 means the wallet has never
/// seen the chain, in which case the full definition is added instead. Any
/// other switch failure propagates.
pub async fn ensure_chain<P>(provider: &P) -> Result<(), ProtectorError>
where
    P: WalletProvider + ?Sized,
{
    match provider.switch_chain(chain::CHAIN_ID).await {
        Ok(()) => Ok(()),
        Err(err) if err.code() == Some(chain::UNRECOGNIZED_CHAIN_CODE) => {
            provider.add_chain(&ChainDefinition::bellecour()).await
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeProvider {
        switch_error: Option<ProtectorError>,
        switched: RefCell<Vec<String>>,
        added: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl WalletProvider for FakeProvider {
        async fn request_accounts(&self) -> Result<Vec<String>, ProtectorError> {
            Ok(Vec::new())
        }

        async fn accounts(&self) -> Result<Vec<String>, ProtectorError> {
            Ok(Vec::new())
        }

        async fn switch_chain(&self, chain_id: &str) -> Result<(), ProtectorError> {
            self.switched.borrow_mut().push(chain_id.to_string());
            match &self.switch_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        async fn add_chain(&self, definition: &ChainDefinition) -> Result<(), ProtectorError> {
            self.added.borrow_mut().push(definition.chain_id.clone());
            Ok(())
        }

        fn on_accounts_changed(
            &self,
            _listener: Box<dyn FnMut(Vec<String>)>,
        ) -> AccountsSubscription {
            AccountsSubscription::new(|| {})
        }
    }

    #[test]
    fn test_switch_succeeds_without_add() {
        let provider = FakeProvider::default();
        block_on(ensure_chain(&provider)).unwrap();
        assert_eq!(provider.switched.borrow().as_slice(), ["0x86"]);
        assert!(provider.added.borrow().is_empty());
    }

    #[test]
    fn test_unrecognized_chain_gets_added() {
        let provider = FakeProvider {
            switch_error: Some(ProtectorError::Wallet {
                code: Some(chain::UNRECOGNIZED_CHAIN_CODE),
                message: "Unrecognized chain ID".to_string(),
            }),
            ..FakeProvider::default()
        };
        block_on(ensure_chain(&provider)).unwrap();
        assert_eq!(provider.added.borrow().as_slice(), ["0x86"]);
    }

    #[test]
    fn test_other_switch_errors_propagate() {
        let provider = FakeProvider {
            switch_error: Some(ProtectorError::Wallet {
                code: Some(4001),
                message: "User rejected the request".to_string(),
            }),
            ..FakeProvider::default()
        };
        let err = block_on(ensure_chain(&provider)).unwrap_err();
        assert_eq!(err.code(), Some(4001));
        assert!(provider.added.borrow().is_empty());
    }

    #[test]
    fn test_subscription_cancel_runs_once() {
        let fired = std::rc::Rc::new(RefCell::new(0));
        let counter = fired.clone();
        let sub = AccountsSubscription::new(move || *counter.borrow_mut() += 1);
        sub.unsubscribe();
        assert_eq!(*fired.borrow(), 1);
    }
}
