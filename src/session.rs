//! Wallet session controller
//!
//! Tracks the connection lifecycle (disconnected, connecting, connected)
//! and owns the state acquired by a successful connect: the active address,
//! the chain-bound SDK handle, and the owned-records list. The async connect
//! sequences are free functions over the provider/factory capabilities, so a
//! host that cannot hold a borrow across an await (the WASM facade) can run
//! them separately and commit the outcome with the sync transitions.

use crate::error::ProtectorError;
use crate::provider::{ensure_chain, WalletProvider};
use crate::records::{self, fetch_owned};
use crate::sdk::{DataProtector, SdkFactory};
use crate::types::ProtectedData;
use crate::upload::UploadDraft;

/// Connection lifecycle of the wallet session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { address: String },
}

/// Outcome of applying an `accountsChanged` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsEvent {
    /// The event reported zero accounts; the session dropped to disconnected
    Disconnected,
    /// A different non-empty account; the record list must be refreshed
    AddressChanged(String),
    /// Same account, or the session was not connected; nothing to do
    Unchanged,
}

/// Everything acquired by a successful connect sequence
pub struct Connection<S> {
    pub address: String,
    pub sdk: S,
    pub records: Vec<ProtectedData>,
}

async fn link_account<P, F>(
    address: String,
    provider: &P,
    factory: &F,
) -> Result<Connection<F::Sdk>, ProtectorError>
where
    P: WalletProvider + ?Sized,
    F: SdkFactory + ?Sized,
{
    ensure_chain(provider).await?;
    let sdk = factory.connect().await?;
    let records = fetch_owned(&sdk, &address).await?;
    Ok(Connection {
        address,
        sdk,
        records,
    })
}

/// Run the interactive connect sequence
///
/// Requests accounts (prompting the user), ensures the target chain, builds
/// the SDK handle, and loads the owned records. A wallet that reports zero
/// accounts is an error, not a crash.
pub async fn open_connection<P, F>(
    provider: &P,
    factory: &F,
) -> Result<Connection<F::Sdk>, ProtectorError>
where
    P: WalletProvider + ?Sized,
    F: SdkFactory + ?Sized,
{
    let accounts = provider.request_accounts().await?;
    let address = accounts
        .into_iter()
        .find(|account| !account.is_empty())
        .ok_or_else(|| ProtectorError::wallet("No accounts returned"))?;
    link_account(address, provider, factory).await
}

/// Detect and restore a prior session without prompting
///
/// Uses the non-interactive account query; `Ok(None)` means no prior
/// session, which is not an error.
pub async fn resume_connection<P, F>(
    provider: &P,
    factory: &F,
) -> Result<Option<Connection<F::Sdk>>, ProtectorError>
where
    P: WalletProvider + ?Sized,
    F: SdkFactory + ?Sized,
{
    let accounts = provider.accounts().await?;
    match accounts.into_iter().find(|account| !account.is_empty()) {
        Some(address) => link_account(address, provider, factory).await.map(Some),
        None => Ok(None),
    }
}

/// Session state: connection lifecycle, owned records, last error
pub struct Session<S> {
    state: ConnectionState,
    records: Vec<ProtectedData>,
    sdk: Option<S>,
    last_error: Option<String>,
}

impl<S> Default for Session<S> {
    fn default() -> Self {
        Session::new()
    }
}

impl<S> Session<S> {
    pub fn new() -> Self {
        Session {
            state: ConnectionState::Disconnected,
            records: Vec::new(),
            sdk: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected { .. })
    }

    /// Connected address, if any
    pub fn address(&self) -> Option<&str> {
        match &self.state {
            ConnectionState::Connected { address } => Some(address),
            _ => None,
        }
    }

    /// Records owned by the connected address
    pub fn records(&self) -> &[ProtectedData] {
        &self.records
    }

    pub fn sdk(&self) -> Option<&S> {
        self.sdk.as_ref()
    }

    /// Message from the most recent failed connect, until cleared by a new
    /// attempt, a disconnect, or an account change
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enter the connecting state and clear any previous error
    pub fn begin_connect(&mut self) {
        self.state = ConnectionState::Connecting;
        self.last_error = None;
    }

    /// Commit a successful connect sequence
    pub fn complete_connect(&mut self, connection: Connection<S>) {
        self.state = ConnectionState::Connected {
            address: connection.address,
        };
        self.sdk = Some(connection.sdk);
        self.records = connection.records;
        self.last_error = None;
    }

    /// Record a failed connect and revert to disconnected
    pub fn fail_connect(&mut self, err: &ProtectorError) {
        self.state = ConnectionState::Disconnected;
        self.sdk = None;
        self.records.clear();
        self.last_error = Some(err.to_string());
    }

    /// Leave the connecting state without an error (no prior session found)
    pub fn cancel_connect(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Disconnected;
        }
    }

    /// Drop all session state
    pub fn disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.sdk = None;
        self.records.clear();
        self.last_error = None;
    }

    /// Replace the record list (after a refresh for the current address)
    pub fn set_records(&mut self, records: Vec<ProtectedData>) {
        self.records = records;
    }

    /// Apply an `accountsChanged` event from the provider
    ///
    /// Zero accounts drops the session; a different non-empty first account
    /// swaps the address and clears the now-stale record list, which the
    /// caller must refresh.
    pub fn apply_accounts_event(&mut self, accounts: &[String]) -> AccountsEvent {
        let current = match &self.state {
            ConnectionState::Connected { address } => address.clone(),
            _ => return AccountsEvent::Unchanged,
        };
        match accounts.first().filter(|account| !account.is_empty()) {
            None => {
                self.disconnect();
                AccountsEvent::Disconnected
            }
            Some(next) if !next.eq_ignore_ascii_case(&current) => {
                self.state = ConnectionState::Connected {
                    address: next.clone(),
                };
                self.records.clear();
                self.last_error = None;
                AccountsEvent::AddressChanged(next.clone())
            }
            Some(_) => AccountsEvent::Unchanged,
        }
    }
}

impl<S: DataProtector> Session<S> {
    /// Interactive connect against the capabilities
    ///
    /// Convenience for hosts that can hold the session across an await.
    pub async fn connect<P, F>(
        &mut self,
        provider: &P,
        factory: &F,
    ) -> Result<String, ProtectorError>
    where
        P: WalletProvider + ?Sized,
        F: SdkFactory<Sdk = S> + ?Sized,
    {
        self.begin_connect();
        match open_connection(provider, factory).await {
            Ok(connection) => {
                let address = connection.address.clone();
                self.complete_connect(connection);
                Ok(address)
            }
            Err(err) => {
                self.fail_connect(&err);
                Err(err)
            }
        }
    }

    /// Non-interactive session resumption; `Ok(None)` when there is no prior
    /// session
    pub async fn resume<P, F>(
        &mut self,
        provider: &P,
        factory: &F,
    ) -> Result<Option<String>, ProtectorError>
    where
        P: WalletProvider + ?Sized,
        F: SdkFactory<Sdk = S> + ?Sized,
    {
        self.begin_connect();
        match resume_connection(provider, factory).await {
            Ok(Some(connection)) => {
                let address = connection.address.clone();
                self.complete_connect(connection);
                Ok(Some(address))
            }
            Ok(None) => {
                self.cancel_connect();
                Ok(None)
            }
            Err(err) => {
                self.fail_connect(&err);
                Err(err)
            }
        }
    }

    /// Refresh the owned-records list from the SDK
    pub async fn refresh_records(&mut self) -> Result<(), ProtectorError> {
        let address = self
            .address()
            .ok_or_else(|| ProtectorError::State("No wallet connected".to_string()))?
            .to_string();
        let sdk = self
            .sdk
            .as_ref()
            .ok_or_else(|| ProtectorError::State("No wallet connected".to_string()))?;
        let records = fetch_owned(sdk, &address).await?;
        self.records = records;
        Ok(())
    }

    /// Submit a prepared draft through the SDK and refresh the records
    ///
    /// The caller keeps the draft on failure so the user can retry without
    /// re-selecting the file.
    pub async fn protect_draft(
        &mut self,
        draft: &UploadDraft,
    ) -> Result<ProtectedData, ProtectorError> {
        let record = {
            let sdk = self
                .sdk
                .as_ref()
                .ok_or_else(|| ProtectorError::State("No wallet connected".to_string()))?;
            sdk.protect(&draft.name, &draft.transformed).await?
        };
        self.refresh_records().await?;
        Ok(record)
    }

    /// Trigger the TEE analysis for a protected record
    pub async fn run_analysis(
        &self,
        protected_data: &str,
    ) -> Result<crate::analysis::AnalysisReport, ProtectorError> {
        let sdk = self
            .sdk
            .as_ref()
            .ok_or_else(|| ProtectorError::State("No wallet connected".to_string()))?;
        crate::analysis::run_analysis(sdk, protected_data).await
    }

    /// Label for a record selector entry: name plus shortened address
    pub fn dataset_label(record: &ProtectedData) -> String {
        format!("{} ({})", record.name, records::short_address(&record.address))
    }
}
