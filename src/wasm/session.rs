//! WASM bindings for the wallet session
//!
//! Facade wiring the injected provider and the host-supplied SDK
//! constructor to the core session controller, plus the upload draft and
//! the analysis flow the page drives. Async entry points return a
//! `js_sys::Promise`; session state lives in an `Rc<RefCell<_>>` and is
//! only borrowed between awaits, never across them.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::console;

use crate::analysis::{self, AnalysisFlow, AnalysisStep};
use crate::error::ProtectorError;
use crate::provider::{AccountsSubscription, WalletProvider};
use crate::records::fetch_owned;
use crate::sdk::DataProtector;
use crate::session::{
    open_connection, resume_connection, AccountsEvent, ConnectionState, Session,
};
use crate::upload::UploadDraft;
use crate::wasm::provider::InjectedProvider;
use crate::wasm::sdk::{JsDataProtector, JsSdkFactory};
use crate::wasm::try_into_js_value::to_js_value;

type SharedSession = Rc<RefCell<Session<JsDataProtector>>>;

/// WASM-exposed session facade
///
/// Construct with the injected provider object and an SDK constructor
/// callback `(provider) => sdkInstance` (sync or async). The
/// `accountsChanged` listener is registered on construction and detached by
/// [`dispose`](Self::dispose).
#[wasm_bindgen]
pub struct WasmSession {
    provider: InjectedProvider,
    factory: JsSdkFactory,
    session: SharedSession,
    draft: Rc<RefCell<Option<UploadDraft>>>,
    analysis: Rc<RefCell<AnalysisFlow>>,
    subscription: Option<AccountsSubscription>,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new(provider: JsValue, make_sdk: Function) -> Result<WasmSession, JsValue> {
        let injected = InjectedProvider::new(provider.clone())?;
        let factory = JsSdkFactory::new(make_sdk, provider);
        let session: SharedSession = Rc::new(RefCell::new(Session::new()));
        let subscription = subscribe(&injected, &session);
        Ok(WasmSession {
            provider: injected,
            factory,
            session,
            draft: Rc::new(RefCell::new(None)),
            analysis: Rc::new(RefCell::new(AnalysisFlow::new())),
            subscription: Some(subscription),
        })
    }

    /// Connect the wallet: request accounts, ensure the target chain, build
    /// the SDK handle, and load the owned records. Resolves to the address.
    #[wasm_bindgen]
    pub fn connect(&self) -> Promise {
        let provider = self.provider.clone();
        let factory = self.factory.clone();
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            start_connecting(&session)?;
            match open_connection(&provider, &factory).await {
                Ok(connection) => {
                    let address = connection.address.clone();
                    session.borrow_mut().complete_connect(connection);
                    console::info_1(&JsValue::from_str("wallet connected"));
                    Ok(JsValue::from_str(&address))
                }
                Err(err) => {
                    console::warn_1(&JsValue::from_str(&err.to_string()));
                    session.borrow_mut().fail_connect(&err);
                    Err(err.into())
                }
            }
        })
    }

    /// Detect a prior session without prompting (`eth_accounts`). Resolves
    /// to the address, or null when there is none.
    #[wasm_bindgen]
    pub fn resume(&self) -> Promise {
        let provider = self.provider.clone();
        let factory = self.factory.clone();
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            start_connecting(&session)?;
            match resume_connection(&provider, &factory).await {
                Ok(Some(connection)) => {
                    let address = connection.address.clone();
                    session.borrow_mut().complete_connect(connection);
                    console::info_1(&JsValue::from_str("wallet session resumed"));
                    Ok(JsValue::from_str(&address))
                }
                Ok(None) => {
                    session.borrow_mut().cancel_connect();
                    Ok(JsValue::NULL)
                }
                Err(err) => {
                    console::warn_1(&JsValue::from_str(&err.to_string()));
                    session.borrow_mut().fail_connect(&err);
                    Err(err.into())
                }
            }
        })
    }

    /// Drop the session state (the wallet itself has no disconnect RPC)
    #[wasm_bindgen]
    pub fn disconnect(&self) {
        self.session.borrow_mut().disconnect();
        self.draft.borrow_mut().take();
        self.analysis.borrow_mut().reset();
    }

    /// Detach the provider event listener. Call on page teardown.
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.session.borrow().state() {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected { .. } => "connected",
        }
        .to_string()
    }

    #[wasm_bindgen(getter, js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_connected()
    }

    #[wasm_bindgen(getter)]
    pub fn address(&self) -> Option<String> {
        self.session.borrow().address().map(str::to_string)
    }

    /// Message from the most recent failed connect, if any
    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.session.borrow().last_error().map(str::to_string)
    }

    /// Records owned by the connected address
    #[wasm_bindgen]
    pub fn records(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.session.borrow().records())?)
    }

    /// Refetch the owned-records list from the SDK. Resolves to the list.
    #[wasm_bindgen(js_name = refreshRecords)]
    pub fn refresh_records(&self) -> Promise {
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            let (sdk, address) = connected_handles(&session)?;
            let records = match fetch_owned(&sdk, &address).await {
                Ok(records) => records,
                Err(err) => {
                    console::warn_1(&JsValue::from_str(&err.to_string()));
                    return Err(err.into());
                }
            };
            let js = to_js_value(&records)?;
            commit_records(&session, &address, records);
            Ok(js)
        })
    }

    /// Build the upload draft from a selected file: screen, parse,
    /// validate, normalize. Returns the preview
    /// `{name, original, transformed}` and keeps the draft for submission.
    #[wasm_bindgen(js_name = prepareUpload)]
    pub fn prepare_upload(&self, file_name: String, content: String) -> Result<JsValue, JsValue> {
        let draft = UploadDraft::prepare(&file_name, &content)?;
        let preview = to_js_value(&draft)?;
        *self.draft.borrow_mut() = Some(draft);
        Ok(preview)
    }

    /// Discard the prepared draft
    #[wasm_bindgen(js_name = clearUpload)]
    pub fn clear_upload(&self) {
        self.draft.borrow_mut().take();
    }

    #[wasm_bindgen(getter, js_name = hasDraft)]
    pub fn has_draft(&self) -> bool {
        self.draft.borrow().is_some()
    }

    /// Protect the prepared draft. On success the draft is cleared and the
    /// records list refreshed; on failure the draft is retained so the user
    /// can retry without re-selecting the file. Resolves to the new record.
    #[wasm_bindgen(js_name = protectUpload)]
    pub fn protect_upload(&self) -> Promise {
        let session = Rc::clone(&self.session);
        let draft_slot = Rc::clone(&self.draft);
        future_to_promise(async move {
            let draft = draft_slot
                .borrow()
                .clone()
                .ok_or_else(|| ProtectorError::State("No file selected".to_string()))?;
            let (sdk, address) = connected_handles(&session)?;

            let record = match sdk.protect(&draft.name, &draft.transformed).await {
                Ok(record) => record,
                Err(err) => {
                    console::warn_1(&JsValue::from_str(&err.to_string()));
                    return Err(err.into());
                }
            };
            draft_slot.borrow_mut().take();

            match fetch_owned(&sdk, &address).await {
                Ok(records) => commit_records(&session, &address, records),
                Err(err) => console::warn_1(&JsValue::from_str(&err.to_string())),
            }
            Ok(to_js_value(&record)?)
        })
    }

    /// Order the TEE analysis task for a protected record. Resolves to the
    /// report `{message, taskId, stats}`.
    #[wasm_bindgen(js_name = startAnalysis)]
    pub fn start_analysis(&self, protected_data: String) -> Promise {
        let session = Rc::clone(&self.session);
        let flow = Rc::clone(&self.analysis);
        future_to_promise(async move {
            let (sdk, _) = connected_handles(&session)?;
            flow.borrow_mut().start();
            match analysis::run_analysis(&sdk, &protected_data).await {
                Ok(report) => {
                    let js = to_js_value(&report)?;
                    flow.borrow_mut().complete(report);
                    Ok(js)
                }
                Err(err) => {
                    flow.borrow_mut().fail();
                    console::warn_1(&JsValue::from_str(&err.to_string()));
                    Err(err.into())
                }
            }
        })
    }

    /// Current analysis screen: "select", "running", or "complete"
    #[wasm_bindgen(getter, js_name = analysisStep)]
    pub fn analysis_step(&self) -> String {
        match self.analysis.borrow().step() {
            AnalysisStep::Select => "select",
            AnalysisStep::Running => "running",
            AnalysisStep::Complete => "complete",
        }
        .to_string()
    }

    #[wasm_bindgen(getter, js_name = analysisProgress)]
    pub fn analysis_progress(&self) -> u8 {
        self.analysis.borrow().progress()
    }

    /// Advance the synthetic progress indicator one tick (the page drives
    /// the interval). Returns the new percentage, clamped at 100.
    #[wasm_bindgen(js_name = tickProgress)]
    pub fn tick_progress(&self) -> u8 {
        self.analysis.borrow_mut().tick()
    }

    /// Report from the last completed analysis, or null
    #[wasm_bindgen(js_name = analysisReport)]
    pub fn analysis_report(&self) -> Result<JsValue, JsValue> {
        match self.analysis.borrow().report() {
            Some(report) => Ok(to_js_value(report)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Return the analysis flow to the selection screen
    #[wasm_bindgen(js_name = resetAnalysis)]
    pub fn reset_analysis(&self) {
        self.analysis.borrow_mut().reset();
    }
}

/// Flip the session into the connecting state, rejecting overlap
fn start_connecting(session: &SharedSession) -> Result<(), JsValue> {
    let mut state = session.borrow_mut();
    if state.state() == &ConnectionState::Connecting {
        return Err(ProtectorError::State("Connection already in progress".to_string()).into());
    }
    state.begin_connect();
    Ok(())
}

/// Clone the SDK handle and address out of a connected session
fn connected_handles(session: &SharedSession) -> Result<(JsDataProtector, String), JsValue> {
    let state = session.borrow();
    match (state.sdk().cloned(), state.address()) {
        (Some(sdk), Some(address)) => Ok((sdk, address.to_string())),
        _ => Err(ProtectorError::State("No wallet connected".to_string()).into()),
    }
}

/// Store a refreshed record list, unless the address changed mid-flight
fn commit_records(session: &SharedSession, address: &str, records: Vec<crate::types::ProtectedData>) {
    let mut state = session.borrow_mut();
    if state
        .address()
        .map(|current| current.eq_ignore_ascii_case(address))
        .unwrap_or(false)
    {
        state.set_records(records);
    }
}

/// Register the `accountsChanged` listener driving the session transitions
fn subscribe(provider: &InjectedProvider, session: &SharedSession) -> AccountsSubscription {
    let session = Rc::clone(session);
    provider.on_accounts_changed(Box::new(move |accounts| {
        let outcome = session.borrow_mut().apply_accounts_event(&accounts);
        match outcome {
            AccountsEvent::Disconnected => {
                console::info_1(&JsValue::from_str("wallet disconnected"));
            }
            AccountsEvent::AddressChanged(address) => {
                let session = Rc::clone(&session);
                spawn_local(async move {
                    let sdk = session.borrow().sdk().cloned();
                    let Some(sdk) = sdk else { return };
                    match fetch_owned(&sdk, &address).await {
                        Ok(records) => commit_records(&session, &address, records),
                        Err(err) => console::warn_1(&JsValue::from_str(&err.to_string())),
                    }
                });
            }
            AccountsEvent::Unchanged => {}
        }
    }))
}
