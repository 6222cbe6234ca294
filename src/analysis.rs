//! TEE analysis task trigger
//!
//! Presentation scaffolding around a single SDK call: the task runs remotely
//! against a fixed workerpool/application pair, and the flow here only
//! tracks which screen the user is on. There is no polling, retry, or
//! timeout against the remote task, and the progress counter is synthetic.

use serde::{Deserialize, Serialize};

use crate::error::ProtectorError;
use crate::sdk::DataProtector;
use crate::types::ProcessRequest;

/// Workerpool that runs the analysis tasks
pub const WORKERPOOL: &str = "tdx-labs.pools.iexec.eth";

/// Address of the deployed analysis application
pub const ANALYSIS_APP: &str = "0x3bc6A1DC39dD2ceC9eF87a811A80982D68107345";

/// Process request against the fixed workerpool/application pair
pub fn analysis_request(protected_data: &str) -> ProcessRequest {
    ProcessRequest {
        protected_data: protected_data.to_string(),
        workerpool: WORKERPOOL.to_string(),
        app: ANALYSIS_APP.to_string(),
    }
}

/// Descriptive statistics shown with a completed analysis
///
/// Static display values, not telemetry from the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub processing_time: String,
    pub data_size: String,
    pub confidence: String,
}

impl Default for AnalysisStats {
    fn default() -> Self {
        AnalysisStats {
            processing_time: "5.2s".to_string(),
            data_size: "2.4MB".to_string(),
            confidence: "98.5%".to_string(),
        }
    }
}

/// Result surfaced to the user once the task has been ordered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub message: String,
    pub task_id: String,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn complete(task_id: String) -> Self {
        AnalysisReport {
            message: "TEE Analysis Complete!".to_string(),
            task_id,
            stats: AnalysisStats::default(),
        }
    }
}

/// Trigger the analysis task for a protected record
pub async fn run_analysis<S>(
    sdk: &S,
    protected_data: &str,
) -> Result<AnalysisReport, ProtectorError>
where
    S: DataProtector + ?Sized,
{
    if protected_data.is_empty() {
        return Err(ProtectorError::State(
            "Please select a dataset to analyze".to_string(),
        ));
    }
    let handle = sdk.process(&analysis_request(protected_data)).await?;
    Ok(AnalysisReport::complete(handle.task_id))
}

/// Screen of the analysis flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisStep {
    #[default]
    Select,
    Running,
    Complete,
}

/// UI-side state of the analysis flow: select, then running, then complete
///
/// The progress counter exists purely for feedback while the task order is
/// in flight; the host drives the tick interval and the counter clamps at
/// 100 regardless of what the remote task is doing.
#[derive(Debug, Clone, Default)]
pub struct AnalysisFlow {
    step: AnalysisStep,
    progress: u8,
    report: Option<AnalysisReport>,
}

impl AnalysisFlow {
    pub fn new() -> Self {
        AnalysisFlow::default()
    }

    pub fn step(&self) -> AnalysisStep {
        self.step
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Enter the running screen and restart the progress counter
    pub fn start(&mut self) {
        self.step = AnalysisStep::Running;
        self.progress = 0;
        self.report = None;
    }

    /// Advance the synthetic progress counter one tick, clamped at 100
    pub fn tick(&mut self) -> u8 {
        if self.progress < 100 {
            self.progress += 1;
        }
        self.progress
    }

    /// Record the completed task and enter the complete screen
    pub fn complete(&mut self, report: AnalysisReport) {
        self.step = AnalysisStep::Complete;
        self.report = Some(report);
    }

    /// Return to the selection screen after a failed task order
    pub fn fail(&mut self) {
        self.step = AnalysisStep::Select;
    }

    /// Reset for another analysis
    pub fn reset(&mut self) {
        *self = AnalysisFlow::default();
    }
}
