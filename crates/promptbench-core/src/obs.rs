//! Structured observability hooks for benchmark runs.
//!
//! This module provides:
//! - Run-scoped tracing spans via the `RunSpan` RAII guard
//! - Emission functions for run lifecycle events: start, per-case start and
//!   finish, report persisted, run finished
//!
//! Events go through `tracing` at `info!` (failures at `warn!`). Console
//! progress for humans is printed separately by the binary.

use std::path::Path;

use tracing::{info, warn};

use crate::engine::ExecutionResult;
use crate::report::RunSummary;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = RunSpan::enter("1b4e28ba-2fa1-11d2-883f-0016d3cca427");
/// // every event below carries run_id
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("promptbench.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: run started against a backend/model with `case_count` cases.
pub fn emit_run_started(run_id: &str, backend_label: &str, model_id: &str, case_count: usize) {
    info!(
        event = "run.started",
        run_id = %run_id,
        backend = %backend_label,
        model = %model_id,
        case_count = case_count,
    );
}

/// Emit event: a test case is about to be sent.
pub fn emit_case_started(test_name: &str, extended_reasoning: bool) {
    info!(
        event = "case.started",
        test_name = %test_name,
        extended_reasoning = extended_reasoning,
    );
}

/// Emit event: a test case finished, successfully or not.
pub fn emit_case_finished(result: &ExecutionResult) {
    match &result.error {
        None => info!(
            event = "case.finished",
            test_name = %result.test_name,
            success = true,
            duration_ms = result.duration_ms,
            tokens_in = result.tokens_in,
            tokens_out = result.tokens_out,
            cost = result.cost,
        ),
        Some(error) => warn!(
            event = "case.finished",
            test_name = %result.test_name,
            success = false,
            duration_ms = result.duration_ms,
            error = %error,
        ),
    }
}

/// Emit event: report artifact written.
pub fn emit_report_persisted(path: &Path, records: usize) {
    info!(event = "report.persisted", path = %path.display(), records = records);
}

/// Emit event: run finished with its totals.
pub fn emit_run_finished(run_id: &str, summary: &RunSummary) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        passed = summary.passed,
        total = summary.total,
        total_cost = summary.total_cost,
        total_tokens_in = summary.total_tokens_in,
        total_tokens_out = summary.total_tokens_out,
        total_duration_ms = summary.total_duration_ms,
    );
}
