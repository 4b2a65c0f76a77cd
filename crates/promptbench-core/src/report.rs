//! Result aggregation and the persisted report.
//!
//! A [`ResultLog`] collects results for one run in invocation order.
//! [`RunSummary`] is derived from it on demand; the JSON artifact written by
//! [`persist`] is the only durable output of a run.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::ExecutionResult;

/// Default report file name inside the results directory.
pub const REPORT_FILE_NAME: &str = "anthropic-bedrock-results.json";

/// Ordered, append-only list of results for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultLog {
    results: Vec<ExecutionResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result. Duplicate test names are kept as separate entries.
    pub fn append(&mut self, result: ExecutionResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summarize(&self) -> RunSummary {
        summarize(&self.results)
    }

    pub fn persist(&self, destination: &Path) -> Result<()> {
        persist(&self.results, destination)
    }
}

impl From<Vec<ExecutionResult>> for ResultLog {
    fn from(results: Vec<ExecutionResult>) -> Self {
        Self { results }
    }
}

/// Run-level totals derived from a result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_cost: f64,
    pub total_tokens_in: u64,
    pub total_tokens_out: u64,
    pub total_duration_ms: u64,
    pub passed: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Pass ratio as `passed/total`, e.g. `9/10`.
    pub fn pass_ratio(&self) -> String {
        format!("{}/{}", self.passed, self.total)
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, ${:.4}, {} in / {} out tokens, {}ms",
            self.pass_ratio(),
            self.total_cost,
            self.total_tokens_in,
            self.total_tokens_out,
            self.total_duration_ms
        )
    }
}

/// Compute run totals in a single pass.
pub fn summarize(results: &[ExecutionResult]) -> RunSummary {
    results
        .iter()
        .fold(RunSummary::default(), |mut acc, r| {
            acc.total_cost += r.cost;
            acc.total_tokens_in += r.tokens_in;
            acc.total_tokens_out += r.tokens_out;
            acc.total_duration_ms += r.duration_ms;
            if r.success {
                acc.passed += 1;
            }
            acc.total += 1;
            acc
        })
}

/// Report path inside `results_dir`.
pub fn report_path(results_dir: &Path) -> PathBuf {
    results_dir.join(REPORT_FILE_NAME)
}

/// Write `results` as a pretty JSON array to `destination`.
///
/// Missing parent directories are created. An existing file is replaced.
pub fn persist(results: &[ExecutionResult], destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create results directory {:?}", parent))?;
    }
    let content = serde_json::to_string_pretty(results).context("serialize results")?;
    std::fs::write(destination, content).with_context(|| format!("write {:?}", destination))?;
    Ok(())
}

/// Read a report written by [`persist`].
pub fn load(path: &Path) -> Result<Vec<ExecutionResult>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parse {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(name: &str, success: bool, tokens_in: u64, tokens_out: u64) -> ExecutionResult {
        ExecutionResult {
            test_name: name.to_string(),
            backend_label: "fake".to_string(),
            model_id: "fake-model".to_string(),
            prompt: "p".to_string(),
            response_text: if success {
                "ok".to_string()
            } else {
                "ERROR: boom".to_string()
            },
            tokens_in,
            tokens_out,
            cost: if success { 0.5 } else { 0.0 },
            duration_ms: 10,
            success,
            error: (!success).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn summarize_empty_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary, RunSummary::default());
        assert_eq!(summary.pass_ratio(), "0/0");
        assert_eq!(summary.failed(), 0);
    }

    #[test]
    fn summarize_sums_every_field() {
        let summary = summarize(&[
            result("a", true, 100, 50),
            result("b", false, 0, 0),
            result("c", true, 20, 30),
        ]);
        assert_eq!(summary.total_tokens_in, 120);
        assert_eq!(summary.total_tokens_out, 80);
        assert_eq!(summary.total_duration_ms, 30);
        assert!((summary.total_cost - 1.0).abs() < 1e-12);
        assert_eq!(summary.pass_ratio(), "2/3");
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn append_keeps_duplicates_in_order() {
        let mut log = ResultLog::new();
        log.append(result("same", true, 1, 1));
        log.append(result("same", false, 0, 0));
        assert_eq!(log.len(), 2);
        assert!(log.results()[0].success);
        assert!(!log.results()[1].success);
    }

    #[test]
    fn artifact_has_all_fields_with_null_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.json");
        persist(&[result("a", true, 1, 2)], &path).expect("persist");

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        let obj = raw[0].as_object().expect("object");
        for key in [
            "test_name",
            "backend_label",
            "model_id",
            "prompt",
            "response_text",
            "tokens_in",
            "tokens_out",
            "cost",
            "duration_ms",
            "success",
            "error",
        ] {
            assert!(obj.contains_key(key), "missing key: {}", key);
        }
        assert_eq!(raw[0]["error"], json!(null));
    }

    #[test]
    fn persist_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = report_path(&dir.path().join("nested").join("results"));
        persist(&[], &path).expect("persist");
        assert!(path.exists());
        assert_eq!(load(&path).expect("load"), Vec::<ExecutionResult>::new());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").expect("write");
        assert!(load(&path).is_err());
    }

    #[test]
    fn summary_display_is_compact() {
        let summary = summarize(&[result("a", true, 100, 50)]);
        assert_eq!(
            summary.to_string(),
            "1/1 passed, $0.5000, 100 in / 50 out tokens, 10ms"
        );
    }
}
