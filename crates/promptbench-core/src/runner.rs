//! Sequential suite runner.
//!
//! Executes a catalog one case at a time against a single backend handle and
//! collects the results into a run-scoped [`ResultLog`].

use uuid::Uuid;

use crate::backend::ModelBackend;
use crate::engine::{execute, EngineSettings, ExecutionResult};
use crate::obs::{self, RunSpan};
use crate::report::ResultLog;
use crate::test_case::TestCase;

/// Callbacks fired around each case. Both default to no-ops.
pub trait RunObserver {
    fn case_started(&mut self, _index: usize, _case: &TestCase) {}
    fn case_finished(&mut self, _index: usize, _result: &ExecutionResult) {}
}

/// Observer that ignores every callback.
impl RunObserver for () {}

/// Run every case in `cases` in order, awaiting each backend call before
/// starting the next.
pub async fn run_suite(
    backend: &dyn ModelBackend,
    cases: &[TestCase],
    settings: &EngineSettings,
    observer: &mut dyn RunObserver,
) -> ResultLog {
    let run_id = Uuid::new_v4().to_string();
    let _span = RunSpan::enter(&run_id);
    obs::emit_run_started(&run_id, backend.label(), backend.model_id(), cases.len());

    let mut log = ResultLog::new();
    for (index, case) in cases.iter().enumerate() {
        obs::emit_case_started(case.name(), case.use_extended_reasoning());
        observer.case_started(index, case);

        let result = execute(backend, case, settings).await;

        observer.case_finished(index, &result);
        log.append(result);
    }

    obs::emit_run_finished(&run_id, &log.summarize());
    log
}
