//! promptbench core library
//!
//! Runs a fixed prompt battery against a model backend, one call at a time,
//! and records latency, token usage and cost for every call in a JSON report.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod fakes;
pub mod obs;
pub mod pricing;
pub mod report;
pub mod runner;
pub mod telemetry;
pub mod test_case;

pub use backend::{
    AwsCredentials, BedrockBackend, BedrockConfig, ContentBlock, MessageRequest,
    MessageRequestBuilder, MessageResponse, ModelBackend, ThinkingConfig, Usage,
};
pub use catalog::standard_catalog;
pub use config::HarnessConfig;
pub use engine::{execute, render_content, EngineSettings, ExecutionResult, ERROR_SENTINEL};
pub use error::{BackendError, BenchError, Result};
pub use pricing::{cost, Pricing};
pub use report::{load, persist, summarize, ResultLog, RunSummary};
pub use runner::{run_suite, RunObserver};
pub use telemetry::init_tracing;
pub use test_case::TestCase;

/// promptbench version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
