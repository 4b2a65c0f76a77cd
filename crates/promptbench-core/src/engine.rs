//! Execution engine: one test case, one backend call, one result.
//!
//! The engine is the only place a backend fault is turned into a failed
//! [`ExecutionResult`]. Whatever the backend returns, the caller always gets
//! a result back and the run carries on.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::backend::{ContentBlock, MessageRequest, MessageResponse, ModelBackend};
use crate::obs;
use crate::pricing::Pricing;
use crate::test_case::TestCase;

/// System instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful coding assistant. Be concise and precise.";

/// Output token ceiling for every request.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Reasoning token budget when extended reasoning is requested.
pub const THINKING_BUDGET_TOKENS: u32 = 4096;

/// Prefix marking a failed call's `response_text`.
pub const ERROR_SENTINEL: &str = "ERROR: ";

pub const THINKING_OPEN: &str = "[THINKING]";
pub const THINKING_CLOSE: &str = "[/THINKING]";

/// Outcome of one test case, in the shape persisted to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub test_name: String,
    pub backend_label: String,
    pub model_id: String,
    pub prompt: String,
    pub response_text: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub cost: f64,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Status label for console and summaries.
    pub fn status_label(&self) -> &'static str {
        if self.success {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

/// Fixed request parameters applied to every case.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub thinking_budget: u32,
    pub pricing: Pricing,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: MAX_OUTPUT_TOKENS,
            thinking_budget: THINKING_BUDGET_TOKENS,
            pricing: Pricing::default(),
        }
    }
}

impl EngineSettings {
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Build the backend request for `case`.
    pub fn request_for(&self, case: &TestCase) -> MessageRequest {
        MessageRequest::builder(case.prompt())
            .system(self.system_prompt.as_str())
            .max_tokens(self.max_tokens)
            .thinking_opt(
                case.use_extended_reasoning()
                    .then_some(self.thinking_budget),
            )
            .build()
    }
}

/// What a backend call produced, after containment.
#[derive(Debug, Clone, PartialEq)]
enum CallOutcome {
    Completed {
        response_text: String,
        tokens_in: u64,
        tokens_out: u64,
    },
    Failed {
        message: String,
    },
}

impl CallOutcome {
    fn from_response(response: MessageResponse) -> Self {
        CallOutcome::Completed {
            response_text: render_content(&response.content),
            tokens_in: response.usage.input_tokens,
            tokens_out: response.usage.output_tokens,
        }
    }
}

/// Flatten response blocks into the stored transcript.
///
/// Text is appended as-is; reasoning is wrapped in thinking markers so the
/// transcript keeps it apart from the answer. Other block kinds are dropped.
pub fn render_content(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            ContentBlock::Text { text } => out.push_str(text),
            ContentBlock::Thinking { thinking, .. } => {
                out.push_str(THINKING_OPEN);
                out.push('\n');
                out.push_str(thinking);
                out.push('\n');
                out.push_str(THINKING_CLOSE);
                out.push('\n');
            }
            ContentBlock::RedactedThinking { .. } | ContentBlock::Unsupported => {}
        }
    }
    out
}

/// Run `case` once against `backend`.
///
/// Never fails: backend errors come back as a result with `success = false`.
/// No retries are attempted.
pub async fn execute(
    backend: &dyn ModelBackend,
    case: &TestCase,
    settings: &EngineSettings,
) -> ExecutionResult {
    let start = Instant::now();
    let request = settings.request_for(case);

    let outcome = match backend.invoke(&request).await {
        Ok(response) => CallOutcome::from_response(response),
        Err(err) => CallOutcome::Failed {
            message: err.to_string(),
        },
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    let result = match outcome {
        CallOutcome::Completed {
            response_text,
            tokens_in,
            tokens_out,
        } => ExecutionResult {
            test_name: case.name().to_string(),
            backend_label: backend.label().to_string(),
            model_id: backend.model_id().to_string(),
            prompt: case.prompt().to_string(),
            response_text,
            tokens_in,
            tokens_out,
            cost: settings.pricing.cost(tokens_in, tokens_out),
            duration_ms,
            success: true,
            error: None,
        },
        CallOutcome::Failed { message } => {
            let message = if message.is_empty() {
                "unknown backend error".to_string()
            } else {
                message
            };
            ExecutionResult {
                test_name: case.name().to_string(),
                backend_label: backend.label().to_string(),
                model_id: backend.model_id().to_string(),
                prompt: case.prompt().to_string(),
                response_text: format!("{ERROR_SENTINEL}{message}"),
                tokens_in: 0,
                tokens_out: 0,
                cost: 0.0,
                duration_ms,
                success: false,
                error: Some(message),
            }
        }
    };

    obs::emit_case_finished(&result);
    result
}
