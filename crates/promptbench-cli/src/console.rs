//! Human-readable console output.

use promptbench_core::{ExecutionResult, RunObserver, RunSummary, TestCase};

const RULE_WIDTH: usize = 60;
const SUBRULE_WIDTH: usize = 40;
const PREVIEW_CHARS: usize = 200;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn subrule() -> String {
    "-".repeat(SUBRULE_WIDTH)
}

/// First `PREVIEW_CHARS` characters of `text`, on a char boundary.
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn print_banner(backend_label: &str, model_id: &str) {
    println!("{}", rule());
    println!("promptbench - {backend_label}");
    println!("Model: {model_id}");
    println!("{}", rule());
}

/// Prints per-case progress as the suite runs.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl RunObserver for ConsoleProgress {
    fn case_started(&mut self, _index: usize, case: &TestCase) {
        println!("\n[TEST] {}", case.name());
        println!("{}", subrule());
    }

    fn case_finished(&mut self, _index: usize, result: &ExecutionResult) {
        println!("Duration: {}ms", result.duration_ms);
        println!("Tokens: {} in / {} out", result.tokens_in, result.tokens_out);
        println!("Cost: ${:.4}", result.cost);
        println!("Response preview: {}...", preview(&result.response_text));
    }
}

pub fn render_summary(
    backend_label: &str,
    results: &[ExecutionResult],
    summary: &RunSummary,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", rule()));
    out.push_str(&format!("SUMMARY - {backend_label}\n"));
    out.push_str(&format!("{}\n", rule()));

    for r in results {
        out.push_str(&format!("\n{}:\n", r.test_name));
        out.push_str(&format!("  Status: {}\n", r.status_label()));
        if let Some(error) = &r.error {
            out.push_str(&format!("  Error: {error}\n"));
        }
        out.push_str(&format!("  Duration: {}ms\n", r.duration_ms));
        out.push_str(&format!("  Tokens: {} / {}\n", r.tokens_in, r.tokens_out));
        out.push_str(&format!("  Cost: ${:.4}\n", r.cost));
    }

    out.push_str(&format!("\n{}\n", subrule()));
    out.push_str(&format!("Total Cost: ${:.4}\n", summary.total_cost));
    out.push_str(&format!(
        "Total Tokens: {} in / {} out\n",
        summary.total_tokens_in, summary.total_tokens_out
    ));
    out.push_str(&format!("Total Duration: {}ms\n", summary.total_duration_ms));
    out.push_str(&format!("Tests Passed: {}\n", summary.pass_ratio()));
    out
}
