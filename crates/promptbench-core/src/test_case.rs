//! Test case definition.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// One named benchmark scenario.
///
/// Fields are private so a case cannot change after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    name: String,
    prompt: String,
    #[serde(default)]
    use_extended_reasoning: bool,
}

impl TestCase {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            use_extended_reasoning: false,
        }
    }

    /// Request the backend's extended reasoning mode for this case.
    pub fn with_extended_reasoning(mut self) -> Self {
        self.use_extended_reasoning = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn use_extended_reasoning(&self) -> bool {
        self.use_extended_reasoning
    }
}

/// Read a fixture file from `dir`.
///
/// Fixtures are loaded while the catalog is built, before any backend call,
/// so a missing file is a harness error rather than a failed case.
pub fn read_fixture(dir: &Path, file_name: &str) -> Result<String> {
    let path = dir.join(file_name);
    std::fs::read_to_string(&path).map_err(|source| BenchError::Fixture { path, source })
}
