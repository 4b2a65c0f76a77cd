//! Harness configuration.
//!
//! The binary fills this from environment variables (see the `env` names on
//! each field); anything unset falls back to [`HarnessConfig::default`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::backend::bedrock::{BedrockConfig, DEFAULT_MODEL_ID};
use crate::error::{BenchError, Result};
use crate::report;

pub const DEFAULT_AWS_PROFILE: &str = "default";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_SAMPLE_DIR: &str = "sample-code";

/// Settings for one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Shared-credentials profile (`AWS_PROFILE`)
    pub aws_profile: String,
    /// Bedrock region (`AWS_REGION`)
    pub aws_region: String,
    /// Model or inference profile id (`PROMPTBENCH_MODEL`)
    pub model_id: String,
    /// Where the report is written (`PROMPTBENCH_RESULTS_DIR`)
    pub results_dir: PathBuf,
    /// Where file fixtures are read from (`PROMPTBENCH_SAMPLE_DIR`)
    pub sample_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            aws_profile: DEFAULT_AWS_PROFILE.to_string(),
            aws_region: DEFAULT_AWS_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            sample_dir: PathBuf::from(DEFAULT_SAMPLE_DIR),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.aws_region.chars().any(char::is_whitespace) {
            return Err(BenchError::Config(format!(
                "region {:?} contains whitespace",
                self.aws_region
            )));
        }
        if self.model_id.trim().is_empty() {
            return Err(BenchError::Config("model id must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn bedrock_config(&self) -> BedrockConfig {
        BedrockConfig::new(&self.aws_region, &self.model_id)
    }

    pub fn report_path(&self) -> PathBuf {
        report::report_path(&self.results_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.aws_profile, "default");
        assert_eq!(cfg.aws_region, "us-east-1");
        assert_eq!(cfg.model_id, DEFAULT_MODEL_ID);
        assert_eq!(
            cfg.report_path(),
            PathBuf::from("results/anthropic-bedrock-results.json")
        );
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn bedrock_config_follows_region_and_model() {
        let cfg = HarnessConfig {
            aws_region: "eu-central-1".to_string(),
            model_id: "anthropic.claude-3-haiku".to_string(),
            ..HarnessConfig::default()
        };
        let bedrock = cfg.bedrock_config();
        assert_eq!(bedrock.region, "eu-central-1");
        assert_eq!(bedrock.model_id, "anthropic.claude-3-haiku");
    }

    #[test]
    fn region_with_whitespace_is_rejected() {
        let cfg = HarnessConfig {
            aws_region: "us east".to_string(),
            ..HarnessConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn blank_model_is_rejected() {
        let cfg = HarnessConfig {
            model_id: "  ".to_string(),
            ..HarnessConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
