//! AWS credential resolution.
//!
//! The selected profile is authoritative: it is looked up in the shared
//! credentials file and the shared config file, and supplies either static
//! keys or a `credential_process` command. Environment keys are only used
//! for the implicit `default` profile when no file defines it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::{BenchError, Result};

const DEFAULT_PROFILE: &str = "default";

/// Profile keys naming sources that need an SSO or STS exchange.
const EXCHANGE_KEYS: &[&str] = &[
    "sso_session",
    "sso_start_url",
    "role_arn",
    "web_identity_token_file",
];

#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Output of a `credential_process` command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProcessCredentials {
    version: u32,
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    session_token: Option<String>,
}

type Section = HashMap<String, String>;

impl AwsCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    /// Resolve credentials for `profile` from the shared AWS files and the
    /// process environment.
    pub fn resolve(profile: &str) -> Result<Self> {
        let lookup = |name: &str| std::env::var(name).ok();
        let credentials_file =
            shared_file_path(&lookup, "AWS_SHARED_CREDENTIALS_FILE", "credentials");
        let config_file = shared_file_path(&lookup, "AWS_CONFIG_FILE", "config");
        Self::resolve_with(
            profile,
            lookup,
            credentials_file.as_deref(),
            config_file.as_deref(),
        )
    }

    /// Resolution with explicit inputs: `lookup` reads environment variables,
    /// the paths point at the shared credentials and config files.
    pub fn resolve_with<F>(
        profile: &str,
        lookup: F,
        credentials_file: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Credentials file keys override config file keys for the same profile.
        let mut merged: Option<Section> = None;
        for path in [config_file, credentials_file].into_iter().flatten() {
            let Some(content) = read_optional(path, profile)? else {
                continue;
            };
            if let Some(section) = profile_section(&content, profile) {
                debug!(path = %path.display(), profile, "Found AWS profile");
                merged.get_or_insert_with(Section::new).extend(section);
            }
        }

        if let Some(section) = merged {
            return Self::from_section(&section, profile);
        }

        if profile == DEFAULT_PROFILE {
            if let Some(creds) = Self::from_lookup(&lookup) {
                debug!("Using AWS credentials from environment");
                return Ok(creds);
            }
        }

        Err(BenchError::Credentials {
            profile: profile.to_string(),
            reason: "profile not present in the shared credentials or config file".to_string(),
        })
    }

    /// Build credentials from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` /
    /// `AWS_SESSION_TOKEN` as returned by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = lookup("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty())?;
        let secret_access_key = lookup("AWS_SECRET_ACCESS_KEY").filter(|v| !v.is_empty())?;
        let session_token = lookup("AWS_SESSION_TOKEN").filter(|v| !v.is_empty());
        Some(Self::new(access_key_id, secret_access_key, session_token))
    }

    /// Extract static keys for `profile` from INI-formatted credentials text.
    pub fn parse_profile(content: &str, profile: &str) -> Result<Self> {
        let section = profile_section(content, profile).ok_or_else(|| BenchError::Credentials {
            profile: profile.to_string(),
            reason: "profile not present in credentials file".to_string(),
        })?;
        Self::from_section(&section, profile)
    }

    fn from_section(section: &Section, profile: &str) -> Result<Self> {
        let missing = |reason: String| BenchError::Credentials {
            profile: profile.to_string(),
            reason,
        };

        if let Some(access_key_id) = section.get("aws_access_key_id") {
            let secret_access_key = section
                .get("aws_secret_access_key")
                .ok_or_else(|| missing("aws_secret_access_key missing".to_string()))?;
            return Ok(Self::new(
                access_key_id.clone(),
                secret_access_key.clone(),
                section.get("aws_session_token").cloned(),
            ));
        }

        if let Some(command) = section.get("credential_process") {
            return run_credential_process(command, profile);
        }

        if let Some(key) = EXCHANGE_KEYS.iter().find(|k| section.contains_key(**k)) {
            return Err(missing(format!(
                "`{key}` profiles are not supported directly; set credential_process = \
                 aws configure export-credentials --profile {profile} --format process"
            )));
        }

        Err(missing("aws_access_key_id missing".to_string()))
    }
}

fn shared_file_path<F>(lookup: &F, override_var: &str, file_name: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(override_var).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    lookup("HOME").map(|home| PathBuf::from(home).join(".aws").join(file_name))
}

/// Read `path`, treating a missing file as absent.
fn read_optional(path: &Path, profile: &str) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BenchError::Credentials {
            profile: profile.to_string(),
            reason: format!("cannot read {}: {e}", path.display()),
        }),
    }
}

/// Key/value pairs of the `[profile]` or `[profile <name>]` section.
fn profile_section(content: &str, profile: &str) -> Option<Section> {
    let mut in_section = false;
    let mut section: Option<Section> = None;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = header.trim();
            let name = name.strip_prefix("profile ").unwrap_or(name).trim();
            in_section = name == profile;
            if in_section {
                section.get_or_insert_with(Section::new);
            }
            continue;
        }
        if !in_section {
            continue;
        }
        if let (Some(map), Some((key, value))) = (section.as_mut(), line.split_once('=')) {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    section
}

fn run_credential_process(command: &str, profile: &str) -> Result<AwsCredentials> {
    let failed = |reason: String| BenchError::Credentials {
        profile: profile.to_string(),
        reason,
    };

    let argv = split_command(command);
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| failed("credential_process is empty".to_string()))?;

    debug!(program = %program, profile, "Running credential_process");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| failed(format!("failed to run credential_process: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failed(format!(
            "credential_process exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let parsed: ProcessCredentials = serde_json::from_slice(&output.stdout)
        .map_err(|e| failed(format!("credential_process output is not valid: {e}")))?;
    if parsed.version != 1 {
        return Err(failed(format!(
            "credential_process output version {} is not supported",
            parsed.version
        )));
    }

    Ok(AwsCredentials::new(
        parsed.access_key_id,
        parsed.secret_access_key,
        parsed.session_token.filter(|t| !t.is_empty()),
    ))
}

/// Split a command line on whitespace, honouring single and double quotes.
fn split_command(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut has_token = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                has_token = true;
            }
            None if c.is_whitespace() => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            None => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[default]
aws_access_key_id = AKIDDEFAULT
aws_secret_access_key = secretdefault

# benchmarking account
[bench]
aws_access_key_id=AKIDBENCH
aws_secret_access_key=secretbench
aws_session_token=tokenbench
region = eu-west-1
";

    fn stray_env_keys(name: &str) -> Option<String> {
        match name {
            "AWS_ACCESS_KEY_ID" => Some("AKIDOTHER".to_string()),
            "AWS_SECRET_ACCESS_KEY" => Some("secretother".to_string()),
            _ => None,
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write");
        path
    }

    #[test]
    fn parses_default_profile() {
        let creds = AwsCredentials::parse_profile(SAMPLE, "default").expect("default");
        assert_eq!(creds.access_key_id, "AKIDDEFAULT");
        assert_eq!(creds.secret_access_key, "secretdefault");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn parses_named_profile_with_token() {
        let creds = AwsCredentials::parse_profile(SAMPLE, "bench").expect("bench");
        assert_eq!(creds.access_key_id, "AKIDBENCH");
        assert_eq!(creds.session_token.as_deref(), Some("tokenbench"));
    }

    #[test]
    fn unknown_profile_is_error() {
        let err = AwsCredentials::parse_profile(SAMPLE, "prod").expect_err("missing");
        assert!(matches!(err, BenchError::Credentials { .. }));
    }

    #[test]
    fn incomplete_profile_is_error() {
        let err = AwsCredentials::parse_profile("[p]\naws_access_key_id = A\n", "p")
            .expect_err("incomplete");
        assert!(err.to_string().contains("aws_secret_access_key"));
    }

    #[test]
    fn named_profile_wins_over_environment_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let credentials = write(dir.path(), "credentials", SAMPLE);

        let creds =
            AwsCredentials::resolve_with("bench", stray_env_keys, Some(&credentials), None)
                .expect("bench");
        assert_eq!(creds.access_key_id, "AKIDBENCH");

        let creds =
            AwsCredentials::resolve_with("default", stray_env_keys, Some(&credentials), None)
                .expect("default");
        assert_eq!(creds.access_key_id, "AKIDDEFAULT");
    }

    #[test]
    fn missing_named_profile_does_not_fall_back_to_environment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let credentials = write(dir.path(), "credentials", SAMPLE);

        let err = AwsCredentials::resolve_with("prod", stray_env_keys, Some(&credentials), None)
            .expect_err("prod is not defined");
        assert!(matches!(err, BenchError::Credentials { ref profile, .. } if profile == "prod"));
    }

    #[test]
    fn undefined_default_profile_uses_environment_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absent = dir.path().join("credentials");

        let creds = AwsCredentials::resolve_with("default", stray_env_keys, Some(&absent), None)
            .expect("env");
        assert_eq!(creds.access_key_id, "AKIDOTHER");

        let err = AwsCredentials::resolve_with("default", no_env, Some(&absent), None)
            .expect_err("nothing configured");
        assert!(matches!(err, BenchError::Credentials { .. }));
    }

    #[test]
    fn config_file_profile_is_resolved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = write(
            dir.path(),
            "config",
            "[default]\nregion = us-east-1\n\n[profile cfg]\nregion = us-west-2\n\
             aws_access_key_id = AKIDCFG\naws_secret_access_key = secretcfg\n",
        );
        let absent = dir.path().join("credentials");

        let creds = AwsCredentials::resolve_with("cfg", no_env, Some(&absent), Some(&config))
            .expect("cfg");
        assert_eq!(creds.access_key_id, "AKIDCFG");
        assert_eq!(creds.secret_access_key, "secretcfg");
    }

    #[test]
    fn credentials_file_overrides_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = write(
            dir.path(),
            "config",
            "[profile bench]\naws_access_key_id = AKIDCFG\naws_secret_access_key = secretcfg\n",
        );
        let credentials = write(dir.path(), "credentials", SAMPLE);

        let creds =
            AwsCredentials::resolve_with("bench", no_env, Some(&credentials), Some(&config))
                .expect("bench");
        assert_eq!(creds.access_key_id, "AKIDBENCH");
    }

    #[cfg(unix)]
    #[test]
    fn credential_process_output_is_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = write(
            dir.path(),
            "process.json",
            r#"{"Version": 1, "AccessKeyId": "AKIDPROC", "SecretAccessKey": "secretproc",
               "SessionToken": "tokenproc", "Expiration": "2030-01-01T00:00:00Z"}"#,
        );
        let config = write(
            dir.path(),
            "config",
            &format!(
                "[profile sso-export]\ncredential_process = cat \"{}\"\n",
                output.display()
            ),
        );

        let creds = AwsCredentials::resolve_with("sso-export", no_env, None, Some(&config))
            .expect("process");
        assert_eq!(creds.access_key_id, "AKIDPROC");
        assert_eq!(creds.session_token.as_deref(), Some("tokenproc"));
    }

    #[test]
    fn sso_profile_reports_unsupported_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = write(
            dir.path(),
            "config",
            "[profile sso]\nsso_session = corp\nsso_account_id = 111122223333\n\n\
             [sso-session corp]\nsso_start_url = https://corp.awsapps.com/start\n",
        );

        let err = AwsCredentials::resolve_with("sso", stray_env_keys, None, Some(&config))
            .expect_err("sso");
        let msg = err.to_string();
        assert!(msg.contains("sso_session"), "{msg}");
        assert!(msg.contains("credential_process"), "{msg}");
    }

    #[test]
    fn command_splitting_honours_quotes() {
        assert_eq!(
            split_command(
                r#"aws configure export-credentials --profile "my prof" --format 'process'"#
            ),
            vec![
                "aws",
                "configure",
                "export-credentials",
                "--profile",
                "my prof",
                "--format",
                "process"
            ]
        );
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn lookup_requires_key_and_secret() {
        let mut env = HashMap::new();
        env.insert("AWS_ACCESS_KEY_ID", "AKID".to_string());
        assert!(AwsCredentials::from_lookup(|k| env.get(k).cloned()).is_none());

        env.insert("AWS_SECRET_ACCESS_KEY", "s3cr3t".to_string());
        let creds = AwsCredentials::from_lookup(|k| env.get(k).cloned()).expect("creds");
        assert_eq!(creds.access_key_id, "AKID");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = AwsCredentials::new("AKID", "s3cr3t", Some("tok".to_string()));
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("AKID"));
        assert!(!dbg.contains("s3cr3t"));
        assert!(!dbg.contains("\"tok\""));
    }
}
