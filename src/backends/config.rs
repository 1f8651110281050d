// ============================================================================
// File: packages/jobcomp/src/backends/config.rs
// ----------------------------------------------------------------------------
// Configuration for job completion backends
// ============================================================================

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JobCompError, JobCompResult};

const BACKEND_PREFIX: &str = "jobcomp/";

/// Job completion configuration
///
/// `job_comp_type` names the backend to load; empty, unset or `none`
/// selects NOOP mode. The remaining options are passed through to the
/// backend factory untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCompConfig {
    /// Backend name, with or without the `jobcomp/` prefix
    pub job_comp_type: Option<String>,

    /// Backend location (file path, URL, index name...)
    pub job_comp_loc: Option<String>,

    pub job_comp_host: Option<String>,
    pub job_comp_port: Option<u16>,
    pub job_comp_user: Option<String>,

    /// Backend-specific parameters
    pub job_comp_params: HashMap<String, String>,
}

impl JobCompConfig {
    /// Create a configuration selecting the named backend
    pub fn new<T: Into<String>>(job_comp_type: T) -> Self {
        Self {
            job_comp_type: Some(job_comp_type.into()),
            ..Default::default()
        }
    }

    /// Configuration with no backend (NOOP mode)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_location<L: Into<String>>(mut self, loc: L) -> Self {
        self.job_comp_loc = Some(loc.into());
        self
    }

    pub fn with_host<H: Into<String>>(mut self, host: H) -> Self {
        self.job_comp_host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.job_comp_port = Some(port);
        self
    }

    pub fn with_user<U: Into<String>>(mut self, user: U) -> Self {
        self.job_comp_user = Some(user.into());
        self
    }

    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.job_comp_params.insert(key.into(), value.into());
        self
    }

    /// Normalized backend name, `None` when no backend is configured
    pub fn backend_name(&self) -> Option<&str> {
        normalize_backend_name(self.job_comp_type.as_deref()?)
    }

    /// Load configuration from `JOBCOMP_*` environment variables
    pub fn from_env() -> JobCompResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> JobCompResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let job_comp_port = match lookup("JOBCOMP_PORT") {
            Some(port) => Some(port.trim().parse::<u16>().map_err(|e| {
                JobCompError::config(format!("JOBCOMP_PORT '{port}' is not a valid port: {e}"))
            })?),
            None => None,
        };

        let job_comp_params = match lookup("JOBCOMP_PARAMS") {
            Some(params) => parse_params(&params)?,
            None => HashMap::new(),
        };

        Ok(Self {
            job_comp_type: lookup("JOBCOMP_TYPE"),
            job_comp_loc: lookup("JOBCOMP_LOC"),
            job_comp_host: lookup("JOBCOMP_HOST"),
            job_comp_port,
            job_comp_user: lookup("JOBCOMP_USER"),
            job_comp_params,
        })
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> JobCompResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JobCompError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| JobCompError::config(format!("failed to parse {}: {e}", path.display())))
    }
}

/// Trim a backend name and strip its `jobcomp/` prefix
///
/// `None` for names that select NOOP mode (empty or `none`).
pub(crate) fn normalize_backend_name(raw: &str) -> Option<&str> {
    let name = raw.trim();
    let name = name.strip_prefix(BACKEND_PREFIX).unwrap_or(name).trim();

    if name.is_empty() || name.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(name)
    }
}

/// Parse `key=value,key=value` parameter lists
fn parse_params(raw: &str) -> JobCompResult<HashMap<String, String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| {
                    JobCompError::config(format!("JOBCOMP_PARAMS entry '{pair}' is not key=value"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn backend_name_normalization() {
        assert_eq!(JobCompConfig::none().backend_name(), None);
        assert_eq!(JobCompConfig::new("").backend_name(), None);
        assert_eq!(JobCompConfig::new("none").backend_name(), None);
        assert_eq!(JobCompConfig::new("jobcomp/none").backend_name(), None);
        assert_eq!(JobCompConfig::new("filetxt").backend_name(), Some("filetxt"));
        assert_eq!(
            JobCompConfig::new(" jobcomp/filetxt ").backend_name(),
            Some("filetxt")
        );
    }

    #[test]
    fn config_builder() {
        let config = JobCompConfig::new("filetxt")
            .with_location("/var/log/jobcomp.log")
            .with_port(9200)
            .with_param("flush", "always");

        assert_eq!(config.job_comp_loc.as_deref(), Some("/var/log/jobcomp.log"));
        assert_eq!(config.job_comp_port, Some(9200));
        assert_eq!(
            config.job_comp_params.get("flush"),
            Some(&"always".to_string())
        );
    }

    #[test]
    fn from_lookup_reads_every_key() {
        let env: HashMap<&str, &str> = [
            ("JOBCOMP_TYPE", "jobcomp/filetxt"),
            ("JOBCOMP_LOC", "/tmp/jobcomp.log"),
            ("JOBCOMP_PORT", "6819"),
            ("JOBCOMP_PARAMS", "a=1, b = 2"),
        ]
        .into_iter()
        .collect();

        let config = JobCompConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.backend_name(), Some("filetxt"));
        assert_eq!(config.job_comp_loc.as_deref(), Some("/tmp/jobcomp.log"));
        assert_eq!(config.job_comp_port, Some(6819));
        assert_eq!(config.job_comp_params.len(), 2);
        assert_eq!(config.job_comp_params.get("b"), Some(&"2".to_string()));
        assert!(config.job_comp_host.is_none());
    }

    #[test]
    fn from_lookup_rejects_malformed_values() {
        let bad_port = JobCompConfig::from_lookup(|k| (k == "JOBCOMP_PORT").then(|| "x".into()));
        assert!(matches!(bad_port, Err(JobCompError::Config { .. })));

        let bad_params =
            JobCompConfig::from_lookup(|k| (k == "JOBCOMP_PARAMS").then(|| "novalue".into()));
        assert!(matches!(bad_params, Err(JobCompError::Config { .. })));
    }

    #[test]
    fn from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"job_comp_type": "log", "job_comp_params": {{"level": "debug"}}}}"#
        )
        .unwrap();

        let config = JobCompConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.backend_name(), Some("log"));
        assert!(config.job_comp_loc.is_none());
        assert_eq!(
            config.job_comp_params.get("level"),
            Some(&"debug".to_string())
        );
    }
}
