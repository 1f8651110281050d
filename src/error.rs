// ============================================================================
// File: packages/jobcomp/src/error.rs
// ----------------------------------------------------------------------------
// Error types shared by the dispatch facade and every backend
// ============================================================================

use crate::backends::JobCompEvent;

/// Job completion error types
///
/// Configuration errors come from resolving the backend name; every other
/// variant is produced by a backend and handed to the caller unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobCompError {
    /// Configured backend name does not resolve to a registered backend
    #[error("cannot create jobcomp context for {name}: unknown backend (available: {available})")]
    UnknownBackend { name: String, available: String },

    /// A backend with this name is already registered
    #[error("jobcomp backend {name} is already registered")]
    DuplicateBackend { name: String },

    /// Backend rejected its configuration
    #[error("Invalid configuration for {backend}: {details}")]
    InvalidConfig { backend: String, details: String },

    /// Backend could not (re)establish its storage location
    #[error("Location setup failed for {backend}: {details}")]
    LocationSetup {
        backend: &'static str,
        details: String,
    },

    /// Backend failed to persist a start or finish event
    #[error("{backend} failed to record {event} for job {job_id}: {details}")]
    RecordFailed {
        backend: &'static str,
        event: JobCompEvent,
        job_id: u32,
        details: String,
    },

    /// Backend failed to execute a historical query
    #[error("Job query failed in {backend}: {details}")]
    QueryFailed {
        backend: &'static str,
        details: String,
    },

    /// Configuration source could not be read or parsed
    #[error("Invalid jobcomp configuration: {details}")]
    Config { details: String },

    /// Internal facade error
    #[error("Internal jobcomp error: {message}")]
    Internal { message: String },
}

impl JobCompError {
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn config<D: Into<String>>(details: D) -> Self {
        Self::Config {
            details: details.into(),
        }
    }

    pub fn location_setup<D: Into<String>>(backend: &'static str, details: D) -> Self {
        Self::LocationSetup {
            backend,
            details: details.into(),
        }
    }

    pub fn record_failed<D: Into<String>>(
        backend: &'static str,
        event: JobCompEvent,
        job_id: u32,
        details: D,
    ) -> Self {
        Self::RecordFailed {
            backend,
            event,
            job_id,
            details: details.into(),
        }
    }

    pub fn query_failed<D: Into<String>>(backend: &'static str, details: D) -> Self {
        Self::QueryFailed {
            backend,
            details: details.into(),
        }
    }

    /// True for failures caused by the operator's configuration rather than
    /// by a bound backend at runtime.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownBackend { .. } | Self::InvalidConfig { .. } | Self::Config { .. }
        )
    }
}

/// Result type for jobcomp operations
pub type JobCompResult<T> = Result<T, JobCompError>;
