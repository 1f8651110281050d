// ============================================================================
// File: packages/jobcomp/src/context/global.rs
// ----------------------------------------------------------------------------
// Process-wide dispatch context
// ============================================================================

use std::sync::OnceLock;

use crate::backends::{BackendRegistry, JobCompConfig};
use crate::error::{JobCompError, JobCompResult};

use super::JobCompContext;

/// Global dispatch context
static GLOBAL_JOBCOMP: OnceLock<JobCompContext> = OnceLock::new();

/// Get the global dispatch context
///
/// If `init_global_jobcomp` was never called, this creates a context with
/// the bundled backends configured from `JOBCOMP_*` environment variables.
/// Malformed settings are logged and leave the context without a backend.
///
/// # Returns
/// Reference to the global context (still uninitialized until `init`)
pub fn global_jobcomp() -> &'static JobCompContext {
    GLOBAL_JOBCOMP.get_or_init(|| default_context(|key| std::env::var(key).ok()))
}

/// Install the global dispatch context
///
/// # Arguments
/// * `context` - Context built from the daemon's configuration
///
/// # Returns
/// The installed context, or an error if one was already installed
pub fn init_global_jobcomp(context: JobCompContext) -> JobCompResult<&'static JobCompContext> {
    GLOBAL_JOBCOMP
        .set(context)
        .map_err(|_| JobCompError::internal("Global jobcomp context already initialized"))?;
    Ok(global_jobcomp())
}

/// Build the lazily created global context from a settings lookup
pub(crate) fn default_context<F>(lookup: F) -> JobCompContext
where
    F: Fn(&str) -> Option<String>,
{
    JobCompContext::from_lookup(lookup).unwrap_or_else(|e| {
        log::error!("jobcomp: ignoring environment configuration: {e}");
        JobCompContext::new(BackendRegistry::with_builtin(), JobCompConfig::none())
    })
}
