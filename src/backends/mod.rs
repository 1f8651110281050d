// ============================================================================
// File: packages/jobcomp/src/backends/mod.rs
// ----------------------------------------------------------------------------
// Backend contract and module organization for job completion logging.
//
// Provides a unified interface for pluggable completion backends:
// - JobCompBackend trait implemented by every backend
// - Name-keyed registry resolving the configured backend
// - Shared backend configuration
// - Bundled flat-file and log backends
// ============================================================================

mod config;
mod factory;
mod filetxt;
mod logger;
mod trait_def;

pub use config::JobCompConfig;
pub use factory::{BackendFactory, BackendRegistry};
pub use filetxt::FileTxtBackend;
pub use logger::LogBackend;
pub use trait_def::{JobCompBackend, JobCompEvent};
