//! ============================================================================
//! File: packages/jobcomp/src/lib.rs
//! ----------------------------------------------------------------------------
//! Job completion event recording for a cluster workload manager daemon.
//!
//! The daemon reports every job start and job finish through a single
//! dispatch facade; the facade forwards each event to whichever backend the
//! operator configured (flat file, log sink, external store, ...):
//! - `backends`: the backend contract, registry and bundled backends
//! - `jobs`: job snapshots, completion records and query filters
//! - `context`: lifecycle state machine and lock-guarded dispatch
//! ============================================================================

pub mod backends;
pub mod context;
pub mod error;
pub mod jobs;

pub use backends::{
    BackendFactory, BackendRegistry, FileTxtBackend, JobCompBackend, JobCompConfig, JobCompEvent,
    LogBackend,
};
pub use context::{
    JobCompContext, JobCompHandle, LifecycleState, global_jobcomp, init_global_jobcomp,
};
pub use error::{JobCompError, JobCompResult};
pub use jobs::{BlockGeometry, JobCompRecord, JobCond, JobRecord, JobState};
