// ============================================================================
// File: packages/jobcomp/src/backends/trait_def.rs
// ----------------------------------------------------------------------------
// JobCompBackend trait definition
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::JobCompResult;
use crate::jobs::{JobCompRecord, JobCond, JobRecord};

/// Tag telling a backend which transition it is recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCompEvent {
    JobStart,
    JobFinish,
}

impl JobCompEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCompEvent::JobStart => "job_start",
            JobCompEvent::JobFinish => "job_finish",
        }
    }
}

impl fmt::Display for JobCompEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core job completion backend trait
///
/// All backends must implement this trait to be selectable by name. The
/// dispatch facade holds a single lock around every call, so methods take
/// `&mut self` and implementations need not be internally thread-safe.
/// Every call stalls job-event recording for the whole daemon while it
/// runs; implementations must bound their own latency.
pub trait JobCompBackend: Send + fmt::Debug {
    /// (Re)establish where records are written and read
    ///
    /// Called right after the backend is bound and again on demand (for
    /// example after log rotation). Must be safe to call repeatedly.
    fn set_location(&mut self) -> JobCompResult<()>;

    /// Persist a job start event
    ///
    /// # Arguments
    /// * `job` - Job snapshot, borrowed for the duration of the call only
    /// * `event` - Always `JobCompEvent::JobStart`
    fn record_job_start(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()>;

    /// Persist a job finish event
    ///
    /// # Arguments
    /// * `job` - Job snapshot, borrowed for the duration of the call only
    /// * `event` - Always `JobCompEvent::JobFinish`
    fn record_job_end(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()>;

    /// Execute a historical query
    ///
    /// # Returns
    /// Ordered records, owned by the caller
    fn get_jobs(&mut self, cond: &JobCond) -> JobCompResult<Vec<JobCompRecord>>;

    /// Get the backend type identifier
    fn backend_type(&self) -> &'static str;
}
