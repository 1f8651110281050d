// ============================================================================
// File: packages/jobcomp/src/jobs/mod.rs
// ----------------------------------------------------------------------------
// Job data model for completion logging:
// - JobRecord: the daemon's snapshot handed to backends on start/finish
// - JobCompRecord: text record returned by historical queries
// - JobCond: query filter interpreted by backends
// ============================================================================

mod cond;
mod job;
mod record;

pub use cond::JobCond;
pub use job::{BlockGeometry, JobRecord, JobState};
pub use record::{JobCompRecord, TIME_FORMAT, format_exit_code, format_time_limit};
