// ============================================================================
// File: packages/jobcomp/src/backends/logger.rs
// ----------------------------------------------------------------------------
// Log sink backend: emits each event through the `log` facade
// ============================================================================

use crate::backends::config::JobCompConfig;
use crate::backends::trait_def::{JobCompBackend, JobCompEvent};
use crate::error::JobCompResult;
use crate::jobs::{JobCompRecord, JobCond, JobRecord};

/// Write-only backend forwarding completion events to the process logger
///
/// Useful when the daemon's log output already goes to syslog or journald.
/// It keeps no history, so queries always come back empty.
#[derive(Debug)]
pub struct LogBackend {
    target: String,
}

impl LogBackend {
    pub const NAME: &'static str = "log";

    pub fn new(config: &JobCompConfig) -> Self {
        let target = config
            .job_comp_params
            .get("target")
            .cloned()
            .unwrap_or_else(|| "jobcomp".to_string());
        Self { target }
    }

    fn emit(&self, job: &JobRecord, event: JobCompEvent) {
        let record = JobCompRecord::from_job(job);
        let fields = record
            .fields()
            .iter()
            .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
            .collect::<Vec<_>>()
            .join(" ");

        log::info!(target: self.target.as_str(), "{event} JobId={} {fields}", job.job_id);
    }
}

impl JobCompBackend for LogBackend {
    fn set_location(&mut self) -> JobCompResult<()> {
        Ok(())
    }

    fn record_job_start(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()> {
        self.emit(job, event);
        Ok(())
    }

    fn record_job_end(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()> {
        self.emit(job, event);
        Ok(())
    }

    fn get_jobs(&mut self, _cond: &JobCond) -> JobCompResult<Vec<JobCompRecord>> {
        Ok(Vec::new())
    }

    fn backend_type(&self) -> &'static str {
        Self::NAME
    }
}
