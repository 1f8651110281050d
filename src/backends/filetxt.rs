// ============================================================================
// File: packages/jobcomp/src/backends/filetxt.rs
// ----------------------------------------------------------------------------
// Flat-file completion backend: one JSON line per recorded event
// ============================================================================

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::backends::config::JobCompConfig;
use crate::backends::trait_def::{JobCompBackend, JobCompEvent};
use crate::error::{JobCompError, JobCompResult};
use crate::jobs::{JobCompRecord, JobCond, JobRecord};

#[derive(Debug, Serialize, Deserialize)]
struct LogLine {
    event: JobCompEvent,
    record: JobCompRecord,
}

/// Append-only text file backend
///
/// `set_location` reopens the file, so rotating the log and calling
/// `set_location` again starts a fresh file without restarting the daemon.
#[derive(Debug)]
pub struct FileTxtBackend {
    path: PathBuf,
    file: Option<File>,
}

impl FileTxtBackend {
    pub const NAME: &'static str = "filetxt";

    /// Create a flat-file backend from `job_comp_loc`
    ///
    /// The file is not opened until `set_location` runs.
    pub fn new(config: &JobCompConfig) -> JobCompResult<Self> {
        let path = config
            .job_comp_loc
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .ok_or_else(|| JobCompError::InvalidConfig {
                backend: Self::NAME.to_string(),
                details: "job_comp_loc must name the output file".to_string(),
            })?;

        Ok(Self {
            path: PathBuf::from(path),
            file: None,
        })
    }

    fn append(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()> {
        let failed = |details: String| JobCompError::record_failed(Self::NAME, event, job.job_id, details);

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| failed(format!("{} is not open", self.path.display())))?;

        let line = LogLine {
            event,
            record: JobCompRecord::from_job(job),
        };
        let mut encoded = serde_json::to_string(&line).map_err(|e| failed(e.to_string()))?;
        encoded.push('\n');

        file.write_all(encoded.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| failed(e.to_string()))
    }
}

impl JobCompBackend for FileTxtBackend {
    fn set_location(&mut self) -> JobCompResult<()> {
        // A failed reopen leaves no handle; records fail until it succeeds
        self.file = None;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                JobCompError::location_setup(Self::NAME, format!("{}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                JobCompError::location_setup(Self::NAME, format!("{}: {e}", self.path.display()))
            })?;

        log::debug!("jobcomp/filetxt writing to {}", self.path.display());
        self.file = Some(file);
        Ok(())
    }

    fn record_job_start(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()> {
        self.append(job, event)
    }

    fn record_job_end(&mut self, job: &JobRecord, event: JobCompEvent) -> JobCompResult<()> {
        self.append(job, event)
    }

    fn get_jobs(&mut self, cond: &JobCond) -> JobCompResult<Vec<JobCompRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(JobCompError::query_failed(
                    Self::NAME,
                    format!("{}: {e}", self.path.display()),
                ));
            }
        };

        let mut reader = BufReader::new(file);
        let mut raw = Vec::new();
        let mut jobs = Vec::new();
        let mut line_no = 0usize;

        loop {
            raw.clear();
            let read = reader
                .read_until(b'\n', &mut raw)
                .map_err(|e| JobCompError::query_failed(Self::NAME, e.to_string()))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line.trim(),
                Err(e) => {
                    log::warn!(
                        "jobcomp/filetxt skipping malformed line {line_no} of {}: {e}",
                        self.path.display()
                    );
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<LogLine>(line) {
                Ok(entry) if entry.event == JobCompEvent::JobFinish => {
                    if cond.matches(&entry.record) {
                        jobs.push(entry.record);
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!(
                    "jobcomp/filetxt skipping malformed line {line_no} of {}: {e}",
                    self.path.display()
                ),
            }
        }

        Ok(jobs)
    }

    fn backend_type(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobState;

    fn backend_in(dir: &tempfile::TempDir) -> FileTxtBackend {
        let loc = dir.path().join("spool").join("jobcomp.log");
        FileTxtBackend::new(&JobCompConfig::new("filetxt").with_location(loc.to_string_lossy()))
            .unwrap()
    }

    #[test]
    fn requires_location() {
        let err = FileTxtBackend::new(&JobCompConfig::new("filetxt")).unwrap_err();
        assert!(matches!(err, JobCompError::InvalidConfig { .. }));
    }

    #[test]
    fn record_before_set_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);

        let err = backend
            .record_job_end(&JobRecord::new(1), JobCompEvent::JobFinish)
            .unwrap_err();
        assert!(matches!(err, JobCompError::RecordFailed { job_id: 1, .. }));
    }

    #[test]
    fn get_jobs_returns_finished_jobs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);
        backend.set_location().unwrap();
        assert!(backend.get_jobs(&JobCond::new()).unwrap().is_empty());

        for id in 1..=3 {
            let job = JobRecord::new(id).with_user(1000 + id, format!("user{id}"));
            backend.record_job_start(&job, JobCompEvent::JobStart).unwrap();
            backend
                .record_job_end(&job.with_state(JobState::Completed), JobCompEvent::JobFinish)
                .unwrap();
        }

        let all = backend.get_jobs(&JobCond::new()).unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.job_id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(all.iter().all(|r| r.state.as_deref() == Some("COMPLETED")));

        let only_two = backend.get_jobs(&JobCond::new().with_user("user2")).unwrap();
        assert_eq!(only_two.len(), 1);
        assert_eq!(only_two[0].uid, Some(1002));
    }

    #[test]
    fn set_location_reopens_after_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);
        backend.set_location().unwrap();
        backend
            .record_job_end(&JobRecord::new(1), JobCompEvent::JobFinish)
            .unwrap();

        let path = dir.path().join("spool").join("jobcomp.log");
        fs::rename(&path, dir.path().join("jobcomp.log.1")).unwrap();
        backend.set_location().unwrap();
        backend
            .record_job_end(&JobRecord::new(2), JobCompEvent::JobFinish)
            .unwrap();

        let ids: Vec<_> = backend
            .get_jobs(&JobCond::new())
            .unwrap()
            .into_iter()
            .filter_map(|r| r.job_id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);
        backend.set_location().unwrap();
        backend
            .record_job_end(&JobRecord::new(7), JobCompEvent::JobFinish)
            .unwrap();

        let path = dir.path().join("spool").join("jobcomp.log");
        let mut raw = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(raw, "not json").unwrap();

        let jobs = backend.get_jobs(&JobCond::new()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, Some(7));
    }

    #[test]
    fn non_utf8_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);
        backend.set_location().unwrap();
        backend
            .record_job_end(&JobRecord::new(1), JobCompEvent::JobFinish)
            .unwrap();

        let path = dir.path().join("spool").join("jobcomp.log");
        let mut raw = OpenOptions::new().append(true).open(&path).unwrap();
        raw.write_all(b"\xff\xfe garbage\n").unwrap();
        drop(raw);

        backend
            .record_job_end(&JobRecord::new(2), JobCompEvent::JobFinish)
            .unwrap();

        let ids: Vec<_> = backend
            .get_jobs(&JobCond::new())
            .unwrap()
            .into_iter()
            .filter_map(|r| r.job_id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn failed_reopen_surfaces_on_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);
        backend.set_location().unwrap();
        backend
            .record_job_end(&JobRecord::new(1), JobCompEvent::JobFinish)
            .unwrap();

        // Rotate the log away and leave a directory where the file should be
        let path = dir.path().join("spool").join("jobcomp.log");
        fs::rename(&path, dir.path().join("jobcomp.log.1")).unwrap();
        fs::create_dir(&path).unwrap();

        let err = backend.set_location().unwrap_err();
        assert!(matches!(err, JobCompError::LocationSetup { .. }));

        for id in 2..=3 {
            let err = backend
                .record_job_end(&JobRecord::new(id), JobCompEvent::JobFinish)
                .unwrap_err();
            assert!(matches!(err, JobCompError::RecordFailed { job_id, .. } if job_id == id));
        }

        let rotated = fs::read_to_string(dir.path().join("jobcomp.log.1")).unwrap();
        assert_eq!(rotated.lines().count(), 1);
    }
}
