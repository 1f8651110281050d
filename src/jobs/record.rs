// ============================================================================
// File: packages/jobcomp/src/jobs/record.rs
// ----------------------------------------------------------------------------
// Completion record returned by historical job queries
// ============================================================================

use serde::{Deserialize, Serialize};

use super::job::JobRecord;

/// Timestamp layout for every time field of a completion record
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Immutable snapshot of one job as of completion
///
/// Every field is independently optional. Records are owned by whoever
/// received them from a query; dropping a record (or the `Vec` holding it)
/// releases all of its text fields along with the record itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCompRecord {
    pub job_id: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub node_cnt: Option<u32>,
    pub proc_cnt: Option<u32>,

    pub partition: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub uid_name: Option<String>,
    pub gid_name: Option<String>,
    pub nodelist: Option<String>,
    pub jobname: Option<String>,
    pub state: Option<String>,
    pub timelimit: Option<String>,
    pub blockid: Option<String>,
    pub connection: Option<String>,
    pub reboot: Option<String>,
    pub rotate: Option<String>,
    pub geo: Option<String>,
    pub bg_start_point: Option<String>,
    pub work_dir: Option<String>,
    pub resv_name: Option<String>,
    pub tres_fmt_req_str: Option<String>,
    pub account: Option<String>,
    pub qos_name: Option<String>,
    pub wckey: Option<String>,
    pub cluster: Option<String>,
    pub submit_time: Option<String>,
    pub eligible_time: Option<String>,
    pub exit_code: Option<String>,
    pub derived_ec: Option<String>,
}

impl JobCompRecord {
    /// Render a job snapshot into its completion record form
    pub fn from_job(job: &JobRecord) -> Self {
        let time = |t: Option<chrono::DateTime<chrono::Utc>>| {
            t.map(|t| t.format(TIME_FORMAT).to_string())
        };
        let yes_no = |flag: bool| (if flag { "yes" } else { "no" }).to_string();
        let block = job.block.as_ref();

        Self {
            job_id: Some(job.job_id),
            uid: Some(job.user_id),
            gid: Some(job.group_id),
            node_cnt: Some(job.node_cnt),
            proc_cnt: Some(job.cpu_cnt),
            partition: job.partition.clone(),
            start_time: time(job.start_time),
            end_time: time(job.end_time),
            uid_name: job.user_name.clone(),
            gid_name: job.group_name.clone(),
            nodelist: job.nodes.clone(),
            jobname: job.name.clone(),
            state: Some(job.state.as_str().to_string()),
            timelimit: Some(format_time_limit(job.time_limit)),
            blockid: block.and_then(|b| b.block_id.clone()),
            connection: block.and_then(|b| b.connection.clone()),
            reboot: block.map(|b| yes_no(b.reboot)),
            rotate: block.map(|b| yes_no(b.rotate)),
            geo: block.and_then(|b| b.geometry.clone()),
            bg_start_point: block.and_then(|b| b.start_point.clone()),
            work_dir: job.work_dir.clone(),
            resv_name: job.resv_name.clone(),
            tres_fmt_req_str: job.tres_req_str.clone(),
            account: job.account.clone(),
            qos_name: job.qos_name.clone(),
            wckey: job.wckey.clone(),
            cluster: job.cluster.clone(),
            submit_time: time(job.submit_time),
            eligible_time: time(job.eligible_time),
            exit_code: Some(format_exit_code(job.exit_code)),
            derived_ec: Some(format_exit_code(job.derived_ec)),
        }
    }

    /// Named view of every text field, in declaration order
    pub fn fields(&self) -> [(&'static str, Option<&str>); 26] {
        [
            ("partition", self.partition.as_deref()),
            ("start_time", self.start_time.as_deref()),
            ("end_time", self.end_time.as_deref()),
            ("uid_name", self.uid_name.as_deref()),
            ("gid_name", self.gid_name.as_deref()),
            ("nodelist", self.nodelist.as_deref()),
            ("jobname", self.jobname.as_deref()),
            ("state", self.state.as_deref()),
            ("timelimit", self.timelimit.as_deref()),
            ("blockid", self.blockid.as_deref()),
            ("connection", self.connection.as_deref()),
            ("reboot", self.reboot.as_deref()),
            ("rotate", self.rotate.as_deref()),
            ("geo", self.geo.as_deref()),
            ("bg_start_point", self.bg_start_point.as_deref()),
            ("work_dir", self.work_dir.as_deref()),
            ("resv_name", self.resv_name.as_deref()),
            ("tres_fmt_req_str", self.tres_fmt_req_str.as_deref()),
            ("account", self.account.as_deref()),
            ("qos_name", self.qos_name.as_deref()),
            ("wckey", self.wckey.as_deref()),
            ("cluster", self.cluster.as_deref()),
            ("submit_time", self.submit_time.as_deref()),
            ("eligible_time", self.eligible_time.as_deref()),
            ("exit_code", self.exit_code.as_deref()),
            ("derived_ec", self.derived_ec.as_deref()),
        ]
    }

    fn text_fields_mut(&mut self) -> [&mut Option<String>; 26] {
        [
            &mut self.partition,
            &mut self.start_time,
            &mut self.end_time,
            &mut self.uid_name,
            &mut self.gid_name,
            &mut self.nodelist,
            &mut self.jobname,
            &mut self.state,
            &mut self.timelimit,
            &mut self.blockid,
            &mut self.connection,
            &mut self.reboot,
            &mut self.rotate,
            &mut self.geo,
            &mut self.bg_start_point,
            &mut self.work_dir,
            &mut self.resv_name,
            &mut self.tres_fmt_req_str,
            &mut self.account,
            &mut self.qos_name,
            &mut self.wckey,
            &mut self.cluster,
            &mut self.submit_time,
            &mut self.eligible_time,
            &mut self.exit_code,
            &mut self.derived_ec,
        ]
    }

    /// Number of text fields currently set
    pub fn set_field_count(&self) -> usize {
        self.fields().iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Release every owned text field
    ///
    /// Returns how many fields were set. Unset fields are skipped, so any
    /// subset is fine and calling it again releases nothing.
    pub fn release_fields(&mut self) -> usize {
        self.text_fields_mut()
            .into_iter()
            .filter_map(|field| field.take())
            .count()
    }
}

/// Format a time limit in minutes as `UNLIMITED`, `HH:MM:SS` or `D-HH:MM:SS`
pub fn format_time_limit(minutes: Option<u32>) -> String {
    let Some(minutes) = minutes else {
        return "UNLIMITED".to_string();
    };

    let days = minutes / (24 * 60);
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;

    if days > 0 {
        format!("{days}-{hours:02}:{mins:02}:00")
    } else {
        format!("{hours:02}:{mins:02}:00")
    }
}

/// Format a raw wait status as `exit:signal`
pub fn format_exit_code(status: u32) -> String {
    let signal = status & 0x7f;
    let code = if signal == 0 { (status >> 8) & 0xff } else { 0 };
    format!("{code}:{signal}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jobs::{BlockGeometry, JobState};

    fn sample_job() -> JobRecord {
        let start = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        JobRecord::new(42)
            .with_name("relax")
            .with_user(1000, "alice")
            .with_group(100, "physics")
            .with_partition("batch")
            .with_nodes("node[01-04]", 4, 128)
            .with_state(JobState::Completed)
            .with_time_limit(90)
            .with_start_time(start)
            .with_end_time(start + chrono::Duration::minutes(45))
            .with_exit_code(2 << 8, 9)
    }

    #[test]
    fn from_job_renders_text_fields() {
        let record = JobCompRecord::from_job(&sample_job());

        assert_eq!(record.job_id, Some(42));
        assert_eq!(record.uid_name.as_deref(), Some("alice"));
        assert_eq!(record.state.as_deref(), Some("COMPLETED"));
        assert_eq!(record.timelimit.as_deref(), Some("01:30:00"));
        assert_eq!(record.start_time.as_deref(), Some("2024-03-01T08:30:00"));
        assert_eq!(record.end_time.as_deref(), Some("2024-03-01T09:15:00"));
        assert_eq!(record.exit_code.as_deref(), Some("2:0"));
        assert_eq!(record.derived_ec.as_deref(), Some("0:9"));
        assert!(record.blockid.is_none());
        assert!(record.reboot.is_none());
    }

    #[test]
    fn from_job_includes_block_geometry() {
        let job = sample_job().with_block(BlockGeometry {
            block_id: Some("RMP0".to_string()),
            connection: Some("TORUS".to_string()),
            reboot: true,
            rotate: false,
            geometry: Some("2x2x2".to_string()),
            start_point: None,
        });
        let record = JobCompRecord::from_job(&job);

        assert_eq!(record.blockid.as_deref(), Some("RMP0"));
        assert_eq!(record.reboot.as_deref(), Some("yes"));
        assert_eq!(record.rotate.as_deref(), Some("no"));
        assert!(record.bg_start_point.is_none());
    }

    #[test]
    fn release_fields_tolerates_any_subset() {
        let mut empty = JobCompRecord::default();
        assert_eq!(empty.release_fields(), 0);

        let mut partial = JobCompRecord {
            partition: Some("debug".to_string()),
            cluster: Some("c1".to_string()),
            derived_ec: Some("0:0".to_string()),
            ..Default::default()
        };
        assert_eq!(partial.set_field_count(), 3);
        assert_eq!(partial.release_fields(), 3);
        assert_eq!(partial.set_field_count(), 0);
        assert_eq!(partial.release_fields(), 0);

        let mut full = JobCompRecord::from_job(&sample_job().with_block(BlockGeometry {
            block_id: Some("b".to_string()),
            connection: Some("MESH".to_string()),
            reboot: false,
            rotate: true,
            geometry: Some("1x1x1".to_string()),
            start_point: Some("000".to_string()),
        }));
        let set = full.set_field_count();
        assert_eq!(full.release_fields(), set);
        assert_eq!(full, JobCompRecord {
            job_id: Some(42),
            uid: Some(1000),
            gid: Some(100),
            node_cnt: Some(4),
            proc_cnt: Some(128),
            ..Default::default()
        });
    }

    #[test]
    fn time_limit_formatting() {
        assert_eq!(format_time_limit(None), "UNLIMITED");
        assert_eq!(format_time_limit(Some(0)), "00:00:00");
        assert_eq!(format_time_limit(Some(59)), "00:59:00");
        assert_eq!(format_time_limit(Some(24 * 60 + 61)), "1-01:01:00");
    }

    #[test]
    fn exit_code_formatting() {
        assert_eq!(format_exit_code(0), "0:0");
        assert_eq!(format_exit_code(1 << 8), "1:0");
        assert_eq!(format_exit_code(15), "0:15");
    }
}
