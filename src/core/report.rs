use crate::domain::model::{Candidate, Gap, Job};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// 文字報告中使用的日期格式，與來源格式一致
pub const REPORT_DATE_FORMAT: &str = "%b/%d/%Y";

/// JSON 輸出中的單一候選人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub job_history: Vec<Job>,
    pub cv_gaps: Vec<Gap>,
}

impl From<&Candidate> for CandidateRecord {
    fn from(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.clone(),
            job_history: candidate.jobs().cloned().collect(),
            cv_gaps: candidate.gaps().cloned().collect(),
        }
    }
}

pub fn render_candidate(candidate: &Candidate) -> String {
    let mut out = String::new();
    // 寫入 String 不會失敗
    let _ = writeln!(out, "Hello {},", candidate.name);

    if !candidate.has_experience() {
        let _ = writeln!(out, "No job experience listed.");
    }

    for (index, entry) in candidate.history.iter().enumerate() {
        let job = &entry.job;
        let _ = writeln!(
            out,
            "Worked as: {}, From {} To {} in {}",
            job.role,
            job.start_date.format(REPORT_DATE_FORMAT),
            job.end_date.format(REPORT_DATE_FORMAT),
            job.location
        );

        // 空窗期掛在下一份工作上，印在它之前那份工作的後面
        let following_gap = candidate
            .history
            .get(index + 1)
            .and_then(|next| next.preceding_gap.as_ref());
        if let Some(gap) = following_gap {
            let _ = writeln!(out, "Gap in CV for {} days", gap.gap_days);
            out.push('\n');
        }
    }

    out.push('\n');
    out
}

pub fn render_text(candidates: &[Candidate]) -> String {
    candidates.iter().map(render_candidate).collect()
}

pub fn to_records(candidates: &[Candidate]) -> Vec<CandidateRecord> {
    candidates.iter().map(CandidateRecord::from).collect()
}

/// 以四格縮排輸出 JSON
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
