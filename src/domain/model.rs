use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 來源 API 回傳的單筆候選人原始資料，結構不做任何保證
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCandidate(pub Value);

impl RawCandidate {
    /// `contact_info.name.formatted_name`，空字串視為不存在
    pub fn formatted_name(&self) -> Option<&str> {
        non_empty_str(self.0.pointer("/contact_info/name/formatted_name"))
    }

    pub fn experience(&self) -> Vec<RawJob> {
        match self.0.get("experience") {
            Some(Value::Array(entries)) => entries.iter().map(RawJob::from_value).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Value> for RawCandidate {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// 單筆工作經歷的原始欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJob {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
}

impl RawJob {
    pub fn from_value(value: &Value) -> Self {
        // 日期保留空字串，交給日期解析判斷格式錯誤
        Self {
            title: non_empty_str(value.get("title")).map(str::to_string),
            start_date: value.get("start_date").and_then(Value::as_str).map(str::to_string),
            end_date: value.get("end_date").and_then(Value::as_str).map(str::to_string),
            location: non_empty_str(value.pointer("/location/short_display_address"))
                .map(str::to_string),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub gap_days: i64,
    pub after_position: String,
}

/// 歷程中的一筆工作，連同它之前的空窗期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub job: Job,
    pub preceding_gap: Option<Gap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub history: Vec<HistoryEntry>,
}

impl Candidate {
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.history.iter().map(|entry| &entry.job)
    }

    pub fn gaps(&self) -> impl Iterator<Item = &Gap> {
        self.history
            .iter()
            .filter_map(|entry| entry.preceding_gap.as_ref())
    }

    pub fn has_experience(&self) -> bool {
        !self.history.is_empty()
    }
}

/// 日期格式錯誤時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// 中止整個流程
    #[default]
    Fail,
    /// 只略過該筆工作經歷
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub candidates: Vec<Candidate>,
    pub skipped_candidates: usize,
    pub dropped_jobs: usize,
}
