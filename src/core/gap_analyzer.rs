use crate::domain::model::{Candidate, DatePolicy, Gap, HistoryEntry, Job, RawCandidate, RawJob};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

/// 來源資料的日期格式，例如 `Jan/15/2020`
pub const SOURCE_DATE_FORMAT: &str = "%b/%d/%Y";

/// 嚴格解析：前後不得有空白，年份必須剛好四位數
pub fn parse_source_date(value: &str) -> Option<NaiveDate> {
    if value.trim() != value {
        return None;
    }

    // chrono 的 %Y 接受任意位數，"Jan/15/20" 會被當成西元 20 年
    let (_, year) = value.rsplit_once('/')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(value, SOURCE_DATE_FORMAT).ok()
}

/// 把候選人的原始經歷整理成依開始日期排序的工作歷程，並找出空窗期
///
/// 純計算，不做任何 I/O 或日誌。
#[derive(Debug, Clone, Copy, Default)]
pub struct GapAnalyzer {
    date_policy: DatePolicy,
}

impl GapAnalyzer {
    pub fn new(date_policy: DatePolicy) -> Self {
        Self { date_policy }
    }

    /// 沒有姓名的候選人回傳 `Ok(None)`
    pub fn analyze(&self, raw: &RawCandidate) -> Result<Option<Candidate>> {
        let Some(name) = raw.formatted_name() else {
            return Ok(None);
        };

        let mut jobs = Vec::new();
        for entry in raw.experience() {
            if let Some(job) = self.normalize_job(name, entry)? {
                jobs.push(job);
            }
        }

        Ok(Some(build_history(name, jobs)))
    }

    fn normalize_job(&self, candidate: &str, entry: RawJob) -> Result<Option<Job>> {
        // 先解析日期：格式錯誤優先於欄位缺漏
        let start_date = self.parse_date(candidate, entry.start_date.as_deref())?;
        let end_date = self.parse_date(candidate, entry.end_date.as_deref())?;

        match (entry.title, start_date, end_date, entry.location) {
            (Some(role), Some(start_date), Some(end_date), Some(location)) => Ok(Some(Job {
                role,
                start_date,
                end_date,
                location,
            })),
            _ => Ok(None),
        }
    }

    fn parse_date(&self, candidate: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
        let Some(value) = value else {
            return Ok(None);
        };

        match parse_source_date(value) {
            Some(date) => Ok(Some(date)),
            None => match self.date_policy {
                DatePolicy::Fail => Err(EtlError::DateFormatError {
                    candidate: candidate.to_string(),
                    value: value.to_string(),
                    expected: SOURCE_DATE_FORMAT.to_string(),
                }),
                DatePolicy::Skip => Ok(None),
            },
        }
    }
}

/// 依開始日期穩定排序，並把空窗期掛在它之後的那份工作上
pub fn build_history(name: &str, mut jobs: Vec<Job>) -> Candidate {
    jobs.sort_by_key(|job| job.start_date);

    let mut history: Vec<HistoryEntry> = Vec::with_capacity(jobs.len());
    for job in jobs {
        // 只比較上一份已接受工作的結束日，不取歷史最大值
        let preceding_gap = history.last().and_then(|prev| {
            (job.start_date > prev.job.end_date).then(|| Gap {
                gap_days: (job.start_date - prev.job.end_date).num_days(),
                after_position: prev.job.role.clone(),
            })
        });
        history.push(HistoryEntry { job, preceding_gap });
    }

    Candidate {
        name: name.to_string(),
        history,
    }
}
