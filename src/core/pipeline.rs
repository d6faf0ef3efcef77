use crate::core::gap_analyzer::GapAnalyzer;
use crate::core::report;
use crate::core::{ConfigProvider, Pipeline, RawCandidate, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub struct CandidatePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> CandidatePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    /// 把原始回應存一份，方便事後比對來源資料
    async fn dump_raw_payload(&self, payload: &Value) -> Result<()> {
        if let Some(path) = self.config.raw_dump_path() {
            let data = report::to_json_pretty(payload)?;
            tracing::debug!("Writing raw payload ({} bytes) to {}", data.len(), path);
            self.storage.write_file(path, &data).await?;
            tracing::info!("💾 Raw payload saved to: {}", path);
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CandidatePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawCandidate>> {
        let url = self.config.source_url();
        let mut request = self.client.get(url);

        // 設定超時
        if let Some(timeout) = self.config.timeout_seconds() {
            request = request.timeout(Duration::from_secs(timeout));
        }

        tracing::debug!("📡 Making API request to: {}", url);
        let response = request.send().await?;
        tracing::debug!("📡 API response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("❌ API request failed with status: {}", status);
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;
        self.dump_raw_payload(&payload).await?;

        match payload {
            Value::Array(items) => {
                tracing::info!("📡 Fetched {} candidate records", items.len());
                Ok(items.into_iter().map(RawCandidate::from).collect())
            }
            other => Err(EtlError::UnexpectedPayloadError {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    async fn transform(&self, data: Vec<RawCandidate>) -> Result<TransformResult> {
        let analyzer = GapAnalyzer::new(self.config.date_policy());
        let mut result = TransformResult::default();

        for (index, raw) in data.iter().enumerate() {
            let Some(candidate) = analyzer.analyze(raw)? else {
                tracing::debug!("⏭️ Record {}: no formatted name, skipped", index);
                result.skipped_candidates += 1;
                continue;
            };

            let raw_jobs = raw.experience().len();
            let dropped = raw_jobs - candidate.history.len();
            if dropped > 0 {
                tracing::debug!(
                    "⏭️ {}: dropped {} of {} job entries",
                    candidate.name,
                    dropped,
                    raw_jobs
                );
            }
            result.dropped_jobs += dropped;

            for job in candidate.jobs().filter(|job| job.start_date > job.end_date) {
                tracing::warn!(
                    "⚠️ {}: '{}' starts after it ends ({} > {})",
                    candidate.name,
                    job.role,
                    job.start_date,
                    job.end_date
                );
            }

            tracing::debug!(
                "🔄 {}: {} jobs, {} gaps",
                candidate.name,
                candidate.history.len(),
                candidate.gaps().count()
            );
            result.candidates.push(candidate);
        }

        tracing::info!(
            "🔄 Analyzed {} candidates ({} skipped without a name, {} job entries dropped)",
            result.candidates.len(),
            result.skipped_candidates,
            result.dropped_jobs
        );
        Ok(result)
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let output_path = self.config.output_path();
        let records = report::to_records(&result.candidates);
        let data = report::to_json_pretty(&records)?;

        tracing::debug!("Writing JSON output ({} bytes) to storage", data.len());
        self.storage.write_file(output_path, &data).await?;

        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DatePolicy;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        source_url: String,
        output_path: String,
        raw_dump_path: Option<String>,
        date_policy: DatePolicy,
    }

    impl MockConfig {
        fn new(source_url: String) -> Self {
            Self {
                source_url,
                output_path: "Final_Output.json".to_string(),
                raw_dump_path: None,
                date_policy: DatePolicy::Fail,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source_url(&self) -> &str {
            &self.source_url
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn raw_dump_path(&self) -> Option<&str> {
            self.raw_dump_path.as_deref()
        }

        fn timeout_seconds(&self) -> Option<u64> {
            Some(5)
        }

        fn date_policy(&self) -> DatePolicy {
            self.date_policy
        }
    }

    fn sample_payload() -> serde_json::Value {
        serde_json::json!([
            {
                "contact_info": {"name": {"formatted_name": "Jane Doe"}},
                "experience": [
                    {"title": "Engineer", "start_date": "Jan/01/2019", "end_date": "Dec/31/2019",
                     "location": {"short_display_address": "NY"}},
                    {"title": "Manager", "start_date": "Mar/01/2020", "end_date": "Jan/01/2021",
                     "location": {"short_display_address": "SF"}}
                ]
            },
            {
                "contact_info": {"name": {}},
                "experience": []
            }
        ])
    }

    #[tokio::test]
    async fn test_extract_successful_api_response() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/candidates.json");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(sample_payload());
            })
            .await;

        let storage = MockStorage::new();
        let config = MockConfig::new(server.url("/candidates.json"));
        let pipeline = CandidatePipeline::new(storage, config);

        let result = pipeline.extract().await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].formatted_name(), Some("Jane Doe"));
        assert_eq!(result[1].formatted_name(), None);
    }

    #[tokio::test]
    async fn test_extract_non_success_status_is_transport_error() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/candidates.json");
                then.status(500);
            })
            .await;

        let pipeline = CandidatePipeline::new(
            MockStorage::new(),
            MockConfig::new(server.url("/candidates.json")),
        );

        let err = pipeline.extract().await.unwrap_err();

        api_mock.assert_async().await;
        match err {
            EtlError::HttpStatusError { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_invalid_json_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/candidates.json");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let pipeline = CandidatePipeline::new(
            MockStorage::new(),
            MockConfig::new(server.url("/candidates.json")),
        );

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_extract_single_object_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/candidates.json");
                then.status(200)
                    .json_body(serde_json::json!({"contact_info": {}}));
            })
            .await;

        let pipeline = CandidatePipeline::new(
            MockStorage::new(),
            MockConfig::new(server.url("/candidates.json")),
        );

        let err = pipeline.extract().await.unwrap_err();

        match err {
            EtlError::UnexpectedPayloadError { found } => assert_eq!(found, "object"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_writes_raw_dump_when_configured() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/candidates.json");
                then.status(200).json_body(sample_payload());
            })
            .await;

        let storage = MockStorage::new();
        let mut config = MockConfig::new(server.url("/candidates.json"));
        config.raw_dump_path = Some("fetched_data.json".to_string());
        let pipeline = CandidatePipeline::new(storage.clone(), config);

        pipeline.extract().await.unwrap();

        let dump = storage.get_file("fetched_data.json").await.unwrap();
        let reparsed: serde_json::Value = serde_json::from_slice(&dump).unwrap();
        assert_eq!(reparsed, sample_payload());
        assert!(storage.get_file("Final_Output.json").await.is_none());
    }

    #[tokio::test]
    async fn test_transform_counts_skipped_records() {
        let pipeline = CandidatePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://test.com".to_string()),
        );
        let mut data: Vec<RawCandidate> = match sample_payload() {
            serde_json::Value::Array(items) => items.into_iter().map(RawCandidate::from).collect(),
            _ => unreachable!(),
        };
        data.push(RawCandidate::from(serde_json::json!({
            "contact_info": {"name": {"formatted_name": "Sam"}},
            "experience": [
                {"title": "No Location", "start_date": "Jan/01/2020", "end_date": "Feb/01/2020"}
            ]
        })));

        let result = pipeline.transform(data).await.unwrap();

        assert_eq!(result.candidates.len(), 2);
        assert_eq!(result.skipped_candidates, 1);
        assert_eq!(result.dropped_jobs, 1);
        assert_eq!(result.candidates[0].name, "Jane Doe");
        assert!(!result.candidates[1].has_experience());
    }

    #[tokio::test]
    async fn test_transform_propagates_date_format_error() {
        let pipeline = CandidatePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://test.com".to_string()),
        );
        let data = vec![RawCandidate::from(serde_json::json!({
            "contact_info": {"name": {"formatted_name": "Sam"}},
            "experience": [
                {"title": "A", "start_date": "2020/01/01", "end_date": "Feb/01/2020",
                 "location": {"short_display_address": "NY"}}
            ]
        }))];

        let err = pipeline.transform(data).await.unwrap_err();

        assert!(matches!(err, EtlError::DateFormatError { .. }));
    }

    #[tokio::test]
    async fn test_transform_skip_policy_drops_bad_dates() {
        let mut config = MockConfig::new("http://test.com".to_string());
        config.date_policy = DatePolicy::Skip;
        let pipeline = CandidatePipeline::new(MockStorage::new(), config);
        let data = vec![RawCandidate::from(serde_json::json!({
            "contact_info": {"name": {"formatted_name": "Sam"}},
            "experience": [
                {"title": "A", "start_date": "2020/01/01", "end_date": "Feb/01/2020",
                 "location": {"short_display_address": "NY"}}
            ]
        }))];

        let result = pipeline.transform(data).await.unwrap();

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.dropped_jobs, 1);
    }

    #[tokio::test]
    async fn test_load_writes_candidate_json() {
        let storage = MockStorage::new();
        let pipeline = CandidatePipeline::new(
            storage.clone(),
            MockConfig::new("http://test.com".to_string()),
        );
        let data: Vec<RawCandidate> = match sample_payload() {
            serde_json::Value::Array(items) => items.into_iter().map(RawCandidate::from).collect(),
            _ => unreachable!(),
        };
        let result = pipeline.transform(data).await.unwrap();

        let output_path = pipeline.load(&result).await.unwrap();

        assert_eq!(output_path, "Final_Output.json");
        let written = storage.read_file("Final_Output.json").await.unwrap();
        let records: Vec<report::CandidateRecord> = serde_json::from_slice(&written).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Jane Doe");
        assert_eq!(records[0].cv_gaps.len(), 1);
        assert_eq!(records[0].cv_gaps[0].after_position, "Engineer");
    }

    #[tokio::test]
    async fn test_load_with_no_candidates_writes_empty_array() {
        let storage = MockStorage::new();
        let pipeline = CandidatePipeline::new(
            storage.clone(),
            MockConfig::new("http://test.com".to_string()),
        );

        pipeline.load(&TransformResult::default()).await.unwrap();

        let written = storage.get_file("Final_Output.json").await.unwrap();
        assert_eq!(written, b"[]");
    }
}
