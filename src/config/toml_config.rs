use crate::core::ConfigProvider;
use crate::domain::model::DatePolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub on_invalid_date: DatePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    pub raw_dump_path: Option<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            raw_dump_path: None,
        }
    }
}

fn default_output_path() -> String {
    super::DEFAULT_OUTPUT_PATH.to_string()
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // 使用正規表達式匹配 ${VAR_NAME} 格式
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SOURCE_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("source.url", &self.source.url)?;

        if let Some(timeout) = self.source.timeout_seconds {
            crate::utils::validation::validate_positive_number(
                "source.timeout_seconds",
                timeout,
                1,
            )?;
        }

        crate::utils::validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(path) = &self.load.raw_dump_path {
            crate::utils::validation::validate_path("load.raw_dump_path", path)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn raw_dump_path(&self) -> Option<&str> {
        self.load.raw_dump_path.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn date_policy(&self) -> DatePolicy {
        self.analysis.on_invalid_date
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
