pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::DatePolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_URL: &str =
    "https://hs-recruiting-test-resume-data.s3.amazonaws.com/allcands-full-api_hub_b1f6-acde48001122.json";
pub const DEFAULT_OUTPUT_PATH: &str = "Final_Output.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cv-gaps")]
#[command(about = "Fetch candidate resumes and report their job history and CV gaps")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Save the fetched payload to this file before analysis
    #[arg(long)]
    pub raw_dump_path: Option<String>,

    /// Request timeout; waits indefinitely when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum, default_value_t = DatePolicy::Fail)]
    pub on_invalid_date: DatePolicy,

    /// Path to TOML configuration file, replaces the source/output flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
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
        self.timeout_seconds
    }

    fn date_policy(&self) -> DatePolicy {
        self.on_invalid_date
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source_url", &self.source_url)?;
        validation::validate_path("output_path", &self.output_path)?;

        if let Some(path) = &self.raw_dump_path {
            validation::validate_path("raw_dump_path", path)?;
        }

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }
}
