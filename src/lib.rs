pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{etl::EtlEngine, gap_analyzer::GapAnalyzer, pipeline::CandidatePipeline};
pub use crate::domain::model::{Candidate, DatePolicy, Gap, HistoryEntry, Job, RawCandidate};
pub use crate::utils::error::{EtlError, Result};
