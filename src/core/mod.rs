pub mod etl;
pub mod gap_analyzer;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Candidate, RawCandidate, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
