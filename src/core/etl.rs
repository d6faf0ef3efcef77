use crate::core::report;
use crate::core::Pipeline;
use crate::utils::error::Result;
use std::io::Write;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 執行完整流程，文字報告寫到 stdout
    pub async fn run(&self) -> Result<String> {
        let mut stdout = std::io::stdout();
        self.run_with_report(&mut stdout).await
    }

    pub async fn run_with_report<W: Write + Send>(&self, out: &mut W) -> Result<String> {
        tracing::info!("🚀 Starting candidate gap analysis");

        // Extract
        tracing::info!("📥 Fetching candidate data...");
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", raw_data.len());

        // Transform
        tracing::info!("🔄 Processing candidates...");
        let result = self.pipeline.transform(raw_data).await?;

        // Report
        out.write_all(report::render_text(&result.candidates).as_bytes())?;
        out.flush()?;

        // Load
        tracing::info!("📤 Creating JSON output...");
        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("📁 JSON output saved to: {}", output_path);

        Ok(output_path)
    }
}
