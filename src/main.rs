use clap::Parser;
use cv_gaps::core::ConfigProvider;
use cv_gaps::utils::{logger, validation::Validate};
use cv_gaps::{CandidatePipeline, CliConfig, EtlEngine, EtlError, LocalStorage, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting cv-gaps CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(config).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone()).await,
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Candidate analysis completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Candidate analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<String, EtlError> {
    // 驗證配置
    config.validate()?;
    tracing::debug!(
        "Source: {}, output: {}, date policy: {:?}",
        config.source_url(),
        config.output_path(),
        config.date_policy()
    );

    let pipeline = CandidatePipeline::new(LocalStorage::default(), config);
    EtlEngine::new(pipeline).run().await
}
