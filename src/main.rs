use clap::Parser;
use hand_posture::app::{run_session, SessionOptions};
use hand_posture::utils::error::PostureError;
use hand_posture::utils::{logger, validation::Validate};
use hand_posture::CliConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting hand-posture CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 Session monitoring enabled");
    }

    let options = SessionOptions {
        changes_only: config.changes_only,
        monitor: config.monitor,
        stats_interval: config.stats_interval,
    };

    match run_session(&config, options).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Session finished: {} frames, {} matches, {} registrations",
                summary.frames,
                summary.matches,
                summary.registrations
            );
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: PostureError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}
