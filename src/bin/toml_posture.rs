use anyhow::Context;
use clap::Parser;
use hand_posture::app::{run_session, SessionOptions};
use hand_posture::config::toml_config::TomlConfig;
use hand_posture::core::ConfigProvider;
use hand_posture::utils::{logger, validation::Validate};
use hand_posture::{JsonFileRepository, PostureLibrary};

#[derive(Parser)]
#[command(name = "toml-posture")]
#[command(about = "Hand posture recognition with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "posture-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the posture store path from config
    #[arg(long)]
    store: Option<String>,

    /// Override the per-finger tolerance from config
    #[arg(long)]
    tolerance: Option<f64>,

    /// Show configuration and registered postures without reading frames
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based posture recognizer");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(store) = &args.store {
        config.store.path = store.clone();
        tracing::info!("🔧 Store path overridden to: {}", store);
    }
    if let Some(tolerance) = args.tolerance {
        config.matcher.tolerance_fraction = tolerance;
        tracing::info!("🔧 Tolerance overridden to: {}", tolerance);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No frames will be read");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 Session monitoring enabled");
    }

    let options = SessionOptions {
        changes_only: config.presentation.changes_only,
        monitor: monitor_enabled,
        stats_interval: config.monitoring.stats_interval_frames,
    };

    match run_session(&config, options).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Session finished: {} frames ({} skipped), {} matches, {} registrations",
                summary.frames,
                summary.skipped_frames,
                summary.matches,
                summary.registrations
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let matcher = config.matcher_config();
    let tracking = config.tracking();

    println!("📋 Configuration Summary:");
    println!("  Store: {}", config.store_path());
    println!(
        "  Frames: {}{}",
        config.frames_path(),
        if config.follow() { " (follow)" } else { "" }
    );
    println!(
        "  Matcher: tolerance {:.0}%, epsilon {:e}",
        matcher.tolerance_fraction * 100.0,
        matcher.epsilon
    );
    println!(
        "  Tracking: {} hand, up to {}, min confidence {:.2}",
        tracking.handedness, tracking.max_hands, tracking.min_detection_confidence
    );
    println!("  Monitoring: {}", config.monitoring_enabled());
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let repository = JsonFileRepository::new(config.store_path());
    let library = PostureLibrary::open(repository)
        .await
        .with_context(|| format!("loading posture store {}", config.store_path()))?;

    let store = library.store();
    println!("🖐️ Registered postures: {}", store.len());
    for (name, angles) in store.iter() {
        println!("  {}: {}", name, angles);
    }

    if !std::path::Path::new(config.frames_path()).exists() {
        println!("⚠️ Frame source {} does not exist yet", config.frames_path());
    }

    Ok(())
}
