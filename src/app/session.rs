use crate::adapters::commands::{spawn_ctrl_c, spawn_stdin_commands};
use crate::adapters::{ConsolePresenter, JsonFileRepository, JsonLinesSource};
use crate::core::engine::RecognitionEngine;
use crate::core::library::PostureLibrary;
use crate::core::matcher::PostureMatcher;
use crate::core::ConfigProvider;
use crate::domain::model::SessionSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SessionMonitor;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub changes_only: bool,
    pub monitor: bool,
    pub stats_interval: u64,
}

/// Wire the file-backed adapters to the engine and run until the frame
/// stream ends or the user exits. Commands are read from stdin.
pub async fn run_session<C: ConfigProvider>(config: &C, options: SessionOptions) -> Result<SessionSummary> {
    let repository = JsonFileRepository::new(config.store_path());
    let library = PostureLibrary::open(repository).await?;

    let source = JsonLinesSource::open(config.frames_path())
        .await?
        .with_follow(config.follow(), Duration::from_millis(config.poll_interval_ms()));

    let presenter = if options.changes_only {
        ConsolePresenter::stdout().changes_only()
    } else {
        ConsolePresenter::stdout()
    };

    let matcher = PostureMatcher::new(config.matcher_config());
    tracing::debug!("Matcher config: {:?}", matcher.config());

    let mut engine = RecognitionEngine::new_with_monitoring(
        library,
        matcher,
        source,
        presenter,
        config.tracking(),
        SessionMonitor::new(options.monitor, options.stats_interval),
    );

    println!("👉 Type 's' + Enter to capture a posture, then type its name.");
    println!("👉 Recognition runs automatically.");
    println!("👉 Type 'q' + Enter (or Ctrl-C) to exit.\n");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    spawn_stdin_commands(tx.clone())?;
    let ctrl_c_task = spawn_ctrl_c(tx);

    let result = engine.run(&mut rx).await;

    ctrl_c_task.abort();
    result
}
