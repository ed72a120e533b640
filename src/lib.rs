pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsolePresenter, JsonFileRepository, JsonLinesSource};
pub use core::{engine::RecognitionEngine, library::PostureLibrary, matcher::PostureMatcher};
pub use utils::error::{PostureError, Result};
