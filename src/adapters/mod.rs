// Adapters layer: concrete implementations of the domain ports (storage, landmark input, console output, commands).

pub mod commands;
pub mod console;
pub mod json_store;
pub mod jsonl_source;

pub use console::ConsolePresenter;
pub use json_store::JsonFileRepository;
pub use jsonl_source::JsonLinesSource;
