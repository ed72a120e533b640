pub mod engine;
pub mod features;
pub mod library;
pub mod matcher;

pub use crate::domain::model::{AngleVector, Frame, MatchResult, PostureMatch};
pub use crate::domain::ports::{ConfigProvider, LandmarkSource, PostureRepository, Presenter};
pub use crate::utils::error::Result;
