pub mod catalog;
pub mod config;
pub mod csv;
pub mod db;
pub mod error;
pub mod host;
pub mod logger;
pub mod models;
pub mod preferences;
pub mod quiz;
pub mod session;
pub mod terminal;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use catalog::{Catalog, FlagAsset, FlagImage, RegionId};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use host::{MenuItem, Notice, Orientation, OrientationLock, Platform, ScreenHost, ScreenSize};
pub use models::{AppState, UiState};
pub use preferences::{PreferenceDefaults, PreferenceKey, PreferenceStore};
pub use quiz::{GuessOutcome, QuizSession, QuizState, Score};
pub use session::handle_input;
pub use terminal::{App, TerminalPlatform};
pub use ui::draw;
