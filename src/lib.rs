pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use errors::{AppError, StoreError, TrackerError, TrackerResult, ValidationError};
pub use models::{Activity, ActivityFilter, ActivityType, DailySummary, Goal, NewActivity};
pub use state::AppState;
pub use storage::{JsonFileStore, MemoryStore, Store, resolve_data_dir};
pub use tracker::Tracker;
