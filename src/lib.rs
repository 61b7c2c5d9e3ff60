//! # Pricecast TUI
//!
//! A terminal client for a price prediction service.
//!
//! ## Features
//! - Single prediction from a form of required select fields
//! - Batch prediction by uploading a CSV and saving `predictions.csv`
//! - File selection by path picker or terminal drag-and-drop
//! - Animated price counter with Indian digit grouping
//! - Auto-dismissing error and success banners
//! - Service health check
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod banner;
pub mod constants;
pub mod download;
pub mod error;
pub mod format;
pub mod intake;
pub mod messages;
pub mod models;
pub mod network;
pub mod result;
pub mod settings;
pub mod ui;
pub mod validator;

// Re-export commonly used types
pub use app::{AppActor, AppState, SingleFlow};
pub use banner::{BannerKind, BannerPresenter, UiBanner};
pub use download::{DownloadSink, FileDownloadTrigger};
pub use error::{DownloadError, RequestError};
pub use format::format_price;
pub use intake::{DragEvent, FileIntake, IntakeOutcome};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{BatchStatus, FormState, Prediction, PredictionResult};
pub use network::NetworkActor;
pub use result::{CounterAnimation, ResultRenderer};
pub use settings::Settings;
pub use validator::{validate, FieldMark, Validation};
