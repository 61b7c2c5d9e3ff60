//! Render state - data structure sent from App layer to UI for rendering

use std::path::PathBuf;

use crate::banner::UiBanner;
use crate::constants::{DEFAULT_SERVER_URL, NO_FILE_LABEL};
use crate::messages::ui_events::Panel;
use crate::models::{BatchStatus, HealthStatus};
use crate::result::ResultView;
use crate::validator::FieldMark;

/// One form row as the UI draws it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub value: String,
    /// Set once the form has been validated
    pub mark: Option<FieldMark>,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub active_panel: Panel,
    pub server_url: String,

    // Single prediction form
    pub fields: Vec<FieldView>,
    pub selected_field: usize,
    /// Blocking overlay while a prediction is in flight
    pub is_loading: bool,
    pub result: Option<ResultView>,

    // Batch
    pub file_label: String,
    pub drop_highlight: bool,
    pub batch_status: BatchStatus,
    pub batch_indicator: bool,
    pub last_download: Option<PathBuf>,

    pub banners: Vec<UiBanner>,

    // Health
    pub health: Option<HealthStatus>,
    pub health_checked_at: Option<String>,

    // Popups
    pub show_help: bool,
    pub show_file_picker: bool,
    pub file_path_input: String,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            active_panel: Panel::Form,
            server_url: String::from(DEFAULT_SERVER_URL),
            fields: Vec::new(),
            selected_field: 0,
            is_loading: false,
            result: None,
            file_label: String::from(NO_FILE_LABEL),
            drop_highlight: false,
            batch_status: BatchStatus::Idle,
            batch_indicator: false,
            last_download: None,
            banners: Vec::new(),
            health: None,
            health_checked_at: None,
            show_help: false,
            show_file_picker: false,
            file_path_input: String::new(),
        }
    }
}
