//! App state - pure data structure with no I/O logic

use std::path::PathBuf;

use crate::banner::BannerPresenter;
use crate::download::DownloadSink;
use crate::intake::FileIntake;
use crate::messages::render::FieldView;
use crate::messages::ui_events::Panel;
use crate::messages::RenderState;
use crate::models::{BatchStatus, FormState, HealthStatus, PredictionResult};
use crate::result::ResultRenderer;
use crate::settings::Settings;
use crate::validator::FieldMark;

/// Single prediction flow
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum SingleFlow {
    #[default]
    Idle,
    /// Waiting for the response to `request_id`
    Loading { request_id: u64 },
    /// A result is on screen
    Rendering,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub settings: Settings,
    pub active_panel: Panel,

    // Single prediction
    pub form: FormState,
    pub field_marks: Vec<Option<FieldMark>>,
    pub selected_field: usize,
    pub single: SingleFlow,
    pub result: Option<PredictionResult>,
    pub renderer: ResultRenderer,

    // Batch prediction
    pub intake: FileIntake,
    pub batch_status: BatchStatus,
    pub batch_request_id: Option<u64>,
    pub last_download: Option<PathBuf>,
    pub(crate) downloads: Box<dyn DownloadSink>,

    pub banners: BannerPresenter,

    // Health
    pub health: Option<HealthStatus>,
    pub health_checked_at: Option<chrono::DateTime<chrono::Local>>,
    pub health_request_id: Option<u64>,

    pub next_request_id: u64,

    // Popups
    pub show_help: bool,
    pub show_file_picker: bool,
    pub file_path_input: String,
}

impl AppState {
    pub fn new(settings: Settings, downloads: Box<dyn DownloadSink>) -> Self {
        let form = FormState::from_specs(&settings.fields);
        let field_marks = vec![None; form.fields.len()];
        AppState {
            settings,
            active_panel: Panel::Form,
            form,
            field_marks,
            selected_field: 0,
            single: SingleFlow::Idle,
            result: None,
            renderer: ResultRenderer::new(),
            intake: FileIntake::new(),
            batch_status: BatchStatus::Idle,
            batch_request_id: None,
            last_download: None,
            downloads,
            banners: BannerPresenter::new(),
            health: None,
            health_checked_at: None,
            health_request_id: None,
            next_request_id: 1,
            show_help: false,
            show_file_picker: false,
            file_path_input: String::new(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.single, SingleFlow::Loading { .. })
    }

    /// The batch status indicator is shown only while uploading
    pub fn batch_indicator(&self) -> bool {
        self.batch_status == BatchStatus::Uploading
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_panel: self.active_panel,
            server_url: self.settings.server_url.clone(),
            fields: self
                .form
                .fields
                .iter()
                .zip(&self.field_marks)
                .map(|(field, mark)| FieldView {
                    name: field.name.clone(),
                    value: field.value().to_string(),
                    mark: *mark,
                })
                .collect(),
            selected_field: self.selected_field,
            is_loading: self.is_loading(),
            result: self.renderer.view().cloned(),
            file_label: self.intake.display_label().to_string(),
            drop_highlight: self.intake.is_highlighted(),
            batch_status: self.batch_status,
            batch_indicator: self.batch_indicator(),
            last_download: self.last_download.clone(),
            banners: self.banners.visible(),
            health: self.health.clone(),
            health_checked_at: self
                .health_checked_at
                .map(|t| t.format("%H:%M:%S").to_string()),
            show_help: self.show_help,
            show_file_picker: self.show_file_picker,
            file_path_input: self.file_path_input.clone(),
        }
    }
}
