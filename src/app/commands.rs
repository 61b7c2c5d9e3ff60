//! Command handlers - the single and batch prediction flows

use crate::app::state::{AppState, SingleFlow};
use crate::constants::{
    BATCH_FALLBACK_ERROR, BATCH_PREDICT_PATH, DOWNLOAD_FILENAME, HEALTH_PATH, INVALID_FILE_ERROR,
    NO_FILE_ERROR, PREDICT_FALLBACK_ERROR, PREDICT_PATH,
};
use crate::error::RequestError;
use crate::intake::{self, DragEvent, IntakeOutcome};
use crate::messages::NetworkResponse;
use crate::messages::NetworkCommand;
use crate::models::{BatchStatus, PredictionResult};
use crate::validator;

/// Banner text for a failed flow; transport and parse details go to the log only
fn error_message(err: &RequestError, fallback: &str) -> String {
    match err {
        RequestError::Server(msg) if !msg.trim().is_empty() => msg.clone(),
        RequestError::Server(_) | RequestError::Network(_) | RequestError::Parse(_) => {
            fallback.to_string()
        }
        other => other.to_string(),
    }
}

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn next_field(&mut self) {
        if !self.form.fields.is_empty() {
            self.selected_field = (self.selected_field + 1) % self.form.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.form.fields.is_empty() {
            self.selected_field = self
                .selected_field
                .checked_sub(1)
                .unwrap_or(self.form.fields.len() - 1);
        }
    }

    pub fn next_option(&mut self) {
        if let Some(field) = self.form.fields.get_mut(self.selected_field) {
            field.select_next();
        }
    }

    pub fn prev_option(&mut self) {
        if let Some(field) = self.form.fields.get_mut(self.selected_field) {
            field.select_prev();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.form.fields.get_mut(self.selected_field) {
            field.selected = None;
        }
    }

    // ========================
    // Single prediction
    // ========================

    /// Validate the form and, if complete, issue one prediction request.
    ///
    /// Ignored while a prediction is already loading.
    pub fn submit_prediction(&mut self) -> Option<NetworkCommand> {
        if self.is_loading() {
            tracing::debug!("Prediction already in flight, submit ignored");
            return None;
        }

        let validation = validator::validate(&self.form.fields);
        self.field_marks = validation.marks.iter().copied().map(Some).collect();

        if !validation.is_valid {
            let err = RequestError::Validation(validation.missing_fields);
            self.banners.show_error(err.to_string());
            return None;
        }

        self.result = None;
        self.renderer.clear();
        self.banners.dismiss_error();

        let id = self.next_id();
        self.single = SingleFlow::Loading { request_id: id };

        Some(NetworkCommand::Predict {
            id,
            endpoint: self.settings.endpoint(PREDICT_PATH),
            form: self.form.to_form_data(),
        })
    }

    fn handle_prediction(&mut self, id: u64, outcome: Result<crate::models::Prediction, RequestError>) {
        if self.single != (SingleFlow::Loading { request_id: id }) {
            tracing::debug!(id, "Dropping stale prediction response");
            return;
        }

        // Loading teardown never depends on the body
        self.single = SingleFlow::Idle;

        match outcome {
            Ok(prediction) => {
                let result = PredictionResult::new(prediction);
                self.renderer.render(&result);
                self.result = Some(result);
                self.single = SingleFlow::Rendering;
            }
            Err(err) => {
                tracing::warn!(id, error = ?err, "Prediction failed");
                self.banners.show_error(error_message(&err, PREDICT_FALLBACK_ERROR));
            }
        }
    }

    // ========================
    // Batch prediction
    // ========================

    /// Upload the selected CSV. Ignored while an upload is in flight.
    pub fn submit_batch(&mut self) -> Option<NetworkCommand> {
        if self.batch_status == BatchStatus::Uploading {
            tracing::debug!("Batch already uploading, submit ignored");
            return None;
        }

        let Some(file) = self.intake.selected().cloned() else {
            self.banners.show_error(NO_FILE_ERROR);
            return None;
        };

        if !intake::is_csv_name(&file.name) {
            let err = RequestError::FileType(INVALID_FILE_ERROR.to_string());
            self.banners.show_error(err.to_string());
            return None;
        }

        self.banners.dismiss_error();

        let id = self.next_id();
        self.batch_status = BatchStatus::Uploading;
        self.batch_request_id = Some(id);

        Some(NetworkCommand::BatchPredict {
            id,
            endpoint: self.settings.endpoint(BATCH_PREDICT_PATH),
            file,
        })
    }

    fn handle_batch(&mut self, id: u64, outcome: Result<Vec<u8>, RequestError>) {
        if self.batch_request_id != Some(id) {
            tracing::debug!(id, "Dropping stale batch response");
            return;
        }
        self.batch_request_id = None;

        let payload = match outcome {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(id, error = ?err, "Batch prediction failed");
                self.batch_status = BatchStatus::Failed;
                self.banners.show_error(error_message(&err, BATCH_FALLBACK_ERROR));
                return;
            }
        };

        match self.downloads.deliver(&payload, DOWNLOAD_FILENAME) {
            Ok(path) => {
                self.batch_status = BatchStatus::Succeeded;
                self.banners
                    .show_success(format!("Predictions downloaded to {}", path.display()));
                self.last_download = Some(path);
            }
            Err(err) => {
                tracing::error!(id, error = %err, "Could not save batch download");
                self.batch_status = BatchStatus::Failed;
                self.banners.show_error(RequestError::from(err).to_string());
            }
        }
    }

    // ========================
    // File intake
    // ========================

    pub fn open_file_picker(&mut self) {
        self.show_file_picker = true;
    }

    pub fn file_path_char(&mut self, c: char) {
        self.file_path_input.push(c);
    }

    pub fn file_path_backspace(&mut self) {
        self.file_path_input.pop();
    }

    pub fn file_path_autocomplete(&mut self) {
        if let Some(completed) = intake::complete_path(&self.file_path_input) {
            self.file_path_input = completed;
        }
    }

    pub fn cancel_file_picker(&mut self) {
        self.show_file_picker = false;
        self.file_path_input.clear();
    }

    pub fn confirm_file_path(&mut self) {
        let input = std::mem::take(&mut self.file_path_input);
        self.show_file_picker = false;
        let outcome = self.intake.set_file(&input);
        self.report_intake(outcome);
    }

    /// Drag stages are always consumed here, never by a text input
    pub fn on_drag(&mut self, event: DragEvent) {
        if let Some(outcome) = self.intake.on_drag(event) {
            self.show_file_picker = false;
            self.file_path_input.clear();
            self.report_intake(outcome);
        }
    }

    fn report_intake(&mut self, outcome: IntakeOutcome) {
        if outcome.accepted {
            self.banners.dismiss_error();
        } else {
            tracing::debug!(reason = ?outcome.reason, "File rejected");
            self.banners.show_error(INVALID_FILE_ERROR);
        }
    }

    // ========================
    // Health
    // ========================

    pub fn check_health(&mut self) -> Option<NetworkCommand> {
        if self.health_request_id.is_some() {
            return None;
        }
        let id = self.next_id();
        self.health_request_id = Some(id);
        Some(NetworkCommand::CheckHealth {
            id,
            endpoint: self.settings.endpoint(HEALTH_PATH),
        })
    }

    fn handle_health(&mut self, id: u64, outcome: Result<crate::models::HealthStatus, RequestError>) {
        if self.health_request_id != Some(id) {
            return;
        }
        self.health_request_id = None;
        self.health_checked_at = Some(chrono::Local::now());
        match outcome {
            Ok(health) => self.health = Some(health),
            Err(err) => {
                tracing::warn!(error = ?err, "Health check failed");
                self.health = None;
            }
        }
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::Prediction { id, outcome, time_ms } => {
                tracing::debug!(id, time_ms, "Prediction response");
                self.handle_prediction(id, outcome);
            }
            NetworkResponse::Batch { id, outcome, time_ms } => {
                tracing::debug!(id, time_ms, "Batch response");
                self.handle_batch(id, outcome);
            }
            NetworkResponse::Health { id, outcome } => self.handle_health(id, outcome),
        }
    }

    // ========================
    // Timers & popups
    // ========================

    /// Advance banners and the counter animation; true if anything changed
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        let before = self.banners.len();
        self.banners.advance(elapsed_ms);
        let expired = self.banners.len() != before;
        let animated = self.renderer.tick();
        expired || animated
    }

    pub fn dismiss_error(&mut self) {
        self.banners.dismiss_error();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BannerKind;
    use crate::constants::BANNER_TTL_MS;
    use crate::download::{DownloadSink, FileDownloadTrigger};
    use crate::error::DownloadError;
    use crate::models::{FieldSpec, Prediction};
    use crate::settings::Settings;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Records deliveries instead of touching the filesystem
    #[derive(Clone, Default)]
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<(Vec<u8>, String)>>>,
    }

    impl DownloadSink for RecordingSink {
        fn deliver(&mut self, payload: &[u8], filename: &str) -> Result<PathBuf, DownloadError> {
            self.delivered
                .lock()
                .unwrap()
                .push((payload.to_vec(), filename.to_string()));
            Ok(PathBuf::from("/downloads").join(filename))
        }
    }

    fn state_with_sink() -> (AppState, RecordingSink) {
        let settings = Settings {
            server_url: "http://prices.test".to_string(),
            fields: vec![
                FieldSpec::new("Brand", &["Dell", "HP"]),
                FieldSpec::new("RAM", &["8GB", "16GB"]),
            ],
            ..Settings::default()
        };
        let sink = RecordingSink::default();
        (AppState::new(settings, Box::new(sink.clone())), sink)
    }

    fn error_text(state: &AppState) -> Option<String> {
        state.banners.error().map(|b| b.message.clone())
    }

    #[test]
    fn test_missing_brand_blocks_request() {
        let (mut state, _) = state_with_sink();
        state.form.set("RAM", "8GB");

        assert!(state.submit_prediction().is_none());
        assert_eq!(error_text(&state).as_deref(), Some("Please select values for: Brand"));
        assert_eq!(state.single, SingleFlow::Idle);
        assert_eq!(
            state.field_marks,
            vec![Some(validator::FieldMark::Invalid), Some(validator::FieldMark::Valid)]
        );
    }

    #[test]
    fn test_valid_form_issues_one_request() {
        let (mut state, _) = state_with_sink();
        state.form.set("Brand", "Dell");
        state.form.set("RAM", "8GB");
        state.banners.show_error("old error");

        let cmd = state.submit_prediction().expect("command");
        match cmd {
            NetworkCommand::Predict { id, endpoint, form } => {
                assert_eq!(endpoint, "http://prices.test/predict");
                assert_eq!(
                    form,
                    vec![
                        ("Brand".to_string(), "Dell".to_string()),
                        ("RAM".to_string(), "8GB".to_string()),
                    ]
                );
                assert_eq!(state.single, SingleFlow::Loading { request_id: id });
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(state.is_loading());
        assert!(state.banners.error().is_none());

        // Resubmitting while loading is ignored
        assert!(state.submit_prediction().is_none());
    }

    #[test]
    fn test_prediction_success_renders_result() {
        let (mut state, _) = state_with_sink();
        state.form.set("Brand", "Dell");
        state.form.set("RAM", "8GB");
        let id = match state.submit_prediction() {
            Some(NetworkCommand::Predict { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::Prediction {
            id,
            outcome: Ok(Prediction {
                price: 54999.99,
                input_echo: vec![
                    ("Brand".into(), "Dell".into()),
                    ("RAM".into(), "8GB".into()),
                ],
            }),
            time_ms: 12,
        });

        assert!(!state.is_loading());
        assert_eq!(state.single, SingleFlow::Rendering);

        while state.tick(16) {}
        let render = state.to_render_state();
        let view = render.result.expect("result view");
        assert_eq!(view.price_text, "54,999.99");
        assert_eq!(view.echo_rows.len(), 2);
        assert_eq!(view.echo_rows[0], ("Brand".to_string(), "Dell".to_string()));
        assert_eq!(view.echo_rows[1], ("RAM".to_string(), "8GB".to_string()));
    }

    #[test]
    fn test_prediction_failure_messages() {
        let cases = vec![
            (RequestError::Server("Model not loaded".into()), "Model not loaded"),
            (RequestError::Server(String::new()), PREDICT_FALLBACK_ERROR),
            (RequestError::Parse("bad json".into()), PREDICT_FALLBACK_ERROR),
            (RequestError::Network("Request timed out".into()), PREDICT_FALLBACK_ERROR),
        ];

        for (err, expected) in cases {
            let (mut state, _) = state_with_sink();
            state.form.set("Brand", "HP");
            state.form.set("RAM", "16GB");
            let id = match state.submit_prediction() {
                Some(NetworkCommand::Predict { id, .. }) => id,
                other => panic!("unexpected command: {:?}", other),
            };

            state.handle_response(NetworkResponse::Prediction {
                id,
                outcome: Err(err),
                time_ms: 0,
            });

            assert_eq!(state.single, SingleFlow::Idle);
            assert!(state.result.is_none());
            assert_eq!(error_text(&state).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_stale_prediction_is_dropped() {
        let (mut state, _) = state_with_sink();
        state.form.set("Brand", "HP");
        state.form.set("RAM", "16GB");
        let first = match state.submit_prediction() {
            Some(NetworkCommand::Predict { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };
        state.handle_response(NetworkResponse::Prediction {
            id: first,
            outcome: Err(RequestError::Server("boom".into())),
            time_ms: 0,
        });
        let second = match state.submit_prediction() {
            Some(NetworkCommand::Predict { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        // A duplicate reply for the first request must not end the second
        state.handle_response(NetworkResponse::Prediction {
            id: first,
            outcome: Ok(Prediction { price: 1.0, input_echo: vec![] }),
            time_ms: 0,
        });
        assert_eq!(state.single, SingleFlow::Loading { request_id: second });
        assert!(state.result.is_none());
    }

    #[test]
    fn test_batch_without_file() {
        let (mut state, sink) = state_with_sink();
        assert!(state.submit_batch().is_none());
        assert_eq!(error_text(&state).as_deref(), Some(NO_FILE_ERROR));
        assert_eq!(state.batch_status, BatchStatus::Idle);
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rejected_file_shows_error_and_keeps_no_selection() {
        let (mut state, _) = state_with_sink();
        state.on_drag(DragEvent::Enter);
        state.on_drag(DragEvent::Drop("/data/laptops.xlsx".into()));
        assert_eq!(error_text(&state).as_deref(), Some(INVALID_FILE_ERROR));
        assert!(state.submit_batch().is_none());
        assert_eq!(error_text(&state).as_deref(), Some(NO_FILE_ERROR));
    }

    fn start_batch(state: &mut AppState) -> u64 {
        state.open_file_picker();
        for c in "/data/laptops.csv".chars() {
            state.file_path_char(c);
        }
        state.confirm_file_path();
        assert!(!state.show_file_picker);
        match state.submit_batch() {
            Some(NetworkCommand::BatchPredict { id, endpoint, file }) => {
                assert_eq!(endpoint, "http://prices.test/batch_predict");
                assert_eq!(file.name, "laptops.csv");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_batch_server_error() {
        let (mut state, sink) = state_with_sink();
        let id = start_batch(&mut state);
        assert!(state.batch_indicator());
        assert_eq!(state.batch_status, BatchStatus::Uploading);

        state.handle_response(NetworkResponse::Batch {
            id,
            outcome: Err(RequestError::Server("Invalid columns".into())),
            time_ms: 40,
        });

        assert!(!state.batch_indicator());
        assert_eq!(state.batch_status, BatchStatus::Failed);
        assert_eq!(error_text(&state).as_deref(), Some("Invalid columns"));
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_batch_unparsable_error_uses_fallback() {
        let (mut state, _) = state_with_sink();
        let id = start_batch(&mut state);
        state.handle_response(NetworkResponse::Batch {
            id,
            outcome: Err(RequestError::Parse("not json".into())),
            time_ms: 0,
        });
        assert_eq!(error_text(&state).as_deref(), Some(BATCH_FALLBACK_ERROR));
    }

    #[test]
    fn test_batch_success_downloads_and_banner_expires() {
        let (mut state, sink) = state_with_sink();
        let id = start_batch(&mut state);

        state.handle_response(NetworkResponse::Batch {
            id,
            outcome: Ok(b"Brand,Predicted_Price_INR\nDell,54999.99\n".to_vec()),
            time_ms: 80,
        });

        let delivered = sink.delivered.lock().unwrap().clone();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].1, "predictions.csv");
        assert_eq!(state.batch_status, BatchStatus::Succeeded);
        assert!(!state.batch_indicator());
        assert_eq!(state.last_download, Some(PathBuf::from("/downloads/predictions.csv")));

        let successes: Vec<_> = state.banners.successes().cloned().collect();
        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].kind, BannerKind::Success);
        assert_eq!(successes[0].message, "Predictions downloaded to /downloads/predictions.csv");

        state.tick(BANNER_TTL_MS - 1);
        assert_eq!(state.banners.successes().count(), 1);
        assert!(state.tick(1));
        assert_eq!(state.banners.successes().count(), 0);
    }

    #[test]
    fn test_batch_download_failure_marks_failed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            server_url: "http://prices.test".to_string(),
            ..Settings::default()
        };
        let missing = dir.path().join("gone");
        let mut state = AppState::new(settings, Box::new(FileDownloadTrigger::new(&missing)));
        let id = start_batch(&mut state);

        state.handle_response(NetworkResponse::Batch {
            id,
            outcome: Ok(b"a".to_vec()),
            time_ms: 5,
        });

        assert_eq!(state.batch_status, BatchStatus::Failed);
        assert!(!state.batch_indicator());
        assert_eq!(
            error_text(&state),
            Some(format!("Download directory does not exist: {}", missing.display()))
        );
        assert_eq!(state.banners.successes().count(), 0);
        assert!(state.last_download.is_none());
    }

    #[test]
    fn test_paste_drop_without_hover_selects_file() {
        let (mut state, _) = state_with_sink();
        state.on_drag(DragEvent::Drop("'/data/laptops.csv'".into()));
        assert!(!state.intake.is_highlighted());
        assert_eq!(state.intake.display_label(), "laptops.csv");
        assert!(error_text(&state).is_none());
        assert!(matches!(state.submit_batch(), Some(NetworkCommand::BatchPredict { .. })));
    }

    #[test]
    fn test_batch_resubmit_while_uploading_is_ignored() {
        let (mut state, _) = state_with_sink();
        start_batch(&mut state);
        assert!(state.submit_batch().is_none());
    }

    #[test]
    fn test_health_response_is_recorded() {
        let (mut state, _) = state_with_sink();
        let id = match state.check_health() {
            Some(NetworkCommand::CheckHealth { id, endpoint }) => {
                assert_eq!(endpoint, "http://prices.test/health");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        };
        assert!(state.check_health().is_none());

        state.handle_response(NetworkResponse::Health {
            id,
            outcome: Ok(crate::models::HealthStatus {
                status: "healthy".into(),
                model_loaded: true,
                preprocessor_loaded: true,
                features_count: 6,
            }),
        });
        assert!(state.health.as_ref().is_some_and(|h| h.is_ready()));
        assert!(state.health_checked_at.is_some());
    }
}
