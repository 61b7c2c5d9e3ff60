//! App actor - message loop processing UI events, network responses and frame ticks

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::app::state::AppState;
use crate::constants::FRAME_INTERVAL_MS;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let mut frames = tokio::time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        if let Some(cmd) = self.state.check_health() {
            let _ = self.network_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    let Some(event) = event else { break };
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(id = response.id(), ok = response.is_ok(), "Network response");
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                now = frames.tick() => {
                    let elapsed = now.duration_since(last_frame).as_millis() as u64;
                    last_frame = now;
                    if self.state.tick(elapsed) {
                        let _ = self.render_tx.send(self.state.to_render_state());
                    }
                }
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            UiEvent::NextPanel => {
                self.state.next_panel();
                None
            }
            UiEvent::NextField => {
                self.state.next_field();
                None
            }
            UiEvent::PrevField => {
                self.state.prev_field();
                None
            }
            UiEvent::NextOption => {
                self.state.next_option();
                None
            }
            UiEvent::PrevOption => {
                self.state.prev_option();
                None
            }
            UiEvent::ClearField => {
                self.state.clear_field();
                None
            }
            UiEvent::SubmitPrediction => self.state.submit_prediction(),

            UiEvent::OpenFilePicker => {
                self.state.open_file_picker();
                None
            }
            UiEvent::FilePathChar(c) => {
                self.state.file_path_char(c);
                None
            }
            UiEvent::FilePathBackspace => {
                self.state.file_path_backspace();
                None
            }
            UiEvent::FilePathAutocomplete => {
                self.state.file_path_autocomplete();
                None
            }
            UiEvent::ConfirmFilePath => {
                self.state.confirm_file_path();
                None
            }
            UiEvent::CancelFilePicker => {
                self.state.cancel_file_picker();
                None
            }
            UiEvent::Drag(drag) => {
                self.state.on_drag(drag);
                None
            }
            UiEvent::SubmitBatch => self.state.submit_batch(),

            UiEvent::CheckHealth => self.state.check_health(),
            UiEvent::DismissError => {
                self.state.dismiss_error();
                None
            }
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }

            UiEvent::Quit => return true,
        };

        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::FileDownloadTrigger;
    use crate::settings::Settings;

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            Settings::default(),
            Box::new(FileDownloadTrigger::new(dir.path())),
        );
        let actor = AppActor::new(state, cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        ui_tx.send(UiEvent::SubmitPrediction).unwrap();
        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();

        // Startup health check, then the shutdown on quit; no prediction
        let mut sent = Vec::new();
        while let Ok(cmd) = cmd_rx.try_recv() {
            sent.push(cmd);
        }
        assert!(matches!(sent.first(), Some(NetworkCommand::CheckHealth { .. })));
        assert!(matches!(sent.last(), Some(NetworkCommand::Shutdown)));
        assert!(!sent.iter().any(|c| matches!(c, NetworkCommand::Predict { .. })));

        let mut last = None;
        while let Ok(state) = render_rx.try_recv() {
            last = Some(state);
        }
        let banner = last.and_then(|s| s.banners.first().cloned()).expect("banner");
        assert!(banner.message.starts_with("Please select values for: Brand"));
    }
}
