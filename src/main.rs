//! Pricecast TUI - Actor-based price prediction client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use pricecast_tui::constants::{APP_NAME, APP_VERSION};
use pricecast_tui::messages::ui_events::{key_to_ui_event, Panel};
use pricecast_tui::ui::{banner_style, batch_status_color, centered_rect, field_style, render_tabs};
use pricecast_tui::{
    AppActor, AppState, DragEvent, FileDownloadTrigger, NetworkActor, NetworkCommand,
    NetworkResponse, RenderState, Settings, UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableFocusChange,
            LeaveAlternateScreen
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "pricecast.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let settings = Settings::load()?;
    let download_dir = settings.resolved_download_dir();
    tracing::info!(
        server = %settings.server_url,
        downloads = %download_dir.display(),
        fields = settings.fields.len(),
        "Starting {} {}",
        APP_NAME,
        APP_VERSION
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, EnableFocusChange)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, settings.timeout());
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let state = AppState::new(settings, Box::new(FileDownloadTrigger::new(download_dir)));
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(event) = key_to_ui_event(
                        key,
                        current_state.active_panel,
                        current_state.show_help,
                        current_state.show_file_picker,
                    ) {
                        let quit = matches!(event, UiEvent::Quit);
                        let _ = ui_tx.send(event);
                        if quit {
                            break;
                        }
                    }
                }
                // Terminals deliver dropped files as pasted paths with no
                // hover stage; pastes never reach the picker's text input.
                Event::Paste(text) => {
                    let _ = ui_tx.send(UiEvent::Drag(DragEvent::Drop(text)));
                }
                Event::FocusLost => {
                    let _ = ui_tx.send(UiEvent::Drag(DragEvent::Leave));
                }
                _ => {}
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();
    let banner_rows = state.banners.len().min(3) as u16;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // Tab bar
            Constraint::Length(banner_rows), // Banners
            Constraint::Min(0),              // Content
            Constraint::Length(1),           // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);
    draw_banners(f, state, main_chunks[1]);

    match state.active_panel {
        Panel::Form => draw_form_tab(f, state, main_chunks[2]),
        Panel::Batch => draw_batch_tab(f, state, main_chunks[2]),
    }

    draw_status_bar(f, state, main_chunks[3]);

    if state.is_loading {
        draw_loading_overlay(f, area);
    }

    if state.show_file_picker {
        draw_file_picker_popup(f, state, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let selected = match state.active_panel {
        Panel::Form => 0,
        Panel::Batch => 1,
    };
    f.render_widget(render_tabs(&[" Single Prediction ", " Batch (CSV) "], selected), area);
}

fn draw_banners(f: &mut Frame, state: &RenderState, area: Rect) {
    let lines: Vec<Line> = state
        .banners
        .iter()
        .take(area.height as usize)
        .map(|b| Line::from(Span::styled(format!(" {} ", b.message), banner_style(b.kind))))
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_form_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_form(f, state, chunks[0]);
    draw_result(f, state, chunks[1]);
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = if field.value.is_empty() {
                "-- Select --"
            } else {
                field.value.as_str()
            };
            ListItem::new(format!("{:<18} ◀ {} ▶", field.name, value))
                .style(field_style(field.mark, i == state.selected_field))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Configuration (↑/↓ field, ←/→ value, s submit) "),
    );
    f.render_widget(list, area);
}

fn draw_result(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Predicted Price ");

    let Some(result) = &state.result else {
        let hint = Paragraph::new("Fill in every field and press 's' to predict.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let price = Paragraph::new(Line::from(Span::styled(
        format!("₹ {}", result.price_text),
        Style::default().fg(Color::Green).bold(),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().padding(Padding::vertical(1)));
    f.render_widget(price, chunks[0]);

    let rows = result
        .echo_rows
        .iter()
        .map(|(field, value)| Row::new(vec![field.clone(), value.clone()]));
    let table = Table::new(rows, [Constraint::Percentage(45), Constraint::Percentage(55)])
        .header(Row::new(vec!["Feature", "Value"]).style(Style::default().fg(Color::Yellow).bold()))
        .block(Block::default().borders(Borders::TOP).title(" Input "));
    f.render_widget(table, chunks[1]);
}

fn draw_batch_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Drop zone
            Constraint::Length(3), // Status
            Constraint::Min(0),    // Instructions
        ])
        .split(area);

    let zone_style = if state.drop_highlight {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Cyan)
    };
    let zone = Paragraph::new(vec![
        Line::from(Span::styled(state.file_label.clone(), Style::default().bold())),
        Line::from(Span::styled(
            "Drop a .csv file here or press 'o' to choose one",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(zone_style)
            .title(" CSV File "),
    );
    f.render_widget(zone, chunks[0]);

    let mut status = vec![Span::styled(
        format!(" {} ", state.batch_status.as_str()),
        Style::default().fg(batch_status_color(state.batch_status)).bold(),
    )];
    if state.batch_indicator {
        status.push(Span::raw(" Processing batch... "));
    } else if let Some(path) = &state.last_download {
        status.push(Span::raw(format!(" Last download: {} ", path.display())));
    }
    let status = Paragraph::new(Line::from(status))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(status, chunks[1]);

    let help = Paragraph::new(
        "The file must contain one row per configuration with the same columns as the form.\n\
         Press 's' to upload. Results are saved as predictions.csv.",
    )
    .style(Style::default().fg(Color::DarkGray))
    .wrap(Wrap { trim: true });
    f.render_widget(help, chunks[2]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let health = match (&state.health, &state.health_checked_at) {
        (Some(h), Some(at)) if h.is_ready() => {
            Span::styled(format!(" ● ready ({} features, {}) ", h.features_count, at), Style::default().fg(Color::Green))
        }
        (Some(h), Some(at)) => Span::styled(format!(" ● {} ({}) ", h.status, at), Style::default().fg(Color::Yellow)),
        (None, Some(at)) => Span::styled(format!(" ● unreachable ({}) ", at), Style::default().fg(Color::Red)),
        _ => Span::styled(" ● checking... ", Style::default().fg(Color::DarkGray)),
    };

    let keys = Span::styled(
        format!(" {} | Tab:panel | h:health | Esc:dismiss | ?:help | q:quit ", state.server_url),
        Style::default().fg(Color::DarkGray),
    );

    f.render_widget(Paragraph::new(Line::from(vec![health, keys])), area);
}

fn draw_loading_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(30, 15, area);
    let overlay = Paragraph::new("Predicting price...")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black).fg(Color::Yellow)),
        );
    f.render_widget(Clear, popup_area);
    f.render_widget(overlay, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 PRICECAST - Keyboard Shortcuts

 NAVIGATION
   Tab                Switch between single and batch
   ↑ / ↓              Select form field
   ← / →              Change field value
   Backspace          Clear field

 SINGLE PREDICTION
   s / Enter          Predict

 BATCH
   o / Enter          Choose CSV file (Tab completes paths)
   drag & drop        Drop a CSV file onto the terminal
   s / u              Upload and download predictions.csv

 GENERAL
   h                  Check server health
   Esc                Dismiss error
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_file_picker_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Choose CSV (Enter to select, Tab to complete, Esc to cancel) ")
        .style(Style::default().bg(Color::Black));

    let content = if state.file_path_input.is_empty() {
        "Enter path to a .csv file...\n\nExample: ~/data/laptops.csv"
    } else {
        state.file_path_input.as_str()
    };

    let input = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}
