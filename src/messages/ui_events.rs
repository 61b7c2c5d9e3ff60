//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::intake::DragEvent;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,

    // Form
    NextField,
    PrevField,
    NextOption,
    PrevOption,
    ClearField,
    SubmitPrediction,

    // Batch file picker
    OpenFilePicker,
    FilePathChar(char),
    FilePathBackspace,
    FilePathAutocomplete,
    ConfirmFilePath,
    CancelFilePicker,

    /// Terminal drag-and-drop, delivered as bracketed paste
    Drag(DragEvent),

    SubmitBatch,

    CheckHealth,
    DismissError,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    #[default]
    Form,
    Batch,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Form => Panel::Batch,
            Panel::Batch => Panel::Form,
        }
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    show_help: bool,
    show_file_picker: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Handle popups first
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_file_picker {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::CancelFilePicker),
            KeyCode::Enter => Some(UiEvent::ConfirmFilePath),
            KeyCode::Tab => Some(UiEvent::FilePathAutocomplete),
            KeyCode::Backspace => Some(UiEvent::FilePathBackspace),
            KeyCode::Char(c) => Some(UiEvent::FilePathChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('h') => return Some(UiEvent::CheckHealth),
        KeyCode::Esc => return Some(UiEvent::DismissError),
        KeyCode::Tab | KeyCode::BackTab => return Some(UiEvent::NextPanel),
        _ => {}
    }

    match active_panel {
        Panel::Form => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevField),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextField),
            KeyCode::Left => Some(UiEvent::PrevOption),
            KeyCode::Right => Some(UiEvent::NextOption),
            KeyCode::Backspace | KeyCode::Delete => Some(UiEvent::ClearField),
            KeyCode::Enter | KeyCode::Char('s') => Some(UiEvent::SubmitPrediction),
            _ => None,
        },
        Panel::Batch => match key.code {
            KeyCode::Char('o') | KeyCode::Enter => Some(UiEvent::OpenFilePicker),
            KeyCode::Char('s') | KeyCode::Char('u') => Some(UiEvent::SubmitBatch),
            _ => None,
        },
    }
}
