//! Batch file intake - picker selection, terminal drag-and-drop, extension check
//!
//! Both input modes funnel into [`FileIntake::set_file`], so the accepted
//! state and label never depend on how the file arrived.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CSV_EXTENSION, NOT_CSV_REASON, NO_FILE_LABEL};
use crate::models::SelectedFile;

/// Drag-and-drop stages as reported by the terminal
#[derive(Clone, Debug, PartialEq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(String),
}

/// Result of offering a file to the intake
#[derive(Clone, Debug, PartialEq)]
pub struct IntakeOutcome {
    pub accepted: bool,
    pub reason: Option<String>,
}

impl IntakeOutcome {
    fn accepted() -> Self {
        IntakeOutcome {
            accepted: true,
            reason: None,
        }
    }

    fn rejected(reason: &str) -> Self {
        IntakeOutcome {
            accepted: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Owns the currently selected batch file
#[derive(Clone, Debug, Default)]
pub struct FileIntake {
    selected: Option<SelectedFile>,
    highlighted: bool,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a file path; only names ending in `.csv` are kept.
    pub fn set_file(&mut self, raw: &str) -> IntakeOutcome {
        let path = normalize_path(raw);
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return IntakeOutcome::rejected(NOT_CSV_REASON);
        };

        if !is_csv_name(name) {
            tracing::debug!(name, "Rejected non-csv file");
            return IntakeOutcome::rejected(NOT_CSV_REASON);
        }

        tracing::info!(name, path = %path.display(), "Batch file selected");
        self.selected = Some(SelectedFile {
            name: name.to_string(),
            path,
        });
        IntakeOutcome::accepted()
    }

    /// Handle a drag stage. Every stage is consumed here; only a drop
    /// produces an outcome.
    pub fn on_drag(&mut self, event: DragEvent) -> Option<IntakeOutcome> {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.highlighted = true;
                None
            }
            DragEvent::Leave => {
                self.highlighted = false;
                None
            }
            DragEvent::Drop(raw) => {
                self.highlighted = false;
                Some(self.set_file(&raw))
            }
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn display_label(&self) -> &str {
        self.selected
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or(NO_FILE_LABEL)
    }
}

/// Exact, case-sensitive suffix check
pub fn is_csv_name(name: &str) -> bool {
    name.ends_with(CSV_EXTENSION)
}

/// Turn picker input or dropped text into a path.
///
/// Terminals deliver drops as pasted text, sometimes quoted, escaped or
/// as a `file://` URI.
pub fn normalize_path(raw: &str) -> PathBuf {
    let mut text = raw.trim();

    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = &text[1..text.len() - 1];
        }
    }

    let text = text.strip_prefix("file://").unwrap_or(text);
    let text = text.replace("\\ ", " ");

    if let Some(rest) = text.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }

    PathBuf::from(text)
}

/// Complete a partially typed path to the next directory or csv file.
///
/// Returns `None` when nothing new can be completed.
pub fn complete_path(input: &str) -> Option<String> {
    let expanded = if input.starts_with('~') {
        let home = dirs::home_dir()?;
        input.replacen('~', &home.to_string_lossy(), 1)
    } else {
        input.to_string()
    };

    let path = PathBuf::from(&expanded);

    if path.is_dir() && !expanded.ends_with('/') {
        return Some(format!("{}/", expanded));
    }

    let (parent, prefix) = if expanded.ends_with('/') {
        (path, String::new())
    } else {
        let prefix = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (parent, prefix)
    };

    let mut matches: Vec<String> = fs::read_dir(&parent)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| is_candidate(&e.path()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && !name.starts_with('.'))
        .collect();
    matches.sort();

    match matches.as_slice() {
        [] => None,
        [only] => {
            let completed = parent.join(only);
            if completed.is_dir() {
                Some(format!("{}/", completed.to_string_lossy()))
            } else {
                Some(completed.to_string_lossy().to_string())
            }
        }
        many => {
            let common = common_prefix(many)?;
            if common.len() > prefix.len() {
                Some(parent.join(&common).to_string_lossy().to_string())
            } else {
                None
            }
        }
    }
}

fn is_candidate(path: &Path) -> bool {
    path.is_dir()
        || path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_csv_name)
}

/// Find common prefix among strings
fn common_prefix(strings: &[String]) -> Option<String> {
    let first = strings.first()?;
    let mut prefix_len = first.len();

    for s in &strings[1..] {
        prefix_len = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, a), _)| i + a.len_utf8())
            .unwrap_or(0)
            .min(prefix_len);
    }

    if prefix_len > 0 {
        Some(first[..prefix_len].to_string())
    } else {
        None
    }
}
