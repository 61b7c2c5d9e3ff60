use ratatui::{prelude::*, widgets::*};

use crate::banner::BannerKind;
use crate::models::BatchStatus;
use crate::validator::FieldMark;

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Style for a form row: focus first, then the validation mark
pub fn field_style(mark: Option<FieldMark>, focused: bool) -> Style {
    let base = match mark {
        Some(FieldMark::Invalid) => Style::default().fg(Color::Red),
        Some(FieldMark::Valid) => Style::default().fg(Color::Green),
        None => Style::default(),
    };
    if focused {
        base.bold().add_modifier(Modifier::REVERSED)
    } else {
        base
    }
}

/// Banner colours
pub fn banner_style(kind: BannerKind) -> Style {
    match kind {
        BannerKind::Error => Style::default().fg(Color::White).bg(Color::Red).bold(),
        BannerKind::Success => Style::default().fg(Color::Black).bg(Color::Green).bold(),
    }
}

/// Batch status colour
pub fn batch_status_color(status: BatchStatus) -> Color {
    match status {
        BatchStatus::Idle => Color::DarkGray,
        BatchStatus::Uploading => Color::Yellow,
        BatchStatus::Succeeded => Color::Green,
        BatchStatus::Failed => Color::Red,
    }
}

/// A rectangle centered in `r`, sized in percent
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
