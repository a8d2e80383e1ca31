use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::views::ProgressTone;

pub(crate) fn tone_color(tone: ProgressTone) -> Color {
    match tone {
        ProgressTone::Orange => Color::LightRed,
        ProgressTone::Blue => Color::Blue,
        ProgressTone::Green => Color::Green,
    }
}

/// Text progress bar, `width` cells wide, followed by the percentage.
pub(crate) fn progress_spans(progress: u8, width: usize, color: Color) -> Vec<Span<'static>> {
    let progress = progress.min(100) as usize;
    let filled = (progress * width + 50) / 100;
    vec![
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "░".repeat(width.saturating_sub(filled)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!(" {progress:>3}%"), Style::default().fg(color)),
    ]
}

pub(crate) fn progress_line(progress: u8, width: usize, tone: ProgressTone) -> Line<'static> {
    Line::from(progress_spans(progress, width, tone_color(tone)))
}

/// Shorten `text` to `width` characters, ending with an ellipsis when cut.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

pub(crate) fn cover_marker(has_cover: bool) -> &'static str {
    if has_cover {
        "▣"
    } else {
        "□"
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        let spans = progress_spans(50, 10, Color::Green);
        assert_eq!(spans[0].content.chars().count(), 5);
        assert_eq!(spans[1].content.chars().count(), 5);
        assert_eq!(spans[2].content, "  50%");

        let full = progress_spans(100, 8, Color::Green);
        assert_eq!(full[1].content, "");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("Dune", 10), "Dune");
        assert_eq!(truncate("Dune Messiah", 5), "Dune…");
        assert_eq!(truncate("Dune", 0), "");
    }

    #[test]
    fn surfaces_innermost_cause() {
        let err = Err::<(), _>(anyhow!("Book not found"))
            .context("failed to save")
            .unwrap_err();
        assert_eq!(surface_error(&err), "Book not found");
    }
}
