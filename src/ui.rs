use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::presenter::{GlyphEngine, TextGeometry};
use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

// The animated line glows purple in the original scene
const MARQUEE_COLOR: Color = Color::Magenta;

pub fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn geometry_lines(geometry: &TextGeometry, color: Color) -> Vec<Line<'_>> {
    let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    geometry
        .lines
        .iter()
        .map(|row| Line::from(Span::styled(row.as_str(), style)))
        .collect()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = Vec::new();

        for board in &self.billboards {
            if let Some(geometry) = board
                .presenter
                .handle()
                .and_then(|handle| self.engine.geometry(handle))
            {
                lines.extend(geometry_lines(geometry, board.color));
                lines.push(Line::default());
            }
        }

        if let Some(geometry) = self
            .marquee_presenter
            .handle()
            .and_then(|handle| self.engine.geometry(handle))
        {
            lines.extend(geometry_lines(geometry, MARQUEE_COLOR));
        }

        if lines.is_empty() {
            // Typeface not resolved yet (or never will be): render the
            // fallback instead of an empty scene.
            let fallback = if self.font_failed {
                Span::styled(
                    "typeface failed to load",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    "loading typeface…",
                    Style::default()
                        .add_modifier(Modifier::DIM)
                        .add_modifier(Modifier::ITALIC),
                )
            };
            lines.push(Line::from(fallback));
        }

        let content_height = lines.len() as u16;
        let top_pad = area.height.saturating_sub(content_height + 1) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(top_pad),
                    Constraint::Length(content_height),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        self.render_status(chunks[3], buf);
    }
}

impl App {
    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let span = match &self.status {
            Some(status) => Span::styled(
                status.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                format!(
                    "{} · {} · esc quits, r restarts",
                    self.marquee.phase(),
                    self.marquee.active_word(),
                ),
                Style::default().add_modifier(Modifier::DIM),
            ),
        };

        // keep the status inside narrow terminals
        let hint = if span.content.width() > area.width as usize {
            Span::styled("esc quits", Style::default().add_modifier(Modifier::DIM))
        } else {
            span
        };

        Paragraph::new(Line::from(hint))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
