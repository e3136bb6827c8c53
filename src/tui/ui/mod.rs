//! Screen rendering.

pub mod form;
pub mod results;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub use form::{render_questionnaire, FormScreenState};
pub use results::render_results;

/// Render the interstitial screen shown while the worker runs.
pub fn render_processing(f: &mut Frame, area: Rect, phase: &str, ratio: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {phase} "),
                    MedicalTheme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border_focused()),
        )
        .gauge_style(MedicalTheme::info())
        .ratio(ratio.clamp(0.0, 1.0));
    f.render_widget(gauge, chunks[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Cancel", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, chunks[3]);
}
