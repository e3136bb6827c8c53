//! Results screen: risk gauge, key factors, recommendations and vital charts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::{Assessment, MetricPoint};
use crate::tui::styles::MedicalTheme;

/// Render a completed assessment.
pub fn render_results(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Risk gauge
            Constraint::Min(8),    // Factors / recommendations / vitals
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], assessment);
    render_risk_gauge(f, chunks[1], assessment);
    render_detail(f, chunks[2], assessment);
    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Assessment Results", MedicalTheme::title()),
        Span::styled(
            format!(
                " │ {}",
                assessment.created_at.format("%Y-%m-%d %H:%M UTC")
            ),
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(header, area);
}

fn render_risk_gauge(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let result = &assessment.result;
    let (r, g, b) = result.risk_level.color();

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" Risk Level: {} ", result.risk_level),
                    MedicalTheme::risk_level(result.risk_level),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(Style::default().fg(ratatui::style::Color::Rgb(r, g, b)))
        .ratio((result.risk_percentage / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{:.0}% - {}",
            result.risk_percentage,
            result.risk_level.description()
        ));

    f.render_widget(gauge, area);
}

fn render_detail(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);

    render_key_factors(f, left[0], assessment);
    render_recommendations(f, left[1], assessment);
    render_vitals(f, columns[1], &assessment.result.graph_data);
}

fn render_key_factors(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let factors = &assessment.result.key_factors;
    let lines: Vec<Line> = if factors.is_empty() {
        vec![Line::from(Span::styled(
            " No significant contributing factors",
            MedicalTheme::text_muted(),
        ))]
    } else {
        factors
            .iter()
            .map(|factor| {
                Line::from(vec![
                    Span::styled(" • ", MedicalTheme::warning()),
                    Span::styled(factor.label.as_str(), MedicalTheme::text()),
                    Span::styled(
                        format!(" (+{:.0})", factor.points),
                        MedicalTheme::text_secondary(),
                    ),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(Span::styled(" Key Factors ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recommendations(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let recommendations = &assessment.result.recommendations;
    let lines: Vec<Line> = if recommendations.is_empty() {
        vec![Line::from(Span::styled(
            " Keep up your current habits",
            MedicalTheme::success(),
        ))]
    } else {
        recommendations
            .iter()
            .map(|rec| {
                Line::from(vec![
                    Span::styled(" → ", MedicalTheme::info()),
                    Span::styled(rec.as_str(), MedicalTheme::text()),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(Span::styled(" Recommendations ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_vitals(f: &mut Frame, area: Rect, metrics: &[MetricPoint]) {
    let block = Block::default()
        .title(Span::styled(" Vital Signs ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if metrics.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                " No vitals entered",
                MedicalTheme::text_muted(),
            )),
            inner,
        );
        return;
    }

    let constraints: Vec<Constraint> = metrics
        .iter()
        .map(|_| Constraint::Length(2))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, metric) in metrics.iter().enumerate() {
        render_metric_row(f, rows[i], metric);
    }
}

fn render_metric_row(f: &mut Frame, area: Rect, metric: &MetricPoint) {
    match metric.value {
        Some(value) => {
            let style = match metric.in_range() {
                Some(true) => MedicalTheme::success(),
                _ => MedicalTheme::warning(),
            };
            // Scale the bar so the normal range sits in the middle of it.
            let full_scale = metric.normal_max * 1.5;
            let ratio = if full_scale > 0.0 {
                (value / full_scale).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let gauge = Gauge::default()
                .block(Block::default().title(Span::styled(
                    format!(
                        "{} (normal {:.0}-{:.0})",
                        metric.metric, metric.normal_min, metric.normal_max
                    ),
                    MedicalTheme::text_secondary(),
                )))
                .gauge_style(style)
                .ratio(ratio)
                .label(format!("{value:.1}"));
            f.render_widget(gauge, area);
        }
        None => {
            let lines = vec![
                Line::from(Span::styled(
                    metric.metric.as_str(),
                    MedicalTheme::text_secondary(),
                )),
                Line::from(Span::styled("not provided", MedicalTheme::text_muted())),
            ];
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("New assessment ", MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, area);
}
