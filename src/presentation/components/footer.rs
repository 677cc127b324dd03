use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::StatusTone;
use crate::validation::{Toast, ToastKind};

use super::super::view::UiContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(2)])
        .split(area);

    let actions = ctx.help.unwrap_or(" ");
    let actions_widget = Paragraph::new(format!("Actions: {actions}"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(actions_widget, rows[0]);

    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if let Some(label) = &ctx.focus_label {
        status.push_str(" • focus: ");
        status.push_str(label);
    }
    if let Some(extra) = ctx.global_errors.first() {
        status.push_str(" • ");
        status.push_str(extra);
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let badge = if ctx.error_count > 0 {
        Span::styled(
            format!("[! {}]", ctx.error_count),
            Style::default().fg(Color::Red).bg(Color::Black),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    };

    let status_widget = Paragraph::new(Line::from(vec![
        Span::raw("Status: "),
        Span::styled(status, tone_style(ctx.status_tone)),
        Span::raw(" "),
        badge,
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::NONE));
    frame.render_widget(status_widget, rows[1]);
}

fn tone_style(tone: StatusTone) -> Style {
    match tone {
        StatusTone::Neutral => Style::default(),
        StatusTone::Success => Style::default().fg(Color::Green),
        StatusTone::Warning => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        StatusTone::Error => Style::default().fg(Color::Red),
    }
}

/// Stack of the most recent toasts, newest at the bottom.
pub fn render_toasts(frame: &mut Frame<'_>, area: Rect, toasts: &[Toast]) {
    let lines = toasts
        .iter()
        .map(|toast| {
            let (icon, color) = match toast.kind {
                ToastKind::Success => ("✓", Color::Green),
                ToastKind::Error => ("✗", Color::Red),
            };
            Line::from(vec![
                Span::styled(
                    format!("{icon} {}", toast.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(toast.description.clone(), Style::default().fg(Color::Gray)),
            ])
        })
        .collect::<Vec<_>>();
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP).title("Notifications"));
    frame.render_widget(widget, area);
}
