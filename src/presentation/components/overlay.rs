use chrono::{Datelike, Days, NaiveDate};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::form::field::components::{CalendarOverlay, ListOverlay, OverlayView, month_start};

/// Centre a `width` x `height` box inside `area`, shrinking it to fit.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_overlay(frame: &mut Frame<'_>, overlay: &OverlayView) {
    match overlay {
        OverlayView::List(list) => render_list_overlay(frame, list),
        OverlayView::Calendar(calendar) => render_calendar(frame, calendar),
    }
}

fn render_list_overlay(frame: &mut Frame<'_>, overlay: &ListOverlay) {
    let widest_row = overlay
        .rows
        .iter()
        .map(|row| row.depth * 2 + row.marker.width() + row.label.width())
        .chain(overlay.header.iter().map(|header| header.width()))
        .chain([overlay.title.width(), overlay.empty_text.width()])
        .max()
        .unwrap_or(10) as u16;
    let extra_lines = u16::from(overlay.query.is_some()) + u16::from(overlay.header.is_some());
    let width = widest_row
        .saturating_add(6)
        .min(frame.area().width.saturating_sub(2).max(1));
    let height = (overlay.rows.len().max(1) as u16)
        .saturating_add(extra_lines)
        .saturating_add(2)
        .min(frame.area().height.saturating_sub(2).max(3));
    let area = popup_rect(frame.area(), width, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(overlay.title.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    if overlay.query.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if overlay.header.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut index = 0;
    if let Some(query) = &overlay.query {
        let line = Line::from(vec![
            Span::styled("⌕ ", Style::default().fg(Color::DarkGray)),
            Span::styled(query.clone(), Style::default().fg(Color::White)),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[index]);
        frame.set_cursor_position((
            chunks[index].x + 2 + query.width() as u16,
            chunks[index].y,
        ));
        index += 1;
    }
    if let Some(header) = &overlay.header {
        let header = Paragraph::new(header.clone()).style(Style::default().fg(Color::Gray));
        frame.render_widget(header, chunks[index]);
        index += 1;
    }

    if overlay.rows.is_empty() {
        let empty = Paragraph::new(overlay.empty_text.clone())
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, chunks[index]);
        return;
    }

    let items = overlay
        .rows
        .iter()
        .map(|row| {
            let style = if row.disabled {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(row.marker.clone(), Style::default().fg(Color::Cyan)),
                Span::styled(row.label.clone(), style),
            ]))
        })
        .collect::<Vec<_>>();
    let mut state = ListState::default();
    state.select(
        overlay
            .cursor
            .map(|cursor| cursor.min(overlay.rows.len().saturating_sub(1))),
    );
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, chunks[index], &mut state);
}

/// Weeks of the month containing `cursor`, Sunday first. Days outside the
/// month are `None`.
pub fn calendar_weeks(cursor: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = month_start(cursor);
    let lead = first.weekday().num_days_from_sunday() as u64;
    let mut day = first - Days::new(lead);
    let mut weeks = Vec::new();
    loop {
        let week = std::array::from_fn(|offset| {
            let date = day + Days::new(offset as u64);
            (date.month() == first.month()).then_some(date)
        });
        weeks.push(week);
        day = day + Days::new(7);
        if day.month() != first.month() || day.year() != first.year() {
            break;
        }
    }
    weeks
}

fn render_calendar(frame: &mut Frame<'_>, calendar: &CalendarOverlay) {
    let weeks = calendar_weeks(calendar.cursor);
    let area = popup_rect(frame.area(), 30, weeks.len() as u16 + 5);
    frame.render_widget(Clear, area);

    let mut lines = Vec::with_capacity(weeks.len() + 2);
    lines.push(Line::from(
        calendar
            .weekdays
            .iter()
            .map(|name| Span::styled(format!("{name:>3} "), Style::default().fg(Color::Gray)))
            .collect::<Vec<_>>(),
    ));
    for week in &weeks {
        let spans = week
            .iter()
            .map(|day| match day {
                Some(day) => Span::styled(format!("{:>3} ", day.day()), day_style(calendar, *day)),
                None => Span::raw("    "),
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        "←→ day  ↑↓ week  PgUp/PgDn month",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(calendar.title.clone())
            .borders(Borders::ALL),
    );
    frame.render_widget(widget, area);
}

fn day_style(calendar: &CalendarOverlay, day: NaiveDate) -> Style {
    let mut style = if calendar.is_disabled(day) {
        Style::default().fg(Color::DarkGray)
    } else if calendar.is_selected(day) {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    if day == calendar.today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if day == calendar.cursor {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn weeks_cover_the_whole_month() {
        // March 2025 starts on a Saturday and spans six rows.
        let weeks = calendar_weeks(date(2025, 3, 20));
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][6], Some(date(2025, 3, 1)));
        assert_eq!(weeks[0][0], None);
        assert_eq!(weeks[5][1], Some(date(2025, 3, 31)));
    }

    #[test]
    fn popup_fits_inside_area() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = popup_rect(area, 40, 4);
        assert_eq!(popup.width, 20);
        assert_eq!(popup.y, 3);
    }
}
