use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::domain::FieldKind;
use crate::form::{FieldState, FormState, field::components::ComponentKind};

pub fn render_fields(
    frame: &mut Frame<'_>,
    area: Rect,
    form_state: &mut FormState,
    enable_cursor: bool,
) {
    let selected_index = form_state.field_index();
    let content_width = area.width.saturating_sub(4);
    let renders = form_state
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| build_field_render(field, idx == selected_index, content_width))
        .collect::<Vec<_>>();
    adjust_scroll_offset(form_state, selected_index, area.height);

    let mut cursor_hint: Option<CursorHint> = None;
    let mut line_offset = 0usize;
    let mut items = Vec::with_capacity(renders.len());
    for (idx, render) in renders.into_iter().enumerate() {
        if idx >= form_state.scroll_offset
            && let Some(mut hint) = render.cursor_hint
        {
            hint.line_offset += line_offset;
            cursor_hint = Some(hint);
        }
        if idx >= form_state.scroll_offset {
            line_offset += render.lines.len();
        }
        items.push(ListItem::new(render.lines));
    }

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));
    *list_state.offset_mut() = form_state.scroll_offset;

    let list = List::new(items)
        .block(
            Block::default()
                .title(form_state.title.clone())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);

    if enable_cursor && let Some(cursor) = cursor_hint {
        let inner_y = area.y.saturating_add(1);
        let inner_x = area.x.saturating_add(1);
        let line = cursor
            .line_offset
            .min(area.height.saturating_sub(2) as usize) as u16;
        frame.set_cursor_position((
            inner_x.saturating_add(4).saturating_add(cursor.value_width),
            inner_y.saturating_add(line),
        ));
    }
}

fn adjust_scroll_offset(form_state: &mut FormState, selected: usize, height: u16) {
    let window = (height.saturating_sub(2) / 5) as usize;
    if window == 0 {
        form_state.scroll_offset = selected;
        return;
    }
    if selected < form_state.scroll_offset {
        form_state.scroll_offset = selected;
    } else if selected >= form_state.scroll_offset + window {
        form_state.scroll_offset = selected + 1 - window;
    }
}

struct FieldRender {
    lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

struct CursorHint {
    line_offset: usize,
    value_width: u16,
}

fn build_field_render(field: &FieldState, is_selected: bool, max_width: u16) -> FieldRender {
    let display = &field.descriptor.display;
    let mut lines = Vec::new();

    if !display.hide_label {
        let label_style = if field.is_disabled() {
            Style::default().fg(Color::DarkGray)
        } else if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![Span::styled(field.descriptor.display_label(), label_style)];
        spans.push(Span::styled(
            format!("  {}", field.descriptor.type_tag()),
            Style::default().fg(Color::DarkGray),
        ));
        if field.is_disabled() {
            spans.push(Span::styled("  • disabled", Style::default().fg(Color::DarkGray)));
        } else if field.dirty {
            spans.push(Span::styled("  • edited", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
    }

    if !display.hide_description
        && let Some(description) = &display.description
    {
        for line in wrap(description, max_width.max(4) as usize) {
            lines.push(Line::from(Span::styled(
                format!("  {line}"),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let value_start = lines.len();
    let (value_lines, cursor_row, cursor_width) = value_lines(field, max_width);
    let value_style = if field.is_disabled() {
        Style::default().fg(Color::DarkGray)
    } else if is_selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let gutter_style = if is_selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    for segment in value_lines {
        lines.push(Line::from(vec![
            Span::styled("  │ ", gutter_style),
            Span::styled(segment, value_style),
        ]));
    }

    let cursor_hint = (is_selected && takes_text_cursor(field)).then(|| CursorHint {
        line_offset: value_start + cursor_row,
        value_width: cursor_width as u16,
    });

    if let Some(message) = field.message() {
        let style = if field.error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::LightRed)
        };
        for line in wrap(message, max_width.max(4) as usize) {
            lines.push(Line::from(Span::styled(format!("  ✗ {line}"), style)));
        }
    }
    lines.push(Line::from(""));

    FieldRender { lines, cursor_hint }
}

/// The widget text, one entry per rendered line, plus the row and column
/// where typing continues. Textareas keep their own line breaks and get at
/// least their configured number of rows.
fn value_lines(field: &FieldState, max_width: u16) -> (Vec<String>, usize, usize) {
    let mut text = field.display_value();
    let mut showing_placeholder = false;
    if text.is_empty()
        && let Some(placeholder) = &field.descriptor.display.placeholder
        && takes_text_cursor(field)
    {
        text = placeholder.clone();
        showing_placeholder = true;
    }
    let width = max_width.max(4) as usize;
    let mut lines = text
        .split('\n')
        .flat_map(|paragraph| {
            let wrapped = wrap(paragraph, width)
                .into_iter()
                .map(|segment| segment.into_owned())
                .collect::<Vec<_>>();
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped
            }
        })
        .collect::<Vec<_>>();
    if let FieldKind::Textarea(config) = &field.descriptor.kind
        && let Some(max_rows) = config.max_rows
    {
        let max_rows = usize::from(max_rows.max(1));
        if lines.len() > max_rows {
            lines.drain(..lines.len() - max_rows);
        }
    }
    let cursor_row = lines.len().saturating_sub(1);
    let cursor_width = if showing_placeholder {
        0
    } else {
        lines.last().map(|line| line.width()).unwrap_or(0)
    };
    if let FieldKind::Textarea(config) = &field.descriptor.kind {
        while lines.len() < usize::from(config.min_rows) {
            lines.push(String::new());
        }
    }
    (lines, cursor_row, cursor_width)
}

fn takes_text_cursor(field: &FieldState) -> bool {
    !field.is_disabled()
        && matches!(
            field.kind(),
            ComponentKind::TextInput
                | ComponentKind::Password
                | ComponentKind::Textarea
                | ComponentKind::Link
                | ComponentKind::Number
        )
}
