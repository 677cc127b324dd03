use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::StatusTone;
use crate::form::{FormState, field::components::OverlayView};
use crate::validation::Toast;

use super::components::{render_body, render_footer, render_overlay, render_toasts};

pub struct UiContext<'a> {
    pub form_state: &'a mut FormState,
    pub status_message: &'a str,
    pub status_tone: StatusTone,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
    pub focus_label: Option<String>,
    pub global_errors: &'a [String],
    pub toasts: &'a [Toast],
    pub overlay: Option<OverlayView>,
}

pub fn draw(frame: &mut Frame<'_>, mut ctx: UiContext<'_>) {
    let toast_height = if ctx.toasts.is_empty() {
        0
    } else {
        ctx.toasts.len() as u16 + 1
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(7),
            Constraint::Length(toast_height),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let cursor_enabled = ctx.overlay.is_none();
    render_body(frame, chunks[0], &mut *ctx.form_state, cursor_enabled);
    if toast_height > 0 {
        render_toasts(frame, chunks[1], ctx.toasts);
    }
    render_footer(frame, chunks[2], &ctx);

    if let Some(overlay) = &ctx.overlay {
        render_overlay(frame, overlay);
    }
}
