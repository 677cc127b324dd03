mod body;
mod fields;
mod footer;
mod overlay;

pub use body::render_body;
pub use footer::{render_footer, render_toasts};
pub use overlay::{calendar_weeks, popup_rect, render_overlay};
