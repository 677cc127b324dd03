mod components;
mod view;

pub use components::{calendar_weeks, popup_rect};
pub use view::{UiContext, draw};
