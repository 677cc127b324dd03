mod actions;
mod controller;
mod dispatch;
pub mod field;
mod reducers;
mod state;

pub use actions::FormCommand;
pub use controller::{FormController, Listener, MemoryController, Subscription};
pub use dispatch::{DispatchContext, build_component};
pub use field::{FieldState, FieldValue, UploadedFile};
pub use reducers::{FormEngine, apply_command};
pub use state::FormState;
