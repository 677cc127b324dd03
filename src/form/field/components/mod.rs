mod base;
mod checkbox;
mod choice;
mod combobox;
pub mod date;
pub mod datetime;
pub mod file_upload;
pub(crate) mod helpers;
mod hierarchical;
mod multi_select;
mod number;
pub mod palette;
mod slider;
mod switch;
mod text;

pub use base::{
    CalendarOverlay, ComponentKind, FieldComponent, KeyOutcome, ListOverlay, OverlayRow,
    OverlayView,
};
pub use checkbox::{CheckboxComponent, toggled};
pub use choice::{ChoiceComponent, ChoiceStyle};
pub use combobox::ComboboxComponent;
pub use date::{DateComponent, DateLocale, month_start};
pub use datetime::{DateTimeComponent, parse_natural_datetime, time_slots};
pub use file_upload::{
    FileUploadComponent, PreviewHandle, PreviewRegistry, UploadRejection, accepts, probe_file,
};
pub use hierarchical::HierarchicalComponent;
pub use multi_select::MultiSelectComponent;
pub use number::NumberComponent;
pub use palette::{
    ChoiceBehaviour, ComponentPalette, NumericTuning, PickerCopy, SelectorCopy, SwitchPresentation,
};
pub use slider::SliderComponent;
pub use switch::SwitchComponent;
pub use text::{TextComponent, TextVariant};
