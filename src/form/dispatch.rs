//! Field-type dispatch: one widget per descriptor variant.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::domain::{FieldDescriptor, FieldKind};
use crate::masks::resolve_mask;
use crate::widgets::TextDirection;

use super::field::components::{
    CheckboxComponent, ChoiceComponent, ChoiceStyle, ComboboxComponent, ComponentPalette,
    DateComponent, DateTimeComponent, FieldComponent, FileUploadComponent,
    HierarchicalComponent, MultiSelectComponent, NumberComponent, PreviewRegistry,
    SliderComponent, SwitchComponent, TextComponent, TextVariant,
};

/// Everything a widget needs besides its own descriptor.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub palette: Arc<ComponentPalette>,
    pub now: NaiveDateTime,
    pub previews: PreviewRegistry,
    pub direction: TextDirection,
}

impl DispatchContext {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self {
            palette,
            now: Local::now().naive_local(),
            previews: PreviewRegistry::new(),
            direction: TextDirection::default(),
        }
    }

    /// Pin the clock used for "today" and relative date text.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_previews(mut self, previews: PreviewRegistry) -> Self {
        self.previews = previews;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self::new(Arc::new(ComponentPalette::default()))
    }
}

/// Build the widget for `descriptor`. Each arm reads only the configuration
/// of its own variant; there is no fallback arm, so a new field type does
/// not compile until it is handled here.
pub fn build_component(
    descriptor: &FieldDescriptor,
    ctx: &DispatchContext,
) -> Box<dyn FieldComponent> {
    let palette = Arc::clone(&ctx.palette);
    let placeholder = descriptor.display.placeholder.clone();
    tracing::debug!(
        field = %descriptor.name,
        kind = descriptor.type_tag(),
        "building component"
    );
    match &descriptor.kind {
        FieldKind::Input(config) => Box::new(TextComponent::new(
            TextVariant::Plain,
            resolve_mask(config.mask.as_ref()),
        )),
        FieldKind::Password(config) => Box::new(TextComponent::new(
            TextVariant::Password,
            resolve_mask(config.mask.as_ref()),
        )),
        FieldKind::Textarea(config) => Box::new(TextComponent::new(
            TextVariant::Textarea,
            resolve_mask(config.mask.as_ref()),
        )),
        FieldKind::Link(config) => Box::new(TextComponent::new(
            TextVariant::Link,
            resolve_mask(config.mask.as_ref()),
        )),
        FieldKind::Number(config) => Box::new(NumberComponent::new(config.clone(), palette)),
        FieldKind::Date(config) => Box::new(DateComponent::new(
            config.clone(),
            placeholder,
            ctx.today(),
            palette,
        )),
        FieldKind::Datetime(config) => Box::new(DateTimeComponent::new(
            config.clone(),
            placeholder,
            ctx.now,
            palette,
        )),
        FieldKind::Slider(config) => Box::new(SliderComponent::new(config.clone(), palette)),
        FieldKind::Switch(_) => Box::new(SwitchComponent::new(palette)),
        FieldKind::Select(config) => Box::new(ChoiceComponent::new(
            ChoiceStyle::Dropdown,
            config.options.clone(),
            placeholder,
            palette,
        )),
        FieldKind::Radio(config) => Box::new(ChoiceComponent::new(
            ChoiceStyle::Radio,
            config.options.clone(),
            placeholder,
            palette,
        )),
        FieldKind::MultiSelect(config) => Box::new(MultiSelectComponent::new(
            config.clone(),
            placeholder,
            ctx.direction,
            palette,
        )),
        FieldKind::Checkbox(config) => Box::new(CheckboxComponent::new(config.options.clone())),
        FieldKind::Combobox(config) => Box::new(ComboboxComponent::new(
            config.options.clone(),
            placeholder,
            config.not_found_text.clone(),
            palette,
        )),
        FieldKind::FileUpload(config) => Box::new(FileUploadComponent::new(
            config.dropzone.clone(),
            ctx.previews.clone(),
            palette,
        )),
        FieldKind::Hierarchical(config) => Box::new(HierarchicalComponent::new(
            config.clone(),
            placeholder,
            palette,
        )),
    }
}
