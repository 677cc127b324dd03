use std::{borrow::Cow, sync::Arc, time::Duration};

use chrono::NaiveDateTime;

use crate::form::DispatchContext;
use crate::form::field::components::{
    ChoiceBehaviour, ComponentPalette, NumericTuning, PickerCopy, SelectorCopy,
    SwitchPresentation,
};
use crate::widgets::TextDirection;

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub auto_validate: bool,
    pub confirm_exit: bool,
    pub show_help: bool,
    pub direction: TextDirection,
    /// Fixed "now" for date widgets; the local clock when unset.
    pub clock: Option<NaiveDateTime>,
    pub(crate) component_palette: Arc<ComponentPalette>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            auto_validate: true,
            confirm_exit: true,
            show_help: true,
            direction: TextDirection::Ltr,
            clock: None,
            component_palette: Arc::new(ComponentPalette::default()),
        }
    }
}

impl UiOptions {
    pub fn with_auto_validate(mut self, enabled: bool) -> Self {
        self.auto_validate = enabled;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn with_component_palette(mut self, palette: ComponentPalette) -> Self {
        self.component_palette = Arc::new(palette);
        self
    }

    pub fn with_numeric_tuning(self, tuning: NumericTuning) -> Self {
        self.map_palette(|palette| palette.with_numeric(tuning))
    }

    pub fn with_fast_step_factor(self, factor: f64) -> Self {
        self.map_palette(|mut palette| {
            palette.numeric = palette.numeric.with_fast_factor(factor);
            palette
        })
    }

    pub fn with_switch_presentation(self, presentation: SwitchPresentation) -> Self {
        self.map_palette(|palette| palette.with_switch_presentation(presentation))
    }

    pub fn with_switch_labels(
        self,
        on_label: impl Into<Cow<'static, str>>,
        off_label: impl Into<Cow<'static, str>>,
    ) -> Self {
        let on_label = on_label.into();
        let off_label = off_label.into();
        self.map_palette(|mut palette| {
            palette.switches = palette.switches.clone().with_labels(on_label, off_label);
            palette
        })
    }

    pub fn with_choice_behaviour(self, behaviour: ChoiceBehaviour) -> Self {
        self.map_palette(|palette| palette.with_choice_behaviour(behaviour))
    }

    pub fn with_choice_wrap(self, wrap: bool) -> Self {
        self.map_palette(|mut palette| {
            palette.choices = palette.choices.clone().with_wrap(wrap);
            palette
        })
    }

    pub fn with_selector_copy(self, copy: SelectorCopy) -> Self {
        self.map_palette(|palette| palette.with_selector_copy(copy))
    }

    pub fn with_empty_text(self, text: impl Into<Cow<'static, str>>) -> Self {
        let text = text.into();
        self.map_palette(|mut palette| {
            palette.selectors = palette.selectors.clone().with_empty_text(text);
            palette
        })
    }

    pub fn with_picker_copy(self, copy: PickerCopy) -> Self {
        self.map_palette(|palette| palette.with_picker_copy(copy))
    }

    pub fn component_palette(&self) -> Arc<ComponentPalette> {
        Arc::clone(&self.component_palette)
    }

    /// Widget construction context for these options.
    pub fn dispatch_context(&self) -> DispatchContext {
        let ctx = DispatchContext::new(self.component_palette()).with_direction(self.direction);
        match self.clock {
            Some(now) => ctx.with_now(now),
            None => ctx,
        }
    }

    fn map_palette(mut self, map: impl FnOnce(ComponentPalette) -> ComponentPalette) -> Self {
        let updated = map((*self.component_palette).clone());
        self.component_palette = Arc::new(updated);
        self
    }
}
