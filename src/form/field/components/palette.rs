use std::borrow::Cow;

/// Keyboard stepping for numeric fields and sliders.
#[derive(Debug, Clone)]
pub struct NumericTuning {
    /// Multiplier applied to the field's own step while Shift is held.
    pub fast_factor: f64,
    pub step_with_arrows: bool,
}

impl NumericTuning {
    #[inline]
    pub fn step(&self, base: f64, fast: bool) -> f64 {
        if fast { base * self.fast_factor } else { base }
    }

    pub fn with_fast_factor(mut self, factor: f64) -> Self {
        self.fast_factor = factor.max(1.0);
        self
    }

    pub fn with_step_with_arrows(mut self, enabled: bool) -> Self {
        self.step_with_arrows = enabled;
        self
    }
}

impl Default for NumericTuning {
    fn default() -> Self {
        Self {
            fast_factor: 10.0,
            step_with_arrows: true,
        }
    }
}

/// Labels and toggling keys of switch fields.
#[derive(Debug, Clone)]
pub struct SwitchPresentation {
    pub on_label: Cow<'static, str>,
    pub off_label: Cow<'static, str>,
    pub toggle_with_space: bool,
    pub toggle_with_arrows: bool,
}

impl SwitchPresentation {
    pub fn with_labels(
        mut self,
        on_label: impl Into<Cow<'static, str>>,
        off_label: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.on_label = on_label.into();
        self.off_label = off_label.into();
        self
    }

    pub fn with_toggle_with_space(mut self, enabled: bool) -> Self {
        self.toggle_with_space = enabled;
        self
    }

    pub fn with_toggle_with_arrows(mut self, enabled: bool) -> Self {
        self.toggle_with_arrows = enabled;
        self
    }
}

impl Default for SwitchPresentation {
    fn default() -> Self {
        Self {
            on_label: Cow::Borrowed("on"),
            off_label: Cow::Borrowed("off"),
            toggle_with_space: true,
            toggle_with_arrows: true,
        }
    }
}

/// Cursor behaviour of single-choice fields and option lists.
#[derive(Debug, Clone)]
pub struct ChoiceBehaviour {
    pub wrap_around: bool,
}

impl ChoiceBehaviour {
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap_around = wrap;
        self
    }
}

impl Default for ChoiceBehaviour {
    fn default() -> Self {
        Self { wrap_around: true }
    }
}

/// Copy shown by the selector widgets. `{count}`, `{selected}` and
/// `{total}` are substituted.
#[derive(Debug, Clone)]
pub struct SelectorCopy {
    pub placeholder: Cow<'static, str>,
    pub search_placeholder: Cow<'static, str>,
    pub empty_text: Cow<'static, str>,
    pub overflow_badge: Cow<'static, str>,
    pub counter: Cow<'static, str>,
    pub toggle_all_label: Cow<'static, str>,
    /// Lists with at least this many options offer "toggle all".
    pub toggle_all_threshold: usize,
}

impl SelectorCopy {
    pub fn with_placeholder(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.placeholder = text.into();
        self
    }

    pub fn with_search_placeholder(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.search_placeholder = text.into();
        self
    }

    pub fn with_empty_text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.empty_text = text.into();
        self
    }

    pub fn with_overflow_badge(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.overflow_badge = template.into();
        self
    }

    pub fn with_counter(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.counter = template.into();
        self
    }

    pub fn with_toggle_all_threshold(mut self, threshold: usize) -> Self {
        self.toggle_all_threshold = threshold;
        self
    }

    pub fn overflow(&self, count: usize) -> String {
        self.overflow_badge.replace("{count}", &count.to_string())
    }

    pub fn count(&self, selected: usize, total: usize) -> String {
        self.counter
            .replace("{selected}", &selected.to_string())
            .replace("{total}", &total.to_string())
    }
}

impl Default for SelectorCopy {
    fn default() -> Self {
        Self {
            placeholder: Cow::Borrowed("Select options"),
            search_placeholder: Cow::Borrowed("Search..."),
            empty_text: Cow::Borrowed("No results found."),
            overflow_badge: Cow::Borrowed("+{count} selected"),
            counter: Cow::Borrowed("{selected} of {total} selected"),
            toggle_all_label: Cow::Borrowed("Toggle all (Ctrl+A)"),
            toggle_all_threshold: 5,
        }
    }
}

/// Copy of the date, datetime and upload fields.
#[derive(Debug, Clone)]
pub struct PickerCopy {
    pub date_placeholder: Cow<'static, str>,
    pub datetime_placeholder: Cow<'static, str>,
    pub upload_hint: Cow<'static, str>,
}

impl PickerCopy {
    pub fn with_date_placeholder(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.date_placeholder = text.into();
        self
    }

    pub fn with_datetime_placeholder(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.datetime_placeholder = text.into();
        self
    }

    pub fn with_upload_hint(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.upload_hint = text.into();
        self
    }
}

impl Default for PickerCopy {
    fn default() -> Self {
        Self {
            date_placeholder: Cow::Borrowed("Pick a date"),
            datetime_placeholder: Cow::Borrowed("e.g. tomorrow 14:00"),
            upload_hint: Cow::Borrowed("type a file path and press Enter"),
        }
    }
}

/// Aggregated look-and-feel knobs handed to every component.
#[derive(Debug, Clone, Default)]
pub struct ComponentPalette {
    pub numeric: NumericTuning,
    pub switches: SwitchPresentation,
    pub choices: ChoiceBehaviour,
    pub selectors: SelectorCopy,
    pub pickers: PickerCopy,
}

impl ComponentPalette {
    pub fn with_numeric(mut self, tuning: NumericTuning) -> Self {
        self.numeric = tuning;
        self
    }

    pub fn with_switch_presentation(mut self, presentation: SwitchPresentation) -> Self {
        self.switches = presentation;
        self
    }

    pub fn with_choice_behaviour(mut self, behaviour: ChoiceBehaviour) -> Self {
        self.choices = behaviour;
        self
    }

    pub fn with_selector_copy(mut self, copy: SelectorCopy) -> Self {
        self.selectors = copy;
        self
    }

    pub fn with_picker_copy(mut self, copy: PickerCopy) -> Self {
        self.pickers = copy;
        self
    }
}
