use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::ChoiceOption;

use super::{TextDirection, label_matches};

/// Interaction state of one multi-value selector.
///
/// `values` keeps selected option ids in the order they were picked.
/// `active_index` is the chip cursor, `highlighted` the cursor inside the
/// filtered option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelectState {
    pub values: Vec<String>,
    pub input: String,
    pub open: bool,
    pub active_index: Option<usize>,
    pub highlighted: usize,
}

impl MultiSelectState {
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        Self {
            values: deduped,
            ..Self::default()
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.values.iter().any(|value| value == id)
    }
}

/// Static configuration the reducer consults: the option list and caps.
#[derive(Debug, Clone, Copy)]
pub struct MultiSelectRules<'a> {
    pub options: &'a [ChoiceOption],
    pub max_selected: Option<usize>,
    pub loop_navigation: bool,
    pub wrap_list: bool,
}

impl<'a> MultiSelectRules<'a> {
    pub fn new(options: &'a [ChoiceOption]) -> Self {
        Self {
            options,
            max_selected: None,
            loop_navigation: false,
            wrap_list: true,
        }
    }

    pub fn with_max_selected(mut self, max: Option<usize>) -> Self {
        self.max_selected = max;
        self
    }

    pub fn with_loop(mut self, enabled: bool) -> Self {
        self.loop_navigation = enabled;
        self
    }

    pub fn with_wrap_list(mut self, enabled: bool) -> Self {
        self.wrap_list = enabled;
        self
    }

    pub fn option(&self, id: &str) -> Option<&'a ChoiceOption> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn label_for(&self, id: &'a str) -> &'a str {
        self.option(id).map(|option| option.label.as_str()).unwrap_or(id)
    }

    fn at_capacity(&self, selected: usize) -> bool {
        self.max_selected.is_some_and(|max| selected >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelectAction {
    Toggle(String),
    /// Select every enabled option matching the query, or clear them when
    /// they are all selected already.
    ToggleAll,
    SetInput(String),
    SetOpen(bool),
    SetActiveIndex(Option<usize>),
    Next,
    Prev,
    ResetActive,
    /// Remove the chip under the cursor, or the most recent selection.
    RemoveActive,
    MoveHighlight(i32),
    ToggleHighlighted,
    /// Close the list and forget all ephemeral interaction state.
    Dismiss,
}

pub fn reduce(
    mut state: MultiSelectState,
    action: MultiSelectAction,
    rules: &MultiSelectRules<'_>,
) -> MultiSelectState {
    match action {
        MultiSelectAction::Toggle(id) => toggle(&mut state, &id, rules),
        MultiSelectAction::ToggleAll => toggle_all(&mut state, rules),
        MultiSelectAction::SetInput(input) => {
            state.input = input;
            state.highlighted = 0;
            state.open = true;
        }
        MultiSelectAction::SetOpen(open) => {
            state.open = open;
            if !open {
                state.input.clear();
                state.highlighted = 0;
            }
        }
        MultiSelectAction::SetActiveIndex(index) => {
            state.active_index = index.filter(|index| *index < state.values.len());
        }
        MultiSelectAction::Next => {
            let len = state.values.len();
            state.active_index = match state.active_index {
                _ if len == 0 => None,
                None => Some(0),
                Some(index) if index + 1 >= len => {
                    if rules.loop_navigation {
                        Some(0)
                    } else {
                        Some(len - 1)
                    }
                }
                Some(index) => Some(index + 1),
            };
        }
        MultiSelectAction::Prev => {
            let len = state.values.len();
            state.active_index = match state.active_index {
                _ if len == 0 => None,
                None => Some(len - 1),
                Some(0) => {
                    if rules.loop_navigation {
                        Some(len - 1)
                    } else {
                        Some(0)
                    }
                }
                Some(index) => Some(index.min(len) - 1),
            };
        }
        MultiSelectAction::ResetActive => state.active_index = None,
        MultiSelectAction::RemoveActive => remove_active(&mut state),
        MultiSelectAction::MoveHighlight(delta) => {
            let len = filter_choices(rules.options, &state.input).len();
            state.highlighted = step_index(state.highlighted, delta, len, rules.wrap_list);
        }
        MultiSelectAction::ToggleHighlighted => {
            let target = filter_choices(rules.options, &state.input)
                .get(state.highlighted)
                .map(|option| option.id.clone());
            if let Some(id) = target {
                toggle(&mut state, &id, rules);
            }
        }
        MultiSelectAction::Dismiss => {
            state.open = false;
            state.input.clear();
            state.highlighted = 0;
            state.active_index = None;
        }
    }
    state
}

fn toggle(state: &mut MultiSelectState, id: &str, rules: &MultiSelectRules<'_>) {
    if let Some(position) = state.values.iter().position(|value| value == id) {
        state.values.remove(position);
        clamp_active(state);
        return;
    }
    match rules.option(id) {
        None => {
            tracing::debug!(option = id, "ignoring toggle of unknown option");
            return;
        }
        Some(option) if option.disabled => {
            tracing::debug!(option = id, "ignoring toggle of disabled option");
            return;
        }
        Some(_) => {}
    }
    if rules.at_capacity(state.values.len()) {
        tracing::debug!(option = id, "selection cap reached");
        return;
    }
    state.values.push(id.to_string());
}

fn toggle_all(state: &mut MultiSelectState, rules: &MultiSelectRules<'_>) {
    let selectable = filter_choices(rules.options, &state.input)
        .into_iter()
        .filter(|option| !option.disabled)
        .collect::<Vec<_>>();
    if selectable.is_empty() {
        return;
    }
    let all_selected = selectable.iter().all(|option| state.is_selected(&option.id));
    if all_selected {
        state
            .values
            .retain(|value| !selectable.iter().any(|option| &option.id == value));
        clamp_active(state);
    } else {
        for option in selectable {
            if state.is_selected(&option.id) {
                continue;
            }
            if rules.at_capacity(state.values.len()) {
                tracing::debug!("selection cap reached during toggle-all");
                break;
            }
            state.values.push(option.id.clone());
        }
    }
}

fn remove_active(state: &mut MultiSelectState) {
    match state.active_index {
        Some(index) if index < state.values.len() => {
            state.values.remove(index);
            state.active_index = if state.values.is_empty() {
                None
            } else {
                Some(index.saturating_sub(1))
            };
        }
        Some(_) => clamp_active(state),
        None => {
            if state.input.is_empty() {
                state.values.pop();
            }
        }
    }
}

fn clamp_active(state: &mut MultiSelectState) {
    let len = state.values.len();
    state.active_index = match state.active_index {
        Some(_) if len == 0 => None,
        Some(index) => Some(index.min(len - 1)),
        None => None,
    };
}

pub(crate) fn step_index(current: usize, delta: i32, len: usize, wrap: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    let next = current.min(len as usize - 1) as i64 + i64::from(delta);
    let bounded = if wrap {
        next.rem_euclid(len)
    } else {
        next.clamp(0, len - 1)
    };
    bounded as usize
}

/// Options whose label contains `query`, case-insensitively, in list order.
pub fn filter_choices<'a>(options: &'a [ChoiceOption], query: &str) -> Vec<&'a ChoiceOption> {
    options
        .iter()
        .filter(|option| label_matches(&option.label, query))
        .collect()
}

/// Chips that render, plus how many selections are folded into the
/// "+K selected" badge.
pub fn truncate_chips(values: &[String], items_shown: usize) -> (&[String], usize) {
    let shown = values.len().min(items_shown);
    (&values[..shown], values.len() - shown)
}

/// Map a key press to a reducer action following the selector's keyboard
/// protocol. `None` means the key is not for this widget.
pub fn key_action(
    state: &MultiSelectState,
    rules: &MultiSelectRules<'_>,
    key: &KeyEvent,
    direction: TextDirection,
) -> Option<MultiSelectAction> {
    let at_input_start = state.input.is_empty();
    let has_values = !state.values.is_empty();
    let can_advance = has_values && (state.active_index.is_some() || rules.loop_navigation);
    let retreat = at_input_start && has_values;

    match key.code {
        KeyCode::Left => match direction {
            TextDirection::Ltr if retreat => Some(MultiSelectAction::Prev),
            TextDirection::Rtl if can_advance => Some(MultiSelectAction::Next),
            _ => None,
        },
        KeyCode::Right => match direction {
            TextDirection::Ltr if can_advance => Some(MultiSelectAction::Next),
            TextDirection::Rtl if retreat => Some(MultiSelectAction::Prev),
            _ => None,
        },
        KeyCode::Backspace | KeyCode::Delete => {
            if state.active_index.is_some() || retreat {
                Some(MultiSelectAction::RemoveActive)
            } else if key.code == KeyCode::Backspace && !at_input_start {
                let mut input = state.input.clone();
                input.pop();
                Some(MultiSelectAction::SetInput(input))
            } else {
                None
            }
        }
        KeyCode::Enter if state.open => Some(MultiSelectAction::ToggleHighlighted),
        KeyCode::Enter => Some(MultiSelectAction::SetOpen(true)),
        KeyCode::Esc => {
            if state.active_index.is_some() {
                Some(MultiSelectAction::ResetActive)
            } else if state.open {
                Some(MultiSelectAction::Dismiss)
            } else {
                None
            }
        }
        KeyCode::Up if state.open => Some(MultiSelectAction::MoveHighlight(-1)),
        KeyCode::Down if state.open => Some(MultiSelectAction::MoveHighlight(1)),
        KeyCode::Char('a') if state.open && key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(MultiSelectAction::ToggleAll)
        }
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut input = state.input.clone();
            input.push(ch);
            Some(MultiSelectAction::SetInput(input))
        }
        _ => None,
    }
}
