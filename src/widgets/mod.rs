//! Keyboard state machines for the two composite selectors.
//!
//! Both are written as `(state, action) -> state` reducers over plain data so
//! the interaction protocol can be exercised without a terminal.

pub mod multi_select;
pub mod tree_select;

pub use multi_select::{
    MultiSelectAction, MultiSelectRules, MultiSelectState, filter_choices,
    key_action as multi_select_key, reduce as reduce_multi_select, truncate_chips,
};
pub use tree_select::{
    CheckState, TreeRow, TreeSelectAction, TreeSelectRules, TreeSelectState, button_text,
    filter_options, handle_select, is_fully_selected, is_partially_selected,
    key_action as tree_select_key, leaf_values, reduce as reduce_tree_select, selected_labels,
    visible_rows,
};

/// Reading direction of the host layout. Swaps the meaning of Left/Right when
/// moving across selected chips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

pub(crate) fn label_matches(label: &str, query: &str) -> bool {
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}
