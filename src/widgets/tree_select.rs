use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::TreeOption;

use super::{label_matches, multi_select::step_index};

/// Enabled leaf ids under `option`, depth first. A disabled node contributes
/// nothing, and neither does anything below it.
pub fn leaf_values(option: &TreeOption) -> Vec<String> {
    let mut leaves = Vec::new();
    collect_leaves(option, &mut leaves);
    leaves
}

fn collect_leaves(option: &TreeOption, out: &mut Vec<String>) {
    if option.disabled {
        return;
    }
    if option.is_leaf() {
        out.push(option.id.clone());
        return;
    }
    for child in &option.children {
        collect_leaves(child, out);
    }
}

pub fn is_fully_selected(option: &TreeOption, values: &[String]) -> bool {
    let leaves = leaf_values(option);
    !leaves.is_empty() && leaves.iter().all(|leaf| values.contains(leaf))
}

pub fn is_partially_selected(option: &TreeOption, values: &[String]) -> bool {
    let leaves = leaf_values(option);
    let selected = leaves.iter().filter(|leaf| values.contains(leaf)).count();
    selected > 0 && selected < leaves.len()
}

/// Roll-up toggle of every enabled leaf under `option`.
///
/// A fully selected node loses all its leaves; otherwise all of them are
/// added. An addition that would exceed `max_selected` is rejected as a whole
/// and the current values are returned unchanged.
pub fn handle_select(
    option: &TreeOption,
    values: &[String],
    max_selected: Option<usize>,
) -> Vec<String> {
    if option.disabled {
        return values.to_vec();
    }
    let leaves = leaf_values(option);
    if leaves.is_empty() {
        return values.to_vec();
    }
    if leaves.iter().all(|leaf| values.contains(leaf)) {
        return values
            .iter()
            .filter(|value| !leaves.contains(value))
            .cloned()
            .collect();
    }

    let mut next = values.to_vec();
    for leaf in leaves {
        if !next.contains(&leaf) {
            next.push(leaf);
        }
    }
    if let Some(max) = max_selected
        && next.len() > max
    {
        tracing::debug!(
            node = %option.id,
            requested = next.len(),
            max,
            "roll-up selection rejected by cap"
        );
        return values.to_vec();
    }
    next
}

/// Prune the tree to nodes whose label contains `query` or that have a
/// surviving descendant. A node that matches on its own label but has no
/// matching descendants keeps its full subtree. The input is never modified;
/// an empty query returns an identical copy.
pub fn filter_options(options: &[TreeOption], query: &str) -> Vec<TreeOption> {
    if query.is_empty() {
        return options.to_vec();
    }
    options
        .iter()
        .filter_map(|option| {
            let matches = label_matches(&option.label, query);
            let children = filter_options(&option.children, query);
            if !matches && children.is_empty() {
                return None;
            }
            Some(TreeOption {
                children: if children.is_empty() {
                    option.children.clone()
                } else {
                    children
                },
                ..option.clone()
            })
        })
        .collect()
}

/// Labels of the selected leaves, in selection order.
pub fn selected_labels(options: &[TreeOption], values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| find_leaf(options, value).map(|leaf| leaf.label.clone()))
        .collect()
}

fn find_leaf<'a>(options: &'a [TreeOption], id: &str) -> Option<&'a TreeOption> {
    for option in options {
        if option.is_leaf() {
            if option.id == id {
                return Some(option);
            }
        } else if let Some(found) = find_leaf(&option.children, id) {
            return Some(found);
        }
    }
    None
}

/// Trigger text: the placeholder when nothing is selected, otherwise the
/// first `max_display_items` labels followed by `+K` for the rest.
pub fn button_text(
    options: &[TreeOption],
    values: &[String],
    max_display_items: usize,
    placeholder: &str,
) -> String {
    if values.is_empty() {
        return placeholder.to_string();
    }
    let labels = selected_labels(options, values);
    if labels.len() <= max_display_items {
        return labels.join(", ");
    }
    format!(
        "{} +{}",
        labels[..max_display_items].join(", "),
        labels.len() - max_display_items
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Partial,
    Unchecked,
}

/// One visible line of the open tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Child indices from the root of the (filtered) tree.
    pub path: Vec<usize>,
    pub label: String,
    pub depth: usize,
    pub branch: bool,
    pub expanded: bool,
    pub check: CheckState,
    /// Disabled option, or the cap is reached and this node is not selected.
    pub disabled: bool,
}

/// Flatten the tree into rows, descending only into expanded branches (or
/// every branch when `expand_all` is set, as while a search is active).
pub fn visible_rows(
    options: &[TreeOption],
    values: &[String],
    expanded: &HashSet<String>,
    expand_all: bool,
    max_selected: Option<usize>,
) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut path = Vec::new();
    push_rows(
        options,
        values,
        expanded,
        expand_all,
        max_selected,
        &mut path,
        &mut rows,
    );
    rows
}

fn push_rows(
    options: &[TreeOption],
    values: &[String],
    expanded: &HashSet<String>,
    expand_all: bool,
    max_selected: Option<usize>,
    path: &mut Vec<usize>,
    rows: &mut Vec<TreeRow>,
) {
    for (index, option) in options.iter().enumerate() {
        path.push(index);
        let fully = is_fully_selected(option, values);
        let check = if fully {
            CheckState::Checked
        } else if is_partially_selected(option, values) {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        };
        let reached_max = max_selected.is_some_and(|max| values.len() >= max) && !fully;
        let branch = !option.is_leaf();
        let is_expanded = branch && (expand_all || expanded.contains(&option.id));
        rows.push(TreeRow {
            path: path.clone(),
            label: option.label.clone(),
            depth: path.len() - 1,
            branch,
            expanded: is_expanded,
            check,
            disabled: option.disabled || reached_max,
        });
        if is_expanded {
            push_rows(
                &option.children,
                values,
                expanded,
                expand_all,
                max_selected,
                path,
                rows,
            );
        }
        path.pop();
    }
}

fn node_at<'a>(options: &'a [TreeOption], path: &[usize]) -> Option<&'a TreeOption> {
    let (first, rest) = path.split_first()?;
    let node = options.get(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at(&node.children, rest)
    }
}

/// Interaction state of one hierarchical selector. Expansion is tracked per
/// branch id and is independent of selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSelectState {
    pub values: Vec<String>,
    pub open: bool,
    pub query: String,
    pub cursor: usize,
    pub expanded: HashSet<String>,
}

impl TreeSelectState {
    pub fn with_values(values: Vec<String>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Rows currently shown for this state.
    pub fn rows(&self, rules: &TreeSelectRules<'_>) -> Vec<TreeRow> {
        let filtered = filter_options(rules.options, &self.query);
        visible_rows(
            &filtered,
            &self.values,
            &self.expanded,
            !self.query.is_empty(),
            rules.max_selected,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeSelectRules<'a> {
    pub options: &'a [TreeOption],
    pub max_selected: Option<usize>,
    pub wrap: bool,
}

impl<'a> TreeSelectRules<'a> {
    pub fn new(options: &'a [TreeOption]) -> Self {
        Self {
            options,
            max_selected: None,
            wrap: true,
        }
    }

    pub fn with_max_selected(mut self, max: Option<usize>) -> Self {
        self.max_selected = max;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSelectAction {
    SetOpen(bool),
    SetQuery(String),
    MoveCursor(i32),
    ToggleExpand,
    Expand,
    Collapse,
    /// Roll-up toggle of the node under the cursor.
    SelectCursor,
    /// Cancel the popup: close it and fold every branch back up.
    /// `SetOpen(false)` keeps the expansion for the next opening.
    Dismiss,
}

pub fn reduce(
    mut state: TreeSelectState,
    action: TreeSelectAction,
    rules: &TreeSelectRules<'_>,
) -> TreeSelectState {
    match action {
        TreeSelectAction::SetOpen(open) => {
            state.open = open;
            if !open {
                state.query.clear();
                state.cursor = 0;
            }
        }
        TreeSelectAction::SetQuery(query) => {
            state.query = query;
            state.cursor = 0;
            state.open = true;
        }
        TreeSelectAction::MoveCursor(delta) => {
            let len = state.rows(rules).len();
            state.cursor = step_index(state.cursor, delta, len, rules.wrap);
        }
        TreeSelectAction::ToggleExpand => set_expanded(&mut state, rules, None),
        TreeSelectAction::Expand => set_expanded(&mut state, rules, Some(true)),
        TreeSelectAction::Collapse => set_expanded(&mut state, rules, Some(false)),
        TreeSelectAction::SelectCursor => {
            let filtered = filter_options(rules.options, &state.query);
            let rows = state.rows(rules);
            if let Some(row) = rows.get(state.cursor) {
                if row.disabled {
                    tracing::debug!(row = %row.label, "ignoring selection of disabled row");
                } else if let Some(node) = node_at(&filtered, &row.path) {
                    state.values = handle_select(node, &state.values, rules.max_selected);
                }
            }
        }
        TreeSelectAction::Dismiss => {
            state.open = false;
            state.query.clear();
            state.cursor = 0;
            state.expanded.clear();
        }
    }
    state
}

fn set_expanded(state: &mut TreeSelectState, rules: &TreeSelectRules<'_>, expand: Option<bool>) {
    let filtered = filter_options(rules.options, &state.query);
    let rows = state.rows(rules);
    let Some(id) = rows
        .get(state.cursor)
        .filter(|row| row.branch)
        .and_then(|row| node_at(&filtered, &row.path))
        .map(|node| node.id.clone())
    else {
        return;
    };
    if expand.unwrap_or(!state.expanded.contains(&id)) {
        state.expanded.insert(id);
    } else {
        state.expanded.remove(&id);
    }
}

/// Key protocol of the open tree: arrows move and fold, Enter toggles the
/// row, typing filters, Escape closes. A closed selector only reacts to Enter.
pub fn key_action(state: &TreeSelectState, key: &KeyEvent) -> Option<TreeSelectAction> {
    if !state.open {
        return match key.code {
            KeyCode::Enter => Some(TreeSelectAction::SetOpen(true)),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up => Some(TreeSelectAction::MoveCursor(-1)),
        KeyCode::Down => Some(TreeSelectAction::MoveCursor(1)),
        KeyCode::Right => Some(TreeSelectAction::Expand),
        KeyCode::Left => Some(TreeSelectAction::Collapse),
        KeyCode::Enter => Some(TreeSelectAction::SelectCursor),
        KeyCode::Esc => Some(TreeSelectAction::Dismiss),
        KeyCode::Backspace => {
            let mut query = state.query.clone();
            query.pop().map(|_| TreeSelectAction::SetQuery(query))
        }
        KeyCode::Char(' ') if state.query.is_empty() => Some(TreeSelectAction::ToggleExpand),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut query = state.query.clone();
            query.push(ch);
            Some(TreeSelectAction::SetQuery(query))
        }
        _ => None,
    }
}
