use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::domain::HierarchicalField;
use crate::form::field::FieldValue;
use crate::widgets::{
    CheckState, TreeSelectAction, TreeSelectRules, TreeSelectState, button_text,
    reduce_tree_select, tree_select_key,
};

use super::{
    ComponentKind, FieldComponent, KeyOutcome, ListOverlay, OverlayRow, OverlayView,
    palette::ComponentPalette,
};

/// Tree selector with roll-up selection of leaves.
#[derive(Debug, Clone)]
pub struct HierarchicalComponent {
    config: HierarchicalField,
    state: TreeSelectState,
    placeholder: String,
    palette: Arc<ComponentPalette>,
}

impl HierarchicalComponent {
    pub fn new(
        config: HierarchicalField,
        placeholder: Option<String>,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        let placeholder =
            placeholder.unwrap_or_else(|| palette.selectors.placeholder.to_string());
        Self {
            config,
            state: TreeSelectState::default(),
            placeholder,
            palette,
        }
    }

    pub fn state(&self) -> &TreeSelectState {
        &self.state
    }

    fn rules(&self) -> TreeSelectRules<'_> {
        TreeSelectRules::new(&self.config.options)
            .with_max_selected(self.config.max_selected)
            .with_wrap(self.palette.choices.wrap_around)
    }

    pub fn apply(&mut self, action: TreeSelectAction) -> KeyOutcome {
        let before = self.state.values.clone();
        self.state = reduce_tree_select(self.state.clone(), action, &self.rules());
        if self.state.values != before {
            KeyOutcome::Changed(FieldValue::List(self.state.values.clone()))
        } else {
            KeyOutcome::Handled
        }
    }
}

impl FieldComponent for HierarchicalComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Hierarchical
    }

    fn display_value(&self) -> String {
        format!(
            "{} ▾",
            button_text(
                &self.config.options,
                &self.state.values,
                self.config.max_display_items,
                &self.placeholder,
            )
        )
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        match tree_select_key(&self.state, key) {
            Some(action) => self.apply(action),
            None => KeyOutcome::Ignored,
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        let mut values: Vec<String> = Vec::new();
        for id in value.as_list().unwrap_or_default() {
            if !values.contains(id) {
                values.push(id.clone());
            }
        }
        self.state.values = values;
    }

    fn current_value(&self) -> FieldValue {
        FieldValue::List(self.state.values.clone())
    }

    fn dismiss(&mut self) -> KeyOutcome {
        if self.state.open {
            self.apply(TreeSelectAction::Dismiss)
        } else {
            KeyOutcome::Ignored
        }
    }

    fn is_open(&self) -> bool {
        self.state.open
    }

    fn overlay(&self) -> Option<OverlayView> {
        if !self.state.open {
            return None;
        }
        let copy = &self.palette.selectors;
        let rows = self
            .state
            .rows(&self.rules())
            .into_iter()
            .map(|row| {
                let check = match row.check {
                    CheckState::Checked => "[x]",
                    CheckState::Partial => "[-]",
                    CheckState::Unchecked => "[ ]",
                };
                let fold = match (row.branch, row.expanded) {
                    (true, true) => "▾ ",
                    (true, false) => "▸ ",
                    (false, _) => "  ",
                };
                OverlayRow::new(format!("{fold}{check}"), row.label)
                    .with_depth(row.depth)
                    .with_disabled(row.disabled)
            })
            .collect::<Vec<_>>();
        let cursor = (!rows.is_empty()).then_some(self.state.cursor);
        Some(OverlayView::List(ListOverlay {
            title: self.placeholder.clone(),
            query: Some(self.state.query.clone()),
            header: self
                .config
                .search_placeholder
                .clone()
                .or_else(|| Some(copy.search_placeholder.to_string())),
            rows,
            cursor,
            empty_text: self
                .config
                .empty_message
                .clone()
                .unwrap_or_else(|| copy.empty_text.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::domain::TreeOption;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn component() -> HierarchicalComponent {
        let config = HierarchicalField::new(vec![TreeOption::branch(
            "fruit",
            "Fruit",
            [
                TreeOption::leaf("apple", "Apple"),
                TreeOption::leaf("pear", "Pear"),
            ],
        )]);
        HierarchicalComponent::new(config, None, Arc::new(ComponentPalette::default()))
    }

    #[test]
    fn selecting_branch_commits_all_leaves() {
        let mut tree = component();
        tree.handle_key(&key(KeyCode::Enter));
        assert_eq!(
            tree.handle_key(&key(KeyCode::Enter)),
            KeyOutcome::Changed(FieldValue::List(vec!["apple".into(), "pear".into()]))
        );
        assert_eq!(tree.display_value(), "Apple, Pear ▾");
    }

    #[test]
    fn partial_rows_render_indeterminate_marker() {
        let mut tree = component();
        tree.seed_value(&FieldValue::List(vec!["pear".into()]));
        tree.handle_key(&key(KeyCode::Enter));
        let Some(OverlayView::List(list)) = tree.overlay() else {
            panic!("expected list overlay");
        };
        assert_eq!(list.rows[0].marker, "▸ [-]");
    }
}
