use serde::{Deserialize, Serialize};

/// One entry of a flat option list (select, radio, checkbox, combobox, multi-select).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Node of a hierarchical option tree.
///
/// A node without children is a leaf; only leaves ever enter a selection set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeOption>,
}

impl TreeOption {
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            children: Vec::new(),
        }
    }

    pub fn branch(
        id: impl Into<String>,
        label: impl Into<String>,
        children: impl IntoIterator<Item = TreeOption>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            children: children.into_iter().collect(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first search for a node by id.
    pub fn find<'a>(options: &'a [TreeOption], id: &str) -> Option<&'a TreeOption> {
        for option in options {
            if option.id == id {
                return Some(option);
            }
            if let Some(found) = Self::find(&option.children, id) {
                return Some(found);
            }
        }
        None
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}
