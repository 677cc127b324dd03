use indexmap::IndexMap;
use serde_json::Value;

/// Key used for messages that belong to the form as a whole.
pub const ROOT_KEY: &str = "<root>";

/// Largest `[n]` stored as a list slot. Bigger indices are stored as
/// object keys.
pub const MAX_LIST_INDEX: usize = 10_000;

/// Nested field errors as reported by a validator: a message at a field, an
/// object of sub-trees, or a list whose slots line up with array items.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTree {
    Leaf(String),
    Node(IndexMap<String, ErrorTree>),
    List(Vec<Option<ErrorTree>>),
}

impl Default for ErrorTree {
    fn default() -> Self {
        Self::Node(IndexMap::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Node(children) => children.values().all(ErrorTree::is_empty),
            Self::List(items) => items.iter().flatten().all(ErrorTree::is_empty),
        }
    }

    /// Read the `{"field": {"message": ".."}, "list": [{"message": ".."}]}`
    /// shape. Bare strings are accepted as messages; anything else that
    /// carries no message is dropped.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(message) => Some(Self::Leaf(message.clone())),
            Value::Object(map) => {
                if let Some(Value::String(message)) = map.get("message") {
                    return Some(Self::Leaf(message.clone()));
                }
                let children = map
                    .iter()
                    .filter_map(|(key, child)| Self::from_json(child).map(|tree| (key.clone(), tree)))
                    .collect::<IndexMap<_, _>>();
                (!children.is_empty()).then_some(Self::Node(children))
            }
            Value::Array(items) => {
                let slots = items.iter().map(Self::from_json).collect::<Vec<_>>();
                slots.iter().any(Option::is_some).then_some(Self::List(slots))
            }
            _ => None,
        }
    }

    pub fn from_pairs<P, M>(pairs: impl IntoIterator<Item = (P, M)>) -> Self
    where
        P: AsRef<str>,
        M: Into<String>,
    {
        let mut tree = Self::new();
        for (path, message) in pairs {
            tree.insert(path.as_ref(), message);
        }
        tree
    }

    /// Record `message` at a dotted/indexed path such as `items[2].name`.
    /// An existing message at the same place is kept.
    pub fn insert(&mut self, path: &str, message: impl Into<String>) {
        let segments = parse_path(path);
        let segments = if segments.is_empty() {
            vec![Segment::Key(ROOT_KEY.to_string())]
        } else {
            segments
        };
        insert_at(self, &segments, message.into());
    }

    /// Fold `other` into `self`. Messages already present win.
    pub fn merge(&mut self, other: ErrorTree) {
        for (path, message) in flatten_errors(&other) {
            self.insert(&path, message);
        }
    }
}

fn insert_at(tree: &mut ErrorTree, segments: &[Segment], message: String) {
    let Some((head, rest)) = segments.split_first() else {
        if tree.is_empty() {
            *tree = ErrorTree::Leaf(message);
        }
        return;
    };
    match head {
        Segment::Key(key) => {
            if !matches!(tree, ErrorTree::Node(_)) {
                if !tree.is_empty() {
                    return;
                }
                *tree = ErrorTree::new();
            }
            if let ErrorTree::Node(children) = tree {
                let child = children.entry(key.clone()).or_default();
                insert_at(child, rest, message);
            }
        }
        Segment::Index(index) => {
            if !matches!(tree, ErrorTree::List(_)) {
                if !tree.is_empty() {
                    return;
                }
                *tree = ErrorTree::List(Vec::new());
            }
            if let ErrorTree::List(items) = tree {
                let Some(len) = index.checked_add(1) else {
                    return;
                };
                if items.len() < len {
                    items.resize(len, None);
                }
                let child = items[*index].get_or_insert_with(ErrorTree::new);
                insert_at(child, rest, message);
            }
        }
    }
}

fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for part in path.split('.').filter(|part| !part.is_empty()) {
        let (name, mut indices) = match part.find('[') {
            Some(start) => (&part[..start], &part[start..]),
            None => (part, ""),
        };
        if !name.is_empty() {
            segments.push(Segment::Key(name.to_string()));
        }
        while let Some(rest) = indices.strip_prefix('[') {
            let Some(end) = rest.find(']') else { break };
            match rest[..end].parse::<usize>() {
                Ok(index) if index <= MAX_LIST_INDEX => segments.push(Segment::Index(index)),
                _ => segments.push(Segment::Key(rest[..end].to_string())),
            }
            indices = &rest[end + 1..];
        }
    }
    segments
}

/// Walk the tree depth first and list every message with its path:
/// object keys joined by `.`, list slots as `[i]`.
pub fn flatten_errors(tree: &ErrorTree) -> Vec<(String, String)> {
    let mut out = Vec::new();
    walk(tree, String::new(), &mut out);
    out
}

fn walk(tree: &ErrorTree, prefix: String, out: &mut Vec<(String, String)>) {
    match tree {
        ErrorTree::Leaf(message) => out.push((prefix, message.clone())),
        ErrorTree::Node(children) => {
            for (key, child) in children {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                walk(child, path, out);
            }
        }
        ErrorTree::List(items) => {
            for (index, child) in items.iter().enumerate() {
                if let Some(child) = child {
                    walk(child, format!("{prefix}[{index}]"), out);
                }
            }
        }
    }
}
