use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::option::{ChoiceOption, TreeOption};
use crate::masks::MaskSpec;

/// Dotted path naming a field inside the form value (`address.street`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|segment| !segment.is_empty())
    }

    /// True when `other` names this field or something nested below it
    /// (`tags[0]`, `address.street`).
    pub fn covers(&self, other: &str) -> bool {
        match other.strip_prefix(self.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
            None => false,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Presentation attributes shared by every field type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DisplayOptions {
    pub label: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub class_name: Option<String>,
    pub class_name_item: Option<String>,
    pub class_name_message: Option<String>,
    pub hide_label: bool,
    pub hide_description: bool,
    pub hide_error_message: bool,
    pub disabled: bool,
}

/// Declarative description of one form field: its path, its shape and how it
/// is labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: FieldPath,
    pub display: DisplayOptions,
    pub kind: FieldKind,
    pub default: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<FieldPath>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            display: DisplayOptions::default(),
            kind,
            default: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.display.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.display.description = Some(description.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.display.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.display.disabled = disabled;
        self
    }

    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    pub fn display_label(&self) -> String {
        self.display
            .label
            .clone()
            .unwrap_or_else(|| self.name.to_string())
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }
}

/// Closed set of field shapes. Each variant carries only its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldKind {
    Input(TextField),
    Password(TextField),
    Number(NumberField),
    Textarea(TextareaField),
    Date(DateField),
    Datetime(DatetimeField),
    Slider(SliderField),
    Switch(SwitchField),
    Select(SelectField),
    MultiSelect(MultiSelectField),
    Checkbox(CheckboxField),
    Radio(RadioField),
    Combobox(ComboboxField),
    FileUpload(FileUploadField),
    Link(TextField),
    Hierarchical(HierarchicalField),
}

impl FieldKind {
    pub const TAGS: [&'static str; 16] = [
        "input",
        "password",
        "number",
        "textarea",
        "date",
        "datetime",
        "slider",
        "switch",
        "select",
        "multi-select",
        "checkbox",
        "radio",
        "combobox",
        "file-upload",
        "link",
        "hierarchical",
    ];

    pub fn type_tag(&self) -> &'static str {
        match self {
            FieldKind::Input(_) => "input",
            FieldKind::Password(_) => "password",
            FieldKind::Number(_) => "number",
            FieldKind::Textarea(_) => "textarea",
            FieldKind::Date(_) => "date",
            FieldKind::Datetime(_) => "datetime",
            FieldKind::Slider(_) => "slider",
            FieldKind::Switch(_) => "switch",
            FieldKind::Select(_) => "select",
            FieldKind::MultiSelect(_) => "multi-select",
            FieldKind::Checkbox(_) => "checkbox",
            FieldKind::Radio(_) => "radio",
            FieldKind::Combobox(_) => "combobox",
            FieldKind::FileUpload(_) => "file-upload",
            FieldKind::Link(_) => "link",
            FieldKind::Hierarchical(_) => "hierarchical",
        }
    }

    pub fn input() -> Self {
        FieldKind::Input(TextField::default())
    }

    pub fn masked_input(mask: impl Into<MaskSpec>) -> Self {
        FieldKind::Input(TextField {
            mask: Some(mask.into()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TextField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberField {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
}

impl Default for NumberField {
    fn default() -> Self {
        Self {
            min: Some(0.0),
            max: None,
            step: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TextareaField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskSpec>,
    pub min_rows: u16,
    pub max_rows: Option<u16>,
}

impl Default for TextareaField {
    fn default() -> Self {
        Self {
            mask: None,
            min_rows: 2,
            max_rows: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    #[default]
    Single,
    Range,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    #[default]
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateField {
    pub mode: DateMode,
    #[serde(default, alias = "customLocale")]
    pub locale: Option<String>,
    #[serde(default)]
    pub format: DateFormat,
    #[serde(default = "default_true")]
    pub disable_future: bool,
}

impl DateField {
    pub fn new(mode: DateMode) -> Self {
        Self {
            mode,
            locale: None,
            format: DateFormat::Long,
            disable_future: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DatetimeField {
    pub locale: Option<String>,
    pub time_step_minutes: u32,
}

impl Default for DatetimeField {
    fn default() -> Self {
        Self {
            locale: None,
            time_step_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SliderField {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: Option<String>,
    pub titles: Vec<String>,
}

impl Default for SliderField {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            unit: None,
            titles: Vec::new(),
        }
    }
}

impl SliderField {
    /// One thumb per title; a slider without titles has a single thumb.
    pub fn thumbs(&self) -> usize {
        self.titles.len().clamp(1, 2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchField {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectField {
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultiSelectField {
    pub options: Vec<ChoiceOption>,
    #[serde(default = "default_items_shown")]
    pub items_shown: usize,
    #[serde(default)]
    pub max_selected: Option<usize>,
    #[serde(default, rename = "loop")]
    pub loop_navigation: bool,
    #[serde(default)]
    pub disabled_trigger: bool,
}

impl MultiSelectField {
    pub fn new(options: Vec<ChoiceOption>) -> Self {
        Self {
            options,
            items_shown: default_items_shown(),
            max_selected: None,
            loop_navigation: false,
            disabled_trigger: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckboxField {
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RadioField {
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComboboxField {
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub not_found_text: Option<String>,
}

/// Upload constraints: accepted MIME patterns mapped to file extensions,
/// file count and per-file size limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DropzoneOptions {
    pub accept: IndexMap<String, Vec<String>>,
    pub max_files: usize,
    pub max_size: u64,
    pub multiple: bool,
}

pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 20 * 1024 * 1024;

impl Default for DropzoneOptions {
    fn default() -> Self {
        let mut accept = IndexMap::new();
        accept.insert(
            "image/*".to_string(),
            vec![".jpg".to_string(), ".jpeg".to_string(), ".png".to_string()],
        );
        accept.insert("text/csv".to_string(), vec![".csv".to_string()]);
        accept.insert(
            "application/vnd.ms-excel".to_string(),
            vec![".csv".to_string()],
        );
        Self {
            accept,
            max_files: 5,
            max_size: DEFAULT_MAX_UPLOAD_SIZE,
            multiple: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FileUploadField {
    pub dropzone: DropzoneOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HierarchicalField {
    pub options: Vec<TreeOption>,
    #[serde(default)]
    pub max_selected: Option<usize>,
    #[serde(default = "default_max_display_items")]
    pub max_display_items: usize,
    #[serde(default)]
    pub search_placeholder: Option<String>,
    #[serde(default)]
    pub empty_message: Option<String>,
}

impl HierarchicalField {
    pub fn new(options: Vec<TreeOption>) -> Self {
        Self {
            options,
            max_selected: None,
            max_display_items: default_max_display_items(),
            search_placeholder: None,
            empty_message: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_items_shown() -> usize {
    3
}

fn default_max_display_items() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_covers_nested_and_indexed_paths() {
        let path = FieldPath::new("tags");
        assert!(path.covers("tags"));
        assert!(path.covers("tags[0]"));
        assert!(path.covers("tags.inner"));
        assert!(!path.covers("tagsExtra"));
        assert!(!path.covers("other"));
    }

    #[test]
    fn type_tags_cover_every_variant() {
        let kinds = [
            FieldKind::input(),
            FieldKind::Password(TextField::default()),
            FieldKind::Number(NumberField::default()),
            FieldKind::Textarea(TextareaField::default()),
            FieldKind::Date(DateField::new(DateMode::Single)),
            FieldKind::Datetime(DatetimeField::default()),
            FieldKind::Slider(SliderField::default()),
            FieldKind::Switch(SwitchField {}),
            FieldKind::Select(SelectField::default()),
            FieldKind::MultiSelect(MultiSelectField::new(Vec::new())),
            FieldKind::Checkbox(CheckboxField::default()),
            FieldKind::Radio(RadioField::default()),
            FieldKind::Combobox(ComboboxField::default()),
            FieldKind::FileUpload(FileUploadField::default()),
            FieldKind::Link(TextField::default()),
            FieldKind::Hierarchical(HierarchicalField::new(Vec::new())),
        ];
        let tags = kinds.iter().map(FieldKind::type_tag).collect::<Vec<_>>();
        assert_eq!(tags, FieldKind::TAGS);
    }

    #[test]
    fn slider_thumbs_follow_titles() {
        let mut slider = SliderField::default();
        assert_eq!(slider.thumbs(), 1);
        slider.titles = vec!["from".into(), "to".into()];
        assert_eq!(slider.thumbs(), 2);
    }
}
