use std::collections::HashSet;

use serde_json::{Map, Value};

use super::{
    descriptor::{DisplayOptions, FieldDescriptor, FieldKind, FieldPath},
    error::DescriptorError,
    option::{ChoiceOption, TreeOption},
};

/// Keys every field accepts regardless of its type.
const COMMON_KEYS: [&str; 13] = [
    "name",
    "type",
    "default",
    "label",
    "description",
    "placeholder",
    "className",
    "classNameItem",
    "classNameMessage",
    "hideLabel",
    "hideDescription",
    "hideErrorMessage",
    "disabled",
];

/// A parsed descriptor document: ordered fields, an optional title and an
/// optional JSON Schema used for host validation.
#[derive(Debug, Clone, Default)]
pub struct FormDocument {
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub schema: Option<Value>,
}

/// Parse a descriptor document (`{"title"?, "fields": [...], "schema"?}`).
///
/// A bare array is accepted as the `fields` list.
pub fn parse_form_document(value: &Value) -> Result<FormDocument, DescriptorError> {
    let (title, raw_fields, schema) = match value {
        Value::Array(items) => (None, items, None),
        Value::Object(map) => {
            let Some(Value::Array(items)) = map.get("fields") else {
                return Err(DescriptorError::NotADocument);
            };
            let title = map.get("title").and_then(Value::as_str).map(str::to_string);
            (title, items, map.get("schema").cloned())
        }
        _ => return Err(DescriptorError::NotADocument),
    };

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(raw_fields.len());
    for (index, raw) in raw_fields.iter().enumerate() {
        let descriptor = parse_field_descriptor(index, raw)?;
        if !seen.insert(descriptor.name.clone()) {
            return Err(DescriptorError::DuplicateField {
                field: descriptor.name.to_string(),
            });
        }
        fields.push(descriptor);
    }
    tracing::debug!(fields = fields.len(), "parsed form document");

    Ok(FormDocument {
        title,
        fields,
        schema,
    })
}

/// Parse one field object. `index` is only used in error messages.
pub fn parse_field_descriptor(index: usize, raw: &Value) -> Result<FieldDescriptor, DescriptorError> {
    let Value::Object(map) = raw else {
        return Err(DescriptorError::NotAnObject { index });
    };
    let Some(name) = map.get("name").and_then(Value::as_str) else {
        return Err(DescriptorError::MissingName { index });
    };
    let Some(raw_tag) = map.get("type").and_then(Value::as_str) else {
        return Err(DescriptorError::MissingType {
            field: name.to_string(),
        });
    };
    let Some(tag) = FieldKind::TAGS.iter().copied().find(|tag| *tag == raw_tag) else {
        return Err(DescriptorError::UnknownType {
            field: name.to_string(),
            tag: raw_tag.to_string(),
        });
    };

    let mut display = Map::new();
    let mut shape = Map::new();
    shape.insert("type".to_string(), Value::String(tag.to_string()));
    for (key, value) in map {
        match key.as_str() {
            "name" | "type" | "default" => {}
            other if COMMON_KEYS.contains(&other) => {
                display.insert(key.clone(), value.clone());
            }
            other => {
                check_attribute(name, tag, other)?;
                shape.insert(key.clone(), value.clone());
            }
        }
    }
    for attribute in required_keys(tag) {
        if !shape.contains_key(*attribute) {
            return Err(DescriptorError::MissingAttribute {
                field: name.to_string(),
                tag,
                attribute,
            });
        }
    }

    let display: DisplayOptions = serde_json::from_value(Value::Object(display)).map_err(
        |source| DescriptorError::InvalidAttributes {
            field: name.to_string(),
            source,
        },
    )?;
    let kind: FieldKind = serde_json::from_value(Value::Object(shape)).map_err(|source| {
        DescriptorError::InvalidAttributes {
            field: name.to_string(),
            source,
        }
    })?;

    let descriptor = FieldDescriptor {
        name: FieldPath::new(name),
        display,
        kind,
        default: map.get("default").cloned(),
    };
    check_descriptor(&descriptor)?;
    Ok(descriptor)
}

fn check_attribute(field: &str, tag: &'static str, attribute: &str) -> Result<(), DescriptorError> {
    if variant_keys(tag).contains(&attribute) {
        return Ok(());
    }
    let owners = FieldKind::TAGS
        .iter()
        .filter(|other| variant_keys(other).contains(&attribute))
        .copied()
        .collect::<Vec<_>>();
    if owners.is_empty() {
        Err(DescriptorError::UnknownAttribute {
            field: field.to_string(),
            tag,
            attribute: attribute.to_string(),
        })
    } else {
        Err(DescriptorError::ForeignAttribute {
            field: field.to_string(),
            tag,
            attribute: attribute.to_string(),
            owners: owners.join(", "),
        })
    }
}

fn variant_keys(tag: &str) -> &'static [&'static str] {
    match tag {
        "input" | "password" | "link" => &["mask"],
        "number" => &["min", "max", "step"],
        "textarea" => &["mask", "minRows", "maxRows"],
        "date" => &["mode", "locale", "customLocale", "format", "disableFuture"],
        "datetime" => &["locale", "timeStepMinutes"],
        "slider" => &["min", "max", "step", "unit", "titles"],
        "select" | "checkbox" | "radio" => &["options"],
        "multi-select" => &[
            "options",
            "itemsShown",
            "maxSelected",
            "loop",
            "disabledTrigger",
        ],
        "combobox" => &["options", "notFoundText"],
        "file-upload" => &["dropzone"],
        "hierarchical" => &[
            "options",
            "maxSelected",
            "maxDisplayItems",
            "searchPlaceholder",
            "emptyMessage",
        ],
        _ => &[],
    }
}

fn required_keys(tag: &str) -> &'static [&'static str] {
    match tag {
        "select" | "checkbox" | "radio" | "multi-select" | "combobox" | "hierarchical" => {
            &["options"]
        }
        "date" => &["mode"],
        _ => &[],
    }
}

/// Configuration checks that the type system alone cannot express.
pub fn check_descriptor(descriptor: &FieldDescriptor) -> Result<(), DescriptorError> {
    let field = descriptor.name.as_str();
    match &descriptor.kind {
        FieldKind::Input(_)
        | FieldKind::Password(_)
        | FieldKind::Link(_)
        | FieldKind::Switch(_)
        | FieldKind::Date(_) => Ok(()),
        FieldKind::Number(config) => {
            if !(config.step > 0.0) {
                return Err(DescriptorError::invalid(field, "number step must be positive"));
            }
            if let (Some(min), Some(max)) = (config.min, config.max)
                && min > max
            {
                return Err(DescriptorError::invalid(field, "number min exceeds max"));
            }
            Ok(())
        }
        FieldKind::Textarea(config) => match config.max_rows {
            Some(max) if max < config.min_rows => Err(DescriptorError::invalid(
                field,
                "textarea maxRows is smaller than minRows",
            )),
            _ => Ok(()),
        },
        FieldKind::Datetime(config) => {
            if config.time_step_minutes == 0 || 1440 % config.time_step_minutes != 0 {
                return Err(DescriptorError::invalid(
                    field,
                    "timeStepMinutes must evenly divide a day",
                ));
            }
            Ok(())
        }
        FieldKind::Slider(config) => {
            if !(config.min < config.max) {
                return Err(DescriptorError::invalid(field, "slider min must be below max"));
            }
            if !(config.step > 0.0) {
                return Err(DescriptorError::invalid(field, "slider step must be positive"));
            }
            if config.titles.len() > 2 {
                return Err(DescriptorError::invalid(
                    field,
                    "slider supports at most two titles",
                ));
            }
            Ok(())
        }
        FieldKind::Select(config) => check_choice_ids(field, &config.options),
        FieldKind::Checkbox(config) => check_choice_ids(field, &config.options),
        FieldKind::Radio(config) => check_choice_ids(field, &config.options),
        FieldKind::Combobox(config) => check_choice_ids(field, &config.options),
        FieldKind::MultiSelect(config) => {
            if config.items_shown == 0 {
                return Err(DescriptorError::invalid(field, "itemsShown must be at least 1"));
            }
            if config.max_selected == Some(0) {
                return Err(DescriptorError::invalid(field, "maxSelected must be at least 1"));
            }
            check_choice_ids(field, &config.options)
        }
        FieldKind::FileUpload(config) => {
            if config.dropzone.max_files == 0 {
                return Err(DescriptorError::invalid(field, "dropzone maxFiles must be at least 1"));
            }
            if config.dropzone.max_size == 0 {
                return Err(DescriptorError::invalid(field, "dropzone maxSize must be positive"));
            }
            Ok(())
        }
        FieldKind::Hierarchical(config) => {
            if config.max_display_items == 0 {
                return Err(DescriptorError::invalid(
                    field,
                    "maxDisplayItems must be at least 1",
                ));
            }
            if config.max_selected == Some(0) {
                return Err(DescriptorError::invalid(field, "maxSelected must be at least 1"));
            }
            check_tree_ids(field, &config.options)
        }
    }
}

fn check_choice_ids(field: &str, options: &[ChoiceOption]) -> Result<(), DescriptorError> {
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.id.as_str()) {
            return Err(DescriptorError::DuplicateOptionId {
                field: field.to_string(),
                id: option.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_tree_ids(field: &str, options: &[TreeOption]) -> Result<(), DescriptorError> {
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.id.as_str()) {
            return Err(DescriptorError::DuplicateOptionId {
                field: field.to_string(),
                id: option.id.clone(),
            });
        }
        check_tree_ids(field, &option.children)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::descriptor::{DateMode, MultiSelectField};
    use crate::masks::{MaskKind, MaskSpec};

    #[test]
    fn splits_display_and_shape_attributes() {
        let raw = json!({
            "name": "tags",
            "type": "multi-select",
            "label": "Tags",
            "hideDescription": true,
            "options": [{"id": "a", "label": "A"}, {"id": "b", "label": "B", "disabled": true}],
            "maxSelected": 2,
            "loop": true
        });
        let descriptor = parse_field_descriptor(0, &raw).expect("descriptor");
        assert_eq!(descriptor.display.label.as_deref(), Some("Tags"));
        assert!(descriptor.display.hide_description);
        let FieldKind::MultiSelect(MultiSelectField {
            options,
            items_shown,
            max_selected,
            loop_navigation,
            ..
        }) = descriptor.kind
        else {
            panic!("expected multi-select");
        };
        assert_eq!(options.len(), 2);
        assert!(options[1].disabled);
        assert_eq!(items_shown, 3);
        assert_eq!(max_selected, Some(2));
        assert!(loop_navigation);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = parse_field_descriptor(0, &json!({"name": "x", "type": "color"}))
            .expect_err("unknown type");
        assert!(matches!(err, DescriptorError::UnknownType { ref tag, .. } if tag == "color"));
    }

    #[test]
    fn attributes_of_other_variants_are_rejected() {
        let err = parse_field_descriptor(
            0,
            &json!({"name": "when", "type": "date", "mode": "single", "options": []}),
        )
        .expect_err("foreign attribute");
        match err {
            DescriptorError::ForeignAttribute {
                attribute, owners, ..
            } => {
                assert_eq!(attribute, "options");
                assert!(owners.contains("select"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_shape_attribute_is_reported() {
        let err = parse_field_descriptor(0, &json!({"name": "when", "type": "date"}))
            .expect_err("missing mode");
        assert!(matches!(
            err,
            DescriptorError::MissingAttribute {
                attribute: "mode",
                ..
            }
        ));
    }

    #[test]
    fn mask_identifiers_parse_including_unknown() {
        let descriptor =
            parse_field_descriptor(0, &json!({"name": "doc", "type": "input", "mask": "cpf"}))
                .expect("descriptor");
        assert_eq!(
            descriptor.kind,
            FieldKind::masked_input(MaskSpec::Builtin(MaskKind::Cpf))
        );

        let descriptor =
            parse_field_descriptor(0, &json!({"name": "zip", "type": "input", "mask": "zip"}))
                .expect("descriptor");
        assert_eq!(
            descriptor.kind,
            FieldKind::masked_input(MaskSpec::Unknown("zip".into()))
        );
    }

    #[test]
    fn duplicate_sibling_ids_are_rejected() {
        let err = parse_field_descriptor(
            0,
            &json!({
                "name": "region",
                "type": "hierarchical",
                "options": [
                    {"id": "br", "label": "Brasil", "children": [
                        {"id": "sp", "label": "SP"},
                        {"id": "sp", "label": "SP again"}
                    ]}
                ]
            }),
        )
        .expect_err("duplicate ids");
        assert!(matches!(err, DescriptorError::DuplicateOptionId { ref id, .. } if id == "sp"));
    }

    #[test]
    fn slider_with_three_titles_is_rejected() {
        let err = parse_field_descriptor(
            0,
            &json!({"name": "r", "type": "slider", "titles": ["a", "b", "c"]}),
        )
        .expect_err("too many titles");
        assert!(matches!(err, DescriptorError::InvalidConfig { .. }));
    }

    #[test]
    fn document_rejects_duplicate_names_and_keeps_order() {
        let doc = json!({
            "title": "Signup",
            "fields": [
                {"name": "a", "type": "input"},
                {"name": "b", "type": "date", "mode": "range"}
            ]
        });
        let parsed = parse_form_document(&doc).expect("document");
        assert_eq!(parsed.title.as_deref(), Some("Signup"));
        assert_eq!(parsed.fields[0].name.as_str(), "a");
        assert!(matches!(
            parsed.fields[1].kind,
            FieldKind::Date(ref date) if date.mode == DateMode::Range && date.disable_future
        ));

        let dup = json!([{"name": "a", "type": "input"}, {"name": "a", "type": "switch"}]);
        assert!(matches!(
            parse_form_document(&dup),
            Err(DescriptorError::DuplicateField { .. })
        ));
    }
}
