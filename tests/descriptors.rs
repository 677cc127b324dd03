use dynaform::{
    DynamicForm,
    domain::{DateMode, DescriptorError, FieldKind, parse_field_descriptor, parse_form_document},
    form::{DispatchContext, build_component, field::components::ComponentKind},
    io::{DocumentFormat, load_form_document_str},
    masks::{MaskKind, MaskSpec},
};
use serde_json::{Value, json};

fn every_type() -> Value {
    let options = json!([
        { "id": "a", "label": "Alpha" },
        { "id": "b", "label": "Beta" }
    ]);
    json!({
        "title": "Everything",
        "fields": [
            { "name": "input", "type": "input", "mask": "cpf" },
            { "name": "password", "type": "password" },
            { "name": "number", "type": "number", "min": 1, "max": 10 },
            { "name": "textarea", "type": "textarea", "maxRows": 6 },
            { "name": "date", "type": "date", "mode": "range" },
            { "name": "datetime", "type": "datetime", "timeStepMinutes": 30 },
            { "name": "slider", "type": "slider", "titles": ["From", "To"] },
            { "name": "switch", "type": "switch", "default": true },
            { "name": "select", "type": "select", "options": options },
            { "name": "multi", "type": "multi-select", "options": options, "maxSelected": 1 },
            { "name": "checkbox", "type": "checkbox", "options": options },
            { "name": "radio", "type": "radio", "options": options },
            { "name": "combobox", "type": "combobox", "options": options },
            { "name": "upload", "type": "file-upload" },
            { "name": "site", "type": "link", "label": "Website" },
            {
                "name": "region",
                "type": "hierarchical",
                "options": [
                    { "id": "se", "label": "Sudeste", "children": [
                        { "id": "sp", "label": "São Paulo" }
                    ] }
                ]
            }
        ]
    })
}

#[test]
fn parses_all_sixteen_field_types_in_order() {
    let document = parse_form_document(&every_type()).expect("valid document");
    assert_eq!(document.title.as_deref(), Some("Everything"));

    let tags = document
        .fields
        .iter()
        .map(|field| field.type_tag())
        .collect::<Vec<_>>();
    assert_eq!(tags, FieldKind::TAGS.to_vec());

    let input = &document.fields[0];
    assert!(matches!(
        &input.kind,
        FieldKind::Input(config) if config.mask == Some(MaskSpec::Builtin(MaskKind::Cpf))
    ));
    assert!(matches!(
        &document.fields[4].kind,
        FieldKind::Date(config) if config.mode == DateMode::Range
    ));
    assert_eq!(document.fields[7].default, Some(json!(true)));
    assert_eq!(document.fields[14].display_label(), "Website");
}

#[test]
fn each_type_gets_its_own_widget() {
    let document = parse_form_document(&every_type()).expect("valid document");
    let ctx = DispatchContext::default();
    let kinds = document
        .fields
        .iter()
        .map(|field| build_component(field, &ctx).kind())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            ComponentKind::TextInput,
            ComponentKind::Password,
            ComponentKind::Number,
            ComponentKind::Textarea,
            ComponentKind::Date,
            ComponentKind::DateTime,
            ComponentKind::Slider,
            ComponentKind::Switch,
            ComponentKind::Select,
            ComponentKind::MultiSelect,
            ComponentKind::Checkbox,
            ComponentKind::Radio,
            ComponentKind::Combobox,
            ComponentKind::FileUpload,
            ComponentKind::Link,
            ComponentKind::Hierarchical,
        ]
    );
}

#[test]
fn a_bare_array_is_a_field_list() {
    let document = parse_form_document(&json!([{ "name": "x", "type": "input" }])).expect("list");
    assert_eq!(document.title, None);
    assert_eq!(document.fields.len(), 1);
}

#[test]
fn unknown_types_are_rejected() {
    let err = parse_field_descriptor(0, &json!({ "name": "c", "type": "color" })).unwrap_err();
    assert!(matches!(err, DescriptorError::UnknownType { ref tag, .. } if tag == "color"));
    assert_eq!(err.field(), Some("c"));
}

#[test]
fn choice_fields_need_options() {
    let err = parse_field_descriptor(2, &json!({ "name": "pick", "type": "radio" })).unwrap_err();
    assert!(matches!(
        err,
        DescriptorError::MissingAttribute {
            attribute: "options",
            ..
        }
    ));
}

#[test]
fn dates_need_a_mode() {
    let err = parse_field_descriptor(0, &json!({ "name": "day", "type": "date" })).unwrap_err();
    assert!(matches!(
        err,
        DescriptorError::MissingAttribute {
            attribute: "mode",
            ..
        }
    ));
}

#[test]
fn attributes_of_other_types_name_their_owners() {
    let err = parse_field_descriptor(
        0,
        &json!({ "name": "age", "type": "input", "min": 3 }),
    )
    .unwrap_err();
    let DescriptorError::ForeignAttribute { owners, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(owners, "number, slider");
}

#[test]
fn duplicate_names_and_option_ids_are_rejected() {
    let duplicate = parse_form_document(&json!({ "fields": [
        { "name": "x", "type": "input" },
        { "name": "x", "type": "password" }
    ] }));
    assert!(matches!(duplicate, Err(DescriptorError::DuplicateField { .. })));

    let ids = parse_field_descriptor(
        0,
        &json!({ "name": "s", "type": "select", "options": [
            { "id": "a", "label": "A" },
            { "id": "a", "label": "Again" }
        ] }),
    );
    assert!(matches!(ids, Err(DescriptorError::DuplicateOptionId { .. })));
}

#[test]
fn impossible_ranges_are_configuration_errors() {
    let slider = parse_field_descriptor(
        0,
        &json!({ "name": "s", "type": "slider", "min": 10, "max": 5 }),
    );
    assert!(matches!(slider, Err(DescriptorError::InvalidConfig { .. })));

    let step = parse_field_descriptor(
        0,
        &json!({ "name": "t", "type": "datetime", "timeStepMinutes": 7 }),
    );
    assert!(matches!(step, Err(DescriptorError::InvalidConfig { .. })));
}

#[test]
fn documents_with_a_schema_check_initial_values() {
    let document = load_form_document_str(
        r#"{
            "fields": [
                { "name": "name", "type": "input" },
                { "name": "age", "type": "number" }
            ],
            "schema": {
                "type": "object",
                "required": ["name"],
                "properties": { "age": { "type": "number", "minimum": 18 } }
            }
        }"#,
        DocumentFormat::Json,
    )
    .expect("document");

    let (value, errors) = DynamicForm::from_document(document)
        .expect("schema compiles")
        .with_initial_value(json!({ "age": 12 }))
        .check();
    assert_eq!(value, json!({ "age": 12 }));

    let mut paths = dynaform::validation::flatten_errors(&errors)
        .into_iter()
        .map(|(path, _)| path)
        .collect::<Vec<_>>();
    paths.sort();
    assert_eq!(paths, vec!["age".to_string(), "name".to_string()]);
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_documents_parse_like_json() {
    let document = load_form_document_str(
        "title: Contact\nfields:\n  - name: email\n    type: input\n  - name: phone\n    type: input\n    mask: phone\n",
        DocumentFormat::Yaml,
    )
    .expect("yaml document");
    assert_eq!(document.title.as_deref(), Some("Contact"));
    assert_eq!(document.fields.len(), 2);
}

#[cfg(feature = "toml")]
#[test]
fn toml_documents_parse_like_json() {
    let document = load_form_document_str(
        "title = \"Contact\"\n\n[[fields]]\nname = \"accept\"\ntype = \"switch\"\n",
        DocumentFormat::Toml,
    )
    .expect("toml document");
    assert_eq!(document.fields[0].type_tag(), "switch");
}
