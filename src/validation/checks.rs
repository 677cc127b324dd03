//! Checks every form gets regardless of the host validator. Selections must
//! name enabled options, numbers stay in range and caps hold. Text behind a
//! built-in mask must be a well-formed value of that kind. Widget-level
//! problems such as unparsed text or rejected files are reported too.

use crate::domain::{ChoiceOption, FieldKind};
use crate::form::{FieldState, FieldValue};
use crate::masks::{
    MaskKind, MaskSpec, is_valid_cnpj, is_valid_cpf, is_valid_ip, is_valid_mac_address,
    is_valid_phone,
};
use crate::widgets::leaf_values;

use super::tree::ErrorTree;

/// Run the built-in checks for one field against its committed value.
pub fn check_field(field: &FieldState, value: &FieldValue) -> Option<String> {
    if let Some(issue) = field.issue() {
        return Some(issue.to_string());
    }
    match &field.descriptor.kind {
        FieldKind::Select(config) => check_single(&config.options, value),
        FieldKind::Radio(config) => check_single(&config.options, value),
        FieldKind::Combobox(config) => check_single(&config.options, value),
        FieldKind::Checkbox(config) => check_many(&config.options, value, None),
        FieldKind::MultiSelect(config) => check_many(&config.options, value, config.max_selected),
        FieldKind::Hierarchical(config) => {
            let allowed = config.options.iter().flat_map(leaf_values).collect::<Vec<_>>();
            let selected = value.as_list().unwrap_or_default();
            if let Some(unknown) = selected.iter().find(|id| !allowed.contains(id)) {
                return Some(format!("\"{unknown}\" is not an available option"));
            }
            cap_message(selected.len(), config.max_selected)
        }
        FieldKind::Number(config) => {
            let FieldValue::Number(number) = value else {
                return None;
            };
            if let Some(min) = config.min
                && *number < min
            {
                return Some(format!("must be at least {min}"));
            }
            if let Some(max) = config.max
                && *number > max
            {
                return Some(format!("must be at most {max}"));
            }
            None
        }
        FieldKind::FileUpload(config) => {
            let FieldValue::Files(files) = value else {
                return None;
            };
            let limit = if config.dropzone.multiple {
                config.dropzone.max_files
            } else {
                1
            };
            (files.len() > limit).then(|| format!("at most {limit} file(s) allowed"))
        }
        FieldKind::Input(config) | FieldKind::Password(config) | FieldKind::Link(config) => {
            check_mask(config.mask.as_ref(), value)
        }
        FieldKind::Textarea(config) => check_mask(config.mask.as_ref(), value),
        FieldKind::Date(_)
        | FieldKind::Datetime(_)
        | FieldKind::Slider(_)
        | FieldKind::Switch(_) => None,
    }
}

/// Collect the built-in findings for every field into one tree.
pub fn check_fields<'a>(
    fields: impl IntoIterator<Item = (&'a FieldState, FieldValue)>,
) -> ErrorTree {
    let mut tree = ErrorTree::new();
    for (field, value) in fields {
        if let Some(message) = check_field(field, &value) {
            tracing::debug!(field = %field.path(), %message, "built-in check failed");
            tree.insert(field.path().as_str(), message);
        }
    }
    tree
}

fn enabled(options: &[ChoiceOption], id: &str) -> bool {
    options
        .iter()
        .any(|option| option.id == id && !option.disabled)
}

fn check_single(options: &[ChoiceOption], value: &FieldValue) -> Option<String> {
    let id = value.as_text()?;
    (!enabled(options, id)).then(|| format!("\"{id}\" is not an available option"))
}

fn check_many(
    options: &[ChoiceOption],
    value: &FieldValue,
    cap: Option<usize>,
) -> Option<String> {
    let selected = value.as_list()?;
    if let Some(unknown) = selected.iter().find(|id| !enabled(options, id)) {
        return Some(format!("\"{unknown}\" is not an available option"));
    }
    cap_message(selected.len(), cap)
}

/// Empty text passes; required-ness is the host validator's call.
fn check_mask(mask: Option<&MaskSpec>, value: &FieldValue) -> Option<String> {
    let Some(MaskSpec::Builtin(kind)) = mask else {
        return None;
    };
    let text = value.as_text().filter(|text| !text.is_empty())?;
    let (valid, what) = match kind {
        MaskKind::Cpf => (is_valid_cpf(text), "CPF"),
        MaskKind::Cnpj => (is_valid_cnpj(text), "CNPJ"),
        MaskKind::Phone => (is_valid_phone(text), "phone number"),
        MaskKind::Ip => (is_valid_ip(text), "IP address"),
        MaskKind::MacAddress => (is_valid_mac_address(text), "MAC address"),
        MaskKind::Currency => return None,
    };
    (!valid).then(|| format!("not a valid {what}"))
}

fn cap_message(count: usize, cap: Option<usize>) -> Option<String> {
    let cap = cap?;
    (count > cap).then(|| format!("select at most {cap} option(s)"))
}
