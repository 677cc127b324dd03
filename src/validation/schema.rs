use anyhow::{Context, Result};
use jsonschema::{Validator, error::ValidationErrorKind};
use serde_json::Value;

use crate::masks::{is_valid_cnpj, is_valid_cpf, is_valid_ip, is_valid_link, is_valid_mac_address, is_valid_phone};

use super::tree::ErrorTree;

/// Host validation contract: look at the whole form value and report
/// whatever is wrong with it.
pub trait FormValidator {
    fn validate(&self, value: &Value) -> ErrorTree;
}

impl<F> FormValidator for F
where
    F: Fn(&Value) -> ErrorTree,
{
    fn validate(&self, value: &Value) -> ErrorTree {
        self(value)
    }
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl FormValidator for NoValidation {
    fn validate(&self, _value: &Value) -> ErrorTree {
        ErrorTree::new()
    }
}

/// [`FormValidator`] backed by a JSON Schema. The schema may use the
/// `cpf`, `cnpj`, `phone`, `ip`, `mac-address` and `link` formats.
pub struct JsonSchemaValidator {
    validator: Validator,
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaValidator").finish_non_exhaustive()
    }
}

impl JsonSchemaValidator {
    pub fn new(schema: &Value) -> Result<Self> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .with_format("cpf", |value: &str| is_valid_cpf(value))
            .with_format("cnpj", |value: &str| is_valid_cnpj(value))
            .with_format("phone", |value: &str| is_valid_phone(value))
            .with_format("ip", |value: &str| is_valid_ip(value))
            .with_format("mac-address", |value: &str| is_valid_mac_address(value))
            .with_format("link", |value: &str| is_valid_link(value))
            .build(schema)
            .context("failed to compile JSON schema")?;
        Ok(Self { validator })
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }
}

impl FormValidator for JsonSchemaValidator {
    fn validate(&self, value: &Value) -> ErrorTree {
        let mut tree = ErrorTree::new();
        for error in self.validator.iter_errors(value) {
            let mut path = pointer_to_path(&error.instance_path.to_string(), value);
            // `required` is reported on the parent object; move it onto the
            // missing property so the field shows it.
            if let ValidationErrorKind::Required { property } = &error.kind
                && let Some(name) = property.as_str()
            {
                path = if path.is_empty() {
                    name.to_string()
                } else {
                    format!("{path}.{name}")
                };
            }
            tree.insert(&path, error.to_string());
        }
        tree
    }
}

/// `/items/0/name` becomes `items[0].name`. A numeric token is a list slot
/// only where `instance` holds an array, so `/codes/2024` on an object stays
/// `codes.2024`.
pub fn pointer_to_path(pointer: &str, instance: &Value) -> String {
    let mut path = String::new();
    let mut current = Some(instance);
    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        let slot = match current {
            Some(Value::Array(items)) => token
                .parse::<usize>()
                .ok()
                .filter(|index| *index < items.len()),
            _ => None,
        };
        match slot {
            Some(index) => {
                path.push_str(&format!("[{index}]"));
                current = current.and_then(|value| value.get(index));
            }
            None => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(&token);
                current = current.and_then(|value| value.get(token.as_str()));
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::flatten_errors;
    use serde_json::json;

    #[test]
    fn pointers_become_dotted_paths() {
        let instance = json!({"email": "x", "items": [{"name": ""}], "a/b": 1});
        assert_eq!(pointer_to_path("", &instance), "");
        assert_eq!(pointer_to_path("/email", &instance), "email");
        assert_eq!(pointer_to_path("/items/0/name", &instance), "items[0].name");
        assert_eq!(pointer_to_path("/a~1b", &instance), "a/b");
    }

    #[test]
    fn numeric_object_keys_stay_keys() {
        let instance = json!({"codes": {"2024": "x"}, "years": [1, 2]});
        assert_eq!(pointer_to_path("/codes/2024", &instance), "codes.2024");
        assert_eq!(pointer_to_path("/years/1", &instance), "years[1]");
    }

    #[test]
    fn numeric_property_errors_land_on_the_property() {
        let schema = json!({
            "type": "object",
            "properties": {
                "codes": {"type": "object", "additionalProperties": {"type": "integer"}}
            }
        });
        let validator = JsonSchemaValidator::new(&schema).expect("schema");
        let flat = flatten_errors(&validator.validate(&json!({"codes": {"2024": "x"}})));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].0, "codes.2024");
    }

    #[test]
    fn required_lands_on_the_missing_field() {
        let schema = json!({
            "type": "object",
            "required": ["email"],
            "properties": {"email": {"type": "string"}}
        });
        let validator = JsonSchemaValidator::new(&schema).expect("schema");
        let flat = flatten_errors(&validator.validate(&json!({})));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].0, "email");
    }

    #[test]
    fn custom_formats_are_checked() {
        let schema = json!({
            "type": "object",
            "properties": {"cpf": {"type": "string", "format": "cpf"}}
        });
        let validator = JsonSchemaValidator::new(&schema).expect("schema");
        assert!(validator.is_valid(&json!({"cpf": "529.982.247-25"})));
        assert!(!validator.is_valid(&json!({"cpf": "111.111.111-11"})));
    }

    #[test]
    fn closures_are_validators() {
        let check = |value: &Value| {
            if value.get("name").is_some() {
                ErrorTree::new()
            } else {
                ErrorTree::from_pairs([("name", "required")])
            }
        };
        assert!(check.validate(&json!({"name": "x"})).is_empty());
        assert!(!check.validate(&json!({})).is_empty());
    }
}
