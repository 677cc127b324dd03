//! Display masks for structured text input.
//!
//! Every mask is a pure, total `&str -> String` transform: it strips characters
//! outside the format's alphabet, then re-inserts separators at fixed positions.
//! Masks never fail; partial input yields the best partial formatting, and
//! masking an already-masked value returns it unchanged.

mod cnpj;
mod cpf;
mod currency;
mod ip;
mod link;
mod mac;
mod phone;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use cnpj::{apply_cnpj_mask, is_valid_cnpj};
pub use cpf::{apply_cpf_mask, is_valid_cpf};
pub use currency::apply_currency_mask;
pub use ip::{apply_ip_mask, is_valid_ip};
pub use link::{LinkTarget, is_valid_email, is_valid_link, link_target};
pub use mac::{apply_mac_address_mask, is_valid_mac_address};
pub use phone::{apply_phone_mask, is_valid_phone};

/// Built-in mask identifiers, as written in descriptor documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskKind {
    Cnpj,
    Cpf,
    Ip,
    MacAddress,
    Phone,
    Currency,
}

impl MaskKind {
    pub const ALL: [MaskKind; 6] = [
        MaskKind::Cnpj,
        MaskKind::Cpf,
        MaskKind::Ip,
        MaskKind::MacAddress,
        MaskKind::Phone,
        MaskKind::Currency,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            MaskKind::Cnpj => "cnpj",
            MaskKind::Cpf => "cpf",
            MaskKind::Ip => "ip",
            MaskKind::MacAddress => "macAddress",
            MaskKind::Phone => "phone",
            MaskKind::Currency => "currency",
        }
    }

    pub fn from_identifier(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == raw)
    }

    pub fn apply(self, raw: &str) -> String {
        match self {
            MaskKind::Cnpj => apply_cnpj_mask(raw),
            MaskKind::Cpf => apply_cpf_mask(raw),
            MaskKind::Ip => apply_ip_mask(raw),
            MaskKind::MacAddress => apply_mac_address_mask(raw),
            MaskKind::Phone => apply_phone_mask(raw),
            MaskKind::Currency => apply_currency_mask(raw),
        }
    }

    /// Longest display string the mask can produce, if bounded.
    pub fn max_len(self) -> Option<usize> {
        match self {
            MaskKind::Cnpj => Some(18),
            MaskKind::Cpf => Some(14),
            MaskKind::Ip => Some(15),
            MaskKind::MacAddress => Some(17),
            MaskKind::Phone => Some(15),
            MaskKind::Currency => None,
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Caller-supplied transform used in place of a built-in mask.
#[derive(Clone)]
pub struct CustomMask(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl CustomMask {
    pub fn new(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(transform))
    }

    pub fn apply(&self, raw: &str) -> String {
        (self.0)(raw)
    }
}

impl fmt::Debug for CustomMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomMask(..)")
    }
}

impl PartialEq for CustomMask {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Mask configuration of a text-like field.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSpec {
    Builtin(MaskKind),
    Custom(CustomMask),
    /// Identifier that matched no built-in mask; resolves to identity.
    Unknown(String),
}

impl MaskSpec {
    pub fn custom(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        MaskSpec::Custom(CustomMask::new(transform))
    }

    pub fn from_identifier(raw: &str) -> Self {
        match MaskKind::from_identifier(raw) {
            Some(kind) => MaskSpec::Builtin(kind),
            None => MaskSpec::Unknown(raw.to_string()),
        }
    }

    pub fn resolve(&self) -> Mask {
        match self {
            MaskSpec::Builtin(kind) => Mask::Builtin(*kind),
            MaskSpec::Custom(custom) => Mask::Custom(custom.clone()),
            MaskSpec::Unknown(identifier) => {
                tracing::warn!(mask = %identifier, "unknown mask identifier, using identity");
                Mask::Identity
            }
        }
    }
}

impl From<MaskKind> for MaskSpec {
    fn from(kind: MaskKind) -> Self {
        MaskSpec::Builtin(kind)
    }
}

impl<'de> Deserialize<'de> for MaskSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(MaskSpec::from_identifier(&raw))
    }
}

impl Serialize for MaskSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MaskSpec::Builtin(kind) => serializer.serialize_str(kind.identifier()),
            MaskSpec::Unknown(raw) => serializer.serialize_str(raw),
            MaskSpec::Custom(_) => serializer.serialize_none(),
        }
    }
}

/// Resolved transform applied to every outgoing raw-text change.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mask {
    #[default]
    Identity,
    Builtin(MaskKind),
    Custom(CustomMask),
}

impl Mask {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Mask::Identity => raw.to_string(),
            Mask::Builtin(kind) => kind.apply(raw),
            Mask::Custom(custom) => custom.apply(raw),
        }
    }

    pub fn max_len(&self) -> Option<usize> {
        match self {
            Mask::Builtin(kind) => kind.max_len(),
            Mask::Identity | Mask::Custom(_) => None,
        }
    }
}

/// Total resolution from an optional mask configuration to a transform.
pub fn resolve_mask(spec: Option<&MaskSpec>) -> Mask {
    spec.map(MaskSpec::resolve).unwrap_or_default()
}

/// Apply the mask named by `identifier`, or return the input untouched.
pub fn apply_mask_identifier(identifier: &str, raw: &str) -> String {
    match MaskKind::from_identifier(identifier) {
        Some(kind) => kind.apply(raw),
        None => raw.to_string(),
    }
}

pub(crate) fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
