use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Serialization used for descriptor documents and submitted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    /// Every format compiled into this build.
    pub fn available() -> &'static [DocumentFormat] {
        &[
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    /// Guess from a file extension; unknown or missing extensions give `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Ok(DocumentFormat::Toml),
            other => Err(format!("unsupported document format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("form.JSON")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("form")), None);
        assert!("xml".parse::<DocumentFormat>().is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yml_is_yaml() {
        assert_eq!("yml".parse::<DocumentFormat>(), Ok(DocumentFormat::Yaml));
    }
}
