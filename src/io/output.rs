use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use super::DocumentFormat;

/// Where a submitted form value is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

/// Delivery of the value a user submits: the document format it is written
/// in and every destination that receives it. Existing files are only
/// replaced when `overwrite` is set.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub overwrite: bool,
    pub destinations: Vec<OutputDestination>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

impl OutputOptions {
    /// Pretty output of `format` on stdout.
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            overwrite: false,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    /// The submitted value as text in the configured format.
    pub fn render(&self, value: &Value) -> Result<String> {
        let rendered = match (self.format, self.pretty) {
            (DocumentFormat::Json, true) => serde_json::to_string_pretty(value)?,
            (DocumentFormat::Json, false) => serde_json::to_string(value)?,
            #[cfg(feature = "yaml")]
            (DocumentFormat::Yaml, _) => serde_yaml::to_string(value)?,
            #[cfg(feature = "toml")]
            (DocumentFormat::Toml, true) => toml::to_string_pretty(value)?,
            #[cfg(feature = "toml")]
            (DocumentFormat::Toml, false) => toml::to_string(value)?,
        };
        Ok(rendered)
    }

    /// Render once and write to every destination. Returns how many
    /// destinations received the value.
    pub fn deliver(&self, value: &Value) -> Result<usize> {
        if self.destinations.is_empty() {
            return Ok(0);
        }
        let mut payload = self
            .render(value)
            .with_context(|| format!("failed to serialize the submitted value as {}", self.format))?;
        if !payload.ends_with('\n') {
            payload.push('\n');
        }
        for destination in &self.destinations {
            self.write_to(destination, &payload)?;
            tracing::debug!(?destination, bytes = payload.len(), "submitted value written");
        }
        Ok(self.destinations.len())
    }

    fn write_to(&self, destination: &OutputDestination, payload: &str) -> Result<()> {
        match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(payload.as_bytes())
                    .and_then(|_| stdout.flush())
                    .context("failed to write the submitted value to stdout")
            }
            OutputDestination::File(path) => {
                let opened = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .create_new(!self.overwrite)
                    .open(path);
                let mut file = match opened {
                    Ok(file) => file,
                    Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                        bail!("{} already exists; enable overwrite to replace it", path.display())
                    }
                    Err(err) => {
                        return Err(err)
                            .with_context(|| format!("failed to open {}", path.display()));
                    }
                };
                file.write_all(payload.as_bytes())
                    .with_context(|| format!("failed to write {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("dynaform-{name}-{nanos}.json"))
    }

    #[test]
    fn no_destinations_delivers_nothing() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        assert_eq!(options.deliver(&json!({"ok": true})).unwrap(), 0);
    }

    #[test]
    fn compact_json_is_one_line() {
        let options = OutputOptions::default().with_pretty(false);
        assert_eq!(
            options.render(&json!({"tags": ["a", "b"]})).unwrap(),
            "{\"tags\":[\"a\",\"b\"]}"
        );
    }

    #[test]
    fn submitted_value_lands_in_every_file() {
        let first = scratch("first");
        let second = scratch("second");
        let options = OutputOptions::default().with_destinations(vec![
            OutputDestination::file(&first),
            OutputDestination::file(&second),
        ]);
        assert_eq!(options.deliver(&json!({"email": "a@b.co"})).unwrap(), 2);
        for path in [&first, &second] {
            let contents = fs::read_to_string(path).unwrap();
            assert!(contents.ends_with("}\n"));
            assert_eq!(
                serde_json::from_str::<Value>(&contents).unwrap(),
                json!({"email": "a@b.co"})
            );
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn existing_files_need_overwrite() {
        let path = scratch("existing");
        fs::write(&path, "keep me").unwrap();
        let options =
            OutputOptions::default().with_destinations(vec![OutputDestination::file(&path)]);

        let err = options.deliver(&json!({"a": 1})).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        options.with_overwrite(true).deliver(&json!({"a": 1})).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"a\""));
        let _ = fs::remove_file(path);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_submissions_render_as_yaml() {
        let options = OutputOptions::new(DocumentFormat::Yaml);
        assert_eq!(options.render(&json!({"name": "Ana"})).unwrap(), "name: Ana\n");
    }
}
