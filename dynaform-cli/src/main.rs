use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Args, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

use dynaform::{
    DynamicForm, FormDocument, JsonSchemaValidator, UiOptions,
    io::{
        DocumentFormat, OutputDestination, OutputOptions, load_form_document_str,
        parse_document_str,
    },
    validation::flatten_errors,
    widgets::TextDirection,
};

#[derive(Debug, Parser)]
#[command(
    name = "dynaform",
    version,
    about = "Render field descriptor documents as interactive terminal forms"
)]
struct Cli {
    /// Form document: file path, inline payload, or "-" for stdin
    #[arg(value_name = "FORM")]
    form: String,

    /// JSON Schema used to validate the submitted value (overrides the document's `schema`)
    #[arg(short = 's', long = "schema", value_name = "SPEC")]
    schema: Option<String>,

    /// Initial values: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "data", value_name = "SPEC")]
    data: Option<String>,

    /// Title shown at the top of the form (overrides the document's `title`)
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Parse the document and validate the initial values, then exit without opening the UI
    #[arg(long = "check")]
    check: bool,

    /// Quit without asking even when the form has unsubmitted edits
    #[arg(long = "no-confirm")]
    no_confirm: bool,

    /// Only validate on submit instead of after every edit
    #[arg(long = "no-auto-validate")]
    no_auto_validate: bool,

    /// Lay selector chips out right-to-left
    #[arg(long = "rtl")]
    rtl: bool,

    #[command(flatten)]
    log: LogArgs,
}

#[derive(Debug, Clone, Args)]
struct LogArgs {
    /// Global log level for dynaform (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,

    /// Explicit tracing filter directive (overrides --log-level and RUST_LOG)
    #[arg(long = "log-filter", value_name = "FILTER")]
    log_filter: Option<String>,

    /// Write logs to this file instead of stderr (stderr shares the screen with the form)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

const LOG_TARGETS: [&str; 2] = ["dynaform", "dynaform_cli"];

fn level_spec_for(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter precedence: `--log-filter`, `--log-level`, `RUST_LOG`, then `warn`.
fn compute_log_spec(log: &LogArgs, rust_log: Option<String>) -> String {
    if let Some(spec) = &log.log_filter {
        return spec.clone();
    }
    if let Some(level) = &log.log_level {
        return level_spec_for(level);
    }
    rust_log.unwrap_or_else(|| level_spec_for("warn"))
}

fn install_logging(log: &LogArgs) -> Result<()> {
    let spec = compute_log_spec(log, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&spec).wrap_err_with(|| format!("invalid log filter '{spec}'"))?;
    match &log.log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .ok();
        }
        None => {
            registry()
                .with(filter)
                .with(fmt::layer().without_time().with_writer(io::stderr))
                .try_init()
                .ok();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    install_logging(&cli.log)?;

    let mut diagnostics = DiagnosticCollector::default();
    let specs = [Some(cli.form.as_str()), cli.schema.as_deref(), cli.data.as_deref()];
    if specs.iter().flatten().filter(|spec| **spec == "-").count() > 1 {
        diagnostics.push_input("stdin", "only one input can be read from stdin");
    }

    let document = match load_document(&cli.form) {
        Ok(document) => Some(document),
        Err(err) => {
            diagnostics.push_input("form", format!("{err:#}"));
            None
        }
    };
    let schema = load_optional_value(cli.schema.as_deref(), "schema", &mut diagnostics);
    let data = load_optional_value(cli.data.as_deref(), "data", &mut diagnostics);

    let output = if cli.check {
        None
    } else {
        build_output_options(&cli, &mut diagnostics)
    };
    diagnostics.into_result()?;

    let Some(document) = document else {
        return Err(eyre!("no form document loaded"));
    };
    let field_count = document.fields.len();
    let mut form = DynamicForm::from_document(document).map_err(Report::msg)?;
    if let Some(schema) = schema {
        let validator = JsonSchemaValidator::new(&schema).map_err(Report::msg)?;
        form = form.with_validator(validator);
    }
    if let Some(title) = cli.title.clone() {
        form = form.with_title(title);
    }
    if let Some(data) = data {
        form = form.with_initial_value(data);
    }

    if cli.check {
        return run_check(form, field_count);
    }

    let direction = if cli.rtl {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    };
    let options = UiOptions::default()
        .with_confirm_exit(!cli.no_confirm)
        .with_auto_validate(!cli.no_auto_validate)
        .with_direction(direction);
    let mut form = form.with_options(options);
    if let Some(output) = output {
        form = form.with_output(output);
    }
    form.run().map_err(Report::msg)?;
    tracing::info!("form submitted");
    Ok(())
}

fn run_check(form: DynamicForm, field_count: usize) -> Result<()> {
    let (_, errors) = form.check();
    let flat = flatten_errors(&errors);
    if flat.is_empty() {
        println!("ok: {field_count} field(s)");
        return Ok(());
    }
    let mut body = format!("{} issue(s) found:\n", flat.len());
    for (path, message) in &flat {
        let _ = writeln!(body, "  {path}: {message}");
    }
    Err(eyre!(body))
}

fn load_document(spec: &str) -> Result<FormDocument> {
    let (contents, hint) = read_spec(spec, "form")?;
    let mut first_error = None;
    for format in candidate_formats(hint) {
        match load_form_document_str(&contents, format) {
            Ok(document) => return Ok(document),
            Err(err) => {
                tracing::debug!(%format, error = %err, "form document did not parse");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(Report::msg(format!("{err:#}"))),
        None => Err(eyre!("no document format available")),
    }
}

fn load_optional_value(
    spec: Option<&str>,
    label: &str,
    diagnostics: &mut DiagnosticCollector,
) -> Option<Value> {
    let spec = spec?;
    match load_value(spec, label) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push_input(label, err.to_string());
            None
        }
    }
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    let (contents, hint) = read_spec(spec, label)?;
    for format in candidate_formats(hint) {
        if let Ok(value) = parse_document_str(&contents, format) {
            return Ok(value);
        }
    }
    Err(eyre!("failed to parse {label}: tried {}", format_list()))
}

/// Resolve a spec to its text: stdin for "-", the file when it exists,
/// otherwise the spec itself as an inline payload.
fn read_spec(spec: &str, label: &str) -> Result<(String, Option<DocumentFormat>)> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return Ok((buffer, None));
    }

    let trimmed = spec.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok((spec.to_string(), None));
    }

    let path = Path::new(spec);
    match fs::read_to_string(path) {
        Ok(contents) => Ok((contents, DocumentFormat::from_path(path))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok((spec.to_string(), None)),
        Err(err) => {
            Err(err).wrap_err_with(|| format!("failed to load {label} from {}", path.display()))
        }
    }
}

/// The hinted format first, then every other compiled-in format.
fn candidate_formats(hint: Option<DocumentFormat>) -> Vec<DocumentFormat> {
    let mut formats: Vec<DocumentFormat> = hint.into_iter().collect();
    for format in DocumentFormat::available() {
        if !formats.contains(format) {
            formats.push(*format);
        }
    }
    formats
}

fn format_list() -> String {
    DocumentFormat::available()
        .iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(cli: &Cli, diagnostics: &mut DiagnosticCollector) -> Option<OutputOptions> {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            let path = PathBuf::from(raw);
            if path.exists() && !cli.force {
                diagnostics.push_output(format!(
                    "file {} already exists (pass --force to overwrite)",
                    path.display()
                ));
            }
            destinations.push(OutputDestination::File(path));
        }
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let mut format = None;
    for destination in &destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        match DocumentFormat::from_path(path) {
            Some(found) => match format {
                Some(existing) if existing != found => diagnostics.push_output(format!(
                    "output file {} uses {found} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                _ => format = Some(found),
            },
            None => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use one of {}",
                path.display(),
                format_list()
            )),
        }
    }

    Some(
        OutputOptions::new(format.unwrap_or_default())
            .with_pretty(!cli.no_pretty)
            .with_overwrite(cli.force)
            .with_destinations(destinations),
    )
}
