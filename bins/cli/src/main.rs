//! CLI binary entrypoint.
//!
//! Reads stdin line by line and emits each line as one record through the
//! builder, using settings from flags, a settings file and the environment
//! (in that order of precedence).

mod error;

use clap::{Parser, ValueEnum};
use clog::{LogContext, LogFormat, LogLevelSetting, Settings};
use clog_adapters::TracingLogger;
use clog_config::{load_settings_from_path, to_pretty_json, to_pretty_toml};
use clog_infra::{env_or_default, level_filter};
use clog_shared::SensitiveInfoHandling;
use error::{CliError, ExitCode};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "clog",
    version,
    about = "Pipe stdin lines into structured log records",
    long_about = None
)]
struct Cli {
    /// Settings file path (JSON/TOML).
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Output file, `stdout`, `stderr` or `-`.
    #[arg(long)]
    log_file: Option<String>,
    /// Output format (`human` or `json`).
    #[arg(long)]
    log_format: Option<String>,
    /// Minimum level (`debug`, `info`, `error` or `disabled`).
    #[arg(long)]
    log_level: Option<String>,
    /// Sensitive value handling (`plaintext`, `mask` or `hash`).
    #[arg(long)]
    sensitive_info_handling: Option<String>,
    /// Only emit debug records carrying this label (repeatable).
    #[arg(long = "debug-label", value_name = "LABEL")]
    debug_labels: Vec<String>,
    /// Level of the emitted records.
    #[arg(long, value_enum, default_value_t = RecordLevel::Info)]
    level: RecordLevel,
    /// Label attached to every record (repeatable).
    #[arg(long = "label", value_name = "LABEL")]
    labels: Vec<String>,
    /// Comment attached to every record (repeatable).
    #[arg(long = "comment", value_name = "TEXT")]
    comments: Vec<String>,
    /// Field attached to every record (repeatable). JSON values are kept typed.
    #[arg(long = "with", value_name = "KEY=VALUE")]
    pairs: Vec<String>,
    /// Field whose value is concealed per the sensitive handling (repeatable).
    #[arg(long = "with-sensitive", value_name = "KEY=VALUE")]
    sensitive_pairs: Vec<String>,
    /// Forward records to a `tracing` subscriber instead of writing them directly.
    #[arg(long)]
    tracing: bool,
    /// Print the effective settings and exit.
    #[arg(long, value_enum, value_name = "FORMAT")]
    print_settings: Option<SettingsFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum RecordLevel {
    Debug,
    #[default]
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SettingsFormat {
    Json,
    Toml,
}

/// Per-record metadata taken from the flags.
#[derive(Debug, Clone, Default)]
struct RecordArgs {
    level: RecordLevel,
    labels: Vec<String>,
    comments: Vec<String>,
    pairs: Vec<(String, Value)>,
    sensitive_pairs: Vec<(String, Value)>,
}

impl RecordArgs {
    fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Ok(Self {
            level: cli.level,
            labels: cli.labels.clone(),
            comments: cli.comments.clone(),
            pairs: parse_pairs(&cli.pairs)?,
            sensitive_pairs: parse_pairs(&cli.sensitive_pairs)?,
        })
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let stdin = io::stdin();

    match run(&cli, stdin.lock()) {
        Ok(code) => std::process::ExitCode::from(code.as_u8()),
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, input: impl BufRead) -> Result<ExitCode, CliError> {
    let settings = effective_settings(cli)?;

    if let Some(format) = cli.print_settings {
        let rendered = match format {
            SettingsFormat::Json => to_pretty_json(&settings)?,
            SettingsFormat::Toml => to_pretty_toml(&settings)?,
        };
        io::stdout().lock().write_all(rendered.as_bytes())?;
        return Ok(ExitCode::Ok);
    }

    let record = RecordArgs::from_cli(cli)?;
    let ctx = if cli.tracing {
        install_tracing_subscriber(settings.format());
        let port = TracingLogger::new().with_min_level(level_filter(settings.level()));
        LogContext::new().seed_with(Arc::new(port), settings)
    } else {
        clog::init(LogContext::new(), &settings).0
    };

    let result = pipe_lines(&ctx, &record, input);
    clog::flush(&ctx);
    result.map(|_| ExitCode::Ok)
}

/// Settings file plus env overrides, then flags on top.
fn effective_settings(cli: &Cli) -> Result<Settings, CliError> {
    let settings = load_settings_from_path(cli.settings.as_deref(), &env_or_default())?;
    Ok(apply_flags(settings, cli))
}

fn apply_flags(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(file) = &cli.log_file {
        settings.file = Some(file.clone());
    }
    if let Some(format) = cli.log_format.as_deref().and_then(lenient::<LogFormat>) {
        settings.format = Some(format);
    }
    if let Some(level) = cli.log_level.as_deref().and_then(lenient::<LogLevelSetting>) {
        settings.level = Some(level);
    }
    if let Some(handling) = cli
        .sensitive_info_handling
        .as_deref()
        .and_then(lenient::<SensitiveInfoHandling>)
    {
        settings.sensitive_info_handling = Some(handling);
    }
    if !cli.debug_labels.is_empty() {
        settings.only_log_debug_if_contains_label.clone_from(&cli.debug_labels);
    }
    settings
}

/// Unknown flag values behave like unset ones; a note goes to stderr.
fn lenient<T>(raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse() {
        Ok(value) => Some(value),
        Err(error) => {
            let _ = writeln!(io::stderr(), "ignoring flag: {error}");
            None
        },
    }
}

fn parse_pairs(raw: &[String]) -> Result<Vec<(String, Value)>, CliError> {
    raw.iter().map(String::as_str).map(parse_pair).collect()
}

fn parse_pair(raw: &str) -> Result<(String, Value), CliError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::InvalidInput(format!(
            "expected KEY=VALUE, got `{raw}`"
        )));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidInput(format!("empty key in `{raw}`")));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn install_tracing_subscriber(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("clog=debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    // A subscriber installed by the host wins.
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Human => builder.try_init(),
    };
}

/// Emit one record per input line. Returns the number of records.
fn pipe_lines(ctx: &LogContext, record: &RecordArgs, input: impl BufRead) -> Result<usize, CliError> {
    let mut ctx = ctx.clone().with_clues(record.pairs.iter().cloned());
    for (key, value) in &record.sensitive_pairs {
        ctx = ctx.with_sensitive_clue(key.as_str(), value.clone());
    }

    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        let mut builder = clog::ctx(&ctx).label(record.labels.iter().cloned());
        for comment in &record.comments {
            builder = builder.comment(comment.as_str());
        }
        match record.level {
            RecordLevel::Debug => builder.debug(&line),
            RecordLevel::Info => builder.info(&line),
            RecordLevel::Error => builder.error(&line),
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clog::LogLevel;
    use clog_shared::{ErrorCode, ErrorEnvelope, MASKED};
    use clog_testkit::in_memory::MemoryLogger;
    use std::error::Error;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("clog").chain(args.iter().copied()))
    }

    #[test]
    fn pairs_keep_json_types() -> Result<(), Box<dyn Error>> {
        assert_eq!(parse_pair("count=2")?, ("count".to_string(), Value::from(2)));
        assert_eq!(parse_pair("name=alice")?, ("name".to_string(), Value::from("alice")));
        assert_eq!(parse_pair("expr=a=b")?, ("expr".to_string(), Value::from("a=b")));
        Ok(())
    }

    #[test]
    fn malformed_pairs_are_invalid_input() {
        for raw in ["novalue", "=value"] {
            let error = parse_pair(raw).err();
            assert!(error.is_some_and(|error| error.exit_code() == ExitCode::InvalidInput));
        }
    }

    #[test]
    fn flags_override_file_settings() -> Result<(), Box<dyn Error>> {
        let cli = parse(&[
            "--log-file",
            "stdout",
            "--log-level",
            "debug",
            "--log-format",
            "bogus",
            "--debug-label",
            "clabel_api_call",
        ])?;
        let file_settings = Settings::default()
            .with_file("/tmp/from-file.log")
            .with_format(LogFormat::Json)
            .with_level(LogLevelSetting::Error);

        let settings = apply_flags(file_settings, &cli);
        assert_eq!(settings.file.as_deref(), Some("stdout"));
        assert_eq!(settings.level, Some(LogLevelSetting::Debug));
        assert_eq!(settings.format, Some(LogFormat::Json));
        assert_eq!(
            settings.only_log_debug_if_contains_label,
            vec!["clabel_api_call".to_string()]
        );
        Ok(())
    }

    #[test]
    fn each_line_becomes_one_record() -> Result<(), Box<dyn Error>> {
        let memory = MemoryLogger::new();
        let settings = Settings::default().with_sensitive_info_handling(SensitiveInfoHandling::Mask);
        let ctx = LogContext::new().seed_with(Arc::new(memory.clone()), settings);
        let cli = parse(&[
            "--level",
            "error",
            "--label",
            "clabel_warning",
            "--comment",
            "piped",
            "--with",
            "job=7",
            "--with-sensitive",
            "ssn=123",
        ])?;
        let record = RecordArgs::from_cli(&cli)?;

        let count = pipe_lines(&ctx, &record, io::Cursor::new("first\nsecond\n"))?;

        assert_eq!(count, 2);
        assert_eq!(memory.messages_at(LogLevel::Error), vec!["first", "second"]);
        let event = memory.events().into_iter().next().ok_or("missing event")?;
        assert_eq!(event.fields.get("job"), Some(&Value::from(7)));
        assert_eq!(event.fields.get("ssn"), Some(&Value::from(MASKED)));
        assert_eq!(
            event.fields.get("clog_labels"),
            Some(&serde_json::json!(["clabel_warning"]))
        );
        assert_eq!(event.fields.get("clog_comments"), Some(&serde_json::json!(["piped"])));
        Ok(())
    }

    #[test]
    fn exit_codes_for_errors() {
        let io_error = CliError::Io(io::Error::other("io"));
        let missing = CliError::Settings(ErrorEnvelope::expected(
            ErrorCode::new("config", "settings_file_not_found"),
            "missing",
        ));
        let malformed = CliError::Settings(ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            "bad json",
        ));
        let internal = CliError::Settings(ErrorEnvelope::unexpected(ErrorCode::internal(), "boom"));

        assert_eq!(io_error.exit_code(), ExitCode::Io);
        assert_eq!(missing.exit_code(), ExitCode::Io);
        assert_eq!(malformed.exit_code(), ExitCode::InvalidInput);
        assert_eq!(internal.exit_code(), ExitCode::Internal);
    }

    #[test]
    fn settings_errors_redact_secret_metadata() {
        let error = CliError::Settings(
            ErrorEnvelope::expected(ErrorCode::new("config", "invalid_env_enum"), "bad")
                .with_metadata("env_var", "CLOG_LEVEL")
                .with_metadata("api_token", "abc"),
        );
        let text = error.to_string();
        assert!(text.contains("env_var=CLOG_LEVEL"));
        assert!(text.contains("api_token=<redacted>"));
        assert!(!text.contains("abc"));
    }
}
