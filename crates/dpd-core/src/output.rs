//! Command payloads and their rendering in each output format.
//!
//! Every command produces a [`CommandOutput`]: a JSON body, a one-line
//! summary and a markdown rendering. The JSON form wraps the body in an
//! envelope carrying the schema version, run id and generation time.

use std::io::{IsTerminal, Write};

use dpd_common::error::format_error_human;
use dpd_common::{Error, OutputFormat, StructuredError, SCHEMA_VERSION};
use serde_json::{Map, Value};

use crate::exit_codes::ExitCode;

/// Result of one command, before rendering.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub command: &'static str,
    pub body: Value,
    pub summary: String,
    pub markdown: String,
    pub exit: ExitCode,
}

impl CommandOutput {
    pub fn new(command: &'static str, body: Value) -> Self {
        Self {
            command,
            body,
            summary: String::new(),
            markdown: String::new(),
            exit: ExitCode::Clean,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = markdown.into();
        self
    }

    pub fn with_exit(mut self, exit: ExitCode) -> Self {
        self.exit = exit;
        self
    }
}

/// Wrap a body in the standard envelope. Object bodies are flattened into it.
pub fn envelope(run_id: &str, command: &str, body: Value) -> Value {
    let mut map = Map::new();
    map.insert("schema_version".into(), Value::from(SCHEMA_VERSION));
    map.insert("run_id".into(), Value::from(run_id));
    map.insert(
        "generated_at".into(),
        Value::from(chrono::Utc::now().to_rfc3339()),
    );
    map.insert("command".into(), Value::from(command));
    match body {
        Value::Object(fields) => {
            for (key, value) in fields {
                map.insert(key, value);
            }
        }
        Value::Null => {}
        other => {
            map.insert("result".into(), other);
        }
    }
    Value::Object(map)
}

/// Write a command's output to `out` in the requested format.
pub fn render<W: Write>(
    out: &mut W,
    format: OutputFormat,
    run_id: &str,
    output: &CommandOutput,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = envelope(run_id, output.command, output.body.clone());
            let text = serde_json::to_string_pretty(&value).map_err(std::io::Error::other)?;
            writeln!(out, "{}", text)
        }
        OutputFormat::Summary => writeln!(out, "[{}] {}: {}", run_id, output.command, output.summary),
        OutputFormat::Exitcode => Ok(()),
        OutputFormat::Md => {
            write!(out, "{}", output.markdown)?;
            if !output.markdown.ends_with('\n') {
                writeln!(out)?;
            }
            writeln!(out, "\nRun: {}", run_id)
        }
    }
}

/// Report an error on stderr. JSON format gets a structured record.
pub fn report_error(format: OutputFormat, run_id: &str, command: &str, err: &Error) {
    match format {
        OutputFormat::Json => {
            let structured = StructuredError::from(err)
                .with_context("run_id", run_id)
                .with_context("command", command);
            eprintln!("{}", structured.to_json());
        }
        OutputFormat::Exitcode => {}
        _ => {
            let use_color = std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CommandOutput {
        CommandOutput::new("implied", json!({ "variance": 0.5 }))
            .with_summary("2 targets")
            .with_markdown("# Implied\n")
    }

    #[test]
    fn envelope_flattens_object_bodies() {
        let value = envelope("run-abc", "fit", json!({ "alpha": 2.0 }));
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["run_id"], "run-abc");
        assert_eq!(value["command"], "fit");
        assert_eq!(value["alpha"], 2.0);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn envelope_nests_scalar_bodies() {
        let value = envelope("run-abc", "version", json!("0.1.0"));
        assert_eq!(value["result"], "0.1.0");
    }

    #[test]
    fn render_each_format() {
        let output = sample();

        let mut buf = Vec::new();
        render(&mut buf, OutputFormat::Json, "run-1", &output).unwrap();
        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["variance"], 0.5);

        let mut buf = Vec::new();
        render(&mut buf, OutputFormat::Summary, "run-1", &output).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[run-1] implied: 2 targets\n");

        let mut buf = Vec::new();
        render(&mut buf, OutputFormat::Exitcode, "run-1", &output).unwrap();
        assert!(buf.is_empty());

        let mut buf = Vec::new();
        render(&mut buf, OutputFormat::Md, "run-1", &output).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Implied\n"));
        assert!(text.contains("Run: run-1"));
    }
}
