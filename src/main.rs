use anyhow::Context;
use slack_record::config::load_settings;
use slack_record::logging::init_tracing;
use slack_record::{LogEvent, SlackRecord};
use std::io::{self, BufRead, Write};

/// Reads newline-delimited JSON log records on stdin and writes one Slack
/// webhook payload per record to stdout.
fn main() -> anyhow::Result<()> {
    init_tracing("slack_record=info");

    let settings = load_settings()?;
    tracing::debug!(?settings, "Configuration loaded");

    let record = SlackRecord::new(settings);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut built = 0usize;

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: LogEvent = serde_json::from_str(&line)
            .with_context(|| format!("invalid log record on line {}", index + 1))?;
        let payload = record.build(&event)?;

        writeln!(out, "{}", payload.to_json()?)?;
        built += 1;
    }

    out.flush()?;
    tracing::info!(payloads = built, "Done");
    Ok(())
}
