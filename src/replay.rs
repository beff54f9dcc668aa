use std::io::{Read as _, Write as _};
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::ReplayArgs;
use crate::config::ReaderConfig;
use crate::formats::{Directive, ScriptLine};
use crate::host::{Host, RecordingHost};
use crate::manifest::{ManifestLoader, loader_for};
use crate::reader::Reader;
use crate::session::Session;

pub async fn run(args: ReplayArgs) -> anyhow::Result<()> {
    let config = ReaderConfig::load(&PathBuf::from(&args.config))?;
    let script = read_script(&args.script)?;
    let lines = parse_script(&script)?;

    let loader = loader_for(&config)?;
    let reader = Reader::new(config, RecordingHost::new())?;
    let mut session = Session::new(reader, loader);

    let outcome = session.open(args.fragment.as_deref()).await;
    tracing::debug!(?outcome, "session opened");

    let mut out = std::io::stdout();
    for (line_no, line) in lines {
        match line {
            ScriptLine::Directive(Directive::RunFrames { max }) => {
                let frames = session.run_frames(max);
                tracing::debug!(line_no, frames, "ran frames");
            }
            ScriptLine::Directive(Directive::Snapshot) => {
                write_snapshot(&mut out, &session)?;
            }
            ScriptLine::Event(event) => {
                if let Some(outcome) = session.dispatch(event).await {
                    tracing::debug!(line_no, ?outcome, "navigation finished");
                }
            }
        }
    }
    write_snapshot(&mut out, &session)?;
    out.flush().context("flush snapshots")?;

    Ok(())
}

fn read_script(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut script = String::new();
        std::io::stdin()
            .read_to_string(&mut script)
            .context("read script from stdin")?;
        return Ok(script);
    }
    std::fs::read_to_string(path).with_context(|| format!("read script: {path}"))
}

/// Parses JSONL, skipping blank lines and `//` comments. Returns 1-based line
/// numbers alongside each entry.
pub fn parse_script(script: &str) -> anyhow::Result<Vec<(usize, ScriptLine)>> {
    let mut lines = Vec::new();
    for (idx, raw) in script.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let line: ScriptLine = serde_json::from_str(trimmed)
            .with_context(|| format!("script line {}: unrecognized entry: {trimmed}", idx + 1))?;
        lines.push((idx + 1, line));
    }
    Ok(lines)
}

fn write_snapshot<H: Host, L: ManifestLoader>(
    out: &mut impl std::io::Write,
    session: &Session<H, L>,
) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, &session.reader().snapshot())
        .context("serialize snapshot")?;
    out.write_all(b"\n").context("write snapshot newline")?;
    Ok(())
}
