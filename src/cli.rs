use clap::{ArgAction, Args, Parser, Subcommand};

use crate::render::FrameSize;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Raise log verbosity (-v: debug, -vv: trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the configured chapters.
    Chapters(ChaptersArgs),
    /// Load one chapter manifest and print the page container as HTML.
    Render(RenderArgs),
    /// Drive a reader session from a JSONL script and print snapshots.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub struct ChaptersArgs {
    /// Reader config (YAML).
    #[arg(long)]
    pub config: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Reader config (YAML).
    #[arg(long)]
    pub config: String,

    /// Chapter id, e.g. `chapter1`.
    #[arg(long)]
    pub chapter: String,

    /// Frame size mode (auto, full, compact). Defaults to the config value.
    #[arg(long)]
    pub frame_size: Option<FrameSize>,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Reader config (YAML).
    #[arg(long)]
    pub config: String,

    /// JSONL script of events and directives (`-` for stdin).
    #[arg(long)]
    pub script: String,

    /// URL fragment the page is opened with, e.g. `#chapter2`.
    #[arg(long)]
    pub fragment: Option<String>,
}
