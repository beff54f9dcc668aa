use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::chapter::ChapterId;
use crate::cli::RenderArgs;
use crate::config::ReaderConfig;
use crate::host::RecordingHost;
use crate::manifest::loader_for;
use crate::reader::{LoadOutcome, Reader};
use crate::session::Session;

/// Loads one chapter the way the page does on open and prints the resulting
/// container HTML. A failed manifest prints the error paragraph, like the page.
pub async fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = ReaderConfig::load(&PathBuf::from(&args.config))?;
    let chapter = ChapterId::parse(&args.chapter).context("parse --chapter")?;
    if config.find_chapter(&chapter).is_none() {
        anyhow::bail!("chapter is not in the configured chapter list: {chapter}");
    }
    if let Some(frame_size) = args.frame_size {
        config.frame_size = frame_size;
    }

    let loader = loader_for(&config)?;
    let reader = Reader::new(config, RecordingHost::new())?;
    let mut session = Session::new(reader, loader);

    let outcome = session.open(Some(chapter.as_str())).await;
    match outcome {
        LoadOutcome::Rendered { pages } => tracing::info!(%chapter, pages, "rendered chapter"),
        LoadOutcome::Failed => tracing::warn!(%chapter, "chapter failed to load"),
        LoadOutcome::Stale => {}
    }

    let html = session.reader().content().to_html();
    let mut out = std::io::stdout().lock();
    out.write_all(html.as_bytes()).context("write html")?;
    out.flush().context("flush html")?;

    Ok(())
}
