use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::ChaptersArgs;
use crate::config::ReaderConfig;
use crate::navigation::fragment_for;

/// Prints one tab-separated line per chapter: position, id, fragment, title.
/// The default chapter is marked with `*`.
pub fn run(args: ChaptersArgs) -> anyhow::Result<()> {
    let config = ReaderConfig::load(&PathBuf::from(&args.config))?;

    let mut out = std::io::stdout().lock();
    for (position, entry) in config.chapters.iter().enumerate() {
        let marker = if entry.id == config.default_chapter { "*" } else { "" };
        writeln!(
            out,
            "{}{marker}\t{}\t{}\t{}",
            position + 1,
            entry.id,
            fragment_for(&entry.id),
            entry.display_title()
        )
        .context("write chapter list")?;
    }
    out.flush().context("flush chapter list")?;

    Ok(())
}
