use std::collections::HashSet;

use serde::Serialize;

use crate::chapter::{ChapterEntry, ChapterId};

/// Enabled/disabled state of the end-of-chapter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavButtons {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Ordered list of known chapters plus the one being read. No wraparound at
/// either end.
#[derive(Debug, Clone)]
pub struct Navigation {
    chapters: Vec<ChapterEntry>,
    current: ChapterId,
}

impl Navigation {
    pub fn new(chapters: Vec<ChapterEntry>, initial: ChapterId) -> anyhow::Result<Self> {
        validate_chapter_list(&chapters, &initial)?;
        Ok(Self {
            chapters,
            current: initial,
        })
    }

    pub fn current(&self) -> &ChapterId {
        &self.current
    }

    pub fn contains(&self, chapter: &ChapterId) -> bool {
        self.position_of(chapter).is_some()
    }

    fn position(&self) -> Option<usize> {
        self.position_of(&self.current)
    }

    fn position_of(&self, chapter: &ChapterId) -> Option<usize> {
        self.chapters.iter().position(|entry| &entry.id == chapter)
    }

    /// Makes `chapter` current. Returns `false` (and leaves the state alone) for
    /// chapters outside the list.
    pub fn go_to(&mut self, chapter: &ChapterId) -> bool {
        if !self.contains(chapter) {
            tracing::warn!(%chapter, "ignoring navigation to unknown chapter");
            return false;
        }
        self.current = chapter.clone();
        true
    }

    pub fn prev(&mut self) -> Option<ChapterId> {
        let position = self.position()?;
        let target = self.chapters.get(position.checked_sub(1)?)?.id.clone();
        self.current = target.clone();
        Some(target)
    }

    pub fn next(&mut self) -> Option<ChapterId> {
        let position = self.position()?;
        let target = self.chapters.get(position + 1)?.id.clone();
        self.current = target.clone();
        Some(target)
    }

    pub fn buttons(&self) -> NavButtons {
        match self.position() {
            Some(position) => NavButtons {
                prev_disabled: position == 0,
                next_disabled: position + 1 == self.chapters.len(),
            },
            None => NavButtons {
                prev_disabled: true,
                next_disabled: true,
            },
        }
    }
}

/// The list must be non-empty with unique ids and contain `initial`.
pub fn validate_chapter_list(chapters: &[ChapterEntry], initial: &ChapterId) -> anyhow::Result<()> {
    if chapters.is_empty() {
        anyhow::bail!("chapter list is empty");
    }
    let mut seen = HashSet::new();
    for entry in chapters {
        if !seen.insert(entry.id.as_str()) {
            anyhow::bail!("duplicate chapter id in chapter list: {}", entry.id);
        }
    }
    if !seen.contains(initial.as_str()) {
        anyhow::bail!("chapter {initial} is not in the chapter list");
    }
    Ok(())
}

/// Strips the leading `#`. An empty fragment yields `None`.
pub fn parse_fragment(raw: &str) -> Option<anyhow::Result<ChapterId>> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    Some(ChapterId::parse(trimmed))
}

pub fn fragment_for(chapter: &ChapterId) -> String {
    format!("#{chapter}")
}
