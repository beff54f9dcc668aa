use serde::{Deserialize, Serialize};

use crate::autoscroll::AutoScrollState;
use crate::chapter::ChapterId;
use crate::chrome::Chrome;
use crate::progress::{ProgressView, ScrollMetrics};
use crate::reader::Event;
use crate::render::{ContainerContent, FrameSize};

/// Serializable view of everything the page would display.
#[derive(Debug, Clone, Serialize)]
pub struct ReaderSnapshot {
    pub current_chapter: ChapterId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_chapter: Option<ChapterId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    pub loading: bool,
    pub container: ContainerContent,
    pub scroll: ScrollMetrics,
    pub progress: ProgressView,
    pub auto_scroll: AutoScrollState,
    pub auto_scroll_label: &'static str,
    pub scroll_speed: f64,
    pub target_scroll_speed: f64,
    pub frame_size: FrameSize,
    pub chrome: Chrome,
    pub sound_label: &'static str,
    pub fullscreen: bool,
    pub frame: u64,
    pub generation: u64,
}

/// One line of a replay script: either a UI event or a harness directive.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptLine {
    Directive(Directive),
    Event(Event),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// Tick until no frame task is due, at most `max` frames.
    RunFrames { max: usize },
    Snapshot,
}
