//! Top-level reader controller.
//!
//! `Reader` owns every piece of page state and is driven by [`Event`]s from the
//! host plus one [`Reader::tick`] per display frame. Chapter navigation hands out
//! a [`LoadTicket`]; only the result for the newest ticket is ever applied.

use serde::{Deserialize, Serialize};

use crate::autoscroll::{AutoScroll, AutoScrollState, SpeedEasing};
use crate::chapter::{ChapterId, ChapterState};
use crate::chrome::Chrome;
use crate::config::ReaderConfig;
use crate::formats::ReaderSnapshot;
use crate::frame::{FrameScheduler, FrameTask, TaskControl};
use crate::host::{Host, Sound};
use crate::navigation::{Navigation, fragment_for, parse_fragment};
use crate::progress::{ProgressView, ScrollMetrics};
use crate::render::{ContainerContent, FrameSize, ImageFailure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ChapterLinkClicked { chapter: String },
    PrevChapterClicked,
    NextChapterClicked,
    ImageClicked,
    /// `generation` is the load the image belongs to, see [`Reader::generation`].
    ImageFailed { generation: u64, index: usize },
    FrameSizeChanged { size: FrameSize },
    AutoScrollToggled,
    ScrollSpeedInput { value: String },
    SoundToggled,
    ToStartClicked,
    ToEndClicked,
    ToTopClicked,
    FullscreenClicked,
    BurgerClicked,
    SettingsClicked,
    OverlayClicked,
    ProgressBarClicked,
    Scrolled { scroll_top: f64 },
    Layout { scroll_height: f64, client_height: f64 },
}

/// Handle for one in-flight manifest load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    chapter: ChapterId,
    generation: u64,
}

impl LoadTicket {
    pub fn chapter(&self) -> &ChapterId {
        &self.chapter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered { pages: usize },
    Failed,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub ran: Vec<FrameTask>,
    pub idle: bool,
}

pub struct Reader<H> {
    host: H,
    config: ReaderConfig,
    navigation: Navigation,
    chapter: ChapterState,
    content: ContainerContent,
    metrics: ScrollMetrics,
    progress: ProgressView,
    auto_scroll: AutoScroll,
    speed: SpeedEasing,
    chrome: Chrome,
    frame_size: FrameSize,
    highlighted: Option<ChapterId>,
    scheduler: FrameScheduler,
    generation: u64,
    pending: Option<u64>,
}

impl<H: Host> Reader<H> {
    pub fn new(config: ReaderConfig, host: H) -> anyhow::Result<Self> {
        config.validate()?;
        let navigation = Navigation::new(config.chapters.clone(), config.default_chapter.clone())?;
        let metrics = ScrollMetrics::empty(config.viewport_height);
        let progress = ProgressView::from_metrics(&metrics, config.to_top_threshold);
        Ok(Self {
            host,
            chapter: ChapterState::new(config.default_chapter.clone()),
            navigation,
            content: ContainerContent::Empty,
            metrics,
            progress,
            auto_scroll: AutoScroll::default(),
            speed: SpeedEasing::new(f64::from(config.scroll_speed.initial)),
            chrome: Chrome::new(config.sounds_enabled),
            frame_size: config.frame_size,
            highlighted: None,
            scheduler: FrameScheduler::new(),
            generation: 0,
            pending: None,
            config,
        })
    }

    /// Page load: the URL fragment picks the first chapter. Missing, malformed
    /// or unknown fragments fall back to the default chapter.
    pub fn open(&mut self, fragment: Option<&str>) -> LoadTicket {
        let chapter = match fragment.and_then(parse_fragment) {
            Some(Ok(chapter)) if self.navigation.contains(&chapter) => chapter,
            Some(Ok(chapter)) => {
                tracing::warn!(%chapter, "fragment names an unknown chapter; opening the default");
                self.config.default_chapter.clone()
            }
            Some(Err(err)) => {
                tracing::warn!(error = %format!("{err:#}"), "invalid fragment; opening the default");
                self.config.default_chapter.clone()
            }
            None => self.config.default_chapter.clone(),
        };
        self.navigation.go_to(&chapter);
        tracing::info!(%chapter, "opening reader");
        self.begin_load()
    }

    pub fn handle(&mut self, event: Event) -> Option<LoadTicket> {
        tracing::debug!(?event, "ui event");
        match event {
            Event::ChapterLinkClicked { chapter } => {
                let chapter = match ChapterId::parse(&chapter) {
                    Ok(chapter) => chapter,
                    Err(err) => {
                        tracing::warn!(error = %format!("{err:#}"), "ignoring chapter link");
                        return None;
                    }
                };
                if !self.navigation.go_to(&chapter) {
                    return None;
                }
                self.chrome.chapter_chosen();
                return Some(self.start_navigation());
            }
            Event::PrevChapterClicked => return self.step_chapter(false),
            Event::NextChapterClicked => return self.step_chapter(true),
            Event::ImageClicked => {
                if self.content.images().is_empty() {
                    tracing::debug!("no page images rendered; ignoring click");
                    return None;
                }
                let hidden = self.chrome.toggle_interface();
                tracing::debug!(hidden, "interface visibility toggled");
            }
            Event::ImageFailed { generation, index } => {
                if generation != self.generation {
                    tracing::debug!(
                        generation,
                        latest = self.generation,
                        index,
                        "discarding image failure from an earlier load"
                    );
                    return None;
                }
                self.fail_image(index);
            }
            Event::FrameSizeChanged { size } => {
                self.frame_size = size;
                self.content.apply_frame_size(size);
            }
            Event::AutoScrollToggled => match self.auto_scroll.toggle() {
                AutoScrollState::Running => {
                    self.scheduler.schedule(FrameTask::AutoScroll);
                }
                AutoScrollState::Idle => {
                    self.scheduler.cancel(FrameTask::AutoScroll);
                }
            },
            Event::ScrollSpeedInput { value } => match self.config.scroll_speed.parse_input(&value) {
                Ok(target) => {
                    self.speed.set_target(target);
                    if self.speed.step() == TaskControl::Continue {
                        self.scheduler.schedule(FrameTask::SpeedEasing);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %format!("{err:#}"), "ignoring scroll speed input");
                }
            },
            Event::SoundToggled => {
                let enabled = self.chrome.toggle_sounds();
                tracing::debug!(enabled, "sounds toggled");
            }
            Event::ToStartClicked | Event::ToTopClicked => {
                self.metrics.scroll_to(0.0);
                self.refresh_progress();
            }
            Event::ToEndClicked => {
                self.metrics.scroll_to_end();
                self.refresh_progress();
            }
            Event::FullscreenClicked => self.toggle_fullscreen(),
            Event::BurgerClicked => self.chrome.toggle_sidebar(),
            Event::SettingsClicked => self.chrome.toggle_settings(),
            Event::OverlayClicked => self.chrome.close_panels(),
            Event::ProgressBarClicked => {
                self.chrome.toggle_progress_bar();
            }
            Event::Scrolled { scroll_top } => {
                self.metrics.scroll_to(scroll_top);
                self.refresh_progress();
            }
            Event::Layout {
                scroll_height,
                client_height,
            } => {
                self.metrics.set_layout(scroll_height, client_height);
                self.refresh_progress();
            }
        }
        None
    }

    /// Applies the manifest result for `ticket`. Results for anything but the
    /// latest navigation are dropped.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: anyhow::Result<Vec<String>>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                chapter = %ticket.chapter,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale chapter load"
            );
            return LoadOutcome::Stale;
        }
        self.pending = None;

        let outcome = match result {
            Ok(urls) => {
                self.chapter.current = ticket.chapter.clone();
                self.chapter.replace_pages(urls);
                self.content = ContainerContent::chapter(
                    &self.chapter.pages,
                    self.frame_size,
                    self.navigation.buttons(),
                );
                self.highlighted = Some(ticket.chapter.clone());
                let pages = self.chapter.pages.len();
                tracing::info!(chapter = %ticket.chapter, pages, "chapter rendered");
                LoadOutcome::Rendered { pages }
            }
            Err(err) => {
                tracing::error!(chapter = %ticket.chapter, error = %format!("{err:#}"), "chapter load failed");
                self.content = ContainerContent::load_error();
                LoadOutcome::Failed
            }
        };
        self.refresh_progress();
        outcome
    }

    /// Runs one display frame.
    pub fn tick(&mut self) -> TickReport {
        let due = self.scheduler.begin_frame();
        for &task in &due {
            let control = match task {
                FrameTask::SpeedEasing => self.speed.step(),
                FrameTask::AutoScroll => {
                    let control = self.auto_scroll.step(&mut self.metrics, self.speed.current());
                    self.refresh_progress();
                    if control == TaskControl::Stop {
                        tracing::debug!(scroll_top = self.metrics.scroll_top, "auto-scroll stopped");
                    }
                    control
                }
            };
            self.scheduler.finish(task, control);
        }
        TickReport {
            ran: due,
            idle: self.scheduler.is_idle(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Number of the latest chapter load. Images rendered by that load report
    /// failures with it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            current_chapter: self.navigation.current().clone(),
            highlighted_chapter: self.highlighted.clone(),
            total_pages: self.chapter.total_pages,
            loading: self.pending.is_some(),
            container: self.content.clone(),
            scroll: self.metrics,
            progress: self.progress.clone(),
            auto_scroll: self.auto_scroll.state(),
            auto_scroll_label: self.auto_scroll.label(),
            scroll_speed: self.speed.current(),
            target_scroll_speed: self.speed.target(),
            frame_size: self.frame_size,
            chrome: self.chrome.clone(),
            sound_label: self.chrome.sound_label(),
            fullscreen: self.host.is_fullscreen(),
            frame: self.scheduler.frames(),
            generation: self.generation,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    pub fn chapter_state(&self) -> &ChapterState {
        &self.chapter
    }

    pub fn current_chapter(&self) -> &ChapterId {
        self.navigation.current()
    }

    pub fn metrics(&self) -> &ScrollMetrics {
        &self.metrics
    }

    pub fn progress(&self) -> &ProgressView {
        &self.progress
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn auto_scroll_state(&self) -> AutoScrollState {
        self.auto_scroll.state()
    }

    pub fn speed(&self) -> &SpeedEasing {
        &self.speed
    }

    /// End-of-chapter buttons. They only exist while a chapter is rendered and
    /// are disabled at the ends of the list.
    fn step_chapter(&mut self, forward: bool) -> Option<LoadTicket> {
        if self.content.end_block().is_none() {
            tracing::debug!("chapter buttons are not rendered; ignoring");
            return None;
        }
        let moved = if forward {
            self.navigation.next()
        } else {
            self.navigation.prev()
        };
        if moved.is_none() {
            tracing::debug!(forward, "chapter button disabled at list boundary");
            return None;
        }
        Some(self.start_navigation())
    }

    fn start_navigation(&mut self) -> LoadTicket {
        let ticket = self.begin_load();
        self.host.set_fragment(&fragment_for(&ticket.chapter));
        self.play(Sound::Click);
        ticket
    }

    fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.content = ContainerContent::Empty;
        self.metrics = ScrollMetrics::empty(self.metrics.client_height);
        self.refresh_progress();
        LoadTicket {
            chapter: self.navigation.current().clone(),
            generation: self.generation,
        }
    }

    fn fail_image(&mut self, index: usize) {
        let src = self
            .content
            .images()
            .get(index)
            .map(|image| image.src.clone())
            .unwrap_or_default();
        match self.content.fail_image(index, &self.config.fallback_image) {
            ImageFailure::Substituted => {
                tracing::warn!(page = index + 1, %src, "page image failed to load; showing fallback");
            }
            ImageFailure::AlreadySubstituted => {
                tracing::warn!(page = index + 1, "fallback image failed to load");
            }
            ImageFailure::NoSuchImage => {
                tracing::debug!(index, "image failure for unknown page ignored");
            }
        }
    }

    fn toggle_fullscreen(&mut self) {
        let result = if self.host.is_fullscreen() {
            self.host.exit_fullscreen()
        } else {
            self.host.request_fullscreen()
        };
        if let Err(err) = result {
            tracing::warn!(error = %format!("{err:#}"), "fullscreen request failed");
        }
    }

    fn play(&mut self, sound: Sound) {
        if !self.chrome.sounds_enabled {
            return;
        }
        if let Err(err) = self.host.play_sound(sound) {
            tracing::warn!(?sound, error = %format!("{err:#}"), "sound playback failed");
        }
    }

    fn refresh_progress(&mut self) {
        self.progress = ProgressView::from_metrics(&self.metrics, self.config.to_top_threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapter::ChapterEntry;
    use crate::host::RecordingHost;
    use crate::render::FAILED_IMAGE_ALT;

    fn config(ids: &[&str]) -> ReaderConfig {
        ReaderConfig {
            chapters: ids
                .iter()
                .map(|id| ChapterEntry {
                    id: ChapterId::parse(id).unwrap(),
                    title: None,
                })
                .collect(),
            default_chapter: ChapterId::parse(ids[0]).unwrap(),
            ..ReaderConfig::default()
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| (*u).to_owned()).collect()
    }

    #[test]
    fn open_uses_fragment_or_default() {
        let mut reader = Reader::new(config(&["c1", "c2"]), RecordingHost::new()).unwrap();
        assert_eq!(reader.open(Some("#c2")).chapter().as_str(), "c2");
        assert_eq!(reader.open(Some("#nope")).chapter().as_str(), "c1");
        assert_eq!(reader.open(Some("#../x")).chapter().as_str(), "c1");
        assert_eq!(reader.open(None).chapter().as_str(), "c1");
        assert!(reader.host().fragments.is_empty());
        assert!(reader.host().sounds.is_empty());
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut reader = Reader::new(config(&["c1", "c2", "c3"]), RecordingHost::new()).unwrap();
        let first = reader.open(None);
        let second = reader
            .handle(Event::ChapterLinkClicked {
                chapter: "c3".to_owned(),
            })
            .unwrap();
        assert!(second.generation() > first.generation());

        assert_eq!(
            reader.complete_load(&second, Ok(urls(&["c3-1.jpg"]))),
            LoadOutcome::Rendered { pages: 1 }
        );
        assert_eq!(
            reader.complete_load(&first, Ok(urls(&["c1-1.jpg", "c1-2.jpg"]))),
            LoadOutcome::Stale
        );

        assert_eq!(reader.content().images().len(), 1);
        assert_eq!(reader.content().images()[0].src, "c3-1.jpg");
        assert_eq!(reader.chapter_state().current.as_str(), "c3");
        assert_eq!(reader.host().fragment(), Some("#c3"));
    }

    #[test]
    fn failed_load_keeps_previous_chapter_state() {
        let mut reader = Reader::new(config(&["c1", "c2"]), RecordingHost::new()).unwrap();
        let ticket = reader.open(None);
        reader.complete_load(&ticket, Ok(urls(&["a.jpg", "b.jpg"])));

        let ticket = reader.handle(Event::NextChapterClicked).unwrap();
        assert_eq!(
            reader.complete_load(&ticket, Err(anyhow::anyhow!("404"))),
            LoadOutcome::Failed
        );
        assert_eq!(reader.content(), &ContainerContent::load_error());
        assert_eq!(reader.chapter_state().current.as_str(), "c1");
        assert_eq!(reader.chapter_state().total_pages, Some(2));
        assert_eq!(reader.current_chapter().as_str(), "c2");

        assert!(reader.handle(Event::PrevChapterClicked).is_none());
    }

    #[test]
    fn sounds_follow_toggle_and_failures_are_swallowed() {
        let mut reader = Reader::new(config(&["c1", "c2"]), RecordingHost::new()).unwrap();
        let ticket = reader.open(None);
        reader.complete_load(&ticket, Ok(urls(&["a.jpg"])));

        let ticket = reader.handle(Event::NextChapterClicked).unwrap();
        reader.complete_load(&ticket, Ok(urls(&["b.jpg"])));
        assert_eq!(reader.host().sounds, vec![Sound::Click]);

        reader.handle(Event::SoundToggled);
        let ticket = reader.handle(Event::PrevChapterClicked).unwrap();
        reader.complete_load(&ticket, Ok(urls(&["a.jpg"])));
        assert_eq!(reader.host().sounds.len(), 1);

        reader.handle(Event::SoundToggled);
        reader.host_mut().fail_sounds = true;
        assert!(reader.handle(Event::NextChapterClicked).is_some());
        assert_eq!(reader.host().sounds.len(), 1);
    }

    #[test]
    fn auto_scroll_runs_until_end_and_resets_label() {
        let mut reader = Reader::new(config(&["c1"]), RecordingHost::new()).unwrap();
        let ticket = reader.open(None);
        reader.complete_load(&ticket, Ok(urls(&["a.jpg", "b.jpg"])));
        reader.handle(Event::Layout {
            scroll_height: 1000.0,
            client_height: 800.0,
        });

        reader.handle(Event::AutoScrollToggled);
        assert_eq!(reader.snapshot().auto_scroll_label, "Остановить");

        let mut frames = 0;
        while !reader.tick().idle {
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(frames, 199);
        assert_eq!(reader.metrics().scroll_top, 200.0);
        assert_eq!(reader.progress().percent, 100.0);
        assert_eq!(reader.auto_scroll_state(), AutoScrollState::Idle);
        assert_eq!(reader.snapshot().auto_scroll_label, "Вкл/Выкл");
    }

    #[test]
    fn manual_stop_cancels_frame_task() {
        let mut reader = Reader::new(config(&["c1"]), RecordingHost::new()).unwrap();
        reader.handle(Event::Layout {
            scroll_height: 5000.0,
            client_height: 800.0,
        });
        reader.handle(Event::AutoScrollToggled);
        reader.tick();
        reader.handle(Event::AutoScrollToggled);
        assert!(reader.is_idle());
        assert_eq!(reader.metrics().scroll_top, 1.0);
        assert_eq!(reader.snapshot().auto_scroll_label, "Вкл/Выкл");
    }

    #[test]
    fn speed_input_eases_independently_of_auto_scroll() {
        let mut reader = Reader::new(config(&["c1"]), RecordingHost::new()).unwrap();
        reader.handle(Event::ScrollSpeedInput {
            value: "6".to_owned(),
        });
        assert!((reader.speed().current() - 1.5).abs() < 1e-9);
        assert!(!reader.is_idle());

        let mut frames = 0;
        while !reader.tick().idle {
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(reader.speed().current(), 6.0);

        reader.handle(Event::ScrollSpeedInput {
            value: "fast".to_owned(),
        });
        assert_eq!(reader.speed().target(), 6.0);
        assert!(reader.is_idle());
    }

    #[test]
    fn to_top_and_to_end_update_progress() {
        let mut reader = Reader::new(config(&["c1"]), RecordingHost::new()).unwrap();
        reader.handle(Event::Layout {
            scroll_height: 2000.0,
            client_height: 1000.0,
        });
        reader.handle(Event::ToEndClicked);
        assert_eq!(reader.progress().label, "Прокручено: 100%");
        assert!(reader.progress().to_top_visible);

        reader.handle(Event::ToTopClicked);
        assert_eq!(reader.progress().label, "Прокручено: 0%");
        assert!(!reader.progress().to_top_visible);
    }

    #[test]
    fn image_failure_from_previous_chapter_is_ignored() {
        let mut reader = Reader::new(config(&["c1", "c2"]), RecordingHost::new()).unwrap();
        let ticket = reader.open(None);
        reader.complete_load(&ticket, Ok(urls(&["c1-a.jpg", "c1-broken.jpg"])));
        let first_load = reader.generation();

        let ticket = reader.handle(Event::NextChapterClicked).unwrap();
        reader.complete_load(&ticket, Ok(urls(&["c2-a.jpg", "c2-b.jpg"])));

        reader.handle(Event::ImageFailed {
            generation: first_load,
            index: 1,
        });
        let images = reader.content().images();
        assert_eq!(images[1].src, "c2-b.jpg");
        assert_eq!(images[1].alt, "Страница 2");

        reader.handle(Event::ImageFailed {
            generation: reader.generation(),
            index: 1,
        });
        assert_eq!(reader.content().images()[1].alt, FAILED_IMAGE_ALT);
        assert_eq!(reader.content().images()[0].src, "c2-a.jpg");
    }

    #[test]
    fn image_click_needs_rendered_pages() {
        let mut reader = Reader::new(config(&["c1"]), RecordingHost::new()).unwrap();
        let ticket = reader.open(None);
        reader.complete_load(&ticket, Err(anyhow::anyhow!("404")));

        reader.handle(Event::ImageClicked);
        assert!(!reader.chrome().interface_hidden);

        let ticket = reader.open(None);
        reader.complete_load(&ticket, Ok(urls(&["a.jpg"])));
        reader.handle(Event::ImageClicked);
        assert!(reader.chrome().interface_hidden);
    }

    #[test]
    fn fullscreen_toggles_through_host() {
        let mut reader = Reader::new(config(&["c1"]), RecordingHost::new()).unwrap();
        reader.handle(Event::FullscreenClicked);
        assert!(reader.host().fullscreen);
        reader.handle(Event::FullscreenClicked);
        assert!(!reader.host().fullscreen);
    }
}
