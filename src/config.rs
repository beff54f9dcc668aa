use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::chapter::{ChapterEntry, ChapterId};
use crate::navigation::validate_chapter_list;
use crate::progress::DEFAULT_TO_TOP_THRESHOLD;
use crate::render::{DEFAULT_FALLBACK_IMAGE, FrameSize};

pub const ASSETS_BASE_ENV: &str = "SCROLLREADER_ASSETS_BASE";

/// Everything the surrounding document would normally supply: the chapter
/// link list, the initial control values and where the assets live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub assets_base: String,
    pub default_chapter: ChapterId,
    pub fallback_image: String,
    pub frame_size: FrameSize,
    pub sounds_enabled: bool,
    pub to_top_threshold: f64,
    pub viewport_height: f64,
    pub fetch_timeout_secs: Option<u64>,
    pub scroll_speed: ScrollSpeedConfig,
    pub chapters: Vec<ChapterEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollSpeedConfig {
    pub initial: i32,
    pub min: i32,
    pub max: i32,
}

impl Default for ScrollSpeedConfig {
    fn default() -> Self {
        Self {
            initial: 1,
            min: 1,
            max: 10,
        }
    }
}

impl ScrollSpeedConfig {
    /// Parses the speed slider value; out-of-range values are clamped.
    pub fn parse_input(&self, raw: &str) -> anyhow::Result<f64> {
        let value: i32 = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid scroll speed: {raw:?}"))?;
        Ok(f64::from(value.clamp(self.min, self.max)))
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        let default_chapter = ChapterId::default();
        Self {
            assets_base: ".".to_string(),
            chapters: vec![ChapterEntry {
                id: default_chapter.clone(),
                title: None,
            }],
            default_chapter,
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
            frame_size: FrameSize::Auto,
            sounds_enabled: true,
            to_top_threshold: DEFAULT_TO_TOP_THRESHOLD,
            viewport_height: 800.0,
            fetch_timeout_secs: None,
            scroll_speed: ScrollSpeedConfig::default(),
        }
    }
}

impl ReaderConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let mut config = Self::from_yaml(&yaml)
            .with_context(|| format!("parse config: {}", path.display()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("deserialize reader config")
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(base) = std::env::var(ASSETS_BASE_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            tracing::debug!(assets_base = %base, "assets base overridden from environment");
            self.assets_base = base;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_chapter_list(&self.chapters, &self.default_chapter)
            .context("config: chapters / default_chapter")?;
        let speed = self.scroll_speed;
        if speed.min <= 0 || speed.min > speed.max {
            anyhow::bail!(
                "config: scroll_speed range must satisfy 0 < min <= max (got {}..={})",
                speed.min,
                speed.max
            );
        }
        if !(speed.min..=speed.max).contains(&speed.initial) {
            anyhow::bail!(
                "config: scroll_speed.initial {} is outside {}..={}",
                speed.initial,
                speed.min,
                speed.max
            );
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            anyhow::bail!("config: viewport_height must be positive");
        }
        if !(self.to_top_threshold.is_finite() && self.to_top_threshold >= 0.0) {
            anyhow::bail!("config: to_top_threshold must be >= 0");
        }
        if self.fallback_image.trim().is_empty() {
            anyhow::bail!("config: fallback_image must not be empty");
        }
        Ok(())
    }

    pub fn find_chapter(&self, chapter: &ChapterId) -> Option<&ChapterEntry> {
        self.chapters.iter().find(|entry| &entry.id == chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ReaderConfig::default().validate().unwrap();
    }

    #[test]
    fn yaml_fills_in_defaults() {
        let config = ReaderConfig::from_yaml(
            r#"
assets_base: https://example.com/manga/
chapters:
  - id: chapter1
    title: "Глава 1"
  - id: chapter2
frame_size: compact
scroll_speed:
  max: 20
"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.chapters.len(), 2);
        assert_eq!(config.chapters[0].display_title(), "Глава 1");
        assert_eq!(config.chapters[1].display_title(), "chapter2");
        assert_eq!(config.frame_size, FrameSize::Compact);
        assert_eq!(config.scroll_speed.initial, 1);
        assert_eq!(config.scroll_speed.max, 20);
        assert_eq!(config.to_top_threshold, 300.0);
        assert_eq!(config.fallback_image, DEFAULT_FALLBACK_IMAGE);
    }

    #[test]
    fn validation_rejects_bad_lists_and_speeds() {
        let config = ReaderConfig::from_yaml("chapters: []").unwrap();
        assert!(config.validate().is_err());

        let config = ReaderConfig::from_yaml("chapters: [{id: a}, {id: a}]\ndefault_chapter: a").unwrap();
        assert!(config.validate().is_err());

        let config = ReaderConfig::from_yaml("chapters: [{id: a}]").unwrap();
        let err = format!("{:#}", config.validate().unwrap_err());
        assert!(err.contains("default_chapter"), "{err}");
        assert!(err.contains("chapter1 is not in the chapter list"), "{err}");

        let config = ReaderConfig::from_yaml("scroll_speed: {min: 0}").unwrap();
        assert!(config.validate().is_err());

        assert!(ReaderConfig::from_yaml("chapters: [{id: \"../x\"}]").is_err());
        assert!(ReaderConfig::from_yaml("unknown_key: 1").is_err());
    }

    #[test]
    fn speed_input_is_parsed_and_clamped() {
        let speed = ScrollSpeedConfig::default();
        assert_eq!(speed.parse_input("5").unwrap(), 5.0);
        assert_eq!(speed.parse_input(" 42 ").unwrap(), 10.0);
        assert_eq!(speed.parse_input("-3").unwrap(), 1.0);
        assert!(speed.parse_input("fast").is_err());
    }
}
