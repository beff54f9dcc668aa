use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chapter::Page;
use crate::navigation::NavButtons;

pub const DEFAULT_FALLBACK_IMAGE: &str = "assets/fallback-image.jpg";
pub const FAILED_IMAGE_ALT: &str = "Изображение не загрузилось";
pub const LOAD_ERROR_MESSAGE: &str = "Ошибка загрузки главы. Проверьте JSON-файл!";
pub const END_MESSAGE: &str = "Спасибо за то, что прочитали эту главу";
pub const PREV_CHAPTER_LABEL: &str = "Прошлая глава";
pub const NEXT_CHAPTER_LABEL: &str = "Следующая глава";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSize {
    #[default]
    Auto,
    Full,
    Compact,
}

impl FrameSize {
    pub fn style(self) -> FrameStyle {
        match self {
            Self::Auto => FrameStyle {
                max_width: "90%",
                width: "auto",
                height: "auto",
            },
            Self::Full => FrameStyle {
                max_width: "100%",
                width: "100%",
                height: "auto",
            },
            Self::Compact => FrameStyle {
                max_width: "60%",
                width: "auto",
                height: "auto",
            },
        }
    }
}

impl FromStr for FrameSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => anyhow::bail!("unsupported frame size: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameStyle {
    pub max_width: &'static str,
    pub width: &'static str,
    pub height: &'static str,
}

impl FrameStyle {
    fn css(&self) -> String {
        format!(
            "max-width: {}; width: {}; height: {};",
            self.max_width, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageElement {
    pub index: usize,
    pub src: String,
    pub alt: String,
    pub lazy: bool,
    pub style: FrameStyle,
    pub failed: bool,
}

impl ImageElement {
    fn new(page: &Page, frame: FrameSize) -> Self {
        Self {
            index: page.index,
            src: page.url.clone(),
            alt: format!("Страница {}", page.index + 1),
            lazy: true,
            style: frame.style(),
            failed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndBlock {
    pub message: &'static str,
    pub prev_label: &'static str,
    pub next_label: &'static str,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl EndBlock {
    fn new(buttons: NavButtons) -> Self {
        Self {
            message: END_MESSAGE,
            prev_label: PREV_CHAPTER_LABEL,
            next_label: NEXT_CHAPTER_LABEL,
            prev_disabled: buttons.prev_disabled,
            next_disabled: buttons.next_disabled,
        }
    }
}

/// What the page container currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContainerContent {
    #[default]
    Empty,
    Error {
        message: &'static str,
    },
    Chapter {
        images: Vec<ImageElement>,
        end: EndBlock,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFailure {
    Substituted,
    AlreadySubstituted,
    NoSuchImage,
}

impl ContainerContent {
    pub fn load_error() -> Self {
        Self::Error {
            message: LOAD_ERROR_MESSAGE,
        }
    }

    /// One lazily loaded image per page, in page order, then the end block.
    pub fn chapter(pages: &[Page], frame: FrameSize, buttons: NavButtons) -> Self {
        let images = pages
            .iter()
            .map(|page| ImageElement::new(page, frame))
            .collect();
        Self::Chapter {
            images,
            end: EndBlock::new(buttons),
        }
    }

    pub fn images(&self) -> &[ImageElement] {
        match self {
            Self::Chapter { images, .. } => images,
            Self::Empty | Self::Error { .. } => &[],
        }
    }

    pub fn end_block(&self) -> Option<&EndBlock> {
        match self {
            Self::Chapter { end, .. } => Some(end),
            Self::Empty | Self::Error { .. } => None,
        }
    }

    pub fn apply_frame_size(&mut self, frame: FrameSize) {
        if let Self::Chapter { images, .. } = self {
            let style = frame.style();
            for image in images {
                image.style = style;
            }
        }
    }

    /// Swaps a broken image for the fallback. The fallback is substituted at
    /// most once per image.
    pub fn fail_image(&mut self, index: usize, fallback: &str) -> ImageFailure {
        let Self::Chapter { images, .. } = self else {
            return ImageFailure::NoSuchImage;
        };
        let Some(image) = images.get_mut(index) else {
            return ImageFailure::NoSuchImage;
        };
        if image.failed {
            return ImageFailure::AlreadySubstituted;
        }
        image.src = fallback.to_owned();
        image.alt = FAILED_IMAGE_ALT.to_owned();
        image.failed = true;
        ImageFailure::Substituted
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Error { message } => format!("<p>{}</p>\n", html_escape(message)),
            Self::Chapter { images, end } => {
                let mut out = String::new();
                for image in images {
                    out.push_str(&format!(
                        "<img src=\"{}\" alt=\"{}\" loading=\"{}\" style=\"{}\" data-page=\"{}\">\n",
                        html_escape(&image.src),
                        html_escape(&image.alt),
                        if image.lazy { "lazy" } else { "eager" },
                        image.style.css(),
                        image.index + 1,
                    ));
                }
                out.push_str("<div class=\"end-message\">\n");
                out.push_str(&format!("  <p>{}</p>\n", html_escape(end.message)));
                out.push_str("  <div class=\"chapter-nav\">\n");
                out.push_str(&format!(
                    "    <button id=\"prev-chapter\"{}>{}</button>\n",
                    disabled_attr(end.prev_disabled),
                    html_escape(end.prev_label)
                ));
                out.push_str(&format!(
                    "    <button id=\"next-chapter\"{}>{}</button>\n",
                    disabled_attr(end.next_disabled),
                    html_escape(end.next_label)
                ));
                out.push_str("  </div>\n</div>\n");
                out
            }
        }
    }
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled { " disabled" } else { "" }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(urls: &[&str]) -> Vec<Page> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| Page {
                url: (*url).to_owned(),
                index,
            })
            .collect()
    }

    const MIDDLE: NavButtons = NavButtons {
        prev_disabled: false,
        next_disabled: false,
    };

    #[test]
    fn renders_one_image_per_page_in_order() {
        let content = ContainerContent::chapter(&pages(&["a.jpg", "b.jpg"]), FrameSize::Auto, MIDDLE);
        let images = content.images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].src, "a.jpg");
        assert_eq!(images[0].alt, "Страница 1");
        assert_eq!(images[1].src, "b.jpg");
        assert_eq!(images[1].alt, "Страница 2");
        assert!(images.iter().all(|image| image.lazy));

        let end = content.end_block().unwrap();
        assert!(!end.prev_disabled && !end.next_disabled);
    }

    #[test]
    fn failed_image_gets_fallback_once() {
        let mut content =
            ContainerContent::chapter(&pages(&["a.jpg", "b.jpg", "c.jpg"]), FrameSize::Auto, MIDDLE);
        assert_eq!(
            content.fail_image(1, DEFAULT_FALLBACK_IMAGE),
            ImageFailure::Substituted
        );
        assert_eq!(
            content.fail_image(1, DEFAULT_FALLBACK_IMAGE),
            ImageFailure::AlreadySubstituted
        );
        assert_eq!(content.fail_image(7, DEFAULT_FALLBACK_IMAGE), ImageFailure::NoSuchImage);

        let images = content.images();
        assert_eq!(images.len(), 3);
        assert_eq!(images[1].src, DEFAULT_FALLBACK_IMAGE);
        assert_eq!(images[1].alt, FAILED_IMAGE_ALT);
        assert_eq!(images[0].src, "a.jpg");
        assert_eq!(images[2].alt, "Страница 3");
    }

    #[test]
    fn frame_size_modes_are_distinct_and_reapplied() {
        assert_ne!(FrameSize::Auto.style(), FrameSize::Full.style());
        assert_ne!(FrameSize::Auto.style(), FrameSize::Compact.style());
        assert_ne!(FrameSize::Full.style(), FrameSize::Compact.style());

        let mut content = ContainerContent::chapter(&pages(&["a.jpg"]), FrameSize::Auto, MIDDLE);
        content.apply_frame_size(FrameSize::Compact);
        assert_eq!(content.images()[0].style.max_width, "60%");
        assert_eq!("FULL".parse::<FrameSize>().unwrap(), FrameSize::Full);
        assert!("huge".parse::<FrameSize>().is_err());
    }

    #[test]
    fn html_escapes_attributes_and_marks_disabled_buttons() {
        let content = ContainerContent::chapter(
            &pages(&["a.jpg?x=1&y=\"2\""]),
            FrameSize::Full,
            NavButtons {
                prev_disabled: true,
                next_disabled: false,
            },
        );
        let html = content.to_html();
        assert!(html.contains("src=\"a.jpg?x=1&amp;y=&quot;2&quot;\""));
        assert!(html.contains("loading=\"lazy\""));
        assert!(html.contains("max-width: 100%; width: 100%; height: auto;"));
        assert!(html.contains("<button id=\"prev-chapter\" disabled>Прошлая глава</button>"));
        assert!(html.contains("<button id=\"next-chapter\">Следующая глава</button>"));
        assert_eq!(html.matches("<img ").count(), 1);
    }

    #[test]
    fn error_html_is_single_paragraph() {
        assert_eq!(
            ContainerContent::load_error().to_html(),
            format!("<p>{LOAD_ERROR_MESSAGE}</p>\n")
        );
        assert_eq!(ContainerContent::Empty.to_html(), "");
    }
}
