use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAPTER: &str = "chapter1";

/// Key naming one chapter. Doubles as the URL fragment and (capitalized) as the
/// manifest file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChapterId(String);

impl ChapterId {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let id = raw.trim();
        if id.is_empty() {
            anyhow::bail!("chapter id must not be empty");
        }
        if id.contains(['/', '\\']) || id.contains("..") {
            anyhow::bail!("chapter id must not contain path separators: {id:?}");
        }
        if id.chars().any(char::is_whitespace) {
            anyhow::bail!("chapter id must not contain whitespace: {id:?}");
        }
        Ok(Self(id.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `chapter1` -> `Chapter1`.
    pub fn manifest_stem(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn manifest_file_name(&self) -> String {
        format!("{}.json", self.manifest_stem())
    }
}

impl Default for ChapterId {
    fn default() -> Self {
        Self(DEFAULT_CHAPTER.to_owned())
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChapterId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChapterId> for String {
    fn from(value: ChapterId) -> Self {
        value.0
    }
}

/// One entry of the chapter link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub id: ChapterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChapterEntry {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub url: String,
    pub index: usize,
}

/// Pages of the chapter that was loaded last. Replaced as a whole on every
/// successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterState {
    pub current: ChapterId,
    pub total_pages: Option<usize>,
    pub pages: Vec<Page>,
}

impl ChapterState {
    pub fn new(current: ChapterId) -> Self {
        Self {
            current,
            total_pages: None,
            pages: Vec::new(),
        }
    }

    pub fn replace_pages(&mut self, urls: Vec<String>) {
        self.pages = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| Page { url, index })
            .collect();
        self.total_pages = Some(self.pages.len());
    }
}
