use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::chapter::ChapterId;
use crate::config::ReaderConfig;

/// Directory, relative to the assets base, that holds one manifest per chapter.
pub const CHAPTERS_DATA_DIR: &str = "assets/chapters_data";

/// Fetches the ordered list of page image URLs for one chapter.
#[async_trait]
pub trait ManifestLoader: Send + Sync {
    async fn load(&self, chapter: &ChapterId) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
impl<L: ManifestLoader + ?Sized> ManifestLoader for Box<L> {
    async fn load(&self, chapter: &ChapterId) -> anyhow::Result<Vec<String>> {
        (**self).load(chapter).await
    }
}

pub fn manifest_relative_path(chapter: &ChapterId) -> String {
    format!("{CHAPTERS_DATA_DIR}/{}", chapter.manifest_file_name())
}

/// A manifest body must be a JSON array of strings.
pub fn parse_manifest(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
    serde_json::from_slice(bytes).context("parse chapter manifest (expected a JSON array of image URLs)")
}

#[derive(Debug, Clone)]
pub struct HttpManifestLoader {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpManifestLoader {
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> anyhow::Result<Self> {
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            anyhow::bail!("manifest base url must be http/https: {base_url}");
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("build manifest http client")?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn manifest_url(&self, chapter: &ChapterId) -> anyhow::Result<Url> {
        self.base_url
            .join(&manifest_relative_path(chapter))
            .with_context(|| format!("build manifest url for {chapter}"))
    }
}

#[async_trait]
impl ManifestLoader for HttpManifestLoader {
    async fn load(&self, chapter: &ChapterId) -> anyhow::Result<Vec<String>> {
        let url = self.manifest_url(chapter)?;
        tracing::debug!(%chapter, %url, "fetching chapter manifest");

        let resp = self
            .client
            .get(url.clone())
            .header(USER_AGENT, concat!("scrollreader/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("chapter manifest not found ({status}): {url}");
        }

        let body = resp
            .bytes()
            .await
            .with_context(|| format!("read manifest body: {url}"))?;
        parse_manifest(&body).with_context(|| format!("manifest: {url}"))
    }
}

#[derive(Debug, Clone)]
pub struct FsManifestLoader {
    root: PathBuf,
}

impl FsManifestLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn manifest_path(&self, chapter: &ChapterId) -> PathBuf {
        self.root
            .join(CHAPTERS_DATA_DIR)
            .join(chapter.manifest_file_name())
    }
}

#[async_trait]
impl ManifestLoader for FsManifestLoader {
    async fn load(&self, chapter: &ChapterId) -> anyhow::Result<Vec<String>> {
        let path = self.manifest_path(chapter);
        tracing::debug!(%chapter, path = %path.display(), "reading chapter manifest");

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read manifest: {}", path.display()))?;
        parse_manifest(&bytes).with_context(|| format!("manifest: {}", path.display()))
    }
}

/// Picks the HTTP loader for `http`/`https` bases and the filesystem loader for
/// everything else, including `file://` URLs.
pub fn loader_for(config: &ReaderConfig) -> anyhow::Result<Box<dyn ManifestLoader>> {
    let base = config.assets_base.trim();
    if let Ok(url) = Url::parse(base) {
        match url.scheme() {
            "http" | "https" => {
                let timeout = config.fetch_timeout_secs.map(Duration::from_secs);
                return Ok(Box::new(HttpManifestLoader::new(&url, timeout)?));
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| anyhow::anyhow!("invalid file url: {url}"))?;
                return Ok(Box::new(FsManifestLoader::new(path)));
            }
            _ => {}
        }
    }
    Ok(Box::new(FsManifestLoader::new(base)))
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
