use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::{determine_ext, url_or_none};
use super::{ExtractFrom, ExtractedVideo, Extractor, SupportedFrom, VideoInfo};

static VALID_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?jizzbunker\.com/(?:es/)?(\d+)/[^/?#]*\.html").unwrap());

pub struct Jizzbunker;

impl Extractor for Jizzbunker {
    const DISPLAY_NAME: &'static str = "Jizzbunker";
    const NAMES: &'static [&'static str] = &["Jizzbunker"];

    fn supported_from() -> SupportedFrom {
        SupportedFrom::all()
    }

    async fn supports_url(url: &str) -> Option<bool> {
        Some(VALID_URL_REGEX.is_match(url))
    }

    async fn extract_video_url(from: ExtractFrom) -> Result<ExtractedVideo, anyhow::Error> {
        static VIDEO_URL_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"sources\.push\(\{[^}]*src:\s*['"]([^'"]+)['"][^}]*\}\)"#).unwrap());
        static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").unwrap());

        let id = from
            .url()
            .and_then(|url| VALID_URL_REGEX.captures(url))
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string());

        let source = from.get_source(None).await?;
        let url = VIDEO_URL_REGEX
            .captures(&source)
            .and_then(|captures| captures.get(1))
            .and_then(|video_url| url_or_none(video_url.as_str()))
            .context("Jizzbunker: failed to retrieve sources")?;

        let title = TITLE_REGEX
            .captures(&source)
            .and_then(|captures| captures.get(1))
            .map(|title| title.as_str().trim().to_string())
            .filter(|title| !title.is_empty())
            .or_else(|| id.clone());

        // Quality numbers show up where the extension would be
        let ext = match determine_ext(&url) {
            Some(ext) if !matches!(ext.as_str(), "480" | "720" | "1080") => ext,
            _ => "mp4".to_string(),
        };

        Ok(ExtractedVideo {
            url,
            referer: None,
            info: VideoInfo {
                id,
                title,
                ext: Some(ext),
                ..Default::default()
            },
        })
    }
}
