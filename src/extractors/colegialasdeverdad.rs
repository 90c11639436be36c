use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::utils::{html_extract_title, html_search_meta, parse_duration, url_or_none};
use super::{ExtractFrom, ExtractedVideo, Extractor, SupportedFrom, VideoInfo};

static VALID_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?colegialasdeverdad\.com/([^/?#&]+)/?").unwrap());

pub struct ColegialasdeVerdad;

impl Extractor for ColegialasdeVerdad {
    const DISPLAY_NAME: &'static str = "ColegialasdeVerdad";
    const NAMES: &'static [&'static str] = &["ColegialasdeVerdad", "Colegialas"];

    fn supported_from() -> SupportedFrom {
        SupportedFrom::all()
    }

    async fn supports_url(url: &str) -> Option<bool> {
        Some(VALID_URL_REGEX.is_match(url))
    }

    async fn extract_video_url(from: ExtractFrom) -> Result<ExtractedVideo, anyhow::Error> {
        // The player poster sits next to the video file
        static PLAYER_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"class="blackPlayer"[^>]*style="[^"]*background-image:\s*url\(([^)]+)\)"#).unwrap()
        });

        let id = from
            .url()
            .and_then(|url| VALID_URL_REGEX.captures(url))
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string());

        let source = from.get_source(None).await?;
        let poster = PLAYER_REGEX
            .captures(&source)
            .and_then(|captures| captures.get(1))
            .map(|poster| poster.as_str().trim().trim_matches(|c: char| c == '\'' || c == '"'))
            .context("ColegialasdeVerdad: failed to find the player")?;
        let url = url_or_none(&poster.replace("/thumbnails/", "/videos/").replace(".jpg", ".mp4"))
            .context("ColegialasdeVerdad: failed to retrieve sources")?;

        let document = Html::parse_document(&source);
        let title = html_search_meta(&document, &["name", "og:title"])
            .or_else(|| html_extract_title(&document))
            .or_else(|| id.clone());

        Ok(ExtractedVideo {
            url,
            referer: None,
            info: VideoInfo {
                id,
                title,
                description: html_search_meta(&document, &["og:description"]),
                thumbnail: html_search_meta(&document, &["thumbnailUrl"]),
                duration: html_search_meta(&document, &["duration"]).as_deref().and_then(parse_duration),
                ext: Some("mp4".to_string()),
                ..Default::default()
            },
        })
    }
}
