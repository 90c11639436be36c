use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde_json::Value;

use super::utils::{extract_src, html_extract_title, https_url_or_none, url_or_none};
use super::{ExtractFrom, ExtractedVideo, Extractor, SupportedFrom, VideoInfo};

static VALID_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?pornoamateurlatino\.net/(?:\d{4}/\d{2}/)?([^/?#]+)\.html").unwrap()
});

/// The page only embeds a third party player, so the extracted url is the
/// player page and still has to go through the extractor for that host.
pub struct PornoAmateurLatino;

impl Extractor for PornoAmateurLatino {
    const DISPLAY_NAME: &'static str = "PornoAmateurLatino";
    const NAMES: &'static [&'static str] = &["PornoAmateurLatino"];

    fn supported_from() -> SupportedFrom {
        SupportedFrom::all()
    }

    async fn supports_url(url: &str) -> Option<bool> {
        Some(VALID_URL_REGEX.is_match(url))
    }

    async fn extract_video_url(from: ExtractFrom) -> Result<ExtractedVideo, anyhow::Error> {
        let page_url = from.url().map(str::to_string);
        let id = page_url
            .as_deref()
            .and_then(|url| VALID_URL_REGEX.captures(url))
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string());

        let source = from.get_source(None).await?;
        let url = embed_url(&source).context("PornoAmateurLatino: failed to retrieve sources")?;
        log::debug!("PornoAmateurLatino: found embedded player {}", url);

        let title = html_extract_title(&Html::parse_document(&source)).or_else(|| id.as_deref().map(title_from_id));

        Ok(ExtractedVideo {
            url,
            referer: page_url,
            info: VideoInfo {
                id,
                title,
                ..Default::default()
            },
        })
    }
}

fn embed_url(source: &str) -> Option<String> {
    static OBJECT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"vidorev_jav_js_object\s*=\s*(\{.*?\});").unwrap());
    static FALLBACK_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#""single_video_url":\s*"[^"]*src=\\"([^"\\]+)\\""#).unwrap());

    let object = OBJECT_REGEX.captures(source)?.get(1)?.as_str();

    let from_object = serde_json::from_str::<Value>(object)
        .ok()
        .as_ref()
        .and_then(|object| object.get("single_video_url"))
        .and_then(Value::as_str)
        .and_then(extract_src)
        .and_then(|src| https_url_or_none(&src));

    if from_object.is_some() {
        return from_object;
    }

    log::debug!("PornoAmateurLatino: player object is not valid json, searching it directly");
    let src = FALLBACK_REGEX.captures(source)?.get(1)?.as_str();
    url_or_none(&src.replace(".com", ".org"))
}

/// `some-video-name` to `Some Video Name`
fn title_from_id(id: &str) -> String {
    id.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
