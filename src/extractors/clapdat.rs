use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::utils::{is_url_host_and_has_path, js_to_json, parse_iso8601};
use super::{ExtractFrom, ExtractedVideo, Extractor, SupportedFrom, VideoInfo};
use crate::decode::build_url;

const DEFAULT_IMAGE_DOMAIN: &str = "x1.clapdat.com";
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

pub struct ClapDat;

impl Extractor for ClapDat {
    const DISPLAY_NAME: &'static str = "ClapDat";
    const NAMES: &'static [&'static str] = &["ClapDat", "MakeDat"];

    fn supported_from() -> SupportedFrom {
        SupportedFrom::all()
    }

    async fn supports_url(url: &str) -> Option<bool> {
        static VALID_URL_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?clapdat\.com/video/[^/?#]+").unwrap());

        Some(is_url_host_and_has_path(url, "clapdat.com", true, true) && VALID_URL_REGEX.is_match(url))
    }

    async fn extract_video_url(from: ExtractFrom) -> Result<ExtractedVideo, anyhow::Error> {
        static DATA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)const\s+data\s*=\s*(\[.*?\]);").unwrap());

        let source = from.get_source(None).await?;
        let data = DATA_REGEX
            .captures(&source)
            .and_then(|captures| captures.get(1))
            .context("ClapDat: failed to find page data")?;
        let json = js_to_json(data.as_str()).context("ClapDat: failed to convert page data")?;
        let data: Value = serde_json::from_str(&json).context("ClapDat: failed to parse page data")?;

        let video_page = find_video_page(&data).context("ClapDat: failed to find video page data")?;
        let id = get_id(video_page).context("ClapDat: failed to find video id")?;
        let (Some(file_domain), Some(file)) = (get_str(video_page, "file_domain"), get_str(video_page, "file")) else {
            anyhow::bail!("ClapDat: failed to find video url parameters");
        };

        let url = build_url(file_domain, file).context("ClapDat: failed to retrieve sources")?;
        log::debug!("ClapDat: decoded video url for {}: {}", id, url);

        let uploader = get_str(video_page, "uploader").map(str::to_string);
        let info = VideoInfo {
            title: Some(get_str(video_page, "title").unwrap_or(&id).to_string()),
            id: Some(id),
            description: get_str(video_page, "description").map(str::to_string),
            uploader_id: uploader.clone(),
            uploader_url: uploader
                .as_ref()
                .map(|uploader| format!("https://www.clapdat.com/user/{uploader}")),
            uploader,
            thumbnail: get_str(video_page, "image").map(|image| {
                thumbnail_url(image, get_str(video_page, "image_domain").unwrap_or(DEFAULT_IMAGE_DOMAIN))
            }),
            timestamp: get_str(video_page, "date").and_then(parse_iso8601),
            duration: None,
            view_count: None,
            ext: Some("mp4".to_string()),
        };

        Ok(ExtractedVideo {
            url,
            referer: None,
            info,
        })
    }
}

fn find_video_page(data: &Value) -> Option<&Value> {
    data.as_array()?.iter().find_map(|item| {
        if item.get("type").and_then(Value::as_str) != Some("data") {
            return None;
        }

        item.get("data")?.get("videoPage")
    })
}

fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|value| !value.is_empty())
}

/// Ids show up both as strings and as plain numbers. Empty strings and 0 are
/// treated as missing.
fn get_id(video_page: &Value) -> Option<String> {
    match video_page.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
        _ => None,
    }
}

fn thumbnail_url(image: &str, image_domain: &str) -> String {
    if !image.starts_with("http") {
        format!("https://{image_domain}/{image}.jpg")
    } else if !IMAGE_EXTENSIONS.iter().any(|ext| image.ends_with(ext)) {
        format!("{image}.jpg")
    } else {
        image.to_string()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use chrono::{TimeZone, Utc};

    use super::ClapDat;
    use crate::extractors::{ExtractFrom, Extractor};

    fn obfuscated_token(path: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(path);
        let (head, tail) = encoded.split_at(19);
        format!("{head}{}{tail}", "k3".repeat(95))
    }

    fn page(video_page: &str) -> String {
        format!(
            r#"<script>
            __sveltekit_1x = {{ base: new URL(".", location).pathname.slice(0, -1) }};
            const element = document.currentScript.parentElement;
            const data = [null,{{type:"data",data:{{videoPage:{video_page}}},uses:{{params:["id"]}}}}];
            Promise.all([import("./_app/immutable/entry/start.js")]);
            </script>"#
        )
    }

    #[tokio::test]
    async fn test_clapdat() {
        let url = "https://www.clapdat.com/video/this-is-video-w9mvschrnp";
        assert!(ClapDat::supports_url(url).await.unwrap_or(false));
        assert!(!ClapDat::supports_url("https://www.clapdat.com/user/motr").await.unwrap_or(false));
        assert!(!ClapDat::supports_url("https://example.com/video/w9mvschrnp").await.unwrap_or(false));

        let token = obfuscated_token("videos/w9mvschrnp/w9mvschrnp_720.mp4");
        let source = page(&format!(
            r#"{{id:"w9mvschrnp",file:"{token}",file_domain:"s4.clapdat.com",title:"title of video",description:"a big long description",uploader:"motr",image:"thumbs/w9mvschrnp",date:"2020-12-19T18:04:12.000Z",private:!1}}"#
        ));

        let extracted = ClapDat::extract_video_url(ExtractFrom::Source(source)).await.unwrap();
        assert_eq!(extracted.url, "https://s4.clapdat.com/videos/w9mvschrnp/w9mvschrnp_720.mp4");
        assert_eq!(extracted.info.id.as_deref(), Some("w9mvschrnp"));
        assert_eq!(extracted.info.title.as_deref(), Some("title of video"));
        assert_eq!(extracted.info.description.as_deref(), Some("a big long description"));
        assert_eq!(extracted.info.uploader.as_deref(), Some("motr"));
        assert_eq!(extracted.info.uploader_id.as_deref(), Some("motr"));
        assert_eq!(
            extracted.info.uploader_url.as_deref(),
            Some("https://www.clapdat.com/user/motr")
        );
        assert_eq!(
            extracted.info.thumbnail.as_deref(),
            Some("https://x1.clapdat.com/thumbs/w9mvschrnp.jpg")
        );
        assert_eq!(
            extracted.info.timestamp,
            Some(Utc.with_ymd_and_hms(2020, 12, 19, 18, 4, 12).unwrap())
        );
        assert_eq!(extracted.info.ext.as_deref(), Some("mp4"));
    }

    #[tokio::test]
    async fn test_clapdat_fallbacks() {
        let token = obfuscated_token("v/abcdefghij.mp4");
        let source = page(&format!(
            r#"{{id:"abcdefghij",file:'{token}',file_domain:"x2.clapdat.com",image:"https://cdn.clapdat.com/i/abcdefghij"}}"#
        ));

        let extracted = ClapDat::extract_video_url(ExtractFrom::Source(source)).await.unwrap();
        assert_eq!(extracted.url, "https://x2.clapdat.com/v/abcdefghij.mp4");
        assert_eq!(extracted.info.title.as_deref(), Some("abcdefghij"));
        assert_eq!(
            extracted.info.thumbnail.as_deref(),
            Some("https://cdn.clapdat.com/i/abcdefghij.jpg")
        );
        assert_eq!(extracted.info.uploader_url, None);
        assert_eq!(extracted.info.timestamp, None);
    }

    #[tokio::test]
    async fn test_clapdat_missing_fields() {
        let no_data = ClapDat::extract_video_url(ExtractFrom::Source("<html></html>".to_string())).await;
        assert!(no_data.is_err());

        let no_file = page(r#"{id:"abc",file_domain:"s4.clapdat.com"}"#);
        let err = ClapDat::extract_video_url(ExtractFrom::Source(no_file)).await.unwrap_err();
        assert_eq!(err.to_string(), "ClapDat: failed to find video url parameters");

        let no_id = page(r#"{file:"////",file_domain:"s4.clapdat.com"}"#);
        let err = ClapDat::extract_video_url(ExtractFrom::Source(no_id)).await.unwrap_err();
        assert_eq!(err.to_string(), "ClapDat: failed to find video id");
    }

    #[tokio::test]
    async fn test_clapdat_numeric_id() {
        let token = obfuscated_token("videos/12345/12345_480.mp4");
        let source = page(&format!(r#"{{id:12345,file:"{token}",file_domain:"s4.clapdat.com"}}"#));

        let extracted = ClapDat::extract_video_url(ExtractFrom::Source(source)).await.unwrap();
        assert_eq!(extracted.url, "https://s4.clapdat.com/videos/12345/12345_480.mp4");
        assert_eq!(extracted.info.id.as_deref(), Some("12345"));
        assert_eq!(extracted.info.title.as_deref(), Some("12345"));

        let zero_id = page(r#"{id:0,file:"////",file_domain:"s4.clapdat.com"}"#);
        let err = ClapDat::extract_video_url(ExtractFrom::Source(zero_id)).await.unwrap_err();
        assert_eq!(err.to_string(), "ClapDat: failed to find video id");
    }

    #[tokio::test]
    async fn test_clapdat_bad_domain() {
        let source = page(r#"{id:"abc",file:"////",file_domain:"not a domain"}"#);
        let err = ClapDat::extract_video_url(ExtractFrom::Source(source)).await.unwrap_err();
        assert_eq!(err.to_string(), "ClapDat: failed to retrieve sources");
        assert!(err.root_cause().to_string().contains("domain"));
    }
}
