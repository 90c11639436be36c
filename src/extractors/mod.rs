use bitmask_enum::bitmask;
use chrono::{DateTime, Utc};

use crate::download;
use crate::extractors::clapdat::ClapDat;
use crate::extractors::colegialasdeverdad::ColegialasdeVerdad;
use crate::extractors::jizzbunker::Jizzbunker;
use crate::extractors::pornoamateurlatino::PornoAmateurLatino;

pub mod clapdat;
pub mod colegialasdeverdad;
pub mod jizzbunker;
pub mod pornoamateurlatino;

macro_rules! normalized_name {
    ($extractor:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        if <$ext>::NAMES.iter().any(|name| $extractor.eq_ignore_ascii_case(name)) {
            Some(<$ext>::DISPLAY_NAME)
        } else {
            normalized_name!($extractor, $($tail),*)
        }
    };
    ($extractor:expr $(,)?) => {
        None
    };
}

macro_rules! exists_extractor_with_name {
    ($extractor:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        <$ext>::NAMES.iter().any(|name| $extractor.eq_ignore_ascii_case(name))
            || exists_extractor_with_name!($extractor, $($tail),*)
    };
    ($extractor:expr $(,)?) => {
        false
    };
}

macro_rules! exists_extractor_for_url {
    ($url:expr, $extractor:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        match $extractor {
            Some(extractor_name) if <$ext>::NAMES.iter().any(|name| extractor_name.eq_ignore_ascii_case(name)) => {
                <$ext>::supports_url($url).await.unwrap_or(true)
            }
            Some(_) => exists_extractor_for_url!($url, $extractor, $($tail),*),
            None => <$ext>::supports_url($url).await.unwrap_or(false) || exists_extractor_for_url!($url, $extractor, $($tail),*),
        }
    };
    ($url:expr, $extractor:expr $(,)?) => {
        false
    };
}

macro_rules! extract_video_url {
    ($url:expr, $user_agent:expr, $referer:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        if <$ext>::supports_url($url).await.unwrap_or(false) {
            log::debug!("Using extractor {} for {}", <$ext>::DISPLAY_NAME, $url);
            Some(<$ext>::extract_video_url(ExtractFrom::Url { url: $url.to_owned(), user_agent: $user_agent, referer: $referer }).await)
        } else {
            extract_video_url!($url, $user_agent, $referer, $($tail),*)
        }
    };
    ($url:expr, $user_agent:expr, $referer:expr $(,)?) => {
        None
    };
}

macro_rules! extract_video_url_with_extractor_from_url {
    ($url:expr, $extractor:expr, $user_agent:expr, $referer:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        if <$ext>::NAMES.iter().any(|name| $extractor.eq_ignore_ascii_case(name)) {
            if <$ext>::supports_url($url).await.unwrap_or(true) {
                Some(<$ext>::extract_video_url(ExtractFrom::Url { url: $url.to_owned(), user_agent: $user_agent, referer: $referer }).await)
            } else {
                None
            }
        } else {
            extract_video_url_with_extractor_from_url!($url, $extractor, $user_agent, $referer, $($tail),*)
        }
    };
    ($url:expr, $extractor:expr, $user_agent:expr, $referer:expr $(,)?) => {
        None
    };
}

macro_rules! extract_video_url_with_extractor_from_source {
    ($source:expr, $extractor:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        if <$ext>::NAMES.iter().any(|name| $extractor.eq_ignore_ascii_case(name)) {
            if <$ext>::supported_from().contains(SupportedFrom::Source) {
                Some(<$ext>::extract_video_url(ExtractFrom::Source($source)).await)
            } else {
                Some(Err(anyhow::anyhow!("{}: page source is not supported", <$ext>::DISPLAY_NAME)))
            }
        } else {
            extract_video_url_with_extractor_from_source!($source, $extractor, $($tail),*)
        }
    };
    ($source:expr, $extractor:expr $(,)?) => {
        None
    };
}

macro_rules! create_functions_for_extractors {
    ($( $ext:ty ),* $(,)?) => {
        pub fn normalized_name(extractor: &str) -> Option<&'static str> {
            normalized_name!(extractor, $($ext),*)
        }

        pub fn exists_extractor_with_name(extractor: &str) -> bool {
            exists_extractor_with_name!(extractor, $($ext),*)
        }

        pub fn extractor_names() -> Vec<&'static str> {
            vec![$(<$ext>::DISPLAY_NAME),*]
        }

        pub async fn exists_extractor_for_url(url: &str, extractor: Option<&str>) -> bool {
            exists_extractor_for_url!(url, extractor, $($ext),*)
        }

        pub async fn extract_video_url(url: &str, user_agent: Option<String>, referer: Option<String>) -> Option<Result<ExtractedVideo, anyhow::Error>> {
            extract_video_url!(url, user_agent, referer, $($ext),*)
        }

        pub async fn extract_video_url_with_extractor_from_url(url: &str, extractor: &str, user_agent: Option<String>, referer: Option<String>) -> Option<Result<ExtractedVideo, anyhow::Error>> {
            extract_video_url_with_extractor_from_url!(url, extractor, user_agent, referer, $($ext),*)
        }

        pub async fn extract_video_url_with_extractor_from_source(source: String, extractor: &str) -> Option<Result<ExtractedVideo, anyhow::Error>> {
            extract_video_url_with_extractor_from_source!(source, extractor, $($ext),*)
        }

        // Names are matched case-insensitively, so they must stay unique that way
        const _CHECK_UNIQUE_NAMES: () = {
            let names_array = [$(<$ext>::NAMES),*];

            let mut i = 0;
            while i < names_array.len() {
                let mut j = 0;
                while j < names_array[i].len() {
                    let mut count = 0;
                    let mut i2 = 0;
                    while i2 < names_array.len() {
                        let mut j2 = 0;
                        while j2 < names_array[i2].len() {
                            if const_eq_ignore_ascii_case(names_array[i][j], names_array[i2][j2]) {
                                count += 1;
                            }
                            j2 += 1;
                        }
                        i2 += 1;
                    }

                    if count != 1 {
                        panic!("Non-unique extractor name!");
                    }
                    j += 1;
                }
                i += 1;
            }
        };
    };
    () => {};
}

const fn const_eq_ignore_ascii_case(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut k = 0;
    while k < a.len() {
        if !a[k].eq_ignore_ascii_case(&b[k]) {
            return false;
        }
        k += 1;
    }

    true
}

create_functions_for_extractors! {
    ClapDat,
    ColegialasdeVerdad,
    Jizzbunker,
    PornoAmateurLatino,
}

#[derive(Debug, Clone)]
pub enum ExtractFrom {
    Url {
        url: String,
        user_agent: Option<String>,
        referer: Option<String>,
    },
    Source(String),
}

impl ExtractFrom {
    pub fn url(&self) -> Option<&str> {
        match self {
            ExtractFrom::Url { url, .. } => Some(url),
            ExtractFrom::Source(_) => None,
        }
    }

    pub async fn get_source(self, referer: Option<&str>) -> Result<String, anyhow::Error> {
        match self {
            ExtractFrom::Url {
                url,
                user_agent,
                referer: referer_input,
            } => download::get_page_text(url, user_agent.as_deref(), referer_input.as_deref().or(referer)).await,
            ExtractFrom::Source(source) => Ok(source),
        }
    }
}

#[bitmask]
pub enum SupportedFrom {
    Url,
    Source,
}

#[derive(Debug, Clone)]
pub struct ExtractedVideo {
    pub url: String,
    pub referer: Option<String>,
    pub info: VideoInfo,
}

/// Metadata scraped alongside the video url. Every field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    pub uploader_id: Option<String>,
    pub uploader_url: Option<String>,
    pub thumbnail: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds
    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    pub ext: Option<String>,
}

pub trait Extractor {
    const DISPLAY_NAME: &'static str;
    const NAMES: &'static [&'static str];

    fn supported_from() -> SupportedFrom;

    async fn supports_url(url: &str) -> Option<bool>;

    async fn extract_video_url(from: ExtractFrom) -> Result<ExtractedVideo, anyhow::Error>;
}

pub mod utils {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use once_cell::sync::Lazy;
    use regex::Regex;
    use scraper::{Html, Selector};

    pub fn is_url_host_and_has_path(url: &str, host: &str, allow_http: bool, allow_www: bool) -> bool {
        url::Url::parse(url)
            .map(|url| {
                let scheme = url.scheme();
                let is_correct_scheme = scheme == "https" || (allow_http && scheme == "http");

                let no_username = url.username().is_empty();
                let no_password = url.password().is_none();
                let no_port = url.port().is_none();

                let is_same_host = url
                    .host_str()
                    .map(|url_host| {
                        let new_url_host = if allow_www {
                            url_host.strip_prefix("www.").unwrap_or(url_host)
                        } else {
                            url_host
                        };

                        host.eq_ignore_ascii_case(new_url_host)
                    })
                    .unwrap_or(false);

                let path = url.path();
                let path_is_empty = path.strip_prefix('/').unwrap_or(path).is_empty();

                is_correct_scheme && no_username && no_password && no_port && is_same_host && !path_is_empty
            })
            .unwrap_or(false)
    }

    /// Accepts absolute http(s) urls and protocol-relative ones, which are
    /// upgraded to https.
    pub fn url_or_none(url: &str) -> Option<String> {
        let url = url.trim();

        if let Some(rest) = url.strip_prefix("//") {
            return Some(format!("https://{rest}"));
        }

        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(url.to_string())
        } else {
            None
        }
    }

    /// Like [`url_or_none`], but the result always uses https.
    pub fn https_url_or_none(url: &str) -> Option<String> {
        let mut url = url::Url::parse(&url_or_none(url)?).ok()?;
        url.set_scheme("https").ok()?;
        Some(url.to_string())
    }

    /// Content of the first `<meta>` tag whose `name`, `property` or
    /// `itemprop` matches one of `names`, in the order given.
    pub fn html_search_meta(document: &Html, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| {
            ["name", "property", "itemprop"].iter().find_map(|attribute| {
                let selector = Selector::parse(&format!(r#"meta[{attribute}="{name}"]"#)).ok()?;
                document
                    .select(&selector)
                    .filter_map(|element| element.value().attr("content"))
                    .map(str::trim)
                    .find(|content| !content.is_empty())
                    .map(str::to_string)
            })
        })
    }

    pub fn html_extract_title(document: &Html) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        let title = document.select(&selector).next()?.text().collect::<String>();
        let title = title.trim();

        (!title.is_empty()).then(|| title.to_string())
    }

    /// `src` of the first element in an html snippet that has one.
    pub fn extract_src(html: &str) -> Option<String> {
        let selector = Selector::parse("[src]").ok()?;
        Html::parse_fragment(html)
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("src"))
            .map(|src| src.trim().to_string())
            .filter(|src| !src.is_empty())
    }

    /// Parses a duration in seconds from ISO 8601 (`PT9M43S`), clock
    /// (`1:02:03`, `9:43`) or plain second (`583`, `583s`) notation.
    /// Fractions of a second are dropped.
    pub fn parse_duration(input: &str) -> Option<u64> {
        static ISO_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$").unwrap()
        });
        static CLOCK_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(?:(?:(\d+):)?(\d+):)?(\d+)(?:\.\d+)?s?$").unwrap());

        let input = input.trim();
        let number = |captures: &regex::Captures, index| {
            captures
                .get(index)
                .map_or(Some(0), |value| value.as_str().parse::<u64>().ok())
        };

        if let Some(captures) = ISO_REGEX.captures(input) {
            if input.len() <= 2 {
                return None;
            }

            let days = number(&captures, 1)?;
            let hours = number(&captures, 2)?;
            let minutes = number(&captures, 3)?;
            let seconds = number(&captures, 4)?;
            return Some(((days * 24 + hours) * 60 + minutes) * 60 + seconds);
        }

        let captures = CLOCK_REGEX.captures(input)?;
        let hours = number(&captures, 1)?;
        let minutes = number(&captures, 2)?;
        let seconds = number(&captures, 3)?;
        Some((hours * 60 + minutes) * 60 + seconds)
    }

    /// Guesses a file extension from the last dot in the url path.
    pub fn determine_ext(url: &str) -> Option<String> {
        static EXT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+/?$").unwrap());

        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let (_, guess) = without_query.rsplit_once('.')?;

        if EXT_REGEX.is_match(guess) {
            Some(guess.trim_end_matches('/').to_string())
        } else {
            None
        }
    }

    /// Parses an ISO 8601 date or date-time. Values without an offset are
    /// taken as UTC.
    pub fn parse_iso8601(input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();

        if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
            return Some(date_time.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
            if let Ok(date_time) = DateTime::parse_from_str(input, format) {
                return Some(date_time.with_timezone(&Utc));
            }
        }

        for format in [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Rewrites a JavaScript literal (as found in inline page scripts) into
    /// JSON. Returns `None` on unterminated strings or comments.
    ///
    /// Handles unquoted and numeric keys, single-quoted strings, JS-only
    /// escapes, `undefined`/`void 0`, minified booleans (`!0`, `!1`), hex
    /// numbers, comments and trailing commas. Any other bare identifier
    /// becomes a string.
    pub fn js_to_json(code: &str) -> Option<String> {
        let chars: Vec<char> = code.chars().collect();
        let mut out = String::with_capacity(code.len());
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match c {
                '"' | '\'' => {
                    i = copy_string(&chars, i, &mut out)?;
                }
                '/' if chars.get(i + 1) == Some(&'/') => {
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                }
                '/' if chars.get(i + 1) == Some(&'*') => {
                    let end = (i + 2..chars.len().saturating_sub(1)).find(|&k| chars[k] == '*' && chars[k + 1] == '/')?;
                    i = end + 2;
                }
                ',' => {
                    if !matches!(next_significant(&chars, i + 1), Some((_, ']' | '}'))) {
                        out.push(',');
                    }
                    i += 1;
                }
                '!' if matches!(chars.get(i + 1), Some('0' | '1'))
                    && !chars.get(i + 2).is_some_and(|next| next.is_ascii_alphanumeric()) =>
                {
                    out.push_str(if chars[i + 1] == '0' { "true" } else { "false" });
                    i += 2;
                }
                c if c.is_ascii_digit() => {
                    let start = i;
                    let literal = if c == '0' && matches!(chars.get(i + 1), Some('x' | 'X')) {
                        i += 2;
                        while i < chars.len() && chars[i].is_ascii_hexdigit() {
                            i += 1;
                        }
                        let digits: String = chars[start + 2..i].iter().collect();
                        u64::from_str_radix(&digits, 16).ok()?.to_string()
                    } else {
                        while i < chars.len()
                            && (chars[i].is_ascii_digit()
                                || chars[i] == '.'
                                || chars[i] == 'e'
                                || chars[i] == 'E'
                                || ((chars[i] == '+' || chars[i] == '-') && matches!(chars[i - 1], 'e' | 'E')))
                        {
                            i += 1;
                        }
                        chars[start..i].iter().collect()
                    };

                    if is_key(&chars, i) {
                        out.push('"');
                        out.push_str(&literal);
                        out.push('"');
                    } else {
                        out.push_str(&literal);
                    }
                }
                c if c.is_alphabetic() || c == '_' || c == '$' => {
                    let start = i;
                    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();

                    if is_key(&chars, i) {
                        push_json_string(&mut out, &word);
                        continue;
                    }

                    match word.as_str() {
                        "true" | "false" | "null" => out.push_str(&word),
                        "undefined" => out.push_str("null"),
                        "void" => match next_significant(&chars, i) {
                            Some((zero, '0')) => {
                                out.push_str("null");
                                i = zero + 1;
                            }
                            _ => push_json_string(&mut out, &word),
                        },
                        _ => push_json_string(&mut out, &word),
                    }
                }
                _ => {
                    out.push(c);
                    i += 1;
                }
            }
        }

        Some(out)
    }

    fn next_significant(chars: &[char], from: usize) -> Option<(usize, char)> {
        chars
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, c)| !c.is_whitespace())
            .map(|(index, &c)| (index, c))
    }

    fn is_key(chars: &[char], after: usize) -> bool {
        matches!(next_significant(chars, after), Some((_, ':')))
    }

    fn push_json_string(out: &mut String, value: &str) {
        out.push('"');
        for c in value.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('"');
    }

    /// Copies the string literal starting at `start` as a JSON string and
    /// returns the index after its closing quote.
    fn copy_string(chars: &[char], start: usize, out: &mut String) -> Option<usize> {
        let quote = chars[start];
        let mut i = start + 1;
        out.push('"');

        loop {
            let c = *chars.get(i)?;

            if c == quote {
                out.push('"');
                return Some(i + 1);
            }

            match c {
                '\\' => {
                    let escaped = *chars.get(i + 1)?;
                    i += 2;
                    match escaped {
                        '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u' => {
                            out.push('\\');
                            out.push(escaped);
                        }
                        '\'' => out.push('\''),
                        'v' => out.push_str("\\u000b"),
                        '0' => out.push_str("\\u0000"),
                        'x' => {
                            let hex: String = chars.get(i..i + 2)?.iter().collect();
                            u8::from_str_radix(&hex, 16).ok()?;
                            out.push_str("\\u00");
                            out.push_str(&hex);
                            i += 2;
                        }
                        // line continuation
                        '\n' => {}
                        other => out.push(other),
                    }
                }
                '"' => {
                    out.push_str("\\\"");
                    i += 1;
                }
                '\n' => {
                    out.push_str("\\n");
                    i += 1;
                }
                '\r' => {
                    out.push_str("\\r");
                    i += 1;
                }
                '\t' => {
                    out.push_str("\\t");
                    i += 1;
                }
                _ => {
                    out.push(c);
                    i += 1;
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use chrono::{TimeZone, Utc};

        use scraper::Html;

        use super::{
            determine_ext, extract_src, html_extract_title, html_search_meta, https_url_or_none, is_url_host_and_has_path,
            js_to_json, parse_duration, parse_iso8601, url_or_none,
        };

        fn to_value(code: &str) -> serde_json::Value {
            serde_json::from_str(&js_to_json(code).unwrap()).unwrap()
        }

        #[test]
        fn test_is_url_host_and_has_path() {
            assert!(is_url_host_and_has_path("https://www.clapdat.com/video/abc", "clapdat.com", true, true));
            assert!(is_url_host_and_has_path("http://clapdat.com/video/abc", "clapdat.com", true, false));
            assert!(!is_url_host_and_has_path("http://clapdat.com/video/abc", "clapdat.com", false, true));
            assert!(!is_url_host_and_has_path("https://www.clapdat.com/abc", "clapdat.com", true, false));
            assert!(!is_url_host_and_has_path("https://clapdat.com/", "clapdat.com", true, true));
            assert!(!is_url_host_and_has_path("https://clapdat.com:8080/video", "clapdat.com", true, true));
            assert!(!is_url_host_and_has_path("https://user@clapdat.com/video", "clapdat.com", true, true));
            assert!(!is_url_host_and_has_path("not a url", "clapdat.com", true, true));
        }

        #[test]
        fn test_js_to_json_object() {
            let value = to_value(r#"[{type:"data",data:{videoPage:{id:'w9m',views:0x10,ok:!0,bad:!1,gone:void 0,nothing:undefined,}},uses:{params:["id"],},}]"#);
            assert_eq!(
                value,
                serde_json::json!([{
                    "type": "data",
                    "data": {"videoPage": {"id": "w9m", "views": 16, "ok": true, "bad": false, "gone": null, "nothing": null}},
                    "uses": {"params": ["id"]},
                }])
            );
        }

        #[test]
        fn test_js_to_json_strings() {
            let value = to_value(r#"{a:'it\'s "quoted"', b:"tab\tnew\nline", c:'\x41\v', "d":'/path/'}"#);
            assert_eq!(value["a"], "it's \"quoted\"");
            assert_eq!(value["b"], "tab\tnew\nline");
            assert_eq!(value["c"], "A\u{b}");
            assert_eq!(value["d"], "/path/");
        }

        #[test]
        fn test_js_to_json_numbers_and_comments() {
            let value = to_value("{/* block */ 1: 2.5e3, neg: -4, // line\n list: [1, 2, 3, ], }");
            assert_eq!(value, serde_json::json!({"1": 2500.0, "neg": -4, "list": [1, 2, 3]}));
        }

        #[test]
        fn test_js_to_json_unterminated() {
            assert_eq!(js_to_json("{a: 'oops}"), None);
            assert_eq!(js_to_json("{a: 1 /* oops}"), None);
        }

        #[test]
        fn test_url_or_none() {
            assert_eq!(url_or_none("https://a.com/v.mp4"), Some("https://a.com/v.mp4".to_string()));
            assert_eq!(url_or_none("//a.com/v.mp4"), Some("https://a.com/v.mp4".to_string()));
            assert_eq!(url_or_none("/v.mp4"), None);
            assert_eq!(url_or_none("javascript:void(0)"), None);
        }

        #[test]
        fn test_https_url_or_none() {
            assert_eq!(
                https_url_or_none("http://a.com/embed/1"),
                Some("https://a.com/embed/1".to_string())
            );
            assert_eq!(https_url_or_none("//a.com/embed/1"), Some("https://a.com/embed/1".to_string()));
            assert_eq!(https_url_or_none("/embed/1"), None);
        }

        #[test]
        fn test_html_search_meta() {
            let document = Html::parse_document(
                r#"<html><head>
                <meta property="og:title" content="Og title">
                <meta itemprop="name" content="  ">
                <meta itemprop="duration" content="PT9M43S">
                <meta name="description" content="Fish &amp; chips">
                </head></html>"#,
            );

            assert_eq!(html_search_meta(&document, &["duration"]).as_deref(), Some("PT9M43S"));
            assert_eq!(html_search_meta(&document, &["description"]).as_deref(), Some("Fish & chips"));
            assert_eq!(html_search_meta(&document, &["name", "og:title"]).as_deref(), Some("Og title"));
            assert_eq!(html_search_meta(&document, &["name"]), None);
        }

        #[test]
        fn test_html_extract_title() {
            let document = Html::parse_document("<html><head><title>\n  A title </title></head></html>");
            assert_eq!(html_extract_title(&document).as_deref(), Some("A title"));
            assert_eq!(html_extract_title(&Html::parse_document("<p>no title</p>")), None);
        }

        #[test]
        fn test_extract_src() {
            assert_eq!(
                extract_src(r#"<iframe width="100%" src="//player.example.org/e/abc" allowfullscreen></iframe>"#).as_deref(),
                Some("//player.example.org/e/abc")
            );
            assert_eq!(extract_src("<div>nothing</div>"), None);
        }

        #[test]
        fn test_parse_duration() {
            assert_eq!(parse_duration("PT9M43S"), Some(583));
            assert_eq!(parse_duration("PT1H0M2.5S"), Some(3602));
            assert_eq!(parse_duration("P1DT1S"), Some(86401));
            assert_eq!(parse_duration("9:43"), Some(583));
            assert_eq!(parse_duration("1:02:03"), Some(3723));
            assert_eq!(parse_duration("583"), Some(583));
            assert_eq!(parse_duration("583s"), Some(583));
            assert_eq!(parse_duration("PT"), None);
            assert_eq!(parse_duration("soon"), None);
        }

        #[test]
        fn test_determine_ext() {
            assert_eq!(determine_ext("https://a.com/v.mp4?x=1"), Some("mp4".to_string()));
            assert_eq!(determine_ext("https://a.com/v.720"), Some("720".to_string()));
            assert_eq!(determine_ext("https://a.com/video/"), None);
            assert_eq!(determine_ext("https://a.com/get.php/stream"), None);
        }

        #[test]
        fn test_parse_iso8601() {
            let expected = Utc.with_ymd_and_hms(2020, 12, 19, 10, 30, 0).unwrap();
            assert_eq!(parse_iso8601("2020-12-19T10:30:00Z"), Some(expected));
            assert_eq!(parse_iso8601("2020-12-19T10:30:00.000Z"), Some(expected));
            assert_eq!(parse_iso8601("2020-12-19T12:30:00+02:00"), Some(expected));
            assert_eq!(parse_iso8601("2020-12-19T10:30:00"), Some(expected));
            assert_eq!(parse_iso8601("2020-12-19 10:30:00"), Some(expected));
            assert_eq!(
                parse_iso8601("2020-12-19"),
                Some(Utc.with_ymd_and_hms(2020, 12, 19, 0, 0, 0).unwrap())
            );
            assert_eq!(parse_iso8601("yesterday"), None);
        }
    }
}
