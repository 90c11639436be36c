use std::num::NonZeroU16;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(version)]
#[command(group(ArgGroup::new("decode_output").args(["domain", "raw"])))]
/// Find the playable video url on ClapDat and similar pages
pub(crate) struct Args {
    /// Use a specific extractor instead of picking one by url
    #[arg(short = 'u', long, num_args = 0..=1, require_equals = true, value_parser = parse_extractor, default_missing_value = "auto", value_name = "NAME")]
    pub(crate) extractor: Option<Extractor>,

    /// Read the page source from a file instead of downloading it
    #[arg(long, value_name = "FILE", conflicts_with_all = ["url", "user_agent", "referer"])]
    pub(crate) source: Option<PathBuf>,

    /// User agent used for page requests
    #[arg(long)]
    pub(crate) user_agent: Option<String>,

    /// Referer used for page requests
    #[arg(long, value_name = "URL")]
    pub(crate) referer: Option<String>,

    /// Print the video url together with its metadata as JSON
    #[arg(long)]
    pub(crate) json: bool,

    /// Decode an obfuscated path token instead of extracting a page
    #[arg(long, value_name = "TOKEN", requires = "decode_output", conflicts_with_all = ["extractor", "source", "user_agent", "referer", "json", "url"])]
    pub(crate) decode: Option<String>,

    /// Domain serving the decoded path
    #[arg(long, requires = "decode")]
    pub(crate) domain: Option<String>,

    /// Print the decoded bytes as hex instead of a url
    #[arg(long, requires = "decode", conflicts_with = "domain")]
    pub(crate) raw: bool,

    /// Round the decoded length up to a multiple of this size
    #[arg(long, requires = "raw", value_name = "BYTES")]
    pub(crate) block_size: Option<NonZeroU16>,

    /// List the available extractors
    #[arg(long, exclusive = true)]
    pub(crate) list_extractors: bool,

    /// Enable debug mode
    #[arg(short, long)]
    pub(crate) debug: bool,

    /// Video page URL
    #[arg(required_unless_present_any = ["decode", "source", "list_extractors"])]
    pub(crate) url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Extractor {
    Auto,
    Name(String),
}

fn parse_extractor(input: &str) -> Result<Extractor, String> {
    if input.eq_ignore_ascii_case("auto") {
        Ok(Extractor::Auto)
    } else {
        Ok(Extractor::Name(input.to_owned()))
    }
}
