#![cfg_attr(not(debug_assertions), allow(warnings, unused))]
use std::ops::Deref;

use clap::Parser;
use cli::{Args, Extractor};
use extractors::{ExtractedVideo, extract_video_url, extract_video_url_with_extractor_from_url};

pub(crate) mod cli;
pub(crate) mod decode;
pub(crate) mod download;
pub(crate) mod extractors;
pub(crate) mod logger;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse arguments
    let args = cli::Args::parse();

    // Set up logger
    if let Err(err) = logger::init(logger::default_logger(args.debug)) {
        eprintln!("Failed to set up logger: {}", err);
        std::process::exit(1);
    }

    if args.list_extractors {
        for name in extractors::extractor_names() {
            println!("{}", name);
        }

        return;
    }

    let should_error_quit = match args.decode.as_deref() {
        Some(token) => decode_token(&args, token),
        None => extract(&args).await,
    };

    if should_error_quit {
        std::process::exit(1);
    }
}

fn decode_token(args: &Args, token: &str) -> bool {
    if args.raw {
        println!("{}", decode_to_hex(token, args.block_size));

        return false;
    }

    // clap requires either --raw or --domain next to --decode
    let domain = args.domain.as_deref().unwrap_or_default();

    match decode::build_url(domain, token) {
        Ok(url) => {
            println!("{}", url);
            false
        }
        Err(err) => {
            log::error!("Failed to build url: {:#}", anyhow::Error::from(err));
            true
        }
    }
}

fn decode_to_hex(token: &str, block_size: Option<std::num::NonZeroU16>) -> String {
    let bytes = decode::decode(token, block_size);
    log::debug!("Decoded {} bytes", bytes.len());

    hex::encode(bytes)
}

async fn extract(args: &Args) -> bool {
    // Fail fast if extractor name is invalid
    let extractor_name = match &args.extractor {
        Some(Extractor::Name(extractor_name)) => {
            if !extractors::exists_extractor_with_name(extractor_name) {
                log::error!("Failed to find an extractor named: {}", extractor_name);
                return true;
            }

            Some(extractor_name.deref())
        }
        Some(Extractor::Auto) | None => None,
    };

    let extractor_result = if let Some(source_path) = &args.source {
        let Some(extractor_name) = extractor_name else {
            log::error!("An extractor name is required when reading the page source from a file");
            return true;
        };

        let source = match tokio::fs::read_to_string(source_path).await {
            Ok(source) => source,
            Err(err) => {
                log::error!("Failed to read the page source \"{}\": {}", source_path.display(), err);
                return true;
            }
        };

        extractors::extract_video_url_with_extractor_from_source(source, extractor_name).await
    } else {
        let Some(url) = args.url.as_deref() else {
            log::error!("No url given");
            return true;
        };

        if !extractors::exists_extractor_for_url(url, extractor_name).await {
            if let Some(extractor_name) = extractor_name {
                log::error!(
                    "The specified extractor \"{}\" does not support the url: {}",
                    extractors::normalized_name(extractor_name).unwrap_or(extractor_name),
                    url
                );
            } else {
                log::error!("Failed to find an extractor for the url: {}", url);
            }

            return true;
        }

        let user_agent = args.user_agent.clone();
        let referer = args.referer.clone();

        if let Some(extractor_name) = extractor_name {
            extract_video_url_with_extractor_from_url(url, extractor_name, user_agent, referer).await
        } else {
            extract_video_url(url, user_agent, referer).await
        }
    };

    let extracted_video = match extractor_result {
        Some(Ok(extracted_video)) => extracted_video,
        Some(Err(err)) => {
            log::error!("Failed to extract video url: {:#}", err);
            return true;
        }
        None => {
            log::error!("No extractor was able to handle the request");
            return true;
        }
    };

    if args.json {
        println!("{:#}", video_to_json(&extracted_video));
    } else {
        println!("{}", extracted_video.url);
    }

    false
}

fn video_to_json(video: &ExtractedVideo) -> serde_json::Value {
    let info = &video.info;

    serde_json::json!({
        "url": video.url,
        "referer": video.referer,
        "id": info.id,
        "title": info.title,
        "description": info.description,
        "uploader": info.uploader,
        "uploader_id": info.uploader_id,
        "uploader_url": info.uploader_url,
        "thumbnail": info.thumbnail,
        "timestamp": info.timestamp.map(|timestamp| timestamp.timestamp()),
        "upload_date": info.timestamp.map(|timestamp| timestamp.format("%Y%m%d").to_string()),
        "duration": info.duration,
        "view_count": info.view_count,
        "ext": info.ext,
    })
}
