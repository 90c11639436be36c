//! Decoder for the obfuscated media paths embedded in ClapDat video pages.
//!
//! The page ships the path as a Base64-like token with a block of junk
//! characters spliced in. The site's player cuts that block out, drops every
//! character outside the Base64 alphabet and decodes the rest with its own
//! length rules, which differ from standard Base64 whenever the character
//! count is not a multiple of four.

use std::num::NonZeroU16;

use thiserror::Error;
use url::Url;

/// Number of leading characters kept in front of the junk block.
const HEAD_LEN: usize = 19;
/// Index of the first character after the junk block.
const TAIL_START: usize = 209;

/// Returned by [`build_url`] when the decoded path does not form a usable URL.
#[derive(Debug, Error)]
#[error("unable to decode obfuscated path")]
pub struct DecodeFailure {
    token: String,
    #[source]
    source: url::ParseError,
}

impl DecodeFailure {
    /// The token that was being decoded.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Maps a character code to its 6-bit value. Codes outside the alphabet map to 0.
pub fn lookup_value(char_code: u32) -> u8 {
    match char_code {
        65..=90 => (char_code - 65) as u8,
        97..=122 => (char_code - 71) as u8,
        48..=57 => (char_code + 4) as u8,
        43 => 62,
        47 => 63,
        _ => 0,
    }
}

fn is_alphabet(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '+' || *c == '/'
}

/// Removes the junk block and every non-alphabet character from `token`.
///
/// Positions are counted in characters, so a token shorter than the junk
/// block simply keeps whatever prefix it has.
pub fn clean(token: &str) -> Vec<u8> {
    token
        .chars()
        .take(HEAD_LEN)
        .chain(token.chars().skip(TAIL_START))
        .filter(is_alphabet)
        .map(|c| c as u8)
        .collect()
}

/// Output length for `n` cleaned characters.
pub fn decoded_len(n: usize, block_size: Option<NonZeroU16>) -> usize {
    let base = (n * 3 + 1) >> 2;

    match block_size {
        Some(block_size) => {
            let block_size = usize::from(block_size.get());
            base.div_ceil(block_size) * block_size
        }
        None => base,
    }
}

/// Decodes an obfuscated token into the raw path bytes.
///
/// The result is exactly [`decoded_len`] bytes long. Bytes that no character
/// group reaches (possible when a block size pads the length) stay zero.
pub fn decode(token: &str, block_size: Option<NonZeroU16>) -> Vec<u8> {
    let cleaned = clean(token);
    let len = cleaned.len();
    let out_len = decoded_len(len, block_size);

    let mut output = vec![0u8; out_len];
    let mut written = 0;
    let mut group = 0u32;

    for (position, &c) in cleaned.iter().enumerate() {
        let slot = position & 3;
        group |= u32::from(lookup_value(u32::from(c))) << (6 * (3 - slot));

        if slot == 3 || len - position == 1 {
            for byte_index in 0..3 {
                if written >= out_len {
                    break;
                }

                output[written] = ((group >> (16 - 8 * byte_index)) & 0xFF) as u8;
                written += 1;
            }

            group = 0;
        }
    }

    output
}

/// Turns decoded bytes into a path, one char per byte, skipping zero bytes.
pub fn bytes_to_path(bytes: &[u8]) -> String {
    bytes.iter().filter(|&&byte| byte != 0).map(|&byte| char::from(byte)).collect()
}

/// Builds `https://{domain}/{path}` from a domain and an obfuscated token.
pub fn build_url(domain: &str, token: &str) -> Result<String, DecodeFailure> {
    let failure = |source| DecodeFailure {
        token: token.to_owned(),
        source,
    };

    // The domain is checked on its own, otherwise an empty domain lets the
    // decoded path pass as the host
    Url::parse(&format!("https://{domain}/"))
        .map_err(failure)?
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or(failure(url::ParseError::EmptyHost))?;

    let path = bytes_to_path(&decode(token, None));
    Ok(format!("https://{domain}/{path}"))
}
