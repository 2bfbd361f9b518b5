//! Retrieval of the vendor schedule page.

use std::path::Path;
use std::time::Duration;

use encoding_rs::Encoding;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::domain::constants::USER_AGENT;
use crate::domain::SourceLocation;
use crate::error::AppError;

/// Blocking HTTP client for the vendor page.
pub struct PageClient {
    client: Client,
    encoding: &'static Encoding,
}

impl PageClient {
    pub fn new(timeout: Duration, encoding_label: &str) -> Result<Self, AppError> {
        let encoding = resolve_encoding(encoding_label)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, encoding })
    }

    /// GET the page and decode it to text.
    pub fn fetch_html(&self, url: &str) -> Result<String, AppError> {
        debug!(url, "fetching schedule page");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Schedule request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Schedule request failed with status {}.", resp.status()),
            ));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AppError::new(4, format!("Failed to read schedule response: {e}")))?;

        Ok(decode(&bytes, self.encoding))
    }
}

/// Read a previously saved copy of the page.
pub fn read_html_file(path: &Path, encoding_label: &str) -> Result<String, AppError> {
    let encoding = resolve_encoding(encoding_label)?;
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::new(2, format!("Failed to read schedule page '{}': {e}", path.display())))?;
    Ok(decode(&bytes, encoding))
}

/// Load the page from wherever the config points.
pub fn load_html(source: &SourceLocation, timeout: Duration, encoding_label: &str) -> Result<String, AppError> {
    match source {
        SourceLocation::Url(url) => PageClient::new(timeout, encoding_label)?.fetch_html(url),
        SourceLocation::File(path) => read_html_file(path, encoding_label),
    }
}

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, AppError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| AppError::new(2, format!("Unknown text encoding '{label}'.")))
}

/// Decode with replacement; a BOM overrides the configured encoding.
fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "schedule page contained undecodable bytes");
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_jis_is_decoded() {
        let enc = resolve_encoding("shift_jis").unwrap();
        // "品番" in Shift_JIS.
        let bytes = [0x95, 0x69, 0x94, 0xd4];
        assert_eq!(decode(&bytes, enc), "品番");
    }

    #[test]
    fn vendor_blank_glyph_decodes_to_ideographic_space() {
        let enc = resolve_encoding("windows-31j").unwrap();
        assert_eq!(decode(&[0x81, 0x40], enc), "\u{3000}");
    }

    #[test]
    fn unknown_encoding_is_a_config_error() {
        let err = resolve_encoding("klingon").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
