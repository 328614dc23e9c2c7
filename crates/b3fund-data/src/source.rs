//! Page fetching.
//!
//! Providers never talk to `reqwest` directly; they go through
//! [`PageSource`] so the listing and metrics logic can be driven by any
//! HTML source.

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{DataError, Result};

/// Browser user-agent sent with every request. Both sites reject the
/// default `reqwest` agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.61 Safari/537.36";

/// Fetch settings shared by the collectors.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User-Agent header
    pub user_agent: String,
    /// Per-request timeout (no retry on expiry)
    pub timeout: Duration,
    /// Pages fetched concurrently within one stage (1 = sequential)
    pub concurrency: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            concurrency: 4,
        }
    }
}

/// Something that returns the HTML body behind a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// [`PageSource`] backed by an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(DataError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");

        let http_err = |source| DataError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                url: url.to_string(),
                status,
            });
        }

        let header_charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_param)
            .map(str::to_string);

        let body = response.bytes().await.map_err(http_err)?;

        Ok(decode_page(&body, header_charset.as_deref()))
    }
}

/// Decodes an HTML body.
///
/// The charset comes from the `Content-Type` header, then from a `<meta>`
/// declaration near the top of the page. Without either, bodies that are
/// not valid UTF-8 are read as Windows-1252.
pub fn decode_page(body: &[u8], header_charset: Option<&str>) -> String {
    let declared = header_charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| meta_charset(body).and_then(|label| Encoding::for_label(label.as_bytes())));

    let encoding = declared.unwrap_or_else(|| match std::str::from_utf8(body) {
        Ok(_) => UTF_8,
        Err(_) => WINDOWS_1252,
    });

    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = encoding.name(), "undecodable bytes replaced");
    }

    text.into_owned()
}

/// `charset` parameter of a `Content-Type` value.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Charset of `<meta charset=..>` or `<meta http-equiv content="..; charset=..">`
/// within the first KiB.
fn meta_charset(body: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&body[..body.len().min(1024)]).to_ascii_lowercase();

    head.match_indices("<meta").find_map(|(at, _)| {
        let tag = &head[at..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];

        let start = tag.find("charset")? + "charset".len();
        let value = tag[start..].trim_start().strip_prefix('=')?.trim_start();

        let label: String = value
            .trim_start_matches(['"', '\''])
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
            .collect();

        (!label.is_empty()).then_some(label)
    })
}
