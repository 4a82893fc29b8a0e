//! GitHub HTTP client built on reqwest

use chrono::{DateTime, Utc};
use ghdl_core::{Credential, GitHubConfig};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::{Error, Result};

/// Media type for JSON API responses
pub(crate) const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Media type asking the contents endpoint for raw bytes
pub(crate) const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// HTTP client plus the three GitHub surfaces it talks to.
///
/// Holds no credential: callers pass one to each operation that may
/// authenticate.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    raw_url: Url,
    web_url: Url,
}

impl GitHubClient {
    /// Create a new GitHub client from endpoint configuration
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .build()
            .map_err(|e| Error::Parse(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            http,
            api_url: parse_base("api_url", &config.api_url)?,
            raw_url: parse_base("raw_url", &config.raw_url)?,
            web_url: parse_base("web_url", &config.web_url)?,
        };

        info!(api_url = %client.api_url, "Created GitHub client");
        Ok(client)
    }

    /// `<api_url>/<segments...>`
    pub fn api_endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        join_segments(&self.api_url, segments)
    }

    /// `<raw_url>/<segments...>`
    pub fn raw_endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        join_segments(&self.raw_url, segments)
    }

    /// `<web_url>/<segments...>`
    pub fn web_endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        join_segments(&self.web_url, segments)
    }

    /// Start a GET request, attaching the credential when there is one
    pub(crate) fn get(&self, url: Url, credential: Option<&Credential>) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match credential {
            Some(credential) => request.header(header::AUTHORIZATION, credential.authorization()),
            None => request,
        }
    }

    /// Send a GET request and map non-success statuses to API errors.
    ///
    /// `context` names the resource (repo or path) for diagnostics.
    pub(crate) async fn api_get(
        &self,
        request: reqwest::RequestBuilder,
        authenticated: bool,
        context: &str,
    ) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, context, "GitHub API response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(api_error(status, response.headers(), authenticated, context))
        }
    }

    /// Download whatever a redirect deliverable points at
    pub async fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
        let context = url.path().to_string();
        let response = self.api_get(self.get(url, None), false, &context).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url.as_str())
            .field("raw_url", &self.raw_url.as_str())
            .field("web_url", &self.web_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Map a non-success status to the shared error taxonomy
pub(crate) fn api_error(
    status: StatusCode,
    headers: &HeaderMap,
    authenticated: bool,
    context: &str,
) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::InvalidToken,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
            reset_at: rate_limit_reset(headers),
        },
        StatusCode::NOT_FOUND if authenticated => Error::NotFound {
            context: context.to_string(),
        },
        StatusCode::NOT_FOUND => Error::NotFoundOrPrivate {
            context: context.to_string(),
        },
        other => Error::UnknownApiError {
            status: other.as_u16(),
            context: context.to_string(),
        },
    }
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn parse_base(name: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| Error::Parse(format!("Invalid {} {}: {}", name, value, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Parse(format!("Invalid {} {}: not a base URL", name, value)));
    }
    Ok(url)
}

/// Append path segments to a base URL, percent-encoding each one.
/// Segments containing `/` are split so file paths can be passed whole;
/// `.` and `..` are rejected.
fn join_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let parts: Vec<&str> = segments
        .into_iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(bad) = parts.iter().find(|s| **s == "." || **s == "..") {
        return Err(Error::InvalidUrl(format!(
            "Path segment '{}' is not allowed under {}",
            bad, base
        )));
    }

    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::Parse(format!("{} cannot be a base URL", base)))?;
        path.pop_if_empty();
        path.extend(parts);
    }
    Ok(url)
}
