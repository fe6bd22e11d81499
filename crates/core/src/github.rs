//! Transformation functions for the GitHub "list repositories for a user" endpoint

use serde::{Deserialize, Serialize};

use crate::link::has_next_page;

/// Message carried by every [`UpstreamApiError`]
pub const UPSTREAM_FAILURE_MESSAGE: &str = "GitHub API request failed.";

/// Media type GitHub recommends for REST API requests
pub const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Header used to pin the REST API version (`X-GitHub-Api-Version`).
/// Lowercase so it can be used as a static `HeaderName`.
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// Default base URL for GitHub's REST API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

// =============================================================================
// API Response Types (Deserialization)
// =============================================================================

/// A single repository as returned by `GET /users/{username}/repos`
///
/// Only the fields the client cares about are mapped; everything else in the
/// payload is ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RepositoryItem {
    pub fork: bool,
    pub name: String,
    pub owner: RepositoryOwner,
}

/// Owner of a repository
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RepositoryOwner {
    pub login: String,
}

// =============================================================================
// Output Domain Types
// =============================================================================

/// One page of results plus whether the upstream advertised another page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PageableResponse<T> {
    pub items: Vec<T>,
    pub has_more_items: bool,
}

/// Failure reported by GitHub for any error status other than 404
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (HTTP {status_code})")]
pub struct UpstreamApiError {
    pub message: String,
    pub status_code: u16,
}

impl UpstreamApiError {
    pub fn new(status_code: u16) -> Self {
        Self {
            message: UPSTREAM_FAILURE_MESSAGE.to_string(),
            status_code,
        }
    }
}

/// Reasons a [`ListReposRequest`] can be rejected before it is sent
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Page must be at least 1, got {0}")]
    InvalidPage(u32),

    #[error("Per-page must be at least 1, got {0}")]
    InvalidPerPage(u32),
}

// =============================================================================
// Request
// =============================================================================

/// Parameters for a single page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReposRequest {
    username: String,
    page: u32,
    per_page: u32,
}

impl ListReposRequest {
    /// Validate and build a request. `page` and `per_page` are 1-based.
    pub fn new(
        username: impl Into<String>,
        page: u32,
        per_page: u32,
    ) -> Result<Self, RequestError> {
        let username = username.into();

        if username.trim().is_empty() {
            return Err(RequestError::EmptyUsername);
        }
        if page == 0 {
            return Err(RequestError::InvalidPage(page));
        }
        if per_page == 0 {
            return Err(RequestError::InvalidPerPage(per_page));
        }

        Ok(Self {
            username,
            page,
            per_page,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

/// Build `{base_url}/users/{username}/repos?page={page}&per_page={per_page}`
///
/// A trailing `/` on `base_url` is dropped and the username is
/// percent-encoded as a path segment.
pub fn build_list_repos_url(base_url: &str, request: &ListReposRequest) -> String {
    format!(
        "{}/users/{}/repos?page={}&per_page={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(request.username()),
        request.page(),
        request.per_page()
    )
}

/// Format the `Authorization` header value for a token
pub fn bearer_token(key: &str) -> String {
    format!("Bearer {key}")
}

// =============================================================================
// Response mapping
// =============================================================================

/// How a response status should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// 2xx: decode the body
    Success,
    /// 404: the user (or resource) does not exist
    NotFound,
    /// Anything else
    Failure(u16),
}

/// Classify an HTTP status code
pub fn classify_status(status: u16) -> StatusOutcome {
    match status {
        200..=299 => StatusOutcome::Success,
        404 => StatusOutcome::NotFound,
        other => StatusOutcome::Failure(other),
    }
}

/// Combine decoded items with the response's `Link` header
pub fn build_page<T>(items: Vec<T>, link_header: Option<&str>) -> PageableResponse<T> {
    PageableResponse {
        items,
        has_more_items: has_next_page(link_header),
    }
}

/// Decode a response body into repository items
pub fn parse_repositories(body: &str) -> Result<Vec<RepositoryItem>, serde_json::Error> {
    serde_json::from_str(body)
}

/// Append one page onto an accumulated result
///
/// `has_more_items` always reflects the page appended last.
pub fn merge_pages<T>(
    mut acc: PageableResponse<T>,
    next: PageableResponse<T>,
) -> PageableResponse<T> {
    acc.items.extend(next.items);
    acc.has_more_items = next.has_more_items;
    acc
}

// =============================================================================
// Tests
// =============================================================================
