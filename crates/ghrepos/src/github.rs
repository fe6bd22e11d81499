use crate::config::GitHubConfig;
use ghrepos_core::github::{
    bearer_token, build_list_repos_url, build_page, classify_status, parse_repositories,
    ListReposRequest, PageableResponse, RepositoryItem, RequestError, StatusOutcome,
    UpstreamApiError, API_VERSION_HEADER, GITHUB_JSON_MEDIA_TYPE,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};

const USER_AGENT_VALUE: &str = concat!("ghrepos/", env!("CARGO_PKG_VERSION"));

/// Page of repositories as returned to callers
pub type RepositoryPage = PageableResponse<RepositoryItem>;

/// Everything that can go wrong while listing repositories
#[derive(thiserror::Error, Debug)]
pub enum ListError {
    #[error(transparent)]
    Upstream(#[from] UpstreamApiError),

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to send request to GitHub: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse GitHub repository list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for `GET /users/{username}/repos`
#[derive(Debug, Clone)]
pub struct GitHubApi {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubApi {
    /// Create a client with its own `reqwest::Client`
    pub fn new(config: GitHubConfig) -> Result<Self, ListError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client on top of an existing `reqwest::Client`
    ///
    /// Every request sets its own headers, so the client needs no defaults.
    pub fn with_client(config: GitHubConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// List one page of a user's repositories
    ///
    /// Returns `Ok(None)` when GitHub answers 404, and
    /// [`ListError::Upstream`] for every other error status.
    pub async fn list_repositories_by_username(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Option<RepositoryPage>, ListError> {
        let request = ListReposRequest::new(username, page, per_page)?;
        self.list_repositories(&request).await
    }

    /// Same as [`Self::list_repositories_by_username`] for an already validated request
    pub async fn list_repositories(
        &self,
        request: &ListReposRequest,
    ) -> Result<Option<RepositoryPage>, ListError> {
        let url = build_list_repos_url(&self.config.url, request);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.request_headers()?)
            .send()
            .await?;

        let status = response.status().as_u16();
        log::debug!("GET {} -> {}", url, status);

        match classify_status(status) {
            StatusOutcome::NotFound => Ok(None),
            StatusOutcome::Failure(status_code) => Err(UpstreamApiError::new(status_code).into()),
            StatusOutcome::Success => {
                let link = link_header(response.headers());
                let body = response.text().await?;
                let items = parse_repositories(&body)?;

                log::debug!(
                    "Received {} repositories for {} (page {})",
                    items.len(),
                    request.username(),
                    request.page()
                );

                Ok(Some(build_page(items, link.as_deref())))
            }
        }
    }

    fn request_headers(&self) -> Result<HeaderMap, ListError> {
        let mut authorization = HeaderValue::from_str(&bearer_token(&self.config.key))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(API_VERSION_HEADER, HeaderValue::from_str(&self.config.version)?);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON_MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        Ok(headers)
    }
}

/// All `Link` header values joined into one list
///
/// Values carrying non-ASCII bytes (e.g. a UTF-8 `title`) are decoded lossily
/// so their relations still count.
fn link_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(LINK)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghrepos_core::github::RepositoryOwner;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_KEY: &str = "TEST_KEY";
    const TEST_VERSION: &str = "2022-11-28";
    const USERNAME: &str = "codersee-blog";
    const PAGE: u32 = 1;
    const PER_PAGE: u32 = 2;

    const NOT_FOUND_BODY: &str =
        include_str!("../fixtures/list_github_repositories_404_NOT_FOUND.json");
    const UNAUTHORIZED_BODY: &str =
        include_str!("../fixtures/list_github_repositories_401_UNAUTHORIZED.json");
    const EMPTY_LIST_BODY: &str =
        include_str!("../fixtures/list_github_repositories_200_OK_empty_list.json");
    const PAGE_1_BODY: &str =
        include_str!("../fixtures/list_github_repositories_200_OK_page_1.json");

    const LINK_NEXT: &str =
        r#"<https://api.github.com/user/64011387/repos?page=3&per_page=2>; rel="next","#;
    const LINK_PREV: &str =
        r#"<https://api.github.com/user/64011387/repos?page=3&per_page=2>; rel="prev","#;

    fn api_for(server: &MockServer) -> GitHubApi {
        GitHubApi::new(GitHubConfig::new(server.uri(), TEST_KEY, TEST_VERSION)).unwrap()
    }

    fn json_response(status: u16, body: &str) -> ResponseTemplate {
        ResponseTemplate::new(status)
            .insert_header("Content-Type", "application/json; charset=utf-8")
            .set_body_string(body)
    }

    /// Mount a mock that only matches the exact request GitHub expects
    async fn stub_list_repos(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{USERNAME}/repos")))
            .and(query_param("page", PAGE.to_string()))
            .and(query_param("per_page", PER_PAGE.to_string()))
            .and(header("Authorization", format!("Bearer {TEST_KEY}").as_str()))
            .and(header("X-GitHub-Api-Version", TEST_VERSION))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    fn page_1_items() -> Vec<RepositoryItem> {
        vec![
            RepositoryItem {
                fork: false,
                name: "controlleradvice-vs-restcontrolleradvice".to_string(),
                owner: RepositoryOwner {
                    login: "codersee-blog".to_string(),
                },
            },
            RepositoryItem {
                fork: false,
                name: "freecodecamp-spring-boot-kotlin-excel".to_string(),
                owner: RepositoryOwner {
                    login: "codersee-blog".to_string(),
                },
            },
        ]
    }

    #[tokio::test]
    async fn test_not_found_returns_none() {
        let server = MockServer::start().await;
        stub_list_repos(&server, json_response(404, NOT_FOUND_BODY)).await;

        let result = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_returns_upstream_error() {
        let server = MockServer::start().await;
        stub_list_repos(&server, json_response(401, UNAUTHORIZED_BODY)).await;

        let err = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap_err();

        match err {
            ListError::Upstream(upstream) => {
                assert_eq!(upstream.message, "GitHub API request failed.");
                assert_eq!(upstream.status_code, 401);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_returns_upstream_error() {
        let server = MockServer::start().await;
        stub_list_repos(&server, ResponseTemplate::new(503)).await;

        let err = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ListError::Upstream(UpstreamApiError {
                status_code: 503,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_list_without_next() {
        let server = MockServer::start().await;
        stub_list_repos(
            &server,
            json_response(200, EMPTY_LIST_BODY).insert_header("Link", LINK_PREV),
        )
        .await;

        let result = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap();

        assert_eq!(
            result,
            Some(PageableResponse {
                items: vec![],
                has_more_items: false,
            })
        );
    }

    #[tokio::test]
    async fn test_payload_with_next() {
        let server = MockServer::start().await;
        stub_list_repos(
            &server,
            json_response(200, PAGE_1_BODY).insert_header("Link", LINK_NEXT),
        )
        .await;

        let result = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap();

        assert_eq!(
            result,
            Some(PageableResponse {
                items: page_1_items(),
                has_more_items: true,
            })
        );
    }

    #[tokio::test]
    async fn test_payload_with_prev_only() {
        let server = MockServer::start().await;
        stub_list_repos(
            &server,
            json_response(200, PAGE_1_BODY).insert_header("Link", LINK_PREV),
        )
        .await;

        let result = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap();

        assert_eq!(
            result,
            Some(PageableResponse {
                items: page_1_items(),
                has_more_items: false,
            })
        );
    }

    #[tokio::test]
    async fn test_payload_without_link_header() {
        let server = MockServer::start().await;
        stub_list_repos(&server, json_response(200, PAGE_1_BODY)).await;

        let result = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.items.len(), 2);
        assert!(!result.has_more_items);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        stub_list_repos(&server, json_response(200, r#"{"message": "oops"}"#)).await;

        let err = api_for(&server)
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap_err();

        assert!(matches!(err, ListError::Decode(_)));
    }

    #[tokio::test]
    async fn test_trailing_slash_base_url() {
        let server = MockServer::start().await;
        stub_list_repos(&server, json_response(200, EMPTY_LIST_BODY)).await;

        let api = GitHubApi::new(GitHubConfig::new(
            format!("{}/", server.uri()),
            TEST_KEY,
            TEST_VERSION,
        ))
        .unwrap();

        let result = api
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = api_for(&server)
            .list_repositories_by_username(USERNAME, 0, PER_PAGE)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ListError::InvalidRequest(RequestError::InvalidPage(0))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 1.
        let config = GitHubConfig::new("http://127.0.0.1:1", TEST_KEY, TEST_VERSION);
        let api = GitHubApi::new(config).unwrap();

        let err = api
            .list_repositories_by_username(USERNAME, PAGE, PER_PAGE)
            .await
            .unwrap_err();

        assert!(matches!(err, ListError::Transport(_)));
    }

    #[test]
    fn test_link_header_joins_multiple_values() {
        let mut headers = HeaderMap::new();
        headers.append(LINK, HeaderValue::from_static(r#"<https://x?page=1>; rel="prev""#));
        headers.append(LINK, HeaderValue::from_static(r#"<https://x?page=3>; rel="next""#));

        let joined = link_header(&headers).unwrap();

        assert_eq!(
            joined,
            r#"<https://x?page=1>; rel="prev", <https://x?page=3>; rel="next""#
        );
    }

    #[test]
    fn test_link_header_keeps_non_ascii_values() {
        let value = r#"<https://x?page=3>; title="café"; rel="next""#;
        let mut headers = HeaderMap::new();
        headers.append(LINK, HeaderValue::from_bytes(value.as_bytes()).unwrap());

        let joined = link_header(&headers).unwrap();

        assert_eq!(joined, value);
        assert!(ghrepos_core::link::has_next_page(Some(&joined)));
    }

    #[test]
    fn test_link_header_absent() {
        assert!(link_header(&HeaderMap::new()).is_none());
    }
}
