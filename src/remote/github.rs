//! GitHub REST contents API client
//!
//! Uses the blocking reqwest client; every call waits for the response.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{RemoteError, RemoteFile, RemoteRepository, RepoId};

/// Public GitHub API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable overriding the API root (GitHub Enterprise)
pub const API_URL_ENV: &str = "NOTETHISURL_API_URL";

const API_VERSION: &str = "2022-11-28";

/// Client bound to one repository
pub struct GithubClient {
    http: Client,
    api_url: Url,
    repo: RepoId,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

impl GithubClient {
    /// Build a client for `repo`, honoring `NOTETHISURL_API_URL`
    pub fn new(token: &str, repo: RepoId) -> Result<Self, RemoteError> {
        let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_api_url(token, repo, &api_url)
    }

    pub fn with_api_url(token: &str, repo: RepoId, api_url: &str) -> Result<Self, RemoteError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| RemoteError::Other(format!("invalid API URL '{}': {}", api_url, e)))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| RemoteError::AuthFailure("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .user_agent(concat!("notethisurl/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| RemoteError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url,
            repo,
        })
    }

    fn repo_url(&self) -> Result<Url, RemoteError> {
        endpoint(
            &self.api_url,
            &["repos", self.repo.owner.as_str(), self.repo.name.as_str()],
        )
    }

    fn contents_url(&self, path: &str) -> Result<Url, RemoteError> {
        let mut segments = vec![
            "repos",
            self.repo.owner.as_str(),
            self.repo.name.as_str(),
            "contents",
        ];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        endpoint(&self.api_url, &segments)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().map_err(transport_error)?;
        let status = response.status();
        debug!("GitHub {} -> {}", response.url(), status);

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(classify_status(status, &body))
    }

    fn put_contents(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<(), RemoteError> {
        let body = PutContents {
            message,
            content: BASE64.encode(content),
            sha,
        };
        let url = self.contents_url(path)?;
        self.send(self.http.put(url).json(&body))?;
        Ok(())
    }
}

impl RemoteRepository for GithubClient {
    fn resolve(&self) -> Result<(), RemoteError> {
        let url = self.repo_url()?;
        self.send(self.http.get(url))?;
        Ok(())
    }

    fn get_file(&self, path: &str) -> Result<RemoteFile, RemoteError> {
        let url = self.contents_url(path)?;
        let response = self.send(self.http.get(url))?;
        let contents: ContentsResponse = response
            .json()
            .map_err(|e| RemoteError::Other(format!("unexpected contents response: {}", e)))?;

        Ok(RemoteFile {
            sha: contents.sha,
            content: decode_content(&contents.content)?,
        })
    }

    fn create_file(&self, path: &str, message: &str, content: &str) -> Result<(), RemoteError> {
        self.put_contents(path, message, content, None)
    }

    fn update_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> Result<(), RemoteError> {
        self.put_contents(path, message, content, Some(sha))
    }
}

/// Append percent-encoded path segments to the API root
fn endpoint(api_url: &Url, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = api_url.clone();
    url.path_segments_mut()
        .map_err(|_| RemoteError::Other(format!("invalid API URL '{}'", api_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a non-success HTTP status to the error taxonomy
fn classify_status(status: StatusCode, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| status.to_string());

    match status {
        StatusCode::NOT_FOUND => RemoteError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::AuthFailure(message),
        _ => RemoteError::Other(format!("{} (HTTP {})", message, status.as_u16())),
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        RemoteError::NetworkFailure(e.to_string())
    } else {
        RemoteError::Other(e.to_string())
    }
}

/// Decode the base64 body GitHub returns (wrapped at 60 columns)
fn decode_content(encoded: &str) -> Result<String, RemoteError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| RemoteError::Other(format!("invalid base64 content: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| RemoteError::Other(format!("remote file is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoId {
        "octocat/links".parse().unwrap()
    }

    #[test]
    fn test_endpoint_public_api() {
        let base = Url::parse(DEFAULT_API_URL).unwrap();
        let url = endpoint(&base, &["repos", "octocat", "links", "contents", "bookmarks.json"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octocat/links/contents/bookmarks.json"
        );
    }

    #[test]
    fn test_endpoint_enterprise_prefix() {
        let base = Url::parse("https://ghe.example.com/api/v3/").unwrap();
        let url = endpoint(&base, &["repos", "octocat", "links"]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/octocat/links");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse(DEFAULT_API_URL).unwrap();
        let url = endpoint(&base, &["contents", "my links.json"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/contents/my%20links.json");
    }

    #[test]
    fn test_endpoint_rejects_non_base_url() {
        let base = Url::parse("mailto:me@example.com").unwrap();
        assert!(matches!(
            endpoint(&base, &["repos"]),
            Err(RemoteError::Other(_))
        ));
    }

    #[test]
    fn test_with_api_url_rejects_garbage() {
        let result = GithubClient::with_api_url("token", repo(), "not a url");
        assert!(matches!(result, Err(RemoteError::Other(_))));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#),
            RemoteError::NotFound
        ));

        match classify_status(StatusCode::UNAUTHORIZED, r#"{"message":"Bad credentials"}"#) {
            RemoteError::AuthFailure(msg) => assert_eq!(msg, "Bad credentials"),
            other => panic!("unexpected: {:?}", other),
        }

        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            RemoteError::AuthFailure(_)
        ));

        match classify_status(StatusCode::CONFLICT, r#"{"message":"sha mismatch"}"#) {
            RemoteError::Other(msg) => assert_eq!(msg, "sha mismatch (HTTP 409)"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_wrapped_content() {
        let encoded = BASE64.encode(r#"[{"url":"http://example.com"}]"#);
        let (head, tail) = encoded.split_at(10);
        let wrapped = format!("{}\n{}\n", head, tail);
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            r#"[{"url":"http://example.com"}]"#
        );
    }

    #[test]
    fn test_decode_invalid_content() {
        assert!(matches!(
            decode_content("%%%not base64%%%"),
            Err(RemoteError::Other(_))
        ));
    }

    #[test]
    fn test_put_body_omits_sha_on_create() {
        let body = PutContents {
            message: "Add bookmarks",
            content: BASE64.encode("[]"),
            sha: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Add bookmarks","content":"W10="}"#);
    }
}
