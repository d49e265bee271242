use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Github;
use crate::error::RepositoryError;

/// A file read back from the store, with the revision token required for
/// a safe overwrite.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub content: String,
    pub sha: String,
}

#[derive(Debug, Clone)]
pub struct PutResult {
    pub changed: bool,
    pub sha: Option<String>,
}

/// Minimal adapter over a remote file-content store addressed by path.
/// The GitHub Contents API is the production implementation; tests run
/// against an in-memory one.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Reads a file. A 404 is not an error here, it means absent.
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>, RepositoryError>;

    /// Writes a file and returns its new revision. When overwriting, `sha`
    /// must be the revision fetched immediately beforehand; the store
    /// rejects the write if it has moved on since.
    async fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<String, RepositoryError>;
}

/// Creates or updates a file, skipping the write entirely when the remote
/// content already equals `content`. This is what keeps repeated syncs
/// from producing churn commits.
pub async fn create_or_update_file<S: ContentStore + ?Sized>(
    store: &S,
    path: &str,
    content: &str,
    message: &str,
) -> Result<PutResult, RepositoryError> {
    let existing = store.get_file(path).await?;

    if let Some(file) = &existing {
        if file.content == content {
            return Ok(PutResult {
                changed: false,
                sha: Some(file.sha.clone()),
            });
        }
    }

    let sha = store
        .put_file(path, content, message, existing.as_ref().map(|f| f.sha.as_str()))
        .await?;

    Ok(PutResult {
        changed: true,
        sha: Some(sha),
    })
}

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: Option<ContentsResponse>,
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn new(github: &Github) -> Result<Self, RepositoryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("leetsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token: github.token.clone(),
            owner: github.owner.clone(),
            repo: github.repo.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.owner, self.repo, path
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.contents_url(path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn error_from(response: reqwest::Response) -> RepositoryError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        RepositoryError::Api { status, body }
    }
}

/// The Contents API wraps base64 payloads at 60 columns; whitespace has to
/// go before decoding.
fn decode_content(encoded: &str) -> Result<String, RepositoryError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| RepositoryError::Encoding(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| RepositoryError::Encoding(format!("content is not utf-8: {e}")))
}

#[async_trait]
impl ContentStore for GithubClient {
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>, RepositoryError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: ContentsResponse = response.json().await?;
        let content = decode_content(&body.content)?;

        Ok(Some(RemoteFile {
            content,
            sha: body.sha,
        }))
    }

    async fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<String, RepositoryError> {
        let body = PutBody {
            message,
            content: BASE64.encode(content.as_bytes()),
            sha,
        };

        let response = self
            .request(reqwest::Method::PUT, path)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(%status, path, "github contents write");

        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: PutResponse = response.json().await?;
        body.content
            .map(|c| c.sha)
            .or(body.sha)
            .ok_or_else(|| RepositoryError::Encoding("write response missing sha".into()))
    }
}
