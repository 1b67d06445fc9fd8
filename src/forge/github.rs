//! GitHub REST API implementation of the forge traits

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;

use super::{BranchComparator, Comparison, RepositoryDirectory};
use crate::core::{CompareError, DirectoryError};

const USER_AGENT: &str = concat!("repo-drift/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const REPOS_PER_PAGE: &str = "100";
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize)]
struct RepoSummary {
    name: String,
}

#[derive(Deserialize)]
struct BranchResponse {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Deserialize)]
struct CompareResponse {
    html_url: String,
    ahead_by: u64,
    behind_by: u64,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for github.com or a GitHub Enterprise API root
///
/// Stateless after construction, so one instance is shared by every
/// concurrent comparison.
#[derive(Clone, Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubClient {
    /// Creates a client for `api_url`. An empty token means anonymous access.
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Self::with_http_client(http, api_url, token)
    }

    /// Creates a client on top of a preconfigured `reqwest::Client`
    pub fn with_http_client(
        http: reqwest::Client,
        api_url: &str,
        token: Option<String>,
    ) -> Result<Self> {
        let api_url = Url::parse(api_url).with_context(|| format!("invalid API URL: {api_url}"))?;
        if api_url.cannot_be_a_base() {
            anyhow::bail!("invalid API URL: {api_url}");
        }

        Ok(Self {
            http,
            api_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // cannot_be_a_base was rejected at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<Response, reqwest::Error> {
        let request = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        request.send().await
    }
}

/// Extracts the `rel="next"` target from a GitHub `Link` header
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

fn next_page(headers: &HeaderMap) -> Option<Url> {
    let link = headers.get(LINK)?.to_str().ok()?;
    Url::parse(&parse_next_link(link)?).ok()
}

/// Reads the `message` field GitHub puts in error bodies, falling back to the status text
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    }
}

#[async_trait]
impl RepositoryDirectory for GithubClient {
    async fn list_repositories(&self, org: &str) -> Result<Vec<String>, DirectoryError> {
        let mut first = self.endpoint(&["orgs", org, "repos"]);
        first.query_pairs_mut().append_pair("per_page", REPOS_PER_PAGE);

        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(first);
        let mut pages = 0usize;

        while let Some(url) = next {
            let response = self
                .get(url)
                .await
                .map_err(|e| DirectoryError::Transport(e.to_string()))?;

            let status = response.status();
            match status {
                StatusCode::NOT_FOUND => return Err(DirectoryError::OrgNotFound(org.to_string())),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(DirectoryError::Unauthorized(error_message(response).await))
                }
                s if !s.is_success() => {
                    return Err(DirectoryError::Api {
                        status: s.as_u16(),
                        message: error_message(response).await,
                    })
                }
                _ => {}
            }

            next = next_page(response.headers());
            let page: Vec<RepoSummary> = response
                .json()
                .await
                .map_err(|e| DirectoryError::Transport(e.to_string()))?;
            pages += 1;

            for repo in page {
                if seen.insert(repo.name.clone()) {
                    names.push(repo.name);
                }
            }
        }

        tracing::debug!(org, pages, repos = names.len(), "listed organization repositories");
        Ok(names)
    }
}

impl GithubClient {
    /// Tells a missing branch apart from a repository the token cannot see;
    /// GitHub answers 404 to both on the branch endpoint
    async fn missing_branch(&self, org: &str, repo: &str, branch: &str) -> CompareError {
        let url = self.endpoint(&["repos", org, repo]);
        match self.get(url).await {
            Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                CompareError::RepositoryInaccessible {
                    repo: repo.to_string(),
                }
            }
            _ => CompareError::BranchNotFound {
                branch: branch.to_string(),
            },
        }
    }
}

#[async_trait]
impl BranchComparator for GithubClient {
    async fn resolve_branch(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, CompareError> {
        let url = self.endpoint(&["repos", org, repo, "branches", branch]);
        let response = self
            .get(url)
            .await
            .map_err(|e| CompareError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(self.missing_branch(org, repo, branch).await);
        }
        if !status.is_success() {
            return Err(CompareError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let body: BranchResponse = response
            .json()
            .await
            .map_err(|e| CompareError::Transport(e.to_string()))?;
        Ok(body.commit.sha)
    }

    async fn compare(
        &self,
        org: &str,
        repo: &str,
        base_commit: &str,
        head_commit: &str,
    ) -> Result<Comparison, CompareError> {
        let range = format!("{base_commit}...{head_commit}");
        let mut url = self.endpoint(&["repos", org, repo, "compare", &range]);
        // Only the counts are needed; keep the embedded commit list small
        url.query_pairs_mut().append_pair("per_page", "1");

        let response = self
            .get(url)
            .await
            .map_err(|e| CompareError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompareError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let body: CompareResponse = response
            .json()
            .await
            .map_err(|e| CompareError::Transport(e.to_string()))?;
        Ok(Comparison {
            ahead: body.ahead_by,
            behind: body.behind_by,
            url: body.html_url,
        })
    }
}
