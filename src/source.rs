//! # Source Resolution
//!
//! This module turns declared sources into raw document bytes.
//!
//! ## Local Sources
//!
//! A local source is read from `base-directory` joined with its `name`. A
//! missing file is reported as `NotFound`; any other I/O failure as `Read`.
//!
//! ## Remote Sources
//!
//! A remote source names a repository, a ref and a path. Rather than cloning,
//! the resolver downloads the single file through the host's raw-content
//! endpoint:
//!
//! - **GitLab-style** (any repository URL containing `.git`):
//!   `<repo-without-.git>/-/raw/<ref>/<path>`
//! - **GitHub** (`https://github.com/<org>/<repo>`, or the `www.github.com`
//!   form): `https://raw.githubusercontent.com/<org>/<repo>/<ref>/<path>`
//!
//! The `.git` check comes first, so a GitHub URL ending in `.git` is treated
//! as GitLab-style.
//!
//! Each download is a single blocking GET with a fixed ten second timeout and
//! no retry. Anything but `200 OK` is a `Fetch` error.
//!
//! ## Design
//!
//! The HTTP transport sits behind the `HttpFetcher` trait. `UreqFetcher` is
//! the real implementation; tests inject a recording mock so that no network
//! access is needed and fetch attempts can be counted.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::config::{LocalSource, RemoteSource, Source};
use crate::error::{Error, Result};

/// Timeout applied to every remote fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];
const GITHUB_RAW_HOST: &str = "raw.githubusercontent.com";

/// Status code and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Trait for HTTP GET - allows mocking in tests
pub trait HttpFetcher {
    /// Performs one blocking GET. Non-success statuses are returned, not
    /// turned into errors; transport failures are `Error::Fetch`.
    fn get(&self, url: &Url) -> Result<FetchResponse>;
}

/// The default `HttpFetcher`, backed by a `ureq` agent.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher for UreqFetcher {
    fn get(&self, url: &Url) -> Result<FetchResponse> {
        let fetch_error = |e: ureq::Error| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut response = self.agent.get(url.as_str()).call().map_err(fetch_error)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_vec().map_err(fetch_error)?;

        Ok(FetchResponse { status, body })
    }
}

/// Builds the raw-content URL for a file at `git_ref` in `repository`.
pub fn raw_url(repository: &str, git_ref: &str, path: &str) -> Result<Url> {
    let repository = repository.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let github_repo = Url::parse(repository)
        .ok()
        .filter(|url| url.host_str().is_some_and(|host| GITHUB_HOSTS.contains(&host)))
        .map(|url| url.path().trim_end_matches('/').to_string());

    let raw = if repository.contains(".git") {
        let repo = repository.strip_suffix(".git").unwrap_or(repository);
        format!("{repo}/-/raw/{git_ref}/{path}")
    } else if let Some(repo) = github_repo {
        format!("https://{GITHUB_RAW_HOST}{repo}/{git_ref}/{path}")
    } else {
        return Err(Error::UnsupportedRemote {
            repository: repository.to_string(),
        });
    };

    Ok(Url::parse(&raw)?)
}

/// Resolves sources to raw bytes.
pub struct SourceResolver {
    base_directory: PathBuf,
    fetcher: Box<dyn HttpFetcher>,
}

impl SourceResolver {
    /// Creates a resolver that reads local sources under `base_directory` and
    /// fetches remote sources over HTTP.
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self::with_fetcher(base_directory, Box::new(UreqFetcher::new()))
    }

    /// Creates a resolver with a custom `HttpFetcher`.
    pub fn with_fetcher(base_directory: impl Into<PathBuf>, fetcher: Box<dyn HttpFetcher>) -> Self {
        Self {
            base_directory: base_directory.into(),
            fetcher,
        }
    }

    pub fn resolve(&self, source: Source<'_>) -> Result<Vec<u8>> {
        match source {
            Source::Local(local) => self.resolve_local(local),
            Source::Remote(remote) => self.resolve_remote(remote),
        }
    }

    pub fn resolve_local(&self, local: &LocalSource) -> Result<Vec<u8>> {
        let path = self.base_directory.join(&local.name);
        debug!("Reading local source {}", path.display());

        if !path.exists() {
            return Err(Error::NotFound {
                path: path.display().to_string(),
            });
        }

        std::fs::read(&path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn resolve_remote(&self, remote: &RemoteSource) -> Result<Vec<u8>> {
        let (repository, git_ref) = remote.split_ref()?;
        let url = raw_url(repository, git_ref, &remote.path)?;
        debug!("Fetching remote source {}", url);

        let response = self.fetcher.get(&url)?;
        if response.status != 200 {
            return Err(Error::Fetch {
                url: url.to_string(),
                message: format!("unexpected response code {}", response.status),
            });
        }

        Ok(response.body)
    }
}
