use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::USER_AGENT;
use tracing::debug;
use url::Url;

use crate::error::LoadError;
use crate::model::PostCollection;
use crate::normalize::Normalizer;
use crate::parser::ParserBootstrap;

/// Where the data file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocation {
    /// `http(s)://` and `file://` URLs are taken as they are. Other values are
    /// site paths under `site_root`, unless they name an existing absolute
    /// file.
    pub fn resolve(raw: &str, site_root: &Path) -> Self {
        let raw = raw.trim();
        if let Ok(url) = Url::parse(raw) {
            match url.scheme() {
                "http" | "https" => return SourceLocation::Remote(url),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return SourceLocation::Local(path);
                    }
                }
                _ => {}
            }
        }

        let path = Path::new(raw);
        if path.is_absolute() && path.exists() {
            return SourceLocation::Local(path.to_path_buf());
        }
        SourceLocation::Local(site_root.join(raw.trim_start_matches('/')))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{url}"),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
/// Longest request timeout honoured; larger values are clamped.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// The timeout a fetch will actually run with: zero means the default, and
/// anything above [`MAX_TIMEOUT`] is clamped.
pub fn effective_timeout(configured: Duration) -> Duration {
    if configured.is_zero() {
        DEFAULT_TIMEOUT
    } else {
        configured.min(MAX_TIMEOUT)
    }
}

pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, location: &SourceLocation) -> Result<Vec<u8>, LoadError>;
}

#[derive(Debug, Clone, Default)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub http_client: Option<HttpClient>,
}

/// Reads local files directly and remote files with a single GET.
pub struct HttpFetcher {
    http: HttpClient,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, LoadError> {
        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(effective_timeout(config.timeout))
                .build()
                .map_err(LoadError::Client)?,
        };
        let user_agent = if config.user_agent.trim().is_empty() {
            format!("blog-cards/{}", crate::VERSION)
        } else {
            config.user_agent
        };
        Ok(Self { http, user_agent })
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(&self, location: &SourceLocation) -> Result<Vec<u8>, LoadError> {
        match location {
            SourceLocation::Local(path) => fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            SourceLocation::Remote(url) => {
                let fetch_err = |source| LoadError::Fetch {
                    location: url.to_string(),
                    source,
                };
                let response = self
                    .http
                    .get(url.clone())
                    .header(USER_AGENT, &self.user_agent)
                    .send()
                    .map_err(fetch_err)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        location: url.to_string(),
                        status,
                    });
                }
                let body = response.bytes().map_err(fetch_err)?;
                Ok(body.to_vec())
            }
        }
    }
}

/// Completion message for a background load.
#[derive(Debug)]
pub struct LoadResponse {
    pub request_id: u64,
    pub location: SourceLocation,
    pub result: Result<PostCollection, LoadError>,
}

/// Fetches, parses and normalizes one data file.
///
/// The parser bootstrap is shared and runs at most once, but two loads
/// started back to back will each fetch the data file. Callers that need a
/// single fetch per page view have to guard it themselves, as
/// [`crate::session::PageSession`] does.
#[derive(Clone)]
pub struct RecordLoader {
    fetcher: Arc<dyn SourceFetcher>,
    bootstrap: Arc<ParserBootstrap>,
    normalizer: Normalizer,
}

impl RecordLoader {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        bootstrap: Arc<ParserBootstrap>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            fetcher,
            bootstrap,
            normalizer,
        }
    }

    pub fn load(&self, location: &SourceLocation) -> Result<PostCollection, LoadError> {
        let parser = self.bootstrap.ready()?;
        let bytes = self.fetcher.fetch(location)?;
        debug!(%location, bytes = bytes.len(), "fetched post table");
        let rows = parser.parse(&bytes)?;
        Ok(self.normalizer.normalize_all(rows))
    }

    pub fn spawn(
        &self,
        request_id: u64,
        location: SourceLocation,
        tx: Sender<LoadResponse>,
    ) -> thread::JoinHandle<()> {
        let loader = self.clone();
        thread::spawn(move || {
            let result = loader.load(&location);
            let _ = tx.send(LoadResponse {
                request_id,
                location,
                result,
            });
        })
    }
}
