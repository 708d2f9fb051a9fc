use std::time::Duration;

use url::Url;

use crate::config::ServerSettings;

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("invalid listing url: {0}")]
    Url(#[from] url::ParseError),
    #[error("listing request failed: {0}")]
    Transport(#[source] ureq::Error),
    #[error("listing request returned status {0}")]
    Status(u16),
    #[error("failed to read listing body: {0}")]
    Body(#[source] ureq::Error),
}

/// Anything that can produce the listing page for a folder.
pub trait ListingSource: Send + Sync {
    /// URL of the listing page for `folder`; hrefs inside it resolve against this.
    fn folder_url(&self, folder: &str) -> Result<Url, ListingError>;

    /// Fetch the raw listing body for `folder`.
    fn fetch_listing(&self, folder: &str) -> Result<String, ListingError>;
}

/// Directory listings served over HTTP at `<base>/<songs_path>/<folder>/`.
pub struct HttpListingSource {
    base: Url,
    songs_path: String,
    agent: ureq::Agent,
}

impl HttpListingSource {
    pub fn new(settings: &ServerSettings) -> Result<Self, ListingError> {
        let base = Url::parse(settings.base_url.trim())?;
        Ok(Self {
            base,
            songs_path: settings.songs_path.trim_matches('/').to_string(),
            agent: http_agent(Duration::from_millis(settings.timeout_ms)),
        })
    }
}

impl ListingSource for HttpListingSource {
    fn folder_url(&self, folder: &str) -> Result<Url, ListingError> {
        folder_url(&self.base, &self.songs_path, folder)
    }

    fn fetch_listing(&self, folder: &str) -> Result<String, ListingError> {
        let url = self.folder_url(folder)?;
        tracing::debug!(%url, "requesting folder listing");

        let mut resp = self.agent.get(url.as_str()).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => ListingError::Status(code),
            other => ListingError::Transport(other),
        })?;

        if !resp.status().is_success() {
            return Err(ListingError::Status(resp.status().as_u16()));
        }

        resp.body_mut().read_to_string().map_err(ListingError::Body)
    }
}

/// Shared agent config for listing and track requests.
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Canonical form of a folder id: no surrounding whitespace, leading `./`
/// or outer slashes.
pub fn normalize_folder(folder: &str) -> &str {
    folder.trim().trim_start_matches("./").trim_matches('/')
}

/// Build `<base>/<songs_path>/<folder>/`. Nested ids keep their slashes;
/// each segment is percent-encoded on its own.
pub fn folder_url(base: &Url, songs_path: &str, folder: &str) -> Result<Url, ListingError> {
    let mut path = format!("{}/", base.as_str().trim_end_matches('/'));
    if !songs_path.is_empty() {
        path.push_str(songs_path);
        path.push('/');
    }
    for segment in normalize_folder(folder).split('/').filter(|s| !s.is_empty()) {
        path.push_str(&urlencoding::encode(segment));
        path.push('/');
    }
    Ok(Url::parse(&path)?)
}
