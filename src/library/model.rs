use url::Url;

/// One playable song: where to fetch it and what to call it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub url: Url,
    pub name: String,
}

impl Track {
    /// Build a track from its resolved URL; the name is the decoded last path segment.
    pub fn from_url(url: Url) -> Self {
        let name = display_name(&url);
        Self { url, name }
    }
}

/// Last non-empty path segment of `url`, percent-decoded.
pub fn display_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .unwrap_or_else(|| url.as_str());

    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

/// The tracks of one folder, in listing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackList {
    folder: Option<String>,
    tracks: Vec<Track>,
}

impl TrackList {
    pub fn new(folder: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            folder: Some(folder.into()),
            tracks,
        }
    }

    /// An empty list for `folder` (failed or empty listing).
    pub fn empty(folder: impl Into<String>) -> Self {
        Self::new(folder, Vec::new())
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
