use std::collections::HashMap;

use url::Url;

use super::listing::{anchor_hrefs, parse_listing};
use super::model::display_name;
use super::source::{ListingError, folder_url};
use super::*;

/// In-memory listing source keyed by folder id.
pub(crate) struct FakeSource {
    base: Url,
    pages: HashMap<String, Result<String, u16>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self {
            base: Url::parse("http://127.0.0.1:3000").unwrap(),
            pages: HashMap::new(),
        }
    }

    pub(crate) fn with_page(mut self, folder: &str, body: &str) -> Self {
        self.pages.insert(folder.to_string(), Ok(body.to_string()));
        self
    }

    pub(crate) fn with_status(mut self, folder: &str, status: u16) -> Self {
        self.pages.insert(folder.to_string(), Err(status));
        self
    }
}

impl ListingSource for FakeSource {
    fn folder_url(&self, folder: &str) -> Result<Url, ListingError> {
        folder_url(&self.base, "songs", folder)
    }

    fn fetch_listing(&self, folder: &str) -> Result<String, ListingError> {
        match self.pages.get(folder) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(ListingError::Status(*status)),
            None => Err(ListingError::Status(404)),
        }
    }
}

/// A listing page the way a static file server renders it.
pub(crate) fn index_page(files: &[&str]) -> String {
    let mut body = String::from("<html><body><ul>\n<li><a href=\"../\">../</a></li>\n");
    for f in files {
        body.push_str(&format!("<li><a href=\"{f}\">{f}</a></li>\n"));
    }
    body.push_str("</ul></body></html>");
    body
}

fn page_url() -> Url {
    Url::parse("http://127.0.0.1:3000/songs/Happy_Hits/").unwrap()
}

#[test]
fn anchor_hrefs_handles_quoting_styles_and_entities() {
    let body = r#"<a href="a.mp3">a</a> <A HREF='b.mp3'>b</A> <a class=x href=c.mp3>c</a>
<a title="t" href="d&amp;e.mp3">d</a><a name="anchor-only">nope</a>
<a data-href="decoy.mp3" href="real.mp3">real</a>"#;
    assert_eq!(
        anchor_hrefs(body),
        vec!["a.mp3", "b.mp3", "c.mp3", "d&e.mp3", "real.mp3"]
    );
}

#[test]
fn parse_listing_resolves_relative_and_absolute_hrefs_in_order() {
    let body = r#"
<a href="../">Parent</a>
<a href="Song%20One.mp3">Song One</a>
<a href="/songs/Happy_Hits/two.mp3">two</a>
<a href="cover.jpg">cover</a>
<a href="http://cdn.example/three.mp3">three</a>
<a href="notes.MP3">upper-case suffix is not a track</a>
"#;
    let tracks = parse_listing(body, &page_url(), ".mp3");
    let urls: Vec<&str> = tracks.iter().map(|t| t.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "http://127.0.0.1:3000/songs/Happy_Hits/Song%20One.mp3",
            "http://127.0.0.1:3000/songs/Happy_Hits/two.mp3",
            "http://cdn.example/three.mp3",
        ]
    );
    assert_eq!(tracks[0].name, "Song One.mp3");
    assert_eq!(tracks[1].name, "two.mp3");
}

#[test]
fn parse_listing_of_garbage_is_empty() {
    assert!(parse_listing("", &page_url(), ".mp3").is_empty());
    assert!(parse_listing("<<<a href=", &page_url(), ".mp3").is_empty());
    assert!(parse_listing("no anchors here", &page_url(), ".mp3").is_empty());
}

#[test]
fn display_name_decodes_percent_escapes() {
    let url = Url::parse("http://h/songs/x/Caf%C3%A9%20del%20Mar.mp3").unwrap();
    assert_eq!(display_name(&url), "Café del Mar.mp3");
}

#[test]
fn folder_url_encodes_folder_and_strips_dot_slash() {
    let base = Url::parse("http://127.0.0.1:3000/").unwrap();
    assert_eq!(
        folder_url(&base, "songs", "./Happy_Hits").unwrap().as_str(),
        "http://127.0.0.1:3000/songs/Happy_Hits/"
    );
    assert_eq!(
        folder_url(&base, "songs", "Road Trip").unwrap().as_str(),
        "http://127.0.0.1:3000/songs/Road%20Trip/"
    );
    assert_eq!(
        folder_url(&base, "", "A").unwrap().as_str(),
        "http://127.0.0.1:3000/A/"
    );
}

#[test]
fn folder_url_keeps_nested_folders_as_separate_segments() {
    let base = Url::parse("http://127.0.0.1:3000/").unwrap();
    assert_eq!(
        folder_url(&base, "songs", "rock/classic").unwrap().as_str(),
        "http://127.0.0.1:3000/songs/rock/classic/"
    );
    assert_eq!(
        folder_url(&base, "songs", "./Road Trip/80s/").unwrap().as_str(),
        "http://127.0.0.1:3000/songs/Road%20Trip/80s/"
    );
}

#[test]
fn begin_normalizes_the_folder_id() {
    let mut loader = PlaylistLoader::new(".mp3");
    assert_eq!(loader.begin("./Happy_Hits").folder(), "Happy_Hits");
    assert_eq!(loader.begin(" Chill/ ").folder(), "Chill");
    assert_eq!(loader.begin("rock/classic").folder(), "rock/classic");
}

/// One complete load the way the runtime performs it, minus the thread.
fn load(loader: &mut PlaylistLoader, source: &FakeSource, folder: &str) -> TrackList {
    let ticket = loader.begin(folder);
    let tracks = fetch_tracks(source, ticket.folder(), loader.suffix());
    loader.finish(ticket, tracks).cloned().unwrap()
}

#[test]
fn each_load_replaces_the_track_list() {
    let source = FakeSource::new()
        .with_page("Happy_Hits", &index_page(&["a.mp3", "b.mp3", "c.mp3"]))
        .with_page("Chill", &index_page(&["x.mp3"]));
    let mut loader = PlaylistLoader::new(".mp3");

    let first = load(&mut loader, &source, "Happy_Hits");
    assert_eq!(first.len(), 3);
    assert_eq!(first.folder(), Some("Happy_Hits"));

    let list = load(&mut loader, &source, "Chill");
    assert_eq!(list.len(), 1);
    assert_eq!(list.folder(), Some("Chill"));
    assert_eq!(list.get(0).map(|t| t.name.as_str()), Some("x.mp3"));
}

#[test]
fn failures_are_absorbed_into_empty_list() {
    let source = FakeSource::new().with_status("Broken", 500);
    let mut loader = PlaylistLoader::new(".mp3");

    assert!(load(&mut loader, &source, "Broken").is_empty());
    let missing = load(&mut loader, &source, "Missing");
    assert!(missing.is_empty());
    assert_eq!(missing.folder(), Some("Missing"));
}

#[test]
fn listing_without_tracks_yields_empty_list() {
    let source = FakeSource::new().with_page("Art", &index_page(&["cover.jpg", "notes.txt"]));
    let mut loader = PlaylistLoader::new(".mp3");
    assert!(load(&mut loader, &source, "Art").is_empty());
}

#[test]
fn superseded_ticket_is_discarded() {
    let source = FakeSource::new()
        .with_page("A", &index_page(&["a1.mp3", "a2.mp3"]))
        .with_page("B", &index_page(&["b1.mp3"]));
    let mut loader = PlaylistLoader::new(".mp3");

    let ticket_a = loader.begin("A");
    let ticket_b = loader.begin("B");

    // B answers first, then the stale A response arrives.
    let b = fetch_tracks(&source, ticket_b.folder(), loader.suffix());
    assert_eq!(loader.finish(ticket_b, b).map(|l| l.len()), Some(1));

    let a = fetch_tracks(&source, ticket_a.folder(), loader.suffix());
    assert!(loader.finish(ticket_a, a).is_none());
}

#[test]
fn stale_ticket_finishing_first_is_still_discarded() {
    let source = FakeSource::new()
        .with_page("A", &index_page(&["a1.mp3"]))
        .with_page("B", &index_page(&["b1.mp3", "b2.mp3"]));
    let mut loader = PlaylistLoader::new(".mp3");

    let ticket_a = loader.begin("A");
    let ticket_b = loader.begin("B");

    let a = fetch_tracks(&source, ticket_a.folder(), loader.suffix());
    assert!(loader.finish(ticket_a, a).is_none());

    let b = fetch_tracks(&source, ticket_b.folder(), loader.suffix());
    let shown = loader.finish(ticket_b, b).unwrap();
    assert_eq!(shown.folder(), Some("B"));
    assert_eq!(shown.len(), 2);
}
