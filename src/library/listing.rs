//! Scraping of HTML directory listings.
//!
//! Static file servers answer a folder request with an HTML index page.
//! Every anchor's `href` is resolved against the page URL the way a browser
//! resolves `element.href`, and the ones ending in the track suffix become
//! tracks.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::model::Track;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("anchor href pattern is valid")
});

/// Raw `href` values of all anchors in `body`, in document order.
pub fn anchor_hrefs(body: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str().trim()))
        .collect()
}

/// Parse a listing page into tracks whose resolved URL ends with `suffix`.
pub fn parse_listing(body: &str, page_url: &Url, suffix: &str) -> Vec<Track> {
    anchor_hrefs(body)
        .into_iter()
        .filter_map(|href| match page_url.join(&href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(%href, error = %e, "skipping unresolvable listing entry");
                None
            }
        })
        .filter(|url| url.as_str().ends_with(suffix))
        .map(Track::from_url)
        .collect()
}

// Only the entities a directory index realistically emits inside attribute values.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
