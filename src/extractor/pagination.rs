//! Next-page discovery
//!
//! Thread pages carry two `prevnext` navigation groups: one above the posts
//! and one below. The link in the second group points at the following page.

use super::ThreadExtractor;
use scraper::Html;
use url::Url;

impl ThreadExtractor {
    /// Finds the raw `href` of the next-page link
    ///
    /// Returns `None` when there is no second `prevnext` group, the group has
    /// no link, or the link target is blank. Absence ends the traversal.
    pub fn find_next_page(&self, document: &Html) -> Option<String> {
        let group = document.select(&self.prev_next).nth(1)?;

        let href = group
            .select(&self.link)
            .find_map(|link| link.value().attr("href"))?
            .trim();

        if href.is_empty() {
            return None;
        }

        Some(href.to_string())
    }
}

/// Resolves a next-page `href` against the URL of the page it was found on
///
/// Returns None for targets that cannot be fetched:
/// - javascript:, mailto: and fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_next_page(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(url) => {
            tracing::debug!("Ignoring next page link with scheme {}", url.scheme());
            None
        }
        Err(e) => {
            tracing::debug!("Failed to resolve next page link {}: {}", href, e);
            None
        }
    }
}
