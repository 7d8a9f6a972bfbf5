//! Page extractor for forum thread pages
//!
//! This module turns one fetched thread page into:
//! - the CSS class token shared by every post row
//! - one `PostRecord` per post row, in document order
//! - the optional link to the next page of the thread
//!
//! The extractor holds nothing but compiled selectors. It never fetches,
//! never mutates the document and keeps no state between pages, so a single
//! instance can be shared freely.

mod pagination;
mod posts;
mod row_class;

pub use pagination::resolve_next_page;
pub use posts::{parse_author_lines, AuthorMetadata, PostRecord, NOT_AVAILABLE};

use crate::{ExtractError, ExtractResult};
use scraper::{Html, Selector};
use url::Url;

/// A fetched HTML document together with the URL it came from
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL the document was served from (after redirects)
    pub url: Url,

    /// Raw HTML body
    pub html: String,
}

impl Page {
    /// Creates a page from its URL and body
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }

    /// Parses the body into a document tree
    ///
    /// `Html` is not `Send`; parse, extract and drop it without crossing an
    /// `.await`.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Everything extracted from a single thread page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtraction {
    /// Class token used to select post rows
    pub row_class: String,

    /// One record per matched post row, in document order
    pub records: Vec<PostRecord>,

    /// Raw `href` of the next-page link, if the page has one
    pub next_page: Option<String>,
}

impl PageExtraction {
    /// Resolves the next-page link against the page it was found on
    pub fn next_page_url(&self, base_url: &Url) -> Option<Url> {
        self.next_page
            .as_deref()
            .and_then(|href| resolve_next_page(href, base_url))
    }
}

/// Stateless extractor for thread pages
///
/// Selectors are compiled once in [`ThreadExtractor::new`]; the extraction
/// operations live in the `row_class`, `posts` and `pagination` submodules.
#[derive(Debug, Clone)]
pub struct ThreadExtractor {
    post_table: Selector,
    row: Selector,
    post_body: Selector,
    small_text: Selector,
    title: Selector,
    prev_next: Selector,
    link: Selector,
}

impl ThreadExtractor {
    /// Compiles the selectors used by every extraction step
    pub fn new() -> ExtractResult<Self> {
        Ok(Self {
            post_table: parse_selector("form > table")?,
            row: parse_selector("tr")?,
            post_body: parse_selector("div.post")?,
            small_text: parse_selector("div.smalltext")?,
            title: parse_selector("title")?,
            prev_next: parse_selector(".prevnext")?,
            link: parse_selector("a[href]")?,
        })
    }

    /// Runs the full extraction over one page
    ///
    /// # Returns
    ///
    /// * `Ok(PageExtraction)` - Row class, records and next link
    /// * `Err(ExtractError)` - The page does not have the post table layout
    pub fn extract_page(&self, page: &Page) -> ExtractResult<PageExtraction> {
        let document = page.document();
        let extraction = self.extract_document(&document)?;

        tracing::debug!(
            "Extracted {} posts from {} (row class '{}', next page: {})",
            extraction.records.len(),
            page.url,
            extraction.row_class,
            extraction.next_page.as_deref().unwrap_or("none")
        );

        Ok(extraction)
    }

    /// Runs the full extraction over an already parsed document
    pub fn extract_document(&self, document: &Html) -> ExtractResult<PageExtraction> {
        let row_class = self.identify_row_class(document)?;
        let records = self.extract_posts(document, &row_class);
        let next_page = self.find_next_page(document);

        Ok(PageExtraction {
            row_class,
            records,
            next_page,
        })
    }
}

fn parse_selector(css: &'static str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        css,
        message: format!("{:?}", e),
    })
}
