//! Post record extraction

use super::ThreadExtractor;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

/// Serialized value of an author field that could not be extracted
pub const NOT_AVAILABLE: &str = "NA";

const ACTIVITY_LABEL: &str = "Activity: ";
const MERIT_LABEL: &str = "Merit: ";

/// Position of the activity and merit lines among the author block's text
/// nodes
const ACTIVITY_LINE: usize = 3;
const MERIT_LINE: usize = 4;

/// One forum post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Text nodes directly under the post body, verbatim
    pub text: Vec<String>,

    /// Author activity count; `None` serializes as `"NA"`
    #[serde(with = "not_available")]
    pub author_activity: Option<String>,

    /// Author merit score; `None` serializes as `"NA"`
    #[serde(with = "not_available")]
    pub author_merit: Option<String>,

    /// Text nodes of the timestamp block and its nested `div`s, verbatim
    pub time: Vec<String>,

    /// Page title
    pub topic: String,
}

impl PostRecord {
    /// True when the author metadata fell back to the sentinel
    pub fn is_degraded(&self) -> bool {
        self.author_activity.is_none() || self.author_merit.is_none()
    }

    /// Activity, or `"NA"` when unavailable
    pub fn activity_or_sentinel(&self) -> &str {
        self.author_activity.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Merit, or `"NA"` when unavailable
    pub fn merit_or_sentinel(&self) -> &str {
        self.author_merit.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Author activity and merit as printed in the post sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorMetadata {
    /// Remainder of the activity line after its label
    pub activity: String,
    /// Remainder of the merit line after its label
    pub merit: String,
}

impl ThreadExtractor {
    /// Extracts one record per row carrying `row_class`, in document order
    ///
    /// Author metadata failures never drop a row: the record is emitted with
    /// both author fields unavailable and every other field populated.
    pub fn extract_posts(&self, document: &Html, row_class: &str) -> Vec<PostRecord> {
        let topic = self.page_topic(document);

        document
            .select(&self.row)
            .filter(|row| row.value().classes().any(|class| class == row_class))
            .map(|row| self.extract_post(row, &topic))
            .collect()
    }

    fn extract_post(&self, row: ElementRef<'_>, topic: &str) -> PostRecord {
        let text = row.select(&self.post_body).flat_map(own_text).collect();

        let containers: Vec<ElementRef<'_>> = row.select(&self.small_text).collect();
        let (author, time) = match containers.as_slice() {
            [] => (None, Vec::new()),
            // A lone container is the author block only if it reads as one
            [only] => match parse_author(*only) {
                Some(author) => (Some(author), Vec::new()),
                None => (None, div_text(*only)),
            },
            [author, time, ..] => (parse_author(*author), div_text(*time)),
        };

        let (author_activity, author_merit) = match author {
            Some(AuthorMetadata { activity, merit }) => (Some(activity), Some(merit)),
            None => {
                tracing::trace!("Post row without readable author metadata");
                (None, None)
            }
        };

        PostRecord {
            text,
            author_activity,
            author_merit,
            time,
            topic: topic.to_string(),
        }
    }

    fn page_topic(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}

/// Text nodes that are direct children of `element`
///
/// Markup nested in a post body (quotes, links, emphasis) is skipped.
fn own_text(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| String::from(&**text))
        .collect()
}

/// Text nodes whose parent is a `div`, in document order, starting at
/// `element` itself
///
/// Inline markup such as the status `span` in an author block does not
/// contribute a line.
fn div_text(element: ElementRef<'_>) -> Vec<String> {
    element
        .descendants()
        .filter(|node| {
            node.parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|parent| parent.name() == "div")
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| String::from(&**text))
        .collect()
}

fn parse_author(container: ElementRef<'_>) -> Option<AuthorMetadata> {
    let lines = div_text(container);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    parse_author_lines(&lines)
}

/// Reads activity and merit from the text nodes of an author block
///
/// Returns `None` when either line is missing or lacks its label; the caller
/// decides what to substitute.
pub fn parse_author_lines(lines: &[&str]) -> Option<AuthorMetadata> {
    let activity = lines.get(ACTIVITY_LINE)?.split(ACTIVITY_LABEL).nth(1)?;
    let merit = lines.get(MERIT_LINE)?.split(MERIT_LABEL).nth(1)?;

    Some(AuthorMetadata {
        activity: activity.to_string(),
        merit: merit.to_string(),
    })
}

/// Maps `None` to and from the `"NA"` sentinel
mod not_available {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok((raw != NOT_AVAILABLE).then_some(raw))
    }
}
