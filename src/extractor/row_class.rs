//! Post row class identification
//!
//! Thread pages render every post as a table row carrying a common class
//! token. The token is read from the first row of the post table and checked
//! against the other rows rather than assumed.

use super::ThreadExtractor;
use crate::{ExtractError, ExtractResult};
use scraper::Html;

impl ThreadExtractor {
    /// Identifies the class token shared by the post rows of a page
    ///
    /// The post table is the first `table` directly inside a `form`. The
    /// tokens of its first row's `class` attribute are scored by how many
    /// classed rows of that table carry them; the best-scoring token wins and
    /// earlier tokens win ties.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The row class token
    /// * `Err(ExtractError)` - The form/table/row structure is missing
    pub fn identify_row_class(&self, document: &Html) -> ExtractResult<String> {
        let table = document
            .select(&self.post_table)
            .next()
            .ok_or(ExtractError::MissingPostTable)?;

        let first_row = table
            .select(&self.row)
            .next()
            .ok_or(ExtractError::MissingPostRow)?;

        let tokens: Vec<&str> = first_row.value().classes().collect();
        if tokens.is_empty() {
            return Err(ExtractError::MissingRowClass);
        }

        let candidates: Vec<Vec<&str>> = table
            .select(&self.row)
            .filter(|row| row.value().attr("class").is_some())
            .map(|row| row.value().classes().collect())
            .collect();

        let (token, carried_by) = pick_shared_token(&tokens, &candidates);
        if carried_by < candidates.len() {
            tracing::debug!(
                "Row class '{}' carried by {} of {} classed rows",
                token,
                carried_by,
                candidates.len()
            );
        }

        Ok(token.to_string())
    }
}

/// Returns the first-row token carried by the most candidate rows, with its
/// count
fn pick_shared_token<'a>(tokens: &[&'a str], candidates: &[Vec<&str>]) -> (&'a str, usize) {
    let mut best = (tokens[0], 0);

    for &token in tokens {
        let count = candidates
            .iter()
            .filter(|classes| classes.iter().any(|class| *class == token))
            .count();
        if count > best.1 {
            best = (token, count);
        }
    }

    best
}
