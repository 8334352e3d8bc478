//! Keyword search over task titles and tags.
//!
//! Every whitespace-separated term of the query has to match the task. A term
//! written as `#tag` only matches tags. Matches are ranked by how well each
//! term hits: an exact tag, then a whole title word, then a substring.

use serde::{Deserialize, Serialize};

use super::Task;

const TAG_MATCH: u32 = 3;
const WORD_MATCH: u32 = 2;
const PARTIAL_MATCH: u32 = 1;

/// A matching task and its rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: u32,
    pub task: Task,
}

/// Search `tasks` for `query`.
///
/// # Returns
/// Hits sorted by score, highest first. Equal scores keep input order.
/// A blank query matches nothing.
pub fn search_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, query: &str) -> Vec<SearchHit> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = tasks
        .into_iter()
        .filter_map(|task| {
            let title = task.title.to_lowercase();
            let tags: Vec<String> = task.tags.iter().map(|t| t.to_lowercase()).collect();

            let mut score = 0;
            for term in &terms {
                match term_score(&title, &tags, term) {
                    0 => return None,
                    s => score += s,
                }
            }
            Some(SearchHit {
                score,
                task: task.clone(),
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

fn term_score(title: &str, tags: &[String], term: &str) -> u32 {
    if let Some(tag) = term.strip_prefix('#') {
        return if !tag.is_empty() && tags.iter().any(|t| t == tag) {
            TAG_MATCH
        } else {
            0
        };
    }

    if tags.iter().any(|t| t == term) {
        TAG_MATCH
    } else if title.split(|c: char| !c.is_alphanumeric()).any(|w| w == term) {
        WORD_MATCH
    } else if title.contains(term) || tags.iter().any(|t| t.starts_with(term)) {
        PARTIAL_MATCH
    } else {
        0
    }
}
