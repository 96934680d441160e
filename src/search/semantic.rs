//! Semantic re-ranking through an external collaborator.
//!
//! # Error Handling Strategy
//!
//! Semantic search never fails outright. Every failure degrades to
//! [`exact_search`] over the same items and is reported through [`SearchStatus`]:
//!
//! - **Access**: a missing entitlement (capability check or denial from the
//!   collaborator) reports [`SearchStatus::AccessRequired`].
//! - **Everything else**: collaborator errors and responses without an index
//!   list report [`SearchStatus::Failed`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SemanticSearchConfig;
use crate::search::exact::{Searchable, exact_search};
use crate::search::ranking::RankingCollaborator;
use crate::utils::terminal::sanitize_single_line;
use crate::utils::truncate_chars;

static INDEX_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(?:-?\d+(?:\s*,\s*-?\d+)*)?\s*\]").expect("index list pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStatus {
    Ok,
    /// Ranking failed; items are exact-search results
    Failed,
    /// Ranking needs an entitlement the user lacks; items are exact-search results
    AccessRequired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticResult<T> {
    pub items: Vec<T>,
    pub status: SearchStatus,
}

impl<T> SemanticResult<T> {
    fn ok(items: Vec<T>) -> Self {
        Self { items, status: SearchStatus::Ok }
    }
}

/// Rank `items` by relevance to `query`
///
/// A blank query or empty input returns the items unchanged without calling
/// the collaborator.
pub async fn semantic_search<T>(
    items: &[T],
    query: &str,
    ranker: &dyn RankingCollaborator,
    config: &SemanticSearchConfig,
) -> SemanticResult<T>
where
    T: Searchable + Clone,
{
    if query.trim().is_empty() || items.is_empty() {
        return SemanticResult::ok(items.to_vec());
    }

    let fallback = |status| SemanticResult { items: exact_search(items, query), status };

    if !ranker.has_access() {
        debug!("Semantic search unavailable without access, using exact search");
        return fallback(SearchStatus::AccessRequired);
    }

    let prompt = build_prompt(items, query, config.preview_chars);
    let response = match ranker.rank(&prompt, &config.model).await {
        Ok(response) => response,
        Err(e) if e.is_access_denied() => {
            warn!("Semantic search access denied: {}", e);
            return fallback(SearchStatus::AccessRequired);
        }
        Err(e) => {
            warn!("Semantic search failed, using exact search: {}", e);
            return fallback(SearchStatus::Failed);
        }
    };

    match parse_ranked_indices(&response, items.len()) {
        Some(indices) => {
            debug!("Semantic search ranked {} of {} items", indices.len(), items.len());
            SemanticResult::ok(indices.into_iter().map(|i| items[i].clone()).collect())
        }
        None => {
            warn!("Ranking response had no index list, using exact search");
            fallback(SearchStatus::Failed)
        }
    }
}

/// Ranking prompt listing each item as `<index>: <truncated single-line text>`
pub fn build_prompt<T: Searchable>(items: &[T], query: &str, preview_chars: usize) -> String {
    let mut prompt = String::from(
        "Rank the following conversation messages by how relevant they are to the search query.\n\n",
    );
    prompt.push_str(&format!("Query: {}\n\nMessages:\n", query.trim()));

    for (index, item) in items.iter().enumerate() {
        let text = sanitize_single_line(item.search_text());
        prompt.push_str(&format!("{}: {}\n", index, truncate_chars(&text, preview_chars)));
    }

    prompt.push_str(
        "\nRespond with a JSON array of the indices of the relevant messages, most relevant \
         first, for example [3, 0, 7]. Respond with [] if none are relevant.",
    );
    prompt
}

/// Indices from the first bracketed integer list in `response`
///
/// Surrounding prose is ignored. Duplicates and indices outside `0..len` are
/// dropped; order is kept. `None` when the response holds no such list.
pub fn parse_ranked_indices(response: &str, len: usize) -> Option<Vec<usize>> {
    let list = INDEX_LIST.find(response)?.as_str();
    let inner = list.trim_start_matches('[').trim_end_matches(']');

    let mut seen = HashSet::new();
    let indices = inner
        .split(',')
        .filter_map(|token| token.trim().parse::<usize>().ok())
        .filter(|&index| index < len && seen.insert(index))
        .collect();

    Some(indices)
}
