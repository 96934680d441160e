use crate::models::DisplayMessage;

/// Text a search strategy can match against
pub trait Searchable {
    /// Full message text
    fn search_text(&self) -> &str;

    /// Short display text; matched alongside [`Searchable::search_text`]
    fn preview_text(&self) -> &str;
}

impl Searchable for DisplayMessage {
    fn search_text(&self) -> &str {
        self.content()
    }

    fn preview_text(&self) -> &str {
        &self.preview
    }
}

/// Case-insensitive substring filter over content and preview
///
/// A blank query returns every item. Item order is preserved.
pub fn exact_search<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    if query.trim().is_empty() {
        return items.to_vec();
    }

    let needle = query.to_lowercase();
    items.iter().filter(|item| matches_query(*item, &needle)).cloned().collect()
}

/// `needle` must already be lowercased
fn matches_query<T: Searchable>(item: &T, needle: &str) -> bool {
    item.search_text().to_lowercase().contains(needle)
        || item.preview_text().to_lowercase().contains(needle)
}
