use crate::index::{ApplicationIndex, Generation};
use crate::matcher::SubstringMatcher;
use crate::model::AppEntry;

/// Alphabetical, filtered projection of the application index.
///
/// The view stores positions into the index rather than entries, so reading a
/// row always goes through the index it was computed from. Reading against a
/// newer generation is a logic error.
pub struct SortedFilteredView {
    generation: Generation,
    query: String,
    rows: Vec<usize>,
    matcher: SubstringMatcher,
}

impl SortedFilteredView {
    pub fn new(index: &ApplicationIndex, query: &str) -> Self {
        let mut view = Self {
            generation: index.generation(),
            query: String::new(),
            rows: Vec::new(),
            matcher: SubstringMatcher::new(),
        };
        view.set_query(index, query);
        view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, index: &ApplicationIndex) -> bool {
        self.generation == index.generation()
    }

    /// Re-sorts and re-filters the whole index for `query`.
    pub fn set_query(&mut self, index: &ApplicationIndex, query: &str) {
        debug_assert!(self.is_current(index), "view used after the index was cleared");

        self.query = query.to_string();
        self.matcher.set_query(query);

        let entries = index.entries();
        let mut order: Vec<usize> = (0..entries.len()).collect();
        // Stable, so equal names keep insertion order.
        order.sort_by_cached_key(|&i| entries[i].display_name.to_lowercase());

        let matcher = &mut self.matcher;
        self.rows = order
            .into_iter()
            .filter(|&i| matcher.matches(&entries[i].display_name))
            .collect();

        log::debug!("SortedFilteredView: query='{}', rows={}", self.query, self.rows.len());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_at<'a>(&self, index: &'a ApplicationIndex, row: usize) -> Option<&'a AppEntry> {
        debug_assert!(self.is_current(index), "view used after the index was cleared");
        if !self.is_current(index) {
            return None;
        }
        self.rows.get(row).and_then(|&i| index.entries().get(i))
    }

    pub fn rows<'a>(&'a self, index: &'a ApplicationIndex) -> impl Iterator<Item = &'a AppEntry> + 'a {
        let current = self.is_current(index);
        self.rows
            .iter()
            .filter(move |_| current)
            .filter_map(move |&i| index.entries().get(i))
    }
}
