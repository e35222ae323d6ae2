use crate::model::AppEntry;

/// Identifies one fill of the index. Every `clear` starts a new generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Flat list of every application seen during the last menu walk.
///
/// The index is only ever cleared and refilled as a whole; views built on top
/// of it remember the generation they were computed for.
#[derive(Debug, Default)]
pub struct ApplicationIndex {
    entries: Vec<AppEntry>,
    generation: u64,
}

impl ApplicationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
        log::debug!("ApplicationIndex: cleared, now generation {}", self.generation);
    }

    pub fn insert(&mut self, entry: AppEntry) {
        self.entries.push(entry);
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppEntry> {
        self.entries.iter()
    }
}
