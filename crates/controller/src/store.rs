use std::collections::VecDeque;

/// Source tag used when the controller persists the orientation itself after
/// motion settles. Changes carrying this tag are not re-applied.
pub const MOVE_ENDED: &str = "move ended";

/// Persistence for the orientation string.
pub trait OrientationStore {
    fn save(&mut self, orientation: &str, source: &str);

    fn load(&self) -> Option<String>;
}

/// Saves kept by [`MemoryOrientationStore`].
pub const HISTORY_LIMIT: usize = 32;

/// In-memory store that also records the most recent saves, newest last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryOrientationStore {
    saves: VecDeque<(String, String)>,
}

impl MemoryOrientationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orientation(orientation: &str) -> Self {
        let mut store = Self::new();
        store.save(orientation, "initial");
        store
    }

    /// `(orientation, source)` pairs in save order, at most [`HISTORY_LIMIT`].
    pub fn saves(&self) -> &VecDeque<(String, String)> {
        &self.saves
    }

    pub fn last_source(&self) -> Option<&str> {
        self.saves.back().map(|(_, source)| source.as_str())
    }
}

impl OrientationStore for MemoryOrientationStore {
    fn save(&mut self, orientation: &str, source: &str) {
        if self.saves.len() == HISTORY_LIMIT {
            self.saves.pop_front();
        }
        self.saves.push_back((orientation.to_string(), source.to_string()));
    }

    fn load(&self) -> Option<String> {
        self.saves.back().map(|(orientation, _)| orientation.clone())
    }
}
