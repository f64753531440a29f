/// Remembers the last observed row count and reports signed changes.
#[derive(Debug, Default, Clone)]
pub struct RowCounter {
    last: usize,
}

impl RowCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `count - previous` and stores `count`, even when nothing changed.
    pub fn observe(&mut self, count: usize) -> i64 {
        let delta = count as i64 - self.last as i64;
        self.last = count;
        delta
    }

    pub fn last(&self) -> usize {
        self.last
    }
}
