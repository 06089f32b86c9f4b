use crate::summary::split_words;

/// Word counts of the summaries produced in one run.
#[derive(Debug, Clone, Default)]
pub struct SummaryStats {
    lengths: Vec<usize>,
}

impl SummaryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: &str) {
        self.lengths.push(split_words(summary).count());
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// The `n` largest counts, ascending (the tail of the sorted list).
    pub fn largest(&self, n: usize) -> Vec<usize> {
        let mut sorted = self.lengths.clone();
        sorted.sort_unstable();
        let start = sorted.len().saturating_sub(n);
        sorted.split_off(start)
    }
}
