//! Load, map, and write one dataset end to end.

use crate::error::Result;
use crate::mapper::{map_batch, map_game, map_movie, InvalidPolicy};
use crate::persist::{load_raw, write_records};
use crate::stats::SummaryStats;
use crate::summary::DEFAULT_CAPACITY;
use crate::OutputRecord;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    pub capacity: usize,
    /// Only process the first `limit` records
    pub limit: Option<usize>,
    pub policy: InvalidPolicy,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, limit: None, policy: InvalidPolicy::Abort }
    }
}

#[derive(Debug, Default)]
pub struct CleanReport {
    pub written: usize,
    pub skipped: usize,
    pub stats: SummaryStats,
}

pub fn clean_movies(input: &Path, output: &Path, opts: &CleanOptions) -> Result<CleanReport> {
    let capacity = opts.capacity;
    clean_with(input, output, opts, |v| map_movie(v, capacity))
}

pub fn clean_games(input: &Path, output: &Path, opts: &CleanOptions) -> Result<CleanReport> {
    clean_with(input, output, opts, map_game)
}

fn clean_with<F>(input: &Path, output: &Path, opts: &CleanOptions, map: F) -> Result<CleanReport>
where
    F: FnMut(&Value) -> Result<OutputRecord>,
{
    let mut raw = load_raw(input)?;
    tracing::info!(input = %input.display(), records = raw.len(), "loaded raw records");
    if let Some(limit) = opts.limit {
        raw.truncate(limit);
    }

    let outcome = map_batch(&raw, opts.policy, map)?;
    let mut stats = SummaryStats::new();
    for rec in &outcome.records {
        stats.record(&rec.summary);
    }
    write_records(output, &outcome.records)?;

    Ok(CleanReport { written: outcome.records.len(), skipped: outcome.skipped, stats })
}
