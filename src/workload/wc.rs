//! A MapReduce-compatible implementation of word count.
//!

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{Emitter, Mapper, Reducer, RunValues, Workload};

/// Word count takes no auxiliary arguments.
pub fn workload(_args: &[String]) -> Result<Workload> {
    Ok(Workload {
        mapper: Arc::new(Tokenize),
        reducer: Arc::new(SumCounts),
    })
}

/// Emits `(word, "1")` for every whitespace-separated word in the input
/// file. An unreadable input is this mapper's own problem: it emits
/// nothing and the run carries on.
pub struct Tokenize;

impl Mapper<String> for Tokenize {
    fn map(&self, input: String, out: &Emitter<'_>) -> Result<()> {
        let file =
            File::open(&input).with_context(|| format!("cannot open input `{}`", input))?;
        for line in BufReader::new(file).lines() {
            for word in line?.split_whitespace() {
                out.emit(word, "1");
            }
        }
        Ok(())
    }
}

/// Sums the counts for its run of a word and prints `"<word> <count>"`.
/// Non-numeric counts are treated as zero.
pub struct SumCounts;

impl Reducer for SumCounts {
    fn reduce(&self, key: &str, values: &mut RunValues<'_>) -> Result<()> {
        let count: u64 = values.map(|value| value.parse::<u64>().unwrap_or(0)).sum();
        println!("{} {}", key, count);
        Ok(())
    }
}
