//! End-to-end word count runs against real files.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use mrlocal::workload::wc::Tokenize;
use mrlocal::{engine, Reducer, RunValues};

/// Sums its run of counts like the `wc` reducer, but collects the
/// output lines instead of printing them.
#[derive(Clone)]
struct CollectCounts {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectCounts {
    fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sorted_lines(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap().clone();
        lines.sort();
        lines
    }
}

impl Reducer for CollectCounts {
    fn reduce(&self, key: &str, values: &mut RunValues<'_>) -> Result<()> {
        let count: u64 = values.map(|value| value.parse::<u64>().unwrap_or(0)).sum();
        self.lines.lock().unwrap().push(format!("{} {}", key, count));
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn one_worker_one_partition_merges_repeated_words() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.txt");
    fs::write(&input, "the quick brown fox the")?;

    let counts = CollectCounts::new();
    engine::run(vec![path_string(&input)], Tokenize, counts.clone(), 1, 1)?;

    assert_eq!(counts.sorted_lines(), ["brown 1", "fox 1", "quick 1", "the 2"]);
    Ok(())
}

#[test]
fn counts_survive_many_workers_and_partitions() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut inputs = Vec::new();
    for i in 0..8 {
        let input = dir.path().join(format!("part-{i}.txt"));
        fs::write(&input, "one two two")?;
        inputs.push(path_string(&input));
    }

    let counts = CollectCounts::new();
    engine::run(inputs, Tokenize, counts.clone(), 4, 5)?;

    // Emits for a word may interleave across mapper threads and split
    // into several runs, so sum per key rather than expecting one line.
    let mut one = 0u64;
    let mut two = 0u64;
    for line in counts.sorted_lines() {
        let (word, count) = line.split_once(' ').unwrap();
        match word {
            "one" => one += count.parse::<u64>().unwrap(),
            "two" => two += count.parse::<u64>().unwrap(),
            other => panic!("unexpected word `{other}`"),
        }
    }
    assert_eq!(one, 8);
    assert_eq!(two, 16);
    Ok(())
}

#[test]
fn unreadable_input_contributes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.txt");
    fs::write(&input, "fox")?;
    let missing = path_string(&dir.path().join("no-such-file.txt"));

    let counts = CollectCounts::new();
    engine::run(
        vec![missing, path_string(&input)],
        Tokenize,
        counts.clone(),
        2,
        2,
    )?;

    assert_eq!(counts.sorted_lines(), ["fox 1"]);
    Ok(())
}

#[test]
fn repeated_runs_leak_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.txt");
    fs::write(&input, "the quick brown fox the")?;

    for _ in 0..3 {
        let counts = CollectCounts::new();
        engine::run(vec![path_string(&input)], Tokenize, counts.clone(), 2, 3)?;
        let total: u64 = counts
            .sorted_lines()
            .iter()
            .map(|line| line.split_once(' ').unwrap().1.parse::<u64>().unwrap())
            .sum();
        assert_eq!(total, 5);
    }
    Ok(())
}
