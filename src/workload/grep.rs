//! A MapReduce-compatible implementation of `grep`.
//!

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{Emitter, Mapper, Reducer, RunValues, Workload};

#[derive(Parser, Debug)]
#[clap(no_binary_name = true)]
struct Args {
    /// Substring to look for in every input line
    #[clap(short, long, value_parser)]
    term: String,
}

pub fn workload(args: &[String]) -> Result<Workload> {
    let args = Args::try_parse_from(args)?;
    Ok(Workload {
        mapper: Arc::new(MatchLines { term: args.term }),
        reducer: Arc::new(PrintMatches),
    })
}

/// Emits `(path, "<line_no>\t<line>")` for every line of the input file
/// containing the search term.
struct MatchLines {
    term: String,
}

impl Mapper<String> for MatchLines {
    fn map(&self, input: String, out: &Emitter<'_>) -> Result<()> {
        let file =
            File::open(&input).with_context(|| format!("cannot open input `{}`", input))?;
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.contains(&self.term) {
                out.emit(input.as_str(), format!("{}\t{}", line_no + 1, line));
            }
        }
        Ok(())
    }
}

/// Prints `"<path>:<line_no>:: <line>"` per hit, in file order.
struct PrintMatches;

impl Reducer for PrintMatches {
    fn reduce(&self, key: &str, values: &mut RunValues<'_>) -> Result<()> {
        // Values arrive newest-first; sort hits back into file order.
        let mut hits = Vec::new();
        for value in values {
            let (line_no, line) = value.split_once('\t').unwrap_or(("0", value));
            hits.push((line_no.parse::<u64>().unwrap_or(0), line.to_string()));
        }
        hits.sort_unstable_by_key(|(line_no, _)| *line_no);
        for (line_no, line) in hits {
            println!("{}:{}:: {}", key, line_no, line);
        }
        Ok(())
    }
}
