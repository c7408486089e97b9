use anyhow::{Context, Result};
use clap::Parser;
use glob::glob;
use mrlocal::cmd::run::Args;
use mrlocal::{engine, workload};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let wl = workload::named(&args.workload, &args.args)?;

    let mut inputs = Vec::new();
    for pathspec in glob(&args.input).context("invalid input glob")?.flatten() {
        inputs.push(pathspec.to_string_lossy().into_owned());
    }

    engine::run(inputs, wl.mapper, wl.reducer, args.workers, args.partitions)
}
