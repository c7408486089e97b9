use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Glob spec for the input files
    #[arg(short, long)]
    pub input: String,

    /// Name of the workload
    #[arg(short, long)]
    pub workload: String,

    /// Number of worker threads
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Number of intermediate partitions
    #[arg(long, default_value_t = 5)]
    pub partitions: u32,

    /// Auxiliary arguments to pass to the MapReduce application.
    #[clap(value_parser, last = true)]
    pub args: Vec<String>,
}
