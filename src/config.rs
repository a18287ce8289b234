use crate::seed::{DEFAULT_ENDPOINT, SEED_LIMIT};
use clap::Parser;
use std::path::PathBuf;

/// Every flag is optional; the defaults reproduce the stock behavior.
#[derive(Debug, Clone, Parser)]
#[command(name = "tasklist", version, about = "Terminal task list seeded from a remote todo feed")]
pub struct Config {
    /// URL of the JSON todo feed used to seed the list.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// How many remote records to keep.
    #[arg(long, default_value_t = SEED_LIMIT)]
    pub seed_limit: usize,

    /// Where log output goes; the terminal belongs to the UI. Level comes from RUST_LOG.
    #[arg(long, default_value = "tasklist.log")]
    pub log_file: PathBuf,
}
