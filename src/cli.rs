//! Command-line interface definitions for newsreel.
//!
//! Every option has a default, so running the binary with no arguments
//! reads the built-in feeds and writes `data/input.json`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Built-in feeds and keywords, default output path
/// newsreel
///
/// # Custom keyword/feed lists and output location
/// newsreel --config newsreel.yaml --output /tmp/shortlist.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Where to write the ranked article shortlist
    #[arg(short, long, default_value = "data/input.json")]
    pub output: PathBuf,

    /// Optional YAML file overriding the built-in keyword, publication and feed lists
    #[arg(short, long, env = "NEWSREEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-request timeout for feed and article downloads, in seconds
    #[arg(
        long,
        env = "NEWSREEL_TIMEOUT_SECS",
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
