use clap::Parser;
use std::path::PathBuf;

use crate::preload::LoadFailurePolicy;

/// Scroll-driven image sequence player (demo runner)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Sequence source: directory or glob pattern (e.g. "render.*.png")
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Auto-play after preload instead of sweeping a simulated scroll
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Skip the preload phase
    #[arg(long = "no-preload")]
    pub no_preload: bool,

    /// Disable the preload progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Progress bar fill color
    #[arg(long = "progress-color", value_name = "COLOR", default_value = "#dadada")]
    pub progress_color: String,

    /// How load failures propagate
    #[arg(long = "policy", value_enum, default_value = "skip-and-continue")]
    pub policy: PolicyArg,

    /// Give up on sources still loading after this many milliseconds
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// How long to run playback/sweep, in seconds
    #[arg(short = 'd', long = "duration", value_name = "SECS", default_value = "3.0")]
    pub duration: f64,

    /// Player options bundle as JSON (overrides the flags above)
    #[arg(long = "options", value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// clap-friendly mirror of [`LoadFailurePolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyArg {
    FailFast,
    SkipAndContinue,
}

impl From<PolicyArg> for LoadFailurePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FailFast => LoadFailurePolicy::FailFast,
            PolicyArg::SkipAndContinue => LoadFailurePolicy::SkipAndContinue,
        }
    }
}
