use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "graywatch", version)]
#[command(about = "Toggles display grayscale after prolonged active screen time")]
pub struct DaemonArgs {
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
    #[arg(
        long = "toggle-command",
        help = "Command run through the platform shell to flip the display mode. Log-only when omitted"
    )]
    pub toggle_command: Option<String>,
    #[arg(
        long = "tick-interval",
        default_value_t = 1,
        help = "Seconds between monitor ticks"
    )]
    pub tick_interval: u64,
    #[arg(
        long = "checkpoint-interval",
        default_value_t = 300,
        help = "Gap in seconds after which elapsed time is folded into the accumulated total"
    )]
    pub checkpoint_interval: u64,
    #[arg(
        long = "hibernation-threshold",
        default_value_t = 3600,
        help = "Gap in seconds treated as a resume from hibernation"
    )]
    pub hibernation_threshold: u64,
    #[arg(
        long = "action-threshold",
        default_value_t = 1800,
        help = "Cumulative active seconds after which grayscale is enabled"
    )]
    pub action_threshold: u64,
}
