//! Command-line interface definitions.
//!
//! The interesting configuration lives in the environment (see
//! [`Config`](crate::config::Config)); the CLI only selects how the
//! process runs: interactive menu (default), one-shot cycle, or headless
//! schedule.

use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Interactive menu
/// promo_radar
///
/// # One cycle, then exit (cron-friendly)
/// promo_radar --run-once
///
/// # Headless hourly schedule until Ctrl-C
/// promo_radar --schedule
/// ```
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Run a single fetch-and-notify cycle and exit
    #[arg(long)]
    pub run_once: bool,

    /// Start the hourly schedule without the interactive menu and run
    /// until interrupted
    #[arg(long, conflicts_with = "run_once")]
    pub schedule: bool,

    /// Path to an env file to load instead of ./.env
    #[arg(long, env = "PROMO_RADAR_ENV_FILE")]
    pub env_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_interactive() {
        let cli = Cli::parse_from(["promo_radar"]);
        assert!(!cli.run_once);
        assert!(!cli.schedule);
        assert!(cli.env_file.is_none());
    }

    #[test]
    fn test_run_once_flag() {
        let cli = Cli::parse_from(["promo_radar", "--run-once"]);
        assert!(cli.run_once);
    }

    #[test]
    fn test_schedule_conflicts_with_run_once() {
        let parsed = Cli::try_parse_from(["promo_radar", "--schedule", "--run-once"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_env_file_flag() {
        let cli = Cli::parse_from(["promo_radar", "--env-file", "/tmp/test.env"]);
        assert_eq!(cli.env_file.as_deref(), Some("/tmp/test.env"));
    }
}
