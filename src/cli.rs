use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use weightsum::{Enumeration, enumerate};

/// Log level for the application
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Weightsum - Find every combination of unit weights that adds up to a target
#[derive(Parser, Debug)]
#[command(name = "weightsum")]
#[command(
    about = "Find every combination of distinct unit weights, in unlimited supply, summing to a target"
)]
#[command(version, allow_negative_numbers = true)]
#[command(after_help = "Example:\n  ./weightsum 5 0.5 2 3 --log-level info")]
pub struct CliArgs {
    /// Target value to reach
    pub target: f64,

    /// Distinct positive weights to combine
    #[arg(required = true, num_args = 1..)]
    pub weights: Vec<f64>,

    /// Log level (default: warn)
    #[arg(short, long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Initialize logging based on the provided log level
pub fn init_logging(log_level: &LogLevel) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log_level.to_log_level_filter())
        .try_init()
        .context("Cannot initialize logging")?;
    Ok(())
}

/// Formats the combinations one per line, followed by the total.
pub fn report(enumeration: &Enumeration) -> String {
    format!("{}Found {} combinations.", enumeration, enumeration.count())
}

/// Run the main application logic
pub fn run() -> Result<()> {
    let args = CliArgs::parse();

    init_logging(&args.log_level)?;

    info!(
        "Searching combinations of {:?} that sum to {}",
        args.weights, args.target
    );

    let enumeration = enumerate(args.target, &args.weights).context("Invalid input")?;
    if enumeration.count() == 0 {
        warn!("No combination reaches {}", args.target);
    }

    println!("{}", report(&enumeration));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(["weightsum", "5", "0.5", "2", "3"]).unwrap();
        assert_eq!(args.target, 5.0);
        assert_eq!(args.weights, vec![0.5, 2.0, 3.0]);
        assert!(matches!(args.log_level, LogLevel::Warn));
    }

    #[test]
    fn test_cli_negative_target() {
        let args = CliArgs::try_parse_from(["weightsum", "-3", "1", "-l", "debug"]).unwrap();
        assert_eq!(args.target, -3.0);
        assert!(matches!(args.log_level, LogLevel::Debug));
    }

    #[test]
    fn test_cli_requires_weights() {
        assert!(CliArgs::try_parse_from(["weightsum", "5"]).is_err());
        assert!(CliArgs::try_parse_from(["weightsum", "five", "1"]).is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            LogLevel::Error.to_log_level_filter(),
            log::LevelFilter::Error
        );
        assert_eq!(LogLevel::Warn.to_log_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Info.to_log_level_filter(), log::LevelFilter::Info);
        assert_eq!(
            LogLevel::Debug.to_log_level_filter(),
            log::LevelFilter::Debug
        );
        assert_eq!(
            LogLevel::Trace.to_log_level_filter(),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_report() {
        let enumeration = enumerate(4.0, &[2.0, 4.0]).unwrap();
        assert_eq!(report(&enumeration), "{4: 1}\n{2: 2}\nFound 2 combinations.");

        let empty = enumerate(5.0, &[2.0]).unwrap();
        assert_eq!(report(&empty), "Found 0 combinations.");
    }
}
