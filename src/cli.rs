//! Command-line interface for keypulse.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::chord::KeySpec;

/// Command-line arguments.
///
/// Options left unset fall back to the environment, the config file and
/// then the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Seconds between presses.
    pub interval: Option<f64>,
    /// Maximum number of presses.
    pub max_presses: Option<u64>,
    /// Seconds to wait before the first press.
    pub delay: Option<f64>,
    /// Modifier key of the chord.
    pub modifier: Option<KeySpec>,
    /// Action key of the chord.
    pub key: Option<KeySpec>,
    /// Milliseconds the action key is held.
    pub hold_ms: Option<u64>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('i') | Long("interval") => {
                let value: String = parser.value()?.parse()?;
                result.interval = Some(parse_seconds("interval", value)?);
            }
            Short('n') | Long("max-presses") => {
                let value: String = parser.value()?.parse()?;
                result.max_presses = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("max-presses", value))?,
                );
            }
            Short('d') | Long("delay") => {
                let value: String = parser.value()?.parse()?;
                result.delay = Some(parse_seconds("delay", value)?);
            }
            Short('m') | Long("modifier") => {
                let value: String = parser.value()?.parse()?;
                result.modifier = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("modifier", value))?,
                );
            }
            Short('k') | Long("key") => {
                let value: String = parser.value()?.parse()?;
                result.key = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("key", value))?,
                );
            }
            Long("hold-ms") => {
                let value: String = parser.value()?.parse()?;
                result.hold_ms = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("hold-ms", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

fn parse_seconds(name: &'static str, value: String) -> Result<f64, ArgsError> {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(secs),
        _ => Err(ArgsError::InvalidValue(name, value)),
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"keypulse {version}
Press a keyboard shortcut on a fixed interval

USAGE:
    keypulse [OPTIONS]

OPTIONS:
    -i, --interval <SECS>     Seconds between presses [default: 2.0]
    -n, --max-presses <N>     Stop after N presses [default: unlimited]
    -d, --delay <SECS>        Seconds to wait before the first press [default: 3.0]
    -m, --modifier <KEY>      Modifier key [default: meta]
    -k, --key <KEY>           Action key [default: return]
        --hold-ms <MS>        Milliseconds to hold the action key [default: 50]
    -c, --config <FILE>       Path to configuration file (JSON)
    -l, --log-level <LVL>     Log level (error, warn, info, debug, trace)
    -h, --help                Print help
    -V, --version             Print version

KEYS:
    meta (cmd, command, super, win), control (ctrl), alt (option), shift,
    return (enter), space, tab, escape (esc), backspace, or a single character

ENVIRONMENT VARIABLES:
    KEYPULSE_INTERVAL         Seconds between presses (overrides config)
    KEYPULSE_MAX_PRESSES      Maximum number of presses (overrides config)
    KEYPULSE_DELAY            Startup delay in seconds (overrides config)
    KEYPULSE_MODIFIER         Modifier key (overrides config)
    KEYPULSE_KEY              Action key (overrides config)
    KEYPULSE_LOG_LEVEL        Log level (overrides config)
    RUST_LOG                  Alternative log level setting

EXAMPLES:
    # Press Command+Return every 2 seconds until Ctrl+C
    keypulse

    # Press 10 times with a 3 second interval
    keypulse --max-presses 10 --interval 3

    # Save every 30 seconds on Linux or Windows
    keypulse -m ctrl -k s -i 30
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("keypulse {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
