//! keypulse binary entry point.

use std::process::ExitCode;

use keypulse::cli;
use keypulse::config::Config;
use keypulse::{logging, Controller, KeyInjector, StopReason};
use tracing::{info, warn};

/// Exit code for bad arguments or configuration.
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'keypulse --help' for more information.");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    logging::init(config.log_filter());
    info!("keypulse v{}", env!("CARGO_PKG_VERSION"));

    let injector = match open_injector() {
        Ok(injector) => injector,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut controller = Controller::new(config.loop_settings(), injector);

    let handle = controller.stop_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => handle.stop(),
            Err(e) => warn!("unable to listen for Ctrl+C: {}", e),
        }
    });
    info!("Press Ctrl+C to stop");

    let summary = controller.start(config.delay()).await;

    println!("{}", summary);

    match summary.reason {
        Some(StopReason::TooManyFailures) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

#[cfg(feature = "native")]
fn open_injector() -> keypulse::Result<Box<dyn KeyInjector>> {
    Ok(Box::new(keypulse::NativeInjector::new()?))
}

#[cfg(not(feature = "native"))]
fn open_injector() -> keypulse::Result<Box<dyn KeyInjector>> {
    Err(keypulse::KeypulseError::CapabilityMissing(
        "built without the native input backend".into(),
    ))
}
