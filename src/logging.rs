//! Logger setup for the binary.

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Default filter for the given `-q` / `-v` flags.
pub fn default_filter(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn,talkdub=info",
        1 => "warn,talkdub=debug",
        _ => "info,talkdub=trace",
    }
}

/// Initialize `env_logger` on stderr. `RUST_LOG` overrides the flag-derived
/// filter; HTTP client internals stay at `warn`.
pub fn init_logger(quiet: bool, verbose: u8) {
    let env = Env::default().filter_or("RUST_LOG", default_filter(quiet, verbose));

    let mut builder = Builder::from_env(env);
    builder
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("rustls", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);

    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialized: {}", e);
    }
}
