//! Diagnostics on stderr.
//!
//! `--log-level` applies to the avrctl crates only; everything else stays at
//! `warn` (or quieter, if asked). Wire traffic is logged at `debug` by the
//! session driver as `tx`/`rx` lines. `RUST_LOG`, when set, replaces the
//! generated directives entirely.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Targets that `--log-level` controls.
const OWN_TARGETS: [&str; 5] = [
    "avrctl",
    "avrctl_session",
    "avrctl_transport",
    "avrctl_frame",
    "avrctl_codec",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directives: dependencies at `warn` at most, avrctl crates at
    /// `self`.
    fn directives(self) -> String {
        let own = self.as_filter();
        let others = own.min(LevelFilter::WARN);
        let mut directives = others.to_string().to_lowercase();
        for target in OWN_TARGETS {
            directives.push_str(&format!(",{target}={}", own.to_string().to_lowercase()));
        }
        directives
    }
}

fn build_filter(rust_log: Option<&str>, level: LogLevel) -> EnvFilter {
    if let Some(filter) = rust_log.and_then(|spec| EnvFilter::try_new(spec).ok()) {
        return filter;
    }
    EnvFilter::try_new(level.directives())
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.as_filter().into()))
}

/// Install the stderr subscriber.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), level);
    let verbose = matches!(level, LogLevel::Debug | LogLevel::Trace);

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(verbose);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
