use std::time::Duration;

use avrctl::codec::Tag;
use avrctl::session::{Events, Session, SessionConfig};
use avrctl::transport::{TransportConfig, DEFAULT_PORT};
use clap::{Args, Subcommand};

use crate::exit::{session_error, CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod get;
pub mod send;
pub mod set;
pub mod status;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query one property and print its value.
    Get(GetArgs),
    /// Change one property.
    Set(SetArgs),
    /// Query every known property.
    Status(StatusArgs),
    /// Send one protocol line verbatim.
    Send(SendArgs),
    /// Print notifications as the receiver reports changes.
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    if let Command::Version(args) = command {
        return version::run(args, format);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed to start runtime: {err}")))?;

    runtime.block_on(async move {
        match command {
            Command::Get(args) => get::run(args, format).await,
            Command::Set(args) => set::run(args).await,
            Command::Status(args) => status::run(args, format).await,
            Command::Send(args) => send::run(args, format).await,
            Command::Watch(args) => watch::run(args, format).await,
            Command::Version(args) => version::run(args, format),
        }
    })
}

/// Where the receiver is and how long to wait for it.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Receiver hostname or IP address.
    #[arg(long, env = "AVRCTL_HOST")]
    pub host: String,
    /// Control port.
    #[arg(long, env = "AVRCTL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Connect and response timeout (e.g. 5s, 500ms); 0 waits forever.
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

impl ConnectArgs {
    pub async fn connect(&self) -> CliResult<(Session, Events)> {
        let timeout = parse_timeout(&self.timeout)?;
        let transport_config = TransportConfig {
            connect_timeout: timeout,
            ..TransportConfig::default()
        };
        let session_config = SessionConfig::default().with_request_timeout(timeout);

        avrctl::session::connect_with_config(
            &self.host,
            self.port,
            &transport_config,
            session_config,
        )
        .await
        .map_err(|err| session_error("connect failed", err))
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Property name (power, mute, source, volume, sleep) or two-letter tag.
    #[arg(value_parser = parse_tag)]
    pub property: Tag,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Property name (power, mute, source, volume, sleep) or two-letter tag.
    #[arg(value_parser = parse_tag)]
    pub property: Tag,
    /// New value: on/off, a source name, a dB level, up/down, or minutes.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Send the value as the line body without encoding it.
    #[arg(long)]
    pub raw: bool,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Protocol line without the trailing carriage return (e.g. PWON, MV?).
    pub line: String,
    /// Keep the connection open this long to print replies (e.g. 2s, 500ms).
    #[arg(long)]
    pub listen: Option<String>,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Also print raw lines, tagged lines and unsolicited notifications.
    #[arg(long)]
    pub raw: bool,
    /// Exit after printing N notifications.
    #[arg(long)]
    pub count: Option<usize>,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}

/// Accept friendly property names as well as raw two-letter tags.
pub fn parse_tag(input: &str) -> Result<Tag, String> {
    match input.to_ascii_lowercase().as_str() {
        "power" => Ok(Tag::POWER),
        "mute" => Ok(Tag::MUTE),
        "source" | "input" | "input-source" => Ok(Tag::INPUT_SOURCE),
        "volume" | "vol" => Ok(Tag::MASTER_VOLUME),
        "sleep" | "sleep-timer" => Ok(Tag::SLEEP_TIMER),
        _ => Tag::new(input).map_err(|err| err.to_string()),
    }
}

/// Parse a wait like `5s`, `500ms` or `2m`; a bare number is seconds.
/// Zero, `off` and `none` mean no limit.
pub fn parse_timeout(input: &str) -> CliResult<Option<Duration>> {
    let input = input.trim().to_ascii_lowercase();
    if matches!(input.as_str(), "off" | "none") {
        return Ok(None);
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let invalid = || CliError::new(USAGE, format!("invalid timeout: {input:?} (try 5s or 500ms)"));

    let value: u64 = number.parse().map_err(|_| invalid())?;
    let timeout = match unit {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        _ => return Err(invalid()),
    };
    Ok(Some(timeout).filter(|timeout| !timeout.is_zero()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_accepts_names_and_tags() {
        assert_eq!(parse_tag("power").unwrap(), Tag::POWER);
        assert_eq!(parse_tag("Volume").unwrap(), Tag::MASTER_VOLUME);
        assert_eq!(parse_tag("source").unwrap(), Tag::INPUT_SOURCE);
        assert_eq!(parse_tag("sl").unwrap(), Tag::SLEEP_TIMER);
        assert_eq!(parse_tag("Z2").unwrap(), Tag::new("Z2").unwrap());
        assert!(parse_tag("brightness").is_err());
    }

    #[test]
    fn parse_timeout_units() {
        assert_eq!(parse_timeout("2s").unwrap(), Some(Duration::from_secs(2)));
        assert_eq!(parse_timeout("150ms").unwrap(), Some(Duration::from_millis(150)));
        assert_eq!(parse_timeout("3").unwrap(), Some(Duration::from_secs(3)));
        assert_eq!(parse_timeout("2m").unwrap(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn zero_timeout_disables() {
        assert_eq!(parse_timeout("0").unwrap(), None);
        assert_eq!(parse_timeout("0ms").unwrap(), None);
        assert_eq!(parse_timeout("off").unwrap(), None);
    }

    #[test]
    fn parse_timeout_rejects_invalid_values() {
        assert!(parse_timeout("bad").is_err());
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("-1s").is_err());
        assert_eq!(parse_timeout("1h").unwrap_err().code, USAGE);
    }
}
