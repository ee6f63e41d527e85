mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "avrctl", version, about = "A/V receiver control CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use avrctl::codec::Tag;

    use super::*;

    #[test]
    fn parses_get_subcommand() {
        let cli = Cli::try_parse_from([
            "avrctl",
            "get",
            "volume",
            "--host",
            "10.0.0.5",
            "--timeout",
            "2s",
        ])
        .expect("get args should parse");

        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.property, Tag::MASTER_VOLUME);
                assert_eq!(args.connect.host, "10.0.0.5");
                assert_eq!(args.connect.port, 23);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn set_accepts_negative_levels() {
        let cli = Cli::try_parse_from([
            "avrctl", "set", "volume", "-38.5", "--host", "avr.local", "--port", "2323",
        ])
        .expect("negative level should parse as a value");

        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.value, "-38.5");
                assert_eq!(args.connect.port, 2323);
                assert!(!args.raw);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_tag() {
        let err = Cli::try_parse_from(["avrctl", "get", "brightness", "--host", "avr.local"])
            .expect_err("unknown property should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_watch_with_global_format() {
        let cli = Cli::try_parse_from([
            "avrctl", "watch", "--host", "avr.local", "--count", "3", "--format", "json",
        ])
        .expect("watch args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Watch(ref args) if args.count == Some(3)));
    }
}
