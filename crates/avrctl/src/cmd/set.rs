use avrctl::codec::{Codec, Nudge, Setting, SleepTimer, Tag, VolumeCommand};
use tracing::debug;

use crate::cmd::SetArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS, USAGE};

/// What to put on the wire for a `set`.
#[derive(Debug, PartialEq)]
enum Request {
    Encoded(Setting),
    Raw(String),
}

pub async fn run(args: SetArgs) -> CliResult<i32> {
    let request = if args.raw {
        Request::Raw(args.value.clone())
    } else {
        parse_request(args.property, &args.value)?
    };
    debug!(tag = %args.property, ?request, "setting property");

    let (session, _events) = args.connect.connect().await?;
    let result = match request {
        Request::Encoded(setting) => session.set(args.property, setting).await,
        Request::Raw(body) => session.set_raw(args.property, &body).await,
    };
    session.close().await;

    result.map_err(|err| session_error("set failed", err))?;
    Ok(SUCCESS)
}

fn parse_request(tag: Tag, input: &str) -> CliResult<Request> {
    let Some(codec) = Codec::for_tag(tag) else {
        // No codec entry; the body goes out as typed.
        return Ok(Request::Raw(input.to_string()));
    };

    let setting = match codec {
        Codec::Switch { .. } => Setting::Switch(parse_switch(input)?),
        Codec::InputSource => Setting::Source(input.to_string()),
        Codec::MasterVolume => match input.to_ascii_lowercase().as_str() {
            "up" | "+" => Nudge::Up.into(),
            "down" | "-" => Nudge::Down.into(),
            _ => {
                let db = input.trim_end_matches("dB").trim().parse::<f64>().map_err(|_| {
                    usage(format!("expected up, down or a dB level, got {input:?}"))
                })?;
                VolumeCommand::AbsoluteLevel(db).into()
            }
        },
        Codec::SleepTimer => match input.to_ascii_lowercase().as_str() {
            "off" | "0" => SleepTimer::Off.into(),
            _ => {
                let minutes = input
                    .parse::<u16>()
                    .map_err(|_| usage(format!("expected off or minutes, got {input:?}")))?;
                SleepTimer::Minutes(minutes).into()
            }
        },
    };
    Ok(Request::Encoded(setting))
}

fn parse_switch(input: &str) -> CliResult<bool> {
    match input.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "standby" | "false" | "0" | "no" => Ok(false),
        _ => Err(usage(format!("expected on or off, got {input:?}"))),
    }
}

fn usage(message: String) -> CliError {
    CliError::new(USAGE, message)
}
