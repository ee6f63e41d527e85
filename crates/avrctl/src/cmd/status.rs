use avrctl::codec::Tag;

use crate::cmd::StatusArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_status, property_name, OutputFormat, StatusRow};

pub(crate) const PROPERTIES: [Tag; 5] = [
    Tag::POWER,
    Tag::MUTE,
    Tag::INPUT_SOURCE,
    Tag::MASTER_VOLUME,
    Tag::SLEEP_TIMER,
];

pub async fn run(args: StatusArgs, format: OutputFormat) -> CliResult<i32> {
    let (session, _events) = args.connect.connect().await?;

    // Issue every query up front; they share the pipeline and time out together.
    let mut pending = Vec::with_capacity(PROPERTIES.len());
    for tag in PROPERTIES {
        let query = session
            .query(tag)
            .map_err(|err| session_error("status failed", err))?;
        pending.push(query);
    }

    let mut rows = Vec::with_capacity(pending.len());
    for query in pending {
        let tag = query.tag();
        let (value, error) = match query.wait().await {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err.to_string())),
        };
        rows.push(StatusRow {
            tag,
            property: property_name(tag),
            value,
            error,
        });
    }
    session.close().await;

    print_status(&args.connect.host, &rows, format);
    Ok(SUCCESS)
}
