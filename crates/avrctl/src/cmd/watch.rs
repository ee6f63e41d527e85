use avrctl::session::Event;
use tracing::info;

use crate::cmd::WatchArgs;
use crate::exit::{CliError, CliResult, SUCCESS, UNAVAILABLE};
use crate::output::{print_event, OutputFormat};

pub async fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let (session, mut events) = args.connect.connect().await?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed = 0usize;
    loop {
        let event = tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            event = events.recv() => event,
        };

        let Some(event) = event else {
            break;
        };
        if !wanted(&event, args.raw) {
            continue;
        }
        print_event(&event, format);

        if event == Event::Disconnected {
            return Err(CliError::new(UNAVAILABLE, "appliance disconnected"));
        }

        printed = printed.saturating_add(1);
        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    session.close().await;
    Ok(SUCCESS)
}

fn wanted(event: &Event, raw: bool) -> bool {
    match event {
        Event::Changed { .. } | Event::Error(_) | Event::Disconnected => true,
        Event::Closed => false,
        Event::Connected
        | Event::RawLine(_)
        | Event::RawTagged { .. }
        | Event::Unsolicited { .. } => raw,
    }
}

#[cfg(test)]
mod tests {
    use avrctl::codec::{Tag, Value};

    use super::*;

    #[test]
    fn default_filter_shows_changes_and_errors() {
        let changed = Event::Changed {
            tag: Tag::POWER,
            value: Value::Switch(true),
        };
        assert!(wanted(&changed, false));
        assert!(wanted(&Event::Disconnected, false));
        assert!(!wanted(&Event::RawLine("PWON".into()), false));
        assert!(!wanted(&Event::Connected, false));
        assert!(!wanted(&Event::Closed, true));
    }

    #[test]
    fn raw_filter_shows_everything() {
        assert!(wanted(&Event::RawLine("PWON".into()), true));
        assert!(wanted(
            &Event::Unsolicited {
                tag: Tag::POWER,
                value: Value::Switch(true)
            },
            true
        ));
    }
}
