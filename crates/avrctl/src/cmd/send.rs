use avrctl::session::Event;

use crate::cmd::{parse_timeout, SendArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_event, OutputFormat};

pub async fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let listen = args.listen.as_deref().map(parse_timeout).transpose()?.flatten();
    let (session, mut events) = args.connect.connect().await?;

    let result = session.send_raw(&args.line).await;
    if let (Ok(()), Some(window)) = (&result, listen) {
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.recv() => match event {
                    Some(event @ Event::RawLine(_)) => print_event(&event, format),
                    Some(Event::Disconnected | Event::Closed) | None => break,
                    Some(_) => {}
                },
            }
        }
    }
    session.close().await;

    result.map_err(|err| session_error("send failed", err))?;
    Ok(SUCCESS)
}
