use crate::cmd::GetArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_value, OutputFormat};

pub async fn run(args: GetArgs, format: OutputFormat) -> CliResult<i32> {
    let (session, _events) = args.connect.connect().await?;

    let result = session.get(args.property).await;
    session.close().await;

    let value = result.map_err(|err| session_error("get failed", err))?;
    print_value(args.property, &value, format);
    Ok(SUCCESS)
}
