use avrctl::codec::{Codec, Tag, MAX_LEVEL, MIN_LEVEL};
use serde::Serialize;

use crate::cmd::status::PROPERTIES;
use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, property_name, OutputFormat};

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    default_port: u16,
    request_timeout_ms: u128,
    properties: Vec<PropertyInfo>,
}

#[derive(Serialize)]
struct PropertyInfo {
    tag: Tag,
    name: &'static str,
    accepts: String,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.extended {
        println!("avrctl {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let info = VersionInfo {
        name: "avrctl",
        version: env!("CARGO_PKG_VERSION"),
        default_port: avrctl::transport::DEFAULT_PORT,
        request_timeout_ms: avrctl::session::DEFAULT_REQUEST_TIMEOUT.as_millis(),
        properties: PROPERTIES
            .iter()
            .map(|&tag| PropertyInfo {
                tag,
                name: property_name(tag),
                accepts: accepts(tag),
            })
            .collect(),
    };

    if matches!(format, OutputFormat::Json) {
        print_json(&info);
        return Ok(SUCCESS);
    }

    println!("{} {}", info.name, info.version);
    println!("default port: {}", info.default_port);
    println!("request timeout: {}ms", info.request_timeout_ms);
    for property in &info.properties {
        println!(
            "  {} {:<12} {}",
            property.tag, property.name, property.accepts
        );
    }
    Ok(SUCCESS)
}

/// Human summary of the values `set` takes for `tag`.
fn accepts(tag: Tag) -> String {
    match Codec::for_tag(tag) {
        Some(Codec::Switch { on, off }) => format!("on ({on}) | off ({off})"),
        Some(Codec::InputSource) => "source name, e.g. CD, TUNER, DVD".to_string(),
        Some(Codec::MasterVolume) => format!("{MIN_LEVEL}..{MAX_LEVEL} dB in 0.5 steps | up | down"),
        Some(Codec::SleepTimer) => "1-120 minutes | off".to_string(),
        None => "raw body".to_string(),
    }
}
