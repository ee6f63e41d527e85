use std::io::IsTerminal;

use avrctl::codec::{Tag, Value};
use avrctl::session::Event;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ValueOutput<'a> {
    tag: Tag,
    property: &'static str,
    value: &'a Value,
}

pub fn print_value(tag: Tag, value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ValueOutput {
                tag,
                property: property_name(tag),
                value,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["TAG", "PROPERTY", "VALUE"]);
            table.add_row(vec![
                tag.to_string(),
                property_name(tag).to_string(),
                value.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{} ({tag}): {value}", property_name(tag)),
        OutputFormat::Raw => println!("{value}"),
    }
}

/// One row of a status report: a value or the reason it is missing.
#[derive(Serialize)]
pub struct StatusRow {
    pub tag: Tag,
    pub property: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusRow {
    fn display_value(&self) -> String {
        match (&self.value, &self.error) {
            (Some(value), _) => value.to_string(),
            (None, Some(error)) => format!("<{error}>"),
            (None, None) => "-".to_string(),
        }
    }
}

pub fn print_status(host: &str, rows: &[StatusRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct StatusOutput<'a> {
                host: &'a str,
                properties: &'a [StatusRow],
            }
            print_json(&StatusOutput {
                host,
                properties: rows,
            });
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["TAG", "PROPERTY", "VALUE"]);
            for row in rows {
                table.add_row(vec![
                    row.tag.to_string(),
                    row.property.to_string(),
                    row.display_value(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Receiver {host}:");
            for row in rows {
                println!("  {:<14} {}", format!("{}:", row.property), row.display_value());
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}{}", row.tag, row.display_value());
            }
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> EventOutput<'a> {
    fn from_event(event: &'a Event) -> Self {
        let mut out = EventOutput {
            event: event_name(event),
            tag: None,
            body: None,
            value: None,
            error: None,
        };
        match event {
            Event::Connected | Event::Disconnected | Event::Closed => {}
            Event::RawLine(line) => out.body = Some(line),
            Event::RawTagged { tag, body } => {
                out.tag = Some(*tag);
                out.body = Some(body);
            }
            Event::Changed { tag, value } | Event::Unsolicited { tag, value } => {
                out.tag = Some(*tag);
                out.value = Some(value);
            }
            Event::Error(err) => out.error = Some(err.to_string()),
        }
        out
    }
}

pub fn print_event(event: &Event, format: OutputFormat) {
    let out = EventOutput::from_event(event);
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            let detail = match event {
                Event::Connected | Event::Disconnected | Event::Closed => String::new(),
                Event::RawLine(line) => format!("{line:?}"),
                Event::RawTagged { tag, body } => format!("{tag} {body:?}"),
                Event::Changed { tag, value } | Event::Unsolicited { tag, value } => {
                    format!("{} ({tag}) = {value}", property_name(*tag))
                }
                Event::Error(err) => err.to_string(),
            };
            println!("{:<12} {detail}", out.event);
        }
        OutputFormat::Raw => {
            if let Event::RawLine(line) = event {
                println!("{line}");
            }
        }
    }
}

pub fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Connected => "connected",
        Event::RawLine(_) => "raw",
        Event::RawTagged { .. } => "raw-tagged",
        Event::Changed { .. } => "changed",
        Event::Unsolicited { .. } => "unsolicited",
        Event::Error(_) => "error",
        Event::Disconnected => "disconnected",
        Event::Closed => "closed",
    }
}

pub fn property_name(tag: Tag) -> &'static str {
    match tag {
        Tag::POWER => "power",
        Tag::MUTE => "mute",
        Tag::INPUT_SOURCE => "input-source",
        Tag::MASTER_VOLUME => "volume",
        Tag::SLEEP_TIMER => "sleep-timer",
        _ => "unknown",
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub(crate) fn print_json<T: Serialize>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}
