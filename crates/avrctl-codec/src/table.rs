use crate::error::{CodecError, Result};
use crate::source::is_known_source;
use crate::tag::Tag;
use crate::value::{Nudge, Setting, SleepTimer, Value, VolumeCommand};
use crate::volume::{decode_level, encode_level};

const SLEEP_OFF: &str = "POFF";
const SLEEP_MAX_MINUTES: u16 = 120;

/// Codec entry for one tag.
///
/// The table is closed: [`Codec::for_tag`] is the only lookup and every
/// variant is a fixed, stateless pair of encode/decode functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Boolean property with distinct on/off literals.
    Switch {
        on: &'static str,
        off: &'static str,
    },
    InputSource,
    MasterVolume,
    SleepTimer,
}

impl Codec {
    /// Look up the codec entry for `tag`.
    pub fn for_tag(tag: Tag) -> Option<Codec> {
        match tag {
            Tag::POWER => Some(Codec::Switch {
                on: "ON",
                off: "STANDBY",
            }),
            Tag::MUTE => Some(Codec::Switch {
                on: "ON",
                off: "OFF",
            }),
            Tag::INPUT_SOURCE => Some(Codec::InputSource),
            Tag::MASTER_VOLUME => Some(Codec::MasterVolume),
            Tag::SLEEP_TIMER => Some(Codec::SleepTimer),
            _ => None,
        }
    }

    /// Encode `setting` into a wire body for `tag`.
    pub fn encode(self, tag: Tag, setting: &Setting) -> Result<String> {
        match (self, setting) {
            (Codec::Switch { on, off }, Setting::Switch(value)) => {
                let literal = if *value { on } else { off };
                Ok(literal.to_string())
            }
            (Codec::InputSource, Setting::Source(name)) if is_known_source(name) => {
                Ok(name.clone())
            }
            (Codec::MasterVolume, Setting::Volume(VolumeCommand::RelativeNudge(nudge))) => {
                let literal = match nudge {
                    Nudge::Up => "UP",
                    Nudge::Down => "DOWN",
                };
                Ok(literal.to_string())
            }
            (Codec::MasterVolume, Setting::Volume(VolumeCommand::AbsoluteLevel(level))) => {
                encode_level(*level).ok_or(CodecError::OutOfRange { tag, value: *level })
            }
            (Codec::SleepTimer, Setting::SleepTimer(SleepTimer::Off)) => Ok(SLEEP_OFF.to_string()),
            (Codec::SleepTimer, Setting::SleepTimer(SleepTimer::Minutes(minutes))) => {
                if (1..=SLEEP_MAX_MINUTES).contains(minutes) {
                    Ok(format!("P{minutes:03}"))
                } else {
                    Err(CodecError::OutOfRange {
                        tag,
                        value: f64::from(*minutes),
                    })
                }
            }
            (_, other) => Err(CodecError::UnsupportedValue {
                tag,
                value: other.to_string(),
            }),
        }
    }

    /// Decode a wire body for `tag`.
    pub fn decode(self, tag: Tag, body: &str) -> Result<Value> {
        let malformed = |reason: String| CodecError::MalformedResponse {
            tag,
            body: body.to_string(),
            reason,
        };

        match self {
            Codec::Switch { on, off } => match body {
                b if b == on => Ok(Value::Switch(true)),
                b if b == off => Ok(Value::Switch(false)),
                _ => Err(malformed(format!("expected {on} or {off}"))),
            },
            Codec::InputSource => Ok(Value::Source(body.to_string())),
            Codec::MasterVolume => decode_level(body).map(Value::Level).map_err(malformed),
            Codec::SleepTimer => decode_sleep(body).map_err(malformed),
        }
    }

    /// Whether this codec can produce [`Value::Unset`].
    pub fn has_null_sentinel(self) -> bool {
        matches!(self, Codec::SleepTimer)
    }
}

fn decode_sleep(body: &str) -> std::result::Result<Value, String> {
    if body == SLEEP_OFF {
        return Ok(Value::Unset);
    }
    let minutes = body
        .strip_prefix('P')
        .filter(|digits| digits.len() == 3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .ok_or_else(|| format!("expected {SLEEP_OFF} or P001-P120"))?;
    if !(1..=SLEEP_MAX_MINUTES).contains(&minutes) {
        return Err(format!("{minutes} minutes is outside 1-{SLEEP_MAX_MINUTES}"));
    }
    Ok(Value::SleepMinutes(minutes))
}

/// Encode `setting` for `tag`.
///
/// Fails with [`CodecError::UnknownTag`] when `tag` has no codec entry.
pub fn encode(tag: Tag, setting: &Setting) -> Result<String> {
    Codec::for_tag(tag)
        .ok_or(CodecError::UnknownTag(tag))?
        .encode(tag, setting)
}

/// Decode a body for `tag`. Tags without an entry pass through as [`Value::Raw`].
pub fn decode(tag: Tag, body: &str) -> Result<Value> {
    match Codec::for_tag(tag) {
        Some(codec) => codec.decode(tag, body),
        None => Ok(Value::Raw(body.to_string())),
    }
}
