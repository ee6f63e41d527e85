use std::fmt;

use serde::Serialize;

/// A decoded response value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// On/off properties (`PW`, `MU`).
    Switch(bool),
    /// Input source name as reported; may be outside the known set.
    Source(String),
    /// Volume level in decibels.
    Level(f64),
    /// Sleep timer minutes remaining.
    SleepMinutes(u16),
    /// No meaningful value. Tags opt in to producing this; it resolves queries
    /// but does not raise a change notification.
    Unset,
    /// Body of a tag without a codec entry, verbatim.
    Raw(String),
}

impl Value {
    /// Whether this is the no-value sentinel.
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Switch(on) => Some(*on),
            _ => None,
        }
    }

    pub fn as_level(&self) -> Option<f64> {
        match self {
            Value::Level(db) => Some(*db),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Source(text) | Value::Raw(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Switch(true) => f.write_str("on"),
            Value::Switch(false) => f.write_str("off"),
            Value::Source(name) => f.write_str(name),
            Value::Level(db) => write!(f, "{db:.1} dB"),
            Value::SleepMinutes(minutes) => write!(f, "{minutes} min"),
            Value::Unset => f.write_str("unset"),
            Value::Raw(body) => f.write_str(body),
        }
    }
}

/// Direction of a relative volume change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
}

/// A volume change: a one-step nudge or an absolute level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeCommand {
    RelativeNudge(Nudge),
    /// Decibels, `[-80.5, +1.0]` in half-decibel steps.
    AbsoluteLevel(f64),
}

/// Sleep timer setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTimer {
    Off,
    /// 1 to 120 minutes.
    Minutes(u16),
}

/// A value to send with `set`.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Switch(bool),
    Source(String),
    Volume(VolumeCommand),
    SleepTimer(SleepTimer),
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Switch(on) => write!(f, "{on}"),
            Setting::Source(name) => f.write_str(name),
            Setting::Volume(VolumeCommand::RelativeNudge(Nudge::Up)) => f.write_str("up"),
            Setting::Volume(VolumeCommand::RelativeNudge(Nudge::Down)) => f.write_str("down"),
            Setting::Volume(VolumeCommand::AbsoluteLevel(db)) => write!(f, "{db} dB"),
            Setting::SleepTimer(SleepTimer::Off) => f.write_str("off"),
            Setting::SleepTimer(SleepTimer::Minutes(minutes)) => write!(f, "{minutes} min"),
        }
    }
}

impl From<bool> for Setting {
    fn from(on: bool) -> Self {
        Setting::Switch(on)
    }
}

impl From<&str> for Setting {
    fn from(name: &str) -> Self {
        Setting::Source(name.to_string())
    }
}

impl From<String> for Setting {
    fn from(name: String) -> Self {
        Setting::Source(name)
    }
}

impl From<VolumeCommand> for Setting {
    fn from(command: VolumeCommand) -> Self {
        Setting::Volume(command)
    }
}

impl From<Nudge> for Setting {
    fn from(nudge: Nudge) -> Self {
        Setting::Volume(VolumeCommand::RelativeNudge(nudge))
    }
}

impl From<SleepTimer> for Setting {
    fn from(timer: SleepTimer) -> Self {
        Setting::SleepTimer(timer)
    }
}
