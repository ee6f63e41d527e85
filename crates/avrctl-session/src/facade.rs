//! Typed accessors for the known properties.

use avrctl_codec::{Nudge, SleepTimer, Tag, Value, VolumeCommand};

use crate::error::{Result, SessionError};
use crate::event::{Event, Events};
use crate::session::Session;

impl Session {
    pub async fn power(&self) -> Result<bool> {
        let value = self.get(Tag::POWER).await?;
        expect_switch(Tag::POWER, value)
    }

    pub async fn set_power(&self, on: bool) -> Result<()> {
        self.set(Tag::POWER, on).await
    }

    pub async fn mute(&self) -> Result<bool> {
        let value = self.get(Tag::MUTE).await?;
        expect_switch(Tag::MUTE, value)
    }

    pub async fn set_mute(&self, on: bool) -> Result<()> {
        self.set(Tag::MUTE, on).await
    }

    /// Current input source as reported, which may be outside the settable set.
    pub async fn input_source(&self) -> Result<String> {
        match self.get(Tag::INPUT_SOURCE).await? {
            Value::Source(name) => Ok(name),
            value => Err(unexpected(Tag::INPUT_SOURCE, value)),
        }
    }

    pub async fn set_input_source(&self, source: &str) -> Result<()> {
        self.set(Tag::INPUT_SOURCE, source).await
    }

    /// Master volume in dB.
    pub async fn volume(&self) -> Result<f64> {
        match self.get(Tag::MASTER_VOLUME).await? {
            Value::Level(db) => Ok(db),
            value => Err(unexpected(Tag::MASTER_VOLUME, value)),
        }
    }

    /// Set master volume in dB; `[-80.5, +1.0]` in half-decibel steps.
    pub async fn set_volume(&self, db: f64) -> Result<()> {
        self.set(Tag::MASTER_VOLUME, VolumeCommand::AbsoluteLevel(db))
            .await
    }

    pub async fn volume_up(&self) -> Result<()> {
        self.set(Tag::MASTER_VOLUME, Nudge::Up).await
    }

    pub async fn volume_down(&self) -> Result<()> {
        self.set(Tag::MASTER_VOLUME, Nudge::Down).await
    }

    pub async fn sleep_timer(&self) -> Result<SleepTimer> {
        match self.get(Tag::SLEEP_TIMER).await? {
            Value::Unset => Ok(SleepTimer::Off),
            Value::SleepMinutes(minutes) => Ok(SleepTimer::Minutes(minutes)),
            value => Err(unexpected(Tag::SLEEP_TIMER, value)),
        }
    }

    pub async fn set_sleep_timer(&self, timer: SleepTimer) -> Result<()> {
        self.set(Tag::SLEEP_TIMER, timer).await
    }

    /// Subscribe to decoded value changes as typed [`StateChange`]s.
    pub fn state_changes(&self) -> StateChanges {
        StateChanges {
            events: self.subscribe(),
        }
    }
}

fn expect_switch(tag: Tag, value: Value) -> Result<bool> {
    match value {
        Value::Switch(on) => Ok(on),
        value => Err(unexpected(tag, value)),
    }
}

fn unexpected(tag: Tag, value: Value) -> SessionError {
    SessionError::UnexpectedValue { tag, value }
}

/// A property of the appliance changed.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    Power(bool),
    Mute(bool),
    InputSource(String),
    Volume(f64),
    SleepTimer(SleepTimer),
    /// A known tag whose value did not fit the typed variants.
    Other { tag: Tag, value: Value },
}

impl StateChange {
    fn from_change(tag: Tag, value: Value) -> Self {
        match (tag, value) {
            (Tag::POWER, Value::Switch(on)) => StateChange::Power(on),
            (Tag::MUTE, Value::Switch(on)) => StateChange::Mute(on),
            (Tag::INPUT_SOURCE, Value::Source(name)) => StateChange::InputSource(name),
            (Tag::MASTER_VOLUME, Value::Level(db)) => StateChange::Volume(db),
            (Tag::SLEEP_TIMER, Value::SleepMinutes(minutes)) => {
                StateChange::SleepTimer(SleepTimer::Minutes(minutes))
            }
            (tag, value) => StateChange::Other { tag, value },
        }
    }
}

/// Typed view over a session's change notifications.
#[derive(Debug)]
pub struct StateChanges {
    events: Events,
}

impl StateChanges {
    /// Wait for the next change. Returns `None` once the session is gone.
    pub async fn recv(&mut self) -> Option<StateChange> {
        loop {
            match self.events.recv().await? {
                Event::Changed { tag, value } => {
                    return Some(StateChange::from_change(tag, value))
                }
                _ => continue,
            }
        }
    }
}
