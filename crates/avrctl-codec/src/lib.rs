//! Typed encode/decode table for A/V receiver command tags.
//!
//! Every protocol line starts with a two-character [`Tag`]. For the tags this
//! crate knows about, a [`Codec`] turns application values into the
//! appliance's compact ASCII bodies and back:
//!
//! | Tag  | Property     | Application value                      | Wire body                   |
//! |------|--------------|----------------------------------------|-----------------------------|
//! | `PW` | Power        | `bool`                                 | `ON` / `STANDBY`            |
//! | `MU` | Mute         | `bool`                                 | `ON` / `OFF`                |
//! | `SI` | Input source | closed set of source names             | the name                    |
//! | `MV` | Volume       | nudge, or dB level in `[-80.5, +1.0]`  | `UP` / `DOWN` / `415` ...   |
//! | `SL` | Sleep timer  | off, or 1-120 minutes                  | `POFF` / `P030`             |
//!
//! Tags without an entry pass through: [`decode`] returns the body verbatim
//! as [`Value::Raw`] and [`encode`] refuses with [`CodecError::UnknownTag`].

pub mod error;
pub mod source;
pub mod table;
pub mod tag;
pub mod value;
pub mod volume;

pub use error::{CodecError, Result};
pub use source::{is_known_source, INPUT_SOURCES};
pub use table::{decode, encode, Codec};
pub use tag::Tag;
pub use value::{Nudge, Setting, SleepTimer, Value, VolumeCommand};
pub use volume::{MAX_LEVEL, MIN_LEVEL};
