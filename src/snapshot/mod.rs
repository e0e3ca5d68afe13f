//! Base station setup documents
//!
//! A snapshot is the full JSON export of one base station. Only the handful of
//! keys listed in `constants::fields` are interpreted; every record is kept as
//! an open JSON object so unknown keys survive any copy untouched.

mod key;

pub use key::{FieldKey, LinkId};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{display, fields};

/// Shared behaviour of records backed by an open JSON object
pub trait OpenRecord {
    fn fields(&self) -> &Map<String, Value>;

    fn fields_mut(&mut self) -> &mut Map<String, Value>;

    fn key_of(&self, field: &str) -> FieldKey {
        FieldKey::of(self.fields().get(field))
    }

    fn link_ref_of(&self, field: &str) -> Option<LinkId> {
        LinkId::from_ref(self.fields().get(field))
    }
}

/// A record stored in a keyed collection (links, inputs, outputs)
pub trait Keyed: OpenRecord {
    fn key(&self) -> FieldKey;
}

macro_rules! open_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Map<String, Value>);

        impl OpenRecord for $name {
            fn fields(&self) -> &Map<String, Value> {
                &self.0
            }

            fn fields_mut(&mut self) -> &mut Map<String, Value> {
                &mut self.0
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(fields: Map<String, Value>) -> Self {
                Self(fields)
            }
        }
    };
}

open_record!(
    /// One paired portable device
    Peripheral
);
open_record!(
    /// A routing link, keyed by `audiolinkId`
    Link
);
open_record!(
    /// An audio input channel, keyed by `inputId`
    AudioInput
);
open_record!(
    /// An audio output channel, keyed by `outputId`
    AudioOutput
);

impl Peripheral {
    pub fn uid(&self) -> FieldKey {
        self.key_of(fields::MT_UID)
    }

    /// Raw UID value, `None` when the key is missing
    pub fn uid_value(&self) -> Option<&Value> {
        self.0.get(fields::MT_UID)
    }

    /// Replace the UID; `None` removes the key
    pub fn set_uid(&mut self, uid: Option<Value>) {
        match uid {
            Some(value) => {
                self.0.insert(fields::MT_UID.to_string(), value);
            }
            None => {
                self.0.shift_remove(fields::MT_UID);
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(fields::NAME).and_then(Value::as_str)
    }

    pub fn iem_link(&self) -> Option<LinkId> {
        self.link_ref_of(fields::IEM_AUDIOLINK_ID)
    }

    pub fn mic_link(&self) -> Option<LinkId> {
        self.link_ref_of(fields::MIC_AUDIOLINK_ID)
    }

    /// `<name> (UID: <uid>)`, the label used in device listings
    pub fn label(&self) -> String {
        let name = self.name().unwrap_or(display::UNNAMED_DEVICE);
        let uid = self.uid();
        let uid = if uid.is_absent() { display::UNKNOWN_UID } else { uid.display_text() };
        format!("{name} (UID: {uid})")
    }
}

impl Link {
    pub fn id(&self) -> Option<LinkId> {
        self.link_ref_of(fields::AUDIOLINK_ID)
    }
}

impl Keyed for Link {
    fn key(&self) -> FieldKey {
        self.key_of(fields::AUDIOLINK_ID)
    }
}

impl AudioInput {
    pub fn iem_link(&self) -> Option<LinkId> {
        self.link_ref_of(fields::IEM_AUDIOLINK_ID)
    }
}

impl Keyed for AudioInput {
    fn key(&self) -> FieldKey {
        self.key_of(fields::INPUT_ID)
    }
}

impl AudioOutput {
    pub fn mic_link(&self) -> Option<LinkId> {
        self.link_ref_of(fields::MIC_AUDIOLINK_ID)
    }
}

impl Keyed for AudioOutput {
    fn key(&self) -> FieldKey {
        self.key_of(fields::OUTPUT_ID)
    }
}

/// Full setup document of one base station
///
/// The four collections the transfer touches are typed; everything else at
/// the top level is carried in `passthrough` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "pairedDevices", default)]
    pub peripherals: Vec<Peripheral>,

    #[serde(rename = "audiolinks", default)]
    pub links: Vec<Link>,

    #[serde(rename = "audioInputs", default)]
    pub inputs: Vec<AudioInput>,

    #[serde(rename = "audioOutputs", default)]
    pub outputs: Vec<AudioOutput>,

    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl Snapshot {
    pub fn from_json_str(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Minified by default, which is what the base station itself writes
    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn peripheral_uids(&self) -> Vec<FieldKey> {
        self.peripherals.iter().map(Peripheral::uid).collect()
    }
}
