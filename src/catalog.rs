//! Static catalog of mapping modes.
//!
//! Each of the eight table rows carries a mode in slot 0. The mode decides
//! how many of the remaining slots are meaningful and which value domain
//! each one draws from. The layouts mirror the module's mapping entry:
//! a gate command/value pair plus up to two CV command/value pairs.

/// Note On status byte for channel 1. Channel fields store the full status
/// byte (0x90 + channel), which is what the firmware compares against.
pub const CHANNEL_BASE: u16 = 0x90;

const CHANNEL_COUNT: usize = 16;
const NOTE_COUNT: usize = 128;

/// Mode ids as the firmware defines them.
pub mod mode_id {
    pub const VELOCITY: u16 = 0;
    pub const CC: u16 = 1;
    pub const PITCH: u16 = 2;
    pub const PITCH_SAH: u16 = 3;
    pub const RANDSEQ: u16 = 4;
    pub const RANDSEQ_SAH: u16 = 5;
}

/// Value domain of a single mapping field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Domain {
    /// MIDI channel, stored as a Note On status byte (0x90..0x9F).
    Channel,
    /// MIDI note number, 0..127.
    Note,
    /// MIDI controller number, 0..127.
    Controller,
}

impl Domain {
    /// Lowest value in the domain.
    pub fn first(self) -> u16 {
        match self {
            Domain::Channel => CHANNEL_BASE,
            Domain::Note | Domain::Controller => 0,
        }
    }

    /// Number of values in the domain.
    pub fn count(self) -> usize {
        match self {
            Domain::Channel => CHANNEL_COUNT,
            Domain::Note | Domain::Controller => NOTE_COUNT,
        }
    }

    pub fn contains(self, value: u16) -> bool {
        value >= self.first() && value < self.first() + self.count() as u16
    }

    /// Value at a 0-based position within the domain.
    pub fn value_at(self, index: usize) -> u16 {
        self.first() + index as u16
    }

    /// Position of `value` within the domain, if it lies inside.
    pub fn index_of(self, value: u16) -> Option<usize> {
        self.contains(value).then(|| (value - self.first()) as usize)
    }

    /// Display name for a value, e.g. "Channel 1" or "Note 24".
    pub fn label(self, value: u16) -> String {
        match self {
            Domain::Channel => {
                // `value` may lie outside the domain when it came from
                // pasted text; wrap instead of underflowing.
                format!("Channel {}", value.wrapping_sub(CHANNEL_BASE).wrapping_add(1))
            }
            Domain::Note => format!("Note {value}"),
            Domain::Controller => format!("Controller {value}"),
        }
    }
}

/// One meaningful field of a mode: a label for the form plus a value domain.
pub struct Field {
    pub label: &'static str,
    pub domain: Domain,
}

/// A row mode: stable id, display name, and the ordered fields it uses.
/// Slots past `fields.len()` are unused and held at zero.
pub struct ModeSpec {
    pub id: u16,
    pub name: &'static str,
    pub fields: &'static [Field],
}

const fn field(label: &'static str, domain: Domain) -> Field {
    Field { label, domain }
}

pub static MODES: &[ModeSpec] = &[
    ModeSpec {
        id: mode_id::VELOCITY,
        name: "Velocity",
        fields: &[
            field("Gate Channel", Domain::Channel),
            field("Gate Note", Domain::Note),
        ],
    },
    ModeSpec {
        id: mode_id::CC,
        name: "Control Change",
        fields: &[
            field("Gate Channel", Domain::Channel),
            field("Gate Note", Domain::Note),
            field("Controller Channel", Domain::Channel),
            field("Controller", Domain::Controller),
        ],
    },
    ModeSpec {
        id: mode_id::PITCH,
        name: "Pitch",
        fields: &[field("Pitch Channel", Domain::Channel)],
    },
    ModeSpec {
        id: mode_id::PITCH_SAH,
        name: "Pitch, Sample & Hold",
        fields: &[
            field("Gate Channel", Domain::Channel),
            field("Gate Note", Domain::Note),
            field("Pitch Channel", Domain::Channel),
        ],
    },
    ModeSpec {
        id: mode_id::RANDSEQ,
        name: "Random Step Sequencer",
        fields: &[
            field("Gate Channel", Domain::Channel),
            field("Gate Note", Domain::Note),
            field("Step Channel", Domain::Channel),
            field("Step Note", Domain::Note),
            field("Reset Channel", Domain::Channel),
            field("Reset Note", Domain::Note),
        ],
    },
    ModeSpec {
        id: mode_id::RANDSEQ_SAH,
        name: "Random Step Sequencer, Sample & Hold",
        fields: &[
            field("Gate Channel", Domain::Channel),
            field("Gate Note", Domain::Note),
            field("Step Channel", Domain::Channel),
            field("Step Note", Domain::Note),
            field("Reset Channel", Domain::Channel),
            field("Reset Note", Domain::Note),
        ],
    },
];

/// Look up a mode by id. The table only ever stores ids validated against
/// the catalog, so an out-of-range id here is a programming error.
pub fn mode(id: u16) -> &'static ModeSpec {
    &MODES[id as usize]
}

/// Validating lookup for ids arriving from persisted state or pasted text.
pub fn lookup(id: u16) -> Option<&'static ModeSpec> {
    MODES.get(id as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_counts_match_firmware_layouts() {
        let counts: Vec<usize> = MODES.iter().map(|m| m.fields.len()).collect();
        assert_eq!(counts, vec![2, 4, 1, 3, 6, 6]);
    }

    #[test]
    fn ids_are_table_indices() {
        for (i, m) in MODES.iter().enumerate() {
            assert_eq!(m.id as usize, i);
            assert_eq!(mode(m.id).name, m.name);
        }
        assert!(lookup(MODES.len() as u16).is_none());
    }

    #[test]
    fn channel_domain_is_status_byte_offset() {
        let d = Domain::Channel;
        assert_eq!(d.first(), 0x90);
        assert_eq!(d.count(), 16);
        assert!(d.contains(0x9F));
        assert!(!d.contains(0xA0));
        assert!(!d.contains(0));
        assert_eq!(d.label(0x90), "Channel 1");
        assert_eq!(d.label(0x9F), "Channel 16");
        assert_eq!(d.index_of(0x93), Some(3));
        assert_eq!(d.index_of(0x8F), None);
    }

    #[test]
    fn seven_bit_domains() {
        for d in [Domain::Note, Domain::Controller] {
            assert_eq!(d.first(), 0);
            assert_eq!(d.count(), 128);
            assert!(d.contains(127));
            assert!(!d.contains(128));
            assert_eq!(d.value_at(64), 64);
        }
    }

    #[test]
    fn every_mode_starts_with_a_channel_field() {
        for m in MODES {
            assert_eq!(m.fields[0].domain, Domain::Channel, "mode {}", m.name);
        }
    }
}
