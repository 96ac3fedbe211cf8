//! The mapping table: eight fixed-width rows, one per gate output.
//!
//! Slot 0 of a row is its mode id; the mode (see [`crate::catalog`])
//! decides how many of the remaining six slots are meaningful. Unused
//! trailing slots are held at zero by the normalizer on every mode change,
//! and [`Table::masked`] re-applies that convention for anything leaving
//! the program (text rendering, SysEx).

use serde::Serialize;

use crate::catalog::{self, ModeSpec, mode_id};

/// Slots per row: the mode id plus six value slots (gate pair + two CV pairs).
pub const ROW_WIDTH: usize = 7;
/// Rows in the table, one per gate output on the module.
pub const ROW_COUNT: usize = 8;

/// First gate note of the factory map (C0).
const DEFAULT_BASE_NOTE: u16 = 24;

pub type Row = [u16; ROW_WIDTH];

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(transparent)]
pub struct Table {
    rows: [Row; ROW_COUNT],
}

impl Default for Table {
    /// Factory map: velocity mode on every gate, channel 1, notes C0..G0.
    fn default() -> Self {
        let mut rows = [[0; ROW_WIDTH]; ROW_COUNT];
        for (i, row) in rows.iter_mut().enumerate() {
            row[0] = mode_id::VELOCITY;
            row[1] = catalog::CHANNEL_BASE;
            row[2] = DEFAULT_BASE_NOTE + i as u16;
        }
        Table { rows }
    }
}

impl Table {
    /// Build a table from raw rows, validating every mode id against the
    /// catalog. Field values are not range-checked; masking decides what is
    /// meaningful.
    pub fn from_rows(rows: [Row; ROW_COUNT]) -> anyhow::Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if catalog::lookup(row[0]).is_none() {
                anyhow::bail!("row {i}: unknown mode id {}", row[0]);
            }
        }
        Ok(Table { rows })
    }

    pub fn rows(&self) -> &[Row; ROW_COUNT] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    /// The mode of a row, looked up from its slot 0.
    pub fn mode_of(&self, index: usize) -> &'static ModeSpec {
        catalog::mode(self.rows[index][0])
    }

    /// Write a value into one slot. Mode changes must go through
    /// [`Table::set_mode`] instead so the row is reshaped.
    pub fn set_field(&mut self, row: usize, col: usize, value: u16) {
        self.rows[row][col] = value;
    }

    /// Change a row's mode, reshaping the row for the new field layout.
    pub fn set_mode(&mut self, row: usize, new_mode_id: u16) {
        self.rows[row] = reshape(&self.rows[row], new_mode_id);
    }

    /// Copy of the table with every row masked to its meaningful slots.
    pub fn masked(&self) -> Table {
        Table {
            rows: self.rows.map(mask_row),
        }
    }
}

/// Reshape a row for a new mode.
///
/// Slot 0 becomes the new mode id. A value slot carries over when the old
/// and new mode both declare a field at that position; a position only the
/// new mode declares starts at its domain's first value. Slots past the new
/// mode's field count are zeroed. Most modes share the leading gate
/// channel/note pair, so switching between them keeps those settings.
pub fn reshape(row: &Row, new_mode_id: u16) -> Row {
    let old = catalog::mode(row[0]);
    let new = catalog::mode(new_mode_id);
    let mut out: Row = [0; ROW_WIDTH];
    out[0] = new_mode_id;
    for i in 1..ROW_WIDTH {
        let Some(field) = new.fields.get(i - 1) else {
            break;
        };
        out[i] = if old.fields.get(i - 1).is_some() {
            row[i]
        } else {
            field.domain.first()
        };
    }
    out
}

/// Zero every slot past the row's meaningful field count.
pub fn mask_row(row: Row) -> Row {
    let keep = 1 + catalog::mode(row[0]).fields.len();
    let mut out = row;
    for slot in out[keep..].iter_mut() {
        *slot = 0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_map_matches_firmware() {
        let t = Table::default();
        assert_eq!(t.row(0), &[0, 0x90, 24, 0, 0, 0, 0]);
        assert_eq!(t.row(7), &[0, 0x90, 31, 0, 0, 0, 0]);
        for i in 0..ROW_COUNT {
            assert_eq!(t.mode_of(i).name, "Velocity");
        }
    }

    #[test]
    fn from_rows_rejects_unknown_mode_id() {
        let mut rows = *Table::default().rows();
        rows[3][0] = 6;
        let err = Table::from_rows(rows).unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn reshape_velocity_to_pitch_sample_hold_keeps_gate_prefix() {
        // Both modes start with Gate Channel / Gate Note; the new third
        // field (Pitch Channel) starts at the domain's first value.
        let row = [mode_id::VELOCITY, 0x90, 24, 0, 0, 0, 0];
        let out = reshape(&row, mode_id::PITCH_SAH);
        assert_eq!(out, [3, 0x90, 24, 0x90, 0, 0, 0]);
    }

    #[test]
    fn reshape_zeroes_slots_past_new_field_count() {
        let row = [mode_id::RANDSEQ, 0x95, 60, 0x95, 61, 0x95, 62];
        let out = reshape(&row, mode_id::VELOCITY);
        assert_eq!(out, [0, 0x95, 60, 0, 0, 0, 0]);
    }

    #[test]
    fn reshape_fills_positions_the_old_mode_lacked() {
        let row = [mode_id::CC, 0x95, 60, 0xB3, 70, 0, 0];
        let out = reshape(&row, mode_id::RANDSEQ);
        // Positions 1..4 exist in both modes and carry over; positions 5
        // and 6 are new and start at Channel/Note domain firsts.
        assert_eq!(out, [4, 0x95, 60, 0xB3, 70, 0x90, 0]);
    }

    #[test]
    fn mode_switch_and_back_keeps_only_shared_prefix() {
        let row = [mode_id::VELOCITY, 0x92, 60, 0, 0, 0, 0];
        let there = reshape(&row, mode_id::PITCH);
        assert_eq!(there, [2, 0x92, 0, 0, 0, 0, 0]);
        let back = reshape(&there, mode_id::VELOCITY);
        // The gate note was dropped by the switch to Pitch and does not
        // resurrect; it restarts at the note domain's first value.
        assert_eq!(back, [0, 0x92, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn reshape_slot_zero_always_new_mode() {
        for m in catalog::MODES {
            let out = reshape(&[mode_id::VELOCITY, 0x90, 24, 0, 0, 0, 0], m.id);
            assert_eq!(out[0], m.id);
            for (i, &v) in out.iter().enumerate().skip(1) {
                match m.fields.get(i - 1) {
                    Some(f) => assert!(f.domain.contains(v), "mode {} slot {i}", m.name),
                    None => assert_eq!(v, 0, "mode {} slot {i}", m.name),
                }
            }
        }
    }

    #[test]
    fn mask_zeroes_unused_slots_only() {
        let row = [mode_id::PITCH, 0x90, 99, 77, 1, 2, 3];
        assert_eq!(mask_row(row), [2, 0x90, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn mask_is_idempotent() {
        let row = [mode_id::CC, 0x95, 60, 0xB3, 70, 5, 6];
        let once = mask_row(row);
        assert_eq!(mask_row(once), once);
    }

    #[test]
    fn set_mode_goes_through_reshape() {
        let mut t = Table::default();
        t.set_mode(0, mode_id::PITCH_SAH);
        assert_eq!(t.row(0), &[3, 0x90, 24, 0x90, 0, 0, 0]);
    }

    #[test]
    fn set_field_writes_one_slot() {
        let mut t = Table::default();
        t.set_field(2, 2, 60);
        assert_eq!(t.row(2), &[0, 0x90, 60, 0, 0, 0, 0]);
        assert_eq!(t.row(1), &[0, 0x90, 25, 0, 0, 0, 0]);
    }
}
