//! SysEx packing of the mapping table.
//!
//! The module takes the whole table in one message: a start byte, then
//! every slot of every row in row-major order as two 7-bit data bytes
//! (low seven bits first), then the end byte. The split is fixed-width —
//! two bytes per value even when the high byte is zero — and values never
//! exceed 14 bits.

use crate::table::{ROW_COUNT, ROW_WIDTH, Table};

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;

/// Packed message length: envelope plus two bytes per slot.
pub const MESSAGE_LEN: usize = 2 + 2 * ROW_COUNT * ROW_WIDTH;

/// Pack the table into a single SysEx message. The table is masked first,
/// so unused slots always transmit as zero.
pub fn pack(table: &Table) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MESSAGE_LEN);
    bytes.push(SYSEX_START);
    for row in table.masked().rows() {
        for &value in row {
            bytes.push((value & 0x7F) as u8);
            bytes.push(((value >> 7) & 0x7F) as u8);
        }
    }
    bytes.push(SYSEX_END);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mode_id;

    #[test]
    fn envelope_and_length() {
        let bytes = pack(&Table::default());
        assert_eq!(bytes.len(), MESSAGE_LEN);
        assert_eq!(bytes.len(), 114);
        assert_eq!(bytes[0], 0xF0);
        assert_eq!(*bytes.last().unwrap(), 0xF7);
        // Everything between the markers is 7-bit clean.
        assert!(bytes[1..bytes.len() - 1].iter().all(|&b| b < 0x80));
    }

    #[test]
    fn values_split_into_seven_bit_pairs_low_first() {
        let mut rows = *Table::default().rows();
        rows[0][1] = 200;
        let bytes = pack(&Table::from_rows(rows).unwrap());
        // Row 0 slot 0 (mode 0) then slot 1 (200 = 0b11001000).
        assert_eq!(&bytes[1..5], &[0, 0, 200 & 0x7F, 1]);
        assert_eq!(200 & 0x7F, 72);
    }

    #[test]
    fn default_table_first_row_bytes() {
        let bytes = pack(&Table::default());
        // [0, 144, 24, 0, 0, 0, 0] -> pairs (0,0) (16,1) (24,0) ...
        assert_eq!(&bytes[1..7], &[0, 0, 16, 1, 24, 0]);
    }

    #[test]
    fn stale_slots_transmit_as_zero() {
        let mut rows = *Table::default().rows();
        rows[0] = [mode_id::PITCH, 0x90, 24, 7, 7, 7, 7];
        let bytes = pack(&Table::from_rows(rows).unwrap());
        // Pitch keeps one field; slots 2..6 must be zero on the wire.
        assert_eq!(&bytes[1..15], &[2, 0, 16, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
