//! Textual form of the table for the edit pane.
//!
//! One bracketed line per row, values right-aligned to three columns:
//!
//! ```text
//! [  0, 144,  24,   0,   0,   0,   0]
//! ```
//!
//! `decode` parses an edited rendering back, insisting on the exact table
//! shape so a stray line or missing value rejects the whole edit.

use std::fmt::Write;

use anyhow::{Context, bail};

use crate::table::{ROW_COUNT, ROW_WIDTH, Row, Table};

/// Render the masked table, one line per row.
pub fn encode(table: &Table) -> String {
    let mut out = String::new();
    for (i, row) in table.masked().rows().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push('[');
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{value:>3}");
        }
        out.push(']');
    }
    out
}

/// Parse an edited rendering back into a table.
///
/// Blank lines are ignored; everything else must match the table shape
/// exactly (8 rows of 7 values, catalog mode ids). The result comes back
/// masked, so values pasted into a mode's unused slots are dropped. On
/// error the caller keeps its current table; nothing is partially applied.
pub fn decode(text: &str) -> anyhow::Result<Table> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() != ROW_COUNT {
        bail!("expected {ROW_COUNT} rows, got {}", lines.len());
    }

    let mut rows = [[0u16; ROW_WIDTH]; ROW_COUNT];
    for (i, line) in lines.iter().enumerate() {
        rows[i] = parse_row(line).with_context(|| format!("row {i}"))?;
    }
    Ok(Table::from_rows(rows)?.masked())
}

fn parse_row(line: &str) -> anyhow::Result<Row> {
    let inner = line
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    let values: Vec<&str> = inner.split(',').map(str::trim).collect();
    if values.len() != ROW_WIDTH {
        bail!("expected {ROW_WIDTH} values, got {}", values.len());
    }
    let mut row = [0u16; ROW_WIDTH];
    for (j, v) in values.iter().enumerate() {
        row[j] = v
            .parse()
            .with_context(|| format!("column {j}: not a number: {v:?}"))?;
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mode_id;

    #[test]
    fn encode_pads_values_to_three_columns() {
        let text = encode(&Table::default());
        let first = text.lines().next().unwrap();
        assert_eq!(first, "[  0, 144,  24,   0,   0,   0,   0]");
        assert_eq!(text.lines().count(), ROW_COUNT);
    }

    #[test]
    fn encode_masks_stale_trailing_slots() {
        let mut rows = *Table::default().rows();
        rows[0] = [mode_id::VELOCITY, 0x90, 24, 9, 9, 9, 9];
        let table = Table::from_rows(rows).unwrap();
        let first = encode(&table).lines().next().unwrap().to_string();
        assert_eq!(first, "[  0, 144,  24,   0,   0,   0,   0]");
    }

    #[test]
    fn decode_round_trips_masked_table() {
        let mut t = Table::default();
        t.set_mode(1, mode_id::RANDSEQ);
        t.set_mode(4, mode_id::PITCH);
        let masked = t.masked();
        assert_eq!(decode(&encode(&t)).unwrap(), masked);
    }

    #[test]
    fn decode_accepts_unpadded_lines_and_blank_lines() {
        let mut text = String::from("\n[0, 144, 24, 0, 0, 0, 0]\n");
        for i in 1..ROW_COUNT {
            text.push_str(&format!("[0,144,{},0,0,0,0]\n\n", 24 + i));
        }
        assert_eq!(decode(&text).unwrap(), Table::default());
    }

    #[test]
    fn decode_masks_values_in_unused_slots() {
        let mut lines = vec!["[  2, 144,  60,  70,   1,   2,   3]".to_string()];
        for i in 1..ROW_COUNT {
            lines.push(format!("[0, 144, {}, 0, 0, 0, 0]", 24 + i));
        }
        let table = decode(&lines.join("\n")).unwrap();
        // Pitch mode keeps one field; the rest is dropped.
        assert_eq!(table.row(0), &[2, 144, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn decode_rejects_wrong_row_count() {
        let err = decode("[0, 144, 24, 0, 0, 0, 0]").unwrap_err();
        assert!(err.to_string().contains("expected 8 rows"));
    }

    #[test]
    fn decode_rejects_wrong_row_width() {
        let mut text = encode(&Table::default());
        text = text.replacen(",   0]", "]", 1);
        let err = decode(&text).unwrap_err();
        assert!(format!("{err:#}").contains("expected 7 values"));
    }

    #[test]
    fn decode_rejects_non_numeric_values() {
        let mut text = encode(&Table::default());
        text = text.replacen("144", "xyz", 1);
        assert!(decode(&text).is_err());
    }

    #[test]
    fn decode_rejects_unknown_mode_id() {
        let mut text = encode(&Table::default());
        text = text.replacen("[  0", "[  6", 1);
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("unknown mode id 6"));
    }
}
